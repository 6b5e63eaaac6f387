//! Input normalization and click hit-testing.
//!
//! Keyboard and pointer events arrive from ratzilla in different shapes; both
//! are reduced to [`InputEvent`] before the game sees them. Pointer events are
//! resolved against the targets registered during the last render.

use ratzilla::ratatui::layout::Rect;

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key press. `Tab` arrives as `'\t'`.
    Key(char),
    /// A click or tap on a registered target, by action ID.
    Click(u16),
}

#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// Hit region in terminal cells.
    pub rect: Rect,
    pub action_id: u16,
}

/// Click targets from the most recent frame plus the grid size they were laid out on.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    /// Start a new frame on a grid of the given size.
    pub fn reset(&mut self, cols: u16, rows: u16) {
        self.terminal_cols = cols;
        self.terminal_rows = rows;
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        if rect.width > 0 && rect.height > 0 {
            self.targets.push(ClickTarget { rect, action_id });
        }
    }

    /// Make one row of `area` clickable. Rows outside `area` are ignored.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Targets for a horizontal tab strip.
    ///
    /// `tab_widths` holds `(label width, action id)` per tab in display order.
    /// Each target spans its label plus half of each neighbouring separator;
    /// the first and last tabs stretch to the edges of the strip.
    pub fn register_tab_targets(
        &mut self,
        tab_widths: &[(u16, u16)],
        separator_width: u16,
        x: u16,
        y: u16,
        total_width: u16,
        height: u16,
    ) {
        if tab_widths.is_empty() || total_width == 0 {
            return;
        }
        let half_sep = separator_width / 2;
        let last = tab_widths.len() - 1;
        let mut label_start: u16 = 0;
        let mut left: u16 = 0;

        for (i, &(width, action_id)) in tab_widths.iter().enumerate() {
            let label_end = label_start + width;
            let right = if i == last {
                total_width
            } else {
                (label_end + half_sep).min(total_width)
            };
            if right > left {
                self.add_click_target(Rect::new(x + left, y, right - left, height), action_id);
            }
            left = right;
            label_start = label_end + separator_width;
        }
    }

    /// The action under a cell. Later targets sit on top of earlier ones.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets
            .iter()
            .rev()
            .find(|t| {
                let r = t.rect;
                col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height
            })
            .map(|t| t.action_id)
    }
}

/// Screens narrower than this stack panels vertically and hide the log.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// Which of `cells` equal slices of `extent` pixels `offset` falls in.
fn pixel_to_index(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if extent <= 0.0 || cells == 0 || offset < 0.0 {
        return None;
    }
    let idx = (offset / (extent / cells as f64)) as u16;
    if idx < cells {
        Some(idx)
    } else {
        None
    }
}

/// Convert a pointer position relative to the grid's top-left corner into a
/// `(col, row)` cell. `None` when it lands outside the grid.
pub fn pixel_to_cell(
    x: f64,
    y: f64,
    grid_width: f64,
    grid_height: f64,
    cols: u16,
    rows: u16,
) -> Option<(u16, u16)> {
    let col = pixel_to_index(x, grid_width, cols)?;
    let row = pixel_to_index(y, grid_height, rows)?;
    Some((col, row))
}
