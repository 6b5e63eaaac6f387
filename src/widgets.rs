//! Clickable UI components.
//!
//! Each component draws itself and registers its own click targets, so the
//! rows a player can tap always line up with what is on screen.
//!
//! - [`TabBar`] — one-row tab strip.
//! - [`ClickableList`] — lines of text, some of which are buttons.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

// ── TabBar ─────────────────────────────────────────────────────

struct Tab {
    label: String,
    color: Color,
    active: bool,
    action_id: u16,
}

/// A single-row tab strip. The active tab is drawn inverted in its color.
///
/// ```ignore
/// TabBar::new("│")
///     .tab("Producers", Color::Green, true, TAB_PRODUCERS)
///     .tab("Upgrades", Color::Magenta, false, TAB_UPGRADES)
///     .render(f, area, &mut cs);
/// ```
pub struct TabBar<'a> {
    tabs: Vec<Tab>,
    separator: &'a str,
}

impl<'a> TabBar<'a> {
    pub fn new(separator: &'a str) -> Self {
        Self {
            tabs: Vec::new(),
            separator,
        }
    }

    pub fn tab(mut self, label: impl Into<String>, color: Color, active: bool, action_id: u16) -> Self {
        self.tabs.push(Tab {
            label: label.into(),
            color,
            active,
            action_id,
        });
        self
    }

    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let sep_width = Line::from(self.separator).width() as u16;
        let mut spans = Vec::with_capacity(self.tabs.len() * 2);
        let mut widths = Vec::with_capacity(self.tabs.len());

        for (i, tab) in self.tabs.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(self.separator, Style::default().fg(Color::DarkGray)));
            }
            let style = if tab.active {
                Style::default()
                    .fg(Color::Black)
                    .bg(tab.color)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(tab.color)
            };
            let padded = format!(" {} ", tab.label);
            widths.push((Line::from(padded.as_str()).width() as u16, tab.action_id));
            spans.push(Span::styled(padded, style));
        }

        f.render_widget(Paragraph::new(Line::from(spans)), area);
        cs.register_tab_targets(&widths, sep_width, area.x, area.y, area.width, area.height.max(1));
    }
}

// ── ClickableList ──────────────────────────────────────────────

/// Lines paired with the action each clickable line triggers.
///
/// Targets are computed from line positions after the list is built, so
/// adding a header above a button never desynchronizes the hit rows.
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line index, action id)`
    actions: Vec<(usize, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len(), action_id));
        self.lines.push(line);
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register a target for every screen row a clickable line occupies.
    ///
    /// `inner` is the content rect (inside any block borders) the lines are
    /// drawn into. With `wrap` set, long lines take as many rows as
    /// `Paragraph` would wrap them into.
    pub fn register_targets(&self, inner: Rect, wrap: bool, cs: &mut ClickState) {
        let bottom = inner.y.saturating_add(inner.height);
        let mut visual_row: u16 = 0;
        let mut next_action = self.actions.iter().peekable();

        for (idx, line) in self.lines.iter().enumerate() {
            let height = if wrap { visual_height(line, inner.width) } else { 1 };
            let action = match next_action.peek() {
                Some(&&(line_idx, action_id)) if line_idx == idx => {
                    next_action.next();
                    Some(action_id)
                }
                _ => None,
            };

            if let Some(action_id) = action {
                for r in visual_row..visual_row + height {
                    let row = inner.y.saturating_add(r);
                    if row >= bottom {
                        return;
                    }
                    cs.add_row_target(inner, row, action_id);
                }
            }
            visual_row += height;
        }
    }
}

/// Rows a line occupies once wrapped to `width` columns.
fn visual_height(line: &Line, width: u16) -> u16 {
    if width == 0 {
        return 1;
    }
    let rows = Paragraph::new(line.clone())
        .wrap(Wrap { trim: false })
        .line_count(width);
    rows.max(1) as u16
}
