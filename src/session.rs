//! A mounted game: one state, one tick scheduler, and the help bar around them.
//!
//! Restarting tears the running session down (its scheduler is cancelled and
//! never ticks again) and mounts a fresh one from the same catalog.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph};
use ratzilla::ratatui::Frame;

use crate::catalog::Catalog;
use crate::cookie::actions::RESTART;
use crate::cookie::CookieGame;
use crate::input::{ClickState, InputEvent};
use crate::time::TickScheduler;

pub struct Session {
    catalog: Catalog,
    pub game: CookieGame,
    scheduler: TickScheduler,
    /// How many times the game has been (re)started.
    pub generation: u32,
}

impl Session {
    pub fn mount(catalog: Catalog) -> Self {
        let settings = &catalog.settings;
        let scheduler = TickScheduler::new(settings.tick_interval_ms, settings.missed_ticks);
        let game = CookieGame::new(&catalog);
        Self {
            catalog,
            game,
            scheduler,
            generation: 1,
        }
    }

    /// Called once per animation frame. Returns the number of ticks applied.
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        if self.is_torn_down() {
            return 0;
        }
        let dropped_before = self.scheduler.dropped_ticks;
        let ticks = self.scheduler.update(now_ms);
        let dropped = self.scheduler.dropped_ticks - dropped_before;
        if ticks > 1 || dropped > 0 {
            console_log(&format!(
                "Cookie Clicker: woke up, applying {ticks} tick(s), dropping {dropped}"
            ));
        }

        self.game.tick(ticks);
        ticks
    }

    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key('R') | InputEvent::Click(RESTART) => {
                self.restart();
                true
            }
            _ => self.game.handle_input(event),
        }
    }

    /// Stop the scheduler. Returns false if this session was already torn down.
    pub fn teardown(&mut self) -> bool {
        let cancelled = self.scheduler.cancel();
        if cancelled {
            console_log(&format!(
                "Cookie Clicker: session {} torn down after {} tick(s)",
                self.generation, self.scheduler.total_ticks
            ));
        }
        cancelled
    }

    pub fn is_torn_down(&self) -> bool {
        self.scheduler.is_cancelled()
    }

    /// Tear down and start over with a fresh game.
    pub fn restart(&mut self) {
        self.teardown();
        let generation = self.generation + 1;
        *self = Self::mount(self.catalog.clone());
        self.generation = generation;
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(3)])
            .split(area);

        self.game.render(f, chunks[0], click_state);
        render_help(f, chunks[1], click_state);
    }
}

#[cfg(target_arch = "wasm32")]
fn console_log(msg: &str) {
    web_sys::console::log_1(&msg.into());
}

#[cfg(not(target_arch = "wasm32"))]
fn console_log(_msg: &str) {}

const RESTART_LABEL: &str = " [R] restart ";

/// Key hints on the left, a restart button on the right.
fn render_help(f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let button_width = Line::from(RESTART_LABEL).width() as u16;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(button_width)])
        .split(inner);

    let hints = Paragraph::new(Line::from(Span::styled(
        "[C] click  [1-9] buy  [Tab] switch",
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center);
    f.render_widget(hints, cols[0]);

    let button = Paragraph::new(Line::from(Span::styled(
        RESTART_LABEL,
        Style::default().fg(Color::Black).bg(Color::Red),
    )));
    f.render_widget(button, cols[1]);

    // Whole bar height for easier taps
    let target = Rect::new(cols[1].x, area.y, cols[1].width, area.height);
    click_state.borrow_mut().add_click_target(target, RESTART);
}
