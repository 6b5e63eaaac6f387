//! Cookie Clicker — click for cookies, buy buildings and upgrades, unlock achievements.

pub mod actions;
pub mod error;
pub mod logic;
pub mod render;
pub mod state;

mod simulator;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::catalog::Catalog;
use crate::input::{ClickState, InputEvent};

use actions::*;
use error::PurchaseError;
use logic::{format_number, Intent};
use state::GameState;

/// Which list is shown under the cookie.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Producers,
    Upgrades,
    Milestones,
    Stats,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Producers, Tab::Upgrades, Tab::Milestones, Tab::Stats];

    pub fn next(self) -> Self {
        match self {
            Tab::Producers => Tab::Upgrades,
            Tab::Upgrades => Tab::Milestones,
            Tab::Milestones => Tab::Stats,
            Tab::Stats => Tab::Producers,
        }
    }

    pub fn action_id(self) -> u16 {
        match self {
            Tab::Producers => TAB_PRODUCERS,
            Tab::Upgrades => TAB_UPGRADES,
            Tab::Milestones => TAB_MILESTONES,
            Tab::Stats => TAB_STATS,
        }
    }

    fn from_action(action_id: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.action_id() == action_id)
    }
}

pub struct CookieGame {
    pub state: GameState,
    pub tab: Tab,
}

impl CookieGame {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            state: GameState::new(catalog),
            tab: Tab::Producers,
        }
    }

    /// Handle an input event. Returns true if the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key(c) => self.handle_key(*c),
            InputEvent::Click(id) => self.handle_click(*id),
        }
    }

    fn handle_key(&mut self, key: char) -> bool {
        match key {
            'c' | ' ' => {
                self.apply(Intent::Click);
                true
            }
            '\t' => {
                self.tab = self.tab.next();
                true
            }
            'p' => self.switch_tab(Tab::Producers),
            'u' => self.switch_tab(Tab::Upgrades),
            'm' => self.switch_tab(Tab::Milestones),
            's' => self.switch_tab(Tab::Stats),
            '1'..='9' => {
                let n = (key as u8 - b'1') as usize;
                match self.tab {
                    Tab::Producers => self.buy_producer(n),
                    Tab::Upgrades => self.buy_eligible(n),
                    Tab::Milestones | Tab::Stats => false,
                }
            }
            _ => false,
        }
    }

    fn handle_click(&mut self, action_id: u16) -> bool {
        if action_id == CLICK_COOKIE {
            self.apply(Intent::Click);
            return true;
        }
        if let Some(tab) = Tab::from_action(action_id) {
            return self.switch_tab(tab);
        }
        match action_id {
            id if (BUY_PRODUCER_BASE..BUY_MODIFIER_BASE).contains(&id) => {
                self.buy_producer((id - BUY_PRODUCER_BASE) as usize)
            }
            id if (BUY_MODIFIER_BASE..RESTART).contains(&id) => {
                self.buy_eligible((id - BUY_MODIFIER_BASE) as usize)
            }
            _ => false,
        }
    }

    fn switch_tab(&mut self, tab: Tab) -> bool {
        self.tab = tab;
        true
    }

    fn buy_producer(&mut self, index: usize) -> bool {
        if index >= self.state.producers.len() {
            return false;
        }
        self.apply(Intent::BuyProducer(index));
        true
    }

    /// Buy the nth upgrade as currently listed.
    fn buy_eligible(&mut self, display_idx: usize) -> bool {
        let name = logic::eligible_modifiers(
            &self.state.modifiers,
            &self.state.ledger,
            &self.state.producers,
        )
        .get(display_idx)
        .map(|m| m.name.clone());

        match name {
            Some(name) => {
                self.apply(Intent::BuyModifier(name));
                true
            }
            None => false,
        }
    }

    /// Run one intent. A refused purchase only leaves a log line behind.
    fn apply(&mut self, intent: Intent) {
        if let Err(err) = logic::dispatch(&mut self.state, intent) {
            self.state.add_log(&refusal_text(&err), false);
        }
    }

    /// Advance production by `ticks` whole ticks.
    pub fn tick(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.apply(Intent::Tick);
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self, f, area, click_state);
    }
}

fn refusal_text(err: &PurchaseError) -> String {
    match err {
        PurchaseError::InsufficientResource { cost, available } => format!(
            "Not enough cookies ({} / {})",
            format_number(available.floor()),
            format_number(*cost)
        ),
        other => other.to_string(),
    }
}
