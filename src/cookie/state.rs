//! Cookie Clicker game state: producers, upgrades, achievements and the ledger.

use serde::Deserialize;

use crate::catalog::Catalog;

/// Each purchase of a producer raises its next price by this factor.
pub const COST_GROWTH: f64 = 1.15;

/// Price of the next unit after `owned` units have been bought.
pub fn cost_for(base_cost: f64, owned: u32) -> f64 {
    (base_cost * COST_GROWTH.powi(owned as i32)).ceil()
}

/// A building that bakes cookies passively every tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Producer {
    /// Unique name, also used as a modifier target.
    pub kind: String,
    pub description: String,
    pub base_cost: f64,
    /// Always `cost_for(base_cost, owned)`.
    pub current_cost: f64,
    pub owned: u32,
    /// Cookies per second per unit before multipliers.
    pub base_rate: f64,
    /// Product of every modifier bought for this kind (starts at 1.0).
    pub multiplier: f64,
}

impl Producer {
    pub fn new(kind: impl Into<String>, description: impl Into<String>, base_cost: f64, base_rate: f64) -> Self {
        Self {
            kind: kind.into(),
            description: description.into(),
            base_cost,
            current_cost: cost_for(base_cost, 0),
            owned: 0,
            base_rate,
            multiplier: 1.0,
        }
    }

    /// Cookies per second from every owned unit (global multiplier excluded).
    pub fn cps(&self) -> f64 {
        self.base_rate * self.owned as f64 * self.multiplier
    }

    /// CPS gained by buying the next unit.
    pub fn next_unit_cps(&self) -> f64 {
        self.base_rate * self.multiplier
    }

    /// Seconds until the next unit pays for itself.
    pub fn payback_seconds(&self) -> Option<f64> {
        let cps = self.next_unit_cps();
        if cps > 0.0 {
            Some(self.current_cost / cps)
        } else {
            None
        }
    }

    /// Recompute `current_cost` from the cost curve.
    pub(crate) fn reprice(&mut self) {
        self.current_cost = cost_for(self.base_cost, self.owned);
    }
}

/// What a modifier scales once bought.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum ModifierTarget {
    Click,
    Global,
    Producer(String),
}

impl From<String> for ModifierTarget {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "click" => ModifierTarget::Click,
            "global" => ModifierTarget::Global,
            _ => ModifierTarget::Producer(raw),
        }
    }
}

/// "Own at least `count` of `kind`".
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ProducerRequirement {
    pub kind: String,
    pub count: u32,
}

/// Thresholds a modifier must meet before it is offered for sale.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Eligibility {
    /// Cookies currently held.
    pub min_resource: Option<f64>,
    pub producer: Option<ProducerRequirement>,
}

impl Eligibility {
    pub fn is_met(&self, ledger: &Ledger, producers: &[Producer]) -> bool {
        if let Some(floor) = self.min_resource {
            if ledger.resource_total < floor {
                return false;
            }
        }
        if let Some(req) = &self.producer {
            let owned = producers
                .iter()
                .find(|p| p.kind == req.kind)
                .map(|p| p.owned);
            match owned {
                Some(n) if n >= req.count => {}
                _ => return false,
            }
        }
        true
    }

    /// e.g. "100 cookies and 5 Grandmas"
    pub fn describe(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(floor) = self.min_resource {
            parts.push(format!("{} cookies", super::logic::format_number(floor)));
        }
        if let Some(req) = &self.producer {
            parts.push(format!("{} {}s", req.count, req.kind));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" and "))
        }
    }
}

/// A one-time upgrade.
#[derive(Clone, Debug, PartialEq)]
pub struct Modifier {
    pub name: String,
    pub description: String,
    pub cost: f64,
    pub effect_factor: f64,
    pub target: ModifierTarget,
    pub eligibility: Option<Eligibility>,
    pub purchased: bool,
}

impl Modifier {
    /// Whether the eligibility thresholds hold. Purchase state is not considered.
    pub fn requirements_met(&self, ledger: &Ledger, producers: &[Producer]) -> bool {
        self.eligibility
            .as_ref()
            .map_or(true, |e| e.is_met(ledger, producers))
    }

    pub fn effect_text(&self) -> String {
        match &self.target {
            ModifierTarget::Click => format!("Clicking power x{}", self.effect_factor),
            ModifierTarget::Global => format!("All production x{}", self.effect_factor),
            ModifierTarget::Producer(kind) => format!("{} production x{}", kind, self.effect_factor),
        }
    }

    pub fn requirement_text(&self) -> Option<String> {
        self.eligibility.as_ref().and_then(Eligibility::describe)
    }
}

/// Threshold that unlocks a milestone.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneCondition {
    LifetimeProduced(f64),
    TotalClicks(u64),
    ProducersBought(u64),
    ModifiersBought(u64),
    ResourceHeld(f64),
    ProducerOwned { kind: String, count: u32 },
}

impl MilestoneCondition {
    pub fn is_met(&self, ledger: &Ledger, producers: &[Producer]) -> bool {
        let stats = &ledger.stats;
        match self {
            MilestoneCondition::LifetimeProduced(x) => stats.lifetime_produced >= *x,
            MilestoneCondition::TotalClicks(n) => stats.total_clicks >= *n,
            MilestoneCondition::ProducersBought(n) => stats.producers_bought >= *n,
            MilestoneCondition::ModifiersBought(n) => stats.modifiers_bought >= *n,
            MilestoneCondition::ResourceHeld(x) => ledger.resource_total >= *x,
            MilestoneCondition::ProducerOwned { kind, count } => producers
                .iter()
                .any(|p| p.kind == *kind && p.owned >= *count),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardKind {
    /// Scales the global multiplier.
    Multiplier,
    #[serde(alias = "clickPower")]
    ClickPower,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Reward {
    pub kind: RewardKind,
    pub factor: f64,
}

impl Reward {
    pub fn describe(&self) -> String {
        match self.kind {
            RewardKind::Multiplier => format!("all production x{}", self.factor),
            RewardKind::ClickPower => format!("clicking power x{}", self.factor),
        }
    }
}

/// An achievement.
#[derive(Clone, Debug, PartialEq)]
pub struct Milestone {
    pub name: String,
    pub description: String,
    pub condition: MilestoneCondition,
    pub reward: Option<Reward>,
    pub unlocked: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stats {
    /// Every cookie ever baked, by clicks and producers.
    pub lifetime_produced: f64,
    pub total_clicks: u64,
    pub producers_bought: u64,
    pub modifiers_bought: u64,
}

/// Cookies on hand plus everything that scales how fast they arrive.
#[derive(Clone, Debug, PartialEq)]
pub struct Ledger {
    pub resource_total: f64,
    pub click_power: f64,
    pub global_multiplier: f64,
    pub stats: Stats,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            resource_total: 0.0,
            click_power: 1.0,
            global_multiplier: 1.0,
            stats: Stats::default(),
        }
    }
}

impl Ledger {
    /// Cookies earned by one manual click.
    pub fn click_yield(&self) -> f64 {
        self.click_power * self.global_multiplier
    }

    pub fn can_afford(&self, cost: f64) -> bool {
        self.resource_total >= cost
    }
}

/// Log entry shown in the message panel.
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

/// Full state of one game.
#[derive(Clone, Debug)]
pub struct GameState {
    pub ledger: Ledger,
    pub producers: Vec<Producer>,
    pub modifiers: Vec<Modifier>,
    pub milestones: Vec<Milestone>,
    pub log: Vec<LogEntry>,
    log_capacity: usize,
}

impl GameState {
    /// Fresh game seeded from the catalog definitions.
    pub fn new(catalog: &Catalog) -> Self {
        let producers = catalog
            .producers
            .iter()
            .map(|d| Producer::new(d.kind.clone(), d.description.clone(), d.base_cost, d.base_rate))
            .collect();

        let modifiers = catalog
            .modifiers
            .iter()
            .map(|d| Modifier {
                name: d.name.clone(),
                description: d.description.clone(),
                cost: d.cost,
                effect_factor: d.effect_factor,
                target: d.target.clone(),
                eligibility: d.eligibility.clone(),
                purchased: false,
            })
            .collect();

        let milestones = catalog
            .milestones
            .iter()
            .map(|d| Milestone {
                name: d.name.clone(),
                description: d.description.clone(),
                condition: d.condition.clone(),
                reward: d.reward,
                unlocked: false,
            })
            .collect();

        let mut state = Self {
            ledger: Ledger::default(),
            producers,
            modifiers,
            milestones,
            log: Vec::new(),
            log_capacity: catalog.settings.log_capacity.max(1),
        };
        state.add_log("Welcome to Cookie Clicker!", true);
        state
    }

    /// Cookies per second from all producers, global multiplier included.
    pub fn total_cps(&self) -> f64 {
        super::logic::aggregate_rate(&self.producers, self.ledger.global_multiplier)
    }

    pub fn unlocked_milestone_count(&self) -> usize {
        self.milestones.iter().filter(|m| m.unlocked).count()
    }

    pub fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > self.log_capacity {
            let excess = self.log.len() - self.log_capacity;
            self.log.drain(..excess);
        }
    }
}
