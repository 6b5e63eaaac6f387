//! Seed definitions and runtime settings.
//!
//! The catalog is a JSON document embedded at build time. Every game starts
//! from it: producers, modifiers and milestones are instantiated in the order
//! they appear here, and that order is also the display and evaluation order.

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

use crate::cookie::state::{
    Eligibility, MilestoneCondition, ModifierTarget, Reward,
};
use crate::time::MissedTicks;

const BUILTIN_CATALOG: &str = include_str!("data/catalog.json");

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Wall-clock length of one production tick.
    pub tick_interval_ms: u32,
    /// What to do with ticks missed while the page was suspended.
    pub missed_ticks: MissedTicks,
    /// Number of message log entries kept.
    pub log_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            missed_ticks: MissedTicks::Drop,
            log_capacity: 50,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProducerDef {
    pub kind: String,
    #[serde(default)]
    pub description: String,
    pub base_cost: f64,
    pub base_rate: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ModifierDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cost: f64,
    pub effect_factor: f64,
    pub target: ModifierTarget,
    pub eligibility: Option<Eligibility>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MilestoneDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub condition: MilestoneCondition,
    pub reward: Option<Reward>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub settings: Settings,
    pub producers: Vec<ProducerDef>,
    #[serde(default)]
    pub modifiers: Vec<ModifierDef>,
    #[serde(default)]
    pub milestones: Vec<MilestoneDef>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog defines no producers")]
    NoProducers,
    #[error("duplicate {section} entry {name:?}")]
    Duplicate { section: &'static str, name: String },
    #[error("producer kind {0:?} collides with a reserved modifier target")]
    ReservedKind(String),
    #[error("{section} entry {name:?} has invalid cost {cost} (must be > 0)")]
    InvalidCost {
        section: &'static str,
        name: String,
        cost: f64,
    },
    #[error("producer {kind:?} has negative base rate {rate}")]
    NegativeRate { kind: String, rate: f64 },
    #[error("{section} entry {name:?} has factor {factor} (must be >= 1)")]
    FactorBelowOne {
        section: &'static str,
        name: String,
        factor: f64,
    },
    #[error("{section} entry {name:?} refers to unknown producer {kind:?}")]
    UnknownProducer {
        section: &'static str,
        name: String,
        kind: String,
    },
    #[error("tick interval must be positive")]
    ZeroTickInterval,
    #[error("catch-up policy must allow at least one tick per wake")]
    ZeroCatchUp,
}

impl Catalog {
    /// The catalog shipped with the game.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.settings.tick_interval_ms == 0 {
            return Err(CatalogError::ZeroTickInterval);
        }
        if let MissedTicks::CatchUp { max_ticks: 0 } = self.settings.missed_ticks {
            return Err(CatalogError::ZeroCatchUp);
        }
        if self.producers.is_empty() {
            return Err(CatalogError::NoProducers);
        }

        let mut kinds = HashSet::new();
        for p in &self.producers {
            if p.kind == "click" || p.kind == "global" {
                return Err(CatalogError::ReservedKind(p.kind.clone()));
            }
            if !kinds.insert(p.kind.as_str()) {
                return Err(CatalogError::Duplicate {
                    section: "producer",
                    name: p.kind.clone(),
                });
            }
            if !(p.base_cost > 0.0) {
                return Err(CatalogError::InvalidCost {
                    section: "producer",
                    name: p.kind.clone(),
                    cost: p.base_cost,
                });
            }
            if p.base_rate < 0.0 {
                return Err(CatalogError::NegativeRate {
                    kind: p.kind.clone(),
                    rate: p.base_rate,
                });
            }
        }

        let unknown = |section: &'static str, name: &str, kind: &str| CatalogError::UnknownProducer {
            section,
            name: name.to_string(),
            kind: kind.to_string(),
        };

        let mut names = HashSet::new();
        for m in &self.modifiers {
            if !names.insert(m.name.as_str()) {
                return Err(CatalogError::Duplicate {
                    section: "modifier",
                    name: m.name.clone(),
                });
            }
            if !(m.cost > 0.0) {
                return Err(CatalogError::InvalidCost {
                    section: "modifier",
                    name: m.name.clone(),
                    cost: m.cost,
                });
            }
            if !(m.effect_factor >= 1.0) {
                return Err(CatalogError::FactorBelowOne {
                    section: "modifier",
                    name: m.name.clone(),
                    factor: m.effect_factor,
                });
            }
            if let ModifierTarget::Producer(kind) = &m.target {
                if !kinds.contains(kind.as_str()) {
                    return Err(unknown("modifier", &m.name, kind));
                }
            }
            if let Some(req) = m.eligibility.as_ref().and_then(|e| e.producer.as_ref()) {
                if !kinds.contains(req.kind.as_str()) {
                    return Err(unknown("modifier", &m.name, &req.kind));
                }
            }
        }

        let mut names = HashSet::new();
        for m in &self.milestones {
            if !names.insert(m.name.as_str()) {
                return Err(CatalogError::Duplicate {
                    section: "milestone",
                    name: m.name.clone(),
                });
            }
            if let Some(reward) = &m.reward {
                if !(reward.factor >= 1.0) {
                    return Err(CatalogError::FactorBelowOne {
                        section: "milestone",
                        name: m.name.clone(),
                        factor: reward.factor,
                    });
                }
            }
            if let MilestoneCondition::ProducerOwned { kind, .. } = &m.condition {
                if !kinds.contains(kind.as_str()) {
                    return Err(unknown("milestone", &m.name, kind));
                }
            }
        }

        Ok(())
    }
}
