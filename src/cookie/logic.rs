//! Cookie Clicker progression engine — pure functions, fully testable.

use super::error::PurchaseError;
use super::state::{
    GameState, Ledger, Milestone, Modifier, ModifierTarget, Producer, Reward, RewardKind,
};

/// Something the player (or the clock) asks the game to do.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    Click,
    Tick,
    /// Index into `GameState::producers`.
    BuyProducer(usize),
    BuyModifier(String),
}

/// What a successful intent did.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Clicked { gained: f64 },
    Ticked { produced: f64 },
    ProducerBought { kind: String, cost: f64, owned: u32 },
    ModifierBought { name: String, cost: f64 },
}

/// A milestone that flipped to unlocked, with the reward it granted.
#[derive(Clone, Debug, PartialEq)]
pub struct MilestoneUnlock {
    pub name: String,
    pub reward: Option<Reward>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub event: Event,
    pub unlocks: Vec<MilestoneUnlock>,
}

/// Manual click: bank `click_power * global_multiplier`. Returns the amount gained.
pub fn apply_click(ledger: &mut Ledger) -> f64 {
    let gained = ledger.click_yield();
    ledger.resource_total += gained;
    ledger.stats.lifetime_produced += gained;
    ledger.stats.total_clicks += 1;
    gained
}

/// Cookies per second from every producer, times the global multiplier.
pub fn aggregate_rate(producers: &[Producer], global_multiplier: f64) -> f64 {
    producers.iter().map(Producer::cps).sum::<f64>() * global_multiplier
}

/// One tick of passive production. Returns the amount produced.
pub fn tick(ledger: &mut Ledger, producers: &[Producer]) -> f64 {
    let produced = aggregate_rate(producers, ledger.global_multiplier);
    ledger.resource_total += produced;
    ledger.stats.lifetime_produced += produced;
    produced
}

/// Buy one unit of `producer`. Returns the price paid.
pub fn buy_producer(ledger: &mut Ledger, producer: &mut Producer) -> Result<f64, PurchaseError> {
    let cost = producer.current_cost;
    if !ledger.can_afford(cost) {
        return Err(PurchaseError::InsufficientResource {
            cost,
            available: ledger.resource_total,
        });
    }
    ledger.resource_total -= cost;
    producer.owned += 1;
    producer.reprice();
    ledger.stats.producers_bought += 1;
    Ok(cost)
}

/// Buy a modifier and apply its effect. Returns the price paid.
pub fn buy_modifier(
    ledger: &mut Ledger,
    modifier: &mut Modifier,
    producers: &mut [Producer],
) -> Result<f64, PurchaseError> {
    if modifier.purchased {
        return Err(PurchaseError::AlreadyPurchased {
            name: modifier.name.clone(),
        });
    }
    let cost = modifier.cost;
    if !ledger.can_afford(cost) {
        return Err(PurchaseError::InsufficientResource {
            cost,
            available: ledger.resource_total,
        });
    }

    match &modifier.target {
        ModifierTarget::Click => ledger.click_power *= modifier.effect_factor,
        ModifierTarget::Global => ledger.global_multiplier *= modifier.effect_factor,
        ModifierTarget::Producer(kind) => {
            let producer = producers
                .iter_mut()
                .find(|p| p.kind == *kind)
                .ok_or_else(|| PurchaseError::UnknownProducer { kind: kind.clone() })?;
            producer.multiplier *= modifier.effect_factor;
        }
    }

    ledger.resource_total -= cost;
    modifier.purchased = true;
    ledger.stats.modifiers_bought += 1;
    Ok(cost)
}

/// Modifiers currently offered for sale, in definition order.
pub fn eligible_modifiers<'a>(
    modifiers: &'a [Modifier],
    ledger: &Ledger,
    producers: &[Producer],
) -> Vec<&'a Modifier> {
    modifiers
        .iter()
        .filter(|m| !m.purchased && m.requirements_met(ledger, producers))
        .collect()
}

/// Unlock every locked milestone whose condition now holds and grant its reward.
pub fn evaluate_milestones(
    milestones: &mut [Milestone],
    ledger: &mut Ledger,
    producers: &[Producer],
) -> Vec<MilestoneUnlock> {
    let mut unlocks = Vec::new();
    for milestone in milestones.iter_mut() {
        if milestone.unlocked || !milestone.condition.is_met(ledger, producers) {
            continue;
        }
        milestone.unlocked = true;
        if let Some(reward) = &milestone.reward {
            apply_reward(ledger, reward);
        }
        unlocks.push(MilestoneUnlock {
            name: milestone.name.clone(),
            reward: milestone.reward,
        });
    }
    unlocks
}

fn apply_reward(ledger: &mut Ledger, reward: &Reward) {
    match reward.kind {
        RewardKind::Multiplier => ledger.global_multiplier *= reward.factor,
        RewardKind::ClickPower => ledger.click_power *= reward.factor,
    }
}

/// Apply one intent, then re-check milestones. A refused intent changes nothing.
pub fn dispatch(state: &mut GameState, intent: Intent) -> Result<Report, PurchaseError> {
    let event = match intent {
        Intent::Click => Event::Clicked {
            gained: apply_click(&mut state.ledger),
        },
        Intent::Tick => Event::Ticked {
            produced: tick(&mut state.ledger, &state.producers),
        },
        Intent::BuyProducer(index) => {
            let producer = state
                .producers
                .get_mut(index)
                .ok_or_else(|| PurchaseError::UnknownProducer {
                    kind: format!("#{}", index),
                })?;
            let cost = buy_producer(&mut state.ledger, producer)?;
            let kind = producer.kind.clone();
            let owned = producer.owned;
            state.add_log(&format!("Bought a {}! ({} owned)", kind, owned), false);
            Event::ProducerBought { kind, cost, owned }
        }
        Intent::BuyModifier(name) => {
            let index = state
                .modifiers
                .iter()
                .position(|m| m.name == name)
                .ok_or_else(|| PurchaseError::UnknownModifier { name: name.clone() })?;
            let modifier = &mut state.modifiers[index];
            if !modifier.purchased && !modifier.requirements_met(&state.ledger, &state.producers) {
                return Err(PurchaseError::Locked { name });
            }
            let cost = buy_modifier(&mut state.ledger, modifier, &mut state.producers)?;
            let effect = modifier.effect_text();
            state.add_log(&format!("✦ {} applied! {}", name, effect), true);
            Event::ModifierBought { name, cost }
        }
    };

    let unlocks = evaluate_milestones(&mut state.milestones, &mut state.ledger, &state.producers);
    for unlock in &unlocks {
        let text = match &unlock.reward {
            Some(reward) => format!("🏆 Achievement unlocked: {} ({})", unlock.name, reward.describe()),
            None => format!("🏆 Achievement unlocked: {}", unlock.name),
        };
        state.add_log(&text, true);
    }

    Ok(Report { event, unlocks })
}

/// Format a number with commas and at most one decimal (e.g. 1234567.25 → "1,234,567.3").
pub fn format_number(n: f64) -> String {
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }
    let mut whole = n.floor();
    let mut tenths = ((n - whole) * 10.0).round() as u64;
    if tenths == 10 {
        whole += 1.0;
        tenths = 0;
    }

    let digits = (whole as u64).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if tenths > 0 {
        format!("{}.{}", grouped, tenths)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn fresh() -> GameState {
        GameState::new(&Catalog::builtin().unwrap())
    }

    fn modifier_named(state: &GameState, name: &str) -> usize {
        state.modifiers.iter().position(|m| m.name == name).unwrap()
    }

    // ── click ─────────────────────────────────────────────

    #[test]
    fn click_adds_click_yield() {
        let mut ledger = Ledger::default();
        assert_eq!(apply_click(&mut ledger), 1.0);
        assert_eq!(ledger.resource_total, 1.0);
        assert_eq!(ledger.stats.lifetime_produced, 1.0);
        assert_eq!(ledger.stats.total_clicks, 1);
    }

    #[test]
    fn click_respects_multipliers() {
        let mut ledger = Ledger::default();
        ledger.click_power = 2.0;
        ledger.global_multiplier = 1.5;
        apply_click(&mut ledger);
        assert!((ledger.resource_total - 3.0).abs() < 1e-9);
    }

    #[test]
    fn first_click_unlocks_wake_and_bake() {
        let mut state = fresh();
        let report = dispatch(&mut state, Intent::Click).unwrap();
        assert_eq!(report.event, Event::Clicked { gained: 1.0 });
        assert_eq!(state.ledger.resource_total, 1.0);
        assert_eq!(state.ledger.stats.lifetime_produced, 1.0);
        assert_eq!(state.ledger.stats.total_clicks, 1);
        assert!(state.milestones[0].unlocked);
        assert_eq!(report.unlocks.len(), 1);
        assert_eq!(report.unlocks[0].name, "Wake and Bake");
        // Reward: all production x1.1
        assert!((state.ledger.global_multiplier - 1.1).abs() < 1e-9);
    }

    // ── production ───────────────────────────────────────

    fn two_producers() -> Vec<Producer> {
        let cursor = Producer::new("Cursor", "", 15.0, 0.1);
        let mut grandma = Producer::new("Grandma", "", 100.0, 1.0);
        grandma.owned = 1;
        vec![cursor, grandma]
    }

    #[test]
    fn aggregate_rate_sums_producers() {
        let producers = two_producers();
        assert_eq!(aggregate_rate(&producers, 1.0), 1.0);
        assert_eq!(aggregate_rate(&producers, 2.0), 2.0);
        assert_eq!(aggregate_rate(&[], 3.0), 0.0);
    }

    #[test]
    fn tick_adds_exactly_one_cookie() {
        let producers = two_producers();
        let mut ledger = Ledger::default();
        assert_eq!(tick(&mut ledger, &producers), 1.0);
        assert_eq!(ledger.resource_total, 1.0);
        assert_eq!(ledger.stats.lifetime_produced, 1.0);
        tick(&mut ledger, &producers);
        assert_eq!(ledger.resource_total, 2.0);
    }

    #[test]
    fn tick_without_producers_is_noop() {
        let mut state = fresh();
        let report = dispatch(&mut state, Intent::Tick).unwrap();
        assert_eq!(report.event, Event::Ticked { produced: 0.0 });
        assert_eq!(state.ledger.resource_total, 0.0);
        assert!(report.unlocks.is_empty());
    }

    #[test]
    fn tick_uses_modifier_multiplier_once() {
        let mut producers = two_producers();
        producers[1].owned = 5;
        producers[1].multiplier = 2.0;
        let mut ledger = Ledger::default();
        // 5 grandmas * 1.0 * 2.0, not squared
        assert_eq!(tick(&mut ledger, &producers), 10.0);
    }

    // ── producers ────────────────────────────────────────

    #[test]
    fn buy_producer_success() {
        let mut ledger = Ledger::default();
        ledger.resource_total = 100.0;
        let mut cursor = Producer::new("Cursor", "", 15.0, 0.1);
        assert_eq!(buy_producer(&mut ledger, &mut cursor), Ok(15.0));
        assert_eq!(cursor.owned, 1);
        assert_eq!(cursor.current_cost, 18.0);
        assert_eq!(ledger.resource_total, 85.0);
        assert_eq!(ledger.stats.producers_bought, 1);
    }

    #[test]
    fn buy_producer_insufficient_funds() {
        let mut ledger = Ledger::default();
        ledger.resource_total = 10.0;
        let mut cursor = Producer::new("Cursor", "", 15.0, 0.1);
        let err = buy_producer(&mut ledger, &mut cursor).unwrap_err();
        assert_eq!(
            err,
            PurchaseError::InsufficientResource {
                cost: 15.0,
                available: 10.0
            }
        );
        assert_eq!(cursor.owned, 0);
        assert_eq!(ledger.resource_total, 10.0);
        assert_eq!(ledger.stats.producers_bought, 0);
    }

    #[test]
    fn buy_producer_with_exact_funds_leaves_zero() {
        let mut ledger = Ledger::default();
        ledger.resource_total = 15.0;
        let mut cursor = Producer::new("Cursor", "", 15.0, 0.1);
        assert!(buy_producer(&mut ledger, &mut cursor).is_ok());
        assert_eq!(ledger.resource_total, 0.0);
    }

    // ── modifiers ────────────────────────────────────────

    #[test]
    fn click_modifier_doubles_click_power() {
        let mut state = fresh();
        state.ledger.resource_total = 100.0;
        let idx = modifier_named(&state, "Reinforced Index Finger");
        let GameState { ledger, modifiers, producers, .. } = &mut state;
        assert_eq!(buy_modifier(ledger, &mut modifiers[idx], producers), Ok(100.0));
        assert_eq!(ledger.click_power, 2.0);
        assert_eq!(ledger.resource_total, 0.0);
        assert!(modifiers[idx].purchased);
        assert_eq!(ledger.stats.modifiers_bought, 1);

        ledger.global_multiplier = 1.5;
        assert_eq!(apply_click(ledger), 3.0);
    }

    #[test]
    fn global_modifier_scales_global_multiplier() {
        let mut state = fresh();
        state.ledger.resource_total = 5000.0;
        let idx = modifier_named(&state, "Cookie Global Multiplier");
        let GameState { ledger, modifiers, producers, .. } = &mut state;
        buy_modifier(ledger, &mut modifiers[idx], producers).unwrap();
        assert_eq!(ledger.global_multiplier, 1.5);
        assert_eq!(ledger.click_power, 1.0);
    }

    #[test]
    fn producer_modifier_scales_only_its_target() {
        let mut state = fresh();
        state.ledger.resource_total = 500.0;
        state.producers[0].owned = 10;
        state.producers[1].owned = 5;
        let idx = modifier_named(&state, "Steel-plated Rolling Pins");
        let GameState { ledger, modifiers, producers, .. } = &mut state;
        buy_modifier(ledger, &mut modifiers[idx], producers).unwrap();
        assert_eq!(producers[1].multiplier, 2.0);
        assert_eq!(producers[1].cps(), 10.0);
        assert_eq!(producers[0].multiplier, 1.0);
    }

    #[test]
    fn already_purchased_reported_before_funds() {
        let mut state = fresh();
        state.modifiers[0].purchased = true;
        let GameState { ledger, modifiers, producers, .. } = &mut state;
        let err = buy_modifier(ledger, &mut modifiers[0], producers).unwrap_err();
        assert!(matches!(err, PurchaseError::AlreadyPurchased { .. }));
        assert_eq!(ledger.stats.modifiers_bought, 0);
    }

    #[test]
    fn modifier_insufficient_funds_changes_nothing() {
        let mut state = fresh();
        state.ledger.resource_total = 99.0;
        let before = state.ledger.clone();
        let GameState { ledger, modifiers, producers, .. } = &mut state;
        let err = buy_modifier(ledger, &mut modifiers[0], producers).unwrap_err();
        assert!(matches!(err, PurchaseError::InsufficientResource { .. }));
        assert_eq!(*ledger, before);
        assert!(!modifiers[0].purchased);
    }

    #[test]
    fn modifier_for_missing_producer_changes_nothing() {
        let mut ledger = Ledger::default();
        ledger.resource_total = 1000.0;
        let mut portal = Modifier {
            name: "Portal x2".into(),
            description: String::new(),
            cost: 10.0,
            effect_factor: 2.0,
            target: ModifierTarget::Producer("Portal".into()),
            eligibility: None,
            purchased: false,
        };
        let mut producers = two_producers();
        let err = buy_modifier(&mut ledger, &mut portal, &mut producers).unwrap_err();
        assert_eq!(err, PurchaseError::UnknownProducer { kind: "Portal".into() });
        assert_eq!(ledger.resource_total, 1000.0);
        assert!(!portal.purchased);
    }

    // ── eligibility ──────────────────────────────────────

    #[test]
    fn nothing_eligible_at_start() {
        let state = fresh();
        assert!(eligible_modifiers(&state.modifiers, &state.ledger, &state.producers).is_empty());
    }

    #[test]
    fn eligible_modifiers_keep_definition_order() {
        let mut state = fresh();
        state.ledger.resource_total = 5000.0;
        state.producers[1].owned = 5;
        let names: Vec<&str> = eligible_modifiers(&state.modifiers, &state.ledger, &state.producers)
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "Reinforced Index Finger",
                "Steel-plated Rolling Pins",
                "Cookie Global Multiplier"
            ]
        );
    }

    #[test]
    fn resource_floor_uses_current_cookies() {
        let mut state = fresh();
        state.ledger.stats.lifetime_produced = 1_000_000.0;
        state.ledger.resource_total = 99.0;
        assert!(eligible_modifiers(&state.modifiers, &state.ledger, &state.producers).is_empty());
    }

    #[test]
    fn purchased_modifier_no_longer_eligible() {
        let mut state = fresh();
        state.ledger.resource_total = 300.0;
        dispatch(&mut state, Intent::BuyModifier("Reinforced Index Finger".into())).unwrap();
        let eligible = eligible_modifiers(&state.modifiers, &state.ledger, &state.producers);
        assert!(eligible.iter().all(|m| m.name != "Reinforced Index Finger"));
    }

    // ── milestones ───────────────────────────────────────

    #[test]
    fn milestones_unlock_in_order_and_reward_once() {
        let mut state = fresh();
        state.ledger.stats.lifetime_produced = 1000.0;
        let GameState { milestones, ledger, producers, .. } = &mut state;
        let unlocks = evaluate_milestones(milestones, ledger, producers);
        let names: Vec<&str> = unlocks.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Wake and Bake", "Cookie Monster"]);
        assert!((ledger.global_multiplier - 1.1 * 1.2).abs() < 1e-9);

        let again = evaluate_milestones(milestones, ledger, producers);
        assert!(again.is_empty());
        assert!((ledger.global_multiplier - 1.1 * 1.2).abs() < 1e-9);
    }

    #[test]
    fn click_power_reward() {
        let mut state = fresh();
        state.ledger.stats.total_clicks = 100;
        let GameState { milestones, ledger, producers, .. } = &mut state;
        let unlocks = evaluate_milestones(milestones, ledger, producers);
        assert_eq!(unlocks[0].name, "Clicking Frenzy");
        assert_eq!(ledger.click_power, 1.5);
        assert_eq!(ledger.global_multiplier, 1.0);
    }

    #[test]
    fn milestone_without_reward_unlocks() {
        let mut state = fresh();
        state.ledger.resource_total = 1_000_000.0;
        for _ in 0..10 {
            dispatch(&mut state, Intent::BuyProducer(0)).unwrap();
        }
        let builder = state.milestones.iter().find(|m| m.name == "Builder").unwrap();
        assert!(builder.unlocked);
        assert_eq!(state.ledger.click_power, 1.0);
    }

    #[test]
    fn unlocked_milestone_survives_spending() {
        let mut state = fresh();
        state.ledger.resource_total = 10_000.0;
        dispatch(&mut state, Intent::Tick).unwrap();
        let hoarder = state.milestones.iter().position(|m| m.name == "Hoarder").unwrap();
        assert!(state.milestones[hoarder].unlocked);
        dispatch(&mut state, Intent::BuyProducer(4)).unwrap(); // Factory, 10,000
        assert!(state.ledger.resource_total < 10_000.0);
        assert!(state.milestones[hoarder].unlocked);
    }

    // ── dispatch ─────────────────────────────────────────

    #[test]
    fn dispatch_buy_producer_logs_and_reports() {
        let mut state = fresh();
        state.ledger.resource_total = 100.0;
        let report = dispatch(&mut state, Intent::BuyProducer(0)).unwrap();
        assert_eq!(
            report.event,
            Event::ProducerBought {
                kind: "Cursor".into(),
                cost: 15.0,
                owned: 1
            }
        );
        assert_eq!(state.log.last().unwrap().text, "Bought a Cursor! (1 owned)");
    }

    #[test]
    fn dispatch_rejects_unknown_targets() {
        let mut state = fresh();
        state.ledger.resource_total = 1e9;
        assert!(matches!(
            dispatch(&mut state, Intent::BuyProducer(99)),
            Err(PurchaseError::UnknownProducer { .. })
        ));
        assert!(matches!(
            dispatch(&mut state, Intent::BuyModifier("Nope".into())),
            Err(PurchaseError::UnknownModifier { .. })
        ));
    }

    #[test]
    fn dispatch_rejects_locked_modifier() {
        let mut state = fresh();
        state.ledger.resource_total = 1000.0;
        let err = dispatch(&mut state, Intent::BuyModifier("Steel-plated Rolling Pins".into())).unwrap_err();
        assert_eq!(
            err,
            PurchaseError::Locked {
                name: "Steel-plated Rolling Pins".into()
            }
        );
        state.producers[1].owned = 5;
        assert!(dispatch(&mut state, Intent::BuyModifier("Steel-plated Rolling Pins".into())).is_ok());
    }

    #[test]
    fn dispatch_repeat_modifier_is_already_purchased() {
        let mut state = fresh();
        state.ledger.resource_total = 500.0;
        let name = "Reinforced Index Finger".to_string();
        dispatch(&mut state, Intent::BuyModifier(name.clone())).unwrap();
        assert!(matches!(
            dispatch(&mut state, Intent::BuyModifier(name)),
            Err(PurchaseError::AlreadyPurchased { .. })
        ));
    }

    #[test]
    fn failed_dispatch_leaves_state_untouched() {
        let mut state = fresh();
        state.ledger.resource_total = 5.0;
        let ledger = state.ledger.clone();
        let log_len = state.log.len();
        assert!(dispatch(&mut state, Intent::BuyProducer(0)).is_err());
        assert_eq!(state.ledger, ledger);
        assert_eq!(state.log.len(), log_len);
        assert!(state.milestones.iter().all(|m| !m.unlocked));
    }

    #[test]
    fn modifier_purchase_unlocks_enhancer() {
        let mut state = fresh();
        state.ledger.resource_total = 100.0;
        let report = dispatch(&mut state, Intent::BuyModifier("Reinforced Index Finger".into())).unwrap();
        assert!(report.unlocks.iter().any(|u| u.name == "Enhancer"));
        assert!(state.log.iter().any(|e| e.text.contains("Reinforced Index Finger applied")));
    }

    // ── format_number ────────────────────────────────────

    #[test]
    fn format_number_basic() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1000.0), "1,000");
        assert_eq!(format_number(1234567.0), "1,234,567");
    }

    #[test]
    fn format_number_with_fraction() {
        assert_eq!(format_number(0.1), "0.1");
        assert_eq!(format_number(1234.5), "1,234.5");
        assert_eq!(format_number(9.97), "10");
        assert_eq!(format_number(-1500.0), "-1,500");
    }
}
