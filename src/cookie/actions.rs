//! Semantic action IDs for Cookie Clicker click targets.
//!
//! Registered during render and dispatched back via `InputEvent::Click`.

// ── Core actions ────────────────────────────────────────────────
pub const CLICK_COOKIE: u16 = 0;

// ── Tab navigation ──────────────────────────────────────────────
pub const TAB_PRODUCERS: u16 = 10;
pub const TAB_UPGRADES: u16 = 11;
pub const TAB_MILESTONES: u16 = 12;
pub const TAB_STATS: u16 = 13;

// ── Producer purchase (base + producer index) ───────────────────
pub const BUY_PRODUCER_BASE: u16 = 100;

// ── Upgrade purchase (base + index among eligible upgrades) ─────
pub const BUY_MODIFIER_BASE: u16 = 200;

// ── Session ─────────────────────────────────────────────────────
pub const RESTART: u16 = 900;
