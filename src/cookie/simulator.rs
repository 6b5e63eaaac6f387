//! Balance simulator: plays a greedy best-payback strategy against the built-in catalog.
//! Run with: cargo test simulate_greedy -- --nocapture
