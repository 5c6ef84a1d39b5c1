//! # zonehub-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that hub adapters must implement:
//!   - `DeviceRepository`, `ZoneRepository`, `UserRepository`, `FlowRepository`
//!   - `DeviceControl` — capability writes and transition-aware actions
//!   - `TagWriter` — named outputs read by downstream automations
//!   - `KeyValueStore` — state that outlives one invocation
//!   - `SystemInfoProvider` — locale and time zone
//! - Provide the shared **targeting** pipeline (zones → filter) and the
//!   **command dispatcher** with its lenient/strict policy
//! - Persist per-device cooldowns through the key-value port
//! - Implement one service per hub script (dim, colour, status checks, …)
//!
//! ## Dependency rule
//! Depends on `zonehub-domain` only (plus `tokio::time` for delays).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod cooldown;
pub mod dispatcher;
pub mod ports;
pub mod services;
pub mod targeting;

#[cfg(test)]
pub(crate) mod testing;
