//! # zonehub-domain
//!
//! Pure domain model for the zonehub automation toolkit.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Zones** and the zone hierarchy (tree traversal, name resolution)
//! - Define **Devices** with their capabilities and current capability values
//! - Select devices for a command (**device filter**)
//! - Turn script arguments into target values (**level** resolution, colours)
//! - Define **Commands** sent to a single device
//! - Fallback aggregation and cooldown bookkeeping
//! - Users, flows, reporting policy and zone activity origins
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod argument;
pub mod color;
pub mod command;
pub mod cooldown;
pub mod device;
pub mod fallback;
pub mod filter;
pub mod flow;
pub mod level;
pub mod reporting;
pub mod system;
pub mod user;
pub mod zone;
