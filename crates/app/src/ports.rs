//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the hub platform.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod control;
pub mod hub;
pub mod key_value;
pub mod tags;

pub use control::DeviceControl;
pub use hub::{DeviceRepository, FlowRepository, SystemInfoProvider, UserRepository, ZoneRepository};
pub use key_value::KeyValueStore;
pub use tags::TagWriter;
