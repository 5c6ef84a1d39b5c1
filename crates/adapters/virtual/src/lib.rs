//! Virtual home — an in-memory hub backed by a JSON snapshot.
//!
//! [`VirtualHome`] implements every hub port, so the services can run
//! without a real platform. Commands change device state immediately and
//! the whole home can be written back to disk afterwards.

mod error;
mod state;

pub use error::VirtualError;
pub use state::HomeState;

use std::future::Future;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use zonehub_app::ports::{
    DeviceControl, DeviceRepository, FlowRepository, KeyValueStore, SystemInfoProvider,
    TagWriter, UserRepository, ZoneRepository,
};
use zonehub_domain::command::Command;
use zonehub_domain::device::{Capability, CapabilityValue, Device};
use zonehub_domain::error::{NotFoundError, ZoneHubError};
use zonehub_domain::flow::{Flow, FlowKind};
use zonehub_domain::id::{DeviceId, FlowId};
use zonehub_domain::system::SystemInfo;
use zonehub_domain::time::now;
use zonehub_domain::user::User;
use zonehub_domain::zone::Zone;

/// Shared handle on a virtual home; clones see the same state.
#[derive(Clone, Default)]
pub struct VirtualHome {
    state: Arc<Mutex<HomeState>>,
}

impl VirtualHome {
    #[must_use]
    pub fn new(state: HomeState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Parse a home from its JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualError::Json`] when the snapshot is malformed.
    pub fn from_json(json: &str) -> Result<Self, VirtualError> {
        let state: HomeState = serde_json::from_str(json)?;
        tracing::debug!(
            zones = state.zones.len(),
            devices = state.devices.len(),
            "loaded virtual home"
        );
        Ok(Self::new(state))
    }

    /// Read a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an io or json error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VirtualError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize the current state as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, VirtualError> {
        Ok(serde_json::to_string_pretty(&*self.lock())?)
    }

    /// Write the current state to `path`.
    ///
    /// # Errors
    ///
    /// Returns an io or json error.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), VirtualError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> HomeState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, HomeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DeviceRepository for VirtualHome {
    fn get_all_devices(&self) -> impl Future<Output = Result<Vec<Device>, ZoneHubError>> + Send {
        let devices = self.lock().devices.clone();
        async { Ok(devices) }
    }
}

impl ZoneRepository for VirtualHome {
    fn get_all_zones(&self) -> impl Future<Output = Result<Vec<Zone>, ZoneHubError>> + Send {
        let zones = self.lock().zones.clone();
        async { Ok(zones) }
    }
}

impl UserRepository for VirtualHome {
    fn get_all_users(&self) -> impl Future<Output = Result<Vec<User>, ZoneHubError>> + Send {
        let users = self.lock().users.clone();
        async { Ok(users) }
    }
}

impl FlowRepository for VirtualHome {
    fn get_all_flows(&self) -> impl Future<Output = Result<Vec<Flow>, ZoneHubError>> + Send {
        let flows = self.lock().flows.clone();
        async { Ok(flows) }
    }

    fn set_flow_enabled(
        &self,
        id: &FlowId,
        kind: FlowKind,
        enabled: bool,
    ) -> impl Future<Output = Result<(), ZoneHubError>> + Send {
        let mut state = self.lock();
        let result = match state
            .flows
            .iter_mut()
            .find(|flow| &flow.id == id && flow.kind == kind)
        {
            Some(flow) => {
                flow.enabled = enabled;
                tracing::debug!(flow = %flow.name, enabled, "flow updated");
                Ok(())
            }
            None => Err(NotFoundError {
                entity: "Flow",
                id: id.to_string(),
            }
            .into()),
        };
        drop(state);
        async { result }
    }
}

impl SystemInfoProvider for VirtualHome {
    fn system_info(&self) -> impl Future<Output = Result<SystemInfo, ZoneHubError>> + Send {
        let info = self.lock().system.clone();
        async { Ok(info) }
    }
}

impl DeviceControl for VirtualHome {
    fn set_capability_value(
        &self,
        device_id: &DeviceId,
        capability: &Capability,
        value: CapabilityValue,
    ) -> impl Future<Output = Result<(), ZoneHubError>> + Send {
        let result = self
            .lock()
            .write_value(device_id, capability, value, now())
            .map_err(ZoneHubError::from);
        async { result }
    }

    fn run_action(
        &self,
        device_id: &DeviceId,
        command: &Command,
    ) -> impl Future<Output = Result<(), ZoneHubError>> + Send {
        tracing::trace!(action = %command.action_id(device_id.as_str()), "running action");
        let result = self
            .lock()
            .apply(device_id, command, now())
            .map_err(ZoneHubError::from);
        async { result }
    }
}

impl TagWriter for VirtualHome {
    fn write_tag(
        &self,
        name: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), ZoneHubError>> + Send {
        self.lock().tags.insert(name.to_string(), value.to_string());
        async { Ok(()) }
    }
}

impl KeyValueStore for VirtualHome {
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<serde_json::Value>, ZoneHubError>> + Send {
        let value = self.lock().store.get(key).cloned();
        async { Ok(value) }
    }

    fn set(
        &self,
        key: &str,
        value: serde_json::Value,
    ) -> impl Future<Output = Result<(), ZoneHubError>> + Send {
        self.lock().store.insert(key.to_string(), value);
        async { Ok(()) }
    }
}
