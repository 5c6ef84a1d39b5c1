//! In-memory fakes of every port, shared by the service tests.

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Mutex;

use zonehub_domain::command::Command;
use zonehub_domain::device::{Capability, CapabilityValue, Device};
use zonehub_domain::error::{DeviceCommandError, NotFoundError, ZoneHubError};
use zonehub_domain::flow::{Flow, FlowKind};
use zonehub_domain::id::{DeviceId, FlowId};
use zonehub_domain::system::SystemInfo;
use zonehub_domain::user::User;
use zonehub_domain::zone::Zone;

use crate::ports::{
    DeviceControl, DeviceRepository, FlowRepository, KeyValueStore, SystemInfoProvider,
    TagWriter, UserRepository, ZoneRepository,
};

/// A call received by [`FakeHub`] through [`DeviceControl`].
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Value {
        device_id: DeviceId,
        capability: Capability,
        value: CapabilityValue,
    },
    Action {
        device_id: DeviceId,
        command: Command,
    },
}

impl Sent {
    pub fn device_id(&self) -> &DeviceId {
        match self {
            Self::Value { device_id, .. } | Self::Action { device_id, .. } => device_id,
        }
    }
}

#[derive(Default)]
pub struct FakeHub {
    pub zones: Vec<Zone>,
    pub devices: Vec<Device>,
    pub users: Vec<User>,
    pub flows: Mutex<Vec<Flow>>,
    pub system: SystemInfo,
    pub failing: HashSet<DeviceId>,
    pub sent: Mutex<Vec<Sent>>,
    pub tags: Mutex<HashMap<String, String>>,
    pub store: Mutex<HashMap<String, serde_json::Value>>,
}

impl FakeHub {
    pub fn new(zones: Vec<Zone>, devices: Vec<Device>) -> Self {
        Self {
            zones,
            devices,
            ..Self::default()
        }
    }

    pub fn failing(mut self, device_id: &str) -> Self {
        self.failing.insert(DeviceId::from(device_id));
        self
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn tag(&self, name: &str) -> Option<String> {
        self.tags.lock().unwrap().get(name).cloned()
    }

    fn record(&self, sent: Sent) -> Result<(), ZoneHubError> {
        if self.failing.contains(sent.device_id()) {
            return Err(DeviceCommandError::new(sent.device_id().clone(), "device unreachable").into());
        }
        self.sent.lock().unwrap().push(sent);
        Ok(())
    }
}

impl DeviceRepository for FakeHub {
    fn get_all_devices(&self) -> impl Future<Output = Result<Vec<Device>, ZoneHubError>> + Send {
        let devices = self.devices.clone();
        async { Ok(devices) }
    }
}

impl ZoneRepository for FakeHub {
    fn get_all_zones(&self) -> impl Future<Output = Result<Vec<Zone>, ZoneHubError>> + Send {
        let zones = self.zones.clone();
        async { Ok(zones) }
    }
}

impl UserRepository for FakeHub {
    fn get_all_users(&self) -> impl Future<Output = Result<Vec<User>, ZoneHubError>> + Send {
        let users = self.users.clone();
        async { Ok(users) }
    }
}

impl FlowRepository for FakeHub {
    fn get_all_flows(&self) -> impl Future<Output = Result<Vec<Flow>, ZoneHubError>> + Send {
        let flows = self.flows.lock().unwrap().clone();
        async { Ok(flows) }
    }

    fn set_flow_enabled(
        &self,
        id: &FlowId,
        kind: FlowKind,
        enabled: bool,
    ) -> impl Future<Output = Result<(), ZoneHubError>> + Send {
        let mut flows = self.flows.lock().unwrap();
        let result = match flows.iter_mut().find(|f| &f.id == id && f.kind == kind) {
            Some(flow) => {
                flow.enabled = enabled;
                Ok(())
            }
            None => Err(NotFoundError {
                entity: "Flow",
                id: id.to_string(),
            }
            .into()),
        };
        async { result }
    }
}

impl SystemInfoProvider for FakeHub {
    fn system_info(&self) -> impl Future<Output = Result<SystemInfo, ZoneHubError>> + Send {
        let info = self.system.clone();
        async { Ok(info) }
    }
}

impl DeviceControl for FakeHub {
    fn set_capability_value(
        &self,
        device_id: &DeviceId,
        capability: &Capability,
        value: CapabilityValue,
    ) -> impl Future<Output = Result<(), ZoneHubError>> + Send {
        let result = self.record(Sent::Value {
            device_id: device_id.clone(),
            capability: capability.clone(),
            value,
        });
        async { result }
    }

    fn run_action(
        &self,
        device_id: &DeviceId,
        command: &Command,
    ) -> impl Future<Output = Result<(), ZoneHubError>> + Send {
        let result = self.record(Sent::Action {
            device_id: device_id.clone(),
            command: command.clone(),
        });
        async { result }
    }
}

impl TagWriter for FakeHub {
    fn write_tag(
        &self,
        name: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), ZoneHubError>> + Send {
        self.tags
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        async { Ok(()) }
    }
}

impl KeyValueStore for FakeHub {
    fn get(
        &self,
        key: &str,
    ) -> impl Future<Output = Result<Option<serde_json::Value>, ZoneHubError>> + Send {
        let value = self.store.lock().unwrap().get(key).cloned();
        async { Ok(value) }
    }

    fn set(
        &self,
        key: &str,
        value: serde_json::Value,
    ) -> impl Future<Output = Result<(), ZoneHubError>> + Send {
        self.store.lock().unwrap().insert(key.to_string(), value);
        async { Ok(()) }
    }
}
