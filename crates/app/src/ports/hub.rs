//! Hub read ports — snapshots of what the platform knows.
//!
//! Every invocation reads zones and devices fresh; results keep the
//! platform's discovery order.

use std::future::Future;

use zonehub_domain::device::Device;
use zonehub_domain::error::ZoneHubError;
use zonehub_domain::flow::{Flow, FlowKind};
use zonehub_domain::id::FlowId;
use zonehub_domain::system::SystemInfo;
use zonehub_domain::user::User;
use zonehub_domain::zone::Zone;

/// Read access to the hub's devices.
pub trait DeviceRepository {
    /// All devices, including their current capability values.
    fn get_all_devices(&self) -> impl Future<Output = Result<Vec<Device>, ZoneHubError>> + Send;
}

/// Read access to the hub's zones.
pub trait ZoneRepository {
    fn get_all_zones(&self) -> impl Future<Output = Result<Vec<Zone>, ZoneHubError>> + Send;
}

/// Read access to the hub's users.
pub trait UserRepository {
    fn get_all_users(&self) -> impl Future<Output = Result<Vec<User>, ZoneHubError>> + Send;
}

/// Regular and advanced flows.
pub trait FlowRepository {
    /// Flows of both kinds.
    fn get_all_flows(&self) -> impl Future<Output = Result<Vec<Flow>, ZoneHubError>> + Send;

    /// Enable or disable one flow.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneHubError::NotFound`] when no flow of `kind` has `id`.
    fn set_flow_enabled(
        &self,
        id: &FlowId,
        kind: FlowKind,
        enabled: bool,
    ) -> impl Future<Output = Result<(), ZoneHubError>> + Send;
}

/// Hub-wide system information.
pub trait SystemInfoProvider {
    fn system_info(&self) -> impl Future<Output = Result<SystemInfo, ZoneHubError>> + Send;
}
