//! Flow service — disables every regular and advanced flow.

use zonehub_domain::error::ZoneHubError;

use crate::ports::FlowRepository;

pub struct FlowService<'a, R> {
    repo: &'a R,
}

impl<'a, R: FlowRepository + Sync> FlowService<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Disable all flows, one at a time. Returns how many were updated.
    ///
    /// # Errors
    ///
    /// Stops at the first repository failure; flows already updated stay
    /// disabled.
    #[tracing::instrument(skip(self))]
    pub async fn disable_all(&self) -> Result<usize, ZoneHubError> {
        let flows = self.repo.get_all_flows().await?;
        for flow in &flows {
            self.repo.set_flow_enabled(&flow.id, flow.kind, false).await?;
            tracing::debug!(flow = %flow.name, kind = ?flow.kind, "disabled flow");
        }
        tracing::info!(count = flows.len(), "disabled flows");
        Ok(flows.len())
    }
}
