use super::PowerVsClient;
use crate::config::PowerVsDefaults;
use crate::models::upstream::SnapshotCollection;
use crate::models::{SnapshotList, SnapshotSummary};
use crate::Result;

impl PowerVsClient {
    /// Snapshots taken of one VM.
    pub async fn vm_snapshots(&self, vm_id: &str) -> Result<SnapshotList> {
        let target = self.target_for_vm(vm_id).await?;
        let url = target.vm_url(vm_id, "/snapshots");
        let collection: SnapshotCollection = self
            .get_in(&target, &url, PowerVsDefaults::REQUEST_TIMEOUT)
            .await?;

        let snapshots: Vec<SnapshotSummary> = collection
            .snapshots
            .unwrap_or_default()
            .into_iter()
            .map(SnapshotSummary::from)
            .collect();
        Ok(SnapshotList {
            vm_id: vm_id.to_string(),
            total_snapshots: snapshots.len(),
            snapshots,
        })
    }
}
