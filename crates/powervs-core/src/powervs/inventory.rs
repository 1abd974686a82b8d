//! VM and workspace inventory.

use super::{PowerVsClient, WorkspaceTarget, WORKSPACES_KEY};
use crate::config::PowerVsDefaults;
use crate::models::upstream::{PvmInstance, PvmInstanceList, WorkspaceList};
use crate::models::{
    FilteredVms, FleetReport, HealthSummary, StatusSummary, VmList, VmSummary, Workspace,
};
use crate::{PowerVsError, Result};
use tracing::{debug, info, warn};

impl PowerVsClient {
    /// List VMs: the configured workspace only, or every workspace of the account.
    pub async fn list_vms(&self) -> Result<VmList> {
        match self.configured_target() {
            Some(target) => Ok(VmList::Workspace(self.workspace_vms(&target).await?)),
            None => Ok(VmList::Fleet(self.fleet_scan().await?)),
        }
    }

    /// VMs of a single workspace.
    pub async fn workspace_vms(&self, target: &WorkspaceTarget) -> Result<Vec<VmSummary>> {
        let url = target.instance_url("/pvm-instances");
        let list: PvmInstanceList = self
            .get_in(target, &url, PowerVsDefaults::REQUEST_TIMEOUT)
            .await?;

        let instances = list.pvm_instances.ok_or_else(|| PowerVsError::Json {
            message: format!("Response from {} has no pvmInstances", url),
            source: None,
        })?;

        Ok(instances.iter().map(VmSummary::from_instance).collect())
    }

    /// List VMs across all workspaces, rebuilding the VM → workspace index.
    ///
    /// Workspaces that fail to answer are skipped; the report only covers the
    /// ones that did.
    pub async fn fleet_scan(&self) -> Result<FleetReport> {
        let workspaces = self.list_workspaces().await?;
        if workspaces.is_empty() {
            return Err(PowerVsError::NoWorkspaces);
        }

        // Surface bad credentials once instead of as a skip per workspace.
        self.auth.token().await?;

        self.vm_index.invalidate_all();
        let mut vms = Vec::new();
        let mut health_summary = HealthSummary::default();
        let mut status_summary = StatusSummary::default();

        for workspace in &workspaces {
            let Some(target) = self.target_for_workspace(workspace) else {
                continue;
            };
            let name = workspace.name.as_deref().unwrap_or(&target.id);

            let url = target.instance_url("/pvm-instances");
            let list: PvmInstanceList = match self
                .get_in(&target, &url, PowerVsDefaults::LONG_REQUEST_TIMEOUT)
                .await
            {
                Ok(list) => list,
                Err(e) => {
                    warn!("Skipping workspace {}: {}", name, e);
                    continue;
                }
            };

            let Some(instances) = list.pvm_instances else {
                warn!("Skipping workspace {}: no pvmInstances in response", name);
                continue;
            };
            debug!("Workspace {}: {} VMs", name, instances.len());

            for pvm in &instances {
                let vm = VmSummary::from_instance(pvm).in_workspace(workspace);
                if let Some(vm_id) = vm.vm_id.as_deref() {
                    self.remember_vm(vm_id, &target, workspace);
                }
                health_summary.record(&vm.health_status());
                status_summary.record(&vm.power_status());
                vms.push(vm);
            }
        }

        info!(
            "Fleet scan: {} VMs across {} workspaces",
            vms.len(),
            workspaces.len()
        );

        Ok(FleetReport {
            total_vms: vms.len(),
            total_workspaces: workspaces.len(),
            health_summary,
            status_summary,
            vms,
        })
    }

    /// VMs whose health status matches `health_status`, ignoring case.
    pub async fn vms_by_health(&self, health_status: &str) -> Result<FilteredVms> {
        let all_vms = match self.configured_target() {
            Some(target) => self.workspace_vms(&target).await?,
            None => self.fleet_scan().await?.vms,
        };
        Ok(filter_by_health(all_vms, health_status))
    }

    /// VMs in `CRITICAL` health.
    pub async fn critical_vms(&self) -> Result<FilteredVms> {
        self.vms_by_health("CRITICAL").await
    }

    /// All workspaces of the account, cached.
    ///
    /// If the refresh fails, the last successful listing is returned even
    /// when it has expired.
    pub async fn list_workspaces(&self) -> Result<Vec<Workspace>> {
        if let Some(cached) = self.workspace_cache.get(&WORKSPACES_KEY) {
            return Ok(cached);
        }

        match self.fetch_workspaces().await {
            Ok(workspaces) => {
                self.workspace_cache.insert(WORKSPACES_KEY, workspaces.clone());
                *self.last_workspaces.write().await = Some(workspaces.clone());
                Ok(workspaces)
            }
            Err(e) => {
                if let Some(stale) = self.last_workspaces.read().await.clone() {
                    warn!("Failed to refresh workspaces ({}), using previous listing", e);
                    return Ok(stale);
                }
                Err(e)
            }
        }
    }

    async fn fetch_workspaces(&self) -> Result<Vec<Workspace>> {
        let base_url = self.require_base_url("list workspaces")?;
        let url = format!("{}/v1/workspaces", base_url);
        let list: WorkspaceList = self
            .get(&url, None, PowerVsDefaults::REQUEST_TIMEOUT)
            .await?;

        let workspaces: Vec<Workspace> = list
            .workspaces
            .unwrap_or_default()
            .into_iter()
            .map(|raw| Workspace::from_raw(raw, base_url))
            .collect();
        info!("Fetched {} workspaces", workspaces.len());
        Ok(workspaces)
    }

    /// Raw detail of one VM.
    pub(crate) async fn vm_detail(
        &self,
        target: &WorkspaceTarget,
        vm_id: &str,
    ) -> Result<PvmInstance> {
        let url = target.vm_url(vm_id, "");
        self.get_in(target, &url, PowerVsDefaults::LONG_REQUEST_TIMEOUT)
            .await
    }
}

/// Keep VMs whose health status equals `health_status`, ignoring case.
pub fn filter_by_health(vms: Vec<VmSummary>, health_status: &str) -> FilteredVms {
    let wanted = health_status.trim().to_uppercase();
    let vms: Vec<VmSummary> = vms
        .into_iter()
        .filter(|vm| vm.health_status() == wanted)
        .collect();
    FilteredVms {
        total_vms: vms.len(),
        vms,
    }
}
