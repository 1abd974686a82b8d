//! Network, storage and combined VM health.
//!
//! Health is derived from upstream state only: an interface is up when the
//! API says `ACTIVE`, a volume is healthy when its state is one of
//! [`HEALTHY_VOLUME_STATES`].

use super::{PowerVsClient, WorkspaceTarget};
use crate::config::PowerVsDefaults;
use crate::models::upstream::{
    NetworkInterface, NetworkInterfaceList, PvmInstance, Volume, VolumeList,
};
use crate::models::{
    HealthStatus, NetworkHealthReport, StatusBlock, StorageHealthReport, UnhealthyVolume,
    VmHealthReport,
};
use crate::network::path_segment;
use crate::Result;
use tracing::debug;

/// Volume states that do not indicate a problem.
pub const HEALTHY_VOLUME_STATES: [&str; 5] =
    ["in-use", "available", "creating", "attaching", "detaching"];

const ACTIVE_INTERFACE: &str = "ACTIVE";

impl PowerVsClient {
    /// Health of the network interfaces attached to `vm_id`.
    pub async fn network_health(&self, vm_id: &str) -> Result<NetworkHealthReport> {
        let target = self.target_for_vm(vm_id).await?;
        let vm = self.vm_detail(&target, vm_id).await?;
        self.network_health_for(&target, vm_id, &vm).await
    }

    async fn network_health_for(
        &self,
        target: &WorkspaceTarget,
        vm_id: &str,
        vm: &PvmInstance,
    ) -> Result<NetworkHealthReport> {
        let mut interfaces = Vec::new();
        for network_id in vm
            .networks
            .iter()
            .flatten()
            .filter_map(|n| n.network_id.as_deref())
        {
            let url = format!(
                "{}/v1/networks/{}/network-interfaces",
                target.url,
                path_segment(network_id)
            );
            let list: NetworkInterfaceList = self
                .get_in(target, &url, PowerVsDefaults::REQUEST_TIMEOUT)
                .await?;
            interfaces.extend(list.network_interfaces.unwrap_or_default());
        }

        let down = summarize_interfaces(vm_id, &interfaces);
        debug!("VM {}: {} interfaces down", vm_id, down.len());
        Ok(NetworkHealthReport {
            network_health: StatusBlock {
                status: HealthStatus::from_problem_count(down.len()),
            },
            interfaces_down: down,
        })
    }

    /// Health of the volumes attached to `vm_id`.
    pub async fn storage_health(&self, vm_id: &str) -> Result<StorageHealthReport> {
        let target = self.target_for_vm(vm_id).await?;
        self.storage_health_for(&target, vm_id).await
    }

    async fn storage_health_for(
        &self,
        target: &WorkspaceTarget,
        vm_id: &str,
    ) -> Result<StorageHealthReport> {
        let url = target.vm_url(vm_id, "/volumes");
        let list: VolumeList = self
            .get_in(target, &url, PowerVsDefaults::REQUEST_TIMEOUT)
            .await?;

        let unhealthy = summarize_volumes(&list.volumes.unwrap_or_default());
        Ok(StorageHealthReport {
            storage_health: StatusBlock {
                status: HealthStatus::from_problem_count(unhealthy.len()),
            },
            unhealthy_volumes: unhealthy,
        })
    }

    /// Combined VM, network and storage health.
    pub async fn vm_health(&self, vm_id: &str) -> Result<VmHealthReport> {
        let target = self.target_for_vm(vm_id).await?;
        let vm = self.vm_detail(&target, vm_id).await?;

        let network = self.network_health_for(&target, vm_id, &vm).await?;
        let storage = self.storage_health_for(&target, vm_id).await?;

        let network_status = network.network_health.status;
        let storage_status = storage.storage_health.status;
        let overall_health = if network_status.is_critical() || storage_status.is_critical() {
            HealthStatus::Critical
        } else {
            HealthStatus::Ok
        };

        Ok(VmHealthReport {
            vm_name: vm.server_name,
            vm_id: vm_id.to_string(),
            overall_health,
            vm_status: vm.status,
            network_health: network_status,
            storage_health: storage_status,
            network_issues: network.interfaces_down,
            storage_issues: storage.unhealthy_volumes,
        })
    }
}

/// IP addresses of `vm_id`'s interfaces that are not `ACTIVE`.
///
/// Interfaces belonging to other VMs on the same network are ignored.
pub fn summarize_interfaces(vm_id: &str, interfaces: &[NetworkInterface]) -> Vec<Option<String>> {
    interfaces
        .iter()
        .filter(|iface| {
            iface
                .pvm_instance
                .as_ref()
                .and_then(|p| p.pvm_instance_id.as_deref())
                == Some(vm_id)
        })
        .filter(|iface| iface.status.as_deref() != Some(ACTIVE_INTERFACE))
        .map(|iface| iface.ip_address.clone())
        .collect()
}

/// Volumes whose state is not in [`HEALTHY_VOLUME_STATES`].
pub fn summarize_volumes(volumes: &[Volume]) -> Vec<UnhealthyVolume> {
    volumes
        .iter()
        .filter(|v| !HEALTHY_VOLUME_STATES.contains(&v.state.as_deref().unwrap_or("")))
        .map(UnhealthyVolume::from_volume)
        .collect()
}
