//! Result shapes returned to tool callers.
//!
//! Field names are part of the tool contract agents rely on, hence the
//! explicit renames.

use super::upstream::{
    PvmInstance, RawImage, RawNetwork, RawSnapshot, RawWorkspace, Volume,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Health status a VM reports when the API gives none.
pub const UNKNOWN_HEALTH: &str = "UNKNOWN";

/// Roll-up status of a health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Ok,
    Critical,
}

impl HealthStatus {
    /// `Ok` when there are no problems, `Critical` otherwise.
    pub fn from_problem_count(problems: usize) -> Self {
        if problems == 0 {
            HealthStatus::Ok
        } else {
            HealthStatus::Critical
        }
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, HealthStatus::Critical)
    }
}

/// A PowerVS workspace (cloud instance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: Option<String>,
    pub name: Option<String>,
    pub region: Option<String>,
    pub url: String,
}

impl Workspace {
    /// Reshape an API workspace, falling back to `base_url` when it has no location URL.
    pub fn from_raw(raw: RawWorkspace, base_url: &str) -> Self {
        let location = raw.location.unwrap_or_default();
        Self {
            id: raw.id,
            name: raw.name,
            region: location.region,
            url: location
                .url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| base_url.to_string()),
        }
    }
}

/// One VM as listed by the inventory tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VmSummary {
    #[serde(rename = "vmName")]
    pub vm_name: Option<String>,
    #[serde(rename = "vmID")]
    pub vm_id: Option<String>,
    #[serde(rename = "operatingSystem")]
    pub operating_system: Option<String>,
    #[serde(rename = "systemType")]
    pub system_type: Option<String>,
    #[serde(rename = "vmStatus")]
    pub vm_status: Option<String>,
    /// Upstream health object, passed through untouched.
    pub health: Value,
    pub crn: String,
    #[serde(rename = "workspaceName", skip_serializing_if = "Option::is_none")]
    pub workspace_name: Option<String>,
    #[serde(rename = "workspaceRegion", skip_serializing_if = "Option::is_none")]
    pub workspace_region: Option<String>,
}

impl VmSummary {
    pub fn from_instance(pvm: &PvmInstance) -> Self {
        Self {
            vm_name: pvm.server_name.clone(),
            vm_id: pvm.pvm_instance_id.clone(),
            operating_system: pvm.os_type.clone(),
            system_type: pvm.sys_type.clone(),
            vm_status: pvm.status.clone(),
            health: pvm
                .health
                .clone()
                .unwrap_or_else(|| json!({ "status": UNKNOWN_HEALTH })),
            crn: pvm.crn.clone().unwrap_or_default(),
            workspace_name: None,
            workspace_region: None,
        }
    }

    /// Tag the VM with the workspace it was found in.
    pub fn in_workspace(mut self, workspace: &Workspace) -> Self {
        self.workspace_name = workspace.name.clone();
        self.workspace_region = workspace.region.clone();
        self
    }

    /// Upper-cased `health.status`, `UNKNOWN` when missing or malformed.
    pub fn health_status(&self) -> String {
        self.health
            .get("status")
            .and_then(|s| s.as_str())
            .unwrap_or(UNKNOWN_HEALTH)
            .to_uppercase()
    }

    /// Upper-cased VM power status, `UNKNOWN` when missing.
    pub fn power_status(&self) -> String {
        self.vm_status
            .as_deref()
            .unwrap_or(UNKNOWN_HEALTH)
            .to_uppercase()
    }
}

/// Counts of VMs per health status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSummary {
    #[serde(rename = "OK")]
    pub ok: u32,
    #[serde(rename = "CRITICAL")]
    pub critical: u32,
    #[serde(rename = "WARNING")]
    pub warning: u32,
    #[serde(rename = "ATTENTION")]
    pub attention: u32,
}

impl HealthSummary {
    /// Count an upper-cased status; unknown values are ignored.
    pub fn record(&mut self, status: &str) {
        match status {
            "OK" => self.ok += 1,
            "CRITICAL" => self.critical += 1,
            "WARNING" => self.warning += 1,
            "ATTENTION" => self.attention += 1,
            _ => {}
        }
    }
}

/// Counts of VMs per power status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    #[serde(rename = "ACTIVE")]
    pub active: u32,
    #[serde(rename = "ERROR")]
    pub error: u32,
    #[serde(rename = "SHUTOFF")]
    pub shutoff: u32,
}

impl StatusSummary {
    pub fn record(&mut self, status: &str) {
        match status {
            "ACTIVE" => self.active += 1,
            "ERROR" => self.error += 1,
            "SHUTOFF" => self.shutoff += 1,
            _ => {}
        }
    }
}

/// VMs across every workspace of the account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetReport {
    pub total_vms: usize,
    pub total_workspaces: usize,
    pub health_summary: HealthSummary,
    pub status_summary: StatusSummary,
    pub vms: Vec<VmSummary>,
}

/// Result of listing VMs: a single workspace yields a bare list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VmList {
    Workspace(Vec<VmSummary>),
    Fleet(FleetReport),
}

impl VmList {
    pub fn len(&self) -> usize {
        match self {
            VmList::Workspace(vms) => vms.len(),
            VmList::Fleet(report) => report.vms.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// VMs matching a health filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredVms {
    pub total_vms: usize,
    pub vms: Vec<VmSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBlock {
    pub status: HealthStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkHealthReport {
    pub network_health: StatusBlock,
    /// IP addresses of the VM's interfaces that are not `ACTIVE`.
    pub interfaces_down: Vec<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnhealthyVolume {
    pub name: Option<String>,
    pub state: String,
}

impl UnhealthyVolume {
    pub fn from_volume(volume: &Volume) -> Self {
        Self {
            name: volume.name.clone(),
            state: volume.state.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageHealthReport {
    pub storage_health: StatusBlock,
    pub unhealthy_volumes: Vec<UnhealthyVolume>,
}

/// Combined network and storage health of one VM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VmHealthReport {
    #[serde(rename = "vmName")]
    pub vm_name: Option<String>,
    #[serde(rename = "vmID")]
    pub vm_id: String,
    pub overall_health: HealthStatus,
    pub vm_status: Option<String>,
    pub network_health: HealthStatus,
    pub storage_health: HealthStatus,
    pub network_issues: Vec<Option<String>>,
    pub storage_issues: Vec<UnhealthyVolume>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSummary {
    #[serde(rename = "imageID")]
    pub image_id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "operatingSystem")]
    pub operating_system: Option<String>,
    pub state: Option<String>,
}

impl From<RawImage> for ImageSummary {
    fn from(raw: RawImage) -> Self {
        Self {
            image_id: raw.image_id,
            name: raw.name,
            operating_system: raw.specifications.and_then(|s| s.operating_system),
            state: raw.state,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageList {
    pub total_images: usize,
    pub images: Vec<ImageSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDetails {
    #[serde(rename = "imageID")]
    pub image_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub state: Option<String>,
    pub size: Option<Value>,
    pub storage_type: Option<String>,
    pub storage_pool: Option<String>,
    pub operating_system: Option<String>,
    pub architecture: Option<String>,
    pub image_type: Option<String>,
    pub creation_date: Option<String>,
    pub last_update_date: Option<String>,
    pub servers: Value,
    pub volumes: Value,
}

impl From<RawImage> for ImageDetails {
    fn from(raw: RawImage) -> Self {
        let specs = raw.specifications.unwrap_or_default();
        Self {
            image_id: raw.image_id,
            name: raw.name,
            description: raw.description,
            state: raw.state,
            size: raw.size,
            storage_type: raw.storage_type,
            storage_pool: raw.storage_pool,
            operating_system: specs.operating_system,
            architecture: specs.architecture,
            image_type: specs.image_type,
            creation_date: raw.creation_date,
            last_update_date: raw.last_update_date,
            servers: raw.servers.unwrap_or_else(|| json!([])),
            volumes: raw.volumes.unwrap_or_else(|| json!([])),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpAddressMetrics {
    pub total: Value,
    pub available: Value,
    pub used: Value,
    pub utilization: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSummary {
    #[serde(rename = "networkID")]
    pub network_id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub network_type: Option<String>,
    pub cidr: Option<String>,
    pub gateway: Option<String>,
    pub dns_servers: Vec<String>,
    #[serde(rename = "vlanID")]
    pub vlan_id: Option<Value>,
    pub ip_address_metrics: IpAddressMetrics,
}

impl From<RawNetwork> for NetworkSummary {
    fn from(raw: RawNetwork) -> Self {
        let metrics = raw.ip_address_metrics.unwrap_or_default();
        let or_zero = |v: Option<Value>| v.unwrap_or_else(|| json!(0));
        Self {
            network_id: raw.network_id,
            name: raw.name,
            network_type: raw.network_type,
            cidr: raw.cidr,
            gateway: raw.gateway,
            dns_servers: raw.dns_servers.unwrap_or_default(),
            vlan_id: raw.vlan_id,
            ip_address_metrics: IpAddressMetrics {
                total: or_zero(metrics.total),
                available: or_zero(metrics.available),
                used: or_zero(metrics.used),
                utilization: or_zero(metrics.utilization),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkList {
    pub total_networks: usize,
    pub networks: Vec<NetworkSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSummary {
    #[serde(rename = "snapshotID")]
    pub snapshot_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub creation_date: Option<String>,
    pub last_update_date: Option<String>,
    #[serde(rename = "pvmInstanceID")]
    pub pvm_instance_id: Option<String>,
    pub volume_snapshots: Value,
}

impl From<RawSnapshot> for SnapshotSummary {
    fn from(raw: RawSnapshot) -> Self {
        Self {
            snapshot_id: raw.snapshot_id,
            name: raw.name,
            description: raw.description,
            status: raw.status,
            creation_date: raw.creation_date,
            last_update_date: raw.last_update_date,
            pvm_instance_id: raw.pvm_instance_id,
            volume_snapshots: raw.volume_snapshots.unwrap_or_else(|| json!([])),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotList {
    #[serde(rename = "vmID")]
    pub vm_id: String,
    pub total_snapshots: usize,
    pub snapshots: Vec<SnapshotSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::upstream::{ImageSpecifications, RawIpAddressMetrics, WorkspaceLocation};

    #[test]
    fn test_vm_summary_defaults_health_and_crn() {
        let vm = VmSummary::from_instance(&PvmInstance {
            server_name: Some("vm-a".into()),
            pvm_instance_id: Some("id-a".into()),
            ..Default::default()
        });

        let value = serde_json::to_value(&vm).unwrap();
        assert_eq!(value["vmName"], "vm-a");
        assert_eq!(value["health"], json!({"status": "UNKNOWN"}));
        assert_eq!(value["crn"], "");
        assert!(value.get("workspaceName").is_none());
        assert_eq!(vm.health_status(), "UNKNOWN");
    }

    #[test]
    fn test_health_status_tolerates_non_object_health() {
        let vm = VmSummary::from_instance(&PvmInstance {
            health: Some(json!("weird")),
            ..Default::default()
        });
        assert_eq!(vm.health_status(), "UNKNOWN");

        let vm = VmSummary::from_instance(&PvmInstance {
            health: Some(json!({"status": "critical"})),
            ..Default::default()
        });
        assert_eq!(vm.health_status(), "CRITICAL");
    }

    #[test]
    fn test_workspace_tagging_serializes_names() {
        let ws = Workspace {
            id: Some("ws-1".into()),
            name: Some("dal12-ws".into()),
            region: Some("dal12".into()),
            url: "https://dal.example.test".into(),
        };
        let vm = VmSummary::from_instance(&PvmInstance::default()).in_workspace(&ws);
        let value = serde_json::to_value(&vm).unwrap();
        assert_eq!(value["workspaceName"], "dal12-ws");
        assert_eq!(value["workspaceRegion"], "dal12");
    }

    #[test]
    fn test_workspace_url_falls_back_to_base() {
        let ws = Workspace::from_raw(
            RawWorkspace {
                id: Some("ws".into()),
                name: None,
                location: Some(WorkspaceLocation {
                    region: Some("wdc06".into()),
                    url: None,
                }),
            },
            "https://base.example.test",
        );
        assert_eq!(ws.url, "https://base.example.test");
        assert_eq!(ws.region.as_deref(), Some("wdc06"));
    }

    #[test]
    fn test_summaries_ignore_unknown_keys() {
        let mut health = HealthSummary::default();
        for s in ["OK", "OK", "CRITICAL", "UNKNOWN"] {
            health.record(s);
        }
        assert_eq!(health.ok, 2);
        assert_eq!(health.critical, 1);

        let value = serde_json::to_value(&health).unwrap();
        assert_eq!(
            value,
            json!({"OK": 2, "CRITICAL": 1, "WARNING": 0, "ATTENTION": 0})
        );

        let mut status = StatusSummary::default();
        status.record("BUILD");
        status.record("SHUTOFF");
        assert_eq!(status.shutoff, 1);
        assert_eq!(status.active, 0);
    }

    #[test]
    fn test_vm_list_shapes() {
        let list = VmList::Workspace(vec![]);
        assert_eq!(serde_json::to_value(&list).unwrap(), json!([]));

        let fleet = VmList::Fleet(FleetReport {
            total_vms: 0,
            total_workspaces: 2,
            health_summary: HealthSummary::default(),
            status_summary: StatusSummary::default(),
            vms: vec![],
        });
        let value = serde_json::to_value(&fleet).unwrap();
        assert_eq!(value["total_workspaces"], 2);
        assert!(fleet.is_empty());
    }

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(serde_json::to_value(HealthStatus::Ok).unwrap(), json!("OK"));
        assert_eq!(
            serde_json::to_value(HealthStatus::from_problem_count(2)).unwrap(),
            json!("CRITICAL")
        );
    }

    #[test]
    fn test_image_details_reads_specifications() {
        let details = ImageDetails::from(RawImage {
            image_id: Some("img-1".into()),
            specifications: Some(ImageSpecifications {
                operating_system: Some("rhel".into()),
                architecture: Some("ppc64".into()),
                image_type: Some("stock".into()),
            }),
            ..Default::default()
        });
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["imageID"], "img-1");
        assert_eq!(value["operatingSystem"], "rhel");
        assert_eq!(value["imageType"], "stock");
        assert_eq!(value["servers"], json!([]));
        assert_eq!(value["storageType"], Value::Null);
    }

    #[test]
    fn test_upstream_null_passes_through() {
        let raw: RawImage =
            serde_json::from_value(json!({"imageID": "img-1", "servers": null})).unwrap();
        let value = serde_json::to_value(ImageDetails::from(raw)).unwrap();
        assert_eq!(value["servers"], Value::Null);
        assert_eq!(value["volumes"], json!([]));

        let raw: RawNetwork =
            serde_json::from_value(json!({"ipAddressMetrics": {"total": 16, "utilization": null}}))
                .unwrap();
        let value = serde_json::to_value(NetworkSummary::from(raw)).unwrap();
        assert_eq!(value["ipAddressMetrics"]["total"], 16);
        assert_eq!(value["ipAddressMetrics"]["utilization"], Value::Null);
        assert_eq!(value["ipAddressMetrics"]["used"], 0);
    }

    #[test]
    fn test_network_metrics_default_to_zero() {
        let net = NetworkSummary::from(RawNetwork {
            network_id: Some("n1".into()),
            ip_address_metrics: Some(RawIpAddressMetrics {
                total: Some(json!(254)),
                ..Default::default()
            }),
            ..Default::default()
        });
        let value = serde_json::to_value(&net).unwrap();
        assert_eq!(
            value["ipAddressMetrics"],
            json!({"total": 254, "available": 0, "used": 0, "utilization": 0})
        );
        assert_eq!(value["dnsServers"], json!([]));
        assert_eq!(value["networkID"], "n1");
    }
}
