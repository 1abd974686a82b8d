//! Payloads returned by the PowerVS REST API.
//!
//! Only the fields the tools reshape are modelled. Everything is optional:
//! the API omits fields freely and a missing value must not fail a whole
//! listing.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Keep an explicit `null` as `Some(Value::Null)`; only a missing key is `None`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// `GET /pcloud/v1/cloud-instances/{ws}/pvm-instances`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PvmInstanceList {
    pub pvm_instances: Option<Vec<PvmInstance>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PvmInstance {
    pub server_name: Option<String>,
    #[serde(rename = "pvmInstanceID")]
    pub pvm_instance_id: Option<String>,
    pub os_type: Option<String>,
    pub sys_type: Option<String>,
    pub status: Option<String>,
    pub health: Option<Value>,
    pub crn: Option<String>,
    pub networks: Option<Vec<PvmNetwork>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PvmNetwork {
    #[serde(rename = "networkID")]
    pub network_id: Option<String>,
}

/// `GET /v1/networks/{network}/network-interfaces`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkInterfaceList {
    pub network_interfaces: Option<Vec<NetworkInterface>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkInterface {
    pub ip_address: Option<String>,
    pub status: Option<String>,
    pub pvm_instance: Option<InterfaceInstance>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InterfaceInstance {
    #[serde(rename = "pvmInstanceID")]
    pub pvm_instance_id: Option<String>,
}

/// `GET .../pvm-instances/{vm}/volumes`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VolumeList {
    pub volumes: Option<Vec<Volume>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Volume {
    pub name: Option<String>,
    pub state: Option<String>,
}

/// `GET /v1/workspaces`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkspaceList {
    pub workspaces: Option<Vec<RawWorkspace>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawWorkspace {
    pub id: Option<String>,
    pub name: Option<String>,
    pub location: Option<WorkspaceLocation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkspaceLocation {
    pub region: Option<String>,
    pub url: Option<String>,
}

/// `GET .../images` and `GET .../images/{image}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImageCollection {
    pub images: Option<Vec<RawImage>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawImage {
    #[serde(rename = "imageID")]
    pub image_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub state: Option<String>,
    pub size: Option<Value>,
    pub storage_type: Option<String>,
    pub storage_pool: Option<String>,
    pub specifications: Option<ImageSpecifications>,
    pub creation_date: Option<String>,
    pub last_update_date: Option<String>,
    #[serde(deserialize_with = "present")]
    pub servers: Option<Value>,
    #[serde(deserialize_with = "present")]
    pub volumes: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageSpecifications {
    pub operating_system: Option<String>,
    pub architecture: Option<String>,
    pub image_type: Option<String>,
}

/// `GET .../networks`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NetworkCollection {
    pub networks: Option<Vec<RawNetwork>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawNetwork {
    #[serde(rename = "networkID")]
    pub network_id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub network_type: Option<String>,
    pub cidr: Option<String>,
    pub gateway: Option<String>,
    pub dns_servers: Option<Vec<String>>,
    #[serde(rename = "vlanID")]
    pub vlan_id: Option<Value>,
    pub ip_address_metrics: Option<RawIpAddressMetrics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawIpAddressMetrics {
    #[serde(deserialize_with = "present")]
    pub total: Option<Value>,
    #[serde(deserialize_with = "present")]
    pub available: Option<Value>,
    #[serde(deserialize_with = "present")]
    pub used: Option<Value>,
    #[serde(deserialize_with = "present")]
    pub utilization: Option<Value>,
}

/// `GET .../pvm-instances/{vm}/snapshots`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SnapshotCollection {
    pub snapshots: Option<Vec<RawSnapshot>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSnapshot {
    #[serde(rename = "snapshotID")]
    pub snapshot_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub creation_date: Option<String>,
    pub last_update_date: Option<String>,
    #[serde(rename = "pvmInstanceID")]
    pub pvm_instance_id: Option<String>,
    #[serde(deserialize_with = "present")]
    pub volume_snapshots: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pvm_instance_field_names() {
        let list: PvmInstanceList = serde_json::from_value(json!({
            "pvmInstances": [{
                "serverName": "vm-a",
                "pvmInstanceID": "id-a",
                "osType": "aix",
                "sysType": "s922",
                "status": "ACTIVE",
                "health": {"status": "OK"},
                "networks": [{"networkID": "net-1"}, {"ipAddress": "10.0.0.4"}]
            }]
        }))
        .unwrap();

        let vm = &list.pvm_instances.unwrap()[0];
        assert_eq!(vm.pvm_instance_id.as_deref(), Some("id-a"));
        assert_eq!(vm.sys_type.as_deref(), Some("s922"));
        let networks = vm.networks.as_ref().unwrap();
        assert_eq!(networks[0].network_id.as_deref(), Some("net-1"));
        assert!(networks[1].network_id.is_none());
    }

    #[test]
    fn test_missing_collections_default_to_none() {
        let list: PvmInstanceList = serde_json::from_value(json!({})).unwrap();
        assert!(list.pvm_instances.is_none());

        let networks: NetworkCollection =
            serde_json::from_value(json!({"networks": [{"type": "vlan", "vlanID": 12}]})).unwrap();
        let net = &networks.networks.unwrap()[0];
        assert_eq!(net.network_type.as_deref(), Some("vlan"));
        assert_eq!(net.vlan_id, Some(json!(12)));
    }

    #[test]
    fn test_explicit_null_is_kept_apart_from_missing() {
        let image: RawImage =
            serde_json::from_value(json!({"imageID": "img-1", "servers": null})).unwrap();
        assert_eq!(image.servers, Some(Value::Null));
        assert!(image.volumes.is_none());

        let snapshot: RawSnapshot =
            serde_json::from_value(json!({"volumeSnapshots": null})).unwrap();
        assert_eq!(snapshot.volume_snapshots, Some(Value::Null));

        let metrics: RawIpAddressMetrics =
            serde_json::from_value(json!({"total": 254, "used": null})).unwrap();
        assert_eq!(metrics.total, Some(json!(254)));
        assert_eq!(metrics.used, Some(Value::Null));
        assert!(metrics.available.is_none());
    }
}
