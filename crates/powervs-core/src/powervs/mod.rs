//! PowerVS monitoring operations.
//!
//! [`PowerVsClient`] owns the configuration, the IAM authenticator and two
//! TTL caches: the workspace list and the VM → workspace index built by
//! fleet scans. Each public operation is one tool's worth of work:
//! authenticate, GET, reshape.

mod catalog;
mod health;
mod inventory;
mod snapshots;

pub use health::{summarize_interfaces, summarize_volumes, HEALTHY_VOLUME_STATES};
pub use inventory::filter_by_health;

use crate::config::{PowerVsConfig, PowerVsDefaults};
use crate::crn;
use crate::models::Workspace;
use crate::network::{path_segment, HttpClient, IamAuthenticator};
use crate::{PowerVsError, Result};
use mini_moka::sync::Cache;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

const WORKSPACES_KEY: &str = "workspaces";

/// Everything needed to address one workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceTarget {
    pub id: String,
    pub crn: String,
    /// Regional API URL, without a trailing slash.
    pub url: String,
}

impl WorkspaceTarget {
    /// URL of a resource under this workspace's cloud instance.
    pub fn instance_url(&self, suffix: &str) -> String {
        format!(
            "{}/pcloud/v1/cloud-instances/{}{}",
            self.url,
            path_segment(&self.id),
            suffix
        )
    }

    /// URL of a resource under one of this workspace's VMs.
    pub fn vm_url(&self, vm_id: &str, suffix: &str) -> String {
        self.instance_url(&format!("/pvm-instances/{}{}", path_segment(vm_id), suffix))
    }
}

/// Where a VM was last seen by a fleet scan.
#[derive(Debug, Clone)]
struct VmLocation {
    workspace_id: String,
    region: String,
    url: String,
}

/// Client for the PowerVS monitoring operations.
pub struct PowerVsClient {
    config: PowerVsConfig,
    http: HttpClient,
    auth: IamAuthenticator,
    workspace_cache: Cache<&'static str, Vec<Workspace>>,
    /// Last successful workspace listing, served when a refresh fails.
    last_workspaces: RwLock<Option<Vec<Workspace>>>,
    vm_index: Cache<String, VmLocation>,
}

impl PowerVsClient {
    /// Create a client with the default cache lifetimes.
    pub fn new(config: PowerVsConfig) -> Result<Self> {
        Self::with_cache_ttls(
            config,
            PowerVsDefaults::WORKSPACE_CACHE_TTL,
            PowerVsDefaults::VM_INDEX_TTL,
        )
    }

    /// Create a client with custom cache lifetimes.
    pub fn with_cache_ttls(
        config: PowerVsConfig,
        workspace_ttl: Duration,
        vm_index_ttl: Duration,
    ) -> Result<Self> {
        let http = HttpClient::new()?;
        let auth = IamAuthenticator::new(http.clone(), &config.iam_url, &config.api_key);

        Ok(Self {
            config,
            http,
            auth,
            workspace_cache: Cache::builder()
                .time_to_live(workspace_ttl)
                .max_capacity(1)
                .build(),
            last_workspaces: RwLock::new(None),
            vm_index: Cache::builder()
                .time_to_live(vm_index_ttl)
                .max_capacity(PowerVsDefaults::VM_INDEX_CAPACITY)
                .build(),
        })
    }

    /// Drop cached workspaces, the VM index and the IAM token.
    pub async fn clear_caches(&self) {
        self.workspace_cache.invalidate_all();
        self.vm_index.invalidate_all();
        *self.last_workspaces.write().await = None;
        self.auth.invalidate().await;
    }

    // ========================================
    // Workspace targeting
    // ========================================

    /// The workspace named by the configured CRN, if any.
    pub fn configured_target(&self) -> Option<WorkspaceTarget> {
        if !self.config.has_workspace() {
            return None;
        }
        Some(WorkspaceTarget {
            id: self.config.cloud_instance_id(),
            crn: self.config.crn.clone(),
            url: self.config.base_url.clone(),
        })
    }

    fn require_configured(&self, operation: &str) -> Result<WorkspaceTarget> {
        self.configured_target()
            .ok_or_else(|| PowerVsError::workspace_required(operation))
    }

    fn require_base_url(&self, operation: &str) -> Result<&str> {
        if self.config.base_url.is_empty() {
            return Err(PowerVsError::Config {
                message: format!("BASE_URL is required to {}", operation),
            });
        }
        Ok(&self.config.base_url)
    }

    fn target_for_workspace(&self, workspace: &Workspace) -> Option<WorkspaceTarget> {
        let id = workspace.id.clone()?;
        let region = workspace.region.clone().unwrap_or_default();
        Some(WorkspaceTarget {
            crn: self.workspace_crn(&region, &id),
            id,
            url: workspace.url.clone(),
        })
    }

    fn workspace_crn(&self, region: &str, workspace_id: &str) -> String {
        crn::workspace_crn(
            &self.config.crn_cname,
            region,
            &self.config.account_id,
            workspace_id,
        )
    }

    fn remember_vm(&self, vm_id: &str, target: &WorkspaceTarget, workspace: &Workspace) {
        self.vm_index.insert(
            vm_id.to_string(),
            VmLocation {
                workspace_id: target.id.clone(),
                region: workspace.region.clone().unwrap_or_default(),
                url: target.url.clone(),
            },
        );
    }

    fn indexed_target(&self, vm_id: &str) -> Option<WorkspaceTarget> {
        self.vm_index
            .get(&vm_id.to_string())
            .map(|loc| WorkspaceTarget {
                crn: self.workspace_crn(&loc.region, &loc.workspace_id),
                id: loc.workspace_id,
                url: loc.url,
            })
    }

    /// Resolve the workspace hosting `vm_id`.
    ///
    /// Order: VM index from the last fleet scan, then the configured
    /// workspace. Without a configured workspace a fresh fleet scan is run
    /// once before giving up.
    pub async fn target_for_vm(&self, vm_id: &str) -> Result<WorkspaceTarget> {
        if let Some(target) = self.indexed_target(vm_id) {
            return Ok(target);
        }
        if let Some(target) = self.configured_target() {
            return Ok(target);
        }

        debug!("VM {} not in index, rescanning workspaces", vm_id);
        self.fleet_scan().await?;
        self.indexed_target(vm_id)
            .ok_or_else(|| PowerVsError::VmNotFound {
                vm_id: vm_id.to_string(),
            })
    }

    // ========================================
    // Requests
    // ========================================

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        workspace_crn: Option<&str>,
        timeout: Duration,
    ) -> Result<T> {
        let token = self.auth.token().await?;
        self.http.get_json(url, &token, workspace_crn, timeout).await
    }

    async fn get_in<T: DeserializeOwned>(
        &self,
        target: &WorkspaceTarget,
        url: &str,
        timeout: Duration,
    ) -> Result<T> {
        self.get(url, Some(&target.crn), timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(crn: &str) -> PowerVsConfig {
        PowerVsConfig {
            account_id: "acct".into(),
            api_key: "key".into(),
            base_url: "https://api.example.test".into(),
            crn: crn.into(),
            ..Default::default()
        }
        .validated()
        .unwrap()
    }

    #[test]
    fn test_target_urls_escape_ids() {
        let target = WorkspaceTarget {
            id: "ws-1".into(),
            crn: "crn".into(),
            url: "https://api.example.test".into(),
        };
        assert_eq!(
            target.instance_url("/images"),
            "https://api.example.test/pcloud/v1/cloud-instances/ws-1/images"
        );
        assert_eq!(
            target.vm_url("vm/1", "/volumes"),
            "https://api.example.test/pcloud/v1/cloud-instances/ws-1/pvm-instances/vm%2F1/volumes"
        );
    }

    #[test]
    fn test_configured_target_from_crn() {
        let client = PowerVsClient::new(config(
            "crn:v1:staging:public:power-iaas:dal12:a/acct:ws-9::",
        ))
        .unwrap();
        let target = client.configured_target().unwrap();
        assert_eq!(target.id, "ws-9");
        assert_eq!(target.url, "https://api.example.test");
    }

    #[test]
    fn test_workspace_operations_require_crn() {
        let client = PowerVsClient::new(config("")).unwrap();
        assert!(client.configured_target().is_none());
        let err = client.require_configured("list images").unwrap_err();
        assert!(matches!(err, PowerVsError::WorkspaceNotConfigured { .. }));
    }

    #[test]
    fn test_index_hit_rebuilds_workspace_crn() {
        let client = PowerVsClient::new(config("")).unwrap();
        let workspace = Workspace {
            id: Some("ws-2".into()),
            name: Some("wdc".into()),
            region: Some("wdc06".into()),
            url: "https://wdc.example.test".into(),
        };
        let target = client.target_for_workspace(&workspace).unwrap();
        client.remember_vm("vm-1", &target, &workspace);

        let resolved = client.indexed_target("vm-1").unwrap();
        assert_eq!(resolved, target);
        assert_eq!(
            resolved.crn,
            "crn:v1:staging:public:power-iaas:wdc06:a/acct:ws-2::"
        );
    }
}
