//! Centralized configuration for the PowerVS client.
//!
//! Credentials and the target workspace come from a YAML file, with
//! environment variables taking precedence over file values. Timeouts and
//! cache lifetimes are constants on [`PowerVsDefaults`].

use crate::crn;
use crate::error::{PowerVsError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info};

/// Fixed endpoints, timeouts and cache lifetimes.
pub struct PowerVsDefaults;

impl PowerVsDefaults {
    pub const IAM_URL: &'static str = "https://iam.cloud.ibm.com/identity/token";
    pub const IAM_GRANT_TYPE: &'static str = "urn:ibm:params:oauth:grant-type:apikey";
    pub const CRN_CNAME: &'static str = "staging";

    pub const IAM_TIMEOUT: Duration = Duration::from_secs(10);
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
    /// Used for fleet scans and single-VM detail fetches.
    pub const LONG_REQUEST_TIMEOUT: Duration = Duration::from_secs(240);

    pub const WORKSPACE_CACHE_TTL: Duration = Duration::from_secs(1800);
    pub const VM_INDEX_TTL: Duration = Duration::from_secs(300);
    pub const VM_INDEX_CAPACITY: u64 = 10_000;
    pub const TOKEN_DEFAULT_LIFETIME: Duration = Duration::from_secs(3600);
    pub const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

    pub const CONFIG_FILE_NAME: &'static str = "config.yaml";
    pub const CONFIG_DIR_NAME: &'static str = "powervs-mcp";
    pub const USER_AGENT: &'static str = "powervs-mcp/0.1";
}

/// Environment variable names, in the order they override file values.
pub struct EnvVars;

impl EnvVars {
    pub const ACCOUNT_ID: &'static str = "ACCOUNT_ID";
    pub const API_KEY: &'static str = "API_KEY";
    pub const BASE_URL: &'static str = "BASE_URL";
    pub const CRN: &'static str = "CRN";
    pub const IAM_URL: &'static str = "IAM_URL";
    pub const CRN_CNAME: &'static str = "CRN_CNAME";
    pub const CONFIG_PATH: &'static str = "POWERVS_CONFIG";
}

/// Account credentials and workspace targeting.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct PowerVsConfig {
    pub account_id: String,
    pub api_key: String,
    /// PowerVS API base URL, without a trailing slash.
    pub base_url: String,
    /// Workspace CRN. Empty means "all workspaces of the account".
    pub crn: String,
    pub iam_url: String,
    /// CRN cname segment used when building per-workspace CRNs.
    pub crn_cname: String,
}

impl std::fmt::Debug for PowerVsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerVsConfig")
            .field("account_id", &self.account_id)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("crn", &self.crn)
            .field("iam_url", &self.iam_url)
            .field("crn_cname", &self.crn_cname)
            .finish()
    }
}

impl PowerVsConfig {
    /// Load configuration from file and process environment.
    ///
    /// File search order:
    /// 1. `explicit_path`, if given (must exist and parse)
    /// 2. `./config.yaml`
    /// 3. `<user config dir>/powervs-mcp/config.yaml`
    ///
    /// Non-empty environment variables then override file values.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let file_config = match explicit_path {
            Some(path) => Self::from_file(path)?,
            None => Self::search_default_locations(),
        };
        file_config
            .with_overrides(|key| std::env::var(key).ok())
            .validated()
    }

    /// Parse a YAML document. An empty document yields all-empty values.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read and parse a YAML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PowerVsError::io_with_path(e, path))?;
        Self::from_yaml_str(&content)
    }

    fn search_default_locations() -> Self {
        Self::search(&Self::default_locations())
    }

    /// Load the first file in `paths` that exists.
    ///
    /// A file that exists but cannot be read or parsed ends the search with
    /// an empty config; the environment must then supply every value.
    fn search(paths: &[PathBuf]) -> Self {
        for path in paths {
            if !path.exists() {
                debug!("No configuration file at {}", path.display());
                continue;
            }
            match Self::from_file(path) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    return config;
                }
                Err(e) => {
                    error!("Failed to load {}: {}", path.display(), e);
                    return Self::default();
                }
            }
        }
        info!("No configuration file found, using environment only");
        Self::default()
    }

    fn default_locations() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(PowerVsDefaults::CONFIG_FILE_NAME)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(
                config_dir
                    .join(PowerVsDefaults::CONFIG_DIR_NAME)
                    .join(PowerVsDefaults::CONFIG_FILE_NAME),
            );
        }
        paths
    }

    /// Apply overrides from `lookup` (normally the process environment).
    ///
    /// Empty values are ignored so an exported-but-blank variable does not
    /// wipe a file value.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(EnvVars::ACCOUNT_ID) {
            self.account_id = v;
        }
        if let Some(v) = get(EnvVars::API_KEY) {
            self.api_key = v;
        }
        if let Some(v) = get(EnvVars::BASE_URL) {
            self.base_url = v;
        }
        if let Some(v) = get(EnvVars::CRN) {
            self.crn = v;
        }
        if let Some(v) = get(EnvVars::IAM_URL) {
            self.iam_url = v;
        }
        if let Some(v) = get(EnvVars::CRN_CNAME) {
            self.crn_cname = v;
        }
        self
    }

    /// Fill defaults and check required fields.
    pub fn validated(mut self) -> Result<Self> {
        self.account_id = self.account_id.trim().to_string();
        self.api_key = self.api_key.trim().to_string();
        self.crn = self.crn.trim().to_string();
        self.base_url = self.base_url.trim().trim_end_matches('/').to_string();

        if self.api_key.is_empty() || self.account_id.is_empty() {
            return Err(PowerVsError::Config {
                message: "API_KEY and ACCOUNT_ID are required".to_string(),
            });
        }

        if self.iam_url.trim().is_empty() {
            self.iam_url = PowerVsDefaults::IAM_URL.to_string();
        }
        if self.crn_cname.trim().is_empty() {
            self.crn_cname = PowerVsDefaults::CRN_CNAME.to_string();
        }
        if !self.base_url.is_empty() {
            url::Url::parse(&self.base_url).map_err(|e| PowerVsError::Config {
                message: format!("BASE_URL '{}' is not a valid URL: {}", self.base_url, e),
            })?;
        }

        Ok(self)
    }

    /// Workspace id taken from the configured CRN, empty when none.
    pub fn cloud_instance_id(&self) -> String {
        crn::cloud_instance_id(&self.crn)
    }

    /// Whether a single workspace is targeted (CRN set and parseable).
    pub fn has_workspace(&self) -> bool {
        !self.crn.is_empty() && !self.cloud_instance_id().is_empty()
    }
}
