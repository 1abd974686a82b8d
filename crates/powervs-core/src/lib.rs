//! PowerVS Core - Headless client for IBM Power Virtual Server monitoring.
//!
//! This crate authenticates against IBM Cloud IAM, queries the PowerVS REST
//! API and reshapes the responses into compact reports (VM inventory, health,
//! images, networks, snapshots). It has no knowledge of MCP or any other
//! transport; the `powervs-mcp` binary exposes it as tools.
//!
//! # Example
//!
//! ```rust,ignore
//! use powervs_core::{PowerVsClient, PowerVsConfig};
//!
//! #[tokio::main]
//! async fn main() -> powervs_core::Result<()> {
//!     let config = PowerVsConfig::load(None)?;
//!     let client = PowerVsClient::new(config)?;
//!
//!     // Every VM of the account when no CRN is configured
//!     let vms = client.list_vms().await?;
//!     println!("Found {} VMs", vms.len());
//!
//!     let critical = client.critical_vms().await?;
//!     println!("{} VMs are critical", critical.total_vms);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crn;
pub mod error;
pub mod models;
pub mod network;
pub mod powervs;

// Re-export commonly used types
pub use config::{EnvVars, PowerVsConfig, PowerVsDefaults};
pub use error::{PowerVsError, Result};
pub use models::{
    FilteredVms, FleetReport, HealthStatus, ImageDetails, ImageList, NetworkHealthReport,
    NetworkList, SnapshotList, StorageHealthReport, VmHealthReport, VmList, VmSummary, Workspace,
};
pub use powervs::{filter_by_health, PowerVsClient, WorkspaceTarget};
