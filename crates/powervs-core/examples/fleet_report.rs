//! Fleet report example - print VM health across the account
//!
//! Reads credentials from `config.yaml` or the environment
//! (`API_KEY`, `ACCOUNT_ID`, `BASE_URL`, optionally `CRN`).

use powervs_core::{PowerVsClient, PowerVsConfig, Result, VmList};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let config = PowerVsConfig::load(config_path.as_deref())?;

    println!("Querying PowerVS for account {}", config.account_id);
    let client = PowerVsClient::new(config)?;

    match client.list_vms().await? {
        VmList::Workspace(vms) => {
            println!("Found {} VMs in the configured workspace:", vms.len());
            for vm in vms {
                println!(
                    "  - {} [{}] {}",
                    vm.vm_name.as_deref().unwrap_or("?"),
                    vm.power_status(),
                    vm.health_status()
                );
            }
        }
        VmList::Fleet(report) => {
            println!(
                "Found {} VMs across {} workspaces",
                report.total_vms, report.total_workspaces
            );
            println!(
                "  OK: {}  CRITICAL: {}  WARNING: {}",
                report.health_summary.ok,
                report.health_summary.critical,
                report.health_summary.warning
            );
        }
    }

    Ok(())
}
