//! PowerVS tools served over MCP.
//!
//! Each `#[tool]` method runs one `PowerVsClient` operation. Upstream and
//! lookup failures come back as tool results with `isError` set; arguments
//! that do not match the input schema are rejected by rmcp as invalid params.

use powervs_core::{PowerVsClient, PowerVsError};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, ErrorData as McpError, Implementation, ServerCapabilities, ServerInfo,
};
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

pub const SERVER_NAME: &str = "PowerVS MCP Server";

// ============================================================================
// Arguments
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
pub struct VmArgs {
    /// PowerVS VM (pvm instance) id
    #[serde(alias = "vmId")]
    pub vm_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct HealthStatusArgs {
    /// Health status to match: OK, CRITICAL, WARNING, ATTENTION or UNKNOWN
    #[serde(alias = "healthStatus")]
    pub health_status: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ImageArgs {
    /// PowerVS image id
    #[serde(alias = "imageId")]
    pub image_id: String,
}

/// Trimmed argument value; a blank value counts as missing.
fn required(name: &str, value: &str) -> powervs_core::Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PowerVsError::InvalidParams {
            message: format!("Missing required parameter: {}", name),
        });
    }
    Ok(value.to_string())
}

/// Turn an operation outcome into a tool result.
///
/// Objects are also returned as `structuredContent`; lists only as text.
fn tool_result<T: Serialize>(
    tool: &str,
    outcome: powervs_core::Result<T>,
) -> Result<CallToolResult, McpError> {
    match outcome.and_then(|v| serde_json::to_value(v).map_err(PowerVsError::from)) {
        Ok(value) if value.is_object() => {
            info!("Tool {} completed", tool);
            Ok(CallToolResult::structured(value))
        }
        Ok(value) => {
            info!("Tool {} completed", tool);
            let text = serde_json::to_string_pretty(&value)
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
            Ok(CallToolResult::success(vec![Content::text(text)]))
        }
        Err(e) => {
            warn!("Tool {} failed: {}", tool, e);
            Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
        }
    }
}

// ============================================================================
// Tool server
// ============================================================================

/// MCP handler exposing the PowerVS monitoring tools.
///
/// One instance is created per MCP session; all of them share the client and
/// therefore its token and caches.
#[derive(Clone)]
pub struct PowerVsTools {
    client: Arc<PowerVsClient>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl PowerVsTools {
    pub fn new(client: Arc<PowerVsClient>) -> Self {
        Self {
            client,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "List VMs in the configured workspace, or across every workspace of the account with health and status summaries when no CRN is configured."
    )]
    async fn fetch_powervs_vms(&self) -> Result<CallToolResult, McpError> {
        tool_result("fetch_powervs_vms", self.client.list_vms().await)
    }

    #[tool(
        description = "List VMs whose health status matches the given value (OK, CRITICAL, WARNING, ATTENTION, UNKNOWN). Matching ignores case."
    )]
    async fn fetch_powervs_vms_by_health_status(
        &self,
        Parameters(args): Parameters<HealthStatusArgs>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = match required("health_status", &args.health_status) {
            Ok(status) => self.client.vms_by_health(&status).await,
            Err(e) => Err(e),
        };
        tool_result("fetch_powervs_vms_by_health_status", outcome)
    }

    #[tool(description = "List VMs in CRITICAL health.")]
    async fn fetch_powervs_critical_vms(&self) -> Result<CallToolResult, McpError> {
        tool_result("fetch_powervs_critical_vms", self.client.critical_vms().await)
    }

    #[tool(description = "List all PowerVS workspaces of the account with their region and API URL.")]
    async fn fetch_powervs_all_workspaces(&self) -> Result<CallToolResult, McpError> {
        tool_result(
            "fetch_powervs_all_workspaces",
            self.client.list_workspaces().await,
        )
    }

    #[tool(
        description = "Check the network interfaces of a VM. Interfaces that are not ACTIVE are reported as down."
    )]
    async fn fetch_powervs_vm_network_health(
        &self,
        Parameters(args): Parameters<VmArgs>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = match required("vm_id", &args.vm_id) {
            Ok(vm_id) => self.client.network_health(&vm_id).await,
            Err(e) => Err(e),
        };
        tool_result("fetch_powervs_vm_network_health", outcome)
    }

    #[tool(description = "Check the volumes attached to a VM and report those in an unhealthy state.")]
    async fn fetch_powervs_vm_storage_health(
        &self,
        Parameters(args): Parameters<VmArgs>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = match required("vm_id", &args.vm_id) {
            Ok(vm_id) => self.client.storage_health(&vm_id).await,
            Err(e) => Err(e),
        };
        tool_result("fetch_powervs_vm_storage_health", outcome)
    }

    #[tool(description = "Combined VM, network and storage health of a VM.")]
    async fn fetch_powervs_vm_health(
        &self,
        Parameters(args): Parameters<VmArgs>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = match required("vm_id", &args.vm_id) {
            Ok(vm_id) => self.client.vm_health(&vm_id).await,
            Err(e) => Err(e),
        };
        tool_result("fetch_powervs_vm_health", outcome)
    }

    #[tool(description = "List boot images available in the configured workspace.")]
    async fn fetch_powervs_all_images(&self) -> Result<CallToolResult, McpError> {
        tool_result("fetch_powervs_all_images", self.client.list_images().await)
    }

    #[tool(description = "Get full details of one image in the configured workspace.")]
    async fn fetch_powervs_image_details(
        &self,
        Parameters(args): Parameters<ImageArgs>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = match required("image_id", &args.image_id) {
            Ok(image_id) => self.client.image_details(&image_id).await,
            Err(e) => Err(e),
        };
        tool_result("fetch_powervs_image_details", outcome)
    }

    #[tool(description = "List networks of the configured workspace with their IP address usage.")]
    async fn fetch_powervs_all_networks(&self) -> Result<CallToolResult, McpError> {
        tool_result("fetch_powervs_all_networks", self.client.list_networks().await)
    }

    #[tool(description = "List snapshots taken of a VM.")]
    async fn fetch_powervs_vm_snapshots(
        &self,
        Parameters(args): Parameters<VmArgs>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = match required("vm_id", &args.vm_id) {
            Ok(vm_id) => self.client.vm_snapshots(&vm_id).await,
            Err(e) => Err(e),
        };
        tool_result("fetch_powervs_vm_snapshots", outcome)
    }
}

#[tool_handler]
impl ServerHandler for PowerVsTools {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(
                "Monitoring tools for IBM Power Virtual Server. VM tools take a vm_id; without a configured CRN, VMs are located by scanning every workspace of the account.".into(),
            ),
            ..Default::default()
        }
    }
}
