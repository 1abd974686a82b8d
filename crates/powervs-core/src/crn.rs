//! Cloud Resource Name helpers.
//!
//! A PowerVS workspace CRN looks like
//! `crn:v1:bluemix:public:power-iaas:dal12:a/<account>:<workspace id>::`.
//! Only the region (segment 5) and the workspace id (segment 7) matter here.

/// The parts of a workspace CRN this crate uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crn {
    pub workspace_id: String,
    pub region: String,
}

impl Crn {
    /// Parse a CRN, returning `None` when it is empty or has fewer than 8 segments.
    pub fn parse(crn: &str) -> Option<Self> {
        if crn.is_empty() {
            return None;
        }
        let parts: Vec<&str> = crn.split(':').collect();
        if parts.len() < 8 {
            return None;
        }
        Some(Self {
            workspace_id: parts[7].to_string(),
            region: parts[5].to_string(),
        })
    }
}

/// Extract the cloud instance (workspace) id from a CRN, or an empty string.
pub fn cloud_instance_id(crn: &str) -> String {
    Crn::parse(crn)
        .map(|c| c.workspace_id)
        .unwrap_or_default()
}

/// Build the CRN of a workspace in `region` owned by `account_id`.
pub fn workspace_crn(cname: &str, region: &str, account_id: &str, workspace_id: &str) -> String {
    format!(
        "crn:v1:{}:public:power-iaas:{}:a/{}:{}::",
        cname, region, account_id, workspace_id
    )
}
