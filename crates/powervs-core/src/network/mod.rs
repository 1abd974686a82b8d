//! Network plumbing: the upstream HTTP client and IAM authentication.

mod client;
mod iam;

pub use client::{path_segment, HttpClient, CRN_HEADER};
pub use iam::IamAuthenticator;
