//! Data models: raw PowerVS payloads and the reshaped tool results.

pub mod upstream;
mod responses;

pub use responses::*;
