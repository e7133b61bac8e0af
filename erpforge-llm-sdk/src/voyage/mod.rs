//! Voyage AI embedding client implementation

pub mod client;
pub mod types;

pub use client::VoyageClient;
pub use types::*;

// Re-export Voyage model constants
pub use crate::models::voyage::*;
