//! Provider name constants
//!
//! This module defines canonical provider names used throughout the SDK

/// Anthropic (Claude) provider
pub const ANTHROPIC: &str = "anthropic";

/// Voyage AI provider (text embeddings)
pub const VOYAGE: &str = "voyage";
