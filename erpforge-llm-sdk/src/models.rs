//! Model constants for supported LLM providers
//!
//! Model IDs are sourced from official provider documentation.

/// Claude model constants
pub mod claude {
    /// Claude Sonnet 4.5 - Smart model for complex agents and coding
    /// Released: 2025-09-29
    pub const SONNET_4_5_ID: &str = "claude-sonnet-4-5-20250929";
    pub const SONNET_4_5_NAME: &str = "Claude Sonnet 4.5";

    /// Claude Haiku 4.5 - Fastest model with near-frontier intelligence
    /// Released: 2025-10-01
    pub const HAIKU_4_5_ID: &str = "claude-haiku-4-5-20251001";
    pub const HAIKU_4_5_NAME: &str = "Claude Haiku 4.5";

    pub const SONNET_4_5: &str = SONNET_4_5_ID;
    pub const HAIKU_4_5: &str = HAIKU_4_5_ID;
}

/// Voyage AI embedding model constants
pub mod voyage {
    /// Voyage 4 Lite - Fast and cost-effective embedding model
    /// Default dimension: 1024, supports 256/512/1024/2048
    pub const VOYAGE_4_LITE_ID: &str = "voyage-4-lite";
    pub const VOYAGE_4_LITE_NAME: &str = "Voyage 4 Lite";

    /// Voyage 3.5 - Previous generation balanced model
    pub const VOYAGE_3_5_ID: &str = "voyage-3.5";
    pub const VOYAGE_3_5_NAME: &str = "Voyage 3.5";

    pub const VOYAGE_4_LITE: &str = VOYAGE_4_LITE_ID;
    pub const VOYAGE_3_5: &str = VOYAGE_3_5_ID;
}

pub use claude::*;
