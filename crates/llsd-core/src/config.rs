//! # Codec Configuration
//!
//! Limits applied by the decoders. Loaded from any `serde` source; every
//! field has a default so a partial document is accepted.

use serde::{Deserialize, Serialize};

/// Limits for the binary decoder and the JSON adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Maximum Array/Map nesting accepted on decode. The top-level value is
    /// depth 0; a container at depth `max_depth` is rejected.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    512
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}
