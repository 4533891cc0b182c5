//! Pad configuration
//!
//! Deserializable settings for one controller port, typically embedded in a
//! host application's YAML config. A missing `device` means auto-detect;
//! `disable_auto_detect` forces the generic layout instead.

use serde::{Deserialize, Serialize};

/// Settings for binding one [`PadController`](crate::controller::PadController).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PadConfig {
    /// Driver-station port index of the pad.
    pub port: usize,
    /// Explicit controller family (`xbox`, `dualshock4`, `dualsense`,
    /// `other`). Unset means auto-detect at construction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    /// Skip detection and use the generic layout. Ignored when `device`
    /// is set.
    #[serde(default)]
    pub disable_auto_detect: bool,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            port: 0,
            device: None,
            disable_auto_detect: false,
        }
    }
}
