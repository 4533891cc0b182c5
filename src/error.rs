//! Library error types

use thiserror::Error;

/// Errors surfaced by the pad facade and its backends.
///
/// Unsupported control/device combinations are deliberately *not* errors:
/// they degrade to constant-false triggers or `0.0` axis reads so that
/// binding code never has to special-case the connected hardware.
#[derive(Debug, Error)]
pub enum PadError {
    /// A device type string from configuration did not name a supported
    /// controller family.
    #[error("unknown device type '{0}' (expected xbox, dualshock4, dualsense or other)")]
    UnknownDeviceType(String),

    /// The gamepad backend could not be brought up at all.
    #[error("gamepad backend unavailable: {0}")]
    BackendUnavailable(String),
}
