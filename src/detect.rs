//! Controller family detection
//!
//! Inspects what the platform reports for a port and picks the controller
//! family whose native layout should be used. Detection runs exactly once,
//! when the facade is constructed; a pad hot-swapped afterwards keeps being
//! read with the original layout. That is a documented limitation of the
//! one-shot design, not something this module papers over.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::backend::HidBackend;
use crate::error::PadError;

/// Supported controller families.
///
/// `Other` is the catch-all for anything the detector cannot identify; every
/// logical control on an `Other` pad reads as constant false / `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Xbox,
    DualShock4,
    DualSense,
    Other,
}

impl DeviceType {
    /// All supported families, in detection-priority order.
    pub const ALL: [DeviceType; 4] = [
        DeviceType::Xbox,
        DeviceType::DualShock4,
        DeviceType::DualSense,
        DeviceType::Other,
    ];
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceType::Xbox => "xbox",
            DeviceType::DualShock4 => "dualshock4",
            DeviceType::DualSense => "dualsense",
            DeviceType::Other => "other",
        };
        f.write_str(name)
    }
}

impl FromStr for DeviceType {
    type Err = PadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xbox" => Ok(DeviceType::Xbox),
            "dualshock4" | "ds4" => Ok(DeviceType::DualShock4),
            "dualsense" | "ds5" => Ok(DeviceType::DualSense),
            "other" | "generic" => Ok(DeviceType::Other),
            _ => Err(PadError::UnknownDeviceType(s.to_string())),
        }
    }
}

/// Pick the controller family for `port` from the platform's current report.
///
/// The vendor Xbox-class flag wins outright; otherwise the device name is
/// matched case-insensitively. A port with no connected device (no name
/// reported) resolves to [`DeviceType::Other`] - detection itself never
/// fails.
pub(crate) fn detect(backend: &dyn HidBackend, port: usize, disable_auto_detect: bool) -> DeviceType {
    if disable_auto_detect {
        debug!(port, "auto-detection disabled, using generic layout");
        return DeviceType::Other;
    }

    let device = if backend.is_xbox_class(port) {
        DeviceType::Xbox
    } else {
        match backend.device_name(port) {
            Some(name) => {
                let name = name.to_lowercase();
                if name.contains("dualsense") {
                    DeviceType::DualSense
                } else if name.contains("dualshock") {
                    DeviceType::DualShock4
                } else {
                    DeviceType::Other
                }
            }
            None => {
                debug!(port, "no device reported, using generic layout");
                DeviceType::Other
            }
        }
    };

    info!(port, device = %device, "controller family detected");
    device
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::sim::SimBackend;

    #[test]
    fn test_xbox_flag_wins_over_name() {
        let sim = SimBackend::new();
        sim.connect(0, "Wireless DualSense Controller", true);
        assert_eq!(detect(&sim, 0, false), DeviceType::Xbox);
    }

    #[test]
    fn test_dualsense_by_name() {
        let sim = SimBackend::new();
        sim.connect(0, "Wireless DualSense Controller", false);
        assert_eq!(detect(&sim, 0, false), DeviceType::DualSense);
    }

    #[test]
    fn test_dualshock_by_name() {
        let sim = SimBackend::new();
        sim.connect(0, "Dualshock 4 Wireless", false);
        assert_eq!(detect(&sim, 0, false), DeviceType::DualShock4);
    }

    #[test]
    fn test_unrecognized_name_is_other() {
        let sim = SimBackend::new();
        sim.connect(0, "Generic USB Joystick", false);
        assert_eq!(detect(&sim, 0, false), DeviceType::Other);
    }

    #[test]
    fn test_disconnected_port_is_other() {
        let sim = SimBackend::new();
        assert_eq!(detect(&sim, 2, false), DeviceType::Other);
    }

    #[test]
    fn test_disabled_detection_ignores_report() {
        let sim = SimBackend::new();
        sim.connect(0, "Controller (Xbox One For Windows)", true);
        assert_eq!(detect(&sim, 0, true), DeviceType::Other);
    }

    #[test]
    fn test_device_type_parsing() {
        assert_eq!("xbox".parse::<DeviceType>().unwrap(), DeviceType::Xbox);
        assert_eq!("DS4".parse::<DeviceType>().unwrap(), DeviceType::DualShock4);
        assert_eq!("DualSense".parse::<DeviceType>().unwrap(), DeviceType::DualSense);
        assert_eq!("generic".parse::<DeviceType>().unwrap(), DeviceType::Other);
        assert!("wiimote".parse::<DeviceType>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for device in DeviceType::ALL {
            assert_eq!(device.to_string().parse::<DeviceType>().unwrap(), device);
        }
    }
}
