//! Logical-to-native control table
//!
//! One central place maps every logical control onto each controller
//! family's native button/axis indices. The resolution functions are total:
//! a combination with no vendor analog comes back as `None` /
//! [`TriggerBinding::Unsupported`], which the facade turns into a
//! constant-false trigger or a `0.0` axis read. Keeping the fallback policy
//! here means no accessor ever has to re-derive it.
//!
//! Native index assignments follow the driver-station conventions the
//! vendor HID reports use:
//!
//! | family      | buttons (1-based)                                         | axes (0-based)                 |
//! |-------------|-----------------------------------------------------------|--------------------------------|
//! | Xbox        | A=1 B=2 X=3 Y=4 LB=5 RB=6 Back=7 Start=8 LS=9 RS=10       | LX=0 LY=1 LT=2 RT=3 RX=4 RY=5  |
//! | DualShock 4 | Sq=1 Cross=2 Circle=3 Tri=4 L1=5 R1=6 L2=7 R2=8           | LX=0 LY=1 RX=2 L2=3 R2=4 RY=5  |
//! |             | Share=9 Options=10 L3=11 R3=12                            |                                |
//! | DualSense   | same as DualShock 4 (Create instead of Share at 9)        | same as DualShock 4            |

use crate::detect::DeviceType;

/// Logical digital controls, named after the Xbox layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum LogicalButton {
    A,
    B,
    X,
    Y,
    LeftBumper,
    RightBumper,
    Back,
    Start,
    LeftStick,
    RightStick,
}

impl LogicalButton {
    pub(crate) const ALL: [LogicalButton; 10] = [
        LogicalButton::A,
        LogicalButton::B,
        LogicalButton::X,
        LogicalButton::Y,
        LogicalButton::LeftBumper,
        LogicalButton::RightBumper,
        LogicalButton::Back,
        LogicalButton::Start,
        LogicalButton::LeftStick,
        LogicalButton::RightStick,
    ];
}

/// Logical analog controls, named after the Xbox layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum LogicalAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
}

impl LogicalAxis {
    pub(crate) const ALL: [LogicalAxis; 6] = [
        LogicalAxis::LeftX,
        LogicalAxis::LeftY,
        LogicalAxis::RightX,
        LogicalAxis::RightY,
        LogicalAxis::LeftTrigger,
        LogicalAxis::RightTrigger,
    ];
}

/// Which analog trigger a threshold-style request refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AnalogSide {
    Left,
    Right,
}

/// How a threshold-style trigger request resolves for a family.
///
/// The PlayStation families expose L2/R2 as digital buttons but no
/// thresholded accessor, so threshold requests bind to the button and the
/// threshold argument is ignored. Synthesizing a crossing from the raw axis
/// would invent debounce behavior the vendor API does not specify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TriggerBinding {
    AxisThreshold(u8),
    Button(u8),
    Unsupported,
}

/// Native 1-based button index for a logical button, `None` if the family
/// has no analog for it.
pub(crate) fn button_index(device: DeviceType, button: LogicalButton) -> Option<u8> {
    use DeviceType::*;
    use LogicalButton::*;

    match device {
        Xbox => Some(match button {
            A => 1,
            B => 2,
            X => 3,
            Y => 4,
            LeftBumper => 5,
            RightBumper => 6,
            Back => 7,
            Start => 8,
            LeftStick => 9,
            RightStick => 10,
        }),
        DualShock4 => Some(match button {
            // Face buttons by position: cross=A, circle=B, square=X, triangle=Y
            A => 2,
            B => 3,
            X => 1,
            Y => 4,
            LeftBumper => 5,
            RightBumper => 6,
            Back => 9, // share
            Start => 10, // options
            LeftStick => 11,
            RightStick => 12,
        }),
        DualSense => match button {
            A => Some(2),
            B => Some(3),
            X => Some(1),
            Y => Some(4),
            LeftBumper => Some(5),
            RightBumper => Some(6),
            // No back mapping on DualSense; the create button is left alone.
            Back => None,
            Start => Some(10), // options
            LeftStick => Some(11),
            RightStick => Some(12),
        },
        Other => None,
    }
}

/// Native 0-based axis index for a logical axis, `None` if unmapped.
pub(crate) fn axis_index(device: DeviceType, axis: LogicalAxis) -> Option<u8> {
    use DeviceType::*;
    use LogicalAxis::*;

    match device {
        Xbox => Some(match axis {
            LeftX => 0,
            LeftY => 1,
            LeftTrigger => 2,
            RightTrigger => 3,
            RightX => 4,
            RightY => 5,
        }),
        DualShock4 | DualSense => Some(match axis {
            LeftX => 0,
            LeftY => 1,
            RightX => 2,
            LeftTrigger => 3,
            RightTrigger => 4,
            RightY => 5,
        }),
        Other => None,
    }
}

/// Resolve a threshold-style trigger request for one analog trigger.
pub(crate) fn trigger_binding(device: DeviceType, side: AnalogSide) -> TriggerBinding {
    match device {
        DeviceType::Xbox => {
            let axis = match side {
                AnalogSide::Left => 2,
                AnalogSide::Right => 3,
            };
            TriggerBinding::AxisThreshold(axis)
        }
        DeviceType::DualShock4 | DeviceType::DualSense => {
            let index = match side {
                AnalogSide::Left => 7, // L2
                AnalogSide::Right => 8, // R2
            };
            TriggerBinding::Button(index)
        }
        DeviceType::Other => TriggerBinding::Unsupported,
    }
}

/// Whether the family reports a POV hat at all.
pub(crate) fn has_pov(device: DeviceType) -> bool {
    device != DeviceType::Other
}

/// Whether raw axis-index reads are meaningful for the family.
pub(crate) fn supports_raw_axis(device: DeviceType) -> bool {
    device != DeviceType::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_is_total() {
        // Every combination must resolve without panicking; Other resolves
        // to the no-op fallback everywhere.
        for device in DeviceType::ALL {
            for button in LogicalButton::ALL {
                let index = button_index(device, button);
                if device == DeviceType::Other {
                    assert_eq!(index, None);
                }
            }
            for axis in LogicalAxis::ALL {
                let index = axis_index(device, axis);
                if device == DeviceType::Other {
                    assert_eq!(index, None);
                }
            }
            for side in [AnalogSide::Left, AnalogSide::Right] {
                let binding = trigger_binding(device, side);
                if device == DeviceType::Other {
                    assert_eq!(binding, TriggerBinding::Unsupported);
                }
            }
        }
    }

    #[test]
    fn test_xbox_covers_every_control() {
        for button in LogicalButton::ALL {
            assert!(button_index(DeviceType::Xbox, button).is_some());
        }
        for axis in LogicalAxis::ALL {
            assert!(axis_index(DeviceType::Xbox, axis).is_some());
        }
    }

    #[test]
    fn test_playstation_face_buttons() {
        // cross -> A, circle -> B, square -> X, triangle -> Y
        for device in [DeviceType::DualShock4, DeviceType::DualSense] {
            assert_eq!(button_index(device, LogicalButton::A), Some(2));
            assert_eq!(button_index(device, LogicalButton::B), Some(3));
            assert_eq!(button_index(device, LogicalButton::X), Some(1));
            assert_eq!(button_index(device, LogicalButton::Y), Some(4));
        }
    }

    #[test]
    fn test_dualsense_back_is_unmapped() {
        assert_eq!(button_index(DeviceType::DualShock4, LogicalButton::Back), Some(9));
        assert_eq!(button_index(DeviceType::DualSense, LogicalButton::Back), None);
    }

    #[test]
    fn test_trigger_bindings_per_family() {
        assert_eq!(
            trigger_binding(DeviceType::Xbox, AnalogSide::Left),
            TriggerBinding::AxisThreshold(2)
        );
        assert_eq!(
            trigger_binding(DeviceType::Xbox, AnalogSide::Right),
            TriggerBinding::AxisThreshold(3)
        );
        assert_eq!(
            trigger_binding(DeviceType::DualShock4, AnalogSide::Left),
            TriggerBinding::Button(7)
        );
        assert_eq!(
            trigger_binding(DeviceType::DualSense, AnalogSide::Right),
            TriggerBinding::Button(8)
        );
    }

    #[test]
    fn test_axis_layouts_differ_between_families() {
        // Right stick X sits at a different native index per family.
        assert_eq!(axis_index(DeviceType::Xbox, LogicalAxis::RightX), Some(4));
        assert_eq!(axis_index(DeviceType::DualShock4, LogicalAxis::RightX), Some(2));
        assert_eq!(axis_index(DeviceType::DualSense, LogicalAxis::LeftTrigger), Some(3));
    }
}
