//! The pad facade: logical controls over one physical port
//!
//! A [`PadController`] is constructed once per port, picks its controller
//! family at construction time and never re-evaluates it, and exposes
//! logical accessors that return [`Trigger`]s or axis doubles. Every
//! accessor is pure dispatch through the control table; the only side effect
//! a trigger ever has is the loop registration performed by its `when_*`
//! methods.
//!
//! Accessors come in pairs: `a()` binds to the process-wide default loop,
//! `a_on(&loop)` binds to an explicit one. Each call builds a fresh trigger
//! with its own edge history - calling `a()` twice gives two independent
//! registrations, it does not deduplicate.

use std::sync::Arc;

use tracing::info;

use crate::backend::HidBackend;
use crate::config::PadConfig;
use crate::control_table::{self, AnalogSide, LogicalAxis, LogicalButton, TriggerBinding};
use crate::detect::{self, DeviceType};
use crate::error::PadError;
use crate::event_loop::{default_loop, EventLoop};
use crate::trigger::Trigger;

/// Default threshold for treating an analog trigger as a digital button.
const TRIGGER_PRESS_THRESHOLD: f64 = 0.5;

/// Facade over one controller port.
///
/// Holds exactly one backend handle and one device family; no state is
/// shared between facades on different ports.
pub struct PadController {
    backend: Arc<dyn HidBackend>,
    port: usize,
    device: DeviceType,
}

impl PadController {
    /// Construct with auto-detection of the controller family.
    ///
    /// Detection runs once, against the platform's current report for the
    /// port. A pad swapped after construction keeps being read with the
    /// detected layout.
    pub fn auto(backend: Arc<dyn HidBackend>, port: usize) -> Self {
        let device = detect::detect(backend.as_ref(), port, false);
        Self::with_device(backend, port, device)
    }

    /// Construct with detection disabled; the port is treated as a generic
    /// joystick and every logical control reads as false / `0.0`.
    pub fn generic(backend: Arc<dyn HidBackend>, port: usize) -> Self {
        let device = detect::detect(backend.as_ref(), port, true);
        Self::with_device(backend, port, device)
    }

    /// Construct with an explicit controller family, skipping detection.
    pub fn with_device(backend: Arc<dyn HidBackend>, port: usize, device: DeviceType) -> Self {
        info!(port, device = %device, "pad controller bound");
        Self {
            backend,
            port,
            device,
        }
    }

    /// Construct from configuration.
    ///
    /// This is the fail-fast surface for configuration mistakes: a device
    /// string outside the supported set yields
    /// [`PadError::UnknownDeviceType`] immediately.
    pub fn from_config(backend: Arc<dyn HidBackend>, config: &PadConfig) -> Result<Self, PadError> {
        match &config.device {
            Some(name) => {
                let device = name.parse::<DeviceType>()?;
                Ok(Self::with_device(backend, config.port, device))
            }
            None if config.disable_auto_detect => Ok(Self::generic(backend, config.port)),
            None => Ok(Self::auto(backend, config.port)),
        }
    }

    /// The family this facade was bound to at construction.
    pub fn device_type(&self) -> DeviceType {
        self.device
    }

    pub fn port(&self) -> usize {
        self.port
    }

    // ---- digital buttons ------------------------------------------------

    /// Trigger for the logical A button (cross on PlayStation pads).
    pub fn a(&self) -> Trigger {
        self.a_on(default_loop())
    }

    /// Same as [`a`](Self::a), bound to an explicit loop.
    pub fn a_on(&self, event_loop: &EventLoop) -> Trigger {
        self.button_trigger(LogicalButton::A, event_loop)
    }

    /// Trigger for the logical B button (circle on PlayStation pads).
    pub fn b(&self) -> Trigger {
        self.b_on(default_loop())
    }

    pub fn b_on(&self, event_loop: &EventLoop) -> Trigger {
        self.button_trigger(LogicalButton::B, event_loop)
    }

    /// Trigger for the logical X button (square on PlayStation pads).
    pub fn x(&self) -> Trigger {
        self.x_on(default_loop())
    }

    pub fn x_on(&self, event_loop: &EventLoop) -> Trigger {
        self.button_trigger(LogicalButton::X, event_loop)
    }

    /// Trigger for the logical Y button (triangle on PlayStation pads).
    pub fn y(&self) -> Trigger {
        self.y_on(default_loop())
    }

    pub fn y_on(&self, event_loop: &EventLoop) -> Trigger {
        self.button_trigger(LogicalButton::Y, event_loop)
    }

    /// Trigger for the left bumper (L1 on PlayStation pads).
    pub fn left_bumper(&self) -> Trigger {
        self.left_bumper_on(default_loop())
    }

    pub fn left_bumper_on(&self, event_loop: &EventLoop) -> Trigger {
        self.button_trigger(LogicalButton::LeftBumper, event_loop)
    }

    /// Trigger for the right bumper (R1 on PlayStation pads).
    pub fn right_bumper(&self) -> Trigger {
        self.right_bumper_on(default_loop())
    }

    pub fn right_bumper_on(&self, event_loop: &EventLoop) -> Trigger {
        self.button_trigger(LogicalButton::RightBumper, event_loop)
    }

    /// Trigger for the back button (share on DualShock 4; unmapped on
    /// DualSense, where it reads constant false).
    pub fn back(&self) -> Trigger {
        self.back_on(default_loop())
    }

    pub fn back_on(&self, event_loop: &EventLoop) -> Trigger {
        self.button_trigger(LogicalButton::Back, event_loop)
    }

    /// Trigger for the start button (options on PlayStation pads).
    pub fn start(&self) -> Trigger {
        self.start_on(default_loop())
    }

    pub fn start_on(&self, event_loop: &EventLoop) -> Trigger {
        self.button_trigger(LogicalButton::Start, event_loop)
    }

    /// Trigger for the left stick click (L3 on PlayStation pads). Stick
    /// accessors are uniformly the click buttons across all families; use
    /// [`axis_magnitude_greater_than`](Self::axis_magnitude_greater_than)
    /// for deflection-based conditions.
    pub fn left_stick(&self) -> Trigger {
        self.left_stick_on(default_loop())
    }

    pub fn left_stick_on(&self, event_loop: &EventLoop) -> Trigger {
        self.button_trigger(LogicalButton::LeftStick, event_loop)
    }

    /// Trigger for the right stick click (R3 on PlayStation pads).
    pub fn right_stick(&self) -> Trigger {
        self.right_stick_on(default_loop())
    }

    pub fn right_stick_on(&self, event_loop: &EventLoop) -> Trigger {
        self.button_trigger(LogicalButton::RightStick, event_loop)
    }

    // ---- analog triggers as digital -------------------------------------

    /// Trigger that is active while the left analog trigger is pressed past
    /// 0.5.
    pub fn left_trigger(&self) -> Trigger {
        self.left_trigger_threshold(TRIGGER_PRESS_THRESHOLD)
    }

    /// Trigger that is active while the left analog trigger exceeds
    /// `threshold` (range `[0, 1]`, 0 = released). On PlayStation pads the
    /// digital L2 button is used and the threshold is ignored.
    pub fn left_trigger_threshold(&self, threshold: f64) -> Trigger {
        self.left_trigger_threshold_on(threshold, default_loop())
    }

    pub fn left_trigger_threshold_on(&self, threshold: f64, event_loop: &EventLoop) -> Trigger {
        self.analog_trigger(AnalogSide::Left, threshold, event_loop)
    }

    /// Trigger that is active while the right analog trigger is pressed past
    /// 0.5.
    pub fn right_trigger(&self) -> Trigger {
        self.right_trigger_threshold(TRIGGER_PRESS_THRESHOLD)
    }

    /// Trigger that is active while the right analog trigger exceeds
    /// `threshold` (range `[0, 1]`, 0 = released). On PlayStation pads the
    /// digital R2 button is used and the threshold is ignored.
    pub fn right_trigger_threshold(&self, threshold: f64) -> Trigger {
        self.right_trigger_threshold_on(threshold, default_loop())
    }

    pub fn right_trigger_threshold_on(&self, threshold: f64, event_loop: &EventLoop) -> Trigger {
        self.analog_trigger(AnalogSide::Right, threshold, event_loop)
    }

    // ---- raw axis reads --------------------------------------------------

    /// Left stick X. Right is positive.
    pub fn left_x(&self) -> f64 {
        self.axis_value(LogicalAxis::LeftX)
    }

    /// Left stick Y. Back (towards the user) is positive.
    pub fn left_y(&self) -> f64 {
        self.axis_value(LogicalAxis::LeftY)
    }

    /// Right stick X. Right is positive.
    pub fn right_x(&self) -> f64 {
        self.axis_value(LogicalAxis::RightX)
    }

    /// Right stick Y. Back (towards the user) is positive.
    pub fn right_y(&self) -> f64 {
        self.axis_value(LogicalAxis::RightY)
    }

    /// Left analog trigger. Xbox pads report `[0, 1]`; PlayStation pads
    /// report the vendor range (resting at -1).
    pub fn left_trigger_axis(&self) -> f64 {
        self.axis_value(LogicalAxis::LeftTrigger)
    }

    /// Right analog trigger. See [`left_trigger_axis`](Self::left_trigger_axis).
    pub fn right_trigger_axis(&self) -> f64 {
        self.axis_value(LogicalAxis::RightTrigger)
    }

    // ---- axis-threshold triggers ----------------------------------------

    /// Trigger that is active while the raw axis at `axis` reads below
    /// `threshold`.
    pub fn axis_less_than(&self, axis: u8, threshold: f64) -> Trigger {
        self.axis_less_than_on(axis, threshold, default_loop())
    }

    pub fn axis_less_than_on(&self, axis: u8, threshold: f64, event_loop: &EventLoop) -> Trigger {
        if !control_table::supports_raw_axis(self.device) {
            return Trigger::never(event_loop);
        }
        let backend = Arc::clone(&self.backend);
        let port = self.port;
        Trigger::new(event_loop, move || backend.raw_axis(port, axis) < threshold)
    }

    /// Trigger that is active while the raw axis at `axis` reads above
    /// `threshold`.
    pub fn axis_greater_than(&self, axis: u8, threshold: f64) -> Trigger {
        self.axis_greater_than_on(axis, threshold, default_loop())
    }

    pub fn axis_greater_than_on(&self, axis: u8, threshold: f64, event_loop: &EventLoop) -> Trigger {
        if !control_table::supports_raw_axis(self.device) {
            return Trigger::never(event_loop);
        }
        let backend = Arc::clone(&self.backend);
        let port = self.port;
        Trigger::new(event_loop, move || backend.raw_axis(port, axis) > threshold)
    }

    /// Trigger that is active while the raw axis magnitude at `axis`
    /// exceeds `threshold`.
    pub fn axis_magnitude_greater_than(&self, axis: u8, threshold: f64) -> Trigger {
        self.axis_magnitude_greater_than_on(axis, threshold, default_loop())
    }

    pub fn axis_magnitude_greater_than_on(
        &self,
        axis: u8,
        threshold: f64,
        event_loop: &EventLoop,
    ) -> Trigger {
        if !control_table::supports_raw_axis(self.device) {
            return Trigger::never(event_loop);
        }
        let backend = Arc::clone(&self.backend);
        let port = self.port;
        Trigger::new(event_loop, move || {
            backend.raw_axis(port, axis).abs() > threshold
        })
    }

    // ---- POV -------------------------------------------------------------

    /// Trigger for one angle of one POV hat.
    ///
    /// Angles start at 0 in the up direction and increase clockwise in 45
    /// degree steps (right is 90, upper-left is 315); `-1` matches the
    /// centered / not-pressed position.
    pub fn pov(&self, pov: usize, angle: i32, event_loop: &EventLoop) -> Trigger {
        if !control_table::has_pov(self.device) {
            return Trigger::never(event_loop);
        }
        let backend = Arc::clone(&self.backend);
        let port = self.port;
        Trigger::new(event_loop, move || backend.pov(port, pov) == angle)
    }

    /// Trigger for `angle` on the default (index 0) POV, bound to the
    /// default loop.
    pub fn pov_at(&self, angle: i32) -> Trigger {
        self.pov(0, angle, default_loop())
    }

    pub fn pov_up(&self) -> Trigger {
        self.pov_at(0)
    }

    pub fn pov_up_right(&self) -> Trigger {
        self.pov_at(45)
    }

    pub fn pov_right(&self) -> Trigger {
        self.pov_at(90)
    }

    pub fn pov_down_right(&self) -> Trigger {
        self.pov_at(135)
    }

    pub fn pov_down(&self) -> Trigger {
        self.pov_at(180)
    }

    pub fn pov_down_left(&self) -> Trigger {
        self.pov_at(225)
    }

    pub fn pov_left(&self) -> Trigger {
        self.pov_at(270)
    }

    pub fn pov_up_left(&self) -> Trigger {
        self.pov_at(315)
    }

    /// Trigger for the centered / not-pressed position of the default POV.
    pub fn pov_center(&self) -> Trigger {
        self.pov_at(-1)
    }

    // ---- dispatch helpers ------------------------------------------------

    fn button_trigger(&self, button: LogicalButton, event_loop: &EventLoop) -> Trigger {
        match control_table::button_index(self.device, button) {
            Some(index) => {
                let backend = Arc::clone(&self.backend);
                let port = self.port;
                Trigger::new(event_loop, move || backend.raw_button(port, index))
            }
            None => Trigger::never(event_loop),
        }
    }

    fn analog_trigger(&self, side: AnalogSide, threshold: f64, event_loop: &EventLoop) -> Trigger {
        let backend = Arc::clone(&self.backend);
        let port = self.port;
        match control_table::trigger_binding(self.device, side) {
            TriggerBinding::AxisThreshold(axis) => {
                Trigger::new(event_loop, move || backend.raw_axis(port, axis) > threshold)
            }
            TriggerBinding::Button(index) => {
                Trigger::new(event_loop, move || backend.raw_button(port, index))
            }
            TriggerBinding::Unsupported => Trigger::never(event_loop),
        }
    }

    fn axis_value(&self, axis: LogicalAxis) -> f64 {
        match control_table::axis_index(self.device, axis) {
            Some(index) => self.backend.raw_axis(self.port, index),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::sim::SimBackend;
    use serial_test::serial;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn xbox_pad() -> (Arc<SimBackend>, PadController) {
        let sim = Arc::new(SimBackend::new());
        sim.connect(0, "Controller (Xbox One For Windows)", true);
        let pad = PadController::auto(sim.clone(), 0);
        (sim, pad)
    }

    fn ds4_pad() -> (Arc<SimBackend>, PadController) {
        let sim = Arc::new(SimBackend::new());
        sim.connect(0, "Dualshock 4 Wireless", false);
        let pad = PadController::auto(sim.clone(), 0);
        (sim, pad)
    }

    fn counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let writer = Arc::clone(&count);
        (count, move || {
            writer.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_auto_detection_binds_family() {
        let (_, xbox) = xbox_pad();
        assert_eq!(xbox.device_type(), DeviceType::Xbox);

        let (_, ds4) = ds4_pad();
        assert_eq!(ds4.device_type(), DeviceType::DualShock4);
    }

    #[test]
    fn test_generic_skips_detection() {
        let sim = Arc::new(SimBackend::new());
        sim.connect(0, "Controller (Xbox One For Windows)", true);
        let pad = PadController::generic(sim, 0);
        assert_eq!(pad.device_type(), DeviceType::Other);
    }

    #[test]
    fn test_xbox_button_dispatch() {
        let (sim, pad) = xbox_pad();
        let event_loop = EventLoop::new();
        let a = pad.a_on(&event_loop);

        assert!(!a.value());
        sim.set_button(0, 1, true);
        assert!(a.value());

        // B sits at native index 2
        let b = pad.b_on(&event_loop);
        assert!(!b.value());
        sim.set_button(0, 2, true);
        assert!(b.value());
    }

    #[test]
    fn test_ds4_face_buttons_follow_position() {
        let (sim, pad) = ds4_pad();
        let event_loop = EventLoop::new();

        // cross (native 2) is the logical A
        sim.set_button(0, 2, true);
        assert!(pad.a_on(&event_loop).value());
        assert!(!pad.b_on(&event_loop).value());

        // square (native 1) is the logical X
        sim.set_button(0, 1, true);
        assert!(pad.x_on(&event_loop).value());
    }

    #[test]
    fn test_other_pad_is_inert() {
        let sim = Arc::new(SimBackend::new());
        sim.connect(0, "Generic USB Joystick", false);
        // Press every plausible native control; none may leak through.
        for index in 1..=12 {
            sim.set_button(0, index, true);
        }
        for index in 0..6 {
            sim.set_axis(0, index, 1.0);
        }
        sim.set_pov(0, 0, 0);

        let pad = PadController::auto(sim, 0);
        assert_eq!(pad.device_type(), DeviceType::Other);

        let event_loop = EventLoop::new();
        let triggers = [
            pad.a_on(&event_loop),
            pad.b_on(&event_loop),
            pad.x_on(&event_loop),
            pad.y_on(&event_loop),
            pad.left_bumper_on(&event_loop),
            pad.right_bumper_on(&event_loop),
            pad.back_on(&event_loop),
            pad.start_on(&event_loop),
            pad.left_stick_on(&event_loop),
            pad.right_stick_on(&event_loop),
            pad.left_trigger_threshold_on(0.1, &event_loop),
            pad.right_trigger_threshold_on(0.1, &event_loop),
            pad.axis_greater_than_on(0, 0.5, &event_loop),
            pad.axis_less_than_on(0, 0.5, &event_loop),
            pad.axis_magnitude_greater_than_on(0, 0.5, &event_loop),
            pad.pov(0, 0, &event_loop),
        ];
        for trigger in &triggers {
            assert!(!trigger.value());
        }

        assert_eq!(pad.left_x(), 0.0);
        assert_eq!(pad.left_y(), 0.0);
        assert_eq!(pad.right_x(), 0.0);
        assert_eq!(pad.right_y(), 0.0);
        assert_eq!(pad.left_trigger_axis(), 0.0);
        assert_eq!(pad.right_trigger_axis(), 0.0);
    }

    #[test]
    fn test_every_axis_read_is_finite() {
        for device in DeviceType::ALL {
            let sim = Arc::new(SimBackend::new());
            sim.connect(0, "pad", false);
            let pad = PadController::with_device(sim, 0, device);
            for value in [
                pad.left_x(),
                pad.left_y(),
                pad.right_x(),
                pad.right_y(),
                pad.left_trigger_axis(),
                pad.right_trigger_axis(),
            ] {
                assert!(value.is_finite());
            }
        }
    }

    #[test]
    fn test_axis_reads_follow_family_layout() {
        let (sim, xbox) = xbox_pad();
        sim.set_axis(0, 4, 0.25); // Xbox right stick X
        assert_eq!(xbox.right_x(), 0.25);

        let (sim, ds4) = ds4_pad();
        sim.set_axis(0, 2, -0.5); // DS4 right stick X
        assert_eq!(ds4.right_x(), -0.5);
        sim.set_axis(0, 3, 0.75); // DS4 L2 axis
        assert_eq!(ds4.left_trigger_axis(), 0.75);
    }

    #[test]
    fn test_xbox_trigger_threshold() {
        let (sim, pad) = xbox_pad();
        let event_loop = EventLoop::new();
        let trigger = pad.left_trigger_threshold_on(0.6, &event_loop);

        sim.set_axis(0, 2, 0.5);
        assert!(!trigger.value());
        sim.set_axis(0, 2, 0.7);
        assert!(trigger.value());
    }

    #[test]
    fn test_ds4_trigger_uses_digital_button() {
        let (sim, pad) = ds4_pad();
        let event_loop = EventLoop::new();
        let trigger = pad.right_trigger_threshold_on(0.9, &event_loop);

        // Axis movement alone does nothing; the digital R2 button decides.
        sim.set_axis(0, 4, 1.0);
        assert!(!trigger.value());
        sim.set_button(0, 8, true);
        assert!(trigger.value());
    }

    #[test]
    fn test_dualsense_back_reads_false() {
        let sim = Arc::new(SimBackend::new());
        sim.connect(0, "Wireless DualSense Controller", false);
        for index in 1..=14 {
            sim.set_button(0, index, true);
        }
        let pad = PadController::auto(sim, 0);
        let event_loop = EventLoop::new();
        assert!(!pad.back_on(&event_loop).value());
        assert!(pad.start_on(&event_loop).value());
    }

    #[test]
    fn test_pov_angles() {
        let (sim, pad) = xbox_pad();
        let event_loop = EventLoop::new();
        let up = pad.pov(0, 0, &event_loop);
        let right = pad.pov(0, 90, &event_loop);
        let center = pad.pov(0, -1, &event_loop);

        assert!(center.value());
        sim.set_pov(0, 0, 0);
        assert!(up.value());
        assert!(!right.value());
        sim.set_pov(0, 0, 90);
        assert!(right.value());
        assert!(!up.value());
        assert!(!center.value());
    }

    #[test]
    #[serial]
    fn test_pov_helpers_match_primitive() {
        default_loop().clear();
        let (sim, pad) = xbox_pad();

        sim.set_pov(0, 0, 0);
        assert!(pad.pov_up().value());
        assert_eq!(pad.pov_up().value(), pad.pov(0, 0, default_loop()).value());
        assert!(!pad.pov_right().value());

        sim.set_pov(0, 0, 90);
        assert!(pad.pov_right().value());
        assert_eq!(pad.pov_right().value(), pad.pov(0, 90, default_loop()).value());

        sim.set_pov(0, 0, -1);
        assert!(pad.pov_center().value());
        default_loop().clear();
    }

    #[test]
    #[serial]
    fn test_default_loop_registration_fires() {
        default_loop().clear();
        let (sim, pad) = xbox_pad();
        let (count, callback) = counter();
        pad.a().when_active(callback);

        default_loop().poll();
        sim.set_button(0, 1, true);
        default_loop().poll();
        default_loop().poll();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        default_loop().clear();
    }

    #[test]
    fn test_two_accessor_calls_are_independent() {
        let (sim, pad) = xbox_pad();
        let event_loop = EventLoop::new();

        let (first, on_first) = counter();
        let first_trigger = pad.a_on(&event_loop);
        let token = first_trigger.when_active(on_first);

        let (second, on_second) = counter();
        pad.a_on(&event_loop).when_active(on_second);

        // Unbinding the first registration must not disturb the second's
        // edge history.
        event_loop.unbind(token);

        sim.set_button(0, 1, true);
        event_loop.poll();
        sim.set_button(0, 1, false);
        event_loop.poll();
        sim.set_button(0, 1, true);
        event_loop.poll();

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_from_config_rejects_unknown_device() {
        let sim = Arc::new(SimBackend::new());
        let config = PadConfig {
            port: 0,
            device: Some("wiimote".to_string()),
            disable_auto_detect: false,
        };
        let result = PadController::from_config(sim, &config);
        assert!(matches!(result, Err(PadError::UnknownDeviceType(_))));
    }

    #[test]
    fn test_from_config_variants() {
        let sim = Arc::new(SimBackend::new());
        sim.connect(1, "Wireless DualSense Controller", false);

        let explicit = PadConfig {
            port: 1,
            device: Some("ds4".to_string()),
            disable_auto_detect: false,
        };
        let pad = PadController::from_config(sim.clone(), &explicit).unwrap();
        assert_eq!(pad.device_type(), DeviceType::DualShock4);

        let detected = PadConfig {
            port: 1,
            device: None,
            disable_auto_detect: false,
        };
        let pad = PadController::from_config(sim.clone(), &detected).unwrap();
        assert_eq!(pad.device_type(), DeviceType::DualSense);

        let disabled = PadConfig {
            port: 1,
            device: None,
            disable_auto_detect: true,
        };
        let pad = PadController::from_config(sim, &disabled).unwrap();
        assert_eq!(pad.device_type(), DeviceType::Other);
    }
}
