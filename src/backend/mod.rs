//! Platform backends: raw per-port HID access
//!
//! The facade never talks to hardware directly. Everything it needs from the
//! host platform goes through [`HidBackend`]: device enumeration for
//! auto-detection, plus raw indexed button/axis/POV reads. Two
//! implementations ship with the crate:
//!
//! - [`sim::SimBackend`] - scripted in-memory state, used by the test suite
//!   and for host-side simulation.
//! - [`gilrs_provider::GilrsBackend`] - live gamepads via the `gilrs`
//!   library, polled on a dedicated thread.

pub mod gilrs_provider;
pub mod sim;

/// Synchronous, bounded access to the per-port HID state.
///
/// Button indices are 1-based (index 0 is unused, matching driver-station
/// convention); axis indices are 0-based. Queries against ports with no
/// connected device must report `false` / `0.0` / `-1` / `None` rather than
/// failing - absence of a device is a normal condition here, not an error.
pub trait HidBackend: Send + Sync {
    /// Vendor-reported "Xbox-class pad" flag for the port.
    fn is_xbox_class(&self, port: usize) -> bool;

    /// Free-text device name, or `None` when nothing is connected.
    fn device_name(&self, port: usize) -> Option<String>;

    /// Raw button state by 1-based native index.
    fn raw_button(&self, port: usize, index: u8) -> bool;

    /// Raw axis value by 0-based native index.
    fn raw_axis(&self, port: usize, index: u8) -> f64;

    /// POV angle in degrees (0 = up, clockwise-increasing in 45 degree
    /// steps), or `-1` when centered / not pressed.
    fn pov(&self, port: usize, pov: usize) -> i32;
}
