//! Scripted in-memory backend for tests and simulation

use std::collections::HashMap;

use parking_lot::Mutex;

use super::HidBackend;

#[derive(Debug, Default)]
struct SimPort {
    connected: bool,
    xbox_class: bool,
    name: String,
    buttons: HashMap<u8, bool>,
    axes: HashMap<u8, f64>,
    povs: HashMap<usize, i32>,
}

/// A [`HidBackend`] whose state is driven entirely by the caller.
///
/// Every setter takes `&self`; interior mutability lets the same backend be
/// shared with a facade while a test scripts inputs between polls.
///
/// ```
/// use std::sync::Arc;
/// use unipad::{PadController, SimBackend};
///
/// let sim = Arc::new(SimBackend::new());
/// sim.connect(0, "Controller (Xbox One For Windows)", true);
/// let pad = PadController::auto(sim.clone(), 0);
///
/// sim.set_button(0, 1, true); // press A
/// assert!(pad.a().value());
/// ```
#[derive(Debug, Default)]
pub struct SimBackend {
    ports: Mutex<HashMap<usize, SimPort>>,
}

impl SimBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a device to `port` with the given reported name and
    /// Xbox-class flag.
    pub fn connect(&self, port: usize, name: &str, xbox_class: bool) {
        let mut ports = self.ports.lock();
        let state = ports.entry(port).or_default();
        state.connected = true;
        state.name = name.to_string();
        state.xbox_class = xbox_class;
    }

    /// Remove the device on `port`; subsequent reads report the
    /// disconnected defaults.
    pub fn disconnect(&self, port: usize) {
        self.ports.lock().remove(&port);
    }

    pub fn set_button(&self, port: usize, index: u8, pressed: bool) {
        let mut ports = self.ports.lock();
        ports.entry(port).or_default().buttons.insert(index, pressed);
    }

    pub fn set_axis(&self, port: usize, index: u8, value: f64) {
        let mut ports = self.ports.lock();
        ports.entry(port).or_default().axes.insert(index, value);
    }

    /// Set a POV angle in degrees, or `-1` for centered.
    pub fn set_pov(&self, port: usize, pov: usize, angle: i32) {
        let mut ports = self.ports.lock();
        ports.entry(port).or_default().povs.insert(pov, angle);
    }
}

impl HidBackend for SimBackend {
    fn is_xbox_class(&self, port: usize) -> bool {
        self.ports
            .lock()
            .get(&port)
            .map(|p| p.connected && p.xbox_class)
            .unwrap_or(false)
    }

    fn device_name(&self, port: usize) -> Option<String> {
        self.ports
            .lock()
            .get(&port)
            .filter(|p| p.connected)
            .map(|p| p.name.clone())
    }

    fn raw_button(&self, port: usize, index: u8) -> bool {
        self.ports
            .lock()
            .get(&port)
            .and_then(|p| p.buttons.get(&index).copied())
            .unwrap_or(false)
    }

    fn raw_axis(&self, port: usize, index: u8) -> f64 {
        self.ports
            .lock()
            .get(&port)
            .and_then(|p| p.axes.get(&index).copied())
            .unwrap_or(0.0)
    }

    fn pov(&self, port: usize, pov: usize) -> i32 {
        self.ports
            .lock()
            .get(&port)
            .and_then(|p| p.povs.get(&pov).copied())
            .unwrap_or(-1)
    }
}
