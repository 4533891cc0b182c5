//! gilrs-backed HID backend
//!
//! gilrs is not Send-safe, so the [`GilrsBackend`] owns a dedicated polling
//! thread that pumps the event queue and publishes a [`PortSnapshot`] per
//! port behind a shared lock. Readers never touch gilrs directly; they see
//! whatever the last pump published, which keeps [`HidBackend`] calls
//! non-blocking and thread-safe.
//!
//! Ports are assigned in discovery order: the first pad gilrs reports gets
//! port 0 and keeps it for the lifetime of the backend, even across a
//! disconnect.
//!
//! gilrs reports positional buttons (`South`, `East`, ...) and normalized
//! axes; snapshots translate those back into the native per-family index
//! conventions, picking the PlayStation table when the device name says so
//! and the Xbox-style table otherwise.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use gilrs::{Axis, Button, Gamepad, Gilrs};
use parking_lot::RwLock;
use tracing::{info, warn};

use crate::backend::HidBackend;
use crate::error::PadError;

/// Pump interval of the polling thread.
const PUMP_INTERVAL: Duration = Duration::from_millis(4);

/// Highest native button index any family uses, plus the unused slot 0.
const BUTTON_SLOTS: usize = 13;
const AXIS_SLOTS: usize = 6;

/// Last published state of one port.
#[derive(Debug, Clone)]
struct PortSnapshot {
    connected: bool,
    name: String,
    xbox_class: bool,
    buttons: [bool; BUTTON_SLOTS],
    axes: [f64; AXIS_SLOTS],
    pov: i32,
}

impl Default for PortSnapshot {
    fn default() -> Self {
        Self {
            connected: false,
            name: String::new(),
            xbox_class: false,
            buttons: [false; BUTTON_SLOTS],
            axes: [0.0; AXIS_SLOTS],
            pov: -1,
        }
    }
}

/// [`HidBackend`] reading real pads through gilrs.
pub struct GilrsBackend {
    snapshots: Arc<RwLock<Vec<PortSnapshot>>>,
    shutdown_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl GilrsBackend {
    /// Initialize gilrs on a dedicated thread and start pumping.
    ///
    /// Fails with [`PadError::BackendUnavailable`] when the platform's
    /// gamepad subsystem cannot be opened (missing libraries, permissions).
    pub fn start() -> Result<Self, PadError> {
        let snapshots = Arc::new(RwLock::new(Vec::new()));
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<(), String>>();

        let published = Arc::clone(&snapshots);
        let worker = std::thread::spawn(move || {
            // gilrs must be created on the thread that polls it.
            let gilrs = match Gilrs::new() {
                Ok(g) => {
                    let _ = ready_tx.send(Ok(()));
                    g
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(format!("{e}")));
                    return;
                }
            };
            info!("gilrs initialized, pad polling started");
            pump_loop(gilrs, published, shutdown_rx);
        });

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self {
                snapshots,
                shutdown_tx: Some(shutdown_tx),
                worker: Some(worker),
            }),
            Ok(Err(message)) => Err(PadError::BackendUnavailable(message)),
            Err(_) => Err(PadError::BackendUnavailable(
                "polling thread exited before reporting readiness".to_string(),
            )),
        }
    }

    fn read_port<T>(&self, port: usize, read: impl FnOnce(&PortSnapshot) -> T, fallback: T) -> T {
        let snapshots = self.snapshots.read();
        match snapshots.get(port) {
            Some(snapshot) if snapshot.connected => read(snapshot),
            _ => fallback,
        }
    }
}

impl HidBackend for GilrsBackend {
    fn is_xbox_class(&self, port: usize) -> bool {
        self.read_port(port, |s| s.xbox_class, false)
    }

    fn device_name(&self, port: usize) -> Option<String> {
        self.read_port(port, |s| Some(s.name.clone()), None)
    }

    fn raw_button(&self, port: usize, index: u8) -> bool {
        self.read_port(
            port,
            |s| s.buttons.get(index as usize).copied().unwrap_or(false),
            false,
        )
    }

    fn raw_axis(&self, port: usize, index: u8) -> f64 {
        self.read_port(
            port,
            |s| s.axes.get(index as usize).copied().unwrap_or(0.0),
            0.0,
        )
    }

    fn pov(&self, port: usize, pov: usize) -> i32 {
        // gilrs exposes a single hat per pad.
        if pov != 0 {
            return -1;
        }
        self.read_port(port, |s| s.pov, -1)
    }
}

impl Drop for GilrsBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("pad polling thread panicked during shutdown");
            }
        }
    }
}

/// Pump gilrs events and republish snapshots until shutdown.
fn pump_loop(mut gilrs: Gilrs, published: Arc<RwLock<Vec<PortSnapshot>>>, shutdown_rx: Receiver<()>) {
    // Port assignment is discovery order; a pad keeps its slot forever.
    let mut ports: Vec<gilrs::GamepadId> = Vec::new();

    loop {
        match shutdown_rx.try_recv() {
            Ok(()) | Err(TryRecvError::Disconnected) => {
                info!("pad polling thread shutting down");
                return;
            }
            Err(TryRecvError::Empty) => {}
        }

        // Drain the queue; the snapshot below reads the resulting state, so
        // the event payloads themselves are not needed.
        while let Some(event) = gilrs.next_event() {
            if !ports.contains(&event.id) {
                let name = gilrs.gamepad(event.id).name().to_string();
                info!(port = ports.len(), name = %name, "pad discovered");
                ports.push(event.id);
            }
        }
        for (id, _) in gilrs.gamepads() {
            if !ports.contains(&id) {
                info!(port = ports.len(), name = %gilrs.gamepad(id).name(), "pad discovered");
                ports.push(id);
            }
        }

        let fresh: Vec<PortSnapshot> = ports
            .iter()
            .map(|&id| snapshot(gilrs.gamepad(id)))
            .collect();
        *published.write() = fresh;

        std::thread::sleep(PUMP_INTERVAL);
    }
}

/// Native 1-based button indices in the Xbox-style convention.
const XBOX_BUTTONS: [(u8, Button); 10] = [
    (1, Button::South),
    (2, Button::East),
    (3, Button::West),
    (4, Button::North),
    (5, Button::LeftTrigger),
    (6, Button::RightTrigger),
    (7, Button::Select),
    (8, Button::Start),
    (9, Button::LeftThumb),
    (10, Button::RightThumb),
];

/// Native 1-based button indices in the PlayStation convention.
const PLAYSTATION_BUTTONS: [(u8, Button); 12] = [
    (1, Button::West),  // square
    (2, Button::South), // cross
    (3, Button::East),  // circle
    (4, Button::North), // triangle
    (5, Button::LeftTrigger),
    (6, Button::RightTrigger),
    (7, Button::LeftTrigger2),
    (8, Button::RightTrigger2),
    (9, Button::Select),
    (10, Button::Start),
    (11, Button::LeftThumb),
    (12, Button::RightThumb),
];

fn snapshot(gamepad: Gamepad<'_>) -> PortSnapshot {
    if !gamepad.is_connected() {
        let mut snapshot = PortSnapshot::default();
        snapshot.name = gamepad.name().to_string();
        return snapshot;
    }

    let name = gamepad.name().to_string();
    let xbox_class = is_xbox_class_name(&name) || gamepad.vendor_id() == Some(0x045e);
    let playstation = !xbox_class && is_playstation_name(&name);

    let mut buttons = [false; BUTTON_SLOTS];
    let table: &[(u8, Button)] = if playstation {
        &PLAYSTATION_BUTTONS
    } else {
        &XBOX_BUTTONS
    };
    for &(index, button) in table {
        buttons[index as usize] = gamepad.is_pressed(button);
    }

    // gilrs sticks are +Y up; the HID convention is +Y back.
    let left_x = f64::from(gamepad.value(Axis::LeftStickX));
    let left_y = -f64::from(gamepad.value(Axis::LeftStickY));
    let right_x = f64::from(gamepad.value(Axis::RightStickX));
    let right_y = -f64::from(gamepad.value(Axis::RightStickY));
    let left_trigger = trigger_value(&gamepad, Button::LeftTrigger2, Axis::LeftZ);
    let right_trigger = trigger_value(&gamepad, Button::RightTrigger2, Axis::RightZ);

    let axes = if playstation {
        [left_x, left_y, right_x, left_trigger, right_trigger, right_y]
    } else {
        [left_x, left_y, left_trigger, right_trigger, right_x, right_y]
    };

    let pov = dpad_angle(
        gamepad.is_pressed(Button::DPadUp),
        gamepad.is_pressed(Button::DPadRight),
        gamepad.is_pressed(Button::DPadDown),
        gamepad.is_pressed(Button::DPadLeft),
    );

    PortSnapshot {
        connected: true,
        name,
        xbox_class,
        buttons,
        axes,
        pov,
    }
}

/// Analog trigger in `[0, 1]`, preferring the button's pressure data over
/// the Z axis (some drivers report only one of the two).
fn trigger_value(gamepad: &Gamepad<'_>, button: Button, axis: Axis) -> f64 {
    let raw = match gamepad.button_data(button) {
        Some(data) => f64::from(data.value()),
        None => f64::from(gamepad.value(axis)),
    };
    raw.clamp(0.0, 1.0)
}

fn is_xbox_class_name(name: &str) -> bool {
    let name = name.to_lowercase();
    name.contains("xbox") || name.contains("x-box") || name.contains("xinput")
}

fn is_playstation_name(name: &str) -> bool {
    let name = name.to_lowercase();
    name.contains("dualsense")
        || name.contains("dualshock")
        || name.contains("sony")
        || name.contains("ps4")
        || name.contains("ps5")
}

/// Fold the four d-pad buttons into a POV angle: 0 is up, clockwise in 45
/// degree steps, `-1` when centered. Opposite directions cancel.
fn dpad_angle(up: bool, right: bool, down: bool, left: bool) -> i32 {
    let vertical = i32::from(up) - i32::from(down);
    let horizontal = i32::from(right) - i32::from(left);
    match (vertical, horizontal) {
        (1, 0) => 0,
        (1, 1) => 45,
        (0, 1) => 90,
        (-1, 1) => 135,
        (-1, 0) => 180,
        (-1, -1) => 225,
        (0, -1) => 270,
        (1, -1) => 315,
        _ => -1,
    }
}
