//! unipad - one gamepad API across controller families
//!
//! Binds a [`PadController`] to a port, detects whether an Xbox-style pad,
//! a DualShock 4 or a DualSense is plugged in, and exposes logical controls
//! (`a()`, `left_bumper()`, `pov_up()`, ...) that resolve to the right
//! native button or axis for that family. Unrecognized pads degrade to
//! constant false / `0.0` instead of erroring.
//!
//! Accessors hand out [`Trigger`]s: edge-aware conditions whose callbacks
//! run inside an [`EventLoop`] tick. The host owns the polling cadence and
//! calls [`EventLoop::poll`] (or polls [`default_loop`]) once per control
//! cycle.
//!
//! ```no_run
//! use std::sync::Arc;
//! use unipad::{default_loop, GilrsBackend, PadController};
//!
//! # fn main() -> anyhow::Result<()> {
//! let backend = Arc::new(GilrsBackend::start()?);
//! let pad = PadController::auto(backend, 0);
//!
//! pad.a().when_active(|| println!("jump"));
//! pad.left_trigger().while_active_continuous(|| println!("brake"));
//!
//! loop {
//!     default_loop().poll();
//!     std::thread::sleep(std::time::Duration::from_millis(20));
//! }
//! # }
//! ```

pub mod backend;
pub mod config;
mod control_table;
pub mod controller;
mod detect;
pub mod error;
pub mod event_loop;
pub mod trigger;

pub use backend::gilrs_provider::GilrsBackend;
pub use backend::sim::SimBackend;
pub use backend::HidBackend;
pub use config::PadConfig;
pub use controller::PadController;
pub use detect::DeviceType;
pub use error::PadError;
pub use event_loop::{default_loop, BindingToken, EventLoop};
pub use trigger::{Edge, EdgeDetector, Trigger};
