//! Pad diagnostics tool
//!
//! Binds a facade to one port, prints the detected family, then polls the
//! default loop and reports logical control edges as they happen. Useful
//! for checking which family a pad detects as and whether the logical
//! mapping lands on the controls you expect. Stop with Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use unipad::{default_loop, GilrsBackend, PadConfig, PadController};

/// Pad diagnostics - watch logical controls of one gamepad port
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to bind (discovery order, first pad is 0)
    #[arg(short, long, default_value = "0")]
    port: usize,

    /// Force a controller family (xbox, dualshock4, dualsense, other)
    /// instead of auto-detecting
    #[arg(short, long)]
    device: Option<String>,

    /// Skip auto-detection and use the generic layout
    #[arg(long)]
    no_detect: bool,

    /// Polling frequency in Hz
    #[arg(long, default_value = "50")]
    hz: u64,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    info!("Starting pad diagnostics on port {}", args.port);

    let backend = Arc::new(GilrsBackend::start()?);
    // Give discovery a moment before detection reads the port.
    std::thread::sleep(Duration::from_millis(500));

    let config = PadConfig {
        port: args.port,
        device: args.device.clone(),
        disable_auto_detect: args.no_detect,
    };
    let pad = PadController::from_config(backend, &config)?;

    println!(
        "\n{} port {} detected as {}\n",
        "pad:".bold(),
        pad.port(),
        pad.device_type().to_string().cyan().bold()
    );
    println!("Press buttons and move the d-pad; Ctrl-C to quit.\n");

    watch_button(&pad.a(), "A");
    watch_button(&pad.b(), "B");
    watch_button(&pad.x(), "X");
    watch_button(&pad.y(), "Y");
    watch_button(&pad.left_bumper(), "left bumper");
    watch_button(&pad.right_bumper(), "right bumper");
    watch_button(&pad.back(), "back");
    watch_button(&pad.start(), "start");
    watch_button(&pad.left_stick(), "left stick");
    watch_button(&pad.right_stick(), "right stick");
    watch_button(&pad.left_trigger(), "left trigger");
    watch_button(&pad.right_trigger(), "right trigger");

    for (trigger, label) in [
        (pad.pov_up(), "up"),
        (pad.pov_up_right(), "up-right"),
        (pad.pov_right(), "right"),
        (pad.pov_down_right(), "down-right"),
        (pad.pov_down(), "down"),
        (pad.pov_down_left(), "down-left"),
        (pad.pov_left(), "left"),
        (pad.pov_up_left(), "up-left"),
    ] {
        let name = label.to_string();
        trigger.when_active(move || println!("  {} {}", "pov".yellow(), name.bold()));
    }

    let report_axes = move || {
        let values = [
            ("lx", pad.left_x()),
            ("ly", pad.left_y()),
            ("rx", pad.right_x()),
            ("ry", pad.right_y()),
            ("lt", pad.left_trigger_axis()),
            ("rt", pad.right_trigger_axis()),
        ];
        let moving: Vec<String> = values
            .iter()
            .filter(|(_, v)| v.abs() > 0.2)
            .map(|(label, v)| format!("{label}={v:+.2}"))
            .collect();
        if !moving.is_empty() {
            println!("  {} {}", "axis".blue(), moving.join(" "));
        }
    };

    let period = Duration::from_millis(1000 / args.hz.max(1));
    loop {
        default_loop().poll();
        report_axes();
        std::thread::sleep(period);
    }
}

fn watch_button(trigger: &unipad::Trigger, label: &str) {
    let pressed = label.to_string();
    trigger.when_active(move || println!("  {} {}", "press".green(), pressed.bold()));
    let released = label.to_string();
    trigger.when_inactive(move || println!("  {} {}", "release".red(), released.dimmed()));
}

fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();
}
