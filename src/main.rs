//! TaapIO - Thermal camera streaming daemon
//!
//! Streams MLX90640 temperature frames over standard output as
//! length-prefixed binary messages. The only command-line parameter is the
//! target frame rate in frames per second (default 2); all diagnostics go
//! to standard error so the data stream stays clean.

use std::env;
use std::io;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use taap_io::camera;
use taap_io::error::{Error, Result};
use taap_io::rate::RefreshRate;
use taap_io::streamer::Streamer;

/// Frame rate used when no argument is given, in frames per second.
const DEFAULT_FPS: u32 = 2;

/// Parse the optional positional frame-rate argument.
fn parse_rate_arg(arg: Option<&str>) -> Result<RefreshRate> {
    let fps = match arg {
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| Error::InvalidParameter(format!("framerate must be an integer, got {:?}", raw)))?,
        None => DEFAULT_FPS,
    };
    RefreshRate::from_fps(fps)
}

fn run() -> Result<()> {
    let arg = env::args().nth(1);
    let rate = parse_rate_arg(arg.as_deref())?;

    log::info!(
        "TaapIO v{} starting ({} fps)",
        env!("CARGO_PKG_VERSION"),
        rate.fps()
    );

    let camera = camera::create_camera()?;

    // SIGINT/SIGTERM clear the flag; the loop notices at the next cycle
    // boundary and the process exits cleanly with status 0.
    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Other(format!("error setting signal handler: {}", e)))?;

    let stdout = io::stdout();
    let sink = stdout.lock();
    let mut streamer = Streamer::new(camera, sink, rate);
    streamer.run(&running)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        process::exit(1);
    }
}
