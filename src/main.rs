//! AVSN bridge: main entry point.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                    │
//! │                                                             │
//! │  SerialPortLines   MjpegStream    HeadlessDisplay           │
//! │  (LineSource)      (FrameSource)  (DisplaySurface)          │
//! │  SystemClock       LogEventSink                             │
//! │  (Clock)           (EventSink)                              │
//! │                                                             │
//! │  ──────────────── Port Trait Boundary ────────────────      │
//! │                                                             │
//! │   avsn watch: serial thread ─▶ slot ─▶ Viewer               │
//! │   avsn log:   LoggerService ─▶ CsvEventLog                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info, warn};

use avsn::adapters::display::{HeadlessDisplay, key_channel, spawn_stdin_keys};
use avsn::adapters::log_sink::LogEventSink;
use avsn::adapters::mjpeg::{MjpegStream, NoCamera};
use avsn::adapters::serial_port::{ReaderLines, SerialPortLines};
use avsn::adapters::time::SystemClock;
use avsn::app::events::AppEvent;
use avsn::app::logger::LoggerService;
use avsn::app::ports::{EventSink, FrameSource, LineSource};
use avsn::app::viewer::{QUIT_KEY, Viewer};
use avsn::config::SystemConfig;
use avsn::event_log::CsvEventLog;
use avsn::serial::{self, SerialEventSource, SharedChannel};
use avsn::slot::LatestEventSlot;

// ── CLI ───────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "avsn", version, about = "AVSN intrusion sensor bridge")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Serial device (overrides the config file)
    #[arg(long, global = true)]
    port: Option<String>,

    /// Baud rate (overrides the config file)
    #[arg(long, global = true)]
    baud: Option<u32>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Live camera feed with alert overlay and snapshot evidence
    Watch {
        /// MJPEG stream address
        #[arg(long)]
        camera_url: Option<String>,
        /// Run without connecting to the camera
        #[arg(long)]
        no_camera: bool,
        /// Mirror displayed frames to this JPEG
        #[arg(long)]
        preview: Option<PathBuf>,
        /// Read serial lines from a recorded capture instead of the device
        #[arg(long)]
        replay: Option<PathBuf>,
    },
    /// Durable CSV log of trigger events
    Log {
        /// CSV log file
        #[arg(long)]
        log_path: Option<PathBuf>,
        /// Replay a recorded capture instead of opening the serial device
        #[arg(long)]
        replay: Option<PathBuf>,
    },
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => SystemConfig::load(path).context("loading configuration")?,
        None => SystemConfig::default(),
    };
    if let Some(port) = cli.port {
        config.serial_port = port;
    }
    if let Some(baud) = cli.baud {
        config.baud_rate = baud;
    }

    info!("--- AVSN SECURITY SYSTEM v{} INITIALIZING ---", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Watch {
            camera_url,
            no_camera,
            preview,
            replay,
        } => {
            if let Some(url) = camera_url {
                config.camera_url = url;
            }
            if preview.is_some() {
                config.preview_path = preview;
            }
            config.validate().context("invalid configuration")?;
            run_watch(&config, no_camera, replay)
        }
        Command::Log { log_path, replay } => {
            if let Some(path) = log_path {
                config.log_path = path;
            }
            config.validate().context("invalid configuration")?;
            match replay {
                Some(file) => replay_log(&config, file),
                None => run_logger(&config),
            }
        }
    }
}

/// The one fatal startup failure: the serial device cannot be opened.
fn open_serial(config: &SystemConfig) -> Result<SerialPortLines> {
    let port = SerialPortLines::open(
        &config.serial_port,
        config.baud_rate,
        Duration::from_millis(config.read_timeout_ms),
    )
    .inspect_err(|e| {
        error!("Could not connect to the sensor: {e}");
        error!("Check the cable and the port name.");
    })?;

    // The board resets when the port opens.
    thread::sleep(Duration::from_millis(config.settle_delay_ms));
    info!("[SUCCESS] Connected to sensor on {}", port.name());
    Ok(port)
}

// ── watch ─────────────────────────────────────────────────────

fn run_watch(config: &SystemConfig, no_camera: bool, replay: Option<PathBuf>) -> Result<()> {
    let lines: Box<dyn LineSource + Send> = match replay {
        Some(file) => Box::new(open_replay(&file)?),
        None => Box::new(open_serial(config)?),
    };
    let channel = SharedChannel::new(lines);
    let idle = Duration::from_millis(config.idle_poll_ms);
    let mut sink = LogEventSink::new();

    let frames: Box<dyn FrameSource> = if no_camera {
        sink.emit(&AppEvent::CameraUnavailable("disabled on the command line".into()));
        Box::new(NoCamera::new(idle))
    } else {
        info!("[INFO] Connecting to camera at {}...", config.camera_url);
        match MjpegStream::connect(
            &config.camera_url,
            Duration::from_millis(config.camera_timeout_ms),
        ) {
            Ok(stream) => Box::new(stream),
            Err(e) => {
                sink.emit(&AppEvent::CameraUnavailable(e.to_string()));
                Box::new(NoCamera::new(idle))
            }
        }
    };

    let (keys_tx, keys_rx) = key_channel();
    let interrupt_tx = keys_tx.clone();
    ctrlc::set_handler(move || {
        let _ = interrupt_tx.send(QUIT_KEY);
    })
    .context("installing Ctrl+C handler")?;
    if let Err(e) = spawn_stdin_keys(keys_tx) {
        warn!("Key input unavailable ({e}); use Ctrl+C to quit");
    }
    let display = HeadlessDisplay::new(
        keys_rx,
        config.preview_path.clone(),
        config.preview_every_frames,
    );

    let slot = Arc::new(LatestEventSlot::new());
    let producer = SerialEventSource::new(channel.clone(), SystemClock, idle);
    serial::spawn(producer, Arc::clone(&slot), LogEventSink::new())
        .context("starting serial reader")?;

    let mut viewer = Viewer::new(config, frames, display, SystemClock, slot, channel);
    viewer.run(&mut sink);
    Ok(())
}

// ── log ───────────────────────────────────────────────────────

fn run_logger(config: &SystemConfig) -> Result<()> {
    let channel = SharedChannel::new(open_serial(config)?);
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || flag.store(false, Ordering::Relaxed))
        .context("installing Ctrl+C handler")?;

    let source = SerialEventSource::new(
        channel,
        SystemClock,
        Duration::from_millis(config.idle_poll_ms),
    );
    let mut service = LoggerService::new(source, CsvEventLog::new(config.log_path.clone()));
    let mut sink = LogEventSink::new();

    service.start(&mut sink);
    info!("Listening for intrusion events... (Press Ctrl+C to stop)");
    service.run(&running, &mut sink);
    Ok(())
}

fn open_replay(file: &Path) -> Result<ReaderLines<BufReader<File>>> {
    let reader = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    info!("Replaying serial capture {}", file.display());
    Ok(ReaderLines::new(BufReader::new(reader)))
}

fn replay_log(config: &SystemConfig, file: PathBuf) -> Result<()> {
    let source = SerialEventSource::new(
        SharedChannel::new(open_replay(&file)?),
        SystemClock,
        Duration::ZERO,
    );
    let mut service = LoggerService::new(source, CsvEventLog::new(config.log_path.clone()));
    let mut sink = LogEventSink::new();

    service.start(&mut sink);
    let logged = service.drain(&mut sink);
    info!("Replayed {}: {} records logged", file.display(), logged);
    service.stop(&mut sink);
    Ok(())
}
