//! headless: one waypoint agent driven by a remote controller, no renderer.
//!
//! Loads an agent config, connects, and runs a fixed-rate tick loop with a
//! `KinematicBody` standing in for the physics engine.  While disconnected it
//! retries on a timer; the tick loop keeps running either way.
//!
//! ```text
//! headless --config demos/headless/agent.toml [--hz 60] [--max-ticks N]
//! ```

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use wp_channel::ConnectionState;
use wp_core::Tick;
use wp_mobility::{KinematicBody, MotionState};
use wp_sim::{AgentConfig, RuntimeBuilder, RuntimeObserver};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(version, about = "Headless waypoint agent")]
struct Cli {
    /// Agent configuration file (TOML).
    #[arg(long)]
    config: PathBuf,
    /// Tick rate.
    #[arg(long, default_value_t = 60.0)]
    hz: f32,
    /// Stop after this many ticks.  Runs until killed when absent.
    #[arg(long)]
    max_ticks: Option<u64>,
    /// Seconds between reconnect attempts while disconnected.
    #[arg(long, default_value_t = 5.0)]
    retry_secs: f32,
}

impl Cli {
    fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.hz.is_finite() && self.hz > 0.0, "--hz must be positive");
        anyhow::ensure!(self.retry_secs.is_finite(), "--retry-secs must be a finite number");
        self.retry_interval()?;
        Ok(())
    }

    /// At least 100 ms between reconnect attempts.
    fn retry_interval(&self) -> Result<Duration> {
        Duration::try_from_secs_f32(self.retry_secs.max(0.1)).context("--retry-secs is out of range")
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs motion-state transitions and a periodic heartbeat.
struct ProgressLogger {
    interval: u64,
    drained:  usize,
}

impl RuntimeObserver for ProgressLogger {
    fn on_tick_end(&mut self, tick: Tick, drained: usize) {
        self.drained += drained;
        if self.interval > 0 && tick.0 > 0 && tick.0.is_multiple_of(self.interval) {
            info!(%tick, actions = self.drained, "heartbeat");
        }
    }

    fn on_state_change(&mut self, tick: Tick, from: MotionState, to: MotionState) {
        info!(%tick, %from, %to, "motion");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    cli.validate()?;

    let config = AgentConfig::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let body = KinematicBody::at(config.start_position()?);
    let mut runtime = RuntimeBuilder::new(config, body).build()?;

    // A failed first connect is already logged; keep ticking and retry.
    let _ = runtime.connect();

    let dt = 1.0 / cli.hz;
    let frame = Duration::try_from_secs_f32(dt).context("--hz is out of range")?;
    let retry_every = cli.retry_interval()?;
    let mut observer = ProgressLogger { interval: (cli.hz * 10.0) as u64, drained: 0 };
    let mut last_attempt = Instant::now();
    let mut ticks = 0u64;

    info!(agent_id = %runtime.agent_id(), hz = cli.hz, "tick loop started");
    loop {
        if cli.max_ticks.is_some_and(|max| ticks >= max) {
            break;
        }
        let started = Instant::now();

        if runtime.connection_state() != ConnectionState::Open && last_attempt.elapsed() >= retry_every {
            last_attempt = Instant::now();
            let _ = runtime.retry();
        }

        runtime.tick(dt, &mut observer);
        ticks += 1;

        if let Some(rest) = frame.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }

    let position = runtime.engine().position();
    info!(ticks, %position, state = %runtime.engine().state(), "tick loop finished");
    runtime.shutdown();
    Ok(())
}
