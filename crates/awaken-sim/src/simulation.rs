//! The simulation session: single owner and single mutator of console state.
//!
//! Timer tasks feed ticks into one queue; the session drains it with
//! [`Simulation::step`] (async, waits for the next tick) or
//! [`Simulation::drain`] (non-blocking, for render loops). Random choices are
//! made here, on the consumer side, from one seedable `StdRng`.

use crate::catalog::{self, CatalogEntry};
use crate::config::SimConfig;
use crate::metrics;
use crate::scheduler::{Scheduler, SimEvent, Tick};
use awaken_core::{LogBuffer, LogEntry, Metrics, SimulationState, Speed};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

const QUEUE_DEPTH: usize = 1024;

pub struct Simulation {
    session_id: String,
    config: SimConfig,
    state: SimulationState,
    buffer: LogBuffer,
    metrics: Metrics,
    rng: StdRng,
    next_id: u64,
    /// Incremented on every start; ticks from older runs are discarded.
    generation: u64,
    speed_tx: watch::Sender<Speed>,
    events_rx: mpsc::Receiver<SimEvent>,
    scheduler: Scheduler,
}

impl Simulation {
    /// Seeded from `config.seed` when set, otherwise from OS entropy.
    ///
    /// A new simulation reports STOPPED with no timers armed. BOOTING begins
    /// at the first [`start`](Self::start), which is what the TUI's
    /// `--autostart` and headless mode call right away.
    pub fn new(config: SimConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: SimConfig, rng: StdRng) -> Self {
        let (events_tx, events_rx) = mpsc::channel(QUEUE_DEPTH);
        let (speed_tx, speed_rx) = watch::channel(config.speed);
        let scheduler = Scheduler::new(events_tx, speed_rx, config.timing.clone());
        let session_id = uuid::Uuid::new_v4().to_string()[..8].to_string();

        Self {
            session_id,
            buffer: LogBuffer::new(config.capacity),
            config,
            state: SimulationState::Stopped,
            metrics: Metrics::default(),
            rng,
            next_id: 1,
            generation: 0,
            speed_tx,
            events_rx,
            scheduler,
        }
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_active()
    }

    pub fn logs(&self) -> &LogBuffer {
        &self.buffer
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn speed(&self) -> Speed {
        *self.speed_tx.borrow()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Timer tasks of the current run that are still alive.
    pub fn live_tasks(&self) -> usize {
        self.scheduler.live_tasks()
    }

    // -----------------------------------------------------------------------
    // Controls
    // -----------------------------------------------------------------------

    /// Enter BOOTING and arm the boot sequencer plus the three triggers.
    /// Ignored while already active. Must be called inside a tokio runtime.
    pub fn start(&mut self) {
        if self.state.is_active() {
            return;
        }
        self.generation += 1;
        self.state = SimulationState::Booting;
        self.scheduler.arm(self.generation);
        info!(
            session = %self.session_id,
            "Simulation started (run {}, speed {})",
            self.generation,
            self.speed()
        );
    }

    /// Cancel every timer of the run, including pending boot steps and
    /// recovery lines, then log the stop. Ignored while stopped.
    pub fn stop(&mut self) {
        if !self.state.is_active() {
            return;
        }
        let cancelled = self.scheduler.disarm();
        self.state = SimulationState::Stopped;
        self.push(&catalog::STOPPED);
        info!(
            session = %self.session_id,
            "Simulation stopped (run {}, {} timers cancelled)", self.generation, cancelled
        );
    }

    pub fn toggle(&mut self) {
        if self.state.is_active() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Armed sleeps keep their period; each timer picks up the new speed
    /// when it next re-arms.
    pub fn set_speed(&mut self, speed: Speed) {
        if self.speed() == speed {
            return;
        }
        self.speed_tx.send_replace(speed);
        self.config.speed = speed;
        info!(session = %self.session_id, "Speed set to {}", speed);
    }

    pub fn run_diagnostic(&mut self) {
        self.push(&catalog::DIAGNOSTIC);
    }

    pub fn clear_console(&mut self) {
        self.buffer.clear();
        self.push(&catalog::CONSOLE_CLEARED);
        info!(session = %self.session_id, "Console cleared");
    }

    /// Tear down the run and print the shutdown sequence. Leaves the
    /// simulation STOPPED; it can be started again.
    pub fn shutdown(&mut self) {
        self.scheduler.disarm();
        self.state = SimulationState::Stopped;
        for line in &catalog::SHUTDOWN {
            self.push(line);
        }
        info!(session = %self.session_id, "Shutdown sequence complete");
    }

    // -----------------------------------------------------------------------
    // Event consumption
    // -----------------------------------------------------------------------

    /// Wait for the next tick from any timer.
    pub async fn next_event(&mut self) -> Option<SimEvent> {
        self.events_rx.recv().await
    }

    /// Wait for the next tick and apply it. Returns whether state changed.
    pub async fn step(&mut self) -> bool {
        match self.next_event().await {
            Some(event) => self.apply(event),
            None => false,
        }
    }

    /// Apply every tick already queued. Returns how many changed state.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            if self.apply(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Apply one tick. Ticks from another run, or arriving while stopped,
    /// are discarded.
    pub fn apply(&mut self, event: SimEvent) -> bool {
        if event.generation != self.generation || !self.state.is_active() {
            debug!(
                "Discarding {:?} from run {} (current run {}, {})",
                event.tick, event.generation, self.generation, self.state
            );
            return false;
        }

        match event.tick {
            Tick::Boot(index) => {
                let Some(line) = catalog::BOOT.get(index) else {
                    return false;
                };
                self.push(line);
                if index + 1 == catalog::BOOT.len() {
                    self.state = SimulationState::Running;
                    info!(session = %self.session_id, "Boot sequence complete");
                }
            }
            Tick::Activity => {
                if let Some(line) = catalog::ACTIVITIES.choose(&mut self.rng) {
                    self.push(line);
                }
            }
            Tick::Metrics => {
                self.metrics = metrics::step(&self.metrics, &mut self.rng);
            }
            Tick::ErrorRoll => {
                let odds = self.config.timing.error_probability.clamp(0.0, 1.0);
                if !self.rng.gen_bool(odds) {
                    return false;
                }
                if let Some(line) = catalog::ERRORS.choose(&mut self.rng) {
                    debug!("Injecting error: {}", line.message);
                    self.push(line);
                }
                self.scheduler.schedule_recovery();
            }
            Tick::Recovery => {
                self.push(&catalog::RECOVERY);
            }
        }
        true
    }

    fn push(&mut self, line: &CatalogEntry) {
        let entry = LogEntry::new(self.next_id, line.message, line.severity, line.source);
        self.next_id += 1;
        self.buffer.append(entry);
    }
}
