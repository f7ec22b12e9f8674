//! Timer tasks: boot sequencer, periodic triggers, and one-shot delays.
//!
//! Tasks never touch simulation state. Each one sleeps, then sends a
//! [`SimEvent`] to the simulation's queue. Every task of a run holds a child
//! of the run's [`CancellationToken`], so disarming the run stops all of
//! them, one-shots included.
//!
//! Periods are read from the speed `watch` channel each time a task re-arms;
//! a speed change never reschedules a sleep that is already armed.

use crate::catalog;
use crate::config::TimingConfig;
use awaken_core::Speed;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// What fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Boot message at this catalog index is due.
    Boot(usize),
    Activity,
    Metrics,
    ErrorRoll,
    Recovery,
}

/// A tick tagged with the run that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimEvent {
    pub generation: u64,
    pub tick: Tick,
}

// ---------------------------------------------------------------------------
// Triggers
// ---------------------------------------------------------------------------

/// The three recurring actions of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Activity,
    Metrics,
    ErrorInjection,
}

impl Trigger {
    pub const ALL: [Trigger; 3] = [Trigger::Activity, Trigger::Metrics, Trigger::ErrorInjection];

    pub fn name(&self) -> &'static str {
        match self {
            Trigger::Activity => "activity",
            Trigger::Metrics => "metrics",
            Trigger::ErrorInjection => "error-injection",
        }
    }

    /// Period until the next firing at the given speed.
    pub fn period(&self, timing: &TimingConfig, speed: Speed) -> Duration {
        match self {
            Trigger::Activity => speed.scale(timing.activity_ms),
            Trigger::Metrics => timing.metrics_period(),
            Trigger::ErrorInjection => speed.scale(timing.error_roll_ms),
        }
    }

    fn tick(&self) -> Tick {
        match self {
            Trigger::Activity => Tick::Activity,
            Trigger::Metrics => Tick::Metrics,
            Trigger::ErrorInjection => Tick::ErrorRoll,
        }
    }
}

// ---------------------------------------------------------------------------
// Task handles
// ---------------------------------------------------------------------------

/// Handle for a spawned timer task.
pub struct TaskHandle {
    pub name: &'static str,
    /// Cancel the task's pending sleep
    pub cancel: CancellationToken,
    pub join: JoinHandle<()>,
}

/// Everything armed by one start.
struct Run {
    generation: u64,
    root: CancellationToken,
    tasks: Vec<TaskHandle>,
}

/// Owns the timer tasks of the current run.
pub struct Scheduler {
    tx: mpsc::Sender<SimEvent>,
    speed: watch::Receiver<Speed>,
    timing: TimingConfig,
    run: Option<Run>,
}

impl Scheduler {
    pub fn new(
        tx: mpsc::Sender<SimEvent>,
        speed: watch::Receiver<Speed>,
        timing: TimingConfig,
    ) -> Self {
        Self {
            tx,
            speed,
            timing,
            run: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.run.is_some()
    }

    /// Number of tasks of the current run that have not exited yet.
    pub fn live_tasks(&self) -> usize {
        self.run
            .as_ref()
            .map(|run| run.tasks.iter().filter(|t| !t.join.is_finished()).count())
            .unwrap_or(0)
    }

    /// Start the boot sequencer and the three triggers for `generation`.
    /// Any previous run is disarmed first. Must be called inside a tokio runtime.
    pub fn arm(&mut self, generation: u64) {
        self.disarm();
        let root = CancellationToken::new();
        let mut tasks = Vec::with_capacity(1 + Trigger::ALL.len());

        let cancel = root.child_token();
        let join = tokio::spawn(boot_sequence(
            self.tx.clone(),
            self.speed.clone(),
            self.timing.boot_step_ms,
            generation,
            cancel.clone(),
        ));
        tasks.push(TaskHandle {
            name: "boot",
            cancel,
            join,
        });

        for trigger in Trigger::ALL {
            let cancel = root.child_token();
            let join = tokio::spawn(periodic(
                trigger,
                self.tx.clone(),
                self.speed.clone(),
                self.timing.clone(),
                generation,
                cancel.clone(),
            ));
            tasks.push(TaskHandle {
                name: trigger.name(),
                cancel,
                join,
            });
        }

        debug!("Armed run {} with {} tasks", generation, tasks.len());
        self.run = Some(Run {
            generation,
            root,
            tasks,
        });
    }

    /// Arm the one-shot recovery line for the current run. No-op when disarmed.
    pub fn schedule_recovery(&mut self) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        run.tasks.retain(|t| !t.join.is_finished());

        let delay = self.speed.borrow().scale(self.timing.recovery_ms);
        let cancel = run.root.child_token();
        let join = tokio::spawn(one_shot(
            self.tx.clone(),
            delay,
            SimEvent {
                generation: run.generation,
                tick: Tick::Recovery,
            },
            cancel.clone(),
        ));
        run.tasks.push(TaskHandle {
            name: "recovery",
            cancel,
            join,
        });
    }

    /// Cancel every task of the current run and forget it.
    /// Returns how many tasks were still live.
    pub fn disarm(&mut self) -> usize {
        let Some(run) = self.run.take() else {
            return 0;
        };
        run.root.cancel();
        let mut live = 0;
        for task in &run.tasks {
            task.cancel.cancel();
            if !task.join.is_finished() {
                live += 1;
                debug!("Cancelled {} task of run {}", task.name, run.generation);
            }
        }
        live
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.disarm();
    }
}

// ---------------------------------------------------------------------------
// Task bodies
// ---------------------------------------------------------------------------

/// Sleep `delay` unless cancelled first. Returns false on cancellation.
async fn sleep_or_cancel(delay: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}

/// Queue `event` unless cancelled first or the queue is closed.
/// A full queue never holds a cancelled task.
async fn send_or_cancel(
    tx: &mpsc::Sender<SimEvent>,
    event: SimEvent,
    cancel: &CancellationToken,
) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        sent = tx.send(event) => sent.is_ok(),
    }
}

async fn boot_sequence(
    tx: mpsc::Sender<SimEvent>,
    speed: watch::Receiver<Speed>,
    step_ms: u64,
    generation: u64,
    cancel: CancellationToken,
) {
    for index in 0..catalog::BOOT.len() {
        let delay = speed.borrow().scale(step_ms);
        if !sleep_or_cancel(delay, &cancel).await {
            debug!("Boot sequence of run {} cancelled at step {}", generation, index);
            return;
        }
        let event = SimEvent {
            generation,
            tick: Tick::Boot(index),
        };
        if !send_or_cancel(&tx, event, &cancel).await {
            return;
        }
    }
}

async fn periodic(
    trigger: Trigger,
    tx: mpsc::Sender<SimEvent>,
    speed: watch::Receiver<Speed>,
    timing: TimingConfig,
    generation: u64,
    cancel: CancellationToken,
) {
    loop {
        let period = trigger.period(&timing, *speed.borrow());
        if !sleep_or_cancel(period, &cancel).await {
            break;
        }
        let event = SimEvent {
            generation,
            tick: trigger.tick(),
        };
        if !send_or_cancel(&tx, event, &cancel).await {
            break;
        }
    }
    debug!("{} trigger of run {} stopped", trigger.name(), generation);
}

async fn one_shot(
    tx: mpsc::Sender<SimEvent>,
    delay: Duration,
    event: SimEvent,
    cancel: CancellationToken,
) {
    if sleep_or_cancel(delay, &cancel).await {
        send_or_cancel(&tx, event, &cancel).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_period_ignores_speed() {
        let timing = TimingConfig::default();
        let fast = Speed::MAX;
        assert_eq!(Trigger::Metrics.period(&timing, fast), Duration::from_secs(1));
        assert_eq!(Trigger::Activity.period(&timing, fast), Duration::from_millis(400));
        assert_eq!(
            Trigger::ErrorInjection.period(&timing, fast),
            Duration::from_millis(1000)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_stops_every_task() {
        let (tx, mut rx) = mpsc::channel(64);
        let (_speed_tx, speed_rx) = watch::channel(Speed::NORMAL);
        let mut scheduler = Scheduler::new(tx, speed_rx, TimingConfig::default());

        scheduler.arm(1);
        assert!(scheduler.is_armed());
        assert_eq!(scheduler.live_tasks(), 4);

        assert_eq!(scheduler.disarm(), 4);
        assert!(!scheduler.is_armed());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn boot_ticks_arrive_in_order() {
        let (tx, mut rx) = mpsc::channel(64);
        let (_speed_tx, speed_rx) = watch::channel(Speed::NORMAL);
        let mut scheduler = Scheduler::new(tx, speed_rx, TimingConfig::default());
        scheduler.arm(3);

        let mut boot = Vec::new();
        while boot.len() < catalog::BOOT.len() {
            let event = rx.recv().await.unwrap();
            assert_eq!(event.generation, 3);
            if let Tick::Boot(i) = event.tick {
                boot.push(i);
            }
        }
        assert_eq!(boot, (0..9).collect::<Vec<_>>());
    }

    #[tokio::test(start_paused = true)]
    async fn metrics_tick_ignores_speed_while_running() {
        let (tx, mut rx) = mpsc::channel(64);
        let (_speed_tx, speed_rx) = watch::channel(Speed::MAX);
        let mut scheduler = Scheduler::new(tx, speed_rx, TimingConfig::default());
        let started = tokio::time::Instant::now();
        scheduler.arm(1);

        let mut fired = Vec::new();
        while fired.len() < 3 {
            let event = rx.recv().await.unwrap();
            if event.tick == Tick::Metrics {
                fired.push(started.elapsed());
            }
        }
        assert_eq!(
            fired,
            vec![
                Duration::from_millis(1000),
                Duration::from_millis(2000),
                Duration::from_millis(3000)
            ]
        );
        scheduler.disarm();
    }

    #[tokio::test(start_paused = true)]
    async fn armed_activity_sleep_keeps_its_period() {
        let (tx, mut rx) = mpsc::channel(64);
        let (speed_tx, speed_rx) = watch::channel(Speed::NORMAL);
        let mut scheduler = Scheduler::new(tx, speed_rx, TimingConfig::default());
        let started = tokio::time::Instant::now();
        scheduler.arm(1);

        tokio::time::sleep(Duration::from_millis(500)).await;
        speed_tx.send_replace(Speed::MAX);

        let mut fired = Vec::new();
        while fired.len() < 2 {
            let event = rx.recv().await.unwrap();
            if event.tick == Tick::Activity {
                fired.push(started.elapsed());
            }
        }
        // First sleep was armed at 1x; the re-arm picks up 5x.
        assert_eq!(
            fired,
            vec![Duration::from_millis(2000), Duration::from_millis(2400)]
        );
        scheduler.disarm();
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_releases_tasks_blocked_on_full_queue() {
        let (tx, mut rx) = mpsc::channel(1);
        let (_speed_tx, speed_rx) = watch::channel(Speed::NORMAL);
        let mut scheduler = Scheduler::new(tx, speed_rx, TimingConfig::default());
        scheduler.arm(1);

        // Nobody consumes: one tick fills the queue, the rest block on send.
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(scheduler.disarm(), 4);
        drop(scheduler);

        let mut delivered = 0;
        while rx.recv().await.is_some() {
            delivered += 1;
        }
        assert_eq!(delivered, 1);
    }
}
