//! Awaken Sim: the timer model behind the console
//!
//! Architecture:
//! - Boot sequencer: nine ordered lines, one per `300/speed` ms, then RUNNING
//! - Activity trigger: one random catalog line every `2000/speed` ms
//! - Metrics trigger: random-walk gauges every 1000 ms (never scaled)
//! - Error trigger: every `5000/speed` ms, 10% odds of an error line
//!   followed by a recovery line `1000/speed` ms later
//!
//! Timers only send ticks. `Simulation` is the single consumer and owns all
//! state; stopping cancels every timer of the run.

pub mod catalog;
pub mod config;
pub mod metrics;
pub mod scheduler;
pub mod simulation;

pub use config::{SimConfig, TimingConfig};
pub use scheduler::{SimEvent, Tick, Trigger};
pub use simulation::Simulation;
