//! Random-walk gauge generator.
//!
//! `step` is pure in the previous snapshot and the random source, so a seeded
//! `Rng` reproduces the exact walk.

use awaken_core::Metrics;
use rand::Rng;

pub const CPU_DELTA: f64 = 5.0;
pub const MEMORY_DELTA: f64 = 2.5;
pub const DISK_DELTA: f64 = 1.0;
pub const CONSCIOUSNESS_GAIN: f64 = 0.5;
pub const NEURAL_ACTIVITY_MAX: u32 = 999;

fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

fn walk<R: Rng + ?Sized>(value: f64, delta: f64, rng: &mut R) -> f64 {
    clamp_percent(value + rng.gen_range(-delta..=delta))
}

pub fn step<R: Rng + ?Sized>(previous: &Metrics, rng: &mut R) -> Metrics {
    Metrics {
        cpu: walk(previous.cpu, CPU_DELTA, rng),
        memory: walk(previous.memory, MEMORY_DELTA, rng),
        disk: walk(previous.disk, DISK_DELTA, rng),
        // Only ever grows.
        consciousness: clamp_percent(
            previous.consciousness + rng.gen_range(0.0..=CONSCIOUSNESS_GAIN),
        ),
        neural_activity: rng.gen_range(0..=NEURAL_ACTIVITY_MAX),
        uptime_secs: previous.uptime_secs + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn uptime_counts_steps() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut m = Metrics::default();
        for _ in 0..42 {
            m = step(&m, &mut rng);
        }
        assert_eq!(m.uptime_secs, 42);
    }

    #[test]
    fn clamps_at_upper_bound() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut m = Metrics {
            cpu: 100.0,
            memory: 100.0,
            disk: 100.0,
            consciousness: 100.0,
            ..Metrics::default()
        };
        for _ in 0..500 {
            m = step(&m, &mut rng);
            assert!(m.cpu <= 100.0 && m.memory <= 100.0 && m.disk <= 100.0);
            assert_eq!(m.consciousness, 100.0);
        }
    }

    #[test]
    fn same_seed_same_walk() {
        let mut a = StdRng::seed_from_u64(77);
        let mut b = StdRng::seed_from_u64(77);
        let start = Metrics::default();
        assert_eq!(step(&start, &mut a), step(&start, &mut b));
    }
}
