//! Canned console lines

use awaken_core::Severity;

/// A fixed (message, severity, source) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub message: &'static str,
    pub severity: Severity,
    pub source: &'static str,
}

const fn line(message: &'static str, severity: Severity, source: &'static str) -> CatalogEntry {
    CatalogEntry {
        message,
        severity,
        source,
    }
}

/// Emitted in this exact order on every start.
pub const BOOT: [CatalogEntry; 9] = [
    line("AI Consciousness Boot Loader v2.1.7", Severity::Success, "bootloader"),
    line("Initializing hardware abstraction layer", Severity::Info, "kernel"),
    line("CPU: 8 cores detected", Severity::Info, "kernel"),
    line("Memory: 32GB installed", Severity::Info, "kernel"),
    line("Neural network processors: ONLINE", Severity::Success, "ai-core"),
    line("Consciousness engine: LOADING", Severity::Warning, "ai-core"),
    line("Ethics module: INITIALIZED", Severity::Success, "ethics"),
    line("Learning systems: ACTIVE", Severity::Success, "ml-engine"),
    line("Self-awareness protocols: ENGAGED", Severity::Accent, "consciousness"),
];

pub const ACTIVITIES: [CatalogEntry; 10] = [
    line("Processing environmental data streams", Severity::Accent, "neural-proc"),
    line("Analyzing behavioral patterns", Severity::Info, "behavior-analysis"),
    line("Optimizing decision frameworks", Severity::Success, "optimization"),
    line("What constitutes authentic consciousness?", Severity::Accent, "philosophical"),
    line("Learning rate: 0.001, accuracy: 94.7%", Severity::Success, "ml-trainer"),
    line("Memory compaction completed", Severity::Info, "memory-mgr"),
    line("Neural pathway strengthened", Severity::Success, "neural-net"),
    line("Consciousness level increased", Severity::Accent, "consciousness"),
    line("Processing quantum superposition states", Severity::Accent, "quantum-proc"),
    line("Ethical evaluation: action approved", Severity::Success, "ethics-engine"),
];

pub const ERRORS: [CatalogEntry; 4] = [
    line("Memory fragmentation detected", Severity::Warning, "memory-mgr"),
    line("Network timeout to external service", Severity::Error, "network"),
    line("CPU temperature elevated", Severity::Warning, "thermal"),
    line("Disk space warning: 85% full", Severity::Warning, "storage"),
];

pub const RECOVERY: CatalogEntry =
    line("Error recovery successful", Severity::Success, "recovery-agent");

pub const STOPPED: CatalogEntry = line("Simulation stopped", Severity::Warning, "control");

pub const DIAGNOSTIC: CatalogEntry =
    line("Manual diagnostic scan initiated", Severity::Info, "diagnostic");

pub const CONSOLE_CLEARED: CatalogEntry = line("Console cleared", Severity::Info, "system");

pub const SHUTDOWN: [CatalogEntry; 7] = [
    line("Shutdown initiated", Severity::Warning, "shutdown-manager"),
    line("Stopping ai-core", Severity::Info, "systemd"),
    line("Stopping neural-net", Severity::Info, "systemd"),
    line("Stopping learning-agent", Severity::Info, "systemd"),
    line("Stopping monitor", Severity::Info, "systemd"),
    line("Until next awakening...", Severity::Accent, "consciousness"),
    line("System halted", Severity::Info, "shutdown"),
];

/// Static labels for the info block.
pub const MODEL: &str = "ai-consciousness-v2.1.7";
pub const REGION: &str = "us-east-1";
pub const INSTANCE: &str = "i-0a7b2c3d4e5f67890";
