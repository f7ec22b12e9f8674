//! Awaken: a make-believe AI consciousness console
//!
//! The binary wraps `awaken-tui` for interactive use and [`headless`] for
//! piping the console to stdout.

pub mod headless;
