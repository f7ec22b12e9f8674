//! Headless transcript mode: run the simulation without a screen and stream
//! each new console line to a writer.

use awaken_core::{LogEntry, Result};
use awaken_sim::{SimConfig, Simulation};
use std::future::Future;
use std::io::Write;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TranscriptFormat {
    /// `[HH:MM:SS.mmm] source: message`
    #[default]
    Plain,
    /// One JSON object per line.
    Json,
}

pub fn format_entry(entry: &LogEntry, format: TranscriptFormat) -> Result<String> {
    Ok(match format {
        TranscriptFormat::Plain => entry.to_line(),
        TranscriptFormat::Json => serde_json::to_string(entry)?,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeadlessSummary {
    pub lines_written: usize,
    pub last_id: u64,
}

/// Write every entry newer than `summary.last_id` and advance it.
fn flush<W: Write>(
    sim: &Simulation,
    format: TranscriptFormat,
    out: &mut W,
    summary: &mut HeadlessSummary,
) -> Result<()> {
    for entry in sim.logs().entries_after(summary.last_id) {
        writeln!(out, "{}", format_entry(entry, format)?)?;
        summary.last_id = entry.id;
        summary.lines_written += 1;
    }
    out.flush()?;
    Ok(())
}

/// Start a simulation and stream its console until `duration` elapses (or
/// forever when `None`) or `interrupt` resolves, then run the shutdown
/// sequence and stream that too.
pub async fn run_headless<W, F>(
    config: SimConfig,
    duration: Option<Duration>,
    format: TranscriptFormat,
    out: &mut W,
    interrupt: F,
) -> Result<HeadlessSummary>
where
    W: Write,
    F: Future<Output = ()>,
{
    let mut sim = Simulation::new(config);
    let mut summary = HeadlessSummary::default();
    tracing::info!(
        "Headless session {} started ({})",
        sim.session_id(),
        match duration {
            Some(d) => format!("{}s", d.as_secs()),
            None => "until interrupted".to_string(),
        }
    );

    let deadline = async {
        match duration {
            Some(d) => tokio::time::sleep(d).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);
    tokio::pin!(interrupt);

    sim.start();
    loop {
        tokio::select! {
            changed = sim.step() => {
                if changed {
                    flush(&sim, format, out, &mut summary)?;
                }
            }
            _ = &mut deadline => break,
            _ = &mut interrupt => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    sim.shutdown();
    flush(&sim, format, out, &mut summary)?;
    tracing::info!("Headless session {} wrote {} lines", sim.session_id(), summary.lines_written);
    Ok(summary)
}
