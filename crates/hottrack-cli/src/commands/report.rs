//! Report command - print a HeatReport snapshot for one tracked file
//!
//! Provides the `hottrack report` CLI command, the operator-facing
//! equivalent of an ioctl read against the engine's heat-tracking state.

use anyhow::Result;
use clap::Args;

use hottrack_core::HotTrackConfig;

use crate::commands::demo::{build_demo_root, AccessSpec};
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct ReportCommand {
    /// File identifier to report on
    #[arg(long)]
    file_id: u64,

    /// Replay a synthetic access before reporting, as file_id:offset:length:r|w.
    /// May be repeated.
    #[arg(long = "access")]
    accesses: Vec<String>,
}

impl ReportCommand {
    pub fn execute(&self, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let accesses = self
            .accesses
            .iter()
            .map(|raw| AccessSpec::parse(raw))
            .collect::<Result<Vec<_>>>()?;

        let root = build_demo_root(HotTrackConfig::default(), &accesses)?;
        let report = root.report(self.file_id);

        if matches!(format, OutputFormat::Json) {
            let json = serde_json::json!({
                "file_id": self.file_id,
                "live": report.live != 0,
                "temperature": report.temperature,
                "num_reads": report.num_reads,
                "num_writes": report.num_writes,
                "avg_delta_reads": report.avg_delta_reads,
                "avg_delta_writes": report.avg_delta_writes,
                "last_read_time": report.last_read_time,
                "last_write_time": report.last_write_time,
            });
            formatter.print_json(&json);
            return Ok(());
        }

        if report.live == 0 {
            formatter.info(&format!("file {} is not tracked", self.file_id));
            return Ok(());
        }

        formatter.success(&format!("HeatReport for file {}", self.file_id));
        formatter.info(&format!("temperature:      {}", report.temperature));
        formatter.info(&format!("reads / writes:   {} / {}", report.num_reads, report.num_writes));
        formatter.info(&format!("avg delta reads:  {}", report.avg_delta_reads));
        formatter.info(&format!("avg delta writes: {}", report.avg_delta_writes));
        formatter.info(&format!("last read time:   {}", report.last_read_time));
        formatter.info(&format!("last write time:  {}", report.last_write_time));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_spec_parses_read_and_write() {
        let read = AccessSpec::parse("1:0:4096:r").unwrap();
        assert_eq!(read.file_id, 1);
        assert!(!read.is_write);

        let write = AccessSpec::parse("2:100:10:w").unwrap();
        assert!(write.is_write);
    }

    #[test]
    fn access_spec_rejects_malformed_input() {
        assert!(AccessSpec::parse("1:0:4096").is_err());
        assert!(AccessSpec::parse("1:0:4096:x").is_err());
        assert!(AccessSpec::parse("a:0:4096:r").is_err());
    }
}
