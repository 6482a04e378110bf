//! Stats command - print aggregate size-account and bucket-occupancy figures

use anyhow::Result;
use clap::Args;

use hottrack_core::HotTrackConfig;

use crate::commands::demo::{build_demo_root, AccessSpec};
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Replay a synthetic access before reporting, as file_id:offset:length:r|w.
    /// May be repeated.
    #[arg(long = "access")]
    accesses: Vec<String>,
}

impl StatsCommand {
    pub fn execute(&self, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(matches!(format, OutputFormat::Json));

        let accesses = self
            .accesses
            .iter()
            .map(|raw| AccessSpec::parse(raw))
            .collect::<Result<Vec<_>>>()?;

        let root = build_demo_root(HotTrackConfig::default(), &accesses)?;
        let size_account = root.size_account();
        let inode_occupancy = root.inode_bucket_occupancy();
        let range_occupancy = root.range_bucket_occupancy();

        if matches!(format, OutputFormat::Json) {
            let json = serde_json::json!({
                "tracked_bytes": size_account.bytes(),
                "tracked_objects": size_account.count(),
                "inode_count": root.inode_count(),
                "range_count": root.range_count(),
                "inode_bucket_occupancy": non_empty_buckets(&inode_occupancy),
                "range_bucket_occupancy": non_empty_buckets(&range_occupancy),
            });
            formatter.print_json(&json);
            return Ok(());
        }

        formatter.success("hot-tracking engine stats");
        formatter.info(&format!("tracked bytes:   {}", size_account.bytes()));
        formatter.info(&format!("tracked objects: {}", size_account.count()));
        formatter.info(&format!("inodes tracked:  {}", root.inode_count()));
        formatter.info(&format!("ranges tracked:  {}", root.range_count()));
        formatter.info(&format!(
            "inode buckets occupied: {}/{}",
            non_empty_buckets(&inode_occupancy).len(),
            inode_occupancy.len()
        ));
        formatter.info(&format!(
            "range buckets occupied: {}/{}",
            non_empty_buckets(&range_occupancy).len(),
            range_occupancy.len()
        ));

        Ok(())
    }
}

/// `(bucket_index, population)` pairs for buckets holding at least one item.
fn non_empty_buckets(occupancy: &[usize]) -> Vec<(usize, usize)> {
    occupancy
        .iter()
        .enumerate()
        .filter(|(_, &population)| population > 0)
        .map(|(index, &population)| (index, population))
        .collect()
}
