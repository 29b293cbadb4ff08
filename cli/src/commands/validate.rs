use std::path::Path;
use std::sync::Arc;

use colored::*;
use tracing::warn;

use crate::inventory::{Checked, Inventory};
use crate::sprint;
use crate::terminal::{colors, print};
use surveyr_common::config::Config;
use surveyr_common::source::Source;
use surveyr_common::success;
use surveyr_core::validation::SourceValidator;

pub fn validate(path: &Path, cfg: &Config) -> anyhow::Result<()> {
    let inventory = Inventory::load(path)?;
    let validator = SourceValidator::new(Arc::new(inventory.credential_store()), cfg);
    let checked: Vec<Checked> = inventory.validate_all(&validator);

    let mut rejected: usize = 0;
    for entry in &checked {
        match &entry.result {
            Ok(source) => print_valid(&entry.label, source, cfg),
            Err(errors) => {
                rejected += 1;
                for (field, messages) in errors.iter() {
                    for message in messages {
                        warn!("{}: {field}: {message}", entry.label);
                    }
                }
            }
        }
    }

    print_summary(checked.len(), rejected, cfg);
    if rejected > 0 {
        anyhow::bail!("{rejected} of {} sources are invalid", checked.len());
    }
    Ok(())
}

fn print_valid(label: &str, source: &Source, cfg: &Config) {
    if cfg.quiet >= 2 {
        return;
    }
    let hosts: u64 = source
        .hosts
        .iter()
        .fold(0u64, |acc, pattern| acc.saturating_add(pattern.cardinality()));
    success!(
        "{label} is valid: {} host specifications ({hosts} hosts), port {}",
        source.hosts.len(),
        source.port
    );
}

fn print_summary(total: usize, rejected: usize, cfg: &Config) {
    let valid: ColoredString = format!("{} valid", total - rejected).green().bold();
    let invalid: ColoredString = format!("{rejected} invalid").red().bold();
    let output: String = format!("Validation Complete: {valid}, {invalid}");

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&format!("{}", output.color(colors::TEXT_DEFAULT)));
        }
        _ => {
            sprint!();
            sprint!(&output);
        }
    }
}
