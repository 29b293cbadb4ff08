use colored::*;
use tracing::error;

use crate::sprint;
use crate::terminal::{colors, print};
use surveyr_common::config::Config;
use surveyr_common::network::HostPattern;

type Detail = (String, ColoredString);

pub fn expand(tokens: &[String], limit: usize, cfg: &Config) -> anyhow::Result<()> {
    let mut invalid: usize = 0;

    for (idx, token) in tokens.iter().enumerate() {
        match HostPattern::parse(token) {
            Ok(pattern) => match cfg.quiet {
                2 => pattern.expand().take(limit).for_each(|host| print::print(&host)),
                _ => print_pattern(idx, &pattern, limit),
            },
            Err(err) => {
                error!("{token}: {err}");
                invalid += 1;
            }
        }
    }

    if invalid > 0 {
        anyhow::bail!("{invalid} of {} host specifications are invalid", tokens.len());
    }
    Ok(())
}

fn print_pattern(idx: usize, pattern: &HostPattern, limit: usize) {
    print::tree_head(idx, pattern.as_str());

    let cardinality: u64 = pattern.cardinality();
    let details: Vec<Detail> = vec![
        ("Kind".to_string(), pattern.kind().to_string().normal()),
        ("Hosts".to_string(), cardinality.to_string().color(colors::ACCENT)),
    ];
    print::as_tree_one_level(details);

    for host in pattern.expand().take(limit) {
        print::print_status(host);
    }
    if cardinality > limit as u64 {
        let rest: String = format!("... and {} more", cardinality - limit as u64);
        print::print_status(format!("{}", rest.dimmed()));
    }
    sprint!();
}
