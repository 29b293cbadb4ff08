mod commands;
mod inventory;
mod terminal;

use commands::{CommandLine, Commands, connect, expand, validate};
use surveyr_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();
    let cfg = Config::from(&commands);

    logging::init_logging(&cfg);
    print::banner(cfg.no_banner, cfg.quiet);

    match &commands.command {
        Commands::Expand { tokens, limit } => {
            print::header("expanding host specifications", cfg.quiet);
            expand::expand(tokens, *limit, &cfg)
        }
        Commands::Validate { inventory } => {
            print::header("validating sources", cfg.quiet);
            validate::validate(inventory, &cfg)
        }
        Commands::Connect { inventory, sources } => {
            print::header("getting ready for connect scans", cfg.quiet);
            connect::connect(inventory, sources, &cfg).await
        }
    }
}
