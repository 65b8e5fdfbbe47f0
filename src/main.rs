use clap::Parser;
use miette::Report;
use tracing::{debug, info};

use stakegate::adapter::inbound::cli::command::{Cli, ColorChoice, Commands};
use stakegate::adapter::inbound::cli::output::{self, OutputConfig};
use stakegate::adapter::inbound::cli::{
    approve, diagnostic, estimate, join, levels, positions, stake, status,
};
use stakegate::error::Result;
use stakegate::infrastructure::bootstrap::{log_config, Runtime};
use stakegate::infrastructure::config::Config;

async fn run(cli: &Cli) -> Result<()> {
    let config = Config::load(&cli.config)?;

    let logging = match cli.verbose {
        0 => config.logging.clone(),
        1 => config.logging.with_level("stakegate=debug"),
        _ => config.logging.with_level("stakegate=trace"),
    };
    logging.init();
    log_config(&config);

    match &cli.command {
        Commands::Levels(args) => levels::execute(&config, args.check).await,
        command => {
            let runtime = Runtime::connect(config)?;
            match command {
                Commands::Status => status::execute(&runtime).await,
                Commands::Approve(args) => approve::execute(&runtime, args.level, args.yes).await,
                Commands::Stake(args) => stake::execute(&runtime, args.level, args.yes).await,
                Commands::Positions => positions::execute(&runtime).await,
                Commands::Estimate(args) => estimate::execute(&runtime, args.tx).await,
                Commands::Join(args) => {
                    join::execute(&runtime, &args.platform, args.user.clone()).await
                }
                Commands::Levels(_) => Ok(()),
            }
        }
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));

    if !cli.json && !cli.quiet {
        output::header(env!("CARGO_PKG_VERSION"));
    }

    tokio::select! {
        result = run(&cli) => {
            if let Err(e) = result {
                let report: Report = diagnostic::report(e, &cli.config);
                if cli.json {
                    output::error(&report.to_string());
                } else {
                    eprintln!("{report:?}");
                }
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
            std::process::exit(130);
        }
    }
    debug!("stakegate finished");
}
