//! Argument parsing for the `stakegate` binary.
//!
//! Every subcommand reads the same TOML configuration; `--json`, `--quiet`
//! and `--verbose` are global and shape output for all of them.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::TxHash;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG: &str = "stakegate.toml";

/// Token allowance and staking for token-gated communities
#[derive(Parser, Debug)]
#[command(name = "stakegate")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// When to color output
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Print one JSON object per line and skip prompts
    #[arg(long, global = true)]
    pub json: bool,

    /// Only print warnings, errors and transaction hashes
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log workflow transitions (-vv for chain calls)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    /// Color when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show wallet balances, allowance and staked total
    Status,

    /// List community levels and their requirements
    Levels(LevelsArgs),

    /// Approve the staking contract to spend the token
    Approve(LevelArgs),

    /// Stake the amount a level requires
    Stake(LevelArgs),

    /// List staked positions and their unlock dates
    Positions,

    /// Estimate how long a transaction takes to confirm
    Estimate(EstimateArgs),

    /// Sign in to a community platform and get an invite link
    Join(JoinArgs),
}

#[derive(Parser, Debug)]
pub struct LevelsArgs {
    /// Check whether the wallet meets each requirement (reads balances)
    #[arg(long)]
    pub check: bool,
}

/// Arguments shared by `approve` and `stake`.
#[derive(Parser, Debug)]
pub struct LevelArgs {
    /// Level to stake for
    #[arg(short, long)]
    pub level: u64,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Parser, Debug)]
pub struct EstimateArgs {
    /// Transaction hash
    #[arg(long)]
    pub tx: TxHash,
}

#[derive(Parser, Debug)]
pub struct JoinArgs {
    /// Platform name, e.g. discord or telegram
    #[arg(short, long)]
    pub platform: String,

    /// Platform user id, when the backend needs it to build the invite
    #[arg(long)]
    pub user: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags() {
        let cli = Cli::try_parse_from(["stakegate", "--json", "-vv", "status"]).unwrap();
        assert!(cli.json);
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG));
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["stakegate", "positions", "-q", "--config", "x.toml"]).unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.config, PathBuf::from("x.toml"));
    }

    #[test]
    fn stake_requires_level() {
        assert!(Cli::try_parse_from(["stakegate", "stake"]).is_err());
        let cli = Cli::try_parse_from(["stakegate", "stake", "--level", "3", "-y"]).unwrap();
        match cli.command {
            Commands::Stake(args) => {
                assert_eq!(args.level, 3);
                assert!(args.yes);
            }
            other => panic!("expected stake, got {other:?}"),
        }
    }

    #[test]
    fn estimate_parses_hash() {
        let hash = format!("0x{}", "ab".repeat(32));
        let cli = Cli::try_parse_from(["stakegate", "estimate", "--tx", &hash]).unwrap();
        match cli.command {
            Commands::Estimate(args) => assert_eq!(args.tx, TxHash::repeat_byte(0xab)),
            other => panic!("expected estimate, got {other:?}"),
        }
    }

    #[test]
    fn estimate_rejects_malformed_hash() {
        assert!(Cli::try_parse_from(["stakegate", "estimate", "--tx", "0x12"]).is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["stakegate", "-q", "-v", "levels"]).is_err());
    }

    #[test]
    fn parses_color_never() {
        let cli = Cli::try_parse_from(["stakegate", "--color", "never", "levels"]).unwrap();
        assert_eq!(cli.color, ColorChoice::Never);
    }
}
