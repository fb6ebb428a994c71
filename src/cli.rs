//! Command-line interface for ArenaDuel
//!
//! Runs a headless match from a JSON config, or a built-in demo duel.

use clap::Parser;
use std::path::PathBuf;

/// Two-fighter arena duel simulator
#[derive(Parser, Debug)]
#[command(name = "arenaduel")]
#[command(about = "Two-fighter arena duel simulator")]
#[command(version)]
pub struct Args {
    /// Run in headless mode with the specified JSON config file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub headless: Option<PathBuf>,

    /// Output path for match log
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Maximum match duration in seconds (overrides the config file)
    #[arg(long)]
    pub max_duration: Option<f32>,

    /// RON file overriding archetype stats
    #[arg(long, value_name = "ROSTER_FILE")]
    pub roster: Option<PathBuf>,

    /// Random seed for a reproducible match (overrides the config file)
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn parse_args() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_all_flags() {
        let args = Args::try_parse_from([
            "arenaduel",
            "--headless",
            "match.json",
            "--output",
            "out.json",
            "--max-duration",
            "30",
            "--roster",
            "roster.ron",
            "--seed",
            "42",
        ])
        .unwrap();

        assert_eq!(args.headless, Some(PathBuf::from("match.json")));
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert_eq!(args.max_duration, Some(30.0));
        assert_eq!(args.roster, Some(PathBuf::from("roster.ron")));
        assert_eq!(args.seed, Some(42));
    }

    #[test]
    fn test_no_flags_means_demo() {
        let args = Args::try_parse_from(["arenaduel"]).unwrap();
        assert!(args.headless.is_none());
        assert!(args.seed.is_none());
    }
}
