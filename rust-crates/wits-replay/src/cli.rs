//! Command-line interface

use std::path::PathBuf;

use clap::Parser;

/// Replay a recorded Volve well as a live WITS Level 0 TCP feed.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "wits-replay", version, about)]
pub struct Cli {
    /// Well CSV to replay (default: first *.csv in the data directory)
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// TCP port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Playback speed multiplier (10 = ten records per second)
    #[arg(short, long)]
    pub speed: Option<f64>,

    /// Restart from the first record after the last one
    #[arg(long = "loop", conflicts_with = "no_loop")]
    pub loop_replay: bool,

    /// Play the sequence once, even if the config file enables looping
    #[arg(long)]
    pub no_loop: bool,

    /// Address to bind (e.g. 127.0.0.1)
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Directory scanned for well CSV files
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Configuration file (default: platform config dir)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// List available wells and exit
    #[arg(long)]
    pub list: bool,

    /// Print the well listing as JSON
    #[arg(long, requires = "list")]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["wits-replay"]).unwrap();
        assert!(cli.file.is_none());
        assert!(cli.port.is_none());
        assert!(!cli.loop_replay);
        assert!(!cli.list);
    }

    #[test]
    fn test_short_and_long_flags() {
        let cli = Cli::try_parse_from([
            "wits-replay",
            "-f",
            "well.csv",
            "-p",
            "9000",
            "--speed",
            "25",
            "--loop",
            "--bind",
            "127.0.0.1",
        ])
        .unwrap();

        assert_eq!(cli.file, Some(PathBuf::from("well.csv")));
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.speed, Some(25.0));
        assert!(cli.loop_replay);
        assert_eq!(cli.bind.as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn test_loop_flags_conflict() {
        let cli = Cli::try_parse_from(["wits-replay", "--no-loop"]).unwrap();
        assert!(cli.no_loop && !cli.loop_replay);
        assert!(Cli::try_parse_from(["wits-replay", "--loop", "--no-loop"]).is_err());
    }

    #[test]
    fn test_json_requires_list() {
        assert!(Cli::try_parse_from(["wits-replay", "--json"]).is_err());
        let cli = Cli::try_parse_from(["wits-replay", "--list", "--json"]).unwrap();
        assert!(cli.list && cli.json);
    }

    #[test]
    fn test_bad_port_rejected() {
        assert!(Cli::try_parse_from(["wits-replay", "--port", "70000"]).is_err());
        assert!(Cli::try_parse_from(["wits-replay", "--speed", "fast"]).is_err());
    }
}
