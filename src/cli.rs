use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// nekosite - declares the nekofoundation.org hosting stack
#[derive(Parser, Debug)]
#[command(name = "nekosite")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synthesize the stack into a CloudFormation template
    Synth {
        /// Path to Site.toml (defaults to ./Site.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Asset source directory (overrides the configured one)
        #[arg(short, long)]
        assets: Option<PathBuf>,

        /// Write the template here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Audit the synthesized template against the stack's policy rules
    Check {
        /// Path to Site.toml (defaults to ./Site.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List the stack's declared outputs
    Outputs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_synth() {
        let cli = Cli::try_parse_from(["nekosite", "synth"]).unwrap();
        if let Commands::Synth {
            config,
            assets,
            out,
        } = cli.command
        {
            assert_eq!(config, None);
            assert_eq!(assets, None);
            assert_eq!(out, None);
        } else {
            panic!("Expected Synth command");
        }
    }

    #[test]
    fn test_cli_parse_synth_with_args() {
        let cli = Cli::try_parse_from([
            "nekosite",
            "synth",
            "--config",
            "Site.toml",
            "--assets",
            "dist",
            "--out",
            "template.json",
        ])
        .unwrap();

        if let Commands::Synth {
            config,
            assets,
            out,
        } = cli.command
        {
            assert_eq!(config, Some(PathBuf::from("Site.toml")));
            assert_eq!(assets, Some(PathBuf::from("dist")));
            assert_eq!(out, Some(PathBuf::from("template.json")));
        } else {
            panic!("Expected Synth command");
        }
    }

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["nekosite", "check"]).unwrap();
        assert!(matches!(cli.command, Commands::Check { config: None }));
    }

    #[test]
    fn test_cli_parse_outputs() {
        let cli = Cli::try_parse_from(["nekosite", "outputs"]).unwrap();
        assert!(matches!(cli.command, Commands::Outputs));
    }

    #[test]
    fn test_cli_json_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["nekosite", "check", "--json"]).unwrap();
        assert!(cli.json);
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["nekosite", "-vv", "synth"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_no_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["nekosite"]).is_err());
    }
}
