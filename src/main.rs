//! nekosite CLI
//!
//! Usage: nekosite <COMMAND>
//!
//! Commands:
//!   synth    Synthesize the stack into a CloudFormation template
//!   check    Audit the synthesized template against the policy rules
//!   outputs  List the stack's declared outputs

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use nekosite::assets::AssetManifest;
use nekosite::check::check_template;
use nekosite::cli::{Cli, Commands};
use nekosite::config::SiteConfig;
use nekosite::stack::SiteStack;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Synth {
            ref config,
            ref assets,
            ref out,
        } => {
            synth(config.as_deref(), assets.as_deref(), out.as_deref(), cli.verbose)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check { ref config } => check(config.as_deref(), cli.json),
        Commands::Outputs => {
            outputs(cli.json)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<SiteConfig> {
    match path {
        Some(path) => SiteConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => SiteConfig::load_or_default(Path::new(".")).context("failed to load Site.toml"),
    }
}

fn synth(
    config: Option<&Path>,
    assets: Option<&Path>,
    out: Option<&Path>,
    verbose: u8,
) -> Result<()> {
    let mut config = load_config(config)?;
    if let Some(assets) = assets {
        config.assets = PathBuf::from(assets);
    }

    let stack = SiteStack::from_config(&config)?;
    let manifest = AssetManifest::scan(&config.assets)?;
    if verbose > 0 {
        eprintln!(
            "scanned {} asset objects in {} ({})",
            manifest.object_count,
            manifest.source.display(),
            manifest.fingerprint,
        );
    }

    let template = stack.synthesize(&manifest)?;
    let rendered = template.to_json()?;
    match out {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("failed to write template to {}", path.display()))?;
            if verbose > 0 {
                eprintln!("wrote template to {}", path.display());
            }
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn check(config: Option<&Path>, json: bool) -> Result<ExitCode> {
    let config = load_config(config)?;
    let stack = SiteStack::from_config(&config)?;

    // audit the declaration itself; site content need not exist yet
    let manifest = AssetManifest::empty(&config.assets);
    let template = stack.synthesize(&manifest)?;
    let violations = check_template(&template);

    if json {
        println!("{}", serde_json::to_string_pretty(&violations)?);
    } else if violations.is_empty() {
        println!("ok: template holds the stack's policy rules");
    } else {
        for violation in &violations {
            eprintln!("violation [{}]: {}", violation.rule, violation.message);
        }
    }

    if violations.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn outputs(json: bool) -> Result<()> {
    let declared = SiteStack::declared_outputs();
    if json {
        let value: Vec<_> = declared
            .iter()
            .map(|(key, description)| {
                serde_json::json!({ "key": key, "description": description })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        for (key, description) in declared {
            println!("{key}: {description}");
        }
    }
    Ok(())
}
