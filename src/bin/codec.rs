//! Scheme Codec CLI
//!
//! Lists registered kinds, exports the scheme manifest, and inspects or
//! canonicalizes payloads against the configured wire version.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use api_scheme::api::build_scheme;
use api_scheme::{Codec, SchemeConfig, TypeMeta};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "scheme-codec")]
#[command(about = "Inspect the API scheme and encode/decode payloads")]
struct Cli {
    /// Config file (defaults to scheme.toml lookup)
    #[arg(short, long)]
    config: Option<String>,

    /// Wire version, overrides the configured one
    #[arg(short = 'V', long)]
    version: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered kinds
    Kinds,

    /// Write the scheme manifest as JSON
    Manifest {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the version and kind of a payload and the type it resolves to
    Inspect {
        file: PathBuf,
    },

    /// Decode a payload and re-encode it under its canonical kind
    Roundtrip {
        file: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = SchemeConfig::load_from(cli.config.as_deref()).context("loading configuration")?;
    if let Some(version) = cli.version {
        config.codec.version = version;
    }

    let scheme = build_scheme().context("registering API types")?;
    let version = config.codec_version()?;
    let codec = Codec::new(scheme.clone(), version.clone()).with_pretty(config.codec.pretty);

    match cli.command {
        Commands::Kinds => {
            let kinds = scheme.known_kinds(version.as_str());
            if kinds.is_empty() {
                bail!("no kinds registered for {}", version);
            }
            println!("📦 Kinds in {} ({}):", version, kinds.len());
            for kind in kinds {
                let known = scheme.type_for(version.as_str(), kind)?;
                let canonical = scheme.kind_for(version.as_str(), known.type_id())?;
                if canonical == kind {
                    println!("  {}", kind);
                } else {
                    println!("  {} -> {}", kind, canonical);
                }
            }
        }

        Commands::Manifest { output } => {
            let mut manifest = scheme.manifest();
            if !config.manifest.include_checksum {
                manifest = manifest.without_checksum();
            }
            let content = serde_json::to_string_pretty(&manifest)?;
            match output.or(config.manifest.output) {
                Some(path) => {
                    fs::write(&path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    info!(path = %path.display(), kinds = manifest.stats.total_kinds, "manifest written");
                    println!("✅ Manifest written to {}", path.display());
                }
                None => println!("{}", content),
            }
        }

        Commands::Inspect { file } => {
            let data = fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let meta = TypeMeta::peek(&data)?;
            println!("apiVersion: {}", meta.api_version);
            println!("kind:       {}", meta.kind);
            match scheme.type_for(&meta.api_version, &meta.kind) {
                Ok(known) => {
                    println!("type:       {}", known.type_name());
                    let canonical = scheme.kind_for(&meta.api_version, known.type_id())?;
                    if canonical != meta.kind {
                        println!("canonical:  {}", canonical);
                    }
                }
                Err(_) => {
                    println!("❌ not registered");
                    if let Some(suggestion) = scheme.suggest_kind(&meta.api_version, &meta.kind) {
                        println!("💡 did you mean {}?", suggestion);
                    }
                    std::process::exit(1);
                }
            }
        }

        Commands::Roundtrip { file } => {
            let data = fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
            let obj = codec.decode(&data)?;
            println!("{}", codec.encode_to_string(obj.as_ref())?);
        }
    }

    Ok(())
}
