//! ClauseDB CLI
//!
//! Compiles a logic program given as JSON and prints what the database holds.
//!
//! # Commands
//!
//! - `clausedb compile <program.json>` - Compile and list the decompiled program
//! - `clausedb compile <program.json> --dump` - Print the node table
//! - `clausedb compile <program.json> --find parent/2` - Look up one predicate
//! - `clausedb config` - Print the effective configuration
//!
//! The program file is a JSON array of formulas, e.g.
//!
//! ```json
//! [
//!   {"Atom": {"functor": "parent", "args": [
//!     {"Compound": {"functor": "tom", "args": []}},
//!     {"Compound": {"functor": "bob", "args": []}}]}}
//! ]
//! ```
//!
//! Logging goes to stderr; `CLAUSEDB_LOG` overrides the configured level.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clausedb::config::LoggingConfig;
use clausedb::{ClauseDb, Config, Formula, Signature};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static TRACE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

#[derive(Parser)]
#[command(name = "clausedb")]
#[command(about = "Compile logic programs into an addressable clause database")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to clausedb.toml + clausedb.local.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a JSON program and list its clauses
    Compile {
        /// JSON file holding an array of formulas
        file: PathBuf,
        /// Print the node table instead of the decompiled listing
        #[arg(long)]
        dump: bool,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
        /// Only show the definitions of this predicate (functor/arity)
        #[arg(long)]
        find: Option<Signature>,
    },
    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(&path.to_string_lossy())
            .with_context(|| format!("loading config {}", path.display()))?,
        None => load_default_config(),
    };
    init_tracing(&config.logging);

    match cli.command {
        Commands::Compile {
            file,
            dump,
            json,
            find,
        } => compile(&config, &file, dump, json, find.as_ref()),
        Commands::Config => {
            print!("{}", toml::to_string(&config)?);
            Ok(())
        }
    }
}

/// Layered config, or defaults with a notice when it cannot be read.
/// Tracing is not installed yet, so the notice goes straight to stderr.
fn load_default_config() -> Config {
    Config::load().unwrap_or_else(|e| {
        eprintln!("Using default configuration ({e})");
        Config::default()
    })
}

fn compile(
    config: &Config,
    file: &Path,
    dump: bool,
    json: bool,
    find: Option<&Signature>,
) -> Result<()> {
    let source =
        fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let program: Vec<Formula> = serde_json::from_str(&source)
        .with_context(|| format!("parsing program {}", file.display()))?;

    let mut db = ClauseDb::with_config(&config.compiler);
    db.add_program(&program)
        .with_context(|| format!("compiling {}", file.display()))?;
    tracing::info!(
        formulas = program.len(),
        nodes = db.len(),
        "program_compiled"
    );

    if dump {
        if json {
            println!("{}", serde_json::to_string_pretty(&db)?);
        } else {
            println!("{db}");
        }
        return Ok(());
    }

    let listing = match find {
        Some(signature) => {
            let Some(address) = db.find(signature) else {
                println!("{signature}: not found");
                return Ok(());
            };
            println!("% {signature} at node {address}");
            db.definitions(signature)?
        }
        None => db.iter().collect::<Result<Vec<_>, _>>()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        for formula in &listing {
            println!("{formula}.");
        }
    }
    Ok(())
}

fn init_tracing(logging_config: &LoggingConfig) {
    // Environment variable takes precedence over config file value
    let level = env::var("CLAUSEDB_LOG").unwrap_or_else(|_| logging_config.level.clone());
    let json = logging_config.format == "json";

    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());
    let _ = TRACE_GUARD.set(guard);

    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(non_blocking);

    let _ = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.compact().finish())
    };
}
