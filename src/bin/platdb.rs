//! Command line front end: look keys up, validate a whole document, or dump resolved values.

use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use platdb::export::{export_resolved, value_to_json};
use platdb::{
    check_document, Accumulate, CheckOptions, DbError, Document, ErrorPolicy, FailFast, Resolver,
    ResolverOptions, Value,
};

#[derive(Parser)]
#[command(name = "platdb")]
#[command(about = "Resolve keys in an inheriting platform configuration document", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Maximum number of nested lookups per resolution (values above 128 are clamped)
    #[arg(long, default_value_t = ResolverOptions::default().max_depth)]
    max_depth: usize,

    /// Document to load (JSON)
    file: String,

    /// Document to load when FILE cannot be read
    #[arg(long)]
    fallback: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a single key path
    Lookup {
        key: String,
        /// Context substituted for '@'
        #[arg(short, long)]
        context: Option<String>,
        /// Print null instead of failing when the key is absent
        #[arg(long)]
        allow_absent: bool,
    },
    /// Resolve several keys under one root, in order
    Multilookup {
        root: String,
        #[arg(required = true)]
        keys: Vec<String>,
        #[arg(short, long)]
        context: Option<String>,
        #[arg(long)]
        allow_absent: bool,
    },
    /// Resolve every key path and report failures
    Check {
        /// Only check key paths under this prefix
        #[arg(long, default_value = "")]
        root: String,
        /// Check once per context (repeatable)
        #[arg(short, long = "context")]
        contexts: Vec<String>,
        /// Read the contexts from a list stored at this key
        #[arg(long, value_name = "KEY")]
        contexts_from: Option<String>,
        /// Stop at the first failure
        #[arg(long)]
        fail_fast: bool,
    },
    /// Print every resolved value under a root as JSON
    Dump {
        #[arg(default_value = "")]
        root: String,
        #[arg(short, long)]
        context: Option<String>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".into(),
        other => serde_json::to_string_pretty(&value_to_json(other)).unwrap_or_default(),
    }
}

fn load(cli: &Cli) -> Result<Document, DbError> {
    match &cli.fallback {
        Some(fallback) => Document::from_file_with_fallback(cli.file.as_str(), fallback.as_str()),
        None => Document::from_file(&cli.file),
    }
}

fn run(cli: Cli) -> Result<bool, DbError> {
    let doc = load(&cli)?;
    let resolver = Resolver::with_options(
        &doc,
        ResolverOptions {
            max_depth: cli.max_depth,
        },
    );

    match cli.command {
        Commands::Lookup {
            key,
            context,
            allow_absent,
        } => {
            let value = resolver.lookup(&key, context.as_deref(), allow_absent)?;
            println!("{}", render(&value));
        }
        Commands::Multilookup {
            root,
            keys,
            context,
            allow_absent,
        } => {
            for value in resolver.multilookup(&root, &keys, context.as_deref(), allow_absent)? {
                println!("{}", render(&value));
            }
        }
        Commands::Check {
            root,
            mut contexts,
            contexts_from,
            fail_fast,
        } => {
            if let Some(key) = contexts_from {
                contexts.extend(resolver.get::<Vec<String>>(&key, None)?);
            }
            info!(root = %root, contexts = contexts.len(), "starting check");

            let options = CheckOptions { root, contexts };
            let mut stop = FailFast;
            let mut accumulate = Accumulate::new();
            let policy: &mut dyn ErrorPolicy = if fail_fast { &mut stop } else { &mut accumulate };
            let report = check_document(&resolver, policy, &options)?;
            println!("{}", report.summary());
            return Ok(report.is_success());
        }
        Commands::Dump { root, context } => {
            println!("{}", export_resolved(&resolver, &root, context.as_deref())?);
        }
    }
    Ok(true)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
