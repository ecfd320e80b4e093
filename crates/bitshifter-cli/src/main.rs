//! bitshifter command-line front end.
//!
//! Plans a JSON schema and prints the layout table.
//!
//! # Usage
//!
//! ```bash
//! # Built-in demo packet
//! bitshifter
//!
//! # Plan a schema file, emitting Rust statements
//! bitshifter --dialect rust packet.json
//!
//! # Schema on stdin, dialect from the environment, planner logs on stderr
//! BITSHIFTER_DIALECT=c RUST_LOG=bitshifter=debug bitshifter - < packet.json
//! ```

mod config;

use std::{fs, io::Read, process::ExitCode};

use anyhow::Context;
use bitshifter::{
    plan::Layout,
    report::{Report, render_error},
    serde::SchemaDef,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, Source, USAGE};

const DEMO_SCHEMA: &str = include_str!("demo.json");

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let config = Config::from_env()?;
    if config.help {
        println!("{USAGE}");
        return Ok(ExitCode::SUCCESS);
    }

    let def = load_schema(&config.source)?;
    let dialect = config
        .dialect
        .or(def.dialect.map(Into::into))
        .unwrap_or_default();

    debug!(fields = def.fields.len(), dialect = dialect.name(), "schema loaded");

    match Layout::try_from(def) {
        Ok(layout) => {
            println!("{}", Report::new(&layout, dialect));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            println!("{}", render_error(&err));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn load_schema(source: &Source) -> anyhow::Result<SchemaDef> {
    let text = match source {
        Source::Demo => DEMO_SCHEMA.to_string(),
        Source::Stdin => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read schema from stdin")?;
            text
        }
        Source::Path(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read schema {}", path.display()))?,
    };

    serde_json::from_str(&text).context("invalid schema")
}
