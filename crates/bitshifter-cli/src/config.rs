use std::path::PathBuf;

use anyhow::{Context, bail};
use bitshifter::expr::Dialect;

/// Environment variable that selects the dialect when no flag is given.
pub const DIALECT_ENV: &str = "BITSHIFTER_DIALECT";

pub const USAGE: &str = "\
usage: bitshifter [--dialect <java|rust|c>] [SCHEMA]

SCHEMA is a JSON schema file, or `-` to read it from stdin.
Without SCHEMA the built-in demo packet is planned.

environment:
  BITSHIFTER_DIALECT   dialect used when --dialect is absent
  RUST_LOG             log filter (default: warn)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Demo,
    Stdin,
    Path(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: Source,
    /// Dialect from the command line or environment; `None` defers to the schema.
    pub dialect: Option<Dialect>,
    pub help: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::parse(std::env::args().skip(1), std::env::var(DIALECT_ENV).ok())
    }

    pub fn parse(
        args: impl IntoIterator<Item = String>,
        env_dialect: Option<String>,
    ) -> anyhow::Result<Self> {
        let mut source = Source::Demo;
        let mut dialect = None;
        let mut help = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => help = true,
                "--dialect" => {
                    let value = args.next().context("--dialect needs a value")?;
                    dialect = Some(parse_dialect(&value)?);
                }
                "-" => source = Source::Stdin,
                _ if arg.starts_with("--dialect=") => {
                    dialect = Some(parse_dialect(&arg["--dialect=".len()..])?);
                }
                _ if arg.starts_with('-') => bail!("unknown option `{arg}`\n\n{USAGE}"),
                _ => {
                    if source != Source::Demo {
                        bail!("only one schema may be given\n\n{USAGE}");
                    }
                    source = Source::Path(PathBuf::from(arg));
                }
            }
        }

        if dialect.is_none() {
            dialect = env_dialect
                .as_deref()
                .map(parse_dialect)
                .transpose()
                .with_context(|| format!("invalid {DIALECT_ENV}"))?;
        }

        Ok(Config {
            source,
            dialect,
            help,
        })
    }
}

fn parse_dialect(value: &str) -> anyhow::Result<Dialect> {
    Ok(value.parse::<Dialect>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_to_demo() {
        let config = Config::parse(args(&[]), None).unwrap();
        assert_eq!(config.source, Source::Demo);
        assert_eq!(config.dialect, None);
        assert!(!config.help);
    }

    #[test]
    fn test_schema_path_and_flag() {
        let config = Config::parse(args(&["--dialect", "rust", "packet.json"]), None).unwrap();
        assert_eq!(config.source, Source::Path(PathBuf::from("packet.json")));
        assert_eq!(config.dialect, Some(Dialect::Rust));
    }

    #[test]
    fn test_flag_beats_env() {
        let config = Config::parse(args(&["--dialect=c", "-"]), Some("rust".into())).unwrap();
        assert_eq!(config.source, Source::Stdin);
        assert_eq!(config.dialect, Some(Dialect::C));
    }

    #[test]
    fn test_env_used_without_flag() {
        let config = Config::parse(args(&[]), Some("RUST".into())).unwrap();
        assert_eq!(config.dialect, Some(Dialect::Rust));
    }

    #[test]
    fn test_unknown_dialect_message() {
        let err = Config::parse(args(&["--dialect", "go"]), None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown dialect `go` (expected java, rust or c)"
        );

        let err = Config::parse(args(&[]), Some("cobol".into())).unwrap_err();
        assert_eq!(err.to_string(), format!("invalid {DIALECT_ENV}"));
        assert!(format!("{err:#}").contains("unknown dialect `cobol`"));
    }

    #[test]
    fn test_bad_values() {
        assert!(Config::parse(args(&["--dialect", "go"]), None).is_err());
        assert!(Config::parse(args(&["--dialect"]), None).is_err());
        assert!(Config::parse(args(&["--verbose"]), None).is_err());
        assert!(Config::parse(args(&["a.json", "b.json"]), None).is_err());
        assert!(Config::parse(args(&[]), Some("cobol".into())).is_err());
    }
}
