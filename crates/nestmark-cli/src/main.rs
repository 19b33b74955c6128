use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use nestmark_config::Config;
use nestmark_engine::{ExportOptions, Exporter, Node};

#[derive(Debug, Parser)]
#[command(name = "nestmark")]
#[command(version, about = "Export editor JSON documents to Pandoc JSON", long_about = None)]
#[command(after_help = "EXAMPLES:
    nestmark doc.json -o doc.pandoc.json     Export a document
    cat doc.json | nestmark - | pandoc -f json -o doc.docx")]
struct Cli {
    /// Editor document as JSON, or `-` for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Write Pandoc JSON here instead of stdout
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Config file (defaults to ~/.config/nestmark/config.toml)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Pretty-print with this many spaces
    #[arg(long, value_name = "N", conflicts_with = "compact")]
    indent: Option<usize>,

    /// Write compact JSON even if the config sets an indent
    #[arg(long)]
    compact: bool,

    /// Pandoc API version to declare, e.g. 1.23.1
    #[arg(long, value_name = "X.Y.Z", value_parser = parse_api_version)]
    api_version: Option<[u32; 3]>,
}

fn parse_api_version(s: &str) -> Result<[u32; 3], String> {
    let parts: Vec<&str> = s.split('.').collect();
    let [major, minor, patch] = parts[..] else {
        return Err(format!("expected X.Y.Z, got '{s}'"));
    };
    let number = |part: &str| {
        part.parse::<u32>()
            .map_err(|e| format!("invalid version component '{part}': {e}"))
    };
    Ok([number(major)?, number(minor)?, number(patch)?])
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let options = resolve_options(cli, config.unwrap_or_default());

    let input = read_input(&cli.input)?;
    let doc = Node::from_json(&input).context("Failed to parse input document")?;
    let json = Exporter::new(options)
        .export(&doc)
        .context("Failed to export document")?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<Option<Config>> {
    let config_path = match explicit {
        Some(path) => Config::expand_path(path).unwrap_or_else(|| path.to_path_buf()),
        None => Config::config_path(),
    };
    log::debug!("Config path: {}", config_path.display());

    let config = Config::load_from_path(&config_path)?;
    if config.is_none() && explicit.is_some() {
        anyhow::bail!("Config file not found: {}", config_path.display());
    }
    Ok(config)
}

/// Command-line flags win over the config file.
fn resolve_options(cli: &Cli, config: Config) -> ExportOptions {
    let mut options = config.export_options();
    if let Some(version) = cli.api_version {
        options.api_version = version;
    }
    if cli.compact {
        options.indent = None;
    } else if cli.indent.is_some() {
        options.indent = cli.indent;
    }
    options
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {input}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("nestmark").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_api_version() {
        assert_eq!(parse_api_version("1.23.1"), Ok([1, 23, 1]));
        assert!(parse_api_version("1.23").is_err());
        assert!(parse_api_version("1.x.0").is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config {
            api_version: Some([1, 22, 0]),
            indent: Some(4),
            indexes: vec![],
        };
        let options = resolve_options(
            &cli(&["doc.json", "--indent", "2", "--api-version", "1.23.1"]),
            config,
        );

        assert_eq!(options.indent, Some(2));
        assert_eq!(options.api_version, [1, 23, 1]);
    }

    #[test]
    fn test_compact_clears_config_indent() {
        let config = Config {
            indent: Some(4),
            ..Config::default()
        };
        let options = resolve_options(&cli(&["-", "--compact"]), config);
        assert_eq!(options.indent, None);
    }

    #[test]
    fn test_indent_conflicts_with_compact() {
        let result = Cli::try_parse_from(["nestmark", "doc.json", "--indent", "2", "--compact"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.toml");
        assert!(load_config(Some(&missing)).is_err());
    }

    #[test]
    fn test_run_writes_output_file() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("doc.json");
        let output = temp_dir.path().join("doc.pandoc.json");
        let config = temp_dir.path().join("config.toml");
        std::fs::write(&config, "").unwrap();
        std::fs::write(
            &input,
            r#"{"type":"doc","content":[{"type":"horizontalRule"}]}"#,
        )
        .unwrap();

        let args = cli(&[
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
        ]);
        run(&args).unwrap();

        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            r#"{"pandoc-api-version":[1,23,1],"meta":{},"blocks":[{"t":"HorizontalRule"}]}"#
        );
    }

    #[test]
    fn test_failed_export_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("doc.json");
        let output = temp_dir.path().join("doc.pandoc.json");
        let config = temp_dir.path().join("config.toml");
        std::fs::write(&config, "").unwrap();
        std::fs::write(&input, r#"{"type":"doc","content":[{"type":"widget"}]}"#).unwrap();

        let args = cli(&[
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
        ]);
        let err = run(&args).unwrap_err();

        assert!(format!("{err:#}").contains("Unknown node type 'widget'"));
        assert!(!output.exists());
    }
}
