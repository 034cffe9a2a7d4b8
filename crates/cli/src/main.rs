mod config;
mod logging;
mod render;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use goml_core::{Element, EmitConfig, Indent, ParseResult, Parser, emit_document, to_pretty_json};
use goml_diagnostics::{self as diag, Diagnostic};

use crate::config::Config;
use crate::logging::{LoggingConfig, init_logging};
use crate::render::{Format, print_summary, render_diagnostics};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(ClapParser, Debug)]
#[command(
    name = "goml",
    version,
    about = "goml toolchain: parse, check, and format goml markup with prefab templates"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Log filter in `env_logger` syntax (e.g. "debug"). Overrides RUST_LOG.
    #[arg(long, global = true)]
    log: Option<String>,

    /// Project config (JSON) with element definitions and prefab files.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Accept NAME as an element. Repeatable.
    #[arg(long = "define", short = 'd', global = true, value_name = "NAME")]
    defines: Vec<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Parse a goml file and print its element tree.
    Parse {
        file: PathBuf,
        /// Also print the prefab templates known after parsing.
        #[arg(long)]
        prefabs: bool,
    },

    /// Syntax-check a goml file.
    Check { file: PathBuf },

    /// Format a goml file (one tag per line, canonical escapes).
    Format {
        file: PathBuf,
        /// Write formatted output back to the file (in-place).
        #[arg(long, short, conflicts_with = "check")]
        write: bool,
        /// Check if the file is already formatted (exit 1 if not). For CI.
        #[arg(long, conflicts_with = "write")]
        check: bool,
        /// Indentation style.
        #[arg(long, value_enum, default_value_t = IndentStyle::Two)]
        indent: IndentStyle,
    },

    /// Explain a diagnostic ID (e.g. GOML3002).
    Explain { id: String },
}

/// Indentation style for the `format` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum IndentStyle {
    /// No indentation.
    None,
    /// Two spaces per level.
    Two,
    /// Four spaces per level.
    Four,
    /// One tab per level.
    Tab,
}

impl From<IndentStyle> for Indent {
    fn from(s: IndentStyle) -> Self {
        match s {
            IndentStyle::None => Indent::None,
            IndentStyle::Two => Indent::Two,
            IndentStyle::Four => Indent::Four,
            IndentStyle::Tab => Indent::Tab,
        }
    }
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig {
        filter: cli.log.clone(),
    });
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match &cli.cmd {
        Cmd::Parse { file, prefabs } => cmd_parse(&cli, file, *prefabs, format)?,
        Cmd::Check { file } => cmd_check(&cli, file, format)?,
        Cmd::Format {
            file,
            write,
            check,
            indent,
        } => cmd_format(&cli, file, *write, *check, *indent, format)?,
        Cmd::Explain { id } => cmd_explain(id, format)?,
    }

    Ok(())
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_parse(cli: &Cli, file: &Path, with_prefabs: bool, format: Format) -> Result<()> {
    let mut parser = build_parser(cli)?;
    let (input, res) = parse_file(&mut parser, file)?;

    match format {
        Format::Json => {
            // Single valid JSON object to stdout.
            let mut out = serde_json::json!({
                "root": res.root,
                "diagnostics": res.diagnostics,
            });
            if with_prefabs {
                out["prefabs"] = serde_json::to_value(parser.prefabs())?;
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Tree to stdout, diagnostics to stderr.
            println!("{}", to_pretty_json(&res.root));
            if with_prefabs {
                println!("{}", to_pretty_json(parser.prefabs()));
            }
            if !res.diagnostics.is_empty() {
                render_diagnostics(&input, &file.display().to_string(), &res.diagnostics, format);
                print_summary(&res.diagnostics);
            }
        }
    }

    exit_on_errors(&res.diagnostics);
    Ok(())
}

fn cmd_check(cli: &Cli, file: &Path, format: Format) -> Result<()> {
    let mut parser = build_parser(cli)?;
    let (input, res) = parse_file(&mut parser, file)?;

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": res.ok(),
                "diagnostics": res.diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            render_diagnostics(&input, &file.display().to_string(), &res.diagnostics, format);
            print_summary(&res.diagnostics);
            if res.ok() {
                eprintln!("syntax ok");
            }
        }
    }

    exit_on_errors(&res.diagnostics);
    Ok(())
}

fn cmd_format(
    cli: &Cli,
    file: &Path,
    write: bool,
    check: bool,
    indent: IndentStyle,
    format: Format,
) -> Result<()> {
    let mut parser = build_parser(cli)?;
    let preloaded: Vec<String> = parser.prefabs().keys().cloned().collect();
    let (input, res) = parse_file(&mut parser, file)?;
    let name = file.display().to_string();

    // An invalid document has no tree to format.
    if !res.ok() {
        render_diagnostics(&input, &name, &res.diagnostics, format);
        print_summary(&res.diagnostics);
        exit_on_errors(&res.diagnostics);
    }

    let config = EmitConfig {
        indent: indent.into(),
    };
    let own: Vec<&Element> = parser
        .prefabs_in_order()
        .filter(|template| !preloaded.contains(&template.name))
        .collect();
    let formatted = emit_document(&res.root, own.iter().copied(), &config);

    if !reparses_unchanged(cli, &formatted, &res.root, &own)? {
        let diagnostic = Diagnostic::error(
            diag::codes::FORMAT_UNSTABLE,
            "formatted output would not parse back to the same document",
            None,
        )
        .with_context(BTreeMap::from([("file".to_string(), name.clone())]));
        let diagnostics = [diagnostic];
        render_diagnostics(&input, &name, &diagnostics, format);
        print_summary(&diagnostics);
        exit_on_errors(&diagnostics);
    }

    let already_formatted = formatted == input;

    if check {
        status_message(
            format,
            already_formatted,
            "already formatted",
            "not formatted",
            &name,
        );
        if !already_formatted {
            process::exit(1);
        }
    } else if write {
        if !already_formatted {
            fs::write(file, &formatted)
                .with_context(|| format!("failed to write '{name}'"))?;
        }
        status_message(
            format,
            !already_formatted,
            "formatted",
            "already formatted",
            &name,
        );
    } else {
        // Default: print formatted output to stdout.
        print!("{formatted}");
    }

    Ok(())
}

/// Emit a status message for --check / --write in the appropriate format.
fn status_message(format: Format, condition: bool, if_true: &str, if_false: &str, file: &str) {
    let msg = if condition { if_true } else { if_false };
    match format {
        Format::Json => {
            let out = serde_json::json!({ "status": msg, "file": file });
            println!(
                "{}",
                serde_json::to_string_pretty(&out).expect("status JSON serialization cannot fail")
            );
        }
        Format::Pretty => {
            eprintln!("{msg}: {file}");
        }
    }
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let text = diag::explain(id);
            let out = serde_json::json!({
                "id": id,
                "explanation": text,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Explanation is the expected output, so stdout.
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{id}: (no explanation available)");
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Exit with code 1 if any diagnostic is an error.
fn exit_on_errors(diagnostics: &[Diagnostic]) {
    if diagnostics.iter().any(Diagnostic::is_error) {
        process::exit(1);
    }
}

/// A parser seeded from `--config` and `--define`, with every configured
/// prefab file already parsed into its prefab table.
fn build_parser(cli: &Cli) -> Result<Parser> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let mut parser = Parser::new();
    parser.add_definitions(config.definitions);
    parser.add_definitions(cli.defines.iter().cloned());

    for path in &config.prefabs {
        let bytes =
            fs::read(path).with_context(|| format!("failed to read prefabs '{}'", path.display()))?;
        parser
            .parse(&bytes)
            .with_context(|| format!("failed to load prefabs from '{}'", path.display()))?;
    }
    log::debug!(
        "parser ready: {} definitions, {} prefabs",
        parser.definitions().count(),
        parser.prefabs().len()
    );
    Ok(parser)
}

/// Whether `formatted`, parsed by a parser set up like the original one,
/// gives back `root` and exactly the templates in `own`.
fn reparses_unchanged(
    cli: &Cli,
    formatted: &str,
    root: &Element,
    own: &[&Element],
) -> Result<bool> {
    let mut parser = build_parser(cli)?;
    let preloaded = parser.prefabs().len();
    let Ok(again) = parser.parse(formatted.as_bytes()) else {
        return Ok(false);
    };
    Ok(again == *root
        && parser.prefabs().len() == preloaded + own.len()
        && own
            .iter()
            .all(|template| parser.prefab(&template.name) == Some(*template)))
}

/// Read `file` and parse it. Returns the lossy source text for rendering.
fn parse_file(parser: &mut Parser, file: &Path) -> Result<(String, ParseResult)> {
    let bytes = fs::read(file).with_context(|| format!("failed to read '{}'", file.display()))?;
    let res = parser.parse_to_result(&bytes);
    Ok((String::from_utf8_lossy(&bytes).into_owned(), res))
}
