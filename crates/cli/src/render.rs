//! Diagnostic output for the `goml` binary.
//!
//! A goml parse stops at its first error, so a file yields at most one
//! diagnostic. Interactive runs get an ariadne report that underlines the
//! offending bytes; piped runs get the diagnostics as a JSON array.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Fmt, IndexType, Label, Report, ReportKind, Source};
use goml_diagnostics::Diagnostic;

/// How diagnostics and command results are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// ariadne report on stderr.
    Pretty,
    /// JSON on stdout.
    Json,
}

impl Format {
    /// The format named by `--output`, or pretty on a terminal and JSON
    /// when stdout is redirected.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ if io::stdout().is_terminal() => Format::Pretty,
            _ => Format::Json,
        }
    }
}

/// Write `diagnostics` for the file `filename` holding `source`.
pub(crate) fn render_diagnostics(
    source: &str,
    filename: &str,
    diagnostics: &[Diagnostic],
    format: Format,
) {
    match format {
        Format::Pretty => {
            for diag in diagnostics {
                report(source, filename, diag);
            }
        }
        Format::Json => {
            let json = serde_json::to_string_pretty(diagnostics)
                .expect("diagnostic serialization cannot fail");
            println!("{json}");
        }
    }
}

fn report(source: &str, filename: &str, diag: &Diagnostic) {
    let Some(span) = diag.span else {
        eprintln!("{}: {diag}", filename.fg(Color::Red));
        if let Some(help) = diag.explain() {
            eprintln!("  = help: {help}");
        }
        return;
    };

    let start = span.start.min(source.len());
    let range = start..span.end.clamp(start, source.len());
    let context = diag.context.as_ref();

    let mut builder = Report::build(ReportKind::Error, (filename, range.clone()))
        .with_config(Config::default().with_index_type(IndexType::Byte))
        .with_code(diag.id.as_ref())
        .with_message(&diag.message)
        .with_label(
            Label::new((filename, range))
                .with_message(label(diag))
                .with_color(Color::Red),
        );
    if let Some(near) = context.and_then(|ctx| ctx.get("near")) {
        builder = builder.with_note(format!("near `{}`", near.escape_debug()));
    }
    if let Some(help) = diag.explain() {
        builder = builder.with_help(help);
    }
    let mut cache = (filename, Source::from(source));
    builder.finish().eprint(&mut cache).ok();
}

/// Underline text: names the element or prefab the error is about.
fn label(diag: &Diagnostic) -> String {
    let context = diag.context.as_ref();
    if let Some(name) = context.and_then(|ctx| ctx.get("element")) {
        format!("`{name}` is neither a definition nor a prefab")
    } else if let Some(name) = context.and_then(|ctx| ctx.get("prefab")) {
        format!("`{name}` defined again here")
    } else {
        diag.message.clone()
    }
}

/// `1 error` on stderr when `diagnostics` holds any error.
pub(crate) fn print_summary(diagnostics: &[Diagnostic]) {
    let errors = diagnostics.iter().filter(|d| d.is_error()).count();
    if errors == 0 {
        return;
    }
    let plural = if errors == 1 { "" } else { "s" };
    eprintln!("{}", format!("{errors} error{plural}").fg(Color::Red));
}
