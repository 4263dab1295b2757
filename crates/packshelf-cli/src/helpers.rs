//! Shared helper functions used across CLI subcommands.
//!
//! Includes tracing initialization and plain-text rendering of packs,
//! search hits and scan warnings.

use std::fmt::Write as _;

use packshelf_packs::{IndexWarning, Pack, PackSummary, SearchHit};
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Map `-v` occurrences to a default log level.
pub fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Initialize the tracing subscriber with the given default log level.
///
/// `RUST_LOG` takes precedence when set. Logs go to stderr so command
/// output on stdout stays machine-readable.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render summaries as an aligned table with a header row.
pub fn render_table<'a>(rows: impl IntoIterator<Item = &'a PackSummary>) -> String {
    let rows: Vec<&PackSummary> = rows.into_iter().collect();
    if rows.is_empty() {
        return "  (no packs)\n".to_owned();
    }

    let name_w = rows.iter().map(|r| r.name.len()).max().unwrap_or(0).max(4);
    let version_w = rows.iter().map(|r| r.version.len()).max().unwrap_or(0).max(7);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<name_w$}  {:<7}  {:<version_w$}  DESCRIPTION",
        "NAME", "TYPE", "VERSION"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "  {:<name_w$}  {:<7}  {:<version_w$}  {}",
            row.name,
            row.kind.as_str(),
            row.version,
            truncate(&row.description, 60)
        );
    }
    out
}

/// Render search hits, reusing the table layout.
pub fn render_hits(hits: &[SearchHit]) -> String {
    render_table(hits.iter().map(|h| &h.pack))
}

/// Render the full detail view of one pack.
pub fn render_info(pack: &Pack, with_content: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  Name:        {}", pack.name);
    let _ = writeln!(out, "  Type:        {}", pack.kind);
    let _ = writeln!(out, "  Version:     {}", pack.version);
    let _ = writeln!(out, "  Author:      {}", pack.author);
    let _ = writeln!(out, "  License:     {}", pack.license);
    let tags = if pack.tags.is_empty() {
        "-".to_owned()
    } else {
        pack.tags.join(", ")
    };
    let _ = writeln!(out, "  Tags:        {tags}");
    let _ = writeln!(out, "  Description: {}", pack.description);
    let _ = writeln!(out, "  Path:        {}", pack.path.display());

    if with_content {
        out.push('\n');
        if pack.content.is_empty() {
            let _ = writeln!(out, "  ({} is missing)", pack.kind.content_file());
        } else {
            out.push_str(&pack.content);
            if !pack.content.ends_with('\n') {
                out.push('\n');
            }
        }
    }
    out
}

/// Render scan warnings, one per line.
pub fn render_warnings(warnings: &[IndexWarning]) -> String {
    let mut out = String::new();
    for w in warnings {
        let _ = writeln!(out, "  [!] {w}");
    }
    out
}

/// Shorten `s` to at most `max` characters, marking the cut with `...`.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_owned();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Author used for scaffolded packs when `--author` is not given.
pub fn default_author() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| "anonymous".to_owned())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
