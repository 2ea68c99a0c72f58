//! Output formatting: table, JSON, plain.
//!
//! Renders data in the format selected by `--output` / `--dump`. Tables use
//! `tabled`, structured formats use serde, plain emits one identifier per line.
//! `--dump` bypasses the typed views and prints controller payloads verbatim.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde_json::Value;
use tabled::{Table, Tabled, settings::Style};

use omada_api::model::{LinkStatus, RawData};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Symbols for boolean state in detail views.
#[derive(Debug, Clone, Copy)]
pub struct Marks {
    color: bool,
}

impl Marks {
    pub fn new(global: &GlobalOpts) -> Self {
        Self {
            color: should_color(global.color),
        }
    }

    pub fn check(self, on: bool) -> String {
        match (on, self.color) {
            (true, true) => "✓".green().to_string(),
            (false, true) => "✗".red().to_string(),
            (true, false) => "✓".into(),
            (false, false) => "✗".into(),
        }
    }

    pub fn link(self, status: LinkStatus) -> String {
        let up = status == LinkStatus::Up;
        match (up, self.color) {
            (true, true) => "up".green().to_string(),
            (false, true) => "down".dimmed().to_string(),
            (true, false) => "up".into(),
            (false, false) => "down".into(),
        }
    }

    /// Highlight for "needs attention" values such as pending upgrades.
    pub fn warn(self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_owned()
        }
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    Ok(match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    })
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, which returns a pre-formatted view.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    Ok(match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Plain => id_fn(data),
    })
}

/// [`render_list`] for controller entities; `--dump` prints each entity's
/// JSON as the controller sent it.
pub fn render_entities<T, R>(
    global: &GlobalOpts,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + RawData,
    R: Tabled,
{
    if global.dump {
        let raw: Vec<&Value> = data.iter().map(RawData::raw_data).collect();
        return Ok(serde_json::to_string_pretty(&raw)?);
    }
    render_list(global.output, data, to_row, id_fn)
}

/// [`render_single`] for a controller entity; `--dump` prints its raw JSON.
pub fn render_entity<T>(
    global: &GlobalOpts,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize + RawData,
{
    if global.dump {
        return Ok(serde_json::to_string_pretty(data.raw_data())?);
    }
    render_single(global.output, data, detail_fn, id_fn)
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Status message for write commands; goes to stderr so piped output stays clean.
pub fn print_status(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{message}");
    }
}

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

// ── Value formatting ─────────────────────────────────────────────────

/// Byte count with binary units, e.g. `1.5 MiB`.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn display_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in UNITS.iter().skip(1).copied() {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{value:.1} {unit}")
}

/// Seconds as `1d 02:03:04`.
pub fn display_duration(secs: u64) -> String {
    let days = secs / 86_400;
    let rest = secs % 86_400;
    let clock = format!("{:02}:{:02}:{:02}", rest / 3600, rest % 3600 / 60, rest % 60);
    if days > 0 {
        format!("{days}d {clock}")
    } else {
        clock
    }
}

pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_use_binary_units() {
        assert_eq!(display_bytes(512), "512 B");
        assert_eq!(display_bytes(1536), "1.5 KiB");
        assert_eq!(display_bytes(3 * 1024 * 1024), "3.0 MiB");
    }

    #[test]
    fn durations_include_days() {
        assert_eq!(display_duration(59), "00:00:59");
        assert_eq!(display_duration(90_061), "1d 01:01:01");
    }

    #[test]
    fn empty_values_render_as_dash() {
        assert_eq!(or_dash(None), "-");
        assert_eq!(or_dash(Some("")), "-");
        assert_eq!(or_dash(Some("10.0.0.1")), "10.0.0.1");
    }

    #[test]
    fn plain_marks_have_no_escape_codes() {
        let marks = Marks { color: false };
        assert_eq!(marks.check(true), "✓");
        assert_eq!(marks.link(LinkStatus::Down), "down");
    }
}
