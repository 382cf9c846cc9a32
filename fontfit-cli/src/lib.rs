//! fontfit CLI

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, ValueHint};

use fontfit_core::output::{write_json_pretty, ProbeReport};
use fontfit_core::probe::find_compatible_fonts;
use fontfit_core::registry::FontRegistry;
use fontfit_core::render::SwashRenderer;

/// Default sample text, deliberately multi-script.
pub const DEFAULT_TEST_TEXT: &str = "Hello 中文测试";

/// CLI entrypoint for fontfit.
#[derive(Debug, Parser)]
#[command(
    name = "fontfit",
    about = "Find installed fonts that can render a text sample without missing glyphs"
)]
pub struct Cli {
    /// Words joined into the sample text (defaults to "Hello 中文测试")
    #[arg(value_hint = ValueHint::Other)]
    words: Vec<String>,

    /// Save a comparison sheet image (PNG) to this path
    #[arg(short = 'o', long = "output", value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Extra font directories to load before probing
    #[arg(short = 'd', long = "font-dir", value_hint = ValueHint::DirPath)]
    font_dirs: Vec<PathBuf>,

    /// Skip the platform font directories
    #[arg(long = "no-system-fonts", action = ArgAction::SetTrue)]
    no_system_fonts: bool,

    /// Emit the result as a JSON report
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,
}

/// Parse CLI args and run the probe.
pub fn run() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let stdout = io::stdout();
    run_probe(cli, stdout.lock())
}

fn run_probe(cli: Cli, mut w: impl Write) -> Result<()> {
    let text = if cli.words.is_empty() {
        DEFAULT_TEST_TEXT.to_string()
    } else {
        cli.words.join(" ")
    };

    let mut registry = FontRegistry::new();
    if !cli.no_system_fonts {
        for root in system_font_roots() {
            let loaded = registry.load_directory(&root)?;
            log::info!("loaded {loaded} fonts from {}", root.display());
        }
    }
    for dir in &cli.font_dirs {
        let loaded = registry.load_directory(dir)?;
        log::info!("loaded {loaded} fonts from {}", dir.display());
    }

    let renderer = SwashRenderer::default();
    let compatible = find_compatible_fonts(&registry, &renderer, &text, cli.output.as_deref())?;

    if cli.json {
        let report = ProbeReport {
            text,
            compatible: compatible.into_iter().collect(),
        };
        return write_json_pretty(&report, w);
    }

    writeln!(w, "Testing font compatibility for: '{text}'")?;
    writeln!(w, "{}", "-".repeat(50))?;

    if compatible.is_empty() {
        writeln!(w, "No compatible fonts found for the given text.")?;
    } else {
        writeln!(w, "Found {} compatible fonts:", compatible.len())?;
        writeln!(w)?;
        for name in &compatible {
            writeln!(w, "  • {name}")?;
        }
    }

    Ok(())
}

/// Platform font directories, filtered to those that exist.
///
/// `FONTFIT_SYSTEM_FONT_DIRS` (colon/semicolon separated) overrides the
/// per-OS candidates, mainly for tests.
fn system_font_roots() -> Vec<PathBuf> {
    if let Ok(raw) = env::var("FONTFIT_SYSTEM_FONT_DIRS") {
        let mut overrides: Vec<PathBuf> = raw
            .split([':', ';'])
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .filter(|p| p.exists())
            .collect();

        overrides.sort();
        overrides.dedup();

        if overrides.is_empty() {
            log::warn!("FONTFIT_SYSTEM_FONT_DIRS is set but no paths exist");
        }
        return overrides;
    }

    let mut candidates: Vec<PathBuf> = Vec::new();

    #[cfg(target_os = "macos")]
    {
        candidates.push(PathBuf::from("/System/Library/Fonts"));
        candidates.push(PathBuf::from("/Library/Fonts"));
        if let Some(home) = env::var_os("HOME") {
            candidates.push(PathBuf::from(home).join("Library/Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        candidates.push(PathBuf::from("/usr/share/fonts"));
        candidates.push(PathBuf::from("/usr/local/share/fonts"));
        if let Some(home) = env::var_os("HOME") {
            candidates.push(PathBuf::from(home).join(".local/share/fonts"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(system_root) = env::var_os("SYSTEMROOT") {
            candidates.push(PathBuf::from(system_root).join("Fonts"));
        }
        if let Some(local_appdata) = env::var_os("LOCALAPPDATA") {
            candidates.push(PathBuf::from(local_appdata).join("Microsoft/Windows/Fonts"));
        }
    }

    candidates.retain(|p| p.exists());
    candidates.sort();
    candidates.dedup();

    if candidates.is_empty() {
        log::warn!("no system font directories found for this platform");
    }

    candidates
}
