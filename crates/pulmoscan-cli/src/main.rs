//! Command-line front end for the pulmoscan radiograph analyzer.

use clap::{Args, Parser, Subcommand};
use pulmoscan::{AnalysisResult, Analyzer, AnalyzerConfig};
use std::path::{Path, PathBuf};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "pulmoscan")]
#[command(
    about = "Highlight candidate opacities in chest X-rays and report a heuristic screening score"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a radiograph image.
    Analyze(CliAnalyzeArgs),

    /// Print (or write) the default analyzer configuration as JSON.
    DefaultConfig {
        /// Write the configuration to this path instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Args)]
struct CliAnalyzeArgs {
    /// Path to the input image (JPEG, PNG, BMP).
    #[arg(long)]
    image: PathBuf,

    /// Path to write the analysis report (JSON).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Path to write the annotated overlay (JPEG).
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Analyzer configuration overrides (JSON); missing fields keep defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Embed the overlay as base64 text in the JSON report.
    #[arg(long)]
    embed_overlay: bool,

    /// Override the fixed binarization level (0-255).
    #[arg(long)]
    fixed_threshold: Option<u8>,

    /// Override the minimum region area in pixels.
    #[arg(long)]
    min_area: Option<f64>,
}

impl CliAnalyzeArgs {
    fn to_config(&self) -> CliResult<AnalyzerConfig> {
        let mut config = match &self.config {
            Some(path) => AnalyzerConfig::from_json_file(path)?,
            None => AnalyzerConfig::default(),
        };
        if let Some(level) = self.fixed_threshold {
            config.threshold.fixed_level = level;
        }
        if let Some(area) = self.min_area {
            if area.is_nan() || area < 0.0 {
                return Err(format!("--min-area must be non-negative, got {}", area).into());
            }
            config.regions.min_area_px = area;
        }
        Ok(config)
    }
}

/// JSON report layout: the analysis result plus the optional inline overlay.
#[derive(serde::Serialize)]
struct Report<'a> {
    image: String,
    #[serde(flatten)]
    result: &'a AnalysisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_base64: Option<String>,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => run_analyze(&args),
        Commands::DefaultConfig { out } => run_default_config(out.as_deref()),
    }
}

// ── default-config ─────────────────────────────────────────────────────

fn run_default_config(out: Option<&Path>) -> CliResult<()> {
    let json = AnalyzerConfig::default().to_json_pretty();
    match out {
        Some(path) => {
            std::fs::write(path, &json)?;
            tracing::info!("Default config written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

// ── analyze ────────────────────────────────────────────────────────────

fn run_analyze(args: &CliAnalyzeArgs) -> CliResult<()> {
    tracing::info!("Loading image: {}", args.image.display());
    let bytes = std::fs::read(&args.image).map_err(|e| -> CliError {
        format!("Failed to read image {}: {}", args.image.display(), e).into()
    })?;

    let config = args.to_config()?;
    let analyzer = Analyzer::with_config(config);
    let result = analyzer.analyze(&bytes).map_err(|e| -> CliError {
        if e.is_client_error() {
            format!("{} is not a usable image: {}", args.image.display(), e).into()
        } else {
            e.into()
        }
    })?;

    print_summary(&result);

    if let Some(path) = &args.out {
        let report = Report {
            image: args.image.display().to_string(),
            result: &result,
            image_base64: args.embed_overlay.then(|| result.overlay_base64()),
        };
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, &json)?;
        tracing::info!("Report written to {}", path.display());
    }

    if let Some(path) = &args.overlay {
        result.write_overlay(path)?;
        tracing::info!("Overlay written to {}", path.display());
    }

    Ok(())
}

fn print_summary(result: &AnalysisResult) {
    println!(
        "Image {}x{}: {} candidate region(s)",
        result.image_size[0],
        result.image_size[1],
        result.regions.len()
    );
    println!(
        "  screening score: {:.3} (heuristic, not a clinical probability)",
        result.tb_probability
    );
    println!("  confidence:      {:.3}", result.confidence_score);
    for finding in &result.findings {
        println!(
            "  - {} [{}] p={:.3}",
            finding.label, finding.severity, finding.probability
        );
    }
    for (i, region) in result.regions.iter().enumerate() {
        println!(
            "  region {}: at ({:.1}%, {:.1}%) area={:.0}px severity={:.3}",
            i, region.x_percent, region.y_percent, region.pixel_area, region.severity
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn analyze_flags_override_config() {
        let cli = Cli::parse_from([
            "pulmoscan",
            "analyze",
            "--image",
            "x.png",
            "--fixed-threshold",
            "170",
            "--min-area",
            "50",
        ]);
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze subcommand");
        };
        let cfg = args.to_config().expect("valid overrides");
        assert_eq!(cfg.threshold.fixed_level, 170);
        assert_eq!(cfg.regions.min_area_px, 50.0);
        assert_eq!(cfg.scoring, pulmoscan::ScoringConfig::default());
    }

    #[test]
    fn negative_min_area_is_rejected() {
        let cli = Cli::parse_from([
            "pulmoscan",
            "analyze",
            "--image",
            "x.png",
            "--min-area=-5",
        ]);
        let Commands::Analyze(args) = cli.command else {
            panic!("expected analyze subcommand");
        };
        assert!(args.to_config().is_err());
    }
}
