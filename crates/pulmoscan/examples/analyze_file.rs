use pulmoscan::{Analyzer, AnalyzerConfig};
use std::error::Error;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage: {} <xray.(png|jpg)> [overlay.jpg] [config.json]",
            args[0]
        );
        std::process::exit(2);
    }

    let config = match args.get(3) {
        Some(path) => AnalyzerConfig::from_json_file(Path::new(path))?,
        None => AnalyzerConfig::default(),
    };
    let bytes = std::fs::read(&args[1])?;
    let result = Analyzer::with_config(config).analyze(&bytes)?;

    println!(
        "score={:.3} confidence={:.3} regions={}",
        result.tb_probability,
        result.confidence_score,
        result.regions.len()
    );
    for finding in &result.findings {
        println!("  {} ({}) p={:.2}", finding.label, finding.severity, finding.probability);
    }

    if let Some(out_path) = args.get(2) {
        result.write_overlay(Path::new(out_path))?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
