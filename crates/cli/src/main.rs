mod box_file;
mod page_loader;
mod report;

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use layout_eval_core::pipeline::batch_evaluator::{BatchConfig, BatchEvaluator};
use layout_eval_core::pipeline::evaluate_page_use_case::PageMetrics;
use layout_eval_core::pipeline::infrastructure::threaded_batch_evaluator::ThreadedBatchEvaluator;
use layout_eval_core::shared::constants::{ALL_REGIONS_LABEL, DEFAULT_BATCH_WORKERS};
use layout_eval_core::shared::evaluation_config::EvaluationConfig;

use crate::page_loader::load_page;

/// Pixel-accurate evaluation of document layout segmentation.
///
/// Each page directory holds gt.boxes, hyp.boxes, gt.png and hyp.png.
#[derive(Parser)]
#[command(name = "layout-eval")]
struct Cli {
    /// Page directories to evaluate.
    #[arg(required = true)]
    pages: Vec<PathBuf>,

    /// JSON evaluation config (palette, classes, threshold).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only evaluate regions with this label ("all" keeps every region).
    #[arg(long, default_value = ALL_REGIONS_LABEL)]
    region_type: String,

    /// Fraction of a region's foreground a one-to-one match must recover
    /// to count as correct (0.0-1.0). Overrides the config file.
    #[arg(long)]
    threshold: Option<f64>,

    /// Write all page metrics to this file as JSON.
    #[arg(long)]
    json: Option<PathBuf>,

    /// Worker threads for multi-page runs.
    #[arg(long, default_value_t = DEFAULT_BATCH_WORKERS)]
    jobs: usize,

    /// Print one line per region.
    #[arg(long)]
    verbose: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = build_config(&cli)?;
    let region_type = (cli.region_type != ALL_REGIONS_LABEL).then_some(cli.region_type.as_str());

    let mut pages = Vec::with_capacity(cli.pages.len());
    for dir in &cli.pages {
        pages.push(load_page(dir, region_type, config.palette)?);
    }
    let names: Vec<String> = pages.iter().map(|p| p.name.clone()).collect();
    let total = pages.len();

    let mut batch = BatchConfig::new(config);
    if total > 1 {
        batch.on_progress = Some(Box::new(evaluation_progress));
    }
    let results = ThreadedBatchEvaluator::new(cli.jobs).evaluate(pages, batch);
    if total > 1 {
        eprintln!();
    }

    let mut evaluated: Vec<PageMetrics> = Vec::with_capacity(total);
    let mut failed = 0;
    for (name, result) in names.iter().zip(results) {
        match result {
            Ok(metrics) => {
                println!("{}", report::page_summary(&metrics));
                if cli.verbose {
                    let regions = report::region_lines(&metrics);
                    if !regions.is_empty() {
                        println!("{regions}");
                    }
                }
                println!();
                evaluated.push(metrics);
            }
            Err(e) => {
                eprintln!("Page {name} rejected: {e}");
                failed += 1;
            }
        }
    }

    if total > 1 {
        println!("{}", report::batch_summary(&evaluated, failed));
    }

    if let Some(path) = &cli.json {
        fs::write(path, serde_json::to_string_pretty(&evaluated)?)?;
        log::info!("Wrote metrics for {} pages to {}", evaluated.len(), path.display());
    }

    if failed > 0 {
        return Err(format!("{failed} of {total} pages could not be evaluated").into());
    }
    Ok(())
}

fn build_config(cli: &Cli) -> Result<EvaluationConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => EvaluationConfig::load(path)?,
        None => EvaluationConfig::default(),
    };
    if let Some(threshold) = cli.threshold {
        config.correct_segmentation_threshold = threshold;
    }
    config.validate()?;
    Ok(config)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    for dir in &cli.pages {
        if !dir.is_dir() {
            return Err(format!("Page directory not found: {}", dir.display()).into());
        }
    }
    if let Some(path) = &cli.config {
        if !path.is_file() {
            return Err(format!("Config file not found: {}", path.display()).into());
        }
    }
    if let Some(threshold) = cli.threshold {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(format!("Threshold must be between 0.0 and 1.0, got {threshold}").into());
        }
    }
    if cli.jobs == 0 {
        return Err("Jobs must be at least 1".into());
    }
    if cli.region_type.trim().is_empty() {
        return Err("Region type must not be empty".into());
    }
    Ok(())
}

fn evaluation_progress(done: usize, total: usize) {
    let pct = (done as f64 / total as f64 * 100.0) as u32;
    eprint!("\rEvaluating pages... {done}/{total} ({pct}%)");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_loader::tests::write_page;
    use rstest::rstest;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("layout-eval").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let parsed = cli(&["page"]);
        assert_eq!(parsed.region_type, ALL_REGIONS_LABEL);
        assert_eq!(parsed.jobs, DEFAULT_BATCH_WORKERS);
        assert!(parsed.threshold.is_none());
        assert!(!parsed.verbose);
    }

    #[test]
    fn test_page_required() {
        assert!(Cli::try_parse_from(["layout-eval"]).is_err());
    }

    #[rstest]
    #[case::threshold_too_high(&["--threshold", "1.5"])]
    #[case::negative_threshold(&["--threshold=-0.1"])]
    #[case::zero_jobs(&["--jobs", "0"])]
    #[case::blank_region_type(&["--region-type", " "])]
    fn test_validate_rejects(#[case] extra: &[&str]) {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().to_str().unwrap();
        let mut args = vec![page];
        args.extend_from_slice(extra);
        assert!(validate(&cli(&args)).is_err());
    }

    #[test]
    fn test_validate_missing_page_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        assert!(validate(&cli(&[missing.to_str().unwrap()])).is_err());
    }

    #[test]
    fn test_threshold_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("eval.json");
        fs::write(&config_path, r#"{"correct_segmentation_threshold": 0.8}"#).unwrap();
        let config_arg = config_path.to_str().unwrap();

        let from_file = build_config(&cli(&["page", "--config", config_arg])).unwrap();
        assert_eq!(from_file.correct_segmentation_threshold, 0.8);

        let overridden =
            build_config(&cli(&["page", "--config", config_arg, "--threshold", "0.5"])).unwrap();
        assert_eq!(overridden.correct_segmentation_threshold, 0.5);
    }

    #[test]
    fn test_loaded_page_evaluates() {
        let dir = tempfile::tempdir().unwrap();
        write_page(dir.path());
        let page = load_page(dir.path(), None, EvaluationConfig::default().palette).unwrap();

        let results = ThreadedBatchEvaluator::new(1)
            .evaluate(vec![page], BatchConfig::new(EvaluationConfig::default()));
        let metrics = results.into_iter().next().unwrap().unwrap();

        // Left half of the region detected: 50 of 100 foreground pixels.
        assert_eq!(metrics.hypothesis.total_true_positive_fg_pix, 50);
        assert_eq!(metrics.hypothesis.correct_segmentations, 0);
        assert_eq!(metrics.hypothesis.total_true_negative_fg_pix, 10);
        assert_eq!(metrics.ground_truth.total_seg_fg_pixels, 100);
    }
}
