//! Batch CLI: classify every sign image in a folder and write the report
//!
//! Usage: `signscan <sign-type> [config.json]`
//!
//! Without a config file the built-in defaults apply (input folder
//! `images/`, report under `images/output/results.txt`). Per-image failures
//! are recorded as outcomes and never abort the run; only a report-write
//! failure exits non-zero after processing.

use std::path::Path;
use std::process;

use opencv::core::Vector;
use opencv::imgcodecs::imwrite;
use tracing::{error, info, warn};

use signscan::{
    image_loader, DebugOutput, PipelineConfig, RecordedOutcome, SignClassifier, SignType,
    StatsManager,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_help(&args[0]);
        process::exit(1);
    }

    // Bad sign-type keys are a caller defect; reject before touching images.
    let sign_type: SignType = match args[1].parse() {
        Ok(sign_type) => sign_type,
        Err(e) => {
            error!(error = %e, "unrecognized sign type");
            print_help(&args[0]);
            process::exit(1);
        }
    };

    let config = match args.get(2) {
        Some(path) => match PipelineConfig::from_json_file(Path::new(path)) {
            Ok(config) => config,
            Err(e) => {
                error!(error = %e, path, "failed to load configuration");
                process::exit(1);
            }
        },
        None => PipelineConfig::default(),
    };

    if let Err(e) = run(&config, sign_type) {
        error!(error = %e, "batch run failed");
        process::exit(1);
    }
}

fn run(config: &PipelineConfig, sign_type: SignType) -> signscan::Result<()> {
    let classifier = SignClassifier::new(config);
    let mut stats = StatsManager::new(config.scoring);

    let files = image_loader::list_image_files(&config.input_path, &config.io.supported_extensions)?;
    info!(
        count = files.len(),
        input = %config.input_path.display(),
        sign_type = %sign_type,
        "processing folder"
    );

    let debug_base = config.input_path.join(&config.io.debug_folder);
    for (index, path) in files.iter().enumerate() {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unknown")
            .to_string();
        info!(progress = format!("{}/{}", index + 1, files.len()), file = %file_name, "processing");

        stats.record_processed();
        let outcome = match image_loader::load_image(path) {
            Ok(image) => {
                if config.io.write_debug_images {
                    classify_with_debug(&classifier, &image, sign_type, &debug_base, &file_name)
                } else {
                    classifier.classify_outcome(&image, sign_type)
                }
            }
            Err(e) => {
                warn!(file = %file_name, error = %e, "image could not be read");
                RecordedOutcome::Known(signscan::Outcome::ImageReadError)
            }
        };
        info!(file = %file_name, outcome = %outcome, "recorded");
        stats.add_result(file_name, outcome);
    }

    stats.calculate_total_score();

    let output_dir = config.input_path.join(&config.io.output_folder);
    std::fs::create_dir_all(&output_dir).map_err(|e| signscan::ClassifyError::ReportWrite {
        path: output_dir.display().to_string(),
        source: e,
    })?;
    let report_path = output_dir.join(&config.io.results_file_name);
    stats.write_report(&report_path)?;

    info!(
        report = %report_path.display(),
        total_score = stats.total_score(),
        "processing completed"
    );
    Ok(())
}

/// Run the debug pipeline and persist per-stage artifacts next to the input.
/// Artifact-write failures are logged and ignored; the outcome still counts.
fn classify_with_debug(
    classifier: &SignClassifier,
    image: &opencv::core::Mat,
    sign_type: SignType,
    debug_base: &Path,
    file_name: &str,
) -> RecordedOutcome {
    match classifier.classify_debug(image, sign_type) {
        Ok((direction, debug)) => {
            let stem = Path::new(file_name)
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or(file_name);
            if let Err(e) = save_debug_images(image, &debug, &debug_base.join(stem)) {
                warn!(file = %file_name, error = %e, "failed to save debug artifacts");
            }
            RecordedOutcome::Known(direction.into())
        }
        Err(error) => match signscan::Outcome::from_error(&error) {
            Some(outcome) => RecordedOutcome::Known(outcome),
            None => RecordedOutcome::Unexpected(error.to_string()),
        },
    }
}

fn save_debug_images(
    original: &opencv::core::Mat,
    debug: &DebugOutput,
    dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)?;
    let stages: [(&str, &opencv::core::Mat); 5] = [
        ("1_original", original),
        ("2_color_mask", &debug.color_mask),
        ("3_detected_ellipse", &debug.annotated),
        ("4_masked_image", &debug.masked_image),
        ("5_result", &debug.summary),
    ];
    for (name, mat) in stages {
        let path = dir.join(format!("{name}.png"));
        let path = path.to_str().ok_or("invalid debug path")?;
        imwrite(path, mat, &Vector::new())?;
    }
    Ok(())
}

fn print_help(program: &str) {
    eprintln!("Usage: {program} <sign-type> [config.json]");
    eprintln!();
    eprintln!("Classify the arrow direction of every sign image in a folder.");
    eprintln!();
    eprintln!("Sign types:");
    eprintln!("  ahead-left-only, ahead-right-only     top-quadrant comparison");
    eprintln!("  turn-left-ahead, turn-right-ahead,");
    eprintln!("  left-only, right-only                 side-average comparison");
    eprintln!("  keep-left, keep-right                 left-column comparison");
    eprintln!("  no-left-turn, no-right-turn           diagonal comparison");
    eprintln!();
    eprintln!("The optional JSON config controls the input folder, color bands,");
    eprintln!("detection thresholds, score weights, and debug artifact output.");
}
