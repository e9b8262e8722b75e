//! Command-line interface for solar_defect_mapper
//!
//! Maps the defects of one inspection and writes the metrics exports

use solar_defect_mapper::report::{crop_requests, export_metrics_csv, export_metrics_json};
use solar_defect_mapper::{map_inspection, InspectionConfig, InspectionOutcome};
use std::{
    env, fs,
    path::{Path, PathBuf},
    process,
};

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    let mut output_override = None;
    let mut show_crops = false;
    let mut config_path_arg = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--output" | "-o" => {
                if i + 1 >= args.len() {
                    eprintln!("Error: --output requires a directory");
                    process::exit(1);
                }
                output_override = Some(PathBuf::from(&args[i + 1]));
                i += 1;
            }
            "--crops" => show_crops = true,
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => {
                if config_path_arg.is_none() {
                    config_path_arg = Some(arg.to_string());
                } else {
                    eprintln!("Error: Multiple config paths provided");
                    process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }

    let config_path = match config_path_arg {
        Some(path) => PathBuf::from(path),
        None => {
            print_help(&args[0]);
            process::exit(1);
        }
    };

    let mut config = match InspectionConfig::from_json_file(&config_path) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Error: {}", error);
            eprintln!("{}", error.user_message());
            process::exit(1);
        }
    };
    if let Some(dir) = output_override {
        config.output_path = dir;
    }

    let outcome = match map_inspection(&config) {
        Ok(outcome) => outcome,
        Err(error) => {
            eprintln!("Mapping failed: {}", error);
            if error.is_recoverable() {
                eprintln!("Suggestion: {}", error.user_message());
            }
            process::exit(1);
        }
    };

    if let Err(message) = write_exports(&config, &outcome) {
        eprintln!("Error: {}", message);
        process::exit(1);
    }

    print_summary(&outcome);
    if show_crops {
        print_crops(&config, &outcome);
    }
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} [OPTIONS] <config.json>", program_name);
    eprintln!();
    eprintln!("Map thermographic defect detections onto the panel grid of an orthophoto.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --output, -o DIR  Write exports to DIR instead of the configured output_path");
    eprintln!("  --crops           List the detail crops planned for each defective panel");
    eprintln!("  --help, -h        Show this help message");
    eprintln!();
    eprintln!("Set RUST_LOG=info (or debug) for progress logging.");
}

fn write_exports(config: &InspectionConfig, outcome: &InspectionOutcome) -> Result<(), String> {
    let output_dir = config.output_path.as_path();
    fs::create_dir_all(output_dir)
        .map_err(|e| format!("Failed to create {}: {}", output_dir.display(), e))?;

    let json_path = output_dir.join("metrics.json");
    export_metrics_json(&outcome.grid, &json_path, config.export.include_details)
        .map_err(|e| e.to_string())?;
    report_written(&json_path);

    let csv_path = output_dir.join("metrics.csv");
    export_metrics_csv(&outcome.grid, &csv_path).map_err(|e| e.to_string())?;
    report_written(&csv_path);
    Ok(())
}

fn report_written(path: &Path) {
    eprintln!("Saved {}", path.display());
}

fn print_summary(outcome: &InspectionOutcome) {
    match serde_json::to_string_pretty(&outcome.metrics.summary_json()) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing summary: {}", e),
    }

    eprintln!();
    eprintln!("Inspection Summary:");
    eprintln!("  Panels: {}", outcome.metrics.total_panels);
    eprintln!(
        "  Panels with defects: {} ({:.2}%)",
        outcome.metrics.panels_with_defects,
        outcome.metrics.defect_rate()
    );
    eprintln!("  Hotspots: {}", outcome.metrics.hotspots_count);
    eprintln!("  Faulty diodes: {}", outcome.metrics.faulty_diodes_count);
    eprintln!("  Offline panels: {}", outcome.metrics.offline_panels_count);
}

fn print_crops(config: &InspectionConfig, outcome: &InspectionOutcome) {
    let requests = crop_requests(
        &outcome.grid,
        &config.crop,
        config.orthophoto.width,
        config.orthophoto.height,
    );
    eprintln!();
    eprintln!("Planned crops ({}):", requests.len());
    for request in requests {
        let w = request.window;
        eprintln!(
            "  {:<36} [{}, {}) x [{}, {})",
            request.file_name, w.x1, w.x2, w.y1, w.y2
        );
    }
}
