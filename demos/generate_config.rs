//! Generate a default inspection configuration file
//!
//! Creates a JSON config with all default parameters

use solar_defect_mapper::InspectionConfig;
use std::{env, path::Path, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <output_config.json>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} inspections/site_a/config.json", args[0]);
        process::exit(1);
    }

    let output_path = Path::new(&args[1]);

    if let Some(parent) = output_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            process::exit(1);
        }
    }

    let config = InspectionConfig::default();

    match config.to_json_file(output_path) {
        Ok(_) => {
            eprintln!("Configuration saved to {}", output_path.display());
            eprintln!();
            eprintln!("Config summary:");
            eprintln!("  Labels: {}", config.labels_path.display());
            eprintln!("  Output: {}", config.output_path.display());
            eprintln!(
                "  Orthophoto: {}x{}, CRS {}",
                config.orthophoto.width,
                config.orthophoto.height,
                config.orthophoto.crs.as_deref().unwrap_or("WGS84")
            );
            eprintln!(
                "  Row tolerance: {:.2} x panel height",
                config.mapping.row_tolerance_factor
            );
            eprintln!(
                "  Crops: {} px, scale {:.2}",
                config.crop.crop_size_px(),
                config.crop.scale_factor
            );
            eprintln!();
            eprintln!("Edit orthophoto.width/height/transform/crs to match the raster before use.");
        }
        Err(e) => {
            eprintln!("Error saving config: {}", e);
            process::exit(1);
        }
    }
}
