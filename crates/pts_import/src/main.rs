//! Import a `.pts` point cloud and print a summary of the resulting mesh.
//!
//! Run with: cargo run -- scan.pts [settings.json]
//!
//! The optional settings file holds the placement applied to every point:
//!
//! ```json
//! { "position": [0, 0, 0], "rotation": [-90, 0, 0], "scale": [1, 1, 1] }
//! ```

use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use pts_core::{ImportSettings, Importer, PointGeometry};
use pts_loader::PtsFileSource;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("Usage: pts_import <path-to-pts-file> [settings.json]");
        println!("\nExamples:");
        println!("  cargo run -- scans/lobby.pts");
        println!("  cargo run -- scans/lobby.pts lobby.settings.json");
        return ExitCode::FAILURE;
    }

    match run(&args[1], args.get(2).map(String::as_str)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str, settings_path: Option<&str>) -> Result<()> {
    let settings = match settings_path {
        Some(settings_path) => ImportSettings::load(settings_path)
            .with_context(|| format!("Failed to load settings from {}", settings_path))?,
        None => ImportSettings::default(),
    };
    log::debug!("Import settings: {:?}", settings);

    let importer = Importer::new(PtsFileSource::new());
    let geometry = match importer.import_with_settings(path, &settings) {
        Ok(geometry) => geometry,
        Err(e) => {
            // The parser's own error says why; the import error only says that it failed
            let mut err = anyhow::Error::new(e);
            if let Some(cause) = importer.source().take_last_error() {
                err = err.context(cause.to_string());
            }
            return Err(err.context(format!("Failed to import {}", path)));
        }
    };

    print_summary(&geometry);
    Ok(())
}

fn print_summary(geometry: &PointGeometry) {
    println!("\n=== Point cloud: {} ===", geometry.name);
    println!("Points: {}", geometry.len());
    println!("Index width: {:?}", geometry.index_width());
    println!("Index bytes: {}", geometry.index_bytes().len());

    if geometry.is_empty() {
        return;
    }

    let bounds = geometry.bounds;
    println!("\n--- Bounds ---");
    println!(
        "  Min: ({:.3}, {:.3}, {:.3})",
        bounds.min.x, bounds.min.y, bounds.min.z
    );
    println!(
        "  Max: ({:.3}, {:.3}, {:.3})",
        bounds.max.x, bounds.max.y, bounds.max.z
    );
    let center = bounds.center();
    println!("  Center: ({:.3}, {:.3}, {:.3})", center.x, center.y, center.z);

    let mean_color =
        geometry.colors.iter().copied().sum::<pts_math::Vec3>() / geometry.len() as f32;
    println!("\n--- Color ---");
    println!(
        "  Mean: ({:.3}, {:.3}, {:.3})",
        mean_color.x, mean_color.y, mean_color.z
    );
}
