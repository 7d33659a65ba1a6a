use plant_morphometry::config::skeleton_tool::load_config;
use plant_morphometry::distance::{distance_transform, estimate_radius};
use plant_morphometry::image::io::{load_mask_image, save_mask_image, write_json_file};
use plant_morphometry::{ScaleFactor, Skeleton};
use serde::Serialize;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let mask = load_mask_image(&config.input)?;
    let skeleton = Skeleton::extract(&mask);
    let analysis = skeleton.analyze();
    let field = distance_transform(&mask);
    let scale = ScaleFactor::new(config.mm_per_px);
    let radius = estimate_radius(&field, &skeleton, scale, &config.radius);

    let summary = SkeletonSummary {
        width: mask.width(),
        height: mask.height(),
        foreground_pixels: mask.count(),
        skeleton_pixels: analysis.pixel_count,
        endpoint_count: analysis.branch_count,
        junction_count: analysis.junction_count,
        max_distance_px: field.max_value(),
        mean_radius_px: radius.mean_radius_px,
        diameter_mm: radius.diameter_mm,
    };

    save_mask_image(skeleton.as_mask(), &config.output.skeleton_image)?;
    write_json_file(&config.output.summary_json, &summary)?;

    println!(
        "Saved skeleton ({} px, {} endpoints) to {}",
        summary.skeleton_pixels,
        summary.endpoint_count,
        config.output.skeleton_image.display()
    );
    println!("Saved summary to {}", config.output.summary_json.display());
    Ok(())
}

fn usage() -> String {
    "Usage: skeleton_tool <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SkeletonSummary {
    width: usize,
    height: usize,
    foreground_pixels: usize,
    skeleton_pixels: usize,
    endpoint_count: usize,
    junction_count: usize,
    max_distance_px: f32,
    mean_radius_px: f64,
    diameter_mm: f64,
}
