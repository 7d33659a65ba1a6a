//! I/O helpers for photographs, masks and JSON.
//!
//! - `load_rgb_image`: read a PNG/JPEG into an owned RGB buffer.
//! - `load_mask_image`: read any image as a binary mask (nonzero luma = foreground).
//! - `save_rgb_image` / `save_mask_image`: write PNGs.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{GrayImageU8, RgbImageU8};
use crate::mask::Mask;
use image::{GrayImage, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to 8-bit RGB.
pub fn load_rgb_image(path: &Path) -> Result<RgbImageU8, String> {
    let img = image::open(path)
        .map_err(|e| format!("Could not load '{}': {e}", path.display()))?
        .into_rgb8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    Ok(RgbImageU8::new(width, height, img.into_raw()))
}

/// Load an image from disk as 8-bit grayscale.
pub fn load_grayscale_image(path: &Path) -> Result<GrayImageU8, String> {
    let img = image::open(path)
        .map_err(|e| format!("Could not load '{}': {e}", path.display()))?
        .into_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    Ok(GrayImageU8::new(width, height, img.into_raw()))
}

/// Load an image and binarize it: any nonzero luma becomes foreground.
pub fn load_mask_image(path: &Path) -> Result<Mask, String> {
    let gray = load_grayscale_image(path)?;
    Ok(Mask::from_view(&gray.as_view(), |v| v > 0))
}

pub fn save_rgb_image(image: &RgbImageU8, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let buffer = RgbImage::from_raw(
        image.width() as u32,
        image.height() as u32,
        image.data().to_vec(),
    )
    .ok_or_else(|| "Failed to create image buffer".to_string())?;
    buffer
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save a mask as a black/white PNG.
pub fn save_mask_image(mask: &Mask, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let buffer = GrayImage::from_raw(
        mask.width() as u32,
        mask.height() as u32,
        mask.data().to_vec(),
    )
    .ok_or_else(|| "Failed to create image buffer".to_string())?;
    buffer
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
