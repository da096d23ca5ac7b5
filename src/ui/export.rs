use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui;
use image::{Rgba, RgbaImage};

use crate::state::{AppState, Notice};

// ---------------------------------------------------------------------------
// Plot export: crop the viewport screenshot to the plot and write a PNG
// ---------------------------------------------------------------------------

/// Finish a pending "Save Plot" once the screenshot event arrives.
pub fn handle_screenshot(ctx: &egui::Context, state: &mut AppState) {
    if state.pending_export.is_none() {
        return;
    }
    let Some(shot) = ctx.input(|i| {
        i.events.iter().rev().find_map(|e| {
            if let egui::Event::Screenshot { image, .. } = e {
                Some(image.clone())
            } else {
                None
            }
        })
    }) else {
        return;
    };
    let Some(export) = state.pending_export.take() else {
        return;
    };

    let cropped = shot.region(&export.rect, Some(ctx.pixels_per_point()));
    match save_png(&cropped, &export.path) {
        Ok(()) => log::info!("Saved plot to {}", export.path.display()),
        Err(e) => {
            log::error!("Failed to save plot: {e:#}");
            state.notice = Some(Notice {
                title: "Export failed".into(),
                message: format!("{e:#}"),
            });
        }
    }
}

pub fn to_rgba(image: &egui::ColorImage) -> RgbaImage {
    let [w, h] = image.size;
    let mut out = RgbaImage::new(w as u32, h as u32);
    for y in 0..h {
        for x in 0..w {
            let p = image.pixels[y * w + x];
            out.put_pixel(x as u32, y as u32, Rgba([p.r(), p.g(), p.b(), p.a()]));
        }
    }
    out
}

pub fn save_png(image: &egui::ColorImage, path: &Path) -> Result<()> {
    to_rgba(image)
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// red, blue / green, white
    fn checker() -> egui::ColorImage {
        let rgba = [
            255, 0, 0, 255, 0, 0, 255, 255, //
            0, 255, 0, 255, 255, 255, 255, 255,
        ];
        egui::ColorImage::from_rgba_unmultiplied([2, 2], &rgba)
    }

    #[test]
    fn pixels_keep_row_major_order() {
        let out = to_rgba(&checker());
        assert_eq!(out.dimensions(), (2, 2));
        assert_eq!(out.get_pixel(1, 0), &Rgba([0, 0, 255, 255]));
        assert_eq!(out.get_pixel(0, 1), &Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn png_is_written_and_bad_paths_error() {
        let path = std::env::temp_dir().join(format!("hotfire_export_{}.png", std::process::id()));
        save_png(&checker(), &path).unwrap();
        let back = image::open(&path).unwrap().to_rgba8();
        assert_eq!(back.get_pixel(1, 1), &Rgba([255, 255, 255, 255]));
        let _ = std::fs::remove_file(&path);

        let bad = std::env::temp_dir().join("no_such_dir_hotfire").join("x.png");
        assert!(save_png(&checker(), &bad).is_err());
    }
}
