use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{ColorImage, Rect};

use crate::data::model::HistogramBundle;

// ---------------------------------------------------------------------------
// Plot export (viewport screenshot → PNG)
// ---------------------------------------------------------------------------

/// Write a viewport screenshot to `path`, cropped to `crop` (in egui points)
/// when given. The format is inferred from the extension; the build carries
/// the PNG codec.
pub fn save_screenshot(
    image: &ColorImage,
    crop: Option<Rect>,
    pixels_per_point: f32,
    path: &Path,
) -> Result<()> {
    let [w, h] = image.size;
    let mut rgba = image::RgbaImage::new(w as u32, h as u32);
    for (i, px) in image.pixels.iter().enumerate() {
        let [r, g, b, a] = px.to_array();
        rgba.put_pixel((i % w) as u32, (i / w) as u32, image::Rgba([r, g, b, a]));
    }

    let out = match crop.map(|rect| scale_rect(rect, pixels_per_point, w as u32, h as u32)) {
        Some((x, y, cw, ch)) if cw > 0 && ch > 0 => {
            image::imageops::crop_imm(&rgba, x, y, cw, ch).to_image()
        }
        _ => rgba,
    };

    out.save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Convert a rect in egui points to pixel offsets, clamped to the image.
fn scale_rect(rect: Rect, ppp: f32, w: u32, h: u32) -> (u32, u32, u32, u32) {
    let x = ((rect.min.x * ppp).round().max(0.0) as u32).min(w);
    let y = ((rect.min.y * ppp).round().max(0.0) as u32).min(h);
    let cw = ((rect.width() * ppp).round().max(0.0) as u32).min(w - x);
    let ch = ((rect.height() * ppp).round().max(0.0) as u32).min(h - y);
    (x, y, cw, ch)
}

// ---------------------------------------------------------------------------
// Data export (histogram bundle → JSON)
// ---------------------------------------------------------------------------

/// Write the bundle as pretty-printed JSON, for downstream plotting scripts.
pub fn write_bundle_json(bundle: &HistogramBundle, path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(bundle).context("serializing histogram data")?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{Color32, Pos2};
    use std::path::PathBuf;

    fn tmp(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("spinogram-export-{}-{name}", std::process::id()));
        path
    }

    #[test]
    fn screenshot_is_cropped_and_written() {
        let image = ColorImage::new([40, 20], Color32::WHITE);
        let path = tmp("crop.png");
        let crop = Rect::from_min_max(Pos2::new(5.0, 2.0), Pos2::new(15.0, 10.0));

        save_screenshot(&image, Some(crop), 2.0, &path).unwrap();
        let written = image::open(&path).unwrap().to_rgba8();
        std::fs::remove_file(&path).ok();

        assert_eq!(written.width(), 20);
        assert_eq!(written.height(), 16);
    }

    #[test]
    fn crop_is_clamped_to_the_image() {
        let (x, y, w, h) = scale_rect(
            Rect::from_min_max(Pos2::new(-3.0, 0.0), Pos2::new(100.0, 100.0)),
            1.0,
            40,
            20,
        );
        assert_eq!((x, y), (0, 0));
        assert!(w <= 40 && h <= 20);
    }

    #[test]
    fn bundle_round_trips_through_json() {
        use crate::data::model::{HistogramBundle, HistogramEntry};

        let bundle = HistogramBundle {
            phi_edges: vec![-1.0, 0.0, 0.0, 1.0],
            theta_edges: vec![0.0, 1.0],
            entries: vec![HistogramEntry {
                label: None,
                phi: vec![1.0, 1.0, 0.5, 0.5],
                theta: vec![1.0, 1.0],
                color: [31, 119, 180],
            }],
        };

        let path = tmp("bundle.json");
        write_bundle_json(&bundle, &path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(value["entries"][0]["label"], serde_json::Value::Null);
        assert_eq!(value["entries"][0]["color"][2], 180);
        assert_eq!(value["phi_edges"].as_array().unwrap().len(), 4);
    }
}
