use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Qualitative series palette
// ---------------------------------------------------------------------------

/// The matplotlib "tab10" qualitative cycle, the conventional coloring for
/// categorical series in simulation plots.
const TAB10: [[u8; 3]; 10] = [
    [31, 119, 180],
    [255, 127, 14],
    [44, 160, 44],
    [214, 39, 40],
    [148, 103, 189],
    [140, 86, 75],
    [227, 119, 194],
    [127, 127, 127],
    [188, 189, 34],
    [23, 190, 207],
];

/// Deterministic palette of `n` distinct colors: the tab10 cycle first,
/// extended with evenly spaced HSL hues when more series are needed.
pub fn qualitative(n: usize) -> Vec<[u8; 3]> {
    let extra = n.saturating_sub(TAB10.len());
    (0..n)
        .map(|i| {
            if i < TAB10.len() {
                TAB10[i]
            } else {
                let hue = ((i - TAB10.len()) as f32 / extra as f32) * 360.0;
                let hsl = Hsl::new(hue, 0.75f32, 0.35f32);
                let rgb: Srgb = hsl.into_color();
                [
                    (rgb.red * 255.0) as u8,
                    (rgb.green * 255.0) as u8,
                    (rgb.blue * 255.0) as u8,
                ]
            }
        })
        .collect()
}

/// Bundle colors are plain sRGB triples; the UI widgets want [`Color32`].
pub fn to_color32([r, g, b]: [u8; 3]) -> Color32 {
    Color32::from_rgb(r, g, b)
}
