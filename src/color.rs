use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Curve colours: matched frequency row → Color32
// ---------------------------------------------------------------------------

/// Blue, red, green, cyan, yellow, black.
const BASE_COLORS: [Color32; 6] = [
    Color32::from_rgb(0, 0, 255),
    Color32::from_rgb(255, 0, 0),
    Color32::from_rgb(0, 128, 0),
    Color32::from_rgb(0, 191, 191),
    Color32::from_rgb(191, 191, 0),
    Color32::BLACK,
];

/// Colour per frequency index, shared by every panel so one frequency has
/// the same colour in every file.
#[derive(Debug, Clone)]
pub struct CurvePalette {
    colors: Vec<Color32>,
}

impl Default for CurvePalette {
    fn default() -> Self {
        Self {
            colors: BASE_COLORS.to_vec(),
        }
    }
}

impl CurvePalette {
    /// Base colours, extended with generated hues if `n` exceeds them.
    pub fn with_len(n: usize) -> Self {
        let mut colors = BASE_COLORS.to_vec();
        if n > colors.len() {
            colors.extend(generate_palette(n - colors.len()));
        }
        Self { colors }
    }

    pub fn color_for(&self, index: usize) -> Color32 {
        self.colors[index % self.colors.len()]
    }

    /// Black curves vanish on a dark background; swap it for white there.
    pub fn for_theme(mut self, dark: bool) -> Self {
        if dark {
            for c in &mut self.colors {
                if *c == Color32::BLACK {
                    *c = Color32::WHITE;
                }
            }
        }
        self
    }
}
