use log::warn;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color schemes: named gradients across a group of spectra
// ---------------------------------------------------------------------------

/// Named colour schemes for gradient colouring of overlaid spectra.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorScheme {
    /// Dark grey to light grey.
    Gray,
    /// Dark blue to light blue.
    Blues,
    /// Dark red to orange.
    Reds,
    /// Dark brown to copper.
    Copper,
    /// Purple through green to yellow.
    Viridis,
    /// Evenly spaced hues around the colour wheel.
    Rainbow,
}

impl ColorScheme {
    /// Parse a scheme name; unknown names fall back to `Gray` with a warning.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "gray" | "grey" | "greys" => ColorScheme::Gray,
            "blues" | "blue" => ColorScheme::Blues,
            "reds" | "red" => ColorScheme::Reds,
            "copper" => ColorScheme::Copper,
            "viridis" => ColorScheme::Viridis,
            "rainbow" | "hsv" => ColorScheme::Rainbow,
            other => {
                warn!("unknown color scheme '{other}', using gray");
                ColorScheme::Gray
            }
        }
    }

    /// Produce `n` colours spanning the scheme from first spectrum to last.
    pub fn gradient(self, n: usize) -> Vec<RGBColor> {
        if self == ColorScheme::Rainbow {
            return generate_palette(n);
        }
        let (start, end) = self.endpoints();
        (0..n)
            .map(|i| {
                let t = if n <= 1 { 0.0 } else { i as f32 / (n - 1) as f32 };
                to_rgb(start.mix(end, t))
            })
            .collect()
    }

    fn endpoints(self) -> (LinSrgb, LinSrgb) {
        match self {
            ColorScheme::Gray => (LinSrgb::new(0.15, 0.15, 0.15), LinSrgb::new(0.75, 0.75, 0.75)),
            ColorScheme::Blues => (LinSrgb::new(0.02, 0.10, 0.40), LinSrgb::new(0.55, 0.75, 0.95)),
            ColorScheme::Reds => (LinSrgb::new(0.40, 0.02, 0.02), LinSrgb::new(0.95, 0.60, 0.30)),
            ColorScheme::Copper => (LinSrgb::new(0.10, 0.05, 0.02), LinSrgb::new(1.0, 0.62, 0.40)),
            ColorScheme::Viridis => (LinSrgb::new(0.27, 0.00, 0.33), LinSrgb::new(0.99, 0.91, 0.14)),
            // Rainbow is handled in gradient().
            ColorScheme::Rainbow => (LinSrgb::new(0.0, 0.0, 0.0), LinSrgb::new(1.0, 1.0, 1.0)),
        }
    }
}

fn to_rgb(lin: LinSrgb) -> RGBColor {
    let srgb: Srgb = Srgb::from_linear(lin);
    RGBColor(
        (srgb.red * 255.0) as u8,
        (srgb.green * 255.0) as u8,
        (srgb.blue * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_hues() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        assert_ne!(colors[0], colors[2]);
    }

    #[test]
    fn gradient_spans_endpoints() {
        let colors = ColorScheme::Gray.gradient(3);
        assert_eq!(colors.len(), 3);
        // Dark to light.
        assert!(colors[0].0 < colors[2].0);
    }

    #[test]
    fn single_element_gradient_is_the_start_color() {
        let one = ColorScheme::Blues.gradient(1);
        let three = ColorScheme::Blues.gradient(3);
        assert_eq!(one[0], three[0]);
    }

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!(ColorScheme::parse("GREY"), ColorScheme::Gray);
        assert_eq!(ColorScheme::parse("colormap-nope"), ColorScheme::Gray);
        assert_eq!(ColorScheme::parse("hsv"), ColorScheme::Rainbow);
    }
}
