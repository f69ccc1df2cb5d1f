//! Per-plot parameter resolution.
//!
//! For each group of spectra drawn together, user options and defaults are
//! combined into one [`ResolvedGroup`]: every per-spectrum list is padded to
//! the spectrum count, axis bounds are inferred when not pinned, and labels
//! fall back to placeholders when metadata is missing.

use plotters::style::RGBColor;

use crate::options::{LineStyle, PerSpectrum, PlotOptions};
use crate::spectrum::{Spectrum, SpectrumLike};

/// Default wavelength bounds (micron) when the caller does not pin xrange.
pub const DEFAULT_XRANGE: (f64, f64) = (0.85, 2.42);

/// Default flux bounds as multiples of the group flux maximum.
pub const DEFAULT_YRANGE_SCALE: (f64, f64) = (-0.02, 1.2);

const BLACK: RGBColor = RGBColor(0, 0, 0);

// ---------------------------------------------------------------------------
// ResolvedGroup
// ---------------------------------------------------------------------------

/// The fully resolved display parameters for one plot.
#[derive(Debug, Clone)]
pub struct ResolvedGroup {
    pub xlabel: String,
    pub ylabel: String,
    pub xrange: (f64, f64),
    /// Flux bounds before feature annotation raises the top.
    pub yrange: (f64, f64),
    /// Whether the caller pinned yrange explicitly; a pinned range is never
    /// raised by feature annotation.
    pub yrange_pinned: bool,
    pub colors: Vec<RGBColor>,
    pub colors_unc: Vec<RGBColor>,
    pub linestyles: Vec<LineStyle>,
    /// Legend string per spectrum (may be empty).
    pub legends: Vec<String>,
    /// Total vertical offset per spectrum: zero-point plus stacking shift.
    pub offsets: Vec<f64>,
    /// Zero-point per spectrum (baseline position).
    pub zeropoints: Vec<f64>,
    pub show_noise: Vec<bool>,
    pub show_zero: Vec<bool>,
}

/// Resolve plotting parameters for one group. `legend_offset` is the number
/// of spectra already drawn in earlier groups; legend strings are consumed
/// sequentially across the whole call.
pub fn resolve_group(
    group: &[Spectrum],
    options: &PlotOptions,
    legend_offset: usize,
) -> ResolvedGroup {
    let n = group.len();

    // Axis labels from the first spectrum's metadata, user override wins.
    let meta = group.first().map(|sp| sp.metadata().clone()).unwrap_or_default();
    let xlabel = options.xlabel.clone().unwrap_or_else(|| meta.x_axis_label());
    let ylabel = options.ylabel.clone().unwrap_or_else(|| meta.y_axis_label());

    let xrange = options.xrange.unwrap_or(DEFAULT_XRANGE);

    let zeropoints = options.zeropoint.resolve(n, 0.0);

    // Stacking: spectrum i is lifted by (n - i) * stack so earlier spectra
    // sit higher, matching the stacked-sequence convention.
    let offsets: Vec<f64> = zeropoints
        .iter()
        .enumerate()
        .map(|(i, zp)| {
            if options.stack > 0.0 {
                zp + (n - i) as f64 * options.stack
            } else {
                *zp
            }
        })
        .collect();

    let (yrange, yrange_pinned) = match options.yrange {
        Some(range) => (range, true),
        None => {
            let flux_max = group.iter().map(|sp| sp.flux_max()).fold(0.0_f64, f64::max);
            let zp_max = zeropoints.iter().copied().fold(0.0_f64, f64::max);
            let base = flux_max + zp_max;
            let mut top = DEFAULT_YRANGE_SCALE.1 * base;
            if options.stack > 0.0 {
                top += n as f64 * options.stack;
            }
            ((DEFAULT_YRANGE_SCALE.0 * base, top), false)
        }
    };

    let colors = match options.color_scheme {
        Some(scheme) => scheme.gradient(n),
        None => options.colors.resolve(n, BLACK),
    };
    let colors_unc = match &options.colors_unc {
        PerSpectrum::Unset => colors.clone(),
        other => other.resolve(n, BLACK),
    };

    let legends = (0..n)
        .map(|i| {
            options
                .legends
                .get(legend_offset + i)
                .cloned()
                .unwrap_or_default()
        })
        .collect();

    ResolvedGroup {
        xlabel,
        ylabel,
        xrange,
        yrange,
        yrange_pinned,
        colors,
        colors_unc,
        linestyles: options.linestyles.resolve(n, LineStyle::Steps),
        legends,
        offsets,
        zeropoints,
        show_noise: options.show_noise.resolve(n, false),
        show_zero: options.show_zero.resolve(n, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::PerSpectrum;
    use crate::spectrum::SpectrumMetadata;

    fn sp_with_max(max: f64) -> Spectrum {
        Spectrum::new(vec![1.0, 1.1, 1.2, 1.3], vec![0.1, max, 0.3, 0.2]).unwrap()
    }

    #[test]
    fn default_bounds_follow_the_flux_maximum() {
        let group = [sp_with_max(2.0)];
        let resolved = resolve_group(&group, &PlotOptions::default(), 0);
        assert_eq!(resolved.xrange, (0.85, 2.42));
        assert!((resolved.yrange.0 - (-0.04)).abs() < 1e-12);
        assert!((resolved.yrange.1 - 2.4).abs() < 1e-12);
        assert!(!resolved.yrange_pinned);
    }

    #[test]
    fn user_ranges_are_pinned() {
        let group = [sp_with_max(2.0)];
        let opts = PlotOptions {
            xrange: Some((1.0, 2.0)),
            yrange: Some((0.0, 5.0)),
            ..Default::default()
        };
        let resolved = resolve_group(&group, &opts, 0);
        assert_eq!(resolved.xrange, (1.0, 2.0));
        assert_eq!(resolved.yrange, (0.0, 5.0));
        assert!(resolved.yrange_pinned);
    }

    #[test]
    fn missing_metadata_falls_back_to_placeholders() {
        let group = [sp_with_max(1.0)];
        let resolved = resolve_group(&group, &PlotOptions::default(), 0);
        assert_eq!(resolved.xlabel, "Wavelength (unknown units)");
        assert_eq!(resolved.ylabel, "Flux (unknown units)");
    }

    #[test]
    fn labels_come_from_first_spectrum_metadata() {
        let meta = SpectrumMetadata {
            wave_label: Some("Wavelength".into()),
            wave_unit: Some("micron".into()),
            ..Default::default()
        };
        let group = [sp_with_max(1.0).with_metadata(meta), sp_with_max(1.0)];
        let resolved = resolve_group(&group, &PlotOptions::default(), 0);
        assert_eq!(resolved.xlabel, "Wavelength (micron)");
    }

    #[test]
    fn short_lists_pad_with_defaults() {
        let group = [sp_with_max(1.0), sp_with_max(1.0), sp_with_max(1.0)];
        let opts = PlotOptions {
            colors: PerSpectrum::List(vec![RGBColor(255, 0, 0)]),
            linestyles: PerSpectrum::List(vec![LineStyle::Solid]),
            legends: vec!["first".to_string()],
            ..Default::default()
        };
        let resolved = resolve_group(&group, &opts, 0);
        assert_eq!(resolved.colors.len(), 3);
        assert_eq!(resolved.colors[0], RGBColor(255, 0, 0));
        assert_eq!(resolved.colors[2], RGBColor(0, 0, 0));
        assert_eq!(resolved.linestyles, vec![LineStyle::Solid, LineStyle::Steps, LineStyle::Steps]);
        assert_eq!(resolved.legends, vec!["first", "", ""]);
    }

    #[test]
    fn legends_are_consumed_across_groups() {
        let group = [sp_with_max(1.0), sp_with_max(1.0)];
        let opts = PlotOptions {
            legends: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            ..Default::default()
        };
        let resolved = resolve_group(&group, &opts, 2);
        assert_eq!(resolved.legends, vec!["c", "d"]);
    }

    #[test]
    fn stacking_lifts_spectra_and_raises_the_top() {
        let group = [sp_with_max(1.0), sp_with_max(1.0)];
        let opts = PlotOptions {
            stack: 0.5,
            ..Default::default()
        };
        let resolved = resolve_group(&group, &opts, 0);
        assert_eq!(resolved.offsets, vec![1.0, 0.5]);
        // 1.2 * 1.0 + 2 * 0.5
        assert!((resolved.yrange.1 - 2.2).abs() < 1e-12);
    }

    #[test]
    fn uncertainty_colors_default_to_line_colors() {
        let group = [sp_with_max(1.0), sp_with_max(1.0)];
        let opts = PlotOptions {
            colors: PerSpectrum::List(vec![RGBColor(10, 20, 30), RGBColor(40, 50, 60)]),
            ..Default::default()
        };
        let resolved = resolve_group(&group, &opts, 0);
        assert_eq!(resolved.colors_unc, resolved.colors);
    }
}
