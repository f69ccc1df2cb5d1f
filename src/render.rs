//! Drawing of one plot group plus the feature-annotation geometry.
//!
//! Feature placement is computed against a max-envelope of all overlaid
//! spectra before anything is drawn, so the chart can be built with its
//! final axis bounds. Labels raise the envelope where they land, making
//! later labels stack above earlier ones instead of overlapping.

use log::warn;
use plotters::chart::SeriesAnno;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

type Chart2d<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

use crate::features::{self, FeatureKind, TELLURIC_BANDS, TELLURIC_MARKER};
use crate::options::{LegendLocation, LineStyle, PlotOptions};
use crate::params::ResolvedGroup;
use crate::spectrum::{Spectrum, SpectrumLike};
use crate::PlotError;

/// Envelope grid spacing in wavelength units.
const ENVELOPE_STEP: f64 = 0.001;

/// Half-width added around a feature window when searching for its local
/// maximum, and around line features when raising the envelope.
const FEATURE_PAD: f64 = 0.05;

// ---------------------------------------------------------------------------
// Linear interpolation
// ---------------------------------------------------------------------------

/// Linear interpolation of `(xs, ys)` at `x`; 0 outside the sampled range.
/// `xs` must be ascending.
pub fn interp_at(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    if xs.is_empty() || x < xs[0] || x > xs[xs.len() - 1] {
        return 0.0;
    }
    let hi = xs.partition_point(|&v| v < x);
    if hi == 0 {
        return ys[0];
    }
    if hi >= xs.len() {
        return ys[ys.len() - 1];
    }
    let (x0, x1) = (xs[hi - 1], xs[hi]);
    let (y0, y1) = (ys[hi - 1], ys[hi]);
    if (x1 - x0).abs() < f64::EPSILON {
        return y0.max(y1);
    }
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

// ---------------------------------------------------------------------------
// Envelope – the running max of all overlaid flux curves
// ---------------------------------------------------------------------------

/// Max-envelope of a group of offset flux curves on a fixed wavelength grid.
#[derive(Debug, Clone)]
pub struct Envelope {
    grid: Vec<f64>,
    values: Vec<f64>,
}

impl Envelope {
    /// Build the envelope over `xrange` from the group's flux curves, each
    /// shifted by its resolved vertical offset.
    pub fn from_group(group: &[Spectrum], offsets: &[f64], xrange: (f64, f64)) -> Self {
        let n = (((xrange.1 - xrange.0) / ENVELOPE_STEP).ceil() as usize).max(1) + 1;
        let grid: Vec<f64> = (0..n).map(|i| xrange.0 + i as f64 * ENVELOPE_STEP).collect();
        let mut values = vec![f64::NEG_INFINITY; n];

        for (sp, &offset) in group.iter().zip(offsets) {
            let wave = sp.wavelength();
            let flux: Vec<f64> = sp.flux().iter().map(|f| f + offset).collect();
            for (v, &x) in values.iter_mut().zip(&grid) {
                *v = v.max(interp_at(wave, &flux, x));
            }
        }
        for v in &mut values {
            if !v.is_finite() {
                *v = 0.0;
            }
        }
        Envelope { grid, values }
    }

    /// Largest envelope value.
    pub fn max_value(&self) -> f64 {
        self.values.iter().copied().fold(0.0_f64, f64::max)
    }

    /// Local maximum over `[lo, hi]`, sampled at `nsamples + 1` points.
    pub fn max_in(&self, lo: f64, hi: f64, nsamples: usize) -> f64 {
        let n = nsamples.max(1);
        (0..=n)
            .map(|i| lo + (hi - lo) * i as f64 / n as f64)
            .map(|x| interp_at(&self.grid, &self.values, x))
            .fold(0.0_f64, f64::max)
    }

    /// Raise the envelope to at least `y` inside `[lo, hi]`.
    pub fn raise(&mut self, lo: f64, hi: f64, y: f64) {
        for (v, &x) in self.values.iter_mut().zip(&self.grid) {
            if x >= lo && x <= hi {
                *v = v.max(y);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Feature placement
// ---------------------------------------------------------------------------

/// A feature label ready to draw: geometry only, no backend involved.
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturePlacement {
    pub label: &'static str,
    pub kind: FeatureKind,
    /// Interval covered by the bracket (band) or spanned by the ticks (line).
    pub interval: (f64, f64),
    /// Baseline height; bracket and ticks sit between `y` and `y + yoff`,
    /// the label just above.
    pub y: f64,
}

/// Place every requested feature whose interval lies fully inside the x
/// bounds, stacking labels above the (mutated) envelope. Unknown codes are
/// warned about and skipped.
pub fn place_features(
    codes: &[String],
    envelope: &mut Envelope,
    xrange: (f64, f64),
    yoff: f64,
    nsamples: usize,
) -> Vec<FeaturePlacement> {
    let mut placements = Vec::new();
    for code in codes {
        let Some(feature) = features::lookup(code) else {
            warn!("unrecognized feature code '{code}', skipping");
            continue;
        };
        for &(a, b) in feature.intervals {
            let (lo, hi) = (a.min(b), a.max(b));
            if lo <= xrange.0 || hi >= xrange.1 {
                continue;
            }
            let y = envelope.max_in(lo - FEATURE_PAD, hi + FEATURE_PAD, nsamples) + 0.5 * yoff;
            placements.push(FeaturePlacement {
                label: feature.label,
                kind: feature.kind,
                interval: (lo, hi),
                y,
            });
            // Line ticks are narrow; widen their footprint so neighbouring
            // labels clear them.
            let (rlo, rhi) = match feature.kind {
                FeatureKind::Band => (lo, hi),
                FeatureKind::Line => (lo - FEATURE_PAD, hi + FEATURE_PAD),
            };
            envelope.raise(rlo, rhi, y + 3.0 * yoff);
        }
    }
    placements
}

// ---------------------------------------------------------------------------
// Drawing
// ---------------------------------------------------------------------------

/// Convert a point list to step-post rendering.
fn step_points(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(points.len() * 2);
    for pair in points.windows(2) {
        out.push(pair[0]);
        out.push((pair[1].0, pair[0].1));
    }
    if let Some(&last) = points.last() {
        out.push(last);
    }
    out
}

pub(crate) fn map_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> PlotError {
    PlotError::Render(e.to_string())
}

/// Draw one resolved plot group into `area`.
///
/// `density` is the number of tiles sharing the page; fonts shrink as the
/// layout gets denser so axis text stays inside small tiles.
pub(crate) fn draw_group<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    group: &[Spectrum],
    resolved: &ResolvedGroup,
    options: &PlotOptions,
    density: usize,
) -> Result<(), PlotError> {
    let axis_font = 2 * (13 - (density.saturating_sub(1)).min(8) as i32);
    let feature_font = 2 * (10 - (density.saturating_sub(1)).min(6) as i32);

    let (x0, x1) = resolved.xrange;
    let (y0, mut y1) = resolved.yrange;
    let yoff = 0.02 * (y1 - y0);

    // Feature placement runs before the chart is built so the final y top is
    // known up front.
    let codes = features::requested_features(&options.features, options.classes);
    let mut envelope = Envelope::from_group(group, &resolved.offsets, resolved.xrange);
    let placements = place_features(&codes, &mut envelope, resolved.xrange, yoff, options.nsamples);
    if !resolved.yrange_pinned && !placements.is_empty() {
        y1 = y1.max(envelope.max_value() + 2.0 * yoff);
    }

    // Legend outside: reserve a right-hand panel.
    let has_legend = resolved.legends.iter().any(|l| !l.is_empty());
    let outside = has_legend && options.legend_location == LegendLocation::Outside;
    let (plot_area, legend_area) = if outside {
        let (left, right) = area.split_horizontally((72).percent_width());
        (left, Some(right))
    } else {
        (area.clone(), None)
    };

    let mut builder = ChartBuilder::on(&plot_area);
    builder
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(55);
    if !options.title.is_empty() && !options.multipage {
        builder.caption(&options.title, ("sans-serif", axis_font + 4));
    }
    let mut chart = builder
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(map_err)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(&resolved.xlabel)
        .y_desc(&resolved.ylabel)
        .axis_desc_style(("sans-serif", axis_font))
        .label_style(("sans-serif", axis_font - 4));
    if !options.grid {
        mesh.disable_mesh();
    }
    mesh.draw().map_err(map_err)?;

    // Flux curves, noise traces and zero baselines.
    for (i, sp) in group.iter().enumerate() {
        let offset = resolved.offsets[i];
        let color = resolved.colors[i];
        let style = resolved.linestyles[i];
        let points: Vec<(f64, f64)> = sp
            .wavelength()
            .iter()
            .zip(sp.flux())
            .map(|(&w, &f)| (w, f + offset))
            .collect();

        let anno = draw_styled_line(&mut chart, &points, style, color)?;
        let legend = &resolved.legends[i];
        if !legend.is_empty() {
            anno.label(legend)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], color));
        }

        if resolved.show_noise[i] {
            if let Some(noise) = sp.noise() {
                let unc = resolved.colors_unc[i].mix(0.3);
                let pts: Vec<(f64, f64)> = sp
                    .wavelength()
                    .iter()
                    .zip(noise)
                    .map(|(&w, &n)| (w, n + offset))
                    .collect();
                chart
                    .draw_series(LineSeries::new(pts, unc))
                    .map_err(map_err)?;
            } else {
                warn!("noise requested for spectrum {i} but none is recorded");
            }
        }

        if resolved.show_zero[i] {
            let zp = resolved.zeropoints[i];
            chart
                .draw_series(DashedLineSeries::new(
                    vec![(x0, zp), (x1, zp)],
                    3,
                    5,
                    color.mix(0.3).stroke_width(1),
                ))
                .map_err(map_err)?;
        }
    }

    // Comparison spectrum: half opacity in every plot.
    if let Some(cmp) = &options.comparison {
        let color = resolved.colors.first().copied().unwrap_or(BLACK);
        let points: Vec<(f64, f64)> = cmp
            .wavelength()
            .iter()
            .zip(cmp.flux())
            .map(|(&w, &f)| (w, f))
            .collect();
        chart
            .draw_series(LineSeries::new(points, color.mix(0.5)))
            .map_err(map_err)?;
    }

    // Feature brackets, ticks and labels.
    let label_style = TextStyle::from(("sans-serif", feature_font).into_font())
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    let plotting = chart.plotting_area();
    for p in &placements {
        let (lo, hi) = p.interval;
        match p.kind {
            FeatureKind::Band => {
                plotting
                    .draw(&PathElement::new(
                        vec![(lo, p.y + yoff), (hi, p.y + yoff)],
                        BLACK,
                    ))
                    .map_err(map_err)?;
                for x in [lo, hi] {
                    plotting
                        .draw(&PathElement::new(vec![(x, p.y), (x, p.y + yoff)], BLACK))
                        .map_err(map_err)?;
                }
            }
            FeatureKind::Line => {
                for x in [lo, hi] {
                    plotting
                        .draw(&PathElement::new(vec![(x, p.y), (x, p.y + yoff)], BLACK))
                        .map_err(map_err)?;
                }
            }
        }
        plotting
            .draw(&Text::new(
                p.label,
                ((lo + hi) / 2.0, p.y + 1.5 * yoff),
                label_style.clone(),
            ))
            .map_err(map_err)?;
    }

    // Telluric absorption: shaded full-height bands with an earth marker.
    if options.telluric {
        let marker_style = TextStyle::from(("sans-serif", feature_font).into_font())
            .pos(Pos::new(HPos::Center, VPos::Center));
        for &(lo, hi) in TELLURIC_BANDS {
            plotting
                .draw(&Rectangle::new(
                    [(lo, y0), (hi, y1)],
                    RGBColor(128, 128, 128).mix(0.1).filled(),
                ))
                .map_err(map_err)?;
            plotting
                .draw(&Text::new(
                    TELLURIC_MARKER,
                    ((lo + hi) / 2.0, y0 + 3.0 * yoff),
                    marker_style.clone(),
                ))
                .map_err(map_err)?;
        }
    }

    // Legend placement.
    if has_legend {
        if let Some(legend_area) = legend_area {
            draw_outside_legend(&legend_area, resolved, axis_font)?;
        } else {
            chart
                .configure_series_labels()
                .position(series_label_position(options.legend_location))
                .border_style(BLACK)
                .background_style(WHITE.mix(0.8))
                .label_font(("sans-serif", axis_font - 4))
                .draw()
                .map_err(map_err)?;
        }
    }

    Ok(())
}

fn draw_styled_line<'a, 'b, DB: DrawingBackend + 'a>(
    chart: &'b mut Chart2d<'a, DB>,
    points: &[(f64, f64)],
    style: LineStyle,
    color: RGBColor,
) -> Result<&'b mut SeriesAnno<'a, DB>, PlotError> {
    match style {
        LineStyle::Steps => chart
            .draw_series(LineSeries::new(step_points(points), color))
            .map_err(map_err),
        LineStyle::Solid => chart
            .draw_series(LineSeries::new(points.to_vec(), color))
            .map_err(map_err),
        LineStyle::Dashed => chart
            .draw_series(DashedLineSeries::new(
                points.to_vec(),
                6,
                4,
                color.stroke_width(1),
            ))
            .map_err(map_err),
        LineStyle::Dotted => chart
            .draw_series(DashedLineSeries::new(
                points.to_vec(),
                2,
                4,
                color.stroke_width(1),
            ))
            .map_err(map_err),
    }
}

/// Legend panel to the right of the plot area (pixel coordinates).
fn draw_outside_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    resolved: &ResolvedGroup,
    font: i32,
) -> Result<(), PlotError> {
    let text_style = TextStyle::from(("sans-serif", font - 4).into_font())
        .pos(Pos::new(HPos::Left, VPos::Center));
    let mut y = 30;
    for (legend, color) in resolved.legends.iter().zip(&resolved.colors) {
        if legend.is_empty() {
            continue;
        }
        area.draw(&PathElement::new(
            vec![(6, y), (26, y)],
            color.stroke_width(2),
        ))
        .map_err(map_err)?;
        area.draw(&Text::new(legend.as_str(), (32, y), text_style.clone()))
            .map_err(map_err)?;
        y += 22;
    }
    Ok(())
}

fn series_label_position(location: LegendLocation) -> SeriesLabelPosition {
    match location {
        LegendLocation::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendLocation::UpperMiddle => SeriesLabelPosition::UpperMiddle,
        LegendLocation::UpperRight => SeriesLabelPosition::UpperRight,
        LegendLocation::MiddleLeft => SeriesLabelPosition::MiddleLeft,
        LegendLocation::MiddleRight => SeriesLabelPosition::MiddleRight,
        LegendLocation::LowerLeft => SeriesLabelPosition::LowerLeft,
        LegendLocation::LowerMiddle => SeriesLabelPosition::LowerMiddle,
        LegendLocation::LowerRight => SeriesLabelPosition::LowerRight,
        // Outside is handled by the dedicated panel.
        LegendLocation::Outside => SeriesLabelPosition::UpperRight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::Spectrum;

    fn flat_spectrum(level: f64) -> Spectrum {
        let wave: Vec<f64> = (0..200).map(|i| 0.9 + i as f64 * 0.008).collect();
        let flux = vec![level; 200];
        Spectrum::new(wave, flux).unwrap()
    }

    #[test]
    fn interp_is_linear_inside_and_zero_outside() {
        let xs = [1.0, 2.0, 3.0];
        let ys = [0.0, 2.0, 0.0];
        assert_eq!(interp_at(&xs, &ys, 1.5), 1.0);
        assert_eq!(interp_at(&xs, &ys, 2.0), 2.0);
        assert_eq!(interp_at(&xs, &ys, 0.5), 0.0);
        assert_eq!(interp_at(&xs, &ys, 3.5), 0.0);
    }

    #[test]
    fn envelope_takes_the_max_across_spectra() {
        let group = [flat_spectrum(1.0), flat_spectrum(2.0)];
        let env = Envelope::from_group(&group, &[0.0, 0.0], (1.0, 2.0));
        assert!((env.max_value() - 2.0).abs() < 1e-9);
        assert!((env.max_in(1.2, 1.4, 100) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn envelope_applies_offsets() {
        let group = [flat_spectrum(1.0)];
        let env = Envelope::from_group(&group, &[0.5], (1.0, 2.0));
        assert!((env.max_value() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn out_of_bounds_features_are_not_placed() {
        let group = [flat_spectrum(1.0)];
        let mut env = Envelope::from_group(&group, &[0.0], (1.0, 1.3));
        // CO sits at 2.28-2.39, outside [1.0, 1.3].
        let placements =
            place_features(&["co".to_string()], &mut env, (1.0, 1.3), 0.02, 100);
        assert!(placements.is_empty());
    }

    #[test]
    fn placed_features_stack_above_each_other() {
        let group = [flat_spectrum(1.0)];
        let mut env = Envelope::from_group(&group, &[0.0], (1.0, 1.6));
        // VO (1.04-1.08) and FeH (0.98-1.03 outside, 1.19-1.25 inside);
        // then H2O at 1.08-1.20 overlaps VO's raised region.
        let first = place_features(&["vo".to_string()], &mut env, (1.0, 1.6), 0.02, 200);
        assert_eq!(first.len(), 1);
        let second = place_features(&["h2o".to_string()], &mut env, (1.0, 1.6), 0.02, 200);
        let h2o = second
            .iter()
            .find(|p| p.interval == (1.08, 1.20))
            .expect("h2o band placed");
        // The h2o window overlaps vo's raised envelope, so it must sit higher.
        assert!(h2o.y > first[0].y);
    }

    #[test]
    fn unknown_codes_are_skipped() {
        let group = [flat_spectrum(1.0)];
        let mut env = Envelope::from_group(&group, &[0.0], (0.9, 2.4));
        let placements =
            place_features(&["nope".to_string()], &mut env, (0.9, 2.4), 0.02, 100);
        assert!(placements.is_empty());
    }

    #[test]
    fn step_points_duplicate_transitions() {
        let pts = [(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)];
        let steps = step_points(&pts);
        assert_eq!(
            steps,
            vec![(0.0, 1.0), (1.0, 1.0), (1.0, 2.0), (2.0, 2.0), (2.0, 3.0)]
        );
    }
}
