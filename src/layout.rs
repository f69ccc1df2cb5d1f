//! Input normalization and pagination arithmetic.
//!
//! Whatever shape the caller supplies (one spectrum, a flat list, or a list
//! of lists), plotting works on a uniform list-of-lists: outer index = plot
//! slot, inner index = overlaid spectrum within that plot.

use log::warn;

use crate::spectrum::Spectrum;
use crate::PlotError;

// ---------------------------------------------------------------------------
// SpectrumInput – the accepted input shapes
// ---------------------------------------------------------------------------

/// The three input shapes accepted by [`crate::plot_spectra`].
#[derive(Debug, Clone)]
pub enum SpectrumInput {
    /// One spectrum, one plot.
    Single(Spectrum),
    /// A flat list: overlaid on one plot, or one plot each with multiplot.
    Flat(Vec<Spectrum>),
    /// Explicit groups: one plot per inner list; multiplot is forced on.
    Grouped(Vec<Vec<Spectrum>>),
}

impl From<Spectrum> for SpectrumInput {
    fn from(sp: Spectrum) -> Self {
        SpectrumInput::Single(sp)
    }
}

impl From<Vec<Spectrum>> for SpectrumInput {
    fn from(spectra: Vec<Spectrum>) -> Self {
        SpectrumInput::Flat(spectra)
    }
}

impl From<Vec<Vec<Spectrum>>> for SpectrumInput {
    fn from(groups: Vec<Vec<Spectrum>>) -> Self {
        SpectrumInput::Grouped(groups)
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize the input into plot groups and the effective multiplot flag.
///
/// Rules, matching the documented calling convention:
/// * a single spectrum turns multiplot off;
/// * grouped input forces multiplot on, one plot per inner list;
/// * a flat list with multiplot off becomes one plot with all spectra
///   overlaid, with multiplot on it becomes one plot per spectrum.
///
/// Empty spectra are skipped with a warning. An inner group left empty is a
/// hard error naming the group; no spectra at all is a hard error.
pub fn normalize_input(
    input: SpectrumInput,
    multiplot: bool,
) -> Result<(Vec<Vec<Spectrum>>, bool), PlotError> {
    match input {
        SpectrumInput::Single(sp) => {
            if sp.is_empty() {
                warn!("ignoring empty spectrum {sp}");
                return Err(PlotError::NoSpectra);
            }
            Ok((vec![vec![sp]], false))
        }
        SpectrumInput::Flat(spectra) => {
            let kept = drop_empty(spectra);
            if kept.is_empty() {
                return Err(PlotError::NoSpectra);
            }
            if kept.len() == 1 {
                return Ok((vec![kept], false));
            }
            if multiplot {
                // One spectrum per plot; intentional reinterpretation of a
                // flat list under multiplot.
                Ok((kept.into_iter().map(|sp| vec![sp]).collect(), true))
            } else {
                Ok((vec![kept], false))
            }
        }
        SpectrumInput::Grouped(groups) => {
            if groups.is_empty() {
                return Err(PlotError::NoSpectra);
            }
            let mut kept_groups = Vec::with_capacity(groups.len());
            for (index, group) in groups.into_iter().enumerate() {
                let kept = drop_empty(group);
                if kept.is_empty() {
                    return Err(PlotError::EmptyGroup { index });
                }
                kept_groups.push(kept);
            }
            let forced_multiplot = kept_groups.len() > 1;
            Ok((kept_groups, forced_multiplot))
        }
    }
}

fn drop_empty(spectra: Vec<Spectrum>) -> Vec<Spectrum> {
    spectra
        .into_iter()
        .filter(|sp| {
            if sp.is_empty() {
                warn!("ignoring empty spectrum {sp}");
                false
            } else {
                true
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Pagination arithmetic
// ---------------------------------------------------------------------------

/// Number of pages needed for `groups` plots on an R x C grid.
pub fn page_count(groups: usize, layout: (usize, usize)) -> usize {
    let tiles = tiles_per_page(layout);
    groups.div_ceil(tiles)
}

/// Page index and tile index within that page for plot group `index`.
pub fn tile_position(index: usize, layout: (usize, usize)) -> (usize, usize) {
    let tiles = tiles_per_page(layout);
    (index / tiles, index % tiles)
}

/// Tiles per page; a degenerate 0-row or 0-column layout counts as one tile.
pub fn tiles_per_page(layout: (usize, usize)) -> usize {
    (layout.0 * layout.1).max(1)
}
