//! The plotting entry point: normalization, pagination and file output.
//!
//! Two output modes exist. Single mode writes one image per plot group,
//! numbered from the base filename (`plot.svg` becomes `plot1.svg`,
//! `plot2.svg`, ...). Multi-page mode tiles groups onto fixed R x C grids
//! and writes one numbered file per page (`plot_page1.svg`, ...). Without an
//! output filename, single mode renders to in-memory RGB buffers instead of
//! touching the filesystem.

use std::path::{Path, PathBuf};

use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::layout::{self, SpectrumInput};
use crate::options::{ImageFormat, PlotOptions};
use crate::params::{resolve_group, ResolvedGroup};
use crate::render::{draw_group, map_err};
use crate::spectrum::Spectrum;
use crate::PlotError;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// An RGB quicklook image produced when no output filename is given.
#[derive(Debug, Clone)]
pub struct QuicklookImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGB triples, `width * height * 3` bytes.
    pub rgb: Vec<u8>,
}

/// What one plotting call produced.
#[derive(Debug, Clone, Default)]
pub struct PlotSummary {
    /// Files written, in order.
    pub files: Vec<PathBuf>,
    /// Pages emitted in multi-page mode (0 otherwise).
    pub pages: usize,
    /// In-memory renders when no output filename was supplied.
    pub quicklooks: Vec<QuicklookImage>,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Render the supplied spectra according to `options`.
///
/// Accepts a single [`Spectrum`], a flat `Vec<Spectrum>`, or a
/// `Vec<Vec<Spectrum>>` of explicit plot groups; see
/// [`layout::normalize_input`] for how each shape maps to plots.
pub fn plot_spectra(
    input: impl Into<SpectrumInput>,
    options: &PlotOptions,
) -> Result<PlotSummary, PlotError> {
    let (groups, _multiplot) = layout::normalize_input(input.into(), options.multiplot)?;

    // Legend strings are consumed sequentially across all groups.
    let mut resolved = Vec::with_capacity(groups.len());
    let mut legend_offset = 0;
    for group in &groups {
        resolved.push(resolve_group(group, options, legend_offset));
        legend_offset += group.len();
    }

    if options.multipage {
        emit_pages(&groups, &resolved, options)
    } else {
        emit_single(&groups, &resolved, options)
    }
}

// ---------------------------------------------------------------------------
// Single mode: one image per group
// ---------------------------------------------------------------------------

fn emit_single(
    groups: &[Vec<Spectrum>],
    resolved: &[ResolvedGroup],
    options: &PlotOptions,
) -> Result<PlotSummary, PlotError> {
    let (width, height) = options.figsize;
    let mut summary = PlotSummary::default();

    match &options.output {
        Some(base) => {
            let format = resolve_format(options);
            for (i, (group, params)) in groups.iter().zip(resolved).enumerate() {
                let path = numbered_path(base, &format!("{}", i + 1), format);
                render_to_file(
                    &path,
                    format,
                    (width, height),
                    std::slice::from_ref(group),
                    std::slice::from_ref(params),
                    options,
                    false,
                )?;
                info!("wrote {}", path.display());
                summary.files.push(path);
            }
        }
        None => {
            // No filename: quicklook buffers instead of files.
            for (group, params) in groups.iter().zip(resolved) {
                let mut rgb = vec![0u8; (width * height * 3) as usize];
                {
                    let root = BitMapBackend::with_buffer(&mut rgb, (width, height))
                        .into_drawing_area();
                    draw_page(
                        &root,
                        std::slice::from_ref(group),
                        std::slice::from_ref(params),
                        options,
                        false,
                    )?;
                    root.present().map_err(map_err)?;
                }
                summary.quicklooks.push(QuicklookImage { width, height, rgb });
            }
        }
    }
    Ok(summary)
}

// ---------------------------------------------------------------------------
// Multi-page mode: R x C grids flowing across numbered pages
// ---------------------------------------------------------------------------

fn emit_pages(
    groups: &[Vec<Spectrum>],
    resolved: &[ResolvedGroup],
    options: &PlotOptions,
) -> Result<PlotSummary, PlotError> {
    let base = options
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from("spectra"));
    let format = resolve_format(options);
    let (width, height) = options.figsize;
    let tiles = layout::tiles_per_page(options.layout);
    let pages = layout::page_count(groups.len(), options.layout);

    let mut summary = PlotSummary {
        pages,
        ..Default::default()
    };

    for page in 0..pages {
        let start = page * tiles;
        let end = (start + tiles).min(groups.len());
        let page_groups = &groups[start..end];
        let page_params = &resolved[start..end];

        let path = numbered_path(&base, &format!("_page{}", page + 1), format);
        render_to_file(
            &path,
            format,
            (width, height),
            page_groups,
            page_params,
            options,
            true,
        )?;
        info!("wrote page {} of {} to {}", page + 1, pages, path.display());
        summary.files.push(path);
    }
    Ok(summary)
}

/// Dispatch on output format, draw one page, flush it to `path`.
fn render_to_file(
    path: &Path,
    format: ImageFormat,
    size: (u32, u32),
    groups: &[Vec<Spectrum>],
    resolved: &[ResolvedGroup],
    options: &PlotOptions,
    paginated: bool,
) -> Result<(), PlotError> {
    match format {
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_page(&root, groups, resolved, options, paginated)?;
            root.present().map_err(map_err)
        }
        ImageFormat::Png | ImageFormat::Bmp => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_page(&root, groups, resolved, options, paginated)?;
            root.present().map_err(map_err)
        }
    }
}

// ---------------------------------------------------------------------------
// Shared page drawing
// ---------------------------------------------------------------------------

fn draw_page<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    groups: &[Vec<Spectrum>],
    resolved: &[ResolvedGroup],
    options: &PlotOptions,
    paginated: bool,
) -> Result<(), PlotError> {
    root.fill(&WHITE).map_err(map_err)?;

    if !paginated {
        // Single plot filling the page.
        return draw_group(root, &groups[0], &resolved[0], options, 1);
    }

    let area = if options.title.is_empty() {
        root.clone()
    } else {
        root.titled(&options.title, ("sans-serif", 28))
            .map_err(map_err)?
    };

    let (rows, cols) = options.layout;
    let density = layout::tiles_per_page(options.layout);
    let tiles = area.split_evenly((rows.max(1), cols.max(1)));
    for ((group, params), tile) in groups.iter().zip(resolved).zip(tiles.iter()) {
        draw_group(tile, group, params, options, density)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Filename helpers
// ---------------------------------------------------------------------------

/// Output format: explicit override, else the filename extension, else SVG.
fn resolve_format(options: &PlotOptions) -> ImageFormat {
    if let Some(format) = options.format {
        return format;
    }
    options
        .output
        .as_deref()
        .and_then(Path::extension)
        .and_then(|ext| ext.to_str())
        .and_then(ImageFormat::from_extension)
        .unwrap_or(ImageFormat::Svg)
}

/// `"dir/plot.png"` with suffix `"2"` becomes `"dir/plot2.png"`.
fn numbered_path(base: &Path, suffix: &str, format: ImageFormat) -> PathBuf {
    let stem = base
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("spectra");
    let name = format!("{stem}{suffix}.{}", format.extension());
    match base.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(name),
        _ => PathBuf::from(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_path_keeps_directory_and_renumbers() {
        let p = numbered_path(Path::new("out/plot.png"), "3", ImageFormat::Png);
        assert_eq!(p, Path::new("out/plot3.png"));

        let p = numbered_path(Path::new("plot.svg"), "_page2", ImageFormat::Svg);
        assert_eq!(p, Path::new("plot_page2.svg"));
    }

    #[test]
    fn format_resolution_prefers_override_then_extension() {
        let mut opts = PlotOptions {
            output: Some(PathBuf::from("x.png")),
            ..Default::default()
        };
        assert_eq!(resolve_format(&opts), ImageFormat::Png);

        opts.format = Some(ImageFormat::Svg);
        assert_eq!(resolve_format(&opts), ImageFormat::Svg);

        let bare = PlotOptions::default();
        assert_eq!(resolve_format(&bare), ImageFormat::Svg);
    }
}
