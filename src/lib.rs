//! Static rendering of labeled spectral-flux curves.
//!
//! Architecture:
//! ```text
//!  Spectrum | Vec<Spectrum> | Vec<Vec<Spectrum>>
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  layout   │  normalize input → plot groups, pagination math
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  params   │  options + defaults → resolved per-plot parameters
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  render   │  curves, feature labels, telluric bands, legend
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  output   │  numbered files (svg/png/bmp) or quicklook buffers
//!   └──────────┘
//! ```
//!
//! ```no_run
//! use fluxplot::{plot_spectra, PlotOptions, Spectrum};
//!
//! let sp = Spectrum::new(vec![1.0, 1.1, 1.2, 1.3], vec![0.8, 1.0, 0.9, 0.7])?;
//! let mut options = PlotOptions::default();
//! options.set("output", "quicklook.svg")?;
//! options.set("tdwarf", "true")?;
//! options.set("telluric", "true")?;
//! plot_spectra(sp, &options)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use thiserror::Error;

pub mod color;
pub mod features;
pub mod layout;
pub mod options;
pub mod output;
pub mod params;
pub mod render;
pub mod spectrum;

pub use layout::SpectrumInput;
pub use options::{ImageFormat, LegendLocation, LineStyle, PerSpectrum, PlotOptions};
pub use output::{plot_spectra, PlotSummary, QuicklookImage};
pub use spectrum::{Spectrum, SpectrumError, SpectrumLike, SpectrumMetadata};

/// Errors from a plotting call.
#[derive(Debug, Error)]
pub enum PlotError {
    /// Nothing usable was supplied; no output is produced.
    #[error("no spectra supplied")]
    NoSpectra,
    /// An inner plot group held no valid spectra.
    #[error("plot group {index} contains no valid spectra")]
    EmptyGroup { index: usize },
    /// The plotting backend failed while drawing or writing.
    #[error("rendering failed: {0}")]
    Render(String),
}
