//! The full configuration surface for a plotting call.
//!
//! Every display parameter lives in one explicit [`PlotOptions`] struct
//! with documented defaults. Aliased keyword spellings
//! are resolved once at entry through [`canonical_key`]; per-spectrum option
//! lists are padded through [`pad_to_len`] instead of growing ad hoc.

use std::path::PathBuf;

use plotters::style::RGBColor;
use thiserror::Error;

use crate::color::ColorScheme;
use crate::features::ClassFlags;
use crate::spectrum::Spectrum;

// ---------------------------------------------------------------------------
// Per-spectrum option lists
// ---------------------------------------------------------------------------

/// A per-spectrum option: unset, one value for all spectra, or an explicit
/// list. An explicit list shorter than the spectrum count is padded with the
/// option's default value, never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum PerSpectrum<T> {
    Unset,
    Uniform(T),
    List(Vec<T>),
}

impl<T> Default for PerSpectrum<T> {
    fn default() -> Self {
        PerSpectrum::Unset
    }
}

impl<T: Clone> PerSpectrum<T> {
    /// Resolve to exactly `n` values.
    pub fn resolve(&self, n: usize, default: T) -> Vec<T> {
        match self {
            PerSpectrum::Unset => vec![default; n],
            PerSpectrum::Uniform(v) => vec![v.clone(); n],
            PerSpectrum::List(values) => pad_to_len(values, n, default),
        }
    }

    /// Whether any value was supplied.
    pub fn is_set(&self) -> bool {
        !matches!(self, PerSpectrum::Unset)
    }
}

/// Pure padding: truncate or extend `values` to length `n`, filling with
/// `default`.
pub fn pad_to_len<T: Clone>(values: &[T], n: usize, default: T) -> Vec<T> {
    let mut out: Vec<T> = values.iter().take(n).cloned().collect();
    while out.len() < n {
        out.push(default.clone());
    }
    out
}

// ---------------------------------------------------------------------------
// Small option enums
// ---------------------------------------------------------------------------

/// Where the legend box is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendLocation {
    UpperLeft,
    UpperMiddle,
    UpperRight,
    MiddleLeft,
    MiddleRight,
    LowerLeft,
    LowerMiddle,
    LowerRight,
    /// Dedicated panel to the right of the plot area.
    Outside,
}

impl LegendLocation {
    /// Parse locations like "upper right", "lower_left" or "outside".
    pub fn parse(s: &str) -> Option<Self> {
        let norm: String = s
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();
        match norm.as_str() {
            "upperleft" => Some(LegendLocation::UpperLeft),
            "uppermiddle" | "uppercenter" => Some(LegendLocation::UpperMiddle),
            "upperright" => Some(LegendLocation::UpperRight),
            "middleleft" | "centerleft" => Some(LegendLocation::MiddleLeft),
            "middleright" | "centerright" => Some(LegendLocation::MiddleRight),
            "lowerleft" => Some(LegendLocation::LowerLeft),
            "lowermiddle" | "lowercenter" => Some(LegendLocation::LowerMiddle),
            "lowerright" => Some(LegendLocation::LowerRight),
            "outside" => Some(LegendLocation::Outside),
            _ => None,
        }
    }
}

/// Line rendering style for a spectrum trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Step-post rendering (spectroscopy default).
    Steps,
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "steps" | "step" => Some(LineStyle::Steps),
            "solid" | "-" => Some(LineStyle::Solid),
            "dashed" | "--" => Some(LineStyle::Dashed),
            "dotted" | ":" => Some(LineStyle::Dotted),
            _ => None,
        }
    }
}

/// Output image format, inferred from the output filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    Png,
    Bmp,
}

impl ImageFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "svg" => Some(ImageFormat::Svg),
            "png" => Some(ImageFormat::Png),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
            ImageFormat::Bmp => "bmp",
        }
    }
}

// ---------------------------------------------------------------------------
// PlotOptions
// ---------------------------------------------------------------------------

/// All display parameters for one plotting call, with their defaults.
#[derive(Debug, Clone)]
pub struct PlotOptions {
    /// Draw each spectrum in its own plot. Forced on by grouped input and
    /// off by a single spectrum.
    pub multiplot: bool,
    /// Tile plots onto fixed-size grids flowing across numbered pages.
    pub multipage: bool,
    /// Grid layout per page as (rows, columns).
    pub layout: (usize, usize),
    /// Figure size in pixels (width, height).
    pub figsize: (u32, u32),
    /// Draw grid lines.
    pub grid: bool,
    /// Page title (drawn as a suptitle in multipage mode, as a caption
    /// otherwise).
    pub title: String,
    /// Output filename; without it, plots are rendered to in-memory buffers.
    pub output: Option<PathBuf>,
    /// Output format override; by default inferred from the filename.
    pub format: Option<ImageFormat>,
    /// Wavelength axis label override.
    pub xlabel: Option<String>,
    /// Flux axis label override.
    pub ylabel: Option<String>,
    /// Wavelength axis bounds override. Default [0.85, 2.42].
    pub xrange: Option<(f64, f64)>,
    /// Flux axis bounds override. Default [-0.02, 1.2] x group flux maximum.
    pub yrange: Option<(f64, f64)>,
    /// Legend strings, consumed sequentially across all spectra of all
    /// plots; padded with empty strings.
    pub legends: Vec<String>,
    pub legend_location: LegendLocation,
    /// Feature codes to annotate (see [`crate::features::lookup`]).
    pub features: Vec<String>,
    /// Class-membership flags implying preset feature sets.
    pub classes: ClassFlags,
    /// Shade telluric absorption bands.
    pub telluric: bool,
    /// Vertical stacking offset between overlaid spectra.
    pub stack: f64,
    /// Per-spectrum zero-point offsets; default 0.
    pub zeropoint: PerSpectrum<f64>,
    /// Draw a dotted baseline at each zero-point; default true.
    pub show_zero: PerSpectrum<bool>,
    /// Draw the uncertainty trace; default false.
    pub show_noise: PerSpectrum<bool>,
    /// Comparison spectrum overlaid at half opacity in every plot.
    pub comparison: Option<Spectrum>,
    /// Line colours; default all black.
    pub colors: PerSpectrum<RGBColor>,
    /// Uncertainty-trace colours; default the line colours.
    pub colors_unc: PerSpectrum<RGBColor>,
    /// Colour scheme generating a gradient across each group; overrides
    /// `colors`.
    pub color_scheme: Option<ColorScheme>,
    /// Line styles; default steps.
    pub linestyles: PerSpectrum<LineStyle>,
    /// Sample count for the feature-placement envelope.
    pub nsamples: usize,
}

impl Default for PlotOptions {
    fn default() -> Self {
        PlotOptions {
            multiplot: false,
            multipage: false,
            layout: (1, 1),
            figsize: (800, 600),
            grid: false,
            title: String::new(),
            output: None,
            format: None,
            xlabel: None,
            ylabel: None,
            xrange: None,
            yrange: None,
            legends: Vec::new(),
            legend_location: LegendLocation::UpperRight,
            features: Vec::new(),
            classes: ClassFlags::default(),
            telluric: false,
            stack: 0.0,
            zeropoint: PerSpectrum::Unset,
            show_zero: PerSpectrum::Unset,
            show_noise: PerSpectrum::Unset,
            comparison: None,
            colors: PerSpectrum::Unset,
            colors_unc: PerSpectrum::Unset,
            color_scheme: None,
            linestyles: PerSpectrum::Unset,
            nsamples: 1000,
        }
    }
}

// ---------------------------------------------------------------------------
// Alias resolution and the string-keyed setter
// ---------------------------------------------------------------------------

/// Errors from the string-keyed option interface.
#[derive(Debug, Error, PartialEq)]
pub enum OptionError {
    #[error("unknown option '{0}'")]
    UnknownKey(String),
    #[error("invalid value '{value}' for option '{key}'")]
    InvalidValue { key: String, value: String },
}

/// Resolve an option name (any accepted alias, case-insensitive) to its
/// canonical key.
///
/// | aliases                                  | canonical        |
/// |------------------------------------------|------------------|
/// | file, filename, output                   | output           |
/// | format, filetype                         | format           |
/// | layout, multilayout                      | layout           |
/// | legend, legends, label, labels           | legends          |
/// | legendlocation, labellocation            | legendlocation   |
/// | noise, shownoise, uncertainty            | shownoise        |
/// | color, colors                            | colors           |
/// | colorunc, colorsunc                      | colorsunc        |
/// | colorscheme, colormap                    | colorscheme      |
/// | linestyle, linestyles                    | linestyles       |
pub fn canonical_key(name: &str) -> Option<&'static str> {
    let key = name.to_ascii_lowercase();
    Some(match key.as_str() {
        "file" | "filename" | "output" => "output",
        "format" | "filetype" => "format",
        "multiplot" => "multiplot",
        "multipage" => "multipage",
        "layout" | "multilayout" => "layout",
        "figsize" => "figsize",
        "grid" => "grid",
        "title" => "title",
        "xlabel" => "xlabel",
        "ylabel" => "ylabel",
        "xrange" => "xrange",
        "yrange" => "yrange",
        "legend" | "legends" | "label" | "labels" => "legends",
        "legendlocation" | "labellocation" => "legendlocation",
        "features" => "features",
        "mdwarf" => "mdwarf",
        "ldwarf" => "ldwarf",
        "tdwarf" => "tdwarf",
        "young" => "young",
        "binary" => "binary",
        "telluric" => "telluric",
        "stack" => "stack",
        "zeropoint" => "zeropoint",
        "showzero" => "showzero",
        "noise" | "shownoise" | "uncertainty" => "shownoise",
        "color" | "colors" => "colors",
        "colorunc" | "colorsunc" => "colorsunc",
        "colorscheme" | "colormap" => "colorscheme",
        "linestyle" | "linestyles" => "linestyles",
        "nsamples" => "nsamples",
        _ => return None,
    })
}

impl PlotOptions {
    /// Apply one `key=value` style option through the alias table. Used by
    /// callers driving the library from strings (CLI, config files).
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        let key = canonical_key(name).ok_or_else(|| OptionError::UnknownKey(name.to_string()))?;
        let invalid = || OptionError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "output" => self.output = Some(PathBuf::from(value)),
            "format" => {
                self.format = Some(ImageFormat::from_extension(value).ok_or_else(invalid)?)
            }
            "multiplot" => self.multiplot = parse_bool(value).ok_or_else(invalid)?,
            "multipage" => self.multipage = parse_bool(value).ok_or_else(invalid)?,
            "layout" => self.layout = parse_pair_usize(value).ok_or_else(invalid)?,
            "figsize" => {
                let (w, h) = parse_pair_usize(value).ok_or_else(invalid)?;
                self.figsize = (w as u32, h as u32);
            }
            "grid" => self.grid = parse_bool(value).ok_or_else(invalid)?,
            "title" => self.title = value.to_string(),
            "xlabel" => self.xlabel = Some(value.to_string()),
            "ylabel" => self.ylabel = Some(value.to_string()),
            "xrange" => self.xrange = Some(parse_pair_f64(value).ok_or_else(invalid)?),
            "yrange" => self.yrange = Some(parse_pair_f64(value).ok_or_else(invalid)?),
            "legends" => self.legends = split_list(value),
            "legendlocation" => {
                self.legend_location = LegendLocation::parse(value).ok_or_else(invalid)?
            }
            "features" => self.features = split_list(value),
            "mdwarf" => self.classes.mdwarf = parse_bool(value).ok_or_else(invalid)?,
            "ldwarf" => self.classes.ldwarf = parse_bool(value).ok_or_else(invalid)?,
            "tdwarf" => self.classes.tdwarf = parse_bool(value).ok_or_else(invalid)?,
            "young" => self.classes.young = parse_bool(value).ok_or_else(invalid)?,
            "binary" => self.classes.binary = parse_bool(value).ok_or_else(invalid)?,
            "telluric" => self.telluric = parse_bool(value).ok_or_else(invalid)?,
            "stack" => self.stack = value.trim().parse().map_err(|_| invalid())?,
            "zeropoint" => {
                let vals: Option<Vec<f64>> =
                    split_list(value).iter().map(|v| v.parse().ok()).collect();
                self.zeropoint = PerSpectrum::List(vals.ok_or_else(invalid)?);
            }
            "showzero" => self.show_zero = PerSpectrum::Uniform(parse_bool(value).ok_or_else(invalid)?),
            "shownoise" => {
                self.show_noise = PerSpectrum::Uniform(parse_bool(value).ok_or_else(invalid)?)
            }
            "colors" => {
                let vals: Option<Vec<RGBColor>> =
                    split_list(value).iter().map(|v| parse_color(v)).collect();
                self.colors = PerSpectrum::List(vals.ok_or_else(invalid)?);
            }
            "colorsunc" => {
                let vals: Option<Vec<RGBColor>> =
                    split_list(value).iter().map(|v| parse_color(v)).collect();
                self.colors_unc = PerSpectrum::List(vals.ok_or_else(invalid)?);
            }
            "colorscheme" => self.color_scheme = Some(ColorScheme::parse(value)),
            "linestyles" => {
                let vals: Option<Vec<LineStyle>> =
                    split_list(value).iter().map(|v| LineStyle::parse(v)).collect();
                self.linestyles = PerSpectrum::List(vals.ok_or_else(invalid)?);
            }
            "nsamples" => self.nsamples = value.trim().parse().map_err(|_| invalid())?,
            _ => unreachable!("canonical_key returned an unhandled key"),
        }
        Ok(())
    }
}

// -- string parsing helpers --

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',').map(|v| v.trim().to_string()).collect()
}

fn parse_pair_f64(s: &str) -> Option<(f64, f64)> {
    let parts: Vec<&str> = s.split(&[',', 'x', ':'][..]).collect();
    if parts.len() != 2 {
        return None;
    }
    Some((parts[0].trim().parse().ok()?, parts[1].trim().parse().ok()?))
}

fn parse_pair_usize(s: &str) -> Option<(usize, usize)> {
    let parts: Vec<&str> = s.split(&[',', 'x', ':'][..]).collect();
    if parts.len() != 2 {
        return None;
    }
    Some((parts[0].trim().parse().ok()?, parts[1].trim().parse().ok()?))
}

/// Parse a colour by common name or `#rrggbb` hex.
pub fn parse_color(s: &str) -> Option<RGBColor> {
    let v = s.trim().to_ascii_lowercase();
    if let Some(hex) = v.strip_prefix('#') {
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            return Some(RGBColor(r, g, b));
        }
        return None;
    }
    match v.as_str() {
        "black" | "k" => Some(RGBColor(0, 0, 0)),
        "white" | "w" => Some(RGBColor(255, 255, 255)),
        "red" | "r" => Some(RGBColor(200, 30, 30)),
        "green" | "g" => Some(RGBColor(30, 150, 30)),
        "blue" | "b" => Some(RGBColor(30, 30, 200)),
        "cyan" | "c" => Some(RGBColor(0, 170, 170)),
        "magenta" | "m" => Some(RGBColor(170, 0, 170)),
        "yellow" | "y" => Some(RGBColor(200, 180, 0)),
        "gray" | "grey" => Some(RGBColor(128, 128, 128)),
        "orange" => Some(RGBColor(230, 140, 0)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_extends_with_default_and_truncates() {
        assert_eq!(pad_to_len(&[1, 2], 4, 9), vec![1, 2, 9, 9]);
        assert_eq!(pad_to_len(&[1, 2, 3], 2, 9), vec![1, 2]);
        assert_eq!(pad_to_len::<i32>(&[], 3, 7), vec![7, 7, 7]);
    }

    #[test]
    fn per_spectrum_resolution() {
        let unset: PerSpectrum<bool> = PerSpectrum::Unset;
        assert_eq!(unset.resolve(3, true), vec![true, true, true]);

        let uniform = PerSpectrum::Uniform(false);
        assert_eq!(uniform.resolve(2, true), vec![false, false]);

        let list = PerSpectrum::List(vec![false]);
        assert_eq!(list.resolve(3, true), vec![false, true, true]);
    }

    #[test]
    fn aliases_resolve_to_canonical_keys() {
        assert_eq!(canonical_key("file"), Some("output"));
        assert_eq!(canonical_key("Filename"), Some("output"));
        assert_eq!(canonical_key("labels"), Some("legends"));
        assert_eq!(canonical_key("uncertainty"), Some("shownoise"));
        assert_eq!(canonical_key("colorMap"), Some("colorscheme"));
        assert_eq!(canonical_key("multilayout"), Some("layout"));
        assert_eq!(canonical_key("bogus"), None);
    }

    #[test]
    fn set_routes_aliases() {
        let mut opts = PlotOptions::default();
        opts.set("noise", "true").unwrap();
        assert_eq!(opts.show_noise, PerSpectrum::Uniform(true));

        opts.set("labels", "a, b").unwrap();
        assert_eq!(opts.legends, vec!["a", "b"]);

        opts.set("layout", "2x3").unwrap();
        assert_eq!(opts.layout, (2, 3));

        opts.set("xrange", "0.9, 2.3").unwrap();
        assert_eq!(opts.xrange, Some((0.9, 2.3)));

        assert_eq!(
            opts.set("nope", "1"),
            Err(OptionError::UnknownKey("nope".to_string()))
        );
        assert!(opts.set("stack", "not-a-number").is_err());
    }

    #[test]
    fn color_parsing() {
        assert_eq!(parse_color("k"), Some(RGBColor(0, 0, 0)));
        assert_eq!(parse_color("#102030"), Some(RGBColor(16, 32, 48)));
        assert_eq!(parse_color("#zzz"), None);
    }

    #[test]
    fn legend_location_parsing() {
        assert_eq!(LegendLocation::parse("upper right"), Some(LegendLocation::UpperRight));
        assert_eq!(LegendLocation::parse("lower_left"), Some(LegendLocation::LowerLeft));
        assert_eq!(LegendLocation::parse("outside"), Some(LegendLocation::Outside));
        assert_eq!(LegendLocation::parse("floating"), None);
    }
}
