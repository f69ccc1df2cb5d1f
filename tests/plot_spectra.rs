use std::fs;

use plotters::prelude::*;
use tempfile::TempDir;

use fluxplot::params::{resolve_group, DEFAULT_XRANGE};
use fluxplot::{plot_spectra, PlotError, PlotOptions, Spectrum, SpectrumLike};

/// A flat-topped spectrum covering `[lo, hi]` with maximum `peak`.
fn spectrum(lo: f64, hi: f64, peak: f64) -> Spectrum {
    let n = 200;
    let wave: Vec<f64> = (0..n)
        .map(|i| lo + (hi - lo) * i as f64 / (n - 1) as f64)
        .collect();
    let flux: Vec<f64> = (0..n)
        .map(|i| peak * (0.6 + 0.4 * (i as f64 / n as f64 * std::f64::consts::PI).sin()))
        .collect();
    Spectrum::new(wave, flux).unwrap()
}

/// Whether the bitmap backend can rasterize text in this environment
/// (requires a discoverable system font).
fn bitmap_text_available() -> bool {
    let mut buf = vec![0u8; 60 * 60 * 3];
    let root = BitMapBackend::with_buffer(&mut buf, (60, 60)).into_drawing_area();
    root.draw(&Text::new("probe", (5, 5), ("sans-serif", 12))).is_ok()
}

#[test]
fn single_spectrum_produces_one_numbered_artifact() {
    let dir = TempDir::new().unwrap();
    let sp = spectrum(1.0, 1.3, 1.0);

    let mut options = PlotOptions::default();
    options.output = Some(dir.path().join("plot.svg"));

    let summary = plot_spectra(sp.clone(), &options).unwrap();
    assert_eq!(summary.files.len(), 1);
    assert_eq!(summary.files[0], dir.path().join("plot1.svg"));
    assert!(fs::metadata(&summary.files[0]).unwrap().len() > 0);

    // Default bounds: x pinned to the survey range, y scaled from the flux
    // maximum by [-0.02, 1.2].
    let resolved = resolve_group(&[sp.clone()], &PlotOptions::default(), 0);
    assert_eq!(resolved.xrange, DEFAULT_XRANGE);
    let max = sp
        .flux()
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    assert!((resolved.yrange.0 - (-0.02 * max)).abs() < 1e-9);
    assert!((resolved.yrange.1 - 1.2 * max).abs() < 1e-9);
}

#[test]
fn flat_list_without_multiplot_is_a_single_plot() {
    let dir = TempDir::new().unwrap();
    let spectra = vec![
        spectrum(0.9, 2.4, 1.0),
        spectrum(0.9, 2.4, 0.8),
        spectrum(0.9, 2.4, 0.6),
    ];

    let mut options = PlotOptions::default();
    options.output = Some(dir.path().join("overlay.svg"));

    let summary = plot_spectra(spectra, &options).unwrap();
    assert_eq!(summary.files.len(), 1);
}

#[test]
fn grouped_input_forces_one_file_per_group() {
    let dir = TempDir::new().unwrap();
    let groups = vec![
        vec![spectrum(0.9, 2.4, 1.0), spectrum(0.9, 2.4, 0.7)],
        vec![spectrum(0.9, 2.4, 0.9)],
        vec![spectrum(0.9, 2.4, 0.5)],
    ];

    let mut options = PlotOptions::default();
    // multiplot is left off: grouped input must force it anyway.
    options.output = Some(dir.path().join("set.svg"));

    let summary = plot_spectra(groups, &options).unwrap();
    assert_eq!(summary.files.len(), 3);
    assert_eq!(summary.files[2], dir.path().join("set3.svg"));
}

#[test]
fn multipage_writes_ceil_groups_over_tiles_pages() {
    let dir = TempDir::new().unwrap();
    let groups: Vec<Vec<Spectrum>> =
        (0..5).map(|_| vec![spectrum(0.9, 2.4, 1.0)]).collect();

    let mut options = PlotOptions::default();
    options.multipage = true;
    options.layout = (2, 2);
    options.title = "sequence".to_string();
    options.output = Some(dir.path().join("seq.svg"));

    let summary = plot_spectra(groups, &options).unwrap();
    assert_eq!(summary.pages, 2);
    assert_eq!(summary.files.len(), 2);
    assert!(dir.path().join("seq_page1.svg").exists());
    assert!(dir.path().join("seq_page2.svg").exists());
}

#[test]
fn no_spectra_aborts_with_no_output() {
    let dir = TempDir::new().unwrap();
    let mut options = PlotOptions::default();
    options.output = Some(dir.path().join("none.svg"));

    let err = plot_spectra(Vec::<Spectrum>::new(), &options).unwrap_err();
    assert!(matches!(err, PlotError::NoSpectra));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn duplicate_feature_codes_are_annotated_once() {
    let dir = TempDir::new().unwrap();
    let sp = spectrum(0.9, 2.4, 1.0);

    let mut options = PlotOptions::default();
    options.features = vec!["co".to_string(), "CO".to_string(), "co".to_string()];
    options.telluric = true;
    options.output = Some(dir.path().join("feat.svg"));

    let summary = plot_spectra(sp, &options).unwrap();
    let svg = fs::read_to_string(&summary.files[0]).unwrap();
    // CO has a single band at 2.28-2.39, inside the default x range; three
    // requests collapse to one label.
    assert_eq!(svg.matches(">CO<").count(), 1);
    // Telluric bands carry the earth marker.
    assert!(svg.contains("⊕"));
}

#[test]
fn out_of_range_features_are_not_annotated() {
    let dir = TempDir::new().unwrap();
    let sp = spectrum(0.9, 2.4, 1.0);

    let mut options = PlotOptions::default();
    // CO at 2.28-2.39 falls outside this pinned x range.
    options.xrange = Some((0.9, 2.0));
    options.features = vec!["co".to_string()];
    options.output = Some(dir.path().join("clip.svg"));

    let summary = plot_spectra(sp, &options).unwrap();
    let svg = fs::read_to_string(&summary.files[0]).unwrap();
    assert_eq!(svg.matches(">CO<").count(), 0);
}

#[test]
fn missing_output_renders_quicklook_buffers() {
    if !bitmap_text_available() {
        eprintln!("no system font available, skipping quicklook render check");
        return;
    }
    let spectra = vec![spectrum(0.9, 2.4, 1.0), spectrum(0.9, 2.4, 0.5)];
    let options = PlotOptions::default();

    let summary = plot_spectra(spectra, &options).unwrap();
    assert!(summary.files.is_empty());
    assert_eq!(summary.quicklooks.len(), 1);
    let ql = &summary.quicklooks[0];
    assert_eq!(ql.rgb.len(), (ql.width * ql.height * 3) as usize);
    // Something must have been drawn on the white canvas.
    assert!(ql.rgb.iter().any(|&b| b != 255));
}
