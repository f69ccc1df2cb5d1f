//! Static table of labelled spectral features and the class presets that
//! expand to them.

// ---------------------------------------------------------------------------
// Feature – one labelled absorption/emission feature
// ---------------------------------------------------------------------------

/// How a feature is marked on the plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// A bracket spanning the wavelength interval.
    Band,
    /// A tick at each wavelength of the interval.
    Line,
}

/// One entry of the feature table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Feature {
    /// Display label drawn above the spectra.
    pub label: &'static str,
    pub kind: FeatureKind,
    /// Wavelength intervals (micron) where the feature appears.
    pub intervals: &'static [(f64, f64)],
}

const H2O: Feature = Feature {
    label: "H₂O",
    kind: FeatureKind::Band,
    intervals: &[(0.92, 0.95), (1.08, 1.20), (1.325, 1.550), (1.72, 2.14)],
};

const CH4: Feature = Feature {
    label: "CH₄",
    kind: FeatureKind::Band,
    intervals: &[(1.1, 1.24), (1.28, 1.44), (1.6, 1.76), (2.2, 2.35)],
};

const CO: Feature = Feature {
    label: "CO",
    kind: FeatureKind::Band,
    intervals: &[(2.28, 2.39)],
};

const TIO: Feature = Feature {
    label: "TiO",
    kind: FeatureKind::Band,
    intervals: &[(0.76, 0.80), (0.825, 0.831)],
};

const VO: Feature = Feature {
    label: "VO",
    kind: FeatureKind::Band,
    intervals: &[(1.04, 1.08)],
};

const FEH: Feature = Feature {
    label: "FeH",
    kind: FeatureKind::Band,
    intervals: &[(0.86, 0.90), (0.98, 1.03), (1.19, 1.25), (1.57, 1.64)],
};

const H2: Feature = Feature {
    label: "H₂",
    kind: FeatureKind::Band,
    intervals: &[(2.05, 2.6)],
};

/// Spectral-binary marker.
const SB: Feature = Feature {
    label: "*",
    kind: FeatureKind::Band,
    intervals: &[(1.6, 1.64)],
};

const HI: Feature = Feature {
    label: "H I",
    kind: FeatureKind::Line,
    intervals: &[
        (1.004, 1.005),
        (1.093, 1.094),
        (1.281, 1.282),
        (1.944, 1.945),
        (2.166, 2.166),
    ],
};

const NAI: Feature = Feature {
    label: "Na I",
    kind: FeatureKind::Line,
    intervals: &[(0.8186, 0.8195), (1.136, 1.137), (2.206, 2.209)],
};

const KI: Feature = Feature {
    label: "K I",
    kind: FeatureKind::Line,
    intervals: &[(0.7699, 0.7665), (1.169, 1.177), (1.244, 1.252)],
};

/// Look up a feature by its short code (case-insensitive). Several codes are
/// aliases for the same feature (`h`/`hi`/`h1`, `na`/`nai`/`na1`,
/// `k`/`ki`/`k1`).
pub fn lookup(code: &str) -> Option<&'static Feature> {
    match code.to_ascii_lowercase().as_str() {
        "h2o" => Some(&H2O),
        "ch4" => Some(&CH4),
        "co" => Some(&CO),
        "tio" => Some(&TIO),
        "vo" => Some(&VO),
        "feh" => Some(&FEH),
        "h2" => Some(&H2),
        "sb" => Some(&SB),
        "h" | "hi" | "h1" => Some(&HI),
        "na" | "nai" | "na1" => Some(&NAI),
        "k" | "ki" | "k1" => Some(&KI),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Telluric absorption bands
// ---------------------------------------------------------------------------

/// Atmospheric absorption regions (micron) shaded when telluric marking is
/// requested. Independent of the feature table.
pub const TELLURIC_BANDS: &[(f64, f64)] = &[(1.1, 1.2), (1.3, 1.5), (1.75, 2.0)];

/// Marker drawn inside each telluric band.
pub const TELLURIC_MARKER: &str = "⊕";

// ---------------------------------------------------------------------------
// Class presets
// ---------------------------------------------------------------------------

/// Class-membership flags that each imply a preset set of features.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassFlags {
    pub mdwarf: bool,
    pub ldwarf: bool,
    pub tdwarf: bool,
    pub young: bool,
    pub binary: bool,
}

const ML_DWARF_FEATURES: &[&str] = &["k", "na", "feh", "tio", "co", "h2o", "h2"];
const T_DWARF_FEATURES: &[&str] = &["k", "ch4", "h2o", "h2"];
const YOUNG_FEATURES: &[&str] = &["vo"];
const BINARY_FEATURES: &[&str] = &["sb"];

/// Combine explicitly requested feature codes with the class presets,
/// deduplicating while preserving first-occurrence order. Unknown codes are
/// kept here and reported when annotation runs.
pub fn requested_features(explicit: &[String], classes: ClassFlags) -> Vec<String> {
    let mut codes: Vec<String> = explicit.iter().map(|c| c.to_ascii_lowercase()).collect();
    if classes.mdwarf || classes.ldwarf {
        codes.extend(ML_DWARF_FEATURES.iter().map(|c| c.to_string()));
    }
    if classes.tdwarf {
        codes.extend(T_DWARF_FEATURES.iter().map(|c| c.to_string()));
    }
    if classes.young {
        codes.extend(YOUNG_FEATURES.iter().map(|c| c.to_string()));
    }
    if classes.binary {
        codes.extend(BINARY_FEATURES.iter().map(|c| c.to_string()));
    }

    let mut unique = Vec::with_capacity(codes.len());
    for code in codes {
        if !unique.contains(&code) {
            unique.push(code);
        }
    }
    unique
}
