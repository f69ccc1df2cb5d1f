use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// SpectrumLike – the capability interface spectra must satisfy
// ---------------------------------------------------------------------------

/// Read-only view of a spectral-flux measurement.
///
/// Callers keep ownership of their spectrum types; the plotting entry points
/// only read the wavelength/flux/noise arrays and the descriptive metadata.
/// Implement this for your own type, or use the bundled [`Spectrum`].
pub trait SpectrumLike {
    /// Wavelength axis, ascending.
    fn wavelength(&self) -> &[f64];

    /// Flux axis – same length as `wavelength()`.
    fn flux(&self) -> &[f64];

    /// Per-point flux uncertainty, if recorded.
    fn noise(&self) -> Option<&[f64]> {
        None
    }

    /// Descriptive metadata used for axis labelling.
    fn metadata(&self) -> &SpectrumMetadata;

    /// Largest finite flux value, or 0.0 for an all-NaN spectrum.
    fn flux_max(&self) -> f64 {
        self.flux()
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(f64::NEG_INFINITY, f64::max)
            .max(0.0)
    }
}

// ---------------------------------------------------------------------------
// SpectrumMetadata – axis labels and units
// ---------------------------------------------------------------------------

/// Descriptive metadata for one spectrum. All fields optional; axis labels
/// fall back to generic placeholders when nothing is recorded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpectrumMetadata {
    /// Wavelength axis label, e.g. "Wavelength".
    pub wave_label: Option<String>,
    /// Wavelength unit, e.g. "micron".
    pub wave_unit: Option<String>,
    /// Flux axis label, e.g. "F_lambda".
    pub flux_label: Option<String>,
    /// Flux unit, e.g. "erg/s/cm2/micron".
    pub flux_unit: Option<String>,
    /// Flux scaling description, e.g. "Normalized".
    pub flux_scale: Option<String>,
    /// Short name used when no legend string is supplied.
    pub name: Option<String>,
}

impl SpectrumMetadata {
    /// X axis label: `"<label> (<unit>)"`, else a generic placeholder.
    pub fn x_axis_label(&self) -> String {
        match (&self.wave_label, &self.wave_unit) {
            (Some(label), Some(unit)) => format!("{label} ({unit})"),
            _ => "Wavelength (unknown units)".to_string(),
        }
    }

    /// Y axis label: `"<scale> <label> (<unit>)"`, else a generic placeholder.
    pub fn y_axis_label(&self) -> String {
        match (&self.flux_label, &self.flux_unit) {
            (Some(label), Some(unit)) => {
                let scale = self.flux_scale.as_deref().unwrap_or("");
                if scale.is_empty() {
                    format!("{label} ({unit})")
                } else {
                    format!("{scale} {label} ({unit})")
                }
            }
            _ => "Flux (unknown units)".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Spectrum – the bundled concrete implementation
// ---------------------------------------------------------------------------

/// Construction errors for [`Spectrum`].
#[derive(Debug, Error, PartialEq)]
pub enum SpectrumError {
    #[error("wavelength has {wave} samples but flux has {flux}")]
    LengthMismatch { wave: usize, flux: usize },
    #[error("noise has {noise} samples but flux has {flux}")]
    NoiseLengthMismatch { noise: usize, flux: usize },
}

/// A single owned spectrum: wavelength, flux, optional uncertainty, metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    wave: Vec<f64>,
    flux: Vec<f64>,
    noise: Option<Vec<f64>>,
    metadata: SpectrumMetadata,
}

impl Spectrum {
    /// Build a spectrum; wavelength and flux must have equal length.
    pub fn new(wave: Vec<f64>, flux: Vec<f64>) -> Result<Self, SpectrumError> {
        if wave.len() != flux.len() {
            return Err(SpectrumError::LengthMismatch {
                wave: wave.len(),
                flux: flux.len(),
            });
        }
        Ok(Spectrum {
            wave,
            flux,
            noise: None,
            metadata: SpectrumMetadata::default(),
        })
    }

    /// Attach a per-point uncertainty array (same length as flux).
    pub fn with_noise(mut self, noise: Vec<f64>) -> Result<Self, SpectrumError> {
        if noise.len() != self.flux.len() {
            return Err(SpectrumError::NoiseLengthMismatch {
                noise: noise.len(),
                flux: self.flux.len(),
            });
        }
        self.noise = Some(noise);
        Ok(self)
    }

    /// Attach descriptive metadata.
    pub fn with_metadata(mut self, metadata: SpectrumMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.wave.len()
    }

    /// Whether the spectrum holds no samples.
    pub fn is_empty(&self) -> bool {
        self.wave.is_empty()
    }
}

impl SpectrumLike for Spectrum {
    fn wavelength(&self) -> &[f64] {
        &self.wave
    }

    fn flux(&self) -> &[f64] {
        &self.flux
    }

    fn noise(&self) -> Option<&[f64]> {
        self.noise.as_deref()
    }

    fn metadata(&self) -> &SpectrumMetadata {
        &self.metadata
    }
}

impl fmt::Display for Spectrum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.metadata.name.as_deref().unwrap_or("spectrum");
        if self.wave.is_empty() {
            write!(f, "{name} (empty)")
        } else {
            write!(
                f,
                "{name} ({} samples, {:.3}-{:.3})",
                self.wave.len(),
                self.wave[0],
                self.wave[self.wave.len() - 1]
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_length_mismatch() {
        let err = Spectrum::new(vec![1.0, 2.0], vec![1.0]).unwrap_err();
        assert_eq!(err, SpectrumError::LengthMismatch { wave: 2, flux: 1 });
    }

    #[test]
    fn noise_must_match_flux_length() {
        let sp = Spectrum::new(vec![1.0, 2.0], vec![1.0, 2.0]).unwrap();
        assert!(sp.with_noise(vec![0.1]).is_err());
    }

    #[test]
    fn flux_max_ignores_nan() {
        let sp = Spectrum::new(vec![1.0, 2.0, 3.0], vec![0.5, f64::NAN, 2.5]).unwrap();
        assert_eq!(sp.flux_max(), 2.5);
    }

    #[test]
    fn axis_labels_fall_back_to_placeholders() {
        let meta = SpectrumMetadata::default();
        assert_eq!(meta.x_axis_label(), "Wavelength (unknown units)");
        assert_eq!(meta.y_axis_label(), "Flux (unknown units)");

        let meta = SpectrumMetadata {
            wave_label: Some("Wavelength".into()),
            wave_unit: Some("micron".into()),
            flux_label: Some("F_lambda".into()),
            flux_unit: Some("erg/s/cm2/micron".into()),
            flux_scale: Some("Normalized".into()),
            name: None,
        };
        assert_eq!(meta.x_axis_label(), "Wavelength (micron)");
        assert_eq!(meta.y_axis_label(), "Normalized F_lambda (erg/s/cm2/micron)");
    }
}
