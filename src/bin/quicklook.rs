//! Quicklook demo: synthesize a short sequence of noisy near-infrared
//! spectra and render them with feature annotation.
//!
//! Any plot option can be overridden on the command line as `key=value`
//! pairs routed through the option alias table, e.g.
//!
//! ```text
//! quicklook output=seq.png layout=2x2 multiplot=true multipage=true
//! ```

use anyhow::{bail, Context, Result};

use fluxplot::{plot_spectra, PlotOptions, Spectrum, SpectrumMetadata};

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Synthetic near-infrared spectrum: a smooth continuum with absorption
/// dips at the water and CO bands, plus Gaussian noise.
fn generate_spectrum(wave: &[f64], depth: f64, noise_level: f64, rng: &mut SimpleRng) -> (Vec<f64>, Vec<f64>) {
    let dips: &[(f64, f64, f64)] = &[
        (1.15, 0.05, 0.35),
        (1.4, 0.08, 0.55),
        (1.9, 0.10, 0.5),
        (2.33, 0.04, 0.3),
    ];
    let flux: Vec<f64> = wave
        .iter()
        .map(|&w| {
            let continuum = 1.0 - 0.25 * (w - 1.2).powi(2);
            let absorbed: f64 = dips
                .iter()
                .map(|&(mu, sigma, amp)| gaussian(w, mu, sigma, amp * depth))
                .sum();
            (continuum - absorbed + rng.gauss(0.0, noise_level)).max(0.0)
        })
        .collect();
    let noise = vec![noise_level; wave.len()];
    (flux, noise)
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut options = PlotOptions::default();
    options.set("output", "quicklook.svg").context("defaults")?;
    options.set("mdwarf", "true").context("defaults")?;
    options.set("telluric", "true").context("defaults")?;
    options.set("noise", "true").context("defaults")?;
    options.set("stack", "0.4").context("defaults")?;
    options.set("legends", "depth 0.4, depth 0.7, depth 1.0").context("defaults")?;

    for arg in std::env::args().skip(1) {
        let Some((key, value)) = arg.split_once('=') else {
            bail!("expected key=value arguments, got '{arg}'");
        };
        options
            .set(key, value)
            .with_context(|| format!("bad argument '{arg}'"))?;
    }

    let mut rng = SimpleRng::new(42);
    // Wavelengths: 0.90 → 2.45 micron, step 0.005
    let wave: Vec<f64> = (0..311).map(|i| 0.90 + i as f64 * 0.005).collect();

    let metadata = SpectrumMetadata {
        wave_label: Some("Wavelength".to_string()),
        wave_unit: Some("micron".to_string()),
        flux_label: Some("F_lambda".to_string()),
        flux_unit: Some("normalized".to_string()),
        flux_scale: None,
        name: None,
    };

    let mut spectra = Vec::new();
    for (i, depth) in [0.4, 0.7, 1.0].into_iter().enumerate() {
        let (flux, noise) = generate_spectrum(&wave, depth, 0.01 + 0.01 * i as f64, &mut rng);
        let mut meta = metadata.clone();
        meta.name = Some(format!("synthetic {i}"));
        let sp = Spectrum::new(wave.clone(), flux)?
            .with_noise(noise)?
            .with_metadata(meta);
        spectra.push(sp);
    }

    let summary = plot_spectra(spectra, &options)?;
    for path in &summary.files {
        println!("wrote {}", path.display());
    }
    Ok(())
}
