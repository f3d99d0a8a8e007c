use std::sync::atomic::{AtomicU64, Ordering};

/// Process-lifetime counters for the two non-fatal error kinds. Every
/// worker thread increments these directly; the CLI reads them once after
/// `render()` returns to print a summary line.
pub struct Diagnostics {
    degenerate_geometry: AtomicU64,
    numeric_anomalies: AtomicU64,
}

impl Diagnostics {
    const fn new() -> Self {
        Self {
            degenerate_geometry: AtomicU64::new(0),
            numeric_anomalies: AtomicU64::new(0),
        }
    }

    pub fn record_degenerate_geometry(&self, context: &str) {
        self.degenerate_geometry.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(context, "skipped degenerate geometry");
    }

    pub fn record_numeric_anomaly(&self, context: &str) {
        self.numeric_anomalies.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(context, "clamped non-finite radiance to black");
    }

    pub fn degenerate_geometry_count(&self) -> u64 {
        self.degenerate_geometry.load(Ordering::Relaxed)
    }

    pub fn numeric_anomaly_count(&self) -> u64 {
        self.numeric_anomalies.load(Ordering::Relaxed)
    }
}

pub static DIAGNOSTICS: Diagnostics = Diagnostics::new();

/// Clamps a radiance sample to black and records the event if any channel
/// is non-finite. Returns the (possibly clamped) value.
pub fn clamp_radiance(
    value: crate::spectra::rgb::RGBSpectrum,
    context: &str,
) -> crate::spectra::rgb::RGBSpectrum {
    use crate::base::spectrum::Spectrum;

    let non_finite = value.is_nan() || !value[0].is_finite() || !value[1].is_finite() || !value[2].is_finite();
    if non_finite {
        DIAGNOSTICS.record_numeric_anomaly(context);
        crate::spectra::rgb::RGBSpectrum::new(0.0)
    } else {
        value
    }
}
