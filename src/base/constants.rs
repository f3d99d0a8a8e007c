cfg_if::cfg_if! {
    if #[cfg(feature = "float-as-double")] {
        pub type Float = f64;
        pub const PI: Float = std::f64::consts::PI;
    } else {
        pub type Float = f32;
        pub const PI: Float = std::f32::consts::PI;
    }
}

pub const PI_OVER_TWO: Float = PI / 2.0;
pub const PI_OVER_FOUR: Float = PI / 4.0;
pub const INV_PI: Float = 1.0 / PI;
pub const INV_TWO_PI: Float = 1.0 / (2.0 * PI);
pub const INV_FOUR_PI: Float = 1.0 / (4.0 * PI);

pub const ONE_MINUS_EPSILON: Float = 1.0 - Float::EPSILON;
pub const MACHINE_EPSILON: Float = Float::EPSILON * 0.5;

pub const SHADOW_EPSILON: Float = 1e-3;

/// Channel count of [`crate::spectra::rgb::RGBSpectrum`]. Spectral rendering beyond
/// RGB tristimulus evaluation is out of scope; this constant documents the assumption
/// rather than gating on it.
pub const SPECTRUM_SAMPLES: usize = 3;

/// Maximum number of BxDFs a single BSDF may aggregate (spec: "Invariant: all added
/// BxDFs share the interaction").
pub const MAX_BXDFS: usize = 8;

pub const PRIMES: [u32; 16] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53,
];
