use crate::{
    base::{
        constants::{Float, PRIMES},
        rng::RNG,
        sampler::Sampler,
    },
    geometries::point2::{Point2F, Point2I},
    utils::discrepancy::radical_inverse,
};

/// Low-discrepancy sampler driven by the Halton sequence: each sample
/// dimension pulls the radical inverse of a running index in a distinct
/// prime base, so successive samples fill the unit hypercube far more
/// evenly than independent uniform draws. Unlike the full Halton-Zaremba
/// scrambling pbrt-style renderers use to decorrelate pixels sharing the
/// same low-order digits, pixels here are decorrelated with a cheap
/// integer hash of their coordinates — simpler, and adequate once combined
/// with per-pixel stratification in screen space.
///
/// `PRIMES` only tabulates 16 bases; once a pixel sample has consumed that
/// many dimensions, further draws fall back to `RNG` rather than reusing a
/// base (reuse would correlate dimensions 0 and 16, 1 and 17, ...).
#[derive(Debug, Clone)]
pub struct HaltonSampler {
    samples_per_pixel: usize,
    pixel: Point2I,
    seed_offset: u64,
    pixel_offset: u64,
    sample_index: usize,
    dimension: usize,
    rng: RNG,
}

pub struct HaltonSamplerOptions {
    pub samples_per_pixel: usize,
}

impl HaltonSampler {
    pub fn new(opts: HaltonSamplerOptions) -> Self {
        Self {
            samples_per_pixel: opts.samples_per_pixel.max(1),
            pixel: Point2I::default(),
            seed_offset: 0,
            pixel_offset: 0,
            sample_index: 0,
            dimension: 0,
            rng: RNG::new(),
        }
    }

    fn global_index(&self) -> u64 {
        self.pixel_offset.wrapping_add(self.sample_index as u64)
    }

    fn pixel_hash(p: &Point2I) -> u64 {
        let x = p.x as i64 as u64;
        let y = p.y as i64 as u64;
        let mut h = x
            .wrapping_mul(0x9E3779B97F4A7C15)
            .wrapping_add(y.wrapping_mul(0xC2B2AE3D27D4EB4F));
        h ^= h >> 33;
        h = h.wrapping_mul(0xFF51AFD7ED558CCD);
        h ^= h >> 33;
        h
    }

    fn next_base(&mut self) -> Option<usize> {
        if self.dimension < PRIMES.len() {
            let base = self.dimension;
            self.dimension += 1;
            Some(base)
        } else {
            None
        }
    }
}

impl Sampler for HaltonSampler {
    fn seed(&self, seed: u64) -> Box<dyn Sampler> {
        let mut sampler = self.clone();
        sampler.seed_offset ^= seed.wrapping_mul(0x2545F4914F6CDD1D);
        sampler.rng.seed(seed);
        Box::new(sampler)
    }

    fn start_pixel_sample(&mut self, p: &Point2I) {
        self.pixel = p.clone();
        // Every Halton dimension restarts its digit expansion at index 0 for
        // a given pixel offset; the offset itself is what keeps one pixel's
        // sequence from aliasing its neighbor's.
        self.pixel_offset = Self::pixel_hash(p) ^ self.seed_offset;
        self.sample_index = 0;
        self.dimension = 0;
    }

    fn get_1d(&mut self) -> Float {
        match self.next_base() {
            Some(base) => radical_inverse(base, self.global_index()),
            None => self.rng.uniform_continuous(),
        }
    }

    fn get_2d(&mut self) -> Point2F {
        let x = match self.next_base() {
            Some(base) => radical_inverse(base, self.global_index()),
            None => self.rng.uniform_continuous(),
        };
        let y = match self.next_base() {
            Some(base) => radical_inverse(base, self.global_index()),
            None => self.rng.uniform_continuous(),
        };
        Point2F::new(x, y)
    }

    fn start_next_sample(&mut self) -> bool {
        self.dimension = 0;
        self.sample_index += 1;
        self.sample_index < self.samples_per_pixel
    }

    fn current_sample_index(&self) -> usize {
        self.sample_index
    }

    fn samples_per_pixel(&self) -> usize {
        self.samples_per_pixel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_draw_stays_in_unit_range() {
        let mut sampler = HaltonSampler::new(HaltonSamplerOptions {
            samples_per_pixel: 64,
        });
        sampler.start_pixel_sample(&Point2I::new(3, 7));
        loop {
            let v = sampler.get_1d();
            assert!((0.0..1.0).contains(&v), "got {v}");
            let p = sampler.get_2d();
            assert!((0.0..1.0).contains(&p.x) && (0.0..1.0).contains(&p.y));
            if !sampler.start_next_sample() {
                break;
            }
        }
    }

    #[test]
    fn distinct_pixels_decorrelate() {
        let base = HaltonSampler::new(HaltonSamplerOptions {
            samples_per_pixel: 4,
        });
        let mut a = base.clone();
        let mut b = base.clone();
        a.start_pixel_sample(&Point2I::new(0, 0));
        b.start_pixel_sample(&Point2I::new(17, 41));
        assert_ne!(a.get_1d(), b.get_1d());
    }
}
