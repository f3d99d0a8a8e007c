use crate::{
    base::{
        bxdf::{abs_cos_theta, same_hemisphere, BxDF, BxDFSample, BxDFType, BSDF_DIFFUSE, BSDF_REFLECTION, BSDF_TRANSMISSION},
        constants::{Float, INV_PI},
        sampling::cosine_sample_hemisphere,
    },
    geometries::{point2::Point2F, vec3::Vec3},
    spectra::rgb::RGBSpectrum,
};

#[derive(Debug, Clone)]
pub struct LambertianReflection {
    bxdf_type: BxDFType,
    r: RGBSpectrum,
}

#[derive(Debug, Clone)]
pub struct LambertianTransmission {
    bxdf_type: BxDFType,
    t: RGBSpectrum,
}

impl LambertianReflection {
    pub fn new(r: RGBSpectrum) -> Self {
        Self {
            bxdf_type: BSDF_REFLECTION | BSDF_DIFFUSE,
            r,
        }
    }
}

impl LambertianTransmission {
    pub fn new(t: RGBSpectrum) -> Self {
        Self {
            bxdf_type: BSDF_TRANSMISSION | BSDF_DIFFUSE,
            t,
        }
    }
}

impl BxDF for LambertianReflection {
    fn f(&self, _wo: &Vec3, _wi: &Vec3) -> RGBSpectrum {
        self.r * INV_PI
    }

    fn bxdf_type(&self) -> BxDFType {
        self.bxdf_type
    }
}

impl BxDF for LambertianTransmission {
    fn f(&self, _wo: &Vec3, _wi: &Vec3) -> RGBSpectrum {
        self.t * INV_PI
    }

    fn sample(&self, wo: &Vec3, u: &Point2F) -> BxDFSample {
        let mut wi = cosine_sample_hemisphere(u);
        if wo.z > 0.0 {
            wi.z *= -1.0;
        }
        let pdf = self.pdf(wo, &wi);
        BxDFSample {
            f: self.f(wo, &wi),
            wi,
            pdf,
            sampled_type: None,
        }
    }

    fn pdf(&self, wo: &Vec3, wi: &Vec3) -> Float {
        if !same_hemisphere(wo, wi) {
            abs_cos_theta(wi) * INV_PI
        } else {
            0.0
        }
    }

    fn bxdf_type(&self) -> BxDFType {
        self.bxdf_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{bxdf::BSDF_ALL, spectrum::Spectrum};

    /// Monte Carlo estimate of `∫ f(wo, wi) |cosθi| dwi` via the BxDF's own
    /// cosine-hemisphere importance sampling; a non-transmissive lobe must
    /// not reflect more energy than it receives.
    #[test]
    fn reflectance_does_not_exceed_unity() {
        let bxdf = LambertianReflection::new(RGBSpectrum::new(0.9));
        let wo = Vec3::new(0.3, 0.1, 0.9).normalize();

        let samples = 4096;
        let mut sum = RGBSpectrum::default();
        for i in 0..samples {
            let u = Point2F::new(radical_inverse_2(i as u64), radical_inverse_3(i as u64));
            let sample = bxdf.sample(&wo, &u);
            if sample.pdf > 0.0 {
                sum += sample.f * abs_cos_theta(&sample.wi) / sample.pdf;
            }
        }
        let estimate = (sum / samples as Float).max_component_value();
        assert!(
            estimate <= 1.0 + 1e-3,
            "reflectance estimate {estimate} exceeds energy conservation bound"
        );
        assert!(bxdf.matches_flags(BSDF_ALL));
    }

    fn radical_inverse_2(mut n: u64) -> Float {
        let mut inverse = 0u64;
        for _ in 0..32 {
            inverse = (inverse << 1) | (n & 1);
            n >>= 1;
        }
        inverse as Float * 2.328_306_4e-10
    }

    fn radical_inverse_3(mut n: u64) -> Float {
        let mut inverse = 0.0;
        let mut scale = 1.0;
        while n > 0 {
            scale /= 3.0;
            inverse += (n % 3) as Float * scale;
            n /= 3;
        }
        inverse
    }
}
