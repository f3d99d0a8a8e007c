use crate::{
    base::{
        bssrdf::fresnel_diffuse_reflectance,
        bxdf::{abs_cos_theta, fresnel_dielectric, BxDF, BxDFType, BSDF_DIFFUSE, BSDF_REFLECTION},
        constants::{Float, INV_PI},
    },
    geometries::vec3::Vec3,
    spectra::rgb::RGBSpectrum,
};

/// Stands in for a separable BSSRDF's `Sw` exitance term at the point light
/// reenters the surface, so the existing BSDF/light-sampling machinery can
/// treat subsurface exit the same as any other reflection lobe.
#[derive(Debug, Clone)]
pub struct SeparableBSSRDFAdapter {
    bxdf_type: BxDFType,
    eta: Float,
}

impl SeparableBSSRDFAdapter {
    pub fn new(eta: Float) -> Self {
        Self {
            bxdf_type: BSDF_REFLECTION | BSDF_DIFFUSE,
            eta,
        }
    }
}

impl BxDF for SeparableBSSRDFAdapter {
    fn f(&self, _wo: &Vec3, wi: &Vec3) -> RGBSpectrum {
        let fr = fresnel_dielectric(abs_cos_theta(wi), 1.0, self.eta);
        let c = 1.0 - 2.0 * fresnel_diffuse_reflectance(1.0 / self.eta);
        RGBSpectrum::new((1.0 - fr) * INV_PI / c.max(1e-4))
    }

    fn bxdf_type(&self) -> BxDFType {
        self.bxdf_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::spectrum::Spectrum;

    #[test]
    fn exitance_is_nonnegative_across_the_hemisphere() {
        let adapter = SeparableBSSRDFAdapter::new(1.3);
        let wo = Vec3::new(0.0, 0.0, 1.0);
        for i in 1..10 {
            let cos_theta = i as Float / 10.0;
            let wi = Vec3::new((1.0 - cos_theta * cos_theta).sqrt(), 0.0, cos_theta);
            let f = adapter.f(&wo, &wi);
            assert!(f.max_component_value() >= 0.0);
        }
    }
}
