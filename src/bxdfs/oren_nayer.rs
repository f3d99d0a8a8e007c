use crate::{
    base::{
        bxdf::{abs_cos_theta, cos_phi, sin_phi, sin_theta, BxDF, BxDFType, BSDF_DIFFUSE, BSDF_REFLECTION},
        constants::{Float, INV_PI},
    },
    geometries::vec3::Vec3,
    spectra::rgb::RGBSpectrum,
};

#[derive(Debug, Clone)]
pub struct OrenNayer {
    bxdf_type: BxDFType,
    r: RGBSpectrum,
    a: Float,
    b: Float,
}

impl OrenNayer {
    pub fn new(r: RGBSpectrum, sigma: Float) -> Self {
        let sigma = sigma.to_radians();
        let sigma_2 = sigma * sigma;
        Self {
            bxdf_type: BSDF_REFLECTION | BSDF_DIFFUSE,
            r,
            a: 1.0 - (sigma_2 / (2.0 * (sigma_2 + 0.33))),
            b: 0.45 * sigma_2 / (sigma_2 + 0.09),
        }
    }
}

impl BxDF for OrenNayer {
    fn f(&self, wo: &Vec3, wi: &Vec3) -> RGBSpectrum {
        let sin_theta_i = sin_theta(wi);
        let sin_theta_o = sin_theta(wo);

        let max_cos = if sin_theta_i > 1e-4 && sin_theta_o > 1e-4 {
            let sin_phi_i = sin_phi(wi);
            let cos_phi_i = cos_phi(wi);

            let sin_phi_o = sin_phi(wo);
            let cos_phi_o = cos_phi(wo);

            let cos_diff = cos_phi_i * cos_phi_o + sin_phi_i * sin_phi_o;

            Float::max(0.0, cos_diff)
        } else {
            0.0
        };

        let (sin_alpha, tan_beta) = if abs_cos_theta(wi) > abs_cos_theta(wo) {
            (sin_theta_o, sin_theta_i / abs_cos_theta(wi))
        } else {
            (sin_theta_i, sin_theta_o / abs_cos_theta(wo))
        };

        self.r * INV_PI * (self.a + self.b * max_cos * sin_alpha * tan_beta)
    }

    fn bxdf_type(&self) -> BxDFType {
        self.bxdf_type
    }
}
