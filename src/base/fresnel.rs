use crate::{
    base::{
        bxdf::{fresnel_conductor, fresnel_dielectric},
        constants::Float,
    },
    spectra::rgb::RGBSpectrum,
};

pub trait Fresnel: Send + Sync {
    fn evaluate(&self, cos_theta_i: Float) -> RGBSpectrum;
}

pub struct FresnelConductor {
    eta_i: RGBSpectrum,
    eta_t: RGBSpectrum,
    k: RGBSpectrum,
}

pub struct FresnelDielectric {
    eta_i: Float,
    eta_t: Float,
}

pub struct FresnelNoOp;

impl FresnelConductor {
    pub fn new(eta_i: &RGBSpectrum, eta_t: &RGBSpectrum, k: &RGBSpectrum) -> Self {
        Self {
            eta_i: *eta_i,
            eta_t: *eta_t,
            k: *k,
        }
    }
}

impl FresnelDielectric {
    pub fn new(eta_i: Float, eta_t: Float) -> Self {
        Self { eta_i, eta_t }
    }
}

impl Fresnel for FresnelConductor {
    fn evaluate(&self, cos_theta_i: Float) -> RGBSpectrum {
        fresnel_conductor(cos_theta_i.abs(), &self.eta_i, &self.eta_t, &self.k)
    }
}

impl Fresnel for FresnelDielectric {
    fn evaluate(&self, cos_theta_i: Float) -> RGBSpectrum {
        RGBSpectrum::new(fresnel_dielectric(cos_theta_i, self.eta_i, self.eta_t))
    }
}

impl Fresnel for FresnelNoOp {
    fn evaluate(&self, _cos_theta_i: Float) -> RGBSpectrum {
        RGBSpectrum::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::spectrum::Spectrum;

    #[test]
    fn dielectric_reflectance_is_bounded() {
        let fresnel = FresnelDielectric::new(1.0, 1.5);
        for i in 0..=10 {
            let cos_theta = i as Float / 10.0;
            let r = fresnel.evaluate(cos_theta).max_component_value();
            assert!((0.0..=1.0).contains(&r), "reflectance {r} out of bounds at cos_theta={cos_theta}");
        }
    }

    #[test]
    fn dielectric_normal_incidence_matches_schlick_r0() {
        let eta_i = 1.0;
        let eta_t = 1.5;
        let fresnel = FresnelDielectric::new(eta_i, eta_t);
        let r = fresnel.evaluate(1.0).max_component_value();
        let r0 = ((eta_t - eta_i) / (eta_t + eta_i)).powi(2);
        assert!((r - r0).abs() < 1e-4, "r={r} r0={r0}");
    }

    #[test]
    fn dielectric_is_symmetric_under_eta_swap_and_flipped_incidence() {
        let entering = FresnelDielectric::new(1.0, 1.5);
        let exiting = FresnelDielectric::new(1.5, 1.0);
        let cos_theta = 0.6;

        let r_entering = entering.evaluate(cos_theta).max_component_value();
        let r_exiting = exiting.evaluate(-cos_theta).max_component_value();

        assert!((r_entering - r_exiting).abs() < 1e-6);
    }

    #[test]
    fn total_internal_reflection_saturates_to_one() {
        // Light inside glass (eta=1.5) hitting air (eta=1.0) beyond the
        // critical angle must reflect entirely.
        let fresnel = FresnelDielectric::new(1.5, 1.0);
        let critical_cos = (1.0 - (1.0 / 1.5f64 as Float).powi(2)).sqrt();
        let r = fresnel.evaluate(critical_cos * 0.5).max_component_value();
        assert!((r - 1.0).abs() < 1e-6, "expected total internal reflection, got {r}");
    }
}
