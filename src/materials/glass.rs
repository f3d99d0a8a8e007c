use crate::{
    base::{
        bsdf::BSDF,
        constants::Float,
        fresnel::FresnelDielectric,
        material::{Material, TransportMode},
        microfacet::TrowbridgeReitzDistribution,
        spectrum::Spectrum,
        texture::Texture,
    },
    bxdfs::{
        fresnel::FresnelSpecular,
        microfacet::{MicrofacetReflection, MicrofacetTransmission},
    },
    interactions::surface::SurfaceInteraction,
    spectra::rgb::RGBSpectrum,
};

/// Dielectric glass: smooth surfaces pick a single `FresnelSpecular` lobe that
/// stochastically reflects or transmits; rough surfaces split into separate
/// microfacet reflection and transmission lobes.
pub struct GlassMaterial {
    pub kr: Box<dyn Texture<RGBSpectrum>>,
    pub kt: Box<dyn Texture<RGBSpectrum>>,
    pub u_roughness: Box<dyn Texture<Float>>,
    pub v_roughness: Box<dyn Texture<Float>>,
    pub eta: Box<dyn Texture<Float>>,
    pub remap_roughness: bool,
}

impl Material for GlassMaterial {
    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        mode: TransportMode,
        _allow_multiple_lobes: bool,
    ) {
        let eta = self.eta.evaluate(si);
        let mut u_roughness = self.u_roughness.evaluate(si);
        let mut v_roughness = self.v_roughness.evaluate(si);
        if self.remap_roughness {
            u_roughness = TrowbridgeReitzDistribution::roughness_to_alpha(u_roughness);
            v_roughness = TrowbridgeReitzDistribution::roughness_to_alpha(v_roughness);
        }

        let mut bsdf = BSDF::new(si, eta);

        let r = self.kr.evaluate(si).clamp(0.0, Float::INFINITY);
        let t = self.kt.evaluate(si).clamp(0.0, Float::INFINITY);
        if r.is_black() && t.is_black() {
            si.bsdf = Some(bsdf);
            return;
        }

        let is_specular = u_roughness == 0.0 && v_roughness == 0.0;
        if is_specular {
            bsdf.add(Box::new(FresnelSpecular::new(r, t, 1.0, eta, mode)));
        } else {
            if !r.is_black() {
                let distribution =
                    Box::new(TrowbridgeReitzDistribution::new(u_roughness, v_roughness));
                let fresnel = Box::new(FresnelDielectric::new(1.0, eta));
                bsdf.add(Box::new(MicrofacetReflection::new(r, distribution, fresnel)));
            }
            if !t.is_black() {
                let distribution =
                    Box::new(TrowbridgeReitzDistribution::new(u_roughness, v_roughness));
                bsdf.add(Box::new(MicrofacetTransmission::new(
                    t,
                    distribution,
                    1.0,
                    eta,
                    mode,
                )));
            }
        }

        si.bsdf = Some(bsdf);
    }
}
