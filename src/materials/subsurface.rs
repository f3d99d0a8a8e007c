use crate::{
    base::{
        bsdf::BSDF,
        bssrdf::SeparableBSSRDF,
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

/// Translucent dielectric: a boundary BSDF (specular or microfacet,
/// depending on roughness) plus a separable BSSRDF that carries light
/// between entry and exit points on the surface.
pub struct SubsurfaceMaterial {
    pub sigma_a: Box<dyn Texture<RGBSpectrum>>,
    pub sigma_s: Box<dyn Texture<RGBSpectrum>>,
    pub eta: Float,
    pub g: Float,
    pub u_roughness: Box<dyn Texture<Float>>,
    pub v_roughness: Box<dyn Texture<Float>>,
    pub remap_roughness: bool,
}

impl Material for SubsurfaceMaterial {
    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        mode: TransportMode,
        _allow_multiple_lobes: bool,
    ) {
        let mut u_roughness = self.u_roughness.evaluate(si);
        let mut v_roughness = self.v_roughness.evaluate(si);
        if self.remap_roughness {
            u_roughness = TrowbridgeReitzDistribution::roughness_to_alpha(u_roughness);
            v_roughness = TrowbridgeReitzDistribution::roughness_to_alpha(v_roughness);
        }

        let mut bsdf = BSDF::new(si, self.eta);
        let is_specular = u_roughness == 0.0 && v_roughness == 0.0;
        if is_specular {
            bsdf.add(Box::new(FresnelSpecular::new(
                RGBSpectrum::new(1.0),
                RGBSpectrum::new(1.0),
                1.0,
                self.eta,
                mode,
            )));
        } else {
            let distribution = Box::new(TrowbridgeReitzDistribution::new(u_roughness, v_roughness));
            let fresnel = Box::new(FresnelDielectric::new(1.0, self.eta));
            bsdf.add(Box::new(MicrofacetReflection::new(
                RGBSpectrum::new(1.0),
                distribution,
                fresnel,
            )));

            let distribution = Box::new(TrowbridgeReitzDistribution::new(u_roughness, v_roughness));
            bsdf.add(Box::new(MicrofacetTransmission::new(
                RGBSpectrum::new(1.0),
                distribution,
                1.0,
                self.eta,
                mode,
            )));
        }
        si.bsdf = Some(bsdf);

        let sigma_a = self.sigma_a.evaluate(si).clamp(0.0, Float::INFINITY);
        let sigma_s = self.sigma_s.evaluate(si).clamp(0.0, Float::INFINITY);
        let bssrdf = SeparableBSSRDF::new(si, sigma_a, sigma_s, self.g, self.eta);
        si.bssrdf = Some(bssrdf);
    }
}
