use crate::{
    base::{
        bsdf::BSDF,
        constants::Float,
        fresnel::FresnelConductor,
        material::{Material, TransportMode},
        microfacet::TrowbridgeReitzDistribution,
        texture::Texture,
    },
    bxdfs::microfacet::MicrofacetReflection,
    interactions::surface::SurfaceInteraction,
    spectra::rgb::RGBSpectrum,
};

/// Conducting metal surface with a Trowbridge-Reitz microfacet lobe and
/// complex (eta, k) index of refraction.
pub struct MetalMaterial {
    pub eta: Box<dyn Texture<RGBSpectrum>>,
    pub k: Box<dyn Texture<RGBSpectrum>>,
    pub u_roughness: Box<dyn Texture<Float>>,
    pub v_roughness: Box<dyn Texture<Float>>,
    pub remap_roughness: bool,
}

impl Material for MetalMaterial {
    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        _mode: TransportMode,
        _allow_multiple_lobes: bool,
    ) {
        let mut u_roughness = self.u_roughness.evaluate(si);
        let mut v_roughness = self.v_roughness.evaluate(si);
        if self.remap_roughness {
            u_roughness = TrowbridgeReitzDistribution::roughness_to_alpha(u_roughness);
            v_roughness = TrowbridgeReitzDistribution::roughness_to_alpha(v_roughness);
        }

        let mut bsdf = BSDF::new(si, 1.0);

        let eta = self.eta.evaluate(si);
        let k = self.k.evaluate(si);
        let fresnel = Box::new(FresnelConductor::new(&RGBSpectrum::new(1.0), &eta, &k));
        let distribution = Box::new(TrowbridgeReitzDistribution::new(u_roughness, v_roughness));
        bsdf.add(Box::new(MicrofacetReflection::new(
            RGBSpectrum::new(1.0),
            distribution,
            fresnel,
        )));

        si.bsdf = Some(bsdf);
    }
}
