use crate::{
    base::{
        bsdf::BSDF,
        constants::Float,
        fresnel::FresnelNoOp,
        material::{Material, TransportMode},
        spectrum::Spectrum,
        texture::Texture,
    },
    bxdfs::specular::SpecularReflection,
    interactions::surface::SurfaceInteraction,
    spectra::rgb::RGBSpectrum,
};

/// Perfect mirror: a single specular reflection lobe, no Fresnel falloff.
pub struct MirrorMaterial {
    pub kr: Box<dyn Texture<RGBSpectrum>>,
}

impl Material for MirrorMaterial {
    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        _mode: TransportMode,
        _allow_multiple_lobes: bool,
    ) {
        let mut bsdf = BSDF::new(si, 1.0);

        let r = self.kr.evaluate(si).clamp(0.0, Float::INFINITY);
        if !r.is_black() {
            bsdf.add(Box::new(SpecularReflection::new(r, Box::new(FresnelNoOp))));
        }

        si.bsdf = Some(bsdf);
    }
}
