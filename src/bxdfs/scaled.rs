use crate::{
    base::{
        bxdf::{BxDF, BxDFSample, BxDFType},
        constants::Float,
    },
    geometries::{point2::Point2F, vec3::Vec3},
    spectra::rgb::RGBSpectrum,
};

pub struct ScaledBxDF {
    bxdf_type: BxDFType,
    bxdf: Box<dyn BxDF>,
    scale: RGBSpectrum,
}

impl ScaledBxDF {
    pub fn new(bxdf: Box<dyn BxDF>, scale: RGBSpectrum) -> Self {
        Self {
            bxdf_type: bxdf.bxdf_type(),
            bxdf,
            scale,
        }
    }
}

impl BxDF for ScaledBxDF {
    fn f(&self, wo: &Vec3, wi: &Vec3) -> RGBSpectrum {
        self.scale * self.bxdf.f(wo, wi)
    }

    fn sample(&self, wo: &Vec3, u: &Point2F) -> BxDFSample {
        let sample = self.bxdf.sample(wo, u);
        BxDFSample {
            f: self.scale * sample.f,
            ..sample
        }
    }

    fn pdf(&self, wo: &Vec3, wi: &Vec3) -> Float {
        self.bxdf.pdf(wo, wi)
    }

    fn bxdf_type(&self) -> BxDFType {
        self.bxdf_type
    }
}
