use crate::{
    base::{
        bxdf::{BxDF, BxDFSample, BxDFType, BSDF_ALL, BSDF_REFLECTION, BSDF_TRANSMISSION},
        constants::{Float, MAX_BXDFS},
    },
    geometries::{normal::Normal, point2::Point2F, vec3::Vec3},
    interactions::surface::SurfaceInteraction,
    spectra::rgb::RGBSpectrum,
};

#[derive(Debug)]
pub struct BSDF {
    pub eta: Float,
    ns: Normal,
    ng: Normal,
    ss: Vec3,
    ts: Vec3,
    bxdfs: Vec<Box<dyn BxDF>>,
}

impl BSDF {
    pub fn new(si: &SurfaceInteraction, eta: Float) -> Self {
        let ns = si.shading.n;
        let ss = si.shading.dpdu.normalize();

        Self {
            eta,
            ns,
            ng: si.n,
            ss,
            ts: Vec3::from(ns).cross(&ss),
            bxdfs: Vec::with_capacity(MAX_BXDFS),
        }
    }

    pub fn add(&mut self, b: Box<dyn BxDF>) {
        self.bxdfs.push(b);
    }

    pub fn num_components(&self, flags: BxDFType) -> usize {
        self.bxdfs.iter().filter(|b| b.matches_flags(flags)).count()
    }

    pub fn world_to_local(&self, v: &Vec3) -> Vec3 {
        Vec3::new(v.dot(&self.ss), v.dot(&self.ts), v.dot(&self.ns.into()))
    }

    pub fn local_to_world(&self, v: &Vec3) -> Vec3 {
        Vec3::new(
            self.ss.x * v.x + self.ts.x * v.y + self.ns.x * v.z,
            self.ss.y * v.x + self.ts.y * v.y + self.ns.y * v.z,
            self.ss.z * v.x + self.ts.z * v.y + self.ns.z * v.z,
        )
    }

    pub fn f(&self, wo_world: &Vec3, wi_world: &Vec3, flags: BxDFType) -> RGBSpectrum {
        let wo = self.world_to_local(wo_world);
        let wi = self.world_to_local(wi_world);
        if wo.z == 0.0 {
            return RGBSpectrum::default();
        }

        let to_reflect = wi_world.dot(&self.ng.into()) * wo_world.dot(&self.ng.into()) > 0.0;
        let mut f = RGBSpectrum::default();
        for b in self.bxdfs.iter() {
            if b.matches_flags(flags)
                && ((to_reflect && b.matches_flags(BSDF_REFLECTION))
                    || (!to_reflect && b.matches_flags(BSDF_TRANSMISSION)))
            {
                f += b.f(&wo, &wi);
            }
        }

        f
    }

    pub fn pdf(&self, wo_world: &Vec3, wi_world: &Vec3, flags: BxDFType) -> Float {
        if self.bxdfs.is_empty() {
            return 0.0;
        }

        let wo = self.world_to_local(wo_world);
        let wi = self.world_to_local(wi_world);
        if wo.z == 0.0 {
            return 0.0;
        }

        let mut pdf = 0.0;
        let mut matching = 0;
        for b in self.bxdfs.iter() {
            if b.matches_flags(flags) {
                matching += 1;
                pdf += b.pdf(&wo, &wi);
            }
        }

        if matching > 0 {
            pdf / matching as Float
        } else {
            0.0
        }
    }

    pub fn sample(
        &self,
        wo_world: &Vec3,
        u: &Point2F,
        component: Float,
        flags: BxDFType,
    ) -> Option<(RGBSpectrum, Vec3, Float, BxDFType)> {
        let matching: Vec<usize> = self
            .bxdfs
            .iter()
            .enumerate()
            .filter(|(_, b)| b.matches_flags(flags))
            .map(|(i, _)| i)
            .collect();
        if matching.is_empty() {
            return None;
        }

        let pick = ((component * matching.len() as Float) as usize).min(matching.len() - 1);
        let chosen = matching[pick];
        let bxdf = &self.bxdfs[chosen];

        let wo = self.world_to_local(wo_world);
        if wo.z == 0.0 {
            return None;
        }

        let BxDFSample {
            wi,
            f: mut f,
            pdf: mut pdf,
            sampled_type,
        } = bxdf.sample(&wo, u);

        if pdf == 0.0 {
            return None;
        }

        let sampled_type = sampled_type.unwrap_or_else(|| bxdf.bxdf_type());
        let wi_world = self.local_to_world(&wi);

        if matching.len() > 1 && sampled_type & crate::base::bxdf::BSDF_SPECULAR == 0 {
            for &i in matching.iter() {
                if i != chosen {
                    pdf += self.bxdfs[i].pdf(&wo, &wi);
                }
            }
        }
        if matching.len() > 1 {
            pdf /= matching.len() as Float;
        }

        if !(sampled_type & crate::base::bxdf::BSDF_SPECULAR != 0) {
            let to_reflect = wi_world.dot(&self.ng.into()) * wo_world.dot(&self.ng.into()) > 0.0;
            f = RGBSpectrum::default();
            for b in self.bxdfs.iter() {
                if b.matches_flags(flags)
                    && ((to_reflect && b.matches_flags(BSDF_REFLECTION))
                        || (!to_reflect && b.matches_flags(BSDF_TRANSMISSION)))
                {
                    f += b.f(&wo, &wi);
                }
            }
        }

        Some((f, wi_world, pdf, sampled_type))
    }
}

impl Default for BSDF {
    fn default() -> Self {
        Self {
            eta: 1.0,
            ns: Normal::default(),
            ng: Normal::default(),
            ss: Vec3::default(),
            ts: Vec3::default(),
            bxdfs: Vec::new(),
        }
    }
}

pub const SAMPLE_ALL: BxDFType = BSDF_ALL;
