use std::sync::Arc;

use crate::{
    base::{
        bsdf::BSDF,
        bssrdf::SeparableBSSRDF,
        constants::Float,
        interaction::Interaction,
        material::TransportMode,
        primitive::Primitive,
        transform::Transform,
    },
    geometries::{normal::Normal, point2::Point2F, point3::Point3, ray::Ray, vec3::Vec3},
    spectra::rgb::RGBSpectrum,
};

pub struct Shading {
    pub n: Normal,
    pub dpdu: Vec3,
    pub dpdv: Vec3,
    pub dndu: Normal,
    pub dndv: Normal,
}

pub struct SurfaceInteraction {
    pub p: Point3,
    pub p_error: Vec3,
    pub time: Float,
    pub wo: Vec3,
    pub n: Normal,
    pub uv: Point2F,
    pub dpdu: Vec3,
    pub dpdv: Vec3,
    pub dndu: Normal,
    pub dndv: Normal,
    pub shading: Shading,
    pub bsdf: Option<BSDF>,
    pub bssrdf: Option<SeparableBSSRDF>,
    pub primitive: Option<Arc<dyn Primitive>>,
    pub dpdx: Vec3,
    pub dpdy: Vec3,
    pub dudx: Float,
    pub dvdx: Float,
    pub dudy: Float,
    pub dvdy: Float,
}

impl SurfaceInteraction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        p: Point3,
        p_error: Vec3,
        uv: Point2F,
        wo: Vec3,
        dpdu: Vec3,
        dpdv: Vec3,
        dndu: Normal,
        dndv: Normal,
        time: Float,
        reverse_orientation: bool,
        transform_swaps_handedness: bool,
    ) -> Self {
        let mut n = Normal::from(dpdu.cross(&dpdv).normalize());
        if reverse_orientation ^ transform_swaps_handedness {
            n *= -1.0;
        }

        Self {
            p,
            p_error,
            time,
            wo: wo.normalize(),
            n,
            uv,
            dpdu,
            dpdv,
            dndu,
            dndv,
            shading: Shading {
                n,
                dpdu,
                dpdv,
                dndu,
                dndv,
            },
            bsdf: None,
            bssrdf: None,
            primitive: None,
            dpdx: Vec3::default(),
            dpdy: Vec3::default(),
            dudx: 0.0,
            dvdx: 0.0,
            dudy: 0.0,
            dvdy: 0.0,
        }
    }

    pub fn set_shading_geometry(
        &mut self,
        dpdus: &Vec3,
        dpdvs: &Vec3,
        dndus: &Normal,
        dndvs: &Normal,
        orientation_is_authoritative: bool,
    ) {
        self.shading.n = Normal::from(dpdus.cross(dpdvs).normalize());
        if orientation_is_authoritative {
            self.n = self.n.face_forward(&self.shading.n);
        } else {
            self.shading.n = self.shading.n.face_forward(&self.n);
        }

        self.shading.dpdu = *dpdus;
        self.shading.dpdv = *dpdvs;
        self.shading.dndu = *dndus;
        self.shading.dndv = *dndvs;
    }

    pub fn compute_scattering_functions(
        &mut self,
        ray: &Ray,
        mode: TransportMode,
        allow_multiple_lobes: bool,
    ) {
        self.compute_differentials(ray);
        let primitive = self
            .primitive
            .clone()
            .expect("surface interaction has no primitive to shade");
        primitive.compute_scattering_functions(self, mode, allow_multiple_lobes);
    }

    pub fn compute_differentials(&mut self, ray: &Ray) {
        self.dudx = 0.0;
        self.dvdx = 0.0;
        self.dudy = 0.0;
        self.dvdy = 0.0;
        self.dpdx = Vec3::default();
        self.dpdy = Vec3::default();
    }

    pub fn emitted_radiance(&self, direction: &Vec3) -> RGBSpectrum {
        if let Some(primitive) = &self.primitive {
            if let Some(area_light) = primitive.area_light() {
                return area_light.emission(self, direction);
            }
        }
        RGBSpectrum::default()
    }

    pub fn transform(&mut self, t: &Transform) {
        let mut abs_error = Vec3::default();
        self.p = self.p.transform_with_point_error(t, &self.p_error, &mut abs_error);
        self.p_error = abs_error;

        self.wo = self.wo.transform(t);
        self.n = self.n.transform(t).normalize();

        self.dpdu = self.dpdu.transform(t);
        self.dpdv = self.dpdv.transform(t);
        self.dndu = self.dndu.transform(t);
        self.dndv = self.dndv.transform(t);

        self.shading = Shading {
            n: self.shading.n.transform(t).normalize().face_forward(&self.n),
            dpdu: self.shading.dpdu.transform(t),
            dpdv: self.shading.dpdv.transform(t),
            dndu: self.shading.dndu.transform(t),
            dndv: self.shading.dndv.transform(t),
        };

        self.dpdx = self.dpdx.transform(t);
        self.dpdy = self.dpdy.transform(t);
    }
}

impl Interaction for SurfaceInteraction {
    fn p(&self) -> Point3 {
        self.p
    }

    fn p_error(&self) -> Vec3 {
        self.p_error
    }

    fn time(&self) -> Float {
        self.time
    }

    fn wo(&self) -> Vec3 {
        self.wo
    }

    fn n(&self) -> Normal {
        self.n
    }
}

impl Default for SurfaceInteraction {
    fn default() -> Self {
        Self {
            p: Point3::default(),
            p_error: Vec3::default(),
            time: 0.0,
            wo: Vec3::default(),
            n: Normal::default(),
            uv: Point2F::default(),
            dpdu: Vec3::default(),
            dpdv: Vec3::default(),
            dndu: Normal::default(),
            dndv: Normal::default(),
            shading: Shading {
                n: Normal::default(),
                dpdu: Vec3::default(),
                dpdv: Vec3::default(),
                dndu: Normal::default(),
                dndv: Normal::default(),
            },
            bsdf: None,
            bssrdf: None,
            primitive: None,
            dpdx: Vec3::default(),
            dpdy: Vec3::default(),
            dudx: 0.0,
            dvdx: 0.0,
            dudy: 0.0,
            dvdy: 0.0,
        }
    }
}
