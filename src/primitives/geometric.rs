use std::sync::Arc;

use crate::{
    base::{
        constants::Float,
        light::AreaLight,
        material::{Material, TransportMode},
        primitive::Primitive,
        shape::Shape,
    },
    geometries::{bounds3::Bounds3, ray::Ray},
    interactions::surface::SurfaceInteraction,
};

/// A single shape paired with the material and (optional) area light it
/// carries. The leaf primitive type every accelerator ultimately bottoms
/// out at.
pub struct GeometricPrimitive {
    pub shape: Arc<dyn Shape>,
    pub material: Arc<dyn Material>,
    pub area_light: Option<Arc<dyn AreaLight>>,
}

impl Primitive for GeometricPrimitive {
    fn world_bound(&self) -> Bounds3 {
        self.shape.world_bound()
    }

    fn intersect(&self, ray: &mut Ray, si: &mut SurfaceInteraction) -> bool {
        let mut t_hit: Float = 0.0;
        if !self.shape.intersect(ray, &mut t_hit, si) {
            return false;
        }
        ray.t_max = t_hit;
        true
    }

    fn intersect_test(&self, ray: &Ray) -> bool {
        self.shape.intersect_test(ray)
    }

    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        mode: TransportMode,
        allow_multiple_lobes: bool,
    ) {
        self.material
            .compute_scattering_functions(si, mode, allow_multiple_lobes);
    }

    fn material(&self) -> Option<&dyn Material> {
        Some(self.material.as_ref())
    }

    fn area_light(&self) -> Option<Arc<dyn AreaLight>> {
        self.area_light.clone()
    }
}
