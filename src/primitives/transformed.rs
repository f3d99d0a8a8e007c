use std::sync::Arc;

use crate::{
    base::{
        light::AreaLight,
        material::{Material, TransportMode},
        primitive::Primitive,
        transform::{AnimatedTransform, Transform},
    },
    geometries::{bounds3::Bounds3, ray::Ray},
    interactions::surface::SurfaceInteraction,
};

/// Wraps a primitive with its own animated world transform, so a single
/// shape instance can be placed (and moved, for motion blur) independently
/// of the coordinate system it was built in.
pub struct TransformedPrimitive {
    pub primitive: Arc<dyn Primitive>,
    pub primitive_to_world: AnimatedTransform,
}

impl Primitive for TransformedPrimitive {
    fn world_bound(&self) -> Bounds3 {
        self.primitive_to_world
            .motion_bounds(&self.primitive.world_bound())
    }

    fn intersect(&self, ray: &mut Ray, si: &mut SurfaceInteraction) -> bool {
        let mut interpolated_primitive_to_world = Transform::default();
        self.primitive_to_world
            .interpolate(ray.time, &mut interpolated_primitive_to_world);

        let mut local_ray = ray.transform(&interpolated_primitive_to_world.inverse());
        if !self.primitive.intersect(&mut local_ray, si) {
            return false;
        }
        ray.t_max = local_ray.t_max;

        if !interpolated_primitive_to_world.is_identity() {
            si.transform(&interpolated_primitive_to_world);
        }
        si.primitive = Some(self.primitive.clone());

        true
    }

    fn intersect_test(&self, ray: &Ray) -> bool {
        let mut interpolated_primitive_to_world = Transform::default();
        self.primitive_to_world
            .interpolate(ray.time, &mut interpolated_primitive_to_world);

        let interpolated_world_to_primitive = interpolated_primitive_to_world.inverse();
        self.primitive
            .intersect_test(&ray.transform(&interpolated_world_to_primitive))
    }

    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        mode: TransportMode,
        allow_multiple_lobes: bool,
    ) {
        self.primitive
            .compute_scattering_functions(si, mode, allow_multiple_lobes)
    }

    fn material(&self) -> Option<&dyn Material> {
        self.primitive.material()
    }

    fn area_light(&self) -> Option<Arc<dyn AreaLight>> {
        self.primitive.area_light()
    }
}
