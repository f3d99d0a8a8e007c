use std::sync::Arc;

use crate::{
    base::{
        light::AreaLight,
        material::{Material, TransportMode},
    },
    geometries::{bounds3::Bounds3, ray::Ray},
    interactions::surface::SurfaceInteraction,
};

/// Anything that can be intersected by a ray and bound in space. Aggregates
/// (BVH, QBVH) and leaf primitives (geometric, transformed) share this
/// interface so the integrator never needs to distinguish between them.
///
/// Implementations are stored behind `Arc` throughout the renderer: the
/// scene graph is built once and then shared, read-only, across every
/// render thread.
pub trait Primitive: Send + Sync {
    fn world_bound(&self) -> Bounds3;

    fn intersect(&self, ray: &mut Ray, si: &mut SurfaceInteraction) -> bool;
    fn intersect_test(&self, ray: &Ray) -> bool;

    fn compute_scattering_functions(
        &self,
        si: &mut SurfaceInteraction,
        mode: TransportMode,
        allow_multiple_lobes: bool,
    );

    fn material(&self) -> Option<&dyn Material> {
        None
    }

    fn area_light(&self) -> Option<Arc<dyn AreaLight>> {
        None
    }
}
