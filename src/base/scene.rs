use std::sync::Arc;

use crate::{
    base::{light::Light, primitive::Primitive},
    geometries::{bounds3::Bounds3, ray::Ray},
    interactions::surface::SurfaceInteraction,
};

/// The world the integrator renders: an intersectable aggregate plus the
/// lights illuminating it. Built once per render and shared read-only
/// across every worker thread.
pub struct Scene {
    pub lights: Vec<Arc<dyn Light>>,
    pub infinite_lights: Vec<usize>,
    aggregate: Arc<dyn Primitive>,
    bounds: Bounds3,
}

impl Scene {
    pub fn new(aggregate: Arc<dyn Primitive>, lights: Vec<Arc<dyn Light>>) -> Self {
        let bounds = aggregate.world_bound();

        let mut scene = Self {
            bounds,
            lights: vec![],
            infinite_lights: vec![],
            aggregate,
        };

        for light in lights.iter() {
            light.preprocess(&scene);
        }

        scene.infinite_lights = lights
            .iter()
            .enumerate()
            .filter(|(_, light)| light.is_infinite())
            .map(|(i, _)| i)
            .collect();
        scene.lights = lights;

        scene
    }

    pub fn world_bound(&self) -> Bounds3 {
        self.bounds
    }

    pub fn intersect(&self, ray: &mut Ray, si: &mut SurfaceInteraction) -> bool {
        self.aggregate.intersect(ray, si)
    }

    pub fn intersect_test(&self, ray: &Ray) -> bool {
        self.aggregate.intersect_test(ray)
    }
}
