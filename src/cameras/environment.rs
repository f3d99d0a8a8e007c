use std::sync::Arc;

use crate::{
    base::{
        camera::{Camera, CameraSample},
        film::Film,
        medium::Medium,
        transform::AnimatedTransform,
    },
    geometries::{point3::Point3, ray::Ray, vec3::Vec3},
    utils::math::{lerp, Float, PI},
};

pub struct EnvironmentCamera {
    camera_to_world: AnimatedTransform,
    shutter_open: Float,
    shutter_close: Float,
    film: Film,
    medium: Option<Arc<dyn Medium>>,
}

pub struct EnvironmentCameraOptions {
    pub camera_to_world: AnimatedTransform,
    pub shutter_open: Float,
    pub shutter_close: Float,
    pub film: Film,
    pub medium: Option<Arc<dyn Medium>>,
}

impl EnvironmentCamera {
    pub fn new(opts: EnvironmentCameraOptions) -> Self {
        Self {
            camera_to_world: opts.camera_to_world,
            shutter_open: opts.shutter_open,
            shutter_close: opts.shutter_close,
            film: opts.film,
            medium: opts.medium,
        }
    }
}

impl Camera for EnvironmentCamera {
    fn generate_ray(&self, sample: &CameraSample, ray: &mut Ray) -> Float {
        let theta = PI * sample.film_point.y / self.film.full_resolution.y;
        let phi = 2.0 * PI * sample.film_point.x / self.film.full_resolution.x;

        let direction = Vec3::new(
            theta.sin() * phi.cos(),
            theta.cos(),
            theta.sin() * phi.sin(),
        );

        let mut local = Ray::new(
            &Point3::default(),
            &direction,
            Float::INFINITY,
            lerp(sample.time, self.shutter_open, self.shutter_close),
        );
        local.medium = self.medium.clone();
        *ray = self.camera_to_world.transform_ray(&local);

        1.0
    }

    fn film(&self) -> &Film {
        &self.film
    }

    fn medium(&self) -> Option<Arc<dyn Medium>> {
        self.medium.clone()
    }
}
