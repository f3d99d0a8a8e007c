use std::sync::Arc;

use crate::{
    base::{
        camera::{Camera, CameraSample},
        film::Film,
        medium::Medium,
        transform::{AnimatedTransform, Transform},
    },
    geometries::{bounds2::Bounds2F, point3::Point3, ray::Ray, vec3::Vec3},
    utils::math::{lerp, Float},
};

pub struct OrthographicCamera {
    camera_to_world: AnimatedTransform,
    raster_to_camera: Transform,
    shutter_open: Float,
    shutter_close: Float,
    lens_radius: Float,
    focal_distance: Float,
    dx_camera: Vec3,
    dy_camera: Vec3,
    film: Film,
    medium: Option<Arc<dyn Medium>>,
}

pub struct OrthographicCameraOptions {
    pub camera_to_world: AnimatedTransform,
    pub screen_window: Bounds2F,
    pub shutter_open: Float,
    pub shutter_close: Float,
    pub lens_radius: Float,
    pub focal_distance: Float,
    pub film: Film,
    pub medium: Option<Arc<dyn Medium>>,
}

impl OrthographicCamera {
    pub fn new(opts: OrthographicCameraOptions) -> Self {
        let camera_to_screen = Transform::orthographic(0.0, 1.0);

        let screen_to_raster = Transform::scale(
            opts.film.full_resolution.x,
            opts.film.full_resolution.y,
            1.0,
        ) * Transform::scale(
            1.0 / (opts.screen_window.max.x - opts.screen_window.min.x),
            1.0 / (opts.screen_window.min.y - opts.screen_window.max.y),
            1.0,
        ) * Transform::translate(&Vec3::new(
            -opts.screen_window.min.x,
            -opts.screen_window.max.y,
            0.0,
        ));
        let raster_to_screen = screen_to_raster.inverse();
        let raster_to_camera = &camera_to_screen.inverse() * &raster_to_screen;

        let dx_camera = Vec3::new(1.0, 0.0, 0.0).transform(&raster_to_camera);
        let dy_camera = Vec3::new(0.0, 1.0, 0.0).transform(&raster_to_camera);

        Self {
            camera_to_world: opts.camera_to_world,
            raster_to_camera,
            shutter_open: opts.shutter_open,
            shutter_close: opts.shutter_close,
            lens_radius: opts.lens_radius,
            focal_distance: opts.focal_distance,
            dx_camera,
            dy_camera,
            film: opts.film,
            medium: opts.medium,
        }
    }
}

impl Camera for OrthographicCamera {
    fn generate_ray(&self, sample: &CameraSample, ray: &mut Ray) -> Float {
        let film_point = Point3::new(sample.film_point.x, sample.film_point.y, 0.0);
        let camera_point = film_point.transform(&self.raster_to_camera);
        *ray = Ray::new(
            &camera_point,
            &Vec3::new(0.0, 0.0, 1.0),
            Float::INFINITY,
            0.0,
        );

        if self.lens_radius > 0.0 {
            let lens_point = self.lens_radius * sample.lens_point.concentric_disk_sample();
            let focus_t = self.focal_distance / ray.direction.z;
            let focus_point = ray.at(focus_t);

            ray.origin = Point3::new(lens_point.x, lens_point.y, 0.0);
            ray.direction = (focus_point - ray.origin).normalize();
        }

        ray.time = lerp(sample.time, self.shutter_open, self.shutter_close);
        ray.medium = self.medium.clone();
        *ray = self.camera_to_world.transform_ray(ray);

        1.0
    }

    fn film(&self) -> &Film {
        &self.film
    }

    fn medium(&self) -> Option<Arc<dyn Medium>> {
        self.medium.clone()
    }
}
