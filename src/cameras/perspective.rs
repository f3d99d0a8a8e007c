use std::sync::Arc;

use crate::{
    base::{
        camera::{Camera, CameraSample},
        constants::Float,
        film::Film,
        medium::Medium,
        sampling::concentric_sample_disk,
        transform::{AnimatedTransform, Transform},
    },
    geometries::{bounds2::Bounds2F, point3::Point3, ray::Ray, vec3::Vec3},
    utils::math::lerp,
};

pub struct PerspectiveCamera {
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

pub struct PerspectiveCameraOptions {
    pub camera_to_world: AnimatedTransform,
    pub shutter_open: Float,
    pub shutter_close: Float,
    pub lens_radius: Float,
    pub focal_distance: Float,
    pub fov: Float,
    pub near: Float,
    pub far: Float,
    pub film: Film,
    pub medium: Option<Arc<dyn Medium>>,
}

impl PerspectiveCamera {
    pub fn new(opts: PerspectiveCameraOptions) -> Self {
        let film = opts.film;
        let resolution = film.full_resolution;

        let camera_to_screen = Transform::perspective(opts.fov, opts.near, opts.far);

        let mut screen_window = Bounds2F::default();
        let frame = resolution.x / resolution.y;
        if frame > 1.0 {
            screen_window.min.x = -frame;
            screen_window.max.x = frame;
            screen_window.min.y = -1.0;
            screen_window.max.y = 1.0;
        } else {
            screen_window.min.x = -1.0;
            screen_window.max.x = 1.0;
            screen_window.min.y = -1.0 / frame;
            screen_window.max.y = 1.0 / frame;
        }

        let screen_to_raster = Transform::scale(resolution.x, resolution.y, 1.0)
            * Transform::scale(
                1.0 / (screen_window.max.x - screen_window.min.x),
                1.0 / (screen_window.min.y - screen_window.max.y),
                1.0,
            )
            * Transform::translate(&Vec3::new(-screen_window.min.x, -screen_window.max.y, 0.0));
        let raster_to_screen = screen_to_raster.inverse();
        let raster_to_camera = &camera_to_screen.inverse() * &raster_to_screen;

        let origin = Point3::default().transform(&raster_to_camera);
        let dx_camera = Point3::new(1.0, 0.0, 0.0).transform(&raster_to_camera) - origin;
        let dy_camera = Point3::new(0.0, 1.0, 0.0).transform(&raster_to_camera) - origin;

        Self {
            camera_to_world: opts.camera_to_world,
            raster_to_camera,
            shutter_open: opts.shutter_open,
            shutter_close: opts.shutter_close,
            lens_radius: opts.lens_radius,
            focal_distance: opts.focal_distance,
            dx_camera,
            dy_camera,
            film,
            medium: opts.medium,
        }
    }
}

impl Camera for PerspectiveCamera {
    fn generate_ray(&self, sample: &CameraSample, ray: &mut Ray) -> Float {
        let film_point = Point3::new(sample.film_point.x, sample.film_point.y, 0.0);
        let camera_point = Vec3::from(film_point.transform(&self.raster_to_camera));
        *ray = Ray::new(
            &Point3::default(),
            &camera_point.normalize(),
            Float::INFINITY,
            0.0,
        );

        if self.lens_radius > 0.0 {
            let lens = self.lens_radius * concentric_sample_disk(&sample.lens_point);
            let focus_point = ray.at(self.focal_distance / ray.direction.z);

            ray.origin = Point3::new(lens.x, lens.y, 0.0);
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
