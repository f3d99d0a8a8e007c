use std::collections::HashMap;

use crate::{
    base::{
        bsdf::BSDF,
        bxdf::{BSDF_ALL, BSDF_SPECULAR},
        camera::Camera,
        constants::{Float, PI},
        integrator::{uniform_sample_one_light, Integrator},
        interaction::Interaction,
        light::Light,
        material::TransportMode,
        sampler::Sampler,
        scene::Scene,
        spectrum::Spectrum,
    },
    geometries::{point2::Point2I, point3::Point3, ray::Ray, vec3::Vec3},
    interactions::surface::SurfaceInteraction,
    spectra::rgb::RGBSpectrum,
};

/// A camera-path endpoint carried across the photon pass: the first
/// non-specular surface a pixel's camera subpath reaches.
struct VisiblePoint {
    p: Point3,
    wo: Vec3,
    bsdf: BSDF,
    beta: RGBSpectrum,
}

struct SppmPixel {
    radius: Float,
    visible_point: Option<VisiblePoint>,
    direct: RGBSpectrum,
    phi: [Float; 3],
    /// Photons gathered so far this iteration, reset after each radius update.
    photon_count: Float,
    /// Total accepted photon weight across all prior iterations.
    accumulated_photons: Float,
    tau: RGBSpectrum,
}

impl SppmPixel {
    fn new(initial_radius: Float) -> Self {
        Self {
            radius: initial_radius,
            visible_point: None,
            direct: RGBSpectrum::default(),
            phi: [0.0; 3],
            photon_count: 0.0,
            accumulated_photons: 0.0,
            tau: RGBSpectrum::default(),
        }
    }
}

/// Stochastic progressive photon mapping: alternates a camera pass that
/// records one visible point per pixel with a photon pass that gathers
/// nearby photons into those points, shrinking each pixel's search radius
/// every iteration so the estimate converges to the unbiased answer. Handles
/// the specular caustics and tight light paths that next-event estimation
/// alone samples poorly.
pub struct SppmIntegrator {
    camera: Box<dyn Camera>,
    sampler: Box<dyn Sampler>,
    max_depth: u32,
    num_iterations: u32,
    photons_per_iteration: u32,
    initial_search_radius: Float,
}

impl SppmIntegrator {
    pub fn new(
        camera: Box<dyn Camera>,
        sampler: Box<dyn Sampler>,
        max_depth: u32,
        num_iterations: u32,
        photons_per_iteration: u32,
        initial_search_radius: Float,
    ) -> Self {
        Self {
            camera,
            sampler,
            max_depth,
            num_iterations,
            photons_per_iteration,
            initial_search_radius,
        }
    }

    /// Traces a camera subpath for `pixel`, following specular bounces
    /// through to the first diffuse-ish vertex and accumulating direct
    /// lighting at every vertex along the way.
    fn trace_camera_path(
        &self,
        pixel: &Point2I,
        scene: &Scene,
        sampler: &mut dyn Sampler,
    ) -> (RGBSpectrum, Option<VisiblePoint>) {
        let camera_sample = sampler.get_camera_sample(pixel);
        let mut ray = Ray::default();
        let weight = self
            .camera
            .generate_ray_differential(&camera_sample, &mut ray);
        if weight == 0.0 {
            return (RGBSpectrum::default(), None);
        }

        let mut beta = RGBSpectrum::new(1.0);
        let mut direct = RGBSpectrum::default();
        let mut specular_bounce = false;

        for depth in 0..self.max_depth {
            let mut si = SurfaceInteraction::default();
            if !scene.intersect(&mut ray, &mut si) {
                if depth == 0 || specular_bounce {
                    for light in scene.lights.iter() {
                        direct += beta * light.radiance(&ray);
                    }
                }
                return (direct, None);
            }

            if depth == 0 || specular_bounce {
                direct += beta * si.emitted_radiance(&-ray.direction);
            }

            si.compute_scattering_functions(&ray, TransportMode::Radiance, true);
            let bsdf = match si.bsdf.take() {
                Some(bsdf) => bsdf,
                None => {
                    ray = si.spawn_ray(&ray.direction);
                    continue;
                }
            };

            let is_diffuse = bsdf.num_components(
                BSDF_ALL & !BSDF_SPECULAR,
            ) > 0;
            let is_specular = bsdf.num_components(BSDF_SPECULAR) > 0;

            if is_diffuse || depth + 1 == self.max_depth {
                direct += beta * uniform_sample_one_light(&si, scene, sampler);
                return (
                    direct,
                    Some(VisiblePoint {
                        p: si.p,
                        wo: si.wo,
                        bsdf,
                        beta,
                    }),
                );
            }

            if !is_specular {
                return (direct, None);
            }

            let wo = -ray.direction;
            let sample = bsdf.sample(&wo, &sampler.get_2d(), sampler.get_1d(), BSDF_ALL);
            let (f, wi, pdf, _) = match sample {
                Some(sample) => sample,
                None => return (direct, None),
            };
            if f.is_black() || pdf == 0.0 {
                return (direct, None);
            }
            beta *= f * wi.abs_dot_normal(&si.shading.n) / pdf;
            specular_bounce = true;
            ray = si.spawn_ray(&wi);
        }

        (direct, None)
    }
}

/// Hashes a point into a grid cell sized to `cell_size`, matching the
/// granularity photons are gathered at.
fn grid_key(p: &Point3, cell_size: Float) -> (i64, i64, i64) {
    (
        (p.x / cell_size).floor() as i64,
        (p.y / cell_size).floor() as i64,
        (p.z / cell_size).floor() as i64,
    )
}

impl Integrator for SppmIntegrator {
    fn render(&self, scene: &Scene) {
        let film = self.camera.film();
        let sample_bounds = film.get_sample_bounds();

        let mut pixel_coords = Vec::new();
        sample_bounds.traverse(|p| pixel_coords.push(Point2I::new(p.x as i32, p.y as i32)));

        let mut pixels: Vec<SppmPixel> = pixel_coords
            .iter()
            .map(|_| SppmPixel::new(self.initial_search_radius))
            .collect();

        tracing::info!(
            iterations = self.num_iterations,
            photons = self.photons_per_iteration,
            pixels = pixels.len(),
            "starting sppm render"
        );

        let alpha = 2.0 / 3.0;

        for iteration in 0..self.num_iterations {
            // Camera pass: one visible point per pixel.
            for (i, pixel) in pixel_coords.iter().enumerate() {
                let mut sampler = self.sampler.seed(
                    (pixel.x as u64)
                        .wrapping_mul(0x9E3779B97F4A7C15)
                        .wrapping_add((pixel.y as u64).wrapping_mul(0xC2B2AE3D27D4EB4F))
                        ^ (iteration as u64).wrapping_mul(0xFF51AFD7ED558CCD),
                );
                sampler.start_pixel_sample(pixel);

                let (direct, visible_point) =
                    self.trace_camera_path(pixel, scene, sampler.as_mut());
                pixels[i].direct += direct;
                pixels[i].visible_point = visible_point;
            }

            // Build a spatial hash over this iteration's visible points.
            let cell_size = pixels
                .iter()
                .filter_map(|p| p.visible_point.is_some().then_some(p.radius))
                .fold(self.initial_search_radius, Float::max)
                * 2.0;

            let mut grid: HashMap<(i64, i64, i64), Vec<usize>> = HashMap::new();
            for (i, pixel) in pixels.iter().enumerate() {
                if pixel.visible_point.is_some() {
                    grid.entry(grid_key(&pixel.visible_point.as_ref().unwrap().p, cell_size))
                        .or_default()
                        .push(i);
                }
            }

            // Photon pass.
            let num_lights = scene.lights.len();
            if num_lights > 0 && self.photons_per_iteration > 0 {
                let mut photon_sampler = self.sampler.seed(
                    (iteration as u64).wrapping_mul(0x2545F4914F6CDD1D) ^ 0x853C49E6748FEA9B,
                );
                photon_sampler.start_pixel_sample(&Point2I::new(0, 0));

                for _ in 0..self.photons_per_iteration {
                    let light_index = ((photon_sampler.get_1d() * num_lights as Float) as usize)
                        .min(num_lights - 1);
                    let light: &dyn Light = scene.lights[light_index].as_ref();
                    let light_pmf = 1.0 / num_lights as Float;

                    let light_sample = light.sample_ray(
                        &photon_sampler.get_2d(),
                        &photon_sampler.get_2d(),
                        0.0,
                    );
                    if light_sample.position_pdf == 0.0
                        || light_sample.direction_pdf == 0.0
                        || light_sample.radiance.is_black()
                    {
                        continue;
                    }

                    let cos_theta = light_sample
                        .ray
                        .direction
                        .normalize()
                        .dot_normal(&light_sample.light_normal)
                        .abs();
                    let mut beta = light_sample.radiance * cos_theta
                        / (light_pmf * light_sample.position_pdf * light_sample.direction_pdf);
                    if beta.is_black() {
                        continue;
                    }

                    let mut ray = light_sample.ray.clone();

                    for _ in 0..self.max_depth {
                        let mut si = SurfaceInteraction::default();
                        if !scene.intersect(&mut ray, &mut si) {
                            break;
                        }
                        si.compute_scattering_functions(&ray, TransportMode::Importance, true);
                        let bsdf = match si.bsdf.take() {
                            Some(bsdf) => bsdf,
                            None => {
                                ray = si.spawn_ray(&ray.direction);
                                continue;
                            }
                        };

                        // Deposit this photon into every visible point within
                        // its cell's search radius.
                        if bsdf.num_components(BSDF_ALL & !BSDF_SPECULAR) > 0 {
                            if let Some(indices) = grid.get(&grid_key(&si.p, cell_size)) {
                                for &i in indices {
                                    let vp = pixels[i].visible_point.as_ref().unwrap();
                                    let distance_squared = (vp.p - si.p).length_squared();
                                    if distance_squared <= pixels[i].radius * pixels[i].radius {
                                        let f = vp.bsdf.f(&vp.wo, &-ray.direction, BSDF_ALL);
                                        if !f.is_black() {
                                            let contribution = vp.beta * f * beta;
                                            let mut xyz = [0.0; 3];
                                            contribution.to_xyz(&mut xyz);
                                            for c in 0..3 {
                                                pixels[i].phi[c] += xyz[c];
                                            }
                                            pixels[i].photon_count += 1.0;
                                        }
                                    }
                                }
                            }
                        }

                        let wo = -ray.direction;
                        let sample = bsdf.sample(
                            &wo,
                            &photon_sampler.get_2d(),
                            photon_sampler.get_1d(),
                            BSDF_ALL,
                        );
                        let (f, wi, pdf, _) = match sample {
                            Some(sample) => sample,
                            None => break,
                        };
                        if f.is_black() || pdf == 0.0 {
                            break;
                        }
                        let new_beta = beta * f * wi.abs_dot_normal(&si.shading.n) / pdf;

                        // Russian roulette on the photon's surviving power.
                        let continue_probability =
                            (new_beta.max_component_value() / beta.max_component_value()).min(1.0);
                        if photon_sampler.get_1d() > continue_probability {
                            break;
                        }
                        beta = new_beta / continue_probability;

                        ray = si.spawn_ray(&wi);
                    }
                }
            }

            // Update each pixel's radius and accumulated flux, then reset.
            for pixel in pixels.iter_mut() {
                if pixel.visible_point.is_none() {
                    continue;
                }
                if pixel.photon_count > 0.0 {
                    let gathered = pixel.photon_count;
                    let n_new = pixel.accumulated_photons + alpha * gathered;
                    let r_new =
                        pixel.radius * ((pixel.accumulated_photons + gathered) / n_new).sqrt();
                    let scale = (r_new * r_new) / (pixel.radius * pixel.radius);

                    let flux = RGBSpectrum::from_xyz(&pixel.phi);
                    pixel.tau = (pixel.tau + pixel.visible_point.as_ref().unwrap().beta * flux) * scale;
                    pixel.radius = r_new;
                    pixel.accumulated_photons = n_new;
                }
                pixel.phi = [0.0; 3];
                pixel.photon_count = 0.0;
            }
        }

        let total_photons = self.num_iterations as Float * self.photons_per_iteration.max(1) as Float;
        for (i, pixel) in pixel_coords.iter().enumerate() {
            let stats = &pixels[i];
            let indirect = if stats.radius > 0.0 {
                stats.tau / (total_photons * PI * stats.radius * stats.radius)
            } else {
                RGBSpectrum::default()
            };
            let radiance = stats.direct / self.num_iterations.max(1) as Float + indirect;
            let center = crate::geometries::point2::Point2F::new(pixel.x as Float + 0.5, pixel.y as Float + 0.5);
            film.add_splat(&center, radiance);
        }

        tracing::info!(filename = %film.filename, "writing image");
        film.write_image(1.0);
    }
}
