use rayon::prelude::*;

use crate::{
    base::{
        bxdf::{BSDF_ALL, BSDF_REFLECTION, BSDF_SPECULAR, BSDF_TRANSMISSION},
        camera::Camera,
        film::{Film, FilmTile},
        light::{is_delta_light, Light},
        sampler::Sampler,
        scene::Scene,
        spectrum::Spectrum,
    },
    geometries::{bounds2::Bounds2F, point2::Point2F, point2::Point2I, ray::Ray},
    interactions::surface::SurfaceInteraction,
    spectra::rgb::RGBSpectrum,
    utils::math::Float,
};

/// Pixels per side of a film tile handed to one worker thread.
const TILE_SIZE: usize = 16;

/// The minimal rendering contract. [`SamplerIntegrator`] below provides a
/// tile-parallel, independent-per-sample implementation; integrators whose
/// render loop doesn't fit that shape (SPPM's camera/photon passes, PSSMLT's
/// Markov chain over image space) implement this directly instead.
pub trait Integrator: Send + Sync {
    fn render(&self, scene: &Scene);
}

/// An integrator that estimates radiance independently for each camera
/// sample, tiling the film across worker threads. Shares the direct-lighting
/// subroutine (`estimate_direct`/`uniform_sample_one_light`) with every
/// concrete integrator below it.
pub trait SamplerIntegrator: Send + Sync {
    fn camera(&self) -> &dyn Camera;

    fn sampler(&self) -> &dyn Sampler;

    fn preprocess(&self, _scene: &Scene) {}

    fn radiance(
        &self,
        ray: &mut Ray,
        scene: &Scene,
        sampler: &mut dyn Sampler,
        depth: u32,
    ) -> RGBSpectrum;

    /// Recursively traces the mirror-reflection direction found in the BSDF.
    fn specular_reflect(
        &self,
        _ray: &Ray,
        si: &SurfaceInteraction,
        scene: &Scene,
        sampler: &mut dyn Sampler,
        depth: u32,
    ) -> RGBSpectrum {
        let bsdf = match si.bsdf.as_ref() {
            Some(bsdf) => bsdf,
            None => return RGBSpectrum::default(),
        };

        let wo = si.wo;
        let flags = BSDF_SPECULAR | BSDF_REFLECTION;
        match bsdf.sample(&wo, &sampler.get_2d(), sampler.get_1d(), flags) {
            Some((f, wi, pdf, _)) if pdf > 0.0 && !f.is_black() => {
                let cos = wi.abs_dot_normal(&si.shading.n);
                let mut spawned = si.spawn_ray(&wi);
                f * self.radiance(&mut spawned, scene, sampler, depth + 1) * cos / pdf
            }
            _ => RGBSpectrum::default(),
        }
    }

    /// Recursively traces the refraction direction found in the BSDF.
    fn specular_transmit(
        &self,
        _ray: &Ray,
        si: &SurfaceInteraction,
        scene: &Scene,
        sampler: &mut dyn Sampler,
        depth: u32,
    ) -> RGBSpectrum {
        let bsdf = match si.bsdf.as_ref() {
            Some(bsdf) => bsdf,
            None => return RGBSpectrum::default(),
        };

        let wo = si.wo;
        let flags = BSDF_SPECULAR | BSDF_TRANSMISSION;
        match bsdf.sample(&wo, &sampler.get_2d(), sampler.get_1d(), flags) {
            Some((f, wi, pdf, _)) if pdf > 0.0 && !f.is_black() => {
                let cos = wi.abs_dot_normal(&si.shading.n);
                let mut spawned = si.spawn_ray(&wi);
                f * self.radiance(&mut spawned, scene, sampler, depth + 1) * cos / pdf
            }
            _ => RGBSpectrum::default(),
        }
    }

    /// Splits the film into tiles and renders them in parallel, merging each
    /// finished tile into the shared pixel grid before writing the image.
    fn render(&self, scene: &Scene) {
        self.preprocess(scene);

        let camera = self.camera();
        let film = camera.film();
        let sample_bounds = film.get_sample_bounds();
        let diagonal = sample_bounds.diagonal();

        let num_tiles_x = ((diagonal.x / TILE_SIZE as Float).ceil() as usize).max(1);
        let num_tiles_y = ((diagonal.y / TILE_SIZE as Float).ceil() as usize).max(1);

        let mut tile_bounds = Vec::with_capacity(num_tiles_x * num_tiles_y);
        for ty in 0..num_tiles_y {
            for tx in 0..num_tiles_x {
                let min = Point2F::new(
                    sample_bounds.min.x + (tx * TILE_SIZE) as Float,
                    sample_bounds.min.y + (ty * TILE_SIZE) as Float,
                );
                let max = Point2F::new(
                    (min.x + TILE_SIZE as Float).min(sample_bounds.max.x),
                    (min.y + TILE_SIZE as Float).min(sample_bounds.max.y),
                );
                tile_bounds.push(Bounds2F::new(&min, &max));
            }
        }

        tracing::info!(
            tiles = tile_bounds.len(),
            tile_size = TILE_SIZE,
            "starting render"
        );

        let tiles: Vec<Box<FilmTile>> = tile_bounds
            .into_par_iter()
            .map(|bounds| self.render_tile(scene, film, &bounds))
            .collect();

        for tile in tiles {
            film.merge_film_tile(tile);
        }

        tracing::info!(filename = %film.filename, "writing image");
        film.write_image(1.0);
    }

    fn render_tile<'a>(&self, scene: &Scene, film: &'a Film, bounds: &Bounds2F) -> Box<FilmTile<'a>> {
        let mut sampler = self.sampler().seed(
            (bounds.min.x as u64).wrapping_mul(0x9E3779B97F4A7C15)
                ^ (bounds.min.y as u64).wrapping_mul(0xC2B2AE3D27D4EB4F),
        );
        let mut tile = film.get_film_tile(bounds);

        bounds.traverse(|pixel| {
            let pixel_i = Point2I::new(pixel.x as i32, pixel.y as i32);
            sampler.start_pixel_sample(&pixel_i);

            loop {
                let camera_sample = sampler.get_camera_sample(&pixel_i);

                let mut ray = Ray::default();
                let ray_weight = self
                    .camera()
                    .generate_ray_differential(&camera_sample, &mut ray);
                ray.scale_differentials(1.0 / (sampler.samples_per_pixel() as Float).sqrt());

                let mut radiance = if ray_weight > 0.0 {
                    self.radiance(&mut ray, scene, sampler.as_mut(), 0)
                } else {
                    RGBSpectrum::default()
                };

                if radiance.is_nan() || radiance.y() < 0.0 || radiance.y().is_infinite() {
                    tracing::warn!(
                        x = pixel.x,
                        y = pixel.y,
                        "non-finite radiance, clamping to black"
                    );
                    radiance = RGBSpectrum::default();
                }

                tile.add_sample(&camera_sample.film_point, radiance, ray_weight);

                if !sampler.start_next_sample() {
                    break;
                }
            }
        });

        tile
    }
}

impl<T: SamplerIntegrator> Integrator for T {
    fn render(&self, scene: &Scene) {
        SamplerIntegrator::render(self, scene)
    }
}

/// Picks a single light with uniform probability and returns its unbiased
/// direct-lighting contribution, scaled by the reciprocal selection
/// probability.
pub fn uniform_sample_one_light(
    si: &SurfaceInteraction,
    scene: &Scene,
    sampler: &mut dyn Sampler,
) -> RGBSpectrum {
    let num_lights = scene.lights.len();
    if num_lights == 0 {
        return RGBSpectrum::default();
    }

    let light_index = ((sampler.get_1d() * num_lights as Float) as usize).min(num_lights - 1);
    let light = scene.lights[light_index].as_ref();
    let light_pmf = 1.0 / num_lights as Float;

    estimate_direct(si, light, scene, sampler) / light_pmf
}

/// Samples every light in the scene `light_sample_counts[i]` times and
/// averages the per-light contribution, reducing variance relative to
/// [`uniform_sample_one_light`] at the cost of more shadow rays.
pub fn uniform_sample_all_lights(
    si: &SurfaceInteraction,
    scene: &Scene,
    sampler: &mut dyn Sampler,
    light_sample_counts: &[usize],
) -> RGBSpectrum {
    let mut direct = RGBSpectrum::default();

    for (i, light) in scene.lights.iter().enumerate() {
        let samples = light_sample_counts.get(i).copied().unwrap_or(1).max(1);

        let mut contribution = RGBSpectrum::default();
        for _ in 0..samples {
            contribution += estimate_direct(si, light.as_ref(), scene, sampler);
        }
        direct += contribution / samples as Float;
    }

    direct
}

/// Multiple importance sampled direct-lighting estimate for a single light:
/// samples both the light's solid angle distribution and the surface's BSDF,
/// weighting each technique with the power heuristic.
pub fn estimate_direct(
    si: &SurfaceInteraction,
    light: &dyn Light,
    scene: &Scene,
    sampler: &mut dyn Sampler,
) -> RGBSpectrum {
    let bsdf_flags = BSDF_ALL & !BSDF_SPECULAR;
    let mut direct = RGBSpectrum::default();

    let bsdf = match si.bsdf.as_ref() {
        Some(bsdf) => bsdf,
        None => return direct,
    };

    // Sample the light's distribution.
    let u_light = sampler.get_2d();
    let light_sample = light.sample_point(si, &u_light);
    if light_sample.pdf > 0.0 && !light_sample.radiance.is_black() {
        let f = bsdf.f(&si.wo, &light_sample.wi, bsdf_flags)
            * light_sample.wi.abs_dot_normal(&si.shading.n);

        if !f.is_black() {
            let unoccluded = light_sample
                .visibility
                .as_ref()
                .map(|visibility| visibility.unoccluded(scene))
                .unwrap_or(true);

            if unoccluded {
                if is_delta_light(light.flag()) {
                    direct += f * light_sample.radiance / light_sample.pdf;
                } else {
                    let scattering_pdf = bsdf.pdf(&si.wo, &light_sample.wi, bsdf_flags);
                    let weight = crate::base::sampling::power_heuristic(
                        1.0,
                        light_sample.pdf,
                        1.0,
                        scattering_pdf,
                    );
                    direct += f * light_sample.radiance * weight / light_sample.pdf;
                }
            }
        }
    }

    // Sample the BSDF's distribution, weighting against the light pdf.
    if !is_delta_light(light.flag()) {
        let u_scattering = sampler.get_2d();
        let component = sampler.get_1d();

        if let Some((f, wi, scattering_pdf, sampled_type)) =
            bsdf.sample(&si.wo, &u_scattering, component, bsdf_flags)
        {
            let f = f * wi.abs_dot_normal(&si.shading.n);
            if !f.is_black() && scattering_pdf > 0.0 {
                let light_pdf = light.point_pdf(si, &wi);
                if light_pdf > 0.0 {
                    let weight = if sampled_type & BSDF_SPECULAR != 0 {
                        1.0
                    } else {
                        crate::base::sampling::power_heuristic(1.0, scattering_pdf, 1.0, light_pdf)
                    };

                    let mut shadow_ray = si.spawn_ray(&wi);
                    let mut light_si = SurfaceInteraction::default();
                    let hit = scene.intersect(&mut shadow_ray, &mut light_si);

                    let emitted = if hit {
                        light_si.emitted_radiance(&-wi)
                    } else {
                        light.radiance(&shadow_ray)
                    };

                    if !emitted.is_black() {
                        direct += f * emitted * weight / scattering_pdf;
                    }
                }
            }
        }
    }

    direct
}
