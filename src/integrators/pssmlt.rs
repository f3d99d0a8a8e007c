use crate::{
    base::{
        bxdf::{BSDF_ALL, BSDF_SPECULAR},
        camera::{Camera, CameraSample},
        constants::Float,
        integrator::{uniform_sample_one_light, Integrator},
        interaction::Interaction,
        material::TransportMode,
        rng::RNG,
        sampler::Sampler,
        scene::Scene,
        spectrum::Spectrum,
    },
    geometries::{point2::Point2F, ray::Ray},
    interactions::surface::SurfaceInteraction,
    spectra::rgb::RGBSpectrum,
};

/// One coordinate of a Metropolis sample in primary sample space: a value in
/// `[0, 1)` plus enough history to roll back a rejected mutation.
#[derive(Clone, Copy)]
struct PrimarySample {
    value: Float,
    last_modification_iteration: i64,
    value_backup: Float,
    modification_backup: i64,
}

impl Default for PrimarySample {
    fn default() -> Self {
        Self {
            value: 0.0,
            last_modification_iteration: 0,
            value_backup: 0.0,
            modification_backup: 0,
        }
    }
}

/// A Kelemen-style primary sample space Metropolis sampler: every `get_1d`/
/// `get_2d` call draws the next coordinate of an infinite-dimensional sample
/// vector, lazily mutated up to the current iteration the first time it is
/// read. Implements [`Sampler`] so integrator `radiance` code is unaware it
/// is being driven by a Markov chain instead of an independent sampler.
struct MltSampler {
    rng: RNG,
    sigma: Float,
    large_step_probability: Float,
    samples: Vec<PrimarySample>,
    current_iteration: i64,
    large_step: bool,
    last_large_step_iteration: i64,
    sample_index: usize,
}

impl MltSampler {
    fn new(seed: u64, sigma: Float, large_step_probability: Float) -> Self {
        let mut rng = RNG::new();
        rng.seed(seed);
        Self {
            rng,
            sigma,
            large_step_probability,
            samples: Vec::new(),
            current_iteration: 0,
            large_step: true,
            last_large_step_iteration: 0,
            sample_index: 0,
        }
    }

    fn start_iteration(&mut self) {
        self.current_iteration += 1;
        self.large_step = self.rng.uniform_continuous() < self.large_step_probability;
        self.sample_index = 0;
    }

    fn accept(&mut self) {
        if self.large_step {
            self.last_large_step_iteration = self.current_iteration;
        }
    }

    fn reject(&mut self) {
        for sample in self.samples.iter_mut() {
            if sample.last_modification_iteration == self.current_iteration {
                sample.value = sample.value_backup;
                sample.last_modification_iteration = sample.modification_backup;
            }
        }
        self.current_iteration -= 1;
    }

    fn ensure_ready(&mut self, index: usize) {
        while self.samples.len() <= index {
            self.samples.push(PrimarySample::default());
        }

        let sample = &mut self.samples[index];
        if sample.last_modification_iteration < self.last_large_step_iteration {
            sample.value = self.rng.uniform_continuous();
            sample.last_modification_iteration = self.last_large_step_iteration;
        }

        sample.value_backup = sample.value;
        sample.modification_backup = sample.last_modification_iteration;

        if self.large_step {
            sample.value = self.rng.uniform_continuous();
        } else {
            let iterations_since = self.current_iteration - sample.last_modification_iteration;
            let normal_sample =
                std::f64::consts::SQRT_2 as Float * erf_inv(2.0 * self.rng.uniform_continuous() - 1.0);
            let effective_sigma = self.sigma * (iterations_since as Float).sqrt();
            sample.value += normal_sample * effective_sigma;
            sample.value -= sample.value.floor();
        }

        sample.last_modification_iteration = self.current_iteration;
    }

    fn next_1d(&mut self) -> Float {
        let index = self.sample_index;
        self.sample_index += 1;
        self.ensure_ready(index);
        self.samples[index].value
    }

    fn next_2d(&mut self) -> Point2F {
        Point2F::new(self.next_1d(), self.next_1d())
    }
}

/// Approximates the inverse error function with a rational fit, sufficient
/// for drawing normally distributed step sizes.
fn erf_inv(x: Float) -> Float {
    let w = -((1.0 - x) * (1.0 + x)).ln();
    if w < 5.0 {
        let w = w - 2.5;
        let mut p = 2.810_226_36e-08;
        p = 3.432_739_44e-07 + p * w;
        p = -3.523_387_7e-06 + p * w;
        p = -4.391_506_54e-06 + p * w;
        p = 0.000_218_580_87 + p * w;
        p = -0.001_253_725_03 + p * w;
        p = -0.004_177_681_640 + p * w;
        p = 0.246_640_727 + p * w;
        p = 1.501_409_41 + p * w;
        p * x
    } else {
        let w = w.sqrt() - 3.0;
        let mut p = -0.000_200_214_257;
        p = 0.000_100_950_558 + p * w;
        p = 0.001_349_343_22 + p * w;
        p = -0.003_673_428_44 + p * w;
        p = 0.005_739_507_73 + p * w;
        p = -0.007_622_461_3 + p * w;
        p = 0.009_438_870_47 + p * w;
        p = 1.001_674_06 + p * w;
        p = 2.832_976_82 + p * w;
        p * x
    }
}

impl Sampler for MltSampler {
    fn seed(&self, seed: u64) -> Box<dyn Sampler> {
        Box::new(MltSampler::new(seed, self.sigma, self.large_step_probability))
    }

    fn start_pixel_sample(&mut self, _p: &crate::geometries::point2::Point2I) {
        self.sample_index = 0;
    }

    fn get_1d(&mut self) -> Float {
        self.next_1d()
    }

    fn get_2d(&mut self) -> Point2F {
        self.next_2d()
    }

    fn start_next_sample(&mut self) -> bool {
        false
    }

    fn current_sample_index(&self) -> usize {
        self.current_iteration.max(0) as usize
    }

    fn samples_per_pixel(&self) -> usize {
        1
    }
}

/// Path-traces a single radiance estimate and the film-space location it
/// belongs to, consuming the first two sampler dimensions as the pixel
/// coordinate. Shares next-event estimation with the ordinary path tracer.
fn radiance_sample(
    camera: &dyn Camera,
    scene: &Scene,
    sampler: &mut MltSampler,
    max_depth: u32,
) -> (Point2F, RGBSpectrum) {
    let film = camera.film();
    let bounds = film.get_sample_bounds();
    let diagonal = bounds.diagonal();

    let raster = Point2F::new(
        bounds.min.x + sampler.next_1d() * diagonal.x,
        bounds.min.y + sampler.next_1d() * diagonal.y,
    );

    let camera_sample = CameraSample {
        film_point: raster,
        lens_point: sampler.next_2d(),
        time: sampler.next_1d(),
    };

    let mut ray = Ray::default();
    let weight = camera.generate_ray(&camera_sample, &mut ray);
    if weight == 0.0 {
        return (raster, RGBSpectrum::default());
    }

    let mut output = RGBSpectrum::default();
    let mut beta = RGBSpectrum::new(1.0);
    let mut specular_bounce = false;

    for bounces in 0..max_depth {
        let mut si = SurfaceInteraction::default();
        let hit = scene.intersect(&mut ray, &mut si);

        if bounces == 0 || specular_bounce {
            if hit {
                output += beta * si.emitted_radiance(&-ray.direction);
            } else {
                for light in scene.lights.iter() {
                    output += beta * light.radiance(&ray);
                }
            }
        }

        if !hit {
            break;
        }

        si.compute_scattering_functions(&ray, TransportMode::Radiance, true);
        let bsdf = match si.bsdf.as_ref() {
            Some(bsdf) => bsdf,
            None => {
                ray = si.spawn_ray(&ray.direction);
                continue;
            }
        };

        if bsdf.num_components(BSDF_ALL & !BSDF_SPECULAR) > 0 {
            output += beta * uniform_sample_one_light(&si, scene, sampler);
        }

        let wo = -ray.direction;
        let sample = bsdf.sample(&wo, &sampler.next_2d(), sampler.next_1d(), BSDF_ALL);
        let (f, wi, pdf, sampled_type) = match sample {
            Some(sample) => sample,
            None => break,
        };
        if f.is_black() || pdf == 0.0 {
            break;
        }
        beta *= f * wi.abs_dot_normal(&si.shading.n) / pdf;
        specular_bounce = (sampled_type & BSDF_SPECULAR) != 0;
        ray = si.spawn_ray(&wi);

        if beta.max_component_value() < 0.25 && bounces > 3 {
            let q = (1.0 - beta.max_component_value()).max(0.5);
            if sampler.next_1d() < q {
                break;
            }
            beta /= 1.0 - q;
        }
    }

    (raster, output)
}

/// Primary sample space Metropolis light transport: runs independent Markov
/// chains of path mutations, accepting or rejecting each proposal with
/// probability proportional to how much brighter the new path is than the
/// old one, and splats every accepted/rejected pair onto the film so the
/// stationary distribution of the chain matches scene radiance.
pub struct PssmltIntegrator {
    camera: Box<dyn Camera>,
    max_depth: u32,
    num_bootstrap: usize,
    num_chains: usize,
    mutations_per_pixel: usize,
    sigma: Float,
    large_step_probability: Float,
}

impl PssmltIntegrator {
    pub fn new(
        camera: Box<dyn Camera>,
        max_depth: u32,
        num_bootstrap: usize,
        num_chains: usize,
        mutations_per_pixel: usize,
        sigma: Float,
        large_step_probability: Float,
    ) -> Self {
        Self {
            camera,
            max_depth,
            num_bootstrap,
            num_chains,
            mutations_per_pixel,
            sigma,
            large_step_probability,
        }
    }
}

impl Integrator for PssmltIntegrator {
    fn render(&self, scene: &Scene) {
        let film = self.camera.film();
        let bounds = film.get_sample_bounds();
        let num_pixels = (bounds.diagonal().x * bounds.diagonal().y).max(1.0) as usize;

        // Bootstrap: estimate the normalization constant b (average image
        // luminance) by sampling many independent seeds and recording each
        // one's scalar contribution function value.
        let mut bootstrap_weights = Vec::with_capacity(self.num_bootstrap);
        for seed in 0..self.num_bootstrap {
            let mut sampler = MltSampler::new(seed as u64, self.sigma, self.large_step_probability);
            sampler.start_iteration();
            let (_, radiance) = radiance_sample(
                self.camera.as_ref(),
                scene,
                &mut sampler,
                self.max_depth,
            );
            bootstrap_weights.push(radiance.y().max(0.0));
        }
        let b: Float = if bootstrap_weights.is_empty() {
            0.0
        } else {
            bootstrap_weights.iter().sum::<Float>() / bootstrap_weights.len() as Float
        };

        tracing::info!(
            chains = self.num_chains,
            bootstrap = self.num_bootstrap,
            b,
            "starting pssmlt render"
        );

        if b == 0.0 {
            tracing::warn!("bootstrap luminance is zero, skipping chain mutations");
            film.write_image(1.0 / num_pixels.max(1) as Float);
            return;
        }

        let total_mutations = self.mutations_per_pixel * num_pixels;
        let mutations_per_chain = (total_mutations / self.num_chains.max(1)).max(1);

        for chain in 0..self.num_chains {
            let seed = bootstrap_weights
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
                .map(|(i, _)| i)
                .unwrap_or(0) as u64
                + chain as u64;

            let mut sampler = MltSampler::new(seed, self.sigma, self.large_step_probability);
            sampler.start_iteration();
            let (mut current_raster, mut current_radiance) = radiance_sample(
                self.camera.as_ref(),
                scene,
                &mut sampler,
                self.max_depth,
            );

            for _ in 0..mutations_per_chain {
                sampler.start_iteration();
                let (proposed_raster, proposed_radiance) = radiance_sample(
                    self.camera.as_ref(),
                    scene,
                    &mut sampler,
                    self.max_depth,
                );

                let current_luminance = current_radiance.y().max(0.0);
                let proposed_luminance = proposed_radiance.y().max(0.0);
                let accept_probability = if current_luminance > 0.0 {
                    (proposed_luminance / current_luminance).min(1.0)
                } else {
                    1.0
                };

                if accept_probability > 0.0 {
                    film.add_splat(
                        &proposed_raster,
                        proposed_radiance * (accept_probability / proposed_luminance.max(1e-12)) * b,
                    );
                }
                if 1.0 - accept_probability > 0.0 {
                    film.add_splat(
                        &current_raster,
                        current_radiance * ((1.0 - accept_probability) / current_luminance.max(1e-12))
                            * b,
                    );
                }

                if sampler.rng.uniform_continuous() < accept_probability {
                    sampler.accept();
                    current_raster = proposed_raster;
                    current_radiance = proposed_radiance;
                } else {
                    sampler.reject();
                }
            }
        }

        tracing::info!(filename = %film.filename, "writing image");
        film.write_image(1.0 / self.mutations_per_pixel.max(1) as Float);
    }
}
