use std::sync::Arc;

use crate::{
    base::{
        bsdf::BSDF,
        bxdf::{BSDF_ALL, BSDF_SPECULAR},
        camera::Camera,
        constants::Float,
        integrator::{uniform_sample_one_light, SamplerIntegrator},
        interaction::Interaction,
        light::Light,
        material::TransportMode,
        sampler::Sampler,
        scene::Scene,
        spectrum::Spectrum,
    },
    geometries::{normal::Normal, point3::Point3, ray::Ray, vec3::Vec3},
    interactions::{base::BaseInteraction, surface::SurfaceInteraction},
    spectra::rgb::RGBSpectrum,
};

/// A surface vertex on a light subpath: the BSDF at the hit point plus the
/// accumulated throughput carried from the emitter.
struct LightVertex {
    p: Point3,
    n: Normal,
    wo: Vec3,
    beta: RGBSpectrum,
    bsdf: BSDF,
}

impl LightVertex {
    fn interaction(&self) -> BaseInteraction {
        BaseInteraction {
            p: self.p,
            p_error: Vec3::default(),
            time: 0.0,
            wo: self.wo,
            n: self.n,
        }
    }
}

/// Bidirectional path tracer: traces one subpath from the camera and one
/// from a randomly chosen light, then connects every camera vertex to every
/// light vertex in addition to the usual next-event estimation performed at
/// each camera vertex. Connections use a single shadow ray and are combined
/// with the direct-lighting estimate via a flat 1/(n+1) weight rather than
/// the full per-strategy balance heuristic.
pub struct BdptIntegrator {
    camera: Box<dyn Camera>,
    sampler: Box<dyn Sampler>,
    max_depth: u32,
}

impl BdptIntegrator {
    pub fn new(camera: Box<dyn Camera>, sampler: Box<dyn Sampler>, max_depth: u32) -> Self {
        Self {
            camera,
            sampler,
            max_depth,
        }
    }
}

/// Traces a subpath from a randomly sampled light, returning its vertices in
/// emission-to-last-bounce order. The first vertex's `beta` already folds in
/// the emitted radiance, selection pmf, and sampling densities.
fn generate_light_subpath(
    scene: &Scene,
    sampler: &mut dyn Sampler,
    max_depth: u32,
) -> Vec<LightVertex> {
    let mut vertices = Vec::new();

    let num_lights = scene.lights.len();
    if num_lights == 0 {
        return vertices;
    }
    let light_index = ((sampler.get_1d() * num_lights as Float) as usize).min(num_lights - 1);
    let light: Arc<dyn Light> = scene.lights[light_index].clone();
    let light_pmf = 1.0 / num_lights as Float;

    let light_sample = light.sample_ray(&sampler.get_2d(), &sampler.get_2d(), 0.0);
    if light_sample.position_pdf == 0.0
        || light_sample.direction_pdf == 0.0
        || light_sample.radiance.is_black()
    {
        return vertices;
    }

    let cos_theta = light_sample
        .ray
        .direction
        .normalize()
        .dot_normal(&light_sample.light_normal)
        .abs();
    let mut beta = light_sample.radiance * cos_theta
        / (light_pmf * light_sample.position_pdf * light_sample.direction_pdf);

    let mut ray = light_sample.ray.clone();
    let mut wo = -light_sample.ray.direction.normalize();
    let mut p = light_sample.ray.origin;
    let mut n = light_sample.light_normal;

    for depth in 0..max_depth {
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

        vertices.push(LightVertex {
            p: si.p,
            n: si.n,
            wo,
            beta,
            bsdf,
        });

        if depth + 1 >= max_depth {
            break;
        }

        let bsdf = &vertices.last().unwrap().bsdf;
        let sample = bsdf.sample(&wo, &sampler.get_2d(), sampler.get_1d(), BSDF_ALL);
        let (f, wi, pdf, _) = match sample {
            Some(sample) => sample,
            None => break,
        };
        if f.is_black() || pdf == 0.0 {
            break;
        }

        beta *= f * wi.abs_dot_normal(&si.shading.n) / pdf;
        if beta.is_black() {
            break;
        }

        p = si.p;
        n = si.n;
        wo = -wi;
        ray = si.spawn_ray(&wi);
    }
    let _ = (p, n);

    vertices
}

/// Connects a camera-path surface vertex to a light-path vertex with a
/// shadow ray, returning the (unweighted) bidirectional contribution.
fn connect(
    camera_si: &SurfaceInteraction,
    camera_bsdf: &BSDF,
    light_vertex: &LightVertex,
    scene: &Scene,
) -> RGBSpectrum {
    let d = light_vertex.p - camera_si.p;
    let distance_squared = d.length_squared();
    if distance_squared == 0.0 {
        return RGBSpectrum::default();
    }
    let wi = d.normalize();

    let f_camera = camera_bsdf.f(&camera_si.wo, &wi, BSDF_ALL & !BSDF_SPECULAR)
        * wi.abs_dot_normal(&camera_si.shading.n);
    if f_camera.is_black() {
        return RGBSpectrum::default();
    }

    let f_light = light_vertex.bsdf.f(&light_vertex.wo, &-wi, BSDF_ALL & !BSDF_SPECULAR)
        * (-wi).abs_dot_normal(&light_vertex.n);
    if f_light.is_black() {
        return RGBSpectrum::default();
    }

    let shadow_ray = camera_si.spawn_ray_to_it(&light_vertex.interaction());
    if scene.intersect_test(&shadow_ray) {
        return RGBSpectrum::default();
    }

    let geometry = 1.0 / distance_squared;
    f_camera * f_light * light_vertex.beta * geometry
}

impl SamplerIntegrator for BdptIntegrator {
    fn camera(&self) -> &dyn Camera {
        self.camera.as_ref()
    }

    fn sampler(&self) -> &dyn Sampler {
        self.sampler.as_ref()
    }

    fn radiance(
        &self,
        ray: &mut Ray,
        scene: &Scene,
        sampler: &mut dyn Sampler,
        _: u32,
    ) -> RGBSpectrum {
        let light_path = generate_light_subpath(scene, sampler, self.max_depth);

        let mut output = RGBSpectrum::default();
        let mut beta = RGBSpectrum::new(1.0);
        let mut ray = ray.clone();
        let mut specular_bounce = false;
        let mut bounces = 0;

        loop {
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

            if !hit || bounces >= self.max_depth {
                break;
            }

            si.compute_scattering_functions(&ray, TransportMode::Radiance, true);
            if si.bsdf.is_none() {
                ray = si.spawn_ray(&ray.direction);
                continue;
            }

            let bsdf = si.bsdf.as_ref().unwrap();
            if bsdf.num_components(BSDF_ALL & !BSDF_SPECULAR) > 0 {
                output += beta * uniform_sample_one_light(&si, scene, sampler);

                if !light_path.is_empty() {
                    let weight = 1.0 / (light_path.len() + 1) as Float;
                    let mut connected = RGBSpectrum::default();
                    for light_vertex in &light_path {
                        connected += connect(&si, bsdf, light_vertex, scene);
                    }
                    output += beta * connected * weight;
                }
            }

            let wo = -ray.direction;
            let (f, wi, pdf, sampled_type) =
                match bsdf.sample(&wo, &sampler.get_2d(), sampler.get_1d(), BSDF_ALL) {
                    Some(sample) => sample,
                    None => break,
                };
            if f.is_black() || pdf == 0.0 {
                break;
            }
            beta *= f * wi.abs_dot_normal(&si.shading.n) / pdf;
            specular_bounce = (sampled_type & BSDF_SPECULAR) != 0;
            ray = si.spawn_ray(&wi);

            if beta.max_component_value() < 0.05 && bounces > 3 {
                let q = (1.0 - beta.max_component_value()).max(0.5);
                if sampler.get_1d() < q {
                    break;
                }
                beta /= 1.0 - q;
            }

            bounces += 1;
        }

        output
    }
}
