use crate::{
    base::{
        bxdf::{BSDF_ALL, BSDF_SPECULAR, BSDF_TRANSMISSION},
        camera::Camera,
        constants::Float,
        integrator::{uniform_sample_one_light, SamplerIntegrator},
        interaction::Interaction,
        material::TransportMode,
        medium::{henyey_greenstein, sample_henyey_greenstein},
        sampler::Sampler,
        scene::Scene,
        spectrum::Spectrum,
    },
    geometries::ray::Ray,
    interactions::{medium::MediumInteraction, surface::SurfaceInteraction},
    spectra::rgb::RGBSpectrum,
};

/// Path tracer extended with homogeneous-medium transmittance and
/// single-scattering events, sharing the surface direct-lighting subroutine
/// with [`crate::integrators::path::PathIntegrator`] and adding a simpler,
/// phase-function-only direct estimate at medium scattering vertices.
pub struct VolPathIntegrator {
    camera: Box<dyn Camera>,
    sampler: Box<dyn Sampler>,
    max_depth: u32,
    rr_threshold: Float,
}

impl VolPathIntegrator {
    pub fn new(
        camera: Box<dyn Camera>,
        sampler: Box<dyn Sampler>,
        max_depth: u32,
        rr_threshold: Float,
    ) -> Self {
        Self {
            camera,
            sampler,
            max_depth,
            rr_threshold,
        }
    }
}

fn direct_lighting_at_medium(
    mi: &MediumInteraction,
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

    let u_light = sampler.get_2d();
    let light_sample = light.sample_point(mi, &u_light);
    if light_sample.pdf == 0.0 || light_sample.radiance.is_black() {
        return RGBSpectrum::default();
    }

    let phase = henyey_greenstein(mi.wo.dot(&light_sample.wi), mi.g);
    if phase == 0.0 {
        return RGBSpectrum::default();
    }

    let unoccluded = light_sample
        .visibility
        .as_ref()
        .map(|visibility| visibility.unoccluded(scene))
        .unwrap_or(true);
    if !unoccluded {
        return RGBSpectrum::default();
    }

    RGBSpectrum::new(phase) * light_sample.radiance / (light_sample.pdf * light_pmf)
}

impl SamplerIntegrator for VolPathIntegrator {
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
        let mut output = RGBSpectrum::default();
        let mut beta = RGBSpectrum::new(1.0);

        let mut ray = ray.clone();
        if ray.medium.is_none() {
            ray.medium = self.camera().medium();
        }

        let mut specular_bounce = false;
        let mut eta_scale = 1.0;
        let mut bounces = 0;

        loop {
            let mut si = SurfaceInteraction::default();
            let si_intersection = scene.intersect(&mut ray, &mut si);

            let mut mi: Option<MediumInteraction> = None;
            if let Some(medium) = ray.medium.clone() {
                beta *= medium.sample(&ray, sampler, &mut mi);
            }
            if beta.is_black() {
                break;
            }

            if let Some(mi) = mi {
                if bounces >= self.max_depth {
                    break;
                }

                output += beta * direct_lighting_at_medium(&mi, scene, sampler);

                let u = sampler.get_2d();
                let (wi, _pdf) = sample_henyey_greenstein(&mi.wo, mi.g, &u);
                ray = Ray::new(&mi.p, &wi, Float::INFINITY, mi.time).with_medium(ray.medium.clone());
                specular_bounce = false;
                bounces += 1;
                continue;
            }

            if bounces == 0 || specular_bounce {
                if si_intersection {
                    output += beta * si.emitted_radiance(&-ray.direction);
                } else {
                    for light in scene.lights.iter() {
                        output += beta * light.radiance(&ray);
                    }
                }
            }

            if !si_intersection || bounces >= self.max_depth {
                break;
            }

            si.compute_scattering_functions(&ray, TransportMode::Radiance, true);
            if si.bsdf.is_none() {
                ray = si.spawn_ray(&ray.direction).with_medium(ray.medium.clone());
                continue;
            }

            let bsdf = si.bsdf.as_ref().unwrap();
            if bsdf.num_components(BSDF_ALL & !BSDF_SPECULAR) > 0 {
                output += beta * uniform_sample_one_light(&si, scene, sampler);
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
            if (sampled_type & BSDF_SPECULAR) != 0 && (sampled_type & BSDF_TRANSMISSION) != 0 {
                let eta = bsdf.eta;
                eta_scale *= if wo.dot_normal(&si.n) > 0.0 {
                    eta * eta
                } else {
                    1.0 / (eta * eta)
                };
            }
            ray = si.spawn_ray(&wi).with_medium(ray.medium.clone());

            let rr_beta = beta * eta_scale;
            if rr_beta.max_component_value() < self.rr_threshold && bounces > 3 {
                let q = (1.0 - rr_beta.max_component_value()).max(0.5);
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
