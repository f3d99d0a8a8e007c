use std::debug_assert;

use crate::{
    base::{
        bsdf::BSDF,
        bxdf::{BSDF_ALL, BSDF_SPECULAR, BSDF_TRANSMISSION},
        camera::Camera,
        constants::Float,
        integrator::{uniform_sample_one_light, SamplerIntegrator},
        interaction::Interaction,
        material::TransportMode,
        sampler::Sampler,
        scene::Scene,
        spectrum::Spectrum,
    },
    bxdfs::bssrdf_adapter::SeparableBSSRDFAdapter,
    geometries::{ray::Ray, vec3::Vec3},
    interactions::surface::SurfaceInteraction,
    spectra::rgb::RGBSpectrum,
};

pub struct PathIntegrator {
    camera: Box<dyn Camera>,
    sampler: Box<dyn Sampler>,
    max_depth: u32,
    rr_threshold: Float,
}

impl PathIntegrator {
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

impl SamplerIntegrator for PathIntegrator {
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
        let mut specular_bounce = false;

        // Tracks the accumulated effect of radiance scaling due
        // to rays passing through refractive boundaries.
        let mut eta_scale = 1.0;

        let mut bounces = 0;
        // Find next path vertex and accumulate contribution.
        loop {
            // Intersect ray with scene.
            let mut si = SurfaceInteraction::default();
            let si_intersection = scene.intersect(&mut ray, &mut si);

            // Add intersection emission if it is the first intersection
            // from camera ray or the prior path segment included a
            // specular BSDF component.
            if bounces == 0 || specular_bounce {
                if si_intersection {
                    output += beta * si.emitted_radiance(&-ray.direction);
                } else {
                    for light in scene.lights.iter() {
                        output += beta * light.radiance(&ray);
                    }
                }
            }

            // Terminate path if there was no intersection or
            // max_depth is reached.
            if !si_intersection || bounces >= self.max_depth {
                break;
            }

            // Compute scattering functions and skip over medium boundaries.
            si.compute_scattering_functions(&ray, TransportMode::Radiance, true);
            if si.bsdf.is_none() {
                ray = si.spawn_ray(&ray.direction);
                continue;
            }

            // Sample illumination from lights to find path contribution,
            // ignoring specular BSDFs.
            let bsdf = si.bsdf.as_ref().unwrap();
            if bsdf.num_components(BSDF_ALL & !BSDF_SPECULAR) > 0 {
                output += beta * uniform_sample_one_light(&si, scene, sampler);
            }

            // Sample BSDF to get new path direction.
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
            ray = si.spawn_ray(&wi);

            // A transmissive sample into a BSSRDF material crosses the
            // boundary into the translucent medium; follow it with a
            // subsurface probe that finds where it reenters the surface,
            // rather than tracing the medium itself.
            if si.bssrdf.is_some() && (sampled_type & BSDF_TRANSMISSION) != 0 {
                let bssrdf = si.bssrdf.as_ref().unwrap();
                let sp_sample =
                    bssrdf.sample_sp(scene, sampler.get_1d(), sampler.get_2d(), sampler.get_1d());
                let (mut pi, sp, sp_pdf) = match sp_sample {
                    Some(sample) => sample,
                    None => break,
                };
                if sp.is_black() || sp_pdf == 0.0 {
                    break;
                }
                beta *= sp / sp_pdf;

                let exit_eta = bssrdf.eta();
                pi.wo = Vec3::from(pi.shading.n);
                let mut exit_bsdf = BSDF::new(&pi, exit_eta);
                exit_bsdf.add(Box::new(SeparableBSSRDFAdapter::new(exit_eta)));
                pi.bsdf = Some(exit_bsdf);

                output += beta * uniform_sample_one_light(&pi, scene, sampler);

                let exit_bsdf = pi.bsdf.as_ref().unwrap();
                let (f, wi, pdf, sampled_type) =
                    match exit_bsdf.sample(&pi.wo, &sampler.get_2d(), sampler.get_1d(), BSDF_ALL) {
                        Some(sample) => sample,
                        None => break,
                    };
                if f.is_black() || pdf == 0.0 {
                    break;
                }
                beta *= f * wi.abs_dot_normal(&pi.shading.n) / pdf;
                specular_bounce = (sampled_type & BSDF_SPECULAR) != 0;
                ray = pi.spawn_ray(&wi);
            }

            // Terminate path with russian roulette.
            let rr_beta = beta * eta_scale;
            if rr_beta.max_component_value() < self.rr_threshold && bounces > 3 {
                let q = (1.0 - rr_beta.max_component_value()).max(0.5);
                if sampler.get_1d() < q {
                    break;
                }
                beta /= 1.0 - q;
                debug_assert!(beta.y().is_finite());
            }

            bounces += 1;
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        accelerators::bvh::BVH,
        base::{
            film::{Film, FilmDescriptor},
            filter::Filter,
            integrator::SamplerIntegrator,
            light::Light,
            primitive::Primitive,
            spectrum::Spectrum,
            transform::{AnimatedTransform, Transform},
        },
        cameras::perspective::{PerspectiveCamera, PerspectiveCameraOptions},
        filters::box_filter::{BoxFilter, BoxFilterDescriptior},
        geometries::{point2::Point2F, point2::Point2I, point3::Point3},
        lights::directional::{DirectionalLight, DirectionalLightOptions},
        materials::matte::MatteMaterial,
        primitives::geometric::GeometricPrimitive,
        samplers::halton::{HaltonSampler, HaltonSamplerOptions},
        shapes::sphere::{Sphere, SphereOptions},
        textures::constant::ConstantTexture,
    };

    /// One matte sphere at the origin, camera at `(0,0,5)` looking at the
    /// origin, a directional light shining in from the camera's side. The
    /// path-traced radiance at the sphere's nearest point (where the
    /// surface normal faces the light almost head-on) should land close to
    /// the analytic Lambertian value `kd / pi * Li * cosθi`.
    #[test]
    fn sphere_in_vacuum_matches_analytic_lambertian_shading() {
        let albedo = 0.5;
        let shape = Arc::new(Sphere::new(SphereOptions {
            transform: Transform::default(),
            reverse_orientation: false,
            radius: 1.0,
            z_min: -1.0,
            z_max: 1.0,
            phi_max: 360.0,
        }));
        let material = Arc::new(MatteMaterial {
            kd: Box::new(ConstantTexture {
                value: RGBSpectrum::new(albedo),
            }),
            sigma: Box::new(ConstantTexture { value: 0.0 }),
        });
        let primitive: Arc<dyn Primitive> = Arc::new(GeometricPrimitive {
            shape,
            material,
            area_light: None,
        });
        let aggregate: Arc<dyn Primitive> = Arc::new(BVH::new(vec![primitive]));

        let light_intensity = 8.0;
        let light: Arc<dyn Light> = Arc::new(DirectionalLight::new(DirectionalLightOptions {
            scene: aggregate.as_ref(),
            from: Point3::new(0.0, 0.0, 5.0),
            to: Point3::new(0.0, 0.0, 0.0),
            intensity: RGBSpectrum::new(light_intensity),
        }));
        let scene = Scene::new(aggregate, vec![light]);

        let resolution = Point2F::new(16.0, 16.0);
        let filter: Box<dyn Filter> = Box::new(BoxFilter::create(BoxFilterDescriptior {
            x_width: None,
            y_width: None,
        }));
        let film = Film::create(
            &FilmDescriptor {
                filename: "sphere-in-vacuum-test.exr".to_string(),
                x_resolution: resolution.x,
                y_resolution: resolution.y,
                crop_window: [0.0, 0.0, 1.0, 1.0],
                scale: 1.0,
                diagonal: 35.0,
                max_sample_luminance: Float::INFINITY,
            },
            filter,
        );

        fn camera_to_world() -> AnimatedTransform {
            let look_at = Transform::look_at(
                &Point3::new(0.0, 0.0, 5.0),
                &Point3::new(0.0, 0.0, 0.0),
                &Vec3::new(0.0, 1.0, 0.0),
            );
            AnimatedTransform::new(look_at.clone(), 0.0, look_at, 1.0)
        }

        let camera = PerspectiveCamera::new(PerspectiveCameraOptions {
            camera_to_world: camera_to_world(),
            shutter_open: 0.0,
            shutter_close: 1.0,
            lens_radius: 0.0,
            focal_distance: 1e6,
            fov: 30.0,
            near: 1e-2,
            far: 1000.0,
            film,
            medium: None,
        });

        let spp = 64;
        let mut sampler = HaltonSampler::new(HaltonSamplerOptions {
            samples_per_pixel: spp,
        });

        // PathIntegrator::radiance never touches self.camera/self.sampler;
        // it only needs max_depth and rr_threshold. This second camera
        // instance (with its own separate `Film`) just satisfies the
        // constructor.
        let placeholder_filter: Box<dyn Filter> = Box::new(BoxFilter::create(BoxFilterDescriptior {
            x_width: None,
            y_width: None,
        }));
        let placeholder_film = Film::create(
            &FilmDescriptor {
                filename: "sphere-in-vacuum-test-placeholder.exr".to_string(),
                x_resolution: resolution.x,
                y_resolution: resolution.y,
                crop_window: [0.0, 0.0, 1.0, 1.0],
                scale: 1.0,
                diagonal: 35.0,
                max_sample_luminance: Float::INFINITY,
            },
            placeholder_filter,
        );
        let integrator = PathIntegrator::new(
            Box::new(PerspectiveCamera::new(PerspectiveCameraOptions {
                camera_to_world: camera_to_world(),
                shutter_open: 0.0,
                shutter_close: 1.0,
                lens_radius: 0.0,
                focal_distance: 1e6,
                fov: 30.0,
                near: 1e-2,
                far: 1000.0,
                film: placeholder_film,
                medium: None,
            })),
            Box::new(HaltonSampler::new(HaltonSamplerOptions {
                samples_per_pixel: spp,
            })),
            5,
            0.0,
        );

        let center = Point2I::new(8, 8);
        sampler.start_pixel_sample(&center);

        let mut radiance_sum = RGBSpectrum::default();
        loop {
            let camera_sample = sampler.get_camera_sample(&center);
            let mut ray = Ray::default();
            camera.generate_ray(&camera_sample, &mut ray);

            radiance_sum += integrator.radiance(&mut ray, &scene, &mut sampler, 0);

            if !sampler.start_next_sample() {
                break;
            }
        }

        let estimate = (radiance_sum / spp as Float).max_component_value();

        // The nearest point of the sphere, (0,0,1), has its normal pointing
        // straight at both the camera and the light, so cosθi ≈ 1.
        let analytic = albedo / crate::base::constants::PI * light_intensity;

        let relative_error = (estimate - analytic).abs() / analytic;
        assert!(
            relative_error <= 0.05,
            "estimate={estimate} analytic={analytic} relative_error={relative_error}"
        );
    }
}
