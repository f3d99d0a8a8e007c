use crate::{
    base::{constants::Float, sampler::Sampler, spectrum::Spectrum},
    geometries::{ray::Ray, vec3::Vec3},
    interactions::medium::MediumInteraction,
    spectra::rgb::RGBSpectrum,
};

/// A participating medium the renderer can attenuate and scatter rays
/// through. Only homogeneous media are modeled; heterogeneous (grid/VDB)
/// media are out of scope and would implement the same interface.
pub trait Medium: Send + Sync {
    /// Beam transmittance along `ray` from its origin to `ray.t_max`.
    fn tr(&self, ray: &Ray, sampler: &mut dyn Sampler) -> RGBSpectrum;

    /// Samples a scattering or absorption event along `ray`. Returns the
    /// ratio of transmittance to sampling density and, on a scattering
    /// event, populates `mi` with the interaction point.
    fn sample(&self, ray: &Ray, sampler: &mut dyn Sampler, mi: &mut Option<MediumInteraction>) -> RGBSpectrum;
}

/// Homogeneous medium with constant absorption/scattering coefficients and
/// a Henyey-Greenstein phase function asymmetry parameter.
#[derive(Debug, Clone, Copy)]
pub struct HomogeneousMedium {
    pub sigma_a: RGBSpectrum,
    pub sigma_s: RGBSpectrum,
    pub sigma_t: RGBSpectrum,
    pub g: Float,
}

impl HomogeneousMedium {
    pub fn new(sigma_a: RGBSpectrum, sigma_s: RGBSpectrum, g: Float) -> Self {
        Self {
            sigma_a,
            sigma_s,
            sigma_t: sigma_a + sigma_s,
            g,
        }
    }
}

impl Medium for HomogeneousMedium {
    fn tr(&self, ray: &Ray, _sampler: &mut dyn Sampler) -> RGBSpectrum {
        let length = ray.direction.length();
        if length == 0.0 {
            return RGBSpectrum::new(1.0);
        }
        (-self.sigma_t * (length * ray.t_max).min(Float::MAX)).exp()
    }

    fn sample(&self, ray: &Ray, sampler: &mut dyn Sampler, mi: &mut Option<MediumInteraction>) -> RGBSpectrum {
        // Pick a spectral channel uniformly and sample a free-flight distance
        // from its extinction coefficient.
        let channel = ((sampler.get_1d() * 3.0) as usize).min(2);
        let sigma_t_channel = self.sigma_t[channel].max(1e-8);
        let distance = -(1.0 - sampler.get_1d()).ln() / sigma_t_channel;
        let t = (distance / ray.direction.length()).min(ray.t_max);
        let sampled_medium = t < ray.t_max;

        if sampled_medium {
            *mi = Some(MediumInteraction {
                p: ray.at(t),
                time: ray.time,
                wo: -ray.direction.normalize(),
                g: self.g,
            });
        } else {
            *mi = None;
        }

        // Compute the transmittance and sampling density.
        let length = ray.direction.length();
        let t_hit = (t * length).min(Float::MAX);
        let tr = (-self.sigma_t * t_hit).exp();

        let density = if sampled_medium {
            self.sigma_t * tr
        } else {
            tr
        };
        let mut pdf = 0.0;
        for i in 0..3 {
            pdf += density[i];
        }
        pdf /= 3.0;
        if pdf == 0.0 {
            pdf = 1.0;
        }

        if sampled_medium {
            tr * self.sigma_s / pdf
        } else {
            tr / pdf
        }
    }
}

/// Henyey-Greenstein phase function, shared by homogeneous media and the
/// volumetric path integrator.
pub fn henyey_greenstein(cos_theta: Float, g: Float) -> Float {
    use crate::base::constants::PI;
    let denominator = (1.0 + g * g + 2.0 * g * cos_theta).max(1e-12);
    (1.0 - g * g) / (4.0 * PI * denominator * denominator.sqrt())
}

/// Importance-samples a new direction around `wo` from the Henyey-Greenstein
/// phase function. Returns the sampled direction and its value (the phase
/// function is already normalized, so the value doubles as the pdf).
pub fn sample_henyey_greenstein(
    wo: &Vec3,
    g: Float,
    u: &crate::geometries::point2::Point2F,
) -> (Vec3, Float) {
    use crate::base::constants::PI;

    let cos_theta = if g.abs() < 1e-3 {
        1.0 - 2.0 * u.x
    } else {
        let sqr = (1.0 - g * g) / (1.0 + g - 2.0 * g * u.x);
        -(1.0 + g * g - sqr * sqr) / (2.0 * g)
    };

    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = 2.0 * PI * u.y;

    let (v1, v2) = Vec3::coordinate_system(wo);
    let wi = v1 * (sin_theta * phi.cos()) + v2 * (sin_theta * phi.sin()) + *wo * cos_theta;

    let pdf = henyey_greenstein(cos_theta, g);
    (wi, pdf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samplers::stratified::{StratifiedSampler, StratifiedSamplerOptions};

    #[test]
    fn vacuum_has_full_transmittance() {
        let medium = HomogeneousMedium::new(RGBSpectrum::default(), RGBSpectrum::default(), 0.0);
        let ray = Ray::new(
            &crate::geometries::point3::Point3::default(),
            &Vec3::new(0.0, 0.0, 1.0),
            10.0,
            0.0,
        );
        let mut sampler = StratifiedSampler::new(StratifiedSamplerOptions {
            x_pixel_samples: 1,
            y_pixel_samples: 1,
            sampled_dimensions: 1,
            jitter_samples: false,
        });
        let tr = medium.tr(&ray, &mut sampler);
        assert_eq!(tr.max_component_value(), 1.0);
    }
}
