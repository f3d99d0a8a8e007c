use std::sync::Arc;

use crate::{
    base::{
        constants::{Float, INV_PI, PI},
        primitive::Primitive,
        scene::Scene,
        spectrum::Spectrum,
    },
    geometries::{normal::Normal, point2::Point2F, point3::Point3, ray::Ray, vec3::Vec3},
    interactions::surface::SurfaceInteraction,
    spectra::rgb::RGBSpectrum,
};

const PROFILE_SAMPLES: usize = 64;
const MAX_CHAIN_LENGTH: usize = 16;

/// Tabulated reentry profile `Sp(r)` for one color channel: a radius grid
/// together with the CDF of `2*pi*r*profile(r)` over that grid, so a
/// uniform random number inverts directly to an importance-sampled radius.
#[derive(Debug, Clone, Copy)]
struct ProfileTable {
    radii: [Float; PROFILE_SAMPLES],
    cdf: [Float; PROFILE_SAMPLES],
    integral: Float,
}

impl ProfileTable {
    fn build(profile: impl Fn(Float) -> Float, max_radius: Float) -> Self {
        let mut radii = [0.0; PROFILE_SAMPLES];
        let mut weights = [0.0; PROFILE_SAMPLES];
        for i in 0..PROFILE_SAMPLES {
            // Denser sampling near r=0, where the diffusion profile is
            // steepest, by squaring the linear fraction.
            let t = i as Float / (PROFILE_SAMPLES - 1) as Float;
            let r = t * t * max_radius;
            radii[i] = r;
            weights[i] = 2.0 * PI * r * profile(r);
        }

        let mut cdf = [0.0; PROFILE_SAMPLES];
        let mut integral = 0.0;
        for i in 1..PROFILE_SAMPLES {
            integral += 0.5 * (weights[i] + weights[i - 1]) * (radii[i] - radii[i - 1]);
            cdf[i] = integral;
        }
        if integral > 0.0 {
            for c in cdf.iter_mut() {
                *c /= integral;
            }
        }

        Self {
            radii,
            cdf,
            integral,
        }
    }

    /// Inverts the CDF at `u`, returning the sampled radius.
    fn sample_radius(&self, u: Float) -> Float {
        if self.integral <= 0.0 {
            return 0.0;
        }
        let idx = self
            .cdf
            .partition_point(|&c| c < u)
            .min(PROFILE_SAMPLES - 1)
            .max(1);
        let c0 = self.cdf[idx - 1];
        let c1 = self.cdf[idx];
        let frac = if c1 > c0 { (u - c0) / (c1 - c0) } else { 0.0 };
        self.radii[idx - 1] + frac * (self.radii[idx] - self.radii[idx - 1])
    }

    /// Area-density pdf implied by the table at distance `r`. The radial
    /// sampling weight `2*pi*r*profile(r)` already folds in the disk's
    /// circumference at `r`, so the area pdf is simply `profile(r) /
    /// integral` with no further `1/r` correction.
    fn pdf_radius(&self, r: Float, profile: impl Fn(Float) -> Float) -> Float {
        if self.integral <= 0.0 || r < 0.0 {
            return 0.0;
        }
        profile(r) / self.integral
    }
}

/// Separable BSSRDF `S(po, wo, pi, wi) = (1 - Fr(cosThetaO)) * Sp(po, pi) *
/// Sw(wi)`, following Jensen et al.'s dipole diffusion approximation for the
/// spatial term `Sp` and a Fresnel-weighted Lambertian exit term `Sw`.
/// `sample_sp` probes the scene along one of three axes through the entry
/// point to find an exit point elsewhere on the same primitive, the way a
/// photon undergoing many subsurface scattering events would reenter the
/// surface some distance from where it entered.
pub struct SeparableBSSRDF {
    po: Point3,
    ns: Normal,
    ss: Vec3,
    ts: Vec3,
    eta: Float,
    sigma_tr: RGBSpectrum,
    sigma_s_prime: RGBSpectrum,
    sigma_t_prime: RGBSpectrum,
    zr: RGBSpectrum,
    zv: RGBSpectrum,
    max_radius: Float,
    tables: [ProfileTable; 3],
    primitive: Option<Arc<dyn Primitive>>,
}

impl SeparableBSSRDF {
    pub fn new(
        si: &SurfaceInteraction,
        sigma_a: RGBSpectrum,
        sigma_s: RGBSpectrum,
        g: Float,
        eta: Float,
    ) -> Self {
        let sigma_s_prime = sigma_s * (1.0 - g);
        let sigma_t_prime = sigma_s_prime + sigma_a;

        let sigma_tr = (sigma_a * sigma_t_prime * 3.0).sqrt();

        let zr = RGBSpectrum::new(1.0) / sigma_t_prime;
        let fdr = fresnel_diffuse_reflectance(eta);
        let a = (1.0 + fdr) / (1.0 - fdr);
        let zv = zr * (1.0 + 4.0 / 3.0 * a);

        let mut max_inv_sigma_tr: Float = 0.0;
        for i in 0..3 {
            max_inv_sigma_tr = max_inv_sigma_tr.max(1.0 / sigma_tr[i].max(1e-6));
        }
        let max_radius = 4.0 * max_inv_sigma_tr;

        let ns = si.shading.n;
        let ss = si.shading.dpdu.normalize();
        let ts = Vec3::from(ns).cross(&ss);

        let tables = [0usize, 1, 2].map(|ch| {
            ProfileTable::build(
                |r| diffusion_profile_channel(r, zr[ch], zv[ch], sigma_tr[ch], sigma_s_prime[ch], sigma_t_prime[ch]),
                max_radius,
            )
        });

        Self {
            po: si.p,
            ns,
            ss,
            ts,
            eta,
            sigma_tr,
            sigma_s_prime,
            sigma_t_prime,
            zr,
            zv,
            max_radius,
            tables,
            primitive: si.primitive.clone(),
        }
    }

    pub fn eta(&self) -> Float {
        self.eta
    }

    fn profile_channel(&self, r: Float, ch: usize) -> Float {
        diffusion_profile_channel(
            r,
            self.zr[ch],
            self.zv[ch],
            self.sigma_tr[ch],
            self.sigma_s_prime[ch],
            self.sigma_t_prime[ch],
        )
    }

    /// `Sp(po, pi)`: the spatial term evaluated at the true 3D separation
    /// between entry and exit points, one value per channel.
    pub fn sp(&self, pi: &Point3) -> RGBSpectrum {
        let r = (*pi - self.po).length();
        let mut out = RGBSpectrum::default();
        for ch in 0..3 {
            out[ch] = self.profile_channel(r, ch);
        }
        out
    }

    /// `Sw(wi)`: Fresnel-weighted cosine term at the exit point, normalized
    /// so the hemispherical integral of `Sw` is one. Reuses the diffuse
    /// Fresnel reflectance already computed for the dipole's boundary
    /// condition as the normalization constant.
    pub fn sw(&self, cos_theta_i: Float) -> Float {
        let c = 1.0 - 2.0 * fresnel_diffuse_reflectance(1.0 / self.eta);
        let fr = crate::base::bxdf::fresnel_dielectric(cos_theta_i, 1.0, self.eta);
        (1.0 - fr) * INV_PI / c.max(1e-4)
    }

    fn is_same_primitive(&self, other: &Option<Arc<dyn Primitive>>) -> bool {
        match (&self.primitive, other) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn advance_probe(probe: &Ray, hit_p: &Point3, axis: &Vec3) -> Ray {
        let t_hit = (*hit_p - probe.origin).dot(axis);
        let remaining = (probe.t_max - t_hit - 1e-4).max(0.0);
        let new_origin = probe.origin + *axis * (t_hit + 1e-4);
        Ray::new(&new_origin, axis, remaining, 0.0)
    }

    /// Samples an exit point elsewhere on the same primitive by picking a
    /// projection axis (`ns` with probability 0.5, `ss`/`ts` with 0.25
    /// each), importance-sampling a radius from that axis's channel table,
    /// and probing the scene along the axis through the sampled disk point.
    /// Among the probe's intersections that land back on the same
    /// primitive, one is picked uniformly via `u_chain`. Returns the exit
    /// interaction, `Sp` evaluated there, and the combined area pdf.
    pub fn sample_sp(
        &self,
        scene: &Scene,
        u_axis: Float,
        u2: Point2F,
        u_chain: Float,
    ) -> Option<(SurfaceInteraction, RGBSpectrum, Float)> {
        if self.primitive.is_none() {
            return None;
        }

        let (axis, u_axis_remapped) = if u_axis < 0.5 {
            (Vec3::from(self.ns), u_axis / 0.5)
        } else if u_axis < 0.75 {
            (self.ss, (u_axis - 0.5) / 0.25)
        } else {
            (self.ts, (u_axis - 0.75) / 0.25)
        };
        let channel = ((u_axis_remapped * 3.0) as usize).min(2);

        let r = self.tables[channel].sample_radius(u2.x);
        if r >= self.max_radius {
            return None;
        }
        let phi = 2.0 * PI * u2.y;

        let (t1, t2) = Vec3::coordinate_system(&axis);
        let disk_offset = t1 * (r * phi.cos()) + t2 * (r * phi.sin());

        let half_length = (self.max_radius * self.max_radius - r * r).max(0.0).sqrt();
        if half_length <= 0.0 {
            return None;
        }
        let base = self.po + disk_offset - axis * half_length;
        let probe_length = 2.0 * half_length;

        // First pass: count intersections that land back on this primitive.
        let mut count = 0usize;
        let mut probe = Ray::new(&base, &axis, probe_length, 0.0);
        for _ in 0..MAX_CHAIN_LENGTH {
            let mut si = SurfaceInteraction::default();
            if !scene.intersect(&mut probe, &mut si) {
                break;
            }
            if self.is_same_primitive(&si.primitive) {
                count += 1;
            }
            probe = Self::advance_probe(&probe, &si.p, &axis);
        }
        if count == 0 {
            return None;
        }
        let selected = ((u_chain * count as Float) as usize).min(count - 1);

        // Second pass: the walk is deterministic given the same starting
        // ray, so re-walking it to the selected match needs no arena or
        // intersection cache.
        let mut seen = 0usize;
        let mut probe = Ray::new(&base, &axis, probe_length, 0.0);
        let mut chosen = None;
        for _ in 0..MAX_CHAIN_LENGTH {
            let mut si = SurfaceInteraction::default();
            if !scene.intersect(&mut probe, &mut si) {
                break;
            }
            let matched = self.is_same_primitive(&si.primitive);
            let next_probe = Self::advance_probe(&probe, &si.p, &axis);
            if matched {
                if seen == selected {
                    chosen = Some(si);
                    break;
                }
                seen += 1;
            }
            probe = next_probe;
        }
        let chosen = chosen?;

        let pdf = self.pdf_sp(&chosen.p);
        if pdf <= 0.0 {
            return None;
        }

        let sp = self.sp(&chosen.p);
        Some((chosen, sp, pdf))
    }

    /// Combined area pdf of `pi` under the three-axis, three-channel
    /// mixture: each axis/channel combination could equally plausibly have
    /// produced any given point, so its pdf contributes to the total.
    fn pdf_sp(&self, pi: &Point3) -> Float {
        let d = *pi - self.po;
        let len2 = d.length_squared();
        let d_ns = d.dot(&Vec3::from(self.ns));
        let d_ss = d.dot(&self.ss);
        let d_ts = d.dot(&self.ts);

        let r_ns = (len2 - d_ns * d_ns).max(0.0).sqrt();
        let r_ss = (len2 - d_ss * d_ss).max(0.0).sqrt();
        let r_ts = (len2 - d_ts * d_ts).max(0.0).sqrt();

        let mut pdf = 0.0;
        for ch in 0..3 {
            let profile = |r: Float| self.profile_channel(r, ch);
            pdf += (0.5 * self.tables[ch].pdf_radius(r_ns, profile)
                + 0.25 * self.tables[ch].pdf_radius(r_ss, profile)
                + 0.25 * self.tables[ch].pdf_radius(r_ts, profile))
                / 3.0;
        }
        pdf
    }
}

#[allow(clippy::too_many_arguments)]
fn diffusion_profile_channel(
    r: Float,
    zr: Float,
    zv: Float,
    sigma_tr: Float,
    sigma_s_prime: Float,
    sigma_t_prime: Float,
) -> Float {
    let alpha_prime = sigma_s_prime / sigma_t_prime;

    let dr = (r * r + zr * zr).sqrt();
    let dv = (r * r + zv * zv).sqrt();

    let c1 = zr * (sigma_tr * dr + 1.0) * (-sigma_tr * dr).exp() / (dr * dr * dr);
    let c2 = zv * (sigma_tr * dv + 1.0) * (-sigma_tr * dv).exp() / (dv * dv * dv);

    (alpha_prime * INV_PI * 0.25) * (c1 + c2)
}

/// Polynomial fit (Jensen & Buhler 2002) to the hemispherical diffuse
/// Fresnel reflectance at a dielectric boundary, used both to set the
/// dipole's boundary condition and to normalize `Sw`.
pub(crate) fn fresnel_diffuse_reflectance(eta: Float) -> Float {
    if eta >= 1.0 {
        -1.4399 / (eta * eta) + 0.7099 / eta + 0.6681 + 0.0636 * eta
    } else {
        let eta2 = eta * eta;
        let eta3 = eta2 * eta;
        let eta4 = eta3 * eta;
        let eta5 = eta4 * eta;
        0.919317 - 3.4793 * eta + 6.75335 * eta2 - 7.80989 * eta3 + 4.98554 * eta4
            - 1.36881 * eta5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_table() -> (ProfileTable, Float) {
        let sigma_a = 0.05;
        let sigma_s_prime = 3.0;
        let sigma_t_prime = sigma_s_prime + sigma_a;
        let sigma_tr = (sigma_a * sigma_t_prime * 3.0).sqrt();
        let zr = 1.0 / sigma_t_prime;
        let fdr = fresnel_diffuse_reflectance(1.3);
        let a = (1.0 + fdr) / (1.0 - fdr);
        let zv = zr * (1.0 + 4.0 / 3.0 * a);
        let max_radius = 4.0 / sigma_tr.max(1e-6);
        let table = ProfileTable::build(
            |r| diffusion_profile_channel(r, zr, zv, sigma_tr, sigma_s_prime, sigma_t_prime),
            max_radius,
        );
        (table, max_radius)
    }

    #[test]
    fn profile_decays_with_radius() {
        let near = diffusion_profile_channel(0.01, 1.0, 1.5, 2.0, 3.0, 3.05);
        let far = diffusion_profile_channel(1.0, 1.0, 1.5, 2.0, 3.0, 3.05);
        assert!(near > far);
    }

    #[test]
    fn table_cdf_is_monotonic_and_reaches_one() {
        let (table, _) = build_table();
        for i in 1..PROFILE_SAMPLES {
            assert!(table.cdf[i] >= table.cdf[i - 1]);
        }
        assert!((table.cdf[PROFILE_SAMPLES - 1] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn sampled_radius_stays_within_table_support() {
        let (table, max_radius) = build_table();
        for i in 0..=10 {
            let u = i as Float / 10.0;
            let r = table.sample_radius(u);
            assert!(
                (0.0..=max_radius).contains(&r),
                "r={r} out of [0, {max_radius}]"
            );
        }
    }

    #[test]
    fn diffuse_fresnel_reflectance_is_bounded() {
        for i in 1..20 {
            let eta = i as Float / 10.0;
            let fdr = fresnel_diffuse_reflectance(eta);
            assert!((0.0..=1.0).contains(&fdr), "fdr={fdr} at eta={eta}");
        }
    }
}
