use crate::{
    base::constants::Float,
    geometries::{normal::Normal, point2::Point2F, vec3::Vec3},
    spectra::rgb::RGBSpectrum,
};

pub type BxDFType = i32;

pub const BSDF_REFLECTION: i32 = 1 << 0;
pub const BSDF_TRANSMISSION: i32 = 1 << 1;
pub const BSDF_DIFFUSE: i32 = 1 << 2;
pub const BSDF_GLOSSY: i32 = 1 << 3;
pub const BSDF_SPECULAR: i32 = 1 << 4;
pub const BSDF_ALL: i32 =
    BSDF_DIFFUSE | BSDF_GLOSSY | BSDF_SPECULAR | BSDF_REFLECTION | BSDF_TRANSMISSION;

pub struct BxDFSample {
    pub wi: Vec3,
    pub f: RGBSpectrum,
    pub pdf: Float,
    pub sampled_type: Option<BxDFType>,
}

pub trait BxDF: Send + Sync {
    fn f(&self, wo: &Vec3, wi: &Vec3) -> RGBSpectrum;

    fn sample(&self, wo: &Vec3, u: &Point2F) -> BxDFSample {
        let mut wi = crate::base::sampling::cosine_sample_hemisphere(u);
        if wo.z < 0.0 {
            wi.z *= -1.0;
        }
        let pdf = self.pdf(wo, &wi);
        BxDFSample {
            f: self.f(wo, &wi),
            wi,
            pdf,
            sampled_type: None,
        }
    }

    fn pdf(&self, wo: &Vec3, wi: &Vec3) -> Float {
        if same_hemisphere(wo, wi) {
            abs_cos_theta(wi) * crate::base::constants::INV_PI
        } else {
            0.0
        }
    }

    fn bxdf_type(&self) -> BxDFType;

    fn matches_flags(&self, t: BxDFType) -> bool {
        self.bxdf_type() & t == self.bxdf_type()
    }
}

pub fn cos_theta(w: &Vec3) -> Float {
    w.z
}

pub fn cos2_theta(w: &Vec3) -> Float {
    w.z * w.z
}

pub fn abs_cos_theta(w: &Vec3) -> Float {
    w.z.abs()
}

pub fn sin2_theta(w: &Vec3) -> Float {
    (1.0 - cos2_theta(w)).max(0.0)
}

pub fn sin_theta(w: &Vec3) -> Float {
    sin2_theta(w).sqrt()
}

pub fn tan_theta(w: &Vec3) -> Float {
    sin_theta(w) / cos_theta(w)
}

pub fn tan2_theta(w: &Vec3) -> Float {
    sin2_theta(w) / cos2_theta(w)
}

pub fn cos_phi(w: &Vec3) -> Float {
    let sin_theta = sin_theta(w);
    if sin_theta == 0.0 {
        1.0
    } else {
        (w.x / sin_theta).clamp(-1.0, 1.0)
    }
}

pub fn sin_phi(w: &Vec3) -> Float {
    let sin_theta = sin_theta(w);
    if sin_theta == 0.0 {
        0.0
    } else {
        (w.y / sin_theta).clamp(-1.0, 1.0)
    }
}

pub fn cos2_phi(w: &Vec3) -> Float {
    cos_phi(w) * cos_phi(w)
}

pub fn sin2_phi(w: &Vec3) -> Float {
    sin_phi(w) * sin_phi(w)
}

pub fn same_hemisphere(w: &Vec3, wp: &Vec3) -> bool {
    w.z * wp.z > 0.0
}

pub fn reflect(wo: &Vec3, n: &Vec3) -> Vec3 {
    -*wo + *n * 2.0 * wo.dot(n)
}

pub fn refract(wi: &Vec3, n: &Normal, eta: Float) -> Option<Vec3> {
    let cos_theta_i = n.dot_vec(wi);
    let sin2_theta_i = (1.0 - cos_theta_i * cos_theta_i).max(0.0);
    let sin2_theta_t = eta * eta * sin2_theta_i;
    if sin2_theta_t >= 1.0 {
        return None;
    }

    let cos_theta_t = (1.0 - sin2_theta_t).sqrt();
    Some(-*wi * eta + Vec3::from(*n) * (eta * cos_theta_i - cos_theta_t))
}

pub fn fresnel_dielectric(cos_theta_i: Float, eta_i: Float, eta_t: Float) -> Float {
    let cos_theta_i = cos_theta_i.clamp(-1.0, 1.0);

    let entering = cos_theta_i > 0.0;
    let (eta_i, eta_t, cos_theta_i) = if entering {
        (eta_i, eta_t, cos_theta_i)
    } else {
        (eta_t, eta_i, cos_theta_i.abs())
    };

    let sin_theta_i = (1.0 - cos_theta_i * cos_theta_i).max(0.0).sqrt();
    let sin_theta_t = eta_i / eta_t * sin_theta_i;
    if sin_theta_t >= 1.0 {
        return 1.0;
    }

    let cos_theta_t = (1.0 - sin_theta_t * sin_theta_t).max(0.0).sqrt();

    let r_parallel = ((eta_t * cos_theta_i) - (eta_i * cos_theta_t))
        / ((eta_t * cos_theta_i) + (eta_i * cos_theta_t));
    let r_perpendicular = ((eta_i * cos_theta_i) - (eta_t * cos_theta_t))
        / ((eta_i * cos_theta_i) + (eta_t * cos_theta_t));

    (r_parallel * r_parallel + r_perpendicular * r_perpendicular) / 2.0
}

pub fn fresnel_conductor(
    cos_theta_i: Float,
    eta_i: &RGBSpectrum,
    eta_t: &RGBSpectrum,
    k: &RGBSpectrum,
) -> RGBSpectrum {
    let cos_theta_i = cos_theta_i.clamp(-1.0, 1.0);
    let eta = *eta_t / *eta_i;
    let eta_k = *k / *eta_i;

    let cos_theta_i2 = cos_theta_i * cos_theta_i;
    let sin_theta_i2 = 1.0 - cos_theta_i2;
    let eta2 = eta * eta;
    let eta_k2 = eta_k * eta_k;

    let t0 = eta2 - eta_k2 - sin_theta_i2;
    let a2_plus_b2 = (t0 * t0 + eta2 * eta_k2 * 4.0).sqrt();
    let t1 = a2_plus_b2 + cos_theta_i2;
    let a = (0.5 * (a2_plus_b2 + t0)).max(0.0).sqrt();
    let t2 = a * 2.0 * cos_theta_i;
    let rs = (t1 - t2) / (t1 + t2);

    let t3 = cos_theta_i2 * a2_plus_b2 + sin_theta_i2 * sin_theta_i2;
    let t4 = t2 * sin_theta_i2;
    let rp = rs * (t3 - t4) / (t3 + t4);

    (rp + rs) * 0.5
}
