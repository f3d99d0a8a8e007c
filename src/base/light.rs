use crate::{
    base::{constants::Float, interaction::Interaction, scene::Scene},
    geometries::{normal::Normal, point2::Point2F, ray::Ray, vec3::Vec3},
    interactions::base::BaseInteraction,
    spectra::rgb::RGBSpectrum,
};

pub type LightFlag = i32;

pub const DELTA_POSITION_LIGHT: LightFlag = 1 << 0;
pub const DELTA_DIRECTION_LIGHT: LightFlag = 1 << 1;
pub const AREA_LIGHT: LightFlag = 1 << 2;
pub const INFINITE_LIGHT: LightFlag = 1 << 3;

pub fn is_delta_light(flag: LightFlag) -> bool {
    flag & DELTA_POSITION_LIGHT != 0 || flag & DELTA_DIRECTION_LIGHT != 0
}

pub struct LightPointSample {
    pub radiance: RGBSpectrum,
    pub wi: Vec3,
    pub pdf: Float,
    pub visibility: Option<VisibilityTester>,
}

pub struct LightRaySample {
    pub radiance: RGBSpectrum,
    pub ray: Ray,
    pub light_normal: Normal,
    pub position_pdf: Float,
    pub direction_pdf: Float,
}

pub struct VisibilityTester {
    p0: BaseInteraction,
    p1: BaseInteraction,
}

impl VisibilityTester {
    pub fn new(p0: BaseInteraction, p1: BaseInteraction) -> Self {
        Self { p0, p1 }
    }

    pub fn unoccluded(&self, scene: &Scene) -> bool {
        !scene.intersect_test(&self.p0.spawn_ray_to_it(&self.p1))
    }
}

pub trait Light: Send + Sync {
    fn power(&self) -> RGBSpectrum;

    fn sample_point(&self, it: &dyn Interaction, sample: &Point2F) -> LightPointSample;

    fn point_pdf(&self, it: &dyn Interaction, dir: &Vec3) -> Float;

    fn sample_ray(&self, u1: &Point2F, u2: &Point2F, time: Float) -> LightRaySample;

    fn ray_pdf(&self, ray: &Ray, surface_normal: &Normal) -> (Float, Float);

    fn flag(&self) -> LightFlag;

    fn is_infinite(&self) -> bool {
        self.flag() & INFINITE_LIGHT != 0
    }

    fn radiance(&self, _ray: &Ray) -> RGBSpectrum {
        RGBSpectrum::default()
    }

    fn preprocess(&self, _scene: &Scene) {}

    /// Suggested sample count for `uniform_sample_all_lights`, e.g. higher
    /// for area lights that benefit from stratification.
    fn num_samples(&self) -> usize {
        1
    }
}

pub trait AreaLight: Light {
    fn emission(&self, it: &dyn Interaction, dir: &Vec3) -> RGBSpectrum;
}
