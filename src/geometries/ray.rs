use std::sync::Arc;

use crate::{
    base::{constants::Float, medium::Medium, transform::Transform},
    geometries::{point3::Point3, vec3::Vec3},
};

/// A ray carries an optional pair of auxiliary rays (for texture filtering)
/// and an optional medium reference so volumetric integrators can track
/// which participating medium the ray currently travels through.
#[derive(Clone)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vec3,
    pub t_max: Float,
    pub time: Float,
    pub medium: Option<Arc<dyn Medium>>,
    pub has_differentials: bool,
    pub rx_origin: Point3,
    pub ry_origin: Point3,
    pub rx_direction: Vec3,
    pub ry_direction: Vec3,
}

impl Ray {
    pub fn new(origin: &Point3, direction: &Vec3, t_max: Float, time: Float) -> Self {
        Self {
            origin: *origin,
            direction: *direction,
            t_max,
            time,
            medium: None,
            has_differentials: false,
            rx_origin: Point3::default(),
            ry_origin: Point3::default(),
            rx_direction: Vec3::default(),
            ry_direction: Vec3::default(),
        }
    }

    pub fn with_medium(mut self, medium: Option<Arc<dyn Medium>>) -> Self {
        self.medium = medium;
        self
    }

    pub fn at(&self, t: Float) -> Point3 {
        self.origin + self.direction * t
    }

    /// Reciprocal of the ray direction, clamped to `±1e20`. An axis-aligned
    /// ray has a zero direction component on some axis, whose reciprocal is
    /// `+inf`/`-inf`; left unclamped, a slab test that multiplies it against
    /// a bounds extent equal to the ray origin on that axis computes
    /// `0 * inf`, which is NaN rather than the signed infinity the slab test
    /// needs. `f32`/`f64` `min`/`max` both return the non-NaN operand given
    /// one NaN argument, so the NaN doesn't propagate visibly — it just
    /// silently defeats the min/max clamp that is supposed to bound the
    /// slab's valid `t` range, and the traversal can accept or reject a node
    /// incorrectly for any ray it hits edge-on.
    pub fn inv_direction(&self) -> Vec3 {
        Vec3::new(
            (1.0 / self.direction.x).clamp(-1e20, 1e20),
            (1.0 / self.direction.y).clamp(-1e20, 1e20),
            (1.0 / self.direction.z).clamp(-1e20, 1e20),
        )
    }

    pub fn is_nan(&self) -> bool {
        self.origin.is_nan() || self.direction.is_nan() || self.t_max.is_nan()
    }

    /// Transforms origin, direction, and any auxiliary rays by `t`.
    pub fn transform(&self, t: &Transform) -> Self {
        Self {
            origin: self.origin.transform(t),
            direction: self.direction.transform(t),
            t_max: self.t_max,
            time: self.time,
            medium: self.medium.clone(),
            has_differentials: self.has_differentials,
            rx_origin: self.rx_origin.transform(t),
            ry_origin: self.ry_origin.transform(t),
            rx_direction: self.rx_direction.transform(t),
            ry_direction: self.ry_direction.transform(t),
        }
    }

    pub fn scale_differentials(&mut self, s: Float) {
        self.rx_origin = self.origin + (self.rx_origin - self.origin) * s;
        self.ry_origin = self.origin + (self.ry_origin - self.origin) * s;
        self.rx_direction = self.direction + (self.rx_direction - self.direction) * s;
        self.ry_direction = self.direction + (self.ry_direction - self.direction) * s;
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Point3::default(),
            direction: Vec3::default(),
            t_max: Float::INFINITY,
            time: 0.0,
            medium: None,
            has_differentials: false,
            rx_origin: Point3::default(),
            ry_origin: Point3::default(),
            rx_direction: Vec3::default(),
            ry_direction: Vec3::default(),
        }
    }
}

impl std::fmt::Debug for Ray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ray")
            .field("origin", &self.origin)
            .field("direction", &self.direction)
            .field("t_max", &self.t_max)
            .field("time", &self.time)
            .field("has_differentials", &self.has_differentials)
            .finish()
    }
}
