use crate::{
    base::filter::Filter,
    geometries::{point2::Point2F, vec2::Vec2F},
    utils::math::Float,
};

pub struct BoxFilter {
    radius: Vec2F,
    inverse_radius: Vec2F,
}

pub struct BoxFilterDescriptior {
    pub x_width: Option<Float>,
    pub y_width: Option<Float>,
}

impl BoxFilter {
    pub fn create(options: BoxFilterDescriptior) -> Self {
        let x_width = options.x_width.unwrap_or(0.5);
        let y_width = options.y_width.unwrap_or(0.5);
        Self::new(Vec2F::new(x_width, y_width))
    }

    pub fn new(radius: Vec2F) -> Self {
        Self {
            radius,
            inverse_radius: Vec2F::new(1.0 / radius.x, 1.0 / radius.y),
        }
    }
}

impl Filter for BoxFilter {
    fn evaluate(&self, point: &Point2F) -> Float {
        1.0
    }

    fn radius(&self) -> Vec2F {
        self.radius
    }

    fn inverse_radius(&self) -> Vec2F {
        self.inverse_radius
    }
}
