use std::{ops::Mul, sync::Arc};

use crate::{base::texture::Texture, interactions::surface::SurfaceInteraction, utils::math::Float};

/// Multiplies one texture's value by a scalar texture, e.g. to modulate an
/// albedo map's brightness without baking the modulation into the map.
pub struct ScaleTexture<T: Copy + Send + Sync> {
    value: Arc<dyn Texture<T>>,
    scale: Arc<dyn Texture<Float>>,
}

impl<T: Copy + Send + Sync> ScaleTexture<T> {
    pub fn new(value: Arc<dyn Texture<T>>, scale: Arc<dyn Texture<Float>>) -> Self {
        Self { value, scale }
    }
}

impl<T> Texture<T> for ScaleTexture<T>
where
    T: Copy + Send + Sync + Mul<Float, Output = T>,
{
    fn evaluate(&self, si: &SurfaceInteraction) -> T {
        self.value.evaluate(si) * self.scale.evaluate(si)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textures::constant::ConstantTexture;

    #[test]
    fn scales_constant_value_by_constant_factor() {
        let value: Arc<dyn Texture<Float>> = Arc::new(ConstantTexture { value: 2.0 as Float });
        let scale: Arc<dyn Texture<Float>> = Arc::new(ConstantTexture { value: 3.0 as Float });
        let texture = ScaleTexture::new(value, scale);
        let si = SurfaceInteraction::default();
        assert_eq!(texture.evaluate(&si), 6.0);
    }
}
