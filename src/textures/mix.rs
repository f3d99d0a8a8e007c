use std::{
    ops::{Add, Mul},
    sync::Arc,
};

use crate::{base::texture::Texture, interactions::surface::SurfaceInteraction, utils::math::Float};

/// Linearly blends two textures by a third, scalar "amount" texture:
/// `(1 - amount) * tex1 + amount * tex2`. An `amount` of all zeros or all
/// ones degenerates to `tex1`/`tex2` respectively.
pub struct MixTexture<T: Copy + Send + Sync> {
    tex1: Arc<dyn Texture<T>>,
    tex2: Arc<dyn Texture<T>>,
    amount: Arc<dyn Texture<Float>>,
}

impl<T: Copy + Send + Sync> MixTexture<T> {
    pub fn new(
        tex1: Arc<dyn Texture<T>>,
        tex2: Arc<dyn Texture<T>>,
        amount: Arc<dyn Texture<Float>>,
    ) -> Self {
        Self { tex1, tex2, amount }
    }
}

impl<T> Texture<T> for MixTexture<T>
where
    T: Copy + Send + Sync + Mul<Float, Output = T> + Add<Output = T>,
{
    fn evaluate(&self, si: &SurfaceInteraction) -> T {
        let amt = self.amount.evaluate(si);
        self.tex1.evaluate(si) * (1.0 - amt) + self.tex2.evaluate(si) * amt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textures::constant::ConstantTexture;

    #[test]
    fn halfway_amount_averages_both_textures() {
        let tex1: Arc<dyn Texture<Float>> = Arc::new(ConstantTexture { value: 2.0 as Float });
        let tex2: Arc<dyn Texture<Float>> = Arc::new(ConstantTexture { value: 8.0 as Float });
        let amount: Arc<dyn Texture<Float>> = Arc::new(ConstantTexture { value: 0.5 as Float });
        let texture = MixTexture::new(tex1, tex2, amount);
        let si = SurfaceInteraction::default();
        assert_eq!(texture.evaluate(&si), 5.0);
    }

    #[test]
    fn zero_amount_is_pure_first_texture() {
        let tex1: Arc<dyn Texture<Float>> = Arc::new(ConstantTexture { value: 2.0 as Float });
        let tex2: Arc<dyn Texture<Float>> = Arc::new(ConstantTexture { value: 8.0 as Float });
        let amount: Arc<dyn Texture<Float>> = Arc::new(ConstantTexture { value: 0.0 as Float });
        let texture = MixTexture::new(tex1, tex2, amount);
        let si = SurfaceInteraction::default();
        assert_eq!(texture.evaluate(&si), 2.0);
    }
}
