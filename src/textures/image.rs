use crate::{
    base::{
        mipmap::MIPMap,
        texture::{Texture, TextureMapping2D},
    },
    geometries::{point2::Point2I, vec2::Vec2F},
    interactions::surface::SurfaceInteraction,
    io::image::{inverse_gamma_correct, Image, ImageWrapMode, NUM_CHANNELS},
    spectra::rgb::RGBSpectrum,
};

pub struct ImageTexture {
    mapping: Box<dyn TextureMapping2D>,
    mipmap: MIPMap,
}

pub struct ImageTextureOptions<'a> {
    pub path: &'a str,
    pub mapping: Box<dyn TextureMapping2D>,
    pub wrap_mode: ImageWrapMode,
    pub is_gamma_corrected: bool,
}

impl ImageTexture {
    pub fn new(opts: ImageTextureOptions) -> Self {
        let mut image = Image::read(opts.path);

        // Flip image in Y. UV space has (0,0) at the lower left corner.
        let width = image.resolution.x as usize;
        let height = image.resolution.y as usize;
        for y in 0..(height / 2) {
            for x in 0..width {
                let o1 = image.pixel_offset(&Point2I::new(x as i32, y as i32));
                let o2 = image.pixel_offset(&Point2I::new(x as i32, (height - 1 - y) as i32));
                for c in 0..NUM_CHANNELS {
                    image.pixels.swap(o1 + c, o2 + c);
                }
            }
        }

        if opts.is_gamma_corrected {
            for texel in image.pixels.iter_mut() {
                *texel = inverse_gamma_correct(*texel);
            }
        }

        let mipmap = MIPMap::new(image, opts.wrap_mode);

        Self {
            mapping: opts.mapping,
            mipmap,
        }
    }
}

impl Texture<RGBSpectrum> for ImageTexture {
    fn evaluate(&self, si: &SurfaceInteraction) -> RGBSpectrum {
        let mut dstdx = Vec2F::default();
        let mut dstdy = Vec2F::default();
        let mut st = self.mapping.map(si, &mut dstdx, &mut dstdy);
        self.mipmap.filter(&mut st, &mut dstdx, &mut dstdy)
    }
}
