use std::sync::Mutex;

use crate::{
    base::{filter::Filter, spectrum::Spectrum},
    geometries::{bounds2::Bounds2F, point2::Point2F, vec2::Vec2F},
    io::image::Image,
    spectra::rgb::RGBSpectrum,
    utils::{atomic::AtomicFloat, math::Float},
};

const FILTER_TABLE_WIDTH: usize = 16;

#[derive(Debug)]
struct Pixel {
    xyz: [Float; 3],
    splat_xyz: [AtomicFloat; 3],
    filter_weight_sum: Float,
}

#[derive(Debug, Clone)]
pub struct FilmTilePixel {
    contribution_sum: RGBSpectrum,
    filter_weight_sum: Float,
}

pub struct Film {
    pub full_resolution: Point2F,
    pub diagonal: Float,
    pub filter: Box<dyn Filter>,
    pub filename: String,
    pub cropped_pixel_bounds: Bounds2F,
    pixels: Mutex<Vec<Pixel>>,
    filter_table: [Float; FILTER_TABLE_WIDTH * FILTER_TABLE_WIDTH],
    scale: Float,
    max_sample_luminance: Float,
}

pub struct FilmTile<'a> {
    pixel_bounds: Bounds2F,
    pixels: Vec<FilmTilePixel>,
    film: &'a Film,
}

pub struct FilmDescriptor {
    pub filename: String,
    pub x_resolution: Float,
    pub y_resolution: Float,
    pub crop_window: [Float; 4],
    pub scale: Float,
    pub diagonal: Float,
    pub max_sample_luminance: Float,
}

impl Film {
    pub fn create(descriptor: &FilmDescriptor, filter: Box<dyn Filter>) -> Self {
        Self::new(
            &Point2F::new(descriptor.x_resolution, descriptor.y_resolution),
            &Bounds2F::new(
                &Point2F::new(descriptor.crop_window[0], descriptor.crop_window[1]),
                &Point2F::new(descriptor.crop_window[2], descriptor.crop_window[3]),
            ),
            filter,
            descriptor.diagonal,
            descriptor.filename.clone(),
            descriptor.scale,
            descriptor.max_sample_luminance,
        )
    }

    pub fn new(
        resolution: &Point2F,
        crop_window: &Bounds2F,
        filter: Box<dyn Filter>,
        diagonal: Float,
        filename: String,
        scale: Float,
        max_sample_luminance: Float,
    ) -> Self {
        let diagonal = diagonal * 0.001;

        // Compute film image bounds.
        let cropped_pixel_bounds = Bounds2F::new(
            &Point2F::new(
                (resolution.x * crop_window.min.x).ceil(),
                (resolution.y * crop_window.min.y).ceil(),
            ),
            &Point2F::new(
                (resolution.x * crop_window.max.x).ceil(),
                (resolution.y * crop_window.max.y).ceil(),
            ),
        );

        // Allocate film image storage.
        let pixel_count = cropped_pixel_bounds.area() as usize;
        let mut pixels = Vec::with_capacity(pixel_count);
        for _ in 0..pixel_count {
            pixels.push(Pixel::default());
        }

        // Precompute filter weight table.
        let mut offset = 0;
        let mut filter_table = [0.0; FILTER_TABLE_WIDTH * FILTER_TABLE_WIDTH];
        for y in 0..FILTER_TABLE_WIDTH {
            for x in 0..FILTER_TABLE_WIDTH {
                let px = (x as Float + 0.5) * filter.radius().x / FILTER_TABLE_WIDTH as Float;
                let py = (y as Float + 0.5) * filter.radius().y / FILTER_TABLE_WIDTH as Float;
                filter_table[offset] = filter.evaluate(&Point2F::new(px, py));
                offset += 1;
            }
        }

        Self {
            full_resolution: *resolution,
            diagonal,
            filter,
            filename,
            cropped_pixel_bounds,
            pixels: Mutex::new(pixels),
            filter_table,
            scale,
            max_sample_luminance,
        }
    }

    pub fn get_sample_bounds(&self) -> Bounds2F {
        Bounds2F::new(
            &(self.cropped_pixel_bounds.min + Vec2F::new(0.5, 0.5) - self.filter.radius()).floor(),
            &(self.cropped_pixel_bounds.max - Vec2F::new(0.5, 0.5) + self.filter.radius()).ceil(),
        )
    }

    pub fn get_film_tile(&self, sample_bounds: &Bounds2F) -> Box<FilmTile> {
        // Bound image pixels that samples in bounds contribute to.
        let half_pixel = Vec2F::new(0.5, 0.5);

        let p0 = (sample_bounds.min - half_pixel - self.filter.radius()).ceil();
        let p1 = (sample_bounds.max - half_pixel + self.filter.radius()).floor()
            + Point2F::new(1.0, 1.0);

        let pixel_bounds = Bounds2F::new(&p0, &p1).intersect(&self.cropped_pixel_bounds);

        Box::new(FilmTile::new(pixel_bounds, self))
    }

    /// Accumulates a worker thread's tile into the shared pixel grid. Locks
    /// the whole film for the duration; tiles are large enough relative to
    /// per-pixel work that contention is not a bottleneck.
    pub fn merge_film_tile(&self, tile: Box<FilmTile>) {
        let mut pixels = self.pixels.lock().unwrap();
        tile.pixel_bounds.traverse(|pixel| {
            let tile_pixel = tile.get_pixel_ref(&pixel);
            let offset = self.pixel_offset(&pixel);
            let merge = &mut pixels[offset];

            let mut xyz = [0.0; 3];
            tile_pixel.contribution_sum.to_xyz(&mut xyz);
            for i in 0..3 {
                merge.xyz[i] += xyz[i];
            }
            merge.filter_weight_sum += tile_pixel.filter_weight_sum;
        });
    }

    pub fn add_splat(&self, p: &Point2F, v: RGBSpectrum) {
        if !self.cropped_pixel_bounds.inside_exclusive(p) {
            return;
        }

        let mut v = v;
        if v.y() > self.max_sample_luminance {
            v *= self.max_sample_luminance / v.y();
        }

        let mut xyz = [0.0; 3];
        v.to_xyz(&mut xyz);

        let pixels = self.pixels.lock().unwrap();
        let pixel = &pixels[self.pixel_offset(p)];
        for i in 0..3 {
            pixel.splat_xyz[i].add(xyz[i]);
        }
    }

    /// Resolves accumulated contributions to final RGB and writes the image
    /// with the `image` crate.
    pub fn write_image(&self, splat_scale: Float) {
        let mut rgb = vec![0.0; 3 * self.pixels.lock().unwrap().len()];
        let pixels = self.pixels.lock().unwrap();

        for (offset, pixel) in pixels.iter().enumerate() {
            rgb[3 * offset..3 * offset + 3]
                .copy_from_slice(&self.resolve_pixel(pixel, splat_scale));
        }

        let resolution = self.cropped_pixel_bounds.diagonal();
        Image::write(
            crate::geometries::point2::Point2I::new(resolution.x as i32, resolution.y as i32),
            rgb,
            &self.filename,
        );
    }

    fn resolve_pixel(&self, pixel: &Pixel, splat_scale: Float) -> [Float; 3] {
        let mut xyz_to_rgb = [0.0; 3];
        crate::base::spectrum::xyz_to_rgb(&pixel.xyz, &mut xyz_to_rgb);

        let mut rgb = xyz_to_rgb;

        if pixel.filter_weight_sum != 0.0 {
            let inverse_weight = 1.0 / pixel.filter_weight_sum;
            for c in rgb.iter_mut() {
                *c = (*c * inverse_weight).max(0.0);
            }
        }

        let mut splat_rgb = [0.0; 3];
        let splat_xyz: [Float; 3] = [
            pixel.splat_xyz[0].load(),
            pixel.splat_xyz[1].load(),
            pixel.splat_xyz[2].load(),
        ];
        crate::base::spectrum::xyz_to_rgb(&splat_xyz, &mut splat_rgb);

        for c in 0..3 {
            rgb[c] += splat_scale * splat_rgb[c] / FILTER_TABLE_WIDTH as Float;
            rgb[c] *= self.scale;
        }

        rgb
    }

    fn pixel_offset(&self, p: &Point2F) -> usize {
        let width = self.cropped_pixel_bounds.max.x - self.cropped_pixel_bounds.min.x;
        ((p.x - self.cropped_pixel_bounds.min.x)
            + (p.y - self.cropped_pixel_bounds.min.y) * width) as usize
    }
}

impl<'a> FilmTile<'a> {
    pub fn new(pixel_bounds: Bounds2F, film: &'a Film) -> Self {
        Self {
            pixel_bounds,
            pixels: vec![FilmTilePixel::default(); pixel_bounds.area().max(0.0) as usize],
            film,
        }
    }

    pub fn add_sample(&mut self, sample: &Point2F, mut radiance: RGBSpectrum, sample_weight: Float) {
        if radiance.y() > self.film.max_sample_luminance {
            radiance *= self.film.max_sample_luminance / radiance.y();
        }

        // Compute sample's raster bounds.
        let sample = *sample - Vec2F::new(0.5, 0.5);
        let p0 = (sample - self.film.filter.radius())
            .ceil()
            .max(&self.pixel_bounds.min);
        let p1 = ((sample + self.film.filter.radius()).floor() + Point2F::new(1.0, 1.0))
            .min(&self.pixel_bounds.max);

        // Precompute x and y filter table offsets.
        let mut ix = vec![0; (p1.x as usize).saturating_sub(p0.x as usize)];
        for x in (p0.x as usize)..(p1.x as usize) {
            let v = ((x as Float - sample.x)
                * self.film.filter.inverse_radius().x
                * FILTER_TABLE_WIDTH as Float)
                .abs();
            ix[x - p0.x as usize] = (v.floor() as i32).min(FILTER_TABLE_WIDTH as i32 - 1);
        }
        let mut iy = vec![0; (p1.y as usize).saturating_sub(p0.y as usize)];
        for y in (p0.y as usize)..(p1.y as usize) {
            let v = ((y as Float - sample.y)
                * self.film.filter.inverse_radius().y
                * FILTER_TABLE_WIDTH as Float)
                .abs();
            iy[y - p0.y as usize] = (v.floor() as i32).min(FILTER_TABLE_WIDTH as i32 - 1);
        }

        // Loop over filter support and add sample to pixel arrays.
        for y in (p0.y as usize)..(p1.y as usize) {
            for x in (p0.x as usize)..(p1.x as usize) {
                // Evaluate filter value at pixel.
                let offset =
                    iy[y - p0.y as usize] * FILTER_TABLE_WIDTH as i32 + ix[x - p0.x as usize];
                let filter_weight = self.film.filter_table[offset as usize];

                // Update pixel values with filtered sample contribution.
                let pixel = self.get_pixel(&Point2F::new(x as Float, y as Float));
                pixel.contribution_sum += radiance * sample_weight * filter_weight;
                pixel.filter_weight_sum += filter_weight;
            }
        }
    }

    pub fn get_pixel(&mut self, point: &Point2F) -> &mut FilmTilePixel {
        let offset = self.pixel_offset(point);
        self.pixels.get_mut(offset).unwrap()
    }

    fn get_pixel_ref(&self, point: &Point2F) -> &FilmTilePixel {
        let offset = self.pixel_offset(point);
        &self.pixels[offset]
    }

    fn pixel_offset(&self, point: &Point2F) -> usize {
        debug_assert!(self.pixel_bounds.inside_exclusive(point));
        let width = self.pixel_bounds.max.x - self.pixel_bounds.min.x;
        ((point.x - self.pixel_bounds.min.x) + (point.y - self.pixel_bounds.min.y) * width)
            as usize
    }
}

impl Default for FilmDescriptor {
    fn default() -> Self {
        Self {
            filename: String::from("result.exr"),
            x_resolution: 1280.0,
            y_resolution: 720.0,
            crop_window: [0.0, 0.0, 1.0, 1.0],
            scale: 1.0,
            diagonal: 35.0,
            max_sample_luminance: Float::INFINITY,
        }
    }
}

impl Default for Pixel {
    fn default() -> Self {
        Self {
            xyz: [0.0; 3],
            splat_xyz: [
                AtomicFloat::new(0.0),
                AtomicFloat::new(0.0),
                AtomicFloat::new(0.0),
            ],
            filter_weight_sum: 0.0,
        }
    }
}

impl Default for FilmTilePixel {
    fn default() -> Self {
        Self {
            contribution_sum: RGBSpectrum::default(),
            filter_weight_sum: 0.0,
        }
    }
}
