use crate::{base::constants::Float, geometries::point2::Point2I};

pub const NUM_CHANNELS: usize = 3;

/// Texel lookup behavior outside an image's resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageWrapMode {
    Repeat,
    Black,
    Clamp,
}

/// A flat RGB raster: `resolution.x * resolution.y * NUM_CHANNELS` floats,
/// row-major. Backs [`crate::base::mipmap::MIPMap`]'s pyramid levels.
#[derive(Debug, Clone)]
pub struct Image {
    pub resolution: Point2I,
    pub pixels: Vec<Float>,
}

impl Image {
    pub fn new(resolution: Point2I, pixels: Vec<Float>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (resolution.x * resolution.y) as usize * NUM_CHANNELS
        );
        Self { resolution, pixels }
    }

    pub fn read(path: &str) -> Self {
        let decoded = image::open(path)
            .unwrap_or_else(|err| panic!("failed to read image {path}: {err}"))
            .into_rgb32f();
        let (width, height) = decoded.dimensions();

        let mut pixels = Vec::with_capacity((width * height) as usize * NUM_CHANNELS);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&decoded.get_pixel(x, y).0);
            }
        }

        Self::new(Point2I::new(width as i32, height as i32), pixels)
    }

    pub fn write(resolution: Point2I, pixels: Vec<Float>, filename: &str) {
        let (width, height) = (resolution.x as u32, resolution.y as u32);
        let mut buffer = image::Rgb32FImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let offset = ((y * width + x) as usize) * NUM_CHANNELS;
                buffer.put_pixel(
                    x,
                    y,
                    image::Rgb([pixels[offset], pixels[offset + 1], pixels[offset + 2]]),
                );
            }
        }
        buffer
            .save(filename)
            .unwrap_or_else(|err| panic!("failed to write image {filename}: {err}"));
    }

    pub fn pixel_offset(&self, p: &Point2I) -> usize {
        ((p.y * self.resolution.x + p.x) as usize) * NUM_CHANNELS
    }

    pub fn get_channel(&self, p: &Point2I, channel: usize, wrap_mode: ImageWrapMode) -> Float {
        match self.resolve(p, wrap_mode) {
            Some(resolved) => self.pixels[self.pixel_offset(&resolved) + channel],
            None => 0.0,
        }
    }

    fn resolve(&self, p: &Point2I, wrap_mode: ImageWrapMode) -> Option<Point2I> {
        let wrap = |v: i32, size: i32| match wrap_mode {
            ImageWrapMode::Repeat => Some(v.rem_euclid(size)),
            ImageWrapMode::Clamp => Some(v.clamp(0, size - 1)),
            ImageWrapMode::Black => (v >= 0 && v < size).then_some(v),
        };
        Some(Point2I::new(
            wrap(p.x, self.resolution.x)?,
            wrap(p.y, self.resolution.y)?,
        ))
    }

    /// Box-filtered mip chain down to a 1x1 level.
    pub fn generate_pyramid(image: Image) -> Vec<Image> {
        let mut pyramid = vec![image];
        loop {
            let prev = pyramid.last().unwrap();
            if prev.resolution.x <= 1 && prev.resolution.y <= 1 {
                break;
            }

            let new_width = (prev.resolution.x / 2).max(1);
            let new_height = (prev.resolution.y / 2).max(1);
            let mut pixels = vec![0.0; (new_width * new_height) as usize * NUM_CHANNELS];

            for y in 0..new_height {
                for x in 0..new_width {
                    for c in 0..NUM_CHANNELS {
                        let mut sum = 0.0;
                        for dy in 0..2 {
                            for dx in 0..2 {
                                let sx = (x * 2 + dx).min(prev.resolution.x - 1);
                                let sy = (y * 2 + dy).min(prev.resolution.y - 1);
                                sum += prev.pixels[prev.pixel_offset(&Point2I::new(sx, sy)) + c];
                            }
                        }
                        pixels[(y * new_width + x) as usize * NUM_CHANNELS + c] = sum / 4.0;
                    }
                }
            }

            pyramid.push(Image::new(Point2I::new(new_width, new_height), pixels));
        }
        pyramid
    }
}

pub fn inverse_gamma_correct(v: Float) -> Float {
    if v <= 0.04045 {
        v * 1.0 / 12.92
    } else {
        ((v + 0.055) * 1.0 / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn write_then_read_round_trips_within_hdr_tolerance() {
        let resolution = Point2I::new(4, 3);
        let mut pixels = Vec::with_capacity((4 * 3) as usize * NUM_CHANNELS);
        for y in 0..3 {
            for x in 0..4 {
                pixels.push(1.0 + x as Float / 4.0);
                pixels.push(1.0 + y as Float / 3.0);
                pixels.push(0.5);
            }
        }

        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("photon-forge-roundtrip-{nanos}.tiff"));
        let path = path.to_str().unwrap().to_string();

        Image::write(resolution, pixels.clone(), &path);
        let reloaded = Image::read(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(reloaded.resolution, resolution);
        for (original, reloaded) in pixels.iter().zip(reloaded.pixels.iter()) {
            let relative_error = (original - reloaded).abs() / original.max(1e-6);
            assert!(
                relative_error <= 1e-4,
                "original={original} reloaded={reloaded}"
            );
        }
    }
}
