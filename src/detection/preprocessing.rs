use std::ops::RangeInclusive;

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use image::imageops::FilterType;

use crate::error::PoseError;

/// Fill value for the letterbox border.
pub const PAD_VALUE: u8 = 114;

/// Model input sides accepted by [`letterbox`].
pub const INPUT_SIZE_RANGE: RangeInclusive<u32> = 32..=8192;

/// Reject images and input sizes the letterbox cannot handle.
pub fn validate_input(img: &DynamicImage, size: u32) -> Result<(), PoseError> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(PoseError::InvalidInput(format!(
            "cannot run inference on an empty {}x{} image",
            width, height
        )));
    }
    if !INPUT_SIZE_RANGE.contains(&size) {
        return Err(PoseError::InvalidInput(format!(
            "model input size {} outside {}..={}",
            size,
            INPUT_SIZE_RANGE.start(),
            INPUT_SIZE_RANGE.end()
        )));
    }
    Ok(())
}

/// How a source image was fitted into the square model input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub pad_x: u32,
    pub pad_y: u32,
    pub resized_width: u32,
    pub resized_height: u32,
    pub size: u32,
}

impl Letterbox {
    /// Compute the aspect-preserving fit of `width x height` into `size x size`.
    ///
    /// Degenerate arguments are bumped to 1 pixel; use [`validate_input`]
    /// to reject them instead.
    pub fn fit(width: u32, height: u32, size: u32) -> Self {
        let (width, height, size) = (width.max(1), height.max(1), size.max(1));
        let scale = (size as f32 / width as f32).min(size as f32 / height as f32);
        let resized_width = ((width as f32 * scale).round() as u32).clamp(1, size);
        let resized_height = ((height as f32 * scale).round() as u32).clamp(1, size);
        Self {
            scale,
            pad_x: (size - resized_width) / 2,
            pad_y: (size - resized_height) / 2,
            resized_width,
            resized_height,
            size,
        }
    }

    /// Map a point in model-input space back to the source image.
    pub fn to_source(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x - self.pad_x as f32) / self.scale,
            (y - self.pad_y as f32) / self.scale,
        )
    }

    /// Map a length in model-input space back to the source image.
    pub fn length_to_source(&self, len: f32) -> f32 {
        len / self.scale
    }
}

/// Resize `img` into a padded square of side `size`.
pub fn letterbox(img: &DynamicImage, size: u32) -> (RgbImage, Letterbox) {
    let rgb = img.to_rgb8();
    let fit = Letterbox::fit(rgb.width(), rgb.height(), size);

    let resized = image::imageops::resize(
        &rgb,
        fit.resized_width,
        fit.resized_height,
        FilterType::Triangle,
    );

    let mut canvas = RgbImage::from_pixel(size, size, Rgb([PAD_VALUE; 3]));
    image::imageops::overlay(&mut canvas, &resized, fit.pad_x.into(), fit.pad_y.into());

    (canvas, fit)
}

/// Planar RGB values scaled to `[0, 1]`, laid out as `C x H x W`.
pub fn to_chw(img: &RgbImage) -> Vec<f32> {
    let (width, height) = img.dimensions();
    let plane = width as usize * height as usize;
    let mut data = vec![0.0f32; plane * 3];

    for (x, y, pixel) in img.enumerate_pixels() {
        let offset = y as usize * width as usize + x as usize;
        for c in 0..3 {
            data[c * plane + offset] = pixel[c] as f32 / 255.0;
        }
    }

    data
}
