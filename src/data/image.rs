//! Image loading for the dataset pipeline.
//!
//! Files are decoded strictly as JPEG, forced to three channels, resized to a
//! square and normalized to the [0, 1] range.

use std::path::Path;

use image::imageops::FilterType;
use image::{ImageFormat, RgbImage};
use ndarray::{Array3, ArrayView3};

use crate::error::EvalError;
use crate::Result;

/// Side length used when the caller does not pick one.
pub const DEFAULT_IMG_SIZE: u32 = 32;

/// A decoded image as an `(height, width, 3)` array of values in [0, 1].
///
/// Produced by [`load_image`]; there is no mutable access to the pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    pixels: Array3<f32>,
}

impl ImageTensor {
    /// `(height, width, channels)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.pixels.dim()
    }

    pub fn view(&self) -> ArrayView3<'_, f32> {
        self.pixels.view()
    }

    pub fn into_array(self) -> Array3<f32> {
        self.pixels
    }

    /// Converts back to 8-bit RGB so a renderer can display the sample.
    pub fn to_rgb_image(&self) -> RgbImage {
        let (h, w, _) = self.shape();
        RgbImage::from_fn(w as u32, h as u32, |x, y| {
            let px = |c: usize| (self.pixels[[y as usize, x as usize, c]] * 255.0).round().clamp(0.0, 255.0) as u8;
            image::Rgb([px(0), px(1), px(2)])
        })
    }
}

/// Reads `path`, decodes it as JPEG, resizes to `img_size × img_size` with
/// bilinear interpolation and divides every channel by 255.
///
/// Grayscale sources are expanded to RGB. Any read or decode failure is
/// reported as [`EvalError::Decode`].
pub fn load_image(path: impl AsRef<Path>, img_size: u32) -> Result<ImageTensor> {
    let path = path.as_ref();
    if img_size == 0 {
        return Err(EvalError::InvalidConfig("img_size must be at least 1".into()));
    }

    let bytes = std::fs::read(path).map_err(|e| EvalError::decode(path, e))?;
    let img = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg)
        .map_err(|e| EvalError::decode(path, e))?;
    let resized = img.resize_exact(img_size, img_size, FilterType::Triangle);
    let rgb = resized.to_rgb8();

    let side = img_size as usize;
    let values: Vec<f32> = rgb.into_raw().into_iter().map(|c| c as f32 / 255.0).collect();
    let pixels = Array3::from_shape_vec((side, side, 3), values)
        .map_err(|e| EvalError::ShapeMismatch(e.to_string()))?;

    Ok(ImageTensor { pixels })
}
