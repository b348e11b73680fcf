use std::io::Cursor;

use image::{load_from_memory, DynamicImage, GrayImage, ImageBuffer, ImageFormat, Luma};
use imageproc::map::map_colors;
use log::debug;

use crate::utils::MenuError;

/// Half-size of the adaptive threshold window, in pixels.
pub const ADAPTIVE_WINDOW_HALF: u32 = 15;
/// Fraction of the local mean a pixel must exceed to become white.
pub const ADAPTIVE_MEAN_RATIO: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThresholdMode {
    Fixed(u8),
    Adaptive,
}

/// Named filter configuration applied on top of the grayscale conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterProfile {
    pub name: &'static str,
    pub contrast: f32,
    pub brightness: f32,
    pub threshold: ThresholdMode,
    pub denoise: bool,
    pub edge_enhancement: bool,
}

impl FilterProfile {
    /// High contrast binary threshold with median denoise.
    pub fn high_contrast() -> Self {
        FilterProfile {
            name: "high-contrast",
            contrast: 2.0,
            brightness: 0.8,
            threshold: ThresholdMode::Fixed(128),
            denoise: true,
            edge_enhancement: false,
        }
    }

    /// Moderate contrast with Laplacian sharpening.
    pub fn edge_enhanced() -> Self {
        FilterProfile {
            name: "edge-enhanced",
            contrast: 1.5,
            brightness: 1.2,
            threshold: ThresholdMode::Fixed(150),
            denoise: false,
            edge_enhancement: true,
        }
    }

    /// Local-mean binarization.
    pub fn adaptive() -> Self {
        FilterProfile {
            name: "adaptive",
            contrast: 1.8,
            brightness: 1.0,
            threshold: ThresholdMode::Adaptive,
            denoise: false,
            edge_enhancement: false,
        }
    }

    pub fn standard_profiles() -> Vec<FilterProfile> {
        vec![Self::high_contrast(), Self::edge_enhanced(), Self::adaptive()]
    }
}

/// A processed raster derived from the source photograph.
#[derive(Debug, Clone)]
pub struct ImageVariant {
    pub id: usize,
    pub profile: &'static str,
    pub image: GrayImage,
}

impl ImageVariant {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encode the variant as PNG for engines that read image files.
    pub fn to_png(&self) -> Result<Vec<u8>, MenuError> {
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        DynamicImage::ImageLuma8(self.image.clone())
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|e| {
                MenuError::OcrEngineError(format!("Failed to encode variant {}: {}", self.id, e))
            })?;
        Ok(buffer)
    }
}

/// Produces several differently filtered versions of one input image.
pub struct ImageVariantGenerator {
    profiles: Vec<FilterProfile>,
}

impl Default for ImageVariantGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageVariantGenerator {
    pub fn new() -> Self {
        Self::with_profiles(FilterProfile::standard_profiles())
    }

    pub fn with_profiles(profiles: Vec<FilterProfile>) -> Self {
        ImageVariantGenerator { profiles }
    }

    pub fn profiles(&self) -> &[FilterProfile] {
        &self.profiles
    }

    /// Decode the image and build one variant per profile. Decoding failures are fatal.
    pub fn generate(&self, image_data: &[u8]) -> Result<Vec<ImageVariant>, MenuError> {
        let img = load_from_memory(image_data)
            .map_err(|e| MenuError::ImageDecodeError(format!("Failed to load image: {}", e)))?;

        let gray = Self::to_grayscale(&img);
        debug!(
            "Decoded {}x{} image, building {} variants",
            gray.width(),
            gray.height(),
            self.profiles.len()
        );

        Ok(self
            .profiles
            .iter()
            .enumerate()
            .map(|(id, profile)| ImageVariant {
                id,
                profile: profile.name,
                image: Self::apply_profile(&gray, profile),
            })
            .collect())
    }

    /// Luma conversion with 0.299R + 0.587G + 0.114B weights.
    pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
        let rgb = img.to_rgb8();
        map_colors(&rgb, |p| {
            let luma = 0.299 * p[0] as f32 + 0.587 * p[1] as f32 + 0.114 * p[2] as f32;
            Luma([luma.round().clamp(0.0, 255.0) as u8])
        })
    }

    fn apply_profile(gray: &GrayImage, profile: &FilterProfile) -> GrayImage {
        let mut filtered = gray.clone();
        if profile.denoise {
            filtered = median_denoise(&filtered);
        }
        if profile.edge_enhancement {
            filtered = laplacian_sharpen(&filtered);
        }

        let adjusted = adjust_levels(&filtered, profile.contrast, profile.brightness);

        match profile.threshold {
            ThresholdMode::Fixed(level) => {
                map_colors(&adjusted, |p| Luma([if p[0] > level { 255 } else { 0 }]))
            }
            ThresholdMode::Adaptive => {
                adaptive_threshold(&adjusted, ADAPTIVE_WINDOW_HALF, ADAPTIVE_MEAN_RATIO)
            }
        }
    }
}

/// Contrast around mid-gray followed by a brightness multiplier.
pub fn adjust_levels(img: &GrayImage, contrast: f32, brightness: f32) -> GrayImage {
    map_colors(img, |p| {
        let value = ((p[0] as f32 - 128.0) * contrast + 128.0) * brightness;
        Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}

/// 3x3 median filter. The one pixel border is copied unchanged.
pub fn median_denoise(img: &GrayImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut result = img.clone();
    if width < 3 || height < 3 {
        return result;
    }

    let mut window = [0u8; 9];
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut i = 0;
            for ny in y - 1..=y + 1 {
                for nx in x - 1..=x + 1 {
                    window[i] = img.get_pixel(nx, ny)[0];
                    i += 1;
                }
            }
            window.sort_unstable();
            result.put_pixel(x, y, Luma([window[4]]));
        }
    }
    result
}

/// 4-neighbour Laplacian sharpening: center + 0.5 * laplacian, clamped.
pub fn laplacian_sharpen(img: &GrayImage) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut result = img.clone();
    if width < 3 || height < 3 {
        return result;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let center = img.get_pixel(x, y)[0] as f32;
            let neighbours = img.get_pixel(x, y - 1)[0] as f32
                + img.get_pixel(x - 1, y)[0] as f32
                + img.get_pixel(x + 1, y)[0] as f32
                + img.get_pixel(x, y + 1)[0] as f32;
            let laplacian = 4.0 * center - neighbours;
            let enhanced = (center + 0.5 * laplacian).clamp(0.0, 255.0);
            result.put_pixel(x, y, Luma([enhanced as u8]));
        }
    }
    result
}

/// Binarize against `ratio` times the mean of a window clamped to the image bounds.
pub fn adaptive_threshold(img: &GrayImage, half_window: u32, ratio: f32) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut result = ImageBuffer::new(width, height);
    if width == 0 || height == 0 {
        return result;
    }

    // Summed-area table, one extra row and column of zeros.
    let stride = width as usize + 1;
    let mut sums = vec![0u64; stride * (height as usize + 1)];
    for y in 0..height as usize {
        let mut row = 0u64;
        for x in 0..width as usize {
            row += img.get_pixel(x as u32, y as u32)[0] as u64;
            sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row;
        }
    }

    for y in 0..height {
        for x in 0..width {
            let x0 = x.saturating_sub(half_window) as usize;
            let y0 = y.saturating_sub(half_window) as usize;
            let x1 = std::cmp::min(x + half_window, width - 1) as usize + 1;
            let y1 = std::cmp::min(y + half_window, height - 1) as usize + 1;

            let sum = sums[y1 * stride + x1] + sums[y0 * stride + x0]
                - sums[y0 * stride + x1]
                - sums[y1 * stride + x0];
            let count = ((x1 - x0) * (y1 - y0)) as f32;
            let threshold = (sum as f32 / count) * ratio;

            let value = img.get_pixel(x, y)[0] as f32;
            result.put_pixel(x, y, Luma([if value > threshold { 255 } else { 0 }]));
        }
    }
    result
}
