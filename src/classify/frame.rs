//! Frame preparation for the classification model.

use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbImage};
use tracing::{debug, trace};

use crate::error::{LottoError, Result};

use super::FrameSource;

/// Strategy for resizing frames to the model's input size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResizeStrategy {
    /// Fit within bounds, keep aspect ratio, pad with black.
    Fit,
    /// Fill bounds, keep aspect ratio, crop the overflow.
    #[default]
    Fill,
    /// Stretch to the exact size.
    Stretch,
}

/// An RGB frame at the model's input size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    image: RgbImage,
}

impl Frame {
    pub const fn new(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub const fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Pixels normalised to `0.0..=1.0`, row-major RGB.
    pub fn normalized(&self) -> Vec<f32> {
        self.image
            .as_raw()
            .iter()
            .map(|&v| f32::from(v) / 255.0)
            .collect()
    }
}

/// Resize `img` to `width` x `height`.
pub fn prepare_frame(
    img: &DynamicImage,
    width: u32,
    height: u32,
    strategy: ResizeStrategy,
) -> Frame {
    let filter = image::imageops::FilterType::Triangle;
    trace!(?strategy, width, height, "Preparing frame");

    let rgb = match strategy {
        ResizeStrategy::Fit => {
            let resized = img.resize(width, height, filter).to_rgb8();
            let mut canvas = RgbImage::new(width, height);
            let (rw, rh) = resized.dimensions();
            let x = (width - rw) / 2;
            let y = (height - rh) / 2;
            image::imageops::overlay(&mut canvas, &resized, x.into(), y.into());
            canvas
        }
        ResizeStrategy::Fill => img.resize_to_fill(width, height, filter).to_rgb8(),
        ResizeStrategy::Stretch => img.resize_exact(width, height, filter).to_rgb8(),
    };
    Frame::new(rgb)
}

/// Load an image file.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    if !path.is_file() {
        return Err(LottoError::ImageNotFound {
            path: path.display().to_string(),
        });
    }
    let img = image::open(path).map_err(|e| LottoError::ImageProcessing(e.to_string()))?;
    debug!(path = %path.display(), width = img.width(), height = img.height(), "Image loaded");
    Ok(img)
}

/// A single uploaded picture served as an endless stream of one frame.
#[derive(Debug, Clone)]
pub struct StillImage {
    path: PathBuf,
    image: Option<DynamicImage>,
}

impl StillImage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            image: None,
        }
    }

    /// Source over an image already in memory.
    pub fn from_image(image: DynamicImage) -> Self {
        Self {
            path: PathBuf::new(),
            image: Some(image),
        }
    }
}

impl FrameSource for StillImage {
    fn open(&mut self) -> Result<()> {
        if self.image.is_none() {
            self.image = Some(load_image(&self.path)?);
        }
        Ok(())
    }

    fn next_frame(&mut self) -> Result<DynamicImage> {
        self.image
            .clone()
            .ok_or_else(|| LottoError::Classification("image source is not open".to_string()))
    }

    fn release(&mut self) {
        trace!(path = %self.path.display(), "Still image released");
    }
}
