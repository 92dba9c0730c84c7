//! Animal photo classification adapter.
//!
//! The pretrained model is owned elsewhere and reached only through the
//! [`ModelLoader`] and [`Classifier`] traits. This module feeds it frames
//! from a [`FrameSource`] (a capture device or an uploaded picture) and turns
//! its raw predictions into emoji-labelled probability bars.

mod frame;
mod session;

pub use frame::{Frame, ResizeStrategy, StillImage, load_image, prepare_frame};
pub use session::{CaptureSession, SessionStatus, classify_once};

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Width of a rendered probability bar in cells.
pub const BAR_WIDTH: usize = 20;

/// One class score from the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub class_name: String,
    /// Probability in `0.0..=1.0`.
    pub probability: f32,
}

impl Prediction {
    pub fn new(class_name: impl Into<String>, probability: f32) -> Self {
        Self {
            class_name: class_name.into(),
            probability,
        }
    }
}

/// A loaded model.
pub trait Classifier: Send + Sync + 'static {
    /// Input size the model expects, `(width, height)`.
    fn input_size(&self) -> (u32, u32);

    /// Score one frame.
    fn predict(&self, frame: &Frame) -> Result<Vec<Prediction>>;
}

/// Loads a model, typically over the network.
pub trait ModelLoader: Send + Sync + 'static {
    type Model: Classifier;

    fn load(&self) -> Result<Self::Model>;
}

/// Supplier of frames to classify.
pub trait FrameSource: Send + 'static {
    /// Acquire the device or file.
    fn open(&mut self) -> Result<()>;

    /// Grab the current frame.
    fn next_frame(&mut self) -> Result<DynamicImage>;

    /// Release the device. Called once when a session stops.
    fn release(&mut self);
}

/// Emoji shown next to a class name.
pub fn emoji_for(class_name: &str) -> &'static str {
    let name = class_name.to_lowercase();
    let has = |needle: &str| name.contains(needle);
    if has("dog") || has("puppy") {
        "🐶"
    } else if has("cat") || has("kitten") {
        "🐱"
    } else if has("rabbit") || has("bunny") {
        "🐰"
    } else if has("fox") {
        "🦊"
    } else if has("bear") {
        "🐻"
    } else if has("hamster") {
        "🐹"
    } else {
        "🐾"
    }
}

/// A prediction ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRow {
    pub emoji: &'static str,
    pub label: String,
    pub probability: f32,
    /// Rounded percentage, `0..=100`.
    pub percent: u8,
    pub bar: String,
}

impl PredictionRow {
    /// `🐶 dog  ███████░░░ 72%` style line.
    pub fn line(&self) -> String {
        format!("{} {:<12} {} {:>3}%", self.emoji, self.label, self.bar, self.percent)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_percent(probability: f32) -> u8 {
    (probability.clamp(0.0, 1.0) * 100.0).round() as u8
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn bar(probability: f32) -> String {
    let filled = (probability.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Sort predictions by probability and format them for display.
pub fn format_predictions(predictions: &[Prediction]) -> Vec<PredictionRow> {
    let mut sorted: Vec<&Prediction> = predictions.iter().collect();
    sorted.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    sorted
        .into_iter()
        .map(|p| PredictionRow {
            emoji: emoji_for(&p.class_name),
            label: p.class_name.clone(),
            probability: p.probability,
            percent: to_percent(p.probability),
            bar: bar(p.probability),
        })
        .collect()
}
