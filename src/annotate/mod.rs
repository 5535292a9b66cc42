//! Overlays drawn onto a copy of the analysed image.

pub mod bbox;
pub mod edge;
pub mod skeleton;
pub mod vertex;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use image::{DynamicImage, Rgb, RgbImage};

use crate::error::PoseError;
use crate::models::KeyPoints;

pub use bbox::BoxAnnotator;
pub use edge::EdgeAnnotator;
pub use skeleton::Skeleton;
pub use vertex::VertexAnnotator;

/// Something that draws keypoints onto a scene.
pub trait Annotator: Send + Sync {
    fn annotate(&self, scene: &mut RgbImage, key_points: &KeyPoints);

    /// Human-readable name for this annotator (used in debug output)
    fn name(&self) -> &str;
}

/// Copy `scene` and run every annotator over the copy, in order.
///
/// `after_step` sees the canvas after each annotator; an error from it
/// stops the remaining annotators.
pub fn annotate_copy<F>(
    scene: &DynamicImage,
    key_points: &KeyPoints,
    annotators: &[Arc<dyn Annotator>],
    mut after_step: F,
) -> anyhow::Result<RgbImage>
where
    F: FnMut(usize, &dyn Annotator, &RgbImage) -> anyhow::Result<()>,
{
    let mut canvas = scene.to_rgb8();
    for (idx, annotator) in annotators.iter().enumerate() {
        log::debug!("running annotator: {}", annotator.name());
        annotator.annotate(&mut canvas, key_points);
        after_step(idx, annotator.as_ref(), &canvas)?;
    }
    Ok(canvas)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const YELLOW: Color = Color::new(255, 255, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const ROBOFLOW: Color = Color::new(0xA3, 0x51, 0xFB);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(hex: &str) -> Result<Self, PoseError> {
        let invalid = || PoseError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl FromStr for Color {
    type Err = PoseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" => Ok(Self::RED),
            "green" => Ok(Self::GREEN),
            "blue" => Ok(Self::BLUE),
            "yellow" => Ok(Self::YELLOW),
            "white" => Ok(Self::WHITE),
            "black" => Ok(Self::BLACK),
            "roboflow" => Ok(Self::ROBOFLOW),
            other => Self::from_hex(other),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Color> for Rgb<u8> {
    fn from(color: Color) -> Self {
        Rgb([color.r, color.g, color.b])
    }
}
