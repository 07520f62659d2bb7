//! GIF animation of surface frames
//!
//! Frames are read in path order, optionally cropped to their central band
//! (the 3D projection leaves empty margins above and below the surface) and
//! written as an endlessly looping GIF.
//!
//! # Usage
//!
//! ```rust,ignore
//! use advect_rs::output::animation::{assemble_gif, AnimationConfig};
//!
//! let frames = layout.find_frames(&name)?;
//! assemble_gif(&frames, &layout.animation_path(&name), &AnimationConfig::default())?;
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame, GenericImageView};
use thiserror::Error;

/// Default delay between frames in milliseconds
pub const DEFAULT_DELAY_MS: u32 = 200;

/// Default number of horizontal bands an image is split into for cropping
pub const DEFAULT_CROP_DIVISIONS: u32 = 7;

/// Failure while assembling an animation
#[derive(Debug, Error)]
pub enum AnimationError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("no frames to animate")]
    NoFrames,

    /// Crop divisions below 3 or an image too small to crop
    #[error("invalid crop: {0}")]
    InvalidCrop(String),
}

/// Settings of [`assemble_gif`]
///
/// # Example
///
/// ```rust
/// use advect_rs::output::animation::AnimationConfig;
///
/// let config = AnimationConfig::default().delay_ms(100).without_crop();
/// assert_eq!(config.delay_ms, 100);
/// assert_eq!(config.crop_divisions, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationConfig {
    /// Delay between frames in milliseconds (default: 200)
    pub delay_ms: u32,

    /// Crop each frame to its central band when set (default: Some(7))
    pub crop_divisions: Option<u32>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            crop_divisions: Some(DEFAULT_CROP_DIVISIONS),
        }
    }
}

impl AnimationConfig {
    /// Builder pattern: set the frame delay
    pub fn delay_ms(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Builder pattern: set the crop divisions
    pub fn crop_divisions(mut self, divisions: u32) -> Self {
        self.crop_divisions = Some(divisions);
        self
    }

    /// Builder pattern: keep frames uncropped
    pub fn without_crop(mut self) -> Self {
        self.crop_divisions = None;
        self
    }
}

/// Keep rows `[h / d, (d - 1) * h / d)` of `image`, full width
///
/// # Errors
///
/// `InvalidCrop` when `divisions < 3` or the band is empty.
pub fn crop_central_band(
    image: &DynamicImage,
    divisions: u32,
) -> Result<DynamicImage, AnimationError> {
    if divisions < 3 {
        return Err(AnimationError::InvalidCrop(format!(
            "need at least 3 divisions, got {}",
            divisions
        )));
    }

    let (width, height) = image.dimensions();
    let top = height / divisions;
    let bottom = (u64::from(divisions - 1) * u64::from(height) / u64::from(divisions)) as u32;
    if bottom <= top {
        return Err(AnimationError::InvalidCrop(format!(
            "image of height {} has no central band with {} divisions",
            height, divisions
        )));
    }

    Ok(image.crop_imm(0, top, width, bottom - top))
}

/// Write `frames` as a looping GIF to `output`
///
/// Frames are sorted by path first. Parent directories of `output` are
/// created as needed. The GIF is encoded next to `output` and renamed into
/// place once every frame is written, so a failed run leaves no file behind.
///
/// # Errors
///
/// `NoFrames` for an empty list, otherwise the first read, crop or encode
/// failure.
pub fn assemble_gif(
    frames: &[PathBuf],
    output: &Path,
    config: &AnimationConfig,
) -> Result<(), AnimationError> {
    if frames.is_empty() {
        return Err(AnimationError::NoFrames);
    }

    let mut sorted = frames.to_vec();
    sorted.sort();

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let partial = partial_path(output);
    if let Err(error) = encode_frames(&sorted, &partial, config) {
        // The partial file may not exist yet
        let _ = std::fs::remove_file(&partial);
        return Err(error);
    }
    std::fs::rename(&partial, output)?;

    log::info!("Animation of {} frames written to {}", sorted.len(), output.display());
    Ok(())
}

/// `frames.gif` becomes `frames.gif.partial`
fn partial_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".partial");
    PathBuf::from(name)
}

fn encode_frames(
    frames: &[PathBuf],
    path: &Path,
    config: &AnimationConfig,
) -> Result<(), AnimationError> {
    let delay = Delay::from_numer_denom_ms(config.delay_ms, 1);
    let mut encoder = GifEncoder::new(BufWriter::new(File::create(path)?));
    encoder.set_repeat(Repeat::Infinite)?;

    for frame_path in frames {
        let image = image::open(frame_path)?;
        let image = match config.crop_divisions {
            Some(divisions) => crop_central_band(&image, divisions)?,
            None => image,
        };
        encoder.encode_frame(Frame::from_parts(image.to_rgba8(), 0, 0, delay))?;
        log::debug!("Added frame {}", frame_path.display());
    }

    // Flushes the trailer before the rename
    drop(encoder);
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================
