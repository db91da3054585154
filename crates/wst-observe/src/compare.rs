use std::path::Path;

use image::{ColorType, DynamicImage};
use tracing::{debug, info};

use crate::error::{ObserveError, Result};

/// Outcome of comparing two frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageDiff {
    Same,
    Different,
    /// Width, height or channel count differ; no distance is computed.
    SizeMismatch,
}

/// An 8-bit interleaved raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    channels: u8,
    samples: Vec<u8>,
}

impl Raster {
    /// Wrap raw samples. Returns `None` unless `samples` holds exactly
    /// `width * height * channels` bytes and `channels` is 1 to 4.
    pub fn from_samples(width: u32, height: u32, channels: u8, samples: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(channels as usize)?;
        if !(1..=4).contains(&channels) || samples.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    /// Decode an image file, keeping its channel layout.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| ObserveError::ImageDecode {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_image(image)
    }

    /// Reduce a decoded image to 8 bits per sample.
    pub fn from_image(image: DynamicImage) -> Result<Self> {
        let (width, height) = (image.width(), image.height());
        let channels = image.color().channel_count();
        let samples = match channels {
            1 => image.into_luma8().into_raw(),
            2 => image.into_luma_alpha8().into_raw(),
            3 => image.into_rgb8().into_raw(),
            4 => image.into_rgba8().into_raw(),
            other => return Err(ObserveError::UnsupportedChannels(other)),
        };
        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    /// Encode to `path`; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        image::save_buffer(
            path,
            &self.samples,
            self.width,
            self.height,
            self.color_type(),
        )
        .map_err(|source| ObserveError::ImageEncode {
            path: path.to_path_buf(),
            source,
        })
    }

    fn color_type(&self) -> ColorType {
        match self.channels {
            1 => ColorType::L8,
            2 => ColorType::La8,
            3 => ColorType::Rgb8,
            _ => ColorType::Rgba8,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    fn shape(&self) -> (u32, u32, u8) {
        (self.width, self.height, self.channels)
    }
}

/// Result of [`compare_rasters`].
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub outcome: ImageDiff,
    /// Euclidean distance over samples normalised to `[0, 1]`.
    /// `None` on size mismatch.
    pub norm: Option<f64>,
    /// Per-sample absolute difference, present only when the frames differ.
    pub diff: Option<Raster>,
}

/// Compare two rasters.
///
/// They are [`ImageDiff::Different`] when the distance strictly exceeds
/// `sensitivity`.
pub fn compare_rasters(a: &Raster, b: &Raster, sensitivity: f64) -> Comparison {
    if a.shape() != b.shape() {
        return Comparison {
            outcome: ImageDiff::SizeMismatch,
            norm: None,
            diff: None,
        };
    }

    let mut sum = 0f64;
    let mut samples = Vec::with_capacity(a.samples.len());
    for (&x, &y) in a.samples.iter().zip(&b.samples) {
        let delta = f64::from(x.abs_diff(y)) / 255.0;
        sum += delta * delta;
        samples.push((delta * 255.0).round() as u8);
    }
    let norm = sum.sqrt();

    if norm > sensitivity {
        Comparison {
            outcome: ImageDiff::Different,
            norm: Some(norm),
            diff: Some(Raster {
                width: a.width,
                height: a.height,
                channels: a.channels,
                samples,
            }),
        }
    } else {
        Comparison {
            outcome: ImageDiff::Same,
            norm: Some(norm),
            diff: None,
        }
    }
}

/// Compare two image files, writing the difference to `diff_path` when
/// they differ.
pub fn compare_images(
    path1: impl AsRef<Path>,
    path2: impl AsRef<Path>,
    diff_path: impl AsRef<Path>,
    sensitivity: f64,
) -> Result<ImageDiff> {
    let (path1, path2) = (path1.as_ref(), path2.as_ref());
    let first = Raster::open(path1)?;
    let second = Raster::open(path2)?;

    let comparison = compare_rasters(&first, &second, sensitivity);
    debug!(
        ?path1,
        ?path2,
        norm = ?comparison.norm,
        sensitivity,
        outcome = ?comparison.outcome,
        "compared images"
    );

    if let Some(diff) = &comparison.diff {
        let diff_path = diff_path.as_ref();
        diff.save(diff_path)?;
        info!(?diff_path, "wrote difference image");
    }
    Ok(comparison.outcome)
}
