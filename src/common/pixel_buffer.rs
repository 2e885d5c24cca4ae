use std::path::Path;
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use crate::data::{PipelineError, PipelineResult};

/// Sample layout of a [`PixelBuffer`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb8,
    #[default] Rgba8,
}

impl PixelFormat {
    pub fn channels(&self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// Decoded source image: interleaved 8-bit RGB or RGBA samples, row-major.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl From<RgbImage> for PixelBuffer {
    fn from(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            format: PixelFormat::Rgb8,
            data: image.into_raw(),
        }
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            format: PixelFormat::Rgba8,
            data: image.into_raw(),
        }
    }
}

impl From<GrayImage> for PixelBuffer {
    fn from(image: GrayImage) -> Self {
        Self::from(DynamicImage::from(image).to_rgb8())
    }
}

impl From<DynamicImage> for PixelBuffer {
    fn from(image: DynamicImage) -> Self {
        if image.color().has_alpha() {
            Self::from(image.into_rgba8())
        } else {
            Self::from(image.into_rgb8())
        }
    }
}

impl PixelBuffer {
    /// Wraps raw interleaved samples. The buffer must hold exactly
    /// `width * height * channels` bytes.
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> PipelineResult<Self> {
        let expected = width as usize * height as usize * format.channels();
        if data.len() != expected {
            return Err(PipelineError::Preprocess(format!(
                "pixel buffer holds {} bytes, expected {} for {}x{} {:?}",
                data.len(), expected, width, height, format
            )));
        }
        Ok(Self { width, height, format, data })
    }

    /// Buffer where every pixel is `rgb`, handy for synthetic inputs.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let data = rgb.repeat(width as usize * height as usize);
        Self {
            width,
            height,
            format: PixelFormat::Rgb8,
            data,
        }
    }

    /// Decodes an encoded image (PNG, JPEG, ...) on a blocking task.
    pub async fn decode(bytes: Vec<u8>) -> PipelineResult<Self> {
        let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
            .await
            .map_err(|err| PipelineError::Preprocess(format!("image decode task failed: {err}")))?;
        decoded
            .map(Self::from)
            .map_err(|err| PipelineError::Preprocess(format!("failed to decode image: {err}")))
    }

    /// Reads and decodes the image file at `path`.
    pub async fn open(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| PipelineError::Preprocess(format!("failed to read {}: {err}", path.display())))?;
        Self::decode(bytes).await
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Sample of channel `c` at pixel `(x, y)`. Callers keep `x`, `y` and
    /// `c` in range.
    #[inline]
    pub fn sample(&self, x: usize, y: usize, c: usize) -> u8 {
        self.data[(y * self.width as usize + x) * self.channels() + c]
    }
}
