//! Image Optimizer - 基于 `image` crate 的图片优化
//!
//! - 静态图片：缩放到最大宽度以内，输出无损 WebP
//! - 多帧 GIF：逐帧缩放，保持帧延时，输出循环播放的 GIF

use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::imageops::FilterType;
use image::{AnimationDecoder, DynamicImage, Frame, ImageFormat};
use std::io::Cursor;

use crate::application::ports::{ImageError, ImageKind, ImageProcessorPort, ProcessedImage};

/// 图片优化配置
#[derive(Debug, Clone, Copy)]
pub struct ImageOptimizerConfig {
    /// 选项图片最大宽度
    pub item_max_width: u32,
    /// 封面图片最大宽度
    pub hero_max_width: u32,
}

impl Default for ImageOptimizerConfig {
    fn default() -> Self {
        Self {
            item_max_width: 800,
            hero_max_width: 1200,
        }
    }
}

/// 图片优化器
pub struct ImageOptimizer {
    config: ImageOptimizerConfig,
}

impl ImageOptimizer {
    pub fn new(config: ImageOptimizerConfig) -> Self {
        Self { config }
    }

    fn max_width(&self, kind: ImageKind) -> u32 {
        match kind {
            ImageKind::Item => self.config.item_max_width,
            ImageKind::Hero => self.config.hero_max_width,
        }
    }

    fn optimize_still(&self, data: &[u8], format: ImageFormat, max_width: u32) -> Result<ProcessedImage, ImageError> {
        let img = image::load_from_memory_with_format(data, format)
            .map_err(|e| ImageError::DecodeError(e.to_string()))?;

        let img = if img.width() > max_width {
            img.resize(max_width, u32::MAX, FilterType::Lanczos3)
        } else {
            img
        };
        let rgba = DynamicImage::ImageRgba8(img.to_rgba8());

        let mut out = Cursor::new(Vec::new());
        rgba.write_to(&mut out, ImageFormat::WebP)
            .map_err(|e| ImageError::EncodeError(e.to_string()))?;

        Ok(ProcessedImage {
            data: out.into_inner(),
            extension: "webp",
            width: rgba.width(),
            height: rgba.height(),
            animated: false,
        })
    }

    fn optimize_animation(&self, frames: Vec<Frame>, max_width: u32) -> Result<ProcessedImage, ImageError> {
        let (src_width, src_height) = frames[0].buffer().dimensions();
        let (width, height) = fit_width(src_width, src_height, max_width);

        let frames: Vec<Frame> = if width == src_width {
            frames
        } else {
            frames
                .into_iter()
                .map(|frame| {
                    let delay = frame.delay();
                    let resized =
                        image::imageops::resize(frame.buffer(), width, height, FilterType::Triangle);
                    Frame::from_parts(resized, 0, 0, delay)
                })
                .collect()
        };

        let mut data = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut data);
            encoder
                .set_repeat(Repeat::Infinite)
                .map_err(|e| ImageError::EncodeError(e.to_string()))?;
            encoder
                .encode_frames(frames)
                .map_err(|e| ImageError::EncodeError(e.to_string()))?;
        }

        Ok(ProcessedImage {
            data,
            extension: "gif",
            width,
            height,
            animated: true,
        })
    }
}

impl ImageProcessorPort for ImageOptimizer {
    fn optimize(&self, data: &[u8], kind: ImageKind) -> Result<ProcessedImage, ImageError> {
        let format = image::guess_format(data).map_err(|_| ImageError::UnsupportedFormat)?;
        let max_width = self.max_width(kind);

        if format == ImageFormat::Gif {
            let decoder = GifDecoder::new(Cursor::new(data))
                .map_err(|e| ImageError::DecodeError(e.to_string()))?;
            let frames = decoder
                .into_frames()
                .collect_frames()
                .map_err(|e| ImageError::DecodeError(e.to_string()))?;
            if frames.len() > 1 {
                let processed = self.optimize_animation(frames, max_width)?;
                tracing::debug!(
                    width = processed.width,
                    height = processed.height,
                    size = processed.data.len(),
                    "Animated image optimized"
                );
                return Ok(processed);
            }
        }

        let processed = self.optimize_still(data, format, max_width)?;
        tracing::debug!(
            width = processed.width,
            height = processed.height,
            input = data.len(),
            output = processed.data.len(),
            "Image optimized"
        );
        Ok(processed)
    }

    fn detect_extension(&self, data: &[u8]) -> Result<&'static str, ImageError> {
        match image::guess_format(data) {
            Ok(ImageFormat::WebP) => Ok("webp"),
            Ok(ImageFormat::Gif) => Ok("gif"),
            Ok(ImageFormat::Png) => Ok("png"),
            Ok(ImageFormat::Jpeg) => Ok("jpg"),
            _ => Err(ImageError::UnsupportedFormat),
        }
    }
}

/// 等比缩放到最大宽度以内
fn fit_width(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width {
        return (width, height);
    }
    let scaled = (height as u64 * max_width as u64 + width as u64 / 2) / width as u64;
    (max_width, scaled.max(1) as u32)
}
