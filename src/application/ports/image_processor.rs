//! Image Processor Port - 图片优化
//!
//! 定义上传图片的解码、缩放、重新编码接口

use thiserror::Error;

/// 图片处理错误
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeError(String),

    #[error("Failed to encode image: {0}")]
    EncodeError(String),
}

/// 图片用途，决定最大宽度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// 选项图片
    Item,
    /// 问卷封面
    Hero,
}

/// 处理后的图片
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub data: Vec<u8>,
    /// 输出文件扩展名（`webp` 或 `gif`）
    pub extension: &'static str,
    pub width: u32,
    pub height: u32,
    /// 是否为动图
    pub animated: bool,
}

/// Image Processor Port
///
/// CPU 密集，调用方应在阻塞线程池中执行
pub trait ImageProcessorPort: Send + Sync {
    /// 解码 → 按用途缩放 → 重新编码
    fn optimize(&self, data: &[u8], kind: ImageKind) -> Result<ProcessedImage, ImageError>;

    /// 识别图片格式，返回扩展名（用于校验导入的已处理图片）
    fn detect_extension(&self, data: &[u8]) -> Result<&'static str, ImageError>;
}
