//! Image Adapters

mod image_optimizer;

pub use image_optimizer::{ImageOptimizer, ImageOptimizerConfig};
