//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod image;
pub mod storage;

pub use self::image::*;
pub use storage::*;
