//! 工具
pub mod area;
pub use area::resize_area;

pub mod image;
pub use image::{image_to_tensor, tensor_to_image};
