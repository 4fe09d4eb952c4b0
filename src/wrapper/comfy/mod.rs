//! comfy 模块包装

pub mod clip;
pub mod node_helpers;
