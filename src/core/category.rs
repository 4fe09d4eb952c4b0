//! 节点分类

/// Flux 条件
pub const CATEGORY_CONDITIONING_FLUX: &str = "advanced/conditioning/flux";
/// Kia 概念提示词
pub const CATEGORY_PROMPTS_KIA: &str = "prompts/kia_concept";
/// 图像预处理
pub const CATEGORY_IMAGE_PREPROCESSORS: &str = "image/preprocessors";
