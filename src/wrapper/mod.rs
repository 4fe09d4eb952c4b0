// python 包装
pub mod comfy;
pub mod comfyui;
pub mod torch;
