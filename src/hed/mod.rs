//! HED 边缘检测

mod network;

mod detector;
pub use detector::{EdgeDetection, EdgeDetector, HedDetector, LazyHedDetector};

use candle_core::Device;

/// 默认推理设备, 优先 CUDA
pub fn default_device() -> Device {
    Device::cuda_if_available(0).unwrap_or(Device::Cpu)
}
