//! image 与 tensor 相互转换
//!
use candle_core::{DType, Device, Tensor};
use image::RgbImage;

use crate::error::Error;

/// 将张量转换为图像
///
/// samples: NHWC 或 HWC, 取值范围 [0, 1]
///
/// 只取第一个批次; 单通道复制为三通道, 四通道丢弃 alpha。
pub fn tensor_to_image(samples: &Tensor) -> Result<RgbImage, Error> {
    let sample = match samples.rank() {
        4 => samples.get(0)?,
        3 => samples.clone(),
        rank => {
            return Err(Error::InvalidTensorShape(format!(
                "Expected a 3D or 4D tensor, but got a {rank}D tensor"
            )))
        }
    };

    let (height, width, channels) = sample.dims3()?;
    let sample = match channels {
        1 => sample.repeat((1, 1, 3))?,
        3 => sample,
        4 => sample.narrow(2, 0, 3)?,
        c => return Err(Error::UnsupportedNumberOfChannels(c)),
    };

    let array = sample
        .to_device(&Device::Cpu)?
        .to_dtype(DType::F32)?
        .contiguous()?
        .flatten_all()?
        .to_vec1::<f32>()?;

    // 数值处理 (缩放 + clip + 类型转换)
    let data: Vec<u8> = array
        .iter()
        .map(|&x| (255.0 * x).clamp(0.0, 255.0) as u8)
        .collect();

    RgbImage::from_raw(width as u32, height as u32, data).ok_or(Error::ImageBuffer)
}

/// 将图像转换为张量
///
/// output: [1, H, W, 3]
pub fn image_to_tensor(image: &RgbImage, device: &Device) -> Result<Tensor, Error> {
    let (width, height) = image.dimensions();

    let data: Vec<f32> = image.as_raw().iter().map(|&v| v as f32 / 255.0).collect();
    let tensor = Tensor::from_vec(data, (1, height as usize, width as usize, 3), device)?;

    Ok(tensor)
}
