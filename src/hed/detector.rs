//! HED 边缘检测器

use std::path::PathBuf;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use hf_hub::api::sync::ApiBuilder;
use image::{imageops, GrayImage, ImageBuffer, Luma, RgbImage};
use log::{debug, info, warn};

use crate::{
    core::{config::PreprocessorConfig, utils::resize_area},
    error::Error,
};

use super::network::{ControlNetHed, DOWN_SAMPLINGS};

/// 最小边长, 保证每次下采样后尺寸不为 0
pub const MIN_SIDE: u32 = 1 << DOWN_SAMPLINGS;

/// 网络输入尺寸对齐
const DETECT_ALIGN: u32 = 64;

/// 网络输入尺寸
///
/// 短边缩放到 resolution, 长边不超过 2 * resolution, 宽高对齐到 64 的倍数
pub fn detect_size(width: u32, height: u32, resolution: u32) -> (u32, u32) {
    let resolution = resolution.max(DETECT_ALIGN) as f64;
    let short = width.min(height).max(1) as f64;
    let long = width.max(height).max(1) as f64;

    let scale = (resolution / short).min(2.0 * resolution / long);
    let align = |v: u32| {
        let v = v as f64 * scale / DETECT_ALIGN as f64;
        (v.round() as u32).max(1) * DETECT_ALIGN
    };
    (align(width), align(height))
}

/// 边缘检测结果
#[derive(Debug, Clone)]
pub enum EdgeDetection {
    /// 单通道边缘图, 与输入尺寸一致
    EdgeMap(GrayImage),
    /// 检测器不可用, 附带原因
    Unavailable(String),
}

/// 边缘检测器
pub trait EdgeDetector {
    fn detect(&mut self, image: &RgbImage) -> EdgeDetection;
}

/// HED 检测器
pub struct HedDetector {
    model: ControlNetHed,
    device: Device,
    detect_resolution: u32,
}

impl HedDetector {
    pub fn new(vb: VarBuilder, device: &Device, detect_resolution: u32) -> Result<Self, Error> {
        let model = ControlNetHed::new(vb)?;
        Ok(Self {
            model,
            device: device.clone(),
            detect_resolution,
        })
    }

    /// 加载预训练权重
    pub fn from_pretrained(config: &PreprocessorConfig, device: &Device) -> Result<Self, Error> {
        let weights = resolve_weights(config)?;
        info!("loading hed weights from {}", weights.display());

        let vb = VarBuilder::from_pth(&weights, DType::F32, device)?;
        Self::new(vb, device, config.hed_detect_resolution)
    }

    /// 计算边缘图, 与输入尺寸一致
    ///
    /// 网络在 detect_size 上运行, 结果双线性插值回输入尺寸
    pub fn edge_map(&self, image: &RgbImage) -> Result<GrayImage, Error> {
        let (width, height) = image.dimensions();
        if width.min(height) < MIN_SIDE {
            return Err(Error::InvalidParameter(format!(
                "image {width}x{height} is too small for hed, min side is {MIN_SIDE}"
            )));
        }

        let (detect_width, detect_height) = detect_size(width, height, self.detect_resolution);
        let detect_image = resize_area(image, detect_width, detect_height);
        let edges = self.forward(&detect_image)?;

        if edges.dimensions() == (width, height) {
            return Ok(edges);
        }
        Ok(imageops::resize(
            &edges,
            width,
            height,
            imageops::FilterType::Triangle,
        ))
    }

    /// 网络前向, 输出与输入尺寸一致的边缘图
    fn forward(&self, image: &RgbImage) -> Result<GrayImage, Error> {
        let (width, height) = image.dimensions();
        debug!("hed input {width}x{height}");

        // HWC u8 -> NCHW f32, 保持 0..255
        let data: Vec<f32> = image.as_raw().iter().map(|&v| v as f32).collect();
        let input = Tensor::from_vec(data, (height as usize, width as usize, 3), &self.device)?
            .permute((2, 0, 1))?
            .unsqueeze(0)?;

        let projections = self.model.forward(&input)?;
        let count = projections.len() as f32;

        let mut mean = vec![0f32; (width * height) as usize];
        for projection in projections {
            let (_, _, h, w) = projection.dims4()?;
            let values = projection
                .to_device(&Device::Cpu)?
                .flatten_all()?
                .to_vec1::<f32>()?;

            let map: ImageBuffer<Luma<f32>, Vec<f32>> =
                ImageBuffer::from_raw(w as u32, h as u32, values).ok_or(Error::ImageBuffer)?;
            let map = imageops::resize(&map, width, height, imageops::FilterType::Triangle);

            for (acc, v) in mean.iter_mut().zip(map.into_raw()) {
                *acc += v;
            }
        }

        let data: Vec<u8> = mean
            .into_iter()
            .map(|v| {
                let edge = 1.0 / (1.0 + (-v / count).exp());
                (edge * 255.0).clamp(0.0, 255.0) as u8
            })
            .collect();

        GrayImage::from_raw(width, height, data).ok_or(Error::ImageBuffer)
    }
}

impl EdgeDetector for HedDetector {
    fn detect(&mut self, image: &RgbImage) -> EdgeDetection {
        match self.edge_map(image) {
            Ok(edges) => EdgeDetection::EdgeMap(edges),
            Err(e) => {
                warn!("hed detect failed, {e}");
                EdgeDetection::Unavailable(e.to_string())
            }
        }
    }
}

/// 权重文件路径
///
/// 本地路径优先, 否则从 Hugging Face 下载。
fn resolve_weights(config: &PreprocessorConfig) -> Result<PathBuf, Error> {
    if let Some(path) = &config.hed_model_path {
        if !path.is_file() {
            return Err(Error::ModelNotFound(path.display().to_string()));
        }
        return Ok(path.clone());
    }

    let api = ApiBuilder::new().with_progress(false).build()?;
    let path = api
        .model(config.hed_repo.clone())
        .get(&config.hed_filename)?;
    Ok(path)
}

/// 延迟加载的 HED 检测器
///
/// 首次检测时加载权重, 加载失败时下次检测会重试。
pub struct LazyHedDetector {
    config: PreprocessorConfig,
    device: Device,
    detector: Option<HedDetector>,
}

impl LazyHedDetector {
    pub fn new(config: PreprocessorConfig, device: Device) -> Self {
        Self {
            config,
            device,
            detector: None,
        }
    }

    fn detector(&mut self) -> Result<&mut HedDetector, Error> {
        if self.detector.is_none() {
            let detector = HedDetector::from_pretrained(&self.config, &self.device)?;
            self.detector = Some(detector);
        }
        self.detector
            .as_mut()
            .ok_or_else(|| Error::OptionNone("hed detector".to_string()))
    }
}

impl EdgeDetector for LazyHedDetector {
    fn detect(&mut self, image: &RgbImage) -> EdgeDetection {
        match self.detector() {
            Ok(detector) => detector.detect(image),
            Err(e) => {
                warn!("hed model unavailable, {e}");
                EdgeDetection::Unavailable(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_detector(detect_resolution: u32) -> anyhow::Result<HedDetector> {
        let vb = VarBuilder::zeros(DType::F32, &Device::Cpu);
        Ok(HedDetector::new(vb, &Device::Cpu, detect_resolution)?)
    }

    #[test]
    fn test_zero_weights_edge_map() -> anyhow::Result<()> {
        let detector = zero_detector(64)?;
        let image = RgbImage::from_pixel(40, 24, image::Rgb([200, 10, 90]));

        let edges = detector.edge_map(&image)?;
        assert_eq!(edges.dimensions(), (40, 24));
        assert!(edges.pixels().all(|p| p.0[0] == 127));
        Ok(())
    }

    #[test]
    fn test_detect_size() {
        // 2048 长边的缩放结果, 网络输入短边为 512
        assert_eq!(detect_size(2048, 1365, 512), (768, 512));
        assert_eq!(detect_size(1365, 2048, 512), (512, 768));
        assert_eq!(detect_size(2048, 2048, 512), (512, 512));
        // 长边限制为 2 * resolution
        assert_eq!(detect_size(2048, 128, 512), (1024, 64));
        // 放大
        assert_eq!(detect_size(100, 60, 512), (832, 512));

        for (width, height) in [(2048, 1365), (2048, 64), (64, 2048), (333, 217), (16, 16)] {
            let (w, h) = detect_size(width, height, 512);
            assert!(w.min(h) <= 512, "{width}x{height} -> {w}x{h}");
            assert!(w.max(h) <= 1024, "{width}x{height} -> {w}x{h}");
            assert_eq!(w % 64, 0);
            assert_eq!(h % 64, 0);
        }
    }

    #[test]
    fn test_large_input_keeps_size() -> anyhow::Result<()> {
        let detector = zero_detector(64)?;
        let image = RgbImage::from_pixel(2048, 1365, image::Rgb([90, 180, 30]));

        let edges = detector.edge_map(&image)?;
        assert_eq!(edges.dimensions(), (2048, 1365));
        assert!(edges.pixels().all(|p| p.0[0] == 127));
        Ok(())
    }

    #[test]
    fn test_too_small_is_unavailable() -> anyhow::Result<()> {
        let mut detector = zero_detector(64)?;
        let image = RgbImage::new(64, 8);

        match detector.detect(&image) {
            EdgeDetection::Unavailable(reason) => assert!(reason.contains("too small")),
            EdgeDetection::EdgeMap(_) => panic!("expected unavailable"),
        }
        Ok(())
    }

    #[test]
    fn test_missing_local_weights() -> anyhow::Result<()> {
        let config = PreprocessorConfig {
            hed_model_path: Some(PathBuf::from("/nonexistent/ControlNetHED.pth")),
            ..Default::default()
        };
        let mut detector = LazyHedDetector::new(config, Device::Cpu);

        for _ in 0..2 {
            let result = detector.detect(&RgbImage::new(32, 32));
            assert!(matches!(result, EdgeDetection::Unavailable(_)));
            assert!(detector.detector.is_none());
        }
        Ok(())
    }
}
