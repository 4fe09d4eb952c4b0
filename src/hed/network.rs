//! ControlNet HED 网络
//!
//! 引用: https://github.com/lllyasviel/ControlNet-v1-1-nightly/blob/main/annotator/hed/__init__.py
//!
//! 权重键名与 ControlNetHED.pth 保持一致:
//! norm, block{1..5}.convs.{i}.weight/bias, block{1..5}.projection.weight/bias

use candle_core::{Result, Tensor};
use candle_nn::{conv2d, Conv2d, Conv2dConfig, Module, VarBuilder};

/// (输入通道, 输出通道, 卷积层数)
const BLOCKS: [(usize, usize, usize); 5] = [
    (3, 64, 2),
    (64, 128, 2),
    (128, 256, 3),
    (256, 512, 3),
    (512, 512, 3),
];

/// 下采样次数
pub const DOWN_SAMPLINGS: usize = BLOCKS.len() - 1;

struct DoubleConvBlock {
    convs: Vec<Conv2d>,
    projection: Conv2d,
}

impl DoubleConvBlock {
    fn new(
        vb: VarBuilder,
        input_channel: usize,
        output_channel: usize,
        layer_number: usize,
    ) -> Result<Self> {
        let cfg = Conv2dConfig {
            padding: 1,
            ..Default::default()
        };

        let vb_convs = vb.pp("convs");
        let mut convs = Vec::with_capacity(layer_number);
        convs.push(conv2d(input_channel, output_channel, 3, cfg, vb_convs.pp(0))?);
        for i in 1..layer_number {
            convs.push(conv2d(output_channel, output_channel, 3, cfg, vb_convs.pp(i))?);
        }

        let projection = conv2d(output_channel, 1, 1, Default::default(), vb.pp("projection"))?;

        Ok(Self { convs, projection })
    }

    /// 返回 (特征, 单通道投影)
    fn forward(&self, x: &Tensor, down_sampling: bool) -> Result<(Tensor, Tensor)> {
        let mut h = if down_sampling {
            x.max_pool2d(2)?
        } else {
            x.clone()
        };
        for conv in &self.convs {
            h = conv.forward(&h)?.relu()?;
        }
        let projection = self.projection.forward(&h)?;
        Ok((h, projection))
    }
}

/// ControlNetHED_Apache2
pub struct ControlNetHed {
    norm: Tensor,
    blocks: Vec<DoubleConvBlock>,
}

impl ControlNetHed {
    pub fn new(vb: VarBuilder) -> Result<Self> {
        let norm = vb.get((1, 3, 1, 1), "norm")?;

        let blocks = BLOCKS
            .iter()
            .enumerate()
            .map(|(i, &(input_channel, output_channel, layer_number))| {
                DoubleConvBlock::new(
                    vb.pp(format!("block{}", i + 1)),
                    input_channel,
                    output_channel,
                    layer_number,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { norm, blocks })
    }

    /// x: [1, 3, H, W], RGB, 取值 0..255
    ///
    /// 返回 5 个尺度的投影 [1, 1, h_i, w_i]
    pub fn forward(&self, x: &Tensor) -> Result<Vec<Tensor>> {
        let mut h = x.broadcast_sub(&self.norm)?;

        let mut projections = Vec::with_capacity(self.blocks.len());
        for (i, block) in self.blocks.iter().enumerate() {
            let (next, projection) = block.forward(&h, i > 0)?;
            h = next;
            projections.push(projection);
        }

        Ok(projections)
    }
}

#[cfg(test)]
mod tests {
    use candle_core::{DType, Device};

    use super::*;

    #[test]
    fn test_projection_scales() -> anyhow::Result<()> {
        let vb = VarBuilder::zeros(DType::F32, &Device::Cpu);
        let model = ControlNetHed::new(vb)?;

        let x = Tensor::zeros((1, 3, 32, 48), DType::F32, &Device::Cpu)?;
        let projections = model.forward(&x)?;

        let dims = projections
            .iter()
            .map(|p| p.dims4())
            .collect::<Result<Vec<_>>>()?;
        assert_eq!(
            dims,
            vec![
                (1, 1, 32, 48),
                (1, 1, 16, 24),
                (1, 1, 8, 12),
                (1, 1, 4, 6),
                (1, 1, 2, 3)
            ]
        );
        Ok(())
    }
}
