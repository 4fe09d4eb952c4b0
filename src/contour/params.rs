//! 轮廓提取参数

use std::ops::RangeInclusive;

use crate::error::Error;

/// 参数取值范围: (默认值, 最小值, 最大值, 步长)
pub struct ParamSpec {
    pub default: u32,
    pub min: u32,
    pub max: u32,
    pub step: u32,
}

impl ParamSpec {
    const fn new(default: u32, min: u32, max: u32, step: u32) -> Self {
        Self {
            default,
            min,
            max,
            step,
        }
    }

    pub fn range(&self) -> RangeInclusive<u32> {
        self.min..=self.max
    }
}

pub const THRESHOLD: ParamSpec = ParamSpec::new(100, 0, 255, 1);
pub const MIN_CONTOUR_AREA: ParamSpec = ParamSpec::new(500, 10, 10000, 10);
pub const LINE_THICKNESS: ParamSpec = ParamSpec::new(3, 1, 10, 1);
pub const RESOLUTION: ParamSpec = ParamSpec::new(512, 64, 2048, 8);

/// 轮廓提取参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContourParameters {
    /// 二值化阈值, 大于该值为前景
    pub threshold: u32,
    /// 最小轮廓面积, 面积不大于该值的轮廓被丢弃
    pub min_contour_area: u32,
    /// 轮廓线宽
    pub line_thickness: u32,
    /// 长边目标尺寸
    pub resolution: u32,
}

impl Default for ContourParameters {
    fn default() -> Self {
        Self {
            threshold: THRESHOLD.default,
            min_contour_area: MIN_CONTOUR_AREA.default,
            line_thickness: LINE_THICKNESS.default,
            resolution: RESOLUTION.default,
        }
    }
}

impl ContourParameters {
    /// 校验每个参数是否在取值范围内
    pub fn validate(&self) -> Result<(), Error> {
        let fields = [
            ("threshold", self.threshold, &THRESHOLD),
            ("min_contour_area", self.min_contour_area, &MIN_CONTOUR_AREA),
            ("line_thickness", self.line_thickness, &LINE_THICKNESS),
            ("resolution", self.resolution, &RESOLUTION),
        ];

        for (name, value, spec) in fields {
            if !spec.range().contains(&value) {
                return Err(Error::InvalidParameter(format!(
                    "{name} must be in [{}, {}], got {value}",
                    spec.min, spec.max
                )));
            }
        }
        Ok(())
    }
}
