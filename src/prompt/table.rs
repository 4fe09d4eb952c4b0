//! 提示词表

use lazy_static::lazy_static;
use strum_macros::{Display, EnumString};

use crate::prompt::city::CITY_PROMPTS;

/// 强度量化步长
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum StepResolution {
    /// 0.05
    Fine,
    /// 0.2
    Coarse,
}

impl StepResolution {
    /// 每 1.0 强度包含的步数
    pub fn factor(&self) -> u32 {
        match self {
            StepResolution::Fine => 20,
            StepResolution::Coarse => 5,
        }
    }

    /// 将强度吸附到最近的步长
    ///
    /// 中点向偶数步取整, 例如 Coarse 下 0.1 -> 0.0, 0.5 -> 0.4
    pub fn quantize(&self, strength: f64) -> f64 {
        let factor = self.factor() as f64;
        (strength * factor).round_ties_even() / factor
    }
}

/// 强度等级到提示词的只读映射, 按等级升序
#[derive(Debug, Clone)]
pub struct PromptTable {
    entries: Vec<(f64, &'static str)>,
}

impl PromptTable {
    /// City 主题
    fn city(resolution: StepResolution) -> Self {
        let factor = resolution.factor();
        let stride = (CITY_PROMPTS.len() as u32 - 1) / factor;

        let entries = (0..=factor)
            .map(|i| {
                (
                    i as f64 / factor as f64,
                    CITY_PROMPTS[(i * stride) as usize],
                )
            })
            .collect();
        Self { entries }
    }

    /// 精确匹配
    pub fn get(&self, level: f64) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(key, _)| *key == level)
            .map(|(_, prompt)| *prompt)
    }

    /// 最近的等级
    ///
    /// 距离相同时取靠前的等级
    pub fn nearest(&self, level: f64) -> Option<(f64, &'static str)> {
        if let Some(prompt) = self.get(level) {
            return Some((level, prompt));
        }

        self.entries
            .iter()
            .min_by(|(a, _), (b, _)| (a - level).abs().total_cmp(&(b - level).abs()))
            .copied()
    }
}

lazy_static! {
    static ref CITY_FINE: PromptTable = PromptTable::city(StepResolution::Fine);
    static ref CITY_COARSE: PromptTable = PromptTable::city(StepResolution::Coarse);
}

/// City 主题提示词表
pub fn city_table(resolution: StepResolution) -> &'static PromptTable {
    match resolution {
        StepResolution::Fine => &CITY_FINE,
        StepResolution::Coarse => &CITY_COARSE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(table: &PromptTable) -> Vec<f64> {
        table.entries.iter().map(|(level, _)| *level).collect()
    }

    #[test]
    fn test_table_levels() {
        let fine = city_table(StepResolution::Fine);
        let fine_levels = levels(fine);
        assert_eq!(fine_levels.len(), 21);
        assert_eq!(fine_levels[3], 0.15);
        assert_eq!(fine_levels[20], 1.0);

        let coarse = levels(city_table(StepResolution::Coarse));
        assert_eq!(coarse, vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn test_coarse_agrees_with_fine() {
        let fine = city_table(StepResolution::Fine);
        let coarse = city_table(StepResolution::Coarse);
        for level in levels(coarse) {
            assert_eq!(fine.get(level), coarse.get(level), "level {level}");
        }
    }

    #[test]
    fn test_quantize_ties_to_even() {
        let coarse = StepResolution::Coarse;
        assert_eq!(coarse.quantize(0.1), 0.0);
        assert_eq!(coarse.quantize(0.3), 0.4);
        assert_eq!(coarse.quantize(0.5), 0.4);
        assert_eq!(coarse.quantize(0.7), 0.8);
        assert_eq!(coarse.quantize(0.9), 0.8);
        assert_eq!(coarse.quantize(0.61), 0.6);
        assert_eq!(coarse.quantize(0.43), 0.4);

        let fine = StepResolution::Fine;
        assert_eq!(fine.quantize(0.025), 0.0);
        assert_eq!(fine.quantize(0.33), 0.35);
        assert_eq!(fine.quantize(1.0), 1.0);
    }

    #[test]
    fn test_nearest_out_of_range() {
        let coarse = city_table(StepResolution::Coarse);
        assert_eq!(coarse.nearest(1.4).map(|(l, _)| l), Some(1.0));
        assert_eq!(coarse.nearest(-0.4).map(|(l, _)| l), Some(0.0));
    }

    #[test]
    fn test_nearest_tie_takes_first() {
        // 0.1 与 0.0/0.2 等距
        let coarse = city_table(StepResolution::Coarse);
        assert_eq!(coarse.nearest(0.1).map(|(l, _)| l), Some(0.0));
        assert_eq!(coarse.nearest(0.5).map(|(l, _)| l), Some(0.4));
    }
}
