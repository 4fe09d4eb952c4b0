//! 主题提示词解析
//!
//! 根据主题与强度选择预置提示词, 强度先吸附到提示词表的步长,
//! 未配置的主题返回带有主题名与强度的占位文本。

mod city;

mod theme;
pub use theme::Theme;

mod table;
pub use table::{city_table, PromptTable, StepResolution};

use log::debug;

/// 强度量化
pub fn quantize(strength: f64, resolution: StepResolution) -> f64 {
    resolution.quantize(strength)
}

/// 解析提示词
pub fn resolve(theme: &str, strength: f64, resolution: StepResolution) -> String {
    let level = resolution.quantize(strength);

    let table = match theme.parse::<Theme>() {
        Ok(Theme::City) => city_table(resolution),
        _ => {
            debug!("theme {theme} has no prompt table, level {level}");
            return placeholder(theme, level, resolution);
        }
    };

    match table.nearest(level) {
        Some((_, prompt)) => prompt.to_string(),
        None => placeholder(theme, level, resolution),
    }
}

/// 占位提示词
fn placeholder(theme: &str, level: f64, resolution: StepResolution) -> String {
    let level = format_level(level);
    match resolution {
        StepResolution::Fine => {
            format!("This theme ({theme}) is coming soon. Current strength setting: {level}")
        }
        StepResolution::Coarse => format!(
            "This theme ({theme}) is coming soon. Using default prompt with strength level: {level}"
        ),
    }
}

/// 整数值保留一位小数, 例如 0.0 / 1.0
fn format_level(level: f64) -> String {
    if level.fract() == 0.0 {
        format!("{level:.1}")
    } else {
        format!("{level}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CITY_06_PREFIX: &str =
        "Futuristic white concept car interior, officepod workspace, premium ergonomic office chair";

    #[test]
    fn test_resolve_city_exact_level() {
        for resolution in [StepResolution::Fine, StepResolution::Coarse] {
            let prompt = resolve("City", 0.6, resolution);
            assert!(prompt.starts_with(CITY_06_PREFIX), "{prompt}");
        }
    }

    #[test]
    fn test_resolve_city_snaps_to_level() {
        assert_eq!(
            resolve("City", 0.61, StepResolution::Coarse),
            resolve("City", 0.6, StepResolution::Coarse)
        );
        assert!(resolve("City", 0.0, StepResolution::Coarse).starts_with("White car interior"));
        assert!(resolve("City", 1.0, StepResolution::Fine).contains("complete mobile office suite"));
    }

    #[test]
    fn test_resolve_midpoints() {
        // 0.1 与 0.5 在 Coarse 下为中点
        assert_eq!(
            resolve("City", 0.1, StepResolution::Coarse),
            resolve("City", 0.0, StepResolution::Coarse)
        );
        assert_eq!(
            resolve("City", 0.5, StepResolution::Coarse),
            resolve("City", 0.4, StepResolution::Coarse)
        );
        assert_eq!(
            resolve("City", 0.3, StepResolution::Coarse),
            resolve("City", 0.4, StepResolution::Coarse)
        );
    }

    #[test]
    fn test_resolve_is_idempotent() {
        for resolution in [StepResolution::Fine, StepResolution::Coarse] {
            for i in 0..=1000 {
                let strength = i as f64 / 1000.0;
                let prompt = resolve("City", strength, resolution);
                assert!(!prompt.is_empty());
                assert_eq!(
                    prompt,
                    resolve("City", quantize(strength, resolution), resolution),
                    "strength {strength}"
                );
            }
        }
    }

    #[test]
    fn test_resolve_placeholder_theme() {
        let prompt = resolve("Comfortability (Coming Soon)", 0.43, StepResolution::Coarse);
        assert!(prompt.contains("strength level: 0.4"), "{prompt}");
        assert!(prompt.contains("Comfortability (Coming Soon)"));

        let prompt = resolve("Travel (Coming Soon)", 0.33, StepResolution::Fine);
        assert_eq!(
            prompt,
            "This theme (Travel (Coming Soon)) is coming soon. Current strength setting: 0.35"
        );
    }

    #[test]
    fn test_resolve_unknown_theme() {
        let prompt = resolve("Desert", 0.05, StepResolution::Coarse);
        assert_eq!(
            prompt,
            "This theme (Desert) is coming soon. Using default prompt with strength level: 0.0"
        );
        let prompt = resolve("Desert", 1.0, StepResolution::Fine);
        assert!(prompt.ends_with("Current strength setting: 1.0"));
    }
}
