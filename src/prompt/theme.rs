//! 提示词主题

use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// 提示词主题
///
/// 只有 City 配置了提示词, 其余主题返回占位文本
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, AsRefStr, EnumIter)]
pub enum Theme {
    #[strum(serialize = "City")]
    City,
    #[strum(serialize = "Comfortability (Coming Soon)")]
    Comfortability,
    #[strum(serialize = "Travel (Coming Soon)")]
    Travel,
}

impl Theme {
    /// 下拉框选项
    pub fn options() -> Vec<String> {
        use strum::IntoEnumIterator;
        Theme::iter().map(|theme| theme.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_parse() -> anyhow::Result<()> {
        assert_eq!("City".parse::<Theme>()?, Theme::City);
        assert_eq!(
            "Travel (Coming Soon)".parse::<Theme>()?,
            Theme::Travel
        );
        assert!("city".parse::<Theme>().is_err());
        Ok(())
    }

    #[test]
    fn test_theme_options() {
        assert_eq!(
            Theme::options(),
            vec![
                "City",
                "Comfortability (Coming Soon)",
                "Travel (Coming Soon)"
            ]
        );
    }
}
