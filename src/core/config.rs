//! 预处理器配置
//!
//! 通过环境变量覆盖默认值:
//! - KIA_HED_MODEL_PATH: 本地 HED 权重文件, 优先于下载
//! - KIA_HED_REPO: Hugging Face 仓库
//! - KIA_HED_FILENAME: 仓库中的权重文件名
//! - KIA_HED_DETECT_RESOLUTION: HED 网络输入的短边尺寸
//! - KIA_DEBUG_DIR: 调试图片输出目录

use std::{env, path::PathBuf};

pub const ENV_HED_MODEL_PATH: &str = "KIA_HED_MODEL_PATH";
pub const ENV_HED_REPO: &str = "KIA_HED_REPO";
pub const ENV_HED_FILENAME: &str = "KIA_HED_FILENAME";
pub const ENV_HED_DETECT_RESOLUTION: &str = "KIA_HED_DETECT_RESOLUTION";
pub const ENV_DEBUG_DIR: &str = "KIA_DEBUG_DIR";

const DEFAULT_HED_REPO: &str = "lllyasviel/Annotators";
const DEFAULT_HED_FILENAME: &str = "ControlNetHED.pth";
pub const DEFAULT_HED_DETECT_RESOLUTION: u32 = 512;
const DEFAULT_DEBUG_DIR: &str = "debug_output/hed_contour";

/// 预处理器配置
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessorConfig {
    pub hed_model_path: Option<PathBuf>,
    pub hed_repo: String,
    pub hed_filename: String,
    pub hed_detect_resolution: u32,
    pub debug_dir: PathBuf,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            hed_model_path: None,
            hed_repo: DEFAULT_HED_REPO.to_string(),
            hed_filename: DEFAULT_HED_FILENAME.to_string(),
            hed_detect_resolution: DEFAULT_HED_DETECT_RESOLUTION,
            debug_dir: PathBuf::from(DEFAULT_DEBUG_DIR),
        }
    }
}

impl PreprocessorConfig {
    /// 从环境变量读取, 空值视为未设置
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let default = Self::default();

        Self {
            hed_model_path: get(ENV_HED_MODEL_PATH).map(PathBuf::from),
            hed_repo: get(ENV_HED_REPO).unwrap_or(default.hed_repo),
            hed_filename: get(ENV_HED_FILENAME).unwrap_or(default.hed_filename),
            hed_detect_resolution: get(ENV_HED_DETECT_RESOLUTION)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default.hed_detect_resolution),
            debug_dir: get(ENV_DEBUG_DIR)
                .map(PathBuf::from)
                .unwrap_or(default.debug_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = PreprocessorConfig::from_lookup(|_| None);
        assert_eq!(config, PreprocessorConfig::default());
        assert_eq!(config.hed_repo, "lllyasviel/Annotators");
    }

    #[test]
    fn test_overrides() {
        let vars = HashMap::from([
            (ENV_HED_MODEL_PATH, "/models/annotators/ControlNetHED.pth"),
            (ENV_HED_REPO, "  "),
            (ENV_DEBUG_DIR, "/tmp/contour"),
            (ENV_HED_DETECT_RESOLUTION, "384"),
        ]);
        let config = PreprocessorConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(
            config.hed_model_path,
            Some(PathBuf::from("/models/annotators/ControlNetHED.pth"))
        );
        assert_eq!(config.hed_repo, DEFAULT_HED_REPO);
        assert_eq!(config.hed_filename, DEFAULT_HED_FILENAME);
        assert_eq!(config.debug_dir, PathBuf::from("/tmp/contour"));
        assert_eq!(config.hed_detect_resolution, 384);
    }

    #[test]
    fn test_invalid_detect_resolution() {
        let config = PreprocessorConfig::from_lookup(|k| {
            (k == ENV_HED_DETECT_RESOLUTION).then(|| "large".to_string())
        });
        assert_eq!(config.hed_detect_resolution, DEFAULT_HED_DETECT_RESOLUTION);
    }
}
