//! 轮廓提取的中间结果输出
//!
//! 文件名: {timestamp}_{nn}_{stage}.png

use std::{
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use image::{EncodableLayout, ImageBuffer, PixelWithColorType};
use log::{debug, warn};

use crate::error::Error;

/// 调试图片输出
pub struct DebugSink {
    dir: PathBuf,
    timestamp: u128,
    index: u32,
}

impl DebugSink {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, Error> {
        let timestamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
            timestamp,
            index: 0,
        })
    }

    /// 保存阶段图片, 失败时仅记录日志
    pub fn save<P>(&mut self, stage: &str, image: &ImageBuffer<P, Vec<P::Subpixel>>)
    where
        P: PixelWithColorType,
        [P::Subpixel]: EncodableLayout,
    {
        self.index += 1;
        let path = self.dir.join(format!(
            "{}_{:02}_{stage}.png",
            self.timestamp, self.index
        ));

        if let Err(e) = fs::create_dir_all(&self.dir) {
            warn!("create debug dir {} failed, {e}", self.dir.display());
            return;
        }
        match image.save(&path) {
            Ok(_) => debug!("saved debug image {}", path.display()),
            Err(e) => warn!("save debug image {} failed, {e}", path.display()),
        }
    }
}
