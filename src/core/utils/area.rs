//! 区域插值
//!
//! 缩小时按源像素与目标像素的覆盖面积加权平均,
//! 放大时使用双线性插值。

use image::{
    imageops::{self, FilterType},
    RgbImage,
};

/// 覆盖权重下限
const WEIGHT_EPSILON: f64 = 1e-9;

/// 单个目标像素在某一轴上的源像素权重
#[derive(Debug, Clone)]
struct AxisWeights {
    start: usize,
    weights: Vec<f32>,
}

/// 计算一个轴上的覆盖权重
fn axis_weights(src: u32, dst: u32) -> Vec<AxisWeights> {
    let scale = src as f64 / dst as f64;

    (0..dst)
        .map(|o| {
            let begin = o as f64 * scale;
            let end = ((o + 1) as f64 * scale).min(src as f64);

            let first = begin.floor() as usize;
            let last = (end.ceil() as usize).min(src as usize);

            let mut start = first;
            let mut weights = Vec::with_capacity(last.saturating_sub(first));
            for s in first..last {
                let overlap = end.min((s + 1) as f64) - begin.max(s as f64);
                if overlap <= WEIGHT_EPSILON {
                    if weights.is_empty() {
                        start = s + 1;
                    }
                    continue;
                }
                weights.push((overlap / scale) as f32);
            }

            AxisWeights { start, weights }
        })
        .collect()
}

/// 区域插值缩放
///
/// 宽高至少为 1。任一方向放大时使用双线性插值。
pub fn resize_area(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    let (src_w, src_h) = image.dimensions();
    let width = width.max(1);
    let height = height.max(1);

    if (src_w, src_h) == (width, height) {
        return image.clone();
    }
    if width > src_w || height > src_h {
        return imageops::resize(image, width, height, FilterType::Triangle);
    }

    let horizontal = axis_weights(src_w, width);
    let vertical = axis_weights(src_h, height);

    // 水平方向: src_h x width x 3
    let src = image.as_raw();
    let mut rows = vec![0f32; src_h as usize * width as usize * 3];
    for y in 0..src_h as usize {
        let row = &src[y * src_w as usize * 3..(y + 1) * src_w as usize * 3];
        for (x, axis) in horizontal.iter().enumerate() {
            let out = &mut rows[(y * width as usize + x) * 3..(y * width as usize + x + 1) * 3];
            for (i, w) in axis.weights.iter().enumerate() {
                let s = (axis.start + i) * 3;
                out[0] += row[s] as f32 * w;
                out[1] += row[s + 1] as f32 * w;
                out[2] += row[s + 2] as f32 * w;
            }
        }
    }

    // 垂直方向
    let mut data = vec![0u8; height as usize * width as usize * 3];
    for (y, axis) in vertical.iter().enumerate() {
        for x in 0..width as usize {
            let mut acc = [0f32; 3];
            for (i, w) in axis.weights.iter().enumerate() {
                let s = ((axis.start + i) * width as usize + x) * 3;
                acc[0] += rows[s] * w;
                acc[1] += rows[s + 1] * w;
                acc[2] += rows[s + 2] * w;
            }
            let d = (y * width as usize + x) * 3;
            for c in 0..3 {
                data[d + c] = acc[c].round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    RgbImage::from_raw(width, height, data).unwrap_or_else(|| RgbImage::new(width, height))
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;

    #[test]
    fn test_axis_weights_sum_to_one() {
        for (src, dst) in [(10, 3), (640, 512), (7, 7), (3, 8)] {
            for axis in axis_weights(src, dst) {
                let sum: f32 = axis.weights.iter().sum();
                assert!((sum - 1.0).abs() < 1e-4, "{src}->{dst}: {sum}");
            }
        }
    }

    #[test]
    fn test_resize_area_averages_blocks() {
        // 左半黑, 右半白, 2x 缩小后每个输出像素覆盖一个纯色块
        let image = RgbImage::from_fn(8, 4, |x, _| {
            if x < 4 {
                Rgb([0, 0, 0])
            } else {
                Rgb([200, 100, 50])
            }
        });

        let resized = resize_area(&image, 4, 2);
        assert_eq!(resized.dimensions(), (4, 2));
        assert_eq!(resized.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(resized.get_pixel(3, 1).0, [200, 100, 50]);
    }

    #[test]
    fn test_resize_area_mixed_pixel() {
        // 3 -> 1: 平均三个像素
        let image = RgbImage::from_fn(3, 1, |x, _| Rgb([(x * 90) as u8, 0, 0]));
        let resized = resize_area(&image, 1, 1);
        assert_eq!(resized.get_pixel(0, 0).0, [90, 0, 0]);
    }

    #[test]
    fn test_resize_upscale_is_linear() {
        let image = RgbImage::from_fn(2, 1, |x, _| Rgb([(x * 255) as u8, 0, 0]));
        let resized = resize_area(&image, 8, 1);
        assert_eq!(resized.dimensions(), (8, 1));

        let values: Vec<u8> = resized.pixels().map(|p| p.0[0]).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]), "{values:?}");
        let ramp = values.iter().filter(|&&v| v > 0 && v < 255).count();
        assert!(ramp >= 3, "{values:?}");
    }

    #[test]
    fn test_resize_area_identity() {
        let image = RgbImage::from_fn(5, 5, |x, y| Rgb([x as u8, y as u8, 7]));
        assert_eq!(resize_area(&image, 5, 5), image);
    }
}
