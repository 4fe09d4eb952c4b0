//! 轮廓提取
//!
//! 流程: 缩放 -> 边缘检测 -> 二值化 -> 开运算 -> 外轮廓 -> 最大轮廓 -> 膨胀

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::{
    contours::{find_contours, BorderType},
    distance_transform::Norm,
    drawing::BresenhamLineIter,
    morphology,
    point::Point,
};
use log::{debug, info};

use crate::{
    core::utils::resize_area,
    error::Error,
    hed::{EdgeDetection, EdgeDetector},
};

use super::{debug::DebugSink, params::ContourParameters};

const FOREGROUND: Luma<u8> = Luma([255]);

/// 轮廓提取结果
#[derive(Debug, Clone)]
pub enum ContourResult {
    /// 轮廓图
    Outline(RgbImage),
    /// 边缘检测不可用, 返回缩放后的输入
    Passthrough { image: RgbImage, reason: String },
}

impl ContourResult {
    pub fn into_image(self) -> RgbImage {
        match self {
            Self::Outline(image) => image,
            Self::Passthrough { image, .. } => image,
        }
    }
}

/// 轮廓提取器
pub struct ContourExtractor<D: EdgeDetector> {
    detector: D,
}

impl<D: EdgeDetector> ContourExtractor<D> {
    pub fn new(detector: D) -> Self {
        Self { detector }
    }

    pub fn extract(
        &mut self,
        image: &RgbImage,
        params: &ContourParameters,
    ) -> Result<ContourResult, Error> {
        self.run(image, params, None)
    }

    /// 提取轮廓并保存每个阶段的图片
    pub fn extract_with_debug(
        &mut self,
        image: &RgbImage,
        params: &ContourParameters,
        sink: &mut DebugSink,
    ) -> Result<ContourResult, Error> {
        self.run(image, params, Some(sink))
    }

    fn run(
        &mut self,
        image: &RgbImage,
        params: &ContourParameters,
        mut sink: Option<&mut DebugSink>,
    ) -> Result<ContourResult, Error> {
        params.validate()?;

        if let Some(sink) = sink.as_deref_mut() {
            sink.save("input", image);
        }

        let resized = resize_to_resolution(image, params.resolution);
        debug!(
            "resized {:?} -> {:?}",
            image.dimensions(),
            resized.dimensions()
        );
        if let Some(sink) = sink.as_deref_mut() {
            sink.save("resized", &resized);
        }

        let edges = match self.detector.detect(&resized) {
            EdgeDetection::EdgeMap(edges) => edges,
            EdgeDetection::Unavailable(reason) => {
                info!("edge detector unavailable, passthrough: {reason}");
                return Ok(ContourResult::Passthrough {
                    image: resized,
                    reason,
                });
            }
        };
        if let Some(sink) = sink.as_deref_mut() {
            sink.save("edges", &edges);
        }

        let binary = threshold(&edges, params.threshold);
        if let Some(sink) = sink.as_deref_mut() {
            sink.save("binary", &binary);
        }

        let opened = morphology::open(&binary, Norm::LInf, 1);
        if let Some(sink) = sink.as_deref_mut() {
            sink.save("opened", &opened);
        }

        let contours = external_contours(&opened);
        let largest = largest_contour(&contours, params.min_contour_area as f64);
        debug!(
            "found {} external contours, largest kept: {}",
            contours.len(),
            largest.is_some()
        );

        let (width, height) = opened.dimensions();
        let mut outline = GrayImage::new(width, height);
        if let Some(points) = largest {
            draw_contour(&mut outline, points, params.line_thickness);
        }
        if let Some(sink) = sink.as_deref_mut() {
            sink.save("contour", &outline);
        }

        let dilated = morphology::dilate(&outline, Norm::LInf, 2);
        if let Some(sink) = sink.as_deref_mut() {
            sink.save("dilated", &dilated);
        }

        Ok(ContourResult::Outline(gray_to_rgb(&dilated)))
    }
}

/// 保持宽高比缩放, 长边等于 resolution
pub fn resize_to_resolution(image: &RgbImage, resolution: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    let aspect_ratio = width as f64 / height.max(1) as f64;
    let resolution_f = resolution as f64;

    let (new_width, new_height) = if width > height {
        (resolution, (resolution_f / aspect_ratio) as u32)
    } else {
        ((resolution_f * aspect_ratio) as u32, resolution)
    };

    resize_area(image, new_width.max(1), new_height.max(1))
}

/// 二值化, 大于阈值为 255
pub fn threshold(image: &GrayImage, threshold: u32) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        if image.get_pixel(x, y).0[0] as u32 > threshold {
            FOREGROUND
        } else {
            Luma([0])
        }
    })
}

/// 最外层轮廓
pub fn external_contours(binary: &GrayImage) -> Vec<Vec<Point<i32>>> {
    find_contours::<i32>(binary)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| c.points)
        .collect()
}

/// 多边形面积 (鞋带公式)
pub fn contour_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let twice_area: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();

    (twice_area as f64 / 2.0).abs()
}

/// 面积大于 min_area 的最大轮廓, 面积相同取先找到的
pub fn largest_contour(contours: &[Vec<Point<i32>>], min_area: f64) -> Option<&[Point<i32>]> {
    let mut largest: Option<(f64, &[Point<i32>])> = None;

    for points in contours {
        let area = contour_area(points);
        if area <= min_area {
            continue;
        }
        match largest {
            Some((best, _)) if area <= best => {}
            _ => largest = Some((area, points.as_slice())),
        }
    }

    largest.map(|(_, points)| points)
}

/// 绘制闭合轮廓, 线宽为 thickness 像素
pub fn draw_contour(canvas: &mut GrayImage, points: &[Point<i32>], thickness: u32) {
    let brush = brush_offsets(thickness);

    for (a, b) in points.iter().zip(points.iter().cycle().skip(1)) {
        let line = BresenhamLineIter::new((a.x as f32, a.y as f32), (b.x as f32, b.y as f32));
        for (x, y) in line {
            stamp(canvas, x, y, &brush);
        }
    }
}

/// 圆形笔刷, 直径为 thickness
fn brush_offsets(thickness: u32) -> Vec<(i32, i32)> {
    let size = thickness.max(1) as i32;
    let center = (size - 1) as f32 / 2.0;
    let radius2 = (size as f32 / 2.0).powi(2);

    let mut offsets = Vec::with_capacity((size * size) as usize);
    for dy in 0..size {
        for dx in 0..size {
            let (fx, fy) = (dx as f32 - center, dy as f32 - center);
            if fx * fx + fy * fy <= radius2 {
                offsets.push((dx - (size - 1) / 2, dy - (size - 1) / 2));
            }
        }
    }
    offsets
}

fn stamp(canvas: &mut GrayImage, x: i32, y: i32, brush: &[(i32, i32)]) {
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);
    for &(dx, dy) in brush {
        let (px, py) = (x + dx, y + dy);
        if (0..width).contains(&px) && (0..height).contains(&py) {
            canvas.put_pixel(px as u32, py as u32, FOREGROUND);
        }
    }
}

fn gray_to_rgb(image: &GrayImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let v = image.get_pixel(x, y).0[0];
        Rgb([v, v, v])
    })
}

#[cfg(test)]
mod tests {
    use image::imageops;

    use super::*;

    /// 以亮度作为边缘图
    struct LumaDetector;

    impl EdgeDetector for LumaDetector {
        fn detect(&mut self, image: &RgbImage) -> EdgeDetection {
            EdgeDetection::EdgeMap(imageops::grayscale(image))
        }
    }

    struct OfflineDetector;

    impl EdgeDetector for OfflineDetector {
        fn detect(&mut self, _image: &RgbImage) -> EdgeDetection {
            EdgeDetection::Unavailable("offline".to_string())
        }
    }

    fn fill_square(image: &mut RgbImage, x0: u32, y0: u32, size: u32) {
        for y in y0..y0 + size {
            for x in x0..x0 + size {
                image.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
    }

    fn squares() -> RgbImage {
        let mut image = RgbImage::new(200, 200);
        fill_square(&mut image, 50, 50, 100);
        fill_square(&mut image, 10, 10, 6);
        fill_square(&mut image, 175, 20, 6);
        fill_square(&mut image, 20, 175, 6);
        image
    }

    #[test]
    fn test_keeps_largest_outline() -> anyhow::Result<()> {
        let mut extractor = ContourExtractor::new(LumaDetector);
        let params = ContourParameters {
            resolution: 200,
            ..Default::default()
        };

        let result = extractor.extract(&squares(), &params)?;
        assert!(matches!(result, ContourResult::Outline(_)));

        let output = result.into_image();
        assert_eq!(output.dimensions(), (200, 200));

        let mut foreground = 0;
        for (x, y, pixel) in output.enumerate_pixels() {
            if pixel.0[0] == 0 {
                continue;
            }
            foreground += 1;
            // 大正方形边界 [50, 149] 外扩/内缩 3 像素的带状区域
            let outer = (47..=152).contains(&x) && (47..=152).contains(&y);
            let inner = (54..=145).contains(&x) && (54..=145).contains(&y);
            assert!(outer && !inner, "unexpected foreground at ({x}, {y})");
        }
        assert!(foreground > 0);
        assert_eq!(output.get_pixel(50, 100).0, [255, 255, 255]);
        assert_eq!(output.get_pixel(100, 100).0, [0, 0, 0]);
        Ok(())
    }

    #[test]
    fn test_no_contour_survives() -> anyhow::Result<()> {
        let mut extractor = ContourExtractor::new(LumaDetector);
        let params = ContourParameters {
            resolution: 200,
            min_contour_area: 10000,
            ..Default::default()
        };

        let output = extractor.extract(&squares(), &params)?.into_image();
        assert!(output.pixels().all(|p| p.0 == [0, 0, 0]));
        Ok(())
    }

    #[test]
    fn test_passthrough_when_unavailable() -> anyhow::Result<()> {
        let mut extractor = ContourExtractor::new(OfflineDetector);
        let params = ContourParameters {
            resolution: 128,
            ..Default::default()
        };

        let image = RgbImage::from_pixel(300, 150, Rgb([30, 60, 90]));
        let result = extractor.extract(&image, &params)?;
        match &result {
            ContourResult::Passthrough { image, reason } => {
                assert_eq!(image.dimensions(), (128, 64));
                assert_eq!(reason, "offline");
            }
            ContourResult::Outline(_) => panic!("expected passthrough"),
        }
        Ok(())
    }

    #[test]
    fn test_invalid_parameters() -> anyhow::Result<()> {
        let mut extractor = ContourExtractor::new(LumaDetector);
        let params = ContourParameters {
            resolution: 32,
            ..Default::default()
        };
        assert!(extractor.extract(&squares(), &params).is_err());
        Ok(())
    }

    #[test]
    fn test_resize_keeps_aspect_ratio() -> anyhow::Result<()> {
        let wide = resize_to_resolution(&RgbImage::new(333, 217), 512);
        assert_eq!(wide.width(), 512);
        let expected = 512.0 * 217.0 / 333.0;
        assert!((wide.height() as f64 - expected).abs() <= 1.0);

        let tall = resize_to_resolution(&RgbImage::new(100, 400), 256);
        assert_eq!(tall.dimensions(), (64, 256));

        let square = resize_to_resolution(&RgbImage::new(90, 90), 64);
        assert_eq!(square.dimensions(), (64, 64));
        Ok(())
    }

    #[test]
    fn test_stroke_width_matches_thickness() -> anyhow::Result<()> {
        let line = vec![Point::new(10, 30), Point::new(50, 30)];

        for thickness in 1..=10 {
            let mut canvas = GrayImage::new(64, 64);
            draw_contour(&mut canvas, &line, thickness);

            let column = (0..64)
                .filter(|&y| canvas.get_pixel(30, y).0[0] == 255)
                .count();
            assert_eq!(column, thickness as usize, "thickness {thickness}");

            let row = (0..64)
                .filter(|&x| canvas.get_pixel(x, 30).0[0] == 255)
                .count();
            assert!(row >= 41, "thickness {thickness}");
        }
        Ok(())
    }

    #[test]
    fn test_contour_area() -> anyhow::Result<()> {
        let square = vec![
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 10),
            Point::new(0, 10),
        ];
        assert_eq!(contour_area(&square), 100.0);
        assert_eq!(contour_area(&square[..2]), 0.0);

        let small = vec![
            Point::new(0, 0),
            Point::new(2, 0),
            Point::new(2, 2),
            Point::new(0, 2),
        ];
        let contours = vec![small, square.clone(), square];
        let largest = largest_contour(&contours, 10.0);
        assert!(largest.is_some_and(|p| std::ptr::eq(p, contours[1].as_slice())));
        assert!(largest_contour(&contours, 100.0).is_none());
        Ok(())
    }
}
