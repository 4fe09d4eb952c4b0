//! HED 轮廓提取

mod params;
pub use params::{
    ContourParameters, ParamSpec, LINE_THICKNESS, MIN_CONTOUR_AREA, RESOLUTION, THRESHOLD,
};

mod debug;
pub use debug::DebugSink;

mod extractor;
pub use extractor::{
    contour_area, draw_contour, external_contours, largest_contour, resize_to_resolution,
    threshold, ContourExtractor, ContourResult,
};
