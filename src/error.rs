//! 错误处理

#[allow(unused)]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // 标准库错误处理
    #[error("io error, {0}")]
    Io(std::io::Error),
    #[error("system time error, {0}")]
    SystemTimeError(#[from] std::time::SystemTimeError),
    #[error("option none, {0}")]
    OptionNone(String),

    #[error("py error, {0}")]
    PyErr(#[from] pyo3::PyErr),
    #[error("pythonize error, {0}")]
    PythonizeError(#[from] pythonize::PythonizeError),
    #[error("py downcast error, {0}")]
    PyDowncastError(String),

    #[error("tensor error, {0}")]
    TensorErr(#[from] candle_core::Error),
    #[error("invalid tensor shape, {0}")]
    InvalidTensorShape(String),
    #[error("numpy error, {0}")]
    NotContiguousError(#[from] numpy::NotContiguousError),

    #[error("image error, {0}")]
    ImageError(#[from] image::ImageError),
    #[error("creating image buffer error")]
    ImageBuffer,
    #[error("unsupported number of channels: {0}")]
    UnsupportedNumberOfChannels(usize),

    #[error("hf hub error, {0}")]
    HfHubError(#[from] hf_hub::api::sync::ApiError),
    #[error("model file not found, {0}")]
    ModelNotFound(String),

    #[error("invalid parameter, {0}")]
    InvalidParameter(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}
