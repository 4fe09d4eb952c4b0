//! 图像预处理节点
use pyo3::{
    types::{PyModule, PyModuleMethods},
    Bound, PyResult, Python,
};

use crate::core::node::NodeRegister;

mod hed_contour_preprocessor;
pub use hed_contour_preprocessor::HedContourPreprocessor;

/// 预处理模块
pub fn submodule(py: Python<'_>) -> PyResult<Bound<'_, PyModule>> {
    let submodule = PyModule::new(py, "preprocessor")?;
    submodule.add_class::<HedContourPreprocessor>()?;
    Ok(submodule)
}

/// Preprocessor node register
pub fn node_register(py: Python<'_>) -> PyResult<Vec<NodeRegister<'_>>> {
    let nodes: Vec<NodeRegister> = vec![NodeRegister(
        "HEDContourPreprocessor",
        py.get_type::<HedContourPreprocessor>(),
        "HED Contour",
    )];
    Ok(nodes)
}
