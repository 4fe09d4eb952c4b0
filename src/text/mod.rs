//! 文本相关的节点
use pyo3::{
    types::{PyModule, PyModuleMethods},
    Bound, PyResult, Python,
};

use crate::core::node::NodeRegister;

mod kia_prompt_display;
pub use kia_prompt_display::KiaPromptDisplay;

/// 文本模块
pub fn submodule(py: Python<'_>) -> PyResult<Bound<'_, PyModule>> {
    let submodule = PyModule::new(py, "text")?;
    submodule.add_class::<KiaPromptDisplay>()?;
    Ok(submodule)
}

/// Text node register
pub fn node_register(py: Python<'_>) -> PyResult<Vec<NodeRegister<'_>>> {
    let nodes: Vec<NodeRegister> = vec![NodeRegister(
        "KiaPromptDisplay",
        py.get_type::<KiaPromptDisplay>(),
        "Kia Concept Prompt Display",
    )];
    Ok(nodes)
}
