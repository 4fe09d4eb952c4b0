//! Flux 条件相关的节点
use pyo3::{
    types::{PyDict, PyDictMethods, PyModule, PyModuleMethods},
    Bound, PyResult, Python,
};

use crate::{core::node::NodeRegister, wrapper::comfyui::types::NODE_FLOAT};

mod clip_text_encode_flux;
pub use clip_text_encode_flux::ClipTextEncodeFlux;

mod flux_guidance;
pub use flux_guidance::FluxGuidance;

mod flux_disable_guidance;
pub use flux_disable_guidance::FluxDisableGuidance;

mod kia_prompt_to_flux;
pub use kia_prompt_to_flux::KiaPromptToFlux;

mod kia_concept_clip_text_encode_flux;
pub use kia_concept_clip_text_encode_flux::KiaConceptClipTextEncodeFlux;

/// guidance 默认值
pub const DEFAULT_GUIDANCE: f64 = 3.5;

/// guidance 输入参数
pub(crate) fn guidance_input(py: Python<'_>) -> PyResult<(&'static str, Bound<'_, PyDict>)> {
    let guidance = PyDict::new(py);
    guidance.set_item("default", DEFAULT_GUIDANCE)?;
    guidance.set_item("min", 0.0)?;
    guidance.set_item("max", 100.0)?;
    guidance.set_item("step", 0.1)?;
    Ok((NODE_FLOAT, guidance))
}

/// 条件模块
pub fn submodule(py: Python<'_>) -> PyResult<Bound<'_, PyModule>> {
    let submodule = PyModule::new(py, "conditioning")?;
    submodule.add_class::<ClipTextEncodeFlux>()?;
    submodule.add_class::<FluxGuidance>()?;
    submodule.add_class::<FluxDisableGuidance>()?;
    submodule.add_class::<KiaPromptToFlux>()?;
    submodule.add_class::<KiaConceptClipTextEncodeFlux>()?;
    Ok(submodule)
}

/// Conditioning node register
pub fn node_register(py: Python<'_>) -> PyResult<Vec<NodeRegister<'_>>> {
    let nodes: Vec<NodeRegister> = vec![
        NodeRegister(
            "CLIPTextEncodeFlux",
            py.get_type::<ClipTextEncodeFlux>(),
            "CLIP Text Encode (Flux)",
        ),
        NodeRegister(
            "FluxGuidance",
            py.get_type::<FluxGuidance>(),
            "Flux Guidance",
        ),
        NodeRegister(
            "FluxDisableGuidance",
            py.get_type::<FluxDisableGuidance>(),
            "Flux Disable Guidance",
        ),
        NodeRegister(
            "KiaPromptToFlux",
            py.get_type::<KiaPromptToFlux>(),
            "Kia Prompt to Flux",
        ),
        NodeRegister(
            "KiaConceptClipTextEncodeFlux",
            py.get_type::<KiaConceptClipTextEncodeFlux>(),
            "Kia Concept CLIP Text Encode (Flux)",
        ),
    ];
    Ok(nodes)
}
