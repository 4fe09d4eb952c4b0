//! Kia Concept CLIP Text Encode (Flux)
//!
//! 根据主题与强度选择提示词并编码, 同时把提示词回传给前端展示。
//! 强度按 0.2 步长吸附。

use log::{error, info};
use pyo3::{
    exceptions::PyRuntimeError,
    pyclass, pymethods,
    types::{PyDict, PyDictMethods, PyType},
    Bound, IntoPyObject, Py, PyAny, PyErr, PyResult, Python,
};
use serde::Serialize;

use crate::{
    core::category::CATEGORY_CONDITIONING_FLUX,
    error::Error,
    prompt::{self, StepResolution, Theme},
    wrapper::{
        comfy::clip::ClipWrapper,
        comfyui::{
            types::{NODE_CLIP, NODE_CONDITIONING, NODE_FLOAT, NODE_STRING},
            PromptServer,
        },
    },
};

use super::guidance_input;

/// 前端展示的提示词
///
/// web/kia_concept_flux.js 根据这两个字段更新文本框
#[derive(Debug, Serialize)]
struct PromptUi {
    clip_prompt: Vec<String>,
    t5xxl_prompt: Vec<String>,
}

/// Kia Concept CLIP Text Encode (Flux)
#[pyclass(subclass)]
pub struct KiaConceptClipTextEncodeFlux {}

impl PromptServer for KiaConceptClipTextEncodeFlux {}

#[pymethods]
impl KiaConceptClipTextEncodeFlux {
    #[new]
    fn new() -> Self {
        Self {}
    }

    #[classattr]
    #[pyo3(name = "INPUT_IS_LIST")]
    fn input_is_list() -> bool {
        false
    }

    #[classattr]
    #[pyo3(name = "RETURN_TYPES")]
    fn return_types() -> (&'static str, &'static str) {
        (NODE_CONDITIONING, NODE_STRING)
    }

    #[classattr]
    #[pyo3(name = "RETURN_NAMES")]
    fn return_names() -> (&'static str, &'static str) {
        ("conditioning", "prompt")
    }

    #[classattr]
    #[pyo3(name = "OUTPUT_IS_LIST")]
    fn output_is_list() -> (bool, bool) {
        (false, false)
    }

    #[classattr]
    #[pyo3(name = "OUTPUT_NODE")]
    fn output_node() -> bool {
        true
    }

    #[classattr]
    #[pyo3(name = "CATEGORY")]
    const CATEGORY: &'static str = CATEGORY_CONDITIONING_FLUX;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "Select a Kia concept prompt by theme and strength, then encode it for Flux."
    }

    #[classattr]
    #[pyo3(name = "FUNCTION")]
    const FUNCTION: &'static str = "execute";

    #[classmethod]
    #[pyo3(name = "INPUT_TYPES")]
    fn input_types(_cls: &Bound<'_, PyType>) -> PyResult<Py<PyDict>> {
        Python::with_gil(|py| {
            let dict = PyDict::new(py);
            dict.set_item("required", {
                let required = PyDict::new(py);
                required.set_item("clip", (NODE_CLIP,))?;
                required.set_item(
                    "theme",
                    (Theme::options(), {
                        let theme = PyDict::new(py);
                        theme.set_item("default", Theme::City.to_string())?;
                        theme
                    }),
                )?;
                required.set_item(
                    "strength",
                    (NODE_FLOAT, {
                        let strength = PyDict::new(py);
                        strength.set_item("default", 0.5)?;
                        strength.set_item("min", 0.0)?;
                        strength.set_item("max", 1.0)?;
                        strength.set_item("step", 0.05)?;
                        strength
                    }),
                )?;
                required.set_item("guidance", guidance_input(py)?)?;
                required
            })?;
            Ok(dict.into())
        })
    }

    #[pyo3(name = "execute")]
    fn execute<'py>(
        &mut self,
        py: Python<'py>,
        clip: Bound<'py, PyAny>,
        theme: &str,
        strength: f64,
        guidance: f64,
    ) -> PyResult<Bound<'py, PyDict>> {
        let results = self.encode(py, clip, theme, strength, guidance);

        match results {
            Ok(v) => Ok(v),
            Err(e) => {
                error!("KiaConceptClipTextEncodeFlux error, {e}");
                if let Err(e) = self.send_error(
                    py,
                    "KiaConceptClipTextEncodeFlux".to_string(),
                    e.to_string(),
                ) {
                    error!("send error failed, {e}");
                    return Err(PyErr::new::<PyRuntimeError, _>(e.to_string()));
                };
                Err(PyErr::new::<PyRuntimeError, _>(e.to_string()))
            }
        }
    }
}

impl KiaConceptClipTextEncodeFlux {
    fn encode<'py>(
        &self,
        py: Python<'py>,
        clip: Bound<'py, PyAny>,
        theme: &str,
        strength: f64,
        guidance: f64,
    ) -> Result<Bound<'py, PyDict>, Error> {
        let prompt = prompt::resolve(theme, strength, StepResolution::Coarse);
        info!(
            "theme: {theme}, strength: {strength}, level: {}",
            prompt::quantize(strength, StepResolution::Coarse)
        );

        let conditioning = ClipWrapper::new(clip).encode_flux(&prompt, &prompt, guidance)?;

        let ui = PromptUi {
            clip_prompt: vec![prompt.clone()],
            t5xxl_prompt: vec![prompt.clone()],
        };
        self.node_result(py, &ui, (conditioning, prompt))
    }

    /// 组合为前端需要的数据结构
    fn node_result<'py, T>(
        &self,
        py: Python<'py>,
        ui: &PromptUi,
        result: T,
    ) -> Result<Bound<'py, PyDict>, Error>
    where
        T: IntoPyObject<'py>,
    {
        let dict = PyDict::new(py);
        dict.set_item("ui", pythonize::pythonize(py, ui)?)?;
        dict.set_item("result", result)?;
        Ok(dict)
    }
}
