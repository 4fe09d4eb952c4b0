//! CLIP Text Encode (Flux)
//!
//! clip_l 与 t5xxl 分别编码, 并写入 guidance

use log::error;
use pyo3::{
    exceptions::PyRuntimeError,
    pyclass, pymethods,
    types::{PyDict, PyDictMethods, PyType},
    Bound, Py, PyAny, PyErr, PyResult, Python,
};

use crate::{
    core::category::CATEGORY_CONDITIONING_FLUX,
    error::Error,
    wrapper::{
        comfy::clip::ClipWrapper,
        comfyui::{
            types::{NODE_CLIP, NODE_CONDITIONING, NODE_STRING},
            PromptServer,
        },
    },
};

use super::guidance_input;

/// CLIP Text Encode (Flux)
#[pyclass(subclass)]
pub struct ClipTextEncodeFlux {}

impl PromptServer for ClipTextEncodeFlux {}

#[pymethods]
impl ClipTextEncodeFlux {
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
    fn return_types() -> (&'static str,) {
        (NODE_CONDITIONING,)
    }

    #[classattr]
    #[pyo3(name = "RETURN_NAMES")]
    fn return_names() -> (&'static str,) {
        ("conditioning",)
    }

    #[classattr]
    #[pyo3(name = "OUTPUT_IS_LIST")]
    fn output_is_list() -> (bool,) {
        (false,)
    }

    #[classattr]
    #[pyo3(name = "CATEGORY")]
    const CATEGORY: &'static str = CATEGORY_CONDITIONING_FLUX;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "Encode the clip_l and t5xxl prompts separately with the Flux guidance."
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
                    "clip_l",
                    (NODE_STRING, {
                        let clip_l = PyDict::new(py);
                        clip_l.set_item("multiline", true)?;
                        clip_l.set_item("dynamicPrompts", true)?;
                        clip_l
                    }),
                )?;
                required.set_item(
                    "t5xxl",
                    (NODE_STRING, {
                        let t5xxl = PyDict::new(py);
                        t5xxl.set_item("multiline", true)?;
                        t5xxl.set_item("dynamicPrompts", true)?;
                        t5xxl
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
        clip_l: &str,
        t5xxl: &str,
        guidance: f64,
    ) -> PyResult<(Bound<'py, PyAny>,)> {
        let results = self.encode(clip, clip_l, t5xxl, guidance);

        match results {
            Ok(v) => Ok((v,)),
            Err(e) => {
                error!("ClipTextEncodeFlux error, {e}");
                if let Err(e) = self.send_error(py, "ClipTextEncodeFlux".to_string(), e.to_string())
                {
                    error!("send error failed, {e}");
                    return Err(PyErr::new::<PyRuntimeError, _>(e.to_string()));
                };
                Err(PyErr::new::<PyRuntimeError, _>(e.to_string()))
            }
        }
    }
}

impl ClipTextEncodeFlux {
    fn encode<'py>(
        &self,
        clip: Bound<'py, PyAny>,
        clip_l: &str,
        t5xxl: &str,
        guidance: f64,
    ) -> Result<Bound<'py, PyAny>, Error> {
        ClipWrapper::new(clip).encode_flux(clip_l, t5xxl, guidance)
    }
}
