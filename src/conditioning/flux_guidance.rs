//! Flux Guidance
//!
//! 为每个条件写入 guidance

use log::error;
use pyo3::{
    exceptions::PyRuntimeError,
    pyclass, pymethods,
    types::{PyDict, PyDictMethods, PyList, PyType},
    Bound, Py, PyAny, PyErr, PyResult, Python,
};

use crate::{
    core::category::CATEGORY_CONDITIONING_FLUX,
    error::Error,
    wrapper::{
        comfy::node_helpers::{
            conditioning_set_values, conditionings_py2rs, conditionings_rs2py, ConditioningValue,
        },
        comfyui::{types::NODE_CONDITIONING, PromptServer},
    },
};

use super::guidance_input;

/// Flux Guidance
#[pyclass(subclass)]
pub struct FluxGuidance {}

impl PromptServer for FluxGuidance {}

#[pymethods]
impl FluxGuidance {
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
    #[pyo3(name = "FUNCTION")]
    const FUNCTION: &'static str = "execute";

    #[classmethod]
    #[pyo3(name = "INPUT_TYPES")]
    fn input_types(_cls: &Bound<'_, PyType>) -> PyResult<Py<PyDict>> {
        Python::with_gil(|py| {
            let dict = PyDict::new(py);
            dict.set_item("required", {
                let required = PyDict::new(py);
                required.set_item("conditioning", (NODE_CONDITIONING,))?;
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
        conditioning: Bound<'py, PyAny>,
        guidance: f64,
    ) -> PyResult<(Bound<'py, PyList>,)> {
        let results = self.append(py, &conditioning, guidance);

        match results {
            Ok(v) => Ok((v,)),
            Err(e) => {
                error!("FluxGuidance error, {e}");
                if let Err(e) = self.send_error(py, "FluxGuidance".to_string(), e.to_string()) {
                    error!("send error failed, {e}");
                    return Err(PyErr::new::<PyRuntimeError, _>(e.to_string()));
                };
                Err(PyErr::new::<PyRuntimeError, _>(e.to_string()))
            }
        }
    }
}

impl FluxGuidance {
    fn append<'py>(
        &self,
        py: Python<'py>,
        conditioning: &Bound<'py, PyAny>,
        guidance: f64,
    ) -> Result<Bound<'py, PyList>, Error> {
        let conditionings = conditionings_py2rs(conditioning)?;
        let values = [("guidance", ConditioningValue::Float(guidance))];
        let conditionings = conditioning_set_values(conditionings, &values);
        conditionings_rs2py(py, conditionings)
    }
}
