//! Kia 概念提示词展示
//!
//! 强度按 0.05 步长吸附

use log::debug;
use pyo3::{
    pyclass, pymethods,
    types::{PyDict, PyDictMethods, PyType},
    Bound, Py, PyResult, Python,
};

use crate::{
    core::category::CATEGORY_PROMPTS_KIA,
    prompt::{self, StepResolution, Theme},
    wrapper::comfyui::types::{NODE_FLOAT, NODE_STRING},
};

/// Kia 概念提示词展示
#[pyclass(subclass)]
pub struct KiaPromptDisplay {}

#[pymethods]
impl KiaPromptDisplay {
    #[new]
    fn new() -> Self {
        Self {}
    }

    #[classmethod]
    #[pyo3(name = "INPUT_TYPES")]
    fn input_types(_cls: &Bound<'_, PyType>) -> PyResult<Py<PyDict>> {
        Python::with_gil(|py| {
            let dict = PyDict::new(py);
            dict.set_item("required", {
                let required = PyDict::new(py);
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
                required
            })?;
            Ok(dict.into())
        })
    }

    #[classattr]
    #[pyo3(name = "INPUT_IS_LIST")]
    fn input_is_list() -> bool {
        false
    }

    #[classattr]
    #[pyo3(name = "RETURN_TYPES")]
    fn return_types() -> (&'static str,) {
        (NODE_STRING,)
    }

    #[classattr]
    #[pyo3(name = "RETURN_NAMES")]
    fn return_names() -> (&'static str,) {
        ("prompt",)
    }

    #[classattr]
    #[pyo3(name = "OUTPUT_IS_LIST")]
    fn output_is_list() -> (bool,) {
        (false,)
    }

    #[classattr]
    #[pyo3(name = "CATEGORY")]
    const CATEGORY: &'static str = CATEGORY_PROMPTS_KIA;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "Show the Kia concept prompt for a theme and strength."
    }

    #[classattr]
    #[pyo3(name = "FUNCTION")]
    const FUNCTION: &'static str = "execute";

    #[pyo3(name = "execute")]
    fn execute(&mut self, theme: &str, strength: f64) -> PyResult<(String,)> {
        let prompt = prompt::resolve(theme, strength, StepResolution::Fine);
        debug!("KiaPromptDisplay theme: {theme}, strength: {strength}");
        Ok((prompt,))
    }
}
