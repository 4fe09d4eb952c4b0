//! HED 轮廓预处理
//!
//! 提取图像主体的外轮廓, 输出白色轮廓线、黑色背景的图像。
//! 模型不可用时返回缩放后的原图。

use std::path::PathBuf;

use candle_core::Device;
use log::{error, info, warn};
use pyo3::{
    exceptions::PyRuntimeError,
    pyclass, pymethods,
    types::{PyDict, PyDictMethods, PyType},
    Bound, Py, PyAny, PyErr, PyResult, Python,
};

use crate::{
    contour::{
        ContourExtractor, ContourParameters, ContourResult, DebugSink, ParamSpec,
        LINE_THICKNESS, MIN_CONTOUR_AREA, RESOLUTION, THRESHOLD,
    },
    core::{
        category::CATEGORY_IMAGE_PREPROCESSORS,
        config::PreprocessorConfig,
        utils::{image_to_tensor, tensor_to_image},
    },
    error::Error,
    hed::{default_device, LazyHedDetector},
    wrapper::{
        comfyui::{
            types::{NODE_BOOLEAN, NODE_IMAGE, NODE_INT},
            PromptServer,
        },
        torch::tensor::TensorWrapper,
    },
};

/// HED 轮廓预处理
#[pyclass(subclass)]
pub struct HedContourPreprocessor {
    debug_dir: PathBuf,
    extractor: ContourExtractor<LazyHedDetector>,
}

impl PromptServer for HedContourPreprocessor {}

#[pymethods]
impl HedContourPreprocessor {
    #[new]
    fn new() -> Self {
        let config = PreprocessorConfig::from_env();
        let device = default_device();
        info!("HEDContourPreprocessor device: {device:?}");

        Self {
            debug_dir: config.debug_dir.clone(),
            extractor: ContourExtractor::new(LazyHedDetector::new(config, device)),
        }
    }

    #[classattr]
    #[pyo3(name = "INPUT_IS_LIST")]
    fn input_is_list() -> bool {
        false
    }

    #[classattr]
    #[pyo3(name = "RETURN_TYPES")]
    fn return_types() -> (&'static str,) {
        (NODE_IMAGE,)
    }

    #[classattr]
    #[pyo3(name = "RETURN_NAMES")]
    fn return_names() -> (&'static str,) {
        ("contour_image",)
    }

    #[classattr]
    #[pyo3(name = "OUTPUT_IS_LIST")]
    fn output_is_list() -> (bool,) {
        (false,)
    }

    #[classattr]
    #[pyo3(name = "CATEGORY")]
    const CATEGORY: &'static str = CATEGORY_IMAGE_PREPROCESSORS;

    #[classattr]
    #[pyo3(name = "DESCRIPTION")]
    fn description() -> &'static str {
        "Extract the outline of the main subject with HED edge detection."
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
                required.set_item("image", (NODE_IMAGE,))?;
                required.set_item("threshold", int_input(py, &THRESHOLD)?)?;
                required.set_item("min_contour_area", int_input(py, &MIN_CONTOUR_AREA)?)?;
                required.set_item("line_thickness", int_input(py, &LINE_THICKNESS)?)?;
                required.set_item("resolution", int_input(py, &RESOLUTION)?)?;
                required
            })?;
            dict.set_item("optional", {
                let optional = PyDict::new(py);
                optional.set_item(
                    "debug",
                    (NODE_BOOLEAN, {
                        let debug = PyDict::new(py);
                        debug.set_item("default", false)?;
                        debug.set_item("tooltip", "Save every stage image to the debug directory.")?;
                        debug
                    }),
                )?;
                optional
            })?;
            Ok(dict.into())
        })
    }

    #[pyo3(name = "execute", signature = (image, threshold, min_contour_area, line_thickness, resolution, debug=false))]
    fn execute<'py>(
        &mut self,
        py: Python<'py>,
        image: Bound<'py, PyAny>,
        threshold: u32,
        min_contour_area: u32,
        line_thickness: u32,
        resolution: u32,
        debug: bool,
    ) -> PyResult<(Bound<'py, PyAny>,)> {
        let params = ContourParameters {
            threshold,
            min_contour_area,
            line_thickness,
            resolution,
        };

        let results = self.generate_contour(py, &image, &params, debug);

        match results {
            Ok(v) => Ok((v,)),
            Err(e) => {
                error!("HEDContourPreprocessor error, {e}");
                if let Err(e) =
                    self.send_error(py, "HEDContourPreprocessor".to_string(), e.to_string())
                {
                    error!("send error failed, {e}");
                    return Err(PyErr::new::<PyRuntimeError, _>(e.to_string()));
                };
                Err(PyErr::new::<PyRuntimeError, _>(e.to_string()))
            }
        }
    }
}

impl HedContourPreprocessor {
    /// 输出: [1, H, W, 3]
    fn generate_contour<'py>(
        &mut self,
        py: Python<'py>,
        image: &Bound<'py, PyAny>,
        params: &ContourParameters,
        debug: bool,
    ) -> Result<Bound<'py, PyAny>, Error> {
        let samples = TensorWrapper::<f32>::new(image, &Device::Cpu)?.into_tensor();
        let input = tensor_to_image(&samples)?;

        let result = if debug {
            let mut sink = DebugSink::new(&self.debug_dir)?;
            self.extractor.extract_with_debug(&input, params, &mut sink)?
        } else {
            self.extractor.extract(&input, params)?
        };

        if let ContourResult::Passthrough { reason, .. } = &result {
            warn!("HEDContourPreprocessor passthrough, {reason}");
        }

        let output = image_to_tensor(&result.into_image(), &Device::Cpu)?;
        Ok(TensorWrapper::<f32>::from_tensor(output).to_py_tensor(py)?)
    }
}

/// INT 输入参数
fn int_input<'py>(
    py: Python<'py>,
    spec: &ParamSpec,
) -> PyResult<(&'static str, Bound<'py, PyDict>)> {
    let options = PyDict::new(py);
    options.set_item("default", spec.default)?;
    options.set_item("min", spec.min)?;
    options.set_item("max", spec.max)?;
    options.set_item("step", spec.step)?;
    Ok((NODE_INT, options))
}
