//! comfy.sd.CLIP
//!
//! 只使用 tokenize 与 encode_from_tokens_scheduled 两个接口

use pyo3::{
    types::{PyAnyMethods, PyDict, PyDictMethods},
    Bound, PyAny,
};

use crate::error::Error;

/// T5-XXL 在 token 字典中的键
const T5XXL_KEY: &str = "t5xxl";

/// CLIP 对象包装
pub struct ClipWrapper<'py> {
    clip: Bound<'py, PyAny>,
}

impl<'py> ClipWrapper<'py> {
    pub fn new(clip: Bound<'py, PyAny>) -> Self {
        Self { clip }
    }

    /// clip.tokenize(text)
    pub fn tokenize(&self, text: &str) -> Result<Bound<'py, PyDict>, Error> {
        let tokens = self.clip.call_method1("tokenize", (text,))?;
        let tokens = tokens
            .downcast_into::<PyDict>()
            .map_err(|e| Error::PyDowncastError(e.to_string()))?;
        Ok(tokens)
    }

    /// Flux 双文本编码
    ///
    /// clip_l 的 token 作为基础, t5xxl 一项由第二段文本替换
    pub fn encode_flux(
        &self,
        clip_l: &str,
        t5xxl: &str,
        guidance: f64,
    ) -> Result<Bound<'py, PyAny>, Error> {
        let py = self.clip.py();

        let tokens = self.tokenize(clip_l)?;
        let t5_tokens = self.tokenize(t5xxl)?;
        let t5 = t5_tokens
            .get_item(T5XXL_KEY)?
            .ok_or_else(|| Error::OptionNone(format!("tokens has no {T5XXL_KEY} key")))?;
        tokens.set_item(T5XXL_KEY, t5)?;

        let add_dict = PyDict::new(py);
        add_dict.set_item("guidance", guidance)?;

        let kwargs = PyDict::new(py);
        kwargs.set_item("add_dict", add_dict)?;

        let conditioning =
            self.clip
                .call_method("encode_from_tokens_scheduled", (tokens,), Some(&kwargs))?;
        Ok(conditioning)
    }
}
