//! node_helpers

use pyo3::{
    types::{PyAnyMethods, PyDict, PyDictMethods, PyFloat, PyList, PyListMethods},
    Bound, PyAny, PyObject, Python,
};

use crate::error::Error;

/// 条件
///
/// (条件张量, 附加参数), 张量句柄对本模块不透明。
/// 附加参数保持 python dict 的键顺序。
#[derive(Debug, PartialEq)]
pub struct Conditioning<T>(pub T, pub Vec<(String, ConditioningEtx<T>)>);

/// 条件附加参数
#[derive(Debug, PartialEq)]
pub enum ConditioningEtx<T> {
    Float(f64),
    None,
    /// 其他 python 对象, 例如 pooled_output 张量
    Object(T),
}

/// 可写入条件附加参数的值
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConditioningValue {
    Float(f64),
    None,
}

impl<T> From<ConditioningValue> for ConditioningEtx<T> {
    fn from(value: ConditioningValue) -> Self {
        match value {
            ConditioningValue::Float(v) => ConditioningEtx::Float(v),
            ConditioningValue::None => ConditioningEtx::None,
        }
    }
}

/// Set values in conditionings
///
/// 每个条件的附加参数都是新的副本, 输入不会被修改。
/// 已有的键原位覆盖, 新键按 values 的顺序追加。
pub fn conditioning_set_values<T>(
    conditionings: Vec<Conditioning<T>>,
    values: &[(&str, ConditioningValue)],
) -> Vec<Conditioning<T>> {
    conditionings
        .into_iter()
        .map(|Conditioning(cond, mut options)| {
            for &(key, value) in values {
                match options.iter_mut().find(|(k, _)| k == key) {
                    Some((_, v)) => *v = value.into(),
                    None => options.push((key.to_string(), value.into())),
                }
            }
            Conditioning(cond, options)
        })
        .collect()
}

/// Convert Python's conditioning to Rust type
pub fn conditionings_py2rs(
    conditioning: &Bound<'_, PyAny>,
) -> Result<Vec<Conditioning<PyObject>>, Error> {
    let list = conditioning
        .downcast::<PyList>()
        .map_err(|e| Error::PyDowncastError(e.to_string()))?;

    let mut conditionings = Vec::with_capacity(list.len());
    for item in list.iter() {
        let cond = item.get_item(0)?.unbind();

        let dict_any = item.get_item(1)?;
        let dict_py = dict_any
            .downcast::<PyDict>()
            .map_err(|e| Error::PyDowncastError(e.to_string()))?;

        let mut options = Vec::with_capacity(dict_py.len());
        for (k, v) in dict_py.iter() {
            let key: String = k.extract()?;
            let value = if v.is_none() {
                ConditioningEtx::None
            } else if v.is_exact_instance_of::<PyFloat>() {
                ConditioningEtx::Float(v.extract::<f64>()?)
            } else {
                ConditioningEtx::Object(v.unbind())
            };
            options.push((key, value));
        }

        conditionings.push(Conditioning(cond, options));
    }

    Ok(conditionings)
}

/// Convert Rust's conditioning to Python type
pub fn conditionings_rs2py<'py>(
    py: Python<'py>,
    conditionings: Vec<Conditioning<PyObject>>,
) -> Result<Bound<'py, PyList>, Error> {
    let mut list = Vec::with_capacity(conditionings.len());
    for Conditioning(cond, options) in conditionings {
        let dict_py = PyDict::new(py);
        for (k, v) in options {
            match v {
                ConditioningEtx::Float(v) => dict_py.set_item(k, v)?,
                ConditioningEtx::None => dict_py.set_item(k, py.None())?,
                ConditioningEtx::Object(v) => dict_py.set_item(k, v)?,
            }
        }

        let elements = vec![cond.into_bound(py), dict_py.into_any()];
        list.push(PyList::new(py, elements)?);
    }

    let results = PyList::new(py, list)?;
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Conditioning<&'static str>> {
        vec![
            Conditioning(
                "cond_a",
                vec![
                    ("pooled_output".to_string(), ConditioningEtx::Object("pooled_a")),
                    ("guidance".to_string(), ConditioningEtx::Float(3.5)),
                    ("reference_latents".to_string(), ConditioningEtx::Object("latent_a")),
                ],
            ),
            Conditioning(
                "cond_b",
                vec![(
                    "pooled_output".to_string(),
                    ConditioningEtx::Object("pooled_b"),
                )],
            ),
        ]
    }

    fn keys<T>(conditioning: &Conditioning<T>) -> Vec<&str> {
        conditioning.1.iter().map(|(k, _)| k.as_str()).collect()
    }

    fn option<'a, T>(conditioning: &'a Conditioning<T>, key: &str) -> Option<&'a ConditioningEtx<T>> {
        conditioning
            .1
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    #[test]
    fn test_set_guidance() -> anyhow::Result<()> {
        let values = [("guidance", ConditioningValue::Float(7.0))];
        let results = conditioning_set_values(sample(), &values);

        assert_eq!(results.len(), 2);
        for conditioning in &results {
            assert_eq!(option(conditioning, "guidance"), Some(&ConditioningEtx::Float(7.0)));
        }
        assert_eq!(results[0].0, "cond_a");
        assert_eq!(
            option(&results[1], "pooled_output"),
            Some(&ConditioningEtx::Object("pooled_b"))
        );
        Ok(())
    }

    #[test]
    fn test_key_order_is_kept() -> anyhow::Result<()> {
        let values = [
            ("guidance", ConditioningValue::Float(2.0)),
            ("strength", ConditioningValue::Float(0.5)),
        ];
        let results = conditioning_set_values(sample(), &values);

        assert_eq!(
            keys(&results[0]),
            vec!["pooled_output", "guidance", "reference_latents", "strength"]
        );
        assert_eq!(keys(&results[1]), vec!["pooled_output", "guidance", "strength"]);
        Ok(())
    }

    #[test]
    fn test_disable_guidance() -> anyhow::Result<()> {
        let values = [("guidance", ConditioningValue::None)];
        let results = conditioning_set_values(sample(), &values);

        assert!(results
            .iter()
            .all(|c| option(c, "guidance") == Some(&ConditioningEtx::None)));
        assert_eq!(results[0].1.len(), 3);
        Ok(())
    }

    #[test]
    fn test_empty_conditioning() {
        let values = [("guidance", ConditioningValue::Float(1.0))];
        let results = conditioning_set_values(Vec::<Conditioning<()>>::new(), &values);
        assert!(results.is_empty());
    }
}
