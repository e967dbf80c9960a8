//! model::inputs — layered name lookup over parameters and data.
//!
//! Parameters shadow dataset entries of the same name. Dataset values are
//! borrowed, so evaluating a term never copies event arrays.
use crate::model::{
    errors::{ModelError, ModelResult},
    value::Value,
};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Named scalar parameters, sorted by name.
pub type ParamMap = BTreeMap<String, f64>;

/// Named observed (or simulated) data.
pub type DataSet = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy)]
pub struct Inputs<'a> {
    params: &'a ParamMap,
    data: Option<&'a DataSet>,
}

impl<'a> Inputs<'a> {
    pub fn new(params: &'a ParamMap, data: Option<&'a DataSet>) -> Self {
        Self { params, data }
    }

    /// Look up `name`, parameters first.
    ///
    /// # Errors
    /// [`ModelError::MissingInput`] if neither layer holds the name.
    pub fn get(&self, name: &str) -> ModelResult<Cow<'a, Value>> {
        if let Some(&x) = self.params.get(name) {
            return Ok(Cow::Owned(Value::Scalar(x)));
        }
        self.data
            .and_then(|d| d.get(name))
            .map(Cow::Borrowed)
            .ok_or_else(|| ModelError::MissingInput { name: name.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Parameters shadow data; data is borrowed; unknown names fail.
    fn lookup_order_and_borrowing() {
        let params: ParamMap = [("x".to_string(), 1.0)].into_iter().collect();
        let data: DataSet =
            [("x".to_string(), Value::Count(9)), ("n".to_string(), Value::Count(4))].into_iter().collect();
        let inputs = Inputs::new(&params, Some(&data));

        assert_eq!(inputs.get("x").unwrap().as_ref(), &Value::Scalar(1.0));
        assert!(matches!(inputs.get("n").unwrap(), Cow::Borrowed(Value::Count(4))));
        assert_eq!(inputs.get("y").unwrap_err(), ModelError::MissingInput { name: "y".to_string() });
    }
}
