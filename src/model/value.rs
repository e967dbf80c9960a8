//! model::value — dynamically typed inputs and model outputs.
//!
//! Aliases, datasets, and simulations all exchange [`Value`]s. Accessors
//! take the input name so a kind mismatch reports where it came from.
use crate::config::template::Template;
use crate::model::errors::{ModelError, ModelResult};
use ndarray::Array2;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Count(u64),
    /// `n × d` event coordinates.
    Events(Array2<f64>),
    Templates(Vec<Arc<Template>>),
    Tuple(Vec<Value>),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "a scalar",
            Value::Count(_) => "a count",
            Value::Events(_) => "events",
            Value::Templates(_) => "templates",
            Value::Tuple(_) => "a tuple",
        }
    }

    fn mismatch(&self, name: &str, expected: &'static str) -> ModelError {
        ModelError::TypeMismatch { name: name.to_string(), expected, found: self.kind() }
    }

    /// Scalar view; counts widen to `f64`.
    pub fn as_scalar(&self, name: &str) -> ModelResult<f64> {
        match self {
            Value::Scalar(x) => Ok(*x),
            Value::Count(n) => Ok(*n as f64),
            _ => Err(self.mismatch(name, "a scalar")),
        }
    }

    /// Count view; a scalar is accepted when it holds a non-negative integer.
    pub fn as_count(&self, name: &str) -> ModelResult<u64> {
        match self {
            Value::Count(n) => Ok(*n),
            Value::Scalar(x) if *x >= 0.0 && x.fract() == 0.0 && x.is_finite() => Ok(*x as u64),
            _ => Err(self.mismatch(name, "a count")),
        }
    }

    /// Flat list of scalars from a scalar, count or tuple of those.
    pub fn as_scalars(&self, name: &str) -> ModelResult<Vec<f64>> {
        match self {
            Value::Tuple(items) => items.iter().map(|v| v.as_scalar(name)).collect(),
            other => Ok(vec![other.as_scalar(name)?]),
        }
    }

    pub fn as_events(&self, name: &str) -> ModelResult<&Array2<f64>> {
        match self {
            Value::Events(e) => Ok(e),
            _ => Err(self.mismatch(name, "events")),
        }
    }

    pub fn as_templates(&self, name: &str) -> ModelResult<&[Arc<Template>]> {
        match self {
            Value::Templates(t) => Ok(t),
            _ => Err(self.mismatch(name, "templates")),
        }
    }

    /// Exactly one template.
    pub fn as_template(&self, name: &str) -> ModelResult<&Arc<Template>> {
        match self.as_templates(name)? {
            [t] => Ok(t),
            _ => Err(self.mismatch(name, "a single template")),
        }
    }

    /// Number of entries: event rows, templates, tuple items, else 1.
    pub fn len(&self) -> usize {
        match self {
            Value::Events(e) => e.nrows(),
            Value::Templates(t) => t.len(),
            Value::Tuple(items) => items.len(),
            Value::Scalar(_) | Value::Count(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Scalar(x)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Count(n)
    }
}

impl From<Array2<f64>> for Value {
    fn from(e: Array2<f64>) -> Self {
        Value::Events(e)
    }
}

impl From<Arc<Template>> for Value {
    fn from(t: Arc<Template>) -> Self {
        Value::Templates(vec![t])
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(x) => write!(f, "{x}"),
            Value::Count(n) => write!(f, "{n}"),
            Value::Events(e) => write!(f, "<{}x{} events>", e.nrows(), e.ncols()),
            Value::Templates(t) => {
                let names: Vec<&str> = t.iter().map(|t| t.name()).collect();
                if names.len() == 1 { write!(f, "{}", names[0]) } else { write!(f, "({})", names.join(", ")) }
            }
            Value::Tuple(items) => {
                let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "({})", parts.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Accessors convert compatible kinds and name the input on mismatch.
    fn accessors_convert_and_report() {
        assert_eq!(Value::Count(3).as_scalar("n").unwrap(), 3.0);
        assert_eq!(Value::Scalar(4.0).as_count("n").unwrap(), 4);
        assert_eq!(
            Value::Scalar(0.5).as_count("n").unwrap_err(),
            ModelError::TypeMismatch { name: "n".to_string(), expected: "a count", found: "a scalar" }
        );
        let t = Value::Tuple(vec![Value::Scalar(1.0), Value::Count(2)]);
        assert_eq!(t.as_scalars("w").unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    // Purpose
    // -------
    // Length counts event rows; display is compact.
    fn len_and_display() {
        let e = Value::Events(array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
        assert_eq!(e.len(), 3);
        assert_eq!(e.to_string(), "<3x2 events>");
        assert_eq!(Value::Tuple(vec![Value::Scalar(1.5), Value::Count(2)]).to_string(), "(1.5, 2)");
    }
}
