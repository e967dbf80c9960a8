//! model::alias — how a model argument or observable is obtained.
//!
//! Purpose
//! -------
//! Bind the fixed argument names of a statistical model to the names used
//! by a particular likelihood. An alias is a literal value, a named input,
//! a function of named inputs, or a tuple of aliases.
//!
//! Key behaviors
//! -------------
//! - [`Alias::inputs_needed`] collects every input name an alias reads, so a
//!   likelihood can derive its parameter list from its terms.
//! - [`Alias::evaluate`] resolves the alias against [`Inputs`]; named inputs
//!   come back borrowed when the dataset holds them.
//! - [`Alias::view`] renders the alias for likelihood printouts: inputs by
//!   name, functions by their expression text, tuples in parentheses.
//!
//! Conventions
//! -----------
//! - Function aliases carry their own expression text because closures
//!   cannot be printed; [`Alias::scalar_fn`] and [`Alias::scalars_fn`] cover
//!   the common numeric cases.
use crate::model::{
    errors::ModelResult,
    inputs::Inputs,
    value::Value,
};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Function of the values of an alias's inputs, in declaration order.
pub type AliasFn = Arc<dyn Fn(&[&Value]) -> ModelResult<Value> + Send + Sync>;

#[derive(Clone)]
pub enum Alias {
    Const(Value),
    Input(String),
    Func { inputs: Vec<String>, expr: String, f: AliasFn },
    Tuple(Vec<Alias>),
}

impl Alias {
    pub fn input(name: &str) -> Self {
        Alias::Input(name.to_string())
    }

    pub fn constant(value: impl Into<Value>) -> Self {
        Alias::Const(value.into())
    }

    pub fn func<F>(inputs: &[&str], expr: &str, f: F) -> Self
    where
        F: Fn(&[&Value]) -> ModelResult<Value> + Send + Sync + 'static,
    {
        Alias::Func {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            expr: expr.to_string(),
            f: Arc::new(f),
        }
    }

    /// Scalar function of scalar inputs.
    pub fn scalar_fn<F>(inputs: &[&str], expr: &str, f: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        let names: Vec<String> = inputs.iter().map(|s| s.to_string()).collect();
        Self::func(inputs, expr, move |values| Ok(Value::Scalar(f(&scalars(&names, values)?))))
    }

    /// Tuple-of-scalars function of scalar inputs.
    pub fn scalars_fn<F>(inputs: &[&str], expr: &str, f: F) -> Self
    where
        F: Fn(&[f64]) -> Vec<f64> + Send + Sync + 'static,
    {
        let names: Vec<String> = inputs.iter().map(|s| s.to_string()).collect();
        Self::func(inputs, expr, move |values| {
            let out = f(&scalars(&names, values)?);
            Ok(Value::Tuple(out.into_iter().map(Value::Scalar).collect()))
        })
    }

    /// Add every input name this alias reads to `out`.
    pub fn inputs_needed(&self, out: &mut BTreeSet<String>) {
        match self {
            Alias::Const(_) => {}
            Alias::Input(name) => {
                out.insert(name.clone());
            }
            Alias::Func { inputs, .. } => out.extend(inputs.iter().cloned()),
            Alias::Tuple(items) => items.iter().for_each(|a| a.inputs_needed(out)),
        }
    }

    /// Resolve the alias against `inputs`.
    ///
    /// # Errors
    /// Missing inputs, kind mismatches, and errors raised by function aliases.
    pub fn evaluate<'a>(&'a self, inputs: &Inputs<'a>) -> ModelResult<Cow<'a, Value>> {
        match self {
            Alias::Const(v) => Ok(Cow::Borrowed(v)),
            Alias::Input(name) => inputs.get(name),
            Alias::Func { inputs: names, f, .. } => {
                let values =
                    names.iter().map(|n| inputs.get(n)).collect::<ModelResult<Vec<Cow<'a, Value>>>>()?;
                let refs: Vec<&Value> = values.iter().map(|v| v.as_ref()).collect();
                Ok(Cow::Owned(f(&refs)?))
            }
            Alias::Tuple(items) => {
                let values = items
                    .iter()
                    .map(|a| a.evaluate(inputs).map(Cow::into_owned))
                    .collect::<ModelResult<Vec<Value>>>()?;
                Ok(Cow::Owned(Value::Tuple(values)))
            }
        }
    }

    pub fn view(&self) -> String {
        match self {
            Alias::Const(v) => v.to_string(),
            Alias::Input(name) => name.clone(),
            Alias::Func { expr, .. } => expr.clone(),
            Alias::Tuple(items) => {
                let parts: Vec<String> = items.iter().map(Alias::view).collect();
                format!("({})", parts.join(", "))
            }
        }
    }
}

impl fmt::Debug for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alias::Const(v) => f.debug_tuple("Const").field(v).finish(),
            Alias::Input(name) => f.debug_tuple("Input").field(name).finish(),
            Alias::Func { inputs, expr, .. } => {
                f.debug_struct("Func").field("inputs", inputs).field("expr", expr).finish_non_exhaustive()
            }
            Alias::Tuple(items) => f.debug_tuple("Tuple").field(items).finish(),
        }
    }
}

fn scalars(names: &[String], values: &[&Value]) -> ModelResult<Vec<f64>> {
    names.iter().zip(values).map(|(n, v)| v.as_scalar(n)).collect()
}
