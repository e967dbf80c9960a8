//! model::remap — validated binding of model names to aliases.
use crate::model::{
    alias::Alias,
    errors::{ModelError, ModelResult},
    inputs::Inputs,
    value::Value,
};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

/// Evaluated arguments or observables of one model call.
pub type Bindings<'a> = BTreeMap<&'static str, Cow<'a, Value>>;

/// Fetch a bound value by model name.
///
/// # Errors
/// [`ModelError::MissingAlias`] if `name` is not bound.
pub fn bound<'b>(b: &'b Bindings<'_>, model: &'static str, name: &'static str) -> ModelResult<&'b Value> {
    b.get(name)
        .map(|v| v.as_ref())
        .ok_or_else(|| ModelError::MissingAlias { model, name: name.to_string() })
}

/// Alias assignment of one model instance.
///
/// Entries keep the order in which they were given, which is the order
/// used by [`Remap::view_lines`].
#[derive(Debug, Clone)]
pub struct Remap {
    model: &'static str,
    arg: Vec<(&'static str, Alias)>,
    obs: Vec<(&'static str, Alias)>,
    pub input_needed: BTreeSet<String>,
    pub arg_input_needed: BTreeSet<String>,
    pub obs_input_needed: BTreeSet<String>,
}

impl Remap {
    /// Validate and store the aliases of one model instance.
    ///
    /// # Errors
    /// - [`ModelError::UnknownArgument`] for an alias on an undeclared argument.
    /// - [`ModelError::MissingAlias`] for a declared argument or observable
    ///   without alias.
    ///
    /// Aliases for undeclared observables are ignored.
    pub fn new(
        model: &'static str, arg_needed: &'static [&'static str], obs_needed: &'static [&'static str],
        args: Vec<(String, Alias)>, obs: Vec<(String, Alias)>,
    ) -> ModelResult<Self> {
        let mut arg = Vec::with_capacity(args.len());
        for (name, alias) in args {
            let key = arg_needed
                .iter()
                .find(|&&n| n == name)
                .ok_or(ModelError::UnknownArgument { model, name: name.clone() })?;
            arg.push((*key, alias));
        }
        let obs: Vec<(&'static str, Alias)> = obs
            .into_iter()
            .filter_map(|(name, alias)| obs_needed.iter().find(|&&n| n == name).map(|k| (*k, alias)))
            .collect();

        for &needed in arg_needed {
            if !arg.iter().any(|(n, _)| *n == needed) {
                return Err(ModelError::MissingAlias { model, name: needed.to_string() });
            }
        }
        for &needed in obs_needed {
            if !obs.iter().any(|(n, _)| *n == needed) {
                return Err(ModelError::MissingAlias { model, name: needed.to_string() });
            }
        }

        let mut arg_input_needed = BTreeSet::new();
        arg.iter().for_each(|(_, a)| a.inputs_needed(&mut arg_input_needed));
        let mut obs_input_needed = BTreeSet::new();
        obs.iter().for_each(|(_, a)| a.inputs_needed(&mut obs_input_needed));
        let input_needed = arg_input_needed.union(&obs_input_needed).cloned().collect();

        Ok(Self { model, arg, obs, input_needed, arg_input_needed, obs_input_needed })
    }

    pub fn arg_from_inputs<'a>(&'a self, inputs: &Inputs<'a>) -> ModelResult<Bindings<'a>> {
        evaluate_all(&self.arg, inputs)
    }

    pub fn obs_from_inputs<'a>(&'a self, inputs: &Inputs<'a>) -> ModelResult<Bindings<'a>> {
        evaluate_all(&self.obs, inputs)
    }

    /// Observable aliases that read one data key directly.
    pub fn direct_observables(&self) -> impl Iterator<Item = &str> {
        self.obs.iter().filter_map(|(_, a)| match a {
            Alias::Input(name) => Some(name.as_str()),
            _ => None,
        })
    }

    /// `name = alias` lines, observables first.
    pub fn view_lines(&self) -> Vec<String> {
        self.obs
            .iter()
            .chain(self.arg.iter())
            .map(|(name, alias)| format!("{name} = {}", alias.view()))
            .collect()
    }

    pub fn model(&self) -> &'static str {
        self.model
    }
}

fn evaluate_all<'a>(
    entries: &'a [(&'static str, Alias)], inputs: &Inputs<'a>,
) -> ModelResult<Bindings<'a>> {
    entries.iter().map(|(name, alias)| Ok((*name, alias.evaluate(inputs)?))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::inputs::ParamMap;

    const ARG: &[&str] = &["mu", "std"];
    const OBS: &[&str] = &["x"];

    fn pairs(items: &[(&str, Alias)]) -> Vec<(String, Alias)> {
        items.iter().map(|(n, a)| (n.to_string(), a.clone())).collect()
    }

    #[test]
    // Purpose
    // -------
    // Unknown arguments fail; unknown observables are dropped.
    fn validates_argument_names() {
        let err = Remap::new(
            "Gaussian",
            ARG,
            OBS,
            pairs(&[("mu", Alias::constant(0.0)), ("sigma", Alias::constant(1.0))]),
            pairs(&[("x", Alias::input("x"))]),
        )
        .unwrap_err();
        assert_eq!(err, ModelError::UnknownArgument { model: "Gaussian", name: "sigma".to_string() });

        let ok = Remap::new(
            "Gaussian",
            ARG,
            OBS,
            pairs(&[("mu", Alias::input("m")), ("std", Alias::constant(1.0))]),
            pairs(&[("x", Alias::input("x")), ("y", Alias::input("y"))]),
        )
        .unwrap();
        assert_eq!(ok.input_needed.iter().cloned().collect::<Vec<_>>(), vec!["m", "x"]);
        assert_eq!(ok.direct_observables().collect::<Vec<_>>(), vec!["x"]);
    }

    #[test]
    // Purpose
    // -------
    // Every declared name needs an alias.
    fn requires_every_declared_name() {
        let err = Remap::new("Gaussian", ARG, OBS, pairs(&[("mu", Alias::constant(0.0))]), vec![])
            .unwrap_err();
        assert_eq!(err, ModelError::MissingAlias { model: "Gaussian", name: "std".to_string() });
    }

    #[test]
    // Purpose
    // -------
    // Arguments evaluate against inputs; views list observables first.
    fn evaluates_and_views() {
        let remap = Remap::new(
            "Gaussian",
            ARG,
            OBS,
            pairs(&[("mu", Alias::input("m")), ("std", Alias::constant(2.0))]),
            pairs(&[("x", Alias::input("x"))]),
        )
        .unwrap();
        let params: ParamMap = [("m".to_string(), 1.5)].into_iter().collect();

        let arg = remap.arg_from_inputs(&Inputs::new(&params, None)).unwrap();

        assert_eq!(bound(&arg, "Gaussian", "mu").unwrap(), &Value::Scalar(1.5));
        assert_eq!(remap.view_lines(), vec!["x = x", "mu = m", "std = 2"]);
    }
}
