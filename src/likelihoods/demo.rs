//! likelihoods::demo — a three-source unbinned search likelihood.
//!
//! Purpose
//! -------
//! Describe a counting-plus-shape analysis with two backgrounds (`er`,
//! `nr`) and one signal (`wimp`) template. Background rates are free
//! parameters on a log10 scale; the signal is scaled by a log10 multiplier
//! of the signal template's own normalization; the `nr` rate is constrained
//! by an ancillary Gaussian measurement.
//!
//! Key behaviors
//! -------------
//! - Parameters: `lg_er_rate`, `lg_nr_rate`, `lg_sig_mul`, each ranged
//!   `(-50, 50)`.
//! - Terms: `poiss_tot` (total count), `unbinned_pdf` (event shapes),
//!   `anc_nr_rate` (rate constraint).
//! - Toys: the total count is drawn from `poiss_tot`, then that many events
//!   from `unbinned_pdf`, stored under `data`.
//!
//! Conventions
//! -----------
//! - Templates come from the global configuration (`er`, `nr`, `wimp`
//!   options, resolved through `url_base`) or are passed in directly with
//!   [`DemoLikelihood::from_templates`].
use crate::config::{
    errors::ConfigResult,
    options::{BuiltConfig, ConfigOption, ConfigSpec},
    template::Template,
};
use crate::likelihood::{
    composite::Likelihood, errors::LikelihoodResult, profiled::ProfiledLikelihood,
    simulate::CountThenShapeSimulator,
};
use crate::model::{Alias, Gaussian, MultiSourceUnbinnedPdf, Poisson, TermSpec, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Factory for the demo likelihood.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoLikelihood;

impl DemoLikelihood {
    pub const NAME: &'static str = "DemoLikelihood";
    pub const HIST_NAME: &'static str = "cs1-log10_cs2-r";
    pub const PARAMS: [&'static str; 3] = ["lg_er_rate", "lg_nr_rate", "lg_sig_mul"];
    pub const DATA_KEY: &'static str = "data";

    pub fn config_spec() -> ConfigResult<ConfigSpec> {
        ConfigSpec::new(Self::NAME)
            .with(ConfigOption::template(
                "er",
                Some("ER/template_XENONnT_ER_fv_default.json"),
                Self::HIST_NAME,
                "electronic-recoil background template",
            ))?
            .with(ConfigOption::template(
                "nr",
                Some("RG/template_XENONnT_RG_fv_default.json"),
                Self::HIST_NAME,
                "nuclear-recoil background template",
            ))?
            .with(ConfigOption::template(
                "wimp",
                Some("WIMP-50GeV/template_XENONnT_WIMP-50GeV_fv_default.json"),
                Self::HIST_NAME,
                "signal template",
            ))?
            .with(ConfigOption::constant(
                "nr_rate_relative_std",
                Some(0.1),
                "relative width of the nr rate constraint",
            ))
    }

    /// Build from the global configuration, loading templates from disk.
    pub fn new() -> LikelihoodResult<ProfiledLikelihood<Likelihood>> {
        Self::from_config(Self::config_spec()?.build()?)
    }

    /// Build with in-memory templates; constants still come from the
    /// global configuration.
    pub fn from_templates(
        er: Template, nr: Template, wimp: Template,
    ) -> LikelihoodResult<ProfiledLikelihood<Likelihood>> {
        let templates: BTreeMap<String, Arc<Template>> = [
            ("er".to_string(), Arc::new(er)),
            ("nr".to_string(), Arc::new(nr)),
            ("wimp".to_string(), Arc::new(wimp)),
        ]
        .into_iter()
        .collect();
        Self::from_config(Self::config_spec()?.build_with(&templates)?)
    }

    pub fn from_config(config: BuiltConfig) -> LikelihoodResult<ProfiledLikelihood<Likelihood>> {
        let er = config.template("er")?;
        let nr = config.template("nr")?;
        let wimp = config.template("wimp")?;
        let rel_std = config.constant("nr_rate_relative_std")?;
        let (nr_norm, wimp_norm) = (nr.norm(), wimp.norm());
        let sources = vec![nr, er, wimp];
        let [lg_er, lg_nr, lg_sig] = Self::PARAMS;

        let terms = vec![
            TermSpec::new("poiss_tot", Poisson)
                .arg(
                    "lam",
                    Alias::scalar_fn(
                        &[lg_nr, lg_er, lg_sig],
                        "10**lg_nr_rate + 10**lg_er_rate + wimp.norm * 10**lg_sig_mul",
                        move |v| 10f64.powf(v[0]) + 10f64.powf(v[1]) + wimp_norm * 10f64.powf(v[2]),
                    ),
                )
                .obs(
                    "n",
                    Alias::func(&[Self::DATA_KEY], "len(data)", |v| Ok(Value::Count(v[0].len() as u64))),
                ),
            TermSpec::new("unbinned_pdf", MultiSourceUnbinnedPdf)
                .arg(
                    "templates",
                    Alias::func(&[], "(nr, er, wimp)", move |_| Ok(Value::Templates(sources.clone()))),
                )
                .arg(
                    "weights",
                    Alias::scalars_fn(
                        &[lg_nr, lg_er, lg_sig],
                        "(10**lg_nr_rate, 10**lg_er_rate, wimp.norm * 10**lg_sig_mul)",
                        move |v| vec![10f64.powf(v[0]), 10f64.powf(v[1]), wimp_norm * 10f64.powf(v[2])],
                    ),
                )
                .obs("events", Alias::input(Self::DATA_KEY)),
            TermSpec::new("anc_nr_rate", Gaussian)
                .arg("mu", Alias::func(&[], "nr.norm", move |_| Ok(Value::Scalar(nr_norm))))
                .arg(
                    "std",
                    Alias::func(&[], "nr.norm * nr_rate_relative_std", move |_| {
                        Ok(Value::Scalar(nr_norm * rel_std))
                    }),
                )
                .obs("x", Alias::scalar_fn(&[lg_nr], "10**lg_nr_rate", |v| 10f64.powf(v[0]))),
        ];

        let mut llh = Likelihood::new(Self::NAME, config, terms)?
            .with_simulator(CountThenShapeSimulator::new("poiss_tot", "unbinned_pdf", Self::DATA_KEY));
        llh.set_param_range(Self::PARAMS.iter().map(|p| (p.to_string(), (-50.0, 50.0))).collect())?;
        Ok(ProfiledLikelihood::new(llh))
    }
}
