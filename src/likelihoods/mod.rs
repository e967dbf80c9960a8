//! Ready-made likelihoods.

pub mod demo;

pub use self::demo::DemoLikelihood;
