use serde::{Serialize, Deserialize};

use std::fmt;
use std::sync::Arc;

use crate::common::checker;
use crate::constants::{DEFAULT_MIN_SPLIT, DEFAULT_MAX_INTERVALS};
use crate::error::Result;
use super::criterion::{Criterion, SplitScore};
use super::split_evaluator::SplitEvaluator;


/// Parameters of a [`SplitEvaluator`].
///
/// Missing fields take their default values when deserialized:
/// ```txt
/// criterion: Criterion::MutualInformation,
/// min_split: 1.0,
/// penalize_mdl: true,
/// smooth_instances: 0,
/// smooth_factor: 0.0,
/// max_intervals: 2,
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Scoring criterion.
    pub criterion: Criterion,
    /// Minimum weight a branch of a continuous split must carry.
    pub min_split: f64,
    /// Subtract the MDL penalty from the score of a continuous split.
    /// The penalty is in bits per unit weight and is subtracted from
    /// the criterion value, whatever the criterion is.
    pub penalize_mdl: bool,
    /// Number of pseudo-instances added to each branch when scoring
    /// a threshold.
    pub smooth_instances: usize,
    /// Weight of each pseudo-instance.
    pub smooth_factor: f64,
    /// Maximal number of intervals of a continuous split.
    /// `2` means a single threshold.
    pub max_intervals: usize,
}


impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            criterion: Criterion::default(),
            min_split: DEFAULT_MIN_SPLIT,
            penalize_mdl: true,
            smooth_instances: 0,
            smooth_factor: 0f64,
            max_intervals: DEFAULT_MAX_INTERVALS,
        }
    }
}


impl SplitConfig {
    /// Read a configuration from a JSON string.
    ///
    /// # Example
    /// ```
    /// use attrsplit::prelude::*;
    ///
    /// let config = SplitConfig::from_json(
    ///     r#"{ "criterion": "GainRatio", "min_split": 2.0 }"#
    /// ).unwrap();
    /// assert_eq!(config.criterion, Criterion::GainRatio);
    /// assert!(config.penalize_mdl);
    /// ```
    pub fn from_json<S: AsRef<str>>(json: S) -> Result<Self> {
        let config = serde_json::from_str(json.as_ref())?;
        Ok(config)
    }


    /// Write this configuration as a JSON string.
    pub fn to_json(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(json)
    }


    /// Check the pre-conditions of the parameters.
    ///
    /// # Panics
    /// Panics if some parameter is out of its domain.
    pub(crate) fn check(&self) {
        checker::min_split(self.min_split);
        checker::smoothing(self.smooth_instances, self.smooth_factor);
        checker::max_intervals(self.max_intervals);
    }
}


impl fmt::Display for SplitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "criterion: {}, min_split: {}, MDL penalty: {}, \
            smoothing: {} x {}, max intervals: {}",
            self.criterion,
            self.min_split,
            self.penalize_mdl,
            self.smooth_instances,
            self.smooth_factor,
            self.max_intervals,
        )
    }
}


/// A struct that builds [`SplitEvaluator`].
/// `SplitEvaluatorBuilder` keeps parameters for constructing the evaluator.
///
/// # Example
///
/// ```
/// use attrsplit::prelude::*;
///
/// let evaluator = SplitEvaluatorBuilder::new()
///     .criterion(Criterion::GainRatio)
///     .min_split(2.0)
///     .penalize_mdl(false)
///     .build();
/// assert!(!evaluator.is_evaluated());
/// ```
#[derive(Clone, Default)]
pub struct SplitEvaluatorBuilder {
    config: SplitConfig,
    external: Option<Arc<dyn SplitScore>>,
}


impl SplitEvaluatorBuilder {
    /// Construct a new instance of [`SplitEvaluatorBuilder`]
    /// with the default [`SplitConfig`].
    pub fn new() -> Self {
        Self::default()
    }


    /// Replace all the parameters by `config`.
    #[inline]
    pub fn config(mut self, config: SplitConfig) -> Self {
        self.config = config;
        self
    }


    /// Set the scoring criterion.
    /// Default value is `Criterion::MutualInformation`.
    #[inline]
    pub fn criterion(mut self, criterion: Criterion) -> Self {
        self.config.criterion = criterion;
        self
    }


    /// Set the minimum weight of a branch.
    /// Default value is `1.0`.
    #[inline]
    pub fn min_split(mut self, min_split: f64) -> Self {
        checker::min_split(min_split);
        self.config.min_split = min_split;
        self
    }


    /// Enable or disable the MDL penalty on continuous splits.
    /// Enabled by default.
    #[inline]
    pub fn penalize_mdl(mut self, penalize: bool) -> Self {
        self.config.penalize_mdl = penalize;
        self
    }


    /// Set the smoothing parameters of the threshold search.
    /// Smoothing is disabled by default.
    #[inline]
    pub fn smoothing(mut self, smooth_instances: usize, smooth_factor: f64)
        -> Self
    {
        checker::smoothing(smooth_instances, smooth_factor);
        self.config.smooth_instances = smooth_instances;
        self.config.smooth_factor = smooth_factor;
        self
    }


    /// Set the maximal number of intervals of a continuous split.
    /// Default value is `2`, a single threshold.
    #[inline]
    pub fn max_intervals(mut self, max_intervals: usize) -> Self {
        checker::max_intervals(max_intervals);
        self.config.max_intervals = max_intervals;
        self
    }


    /// Score the splits with `score` instead of a built-in criterion.
    /// This sets the criterion to `Criterion::External`.
    pub fn external_score<S>(mut self, score: S) -> Self
        where S: SplitScore + 'static,
    {
        self.config.criterion = Criterion::External;
        self.external = Some(Arc::new(score));
        self
    }


    /// Build a [`SplitEvaluator`].
    /// This method consumes `self`.
    ///
    /// # Panics
    /// Panics if a parameter is out of its domain,
    /// or if the criterion is `Criterion::External`
    /// without a score function.
    pub fn build(self) -> SplitEvaluator {
        self.config.check();
        assert!(
            self.config.criterion != Criterion::External
                || self.external.is_some(),
            "`Criterion::External` requires `external_score`"
        );
        SplitEvaluator::from_components(self.config, self.external)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SplitConfig::default();
        assert_eq!(config.criterion, Criterion::MutualInformation);
        assert_eq!(config.min_split, 1.0);
        assert!(config.penalize_mdl);
        assert_eq!(config.max_intervals, 2);
    }

    #[test]
    fn test_config_json() {
        let config = SplitConfig::from_json(
            r#"{ "criterion": "NormalizedMutualInformation", "smooth_instances": 3 }"#
        ).unwrap();
        assert_eq!(config.criterion, Criterion::NormalizedMutualInformation);
        assert_eq!(config.smooth_instances, 3);
        assert_eq!(config.min_split, 1.0);

        let json = config.to_json().unwrap();
        assert_eq!(SplitConfig::from_json(json).unwrap(), config);

        assert!(SplitConfig::from_json("{ \"min_split\": \"x\" }").is_err());
    }

    #[test]
    #[should_panic]
    fn test_negative_min_split() {
        SplitEvaluatorBuilder::new().min_split(-1.0);
    }

    #[test]
    #[should_panic]
    fn test_negative_min_split_in_config() {
        let config = SplitConfig { min_split: -1.0, ..SplitConfig::default() };
        SplitEvaluatorBuilder::new().config(config).build();
    }

    #[test]
    #[should_panic]
    fn test_external_criterion_without_function() {
        SplitEvaluatorBuilder::new()
            .criterion(Criterion::External)
            .build();
    }
}
