/*
 * This modules contains the quality of life structs used to configure an evaluation. The
 * `MucConfig` struct implements the default trait and can be passed to the `evaluate_conf`
 * function to simplify its arguments.
*/
use crate::analysis::DEFAULT_CONFUSION_THRESHOLD;
use crate::metrics::DEFAULT_EPSILON;
use either::Either as LeftOrRight;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
/// Config struct used to simplify the inputs of parameters to `evaluate_conf`. It implements the
/// default trait.
pub struct MucConfig {
    /// Smoothing term added to the numerator and the denominator of the precision and the recall.
    /// It keeps the scores defined when nothing was predicted or nothing was expected.
    pub epsilon: f64,
    /// Can we use multiple cores to align the samples? Most corpora are too small to benefit from
    /// it.
    pub parallel: bool,
    /// Minimal number of incorrect spans a true type needs to appear in the confusion matrix.
    pub confusion_threshold: usize,
}

impl Default for MucConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            parallel: false,
            confusion_threshold: DEFAULT_CONFUSION_THRESHOLD,
        }
    }
}

impl From<(f64, bool, usize)> for MucConfig {
    fn from(value: (f64, bool, usize)) -> Self {
        Self {
            epsilon: value.0,
            parallel: value.1,
            confusion_threshold: value.2,
        }
    }
}

impl From<MucConfig> for (f64, bool, usize) {
    fn from(value: MucConfig) -> Self {
        (value.epsilon, value.parallel, value.confusion_threshold)
    }
}

impl<Eps: Into<f64>> From<MucConfigBuilder<Eps>> for MucConfig {
    fn from(value: MucConfigBuilder<Eps>) -> Self {
        Self {
            epsilon: value.epsilon.either_into(),
            parallel: value.parallel,
            confusion_threshold: value.confusion_threshold,
        }
    }
}

impl Display for MucConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Smoothing epsilon: {}\n Using parallel computations: {}\n Confusion matrix threshold: {}",
            self.epsilon, self.parallel, self.confusion_threshold
        )
    }
}

/// This builder can be used to build and customize a `MucConfig` structure.
pub struct MucConfigBuilder<Eps: Into<f64>> {
    epsilon: LeftOrRight<Eps, f64>,
    parallel: bool,
    confusion_threshold: usize,
}

impl Default for MucConfigBuilder<f64> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Eps: Into<f64>> MucConfigBuilder<Eps> {
    pub fn epsilon(mut self, epsilon: Eps) -> Self {
        self.epsilon = LeftOrRight::Left(epsilon);
        self
    }
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
    pub fn confusion_threshold(mut self, confusion_threshold: usize) -> Self {
        self.confusion_threshold = confusion_threshold;
        self
    }
    pub fn new() -> Self {
        Self {
            epsilon: LeftOrRight::Right(DEFAULT_EPSILON),
            parallel: false,
            confusion_threshold: DEFAULT_CONFUSION_THRESHOLD,
        }
    }
    pub fn build(self) -> MucConfig {
        MucConfig::from(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_builder_defaults() {
        let config = MucConfigBuilder::default().build();
        assert_eq!(config, MucConfig::default());
        assert_eq!(config.epsilon, 1e-5);
        assert_eq!(config.confusion_threshold, 3);
        assert!(!config.parallel);
    }

    #[rstest]
    #[case(0.0)]
    #[case(1e-6)]
    #[case(0.5)]
    fn test_builder_setters_epsilon(#[case] epsilon: f64) {
        let builder = MucConfigBuilder::default();
        let config = builder.epsilon(epsilon).build();
        assert_eq!(config.epsilon, epsilon)
    }

    #[test]
    fn test_builder_setters_epsilon_from_f32() {
        let config = MucConfigBuilder::<f32>::new().epsilon(0.25).build();
        assert_eq!(config.epsilon, 0.25)
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn test_builder_setters_parallel(#[case] parallel: bool) {
        let builder = MucConfigBuilder::default();
        let config = builder.parallel(parallel).build();
        assert_eq!(config.parallel, parallel)
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(10)]
    fn test_builder_setters_confusion_threshold(#[case] threshold: usize) {
        let builder = MucConfigBuilder::default();
        let config = builder.confusion_threshold(threshold).build();
        assert_eq!(config.confusion_threshold, threshold)
    }

    #[test]
    fn test_tuple_conversions() {
        let config = MucConfig::from((0.1, true, 2));
        assert_eq!(config.epsilon, 0.1);
        let tuple: (f64, bool, usize) = config.into();
        assert_eq!(tuple, (0.1, true, 2));
    }
}
