use serde::{Serialize, Deserialize};

use std::fmt;

use crate::constants::NUMERIC_TOLERANCE;
use crate::measure::{
    SplitTable,
    mutual_information,
    normalize_by_branch_count,
    split_entropy,
    gain_ratio,
};


/// Scoring criteria for the splits.
/// * `Criterion::MutualInformation` is the raw information gain.
/// * `Criterion::NormalizedMutualInformation` divides the information gain
///     by `log2` of the number of non-empty branches.
/// * `Criterion::GainRatio` divides the information gain
///     by the entropy of the branch sizes.
/// * `Criterion::External` delegates to a user supplied [`SplitScore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Criterion {
    /// Mutual information between the branch and the label.
    #[default]
    MutualInformation,
    /// Mutual information over `log2(#branches)`.
    NormalizedMutualInformation,
    /// Mutual information over the split entropy.
    GainRatio,
    /// A score function supplied through
    /// [`SplitEvaluatorBuilder::external_score`](crate::SplitEvaluatorBuilder::external_score).
    External,
}


impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MutualInformation => "Mutual information",
            Self::NormalizedMutualInformation => "Normalized mutual information",
            Self::GainRatio => "Gain ratio",
            Self::External => "External score",
        };

        write!(f, "{name}")
    }
}


/// A score function over the raw joint table of a split.
/// Higher is better.
///
/// Degenerate tables (a single non-empty branch) are passed through too.
///
/// Any `Fn(&SplitTable) -> f64 + Send + Sync` is a `SplitScore`.
pub trait SplitScore: Send + Sync {
    /// Returns the score of the split described by `table`.
    fn score(&self, table: &SplitTable) -> f64;
}


impl<F> SplitScore for F
    where F: Fn(&SplitTable) -> f64 + Send + Sync,
{
    #[inline]
    fn score(&self, table: &SplitTable) -> f64 {
        self(table)
    }
}


impl Criterion {
    /// Returns the score of `table` based on the criterion.
    ///
    /// Under a built-in criterion, a table with at most one non-empty
    /// branch scores `0`.
    /// `Criterion::External` receives every table as is.
    ///
    /// # Panics
    /// Panics for `Criterion::External` if `external` is `None`.
    pub(crate) fn score(
        &self,
        table: &SplitTable,
        external: Option<&dyn SplitScore>,
    ) -> f64
    {
        if let Criterion::External = self {
            let external = external
                .expect("`Criterion::External` requires a score function");
            return external.score(table);
        }

        let n_branches = table.used_branch_count();
        if n_branches <= 1 { return 0f64; }

        match self {
            Criterion::MutualInformation => mutual_information(table),
            Criterion::NormalizedMutualInformation => {
                let info = mutual_information(table);
                normalize_by_branch_count(info, n_branches)
            },
            Criterion::GainRatio => {
                // `I(label; branch) <= H(branch)`, so a positive information
                // guarantees a positive split entropy.
                let info = mutual_information(table);
                if info <= NUMERIC_TOLERANCE { return 0f64; }
                let ent = split_entropy(&table.branch_weights());
                gain_ratio(info, ent)
            },
            Criterion::External => unreachable!(),
        }
    }
}
