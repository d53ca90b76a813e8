use serde::{Serialize, Deserialize};

use std::fmt;

use crate::constants::SPLIT_ENTROPY_TOLERANCE;
use crate::measure::{SplitTable, gain_ratio};


/// The kind of a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitType {
    /// No split exists.
    None,
    /// A binary split of a continuous attribute at one threshold.
    RealThreshold,
    /// A split of a continuous attribute into several intervals.
    MultiThreshold,
    /// One branch per observed nominal value.
    Nominal,
    /// Nominal values grouped into branches.
    Partition,
}


impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "no split",
            Self::RealThreshold => "real threshold",
            Self::MultiThreshold => "multi threshold",
            Self::Nominal => "nominal",
            Self::Partition => "partition",
        };
        write!(f, "{name}")
    }
}


/// The rule that routes an instance to a branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SplitRule {
    /// No split exists.
    None,
    /// Values `<= threshold` go to branch `0`, the others to branch `1`.
    RealThreshold(f64),
    /// Ascending thresholds `t_0 < t_1 < ...`.
    /// Values in `(t_{b-1}, t_b]` go to branch `b`.
    MultiThreshold(Vec<f64>),
    /// Branch `b` holds the instances of nominal value `values[b]`.
    Nominal {
        /// The nominal value of each branch.
        values: Vec<usize>,
    },
    /// Nominal value `v` goes to branch `branch_of[v]`.
    Partition {
        /// The branch of each nominal value.
        branch_of: Vec<usize>,
    },
}


impl SplitRule {
    /// Returns the kind of this rule.
    #[inline]
    pub fn split_type(&self) -> SplitType {
        match self {
            Self::None => SplitType::None,
            Self::RealThreshold(_) => SplitType::RealThreshold,
            Self::MultiThreshold(_) => SplitType::MultiThreshold,
            Self::Nominal { .. } => SplitType::Nominal,
            Self::Partition { .. } => SplitType::Partition,
        }
    }
}


/// The verdict of a [`SplitEvaluator`](crate::SplitEvaluator)
/// for one attribute of a node.
///
/// A candidate with `exists_split() == false` is a legitimate outcome,
/// not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitCandidate {
    pub(super) attr: usize,
    pub(super) rule: SplitRule,
    pub(super) exists: bool,
    pub(super) penalty: f64,
    pub(super) score: f64,
    pub(super) mutual_info: f64,
    pub(super) split_entropy: f64,
    pub(super) table: SplitTable,
}


impl SplitCandidate {
    /// Construct a verdict without a split.
    pub(super) fn none(attr: usize, table: SplitTable) -> Self {
        Self {
            attr,
            rule: SplitRule::None,
            exists: false,
            penalty: 0f64,
            score: 0f64,
            mutual_info: 0f64,
            split_entropy: 0f64,
            table,
        }
    }


    /// Returns the index of the evaluated attribute.
    #[inline]
    pub fn attr_index(&self) -> usize {
        self.attr
    }


    /// Returns `true` if a split exists.
    #[inline]
    pub fn exists_split(&self) -> bool {
        self.exists
    }


    /// Returns the kind of the split.
    #[inline]
    pub fn split_type(&self) -> SplitType {
        self.rule.split_type()
    }


    /// Returns the splitting rule.
    #[inline]
    pub fn rule(&self) -> &SplitRule {
        &self.rule
    }


    /// Returns the threshold of a binary continuous split.
    ///
    /// # Panics
    /// Panics if this is not a `SplitType::RealThreshold` split.
    #[inline]
    pub fn threshold(&self) -> f64 {
        match self.rule {
            SplitRule::RealThreshold(threshold) => threshold,
            _ => panic!(
                "threshold() called on a {} split of attribute {}",
                self.split_type(), self.attr
            ),
        }
    }


    /// Returns the threshold of a binary continuous split, if any.
    #[inline]
    pub fn real_threshold(&self) -> Option<f64> {
        match self.rule {
            SplitRule::RealThreshold(threshold) => Some(threshold),
            _ => None,
        }
    }


    /// Returns the thresholds of a continuous split.
    /// Empty for the other kinds.
    pub fn thresholds(&self) -> &[f64] {
        match &self.rule {
            SplitRule::RealThreshold(threshold) => std::slice::from_ref(threshold),
            SplitRule::MultiThreshold(thresholds) => &thresholds[..],
            _ => &[],
        }
    }


    /// Returns the branch of each nominal value of a partition split.
    pub fn partition(&self) -> Option<&[usize]> {
        match &self.rule {
            SplitRule::Partition { branch_of } => Some(&branch_of[..]),
            _ => None,
        }
    }


    /// Returns the score of the split under the configured criterion,
    /// after the MDL penalty.
    /// The penalty is subtracted from the criterion value itself,
    /// so a gain ratio split scores `gain_ratio - penalty`.
    /// A candidate without a split scores `0`.
    #[inline]
    pub fn score(&self) -> f64 {
        self.score
    }


    /// Returns the mutual information between the branch and the label.
    #[inline]
    pub fn mutual_info(&self) -> f64 {
        self.mutual_info
    }


    /// Returns the entropy of the branch sizes.
    #[inline]
    pub fn split_entropy(&self) -> f64 {
        self.split_entropy
    }


    /// Returns the gain ratio, `mutual_info / split_entropy`.
    ///
    /// # Panics
    /// Panics if the split entropy is (almost) zero.
    #[inline]
    pub fn gain_ratio(&self) -> f64 {
        gain_ratio(self.mutual_info, self.split_entropy)
    }


    /// Returns `true` if the gain ratio is defined for this split.
    #[inline]
    pub fn has_gain_ratio(&self) -> bool {
        self.split_entropy > SPLIT_ENTROPY_TOLERANCE
    }


    /// Returns the MDL penalty subtracted from the score.
    #[inline]
    pub fn penalty(&self) -> f64 {
        self.penalty
    }


    /// Returns the joint `branch x label` table of the split.
    #[inline]
    pub fn table(&self) -> &SplitTable {
        &self.table
    }


    /// Returns the number of branches.
    #[inline]
    pub fn n_branches(&self) -> usize {
        self.table.n_branches()
    }


    /// Returns `true` if `self` should be preferred to `other`.
    /// A candidate without a split never beats one with a split.
    /// Between two splits, the higher score wins.
    pub fn better_than(&self, other: &Self) -> bool {
        match (self.exists, other.exists) {
            (true, false) => true,
            (false, _) => false,
            (true, true) => self.score > other.score,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(rule: SplitRule, exists: bool, score: f64) -> SplitCandidate {
        let mut candidate = SplitCandidate::none(0, SplitTable::new(2));
        candidate.rule = rule;
        candidate.exists = exists;
        candidate.score = score;
        candidate
    }

    #[test]
    fn test_threshold_accessors() {
        let c = candidate(SplitRule::RealThreshold(2.5), true, 0.3);
        assert_eq!(c.split_type(), SplitType::RealThreshold);
        assert_eq!(c.threshold(), 2.5);
        assert_eq!(c.real_threshold(), Some(2.5));
        assert_eq!(c.thresholds(), &[2.5]);
        assert!(c.partition().is_none());

        let c = candidate(SplitRule::MultiThreshold(vec![1.0, 2.0]), true, 0.3);
        assert_eq!(c.real_threshold(), None);
        assert_eq!(c.thresholds(), &[1.0, 2.0]);
    }

    #[test]
    #[should_panic]
    fn test_threshold_on_nominal_split() {
        let c = candidate(SplitRule::Nominal { values: vec![0, 1] }, true, 0.1);
        c.threshold();
    }

    #[test]
    #[should_panic]
    fn test_gain_ratio_without_split_entropy() {
        let c = candidate(SplitRule::None, false, 0.0);
        assert!(!c.has_gain_ratio());
        c.gain_ratio();
    }

    #[test]
    fn test_better_than() {
        let none = candidate(SplitRule::None, false, 0.0);
        let low = candidate(SplitRule::RealThreshold(1.0), true, 0.1);
        let high = candidate(SplitRule::Nominal { values: vec![0, 1] }, true, 0.4);

        assert!(low.better_than(&none));
        assert!(!none.better_than(&low));
        assert!(high.better_than(&low));
        assert!(!low.better_than(&high));
        assert!(!high.better_than(&high));
    }
}
