use rayon::prelude::*;
use log::debug;

use crate::error::Result;
use crate::counter::AttributeCounters;
use crate::column::WeightedValueColumn;
use crate::measure::SplitTable;
use crate::sample::{Schema, AttributeKind, Instance};
use super::split_candidate::SplitCandidate;
use super::split_evaluator::SplitEvaluator;


/// Evaluate every attribute of `schema` over the instances of a node,
/// in parallel.
///
/// The counters of the node are built once and shared read-only.
/// Each continuous attribute gets its own [`WeightedValueColumn`],
/// and each attribute a fresh copy of `prototype`,
/// so no evaluation aliases another.
///
/// A nominal attribute that is not [`SplitEvaluator::ok_to_split`]
/// yields a verdict without a split.
///
/// The verdicts are returned in attribute order.
pub fn evaluate_attributes(
    prototype: &SplitEvaluator,
    schema: &Schema,
    instances: &[Instance],
) -> Result<Vec<SplitCandidate>>
{
    let counters = AttributeCounters::build(schema, instances)?;
    let min_split = prototype.config().min_split;

    schema.attributes()
        .par_iter()
        .enumerate()
        .map(|(attr, attribute)| -> Result<SplitCandidate> {
            let mut evaluator = prototype.fresh();
            let candidate = match attribute.kind {
                AttributeKind::Nominal { .. } => {
                    if SplitEvaluator::ok_to_split(attr, &counters, min_split)? {
                        evaluator.make_nominal_split(&counters, attr)?.clone()
                    } else {
                        let n_labels = schema.n_labels().unwrap_or(0);
                        SplitCandidate::none(attr, SplitTable::new(n_labels))
                    }
                },
                AttributeKind::Continuous => {
                    let column = WeightedValueColumn::from_instances(
                        schema, attr, instances
                    )?;
                    evaluator.make_configured_real_split(&column, attr).clone()
                },
            };
            debug!(
                "{}: {} (score {})",
                attribute.name, candidate.split_type(), candidate.score()
            );
            Ok(candidate)
        })
        .collect::<Result<Vec<_>>>()
}


/// Returns the best verdict among `candidates`, `None` if no split exists.
/// Ties resolve to the earliest candidate.
pub fn best_candidate(candidates: &[SplitCandidate])
    -> Option<&SplitCandidate>
{
    candidates.iter()
        .filter(|candidate| candidate.exists_split())
        .fold(None, |best: Option<&SplitCandidate>, candidate| match best {
            Some(b) if !candidate.better_than(b) => Some(b),
            _ => Some(candidate),
        })
}
