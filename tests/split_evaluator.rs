use attrsplit::prelude::*;
use approx::assert_abs_diff_eq;


const RED: usize = 0;
const GREEN: usize = 1;
const BLUE: usize = 2;


fn color_schema() -> Schema {
    let attributes = vec![
        Attribute::nominal("color", 3),
        Attribute::continuous("size"),
        Attribute::nominal("shape", 2),
    ];
    Schema::new(attributes, 2)
}


// color decides the label.
//
//   color  size  shape  label
//   -----  ----  -----  -----
//   red    1     0      0
//   red    2     0      0
//   green  3     0      1
//   blue   4     0      1
fn colors() -> Vec<Instance> {
    use AttrValue::*;
    vec![
        Instance::labeled(vec![Nominal(RED),   Real(1.0), Nominal(0)], 0, 1.0),
        Instance::labeled(vec![Nominal(RED),   Real(2.0), Nominal(0)], 0, 1.0),
        Instance::labeled(vec![Nominal(GREEN), Real(3.0), Nominal(0)], 1, 1.0),
        Instance::labeled(vec![Nominal(BLUE),  Real(4.0), Nominal(0)], 1, 1.0),
    ]
}


#[test]
fn nominal_split_of_a_decisive_attribute() {
    let counters = AttributeCounters::build(&color_schema(), &colors())
        .unwrap();

    assert!(SplitEvaluator::ok_to_split(0, &counters, 1.0).unwrap());

    let mut evaluator = SplitEvaluatorBuilder::new().build();
    let candidate = evaluator.make_nominal_split(&counters, 0).unwrap();

    assert!(candidate.exists_split());
    assert_eq!(candidate.split_type(), SplitType::Nominal);
    assert_eq!(
        candidate.rule(),
        &SplitRule::Nominal { values: vec![RED, GREEN, BLUE] }
    );
    assert_eq!(candidate.n_branches(), 3);
    assert_eq!(candidate.penalty(), 0.0);

    // Pure branches: the mutual information is the label entropy.
    assert_abs_diff_eq!(candidate.mutual_info(), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(candidate.score(), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(candidate.split_entropy(), 1.5, epsilon = 1e-12);
}


#[test]
fn criteria_rescale_the_same_split() {
    let counters = AttributeCounters::build(&color_schema(), &colors())
        .unwrap();

    let mut evaluator = SplitEvaluatorBuilder::new()
        .criterion(Criterion::GainRatio)
        .build();
    let candidate = evaluator.make_nominal_split(&counters, 0).unwrap();
    assert_abs_diff_eq!(candidate.score(), 1.0 / 1.5, epsilon = 1e-12);
    assert_abs_diff_eq!(candidate.gain_ratio(), 1.0 / 1.5, epsilon = 1e-12);

    let mut evaluator = SplitEvaluatorBuilder::new()
        .criterion(Criterion::NormalizedMutualInformation)
        .build();
    let candidate = evaluator.make_nominal_split(&counters, 0).unwrap();
    assert_abs_diff_eq!(candidate.score(), 1.0 / 3f64.log2(), epsilon = 1e-12);
}


#[test]
fn external_score_sees_the_raw_table() {
    let counters = AttributeCounters::build(&color_schema(), &colors())
        .unwrap();

    let mut evaluator = SplitEvaluatorBuilder::new()
        .external_score(|table: &SplitTable| table.known_weight() / 10.0)
        .build();
    assert_eq!(evaluator.config().criterion, Criterion::External);

    let candidate = evaluator.make_nominal_split(&counters, 0).unwrap();
    assert_abs_diff_eq!(candidate.score(), 0.4, epsilon = 1e-12);
}


#[test]
fn external_score_sees_a_single_branch() {
    let schema = color_schema();
    let instances = colors()
        .into_iter()
        .map(|mut instance| {
            instance.values[0] = AttrValue::Nominal(BLUE);
            instance
        })
        .collect::<Vec<_>>();
    let counters = AttributeCounters::build(&schema, &instances).unwrap();

    let mut evaluator = SplitEvaluatorBuilder::new()
        .external_score(|table: &SplitTable| table.n_branches() as f64 + 0.5)
        .build();
    let candidate = evaluator.make_nominal_split(&counters, 0).unwrap();
    assert_eq!(candidate.n_branches(), 1);
    assert_eq!(candidate.score(), 1.5);
}


#[test]
#[should_panic]
fn external_criterion_without_a_score_function() {
    SplitEvaluatorBuilder::new()
        .criterion(Criterion::External)
        .build();
}


#[test]
fn single_observed_value() {
    let schema = color_schema();
    let instances = colors()
        .into_iter()
        .map(|mut instance| {
            instance.values[0] = AttrValue::Nominal(GREEN);
            instance
        })
        .collect::<Vec<_>>();
    let counters = AttributeCounters::build(&schema, &instances).unwrap();

    assert!(!SplitEvaluator::ok_to_split(0, &counters, 1.0).unwrap());

    // A forced split still exists, with a single branch and no gain.
    let mut evaluator = SplitEvaluatorBuilder::new().build();
    let candidate = evaluator.make_nominal_split(&counters, 0).unwrap();
    assert!(candidate.exists_split());
    assert_eq!(candidate.n_branches(), 1);
    assert_eq!(candidate.score(), 0.0);
    assert!(!candidate.has_gain_ratio());

    // Gain ratio of a single branch scores 0 instead of panicking.
    let mut evaluator = SplitEvaluatorBuilder::new()
        .criterion(Criterion::GainRatio)
        .build();
    let candidate = evaluator.make_nominal_split(&counters, 0).unwrap();
    assert_eq!(candidate.score(), 0.0);
}


#[test]
fn ok_to_split_honors_min_split() {
    let counters = AttributeCounters::build(&color_schema(), &colors())
        .unwrap();

    // red carries 2, green and blue 1 each.
    assert!(SplitEvaluator::ok_to_split(0, &counters, 1.0).unwrap());
    assert!(!SplitEvaluator::ok_to_split(0, &counters, 1.5).unwrap());

    // shape is constant.
    assert!(!SplitEvaluator::ok_to_split(2, &counters, 1.0).unwrap());

    // size is continuous.
    assert!(matches!(
        SplitEvaluator::ok_to_split(1, &counters, 1.0),
        Err(SplitError::InvalidAttribute(1))
    ));
}


#[test]
fn partition_split_groups_values() {
    let counters = AttributeCounters::build(&color_schema(), &colors())
        .unwrap();

    let mut evaluator = SplitEvaluatorBuilder::new().build();
    let candidate = evaluator
        .make_partition_split(&counters, 0, &[0, 1, 1])
        .unwrap();

    assert_eq!(candidate.split_type(), SplitType::Partition);
    assert_eq!(candidate.partition(), Some(&[0, 1, 1][..]));
    assert_eq!(candidate.table().branch(0), &[2.0, 0.0]);
    assert_eq!(candidate.table().branch(1), &[0.0, 2.0]);
    assert_abs_diff_eq!(candidate.score(), 1.0, epsilon = 1e-12);

    // Everything in one branch.
    evaluator.reset();
    let candidate = evaluator
        .make_partition_split(&counters, 0, &[0, 0, 0])
        .unwrap();
    assert!(candidate.exists_split());
    assert_eq!(candidate.score(), 0.0);
}


#[test]
#[should_panic]
fn partition_must_cover_every_value() {
    let counters = AttributeCounters::build(&color_schema(), &colors())
        .unwrap();
    let mut evaluator = SplitEvaluatorBuilder::new().build();
    let _ = evaluator.make_partition_split(&counters, 0, &[0, 1]);
}


#[test]
fn unknown_values_do_not_inform() {
    let mut instances = colors();
    instances.push(Instance::labeled(
        vec![AttrValue::Unknown, AttrValue::Real(5.0), AttrValue::Nominal(1)],
        1,
        4.0,
    ));
    let counters = AttributeCounters::build(&color_schema(), &instances)
        .unwrap();

    let mut evaluator = SplitEvaluatorBuilder::new().build();
    let candidate = evaluator.make_nominal_split(&counters, 0).unwrap();
    assert_eq!(candidate.table().unknown(), &[0.0, 4.0]);
    assert_abs_diff_eq!(candidate.mutual_info(), 1.0, epsilon = 1e-12);
}


#[test]
fn unlabeled_data_has_no_split() {
    let schema = Schema::unlabeled(vec![Attribute::nominal("color", 3)]);
    let instances = vec![
        Instance::unlabeled(vec![AttrValue::Nominal(RED)], 1.0),
        Instance::unlabeled(vec![AttrValue::Nominal(BLUE)], 1.0),
    ];
    let counters = AttributeCounters::build(&schema, &instances).unwrap();
    assert_eq!(counters.attr_count(0, BLUE).unwrap(), 1.0);

    let mut evaluator = SplitEvaluatorBuilder::new().build();
    let candidate = evaluator.make_nominal_split(&counters, 0).unwrap();
    assert!(!candidate.exists_split());
    assert_eq!(candidate.score(), 0.0);

    evaluator.reset();
    let candidate = evaluator
        .make_partition_split(&counters, 0, &[0, 1, 1])
        .unwrap();
    assert!(!candidate.exists_split());
}


#[test]
fn unlabeled_sweep_yields_no_split_verdicts() {
    let schema = Schema::unlabeled(vec![
        Attribute::nominal("color", 2),
        Attribute::continuous("size"),
    ]);
    let instances = vec![
        Instance::unlabeled(vec![AttrValue::Nominal(0), AttrValue::Real(1.0)], 1.0),
        Instance::unlabeled(vec![AttrValue::Nominal(1), AttrValue::Real(2.0)], 1.0),
    ];

    let prototype = SplitEvaluatorBuilder::new().build();
    let candidates = evaluate_attributes(&prototype, &schema, &instances)
        .unwrap();
    assert_eq!(candidates.len(), 2);
    assert!(candidates.iter().all(|c| !c.exists_split()));
    assert!(best_candidate(&candidates).is_none());
}


#[test]
fn ok_to_split_tolerates_rounding() {
    // Eleven instances of weight 0.1 add up to 1.0999999999999999.
    let schema = Schema::new(vec![Attribute::nominal("color", 2)], 2);
    let instances = (0..22)
        .map(|i| {
            let value = i % 2;
            Instance::labeled(vec![AttrValue::Nominal(value)], value, 0.1)
        })
        .collect::<Vec<_>>();
    let counters = AttributeCounters::build(&schema, &instances).unwrap();

    assert!(SplitEvaluator::ok_to_split(0, &counters, 1.1).unwrap());
    assert!(!SplitEvaluator::ok_to_split(0, &counters, 1.2).unwrap());
}


#[test]
fn evaluator_holds_one_verdict() {
    let counters = AttributeCounters::build(&color_schema(), &colors())
        .unwrap();
    let mut evaluator = SplitEvaluatorBuilder::new().build();
    assert!(evaluator.candidate().is_none());

    evaluator.make_nominal_split(&counters, 0).unwrap();
    assert!(evaluator.is_evaluated());
    assert_eq!(evaluator.candidate().unwrap().attr_index(), 0);

    evaluator.reset();
    assert!(!evaluator.is_evaluated());
    evaluator.make_nominal_split(&counters, 2).unwrap();

    let candidate = evaluator.into_candidate().unwrap();
    assert_eq!(candidate.attr_index(), 2);
}


#[test]
#[should_panic]
fn evaluating_twice_without_reset() {
    let counters = AttributeCounters::build(&color_schema(), &colors())
        .unwrap();
    let mut evaluator = SplitEvaluatorBuilder::new().build();
    evaluator.make_nominal_split(&counters, 0).unwrap();
    let _ = evaluator.make_nominal_split(&counters, 0);
}


// 1  2 | 3  4 | 5  6
// no no| yes yes| no no
fn stripes() -> WeightedValueColumn {
    let mut column = WeightedValueColumn::new(6, Some(2));
    for (value, label) in [
        (4.0, 1), (1.0, 0), (6.0, 0), (3.0, 1), (5.0, 0), (2.0, 0),
    ] {
        column.add_labeled_known(value, label, 1.0).unwrap();
    }
    column.sort();
    column
}


#[test]
fn multi_threshold_split_finds_both_stripes() {
    let column = stripes();
    let mut evaluator = SplitEvaluatorBuilder::new()
        .penalize_mdl(false)
        .build();
    let candidate = evaluator.make_multi_threshold_split(&column, 0, 3, 1.0);

    assert_eq!(candidate.split_type(), SplitType::MultiThreshold);
    assert_eq!(candidate.thresholds(), &[2.5, 4.5]);
    assert_eq!(candidate.n_branches(), 3);

    // Pure intervals: the mutual information is the label entropy.
    let info = entropy(&[4.0, 2.0]);
    assert_abs_diff_eq!(candidate.score(), info, epsilon = 1e-12);

    // A binary split only isolates one stripe.
    evaluator.reset();
    let binary = evaluator.make_real_split(&column, 0, 1.0, 0, 0.0);
    assert_eq!(binary.threshold(), 2.5);
    assert!(binary.score() < info);
}


#[test]
fn multi_threshold_split_stops_without_gain() {
    let column = stripes();
    let mut evaluator = SplitEvaluatorBuilder::new()
        .penalize_mdl(false)
        .build();
    let candidate = evaluator.make_multi_threshold_split(&column, 0, 5, 1.0);
    assert_eq!(candidate.thresholds(), &[2.5, 4.5]);
}


#[test]
fn multi_threshold_split_pays_one_penalty_per_threshold() {
    let column = stripes();
    let mut evaluator = SplitEvaluatorBuilder::new().build();
    let candidate = evaluator.make_multi_threshold_split(&column, 0, 3, 1.0);

    let penalty = 2.0 * 5f64.log2() / 6.0;
    assert!(candidate.exists_split());
    assert_abs_diff_eq!(candidate.penalty(), penalty, epsilon = 1e-12);
    assert_abs_diff_eq!(
        candidate.score(),
        entropy(&[4.0, 2.0]) - penalty,
        epsilon = 1e-12
    );
}


#[test]
#[should_panic]
fn multi_threshold_split_needs_two_intervals() {
    let column = stripes();
    let mut evaluator = SplitEvaluatorBuilder::new().build();
    evaluator.make_multi_threshold_split(&column, 0, 1, 1.0);
}


#[test]
fn configured_real_split_follows_max_intervals() {
    let column = stripes();

    let mut evaluator = SplitEvaluatorBuilder::new()
        .penalize_mdl(false)
        .build();
    let candidate = evaluator.make_configured_real_split(&column, 0);
    assert_eq!(candidate.split_type(), SplitType::RealThreshold);

    let mut evaluator = SplitEvaluatorBuilder::new()
        .penalize_mdl(false)
        .max_intervals(3)
        .build();
    let candidate = evaluator.make_configured_real_split(&column, 0);
    assert_eq!(candidate.split_type(), SplitType::MultiThreshold);
}


#[test]
fn every_attribute_is_evaluated() {
    let schema = color_schema();
    let prototype = SplitEvaluatorBuilder::new()
        .penalize_mdl(false)
        .build();
    let candidates = evaluate_attributes(&prototype, &schema, &colors())
        .unwrap();

    assert_eq!(candidates.len(), 3);
    for (attr, candidate) in candidates.iter().enumerate() {
        assert_eq!(candidate.attr_index(), attr);
    }

    // color is pure, size cuts between 2 and 3, shape is constant.
    assert_eq!(candidates[0].split_type(), SplitType::Nominal);
    assert_eq!(candidates[1].threshold(), 2.5);
    assert!(!candidates[2].exists_split());

    // color and size tie, the earliest wins.
    let best = best_candidate(&candidates).unwrap();
    assert_eq!(best.attr_index(), 0);

    // The prototype is left untouched.
    assert!(!prototype.is_evaluated());
}


#[test]
fn no_best_candidate_without_splits() {
    let schema = color_schema();
    let instances = colors()
        .into_iter()
        .map(|mut instance| {
            instance.label = Some(0);
            instance
        })
        .collect::<Vec<_>>();
    let prototype = SplitEvaluatorBuilder::new().build();
    let candidates = evaluate_attributes(&prototype, &schema, &instances)
        .unwrap();

    // color still splits with a zero score.
    assert!(candidates[0].exists_split());
    assert_eq!(candidates[0].score(), 0.0);
    assert!(!candidates[1].exists_split());

    let best = best_candidate(&candidates).unwrap();
    assert_eq!(best.attr_index(), 0);
    assert!(best_candidate(&candidates[1..]).is_none());
}


#[test]
fn malformed_instances_fail_the_sweep() {
    let schema = color_schema();
    let mut instances = colors();
    instances.push(Instance::labeled(vec![AttrValue::Nominal(RED)], 0, 1.0));

    let prototype = SplitEvaluatorBuilder::new().build();
    assert!(matches!(
        evaluate_attributes(&prototype, &schema, &instances),
        Err(SplitError::SchemaMismatch { .. })
    ));
}


#[test]
fn config_from_json() {
    let config = SplitConfig::from_json(
        r#"{ "criterion": "NormalizedMutualInformation", "max_intervals": 3 }"#
    ).unwrap();
    assert_eq!(config.criterion, Criterion::NormalizedMutualInformation);
    assert_eq!(config.max_intervals, 3);
    assert_eq!(config.min_split, 1.0);

    let evaluator = SplitEvaluatorBuilder::new().config(config).build();
    assert_eq!(evaluator.config(), &config);

    let back = SplitConfig::from_json(config.to_json().unwrap()).unwrap();
    assert_eq!(back, config);

    assert!(matches!(
        SplitConfig::from_json(r#"{ "criterion": "Gini" }"#),
        Err(SplitError::Config(_))
    ));
}
