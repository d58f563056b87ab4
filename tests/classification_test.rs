//! Integration tests for confusion matrices and classification scores

use clsmetrics::{
    accuracy_score, confusion_matrix, f1_score, fbeta_score, precision_score, recall_score,
    Average, Error, Metric, MetricsConfigBuilder, MetricsEngine, ZeroDivision,
};

const BINARY_OBSERVED: [i32; 10] = [0, 1, 1, 0, 1, 0, 0, 1, 1, 0];
const BINARY_PREDICTED: [i32; 10] = [0, 0, 1, 0, 1, 1, 0, 1, 0, 0];

const MULTI_OBSERVED: [i32; 9] = [0, 1, 1, 0, 1, 2, 0, 1, 2];
const MULTI_PREDICTED: [i32; 9] = [0, 2, 1, 0, 2, 1, 0, 0, 2];

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_binary_counts() -> Result<(), Error> {
    let cm = confusion_matrix(&BINARY_OBSERVED, &BINARY_PREDICTED)?;
    let counts = cm.counts_for(&1)?;

    assert_eq!(counts.tp, 3);
    assert_eq!(counts.fp, 1);
    assert_eq!(counts.fn_, 2);
    assert_eq!(counts.tn, 4);
    assert!(approx(cm.accuracy(), 0.7));
    Ok(())
}

#[test]
fn test_binary_per_class_scores() -> Result<(), Error> {
    let precision = precision_score(&BINARY_OBSERVED, &BINARY_PREDICTED, Average::None)?;
    let recall = recall_score(&BINARY_OBSERVED, &BINARY_PREDICTED, Average::None)?;
    let f1 = f1_score(&BINARY_OBSERVED, &BINARY_PREDICTED, Average::None)?;

    assert!(approx(precision.get(&1).unwrap(), 0.75));
    assert!(approx(recall.get(&1).unwrap(), 0.6));
    assert!((f1.get(&1).unwrap() - 0.667).abs() < 1e-3);
    Ok(())
}

#[test]
fn test_multiclass_scenario() -> Result<(), Error> {
    let accuracy = accuracy_score(&MULTI_OBSERVED, &MULTI_PREDICTED)?;
    assert!(approx(accuracy, 5.0 / 9.0));

    let recall = recall_score(&MULTI_OBSERVED, &MULTI_PREDICTED, Average::None)?;
    assert!(approx(recall.get(&0).unwrap(), 1.0));
    assert!(approx(recall.get(&1).unwrap(), 0.25));
    assert!(approx(recall.get(&2).unwrap(), 0.5));

    let precision = precision_score(&MULTI_OBSERVED, &MULTI_PREDICTED, Average::None)?;
    assert!(approx(precision.get(&0).unwrap(), 0.75));
    assert!(approx(precision.get(&1).unwrap(), 0.5));
    assert!(approx(precision.get(&2).unwrap(), 1.0 / 3.0));

    let per_class_order: Vec<i32> = precision
        .per_class()
        .unwrap()
        .iter()
        .map(|(label, _)| *label)
        .collect();
    assert_eq!(per_class_order, vec![0, 1, 2]);
    Ok(())
}

#[test]
fn test_multiclass_macro_and_weighted() -> Result<(), Error> {
    let macro_p = precision_score(&MULTI_OBSERVED, &MULTI_PREDICTED, Average::Macro)?
        .single()
        .unwrap();
    let macro_r = recall_score(&MULTI_OBSERVED, &MULTI_PREDICTED, Average::Macro)?
        .single()
        .unwrap();
    assert!(approx(macro_p, (0.75 + 0.5 + 1.0 / 3.0) / 3.0));
    assert!(approx(macro_r, (1.0 + 0.25 + 0.5) / 3.0));

    // supports are 3, 4 and 2
    let weighted_r = recall_score(&MULTI_OBSERVED, &MULTI_PREDICTED, Average::Weighted)?
        .single()
        .unwrap();
    assert!(approx(weighted_r, (3.0 * 1.0 + 4.0 * 0.25 + 2.0 * 0.5) / 9.0));

    let weighted_p = precision_score(&MULTI_OBSERVED, &MULTI_PREDICTED, Average::Weighted)?
        .single()
        .unwrap();
    assert!(approx(weighted_p, (3.0 * 0.75 + 4.0 * 0.5 + 2.0 / 3.0) / 9.0));
    Ok(())
}

#[test]
fn test_micro_equals_accuracy() -> Result<(), Error> {
    let cases: Vec<(Vec<&str>, Vec<&str>)> = vec![
        (vec!["a", "b", "c", "a"], vec!["a", "c", "c", "b"]),
        (vec!["x"], vec!["y"]),
        (vec!["p", "p", "q"], vec!["p", "p", "q"]),
    ];
    let engine = MetricsEngine::default();

    for (observed, predicted) in cases {
        let eval = engine.evaluate(&observed, &predicted)?;
        let agg = eval.aggregate;
        assert!(approx(agg.accuracy, agg.micro_precision));
        assert!(approx(agg.accuracy, agg.micro_recall));
        assert!(approx(agg.accuracy, agg.micro_f1));

        let micro_f2 = eval.score(Metric::FBeta(2.0), Average::Micro)?.single().unwrap();
        assert!(approx(micro_f2, agg.accuracy));
    }
    Ok(())
}

#[test]
fn test_counts_sum_to_total_for_every_class() -> Result<(), Error> {
    let engine = MetricsEngine::default();
    let eval = engine.evaluate(&MULTI_OBSERVED, &MULTI_PREDICTED)?;

    let cells: usize = eval.matrix.matrix().iter().flatten().sum();
    assert_eq!(cells, MULTI_OBSERVED.len());
    for m in &eval.per_class {
        assert_eq!(m.tp + m.fp + m.fn_ + m.tn, MULTI_OBSERVED.len());
    }
    let support: usize = eval.per_class.iter().map(|m| m.support()).sum();
    assert_eq!(support, MULTI_OBSERVED.len());
    Ok(())
}

#[test]
fn test_perfect_predictions() -> Result<(), Error> {
    let labels = vec!["red", "green", "blue", "green", "red"];
    let engine = MetricsEngine::default();
    let eval = engine.evaluate(&labels, &labels)?;

    assert_eq!(eval.aggregate.accuracy, 1.0);
    for m in &eval.per_class {
        assert_eq!(m.precision, 1.0);
        assert_eq!(m.recall, 1.0);
        assert_eq!(m.f1, 1.0);
    }
    assert!(eval.warnings.is_empty());
    Ok(())
}

#[test]
fn test_class_never_observed() -> Result<(), Error> {
    let observed = vec![0, 0, 1, 1];
    let predicted = vec![0, 2, 1, 1];
    let engine = MetricsEngine::default();
    let eval = engine.evaluate(&observed, &predicted)?;

    let absent = eval.class(&2).unwrap();
    assert_eq!(absent.support(), 0);
    assert_eq!(absent.recall, 0.0);
    assert_eq!(eval.warnings.len(), 1);

    // the absent class contributes nothing to the weighted mean
    let weighted = eval.score(Metric::Recall, Average::Weighted)?.single().unwrap();
    assert!(approx(weighted, (2.0 * 0.5 + 2.0 * 1.0) / 4.0));
    Ok(())
}

#[test]
fn test_class_never_observed_under_nan_policy() -> Result<(), Error> {
    let config = MetricsConfigBuilder::new()
        .zero_division(ZeroDivision::Nan)
        .log_warnings(false)
        .build();
    let engine = MetricsEngine::new(config);
    let eval = engine.evaluate(&[0, 0, 1, 1], &[0, 2, 1, 1])?;

    let absent = eval.class(&2).unwrap();
    assert_eq!(absent.support(), 0);
    assert!(absent.recall.is_nan());

    // zero support keeps the NaN out of the weighted mean
    assert!(approx(eval.aggregate.weighted_recall, 0.75));
    let weighted = eval.score(Metric::Recall, Average::Weighted)?.single().unwrap();
    assert!(approx(weighted, 0.75));
    assert!(eval.aggregate.macro_recall.is_nan());
    Ok(())
}

#[test]
fn test_fbeta_rejects_bad_beta_on_every_path() -> Result<(), Error> {
    let engine = MetricsEngine::default();
    let eval = engine.evaluate(&MULTI_OBSERVED, &MULTI_PREDICTED)?;

    for beta in [0.0, -0.5, f64::NAN] {
        assert!(matches!(
            eval.score(Metric::FBeta(beta), Average::Macro),
            Err(Error::InvalidValue(_))
        ));
        assert!(matches!(
            fbeta_score(&MULTI_OBSERVED, &MULTI_PREDICTED, beta, Average::None),
            Err(Error::InvalidValue(_))
        ));
    }
    Ok(())
}

#[test]
fn test_idempotent() -> Result<(), Error> {
    let engine = MetricsEngine::default();
    let first = engine.evaluate(&MULTI_OBSERVED, &MULTI_PREDICTED)?;
    let second = engine.evaluate(&MULTI_OBSERVED, &MULTI_PREDICTED)?;

    assert_eq!(first.per_class, second.per_class);
    assert_eq!(first.aggregate, second.aggregate);
    assert_eq!(first.matrix.matrix(), second.matrix.matrix());
    Ok(())
}

#[test]
fn test_f1_is_fbeta_with_beta_one() -> Result<(), Error> {
    for average in [Average::Macro, Average::Micro, Average::Weighted] {
        let f1 = f1_score(&MULTI_OBSERVED, &MULTI_PREDICTED, average)?.single().unwrap();
        let fb = fbeta_score(&MULTI_OBSERVED, &MULTI_PREDICTED, 1.0, average)?
            .single()
            .unwrap();
        assert!(approx(f1, fb));
    }
    Ok(())
}

#[test]
fn test_string_labels() -> Result<(), Error> {
    let observed = vec!["spam".to_string(), "ham".to_string(), "spam".to_string()];
    let predicted = vec!["spam".to_string(), "spam".to_string(), "spam".to_string()];

    let precision = precision_score(&observed, &predicted, Average::None)?;
    assert!(approx(precision.get(&"spam".to_string()).unwrap(), 2.0 / 3.0));
    assert_eq!(precision.get(&"ham".to_string()), Some(0.0));
    Ok(())
}

#[test]
fn test_input_errors() {
    let result = accuracy_score(&[1, 2, 3], &[1, 2]);
    assert!(matches!(
        result,
        Err(Error::LengthMismatch {
            expected: 3,
            actual: 2
        })
    ));

    let empty: Vec<i32> = Vec::new();
    assert!(matches!(
        precision_score(&empty, &empty, Average::Macro),
        Err(Error::EmptyData(_))
    ));
}

#[test]
fn test_unknown_average_mode_fails_before_computing() {
    // invalid inputs are never reached: parsing the mode fails first
    let result = "harmonic"
        .parse::<Average>()
        .and_then(|average| precision_score(&[1], &[1, 2], average));
    assert!(matches!(result, Err(Error::UnknownAverageMode(_))));
}
