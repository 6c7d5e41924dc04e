//! Integration test: ID3 induction end-to-end

use id3_tree::data::{tennis, TENNIS_FEATURES, TENNIS_TARGET};
use id3_tree::prelude::*;
use id3_tree::training::LabelDistribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

fn random_dataset(seed: u64, n_rows: usize, n_features: usize) -> (Dataset, Vec<String>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let features: Vec<String> = (0..n_features).map(|i| format!("f{}", i)).collect();

    let mut columns: Vec<(String, Vec<String>)> = features
        .iter()
        .map(|name| {
            let arity = rng.gen_range(1..=4);
            let values = (0..n_rows)
                .map(|_| format!("v{}", rng.gen_range(0..arity)))
                .collect();
            (name.clone(), values)
        })
        .collect();
    let labels = (0..n_rows)
        .map(|_| format!("c{}", rng.gen_range(0..3)))
        .collect();
    columns.push(("label".to_string(), labels));

    (Dataset::from_columns(columns).unwrap(), features)
}

fn assert_no_attribute_reuse(node: &DecisionNode, path: &mut Vec<String>) {
    if let Some(attribute) = node.attribute() {
        assert!(
            !path.iter().any(|a| a == attribute),
            "attribute {} reused on path {:?}",
            attribute,
            path
        );
        path.push(attribute.to_string());
        for branch in node.branches() {
            assert_no_attribute_reuse(&branch.node, path);
        }
        path.pop();
    }
}

#[test]
fn test_weather_first_split_is_outlook() {
    let ds = tennis().unwrap();
    let total = LabelDistribution::of_column(&ds, TENNIS_TARGET)
        .unwrap()
        .entropy()
        .unwrap();
    assert!((total - 0.9457).abs() < 1e-4);

    let outlook = information_gain(&ds, "Outlook", TENNIS_TARGET).unwrap();
    let humidity = information_gain(&ds, "Humidity", TENNIS_TARGET).unwrap();
    let wind = information_gain(&ds, "Wind", TENNIS_TARGET).unwrap();
    assert!(outlook > humidity);
    assert!(outlook > wind);

    let tree = build_tree(&ds, TENNIS_TARGET, &TENNIS_FEATURES).unwrap();
    assert_eq!(tree.attribute(), Some("Outlook"));
}

#[test]
fn test_weather_pure_subset_stops_immediately() {
    let ds = tennis().unwrap();
    let tree = build_tree(&ds, TENNIS_TARGET, &TENNIS_FEATURES).unwrap();

    // Every "rain" row plays, so that branch is a leaf without further splits
    let rain = ds.filter_rows(|row| row.get("Outlook") == Some("rain"));
    assert!(LabelDistribution::of_column(&rain, TENNIS_TARGET).unwrap().is_pure());
    assert_eq!(tree.child("rain"), Some(&DecisionNode::leaf("yes")));

    // "overcast" holds one "no" and needs another split
    assert!(!tree.child("overcast").unwrap().is_leaf());
}

#[test]
fn test_weather_tie_breaks_on_declared_order() {
    let ds = tennis().unwrap();
    let sunny = ds.filter_rows(|row| row.get("Outlook") == Some("sunny"));
    let humidity = information_gain(&sunny, "Humidity", TENNIS_TARGET).unwrap();
    let wind = information_gain(&sunny, "Wind", TENNIS_TARGET).unwrap();
    assert!((humidity - wind).abs() < 1e-12);

    let tree = build_tree(&ds, TENNIS_TARGET, &TENNIS_FEATURES).unwrap();
    assert_eq!(tree.child("sunny").unwrap().attribute(), Some("Humidity"));

    let swapped = build_tree(&ds, TENNIS_TARGET, &["Outlook", "Wind", "Humidity"]).unwrap();
    assert_eq!(swapped.child("sunny").unwrap().attribute(), Some("Wind"));
}

#[test]
fn test_majority_fallback_scenario() {
    let ds = Dataset::from_columns(vec![
        ("color", vec!["red", "red", "red", "blue"]),
        ("shape", vec!["round", "round", "round", "square"]),
        ("label", vec!["yes", "no", "yes", "no"]),
    ])
    .unwrap();

    let tree = build_tree(&ds, "label", &["color", "shape"]).unwrap();
    let red = tree.child("red").unwrap();
    let leaf = red.child("round").unwrap();
    assert_eq!(leaf, &DecisionNode::leaf("yes"));
}

#[test]
fn test_gain_properties_on_random_data() {
    for seed in 0..20 {
        let (ds, features) = random_dataset(seed, 40, 4);
        let labels = ds.column("label").unwrap();
        let h = entropy(&labels).unwrap();
        let distinct = labels.iter().collect::<HashSet<_>>().len();
        assert!(h >= 0.0);
        assert!(h <= (distinct as f64).log2() + 1e-9);

        for feature in &features {
            let gain = information_gain(&ds, feature, "label").unwrap();
            assert!(gain >= -1e-9, "negative gain {} for {}", gain, feature);
            assert!(gain <= h + 1e-9);
        }
    }
}

#[test]
fn test_tree_properties_on_random_data() {
    for seed in 0..20 {
        let (ds, features) = random_dataset(seed, 60, 5);
        let tree = build_tree(&ds, "label", &features).unwrap();

        let domain: HashSet<&str> = ds.column("label").unwrap().into_iter().collect();
        for label in tree.labels() {
            assert!(domain.contains(label), "leaf label {} not in target domain", label);
        }

        assert!(tree.depth() <= features.len());
        assert_no_attribute_reuse(&tree, &mut Vec::new());

        let again = build_tree(&ds, "label", &features).unwrap();
        assert_eq!(tree, again);
        assert_eq!(
            serde_json::to_string(&tree).unwrap(),
            serde_json::to_string(&again).unwrap()
        );
    }
}

#[test]
fn test_split_children_cover_observed_values_only() {
    let (ds, features) = random_dataset(7, 30, 3);
    let tree = build_tree(&ds, "label", &features).unwrap();
    if let Some(attribute) = tree.attribute() {
        let observed = ds.distinct(attribute).unwrap();
        let keys: Vec<&str> = tree.branches().iter().map(|b| b.value.as_str()).collect();
        assert_eq!(keys, observed);
    }
}

#[test]
fn test_classifier_reproduces_training_labels_when_consistent() {
    let ds = Dataset::from_columns(vec![
        ("a", vec!["0", "0", "1", "1", "2"]),
        ("b", vec!["x", "y", "x", "y", "x"]),
        ("label", vec!["p", "q", "q", "q", "p"]),
    ])
    .unwrap();

    let mut clf = Id3Classifier::new();
    clf.fit(&ds, "label", &["a", "b"]).unwrap();
    assert_eq!(clf.predict(&ds).unwrap(), vec!["p", "q", "q", "q", "p"]);
    assert_eq!(clf.accuracy(&ds).unwrap(), 1.0);
}

#[test]
fn test_tree_json_round_trip() {
    let ds = tennis().unwrap();
    let tree = build_tree(&ds, TENNIS_TARGET, &TENNIS_FEATURES).unwrap();
    let json = serde_json::to_string_pretty(&tree).unwrap();
    let back: DecisionNode = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tree);

    for row in ds.rows() {
        assert_eq!(tree.predict(&row).unwrap(), back.predict(&row).unwrap());
    }
}

#[test]
fn test_gain_report_from_config() {
    let ds = tennis().unwrap();
    let config = Id3Config::default().with_gain_order(GainOrder::Descending);
    let mut clf = Id3Classifier::new();
    clf.fit_with_config(&ds, &config).unwrap();

    let report = clf.gain_report().unwrap().sorted(config.gain_order);
    let order: Vec<&str> = report.gains.iter().map(|g| g.feature.as_str()).collect();
    assert_eq!(order, vec!["Outlook", "Humidity", "Wind"]);
}

#[test]
fn test_errors_are_reported_before_building() {
    let ds = tennis().unwrap();
    let empty = ds.filter_rows(|_| false);
    assert!(matches!(
        build_tree(&empty, TENNIS_TARGET, &TENNIS_FEATURES),
        Err(Id3Error::EmptyDataset)
    ));
    assert!(matches!(
        build_tree(&ds, "Temperature", &TENNIS_FEATURES),
        Err(Id3Error::NoTargetColumn(_))
    ));
}
