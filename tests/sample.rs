use minitrees::prelude::*;
use polars::prelude::*;


#[test]
fn column_kinds_follow_the_dtype() {
    let data = df!(
        "age" => &[22.0, 38.0, 26.0],
        "pclass" => &[3_i64, 1, 3],
        "sex" => &["male", "female", "female"],
        "alone" => &[true, false, false],
    ).unwrap();
    let survived = Series::new("survived", &[0_i64, 1, 1]);

    let sample = Sample::from_dataframe(&data, &survived).unwrap();
    assert_eq!(sample.shape(), (3, 4));
    assert_eq!(
        sample.feature_names(),
        vec!["age", "pclass", "sex", "alone"]
    );

    let kinds = sample.features()
        .iter()
        .map(|feature| feature.kind())
        .collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            FeatureKind::Continuous,
            FeatureKind::Continuous,
            FeatureKind::Categorical,
            FeatureKind::Categorical,
        ]
    );

    let pclass = sample.feature("pclass").unwrap();
    assert_eq!(pclass.numeric_at(1), Some(1.0));
    assert_eq!(pclass.value_at(1), Value::Float(1.0));

    let alone = sample.feature("alone").unwrap();
    assert_eq!(alone.value_at(0), Value::Bool(true));
    assert_eq!(alone.numeric_at(0), None);

    assert_eq!(
        sample.target().unwrap(),
        &[Value::Int(0), Value::Int(1), Value::Int(1)]
    );
}


#[test]
fn target_column_is_not_a_feature() {
    let frame = df!(
        "x" => &[1.0, 2.0, 3.0],
        "y" => &["a", "b", "a"],
    ).unwrap();

    let sample = Sample::split_target(&frame, "y").unwrap();
    assert_eq!(sample.shape(), (3, 1));
    assert_eq!(sample.feature_names(), vec!["x"]);
    assert!(matches!(
        sample.feature("y"),
        Err(TreeError::MissingColumn(_))
    ));

    assert!(matches!(
        Sample::split_target(&frame, "z"),
        Err(TreeError::MissingColumn(name)) if name == "z"
    ));
}


#[test]
fn missing_values_are_rejected() {
    let target = Series::new("y", &["a", "b", "a"]);

    let data = df!("x" => &[Some(1.0), Some(2.0), None]).unwrap();
    assert!(matches!(
        Sample::from_dataframe(&data, &target),
        Err(TreeError::NullValue(name, 2)) if name == "x"
    ));

    let data = df!("x" => &[1.0, f64::NAN, 3.0]).unwrap();
    assert!(matches!(
        Sample::from_dataframe(&data, &target),
        Err(TreeError::NanValue(name, 1)) if name == "x"
    ));

    let data = df!("x" => &[Some("u"), None, Some("v")]).unwrap();
    assert!(matches!(
        Sample::from_dataframe(&data, &target),
        Err(TreeError::NullValue(name, 1)) if name == "x"
    ));
}


#[test]
fn empty_training_input_is_rejected() {
    let data = df!("x" => Vec::<f64>::new()).unwrap();
    let target = Series::new("y", Vec::<&str>::new());
    assert!(matches!(
        Sample::from_dataframe(&data, &target),
        Err(TreeError::EmptySample)
    ));
}


#[test]
fn prediction_input_has_no_target() {
    let data = df!("x" => &[1.0, 2.0]).unwrap();
    let sample = Sample::from_features(&data).unwrap();
    assert_eq!(sample.shape(), (2, 1));
    assert!(sample.target().is_err());
}


#[test]
fn prediction_input_keeps_missing_values() {
    let data = df!(
        "x" => &[Some(1.0), None, Some(f64::NAN)],
        "c" => &[Some("u"), None, Some("v")],
    ).unwrap();

    let sample = Sample::from_features(&data).unwrap();
    let x = sample.feature("x").unwrap();
    assert!(!x.is_missing(0));
    assert!(x.is_missing(1));
    assert!(x.is_missing(2));
    assert_eq!(x.value_at(1), Value::Missing);

    let c = sample.feature("c").unwrap();
    assert!(c.is_missing(1));
    assert_eq!(c.value_at(1), Value::Missing);
    assert_eq!(c.value_at(2), Value::from("v"));
}


#[test]
fn only_named_columns_are_read() {
    let data = df!(
        "x" => &[1.0, 2.0],
        "noise" => &[None::<&str>, None],
    ).unwrap();

    let sample = Sample::from_columns(&data, &["x"]).unwrap();
    assert_eq!(sample.shape(), (2, 1));
    assert!(matches!(
        sample.feature("noise"),
        Err(TreeError::MissingColumn(_))
    ));

    assert!(matches!(
        Sample::from_columns(&data, &["x", "y"]),
        Err(TreeError::MissingColumn(name)) if name == "y"
    ));
}


#[test]
fn integers_beyond_2_pow_53_may_merge() {
    let data = df!(
        "id" => &[9_007_199_254_740_992_i64, 9_007_199_254_740_993, 7],
    ).unwrap();

    let feature = Feature::from_series(data.column("id").unwrap()).unwrap();
    assert_eq!(feature.kind(), FeatureKind::Continuous);
    assert_eq!(feature.value_at(0), feature.value_at(1));
    assert_ne!(feature.value_at(0), feature.value_at(2));
}
