mod common;

use losses_dashboard::losses::{DataLoadError, Field, Side, load_dataset};

use common::{THREE_ROWS, load, write_csv};

#[test]
fn exported_table_loads_with_index_column_ignored() {
    let dataset = load(THREE_ROWS);
    let schema = dataset.schema();

    assert_eq!(dataset.len(), 3);
    assert_eq!(
        schema.metrics().map(|(_, name)| name).collect::<Vec<_>>(),
        vec!["losses_total", "destroyed", "captured"]
    );
    assert_eq!(
        dataset.unique_values(Field::Equipment),
        vec!["tank", "helicopter"]
    );

    let captured = schema.metric("captured").expect("captured column");
    let helicopter = &dataset.records()[2];
    assert_eq!(helicopter.lost_by, Side::Russia);
    assert_eq!(helicopter.count(captured), 0);
}

#[test]
fn side_labels_are_case_insensitive() {
    let dataset = load(
        "equipment,model,manufacturer,destroyed,lost_by\n\
         tank,T-72,UVZ,4,Russia\n\
         tank,T-64,Malyshev,1, UKRAINE \n",
    );

    assert_eq!(
        dataset
            .records()
            .iter()
            .map(|record| record.lost_by)
            .collect::<Vec<_>>(),
        vec![Side::Russia, Side::Ukraine]
    );
}

#[test]
fn missing_file_is_an_open_error() {
    let fixture = write_csv("present.csv", THREE_ROWS);
    let missing = fixture.dir.path().join("absent.csv");

    let error = load_dataset(&missing).expect_err("missing file must fail");

    assert!(matches!(error, DataLoadError::Open { ref path, .. } if *path == missing));
    assert!(error.to_string().contains("absent.csv"));
}

#[test]
fn missing_identifying_column_is_reported_by_name() {
    let fixture = write_csv(
        "no_model.csv",
        "equipment,manufacturer,destroyed,lost_by\ntank,UVZ,1,russia\n",
    );

    let error = load_dataset(&fixture.path).expect_err("model column is required");

    match error {
        DataLoadError::MissingColumns { columns, .. } => assert_eq!(columns, vec!["model"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn fractional_count_is_rejected() {
    let fixture = write_csv(
        "fraction.csv",
        "equipment,model,manufacturer,destroyed,lost_by\ntank,T-72,UVZ,1.5,russia\n",
    );

    let error = load_dataset(&fixture.path).expect_err("fractional counts are invalid");

    assert!(matches!(
        error,
        DataLoadError::InvalidCount { line: 2, ref column, .. } if column == "destroyed"
    ));
}
