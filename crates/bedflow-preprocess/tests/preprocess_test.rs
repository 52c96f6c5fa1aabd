//! Integration tests for the cleaning stage, from raw CSV file to cleaned table.

use bedflow::Config;
use bedflow::config::{
    INPUT_FILEPATH, OUTPUT_FILEPATH_FEATURE_ENGINEERING, OUTPUT_FILEPATH_PREPROCESS,
};
use bedflow::io::{read_table, write_table};
use bedflow::schema::{FLAG_COLUMNS, raw_column_names};
use bedflow_preprocess::{RawTable, preprocess, run};
use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const RAW_ROWS: [&str; 5] = [
    "A1,,,3,2,20,N1,,Y,Seoul General,,126.98,37.57",
    "A2,2024-03-15 14:30:00,2,2,1,22,Y,Y,N,Busan Medical,Busan,129.07,35.18",
    "A3,2024-03-16 09:00:00,1,4,2,18,N,N1,Y,Daegu Central,Daegu,128.60,35.87",
    "A4,20240317220000,3,3,3,20,Y,N,N,Incheon Care,Incheon,126.70,37.45",
    "A5,2024-03-18 03:15:00,40,3,2,21,N,Y,Y,Gwangju Hope,Gwangju,126.85,35.16",
];

fn write_raw(path: &Path) {
    let mut text = raw_column_names().join(",");
    for row in RAW_ROWS {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    std::fs::write(path, text).unwrap();
}

fn str_at(df: &DataFrame, name: &str, row: usize) -> Option<String> {
    df.column(name)
        .unwrap()
        .cast(&DataType::String)
        .unwrap()
        .as_materialized_series()
        .str()
        .unwrap()
        .get(row)
        .map(str::to_string)
}

fn f64_at(df: &DataFrame, name: &str, row: usize) -> Option<f64> {
    df.column(name)
        .unwrap()
        .as_materialized_series()
        .f64()
        .unwrap()
        .get(row)
}

fn config_for(dir: &Path) -> (Config, PathBuf, PathBuf) {
    let input = dir.join("hospital_data.csv");
    let output = dir.join("out").join("preprocessed.csv");
    let features = dir.join("out").join("features.csv");

    let mut settings: HashMap<&str, String> = HashMap::from([
        ("SSH_HOST", "gateway".to_string()),
        ("SSH_PORT", "22".to_string()),
        ("SSH_USER", "etl".to_string()),
        ("SSH_PRIVATE_KEY", "/keys/id".to_string()),
        ("DB_USER", "reader".to_string()),
        ("DB_PASS", "secret".to_string()),
        ("DB_NAME", "er_beds".to_string()),
        ("REMOTE_DB_HOST", "10.0.0.5".to_string()),
        ("REMOTE_DB_PORT", "3306".to_string()),
        ("LOCAL_BIND_PORT", "13306".to_string()),
    ]);
    settings.insert(INPUT_FILEPATH, input.display().to_string());
    settings.insert(OUTPUT_FILEPATH_PREPROCESS, output.display().to_string());
    settings.insert(
        OUTPUT_FILEPATH_FEATURE_ENGINEERING,
        features.display().to_string(),
    );

    let config = Config::from_lookup(|name| settings.get(name).cloned()).unwrap();
    (config, input, output)
}

#[test]
fn test_raw_row_is_cleaned() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("raw.csv");
    write_raw(&path);

    let out = preprocess(RawTable::load(&path).unwrap()).unwrap();
    let df = &out.frame;

    assert_eq!(str_at(df, "hpid", 0).as_deref(), Some("A1"));
    assert_eq!(f64_at(df, "hvec", 0), Some(0.0));
    assert_eq!(f64_at(df, "hvicc", 0), Some(3.0));
    assert_eq!(f64_at(df, "hpbdn", 0), Some(20.0));
    assert_eq!(str_at(df, "hvctayn", 0).as_deref(), Some("N"));
    assert_eq!(str_at(df, "hvmriayn", 0).as_deref(), Some("N"));
    assert_eq!(str_at(df, "hvventisoayn", 0).as_deref(), Some("Y"));
    assert_eq!(str_at(df, "duty_addr", 0).as_deref(), Some("Unknown"));
    assert!(
        str_at(df, "last_updated", 0)
            .unwrap()
            .starts_with("1970-01-01 00:00:00")
    );
}

#[test]
fn test_cleaned_table_invariants() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("raw.csv");
    write_raw(&path);

    let out = preprocess(RawTable::load(&path).unwrap()).unwrap();
    let df = &out.frame;

    // A5 carries an hvec outlier.
    assert_eq!(out.report.rows_in, 5);
    assert_eq!(out.report.rows_out, 4);
    assert_eq!(out.report.outliers[0].removed, 1);
    assert!(out.report.missing_columns.is_empty());

    for name in ["hvec", "hvicc", "hvoc", "hpbdn"] {
        let column = df.column(name).unwrap();
        assert_eq!(column.dtype(), &DataType::Float64);
        assert_eq!(column.null_count(), 0);
    }
    for name in FLAG_COLUMNS {
        for row in 0..df.height() {
            let flag = str_at(df, name, row).unwrap();
            assert!(flag == "Y" || flag == "N", "{name}: {flag}");
        }
    }
    assert_eq!(df.column("duty_addr").unwrap().null_count(), 0);
    assert_eq!(df.column("last_updated").unwrap().null_count(), 0);
}

#[test]
fn test_preprocessing_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw.csv");
    let clean = dir.path().join("clean.csv");
    write_raw(&raw);

    let mut first = preprocess(RawTable::load(&raw).unwrap()).unwrap().frame;
    write_table(&mut first, &clean).unwrap();

    let second = preprocess(RawTable::load(&clean).unwrap()).unwrap();
    assert_eq!(second.report.rows_removed(), 0);
    assert!(second.frame.equals_missing(&first));
}

#[test]
fn test_run_writes_cleaned_table() {
    let dir = tempfile::tempdir().unwrap();
    let (config, input, output) = config_for(dir.path());
    write_raw(&input);

    let report = run(&config).unwrap();
    assert_eq!(report.rows_out, 4);

    let written = read_table(&output).unwrap();
    assert_eq!(written.height(), 4);
    let names: Vec<String> = written
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, raw_column_names());
    assert_eq!(
        str_at(&written, "last_updated", 0).as_deref(),
        Some("1970-01-01 00:00:00")
    );
}

#[test]
fn test_missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let (config, _, _) = config_for(dir.path());
    let err = run(&config).unwrap_err();
    assert!(err.to_string().contains("hospital_data.csv"));
}

#[test]
fn test_infinite_bed_count_does_not_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("raw.csv");
    let mut text = raw_column_names().join(",");
    text.push_str("\nB1,,,1,1,10,Y,Y,Y,North,Seoul,126.9,37.5");
    text.push_str("\nB2,,inf,1,1,10,Y,Y,Y,South,Busan,129.0,35.1\n");
    std::fs::write(&path, text).unwrap();

    let out = preprocess(RawTable::load(&path).unwrap()).unwrap();
    assert_eq!(out.report.rows_out, 2);
    assert_eq!(out.report.imputed[0].unparseable, 1);
    assert_eq!(f64_at(&out.frame, "hvec", 1), Some(0.0));
}
