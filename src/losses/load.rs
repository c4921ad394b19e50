use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info};

use super::error::DataLoadError;
use super::parse::{Cell, locate_columns, parse_cell};
use super::record::{Dataset, LossRecord, Schema, Side};

pub fn load_dataset(path: &Path) -> Result<Dataset, DataLoadError> {
    let file = File::open(path).map_err(|source| DataLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = read_dataset(file, path)?;
    info!(
        path = %path.display(),
        rows = dataset.len(),
        numeric_columns = dataset.schema().metric_count(),
        "loaded loss dataset"
    );
    Ok(dataset)
}

/// Parses a loss table from any reader. `source` only labels errors.
pub fn read_dataset<R: Read>(reader: R, source: &Path) -> Result<Dataset, DataLoadError> {
    let csv_error = |error: csv::Error| DataLoadError::Csv {
        path: source.to_path_buf(),
        source: error,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(csv_error)?.clone();
    let layout = locate_columns(&headers).map_err(|columns| DataLoadError::MissingColumns {
        path: source.to_path_buf(),
        columns,
    })?;

    let rows = reader
        .records()
        .collect::<Result<Vec<StringRecord>, _>>()
        .map_err(csv_error)?;

    let mut metric_names = Vec::new();
    let mut metric_positions = Vec::new();
    for (name, position) in &layout.candidates {
        let mut numeric = true;
        let mut invalid = None;
        for (index, row) in rows.iter().enumerate() {
            match parse_cell(row.get(*position).unwrap_or("")) {
                Cell::Text => {
                    numeric = false;
                    break;
                }
                Cell::Invalid if invalid.is_none() => invalid = Some(index),
                _ => {}
            }
        }

        if !numeric {
            debug!(column = %name, "ignoring non-numeric column");
            continue;
        }

        if let Some(index) = invalid {
            let row = &rows[index];
            return Err(DataLoadError::InvalidCount {
                line: line_of(row, index),
                column: name.clone(),
                value: row.get(*position).unwrap_or("").to_owned(),
            });
        }

        metric_names.push(name.clone());
        metric_positions.push(*position);
    }

    if metric_names.is_empty() {
        return Err(DataLoadError::NoNumericColumns {
            path: source.to_path_buf(),
        });
    }

    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let cell = |position: usize| row.get(position).unwrap_or("").to_owned();

        let raw_side = cell(layout.lost_by);
        let lost_by = Side::parse(&raw_side).ok_or_else(|| DataLoadError::UnknownSide {
            line: line_of(row, index),
            value: raw_side.clone(),
        })?;

        let counts = metric_positions
            .iter()
            .map(|&position| match parse_cell(row.get(position).unwrap_or("")) {
                Cell::Count(count) => count,
                _ => 0,
            })
            .collect();

        records.push(LossRecord {
            equipment: cell(layout.equipment),
            manufacturer: cell(layout.manufacturer),
            model: cell(layout.model),
            lost_by,
            counts,
        });
    }

    Ok(Dataset::new(Schema::new(metric_names), records))
}

fn line_of(row: &StringRecord, index: usize) -> u64 {
    row.position()
        .map(|position| position.line())
        .unwrap_or(index as u64 + 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(csv: &str) -> Result<Dataset, DataLoadError> {
        read_dataset(csv.as_bytes(), Path::new("inline.csv"))
    }

    #[test]
    fn blank_counts_become_zero() {
        let dataset = read(
            "equipment,model,manufacturer,losses_total,destroyed,lost_by\n\
             tank,T-72,UVZ,3,,russia\n\
             tank,T-64,Malyshev,,1.0,Ukraine\n",
        )
        .expect("dataset");

        let destroyed = dataset.schema().metric("destroyed").expect("destroyed");
        let total = dataset.schema().metric("losses_total").expect("total");
        assert_eq!(dataset.records()[0].count(destroyed), 0);
        assert_eq!(dataset.records()[1].count(total), 0);
        assert_eq!(dataset.records()[1].count(destroyed), 1);
        assert_eq!(dataset.records()[1].lost_by, Side::Ukraine);
    }

    #[test]
    fn text_columns_are_not_metrics() {
        let dataset = read(
            "equipment,model,sub_model,manufacturer,note,destroyed,lost_by\n\
             tank,T-72,B3,UVZ,burnt,2,russia\n",
        )
        .expect("dataset");

        let names = dataset
            .schema()
            .metrics()
            .map(|(_, name)| name.to_owned())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["destroyed".to_owned()]);
    }

    #[test]
    fn missing_identifying_columns_fail() {
        let error = read("equipment,destroyed\ntank,1\n").expect_err("must fail");
        match error {
            DataLoadError::MissingColumns { columns, .. } => {
                assert_eq!(columns, vec!["manufacturer", "model", "lost_by"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn negative_counts_fail_with_line() {
        let error = read(
            "equipment,model,manufacturer,destroyed,lost_by\n\
             tank,T-72,UVZ,1,russia\n\
             tank,T-80,Omsk,-4,russia\n",
        )
        .expect_err("must fail");
        match error {
            DataLoadError::InvalidCount { line, column, value } => {
                assert_eq!(line, 3);
                assert_eq!(column, "destroyed");
                assert_eq!(value, "-4");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_side_fails() {
        let error = read(
            "equipment,model,manufacturer,destroyed,lost_by\n\
             tank,T-72,UVZ,1,belarus\n",
        )
        .expect_err("must fail");
        assert!(matches!(error, DataLoadError::UnknownSide { line: 2, .. }));
    }

    #[test]
    fn no_numeric_columns_fail() {
        let error = read("equipment,model,manufacturer,lost_by\ntank,T-72,UVZ,russia\n")
            .expect_err("must fail");
        assert!(matches!(error, DataLoadError::NoNumericColumns { .. }));
    }

    #[test]
    fn header_only_file_loads_empty() {
        let dataset =
            read("equipment,model,manufacturer,destroyed,lost_by\n").expect("empty dataset");
        assert!(dataset.is_empty());
        assert_eq!(dataset.schema().metric_count(), 1);
    }

    #[test]
    fn missing_file_is_open_error() {
        let error = load_dataset(Path::new("/nonexistent/all_losses.csv")).expect_err("missing");
        assert!(matches!(error, DataLoadError::Open { .. }));
    }
}
