//! Offline preparation of the combined loss table from the two per-side exports.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use tracing::info;

use super::error::PrepareError;
use super::record::{Field, Side};

/// Which columns to strip from one side's raw export.
#[derive(Clone, Copy, Debug)]
pub struct SourcePlan {
    pub side: Side,
    /// Applied first, against the raw header.
    pub drop_positions: &'static [usize],
    pub drop_columns: &'static [&'static str],
}

pub const RUSSIA_PLAN: SourcePlan = SourcePlan {
    side: Side::Russia,
    drop_positions: &[],
    drop_columns: &[
        "sub_model",
        "captured and stripped",
        "defected and captured",
        "destroyed in a non-combat related incident",
    ],
};

pub const UKRAINE_PLAN: SourcePlan = SourcePlan {
    side: Side::Ukraine,
    drop_positions: &[5],
    drop_columns: &["sub_model", "scuttled", "sunk but raised by Russia"],
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SideTable {
    pub side: Side,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrepareSummary {
    pub russia_rows: usize,
    pub ukraine_rows: usize,
    pub columns: usize,
}

pub fn prepare(russia: &Path, ukraine: &Path, output: &Path) -> Result<PrepareSummary, PrepareError> {
    let russia_table = read_side_file(russia, RUSSIA_PLAN)?;
    let ukraine_table = read_side_file(ukraine, UKRAINE_PLAN)?;

    let summary = PrepareSummary {
        russia_rows: russia_table.rows.len(),
        ukraine_rows: ukraine_table.rows.len(),
        columns: 0,
    };

    let prepared = concat_tables(&[russia_table, ukraine_table]);
    let file = File::create(output).map_err(|source| PrepareError::Open {
        path: output.to_path_buf(),
        source,
    })?;
    write_table(file, &prepared).map_err(|source| PrepareError::Csv {
        path: output.to_path_buf(),
        source,
    })?;

    let summary = PrepareSummary {
        columns: prepared.headers.len(),
        ..summary
    };
    info!(
        output = %output.display(),
        russia_rows = summary.russia_rows,
        ukraine_rows = summary.ukraine_rows,
        columns = summary.columns,
        "wrote combined loss table"
    );
    Ok(summary)
}

fn read_side_file(path: &Path, plan: SourcePlan) -> Result<SideTable, PrepareError> {
    let file = File::open(path).map_err(|source| PrepareError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_side(file, path, plan)
}

/// Reads one side's export, strips the planned columns, zero-fills blanks and tags `lost_by`.
pub fn read_side<R: Read>(reader: R, source: &Path, plan: SourcePlan) -> Result<SideTable, PrepareError> {
    let csv_error = |error: csv::Error| PrepareError::Csv {
        path: source.to_path_buf(),
        source: error,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);
    let raw_headers = reader.headers().map_err(csv_error)?.clone();
    let width = raw_headers.len();

    if let Some(&position) = plan.drop_positions.iter().find(|&&position| position >= width) {
        return Err(PrepareError::PositionOutOfRange {
            path: source.to_path_buf(),
            position,
            width,
        });
    }

    let kept = raw_headers
        .iter()
        .enumerate()
        .filter(|(index, header)| {
            !plan.drop_positions.contains(index) && !plan.drop_columns.contains(header)
        })
        .map(|(index, _)| index)
        .collect::<Vec<_>>();

    let lost_by = Field::LostBy.column_name();
    let mut headers = kept
        .iter()
        .filter_map(|&index| raw_headers.get(index))
        .filter(|header| *header != lost_by)
        .map(str::to_owned)
        .collect::<Vec<_>>();
    let lost_by_position = kept
        .iter()
        .position(|&index| raw_headers.get(index) == Some(lost_by));
    headers.push(lost_by.to_owned());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record: StringRecord = record.map_err(csv_error)?;
        let mut row = kept
            .iter()
            .enumerate()
            .filter(|(slot, _)| Some(*slot) != lost_by_position)
            .map(|(_, &index)| fill_blank(record.get(index).unwrap_or("")))
            .collect::<Vec<_>>();
        row.push(plan.side.label().to_owned());
        rows.push(row);
    }

    Ok(SideTable {
        side: plan.side,
        headers,
        rows,
    })
}

/// Stacks tables by column name; columns missing on one side are zero-filled.
pub fn concat_tables(tables: &[SideTable]) -> PreparedTable {
    let lost_by = Field::LostBy.column_name();
    let mut headers: Vec<String> = Vec::new();
    for table in tables {
        for header in &table.headers {
            if header != lost_by && !headers.contains(header) {
                headers.push(header.clone());
            }
        }
    }
    headers.push(lost_by.to_owned());

    let mut rows = Vec::new();
    for table in tables {
        let mapping = headers
            .iter()
            .map(|header| table.headers.iter().position(|own| own == header))
            .collect::<Vec<_>>();
        for row in &table.rows {
            rows.push(
                mapping
                    .iter()
                    .map(|position| {
                        position
                            .and_then(|position| row.get(position).cloned())
                            .unwrap_or_else(|| "0".to_owned())
                    })
                    .collect(),
            );
        }
    }

    PreparedTable { headers, rows }
}

pub fn write_table<W: Write>(writer: W, table: &PreparedTable) -> Result<(), csv::Error> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn fill_blank(value: &str) -> String {
    if value.trim().is_empty() {
        "0".to_owned()
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUSSIA_RAW: &str = "equipment,model,sub_model,manufacturer,losses_total,destroyed,captured and stripped,captured\n\
        tank,T-72,B3,UVZ,5,3,1,\n\
        helicopter,Ka-52,,Kamov,2,2,,\n";

    const UKRAINE_RAW: &str = "equipment,model,sub_model,manufacturer,losses_total,damaged,destroyed,scuttled\n\
        tank,T-64,BV,Malyshev,4,9,3,1\n";

    fn russia() -> SideTable {
        read_side(RUSSIA_RAW.as_bytes(), Path::new("russia.csv"), RUSSIA_PLAN).expect("russia")
    }

    fn ukraine() -> SideTable {
        read_side(UKRAINE_RAW.as_bytes(), Path::new("ukraine.csv"), UKRAINE_PLAN).expect("ukraine")
    }

    #[test]
    fn russia_plan_drops_named_columns_and_tags_side() {
        let table = russia();

        assert_eq!(
            table.headers,
            vec![
                "equipment",
                "model",
                "manufacturer",
                "losses_total",
                "destroyed",
                "captured",
                "lost_by"
            ]
        );
        assert_eq!(
            table.rows[0],
            vec!["tank", "T-72", "UVZ", "5", "3", "0", "russia"]
        );
    }

    #[test]
    fn ukraine_plan_drops_position_before_names() {
        let table = ukraine();

        // position 5 was "damaged"
        assert_eq!(
            table.headers,
            vec![
                "equipment",
                "model",
                "manufacturer",
                "losses_total",
                "destroyed",
                "lost_by"
            ]
        );
        assert_eq!(
            table.rows[0],
            vec!["tank", "T-64", "Malyshev", "4", "3", "ukraine"]
        );
    }

    #[test]
    fn concat_unions_headers_and_zero_fills() {
        let prepared = concat_tables(&[russia(), ukraine()]);

        assert_eq!(prepared.headers.last().map(String::as_str), Some("lost_by"));
        assert_eq!(prepared.rows.len(), 3);
        let captured = prepared
            .headers
            .iter()
            .position(|header| header == "captured")
            .expect("captured column");
        assert_eq!(prepared.rows[2][captured], "0");
        assert_eq!(prepared.rows[2].last().map(String::as_str), Some("ukraine"));
    }

    #[test]
    fn drop_position_past_header_fails() {
        let error = read_side(
            "equipment,model\ntank,T-72\n".as_bytes(),
            Path::new("short.csv"),
            UKRAINE_PLAN,
        )
        .expect_err("must fail");
        assert!(matches!(
            error,
            PrepareError::PositionOutOfRange {
                position: 5,
                width: 2,
                ..
            }
        ));
    }

    #[test]
    fn written_table_loads_back() {
        let prepared = concat_tables(&[russia(), ukraine()]);
        let mut buffer = Vec::new();
        write_table(&mut buffer, &prepared).expect("write");

        let dataset = crate::losses::read_dataset(buffer.as_slice(), Path::new("prepared.csv"))
            .expect("prepared table loads");
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.unique_values(Field::LostBy), vec!["russia", "ukraine"]);
    }
}
