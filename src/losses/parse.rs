use csv::StringRecord;

use super::record::Field;

const IGNORED_COLUMNS: [&str; 1] = ["sub_model"];

#[derive(Clone, Copy, Debug, PartialEq)]
pub(super) enum Cell {
    Blank,
    Count(u64),
    /// Numeric, but negative, fractional or infinite.
    Invalid,
    Text,
}

pub(super) fn parse_cell(raw: &str) -> Cell {
    let raw = raw.trim();
    if raw.is_empty() {
        return Cell::Blank;
    }

    if let Ok(count) = raw.parse::<u64>() {
        return Cell::Count(count);
    }

    match raw.parse::<f64>() {
        Ok(value) if value.is_nan() => Cell::Blank,
        Ok(value) if !value.is_finite() || value < 0.0 || value.fract() != 0.0 => Cell::Invalid,
        Ok(value) if value > u64::MAX as f64 => Cell::Invalid,
        Ok(value) => Cell::Count(value as u64),
        Err(_) => Cell::Text,
    }
}

/// Header positions of the identifying columns plus every candidate numeric column.
#[derive(Clone, Debug)]
pub(super) struct ColumnLayout {
    pub(super) equipment: usize,
    pub(super) manufacturer: usize,
    pub(super) model: usize,
    pub(super) lost_by: usize,
    pub(super) candidates: Vec<(String, usize)>,
}

pub(super) fn locate_columns(headers: &StringRecord) -> Result<ColumnLayout, Vec<String>> {
    let position = |field: Field| {
        headers
            .iter()
            .position(|header| header.trim() == field.column_name())
    };

    let missing = Field::REQUIRED
        .into_iter()
        .filter(|field| position(*field).is_none())
        .map(|field| field.column_name().to_owned())
        .collect::<Vec<_>>();

    let (Some(equipment), Some(manufacturer), Some(model), Some(lost_by)) = (
        position(Field::Equipment),
        position(Field::Manufacturer),
        position(Field::Model),
        position(Field::LostBy),
    ) else {
        return Err(missing);
    };

    let identifying = [equipment, manufacturer, model, lost_by];
    let mut candidates: Vec<(String, usize)> = Vec::new();
    for (index, header) in headers.iter().enumerate() {
        let header = header.trim();
        if identifying.contains(&index)
            || is_index_column(header)
            || IGNORED_COLUMNS.contains(&header)
            || candidates.iter().any(|(name, _)| name == header)
        {
            continue;
        }
        candidates.push((header.to_owned(), index));
    }

    Ok(ColumnLayout {
        equipment,
        manufacturer,
        model,
        lost_by,
        candidates,
    })
}

/// Index columns written by dataframe tooling: blank or `Unnamed: N` headers.
pub(super) fn is_index_column(header: &str) -> bool {
    header.is_empty() || header.starts_with("Unnamed:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_normalize_missing_and_integral_floats() {
        assert_eq!(parse_cell(""), Cell::Blank);
        assert_eq!(parse_cell("  "), Cell::Blank);
        assert_eq!(parse_cell("NaN"), Cell::Blank);
        assert_eq!(parse_cell("7"), Cell::Count(7));
        assert_eq!(parse_cell("3.0"), Cell::Count(3));
    }

    #[test]
    fn cells_reject_negative_and_fractional() {
        assert_eq!(parse_cell("-1"), Cell::Invalid);
        assert_eq!(parse_cell("1.5"), Cell::Invalid);
        assert_eq!(parse_cell("inf"), Cell::Invalid);
        assert_eq!(parse_cell("T-72"), Cell::Text);
    }

    #[test]
    fn layout_skips_index_and_identifying_columns() {
        let headers = StringRecord::from(vec![
            "",
            "Unnamed: 0",
            "equipment",
            "model",
            "manufacturer",
            "losses_total",
            "destroyed",
            "lost_by",
        ]);
        let layout = locate_columns(&headers).expect("layout");

        assert_eq!(layout.equipment, 2);
        assert_eq!(layout.model, 3);
        assert_eq!(layout.manufacturer, 4);
        assert_eq!(layout.lost_by, 7);
        assert_eq!(
            layout.candidates,
            vec![("losses_total".to_owned(), 5), ("destroyed".to_owned(), 6)]
        );
    }

    #[test]
    fn layout_reports_every_missing_column() {
        let headers = StringRecord::from(vec!["equipment", "destroyed"]);
        let missing = locate_columns(&headers).expect_err("missing columns");

        assert_eq!(missing, vec!["manufacturer", "model", "lost_by"]);
    }
}
