use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use super::error::UnknownAxis;

/// Numeric columns beyond this many are loaded but never offered as chart axes.
pub const AXIS_OPTION_LIMIT: usize = 11;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Russia,
    Ukraine,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Russia, Side::Ukraine];

    pub fn label(self) -> &'static str {
        match self {
            Self::Russia => "russia",
            Self::Ukraine => "ukraine",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|side| side.label().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Categorical columns the filters and renderers group by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Equipment,
    Manufacturer,
    Model,
    LostBy,
}

impl Field {
    pub const REQUIRED: [Field; 4] = [
        Field::Equipment,
        Field::Manufacturer,
        Field::Model,
        Field::LostBy,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            Self::Equipment => "equipment",
            Self::Manufacturer => "manufacturer",
            Self::Model => "model",
            Self::LostBy => "lost_by",
        }
    }
}

/// Position of a numeric loss column inside a [`Schema`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricId(usize);

impl MetricId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schema {
    metrics: Vec<String>,
}

impl Schema {
    pub fn new(metrics: Vec<String>) -> Self {
        Self { metrics }
    }

    pub fn metric_count(&self) -> usize {
        self.metrics.len()
    }

    pub fn metric(&self, name: &str) -> Option<MetricId> {
        self.metrics
            .iter()
            .position(|metric| metric == name)
            .map(MetricId)
    }

    pub fn metric_name(&self, id: MetricId) -> &str {
        self.metrics.get(id.0).map(String::as_str).unwrap_or("")
    }

    pub fn metrics(&self) -> impl Iterator<Item = (MetricId, &str)> {
        self.metrics
            .iter()
            .enumerate()
            .map(|(index, name)| (MetricId(index), name.as_str()))
    }

    /// Columns a user may pick for chart axes, in header order.
    pub fn axis_options(&self) -> Vec<MetricId> {
        (0..self.metrics.len().min(AXIS_OPTION_LIMIT))
            .map(MetricId)
            .collect()
    }

    /// Resolves a user-supplied axis name against [`Schema::axis_options`].
    pub fn axis_by_name(&self, name: &str) -> Result<MetricId, UnknownAxis> {
        let options = self.axis_options();
        options
            .iter()
            .copied()
            .find(|&id| self.metric_name(id) == name)
            .ok_or_else(|| UnknownAxis {
                name: name.to_owned(),
                allowed: options
                    .iter()
                    .map(|&id| self.metric_name(id).to_owned())
                    .collect(),
            })
    }

    /// The named column when present, otherwise the first numeric column.
    pub fn metric_or_first(&self, name: &str) -> MetricId {
        self.metric(name).unwrap_or(MetricId(0))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LossRecord {
    pub equipment: String,
    pub manufacturer: String,
    pub model: String,
    pub lost_by: Side,
    pub counts: Vec<u64>,
}

impl LossRecord {
    pub fn count(&self, metric: MetricId) -> u64 {
        self.counts.get(metric.0).copied().unwrap_or(0)
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Equipment => &self.equipment,
            Field::Manufacturer => &self.manufacturer,
            Field::Model => &self.model,
            Field::LostBy => self.lost_by.label(),
        }
    }
}

/// Immutable record table. Every filter produces a [`RowView`] over it.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    schema: Schema,
    records: Vec<LossRecord>,
}

impl Dataset {
    pub fn new(schema: Schema, records: Vec<LossRecord>) -> Self {
        Self { schema, records }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[LossRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn view(&self) -> RowView<'_> {
        RowView {
            dataset: self,
            rows: (0..self.records.len()).collect(),
        }
    }

    pub fn filter<P>(&self, predicate: P) -> RowView<'_>
    where
        P: Fn(&LossRecord) -> bool,
    {
        let rows = self
            .records
            .iter()
            .enumerate()
            .filter(|&(_, record)| predicate(record))
            .map(|(index, _)| index)
            .collect();
        RowView {
            dataset: self,
            rows,
        }
    }

    pub fn unique_values(&self, field: Field) -> Vec<String> {
        unique_in_order(self.records.iter(), field)
    }
}

/// Ordered subset of dataset rows, addressed by index.
#[derive(Clone, Debug)]
pub struct RowView<'a> {
    dataset: &'a Dataset,
    rows: Vec<usize>,
}

impl PartialEq for RowView<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.dataset, other.dataset) && self.rows == other.rows
    }
}

impl<'a> RowView<'a> {
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &'a LossRecord> + '_ {
        let records = &self.dataset.records;
        self.rows.iter().filter_map(move |&index| records.get(index))
    }

    pub fn filter<P>(&self, predicate: P) -> RowView<'a>
    where
        P: Fn(&LossRecord) -> bool,
    {
        let records = &self.dataset.records;
        let rows = self
            .rows
            .iter()
            .copied()
            .filter(|&index| records.get(index).is_some_and(&predicate))
            .collect();
        RowView {
            dataset: self.dataset,
            rows,
        }
    }

    pub fn unique_values(&self, field: Field) -> Vec<String> {
        unique_in_order(self.records(), field)
    }

    pub fn total(&self, metric: MetricId) -> u64 {
        self.records()
            .map(|record| record.count(metric))
            .fold(0, u64::saturating_add)
    }
}

/// Predicate matching rows whose `field` is one of `values`.
pub fn member_of(field: Field, values: &[String]) -> impl Fn(&LossRecord) -> bool + '_ {
    let allowed = values.iter().map(String::as_str).collect::<HashSet<_>>();
    move |record: &LossRecord| allowed.contains(record.field(field))
}

fn unique_in_order<'r>(records: impl Iterator<Item = &'r LossRecord>, field: Field) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for record in records {
        let value = record.field(field);
        if seen.insert(value) {
            values.push(value.to_owned());
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::losses::test_support::three_row_dataset;

    #[test]
    fn side_parse_is_case_insensitive() {
        assert_eq!(Side::parse(" Russia "), Some(Side::Russia));
        assert_eq!(Side::parse("UKRAINE"), Some(Side::Ukraine));
        assert_eq!(Side::parse("belarus"), None);
    }

    #[test]
    fn unique_values_keep_first_appearance_order() {
        let dataset = three_row_dataset();
        assert_eq!(
            dataset.unique_values(Field::Equipment),
            vec!["tank".to_owned(), "helicopter".to_owned()]
        );
        assert_eq!(
            dataset.unique_values(Field::Manufacturer),
            vec!["Manuf-A".to_owned(), "Manuf-B".to_owned()]
        );
    }

    #[test]
    fn filter_leaves_source_untouched() {
        let dataset = three_row_dataset();
        let tanks = dataset.filter(|record| record.equipment == "tank");

        assert_eq!(tanks.rows(), &[0, 1]);
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.view().len(), 3);
    }

    #[test]
    fn view_filter_is_idempotent() {
        let dataset = three_row_dataset();
        let wanted = vec!["Manuf-A".to_owned()];
        let once = dataset.filter(member_of(Field::Manufacturer, &wanted));
        let twice = once.filter(member_of(Field::Manufacturer, &wanted));

        assert_eq!(once, twice);
        assert_eq!(once.rows(), &[0, 2]);
    }

    #[test]
    fn member_of_empty_matches_nothing() {
        let dataset = three_row_dataset();
        assert!(dataset.filter(member_of(Field::Model, &[])).is_empty());
    }

    #[test]
    fn axis_options_are_capped() {
        let schema = Schema::new((0..14).map(|index| format!("col{index}")).collect());
        let options = schema.axis_options();

        assert_eq!(options.len(), AXIS_OPTION_LIMIT);
        assert_eq!(schema.metric_name(options[0]), "col0");
        assert_eq!(schema.metric_name(options[10]), "col10");
    }

    #[test]
    fn axis_names_resolve_within_the_cap() {
        let schema = Schema::new((0..12).map(|index| format!("col{index}")).collect());

        assert_eq!(schema.axis_by_name("col3"), Ok(MetricId(3)));
        let error = schema.axis_by_name("col11").expect_err("col11 is past the cap");
        assert_eq!(error.allowed.len(), AXIS_OPTION_LIMIT);
        assert!(error.to_string().starts_with("unknown axis column \"col11\"; expected one of: col0, col1"));
    }

    #[test]
    fn totals_saturate_instead_of_wrapping() {
        let schema = Schema::new(vec!["destroyed".to_owned()]);
        let record = |count| LossRecord {
            equipment: "tank".to_owned(),
            manufacturer: "UVZ".to_owned(),
            model: "T-72".to_owned(),
            lost_by: Side::Russia,
            counts: vec![count],
        };
        let dataset = Dataset::new(schema, vec![record(u64::MAX), record(1)]);

        assert_eq!(dataset.view().total(MetricId(0)), u64::MAX);
    }

    #[test]
    fn totals_sum_selected_metric() {
        let dataset = three_row_dataset();
        let destroyed = dataset.schema().metric_or_first("destroyed");

        assert_eq!(dataset.view().total(destroyed), 3);
        assert_eq!(dataset.filter(|record| record.lost_by == Side::Ukraine).total(destroyed), 0);
    }
}
