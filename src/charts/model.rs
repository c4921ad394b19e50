use serde::Serialize;

use crate::losses::Side;

pub const TRANSITION_MS: u32 = 500;

/// Backend-independent description of one rendered chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Chart {
    Scatter(ScatterChart),
    Pie(PieChart),
    Bar(BarChart),
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Self::Scatter(chart) => &chart.title,
            Self::Pie(chart) => &chart.title,
            Self::Bar(chart) => &chart.title,
        }
    }

    pub fn transition_ms(&self) -> u32 {
        match self {
            Self::Scatter(chart) => chart.transition_ms,
            Self::Pie(chart) => chart.transition_ms,
            Self::Bar(chart) => chart.transition_ms,
        }
    }

    /// True when the selection was ignored and the whole dataset was plotted.
    pub fn unfiltered(&self) -> bool {
        match self {
            Self::Scatter(chart) => chart.unfiltered,
            Self::Pie(chart) => chart.unfiltered,
            Self::Bar(chart) => chart.unfiltered,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Scatter(chart) => chart.points.is_empty(),
            Self::Pie(chart) => chart.slices.is_empty(),
            Self::Bar(chart) => chart.bars.is_empty(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub size_label: String,
    pub color_by: &'static str,
    pub points: Vec<ScatterPoint>,
    pub unfiltered: bool,
    pub transition_ms: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScatterPoint {
    pub x: u64,
    pub y: u64,
    pub size: u64,
    pub side: Side,
    /// Hover label.
    pub model: String,
    pub manufacturer: String,
    pub equipment: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub value_label: String,
    pub names_by: &'static str,
    pub slices: Vec<PieSlice>,
    pub unfiltered: bool,
    pub transition_ms: u32,
}

impl PieChart {
    pub fn total(&self) -> u64 {
        self.slices
            .iter()
            .map(|slice| slice.value)
            .fold(0, u64::saturating_add)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryOrder {
    FirstSeen,
    TotalAscending,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: String,
    pub order: CategoryOrder,
    pub bars: Vec<Bar>,
    pub unfiltered: bool,
    pub transition_ms: u32,
}

impl BarChart {
    /// Distinct categories in drawing order.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for bar in &self.bars {
            if !categories.contains(&bar.category.as_str()) {
                categories.push(&bar.category);
            }
        }
        categories
    }

    /// Stacked height of one category.
    pub fn category_total(&self, category: &str) -> u64 {
        self.bars
            .iter()
            .filter(|bar| bar.category == category)
            .map(|bar| bar.value)
            .fold(0, u64::saturating_add)
    }
}

/// One stacked segment: the summed value of a model's rows for one side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Bar {
    pub category: String,
    pub side: Side,
    pub value: u64,
    pub rows: usize,
}

/// Two-panel variant, one chart per side.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DualChart {
    pub russia: Chart,
    pub ukraine: Chart,
}

impl DualChart {
    pub fn panel(&self, side: Side) -> &Chart {
        match side {
            Side::Russia => &self.russia,
            Side::Ukraine => &self.ukraine,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "layout", rename_all = "lowercase")]
pub enum Panels {
    Single { chart: Chart },
    Dual { panels: DualChart },
}

/// Output of one full recomputation cycle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSet {
    pub bubble: Chart,
    pub pie: Panels,
    pub bar: Panels,
}
