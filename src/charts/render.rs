use std::collections::HashMap;

use tracing::debug;

use crate::filter::Selection;
use crate::losses::{Dataset, Field, MetricId, RowView, Side, member_of};

use super::model::{
    Bar, BarChart, CategoryOrder, Chart, ChartSet, DualChart, Panels, PieChart, PieSlice,
    ScatterChart, ScatterPoint, TRANSITION_MS,
};
use super::spec::ChartSpec;

/// Rows matching every part of the selection, or `None` while any part is unset.
pub fn selected_rows<'a>(selection: &Selection, dataset: &'a Dataset) -> Option<RowView<'a>> {
    let equipment = selection.equipment.as_deref()?;
    let model = selection.model.as_deref()?;
    let manufacturer = selection.manufacturer.as_deref()?;

    Some(
        dataset
            .filter(member_of(Field::Equipment, equipment))
            .filter(member_of(Field::Model, model))
            .filter(member_of(Field::Manufacturer, manufacturer)),
    )
}

/// Rows a chart plots. Falls back to the whole dataset, flagged `true`, when the
/// selection or the chart's own fields are incomplete.
pub fn chart_rows<'a>(
    selection: &Selection,
    spec_complete: bool,
    dataset: &'a Dataset,
) -> (RowView<'a>, bool) {
    if spec_complete && let Some(rows) = selected_rows(selection, dataset) {
        return (rows, false);
    }
    (dataset.view(), true)
}

pub fn side_rows<'a>(rows: &RowView<'a>, side: Side) -> RowView<'a> {
    rows.filter(|record| record.lost_by == side)
}

pub fn render_bubble(selection: &Selection, spec: &ChartSpec, dataset: &Dataset) -> Chart {
    let (rows, unfiltered) = chart_rows(selection, spec.bubble_complete(), dataset);
    let (x, y, size) = spec.bubble_or_default(dataset.schema());
    let schema = dataset.schema();

    let points = rows
        .records()
        .map(|record| ScatterPoint {
            x: record.count(x),
            y: record.count(y),
            size: record.count(size),
            side: record.lost_by,
            model: record.model.clone(),
            manufacturer: record.manufacturer.clone(),
            equipment: record.equipment.clone(),
        })
        .collect::<Vec<_>>();

    debug!(chart = "bubble", rows = rows.len(), unfiltered, "rendered chart");
    Chart::Scatter(ScatterChart {
        title: format!("{} vs {}", schema.metric_name(y), schema.metric_name(x)),
        x_label: schema.metric_name(x).to_owned(),
        y_label: schema.metric_name(y).to_owned(),
        size_label: schema.metric_name(size).to_owned(),
        color_by: Field::LostBy.column_name(),
        points,
        unfiltered,
        transition_ms: TRANSITION_MS,
    })
}

pub fn render_pie(selection: &Selection, spec: &ChartSpec, dataset: &Dataset) -> Chart {
    let (rows, unfiltered) = chart_rows(selection, spec.loss_type_complete(), dataset);
    let metric = spec.loss_type_or_default(dataset.schema());

    debug!(chart = "pie", rows = rows.len(), unfiltered, "rendered chart");
    Chart::Pie(pie_chart(
        &rows,
        metric,
        "Losses by manufacturer".to_owned(),
        unfiltered,
    ))
}

pub fn render_dual_pie(selection: &Selection, spec: &ChartSpec, dataset: &Dataset) -> DualChart {
    let (rows, unfiltered) = chart_rows(selection, spec.loss_type_complete(), dataset);
    let metric = spec.loss_type_or_default(dataset.schema());

    let panel = |side: Side| {
        let rows = side_rows(&rows, side);
        debug!(chart = "pie", side = %side, rows = rows.len(), unfiltered, "rendered chart");
        Chart::Pie(pie_chart(
            &rows,
            metric,
            format!("Losses by manufacturer ({side})"),
            unfiltered,
        ))
    };

    DualChart {
        russia: panel(Side::Russia),
        ukraine: panel(Side::Ukraine),
    }
}

pub fn render_bar(selection: &Selection, spec: &ChartSpec, dataset: &Dataset) -> Chart {
    let (rows, unfiltered) = chart_rows(selection, spec.loss_type_complete(), dataset);
    let metric = spec.loss_type_or_default(dataset.schema());

    debug!(chart = "bar", rows = rows.len(), unfiltered, "rendered chart");
    Chart::Bar(bar_chart(
        &rows,
        metric,
        dataset,
        "Losses by model".to_owned(),
        CategoryOrder::FirstSeen,
        unfiltered,
    ))
}

pub fn render_dual_bar(selection: &Selection, spec: &ChartSpec, dataset: &Dataset) -> DualChart {
    let (rows, unfiltered) = chart_rows(selection, spec.loss_type_complete(), dataset);
    let metric = spec.loss_type_or_default(dataset.schema());

    let panel = |side: Side| {
        let rows = side_rows(&rows, side);
        debug!(chart = "bar", side = %side, rows = rows.len(), unfiltered, "rendered chart");
        Chart::Bar(bar_chart(
            &rows,
            metric,
            dataset,
            format!("Losses by model ({side})"),
            CategoryOrder::TotalAscending,
            unfiltered,
        ))
    };

    DualChart {
        russia: panel(Side::Russia),
        ukraine: panel(Side::Ukraine),
    }
}

/// One recomputation cycle: every chart for the current selection.
pub fn render_all(
    selection: &Selection,
    bubble: &ChartSpec,
    loss_type: &ChartSpec,
    dual: bool,
    dataset: &Dataset,
) -> ChartSet {
    let (pie, bar) = if dual {
        (
            Panels::Dual {
                panels: render_dual_pie(selection, loss_type, dataset),
            },
            Panels::Dual {
                panels: render_dual_bar(selection, loss_type, dataset),
            },
        )
    } else {
        (
            Panels::Single {
                chart: render_pie(selection, loss_type, dataset),
            },
            Panels::Single {
                chart: render_bar(selection, loss_type, dataset),
            },
        )
    };

    ChartSet {
        bubble: render_bubble(selection, bubble, dataset),
        pie,
        bar,
    }
}

fn pie_chart(rows: &RowView<'_>, metric: MetricId, title: String, unfiltered: bool) -> PieChart {
    let mut slices: Vec<PieSlice> = Vec::new();
    let mut index_by_label: HashMap<&str, usize> = HashMap::new();
    for record in rows.records() {
        let index = *index_by_label
            .entry(record.manufacturer.as_str())
            .or_insert_with(|| {
                slices.push(PieSlice {
                    label: record.manufacturer.clone(),
                    value: 0,
                });
                slices.len() - 1
            });
        slices[index].value = slices[index].value.saturating_add(record.count(metric));
    }

    slices.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.label.cmp(&b.label)));

    PieChart {
        title,
        value_label: rows.dataset().schema().metric_name(metric).to_owned(),
        names_by: Field::Manufacturer.column_name(),
        slices,
        unfiltered,
        transition_ms: TRANSITION_MS,
    }
}

fn bar_chart(
    rows: &RowView<'_>,
    metric: MetricId,
    dataset: &Dataset,
    title: String,
    order: CategoryOrder,
    unfiltered: bool,
) -> BarChart {
    let plotted = rows.filter(|record| record.count(metric) > 0);

    let mut bars: Vec<Bar> = Vec::new();
    let mut index_by_key: HashMap<(&str, Side), usize> = HashMap::new();
    for record in plotted.records() {
        let index = *index_by_key
            .entry((record.model.as_str(), record.lost_by))
            .or_insert_with(|| {
                bars.push(Bar {
                    category: record.model.clone(),
                    side: record.lost_by,
                    value: 0,
                    rows: 0,
                });
                bars.len() - 1
            });
        bars[index].value = bars[index].value.saturating_add(record.count(metric));
        bars[index].rows += 1;
    }

    if order == CategoryOrder::TotalAscending {
        let mut totals: HashMap<String, (u64, usize)> = HashMap::new();
        for (position, bar) in bars.iter().enumerate() {
            let entry = totals.entry(bar.category.clone()).or_insert((0, position));
            entry.0 = entry.0.saturating_add(bar.value);
        }
        bars.sort_by_key(|bar| totals.get(&bar.category).copied().unwrap_or_default());
    }

    BarChart {
        title,
        x_label: Field::Model.column_name(),
        y_label: dataset.schema().metric_name(metric).to_owned(),
        order,
        bars,
        unfiltered,
        transition_ms: TRANSITION_MS,
    }
}
