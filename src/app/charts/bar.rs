use eframe::egui::{Align2, Color32, FontId, Rect, Sense, Ui, pos2, vec2};
use losses_dashboard::charts::BarChart;
use losses_dashboard::losses::Side;

use crate::util::{format_count, short_label};

use super::super::render_utils::{
    PlotFrame, blend_color, draw_axes, draw_background, draw_side_legend, nice_scale, side_color,
};
use super::{animated, hover_caption};

const BAR_FILL: f32 = 0.72;
const MIN_LABEL_SLOT: f32 = 42.0;

/// Every n-th category gets an x label so labels do not overlap.
fn label_stride(slot_width: f32) -> usize {
    if slot_width >= MIN_LABEL_SLOT {
        1
    } else {
        (MIN_LABEL_SLOT / slot_width.max(1.0)).ceil() as usize
    }
}

fn slot_at(area: Rect, categories: usize, x: f32) -> Option<usize> {
    if categories == 0 || x < area.left() || x >= area.right() {
        return None;
    }
    let slot = ((x - area.left()) / area.width() * categories as f32) as usize;
    Some(slot.min(categories - 1))
}

fn caption(chart: &BarChart, category: &str) -> String {
    let mut parts = vec![category.to_owned()];
    for side in Side::ALL {
        if let Some(bar) = chart
            .bars
            .iter()
            .find(|bar| bar.category == category && bar.side == side)
        {
            parts.push(format!(
                "{side} {} ({} rows)",
                format_count(bar.value),
                bar.rows
            ));
        }
    }
    parts.push(format!(
        "{} {}",
        chart.y_label,
        format_count(chart.category_total(category))
    ));
    parts.join("  |  ")
}

pub(super) fn draw(ui: &mut Ui, salt: &str, chart: &BarChart, height: f32) {
    let (rect, response) = ui.allocate_exact_size(vec2(ui.available_width(), height), Sense::hover());
    let painter = ui.painter_at(rect);
    draw_background(&painter, rect);

    let categories = chart.categories();
    let y_scale = nice_scale(
        categories
            .iter()
            .map(|category| chart.category_total(category))
            .max()
            .unwrap_or(0),
    );
    let frame = PlotFrame::new(
        rect,
        categories.len() as f32,
        animated(ui, (salt, "y-max"), y_scale.0 as f32),
    );
    draw_axes(&painter, &frame, None, y_scale, chart.x_label, &chart.y_label);

    let hovered = response
        .hover_pos()
        .and_then(|pointer| slot_at(frame.area, categories.len(), pointer.x));
    let slot_width = frame.area.width() / categories.len().max(1) as f32;
    let stride = label_stride(slot_width);

    for (index, category) in categories.iter().enumerate() {
        let center = frame.x_to_screen(index as f32 + 0.5);
        let half_width = slot_width * BAR_FILL * 0.5;

        let mut stacked = 0.0;
        for side in Side::ALL {
            let target = chart
                .bars
                .iter()
                .filter(|bar| bar.category == *category && bar.side == side)
                .map(|bar| bar.value)
                .fold(0, u64::saturating_add);
            let value = animated(ui, (salt, *category, side), target as f32);
            if value <= 0.0 {
                continue;
            }

            let segment = Rect::from_min_max(
                pos2(center - half_width, frame.y_to_screen(stacked + value)),
                pos2(center + half_width, frame.y_to_screen(stacked)),
            );
            let color = if hovered == Some(index) {
                blend_color(side_color(side), Color32::WHITE, 0.3)
            } else {
                side_color(side)
            };
            painter.rect_filled(segment, 0.0, color);
            stacked += value;
        }

        if index % stride == 0 {
            painter.text(
                pos2(center, frame.area.bottom() + 4.0),
                Align2::CENTER_TOP,
                short_label(category, (slot_width * stride as f32 / 7.0).max(3.0) as usize),
                FontId::proportional(10.0),
                Color32::from_gray(170),
            );
        }
    }

    draw_side_legend(&painter, rect);

    if let Some(index) = hovered
        && let Some(category) = categories.get(index)
    {
        hover_caption(ui, rect, caption(chart, category));
    }
}
