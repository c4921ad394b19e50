use eframe::egui::{Color32, Pos2, Sense, Stroke, Ui, vec2};
use losses_dashboard::charts::{ScatterChart, ScatterPoint};

use crate::util::format_count;

use super::super::render_utils::{
    PlotFrame, blend_color, dim_color, draw_axes, draw_background, draw_side_legend, nice_scale,
    side_color,
};
use super::{animated, hover_caption};

const MIN_RADIUS: f32 = 3.0;
const MAX_RADIUS: f32 = 28.0;

/// Area-proportional bubble radius.
fn bubble_radius(size: f32, size_max: f32) -> f32 {
    if size_max <= 0.0 {
        return MIN_RADIUS;
    }
    MIN_RADIUS + (size.max(0.0) / size_max).sqrt() * (MAX_RADIUS - MIN_RADIUS)
}

fn hovered_point(pointer: Option<Pos2>, placed: &[(Pos2, f32)]) -> Option<usize> {
    let pointer = pointer?;
    placed
        .iter()
        .enumerate()
        .filter_map(|(index, (position, radius))| {
            let distance = position.distance(pointer);
            (distance <= radius.max(6.0)).then_some((index, distance))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

fn caption(chart: &ScatterChart, point: &ScatterPoint) -> String {
    format!(
        "{}  |  {}  |  {}  |  {} {}  |  {} {}  |  {} {}",
        point.model,
        point.manufacturer,
        point.side,
        chart.x_label,
        format_count(point.x),
        chart.y_label,
        format_count(point.y),
        chart.size_label,
        format_count(point.size),
    )
}

pub(super) fn draw(ui: &mut Ui, salt: &str, chart: &ScatterChart, height: f32) {
    let (rect, response) = ui.allocate_exact_size(vec2(ui.available_width(), height), Sense::hover());
    let painter = ui.painter_at(rect);
    draw_background(&painter, rect);

    let x_scale = nice_scale(chart.points.iter().map(|point| point.x).max().unwrap_or(0));
    let y_scale = nice_scale(chart.points.iter().map(|point| point.y).max().unwrap_or(0));
    let size_max = chart.points.iter().map(|point| point.size).max().unwrap_or(0);

    let frame = PlotFrame::new(
        rect,
        animated(ui, (salt, "x-max"), x_scale.0 as f32),
        animated(ui, (salt, "y-max"), y_scale.0 as f32),
    );
    let size_max = animated(ui, (salt, "size-max"), size_max as f32);
    draw_axes(
        &painter,
        &frame,
        Some(x_scale),
        y_scale,
        &chart.x_label,
        &chart.y_label,
    );

    let placed = chart
        .points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let x = animated(ui, (salt, "x", index), point.x as f32);
            let y = animated(ui, (salt, "y", index), point.y as f32);
            let size = animated(ui, (salt, "size", index), point.size as f32);
            (frame.to_screen(x, y), bubble_radius(size, size_max))
        })
        .collect::<Vec<_>>();

    let hovered = hovered_point(response.hover_pos(), &placed);

    // Largest bubbles first so small ones stay visible.
    let mut order = (0..placed.len()).collect::<Vec<_>>();
    order.sort_by(|a, b| placed[*b].1.total_cmp(&placed[*a].1));

    for index in order {
        let (position, radius) = placed[index];
        let base = side_color(chart.points[index].side);
        let color = match hovered {
            Some(hovered) if hovered == index => blend_color(base, Color32::WHITE, 0.35),
            Some(_) => dim_color(base, 0.55),
            None => base.gamma_multiply(0.8),
        };
        painter.circle_filled(position, radius, color);
        painter.circle_stroke(
            position,
            radius,
            Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
        );
    }

    draw_side_legend(&painter, rect);

    if let Some(index) = hovered
        && let Some(point) = chart.points.get(index)
    {
        hover_caption(ui, rect, caption(chart, point));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::pos2;

    #[test]
    fn radius_grows_with_area() {
        assert_eq!(bubble_radius(0.0, 10.0), MIN_RADIUS);
        assert_eq!(bubble_radius(10.0, 10.0), MAX_RADIUS);
        assert_eq!(bubble_radius(5.0, 0.0), MIN_RADIUS);
        assert!(bubble_radius(2.5, 10.0) < bubble_radius(5.0, 10.0));
    }

    #[test]
    fn hover_picks_nearest_bubble_under_pointer() {
        let placed = [(pos2(10.0, 10.0), 8.0), (pos2(16.0, 10.0), 8.0)];

        assert_eq!(hovered_point(Some(pos2(15.0, 10.0)), &placed), Some(1));
        assert_eq!(hovered_point(Some(pos2(80.0, 80.0)), &placed), None);
        assert_eq!(hovered_point(None, &placed), None);
    }
}
