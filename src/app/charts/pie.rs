use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Ui, pos2, vec2};
use losses_dashboard::charts::PieChart;

use crate::util::{format_count, short_label};

use super::super::render_utils::{blend_color, dim_color, draw_background, label_color};
use super::{animated, hover_caption};

const LEGEND_WIDTH: f32 = 190.0;
const LEGEND_ROW: f32 = 17.0;
const MAX_WEDGE_STEP: f32 = FRAC_PI_2;
const ARC_POINTS_PER_TURN: f32 = 96.0;

/// Start angle and sweep of each slice, clockwise from twelve o'clock.
fn wedge_angles(values: &[f32]) -> Vec<(f32, f32)> {
    let total = values.iter().sum::<f32>();
    if total <= 0.0 {
        return vec![(-FRAC_PI_2, 0.0); values.len()];
    }

    let mut start = -FRAC_PI_2;
    values
        .iter()
        .map(|value| {
            let sweep = value.max(0.0) / total * TAU;
            let wedge = (start, sweep);
            start += sweep;
            wedge
        })
        .collect()
}

fn slice_at(center: Pos2, radius: f32, pointer: Pos2, wedges: &[(f32, f32)]) -> Option<usize> {
    let offset = pointer - center;
    if offset.length() > radius {
        return None;
    }

    let angle = (offset.y.atan2(offset.x) + FRAC_PI_2).rem_euclid(TAU) - FRAC_PI_2;
    wedges
        .iter()
        .position(|(start, sweep)| angle >= *start && angle < start + sweep)
}

/// Fills one wedge as convex pieces no wider than a quarter turn.
fn paint_wedge(shapes: &mut Vec<Shape>, center: Pos2, radius: f32, start: f32, sweep: f32, fill: Color32) {
    let mut piece_start = start;
    let end = start + sweep;
    while piece_start < end {
        let piece_end = (piece_start + MAX_WEDGE_STEP).min(end);
        let steps = (((piece_end - piece_start) / TAU) * ARC_POINTS_PER_TURN).ceil().max(1.0) as usize;

        let mut points = Vec::with_capacity(steps + 2);
        points.push(center);
        for step in 0..=steps {
            let angle = piece_start + (piece_end - piece_start) * step as f32 / steps as f32;
            points.push(center + vec2(angle.cos(), angle.sin()) * radius);
        }
        shapes.push(Shape::convex_polygon(points, fill, Stroke::NONE));
        piece_start = piece_end;
    }
}

pub(super) fn draw(ui: &mut Ui, salt: &str, chart: &PieChart, height: f32) {
    let (rect, response) = ui.allocate_exact_size(vec2(ui.available_width(), height), Sense::hover());
    let painter = ui.painter_at(rect);
    draw_background(&painter, rect);

    let values = chart
        .slices
        .iter()
        .map(|slice| animated(ui, (salt, slice.label.as_str()), slice.value as f32))
        .collect::<Vec<_>>();
    let wedges = wedge_angles(&values);
    let total = chart.total().max(1) as f32;

    let legend_width = LEGEND_WIDTH.min(rect.width() * 0.45);
    let plot_width = rect.width() - legend_width;
    let radius = (plot_width.min(rect.height()) * 0.5 - 18.0).max(10.0);
    let center = pos2(rect.left() + plot_width * 0.5, rect.center().y + 8.0);

    let hovered = response
        .hover_pos()
        .and_then(|pointer| slice_at(center, radius, pointer, &wedges));

    let mut shapes = Vec::new();
    for (index, (slice, (start, sweep))) in chart.slices.iter().zip(&wedges).enumerate() {
        let base = label_color(&slice.label);
        let fill = match hovered {
            Some(hovered) if hovered == index => blend_color(base, Color32::WHITE, 0.3),
            Some(_) => dim_color(base, 0.6),
            None => base,
        };
        paint_wedge(&mut shapes, center, radius, *start, *sweep, fill);
    }
    painter.extend(shapes);

    for ((start, sweep), value) in wedges.iter().zip(&values) {
        if *sweep < 0.35 {
            continue;
        }
        let middle = start + sweep * 0.5;
        painter.text(
            center + vec2(middle.cos(), middle.sin()) * radius * 0.68,
            Align2::CENTER_CENTER,
            format!("{:.0}%", value / total * 100.0),
            FontId::proportional(11.0),
            Color32::from_gray(20),
        );
    }

    let visible_rows = ((rect.height() - 24.0) / LEGEND_ROW).max(1.0) as usize;
    let legend_left = rect.right() - legend_width;
    let mut y = rect.top() + 14.0;
    for (index, slice) in chart.slices.iter().enumerate() {
        if index + 1 == visible_rows && chart.slices.len() > visible_rows {
            painter.text(
                pos2(legend_left + 16.0, y),
                Align2::LEFT_CENTER,
                format!("+{} more", chart.slices.len() - index),
                FontId::proportional(11.0),
                Color32::from_gray(170),
            );
            break;
        }
        painter.circle_filled(pos2(legend_left + 6.0, y), 5.0, label_color(&slice.label));
        painter.text(
            pos2(legend_left + 16.0, y),
            Align2::LEFT_CENTER,
            short_label(&slice.label, 22),
            FontId::proportional(11.0),
            Color32::from_gray(220),
        );
        y += LEGEND_ROW;
    }

    if let Some(index) = hovered
        && let Some(slice) = chart.slices.get(index)
    {
        hover_caption(
            ui,
            rect,
            format!(
                "{}  |  {} {}  |  {:.1}%",
                slice.label,
                chart.value_label,
                format_count(slice.value),
                slice.value as f32 / total * 100.0
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wedges_cover_a_full_turn() {
        let wedges = wedge_angles(&[3.0, 1.0]);

        assert_eq!(wedges.len(), 2);
        assert!((wedges[0].1 - TAU * 0.75).abs() < 1e-5);
        assert!((wedges[1].0 - (wedges[0].0 + wedges[0].1)).abs() < 1e-5);
        assert!(wedge_angles(&[0.0, 0.0]).iter().all(|(_, sweep)| *sweep == 0.0));
    }

    #[test]
    fn pointer_angle_selects_slice() {
        let wedges = wedge_angles(&[1.0, 1.0]);
        let center = pos2(100.0, 100.0);

        // right half comes first when sweeping clockwise from the top
        assert_eq!(slice_at(center, 50.0, pos2(130.0, 100.0), &wedges), Some(0));
        assert_eq!(slice_at(center, 50.0, pos2(70.0, 100.0), &wedges), Some(1));
        assert_eq!(slice_at(center, 50.0, pos2(300.0, 100.0), &wedges), None);
    }

    #[test]
    fn wedge_pieces_stay_convex() {
        let mut shapes = Vec::new();
        paint_wedge(&mut shapes, pos2(0.0, 0.0), 10.0, 0.0, TAU * 0.6, Color32::RED);

        assert_eq!(shapes.len(), 3);
    }
}
