use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Stroke, ecolor::Hsva, pos2, vec2};
use losses_dashboard::losses::Side;

use crate::util::{format_count, stable_hue};

const AXIS_COLOR: Color32 = Color32::from_gray(150);
const TICK_TARGET: u64 = 5;

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));
}

pub(super) fn side_color(side: Side) -> Color32 {
    match side {
        Side::Russia => Color32::from_rgb(228, 94, 82),
        Side::Ukraine => Color32::from_rgb(86, 156, 232),
    }
}

/// Stable categorical colour for pie slices.
pub(super) fn label_color(label: &str) -> Color32 {
    Hsva::new(stable_hue(label), 0.62, 0.86, 1.0).into()
}

/// Axis maximum rounded up to a 1/2/5 step, and that step.
pub(super) fn nice_scale(max: u64) -> (u64, u64) {
    let max = max.max(1);
    let raw = max.div_ceil(TICK_TARGET).max(1);
    let magnitude = 10_u64.pow(raw.ilog10());
    let step = [1, 2, 5, 10]
        .into_iter()
        .map(|factor| factor * magnitude)
        .find(|step| *step >= raw)
        .unwrap_or(10 * magnitude);

    (max.div_ceil(step).checked_mul(step).unwrap_or(max), step)
}

/// Maps data values into a plot area with the origin at the bottom left.
#[derive(Clone, Copy, Debug)]
pub(super) struct PlotFrame {
    pub(super) area: Rect,
    pub(super) x_max: f32,
    pub(super) y_max: f32,
}

impl PlotFrame {
    pub(super) fn new(rect: Rect, x_max: f32, y_max: f32) -> Self {
        let area = Rect::from_min_max(
            rect.min + vec2(62.0, 14.0),
            rect.max - vec2(16.0, 42.0),
        );
        Self {
            area,
            x_max: x_max.max(1.0),
            y_max: y_max.max(1.0),
        }
    }

    pub(super) fn x_to_screen(&self, x: f32) -> f32 {
        self.area.left() + (x / self.x_max) * self.area.width()
    }

    pub(super) fn y_to_screen(&self, y: f32) -> f32 {
        self.area.bottom() - (y / self.y_max) * self.area.height()
    }

    pub(super) fn to_screen(&self, x: f32, y: f32) -> Pos2 {
        pos2(self.x_to_screen(x), self.y_to_screen(y))
    }
}

fn tick_label(painter: &Painter, pos: Pos2, anchor: Align2, value: u64) {
    painter.text(
        pos,
        anchor,
        format_count(value),
        FontId::proportional(11.0),
        AXIS_COLOR,
    );
}

/// Horizontal grid with y ticks, plus optional numeric x ticks.
pub(super) fn draw_axes(
    painter: &Painter,
    frame: &PlotFrame,
    x_scale: Option<(u64, u64)>,
    y_scale: (u64, u64),
    x_label: &str,
    y_label: &str,
) {
    let area = frame.area;
    let axis_stroke = Stroke::new(1.0, AXIS_COLOR);
    let grid_stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let (y_max, y_step) = y_scale;
    for value in (0..=y_max).step_by(y_step.max(1) as usize) {
        let y = frame.y_to_screen(value as f32);
        painter.line_segment(
            [pos2(area.left(), y), pos2(area.right(), y)],
            grid_stroke,
        );
        tick_label(painter, pos2(area.left() - 6.0, y), Align2::RIGHT_CENTER, value);
    }

    if let Some((x_max, x_step)) = x_scale {
        for value in (0..=x_max).step_by(x_step.max(1) as usize) {
            let x = frame.x_to_screen(value as f32);
            painter.line_segment(
                [pos2(x, area.top()), pos2(x, area.bottom())],
                grid_stroke,
            );
            tick_label(painter, pos2(x, area.bottom() + 4.0), Align2::CENTER_TOP, value);
        }
    }

    painter.line_segment([area.left_bottom(), area.right_bottom()], axis_stroke);
    painter.line_segment([area.left_bottom(), area.left_top()], axis_stroke);

    painter.text(
        pos2(area.center().x, area.bottom() + 24.0),
        Align2::CENTER_TOP,
        x_label,
        FontId::proportional(12.0),
        Color32::from_gray(210),
    );
    painter.text(
        pos2(area.left() + 6.0, area.top()),
        Align2::LEFT_TOP,
        y_label,
        FontId::proportional(12.0),
        Color32::from_gray(210),
    );
}

/// Colour key for the two sides, anchored at the top right of `rect`.
pub(super) fn draw_side_legend(painter: &Painter, rect: Rect) {
    let mut anchor = rect.right_top() + vec2(-14.0, 12.0);
    for side in Side::ALL.iter().rev() {
        let label = painter.text(
            anchor,
            Align2::RIGHT_CENTER,
            side.label(),
            FontId::proportional(12.0),
            Color32::from_gray(225),
        );
        painter.circle_filled(pos2(label.left() - 9.0, anchor.y), 5.0, side_color(*side));
        anchor.x = label.left() - 26.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_rounds_up_to_readable_steps() {
        assert_eq!(nice_scale(0), (1, 1));
        assert_eq!(nice_scale(4), (4, 1));
        assert_eq!(nice_scale(23), (25, 5));
        assert_eq!(nice_scale(1_234), (1_500, 500));
        assert_eq!(nice_scale(u64::MAX).0, u64::MAX);
    }

    #[test]
    fn frame_maps_origin_to_bottom_left() {
        let frame = PlotFrame::new(Rect::from_min_max(pos2(0.0, 0.0), pos2(400.0, 300.0)), 10.0, 20.0);

        assert_eq!(frame.to_screen(0.0, 0.0), frame.area.left_bottom());
        assert_eq!(frame.to_screen(10.0, 20.0), frame.area.right_top());
    }

    #[test]
    fn blending_moves_toward_overlay() {
        let mixed = blend_color(Color32::BLACK, Color32::WHITE, 0.5);
        assert!((126..=128).contains(&mixed.r()));
        assert_eq!(dim_color(Color32::WHITE, 0.0).r(), 0);
    }
}
