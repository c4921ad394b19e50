use eframe::egui::{self, Align2, Color32, FontId, RichText, Sense, Ui, vec2};
use losses_dashboard::charts::{Chart, ChartSet, Panels, TRANSITION_MS, render_all};
use losses_dashboard::losses::Side;

use super::render_utils::draw_background;
use super::{ChartCache, ChartCacheKey, ViewModel};

mod bar;
mod pie;
mod scatter;

const TRANSITION_SECS: f32 = TRANSITION_MS as f32 / 1000.0;

const BUBBLE_HEIGHT: f32 = 380.0;
const PIE_HEIGHT: f32 = 300.0;
const BAR_HEIGHT: f32 = 340.0;

impl ViewModel {
    fn cache_key(&self) -> ChartCacheKey {
        ChartCacheKey {
            selection_revision: self.chain.revision(),
            bubble: self.bubble_spec,
            loss_type: self.loss_type,
            split_by_side: self.split_by_side,
        }
    }

    fn refresh_charts(&mut self) -> &ChartSet {
        let key = self.cache_key();
        let cache = match self.chart_cache.take() {
            Some(cache) if cache.key == key => cache,
            _ => ChartCache {
                key,
                charts: render_all(
                    self.chain.selection(),
                    &self.bubble_spec,
                    &self.loss_type,
                    self.split_by_side,
                    &self.dataset,
                ),
            },
        };

        &self.chart_cache.insert(cache).charts
    }

    pub(in crate::app) fn draw_charts(&mut self, ui: &mut Ui) {
        let charts = self.refresh_charts();

        draw_chart(ui, "bubble", &charts.bubble, BUBBLE_HEIGHT);
        ui.add_space(12.0);
        draw_panels(ui, "pie", &charts.pie, PIE_HEIGHT);
        ui.add_space(12.0);
        draw_panels(ui, "bar", &charts.bar, BAR_HEIGHT);
    }
}

fn draw_panels(ui: &mut Ui, salt: &str, panels: &Panels, height: f32) {
    match panels {
        Panels::Single { chart } => draw_chart(ui, salt, chart, height),
        Panels::Dual { panels } => {
            ui.columns(2, |columns| {
                for (column, side) in columns.iter_mut().zip(Side::ALL) {
                    draw_chart(
                        column,
                        &format!("{salt}-{}", side.label()),
                        panels.panel(side),
                        height,
                    );
                }
            });
        }
    }
}

fn draw_chart(ui: &mut Ui, salt: &str, chart: &Chart, height: f32) {
    ui.label(RichText::new(chart.title()).strong().size(15.0));
    if chart.unfiltered() {
        ui.label(
            RichText::new("Selection incomplete, showing every row.")
                .weak()
                .italics(),
        );
    }

    if chart.is_empty() {
        let (rect, _) = ui.allocate_exact_size(vec2(ui.available_width(), height), Sense::hover());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "No losses match this selection",
            FontId::proportional(14.0),
            Color32::from_gray(170),
        );
        return;
    }

    match chart {
        Chart::Scatter(chart) => scatter::draw(ui, salt, chart, height),
        Chart::Pie(chart) => pie::draw(ui, salt, chart, height),
        Chart::Bar(chart) => bar::draw(ui, salt, chart, height),
    }
}

/// Eases `target` over the chart transition time.
fn animated(ui: &Ui, id: impl std::hash::Hash, target: f32) -> f32 {
    ui.ctx()
        .animate_value_with_time(ui.make_persistent_id(id), target, TRANSITION_SECS)
}

fn hover_caption(ui: &Ui, rect: egui::Rect, text: String) {
    ui.painter_at(rect).text(
        rect.left_top() + vec2(10.0, 8.0),
        Align2::LEFT_TOP,
        text,
        FontId::proportional(13.0),
        Color32::from_gray(240),
    );
}
