use eframe::egui::{self, RichText, Ui};
use losses_dashboard::charts::{chart_rows, side_rows};
use losses_dashboard::losses::Side;

use crate::util::{format_count, selection_summary};

use super::super::ViewModel;
use super::super::render_utils::side_color;

impl ViewModel {
    pub(in crate::app) fn draw_summary(&self, ui: &mut Ui) {
        ui.heading("Selection");
        ui.separator();

        let selection = self.chain.selection();
        egui::Grid::new("selection_summary")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                ui.label("equipment");
                ui.label(selection_summary(
                    selection.equipment.as_deref(),
                    self.chain.equipment_options().len(),
                ));
                ui.end_row();

                ui.label("manufacturer");
                ui.label(selection_summary(
                    selection.manufacturer.as_deref(),
                    self.chain.manufacturer_options().len(),
                ));
                ui.end_row();

                ui.label("model");
                ui.label(selection_summary(
                    selection.model.as_deref(),
                    self.chain.model_options().len(),
                ));
                ui.end_row();
            });

        ui.add_space(8.0);
        let schema = self.dataset.schema();
        let Some(metric) = self.loss_type.y else {
            ui.label(RichText::new("Pick a loss type to see totals.").weak());
            return;
        };

        let (rows, unfiltered) = chart_rows(selection, true, &self.dataset);
        if unfiltered {
            ui.label(RichText::new("Selection incomplete, totals cover the whole dataset.").weak());
        } else {
            ui.label(format!("matched rows: {}", format_count(rows.len() as u64)));
        }

        ui.add_space(4.0);
        ui.label(RichText::new(schema.metric_name(metric)).strong());
        for side in Side::ALL {
            let total = side_rows(&rows, side).total(metric);
            ui.horizontal(|ui| {
                ui.label(RichText::new("●").color(side_color(side)));
                ui.label(side.label());
                ui.label(RichText::new(format_count(total)).monospace());
            });
        }
        ui.label(format!("total: {}", format_count(rows.total(metric))));
    }
}
