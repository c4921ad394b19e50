use std::sync::Arc;

use eframe::egui::{self, Align, Color32, Context, Layout, RichText};
use losses_dashboard::charts::ChartSpec;
use losses_dashboard::filter::FilterChain;
use losses_dashboard::losses::Dataset;

use crate::util::format_count;

use super::super::{OptionSearches, ShellStatus, ViewModel};

const DATASET_URL: &str = "https://www.kaggle.com/datasets/piterfm/2022-ukraine-russia-war-equipment-losses-oryx";

impl ViewModel {
    pub(in crate::app) fn new(dataset: Arc<Dataset>) -> Self {
        let chain = FilterChain::new(&dataset);
        let bubble_spec = ChartSpec::default_bubble(dataset.schema());
        let loss_type = ChartSpec::default_loss_type(dataset.schema());

        Self {
            dataset,
            chain,
            bubble_spec,
            loss_type,
            split_by_side: false,
            searches: OptionSearches::default(),
            chart_cache: None,
        }
    }

    pub(in crate::app) fn reset_filters(&mut self) {
        self.chain = FilterChain::new(&self.dataset);
        self.searches = OptionSearches::default();
        self.chart_cache = None;
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        status: &ShellStatus<'_>,
        reload_requested: &mut bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                ui.heading("Visually confirmed equipment losses, 2022");
                ui.horizontal(|ui| {
                    ui.hyperlink_to("Based on this dataset", DATASET_URL);
                    ui.separator();
                    ui.label(format!("data: {}", status.data_path));
                    ui.label(format!("rows: {}", format_count(self.dataset.len() as u64)));
                    ui.label(format!(
                        "loss columns: {}",
                        self.dataset.schema().metric_count()
                    ));

                    if status.debug {
                        ui.separator();
                        let reload_button = ui.add_enabled(
                            !status.is_reloading,
                            egui::Button::new("Reload dataset"),
                        );
                        if reload_button.clicked() {
                            *reload_requested = true;
                        }
                        if status.is_reloading {
                            ui.spinner();
                        }
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(error) = status.reload_error {
                            ui.label(
                                RichText::new(format!("reload failed: {error}"))
                                    .color(Color32::from_rgb(235, 110, 100)),
                            );
                        }
                    });
                });
                ui.add_space(4.0);
            });

        egui::SidePanel::left("filters")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("filters_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| self.draw_controls(ui));
            });

        egui::SidePanel::right("summary")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_summary(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("charts_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| self.draw_charts(ui));
        });
    }
}
