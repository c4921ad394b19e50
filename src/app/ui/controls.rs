use std::sync::Arc;

use eframe::egui::{self, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use losses_dashboard::losses::{MetricId, Schema};

use crate::util::selection_summary;

use super::super::ViewModel;

const OPTION_LIST_HEIGHT: f32 = 180.0;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Options matching `query`, best match first. An empty query keeps dataset order.
fn visible_options<'o>(options: &'o [String], query: &str) -> Vec<&'o String> {
    let query = query.trim();
    if query.is_empty() {
        return options.iter().collect();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = options
        .iter()
        .filter_map(|option| fuzzy_match_score(&matcher, option, query).map(|score| (score, option)))
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, option)| option).collect()
}

/// `selected` with `toggled` switched on or off, kept in option order.
fn toggle_value(options: &[String], selected: &[String], toggled: &str, on: bool) -> Vec<String> {
    options
        .iter()
        .filter(|option| {
            if option.as_str() == toggled {
                on
            } else {
                selected.contains(option)
            }
        })
        .cloned()
        .collect()
}

/// Draws a searchable multi-select list. Returns the new selection when the user changed it.
fn multi_select(
    ui: &mut Ui,
    id: &str,
    label: &str,
    options: &[String],
    selected: Option<&[String]>,
    search: &mut String,
) -> Option<Vec<String>> {
    let current = selected.unwrap_or_default();
    let mut next = None;

    ui.horizontal(|ui| {
        ui.label(RichText::new(label).strong());
        ui.label(format!("({})", selection_summary(selected, options.len())));
    });

    if options.is_empty() {
        ui.label(RichText::new("Choose an equipment type first.").weak());
        return None;
    }

    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(search)
                .hint_text("search")
                .desired_width(170.0),
        );
        if ui.small_button("All").clicked() {
            next = Some(options.to_vec());
        }
        if ui.small_button("None").clicked() {
            next = Some(Vec::new());
        }
    });

    egui::ScrollArea::vertical()
        .id_salt(id)
        .max_height(OPTION_LIST_HEIGHT)
        .auto_shrink([false, true])
        .show(ui, |ui| {
            for option in visible_options(options, search) {
                let mut checked = current.contains(option);
                if ui.checkbox(&mut checked, option.as_str()).changed() {
                    next = Some(toggle_value(options, current, option, checked));
                }
            }
        });

    next
}

/// Entries of an axis picker: "not set" first, then the axis columns.
fn metric_choices(schema: &Schema) -> Vec<(Option<MetricId>, &str)> {
    std::iter::once((None, "not set"))
        .chain(
            schema
                .axis_options()
                .into_iter()
                .map(|metric| (Some(metric), schema.metric_name(metric))),
        )
        .collect()
}

fn metric_picker(
    ui: &mut Ui,
    id: &str,
    label: &str,
    schema: &Schema,
    value: &mut Option<MetricId>,
) {
    let choices = metric_choices(schema);
    let selected_text = choices
        .iter()
        .find(|(metric, _)| *metric == *value)
        .map_or("not set", |(_, name)| *name);

    ui.horizontal(|ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(selected_text)
            .width(200.0)
            .show_ui(ui, |ui| {
                for (metric, name) in &choices {
                    ui.selectable_value(value, *metric, *name);
                }
            });
    });
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Select a subset of data");
        ui.separator();
        ui.add_space(4.0);

        let dataset = Arc::clone(&self.dataset);

        let equipment_options = self.chain.equipment_options().to_vec();
        let equipment = self.chain.selection().equipment.clone();
        if let Some(next) = multi_select(
            ui,
            "equipment",
            "Equipment type",
            &equipment_options,
            equipment.as_deref(),
            &mut self.searches.equipment,
        ) {
            self.chain.set_equipment(&dataset, Some(next));
        }

        ui.add_space(6.0);
        let manufacturer_options = self.chain.manufacturer_options().to_vec();
        let manufacturer = self.chain.selection().manufacturer.clone();
        if let Some(next) = multi_select(
            ui,
            "manufacturer",
            "Equipment manufacturer",
            &manufacturer_options,
            manufacturer.as_deref(),
            &mut self.searches.manufacturer,
        ) {
            self.chain.set_manufacturer(&dataset, Some(next));
        }

        ui.add_space(6.0);
        let model_options = self.chain.model_options().to_vec();
        let model = self.chain.selection().model.clone();
        if let Some(next) = multi_select(
            ui,
            "model",
            "Equipment model",
            &model_options,
            model.as_deref(),
            &mut self.searches.model,
        ) {
            self.chain.set_model(Some(next));
        }

        ui.add_space(6.0);
        if ui
            .button("Reset filters")
            .on_hover_text("Back to the unfiltered view shown at startup.")
            .clicked()
        {
            self.reset_filters();
        }

        ui.separator();
        ui.label(RichText::new("Bubble chart").strong());
        let schema = dataset.schema();
        metric_picker(ui, "bubble-x", "x-axis", schema, &mut self.bubble_spec.x);
        metric_picker(ui, "bubble-y", "y-axis", schema, &mut self.bubble_spec.y);
        metric_picker(ui, "bubble-size", "bubble size", schema, &mut self.bubble_spec.size);

        ui.separator();
        ui.label(RichText::new("Bar and pie charts").strong());
        metric_picker(ui, "bar-pie-y", "Loss type", schema, &mut self.loss_type.y);
        ui.checkbox(&mut self.split_by_side, "Split by side")
            .on_hover_text("One pie and one bar chart per side, bars sorted by total.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_owned()).collect()
    }

    #[test]
    fn toggling_keeps_option_order() {
        let options = strings(&["tank", "helicopter", "drone"]);
        let selected = strings(&["drone"]);

        assert_eq!(
            toggle_value(&options, &selected, "tank", true),
            strings(&["tank", "drone"])
        );
        assert_eq!(
            toggle_value(&options, &selected, "drone", false),
            Vec::<String>::new()
        );
    }

    #[test]
    fn metric_choices_start_unset() {
        let schema = Schema::new(strings(&["losses_total", "destroyed"]));
        let choices = metric_choices(&schema);

        assert_eq!(choices.len(), 3);
        assert_eq!(choices[0], (None, "not set"));
        assert_eq!(choices[2], (schema.metric("destroyed"), "destroyed"));
    }

    #[test]
    fn search_ranks_fuzzy_matches() {
        let options = strings(&["T-72B3", "BMP-2", "T-80BV"]);

        assert_eq!(visible_options(&options, "").len(), 3);
        let matches = visible_options(&options, "t80");
        assert_eq!(matches.first().map(|option| option.as_str()), Some("T-80BV"));
        assert!(!matches.iter().any(|option| option.as_str() == "BMP-2"));
    }
}
