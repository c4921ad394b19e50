//! Cascading equipment -> manufacturer -> model selection.
//!
//! Each node's option list is a pure function of the selections above it. Whenever a
//! node's options are recomputed its selection is reset to every available option, and
//! the recomputation continues downstream in topological order.

use tracing::debug;

use crate::losses::{Dataset, Field, member_of};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub equipment: Option<Vec<String>>,
    pub manufacturer: Option<Vec<String>>,
    pub model: Option<Vec<String>>,
}

pub fn equipment_options(dataset: &Dataset) -> Vec<String> {
    dataset.unique_values(Field::Equipment)
}

pub fn manufacturer_options(dataset: &Dataset, equipment: Option<&[String]>) -> Vec<String> {
    let Some(equipment) = equipment else {
        return Vec::new();
    };

    dataset
        .filter(member_of(Field::Equipment, equipment))
        .unique_values(Field::Manufacturer)
}

/// Models under the chosen equipment and manufacturers. An unset manufacturer
/// selection leaves the manufacturer constraint out.
pub fn model_options(
    dataset: &Dataset,
    equipment: Option<&[String]>,
    manufacturer: Option<&[String]>,
) -> Vec<String> {
    let Some(equipment) = equipment else {
        return Vec::new();
    };

    let rows = dataset.filter(member_of(Field::Equipment, equipment));
    match manufacturer {
        Some(manufacturer) => rows
            .filter(member_of(Field::Manufacturer, manufacturer))
            .unique_values(Field::Model),
        None => rows.unique_values(Field::Model),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Node {
    Equipment,
    Manufacturer,
    Model,
}

#[derive(Clone, Debug)]
pub struct FilterChain {
    selection: Selection,
    equipment_options: Vec<String>,
    manufacturer_options: Vec<String>,
    model_options: Vec<String>,
    revision: u64,
}

impl FilterChain {
    /// Page-load state: nothing chosen, downstream options empty.
    pub fn new(dataset: &Dataset) -> Self {
        let mut chain = Self {
            selection: Selection::default(),
            equipment_options: Vec::new(),
            manufacturer_options: Vec::new(),
            model_options: Vec::new(),
            revision: 0,
        };
        chain.recompute_from(dataset, Node::Equipment);
        chain
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn equipment_options(&self) -> &[String] {
        &self.equipment_options
    }

    pub fn manufacturer_options(&self) -> &[String] {
        &self.manufacturer_options
    }

    pub fn model_options(&self) -> &[String] {
        &self.model_options
    }

    /// Bumped on every selection change; renderers key their caches on it.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_equipment(&mut self, dataset: &Dataset, equipment: Option<Vec<String>>) {
        self.selection.equipment = equipment.map(|values| retain_known(values, &self.equipment_options));
        self.recompute_from(dataset, Node::Manufacturer);
    }

    pub fn set_manufacturer(&mut self, dataset: &Dataset, manufacturer: Option<Vec<String>>) {
        self.selection.manufacturer =
            manufacturer.map(|values| retain_known(values, &self.manufacturer_options));
        self.recompute_from(dataset, Node::Model);
    }

    pub fn set_model(&mut self, model: Option<Vec<String>>) {
        self.selection.model = model.map(|values| retain_known(values, &self.model_options));
        self.revision += 1;
        self.log_selection(Node::Model);
    }

    /// Recomputes `start`'s options and everything below it, resetting each
    /// recomputed selection to all of its options.
    fn recompute_from(&mut self, dataset: &Dataset, start: Node) {
        if start <= Node::Equipment {
            self.equipment_options = equipment_options(dataset);
        }

        if start <= Node::Manufacturer {
            self.manufacturer_options =
                manufacturer_options(dataset, self.selection.equipment.as_deref());
            self.selection.manufacturer = Some(self.manufacturer_options.clone());
        }

        if start <= Node::Model {
            self.model_options = model_options(
                dataset,
                self.selection.equipment.as_deref(),
                self.selection.manufacturer.as_deref(),
            );
            self.selection.model = Some(self.model_options.clone());
        }

        self.revision += 1;
        self.log_selection(start);
    }

    fn log_selection(&self, changed: Node) {
        let count = |values: &Option<Vec<String>>| values.as_ref().map(Vec::len);
        debug!(
            changed = ?changed,
            revision = self.revision,
            equipment = ?count(&self.selection.equipment),
            manufacturer = ?count(&self.selection.manufacturer),
            model = ?count(&self.selection.model),
            "selection updated"
        );
    }
}

fn retain_known(values: Vec<String>, options: &[String]) -> Vec<String> {
    let mut kept = Vec::with_capacity(values.len());
    for value in values {
        if options.contains(&value) && !kept.contains(&value) {
            kept.push(value);
        }
    }
    kept
}
