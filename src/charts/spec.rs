use crate::losses::{MetricId, Schema};

pub const DEFAULT_BUBBLE_X: &str = "losses_total";
pub const DEFAULT_BUBBLE_Y: &str = "destroyed";
pub const DEFAULT_BUBBLE_SIZE: &str = "captured";
pub const DEFAULT_LOSS_TYPE: &str = "losses_total";

/// Axis choices for one chart. Bubble charts use all three fields, pie and bar
/// charts read only `y` as their loss type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChartSpec {
    pub x: Option<MetricId>,
    pub y: Option<MetricId>,
    pub size: Option<MetricId>,
}

impl ChartSpec {
    pub fn bubble(x: Option<MetricId>, y: Option<MetricId>, size: Option<MetricId>) -> Self {
        Self { x, y, size }
    }

    pub fn loss_type(value: Option<MetricId>) -> Self {
        Self {
            x: None,
            y: value,
            size: None,
        }
    }

    pub fn default_bubble(schema: &Schema) -> Self {
        Self::bubble(
            Some(schema.metric_or_first(DEFAULT_BUBBLE_X)),
            Some(schema.metric_or_first(DEFAULT_BUBBLE_Y)),
            Some(schema.metric_or_first(DEFAULT_BUBBLE_SIZE)),
        )
    }

    pub fn default_loss_type(schema: &Schema) -> Self {
        Self::loss_type(Some(schema.metric_or_first(DEFAULT_LOSS_TYPE)))
    }

    pub(super) fn bubble_complete(&self) -> bool {
        self.x.is_some() && self.y.is_some() && self.size.is_some()
    }

    pub(super) fn loss_type_complete(&self) -> bool {
        self.y.is_some()
    }

    /// Unset fields replaced by the defaults, used when rendering the unfiltered fallback.
    pub(super) fn bubble_or_default(&self, schema: &Schema) -> (MetricId, MetricId, MetricId) {
        (
            self.x
                .unwrap_or_else(|| schema.metric_or_first(DEFAULT_BUBBLE_X)),
            self.y
                .unwrap_or_else(|| schema.metric_or_first(DEFAULT_BUBBLE_Y)),
            self.size
                .unwrap_or_else(|| schema.metric_or_first(DEFAULT_BUBBLE_SIZE)),
        )
    }

    pub(super) fn loss_type_or_default(&self, schema: &Schema) -> MetricId {
        self.y
            .unwrap_or_else(|| schema.metric_or_first(DEFAULT_LOSS_TYPE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_named_columns() {
        let schema = Schema::new(vec![
            "losses_total".to_owned(),
            "captured".to_owned(),
            "destroyed".to_owned(),
        ]);
        let spec = ChartSpec::default_bubble(&schema);

        assert_eq!(spec.x, schema.metric("losses_total"));
        assert_eq!(spec.y, schema.metric("destroyed"));
        assert_eq!(spec.size, schema.metric("captured"));
    }

    #[test]
    fn defaults_fall_back_to_first_column() {
        let schema = Schema::new(vec!["abandoned".to_owned(), "damaged".to_owned()]);

        assert_eq!(
            ChartSpec::default_loss_type(&schema).y,
            schema.metric("abandoned")
        );
        assert_eq!(
            Some(ChartSpec::default().loss_type_or_default(&schema)),
            schema.metric("abandoned")
        );
    }
}
