mod error;
mod load;
mod parse;
pub mod prepare;
mod record;

pub use error::{DataLoadError, PrepareError, UnknownAxis};
pub use load::{load_dataset, read_dataset};
pub use record::{
    AXIS_OPTION_LIMIT, Dataset, Field, LossRecord, MetricId, RowView, Schema, Side, member_of,
};
