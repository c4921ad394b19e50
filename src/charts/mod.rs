mod model;
mod render;
mod spec;

pub use model::{
    Bar, BarChart, CategoryOrder, Chart, ChartSet, DualChart, Panels, PieChart, PieSlice,
    ScatterChart, ScatterPoint, TRANSITION_MS,
};
pub use render::{
    chart_rows, render_all, render_bar, render_bubble, render_dual_bar, render_dual_pie,
    render_pie, selected_rows, side_rows,
};
pub use spec::{
    ChartSpec, DEFAULT_BUBBLE_SIZE, DEFAULT_BUBBLE_X, DEFAULT_BUBBLE_Y, DEFAULT_LOSS_TYPE,
};
