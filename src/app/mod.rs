use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use eframe::egui::Context;
use losses_dashboard::charts::{ChartSet, ChartSpec};
use losses_dashboard::filter::FilterChain;
use losses_dashboard::losses::{Dataset, load_dataset};
use tracing::{info, warn};

mod charts;
mod render_utils;
mod ui;

pub struct DashboardApp {
    data_path: PathBuf,
    debug: bool,
    model: Box<ViewModel>,
    reload_rx: Option<Receiver<Result<Arc<Dataset>, String>>>,
    reload_error: Option<String>,
}

struct ViewModel {
    dataset: Arc<Dataset>,
    chain: FilterChain,
    bubble_spec: ChartSpec,
    loss_type: ChartSpec,
    split_by_side: bool,
    searches: OptionSearches,
    chart_cache: Option<ChartCache>,
}

#[derive(Default)]
struct OptionSearches {
    equipment: String,
    manufacturer: String,
    model: String,
}

struct ChartCache {
    key: ChartCacheKey,
    charts: ChartSet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ChartCacheKey {
    selection_revision: u64,
    bubble: ChartSpec,
    loss_type: ChartSpec,
    split_by_side: bool,
}

/// Shell state shown in the header.
struct ShellStatus<'a> {
    data_path: &'a str,
    debug: bool,
    is_reloading: bool,
    reload_error: Option<&'a str>,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        data_path: PathBuf,
        dataset: Arc<Dataset>,
        debug: bool,
    ) -> Self {
        Self {
            data_path,
            debug,
            model: Box::new(ViewModel::new(dataset)),
            reload_rx: None,
            reload_error: None,
        }
    }

    fn spawn_load(data_path: PathBuf) -> Receiver<Result<Arc<Dataset>, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_dataset(&data_path)
                .map(Arc::new)
                .map_err(|error| format!("{:#}", anyhow::Error::new(error)));
            let _ = tx.send(result);
        });

        rx
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let data_path = self.data_path.display().to_string();
        let status = ShellStatus {
            data_path: &data_path,
            debug: self.debug,
            is_reloading: self.reload_rx.is_some(),
            reload_error: self.reload_error.as_deref(),
        };

        let mut reload_requested = false;
        self.model.show(ctx, &status, &mut reload_requested);

        if reload_requested && self.reload_rx.is_none() {
            self.reload_error = None;
            self.reload_rx = Some(Self::spawn_load(self.data_path.clone()));
        }

        if let Some(rx) = self.reload_rx.take() {
            match rx.try_recv() {
                Ok(Ok(dataset)) => {
                    info!(rows = dataset.len(), "reloaded dataset");
                    self.model = Box::new(ViewModel::new(dataset));
                }
                Ok(Err(error)) => {
                    warn!(%error, "dataset reload failed; keeping previous data");
                    self.reload_error = Some(error);
                }
                Err(TryRecvError::Empty) => {
                    self.reload_rx = Some(rx);
                    ctx.request_repaint_after(Duration::from_millis(100));
                }
                Err(TryRecvError::Disconnected) => {
                    self.reload_error = Some("Background load worker disconnected".to_owned());
                }
            }
        }
    }
}
