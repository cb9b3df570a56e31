use std::path::{Path, PathBuf};

use crate::color::MetricColors;
use crate::data::error::DataError;
use crate::data::filter::{MetricPoint, Selection, filter_and_project};
use crate::data::loader::{PendingLoad, metric_histogram, spawn_load};
use crate::data::model::{ConditionChoice, MetricsDataset, PositionType};

// ---------------------------------------------------------------------------
// User actions
// ---------------------------------------------------------------------------

/// One message per selection button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SelectPosition(PositionType),
    SelectCondition(ConditionChoice),
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded rows; empty until a load succeeds, and after a failed one.
    pub dataset: MetricsDataset,

    /// Where `dataset` came from.
    pub source: Option<PathBuf>,

    /// Current position type and conditions.
    pub selection: Selection,

    /// Points matching `selection` (cached).
    pub visible: Vec<MetricPoint>,

    /// Stable bar colours for the loaded metrics.
    pub metric_colors: MetricColors,

    /// Load running in the background, if any.
    pending: Option<PendingLoad>,
}

impl AppState {
    /// Start loading `path` on a background thread. A load already in
    /// flight is abandoned.
    pub fn begin_load<F>(&mut self, path: PathBuf, on_done: F)
    where
        F: FnOnce() + Send + 'static,
    {
        log::info!("Loading {}", path.display());
        self.pending = Some(spawn_load(path, on_done));
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Pick up a finished background load. Returns true if state changed.
    pub fn poll_load(&mut self) -> bool {
        let Some(pending) = &self.pending else {
            return false;
        };
        let Some(result) = pending.poll() else {
            return false;
        };
        let path = pending.path().to_path_buf();
        self.pending = None;
        self.finish_load(&path, result);
        true
    }

    /// Ingest a load result. Failures are logged and leave an empty dataset.
    pub fn finish_load(&mut self, path: &Path, result: Result<MetricsDataset, DataError>) {
        match result {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows ({} skipped) from {}; metrics {:?}",
                    dataset.len(),
                    dataset.skipped,
                    path.display(),
                    metric_histogram(&dataset)
                );
                for (key, count) in dataset.duplicate_keys() {
                    log::warn!("Duplicate row key {key:?} occurs {count} times");
                }
                self.set_dataset(dataset);
                self.source = Some(path.to_path_buf());
            }
            Err(e) => {
                log::error!("Failed to load data: {e}");
                self.set_dataset(MetricsDataset::default());
                self.source = None;
            }
        }
    }

    /// Replace the dataset and recompute the view. The selection is kept.
    pub fn set_dataset(&mut self, dataset: MetricsDataset) {
        self.metric_colors = MetricColors::new(&dataset.metric_names());
        self.dataset = dataset;
        self.refilter();
    }

    /// Recompute `visible` after a dataset or selection change.
    pub fn refilter(&mut self) {
        self.visible = filter_and_project(&self.dataset.rows, &self.selection);
    }

    pub fn select_position(&mut self, position: PositionType) {
        self.selection.select_position(position);
        self.refilter();
    }

    pub fn select_condition(&mut self, choice: ConditionChoice) {
        log::debug!("{} -> {}", choice.key().column(), choice.label());
        self.selection.select_condition(choice);
        self.refilter();
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SelectPosition(position) => self.select_position(position),
            Action::SelectCondition(choice) => self.select_condition(choice),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Conditions, NumsigRatio, RowRecord, SignalT};

    fn dataset() -> MetricsDataset {
        let positive = Conditions {
            signal_t: SignalT::Positive,
            ..Conditions::default()
        };
        let rows = vec![
            RowRecord {
                position_type: PositionType::Bidirectional,
                conditions: Conditions::default(),
                metric: "winRate".into(),
                value: 0.55,
            },
            RowRecord {
                position_type: PositionType::Long,
                conditions: positive,
                metric: "winRate".into(),
                value: 0.62,
            },
            RowRecord {
                position_type: PositionType::Long,
                conditions: positive,
                metric: "sharpe".into(),
                value: 1.3,
            },
        ];
        MetricsDataset::new(rows, 0)
    }

    #[test]
    fn loading_applies_default_selection() {
        let mut state = AppState::default();
        state.finish_load(Path::new("metrics.csv"), Ok(dataset()));
        assert_eq!(state.visible.len(), 1);
        assert_eq!(state.visible[0].value, 0.55);
        assert_eq!(state.source.as_deref(), Some(Path::new("metrics.csv")));
    }

    #[test]
    fn actions_update_the_view() {
        let mut state = AppState::default();
        state.set_dataset(dataset());

        state.apply(Action::SelectPosition(PositionType::Long));
        assert!(state.visible.is_empty());

        state.apply(Action::SelectCondition(ConditionChoice::SignalT(SignalT::Positive)));
        let names: Vec<&str> = state.visible.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["winRate", "sharpe"]);

        state.apply(Action::SelectCondition(ConditionChoice::NumsigRatio(
            NumsigRatio::Over20Percent,
        )));
        assert!(state.visible.is_empty());
        assert_eq!(state.selection.conditions.signal_t, SignalT::Positive);
    }

    #[test]
    fn failed_load_leaves_empty_dataset() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        state.finish_load(
            Path::new("missing.xlsx"),
            Err(DataError::Unavailable {
                path: "missing.xlsx".into(),
                reason: "not found".into(),
            }),
        );
        assert!(state.dataset.is_empty());
        assert!(state.visible.is_empty());
        assert!(state.source.is_none());

        // Selections still work against the empty dataset.
        state.apply(Action::SelectPosition(PositionType::Short));
        assert!(state.visible.is_empty());
    }

    #[test]
    fn background_load_is_picked_up_by_polling() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics.csv");
        std::fs::write(
            &path,
            "position_type,signal_t,numsig_ratio,num_PvsN,t-1vst,metric,value\n\
             양방향,n,Under20p,moreN,same,winRate,0.5\n",
        )
        .unwrap();

        let mut state = AppState::default();
        state.begin_load(path, || {});
        assert!(state.is_loading());

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
        while !state.poll_load() {
            assert!(std::time::Instant::now() < deadline, "load did not finish");
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(!state.is_loading());
        assert_eq!(state.visible.len(), 1);
    }
}
