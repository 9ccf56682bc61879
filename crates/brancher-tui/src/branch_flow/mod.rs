mod render;

use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, TryRecvError};

use brancher_app::{App, BranchEntry, BranchListing, CreationError, FetchError};
use brancher_core::category::{CategoryDefinition, CategoryRegistry};
use brancher_core::names::synthesize_branch_name;
use crossterm::event::KeyEvent;
use thiserror::Error;

use crate::UiExit;
use crate::keymap;
use crate::ui::loading::{BranchLoadEvent, BranchLoader, LoadingState};
use crate::ui::select_list::{Direction, SelectList};

pub(crate) trait BranchFlowOps {
    fn create_branch(&self, cwd: &Path, name: &str) -> Result<(), CreationError>;
}

impl BranchFlowOps for App<'_> {
    fn create_branch(&self, cwd: &Path, name: &str) -> Result<(), CreationError> {
        App::create_branch(self, cwd, name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectionStage {
    BranchSelection,
    CategorySelection,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum FlowError {
    #[error(transparent)]
    Fetch(FetchError),
    #[error("no branches found")]
    EmptySelection,
    #[error("failed to get selected {0}")]
    Resolution(&'static str),
    #[error(transparent)]
    Creation(CreationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FlowSignal {
    Continue,
    Exit(UiExit),
}

/// Session state for one run: pick a start branch, then a category.
///
/// Stages only move forward. `chosen_branch` is written once, on the
/// branch-to-category transition.
pub(crate) struct BranchFlow {
    cwd: PathBuf,
    registry: CategoryRegistry,
    stage: SelectionStage,
    branches: SelectList<BranchEntry>,
    categories: SelectList<CategoryDefinition>,
    chosen_branch: Option<BranchEntry>,
    last_error: Option<FlowError>,
    fetch_receiver: Option<Receiver<BranchLoadEvent>>,
    loading: LoadingState,
}

impl BranchFlow {
    pub(crate) fn new(cwd: &Path, registry: CategoryRegistry) -> Self {
        Self {
            cwd: cwd.to_path_buf(),
            registry,
            stage: SelectionStage::BranchSelection,
            branches: SelectList::default(),
            categories: SelectList::default(),
            chosen_branch: None,
            last_error: None,
            fetch_receiver: None,
            loading: LoadingState::default(),
        }
    }

    pub(crate) fn start_fetch(&mut self, loader: &dyn BranchLoader) {
        tracing::debug!(cwd = %self.cwd.display(), "starting branch fetch");
        self.fetch_receiver = Some(loader.spawn_fetch(self.cwd.clone()));
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.fetch_receiver.is_some()
    }

    pub(crate) fn on_fetch_complete(
        &mut self,
        current: Option<String>,
        branches: Vec<BranchEntry>,
    ) {
        if self.stage != SelectionStage::BranchSelection {
            tracing::debug!("discarding branch list that arrived after branch selection");
            return;
        }

        self.branches.set_items(branches);
        if !self.branches.is_empty()
            && matches!(self.last_error, Some(FlowError::EmptySelection))
        {
            self.last_error = None;
        }
        if let Some(index) = current
            .as_deref()
            .and_then(|name| self.branches.position_of(name))
        {
            self.branches.select(index);
        }
    }

    pub(crate) fn on_fetch_failed(&mut self, error: FetchError) {
        tracing::warn!(%error, "branch fetch failed");
        self.last_error = Some(FlowError::Fetch(error));
    }

    pub(crate) fn move_selection(&mut self, direction: Direction) {
        match self.stage {
            SelectionStage::BranchSelection => self.branches.move_selection(direction),
            SelectionStage::CategorySelection => self.categories.move_selection(direction),
        }
    }

    pub(crate) fn confirm(&mut self, ops: &dyn BranchFlowOps) -> FlowSignal {
        match self.stage {
            SelectionStage::BranchSelection => {
                self.confirm_branch();
                FlowSignal::Continue
            }
            SelectionStage::CategorySelection => self.confirm_category(ops),
        }
    }

    pub(crate) fn cancel(&self) -> FlowSignal {
        tracing::debug!(stage = ?self.stage, "session canceled");
        FlowSignal::Exit(UiExit::Canceled)
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent, ops: &dyn BranchFlowOps) -> FlowSignal {
        if keymap::is_quit(key) {
            return self.cancel();
        }
        match self.last_error {
            Some(FlowError::Fetch(_)) => return FlowSignal::Continue,
            // Categories are hidden behind the error, so Enter retries the same one.
            Some(FlowError::Creation(_)) => {
                if keymap::is_confirm(key) {
                    return self.confirm(ops);
                }
                return FlowSignal::Continue;
            }
            _ => {}
        }

        if keymap::is_up(key) {
            self.move_selection(Direction::Up);
        } else if keymap::is_down(key) {
            self.move_selection(Direction::Down);
        } else if keymap::is_confirm(key) {
            return self.confirm(ops);
        }

        FlowSignal::Continue
    }

    /// Advances the spinner and applies the fetch result once it arrives.
    pub(crate) fn on_tick(&mut self) {
        let Some(receiver) = &self.fetch_receiver else {
            return;
        };
        self.loading.next_frame();

        let event = match receiver.try_recv() {
            Ok(event) => event,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => BranchLoadEvent::Failed(FetchError {
                message: "branch loader ended unexpectedly".to_string(),
            }),
        };
        self.fetch_receiver = None;

        match event {
            BranchLoadEvent::Loaded(BranchListing { current, branches }) => {
                self.on_fetch_complete(current, branches);
            }
            BranchLoadEvent::Failed(error) => self.on_fetch_failed(error),
        }
    }

    fn confirm_branch(&mut self) {
        if self.branches.is_empty() {
            self.last_error = Some(FlowError::EmptySelection);
            return;
        }

        let Some(selected) = self.branches.selected_item().cloned() else {
            self.last_error = Some(FlowError::Resolution("branch"));
            return;
        };

        tracing::info!(branch = %selected.name, "start branch chosen");
        self.chosen_branch = Some(selected);
        self.categories
            .set_items(self.registry.categories().to_vec());
        self.last_error = None;
        self.stage = SelectionStage::CategorySelection;
    }

    fn confirm_category(&mut self, ops: &dyn BranchFlowOps) -> FlowSignal {
        let Some(category) = self.categories.selected_item() else {
            self.last_error = Some(FlowError::Resolution("category"));
            return FlowSignal::Continue;
        };

        let name = synthesize_branch_name(&category.code);
        tracing::info!(branch = %name, category = %category.code, "creating branch");

        match ops.create_branch(&self.cwd, &name) {
            Ok(()) => FlowSignal::Exit(UiExit::Created(name)),
            Err(error) => {
                tracing::warn!(%error, "branch creation failed");
                self.last_error = Some(FlowError::Creation(error));
                FlowSignal::Continue
            }
        }
    }

    #[cfg(test)]
    fn stage(&self) -> SelectionStage {
        self.stage
    }

    #[cfg(test)]
    fn last_error(&self) -> Option<&FlowError> {
        self.last_error.as_ref()
    }

    #[cfg(test)]
    fn chosen_branch(&self) -> Option<&BranchEntry> {
        self.chosen_branch.as_ref()
    }

    #[cfg(test)]
    fn branch_selection_index(&self) -> Option<usize> {
        self.branches.selected_index()
    }

    #[cfg(test)]
    fn category_selection_index(&self) -> Option<usize> {
        self.categories.selected_index()
    }
}
