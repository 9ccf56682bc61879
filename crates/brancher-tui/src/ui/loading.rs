use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};

use brancher_app::{App, BranchListing, FetchError};
use brancher_core::command_runner::CommandRunner;

const FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

#[derive(Debug, Clone, Default)]
pub(crate) struct LoadingState {
    frame_index: usize,
}

impl LoadingState {
    pub(crate) fn next_frame(&mut self) {
        self.frame_index = (self.frame_index + 1) % FRAMES.len();
    }

    pub(crate) fn current_frame(&self) -> &'static str {
        FRAMES[self.frame_index]
    }
}

/// The single message a branch fetch sends back to the event loop.
#[derive(Debug)]
pub enum BranchLoadEvent {
    Loaded(BranchListing),
    Failed(FetchError),
}

pub trait BranchLoader {
    fn spawn_fetch(&self, cwd: PathBuf) -> Receiver<BranchLoadEvent>;
}

/// Fetches on a background thread through a shared command runner.
#[derive(Debug)]
pub struct RunnerBranchLoader<R> {
    runner: Arc<R>,
}

impl<R> RunnerBranchLoader<R> {
    pub fn new(runner: Arc<R>) -> Self {
        Self { runner }
    }
}

impl<R> BranchLoader for RunnerBranchLoader<R>
where
    R: CommandRunner + Send + Sync + 'static,
{
    fn spawn_fetch(&self, cwd: PathBuf) -> Receiver<BranchLoadEvent> {
        let (sender, receiver) = mpsc::channel();
        let runner = Arc::clone(&self.runner);
        std::thread::spawn(move || {
            let app = App::new(runner.as_ref());
            let event = match app.fetch_branches(&cwd) {
                Ok(listing) => BranchLoadEvent::Loaded(listing),
                Err(error) => BranchLoadEvent::Failed(error),
            };
            let _ = sender.send(event);
        });
        receiver
    }
}
