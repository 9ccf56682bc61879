mod branch_flow;
mod keymap;
mod theme;
mod ui;

use std::io::{Stdout, stdout};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use brancher_app::App;
use brancher_core::category::CategoryRegistry;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::branch_flow::{BranchFlow, FlowSignal};

pub use crate::ui::loading::{BranchLoadEvent, BranchLoader, RunnerBranchLoader};

const TICK_RATE: Duration = Duration::from_millis(120);

/// How an interactive session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiExit {
    Created(String),
    Canceled,
}

pub(crate) struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    pub(crate) fn enter() -> Result<Self> {
        let terminal = enter_with_ops(
            || enable_raw_mode().context("failed to enable raw mode"),
            || {
                let mut out = stdout();
                execute!(out, EnterAlternateScreen, Hide)
                    .context("failed to enter alternate screen")
            },
            || {
                let backend = CrosstermBackend::new(stdout());
                Terminal::new(backend).context("failed to create terminal backend")
            },
            || {
                let mut out = stdout();
                execute!(out, Show, LeaveAlternateScreen)
                    .context("failed to restore terminal screen during rollback")
            },
            || disable_raw_mode().context("failed to disable raw mode during rollback"),
        )?;
        Ok(Self { terminal })
    }

    pub(crate) fn draw<F>(&mut self, draw_fn: F) -> Result<()>
    where
        F: FnOnce(&mut ratatui::Frame<'_>),
    {
        self.terminal
            .draw(draw_fn)
            .context("failed to render terminal")?;
        Ok(())
    }

    pub(crate) fn autoresize(&mut self) -> Result<()> {
        self.terminal
            .autoresize()
            .context("failed to autoresize terminal")?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(self.terminal.backend_mut(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

fn enter_with_ops<T, EnableRawMode, EnterAltScreen, CreateTerminal, LeaveAltScreen, DisableRawMode>(
    mut enable_raw_mode_op: EnableRawMode,
    mut enter_alt_screen_op: EnterAltScreen,
    mut create_terminal_op: CreateTerminal,
    mut leave_alt_screen_op: LeaveAltScreen,
    mut disable_raw_mode_op: DisableRawMode,
) -> Result<T>
where
    EnableRawMode: FnMut() -> Result<()>,
    EnterAltScreen: FnMut() -> Result<()>,
    CreateTerminal: FnMut() -> Result<T>,
    LeaveAltScreen: FnMut() -> Result<()>,
    DisableRawMode: FnMut() -> Result<()>,
{
    enable_raw_mode_op()?;

    if let Err(error) = enter_alt_screen_op() {
        return Err(failure_with_rollback(
            error,
            false,
            &mut leave_alt_screen_op,
            &mut disable_raw_mode_op,
        ));
    }

    create_terminal_op().map_err(|error| {
        failure_with_rollback(error, true, &mut leave_alt_screen_op, &mut disable_raw_mode_op)
    })
}

/// Undoes a partial setup in reverse order; raw mode is always on by now.
fn failure_with_rollback<LeaveAltScreen, DisableRawMode>(
    setup_error: anyhow::Error,
    alt_screen_entered: bool,
    leave_alt_screen_op: &mut LeaveAltScreen,
    disable_raw_mode_op: &mut DisableRawMode,
) -> anyhow::Error
where
    LeaveAltScreen: FnMut() -> Result<()>,
    DisableRawMode: FnMut() -> Result<()>,
{
    let mut cleanup_failures = Vec::<String>::new();

    if alt_screen_entered && let Err(error) = leave_alt_screen_op() {
        cleanup_failures.push(format!(
            "failed to restore alternate screen during rollback: {error:#}"
        ));
    }

    if let Err(error) = disable_raw_mode_op() {
        cleanup_failures.push(format!(
            "failed to disable raw mode during rollback: {error:#}"
        ));
    }

    if cleanup_failures.is_empty() {
        setup_error
    } else {
        anyhow!(
            "{setup_error:#}\nterminal rollback cleanup failed: {}",
            cleanup_failures.join("\n")
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrainReason {
    Timeout,
    AfterInput,
}

trait LoopTickTarget {
    fn on_tick(&mut self);
    fn is_loading(&self) -> bool;
}

impl LoopTickTarget for BranchFlow {
    fn on_tick(&mut self) {
        BranchFlow::on_tick(self);
    }

    fn is_loading(&self) -> bool {
        BranchFlow::is_loading(self)
    }
}

/// Input drains the loader only while a fetch is pending; timeouts always tick
/// so the spinner keeps moving.
fn drain_loader<T: LoopTickTarget>(target: &mut T, reason: DrainReason) -> bool {
    if reason == DrainReason::AfterInput && !target.is_loading() {
        return false;
    }

    target.on_tick();
    true
}

/// Runs the two-stage selection session until a branch is created or the
/// user quits.
///
/// `loader` fetches the branch list in the background; `app` creates the branch.
pub fn run(
    app: &App<'_>,
    loader: &dyn BranchLoader,
    cwd: &Path,
    categories: CategoryRegistry,
) -> Result<UiExit> {
    let mut flow = BranchFlow::new(cwd, categories);
    flow.start_fetch(loader);

    let mut session = TerminalSession::enter()?;

    loop {
        session.draw(|frame| flow.render(frame))?;

        let has_event = event::poll(TICK_RATE).context("failed to poll terminal event")?;
        if !has_event {
            drain_loader(&mut flow, DrainReason::Timeout);
            continue;
        }

        let key = match event::read().context("failed to read terminal event")? {
            Event::Resize(_, _) => {
                session.autoresize()?;
                continue;
            }
            Event::Key(key) if matches!(key.kind, KeyEventKind::Press) => key,
            _ => continue,
        };

        match flow.on_key(key, app) {
            FlowSignal::Exit(exit) => {
                tracing::debug!(?exit, "leaving interactive session");
                return Ok(exit);
            }
            FlowSignal::Continue => {
                drain_loader(&mut flow, DrainReason::AfterInput);
            }
        }
    }
}
