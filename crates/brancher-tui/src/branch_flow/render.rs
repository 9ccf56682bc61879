use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Color;
use ratatui::text::{Line, Span, Text};

use super::{BranchFlow, FlowError, SelectionStage};
use crate::theme;
use crate::ui::text::{
    compact_hint, focus_line, key_hint_height, key_hint_paragraph, secondary_line,
    wrapped_paragraph,
};

impl BranchFlow {
    pub(crate) fn render(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let key_text = self.key_text(area.width);
        let footer_height = key_hint_height(area.width, key_text);
        let [header, body, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(3),
                Constraint::Length(footer_height),
            ])
            .areas(area);

        self.render_header(frame, header);
        match &self.last_error {
            Some(error) => render_error(frame, body, error),
            None => self.render_body(frame, body),
        }
        frame.render_widget(key_hint_paragraph(key_text).block(theme::key_block()), footer);
    }

    fn render_header(&self, frame: &mut Frame<'_>, area: Rect) {
        let lines = match self.stage {
            SelectionStage::BranchSelection => vec![
                focus_line("Select a branch to start from"),
                secondary_line("Local branches, most recent commit first"),
            ],
            SelectionStage::CategorySelection => {
                let from = self
                    .chosen_branch
                    .as_ref()
                    .map(|entry| entry.name.as_str())
                    .unwrap_or_default();
                vec![
                    focus_line("Select a category for the new branch"),
                    secondary_line(format!("From: {from}")),
                ]
            }
        };
        frame.render_widget(
            wrapped_paragraph(Text::from(lines)).block(theme::chrome("brancher")),
            area,
        );
    }

    fn render_body(&self, frame: &mut Frame<'_>, area: Rect) {
        match self.stage {
            SelectionStage::BranchSelection if self.is_loading() => {
                let line = Line::from(vec![
                    Span::styled(self.loading.current_frame(), theme::focus_prompt()),
                    Span::raw(" Loading branches..."),
                ]);
                frame.render_widget(
                    wrapped_paragraph(line).block(theme::chrome("Branches")),
                    area,
                );
            }
            SelectionStage::BranchSelection => self.branches.render(
                frame,
                area,
                theme::chrome("Branches"),
                "No local branches found.",
                theme::list_highlight(Color::Yellow),
            ),
            SelectionStage::CategorySelection => self.categories.render(
                frame,
                area,
                theme::chrome("Categories"),
                "No categories configured.",
                theme::list_highlight(Color::Green),
            ),
        }
    }

    fn key_text(&self, width: u16) -> &'static str {
        match &self.last_error {
            Some(FlowError::Creation(_)) => compact_hint(
                width,
                "Enter: try again with a new name    q/Esc: quit",
                "Enter: try again    q/Esc: quit",
                "Enter retry | q quit",
            ),
            Some(_) => compact_hint(width, "q/Esc: quit", "q/Esc: quit", "q quit"),
            None => compact_hint(
                width,
                "Up/Down or j/k: move    Enter: select    q/Esc: quit",
                "j/k: move    Enter: select    q/Esc: quit",
                "j/k move | Enter select | q quit",
            ),
        }
    }
}

fn render_error(frame: &mut Frame<'_>, area: Rect, error: &FlowError) {
    let block = theme::chrome(Span::styled("Error", theme::error_prompt()));
    let body = Text::from(vec![Line::from(""), Line::from(error.to_string())]);
    frame.render_widget(wrapped_paragraph(body).block(block), area);
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::mpsc::{self, Receiver};

    use brancher_app::{BranchEntry, CreationError, FetchError};
    use brancher_core::category::CategoryRegistry;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::super::{BranchFlow, BranchFlowOps};
    use crate::ui::loading::{BranchLoadEvent, BranchLoader};

    struct FailingOps;

    impl BranchFlowOps for FailingOps {
        fn create_branch(&self, _cwd: &Path, name: &str) -> Result<(), CreationError> {
            Err(CreationError {
                name: name.to_string(),
                message: "fatal: cannot lock ref".to_string(),
            })
        }
    }

    fn flow() -> BranchFlow {
        BranchFlow::new(Path::new("/tmp/repo"), CategoryRegistry::default())
    }

    fn render_output(flow: &BranchFlow, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|frame| flow.render(frame))
            .expect("render branch flow");
        format!("{}", terminal.backend())
    }

    #[test]
    fn branch_stage_lists_branches_with_marker_on_current() {
        let mut flow = flow();
        flow.on_fetch_complete(
            Some("dev".to_string()),
            vec![BranchEntry::new("main"), BranchEntry::new("dev")],
        );

        let output = render_output(&flow, 110, 16);

        assert!(output.contains("Select a branch to start from"));
        assert!(output.contains("main"));
        assert!(output.contains("> dev"));
        assert!(output.contains("Up/Down or j/k: move"));
    }

    #[test]
    fn pending_fetch_shows_spinner() {
        struct PendingLoader;

        impl BranchLoader for PendingLoader {
            fn spawn_fetch(&self, _cwd: PathBuf) -> Receiver<BranchLoadEvent> {
                mpsc::channel().1
            }
        }

        let mut flow = flow();
        flow.start_fetch(&PendingLoader);

        let output = render_output(&flow, 90, 14);
        assert!(output.contains("Loading branches..."));
    }

    #[test]
    fn empty_branch_list_shows_placeholder() {
        let mut flow = flow();
        flow.on_fetch_complete(None, Vec::new());

        let output = render_output(&flow, 90, 14);
        assert!(output.contains("No local branches found."));
    }

    #[test]
    fn category_stage_shows_start_branch_and_categories() {
        let mut flow = flow();
        flow.on_fetch_complete(None, vec![BranchEntry::new("main")]);
        flow.confirm(&FailingOps);

        let output = render_output(&flow, 110, 18);

        assert!(output.contains("From: main"));
        assert!(output.contains("> CI/CD"));
        assert!(output.contains("Performance"));
    }

    #[test]
    fn fetch_error_replaces_list_with_quit_hint() {
        let mut flow = flow();
        flow.on_fetch_failed(FetchError {
            message: "fatal: not a git repository".to_string(),
        });

        let output = render_output(&flow, 110, 14);

        assert!(output.contains("Error"));
        assert!(output.contains("not a git repository"));
        assert!(output.contains("q/Esc: quit"));
        assert!(!output.contains("Enter: select"));
    }

    #[test]
    fn creation_error_offers_retry() {
        let mut flow = flow();
        flow.on_fetch_complete(None, vec![BranchEntry::new("main")]);
        flow.confirm(&FailingOps);
        flow.confirm(&FailingOps);

        let output = render_output(&flow, 110, 14);

        assert!(output.contains("cannot lock ref"));
        assert!(output.contains("Enter: try again"));
    }

    #[test]
    fn narrow_terminal_uses_compact_hint() {
        let mut flow = flow();
        flow.on_fetch_complete(None, vec![BranchEntry::new("main")]);

        let output = render_output(&flow, 50, 14);
        assert!(output.contains("j/k move | Enter select"));
    }
}
