use brancher_app::BranchEntry;
use brancher_core::category::CategoryDefinition;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, List, ListItem, ListState};

use crate::ui::text::{secondary_line, wrapped_paragraph};

/// What the list widget needs from an item.
pub(crate) trait ListEntry {
    fn display_label(&self) -> &str;
    fn filter_key(&self) -> &str;
}

impl ListEntry for BranchEntry {
    fn display_label(&self) -> &str {
        &self.name
    }

    fn filter_key(&self) -> &str {
        &self.name
    }
}

impl ListEntry for CategoryDefinition {
    fn display_label(&self) -> &str {
        &self.display
    }

    fn filter_key(&self) -> &str {
        &self.display
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Up,
    Down,
}

/// A bounded cursor over a list of items; `selected` is always a valid index
/// while the list is non-empty.
#[derive(Debug, Clone)]
pub(crate) struct SelectList<T> {
    items: Vec<T>,
    selected: usize,
}

impl<T> Default for SelectList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
        }
    }
}

impl<T> SelectList<T> {
    pub(crate) fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.selected = 0;
    }

    /// Ignored when `index` is out of range.
    pub(crate) fn select(&mut self, index: usize) {
        if index < self.items.len() {
            self.selected = index;
        }
    }

    pub(crate) fn move_selection(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.selected = self.selected.saturating_sub(1),
            Direction::Down => {
                if self.selected + 1 < self.items.len() {
                    self.selected += 1;
                }
            }
        }
    }

    pub(crate) fn selected_index(&self) -> Option<usize> {
        (self.selected < self.items.len()).then_some(self.selected)
    }

    pub(crate) fn selected_item(&self) -> Option<&T> {
        self.items.get(self.selected)
    }

    #[cfg(test)]
    pub(crate) fn items(&self) -> &[T] {
        &self.items
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: ListEntry> SelectList<T> {
    pub(crate) fn position_of(&self, key: &str) -> Option<usize> {
        self.items.iter().position(|item| item.filter_key() == key)
    }

    pub(crate) fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        block: Block<'_>,
        empty_message: &str,
        highlight_style: Style,
    ) {
        if self.items.is_empty() {
            let empty = wrapped_paragraph(secondary_line(empty_message.to_string())).block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem<'_>> = self
            .items
            .iter()
            .map(|item| ListItem::new(item.display_label()))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(highlight_style)
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(self.selected_index());
        frame.render_stateful_widget(list, area, &mut state);
    }
}
