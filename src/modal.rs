//! Modal overlays drawn over the grid
//!
//! Only the top modal receives input.

use gridview::Row;

#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Quit confirmation, warns when rows are still selected
    QuitConfirm,
    /// Key binding reference
    Help,
    /// Every field of a double-activated row
    RowDetail(Row),
}

#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Push `modal` unless it is already on top
    pub fn push(&mut self, modal: Modal) {
        if self.top() != Some(&modal) {
            self.stack.push(modal);
        }
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_order() {
        let mut stack = ModalStack::new();
        assert!(stack.is_empty());

        stack.push(Modal::Help);
        stack.push(Modal::QuitConfirm);
        assert_eq!(stack.top(), Some(&Modal::QuitConfirm));

        assert_eq!(stack.pop(), Some(Modal::QuitConfirm));
        assert_eq!(stack.pop(), Some(Modal::Help));
        assert!(stack.pop().is_none());
    }

    #[test]
    fn test_row_detail_holds_row() {
        let mut stack = ModalStack::new();
        stack.push(Modal::RowDetail(gridview::row! { "id" => 7 }));
        assert!(matches!(stack.top(), Some(Modal::RowDetail(row)) if row.len() == 1));
    }

    #[test]
    fn test_same_modal_is_not_stacked_twice() {
        let mut stack = ModalStack::new();
        stack.push(Modal::Help);
        stack.push(Modal::Help);

        stack.pop();
        assert!(stack.is_empty());
    }
}
