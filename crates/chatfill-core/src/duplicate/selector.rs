//! Resolves configured positions against a conversation snapshot.

use crate::session::ChatMessage;
use thiserror::Error;

/// Raised when there is nothing to select from.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    #[error("the source conversation has no messages")]
    EmptySourceConversation,
}

/// A message picked from the snapshot, with the position it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedMessage {
    pub position: usize,
    pub message: ChatMessage,
}

/// Result of [`select`].
///
/// `selected` follows the order of the requested positions, not the order
/// of the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub selected: Vec<SelectedMessage>,
    pub skipped: Vec<usize>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Consumes the selection, keeping only the message copies in order.
    pub fn into_messages(self) -> Vec<ChatMessage> {
        self.selected.into_iter().map(|s| s.message).collect()
    }
}

/// Picks `snapshot[p]` for every `p` in `positions`, in input order.
///
/// Out-of-range positions are collected in `skipped` and never abort the
/// selection. Repeated positions yield independent copies. The only error
/// is an empty snapshot.
pub fn select(snapshot: &[ChatMessage], positions: &[usize]) -> Result<Selection, SelectionError> {
    if snapshot.is_empty() {
        return Err(SelectionError::EmptySourceConversation);
    }

    let mut selection = Selection::default();
    for &position in positions {
        match snapshot.get(position) {
            Some(message) => selection.selected.push(SelectedMessage {
                position,
                message: message.clone(),
            }),
            None => {
                tracing::warn!(
                    "[MessageSelector] Position {} is out of range (0-{}), skipping",
                    position,
                    snapshot.len() - 1
                );
                selection.skipped.push(position);
            }
        }
    }

    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(len: usize) -> Vec<ChatMessage> {
        (0..len)
            .map(|i| {
                if i % 2 == 0 {
                    ChatMessage::from_user("User", format!("message {i}"))
                } else {
                    ChatMessage::from_character("Aqua", format!("message {i}"))
                }
            })
            .collect()
    }

    fn bodies(selection: &Selection) -> Vec<&str> {
        selection
            .selected
            .iter()
            .map(|s| s.message.mes.as_str())
            .collect()
    }

    #[test]
    fn test_select_skips_out_of_range() {
        let source = snapshot(5);
        let selection = select(&source, &[1, 3, 7]).unwrap();

        assert_eq!(bodies(&selection), vec!["message 1", "message 3"]);
        assert_eq!(selection.skipped, vec![7]);
    }

    #[test]
    fn test_select_follows_input_order() {
        let source = snapshot(5);
        let selection = select(&source, &[3, 1]).unwrap();

        assert_eq!(bodies(&selection), vec!["message 3", "message 1"]);
        let positions: Vec<usize> = selection.selected.iter().map(|s| s.position).collect();
        assert_eq!(positions, vec![3, 1]);
    }

    #[test]
    fn test_select_empty_snapshot_is_error() {
        assert_eq!(
            select(&[], &[1, 3, 7]),
            Err(SelectionError::EmptySourceConversation)
        );
        // Even with no positions requested
        assert_eq!(select(&[], &[]), Err(SelectionError::EmptySourceConversation));
    }

    #[test]
    fn test_select_all_out_of_range() {
        let source = snapshot(5);
        let selection = select(&source, &[9, 10]).unwrap();

        assert!(selection.is_empty());
        assert_eq!(selection.skipped, vec![9, 10]);
    }

    #[test]
    fn test_select_duplicate_positions_yield_copies() {
        let source = snapshot(5);
        let selection = select(&source, &[2, 2]).unwrap();

        assert_eq!(bodies(&selection), vec!["message 2", "message 2"]);
        assert_eq!(selection.selected[0], selection.selected[1]);
    }

    #[test]
    fn test_select_counts_add_up_and_source_untouched() {
        let source = snapshot(4);
        let before = source.clone();

        for positions in [vec![], vec![0], vec![5, 0, 5], vec![3, 2, 1, 0, 4]] {
            let selection = select(&source, &positions).unwrap();
            assert_eq!(
                selection.selected.len() + selection.skipped.len(),
                positions.len()
            );
            for (entry, expected) in selection
                .selected
                .iter()
                .zip(positions.iter().filter(|&&p| p < source.len()))
            {
                assert_eq!(entry.message, source[*expected]);
            }
        }

        assert_eq!(source, before);
    }

    #[test]
    fn test_select_is_repeatable() {
        let source = snapshot(5);
        let first = select(&source, &[4, 0, 8]).unwrap();
        let second = select(&source, &[4, 0, 8]).unwrap();
        assert_eq!(first, second);
    }
}
