//! Replay-capable move history.
//!
//! The history is an arena of applied moves plus the snapshot they start
//! from. Undo rebuilds the board by replaying it, so coral side effects never
//! need a hand-written inverse.

use std::sync::Arc;

use crate::game_state::coral_types::Move;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveHistory {
    root_snapshot: Arc<str>,
    moves: Vec<Move>,
}

impl Default for MoveHistory {
    fn default() -> Self {
        Self {
            root_snapshot: Arc::from(""),
            moves: Vec::new(),
        }
    }
}

impl MoveHistory {
    pub fn from_root(root_snapshot: String) -> Self {
        Self {
            root_snapshot: Arc::from(root_snapshot),
            moves: Vec::new(),
        }
    }

    /// Snapshot the first history entry is applied to.
    #[inline]
    pub fn root_snapshot(&self) -> &str {
        &self.root_snapshot
    }

    #[inline]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[inline]
    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }

    #[inline]
    pub(crate) fn push(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    /// History with the last `count` moves dropped, sharing the root.
    pub(crate) fn truncated(&self, count: usize) -> Self {
        let keep = self.moves.len().saturating_sub(count);
        Self {
            root_snapshot: Arc::clone(&self.root_snapshot),
            moves: self.moves[..keep].to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MoveHistory;
    use crate::game_state::coral_types::Move;

    #[test]
    fn truncation_keeps_root_and_prefix() {
        let mut history = MoveHistory::from_root("root".to_owned());
        history.push(Move::new(8, 16));
        history.push(Move::new(48, 40));
        history.push(Move::new(16, 24));

        let shorter = history.truncated(2);
        assert_eq!(shorter.root_snapshot(), "root");
        assert_eq!(shorter.moves(), &[Move::new(8, 16)]);
        assert_eq!(history.truncated(10).len(), 0);
    }
}
