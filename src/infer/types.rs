use std::collections::HashSet;
use std::fmt;

use frozenset::FrozenSet;
use itertools::Itertools;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Cell;

/// The clues fed into the knowledge base contradict each other.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct InconsistencyError(pub &'static str);

impl fmt::Display for InconsistencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Inconsistent knowledge: {}", self.0)
    }
}

impl std::error::Error for InconsistencyError {}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
/// A logical statement about the game: exactly `count` of `cells` are mines.
///
/// Two sentences are equal when both their cells and their counts are.
pub struct Sentence {
    cells: FrozenSet<Cell>,
    count: usize,
}
impl Sentence {
    /// # Errors
    ///
    /// If the sentence claims more mines than it has cells.
    pub fn new(
        cells: impl IntoIterator<Item = Cell>,
        count: usize,
    ) -> Result<Self, InconsistencyError> {
        let cells = cells.into_iter().collect::<FrozenSet<_>>();
        if count > cells.len() {
            return Err(InconsistencyError("Sentence with more mines than cells"));
        }
        Ok(Self {
            cells,
            count,
        })
    }

    pub fn cells(&self) -> &FrozenSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// A sentence with no cells says nothing about the board
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    /// Every cell is a mine when the count covers all of them.
    ///
    /// A zero count over no cells is not a mine claim, so it yields nothing.
    pub fn known_mines(&self) -> HashSet<Cell> {
        if self.count > 0 && self.count == self.cells.len() {
            self.cells.iter().copied().collect()
        } else {
            HashSet::new()
        }
    }

    /// Every cell is safe when the count is 0
    pub fn known_safes(&self) -> HashSet<Cell> {
        if self.count == 0 {
            self.cells.iter().copied().collect()
        } else {
            HashSet::new()
        }
    }

    /// `cell` is known to be a mine; drop it and account for it in the count.
    /// Does nothing if `cell` isn't part of this sentence. Returns whether the
    /// sentence changed.
    ///
    /// Marking a mine in a sentence that claims no mines is a contradiction this
    /// method can't report: the count stays at 0 and the event is logged.
    /// [`KnowledgeBase`](crate::KnowledgeBase) refuses such deductions with an
    /// [`InconsistencyError`] before they get here.
    pub fn mark_mine(&mut self, cell: &Cell) -> bool {
        if !self.cells.contains(cell) {
            return false;
        }
        self.cells = self.without(cell);
        if self.count == 0 {
            log::error!("mine {:?} marked in a sentence claiming no mines", cell);
        }
        self.count = self.count.saturating_sub(1);
        true
    }

    /// `cell` is known to be safe; drop it. Does nothing if `cell` isn't part of
    /// this sentence. Returns whether the sentence changed.
    pub fn mark_safe(&mut self, cell: &Cell) -> bool {
        if !self.cells.contains(cell) {
            return false;
        }
        self.cells = self.without(cell);
        true
    }

    /// Check if this sentence's cells are a subset of `other`'s
    ///
    /// Empty sentences are never subsets; otherwise they would match every
    /// sentence and resolve to a copy of it.
    pub fn is_subsentence_of(&self, other: &Self) -> bool {
        !self.is_empty() && self.cells.is_subset(&other.cells)
    }

    /// If `other` is a sub-sentence of this one, return the sentence covering
    /// the cells only this one mentions, with the mines `other` doesn't account
    /// for.
    ///
    /// # Errors
    ///
    /// If `other` is not a sub-sentence, or claims more mines than this
    /// sentence (or more than the remaining cells can hold).
    pub fn subtract(&self, other: &Self) -> Result<Self, InconsistencyError> {
        if !other.is_subsentence_of(self) {
            return Err(InconsistencyError("Subtraction of non-subsentence"));
        }
        let count = self.count.checked_sub(other.count).ok_or(InconsistencyError(
            "Derived sentence with a negative mine count",
        ))?;
        Self::new(self.cells.difference(&other.cells).copied(), count)
    }

    /// Drop every cell whose status is already settled, accounting for known
    /// mines in the count.
    pub(crate) fn reduce(&mut self, safes: &HashSet<Cell>, mines: &HashSet<Cell>) {
        let settled = self
            .cells
            .iter()
            .filter(|&&c| safes.contains(&c) || mines.contains(&c))
            .copied()
            .collect_vec();
        for cell in settled {
            if mines.contains(&cell) {
                self.mark_mine(&cell);
            } else {
                self.mark_safe(&cell);
            }
        }
    }

    fn without(&self, cell: &Cell) -> FrozenSet<Cell> {
        self.cells.iter().filter(|&c| c != cell).copied().collect()
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}}} = {}",
            self.cells
                .iter()
                .sorted()
                .map(|(row, col)| format!("({}, {})", row, col))
                .join(", "),
            self.count
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const A: Cell = (0, 0);
    const B: Cell = (0, 1);
    const C: Cell = (0, 2);

    #[test]
    fn all_cells_mined() {
        let sentence = Sentence::new([A, B], 2).unwrap();
        assert_eq!(sentence.known_mines(), HashSet::from([A, B]));
        assert_eq!(sentence.known_safes(), HashSet::new());
    }

    #[test]
    fn all_cells_safe() {
        let sentence = Sentence::new([A, B, C], 0).unwrap();
        assert_eq!(sentence.known_safes(), HashSet::from([A, B, C]));
        assert_eq!(sentence.known_mines(), HashSet::new());
    }

    #[test]
    fn undetermined_sentence_knows_nothing() {
        let sentence = Sentence::new([A, B, C], 1).unwrap();
        assert!(sentence.known_mines().is_empty());
        assert!(sentence.known_safes().is_empty());
    }

    #[test]
    fn too_many_mines_is_rejected() {
        assert_eq!(
            Sentence::new([A], 2),
            Err(InconsistencyError("Sentence with more mines than cells"))
        );
    }

    #[test]
    fn mark_safe_is_idempotent() {
        let mut once = Sentence::new([A, B, C], 1).unwrap();
        once.mark_safe(&A);
        let mut twice = once.clone();
        twice.mark_safe(&A);
        assert_eq!(once, twice);
        assert_eq!(once, Sentence::new([B, C], 1).unwrap());
    }

    #[test]
    fn mark_mine_decrements_once() {
        let mut sentence = Sentence::new([A, B, C], 2).unwrap();
        assert!(sentence.mark_mine(&B));
        assert!(!sentence.mark_mine(&B));
        assert_eq!(sentence, Sentence::new([A, C], 1).unwrap());
    }

    #[test]
    fn marking_absent_cell_is_noop() {
        let mut sentence = Sentence::new([A, B], 1).unwrap();
        assert!(!sentence.mark_mine(&C));
        assert!(!sentence.mark_safe(&C));
        assert_eq!(sentence, Sentence::new([A, B], 1).unwrap());
    }

    #[test]
    fn mine_in_zero_count_sentence_saturates() {
        let mut sentence = Sentence::new([A, B], 0).unwrap();
        assert!(sentence.mark_mine(&A));
        assert_eq!(sentence, Sentence::new([B], 0).unwrap());
    }

    #[test]
    fn subtract_subset() {
        let big = Sentence::new([A, B, C], 1).unwrap();
        let small = Sentence::new([A, B], 1).unwrap();
        assert!(small.is_subsentence_of(&big));
        assert!(!big.is_subsentence_of(&small));
        let derived = big.subtract(&small).unwrap();
        assert_eq!(derived, Sentence::new([C], 0).unwrap());
        assert_eq!(derived.known_safes(), HashSet::from([C]));
    }

    #[test]
    fn subtract_negative_count_is_inconsistent() {
        let big = Sentence::new([A, B, C], 1).unwrap();
        let small = Sentence::new([A, B], 2).unwrap();
        assert_eq!(
            big.subtract(&small),
            Err(InconsistencyError("Derived sentence with a negative mine count"))
        );
    }

    #[test]
    fn empty_sentence_is_never_a_subset() {
        let empty = Sentence::new([], 0).unwrap();
        let other = Sentence::new([A], 0).unwrap();
        assert!(!empty.is_subsentence_of(&other));
        assert!(other.subtract(&empty).is_err());
    }

    #[test]
    fn reduce_drops_settled_cells() {
        let mut sentence = Sentence::new([A, B, C], 2).unwrap();
        sentence.reduce(&HashSet::from([A]), &HashSet::from([B]));
        assert_eq!(sentence, Sentence::new([C], 1).unwrap());
    }

    #[test]
    fn display_is_sorted() {
        let sentence = Sentence::new([C, A], 1).unwrap();
        assert_eq!(sentence.to_string(), "{(0, 0), (0, 2)} = 1");
    }
}
