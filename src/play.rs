//! Drive a [`KnowledgeBase`] against a [`MineField`] until the game ends.

use rand::Rng;

use crate::{Cell, Error, KnowledgeBase, MineField};

/// How a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every mine has been flagged.
    Won,
    /// The player revealed a mine.
    Lost(Cell),
}

/// A single game: the hidden field and the player's knowledge of it.
#[derive(Debug, Clone)]
pub struct Game {
    field: MineField,
    knowledge: KnowledgeBase,
}
impl Game {
    pub fn new(field: MineField) -> Self {
        let knowledge = KnowledgeBase::new(field.height(), field.width());
        Self {
            field,
            knowledge,
        }
    }

    pub fn field(&self) -> &MineField {
        &self.field
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Reveal `cell`, feed its clue to the knowledge base and flag every mine
    /// deduced so far. Returns the outcome if this move ended the game.
    ///
    /// # Errors
    ///
    /// If `cell` is out of bounds, or the knowledge base becomes inconsistent.
    pub fn reveal(&mut self, cell: Cell) -> Result<Option<Outcome>, Error> {
        if self.field.is_mine(cell)? {
            log::info!("revealed mine at {:?}", cell);
            return Ok(Some(Outcome::Lost(cell)));
        }
        let count = self.field.nearby_mines(cell)?;
        log::debug!("revealed {:?}: {} nearby", cell, count);
        self.knowledge.add_knowledge(cell, count)?;

        let unflagged = self
            .knowledge
            .mines()
            .iter()
            .filter(|c| !self.field.mines_found().contains(c))
            .copied()
            .collect::<Vec<_>>();
        for mine in unflagged {
            self.field.mark_found(mine)?;
        }
        Ok(self.field.won().then_some(Outcome::Won))
    }

    /// Play until the game ends, preferring cells known to be safe and
    /// guessing (with `rng`) only when there are none.
    pub fn play<R: Rng>(&mut self, rng: &mut R) -> Result<Outcome, Error> {
        if self.field.won() {
            return Ok(Outcome::Won);
        }
        loop {
            let cell = match self.knowledge.safe_move() {
                Some(cell) => cell,
                None => {
                    let Some(cell) = self.knowledge.random_move_with(rng) else {
                        // Everything left is a known, and therefore flagged, mine
                        return Ok(Outcome::Won);
                    };
                    log::debug!("no safe moves; guessing {:?}", cell);
                    cell
                },
            };
            if let Some(outcome) = self.reveal(cell)? {
                return Ok(outcome);
            }
        }
    }
}
