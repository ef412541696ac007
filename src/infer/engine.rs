use std::collections::{BTreeSet, HashSet, VecDeque};

use itertools::Itertools;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::infer::{InconsistencyError, Sentence};
use crate::internal_util::{all_cells, in_bounds, neighbours};
use crate::{Cell, Error, FieldError};

/// The player's knowledge of a game in progress.
///
/// Tracks the cells already revealed, the cells proven safe or mined, and a
/// list of [`Sentence`]s known to be true. Every clue is resolved against the
/// existing sentences until nothing more can be deduced.
///
/// `safes`, `mines`, `moves_made` and `knowledge` only ever grow; individual
/// sentences shrink as the cells they mention become known.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    height: usize,
    width: usize,
    moves_made: HashSet<Cell>,
    safes: HashSet<Cell>,
    mines: HashSet<Cell>,
    knowledge: Vec<Sentence>,
    /// Sentences waiting to be added to `knowledge` and resolved against it
    pending: VecDeque<Sentence>,
    /// Indices into `knowledge` of sentences changed by marks since they were
    /// last resolved
    stale: BTreeSet<usize>,
}
impl KnowledgeBase {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            moves_made: HashSet::new(),
            safes: HashSet::new(),
            mines: HashSet::new(),
            knowledge: Vec::new(),
            pending: VecDeque::new(),
            stale: BTreeSet::new(),
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Cells already revealed
    pub fn moves_made(&self) -> &HashSet<Cell> {
        &self.moves_made
    }

    /// Cells proven to be free of mines
    pub fn safes(&self) -> &HashSet<Cell> {
        &self.safes
    }

    /// Cells proven to be mines
    pub fn mines(&self) -> &HashSet<Cell> {
        &self.mines
    }

    /// Sentences accepted so far, in the order they were learnt
    pub fn knowledge(&self) -> &[Sentence] {
        &self.knowledge
    }

    /// Record `cell` as a mine and remove it from every sentence.
    ///
    /// Doesn't run any further inference; sentences this simplifies are picked
    /// up the next time knowledge is added.
    pub fn mark_mine(&mut self, cell: Cell) {
        self.mines.insert(cell);
        for (i, sentence) in self.knowledge.iter_mut().enumerate() {
            if sentence.mark_mine(&cell) {
                self.stale.insert(i);
            }
        }
    }

    /// Record `cell` as safe and remove it from every sentence.
    pub fn mark_safe(&mut self, cell: Cell) {
        self.safes.insert(cell);
        for (i, sentence) in self.knowledge.iter_mut().enumerate() {
            if sentence.mark_safe(&cell) {
                self.stale.insert(i);
            }
        }
    }

    /// Learn that the revealed, safe `cell` has `count` mines around it.
    ///
    /// Marks the cell as played and safe, adds a sentence about its still
    /// unknown neighbours, and deduces everything that follows.
    ///
    /// # Errors
    ///
    /// If `cell` is outside the grid, or `count` contradicts what is already
    /// known. Knowledge deduced before the contradiction was found is kept.
    pub fn add_knowledge(&mut self, cell: Cell, count: usize) -> Result<(), Error> {
        if !in_bounds(cell, self.height, self.width) {
            return Err(FieldError::OutOfBounds {
                cell,
                height: self.height,
                width: self.width,
            }
            .into());
        }
        self.moves_made.insert(cell);
        self.mark_safe(cell);

        let mut remaining = count;
        let mut unknown = Vec::new();
        for neighbour in neighbours(cell, self.height, self.width) {
            if self.safes.contains(&neighbour) {
                continue;
            }
            if self.mines.contains(&neighbour) {
                remaining = remaining.checked_sub(1).ok_or(InconsistencyError(
                    "Clue counts fewer mines than are already known",
                ))?;
                continue;
            }
            unknown.push(neighbour);
        }
        self.add_sentence(Sentence::new(unknown, remaining)?)
    }

    /// Accept `sentence` as true and deduce everything that follows.
    ///
    /// Used by [`Self::add_knowledge`] for neighbourhood clues; callers may
    /// also add their own constraints (e.g. the number of mines left among all
    /// unknown cells).
    pub fn add_sentence(&mut self, mut sentence: Sentence) -> Result<(), Error> {
        sentence.reduce(&self.safes, &self.mines);
        log::debug!("new sentence {}", sentence);
        self.knowledge.push(sentence.clone());
        self.conclude(&sentence)?;
        self.pending.push_back(sentence);
        self.resolve()
    }

    /// A safe cell that hasn't been played yet, if any.
    ///
    /// The lowest such cell (row-major) is returned, so repeated calls agree.
    pub fn safe_move(&self) -> Option<Cell> {
        self.safes.difference(&self.moves_made).min().copied()
    }

    /// A cell chosen uniformly at random among those not yet played and not
    /// known to be mines.
    pub fn random_move(&self) -> Option<Cell> {
        self.random_move_with(&mut rand::rng())
    }

    /// As [`Self::random_move`], drawing from `rng`
    pub fn random_move_with<R: Rng>(&self, rng: &mut R) -> Option<Cell> {
        let candidates = all_cells(self.height, self.width)
            .filter(|cell| !self.moves_made.contains(cell) && !self.mines.contains(cell))
            .collect_vec();
        candidates.choose(rng).copied()
    }

    /// Mark every cell of a conclusive sentence; mines take precedence over
    /// safes. Returns whether the sentence was conclusive.
    ///
    /// # Errors
    ///
    /// If a cell is already known, or implied by another sentence, to be the
    /// opposite.
    fn conclude(&mut self, sentence: &Sentence) -> Result<bool, InconsistencyError> {
        let mines = sentence.known_mines();
        if !mines.is_empty() {
            for cell in mines {
                if self.mines.contains(&cell) {
                    continue;
                }
                if self.safes.contains(&cell)
                    || self.knowledge.iter().any(|s| s.count() == 0 && s.contains(&cell))
                {
                    log::error!("{} makes {:?} a mine, but it is safe", sentence, cell);
                    return Err(InconsistencyError("Cell deduced as both mine and safe"));
                }
                log::info!("deduced mine at {:?} from {}", cell, sentence);
                self.mark_mine(cell);
            }
            return Ok(true);
        }
        let safes = sentence.known_safes();
        if !safes.is_empty() {
            for cell in safes {
                if self.safes.contains(&cell) {
                    continue;
                }
                if self.mines.contains(&cell)
                    || self.knowledge.iter().any(|s| {
                        s.count() > 0 && s.count() == s.len() && s.contains(&cell)
                    })
                {
                    log::error!("{} makes {:?} safe, but it is a mine", sentence, cell);
                    return Err(InconsistencyError("Cell deduced as both mine and safe"));
                }
                log::info!("deduced safe cell at {:?} from {}", cell, sentence);
                self.mark_safe(cell);
            }
            return Ok(true);
        }
        Ok(false)
    }

    /// Integrate pending sentences until none are left, then sweep the
    /// knowledge for sentences simplified along the way. Stops once a sweep
    /// neither marks a cell nor queues a sentence.
    fn resolve(&mut self) -> Result<(), Error> {
        loop {
            while let Some(sentence) = self.pending.pop_front() {
                if let Err(err) = self.integrate(sentence) {
                    self.pending.clear();
                    return Err(err);
                }
            }
            if !self.sweep()? {
                return Ok(());
            }
        }
    }

    /// Add `sentence` to the knowledge (unless already present) and resolve it
    /// against every other sentence.
    fn integrate(&mut self, mut current: Sentence) -> Result<(), Error> {
        current.reduce(&self.safes, &self.mines);
        if current.is_empty() {
            return Ok(());
        }
        let index = match self.knowledge.iter().position(|s| *s == current) {
            Some(index) => index,
            None => {
                self.knowledge.push(current.clone());
                self.knowledge.len() - 1
            },
        };

        let mut derived = Vec::new();
        for (i, other) in self.knowledge.iter().enumerate() {
            if i == index {
                continue;
            }
            if current.is_subsentence_of(other) {
                log::trace!("{} is a subset of {}", current, other);
                derived.push(other.subtract(&current));
            }
            if other.is_subsentence_of(&current) {
                log::trace!("{} is a subset of {}", other, current);
                derived.push(current.subtract(other));
            }
        }

        for sentence in derived {
            let sentence = sentence.map_err(|err| {
                log::error!("resolving {}: {}", current, err);
                err
            })?;
            self.learn(sentence)?;
        }
        Ok(())
    }

    /// Act on a sentence derived by resolution: mark its cells if it is
    /// conclusive, otherwise queue it if it is new.
    fn learn(&mut self, mut sentence: Sentence) -> Result<(), InconsistencyError> {
        sentence.reduce(&self.safes, &self.mines);
        if sentence.is_empty() || self.conclude(&sentence)? {
            return Ok(());
        }
        if !self.knowledge.contains(&sentence) && !self.pending.contains(&sentence) {
            log::debug!("derived {}", sentence);
            self.pending.push_back(sentence);
        }
        Ok(())
    }

    /// Mark the cells of every conclusive sentence in the knowledge, then queue
    /// every sentence that marks have shrunk so it is resolved again. Returns
    /// whether a cell became newly known or a sentence was queued.
    fn sweep(&mut self) -> Result<bool, Error> {
        if let Some(sentence) = self.knowledge.iter().find(|s| s.count() > s.len()) {
            log::error!("sentence {} has more mines than cells", sentence);
            return Err(InconsistencyError("Mines remain after every cell is known").into());
        }
        let known_before = self.safes.len() + self.mines.len();
        let conclusive = self
            .knowledge
            .iter()
            .filter(|s| !s.known_mines().is_empty() || !s.known_safes().is_empty())
            .cloned()
            .collect_vec();
        for sentence in &conclusive {
            self.conclude(sentence)?;
        }

        let mut queued = false;
        for i in std::mem::take(&mut self.stale) {
            let sentence = &self.knowledge[i];
            if sentence.is_empty() || self.pending.contains(sentence) {
                continue;
            }
            log::debug!("requeued {}", sentence);
            self.pending.push_back(sentence.clone());
            queued = true;
        }
        Ok(queued || self.safes.len() + self.mines.len() > known_before)
    }
}
