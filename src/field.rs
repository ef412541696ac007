use std::collections::HashSet;
use std::fmt;

use rand::Rng;

use crate::config::GameConfig;
use crate::internal_util::{in_bounds, neighbours};
use crate::Cell;

/// Errors returned when building or querying a [`MineField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The cell does not lie on the field.
    OutOfBounds {
        cell: Cell,
        height: usize,
        width: usize,
    },
    /// At least one cell must be free of mines.
    TooManyMines { mines: usize, cells: usize },
    /// The field has a width or height of 0.
    EmptyField,
    /// An ASCII-encoded field could not be parsed.
    InvalidBoard(String),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::OutOfBounds {
                cell,
                height,
                width,
            } => {
                write!(
                    f,
                    "Cell {:?} is outside the {}x{} field",
                    cell, height, width
                )
            },
            FieldError::TooManyMines { mines, cells } => {
                write!(
                    f,
                    "Cannot place {} mines on a field of {} cells",
                    mines, cells
                )
            },
            FieldError::EmptyField => write!(f, "Field must have at least one cell"),
            FieldError::InvalidBoard(reason) => write!(f, "Invalid board: {}", reason),
        }
    }
}

impl std::error::Error for FieldError {}

/// Ground truth of a game: where the mines are, and which of them the player
/// has flagged so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MineField {
    height: usize,
    width: usize,
    mines: HashSet<Cell>,
    /// Cells the player has confirmed as mines; only used by [`Self::won`]
    mines_found: HashSet<Cell>,
}
impl MineField {
    /// Create a field with `mines` mines placed uniformly at random.
    ///
    /// # Errors
    ///
    /// If either dimension is 0, or there is no room for at least one safe
    /// cell.
    pub fn new(height: usize, width: usize, mines: usize) -> Result<Self, FieldError> {
        Self::with_rng(height, width, mines, &mut rand::rng())
    }

    /// As [`Self::new`], drawing mine positions from `rng`.
    ///
    /// Mines are placed by rejection sampling: pick a random cell, keep it if
    /// it isn't a mine already, and repeat until enough have been placed.
    pub fn with_rng<R: Rng>(
        height: usize,
        width: usize,
        mines: usize,
        rng: &mut R,
    ) -> Result<Self, FieldError> {
        check_dimensions(height, width, mines)?;
        let mut placed = HashSet::with_capacity(mines);
        while placed.len() != mines {
            let cell = (rng.random_range(0..height), rng.random_range(0..width));
            if placed.insert(cell) {
                log::trace!("placed mine at {:?}", cell);
            }
        }
        Ok(Self {
            height,
            width,
            mines: placed,
            mines_found: HashSet::new(),
        })
    }

    /// Create a randomly-mined field with the dimensions in `config`
    pub fn from_config(config: &GameConfig) -> Result<Self, FieldError> {
        Self::new(config.height, config.width, config.mines)
    }

    /// Create a field with mines at exactly the given cells.
    ///
    /// # Errors
    ///
    /// If any mine lies out of bounds, or the mines would fill the field.
    pub fn from_mines(
        height: usize,
        width: usize,
        mines: impl IntoIterator<Item = Cell>,
    ) -> Result<Self, FieldError> {
        let mines = mines.into_iter().collect::<HashSet<_>>();
        check_dimensions(height, width, mines.len())?;
        if let Some(&cell) = mines.iter().find(|&&c| !in_bounds(c, height, width)) {
            return Err(FieldError::OutOfBounds {
                cell,
                height,
                width,
            });
        }
        Ok(Self {
            height,
            width,
            mines,
            mines_found: HashSet::new(),
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn total_cells(&self) -> usize {
        self.height * self.width
    }

    /// The true mine layout
    pub fn mines(&self) -> &HashSet<Cell> {
        &self.mines
    }

    /// Mines the player has flagged so far
    pub fn mines_found(&self) -> &HashSet<Cell> {
        &self.mines_found
    }

    pub fn is_mine(&self, cell: Cell) -> Result<bool, FieldError> {
        self.check_bounds(cell)?;
        Ok(self.mines.contains(&cell))
    }

    /// Number of mines within one row and column of `cell`, not counting
    /// `cell` itself
    pub fn nearby_mines(&self, cell: Cell) -> Result<usize, FieldError> {
        self.check_bounds(cell)?;
        Ok(neighbours(cell, self.height, self.width)
            .filter(|n| self.mines.contains(n))
            .count())
    }

    /// Record that the player has flagged `cell` as a mine. Flagging a cell
    /// that isn't a mine is allowed (and will prevent [`Self::won`]).
    pub fn mark_found(&mut self, cell: Cell) -> Result<(), FieldError> {
        self.check_bounds(cell)?;
        self.mines_found.insert(cell);
        Ok(())
    }

    /// Whether the flagged cells are exactly the mines
    pub fn won(&self) -> bool {
        self.mines_found == self.mines
    }

    fn check_bounds(&self, cell: Cell) -> Result<(), FieldError> {
        if in_bounds(cell, self.height, self.width) {
            Ok(())
        } else {
            Err(FieldError::OutOfBounds {
                cell,
                height: self.height,
                width: self.width,
            })
        }
    }
}

fn check_dimensions(height: usize, width: usize, mines: usize) -> Result<(), FieldError> {
    if height == 0 || width == 0 {
        return Err(FieldError::EmptyField);
    }
    let cells = height * width;
    if mines >= cells {
        return Err(FieldError::TooManyMines {
            mines,
            cells,
        });
    }
    Ok(())
}

impl fmt::Display for MineField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "--".repeat(self.width) + "-";
        for row in 0..self.height {
            writeln!(f, "{}", separator)?;
            for col in 0..self.width {
                if self.mines.contains(&(row, col)) {
                    write!(f, "|X")?;
                } else {
                    write!(f, "| ")?;
                }
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{}", separator)
    }
}
