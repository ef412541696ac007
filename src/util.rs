use std::collections::HashMap;

use crate::{Cell, Error, FieldError, KnowledgeBase, MineField};

/// A cell on the board, as seen by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCell {
    /// A cell that has been revealed and is empty
    Empty(usize),
    /// A cell that is known to be a mine
    Mine,
    /// A cell that is completely unknown
    Unknown,
}

/// Simple representation of a game in progress (no game logic!)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// The cells of the board
    cells: HashMap<Cell, BoardCell>,
    /// The width of the board
    width: usize,
    /// The height of the board
    height: usize,
}
impl Board {
    /// Create a game board from an ASCII-encoded description, where:
    /// - `*` is a mine
    /// - `x` is an unknown cell
    /// - `0`-`8` is a revealed cell with that many adjacent mines
    /// - `.` can be used in place of `0`
    /// - Trailing or leading whitespace is ignored
    ///
    /// # Errors
    ///
    /// If the board is not rectangular, has a width or height of 0, or contains
    /// any other character.
    pub fn new(encoded: &str) -> Result<Self, FieldError> {
        let (lines, height, width) = split_lines(encoded)?;
        let mut cells = HashMap::new();
        for (row, line) in lines.into_iter().enumerate() {
            for (col, c) in line.chars().enumerate() {
                let cell = match c {
                    '*' => BoardCell::Mine,
                    'x' => BoardCell::Unknown,
                    '.' => BoardCell::Empty(0),
                    n @ '0'..='8' => {
                        BoardCell::Empty(
                            n.to_digit(10).expect("n has been validated to be a decimal digit")
                                as usize,
                        )
                    },
                    _ => return Err(invalid_character(c, row, col)),
                };
                cells.insert((row, col), cell);
            }
        }
        Ok(Self {
            cells,
            width,
            height,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn total_cells(&self) -> usize {
        self.width * self.height
    }

    pub fn get(&self, cell: Cell) -> Option<BoardCell> {
        self.cells.get(&cell).copied()
    }

    /// Build the knowledge a player would have reached by revealing every
    /// numbered cell and flagging every mine on this board.
    ///
    /// Mines are marked first, so each clue only describes the neighbours that
    /// are still unknown.
    ///
    /// # Errors
    ///
    /// If the clues on the board contradict each other.
    pub fn knowledge_base(&self) -> Result<KnowledgeBase, Error> {
        let mut kb = KnowledgeBase::new(self.height, self.width);
        for (&cell, _) in self.cells.iter().filter(|(_, c)| **c == BoardCell::Mine) {
            kb.mark_mine(cell);
        }
        let mut clues = self
            .cells
            .iter()
            .filter_map(|(&cell, &c)| {
                match c {
                    BoardCell::Empty(n) => Some((cell, n)),
                    _ => None,
                }
            })
            .collect::<Vec<_>>();
        clues.sort_unstable();
        for (cell, count) in clues {
            kb.add_knowledge(cell, count)?;
        }
        Ok(kb)
    }
}

/// Read a mine layout from an ASCII-encoded description, where `*` is a mine
/// and `.` is a safe cell. Whitespace around the layout is ignored.
///
/// # Errors
///
/// If the layout is not rectangular, has a width or height of 0, contains any
/// other character, or has no safe cell.
pub fn read_field(encoded: &str) -> Result<MineField, FieldError> {
    let (lines, height, width) = split_lines(encoded)?;
    let mut mines = Vec::new();
    for (row, line) in lines.into_iter().enumerate() {
        for (col, c) in line.chars().enumerate() {
            match c {
                '*' => mines.push((row, col)),
                '.' => (),
                _ => return Err(invalid_character(c, row, col)),
            }
        }
    }
    MineField::from_mines(height, width, mines)
}

/// Trimmed, non-empty, rectangular lines of an encoded board along with its
/// height and width
fn split_lines(encoded: &str) -> Result<(Vec<&str>, usize, usize), FieldError> {
    let lines = encoded.trim().lines().map(|l| l.trim()).collect::<Vec<_>>();
    let height = lines.len();
    let width = lines.first().map_or(0, |l| l.chars().count());
    if height == 0 || width == 0 {
        return Err(FieldError::EmptyField);
    }
    if let Some(line) = lines.iter().find(|l| l.chars().count() != width) {
        return Err(FieldError::InvalidBoard(format!(
            concat!(
                "Board must be rectangular (found line with length {},",
                " expected length {})",
            ),
            line.chars().count(),
            width,
        )));
    }
    Ok((lines, height, width))
}

fn invalid_character(c: char, row: usize, col: usize) -> FieldError {
    FieldError::InvalidBoard(format!("Invalid character '{}' at ({}, {})", c, row, col))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::Sentence;

    #[test]
    fn reads_layout() {
        let field = read_field("\n  .*.\n  ...\n").unwrap();
        assert_eq!(field.height(), 2);
        assert_eq!(field.width(), 3);
        assert_eq!(field.mines(), &[(0, 1)].into_iter().collect::<HashSet<_>>());
        assert_eq!(field.nearby_mines((1, 0)), Ok(1));
    }

    #[test]
    fn rejects_ragged_layout() {
        assert!(matches!(
            read_field("..\n...").unwrap_err(),
            FieldError::InvalidBoard(_)
        ));
        assert_eq!(read_field("   "), Err(FieldError::EmptyField));
        assert_eq!(
            read_field("**\n**"),
            Err(FieldError::TooManyMines {
                mines: 4,
                cells: 4
            })
        );
    }

    #[test]
    fn rejects_unknown_characters() {
        assert_eq!(
            Board::new("..\n.?"),
            Err(FieldError::InvalidBoard(
                "Invalid character '?' at (1, 1)".to_string()
            ))
        );
    }

    #[test]
    fn board_cells() {
        let board = Board::new("1x\n*2").unwrap();
        assert_eq!(board.total_cells(), 4);
        assert_eq!(board.get((0, 0)), Some(BoardCell::Empty(1)));
        assert_eq!(board.get((0, 1)), Some(BoardCell::Unknown));
        assert_eq!(board.get((1, 0)), Some(BoardCell::Mine));
        assert_eq!(board.get((1, 1)), Some(BoardCell::Empty(2)));
        assert_eq!(board.get((2, 0)), None);
    }

    #[test]
    fn knowledge_from_board() {
        // Both 1s on the left are satisfied by the flagged mine, which clears
        // the middle column; the 2 then needs one more mine on the right.
        let board = Board::new(concat!("1xx\n", "*2x\n", "1xx\n")).unwrap();
        let kb = board.knowledge_base().unwrap();
        for cell in [(0, 1), (1, 1), (2, 1)] {
            assert!(kb.safes().contains(&cell));
        }
        assert_eq!(kb.mines(), &[(1, 0)].into_iter().collect::<HashSet<_>>());
        assert!(kb
            .knowledge()
            .contains(&Sentence::new([(0, 2), (1, 2), (2, 2)], 1).unwrap()));
    }

    #[test]
    fn contradictory_board_is_rejected() {
        let board = Board::new("0*\n..").unwrap();
        assert!(board.knowledge_base().is_err());
    }
}
