//! Game dimensions and mine counts.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::FieldError;

/// Shape of a game: the field dimensions and how many mines it hides.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameConfig {
    pub height: usize,
    pub width: usize,
    pub mines: usize,
}
impl GameConfig {
    pub fn new(height: usize, width: usize, mines: usize) -> Self {
        Self {
            height,
            width,
            mines,
        }
    }

    /// 9x9 with 10 mines
    pub fn beginner() -> Self {
        Self::new(9, 9, 10)
    }

    /// 16x16 with 40 mines
    pub fn intermediate() -> Self {
        Self::new(16, 16, 40)
    }

    /// 16x30 with 99 mines
    pub fn expert() -> Self {
        Self::new(16, 30, 99)
    }

    /// Look up a preset by name (`beginner`, `intermediate`, `expert` or
    /// `default`)
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(Self::beginner()),
            "intermediate" => Some(Self::intermediate()),
            "expert" => Some(Self::expert()),
            "default" => Some(Self::default()),
            _ => None,
        }
    }

    pub fn total_cells(&self) -> usize {
        self.height * self.width
    }

    /// Check that a field can be built from this configuration.
    ///
    /// # Errors
    ///
    /// If either dimension is 0, or the mines would leave no safe cell.
    pub fn validate(&self) -> Result<(), FieldError> {
        if self.height == 0 || self.width == 0 {
            return Err(FieldError::EmptyField);
        }
        if self.mines >= self.total_cells() {
            return Err(FieldError::TooManyMines {
                mines: self.mines,
                cells: self.total_cells(),
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(8, 8, 8)
    }
}
