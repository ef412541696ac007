use std::cmp::min;

use itertools::iproduct;

use crate::Cell;

/// Cells adjacent to `(row, col)` on a `height` x `width` grid, not including
/// the cell itself. Corner and edge cells have fewer than 8 neighbours.
///
/// `(row, col)` must already be in bounds.
pub(crate) fn neighbours(
    (row, col): Cell,
    height: usize,
    width: usize,
) -> impl Iterator<Item = Cell> {
    let rows = row.saturating_sub(1)..=min(row + 1, height - 1);
    let cols = col.saturating_sub(1)..=min(col + 1, width - 1);
    iproduct!(rows, cols).filter(move |&cell| cell != (row, col))
}

/// Every cell of a `height` x `width` grid, in row-major order
pub(crate) fn all_cells(height: usize, width: usize) -> impl Iterator<Item = Cell> {
    iproduct!(0..height, 0..width)
}

/// Whether `(row, col)` lies on a `height` x `width` grid
pub(crate) fn in_bounds((row, col): Cell, height: usize, width: usize) -> bool {
    row < height && col < width
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn corner_has_three_neighbours() {
        let found = neighbours((0, 0), 3, 3).collect::<HashSet<_>>();
        assert_eq!(found, HashSet::from([(0, 1), (1, 0), (1, 1)]));
    }

    #[test]
    fn centre_has_eight_neighbours() {
        let found = neighbours((1, 1), 3, 3).collect::<HashSet<_>>();
        assert_eq!(found.len(), 8);
        assert!(!found.contains(&(1, 1)));
    }

    #[test]
    fn single_cell_grid_has_no_neighbours() {
        assert_eq!(neighbours((0, 0), 1, 1).count(), 0);
    }

    #[test]
    fn all_cells_is_row_major() {
        assert_eq!(
            all_cells(2, 2).collect::<Vec<_>>(),
            vec![(0, 0), (0, 1), (1, 0), (1, 1)]
        );
    }
}
