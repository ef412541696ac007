use minelogic::{FieldError, GameConfig, MineField};
use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn places_exactly_the_configured_mines(
        seed in any::<u64>(),
        height in 1..12usize,
        width in 1..12usize,
        density in 0.0..1.0f64,
    ) {
        let cells = height * width;
        let mines = ((cells - 1) as f64 * density) as usize;
        let mut rng = SmallRng::seed_from_u64(seed);
        let field = MineField::with_rng(height, width, mines, &mut rng).unwrap();
        prop_assert_eq!(field.mines().len(), mines);
        prop_assert!(field.mines().iter().all(|&(r, c)| r < height && c < width));
    }

    #[test]
    fn nearby_mines_never_exceed_neighbourhood(seed in any::<u64>(), row in 0..8usize, col in 0..8usize) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let field = MineField::with_rng(8, 8, 20, &mut rng).unwrap();
        let count = field.nearby_mines((row, col)).unwrap();
        let edges = usize::from(row == 0 || row == 7) + usize::from(col == 0 || col == 7);
        let max = match edges {
            0 => 8,
            1 => 5,
            _ => 3,
        };
        prop_assert!(count <= max);
    }

    #[test]
    fn full_fields_are_rejected(height in 1..6usize, width in 1..6usize, extra in 0..3usize) {
        let cells = height * width;
        prop_assert_eq!(
            MineField::new(height, width, cells + extra),
            Err(FieldError::TooManyMines { mines: cells + extra, cells })
        );
        prop_assert_eq!(
            GameConfig::new(height, width, cells + extra).validate(),
            Err(FieldError::TooManyMines { mines: cells + extra, cells })
        );
    }
}
