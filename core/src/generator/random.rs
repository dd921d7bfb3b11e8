use rand::prelude::*;

use super::*;

/// Uniform placement that only guarantees the first tile is safe. Coordinates are drawn at random and redrawn when
/// they hit the safe tile or an existing mine, until the requested number of distinct mines is down.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seeded from the thread rng.
    pub fn from_entropy() -> Self {
        Self::new(rand::rng().random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(&self, config: &BoardConfig, safe: Coord2) -> MineLayout {
        let mut layout = MineLayout::empty(config.size);
        let (width, height) = config.size;

        let free = config.total_cells() - CellCount::from(config.contains(safe));
        let wanted = if config.mines > free {
            log::warn!(
                "Cannot fit {} mines around a safe start, placing {}",
                config.mines,
                free
            );
            free
        } else {
            config.mines
        };

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut draws = 0u64;
        while layout.mine_count() < wanted {
            draws += 1;
            let coords = (rng.random_range(0..width), rng.random_range(0..height));
            if coords == safe {
                continue;
            }
            layout.place(coords);
        }

        log::debug!(
            "Placed {} mines on {}x{} in {} draws (seed {})",
            layout.mine_count(),
            width,
            height,
            draws,
            self.seed
        );
        layout
    }
}
