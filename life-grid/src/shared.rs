use crate::{Cell, Direction, Generation, GridConfig, LifeError, Random};
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The current generation, shared between the simulation loop and the
/// renderer.
///
/// Readers take an `Arc` snapshot and never see a half-written grid: `update`
/// publishes a complete replacement, and the cell mutations go through
/// `Arc::make_mut`, which copies the generation first if any snapshot of it
/// is still alive. An edit therefore always publishes a new `Arc` while an
/// update holds its base snapshot, which is how `update` notices it.
#[derive(Debug)]
pub struct SharedGrid {
    width: u32,
    height: u32,
    current: Mutex<Arc<Generation>>,
    rand: Mutex<Random>,
    generation_count: AtomicU64,
}

impl SharedGrid {
    pub fn new(width: u32, height: u32, rand: Random) -> Self {
        Self {
            width,
            height,
            current: Mutex::new(Arc::new(Generation::new(width, height))),
            rand: Mutex::new(rand),
            generation_count: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &GridConfig, rand: Random) -> Self {
        Self::new(config.width, config.height, rand)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn num_cells(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Updates applied since construction.
    pub fn generation_count(&self) -> u64 {
        self.generation_count.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> Arc<Generation> {
        Arc::clone(&self.current())
    }

    pub fn live_count(&self) -> usize {
        self.snapshot().live_count()
    }

    /// Advances one generation.
    ///
    /// The next generation is computed from a snapshot without holding the
    /// lock, so readers only ever wait for the pointer swap. If an edit was
    /// published in the meantime the result is discarded and recomputed from
    /// the edited generation.
    pub fn update(&self) {
        loop {
            let base = self.snapshot();
            let next = base.next();
            if self.publish_next(&base, next) {
                break;
            }
            debug!("Recomputing update after a concurrent edit");
        }
        self.generation_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Replaces the current generation with `next` if it is still `base`.
    fn publish_next(&self, base: &Arc<Generation>, next: Generation) -> bool {
        let mut current = self.current();
        if !Arc::ptr_eq(&*current, base) {
            return false;
        }
        *current = Arc::new(next);
        true
    }

    pub fn reset_cells(&self) {
        self.edit(|generation| generation.fill(Cell::Dead));
        debug!("Reset cells");
    }

    /// Makes each cell alive with chance `1 / probability`, all others dead.
    pub fn randomize_cells(&self, probability: u32) -> Result<(), LifeError> {
        if probability == 0 {
            return Err(LifeError::InvalidProbability(probability));
        }
        let mut rand = self.rand.lock().unwrap_or_else(PoisonError::into_inner);
        self.edit(|generation| {
            for cell in generation.cells_iter_mut() {
                *cell = if rand.one_in(probability) {
                    Cell::Alive
                } else {
                    Cell::Dead
                };
            }
        });
        debug!("Randomized cells with probability 1/{probability}");
        Ok(())
    }

    pub fn create_glider(&self, x: i64, y: i64, direction: Direction) -> Result<(), LifeError> {
        self.edit(|generation| generation.stamp_glider(x, y, direction))?;
        debug!("Created glider at ({x}, {y}) heading {direction}");
        Ok(())
    }

    fn edit<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut Generation) -> T,
    {
        let mut current = self.current();
        f(Arc::make_mut(&mut current))
    }

    fn current(&self) -> MutexGuard<'_, Arc<Generation>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared(width: u32, height: u32) -> SharedGrid {
        SharedGrid::new(width, height, Random::from_seed(42))
    }

    #[test]
    fn starts_empty() {
        let grid = shared(16, 9);
        assert_eq!(grid.live_count(), 0);
        assert_eq!((grid.width(), grid.height()), (16, 9));
        assert_eq!(grid.snapshot().width(), 16);
        assert_eq!(grid.num_cells(), 144);
        assert_eq!(grid.generation_count(), 0);
    }

    #[test]
    fn snapshot_is_unaffected_by_later_edits() {
        let grid = shared(8, 8);
        let before = grid.snapshot();
        grid.create_glider(4, 4, Direction::UpLeft).unwrap();
        assert_eq!(before.live_count(), 0);
        assert_eq!(grid.live_count(), 5);

        let glider = grid.snapshot();
        grid.update();
        grid.reset_cells();
        assert_eq!(glider.live_count(), 5);
        assert_eq!(grid.live_count(), 0);
    }

    #[test]
    fn reset_then_update_is_empty() {
        let grid = shared(10, 10);
        grid.randomize_cells(2).unwrap();
        grid.reset_cells();
        grid.update();
        assert_eq!(grid.live_count(), 0);
        assert_eq!(grid.generation_count(), 1);
    }

    #[test]
    fn randomize_with_probability_one_fills_the_grid() {
        let grid = shared(12, 7);
        grid.randomize_cells(1).unwrap();
        assert_eq!(grid.live_count(), grid.num_cells());
    }

    #[test]
    fn randomize_overwrites_previous_cells() {
        let grid = shared(64, 64);
        grid.randomize_cells(1).unwrap();
        grid.randomize_cells(8).unwrap();
        let live = grid.live_count();
        assert!(live > 0 && live < grid.num_cells() / 4, "{live}");
    }

    #[test]
    fn randomize_rejects_zero_probability() {
        let grid = shared(4, 4);
        grid.create_glider(2, 2, Direction::DownRight).unwrap();
        assert_eq!(
            grid.randomize_cells(0),
            Err(LifeError::InvalidProbability(0))
        );
        assert_eq!(grid.live_count(), 5);
    }

    #[test]
    fn edit_during_update_is_not_overwritten() {
        let grid = shared(8, 8);
        let base = grid.snapshot();
        let next = base.next();
        grid.create_glider(4, 4, Direction::DownLeft).unwrap();

        assert!(!grid.publish_next(&base, next));
        assert_eq!(grid.live_count(), 5);

        let base = grid.snapshot();
        let next = base.next();
        assert!(grid.publish_next(&base, next.clone()));
        assert_eq!(*grid.snapshot(), next);
    }

    #[test]
    fn update_counts_once_per_generation() {
        let grid = shared(8, 8);
        grid.create_glider(4, 4, Direction::UpLeft).unwrap();
        let expected = grid.snapshot().next().next();
        grid.update();
        grid.update();
        assert_eq!(*grid.snapshot(), expected);
        assert_eq!(grid.generation_count(), 2);
    }

    #[test]
    fn out_of_bounds_glider_leaves_grid_unchanged() {
        let grid = shared(8, 8);
        let result = grid.create_glider(7, 7, Direction::UpLeft);
        assert!(matches!(result, Err(LifeError::GliderOutOfBounds { .. })));
        assert_eq!(grid.live_count(), 0);
    }
}
