//! Cache lifecycle: which cells have a live cache, and what evicted caches
//! left behind.
//!
//! A cell moves through `Dormant → Active → Dormant-with-Memento → Active → …`.
//! Leaving the neighborhood snapshots a cache into a memento; coming back
//! restores it verbatim. Only a cell that has never been populated gets
//! fresh tokens from the [`Generator`].

use std::collections::BTreeMap;

use rand::Rng;

use crate::cache::{Cache, Memento};
use crate::generator::Generator;
use crate::grid::{GridPoint, neighborhood};
use crate::inventory::Inventory;
use crate::token::Token;

/// Receives lifecycle notifications, typically a renderer.
///
/// A refresh calls `on_neighborhood_cleared` once, then `on_cache_spawned`
/// for every cache in the new neighborhood, after the new active set is
/// complete.
pub trait CacheObserver {
    fn on_neighborhood_cleared(&mut self) {}
    fn on_cache_spawned(&mut self, point: GridPoint, cache: &Cache);
}

/// Observer that ignores everything.
impl CacheObserver for () {
    fn on_cache_spawned(&mut self, _point: GridPoint, _cache: &Cache) {}
}

/// What a refresh did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub evicted: usize,
    pub restored: usize,
    pub generated: usize,
}

impl RefreshReport {
    pub fn spawned(&self) -> usize {
        self.restored + self.generated
    }
}

#[derive(Clone, Debug, Default)]
pub struct CacheBoard {
    generator: Generator,
    active: BTreeMap<GridPoint, Cache>,
    mementos: BTreeMap<GridPoint, Memento>,
}

impl CacheBoard {
    pub fn new(generator: Generator) -> Self {
        Self {
            generator,
            active: BTreeMap::new(),
            mementos: BTreeMap::new(),
        }
    }

    /// A board with no live caches that remembers `mementos`.
    pub fn from_mementos(
        generator: Generator,
        mementos: impl IntoIterator<Item = (GridPoint, Memento)>,
    ) -> Self {
        Self {
            generator,
            active: BTreeMap::new(),
            mementos: mementos.into_iter().collect(),
        }
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// Evict every live cache, then spawn the neighborhood
    /// `[center - radius, center + radius)` on both axes.
    pub fn refresh_neighborhood(
        &mut self,
        center: GridPoint,
        radius: i32,
        observer: &mut impl CacheObserver,
    ) -> RefreshReport {
        let mut report = RefreshReport {
            evicted: self.active.len(),
            ..Default::default()
        };

        for (point, cache) in std::mem::take(&mut self.active) {
            self.mementos.insert(point, cache.to_memento());
        }

        let mut next = BTreeMap::new();
        for point in neighborhood(center, radius) {
            if !self.generator.should_spawn(point) {
                continue;
            }
            let cache = match self.mementos.remove(&point) {
                Some(memento) => {
                    report.restored += 1;
                    Cache::from_memento(point, memento)
                }
                None => {
                    report.generated += 1;
                    self.generator.populate(point)
                }
            };
            next.insert(point, cache);
        }
        self.active = next;

        observer.on_neighborhood_cleared();
        for (point, cache) in &self.active {
            observer.on_cache_spawned(*point, cache);
        }

        report
    }

    /// Move a random token from the cache at `point` into `inventory`.
    /// Returns the moved token, or `None` if there is no live cache there or
    /// it is empty.
    pub fn collect(
        &mut self,
        point: GridPoint,
        inventory: &mut Inventory,
        rng: &mut impl Rng,
    ) -> Option<Token> {
        let cache = self.active.get_mut(&point)?;
        let token = cache.take_random(rng)?;
        inventory.push(token);
        Some(token)
    }

    /// Move a random token from `inventory` into the cache at `point`.
    /// Returns the moved token, or `None` if there is no live cache there or
    /// the inventory is empty.
    pub fn deposit(
        &mut self,
        point: GridPoint,
        inventory: &mut Inventory,
        rng: &mut impl Rng,
    ) -> Option<Token> {
        let cache = self.active.get_mut(&point)?;
        let token = inventory.take_random(rng)?;
        cache.push(token);
        Some(token)
    }

    pub fn cache(&self, point: GridPoint) -> Option<&Cache> {
        self.active.get(&point)
    }

    pub fn active_caches(&self) -> impl Iterator<Item = &Cache> {
        self.active.values()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn memento(&self, point: GridPoint) -> Option<&Memento> {
        self.mementos.get(&point)
    }

    pub fn memento_count(&self) -> usize {
        self.mementos.len()
    }

    /// Tokens held by live caches and mementos, not counting any inventory.
    pub fn total_tokens(&self) -> usize {
        let live: usize = self.active.values().map(Cache::token_count).sum();
        let saved: usize = self.mementos.values().map(Memento::token_count).sum();
        live + saved
    }

    /// Every memento plus a snapshot of every live cache, leaving the board
    /// untouched.
    pub fn mementos_with_active(&self) -> BTreeMap<GridPoint, Memento> {
        let mut all = self.mementos.clone();
        for (point, cache) in &self.active {
            all.insert(*point, cache.to_memento());
        }
        all
    }
}
