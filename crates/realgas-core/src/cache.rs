//! Memoization of properties keyed on a pair of independent variables.
//!
//! Freshness is tracked with a generation counter: every slot remembers the
//! generation it was written in and the counter is bumped whenever the
//! independent variables change, which invalidates all slots at once.
use std::fmt;
use std::marker::PhantomData;

/// A closed set of quantities that can be stored in a [PropertyCache].
pub trait CacheIndex: Copy {
    /// Number of distinct quantities.
    const COUNT: usize;

    /// Position of the quantity in the cache.
    fn index(self) -> usize;
}

/// Cache for properties of a single state given by `(t, x)`.
///
/// `x` is whatever the owner pairs with the temperature (volume or pressure).
#[derive(Clone)]
pub struct PropertyCache<K> {
    values: Vec<f64>,
    stamps: Vec<u64>,
    generation: u64,
    t: f64,
    x: f64,
    key: PhantomData<K>,
}

impl<K: CacheIndex> Default for PropertyCache<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: CacheIndex> PropertyCache<K> {
    pub fn new() -> Self {
        Self {
            values: vec![f64::NAN; K::COUNT],
            stamps: vec![0; K::COUNT],
            generation: 1,
            t: f64::NAN,
            x: f64::NAN,
            key: PhantomData,
        }
    }

    /// Store a new state. Returns `true` if the state differs from the
    /// stored one, in which case every cached value is stale.
    pub fn update(&mut self, t: f64, x: f64) -> bool {
        if t == self.t && x == self.x {
            return false;
        }
        self.t = t;
        self.x = x;
        self.generation += 1;
        true
    }

    /// Mark every value as stale without changing the state.
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// The stored state `(t, x)`.
    pub fn state(&self) -> (f64, f64) {
        (self.t, self.x)
    }

    pub fn test(&self, id: K) -> bool {
        self.stamps[id.index()] == self.generation
    }

    pub fn get(&self, id: K) -> f64 {
        debug_assert!(self.test(id), "read of a stale cache entry");
        self.values[id.index()]
    }

    pub fn set(&mut self, id: K, value: f64) {
        let i = id.index();
        self.values[i] = value;
        self.stamps[i] = self.generation;
    }

    /// Return the cached value or compute and store it.
    pub fn get_or_insert_with<F: FnOnce() -> f64>(&mut self, id: K, f: F) -> f64 {
        if !self.test(id) {
            let value = f();
            self.set(id, value);
        }
        self.values[id.index()]
    }
}

impl<K: CacheIndex> fmt::Debug for PropertyCache<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fresh = self.stamps.iter().filter(|&&s| s == self.generation).count();
        f.debug_struct("PropertyCache")
            .field("t", &self.t)
            .field("x", &self.x)
            .field("generation", &self.generation)
            .field("fresh", &fresh)
            .finish()
    }
}
