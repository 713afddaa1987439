//! Uniform grid index over the XZ plane.
//!
//! Each zone is registered in every cell its bounds overlap. A point
//! lookup returns the zones registered in the point's cell; callers then
//! confirm with an exact containment test. Zones spanning more than
//! `MAX_CELLS_PER_ZONE` cells are kept in a separate list that every
//! lookup returns.

use glam::Vec3;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::core::ZoneKey;

const MAX_CELLS_PER_ZONE: i64 = 4096;

type Cell = (i32, i32);

/// Broad-phase spatial index for zone lookup.
#[derive(Clone, Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: FxHashMap<Cell, SmallVec<[ZoneKey; 4]>>,
    zone_cells: FxHashMap<ZoneKey, Vec<Cell>>,
    oversized: Vec<ZoneKey>,
}

impl SpatialGrid {
    /// Create an empty grid. Non-positive sizes fall back to 64.
    #[must_use]
    pub fn new(cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 { cell_size } else { 64.0 };
        Self {
            cell_size,
            cells: FxHashMap::default(),
            zone_cells: FxHashMap::default(),
            oversized: Vec::new(),
        }
    }

    fn cell_of(&self, x: f32, z: f32) -> Cell {
        (
            (x / self.cell_size).floor() as i32,
            (z / self.cell_size).floor() as i32,
        )
    }

    /// Register a zone covering the given bounds. Re-inserting replaces
    /// the previous registration.
    pub fn insert(&mut self, key: ZoneKey, min: Vec3, max: Vec3) {
        self.remove(key);

        let (x0, z0) = self.cell_of(min.x, min.z);
        let (x1, z1) = self.cell_of(max.x, max.z);
        let span = (i64::from(x1) - i64::from(x0) + 1) * (i64::from(z1) - i64::from(z0) + 1);
        if span > MAX_CELLS_PER_ZONE {
            self.oversized.push(key);
            return;
        }

        let mut covered = Vec::with_capacity(span as usize);
        for x in x0..=x1 {
            for z in z0..=z1 {
                self.cells.entry((x, z)).or_default().push(key);
                covered.push((x, z));
            }
        }
        self.zone_cells.insert(key, covered);
    }

    /// Unregister a zone. Returns false if it was not registered.
    pub fn remove(&mut self, key: ZoneKey) -> bool {
        if let Some(pos) = self.oversized.iter().position(|&k| k == key) {
            self.oversized.swap_remove(pos);
            return true;
        }
        let Some(covered) = self.zone_cells.remove(&key) else {
            return false;
        };
        for cell in covered {
            if let Some(list) = self.cells.get_mut(&cell) {
                list.retain(|k| *k != key);
                if list.is_empty() {
                    self.cells.remove(&cell);
                }
            }
        }
        true
    }

    /// Zones that may contain `point`.
    pub fn candidates(&self, point: Vec3) -> impl Iterator<Item = ZoneKey> + '_ {
        let cell = self.cell_of(point.x, point.z);
        self.cells
            .get(&cell)
            .into_iter()
            .flat_map(|list| list.iter().copied())
            .chain(self.oversized.iter().copied())
    }

    /// Number of zones registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.zone_cells.len() + self.oversized.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
