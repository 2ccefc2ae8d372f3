//! Spatial hash acceleration structure for neighbor search.
//!
//! Uses sorted-entry + hash-bucket-offset arrays rather than `HashMap` so the
//! data layout maps directly to GPU buffers (no pointer chasing). The grid is
//! unbounded: cell coordinates are hashed and the hash reduced modulo the
//! bucket-table size, so no domain bounds are needed and distant cells may
//! alias onto the same bucket. Querying passes must therefore filter
//! candidates by true Euclidean distance.

use bytemuck::{Pod, Zeroable};

/// First hash constant for 2D cell coordinates.
const HASH_K1: u32 = 15823;
/// Second hash constant for 2D cell coordinates.
const HASH_K2: u32 = 9737333;

/// Padding value for the unused third word of [`SpatialEntry`].
pub const ENTRY_PAD: u32 = u32::MAX;

/// One sort entry of the acceleration structure: which particle, and the
/// hash bucket its cell maps to.
///
/// Three words wide (index, key, padding) to match the `uint3` layout a GPU
/// sort network consumes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct SpatialEntry {
    /// Particle index this entry refers to.
    pub index: u32,
    /// Hash bucket key of the particle's grid cell.
    pub key: u32,
    /// Unused; always [`ENTRY_PAD`].
    pub pad: u32,
}

/// Integer grid cell containing a position, for cells of side `cell_size`.
#[inline]
fn cell_coord(x: f32, y: f32, cell_size: f32) -> (i32, i32) {
    ((x / cell_size).floor() as i32, (y / cell_size).floor() as i32)
}

/// Hash of 2D integer cell coordinates.
///
/// Wrapping arithmetic on purpose: negative coordinates wrap through `as u32`
/// and still hash consistently.
#[inline]
fn hash_cell(cx: i32, cy: i32) -> u32 {
    (cx as u32)
        .wrapping_mul(HASH_K1)
        .wrapping_add((cy as u32).wrapping_mul(HASH_K2))
}

/// Reduce a cell hash to a bucket key for a table of `table_size` buckets.
#[inline]
fn key_from_hash(hash: u32, table_size: u32) -> u32 {
    hash % table_size
}

/// Sort primitive: order entries so that all entries sharing a key are
/// contiguous.
///
/// Stand-in for a parallel sort network; only the contract matters to the
/// callers (equal keys contiguous, output a permutation of the input). The
/// relative order of equal keys is unspecified.
fn sort_by_key(entries: &mut [SpatialEntry]) {
    entries.sort_unstable_by_key(|e| e.key);
}

/// Spatial hash over particle positions, rebuilt every substep.
///
/// The cell size equals the smoothing radius, so all true neighbors of a
/// particle lie in the 3x3 block of cells centered on its own cell. The
/// bucket table has one slot per particle (table size == N).
pub struct SpatialHash {
    /// Cell side length used for the most recent build.
    cell_size: f32,
    /// Entries sorted by bucket key after `build`.
    entries: Vec<SpatialEntry>,
    /// First sorted position of each bucket key; `n` (sentinel) if the
    /// bucket is empty.
    offsets: Vec<u32>,
}

impl SpatialHash {
    /// Create a spatial hash sized for `n` particles.
    pub fn new(n: usize) -> Self {
        Self {
            cell_size: 0.0,
            entries: vec![
                SpatialEntry {
                    index: 0,
                    key: 0,
                    pad: ENTRY_PAD,
                };
                n
            ],
            offsets: vec![n as u32; n],
        }
    }

    /// Rebuild the structure from the given positions.
    ///
    /// `cell_size` should equal the smoothing radius. The slices must match
    /// the particle count this hash was created for.
    pub fn build(&mut self, x: &[f32], y: &[f32], cell_size: f32) {
        let n = self.entries.len();
        debug_assert_eq!(n, x.len());
        debug_assert_eq!(n, y.len());
        debug_assert!(cell_size > 0.0, "cell_size must be positive");
        if n == 0 {
            return;
        }

        self.cell_size = cell_size;
        let table_size = n as u32;

        // --- 1. Hash pass: one entry per particle, independent across particles ---
        for i in 0..n {
            let (cx, cy) = cell_coord(x[i], y[i], cell_size);
            self.entries[i] = SpatialEntry {
                index: i as u32,
                key: key_from_hash(hash_cell(cx, cy), table_size),
                pad: ENTRY_PAD,
            };
        }

        // --- 2. Sort by bucket key (external sort-primitive contract) ---
        sort_by_key(&mut self.entries);

        // --- 3. Offset pass: first occurrence of each key claims its bucket ---
        // Buckets with no particles keep the sentinel (== n), which querying
        // code reads as an empty range.
        for o in self.offsets.iter_mut() {
            *o = n as u32;
        }
        for p in 0..n {
            let key = self.entries[p].key;
            // Keys are < n, so n can double as the "no previous key" marker.
            let prev = if p == 0 { n as u32 } else { self.entries[p - 1].key };
            if key != prev {
                self.offsets[key as usize] = p as u32;
            }
        }
    }

    /// Invoke `f` with every candidate neighbor index for a query position.
    ///
    /// Scans the 3x3 block of cells around the position's own cell. Hash
    /// truncation can alias distant cells onto a scanned bucket, so the
    /// candidates over-include: callers must filter by actual distance.
    /// Every particle within `cell_size` of the query position is guaranteed
    /// to be delivered (no false negatives), each candidate exactly once.
    pub fn for_each_candidate<F>(&self, x: f32, y: f32, mut f: F)
    where
        F: FnMut(usize),
    {
        let n = self.entries.len() as u32;
        if n == 0 {
            return;
        }
        let (cx, cy) = cell_coord(x, y, self.cell_size);

        // Two of the nine cells can reduce to the same bucket key; visiting
        // the shared range twice would double-count candidates, so skip
        // repeated keys.
        let mut seen = [u32::MAX; 9];
        let mut seen_len = 0;

        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                let key = key_from_hash(hash_cell(cx + dx, cy + dy), n);
                if seen[..seen_len].contains(&key) {
                    continue;
                }
                seen[seen_len] = key;
                seen_len += 1;

                let mut p = self.offsets[key as usize];
                while p < n {
                    let entry = self.entries[p as usize];
                    if entry.key != key {
                        break;
                    }
                    f(entry.index as usize);
                    p += 1;
                }
            }
        }
    }

    /// Sorted entries of the most recent build.
    pub fn entries(&self) -> &[SpatialEntry] {
        &self.entries
    }

    /// Bucket offset table of the most recent build.
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }
}
