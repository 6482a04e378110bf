//! Coarse bucket index used to answer hottest/coldest-N queries and to
//! drive eviction order without ever sorting the whole population.
//!
//! Each kind (inode, range) gets its own `HeatMap`. A bucket is a FIFO
//! queue of `Weak` back-links; the map never owns the items it tracks, so
//! a bucket entry whose `Weak` fails to upgrade just means the item was
//! already dropped elsewhere and the entry is swept lazily on next visit.
//! Removal from a bucket is a linear scan by pointer identity rather than
//! an intrusive doubly-linked list — a deliberate simplification over a
//! hand-rolled unsafe list, acceptable because bucket occupancy is capped
//! by how often items move between temperature buckets, not by dataset
//! size, and the spec only promises *eventual* correct placement.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Weak};

use crate::domain::{HeatLink, Tracked};

/// Translate a 32-bit temperature into a bucket index for a heat map with
/// `2^map_bits` buckets.
pub fn bucket_for(temperature: u32, map_bits: u32) -> usize {
    if map_bits >= 32 {
        return 0;
    }
    (temperature >> (32 - map_bits)) as usize
}

pub struct HeatMap<T> {
    buckets: Vec<Mutex<VecDeque<Weak<T>>>>,
    map_bits: u32,
}

impl<T: Tracked> HeatMap<T> {
    pub fn new(map_bits: u32) -> Self {
        let size = 1usize << map_bits.min(24);
        let mut buckets = Vec::with_capacity(size);
        buckets.resize_with(size, || Mutex::new(VecDeque::new()));
        Self { buckets, map_bits }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Current population of every bucket, coldest first. Includes any
    /// stale `Weak` entries not yet swept by a walk — an upper bound, not
    /// an exact live count, which is fine for reporting purposes.
    pub fn occupancy(&self) -> Vec<usize> {
        self.buckets.iter().map(|b| b.lock().unwrap().len()).collect()
    }

    fn link_of(item: &Arc<T>) -> &HeatLink {
        item.heat_link()
    }

    /// Move `item` into the bucket matching `temperature`, linking it for
    /// the first time if it was not already placed. Also records
    /// `temperature` isn't stored here — callers keep it in the item's own
    /// `FreqSample` snapshot if they need it later.
    pub fn rebucket(&self, item: &Arc<T>, temperature: u32) {
        let target = bucket_for(temperature, self.map_bits);
        let link = Self::link_of(item);
        let mut slot = link.0.lock().unwrap();
        if let Some(current) = *slot {
            if current == target {
                return;
            }
            let mut old = self.buckets[current].lock().unwrap();
            if let Some(pos) = old.iter().position(|w| weak_points_to(w, item)) {
                old.remove(pos);
            }
        }
        self.buckets[target]
            .lock()
            .unwrap()
            .push_back(Arc::downgrade(item));
        *slot = Some(target);
    }

    /// Remove `item` from whatever bucket it currently occupies, if any.
    pub fn unlink(&self, item: &Arc<T>) {
        let link = Self::link_of(item);
        let mut slot = link.0.lock().unwrap();
        if let Some(current) = slot.take() {
            let mut bucket = self.buckets[current].lock().unwrap();
            if let Some(pos) = bucket.iter().position(|w| weak_points_to(w, item)) {
                bucket.remove(pos);
            }
        }
    }

    /// Visit buckets from coldest (index 0) to hottest, invoking `f` on
    /// each live item still linked. Stale (already-dropped) entries
    /// encountered along the way are swept from the bucket. `f` returning
    /// `false` stops the walk early.
    pub fn walk_ascending<F>(&self, mut f: F)
    where
        F: FnMut(&Arc<T>) -> bool,
    {
        'buckets: for bucket in &self.buckets {
            let snapshot: Vec<Weak<T>> = bucket.lock().unwrap().iter().cloned().collect();
            let mut dead = Vec::new();
            for weak in &snapshot {
                match weak.upgrade() {
                    Some(arc) => {
                        if !f(&arc) {
                            break 'buckets;
                        }
                    }
                    None => dead.push(weak.clone()),
                }
            }
            if !dead.is_empty() {
                let mut guard = bucket.lock().unwrap();
                guard.retain(|w| !dead.iter().any(|d| d.ptr_eq(w)));
            }
        }
    }

    /// Visit buckets from hottest to coldest; same semantics as
    /// [`HeatMap::walk_ascending`] otherwise. Used for hottest-N queries.
    pub fn walk_descending<F>(&self, mut f: F)
    where
        F: FnMut(&Arc<T>) -> bool,
    {
        'buckets: for bucket in self.buckets.iter().rev() {
            let snapshot: Vec<Weak<T>> = bucket.lock().unwrap().iter().cloned().collect();
            for weak in &snapshot {
                if let Some(arc) = weak.upgrade() {
                    if !f(&arc) {
                        break 'buckets;
                    }
                }
            }
        }
    }
}

fn weak_points_to<T>(weak: &Weak<T>, item: &Arc<T>) -> bool {
    weak.upgrade()
        .map(|arc| Arc::ptr_eq(&arc, item))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FreqSample;

    struct Item {
        freq: FreqSample,
        link: HeatLink,
    }

    impl Tracked for Item {
        fn freq(&self) -> &FreqSample {
            &self.freq
        }
        fn heat_link(&self) -> &HeatLink {
            &self.link
        }
    }

    fn item() -> Arc<Item> {
        Arc::new(Item {
            freq: FreqSample::new(),
            link: HeatLink::new(),
        })
    }

    #[test]
    fn bucket_for_splits_range_evenly() {
        assert_eq!(bucket_for(0, 8), 0);
        assert_eq!(bucket_for(u32::MAX, 8), 255);
    }

    #[test]
    fn rebucket_then_walk_finds_item() {
        let map: HeatMap<Item> = HeatMap::new(4);
        let it = item();
        map.rebucket(&it, u32::MAX);
        let mut seen = 0;
        map.walk_descending(|arc| {
            assert!(Arc::ptr_eq(arc, &it));
            seen += 1;
            true
        });
        assert_eq!(seen, 1);
    }

    #[test]
    fn rebucket_moves_between_buckets() {
        let map: HeatMap<Item> = HeatMap::new(4);
        let it = item();
        map.rebucket(&it, 0);
        map.rebucket(&it, u32::MAX);
        let mut cold_hits = 0;
        map.walk_ascending(|_| {
            cold_hits += 1;
            true
        });
        assert_eq!(cold_hits, 1);
    }

    #[test]
    fn dropped_item_is_swept_lazily() {
        let map: HeatMap<Item> = HeatMap::new(4);
        {
            let it = item();
            map.rebucket(&it, 10);
        }
        let mut seen = 0;
        map.walk_ascending(|_| {
            seen += 1;
            true
        });
        assert_eq!(seen, 0);
    }

    #[test]
    fn unlink_removes_item_from_its_bucket() {
        let map: HeatMap<Item> = HeatMap::new(4);
        let it = item();
        map.rebucket(&it, 10);
        map.unlink(&it);
        let mut seen = 0;
        map.walk_ascending(|_| {
            seen += 1;
            true
        });
        assert_eq!(seen, 0);
    }
}
