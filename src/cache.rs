//! Fixed-capacity pool of reusable droplets.
//!
//! Slots are allocated once up front. [`DropletCache::acquire`] pops a free
//! slot and [`DropletCache::release`] resets it to the template before
//! pushing it back, so callers can never hand out a dirty droplet.
use log::debug;

use crate::droplet::{Droplet, DropletTemplate, SlotId};

#[derive(Debug)]
struct Slot {
    droplet: Droplet,
    generation: u32,
    in_use: bool,
}

/// Object pool owning every droplet instance.
#[derive(Debug)]
pub struct DropletCache {
    template: DropletTemplate,
    slots: Vec<Slot>,
    /// Stack of free slot indices; O(1) acquire and release.
    free: Vec<u32>,
}

impl DropletCache {
    /// Allocates `capacity` droplets from `template`.
    #[must_use]
    pub fn new(capacity: usize, template: DropletTemplate) -> Self {
        let slots: Vec<Slot> = (0..capacity)
            .map(|_| Slot {
                droplet: template.instantiate(),
                generation: 0,
                in_use: false,
            })
            .collect();
        // Reverse so the first acquire hands out slot 0.
        let free = (0..slots.len())
            .filter_map(|index| u32::try_from(index).ok())
            .rev()
            .collect();
        Self {
            template,
            slots,
            free,
        }
    }

    /// Takes a free droplet, or `None` when every slot is in use.
    pub fn acquire(&mut self) -> Option<SlotId> {
        let index = self.free.pop()?;
        let slot = self.slots.get_mut(index as usize)?;
        slot.in_use = true;
        let id = SlotId {
            index,
            generation: slot.generation,
        };
        debug!("acquired droplet {id}");
        Some(id)
    }

    /// Resets the droplet to the template and returns it to the free list.
    ///
    /// Returns `false` when `id` is stale or already released; such calls
    /// leave the pool untouched.
    pub fn release(&mut self, id: SlotId) -> bool {
        let fresh = self.template.instantiate();
        let Some(slot) = self.live_slot_mut(id) else {
            debug!("ignored release of stale droplet {id}");
            return false;
        };
        slot.droplet = fresh;
        slot.generation = slot.generation.wrapping_add(1);
        slot.in_use = false;
        self.free.push(id.index);
        debug!("released droplet {id}");
        true
    }

    /// Looks up an acquired droplet.
    #[must_use]
    pub fn get(&self, id: SlotId) -> Option<&Droplet> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.in_use && slot.generation == id.generation)
            .map(|slot| &slot.droplet)
    }

    /// Mutable lookup of an acquired droplet.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut Droplet> {
        self.live_slot_mut(id).map(|slot| &mut slot.droplet)
    }

    fn live_slot_mut(&mut self, id: SlotId) -> Option<&mut Slot> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.in_use && slot.generation == id.generation)
    }

    /// Number of droplets ready to be acquired.
    #[must_use]
    pub const fn available(&self) -> usize {
        self.free.len()
    }

    /// Number of droplets currently handed out.
    #[must_use]
    pub const fn in_use(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Total number of slots.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Handles of every acquired droplet, in slot order.
    #[must_use]
    pub fn active_slots(&self) -> Vec<SlotId> {
        self.slots
            .iter()
            .zip(0_u32..)
            .filter(|(slot, _)| slot.in_use)
            .map(|(slot, index)| SlotId {
                index,
                generation: slot.generation,
            })
            .collect()
    }

    /// Destroys every droplet and the pool itself.
    ///
    /// Returns how many droplets were still handed out at the time.
    pub fn dispose(self) -> usize {
        let outstanding = self.in_use();
        debug!(
            "disposed droplet cache of {} slots ({outstanding} outstanding)",
            self.capacity()
        );
        outstanding
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rstest::{fixture, rstest};

    #[fixture]
    fn cache() -> DropletCache {
        DropletCache::new(2, DropletTemplate::default())
    }

    #[rstest]
    fn acquire_stops_at_capacity(mut cache: DropletCache) {
        assert!(cache.acquire().is_some());
        assert!(cache.acquire().is_some());
        assert!(cache.acquire().is_none());
        assert_eq!(cache.in_use(), 2);
        assert_eq!(cache.available(), 0);
    }

    #[rstest]
    fn first_acquire_uses_first_slot(mut cache: DropletCache) {
        let id = cache.acquire().expect("slot available");
        assert_eq!(id.index(), 0);
    }

    #[rstest]
    fn release_resets_to_template(mut cache: DropletCache) {
        let id = cache.acquire().expect("slot available");
        let droplet = cache.get_mut(id).expect("acquired droplet");
        droplet.position = Vec3::splat(4.0);
        droplet.size = Vec3::splat(9.0);
        droplet.visible = true;
        droplet.anchored = false;
        droplet.weld = Some(crate::geometry::SurfaceId(7));
        assert!(cache.release(id));

        let again = cache.acquire().expect("slot available");
        assert_eq!(again.index(), id.index());
        assert_eq!(
            cache.get(again),
            Some(&DropletTemplate::default().instantiate())
        );
    }

    #[rstest]
    fn release_restores_a_custom_template() {
        let template = DropletTemplate {
            size: Vec3::new(0.2, 0.2, 0.8),
            transparency: 0.4,
        };
        let mut cache = DropletCache::new(1, template.clone());
        let id = cache.acquire().expect("slot available");
        if let Some(droplet) = cache.get_mut(id) {
            droplet.size = Vec3::ONE;
            droplet.transparency = 1.0;
        }
        assert!(cache.release(id));

        let again = cache.acquire().expect("slot available");
        assert_eq!(cache.get(again), Some(&template.instantiate()));
    }

    #[rstest]
    fn double_release_is_rejected(mut cache: DropletCache) {
        let id = cache.acquire().expect("slot available");
        assert!(cache.release(id));
        assert!(!cache.release(id));
        assert_eq!(cache.available(), 2);
    }

    #[rstest]
    fn stale_handles_do_not_resolve(mut cache: DropletCache) {
        let id = cache.acquire().expect("slot available");
        cache.release(id);
        let reused = cache.acquire().expect("slot available");
        assert_eq!(reused.index(), id.index());
        assert_ne!(reused, id);
        assert!(cache.get(id).is_none());
        assert!(!cache.release(id));
        assert!(cache.get(reused).is_some());
    }

    #[rstest]
    fn active_slots_lists_handed_out_droplets(mut cache: DropletCache) {
        let first = cache.acquire().expect("slot available");
        let second = cache.acquire().expect("slot available");
        cache.release(first);
        assert_eq!(cache.active_slots(), vec![second]);
    }

    #[rstest]
    fn dispose_reports_outstanding(mut cache: DropletCache) {
        cache.acquire();
        assert_eq!(cache.dispose(), 1);
    }
}
