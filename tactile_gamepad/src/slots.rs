// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Logical slot ↔ raw device index mapping.
//!
//! ## Why a separate structure
//!
//! Platforms hand out raw device indices in no particular order and reuse them
//! as controllers come and go. Game code wants "player 2's pad" to stay player
//! 2's pad. [`SlotMap`] is the bijection between the two, and
//! [`SlotMap::reconcile`] rebuilds it deterministically from the set of raw
//! indices currently present. It is a pure function so the matching rules can
//! be tested without any pads.
//!
//! ## Matching rules
//!
//! 1) A slot keeps its raw device if that raw index is still present.
//! 2) Every raw device not yet bound takes the first free slot, in raw-list order.
//! 3) A slot whose raw device vanished and that received nothing new is disconnected.
//!
//! A slot may lose its device and receive a different one in the same pass; it
//! then appears in both [`Reconciliation::disconnected`] and
//! [`Reconciliation::connected`]. Raw devices beyond [`MAX_PADS`] are ignored.

/// Number of logical slots.
pub const MAX_PADS: usize = 4;

/// Bijection from logical slot to raw device index.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct SlotMap {
    raw: [Option<usize>; MAX_PADS],
}

/// Result of [`SlotMap::reconcile`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Reconciliation {
    /// The rebuilt mapping.
    pub map: SlotMap,
    /// Slots that lost their previous raw device, in slot order.
    pub disconnected: Vec<usize>,
    /// `(slot, raw index)` pairs newly bound, in raw-list order.
    pub connected: Vec<(usize, usize)>,
}

impl SlotMap {
    /// An empty mapping.
    pub const fn new() -> Self {
        Self {
            raw: [None; MAX_PADS],
        }
    }

    /// Raw device bound to `slot`. Out-of-range slots read `None`.
    pub fn raw_of(&self, slot: usize) -> Option<usize> {
        self.raw.get(slot).copied().flatten()
    }

    /// Slot bound to raw device `raw`.
    pub fn slot_of(&self, raw: usize) -> Option<usize> {
        self.raw.iter().position(|r| *r == Some(raw))
    }

    /// Unbind the slot holding raw index `raw`. Returns the freed slot.
    pub fn release(&mut self, raw: usize) -> Option<usize> {
        let slot = self.slot_of(raw)?;
        self.raw[slot] = None;
        Some(slot)
    }

    /// Number of bound slots.
    pub fn bound(&self) -> usize {
        self.raw.iter().filter(|r| r.is_some()).count()
    }

    /// Iterate `(slot, raw index)` for every bound slot.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.raw
            .iter()
            .enumerate()
            .filter_map(|(slot, raw)| raw.map(|r| (slot, r)))
    }

    /// Rebuild the mapping for the raw indices in `present` (raw-list order).
    pub fn reconcile(&self, present: &[usize]) -> Reconciliation {
        let mut next = [None; MAX_PADS];
        let mut claimed: Vec<usize> = Vec::with_capacity(MAX_PADS);

        for (slot, raw) in self.iter() {
            if present.contains(&raw) && !claimed.contains(&raw) {
                next[slot] = Some(raw);
                claimed.push(raw);
            }
        }

        let mut connected = Vec::new();
        for &raw in present {
            if claimed.contains(&raw) {
                continue;
            }
            let Some(slot) = next.iter().position(Option::is_none) else {
                break;
            };
            next[slot] = Some(raw);
            claimed.push(raw);
            connected.push((slot, raw));
        }

        let disconnected = (0..MAX_PADS)
            .filter(|&slot| self.raw[slot].is_some() && self.raw[slot] != next[slot])
            .collect();

        Reconciliation {
            map: Self { raw: next },
            disconnected,
            connected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(raw: [Option<usize>; MAX_PADS]) -> SlotMap {
        SlotMap { raw }
    }

    #[test]
    fn first_devices_fill_slots_in_raw_order() {
        let r = SlotMap::new().reconcile(&[2, 0]);
        assert_eq!(r.map, map([Some(2), Some(0), None, None]));
        assert_eq!(r.connected, vec![(0, 2), (1, 0)]);
        assert!(r.disconnected.is_empty());
    }

    #[test]
    fn persisting_devices_keep_their_slots() {
        let before = map([Some(0), Some(2), Some(1), None]);
        let r = before.reconcile(&[0, 2]);
        assert_eq!(r.map, map([Some(0), Some(2), None, None]));
        assert_eq!(r.disconnected, vec![2]);
        assert!(r.connected.is_empty());

        let again = r.map.reconcile(&[0, 2, 3]);
        assert_eq!(again.map, map([Some(0), Some(2), Some(3), None]));
        assert_eq!(again.connected, vec![(2, 3)]);
        assert!(again.disconnected.is_empty());
    }

    #[test]
    fn empty_list_disconnects_everything() {
        let before = map([Some(0), None, Some(1), None]);
        let r = before.reconcile(&[]);
        assert_eq!(r.map, SlotMap::new());
        assert_eq!(r.disconnected, vec![0, 2]);
    }

    #[test]
    fn swapped_device_is_disconnect_then_connect() {
        let before = map([Some(0), None, None, None]);
        let r = before.reconcile(&[5]);
        assert_eq!(r.map, map([Some(5), None, None, None]));
        assert_eq!(r.disconnected, vec![0]);
        assert_eq!(r.connected, vec![(0, 5)]);
    }

    #[test]
    fn released_index_rebinds_to_first_free_slot() {
        let mut before = map([Some(3), Some(0), None, None]);
        assert_eq!(before.release(0), Some(1));
        assert_eq!(before.release(0), None);
        let r = before.reconcile(&[3, 0]);
        assert_eq!(r.map, map([Some(3), Some(0), None, None]));
        assert_eq!(r.connected, vec![(1, 0)]);
        assert!(r.disconnected.is_empty());
    }

    #[test]
    fn extra_devices_are_ignored() {
        let r = SlotMap::new().reconcile(&[0, 1, 2, 3, 4]);
        assert_eq!(r.map.bound(), MAX_PADS);
        assert_eq!(r.map.slot_of(4), None);
    }

    #[test]
    fn duplicate_raw_indices_bind_once() {
        let r = SlotMap::new().reconcile(&[1, 1]);
        assert_eq!(r.map, map([Some(1), None, None, None]));
    }

    #[test]
    fn out_of_range_slot_reads_none() {
        assert_eq!(SlotMap::new().raw_of(9), None);
    }
}
