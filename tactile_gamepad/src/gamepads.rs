// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The gamepad dispatcher: four logical slots over an unordered raw device list.

use tactile_core::{GamepadConfig, Result, SlotId};

use crate::pad::{Pad, PadChannel, PadEvent, PadSignals, check_dead_zone};
use crate::raw::{GamepadSource, RawGamepad};
use crate::slots::{MAX_PADS, SlotMap};

/// Identity of whatever occupied one raw list position at the last poll.
type Presence = Option<(usize, String)>;

/// Owns four [`Pad`]s and keeps them bound to the platform's raw devices.
///
/// Call [`Gamepads::update`] once per frame. It reads the raw list, rebinds
/// slots when the set of attached devices changed, and polls every bound pad.
/// Events from every pad are also raised on the dispatcher's own signals, so
/// one subscription here sees all controllers.
pub struct Gamepads {
    pads: [Pad; MAX_PADS],
    slots: SlotMap,
    presence: [Presence; MAX_PADS],
    enabled: bool,
    supported: bool,
    config: GamepadConfig,
    signals: PadSignals,
}

impl core::fmt::Debug for Gamepads {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Gamepads")
            .field("pads", &self.pads)
            .field("slots", &self.slots)
            .field("enabled", &self.enabled)
            .field("supported", &self.supported)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Gamepads {
    fn default() -> Self {
        Self::new(GamepadConfig::default())
    }
}

impl Gamepads {
    /// Create a dispatcher with four disconnected slots. It starts enabled.
    pub fn new(config: GamepadConfig) -> Self {
        Self {
            pads: core::array::from_fn(|slot| Pad::new(slot, &config)),
            slots: SlotMap::new(),
            presence: Default::default(),
            enabled: true,
            supported: false,
            config,
            signals: PadSignals::new(),
        }
    }

    /// Configuration the dispatcher was built with.
    pub fn config(&self) -> &GamepadConfig {
        &self.config
    }

    /// True while [`update`](Self::update) does work.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// True once a source has reported a device list.
    pub fn supported(&self) -> bool {
        self.supported
    }

    /// Resume polling. The next update reconciles from scratch.
    pub fn start(&mut self) {
        self.enabled = true;
        self.presence = Default::default();
    }

    /// Pause polling. Slot bindings and pad state are left as they are.
    pub fn stop(&mut self) {
        self.enabled = false;
    }

    /// Current slot mapping.
    pub fn slot_map(&self) -> &SlotMap {
        &self.slots
    }

    /// A logical slot. `None` outside `0..MAX_PADS`.
    pub fn pad(&self, slot: usize) -> Option<&Pad> {
        self.pads.get(slot)
    }

    /// A logical slot, mutably.
    pub fn pad_mut(&mut self, slot: usize) -> Option<&mut Pad> {
        self.pads.get_mut(slot)
    }

    /// All four slots in order.
    pub fn pads(&self) -> &[Pad] {
        &self.pads
    }

    /// Number of connected slots.
    pub fn pads_connected(&self) -> usize {
        self.pads.iter().filter(|p| p.connected()).count()
    }

    /// Set the dead zone of every slot. Out-of-range values leave every slot unchanged.
    pub fn set_dead_zones(&mut self, dead_zone: f64) -> Result<()> {
        check_dead_zone(dead_zone)?;
        self.config.dead_zone = dead_zone;
        for pad in &mut self.pads {
            pad.set_dead_zone(dead_zone)?;
        }
        Ok(())
    }

    /// Subscribe to connects on any slot.
    pub fn on_connect(&mut self, listener: impl FnMut(&mut (), &PadEvent) + 'static) -> SlotId {
        self.signals.subscribe(PadChannel::Connect, listener)
    }

    /// Subscribe to disconnects on any slot.
    pub fn on_disconnect(&mut self, listener: impl FnMut(&mut (), &PadEvent) + 'static) -> SlotId {
        self.signals.subscribe(PadChannel::Disconnect, listener)
    }

    /// Subscribe to button presses on any slot.
    pub fn on_down(&mut self, listener: impl FnMut(&mut (), &PadEvent) + 'static) -> SlotId {
        self.signals.subscribe(PadChannel::Down, listener)
    }

    /// Subscribe to button releases on any slot.
    pub fn on_up(&mut self, listener: impl FnMut(&mut (), &PadEvent) + 'static) -> SlotId {
        self.signals.subscribe(PadChannel::Up, listener)
    }

    /// Subscribe to analog button changes on any slot.
    pub fn on_float(&mut self, listener: impl FnMut(&mut (), &PadEvent) + 'static) -> SlotId {
        self.signals.subscribe(PadChannel::Float, listener)
    }

    /// Subscribe to axis changes on any slot.
    pub fn on_axis(&mut self, listener: impl FnMut(&mut (), &PadEvent) + 'static) -> SlotId {
        self.signals.subscribe(PadChannel::Axis, listener)
    }

    /// Access the dispatcher-wide signal table directly.
    pub fn signals_mut(&mut self) -> &mut PadSignals {
        &mut self.signals
    }

    /// Read the raw list, rebind slots if it changed, and poll every bound pad.
    pub fn update(&mut self, source: &mut impl GamepadSource, now: f64) {
        if !self.enabled {
            return;
        }
        let Some(list) = source.raw_gamepads() else {
            if self.supported || self.slots.bound() > 0 {
                tracing::debug!("gamepad source went away");
            }
            self.supported = false;
            self.refresh(&[]);
            return;
        };
        self.supported = true;
        let list = &list[..list.len().min(MAX_PADS)];

        if self.presence_changed(list) {
            self.refresh(list);
        }

        for (slot, raw_index) in self.slots.iter() {
            if let Some(raw) = list.iter().flatten().find(|r| r.index == raw_index) {
                self.pads[slot].poll_status(raw, now, &mut self.signals);
            }
        }
    }

    fn presence_changed(&self, list: &[Option<RawGamepad>]) -> bool {
        (0..MAX_PADS).any(|pos| {
            let now = list.get(pos).and_then(Option::as_ref);
            match (&self.presence[pos], now) {
                (None, None) => false,
                (Some((index, id)), Some(raw)) => *index != raw.index || *id != raw.id,
                _ => true,
            }
        })
    }

    fn refresh(&mut self, list: &[Option<RawGamepad>]) {
        // A raw index now reporting a different device is a new controller.
        let replaced: Vec<usize> = list
            .iter()
            .flatten()
            .filter(|raw| {
                self.presence
                    .iter()
                    .flatten()
                    .any(|(index, id)| *index == raw.index && *id != raw.id)
            })
            .map(|raw| raw.index)
            .collect();
        for raw_index in replaced {
            if let Some(slot) = self.slots.release(raw_index) {
                tracing::debug!(slot, raw_index, "gamepad replaced at same raw index");
                self.pads[slot].disconnect(&mut self.signals);
            }
        }

        for (pos, presence) in self.presence.iter_mut().enumerate() {
            *presence = list
                .get(pos)
                .and_then(Option::as_ref)
                .map(|raw| (raw.index, raw.id.clone()));
        }

        let present: Vec<usize> = list.iter().flatten().map(|raw| raw.index).collect();
        let result = self.slots.reconcile(&present);
        if result.disconnected.is_empty() && result.connected.is_empty() {
            self.slots = result.map;
            return;
        }
        tracing::debug!(
            disconnected = ?result.disconnected,
            connected = ?result.connected,
            "gamepad slots reconciled"
        );

        for &slot in &result.disconnected {
            self.pads[slot].disconnect(&mut self.signals);
        }
        for &(slot, raw_index) in &result.connected {
            if let Some(raw) = list.iter().flatten().find(|r| r.index == raw_index) {
                self.pads[slot].connect(raw, &mut self.signals);
            }
        }
        self.slots = result.map;
    }

    /// True if any connected pad holds `button`.
    pub fn is_down(&self, button: usize) -> bool {
        self.pads.iter().any(|p| p.is_down(button))
    }

    /// True if any connected pad pressed `button` within its window.
    pub fn just_pressed(&self, button: usize, now: f64) -> bool {
        self.pads.iter().any(|p| p.just_pressed(button, now))
    }

    /// True if any connected pad released `button` within its window.
    pub fn just_released(&self, button: usize, now: f64) -> bool {
        self.pads.iter().any(|p| p.just_released(button, now))
    }

    /// Release every button and center every axis on every slot.
    pub fn reset(&mut self, now: f64) {
        for pad in &mut self.pads {
            pad.reset(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawButton;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn device(index: usize) -> RawGamepad {
        let mut raw = RawGamepad::new(index, 16, 4);
        raw.id = format!("pad-{index}");
        raw
    }

    fn log_lifecycle(gamepads: &mut Gamepads) -> Rc<RefCell<Vec<PadEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        gamepads.on_connect(move |_, e| l.borrow_mut().push(*e));
        let l = log.clone();
        gamepads.on_disconnect(move |_, e| l.borrow_mut().push(*e));
        log
    }

    #[test]
    fn devices_bind_in_raw_order() {
        let mut gamepads = Gamepads::default();
        let log = log_lifecycle(&mut gamepads);
        let mut source = vec![Some(device(0)), None, Some(device(2))];
        gamepads.update(&mut source, 0.0);

        assert!(gamepads.supported());
        assert_eq!(gamepads.pads_connected(), 2);
        assert_eq!(gamepads.slot_map().raw_of(0), Some(0));
        assert_eq!(gamepads.slot_map().raw_of(1), Some(2));
        assert_eq!(
            *log.borrow(),
            vec![
                PadEvent::Connected { pad: 0, raw_index: 0 },
                PadEvent::Connected { pad: 1, raw_index: 2 },
            ]
        );
    }

    #[test]
    fn losing_a_device_disconnects_its_slot_once() {
        let mut gamepads = Gamepads::default();
        let mut source = vec![Some(device(0)), Some(device(2)), Some(device(1))];
        gamepads.update(&mut source, 0.0);
        assert_eq!(gamepads.slot_map().raw_of(2), Some(1));
        let log = log_lifecycle(&mut gamepads);

        source[2] = None;
        gamepads.update(&mut source, 1.0);
        gamepads.update(&mut source, 2.0);
        assert_eq!(*log.borrow(), vec![PadEvent::Disconnected { pad: 2 }]);
        assert!(!gamepads.pad(2).is_some_and(Pad::connected));
        assert_eq!(gamepads.pad(2).map(Pad::button_count), Some(0));

        // A new device takes the first free slot; persisting slots keep theirs.
        source[2] = Some(device(7));
        gamepads.update(&mut source, 3.0);
        assert_eq!(gamepads.slot_map().raw_of(0), Some(0));
        assert_eq!(gamepads.slot_map().raw_of(1), Some(2));
        assert_eq!(gamepads.slot_map().raw_of(2), Some(7));
        assert_eq!(
            log.borrow().last(),
            Some(&PadEvent::Connected { pad: 2, raw_index: 7 })
        );
    }

    #[test]
    fn device_swapped_at_the_same_raw_index_is_rebound() {
        let mut gamepads = Gamepads::default();
        let mut first = RawGamepad::new(0, 4, 2);
        first.id = "pad-a".to_owned();
        let mut source = vec![Some(first), Some(device(1))];
        gamepads.update(&mut source, 0.0);
        let log = log_lifecycle(&mut gamepads);

        let mut second = RawGamepad::new(0, 17, 4);
        second.id = "pad-b".to_owned();
        second.buttons[16] = RawButton::new(1.0);
        source[0] = Some(second);
        gamepads.update(&mut source, 1.0);

        assert_eq!(
            *log.borrow(),
            vec![
                PadEvent::Disconnected { pad: 0 },
                PadEvent::Connected { pad: 0, raw_index: 0 },
            ]
        );
        let pad = gamepads.pad(0).unwrap();
        assert_eq!(pad.id(), "pad-b");
        assert_eq!(pad.button_count(), 17);
        assert_eq!(pad.axis_count(), 4);
        assert!(pad.is_down(16));
        assert_eq!(gamepads.slot_map().raw_of(1), Some(1));

        gamepads.update(&mut source, 2.0);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn empty_list_disconnects_everything() {
        let mut gamepads = Gamepads::default();
        let mut source = vec![Some(device(0)), Some(device(1))];
        gamepads.update(&mut source, 0.0);
        let mut empty: Vec<Option<RawGamepad>> = Vec::new();
        gamepads.update(&mut empty, 1.0);
        assert_eq!(gamepads.pads_connected(), 0);
        assert!(gamepads.supported());
    }

    #[test]
    fn unsupported_source_reports_unsupported() {
        let mut gamepads = Gamepads::default();
        gamepads.update(&mut crate::NoGamepads, 0.0);
        assert!(!gamepads.supported());
        assert_eq!(gamepads.pads_connected(), 0);
    }

    #[test]
    fn buttons_aggregate_across_pads() {
        let mut gamepads = Gamepads::default();
        let downs = Rc::new(RefCell::new(Vec::new()));
        let d = downs.clone();
        gamepads.on_down(move |_, e| d.borrow_mut().push(*e));

        let mut source = vec![Some(device(0)), Some(device(1))];
        gamepads.update(&mut source, 0.0);
        if let Some(raw) = source[1].as_mut() {
            raw.buttons[0] = RawButton::new(1.0);
        }
        gamepads.update(&mut source, 100.0);

        assert!(gamepads.is_down(0));
        assert!(gamepads.just_pressed(0, 200.0));
        assert!(!gamepads.just_pressed(0, 400.0));
        assert!(!gamepads.is_down(1));
        assert_eq!(
            *downs.borrow(),
            vec![PadEvent::ButtonDown { pad: 1, button: 0, value: 1.0 }]
        );
    }

    #[test]
    fn stopped_dispatcher_ignores_updates() {
        let mut gamepads = Gamepads::default();
        gamepads.stop();
        let mut source = vec![Some(device(0))];
        gamepads.update(&mut source, 0.0);
        assert_eq!(gamepads.pads_connected(), 0);
        gamepads.start();
        gamepads.update(&mut source, 1.0);
        assert_eq!(gamepads.pads_connected(), 1);
    }

    #[test]
    fn dead_zone_applies_to_every_slot() {
        let mut gamepads = Gamepads::default();
        gamepads.set_dead_zones(0.5).unwrap();
        let mut source = vec![Some(device(0))];
        gamepads.update(&mut source, 0.0);
        if let Some(raw) = source[0].as_mut() {
            raw.axes[0] = 0.4;
        }
        gamepads.update(&mut source, 1.0);
        assert_eq!(gamepads.pad(0).and_then(|p| p.axis(0)), Some(0.0));
    }

    #[test]
    fn out_of_range_dead_zone_is_rejected() {
        let mut gamepads = Gamepads::default();
        for bad in [f64::NAN, 1.0, -0.1] {
            assert!(gamepads.set_dead_zones(bad).is_err());
        }
        assert_eq!(gamepads.config().dead_zone, 0.26);
        assert!(gamepads.pads().iter().all(|p| p.dead_zone() == 0.26));

        let mut pad = Pad::new(0, &GamepadConfig::default());
        assert_eq!(
            pad.set_dead_zone(1.5),
            Err(tactile_core::Error::InvalidDeadZone(1.5))
        );
        assert_eq!(pad.dead_zone(), 0.26);
    }
}
