// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Routes pointer contacts to bindings.
//!
//! ## Candidate selection
//!
//! For each pointer event the manager walks the registry twice:
//!
//! 1) Bindings without pixel-perfect tests are checked against the pointer
//!    with geometry only. Each one considered is marked `checked`.
//! 2) The remaining bindings (the pixel-perfect ones) are checked with full
//!    alpha sampling, but only if they could still beat the best candidate.
//!
//! A binding beats the current best if its priority is higher, or equal with
//! a later render order. Sampling is the expensive step, so the cheap pass
//! narrows the field first.
//!
//! The winner becomes the pointer's target. Changing targets raises out on the
//! old one and over on the new one.
//!
//! ## Capture
//!
//! A press that leaves a drag pending or active captures the pointer for that
//! binding until release. The captured binding sees every move, so drag
//! thresholds keep running after the pointer leaves the object and a
//! started drag follows the pointer wherever it goes.

use std::collections::BTreeMap;

use kurbo::Point;
use tactile_core::{Channel, EventTable, SlotId};

use crate::binding::InteractionBinding;
use crate::object::InteractiveObject;
use crate::pointer::{MAX_POINTERS, Pointer};
use crate::registry::{Registry, TargetId};

/// Where the manager finds bindings and their objects.
pub trait InteractiveWorld {
    /// The host's object type.
    type Object: InteractiveObject + ?Sized;

    /// The binding registered as `id` together with its object.
    fn binding_mut(
        &mut self,
        id: TargetId,
    ) -> Option<(&mut InteractionBinding<Self::Object>, &mut Self::Object)>;
}

impl<O: InteractiveObject> InteractiveWorld for BTreeMap<TargetId, (InteractionBinding<O>, O)> {
    type Object = O;

    fn binding_mut(&mut self, id: TargetId) -> Option<(&mut InteractionBinding<O>, &mut O)> {
        self.get_mut(&id).map(|(binding, obj)| (binding, obj))
    }
}

/// Manager-level signals, raised for presses no binding consumed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ManagerChannel {
    /// A pointer was pressed.
    Down,
    /// A pointer was released.
    Up,
}

impl Channel for ManagerChannel {
    const COUNT: usize = 2;
    fn index(self) -> usize {
        self as usize
    }
}

/// Payload of a manager signal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerInput {
    /// Pointer index.
    pub pointer: usize,
    /// Screen position.
    pub position: Point,
    /// Game time.
    pub time: f64,
}

/// Owns the pointer contacts and routes them to bindings.
pub struct PointerManager {
    pointers: [Pointer; MAX_POINTERS],
    scratch: Vec<TargetId>,
    last_camera: Point,
    signals: EventTable<ManagerChannel, PointerInput>,
}

impl core::fmt::Debug for PointerManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PointerManager")
            .field("pointers", &self.pointers)
            .field("last_camera", &self.last_camera)
            .finish_non_exhaustive()
    }
}

impl Default for PointerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerManager {
    /// Ten idle pointers.
    pub fn new() -> Self {
        Self {
            pointers: core::array::from_fn(Pointer::new),
            scratch: Vec::new(),
            last_camera: Point::ORIGIN,
            signals: EventTable::new(),
        }
    }

    /// A pointer. `None` outside `0..MAX_POINTERS`.
    pub fn pointer(&self, id: usize) -> Option<&Pointer> {
        self.pointers.get(id)
    }

    /// All pointers.
    pub fn pointers(&self) -> &[Pointer] {
        &self.pointers
    }

    /// Number of pointers that have received input.
    pub fn active_pointers(&self) -> usize {
        self.pointers.iter().filter(|p| p.active).count()
    }

    /// Return every pointer to idle. Bindings are not notified.
    pub fn reset(&mut self) {
        self.pointers = core::array::from_fn(Pointer::new);
    }

    /// Subscribe to presses no binding consumed.
    pub fn on_down(&mut self, listener: impl FnMut(&mut (), &PointerInput) + 'static) -> SlotId {
        self.signals.subscribe(ManagerChannel::Down, listener)
    }

    /// Subscribe to releases.
    pub fn on_up(&mut self, listener: impl FnMut(&mut (), &PointerInput) + 'static) -> SlotId {
        self.signals.subscribe(ManagerChannel::Up, listener)
    }

    /// A pointer moved to `position` (screen space).
    pub fn pointer_move<W: InteractiveWorld + ?Sized>(
        &mut self,
        world: &mut W,
        registry: &mut Registry,
        id: usize,
        position: Point,
    ) {
        let Some(pointer) = self.pointers.get_mut(id) else {
            return;
        };
        pointer.position = position;
        pointer.active = true;
        self.route(world, registry, id, false);
    }

    /// A pointer was pressed at `position`.
    ///
    /// Returns true if the pressed binding consumed the event; the manager's
    /// own down signal is skipped in that case.
    pub fn pointer_down<W: InteractiveWorld + ?Sized>(
        &mut self,
        world: &mut W,
        registry: &mut Registry,
        id: usize,
        position: Point,
    ) -> bool {
        if id >= MAX_POINTERS {
            return false;
        }
        let now = registry.time();
        {
            let pointer = &mut self.pointers[id];
            pointer.position = position;
            pointer.is_down = true;
            pointer.is_up = false;
            pointer.time_down = now;
            pointer.active = true;
            pointer.dirty = false;
        }
        self.route(world, registry, id, true);

        let pointer = &mut self.pointers[id];
        pointer.position_down = position;
        let mut consumed = false;
        if let Some(target) = pointer.target {
            if let Some((binding, obj)) = world.binding_mut(target) {
                consumed = binding.touched_handler(obj, registry, pointer);
                if binding.is_destroyed() {
                    pointer.target = None;
                } else if binding.pending_pointer() == Some(id)
                    || binding.dragged_pointer() == Some(id)
                {
                    pointer.capture = Some(target);
                }
            }
        }
        if !consumed {
            let input = PointerInput {
                pointer: id,
                position,
                time: now,
            };
            self.signals.emit(ManagerChannel::Down, &input);
        }
        consumed
    }

    /// A pointer was released at `position`. Every registered binding sees the
    /// release, so drags end even when the pointer left their object.
    pub fn pointer_up<W: InteractiveWorld + ?Sized>(
        &mut self,
        world: &mut W,
        registry: &mut Registry,
        id: usize,
        position: Point,
    ) {
        if id >= MAX_POINTERS {
            return;
        }
        let now = registry.time();
        let mut items = core::mem::take(&mut self.scratch);
        items.clear();
        items.extend_from_slice(registry.items());

        let pointer = &mut self.pointers[id];
        pointer.position = position;
        pointer.is_down = false;
        pointer.is_up = true;
        pointer.time_up = now;
        pointer.active = true;

        for &target in &items {
            if let Some((binding, obj)) = world.binding_mut(target) {
                binding.released_handler(obj, registry, pointer);
            }
        }
        let target = pointer.target.take();
        let capture = pointer.capture.take().filter(|&c| Some(c) != target);
        for extra in [target, capture].into_iter().flatten() {
            if !items.contains(&extra) {
                if let Some((binding, obj)) = world.binding_mut(extra) {
                    binding.released_handler(obj, registry, pointer);
                }
            }
        }
        self.scratch = items;

        let input = PointerInput {
            pointer: id,
            position,
            time: now,
        };
        self.signals.emit(ManagerChannel::Up, &input);
    }

    /// Per-frame pass.
    ///
    /// Pointers flagged dirty, or all active pointers after the camera moved,
    /// get their target recomputed. Bindings holding a pending drag for a
    /// still pointer are ticked so the time threshold can pass.
    pub fn update<W: InteractiveWorld + ?Sized>(&mut self, world: &mut W, registry: &mut Registry) {
        let camera = registry.camera();
        let panned = camera != self.last_camera;
        self.last_camera = camera;

        for id in 0..MAX_POINTERS {
            let (active, dirty, capture) = {
                let p = &mut self.pointers[id];
                if panned && p.active {
                    p.dirty = true;
                }
                (p.active, p.dirty, p.capture)
            };
            if !active {
                continue;
            }
            if dirty {
                self.route(world, registry, id, false);
                self.pointers[id].dirty = false;
            } else if let Some(capture) = capture {
                let pending = world
                    .binding_mut(capture)
                    .is_some_and(|(binding, _)| binding.pending_pointer() == Some(id));
                if pending {
                    self.follow_capture(world, registry, id);
                }
            }
        }
    }

    fn route<W: InteractiveWorld + ?Sized>(
        &mut self,
        world: &mut W,
        registry: &mut Registry,
        id: usize,
        from_click: bool,
    ) {
        if id >= MAX_POINTERS || self.follow_capture(world, registry, id) {
            return;
        }
        let pointer = &mut self.pointers[id];
        if let Some(target) = pointer.target {
            if let Some((binding, obj)) = world.binding_mut(target) {
                if binding.dragged_pointer() == Some(id) {
                    if !binding.update(obj, registry, pointer) {
                        pointer.target = None;
                    }
                    return;
                }
            }
        }
        if !registry.items().is_empty() {
            self.process_interactive(world, registry, id, from_click);
        }
    }

    /// Feed pointer `id` to the binding that captured it.
    ///
    /// Returns true when hover selection should be skipped: the binding drags
    /// with the pointer, or a listener destroyed it. A drag that starts here
    /// makes the binding the pointer's target.
    fn follow_capture<W: InteractiveWorld + ?Sized>(
        &mut self,
        world: &mut W,
        registry: &mut Registry,
        id: usize,
    ) -> bool {
        let pointer = &mut self.pointers[id];
        let Some(capture) = pointer.capture else {
            return false;
        };
        let Some((binding, obj)) = world.binding_mut(capture) else {
            pointer.capture = None;
            return false;
        };

        if binding.dragged_pointer() == Some(id) {
            if !binding.update(obj, registry, pointer) {
                pointer.capture = None;
                pointer.target = None;
            }
            return true;
        }
        if binding.pending_pointer() != Some(id) {
            pointer.capture = None;
            return false;
        }

        binding.update(obj, registry, pointer);
        if binding.is_destroyed() {
            pointer.capture = None;
            if pointer.target == Some(capture) {
                pointer.target = None;
            }
            return true;
        }
        if binding.dragged_pointer() != Some(id) {
            return false;
        }
        tracing::trace!(pointer = id, target = capture.0, "captured drag started");
        if let Some(previous) = pointer.target.replace(capture) {
            if previous != capture {
                if let Some((binding, obj)) = world.binding_mut(previous) {
                    binding.pointer_out_handler(obj, registry, pointer, false);
                }
            }
        }
        true
    }

    fn process_interactive<W: InteractiveWorld + ?Sized>(
        &mut self,
        world: &mut W,
        registry: &mut Registry,
        id: usize,
        from_click: bool,
    ) {
        let mut items = core::mem::take(&mut self.scratch);
        items.clear();
        items.extend_from_slice(registry.items());
        let pointer = &mut self.pointers[id];

        let mut highest_priority = i32::MIN;
        let mut highest_render = 0_u32;
        let mut candidate = None;

        for &target in &items {
            let Some((binding, obj)) = world.binding_mut(target) else {
                continue;
            };
            binding.checked = false;
            if binding.valid_for_input(obj, registry, highest_priority, highest_render, false) {
                binding.checked = true;
                let hit = if from_click {
                    binding.check_pointer_down(obj, registry, pointer, true)
                } else {
                    binding.check_pointer_over(obj, registry, pointer, true)
                };
                if hit {
                    highest_priority = binding.priority();
                    highest_render = obj.render_order();
                    candidate = Some(target);
                }
            }
        }

        for &target in &items {
            let Some((binding, obj)) = world.binding_mut(target) else {
                continue;
            };
            if binding.checked
                || !binding.valid_for_input(obj, registry, highest_priority, highest_render, true)
            {
                continue;
            }
            let hit = if from_click {
                binding.check_pointer_down(obj, registry, pointer, false)
            } else {
                binding.check_pointer_over(obj, registry, pointer, false)
            };
            if hit {
                highest_priority = binding.priority();
                highest_render = obj.render_order();
                candidate = Some(target);
            }
        }
        self.scratch = items;

        match (pointer.target, candidate) {
            (None, None) => {}
            (Some(current), None) => {
                pointer.target = None;
                if let Some((binding, obj)) = world.binding_mut(current) {
                    binding.pointer_out_handler(obj, registry, pointer, false);
                }
            }
            (None, Some(next)) => {
                pointer.target = Some(next);
                if let Some((binding, obj)) = world.binding_mut(next) {
                    binding.pointer_over_handler(obj, registry, pointer, false);
                }
            }
            (Some(current), Some(next)) if current == next => {
                if let Some((binding, obj)) = world.binding_mut(current) {
                    if !binding.update(obj, registry, pointer) {
                        pointer.target = None;
                    }
                }
            }
            (Some(current), Some(next)) => {
                tracing::trace!(pointer = id, from = current.0, to = next.0, "pointer target changed");
                if let Some((binding, obj)) = world.binding_mut(current) {
                    binding.pointer_out_handler(obj, registry, pointer, false);
                }
                pointer.target = Some(next);
                if let Some((binding, obj)) = world.binding_mut(next) {
                    binding.pointer_over_handler(obj, registry, pointer, false);
                }
            }
        }

        if let Some(target) = pointer.target {
            let gone = match world.binding_mut(target) {
                Some((binding, _)) => binding.is_destroyed(),
                None => true,
            };
            if gone {
                pointer.target = None;
            }
        }
    }
}
