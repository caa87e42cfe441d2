// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-object pointer interaction.
//!
//! ## Machines
//!
//! Each binding runs, per pointer, a hover machine (`out ⇄ over`) and a press
//! machine (`up ⇄ down`), recorded in a [`ContactRecord`]. Overlaid on the
//! press machine is one drag machine for the whole binding:
//!
//! ```text
//! idle ──press──▶ pending ──distance and time gates──▶ dragging ──release──▶ idle
//!   └───────────press, no thresholds───────────────────────▲
//! ```
//!
//! Every transition raises its signal exactly once.
//!
//! ## Reentrancy
//!
//! Listeners receive the object itself and may move or destroy it. After each
//! dispatch the binding checks [`InteractiveObject::is_alive`]; a dead object
//! makes the binding destroy itself and abandon the rest of the transition.

use kurbo::{Point, Rect, Vec2};
use tactile_core::time::within;
use tactile_core::{Channel, Error, EventTable, PointerConfig, Result, SlotId};

use crate::object::{Capabilities, InteractiveObject};
use crate::pointer::{MAX_POINTERS, Pointer};
use crate::registry::{CursorStyle, Registry, TargetId};
use crate::state::{ContactRecord, DragBounds, DragOptions, DragState, SnapConfig};

/// Signals raised by an [`InteractionBinding`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PointerChannel {
    /// A pointer started hovering.
    Over,
    /// A pointer stopped hovering.
    Out,
    /// A pointer pressed the object.
    Down,
    /// A pointer that pressed the object was released.
    Up,
    /// A drag started.
    DragStart,
    /// A dragged object moved.
    DragUpdate,
    /// A drag ended.
    DragStop,
}

impl Channel for PointerChannel {
    const COUNT: usize = 7;
    fn index(self) -> usize {
        self as usize
    }
}

/// Payload of a binding signal.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PointerEvent {
    /// Hover started.
    Over {
        /// Pointer index.
        pointer: usize,
    },
    /// Hover ended.
    Out {
        /// Pointer index.
        pointer: usize,
    },
    /// Press.
    Down {
        /// Pointer index.
        pointer: usize,
    },
    /// Release.
    Up {
        /// Pointer index.
        pointer: usize,
        /// The pointer was still over the object when released.
        is_over: bool,
    },
    /// Drag started.
    DragStart {
        /// Pointer index.
        pointer: usize,
        /// Object position before the drag moved it.
        start: Point,
    },
    /// Drag step.
    DragUpdate {
        /// Pointer index.
        pointer: usize,
        /// Position requested by the pointer, before locks, bounds, and snapping.
        target: Point,
        /// Last snapped position.
        snap: Point,
        /// True for the step that starts the drag.
        from_start: bool,
    },
    /// Drag ended.
    DragStop {
        /// Pointer index.
        pointer: usize,
    },
}

impl PointerEvent {
    /// Channel this event is raised on.
    pub fn channel(&self) -> PointerChannel {
        match self {
            Self::Over { .. } => PointerChannel::Over,
            Self::Out { .. } => PointerChannel::Out,
            Self::Down { .. } => PointerChannel::Down,
            Self::Up { .. } => PointerChannel::Up,
            Self::DragStart { .. } => PointerChannel::DragStart,
            Self::DragUpdate { .. } => PointerChannel::DragUpdate,
            Self::DragStop { .. } => PointerChannel::DragStop,
        }
    }
}

/// Binds one interactive object to the pointer layer.
///
/// The binding keeps no reference to its object or to the [`Registry`]; both
/// are passed in on every call. Listeners receive `&mut O`.
pub struct InteractionBinding<O: ?Sized> {
    id: TargetId,
    enabled: bool,
    was_enabled: bool,
    destroyed: bool,
    priority: i32,
    use_hand_cursor: bool,
    hand_cursor_set: bool,
    pub(crate) checked: bool,
    pixel_perfect_over: bool,
    pixel_perfect_click: bool,
    pixel_perfect_alpha: u8,
    consume_pointer_event: bool,
    drag_stop_blocks_input_up: bool,
    draggable: bool,
    allow_horizontal_drag: bool,
    allow_vertical_drag: bool,
    drag_from_center: bool,
    bring_to_top: bool,
    drag_offset: Vec2,
    drag_distance_threshold: f64,
    drag_time_threshold: f64,
    just_window: f64,
    bounds: Option<DragBounds>,
    snap: SnapConfig,
    snap_point: Point,
    down_point: Point,
    contacts: Vec<ContactRecord>,
    drag: DragState,
    signals: EventTable<PointerChannel, PointerEvent, O>,
}

impl<O: ?Sized> core::fmt::Debug for InteractionBinding<O> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InteractionBinding")
            .field("id", &self.id)
            .field("enabled", &self.enabled)
            .field("destroyed", &self.destroyed)
            .field("priority", &self.priority)
            .field("draggable", &self.draggable)
            .field("drag", &self.drag)
            .field("snap", &self.snap)
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

fn clamp_position<O: InteractiveObject + ?Sized>(obj: &mut O, limit: Rect) {
    let b = obj.bounds();
    let mut pos = obj.position();
    let anchor = pos - b.origin();
    if b.x0 < limit.x0 {
        pos.x = limit.x0 + anchor.x;
    } else if b.x1 > limit.x1 {
        pos.x = limit.x1 - (b.width() - anchor.x);
    }
    if b.y0 < limit.y0 {
        pos.y = limit.y0 + anchor.y;
    } else if b.y1 > limit.y1 {
        pos.y = limit.y1 - (b.height() - anchor.y);
    }
    obj.set_position(pos);
}

fn clamp_camera_offset<O: InteractiveObject + ?Sized>(obj: &mut O, limit: Rect) {
    let b = obj.bounds();
    let mut off = obj.camera_offset();
    if off.x < limit.x0 {
        off.x = limit.x0;
    } else if off.x + b.width() > limit.x1 {
        off.x = limit.x1 - b.width();
    }
    if off.y < limit.y0 {
        off.y = limit.y0;
    } else if off.y + b.height() > limit.y1 {
        off.y = limit.y1 - b.height();
    }
    obj.set_camera_offset(off);
}

impl<O: InteractiveObject + ?Sized> InteractionBinding<O> {
    /// A disabled binding. Call [`start`](Self::start) to make it interactive.
    pub fn new(id: TargetId, config: &PointerConfig) -> Self {
        Self {
            id,
            enabled: false,
            was_enabled: false,
            destroyed: false,
            priority: 0,
            use_hand_cursor: false,
            hand_cursor_set: false,
            checked: false,
            pixel_perfect_over: false,
            pixel_perfect_click: false,
            pixel_perfect_alpha: config.pixel_perfect_alpha,
            consume_pointer_event: false,
            drag_stop_blocks_input_up: false,
            draggable: false,
            allow_horizontal_drag: true,
            allow_vertical_drag: true,
            drag_from_center: false,
            bring_to_top: false,
            drag_offset: Vec2::ZERO,
            drag_distance_threshold: config.drag_distance_threshold,
            drag_time_threshold: config.drag_time_threshold,
            just_window: config.just_window,
            bounds: None,
            snap: SnapConfig::default(),
            snap_point: Point::ORIGIN,
            down_point: Point::ORIGIN,
            contacts: Vec::new(),
            drag: DragState::default(),
            signals: EventTable::new(),
        }
    }

    // --- lifecycle ---

    /// Identifier in the registry.
    pub fn id(&self) -> TargetId {
        self.id
    }

    /// True while registered for input.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// True once [`destroy`](Self::destroy) ran. Destroyed bindings ignore every call.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Input priority; higher wins over lower regardless of paint order.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Change the input priority.
    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    /// Register for input and reset every contact record.
    ///
    /// Does nothing while already enabled.
    pub fn start(&mut self, registry: &mut Registry, priority: i32, use_hand_cursor: bool) {
        if self.destroyed || self.enabled {
            return;
        }
        registry.add(self.id);
        self.priority = priority;
        self.use_hand_cursor = use_hand_cursor;
        self.contacts = (0..MAX_POINTERS).map(ContactRecord::new).collect();
        self.enabled = true;
        self.was_enabled = true;
        self.checked = false;
        tracing::debug!(target_id = self.id.0, priority, "binding started");
    }

    /// Deregister from input, dropping hover and drag state without raising signals.
    ///
    /// Does nothing while already stopped.
    pub fn stop(&mut self, registry: &mut Registry) {
        if self.destroyed || !self.enabled {
            return;
        }
        self.enabled = false;
        registry.remove(self.id);
        self.abandon_interaction(registry);
        tracing::debug!(target_id = self.id.0, "binding stopped");
    }

    /// Deregister for good and release shared resources. Irreversible.
    pub fn destroy(&mut self, registry: &mut Registry) {
        if self.destroyed {
            return;
        }
        if self.hand_cursor_set {
            registry.set_cursor(CursorStyle::Default);
            self.hand_cursor_set = false;
        }
        self.enabled = false;
        self.destroyed = true;
        registry.remove(self.id);
        self.contacts.clear();
        self.bounds = None;
        self.drag = DragState::default();
        tracing::debug!(target_id = self.id.0, "binding destroyed");
    }

    /// Disable, return every contact record to its idle state, and drop any
    /// pending or active drag. Raises no signal.
    ///
    /// Registration is left to the caller; a later [`start`](Self::start)
    /// picks up where it left off.
    pub fn reset(&mut self, registry: &mut Registry) {
        self.enabled = false;
        self.checked = false;
        self.abandon_interaction(registry);
        self.drag = DragState::default();
        for (id, c) in self.contacts.iter_mut().enumerate() {
            *c = ContactRecord::new(id);
        }
    }

    /// The object was attached to a parent. Restores a binding that was
    /// enabled when the object was detached.
    pub fn added_to_group(&mut self, registry: &mut Registry) {
        if self.drag.raising {
            return;
        }
        if self.was_enabled && !self.enabled {
            self.start(registry, self.priority, self.use_hand_cursor);
        }
    }

    /// The object was detached from its parent. Stops the binding and
    /// remembers whether it was enabled.
    pub fn removed_from_group(&mut self, registry: &mut Registry) {
        if self.drag.raising {
            return;
        }
        if self.enabled {
            self.was_enabled = true;
            self.stop(registry);
        } else {
            self.was_enabled = false;
        }
    }

    fn abandon_interaction(&mut self, registry: &mut Registry) {
        for c in &mut self.contacts {
            c.set_over(false);
            c.is_dragged = false;
        }
        self.drag.pending = None;
        self.drag.timer.cancel();
        self.drag.pointer = None;
        self.drag.raising = false;
        if self.hand_cursor_set {
            registry.set_cursor(CursorStyle::Default);
            self.hand_cursor_set = false;
        }
    }

    // --- signals ---

    /// Subscribe to a channel.
    pub fn on(
        &mut self,
        channel: PointerChannel,
        listener: impl FnMut(&mut O, &PointerEvent) + 'static,
    ) -> SlotId {
        self.signals.subscribe(channel, listener)
    }

    /// Subscribe to hover starts.
    pub fn on_over(&mut self, listener: impl FnMut(&mut O, &PointerEvent) + 'static) -> SlotId {
        self.on(PointerChannel::Over, listener)
    }

    /// Subscribe to hover ends.
    pub fn on_out(&mut self, listener: impl FnMut(&mut O, &PointerEvent) + 'static) -> SlotId {
        self.on(PointerChannel::Out, listener)
    }

    /// Subscribe to presses.
    pub fn on_down(&mut self, listener: impl FnMut(&mut O, &PointerEvent) + 'static) -> SlotId {
        self.on(PointerChannel::Down, listener)
    }

    /// Subscribe to releases.
    pub fn on_up(&mut self, listener: impl FnMut(&mut O, &PointerEvent) + 'static) -> SlotId {
        self.on(PointerChannel::Up, listener)
    }

    /// Subscribe to drag starts.
    pub fn on_drag_start(
        &mut self,
        listener: impl FnMut(&mut O, &PointerEvent) + 'static,
    ) -> SlotId {
        self.on(PointerChannel::DragStart, listener)
    }

    /// Subscribe to drag steps.
    pub fn on_drag_update(
        &mut self,
        listener: impl FnMut(&mut O, &PointerEvent) + 'static,
    ) -> SlotId {
        self.on(PointerChannel::DragUpdate, listener)
    }

    /// Subscribe to drag ends.
    pub fn on_drag_stop(
        &mut self,
        listener: impl FnMut(&mut O, &PointerEvent) + 'static,
    ) -> SlotId {
        self.on(PointerChannel::DragStop, listener)
    }

    /// Access the signal table directly.
    pub fn signals_mut(&mut self) -> &mut EventTable<PointerChannel, PointerEvent, O> {
        &mut self.signals
    }

    /// Dispatch, then check the object survived the listeners.
    fn emit(&mut self, obj: &mut O, registry: &mut Registry, event: PointerEvent) -> bool {
        self.signals.dispatch(event.channel(), obj, &event);
        if obj.is_alive() {
            true
        } else {
            self.destroy(registry);
            false
        }
    }

    // --- options ---

    /// Show a hand cursor while hovered.
    pub fn set_use_hand_cursor(&mut self, use_hand_cursor: bool) {
        self.use_hand_cursor = use_hand_cursor;
    }

    /// Use alpha sampling for hover and/or press tests.
    pub fn set_pixel_perfect(&mut self, over: bool, click: bool, alpha: u8) {
        self.pixel_perfect_over = over;
        self.pixel_perfect_click = click;
        self.pixel_perfect_alpha = alpha;
    }

    /// True if either hover or press uses alpha sampling.
    pub fn is_pixel_perfect(&self) -> bool {
        self.pixel_perfect_over || self.pixel_perfect_click
    }

    /// Report presses on this object as consumed to the pointer manager.
    pub fn set_consume_pointer_event(&mut self, consume: bool) {
        self.consume_pointer_event = consume;
    }

    /// Suppress the up signal for the release that ends a drag.
    pub fn set_drag_stop_blocks_input_up(&mut self, blocks: bool) {
        self.drag_stop_blocks_input_up = blocks;
    }

    /// Make the object draggable.
    ///
    /// Returns false, leaving the binding unchanged, if the object lacks
    /// [`Capabilities::DRAG`].
    pub fn enable_drag(&mut self, obj: &O, options: DragOptions) -> bool {
        if !obj.capabilities().contains(Capabilities::DRAG) {
            tracing::warn!(target_id = self.id.0, "drag requested on an object that cannot be dragged");
            return false;
        }
        self.draggable = true;
        self.drag.drag_point = Vec2::ZERO;
        self.drag_offset = Vec2::ZERO;
        self.drag_from_center = options.lock_center;
        self.bring_to_top = options.bring_to_top;
        self.pixel_perfect_click = options.pixel_perfect;
        self.pixel_perfect_alpha = options.alpha_threshold;
        if options.bounds.is_some() {
            self.bounds = options.bounds;
        }
        true
    }

    /// Stop any drag in progress and make the object undraggable. Raises no signal.
    pub fn disable_drag(&mut self) {
        for c in &mut self.contacts {
            c.is_dragged = false;
        }
        self.draggable = false;
        self.drag.pointer = None;
        self.drag.pending = None;
        self.drag.timer.cancel();
    }

    /// True if [`enable_drag`](Self::enable_drag) succeeded and drag is not disabled.
    pub fn draggable(&self) -> bool {
        self.draggable
    }

    /// Allow or forbid movement along each axis while dragging.
    pub fn set_drag_lock(&mut self, allow_horizontal: bool, allow_vertical: bool) {
        self.allow_horizontal_drag = allow_horizontal;
        self.allow_vertical_drag = allow_vertical;
    }

    /// Shift the dragged position relative to the pointer.
    pub fn set_drag_offset(&mut self, offset: Vec2) {
        self.drag_offset = offset;
    }

    /// Current drag offset.
    pub fn drag_offset(&self) -> Vec2 {
        self.drag_offset
    }

    /// Gates a press must pass before the drag starts.
    pub fn set_drag_thresholds(&mut self, distance: f64, time: f64) -> Result<()> {
        if !(distance.is_finite() && distance >= 0.0) {
            return Err(Error::InvalidDragDistance(distance));
        }
        if !(time.is_finite() && time >= 0.0) {
            return Err(Error::InvalidDragTime(time));
        }
        self.drag_distance_threshold = distance;
        self.drag_time_threshold = time;
        Ok(())
    }

    /// Keep the dragged object inside `bounds`, or remove the limit.
    pub fn set_bounds(&mut self, bounds: Option<DragBounds>) {
        self.bounds = bounds;
    }

    /// Snap to a `width` by `height` grid while dragging and/or on release.
    pub fn enable_snap(
        &mut self,
        width: f64,
        height: f64,
        on_drag: bool,
        on_release: bool,
        offset: Vec2,
    ) -> Result<()> {
        self.snap = SnapConfig::new(width, height, on_drag, on_release)?.with_offset(offset);
        Ok(())
    }

    /// Turn both snap modes off. The grid is kept.
    pub fn disable_snap(&mut self) {
        self.snap.on_drag = false;
        self.snap.on_release = false;
    }

    /// Current snapping.
    pub fn snap(&self) -> &SnapConfig {
        &self.snap
    }

    /// Last position produced by snap-on-drag.
    pub fn snap_point(&self) -> Point {
        self.snap_point
    }

    /// Object position when the last drag started.
    pub fn drag_start_point(&self) -> Point {
        self.drag.start_point
    }

    /// Screen position of the last press.
    pub fn down_point(&self) -> Point {
        self.down_point
    }

    // --- queries ---

    /// Drag progress.
    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// True while a pointer drags the object.
    pub fn is_dragged(&self) -> bool {
        self.drag.is_dragged()
    }

    /// The pointer dragging the object.
    pub fn dragged_pointer(&self) -> Option<usize> {
        self.drag.pointer
    }

    /// True while a press waits for the drag thresholds.
    pub fn has_pending_drag(&self) -> bool {
        self.drag.pending.is_some()
    }

    /// The pointer whose press waits for the drag thresholds.
    pub fn pending_pointer(&self) -> Option<usize> {
        self.drag.pending
    }

    /// The contact record of `pointer`.
    pub fn contact(&self, pointer: usize) -> Option<&ContactRecord> {
        self.contacts.get(pointer)
    }

    /// Pointer position relative to the object, as of the last hover update.
    pub fn pointer_position(&self, pointer: usize) -> Option<Point> {
        self.contact(pointer).map(|c| c.position)
    }

    /// Horizontal part of [`pointer_position`](Self::pointer_position).
    pub fn pointer_x(&self, pointer: usize) -> Option<f64> {
        self.pointer_position(pointer).map(|p| p.x)
    }

    /// Vertical part of [`pointer_position`](Self::pointer_position).
    pub fn pointer_y(&self, pointer: usize) -> Option<f64> {
        self.pointer_position(pointer).map(|p| p.y)
    }

    /// Pressed by `pointer`.
    pub fn pointer_down(&self, pointer: usize) -> bool {
        self.contact(pointer).is_some_and(|c| c.is_down)
    }

    /// Not pressed by `pointer`.
    pub fn pointer_up(&self, pointer: usize) -> bool {
        self.contact(pointer).is_some_and(|c| c.is_up)
    }

    /// Hovered by `pointer`.
    pub fn pointer_over(&self, pointer: usize) -> bool {
        self.contact(pointer).is_some_and(|c| c.is_over)
    }

    /// Not hovered by `pointer`.
    pub fn pointer_out(&self, pointer: usize) -> bool {
        self.contact(pointer).is_some_and(|c| c.is_out)
    }

    /// Dragged by `pointer`.
    pub fn pointer_dragged(&self, pointer: usize) -> bool {
        self.contact(pointer).is_some_and(|c| c.is_dragged)
    }

    /// Game time `pointer` last pressed the object.
    pub fn pointer_time_down(&self, pointer: usize) -> Option<f64> {
        self.contact(pointer).map(|c| c.time_down)
    }

    /// Game time `pointer` last released the object.
    pub fn pointer_time_up(&self, pointer: usize) -> Option<f64> {
        self.contact(pointer).map(|c| c.time_up)
    }

    /// Game time `pointer` last started hovering.
    pub fn pointer_time_over(&self, pointer: usize) -> Option<f64> {
        self.contact(pointer).map(|c| c.time_over)
    }

    /// Game time `pointer` last stopped hovering.
    pub fn pointer_time_out(&self, pointer: usize) -> Option<f64> {
        self.contact(pointer).map(|c| c.time_out)
    }

    /// Milliseconds `pointer` has hovered, or -1 when it is not hovering.
    pub fn over_duration(&self, pointer: usize, now: f64) -> f64 {
        match self.contact(pointer) {
            Some(c) if c.is_over => now - c.time_over,
            _ => -1.0,
        }
    }

    /// Milliseconds `pointer` has pressed, or -1 when it is not pressing.
    pub fn down_duration(&self, pointer: usize, now: f64) -> f64 {
        match self.contact(pointer) {
            Some(c) if c.is_down => now - c.time_down,
            _ => -1.0,
        }
    }

    /// Hover started within the configured window.
    pub fn just_over(&self, pointer: usize, now: f64) -> bool {
        self.just_over_within(pointer, self.just_window, now)
    }

    /// Hover started less than `window` ms ago.
    pub fn just_over_within(&self, pointer: usize, window: f64, now: f64) -> bool {
        self.contact(pointer)
            .is_some_and(|c| c.is_over && within(now, c.time_over, window))
    }

    /// Hover ended within the configured window.
    pub fn just_out(&self, pointer: usize, now: f64) -> bool {
        self.just_out_within(pointer, self.just_window, now)
    }

    /// Hover ended less than `window` ms ago.
    pub fn just_out_within(&self, pointer: usize, window: f64, now: f64) -> bool {
        self.contact(pointer)
            .is_some_and(|c| c.is_out && within(now, c.time_out, window))
    }

    /// Pressed within the configured window.
    pub fn just_pressed(&self, pointer: usize, now: f64) -> bool {
        self.just_pressed_within(pointer, self.just_window, now)
    }

    /// Pressed less than `window` ms ago.
    pub fn just_pressed_within(&self, pointer: usize, window: f64, now: f64) -> bool {
        self.contact(pointer)
            .is_some_and(|c| c.is_down && within(now, c.time_down, window))
    }

    /// Released within the configured window.
    pub fn just_released(&self, pointer: usize, now: f64) -> bool {
        self.just_released_within(pointer, self.just_window, now)
    }

    /// Released less than `window` ms ago.
    pub fn just_released_within(&self, pointer: usize, window: f64, now: f64) -> bool {
        self.contact(pointer)
            .is_some_and(|c| c.is_up && within(now, c.time_up, window))
    }

    // --- hit testing ---

    /// Whether this binding beats the best candidate found so far.
    pub fn valid_for_input(
        &self,
        obj: &O,
        registry: &Registry,
        highest_priority: i32,
        highest_render_order: u32,
        include_pixel_perfect: bool,
    ) -> bool {
        let scale = obj.world_scale();
        if !self.enabled
            || self.destroyed
            || scale.x == 0.0
            || scale.y == 0.0
            || self.priority < registry.min_priority()
            || obj.ignore_child_input()
        {
            return false;
        }
        if !include_pixel_perfect && self.is_pixel_perfect() {
            return false;
        }
        self.priority > highest_priority
            || (self.priority == highest_priority && obj.render_order() > highest_render_order)
    }

    fn hit_testable(&self, obj: &O) -> bool {
        let scale = obj.world_scale();
        self.enabled
            && !self.destroyed
            && obj.visible()
            && obj.parent_visible()
            && scale.x != 0.0
            && scale.y != 0.0
    }

    /// The pointer in the space the object's transform maps into.
    fn pointer_in_object_space(obj: &O, registry: &Registry, pointer: &Pointer) -> Point {
        if obj.capabilities().contains(Capabilities::FIXED_TO_CAMERA) {
            pointer.position
        } else {
            pointer.world_position(registry.camera())
        }
    }

    fn local_point(obj: &O, registry: &Registry, pointer: &Pointer) -> Point {
        obj.world_transform().inverse() * Self::pointer_in_object_space(obj, registry, pointer)
    }

    fn hit_point(obj: &O, registry: &Registry, pointer: &Pointer) -> Option<Point> {
        let local = Self::local_point(obj, registry, pointer);
        obj.local_bounds().contains(local).then_some(local)
    }

    /// Geometric (and, unless `fast`, pixel) test for hovering.
    pub fn check_pointer_over(
        &self,
        obj: &O,
        registry: &mut Registry,
        pointer: &Pointer,
        fast: bool,
    ) -> bool {
        if !self.hit_testable(obj) {
            return false;
        }
        match Self::hit_point(obj, registry, pointer) {
            Some(local) if !fast && self.pixel_perfect_over => {
                self.pixel_hit(obj, registry, local)
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Geometric (and, unless `fast`, pixel) test for pressing.
    pub fn check_pointer_down(
        &self,
        obj: &O,
        registry: &mut Registry,
        pointer: &Pointer,
        fast: bool,
    ) -> bool {
        if !pointer.is_down || !self.hit_testable(obj) {
            return false;
        }
        match Self::hit_point(obj, registry, pointer) {
            Some(local) if !fast && self.pixel_perfect_click => {
                self.pixel_hit(obj, registry, local)
            }
            Some(_) => true,
            None => false,
        }
    }

    /// Sample the texel under `pointer` and compare it to the alpha threshold.
    pub fn check_pixel(&self, obj: &O, registry: &mut Registry, pointer: &Pointer) -> bool {
        let local = Self::local_point(obj, registry, pointer);
        self.pixel_hit(obj, registry, local)
    }

    fn pixel_hit(&self, obj: &O, registry: &mut Registry, local: Point) -> bool {
        if !obj.capabilities().contains(Capabilities::PIXEL_SOURCE) {
            return false;
        }
        let Some(tex) = obj.texture_frame() else {
            return false;
        };
        let mut x = local.x + tex.frame.width() * tex.anchor.x + tex.frame.x0;
        let mut y = local.y + tex.frame.height() * tex.anchor.y + tex.frame.y0;
        if let Some(trim) = tex.trim {
            x -= trim.x;
            y -= trim.y;
        }
        if obj.capabilities().contains(Capabilities::CROP)
            && (x < tex.crop.x0 || x > tex.crop.x1 || y < tex.crop.y0 || y > tex.crop.y1)
        {
            return false;
        }
        registry
            .sampler_mut()
            .sample_alpha(tex.source, x, y)
            .is_some_and(|alpha| alpha >= self.pixel_perfect_alpha)
    }

    fn relative_position(obj: &O, registry: &Registry, pointer: &Pointer) -> Point {
        (Self::pointer_in_object_space(obj, registry, pointer) - obj.position()).to_point()
    }

    // --- transitions ---

    /// Re-evaluate `pointer` against the object. Returns whether the pointer
    /// is still engaged with it.
    pub fn update(&mut self, obj: &mut O, registry: &mut Registry, pointer: &Pointer) -> bool {
        if self.destroyed {
            return false;
        }
        if !self.enabled || !obj.visible() || !obj.parent_visible() {
            self.pointer_out_handler(obj, registry, pointer, false);
            return false;
        }

        if self.drag.pending == Some(pointer.id) {
            if !self.drag.distance_passed {
                self.drag.distance_passed = pointer.position.distance(self.drag.press_point)
                    >= self.drag_distance_threshold;
            }
            if !self.drag.time_passed && self.drag.timer.poll(registry.time()) {
                self.drag.time_passed = true;
            }
            if self.drag.distance_passed && self.drag.time_passed {
                self.start_drag(obj, registry, pointer);
            }
            return !self.destroyed;
        }

        if self.draggable && self.drag.pointer == Some(pointer.id) {
            return self.update_drag(obj, registry, pointer, false);
        }

        if !self.pointer_over(pointer.id) {
            return false;
        }
        if self.check_pointer_over(obj, registry, pointer, false) {
            let position = Self::relative_position(obj, registry, pointer);
            if let Some(c) = self.contacts.get_mut(pointer.id) {
                c.position = position;
            }
            true
        } else {
            self.pointer_out_handler(obj, registry, pointer, false);
            false
        }
    }

    /// Mark `pointer` as hovering. Raises the over signal on the edge unless `silent`.
    pub fn pointer_over_handler(
        &mut self,
        obj: &mut O,
        registry: &mut Registry,
        pointer: &Pointer,
        silent: bool,
    ) {
        if self.destroyed {
            return;
        }
        let now = registry.time();
        let position = Self::relative_position(obj, registry, pointer);
        let Some(c) = self.contacts.get_mut(pointer.id) else {
            return;
        };
        if c.is_over && !pointer.dirty {
            return;
        }
        let entered = !c.is_over;
        if entered {
            c.set_over(true);
            c.time_over = now;
        }
        c.position = position;
        let dragged = c.is_dragged;

        if self.use_hand_cursor && !dragged {
            registry.set_cursor(CursorStyle::Hand);
            self.hand_cursor_set = true;
        }
        if entered {
            tracing::trace!(target_id = self.id.0, pointer = pointer.id, "pointer over");
            if !silent {
                self.emit(obj, registry, PointerEvent::Over { pointer: pointer.id });
            }
        }
    }

    /// Mark `pointer` as not hovering. Raises the out signal on the edge unless `silent`.
    pub fn pointer_out_handler(
        &mut self,
        obj: &mut O,
        registry: &mut Registry,
        pointer: &Pointer,
        silent: bool,
    ) {
        if self.destroyed {
            return;
        }
        let now = registry.time();
        let Some(c) = self.contacts.get_mut(pointer.id) else {
            return;
        };
        if !c.is_over {
            return;
        }
        c.set_over(false);
        c.time_out = now;
        let dragged = c.is_dragged;

        if self.use_hand_cursor && !dragged {
            registry.set_cursor(CursorStyle::Default);
            self.hand_cursor_set = false;
        }
        tracing::trace!(target_id = self.id.0, pointer = pointer.id, "pointer out");
        if !silent {
            self.emit(obj, registry, PointerEvent::Out { pointer: pointer.id });
        }
    }

    /// A press landed while `pointer` hovers the object.
    ///
    /// Returns whether the press should be treated as consumed.
    pub fn touched_handler(
        &mut self,
        obj: &mut O,
        registry: &mut Registry,
        pointer: &mut Pointer,
    ) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(c) = self.contacts.get(pointer.id) else {
            return false;
        };
        if c.is_down || !c.is_over {
            return self.consume_pointer_event;
        }
        if self.pixel_perfect_click && !self.check_pixel(obj, registry, pointer) {
            return false;
        }

        let now = registry.time();
        if let Some(c) = self.contacts.get_mut(pointer.id) {
            c.set_down(true);
            c.time_down = now;
        }
        self.down_point = pointer.position;
        pointer.dirty = true;
        if !self.emit(obj, registry, PointerEvent::Down { pointer: pointer.id }) {
            return false;
        }

        if self.draggable && !self.drag.is_dragged() && self.drag.pending.is_none() {
            if self.drag_distance_threshold == 0.0 && self.drag_time_threshold == 0.0 {
                self.start_drag(obj, registry, pointer);
                if self.destroyed {
                    return false;
                }
            } else {
                self.drag.pending = Some(pointer.id);
                self.drag.press_point = pointer.position;
                self.drag.distance_passed = self.drag_distance_threshold == 0.0;
                if self.drag_time_threshold > 0.0 {
                    self.drag.time_passed = false;
                    self.drag.timer.schedule(now, self.drag_time_threshold);
                } else {
                    self.drag.time_passed = true;
                }
            }
        }

        if self.bring_to_top && obj.capabilities().contains(Capabilities::BRING_TO_TOP) {
            obj.bring_to_top();
        }
        self.consume_pointer_event
    }

    /// `pointer` was released. Completes a press on this object, if any.
    pub fn released_handler(&mut self, obj: &mut O, registry: &mut Registry, pointer: &mut Pointer) {
        if self.destroyed {
            return;
        }
        let now = registry.time();
        let Some(c) = self.contacts.get_mut(pointer.id) else {
            return;
        };
        if !(c.is_down && pointer.is_up) {
            return;
        }
        c.set_down(false);
        c.time_up = now;
        c.down_duration = now - c.time_down;

        let mut is_over = self.check_pointer_over(obj, registry, pointer, false);
        let ends_drag = self.draggable && self.drag.pointer == Some(pointer.id);
        if !(self.drag_stop_blocks_input_up && ends_drag) {
            let event = PointerEvent::Up {
                pointer: pointer.id,
                is_over,
            };
            if !self.emit(obj, registry, event) {
                return;
            }
        }
        // The up listener may have moved or hidden the object.
        if is_over {
            is_over = self.check_pointer_over(obj, registry, pointer, false);
        }
        if !is_over {
            self.pointer_out_handler(obj, registry, pointer, false);
            if self.destroyed {
                return;
            }
            if self.hand_cursor_set {
                registry.set_cursor(CursorStyle::Default);
                self.hand_cursor_set = false;
            }
        }

        pointer.dirty = true;
        if self.drag.pending == Some(pointer.id) {
            self.drag.pending = None;
            self.drag.timer.cancel();
        }
        if self.draggable && self.drag.pointer == Some(pointer.id) {
            self.stop_drag(obj, registry, pointer);
        }
    }

    /// Begin dragging with `pointer`.
    pub fn start_drag(&mut self, obj: &mut O, registry: &mut Registry, pointer: &Pointer) {
        if self.destroyed {
            return;
        }
        let start = obj.position();
        let fixed = obj.capabilities().contains(Capabilities::FIXED_TO_CAMERA);

        self.drag.pointer = Some(pointer.id);
        self.drag.pending = None;
        self.drag.timer.cancel();
        let camera = registry.camera();
        if let Some(c) = self.contacts.get_mut(pointer.id) {
            c.camera = camera;
            c.is_dragged = true;
        }

        if fixed {
            if self.drag_from_center {
                let center = obj.bounds().center();
                let offset = obj.camera_offset();
                obj.set_camera_offset(pointer.position + (offset - center));
            }
            self.drag.drag_point = obj.camera_offset() - pointer.position;
        } else {
            if self.drag_from_center {
                let center = obj.bounds().center();
                let pos = obj.position();
                obj.set_position(pointer.world_position(camera) + (pos - center));
            }
            self.drag.drag_point = obj.position() - pointer.position;
        }

        if !self.update_drag(obj, registry, pointer, true) {
            return;
        }
        if self.bring_to_top && obj.capabilities().contains(Capabilities::BRING_TO_TOP) {
            self.drag.raising = true;
            obj.bring_to_top();
        }
        self.drag.start_point = start;
        tracing::debug!(target_id = self.id.0, pointer = pointer.id, "drag started");
        self.emit(
            obj,
            registry,
            PointerEvent::DragStart {
                pointer: pointer.id,
                start,
            },
        );
    }

    /// Move the dragged object after `pointer`. Returns false if the drag ended.
    pub fn update_drag(
        &mut self,
        obj: &mut O,
        registry: &mut Registry,
        pointer: &Pointer,
        from_start: bool,
    ) -> bool {
        if self.destroyed {
            return false;
        }
        if pointer.is_up {
            self.stop_drag(obj, registry, pointer);
            return false;
        }

        let target = pointer.position + self.drag.drag_point + self.drag_offset;
        if obj.capabilities().contains(Capabilities::FIXED_TO_CAMERA) {
            let mut offset = obj.camera_offset();
            if self.allow_horizontal_drag {
                offset.x = target.x;
            }
            if self.allow_vertical_drag {
                offset.y = target.y;
            }
            obj.set_camera_offset(offset);
            if let Some(bounds) = &self.bounds {
                clamp_camera_offset(obj, bounds.rect());
            }
            if self.snap.on_drag {
                let snapped = self.snap.apply(obj.camera_offset());
                obj.set_camera_offset(snapped);
                self.snap_point = snapped;
            }
        } else {
            let since = self
                .contacts
                .get(pointer.id)
                .map_or(registry.camera(), |c| c.camera);
            let pan = registry.camera() - since;
            let mut pos = obj.position();
            if self.allow_horizontal_drag {
                pos.x = target.x + pan.x;
            }
            if self.allow_vertical_drag {
                pos.y = target.y + pan.y;
            }
            obj.set_position(pos);
            if let Some(bounds) = &self.bounds {
                clamp_position(obj, bounds.rect());
            }
            if self.snap.on_drag {
                let snapped = self.snap.apply(obj.position());
                obj.set_position(snapped);
                self.snap_point = snapped;
            }
        }

        self.emit(
            obj,
            registry,
            PointerEvent::DragUpdate {
                pointer: pointer.id,
                target,
                snap: self.snap_point,
                from_start,
            },
        )
    }

    /// End the drag held by `pointer`, snapping first if configured.
    pub fn stop_drag(&mut self, obj: &mut O, registry: &mut Registry, pointer: &Pointer) {
        if self.destroyed {
            return;
        }
        self.drag.pointer = None;
        self.drag.pending = None;
        self.drag.timer.cancel();
        self.drag.raising = false;
        if let Some(c) = self.contacts.get_mut(pointer.id) {
            c.is_dragged = false;
        }

        if self.snap.on_release {
            if obj.capabilities().contains(Capabilities::FIXED_TO_CAMERA) {
                let snapped = self.snap.apply(obj.camera_offset());
                obj.set_camera_offset(snapped);
            } else {
                let snapped = self.snap.apply(obj.position());
                obj.set_position(snapped);
            }
        }

        tracing::debug!(target_id = self.id.0, pointer = pointer.id, "drag stopped");
        if !self.emit(obj, registry, PointerEvent::DragStop { pointer: pointer.id }) {
            return;
        }
        if !self.check_pointer_over(obj, registry, pointer, false) {
            self.pointer_out_handler(obj, registry, pointer, false);
        }
    }
}
