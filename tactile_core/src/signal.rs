// Copyright 2025 the Tactile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener lists and enum-keyed event tables.
//!
//! ## Shape of a listener
//!
//! A listener receives a mutable context `&mut C` and the event `&E`.
//! The context is how a dispatch site hands listeners something they may
//! mutate (for example the interactive object whose event is being processed).
//! Sites without a context use `C = ()` and call [`Signal::emit`].
//!
//! ## Reentrancy
//!
//! A listener cannot reach the signal that is invoking it; the borrow checker
//! rules that out. Listeners that need to tear something down mark it through
//! the context instead, and the dispatch site re-validates after the call.

use core::fmt;
use core::marker::PhantomData;

/// Handle returned when subscribing, used to unsubscribe later.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SlotId(u32);

type Listener<E, C> = Box<dyn FnMut(&mut C, &E)>;

struct Slot<E, C: ?Sized> {
    id: SlotId,
    once: bool,
    listener: Listener<E, C>,
}

/// An ordered list of listeners for one kind of event.
///
/// Listeners are invoked in subscription order. Listeners registered with
/// [`Signal::add_once`] are dropped after their first invocation.
pub struct Signal<E, C: ?Sized = ()> {
    slots: Vec<Slot<E, C>>,
    next_id: u32,
    active: bool,
}

impl<E, C: ?Sized> fmt::Debug for Signal<E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.slots.len())
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl<E, C: ?Sized> Default for Signal<E, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, C: ?Sized> Signal<E, C> {
    /// Create an empty, active signal.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 0,
            active: true,
        }
    }

    fn push(&mut self, once: bool, listener: Listener<E, C>) -> SlotId {
        let id = SlotId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.slots.push(Slot { id, once, listener });
        id
    }

    /// Subscribe a listener that runs on every dispatch.
    pub fn add(&mut self, listener: impl FnMut(&mut C, &E) + 'static) -> SlotId {
        self.push(false, Box::new(listener))
    }

    /// Subscribe a listener that runs on the next dispatch only.
    pub fn add_once(&mut self, listener: impl FnMut(&mut C, &E) + 'static) -> SlotId {
        self.push(true, Box::new(listener))
    }

    /// Remove a listener. Returns `false` if `id` was not subscribed.
    pub fn remove(&mut self, id: SlotId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|s| s.id != id);
        self.slots.len() != before
    }

    /// Remove every listener.
    pub fn remove_all(&mut self) {
        self.slots.clear();
    }

    /// Number of subscribed listeners.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no listener is subscribed.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns true if dispatch currently reaches listeners.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Mute or unmute the signal without dropping its listeners.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Invoke every listener with `ctx` and `event`.
    ///
    /// Returns the number of listeners invoked (zero while muted).
    pub fn dispatch(&mut self, ctx: &mut C, event: &E) -> usize {
        if !self.active {
            return 0;
        }
        let mut fired_once = false;
        for slot in &mut self.slots {
            (slot.listener)(ctx, event);
            fired_once |= slot.once;
        }
        let count = self.slots.len();
        if fired_once {
            self.slots.retain(|s| !s.once);
        }
        count
    }
}

impl<E> Signal<E, ()> {
    /// Dispatch without a context.
    pub fn emit(&mut self, event: &E) -> usize {
        self.dispatch(&mut (), event)
    }
}

/// A closed set of event kinds that index an [`EventTable`].
///
/// Implement this for a fieldless enum; `index` must be dense in `0..COUNT`.
pub trait Channel: Copy {
    /// Number of distinct channels.
    const COUNT: usize;
    /// Dense index of this channel.
    fn index(self) -> usize;
}

/// A table of [`Signal`]s keyed by a [`Channel`] enum.
///
/// Signals are created the first time a listener subscribes to their channel.
/// Dispatching to a channel nobody subscribed to is free and allocates nothing.
pub struct EventTable<K: Channel, E, C: ?Sized = ()> {
    channels: Vec<Option<Signal<E, C>>>,
    _channel: PhantomData<fn() -> K>,
}

impl<K: Channel, E, C: ?Sized> fmt::Debug for EventTable<K, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let constructed = self.channels.iter().filter(|c| c.is_some()).count();
        f.debug_struct("EventTable")
            .field("channels", &K::COUNT)
            .field("constructed", &constructed)
            .finish()
    }
}

impl<K: Channel, E, C: ?Sized> Default for EventTable<K, E, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Channel, E, C: ?Sized> EventTable<K, E, C> {
    /// Create a table with no constructed channels.
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
            _channel: PhantomData,
        }
    }

    /// Access a channel's signal, constructing it on first use.
    pub fn channel_mut(&mut self, channel: K) -> &mut Signal<E, C> {
        if self.channels.is_empty() {
            self.channels.resize_with(K::COUNT, || None);
        }
        self.channels[channel.index()].get_or_insert_with(Signal::new)
    }

    /// Access a channel's signal if it has been constructed.
    pub fn channel(&self, channel: K) -> Option<&Signal<E, C>> {
        self.channels.get(channel.index())?.as_ref()
    }

    /// Returns true once the channel's signal exists.
    pub fn is_constructed(&self, channel: K) -> bool {
        self.channel(channel).is_some()
    }

    /// Subscribe to a channel.
    pub fn subscribe(
        &mut self,
        channel: K,
        listener: impl FnMut(&mut C, &E) + 'static,
    ) -> SlotId {
        self.channel_mut(channel).add(listener)
    }

    /// Subscribe to the next event on a channel only.
    pub fn subscribe_once(
        &mut self,
        channel: K,
        listener: impl FnMut(&mut C, &E) + 'static,
    ) -> SlotId {
        self.channel_mut(channel).add_once(listener)
    }

    /// Unsubscribe from a channel.
    pub fn unsubscribe(&mut self, channel: K, id: SlotId) -> bool {
        match self.channels.get_mut(channel.index()) {
            Some(Some(signal)) => signal.remove(id),
            _ => false,
        }
    }

    /// Number of listeners on a channel.
    pub fn listener_count(&self, channel: K) -> usize {
        self.channel(channel).map_or(0, Signal::len)
    }

    /// Dispatch to a channel. Returns the number of listeners invoked.
    pub fn dispatch(&mut self, channel: K, ctx: &mut C, event: &E) -> usize {
        match self.channels.get_mut(channel.index()) {
            Some(Some(signal)) => signal.dispatch(ctx, event),
            _ => 0,
        }
    }

    /// Drop every listener on one channel.
    pub fn clear_channel(&mut self, channel: K) {
        if let Some(Some(signal)) = self.channels.get_mut(channel.index()) {
            signal.remove_all();
        }
    }

    /// Drop every listener on every channel.
    pub fn clear(&mut self) {
        for signal in self.channels.iter_mut().flatten() {
            signal.remove_all();
        }
    }
}

impl<K: Channel, E> EventTable<K, E, ()> {
    /// Dispatch to a channel without a context.
    pub fn emit(&mut self, channel: K, event: &E) -> usize {
        self.dispatch(channel, &mut (), event)
    }
}
