//! Event bus for decoupled communication
//!
//! Producers (collision responses, input handling, timers) and consumers
//! (audio, UI, menu, camera) never reference each other directly; they meet
//! on a closed, strongly-typed [`Event`] union. Each variant maps to exactly
//! one [`EventCategory`], which is the subscription key.
//!
//! Delivery is synchronous: `publish` invokes every handler subscribed to
//! the event's category, in subscription order, before returning, including
//! handlers' own follow-up events, which cascade in FIFO order within the
//! same call. There is no cycle detection; a handler that republishes a
//! category upstream of itself will loop forever, and that is the caller's
//! problem. Code running *inside* a manager traversal pushes into an
//! [`EventQueue`] instead, which the game loop drains through the dispatcher
//! at a fixed point after the update pass.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::scene::ActorId;

// ============================================================================
// Event Types
// ============================================================================

/// Subscription key: the broad family an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    Camera,
    Sound,
    Menu,
    Ui,
    Object,
    Game,
}

/// Things that happen in the game, with typed payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // -------------------------------------------------------------------------
    // Sound
    // -------------------------------------------------------------------------
    /// Play a named sound cue
    PlaySound { name: String },
    PauseSound { name: String },
    StopSound { name: String },
    StopAllSounds,
    /// Adjust master volume by a signed amount
    VolumeDelta { delta: f32 },
    Mute,
    Unmute,

    // -------------------------------------------------------------------------
    // Menu / game state
    // -------------------------------------------------------------------------
    /// Show the menu overlay and suspend gameplay updates
    Pause,
    /// Hide the menu and resume gameplay
    Play,
    /// Terminal: the player is out of health
    Lose,
    Win,

    // -------------------------------------------------------------------------
    // HUD
    // -------------------------------------------------------------------------
    HealthDelta { delta: i32 },
    ScoreDelta { delta: i32 },

    // -------------------------------------------------------------------------
    // Object lifetime
    // -------------------------------------------------------------------------
    /// Request deferred removal of an actor from the object manager
    RemoveActor { id: ActorId },

    // -------------------------------------------------------------------------
    // Camera
    // -------------------------------------------------------------------------
    /// Advance the active camera cyclically
    CameraCycle,
    /// Activate the camera with the given id
    CameraSetActive { id: String },

    // -------------------------------------------------------------------------
    // Application
    // -------------------------------------------------------------------------
    /// Ask the host to quit
    Exit,
}

impl Event {
    /// The category handlers subscribe under. Total: every variant maps to
    /// exactly one category.
    #[must_use]
    pub fn category(&self) -> EventCategory {
        match self {
            Event::PlaySound { .. }
            | Event::PauseSound { .. }
            | Event::StopSound { .. }
            | Event::StopAllSounds
            | Event::VolumeDelta { .. }
            | Event::Mute
            | Event::Unmute => EventCategory::Sound,
            Event::Pause | Event::Play | Event::Lose | Event::Win => EventCategory::Menu,
            Event::HealthDelta { .. } | Event::ScoreDelta { .. } => EventCategory::Ui,
            Event::RemoveActor { .. } => EventCategory::Object,
            Event::CameraCycle | Event::CameraSetActive { .. } => EventCategory::Camera,
            Event::Exit => EventCategory::Game,
        }
    }
}

// ============================================================================
// Event Queue
// ============================================================================

/// FIFO buffer of events awaiting dispatch.
///
/// Used as the outbox for code that runs while a manager is traversing its
/// own collections and therefore cannot be handed mutable access to the
/// rest of the world mid-iteration.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Boxed handler: receives the shared context, the event, and an outbox for
/// follow-up events.
pub type Handler<Ctx> = Box<dyn FnMut(&mut Ctx, &Event, &mut EventQueue)>;

/// Publish/subscribe bus over a caller-chosen context type.
///
/// Handlers are registered per category and invoked in subscription order.
/// Registrations last for the dispatcher's lifetime; there is no
/// unsubscribe.
pub struct EventDispatcher<Ctx> {
    subscribers: FxHashMap<EventCategory, Vec<Handler<Ctx>>>,
    /// Scratch queue reused across publishes
    scratch: EventQueue,
}

impl<Ctx> EventDispatcher<Ctx> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: FxHashMap::default(),
            scratch: EventQueue::new(),
        }
    }

    /// Register a handler for a category. Many handlers per category are
    /// allowed; invocation order is registration order.
    pub fn subscribe<F>(&mut self, category: EventCategory, handler: F)
    where
        F: FnMut(&mut Ctx, &Event, &mut EventQueue) + 'static,
    {
        self.subscribers
            .entry(category)
            .or_default()
            .push(Box::new(handler));
    }

    /// Number of handlers registered for a category.
    #[must_use]
    pub fn subscriber_count(&self, category: EventCategory) -> usize {
        self.subscribers.get(&category).map_or(0, Vec::len)
    }

    /// Deliver one event and its whole cascade synchronously.
    ///
    /// Publishing a category with zero subscribers is a no-op.
    pub fn publish(&mut self, ctx: &mut Ctx, event: Event) {
        let mut queue = std::mem::take(&mut self.scratch);
        queue.push(event);
        self.dispatch_queue(ctx, &mut queue);
        self.scratch = queue;
    }

    /// Drain a queue through the bus, delivering follow-ups pushed by
    /// handlers in FIFO order until the queue runs dry.
    pub fn dispatch_queue(&mut self, ctx: &mut Ctx, queue: &mut EventQueue) {
        while let Some(event) = queue.pop() {
            if let Some(handlers) = self.subscribers.get_mut(&event.category()) {
                for handler in handlers.iter_mut() {
                    handler(ctx, &event, queue);
                }
            }
        }
    }
}

impl<Ctx> Default for EventDispatcher<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx> std::fmt::Debug for EventDispatcher<Ctx> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("categories", &self.subscribers.len())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variant_has_a_category() {
        assert_eq!(
            Event::PlaySound {
                name: "chime".into()
            }
            .category(),
            EventCategory::Sound
        );
        assert_eq!(Event::Pause.category(), EventCategory::Menu);
        assert_eq!(Event::HealthDelta { delta: -1 }.category(), EventCategory::Ui);
        assert_eq!(Event::CameraCycle.category(), EventCategory::Camera);
        assert_eq!(Event::Exit.category(), EventCategory::Game);
    }

    #[test]
    fn test_handlers_invoked_once_in_subscription_order() {
        let mut dispatcher: EventDispatcher<Vec<&'static str>> = EventDispatcher::new();
        dispatcher.subscribe(EventCategory::Menu, |log: &mut Vec<_>, _, _| {
            log.push("first");
        });
        dispatcher.subscribe(EventCategory::Menu, |log: &mut Vec<_>, _, _| {
            log.push("second");
        });

        let mut log = Vec::new();
        dispatcher.publish(&mut log, Event::Pause);
        assert_eq!(log, vec!["first", "second"]);
    }

    #[test]
    fn test_publish_without_subscribers_is_noop() {
        let mut dispatcher: EventDispatcher<()> = EventDispatcher::new();
        dispatcher.publish(&mut (), Event::CameraCycle);
    }

    #[test]
    fn test_other_categories_not_invoked() {
        let mut dispatcher: EventDispatcher<u32> = EventDispatcher::new();
        dispatcher.subscribe(EventCategory::Sound, |count: &mut u32, _, _| *count += 1);

        let mut count = 0;
        dispatcher.publish(&mut count, Event::Pause);
        assert_eq!(count, 0);

        dispatcher.publish(&mut count, Event::StopAllSounds);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_cascade_delivered_within_same_publish() {
        // A Menu handler reacts to Lose by queueing a sound cue; the sound
        // handler must run before publish returns.
        let mut dispatcher: EventDispatcher<Vec<String>> = EventDispatcher::new();
        dispatcher.subscribe(EventCategory::Menu, |log: &mut Vec<String>, event, queue| {
            if *event == Event::Lose {
                log.push("menu".into());
                queue.push(Event::PlaySound { name: "end".into() });
            }
        });
        dispatcher.subscribe(EventCategory::Sound, |log: &mut Vec<String>, event, _| {
            if let Event::PlaySound { name } = event {
                log.push(format!("sound:{name}"));
            }
        });

        let mut log = Vec::new();
        dispatcher.publish(&mut log, Event::Lose);
        assert_eq!(log, vec!["menu".to_string(), "sound:end".to_string()]);
    }

    #[test]
    fn test_dispatch_queue_drains_in_fifo_order() {
        let mut dispatcher: EventDispatcher<Vec<i32>> = EventDispatcher::new();
        dispatcher.subscribe(EventCategory::Ui, |log: &mut Vec<i32>, event, _| {
            if let Event::ScoreDelta { delta } = event {
                log.push(*delta);
            }
        });

        let mut queue = EventQueue::new();
        queue.push(Event::ScoreDelta { delta: 1 });
        queue.push(Event::ScoreDelta { delta: 2 });
        queue.push(Event::ScoreDelta { delta: 3 });

        let mut log = Vec::new();
        dispatcher.dispatch_queue(&mut log, &mut queue);
        assert_eq!(log, vec![1, 2, 3]);
        assert!(queue.is_empty());
    }
}
