use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use indexmap::IndexMap;

use super::error::EventError;
use super::name::{resolve_names, EventToken};

/// Shared callback handle.
///
/// A callback registered under several tokens is stored once and shared, so
/// `on("a b", f)` runs the same closure state for both events.
pub type Callback<A, R> = Rc<RefCell<dyn FnMut(&A) -> Option<R>>>;

/// Typed event kinds that map onto hub event names.
pub trait EventName {
    fn event_name(&self) -> &'static str;

    /// `event.namespace` pattern for this kind.
    fn in_namespace(&self, namespace: &str) -> String {
        format!("{}.{}", self.event_name(), namespace)
    }
}

/// Namespaced callback registry.
///
/// `A` is the payload passed to every callback of a `trigger`; `R` is the
/// optional value a callback may hand back to the trigger site.
///
/// Ordering:
/// - namespaces fire in the order they were first registered
/// - callbacks inside a namespace fire in registration order
/// - registering the same callback twice makes it fire twice
pub struct EventHub<A, R = ()> {
    callbacks: IndexMap<String, IndexMap<String, Vec<Callback<A, R>>>>,
}

impl<A, R> Default for EventHub<A, R> {
    fn default() -> Self {
        Self { callbacks: IndexMap::new() }
    }
}

impl<A: 'static, R: 'static> EventHub<A, R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for every token of `pattern`.
    pub fn on<F>(&mut self, pattern: &str, mut callback: F) -> Result<&mut Self, EventError>
    where
        F: FnMut(&A) + 'static,
    {
        self.on_result(pattern, move |args| {
            callback(args);
            None
        })
    }

    /// Like [`on`](Self::on) for callbacks that can answer the trigger.
    pub fn on_result<F>(&mut self, pattern: &str, callback: F) -> Result<&mut Self, EventError>
    where
        F: FnMut(&A) -> Option<R> + 'static,
    {
        let tokens: Vec<EventToken> = resolve_names(pattern)
            .into_iter()
            .filter(|t| !t.event.is_empty())
            .collect();

        if tokens.is_empty() {
            return Err(warn(EventError::EmptyName));
        }

        let callback: Callback<A, R> = Rc::new(RefCell::new(callback));
        for token in tokens {
            self.callbacks
                .entry(token.namespace)
                .or_default()
                .entry(token.event)
                .or_default()
                .push(Rc::clone(&callback));
        }

        Ok(self)
    }

    /// Removes registrations addressed by `pattern`.
    ///
    /// - `.ns` drops the whole namespace
    /// - `event` drops that event from every namespace
    /// - `event.ns` drops that event from `ns` only
    ///
    /// Namespaces left without events are pruned.
    pub fn off(&mut self, pattern: &str) -> Result<&mut Self, EventError> {
        let tokens = resolve_names(pattern);
        if tokens.is_empty() {
            return Err(warn(EventError::EmptyName));
        }

        for token in tokens {
            if token.is_namespace_only() {
                self.callbacks.shift_remove(&token.namespace);
            } else if token.is_base() {
                for events in self.callbacks.values_mut() {
                    events.shift_remove(&token.event);
                }
                self.callbacks.retain(|_, events| !events.is_empty());
            } else if let Some(events) = self.callbacks.get_mut(&token.namespace) {
                events.shift_remove(&token.event);
                if events.is_empty() {
                    self.callbacks.shift_remove(&token.namespace);
                }
            }
        }

        Ok(self)
    }

    /// Fires a single event.
    ///
    /// A base-namespace name fans out to every namespace that registered the
    /// event; `event.ns` fires only `ns`. Returns the first `Some` produced by
    /// a callback.
    ///
    /// A panicking callback is logged and skipped; later callbacks still run.
    pub fn trigger(&self, name: &str, args: &A) -> Result<Option<R>, EventError> {
        let mut tokens = resolve_names(name);
        let token = match tokens.len() {
            0 => return Err(warn(EventError::EmptyName)),
            1 => tokens.remove(0),
            _ => return Err(warn(EventError::MultipleNames(name.to_string()))),
        };

        if token.event.is_empty() {
            let err = if token.is_base() {
                EventError::EmptyName
            } else {
                EventError::MissingEventName(name.to_string())
            };
            return Err(warn(err));
        }

        // Snapshot the handles so the table is not borrowed while callbacks run.
        let targets: Vec<Callback<A, R>> = if token.is_base() {
            self.callbacks
                .values()
                .filter_map(|events| events.get(&token.event))
                .flatten()
                .cloned()
                .collect()
        } else {
            self.callbacks
                .get(&token.namespace)
                .and_then(|events| events.get(&token.event))
                .cloned()
                .unwrap_or_default()
        };

        let mut result = None;
        for callback in targets {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| (*callback.borrow_mut())(args)));
            match outcome {
                Ok(value) => {
                    if result.is_none() {
                        result = value;
                    }
                }
                Err(_) => {
                    log::error!(
                        "subscriber of `{}.{}` panicked; remaining subscribers still run",
                        token.event,
                        token.namespace
                    );
                }
            }
        }

        Ok(result)
    }

    /// Typed shorthand for [`trigger`](Self::trigger).
    pub fn trigger_kind<K: EventName>(&self, kind: K, args: &A) -> Result<Option<R>, EventError> {
        self.trigger(kind.event_name(), args)
    }

    /// Number of callbacks registered for `event` across all namespaces.
    pub fn listener_count(&self, event: &str) -> usize {
        self.callbacks
            .values()
            .filter_map(|events| events.get(event))
            .map(Vec::len)
            .sum()
    }

    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.callbacks.contains_key(namespace)
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

fn warn(err: EventError) -> EventError {
    log::warn!("{err}");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn recorder() -> Rc<RefCell<Vec<&'static str>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn push(log: &Rc<RefCell<Vec<&'static str>>>, tag: &'static str) -> impl FnMut(&()) + 'static {
        let log = Rc::clone(log);
        move |_: &()| log.borrow_mut().push(tag)
    }

    // ── trigger ───────────────────────────────────────────────────────────

    #[test]
    fn base_trigger_fans_out_in_namespace_then_registration_order() {
        let log = recorder();
        let mut hub: EventHub<()> = EventHub::new();
        hub.on("tick", push(&log, "base-1")).unwrap();
        hub.on("tick.world", push(&log, "world-1")).unwrap();
        hub.on("tick", push(&log, "base-2")).unwrap();
        hub.on("tick.camera", push(&log, "camera-1")).unwrap();

        hub.trigger("tick", &()).unwrap();
        assert_eq!(*log.borrow(), vec!["base-1", "base-2", "world-1", "camera-1"]);

        hub.trigger("tick", &()).unwrap();
        assert_eq!(log.borrow().len(), 8);
    }

    #[test]
    fn namespaced_trigger_only_fires_that_namespace() {
        let log = recorder();
        let mut hub: EventHub<()> = EventHub::new();
        hub.on("tick", push(&log, "base")).unwrap();
        hub.on("tick.world", push(&log, "world")).unwrap();

        hub.trigger("tick.world", &()).unwrap();
        assert_eq!(*log.borrow(), vec!["world"]);
    }

    #[test]
    fn namespaced_trigger_for_unknown_event_is_quiet() {
        let mut hub: EventHub<()> = EventHub::new();
        hub.on("tick.world", |_| {}).unwrap();
        assert_eq!(hub.trigger("resize.world", &()), Ok(None));
        assert_eq!(hub.trigger("resize.nobody", &()), Ok(None));
    }

    #[test]
    fn duplicate_registration_fires_twice() {
        let count = Rc::new(Cell::new(0));
        let mut hub: EventHub<()> = EventHub::new();
        for _ in 0..2 {
            let c = Rc::clone(&count);
            hub.on("tick", move |_| c.set(c.get() + 1)).unwrap();
        }
        hub.trigger("tick", &()).unwrap();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn payload_reaches_every_callback() {
        let seen = Rc::new(Cell::new(0u32));
        let mut hub: EventHub<u32> = EventHub::new();
        let s = Rc::clone(&seen);
        hub.on("resize", move |v| s.set(s.get() + *v)).unwrap();
        let s = Rc::clone(&seen);
        hub.on("resize.camera", move |v| s.set(s.get() + *v)).unwrap();

        hub.trigger("resize", &5).unwrap();
        assert_eq!(seen.get(), 10);
    }

    #[test]
    fn first_answer_wins() {
        let mut hub: EventHub<(), &'static str> = EventHub::new();
        hub.on("ask", |_| {}).unwrap();
        hub.on_result("ask", |_| Some("first")).unwrap();
        hub.on_result("ask", |_| Some("second")).unwrap();

        assert_eq!(hub.trigger("ask", &()), Ok(Some("first")));
    }

    #[test]
    fn no_answer_is_none() {
        let mut hub: EventHub<(), u8> = EventHub::new();
        hub.on("ask", |_| {}).unwrap();
        assert_eq!(hub.trigger("ask", &()), Ok(None));
    }

    #[test]
    fn multi_token_registration_shares_the_callback() {
        let count = Rc::new(Cell::new(0));
        let mut hub: EventHub<()> = EventHub::new();
        let c = Rc::clone(&count);
        hub.on("a, b/c.ns", move |_| c.set(c.get() + 1)).unwrap();

        hub.trigger("a", &()).unwrap();
        hub.trigger("b", &()).unwrap();
        hub.trigger("c.ns", &()).unwrap();
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn panicking_subscriber_does_not_suppress_others() {
        let log = recorder();
        let mut hub: EventHub<()> = EventHub::new();
        hub.on("tick", |_| panic!("boom")).unwrap();
        hub.on("tick.later", push(&log, "after")).unwrap();

        assert_eq!(hub.trigger("tick", &()), Ok(None));
        assert_eq!(*log.borrow(), vec!["after"]);
    }

    // ── usage errors ──────────────────────────────────────────────────────

    #[test]
    fn empty_patterns_are_rejected() {
        let mut hub: EventHub<()> = EventHub::new();
        assert_eq!(hub.on("", |_| {}).err(), Some(EventError::EmptyName));
        assert_eq!(hub.on(" ,/", |_| {}).err(), Some(EventError::EmptyName));
        assert_eq!(hub.off("").err(), Some(EventError::EmptyName));
        assert_eq!(hub.trigger("", &()), Err(EventError::EmptyName));
        assert!(hub.is_empty());
    }

    #[test]
    fn trigger_rejects_multiple_tokens() {
        let hub: EventHub<()> = EventHub::new();
        assert!(matches!(hub.trigger("a b", &()), Err(EventError::MultipleNames(_))));
    }

    #[test]
    fn trigger_rejects_namespace_without_event() {
        let hub: EventHub<()> = EventHub::new();
        assert!(matches!(hub.trigger(".world", &()), Err(EventError::MissingEventName(_))));
    }

    // ── off ───────────────────────────────────────────────────────────────

    #[test]
    fn off_namespace_removes_all_its_events() {
        let log = recorder();
        let mut hub: EventHub<()> = EventHub::new();
        hub.on("tick.world resize.world", push(&log, "world")).unwrap();
        hub.on("tick", push(&log, "base")).unwrap();

        hub.off(".world").unwrap();
        assert!(!hub.has_namespace("world"));

        hub.trigger("tick", &()).unwrap();
        hub.trigger("resize", &()).unwrap();
        assert_eq!(*log.borrow(), vec!["base"]);
    }

    #[test]
    fn off_base_event_removes_it_everywhere_and_prunes() {
        let mut hub: EventHub<()> = EventHub::new();
        hub.on("tick", |_| {}).unwrap();
        hub.on("tick.world", |_| {}).unwrap();
        hub.on("tick.camera resize.camera", |_| {}).unwrap();

        hub.off("tick").unwrap();
        assert_eq!(hub.listener_count("tick"), 0);
        assert!(!hub.has_namespace("world"));
        assert!(hub.has_namespace("camera"));
        assert_eq!(hub.listener_count("resize"), 1);
    }

    #[test]
    fn off_namespaced_event_leaves_other_namespaces() {
        let mut hub: EventHub<()> = EventHub::new();
        hub.on("tick", |_| {}).unwrap();
        hub.on("tick.world", |_| {}).unwrap();

        hub.off("tick.world").unwrap();
        assert!(!hub.has_namespace("world"));
        assert_eq!(hub.listener_count("tick"), 1);
    }

    #[test]
    fn typed_kind_maps_to_name() {
        struct Tick;
        impl EventName for Tick {
            fn event_name(&self) -> &'static str {
                "tick"
            }
        }

        let count = Rc::new(Cell::new(0));
        let mut hub: EventHub<()> = EventHub::new();
        let c = Rc::clone(&count);
        hub.on(&Tick.in_namespace("world"), move |_| c.set(c.get() + 1)).unwrap();
        hub.trigger_kind(Tick, &()).unwrap();
        assert_eq!(count.get(), 1);
    }
}
