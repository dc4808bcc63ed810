//! One-shot navigation events
//!
//! A screen publishes outcomes (show list, show error, show/hide loading) as
//! [`Event`]s. Reading the payload through
//! [`Event::content_if_not_handled`] consumes it, so a presenter that
//! re-attaches to a screen and sees the same event again does not repeat its
//! side effect.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;

/// A payload that can be handled at most once
#[derive(Debug)]
pub struct Event<T> {
    content: T,
    handled: AtomicBool,
}

impl<T> Event<T> {
    /// Wrap a payload
    pub const fn new(content: T) -> Self {
        Self {
            content,
            handled: AtomicBool::new(false),
        }
    }

    /// Return the payload on the first call, `None` on every later call
    pub fn content_if_not_handled(&self) -> Option<&T> {
        if self.handled.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(&self.content)
        }
    }

    /// Read the payload without consuming it
    pub const fn peek_content(&self) -> &T {
        &self.content
    }

    /// Whether some reader already took the payload
    pub fn has_been_handled(&self) -> bool {
        self.handled.load(Ordering::Acquire)
    }
}

/// Receiving end of a screen's event stream
pub type EventReceiver<T> = mpsc::UnboundedReceiver<Arc<Event<T>>>;

/// Sending end of a screen's event stream
///
/// Cloned into every task the screen spawns. Remembers the last emitted
/// event for [`EventEmitter::replay`].
pub struct EventEmitter<T> {
    tx: mpsc::UnboundedSender<Arc<Event<T>>>,
    last: Arc<Mutex<Option<Arc<Event<T>>>>>,
}

impl<T> Clone for EventEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            last: Arc::clone(&self.last),
        }
    }
}

/// Create a connected emitter/receiver pair
pub fn channel<T>() -> (EventEmitter<T>, EventReceiver<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let emitter = EventEmitter {
        tx,
        last: Arc::new(Mutex::new(None)),
    };
    (emitter, rx)
}

impl<T> EventEmitter<T> {
    /// Publish a new event
    pub fn emit(&self, content: T) {
        let event = Arc::new(Event::new(content));

        // Hold the lock while sending so `last` matches the queue order
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        *last = Some(Arc::clone(&event));
        if self.tx.send(event).is_err() {
            tracing::trace!("Event dropped: screen receiver is gone");
        }
    }

    /// The most recently emitted event, for a presenter that re-attaches
    pub fn replay(&self) -> Option<Arc<Event<T>>> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_is_delivered_once() {
        let event = Event::new("show list");
        assert!(!event.has_been_handled());

        assert_eq!(event.content_if_not_handled(), Some(&"show list"));
        assert!(event.has_been_handled());
        assert_eq!(event.content_if_not_handled(), None);
        assert_eq!(event.content_if_not_handled(), None);

        // Peeking still works after consumption
        assert_eq!(*event.peek_content(), "show list");
    }

    #[test]
    fn test_racing_readers_get_one_delivery() {
        let event = Arc::new(Event::new(5_u32));

        let deliveries: usize = (0..8)
            .map(|_| {
                let event = Arc::clone(&event);
                std::thread::spawn(move || usize::from(event.content_if_not_handled().is_some()))
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .sum();

        assert_eq!(deliveries, 1);
    }

    #[test]
    fn test_emit_preserves_order() {
        let (emitter, mut rx) = channel();
        emitter.emit(1);
        emitter.clone().emit(2);

        let first = rx.try_recv().unwrap();
        let second = rx.try_recv().unwrap();
        assert_eq!(first.content_if_not_handled(), Some(&1));
        assert_eq!(second.content_if_not_handled(), Some(&2));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_replay_after_handling_has_no_content() {
        let (emitter, mut rx) = channel();
        emitter.emit("navigate");

        let delivered = rx.try_recv().unwrap();
        assert_eq!(delivered.content_if_not_handled(), Some(&"navigate"));

        // Re-attaching presenter sees the same event, already handled
        let replayed = emitter.replay().unwrap();
        assert!(Arc::ptr_eq(&delivered, &replayed));
        assert_eq!(replayed.content_if_not_handled(), None);
    }

    #[test]
    fn test_replay_before_handling_delivers_once() {
        let (emitter, mut rx) = channel();
        emitter.emit("toast");

        let replayed = emitter.replay().unwrap();
        assert_eq!(replayed.content_if_not_handled(), Some(&"toast"));

        let queued = rx.try_recv().unwrap();
        assert_eq!(queued.content_if_not_handled(), None);
    }

    #[test]
    fn test_receiver_wakes_on_emit() {
        use tokio_test::{assert_pending, assert_ready, task};

        let (emitter, mut rx) = channel();
        let mut recv = task::spawn(rx.recv());
        assert_pending!(recv.poll());

        emitter.emit("show loading");
        assert!(recv.is_woken());

        let event = assert_ready!(recv.poll()).unwrap();
        assert_eq!(event.content_if_not_handled(), Some(&"show loading"));
    }

    #[test]
    fn test_emit_without_receiver_does_not_panic() {
        let (emitter, rx) = channel::<u8>();
        drop(rx);
        emitter.emit(1);
        assert!(emitter.replay().is_some());
    }
}
