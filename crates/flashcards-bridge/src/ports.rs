//! Outbound ports
//!
//! One-way channels from the core to its host. Delivery is synchronous,
//! in emission order, and unacknowledged. Values sent before a port has any
//! subscriber are queued and handed to the first subscriber, so a host that
//! subscribes right after constructing the core misses nothing. Values sent
//! while that backlog is being delivered join the end of it.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Arc;

/// Port name for debug text
pub const DEBUG_PORT: &str = "debug";
/// Port name for exported collections
pub const EXPORT_PORT: &str = "exportFlashcardsJson";

type Subscriber<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct PortState<T> {
    subscribers: Vec<Subscriber<T>>,
    pending: VecDeque<T>,
    draining: bool,
}

pub struct Port<T> {
    name: &'static str,
    state: Arc<Mutex<PortState<T>>>,
}

impl<T> Port<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Arc::new(Mutex::new(PortState {
                subscribers: Vec::new(),
                pending: VecDeque::new(),
                draining: false,
            })),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register a callback for every value sent from now on.
    ///
    /// The first subscriber also receives whatever was queued while the port
    /// had none.
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let subscriber: Subscriber<T> = Arc::new(callback);

        {
            let mut state = self.state.lock();
            if !state.subscribers.is_empty() || state.draining || state.pending.is_empty() {
                state.subscribers.push(subscriber);
                return;
            }
            state.draining = true;

            tracing::debug!(
                port = self.name,
                count = state.pending.len(),
                "Delivering queued port messages"
            );
        }

        // One value at a time, outside the lock, so the subscriber may send.
        loop {
            let next = {
                let mut state = self.state.lock();
                match state.pending.pop_front() {
                    Some(value) => value,
                    None => {
                        state.draining = false;
                        state.subscribers.push(subscriber);
                        return;
                    }
                }
            };
            subscriber(&next);
        }
    }

    /// Deliver a value to every subscriber.
    ///
    /// Returns the number of subscribers called; 0 means the value was queued,
    /// either because nobody has subscribed or because the backlog is still
    /// being delivered.
    pub fn send(&self, value: T) -> usize {
        let subscribers = {
            let mut state = self.state.lock();
            if state.subscribers.is_empty() || state.draining {
                state.pending.push_back(value);
                return 0;
            }
            state.subscribers.clone()
        };

        // Called outside the lock so a subscriber may send again.
        for subscriber in &subscribers {
            subscriber(&value);
        }
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.state.lock().subscribers.len()
    }

    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.len()
    }
}

impl<T> Clone for Port<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            state: Arc::clone(&self.state),
        }
    }
}

/// A message the core emits to its host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "port", content = "payload")]
pub enum OutboundMessage {
    #[serde(rename = "debug")]
    Debug(String),
    #[serde(rename = "exportFlashcardsJson")]
    ExportFlashcards(Value),
}

/// The core's outbound ports.
#[derive(Clone)]
pub struct Ports {
    pub debug: Port<String>,
    pub export_flashcards_json: Port<Value>,
}

impl Ports {
    pub fn new() -> Self {
        Self {
            debug: Port::new(DEBUG_PORT),
            export_flashcards_json: Port::new(EXPORT_PORT),
        }
    }

    /// Route a message to the port it belongs to.
    pub fn emit(&self, message: OutboundMessage) -> usize {
        match message {
            OutboundMessage::Debug(text) => self.debug.send(text),
            OutboundMessage::ExportFlashcards(json) => self.export_flashcards_json.send(json),
        }
    }
}

impl Default for Ports {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recorder<T: Clone + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(&T) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |value: &T| sink.lock().push(value.clone()))
    }

    #[test]
    fn test_send_in_order() {
        let port = Port::<String>::new(DEBUG_PORT);
        let (seen, callback) = recorder::<String>();
        port.subscribe(callback);

        assert_eq!(port.send("one".to_string()), 1);
        assert_eq!(port.send("two".to_string()), 1);
        assert_eq!(port.send("three".to_string()), 1);

        assert_eq!(*seen.lock(), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_queued_until_first_subscriber() {
        let port = Port::<Value>::new(EXPORT_PORT);
        assert_eq!(port.send(json!([1])), 0);
        assert_eq!(port.send(json!([2])), 0);
        assert_eq!(port.pending_count(), 2);

        let (first, callback) = recorder::<Value>();
        port.subscribe(callback);
        assert_eq!(*first.lock(), vec![json!([1]), json!([2])]);
        assert_eq!(port.pending_count(), 0);

        // Later subscribers only see new values
        let (second, callback) = recorder::<Value>();
        port.subscribe(callback);
        assert!(second.lock().is_empty());

        assert_eq!(port.send(json!([3])), 2);
        assert_eq!(*first.lock(), vec![json!([1]), json!([2]), json!([3])]);
        assert_eq!(*second.lock(), vec![json!([3])]);
        assert_eq!(port.subscriber_count(), 2);
    }

    #[test]
    fn test_clones_share_subscribers() {
        let port = Port::<String>::new(DEBUG_PORT);
        let (seen, callback) = recorder::<String>();
        port.clone().subscribe(callback);

        port.send("hello".to_string());
        assert_eq!(*seen.lock(), vec!["hello"]);
    }

    #[test]
    fn test_emit_routes_by_message() {
        let ports = Ports::new();
        let (debug, callback) = recorder::<String>();
        ports.debug.subscribe(callback);
        let (exports, callback) = recorder::<Value>();
        ports.export_flashcards_json.subscribe(callback);

        ports.emit(OutboundMessage::Debug("loaded".to_string()));
        ports.emit(OutboundMessage::ExportFlashcards(json!([])));

        assert_eq!(*debug.lock(), vec!["loaded"]);
        assert_eq!(*exports.lock(), vec![json!([])]);
    }

    #[test]
    fn test_message_wire_names() {
        let message = OutboundMessage::ExportFlashcards(json!([{"front": "a", "back": "b"}]));
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"port": "exportFlashcardsJson", "payload": [{"front": "a", "back": "b"}]})
        );

        let message: OutboundMessage =
            serde_json::from_value(json!({"port": "debug", "payload": "hi"})).unwrap();
        assert_eq!(message, OutboundMessage::Debug("hi".to_string()));
    }

    #[test]
    fn test_send_during_backlog_delivery_keeps_order() {
        let port = Port::<Value>::new(EXPORT_PORT);
        port.send(json!([1]));
        port.send(json!([2]));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sender = port.clone();
        let resent = Arc::new(Mutex::new(None));
        let resent_count = Arc::clone(&resent);
        port.subscribe(move |value: &Value| {
            sink.lock().push(value.clone());
            if *value == json!([1]) {
                *resent_count.lock() = Some(sender.send(json!([99])));
            }
        });

        assert_eq!(*seen.lock(), vec![json!([1]), json!([2]), json!([99])]);
        assert_eq!(*resent.lock(), Some(0));
        assert_eq!(port.pending_count(), 0);
        assert_eq!(port.subscriber_count(), 1);

        assert_eq!(port.send(json!([3])), 1);
        assert_eq!(seen.lock().last(), Some(&json!([3])));
    }
}
