//! FIFO event queue shared by every task in the terminal.
//!
//! A queue has many producers and one consumer. Producers never block:
//! [`QueueSender::put`] returns immediately. The consumer either suspends
//! until an item arrives ([`QueueReceiver::get`]) or polls
//! ([`QueueReceiver::try_get`]).
//!
//! ```text
//! card reader ──┐
//! debouncer ────┼──> QueueSender<Event> ──> QueueReceiver<Event> ──> FSM loop
//! timer ────────┘
//! ```
//!
//! # Examples
//!
//! ```
//! use attendance_core::queue::{self, TryGet};
//!
//! # tokio_test_block_on(async {
//! let (tx, mut rx) = queue::channel::<u32>();
//! assert!(matches!(rx.try_get(), TryGet::Empty));
//!
//! tx.put(1).unwrap();
//! tx.put(2).unwrap();
//! assert_eq!(rx.get().await, Some(1));
//! assert!(matches!(rx.try_get(), TryGet::Item(2)));
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use crate::{Result, error::Error};
use tokio::sync::mpsc::{self, error::TryRecvError};

/// Create a new unbounded queue.
#[must_use]
pub fn channel<T>() -> (QueueSender<T>, QueueReceiver<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (QueueSender { inner: tx }, QueueReceiver { inner: rx })
}

/// Producer side of a queue. Cheap to clone.
#[derive(Debug)]
pub struct QueueSender<T> {
    inner: mpsc::UnboundedSender<T>,
}

impl<T> Clone for QueueSender<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> QueueSender<T> {
    /// Append an item to the queue without blocking.
    ///
    /// # Errors
    /// Returns `Error::QueueClosed` if the consumer was dropped.
    pub fn put(&self, item: T) -> Result<()> {
        self.inner.send(item).map_err(|_| Error::QueueClosed)
    }

    /// True once the consumer has been dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

/// Outcome of a non-blocking get.
#[derive(Debug, PartialEq, Eq)]
pub enum TryGet<T> {
    Item(T),
    Empty,
    /// Every sender is gone and the queue is drained.
    Closed,
}

/// Consumer side of a queue.
#[derive(Debug)]
pub struct QueueReceiver<T> {
    inner: mpsc::UnboundedReceiver<T>,
}

impl<T> QueueReceiver<T> {
    /// Wait for the next item.
    ///
    /// Returns `None` only after every sender has been dropped and the queue
    /// is drained.
    pub async fn get(&mut self) -> Option<T> {
        self.inner.recv().await
    }

    /// Take the next item if one is ready.
    pub fn try_get(&mut self) -> TryGet<T> {
        match self.inner.try_recv() {
            Ok(item) => TryGet::Item(item),
            Err(TryRecvError::Empty) => TryGet::Empty,
            Err(TryRecvError::Disconnected) => TryGet::Closed,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fifo_order_across_producers() {
        let (tx, mut rx) = channel();
        let tx2 = tx.clone();

        tx.put("a").unwrap();
        tx2.put("b").unwrap();
        tx.put("c").unwrap();

        assert_eq!(rx.len(), 3);
        assert_eq!(rx.get().await, Some("a"));
        assert_eq!(rx.get().await, Some("b"));
        assert_eq!(rx.get().await, Some("c"));
        assert!(rx.is_empty());
    }

    #[tokio::test]
    async fn test_try_get_states() {
        let (tx, mut rx) = channel();
        assert_eq!(rx.try_get(), TryGet::Empty);

        tx.put(7u32).unwrap();
        assert_eq!(rx.try_get(), TryGet::Item(7));

        drop(tx);
        assert_eq!(rx.try_get(), TryGet::Closed);
        assert_eq!(rx.get().await, None);
    }

    #[tokio::test]
    async fn test_items_survive_sender_drop() {
        let (tx, mut rx) = channel();
        tx.put(1u8).unwrap();
        drop(tx);

        assert_eq!(rx.get().await, Some(1));
        assert_eq!(rx.get().await, None);
    }

    #[test]
    fn test_put_after_receiver_dropped() {
        let (tx, rx) = channel::<u8>();
        drop(rx);

        assert!(tx.is_closed());
        assert!(matches!(tx.put(1), Err(Error::QueueClosed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_suspends_until_put() {
        let (tx, mut rx) = channel();

        let producer = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            tx.put(99u16).unwrap();
        });

        assert_eq!(rx.get().await, Some(99));
        producer.await.unwrap();
    }
}
