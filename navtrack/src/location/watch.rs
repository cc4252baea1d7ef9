//! Releasable update subscriptions.
//!
//! A [`Watch`] is the consumer end of a location or heading subscription;
//! the matching [`WatchFeed`] is held by whatever produces the updates.
//! Releasing the watch (explicitly or by dropping it) cancels the feed, so
//! producers stop as soon as the subscriber goes away.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::coord::Coordinate;

/// Default buffered updates per subscription.
pub const DEFAULT_WATCH_CAPACITY: usize = 64;

/// Device heading sample in degrees clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heading {
    /// Heading relative to true north, when the platform can compute it.
    pub true_heading: Option<f64>,
    /// Heading relative to magnetic north.
    pub magnetic_heading: f64,
}

impl Heading {
    /// Best available heading: true north if known, magnetic otherwise.
    pub fn degrees(&self) -> f64 {
        self.true_heading.unwrap_or(self.magnetic_heading)
    }
}

/// Consumer end of a subscription.
#[derive(Debug)]
pub struct Watch<T> {
    rx: mpsc::Receiver<T>,
    cancel: CancellationToken,
}

/// Producer end of a subscription.
#[derive(Debug)]
pub struct WatchFeed<T> {
    tx: mpsc::Sender<T>,
    cancel: CancellationToken,
}

impl<T> Clone for WatchFeed<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

/// Position subscription.
pub type PositionWatch = Watch<Coordinate>;

/// Heading subscription.
pub type HeadingWatch = Watch<Heading>;

impl<T> Watch<T> {
    /// Creates a connected feed/watch pair.
    pub fn channel(capacity: usize) -> (WatchFeed<T>, Watch<T>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let cancel = CancellationToken::new();
        (
            WatchFeed {
                tx,
                cancel: cancel.clone(),
            },
            Watch { rx, cancel },
        )
    }

    /// Waits for the next update.
    ///
    /// Returns `None` once the watch is released or the producer is gone.
    /// Cancel safe.
    pub async fn recv(&mut self) -> Option<T> {
        if self.cancel.is_cancelled() {
            return None;
        }
        self.rx.recv().await
    }

    /// Stops the subscription. Idempotent.
    pub fn release(&mut self) {
        self.cancel.cancel();
        self.rx.close();
    }

    /// True once released.
    pub fn is_released(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl<T> Drop for Watch<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl<T> WatchFeed<T> {
    /// Delivers an update. Returns false if the subscriber released.
    pub async fn send(&self, value: T) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        self.tx.send(value).await.is_ok()
    }

    /// Delivers an update without waiting for buffer space.
    pub fn try_send(&self, value: T) -> bool {
        !self.cancel.is_cancelled() && self.tx.try_send(value).is_ok()
    }

    /// True once the subscriber released or dropped its watch.
    pub fn is_released(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves when the subscriber releases.
    pub async fn released(&self) {
        self.cancel.cancelled().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_updates_flow_until_release() {
        let (feed, mut watch) = Watch::<u32>::channel(4);
        assert!(feed.send(1).await);
        assert_eq!(watch.recv().await, Some(1));

        watch.release();
        assert!(watch.is_released());
        assert!(feed.is_released());
        assert!(!feed.send(2).await);
        assert_eq!(watch.recv().await, None);
    }

    #[tokio::test]
    async fn test_drop_releases_feed() {
        let (feed, watch) = Watch::<u32>::channel(4);
        drop(watch);
        assert!(feed.is_released());
        feed.released().await;
    }

    #[tokio::test]
    async fn test_producer_gone_ends_stream() {
        let (feed, mut watch) = Watch::<u32>::channel(4);
        drop(feed);
        assert_eq!(watch.recv().await, None);
        assert!(!watch.is_released());
    }

    #[test]
    fn test_heading_prefers_true_north() {
        let with_true = Heading {
            true_heading: Some(90.0),
            magnetic_heading: 80.0,
        };
        let magnetic_only = Heading {
            true_heading: None,
            magnetic_heading: 80.0,
        };
        assert_eq!(with_true.degrees(), 90.0);
        assert_eq!(magnetic_only.degrees(), 80.0);
    }
}
