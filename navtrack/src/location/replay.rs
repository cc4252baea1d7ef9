//! Location source that replays a recorded track.
//!
//! Tracks are plain text, one `LAT,LON` pair per line. Blank lines and lines
//! starting with `#` are ignored.
//!
//! The first point answers [`LocationService::current_position`]; position
//! watches then emit the remaining points at the polling interval. The replay
//! cursor is shared, so re-subscribing (e.g. after a battery policy change)
//! resumes where the previous watch stopped rather than restarting the track.
//! Headings are derived from consecutive points.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info};

use super::policy::PollingConfig;
use super::service::{LocationError, LocationService};
use super::watch::{Heading, HeadingWatch, PositionWatch, Watch, WatchFeed, DEFAULT_WATCH_CAPACITY};
use crate::coord::{bearing, CoordError, Coordinate};
use crate::BoxFuture;

/// Parses a text track into coordinates.
pub fn parse_track(text: &str) -> Result<Vec<Coordinate>, CoordError> {
    text.lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| {
            line.parse::<Coordinate>()
                .map_err(|e| CoordError::Malformed(format!("line {}: {}", n, e)))
        })
        .collect()
}

/// Replays a fixed list of positions.
#[derive(Debug, Clone)]
pub struct ReplayLocationService {
    track: Arc<Vec<Coordinate>>,
    cursor: Arc<AtomicUsize>,
    interval: Option<Duration>,
    heading_feed: Arc<Mutex<Option<WatchFeed<Heading>>>>,
}

impl ReplayLocationService {
    /// Creates a replay over `track`.
    pub fn new(track: Vec<Coordinate>) -> Self {
        Self {
            track: Arc::new(track),
            cursor: Arc::new(AtomicUsize::new(0)),
            interval: None,
            heading_feed: Arc::new(Mutex::new(None)),
        }
    }

    /// Emits points at `interval` instead of the polling interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Number of points in the track.
    pub fn len(&self) -> usize {
        self.track.len()
    }

    /// True if the track has no points.
    pub fn is_empty(&self) -> bool {
        self.track.is_empty()
    }

    /// Index of the most recently delivered point.
    pub fn position_index(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    /// True once every point has been delivered.
    pub fn is_finished(&self) -> bool {
        self.position_index() + 1 >= self.track.len()
    }
}

impl LocationService for ReplayLocationService {
    fn current_position<'a>(
        &'a self,
        _config: &'a PollingConfig,
    ) -> BoxFuture<'a, Result<Coordinate, LocationError>> {
        Box::pin(async move {
            let index = self.position_index();
            self.track
                .get(index)
                .copied()
                .ok_or_else(|| LocationError::Unavailable("replay track is empty".to_string()))
        })
    }

    fn watch_position(&self, config: &PollingConfig) -> Result<PositionWatch, LocationError> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| LocationError::Subscription(e.to_string()))?;

        let (feed, watch) = Watch::channel(DEFAULT_WATCH_CAPACITY);
        let interval = self.interval.unwrap_or(config.interval);
        let track = Arc::clone(&self.track);
        let cursor = Arc::clone(&self.cursor);
        let heading_feed = Arc::clone(&self.heading_feed);

        debug!(
            interval_ms = interval.as_millis() as u64,
            from = cursor.load(Ordering::SeqCst),
            points = track.len(),
            "Replay watch started"
        );

        runtime.spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = feed.released() => {
                        debug!("Replay watch released");
                        return;
                    }
                    _ = tokio::time::sleep(interval) => {}
                }

                let next = cursor.load(Ordering::SeqCst) + 1;
                let Some(point) = track.get(next).copied() else {
                    info!(points = track.len(), "Replay track finished");
                    return;
                };
                cursor.store(next, Ordering::SeqCst);

                if let Some(heading) = heading_feed.lock().as_ref() {
                    let degrees = bearing(&track[next - 1], &point);
                    heading.try_send(Heading {
                        true_heading: Some(degrees),
                        magnetic_heading: degrees,
                    });
                }

                if !feed.send(point).await {
                    return;
                }
            }
        });

        Ok(watch)
    }

    fn watch_heading(&self) -> Result<HeadingWatch, LocationError> {
        let (feed, watch) = Watch::channel(DEFAULT_WATCH_CAPACITY);
        *self.heading_feed.lock() = Some(feed);
        Ok(watch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> Vec<Coordinate> {
        vec![
            Coordinate::new_unchecked(37.0, -122.0),
            Coordinate::new_unchecked(37.1, -122.0),
            Coordinate::new_unchecked(37.2, -122.0),
        ]
    }

    fn fast() -> PollingConfig {
        PollingConfig {
            interval: Duration::from_millis(1),
            ..PollingConfig::default()
        }
    }

    #[test]
    fn test_parse_track_skips_comments_and_blanks() {
        let text = "# morning drive\n37.0,-122.0\n\n  37.1, -122.0  \n";
        let points = parse_track(text).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1], Coordinate::new_unchecked(37.1, -122.0));
    }

    #[test]
    fn test_parse_track_reports_line_number() {
        let err = parse_track("37.0,-122.0\nnowhere\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "got {}", err);
    }

    #[tokio::test]
    async fn test_first_fix_is_first_point() {
        let replay = ReplayLocationService::new(track());
        let fix = replay.current_position(&fast()).await.unwrap();
        assert_eq!(fix, track()[0]);
    }

    #[tokio::test]
    async fn test_empty_track_has_no_fix() {
        let replay = ReplayLocationService::new(Vec::new());
        assert!(replay.current_position(&fast()).await.is_err());
    }

    #[tokio::test]
    async fn test_watch_emits_remaining_points_then_ends() {
        let replay = ReplayLocationService::new(track());
        let mut watch = replay.watch_position(&fast()).unwrap();

        assert_eq!(watch.recv().await, Some(track()[1]));
        assert_eq!(watch.recv().await, Some(track()[2]));
        assert_eq!(watch.recv().await, None);
        assert!(replay.is_finished());
    }

    #[tokio::test]
    async fn test_resubscribe_resumes_from_cursor() {
        let replay = ReplayLocationService::new(track());

        let mut first = replay.watch_position(&fast()).unwrap();
        assert_eq!(first.recv().await, Some(track()[1]));
        first.release();

        let mut second = replay.watch_position(&fast()).unwrap();
        assert_eq!(second.recv().await, Some(track()[2]));
    }

    #[tokio::test]
    async fn test_heading_follows_track() {
        let replay = ReplayLocationService::new(track());
        let mut headings = replay.watch_heading().unwrap();
        let mut positions = replay.watch_position(&fast()).unwrap();

        positions.recv().await;
        let heading = headings.recv().await.unwrap();
        // Track runs due north
        assert!(heading.degrees() < 1e-6 || heading.degrees() > 359.999);
    }
}
