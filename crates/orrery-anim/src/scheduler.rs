//! Frame scheduling.
//!
//! A scheduler answers "when should the next frame be drawn?". The
//! refresh-paced one lands frames on display refresh boundaries; the
//! timer-paced fallback spaces them about 16 ms apart, shortening the wait
//! by however long has passed since the previous call.

use std::time::Duration;

use log::{debug, warn};

/// Default spacing of the timer-paced fallback (about 60 Hz).
pub const FALLBACK_INTERVAL_MS: f64 = 16.0;

/// Slowest refresh rate the refresh-paced scheduler accepts.
pub const MIN_REFRESH_HZ: f64 = 1.0;

/// Handle for a requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

/// A scheduled frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRequest {
    pub token: FrameToken,
    /// How long to wait before drawing.
    pub delay: Duration,
    /// Wall-clock time the frame is meant for, in milliseconds.
    pub timestamp_ms: f64,
}

/// Source of frame timing.
pub trait FrameScheduler {
    /// Schedule the next frame. Replaces any frame still pending.
    fn request(&mut self, now_ms: f64) -> FrameRequest;

    /// Drop a pending frame. Returns whether `token` was pending.
    fn cancel(&mut self, token: FrameToken) -> bool;

    /// Claim a frame once its delay has passed. Returns false if it was
    /// cancelled or superseded in the meantime.
    fn take(&mut self, token: FrameToken) -> bool;
}

/// Wait of `ms` milliseconds, clamped to what a [`Duration`] can hold.
fn delay_from_ms(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms.max(0.0) / 1000.0).unwrap_or(Duration::MAX)
}

/// Token bookkeeping shared by the schedulers.
#[derive(Debug, Default)]
struct Pending {
    next_id: u64,
    token: Option<FrameToken>,
}

impl Pending {
    fn issue(&mut self) -> FrameToken {
        self.next_id += 1;
        let token = FrameToken(self.next_id);
        self.token = Some(token);
        token
    }

    fn clear(&mut self, token: FrameToken) -> bool {
        if self.token == Some(token) {
            self.token = None;
            true
        } else {
            false
        }
    }
}

/// Timer-paced fallback used when no refresh rate is known.
#[derive(Debug)]
pub struct TimeoutScheduler {
    interval_ms: f64,
    /// Timestamp the previous frame was scheduled for.
    last_invocation_ms: f64,
    pending: Pending,
}

impl Default for TimeoutScheduler {
    fn default() -> Self {
        Self::new(FALLBACK_INTERVAL_MS)
    }
}

impl TimeoutScheduler {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            last_invocation_ms: 0.0,
            pending: Pending::default(),
        }
    }

    pub fn last_invocation_ms(&self) -> f64 {
        self.last_invocation_ms
    }
}

impl FrameScheduler for TimeoutScheduler {
    fn request(&mut self, now_ms: f64) -> FrameRequest {
        let delay_ms = (self.interval_ms - (now_ms - self.last_invocation_ms)).max(0.0);
        self.last_invocation_ms = now_ms + delay_ms;
        FrameRequest {
            token: self.pending.issue(),
            delay: delay_from_ms(delay_ms),
            timestamp_ms: self.last_invocation_ms,
        }
    }

    fn cancel(&mut self, token: FrameToken) -> bool {
        self.pending.clear(token)
    }

    fn take(&mut self, token: FrameToken) -> bool {
        self.pending.clear(token)
    }
}

/// Refresh-paced scheduler: frames land on multiples of the refresh period.
#[derive(Debug)]
pub struct RefreshScheduler {
    period_ms: f64,
    last_frame_ms: f64,
    pending: Pending,
}

impl RefreshScheduler {
    /// Returns `None` unless `refresh_hz` is finite and at least
    /// [`MIN_REFRESH_HZ`].
    pub fn new(refresh_hz: f64) -> Option<Self> {
        if !(refresh_hz.is_finite() && refresh_hz >= MIN_REFRESH_HZ) {
            return None;
        }
        Some(Self {
            period_ms: 1000.0 / refresh_hz,
            last_frame_ms: f64::NEG_INFINITY,
            pending: Pending::default(),
        })
    }

    pub fn period_ms(&self) -> f64 {
        self.period_ms
    }
}

impl FrameScheduler for RefreshScheduler {
    fn request(&mut self, now_ms: f64) -> FrameRequest {
        let mut next = (now_ms / self.period_ms).ceil() * self.period_ms;
        // Never hand out the same refresh twice.
        if next <= self.last_frame_ms {
            next = self.last_frame_ms + self.period_ms;
        }
        self.last_frame_ms = next;
        FrameRequest {
            token: self.pending.issue(),
            delay: delay_from_ms(next - now_ms),
            timestamp_ms: next,
        }
    }

    fn cancel(&mut self, token: FrameToken) -> bool {
        self.pending.clear(token)
    }

    fn take(&mut self, token: FrameToken) -> bool {
        self.pending.clear(token)
    }
}

/// The scheduler picked at startup.
#[derive(Debug)]
pub enum Scheduler {
    Refresh(RefreshScheduler),
    Timeout(TimeoutScheduler),
}

impl Scheduler {
    /// Use the refresh rate when one is known, the timer otherwise.
    pub fn resolve(refresh_hz: Option<f64>, fallback_interval_ms: f64) -> Self {
        match refresh_hz.map(RefreshScheduler::new) {
            Some(Some(refresh)) => {
                debug!("pacing frames at {:.3} ms", refresh.period_ms());
                Scheduler::Refresh(refresh)
            }
            Some(None) => {
                warn!("ignoring unusable refresh rate, falling back to timer pacing");
                Scheduler::Timeout(TimeoutScheduler::new(fallback_interval_ms))
            }
            None => {
                debug!("no refresh rate known, pacing frames every {fallback_interval_ms} ms");
                Scheduler::Timeout(TimeoutScheduler::new(fallback_interval_ms))
            }
        }
    }

    pub fn is_refresh_paced(&self) -> bool {
        matches!(self, Scheduler::Refresh(_))
    }
}

impl FrameScheduler for Scheduler {
    fn request(&mut self, now_ms: f64) -> FrameRequest {
        match self {
            Scheduler::Refresh(s) => s.request(now_ms),
            Scheduler::Timeout(s) => s.request(now_ms),
        }
    }

    fn cancel(&mut self, token: FrameToken) -> bool {
        match self {
            Scheduler::Refresh(s) => s.cancel(token),
            Scheduler::Timeout(s) => s.cancel(token),
        }
    }

    fn take(&mut self, token: FrameToken) -> bool {
        match self {
            Scheduler::Refresh(s) => s.take(token),
            Scheduler::Timeout(s) => s.take(token),
        }
    }
}
