//! Sleep timer
//!
//! Single-instance countdown keyed off a wall-clock deadline computed at
//! start time, so display ticks stay accurate across drift. Two tasks run
//! per timer: a one-second display tick that recomputes remaining time from
//! the deadline, and a terminal timer that fires exactly at the deadline.
//! Both are cancelled together when a timer is replaced or dropped.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Events emitted by a running timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Display tick with the recomputed remaining time
    Tick { remaining: Duration },
    /// Deadline reached; the receiver pauses playback and resets the
    /// selector
    Expired,
}

/// A running countdown. Dropping it cancels both tasks.
pub struct SleepTimer {
    tick_task: tokio::task::JoinHandle<()>,
    terminal_task: tokio::task::JoinHandle<()>,
}

impl SleepTimer {
    /// Start a countdown for `duration`, emitting events on `events`.
    /// Callers replace any existing timer by overwriting it; the old
    /// timer's tasks abort on drop.
    pub fn start(duration: Duration, events: mpsc::UnboundedSender<TimerEvent>) -> Self {
        let deadline = Instant::now() + duration;

        let tick_tx = events.clone();
        let tick_task = tokio::spawn(async move {
            loop {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if tick_tx.send(TimerEvent::Tick { remaining }).is_err() {
                    break;
                }
                if remaining.is_zero() {
                    break;
                }
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        });

        let terminal_task = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = events.send(TimerEvent::Expired);
        });

        Self {
            tick_task,
            terminal_task,
        }
    }
}

impl Drop for SleepTimer {
    fn drop(&mut self) {
        self.tick_task.abort();
        self.terminal_task.abort();
    }
}

/// Format remaining time as `M:SS` for the timer display
pub fn format_remaining(remaining: Duration) -> String {
    let total = remaining.as_secs();
    format!("{}:{:02}", total / 60, total % 60)
}
