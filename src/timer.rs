use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Local};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::state::{next_slot_after, Countdown, TimerState};

#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent {
    Fired { generation: u64, at: DateTime<Local> },
}

struct Shared {
    state: Mutex<TimerState>,
    wake: Condvar,
}

/// Owns the reminder thread. The thread waits on a condvar until the anchor is
/// reached, so [`ReminderTimer::stop`] interrupts a pending wait immediately.
pub struct ReminderTimer {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl ReminderTimer {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(TimerState::new()),
                wake: Condvar::new(),
            }),
            handle: None,
        }
    }

    pub fn start(&mut self, interval: Duration) -> Result<UnboundedReceiver<TimerEvent>> {
        anyhow::ensure!(!self.is_running(), "Reminder timer is already running");
        anyhow::ensure!(interval > Duration::zero(), "Reminder interval must be positive");

        // Reap a thread left over from a previous run.
        self.join();

        let (tx, rx) = mpsc::unbounded_channel();
        let (generation, anchor) = {
            let mut state = self.shared.state.lock();
            let generation = state.arm(interval, Local::now());
            (generation, state.next_reminder_time)
        };
        let anchor = anchor.context("Reminder anchor missing after start")?;

        let shared = self.shared.clone();
        let spawned = std::thread::Builder::new()
            .name("standup-reminder".to_string())
            .spawn(move || run(shared, generation, interval, anchor, tx));

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::debug!(generation, ?anchor, "Reminder thread started");
                Ok(rx)
            }
            Err(e) => {
                self.shared.state.lock().disarm();
                Err(e).context("Failed to spawn reminder thread")
            }
        }
    }

    /// Returns false if the timer was not running.
    pub fn stop(&mut self) -> bool {
        let was_running = {
            let mut state = self.shared.state.lock();
            let was_running = state.is_running;
            state.disarm();
            was_running
        };
        self.shared.wake.notify_all();
        self.join();
        was_running
    }

    pub fn is_running(&self) -> bool {
        self.shared.state.lock().is_running
    }

    pub fn snapshot(&self) -> TimerState {
        self.shared.state.lock().clone()
    }

    /// True when `event` belongs to the run that is currently active.
    pub fn accepts(&self, event: &TimerEvent) -> bool {
        match event {
            TimerEvent::Fired { generation, .. } => self.shared.state.lock().is_active(*generation),
        }
    }

    pub fn countdown(&self, now: DateTime<Local>) -> Countdown {
        self.shared.state.lock().countdown(now)
    }

    /// What the countdown shows on receipt of `event`. The reminder thread has
    /// already moved the anchor by then, so a firing is reported as such here
    /// and the next tick goes back to counting. `None` for a stale event.
    pub fn countdown_for(&self, event: &TimerEvent) -> Option<Countdown> {
        if !self.accepts(event) {
            return None;
        }
        match event {
            TimerEvent::Fired { .. } => Some(Countdown::Firing),
        }
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Reminder thread panicked");
            }
        }
    }
}

impl Default for ReminderTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ReminderTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(
    shared: Arc<Shared>,
    generation: u64,
    interval: Duration,
    mut deadline: DateTime<Local>,
    events: UnboundedSender<TimerEvent>,
) {
    let mut state = shared.state.lock();
    loop {
        if !state.is_active(generation) {
            break;
        }

        let now = Local::now();
        // A negative wait fails to convert, meaning the deadline has passed.
        if let Ok(wait) = (deadline - now).to_std() {
            if !wait.is_zero() {
                shared.wake.wait_for(&mut state, wait);
                continue;
            }
        }

        deadline = next_slot_after(deadline, interval, now);
        state.catch_up(deadline);

        if events.send(TimerEvent::Fired { generation, at: now }).is_err() {
            tracing::debug!(generation, "Reminder receiver dropped, stopping thread");
            break;
        }
        tracing::info!(generation, next = %deadline, "Reminder fired");
    }
    tracing::debug!(generation, "Reminder thread exiting");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;
    use tokio::sync::mpsc::error::TryRecvError;
    use tokio::time::timeout;

    #[test]
    fn test_start_sets_anchor_for_every_valid_interval() {
        let mut timer = ReminderTimer::new();
        for minutes in 1..=180 {
            let interval = Duration::minutes(minutes);
            let before = Local::now();
            let _rx = timer.start(interval).unwrap();
            let after = Local::now();

            let state = timer.snapshot();
            assert!(state.is_running);
            let anchor = state.next_reminder_time.unwrap();
            assert!(anchor >= before + interval && anchor <= after + interval);

            assert!(timer.stop());
            assert!(!timer.is_running());
            assert_eq!(timer.snapshot().next_reminder_time, None);
        }
    }

    #[tokio::test]
    async fn test_stop_before_expiry_prevents_firing() {
        let mut timer = ReminderTimer::new();
        let mut rx = timer.start(Duration::milliseconds(100)).unwrap();
        timer.stop();

        tokio::time::sleep(StdDuration::from_millis(250)).await;
        assert_eq!(rx.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[tokio::test]
    async fn test_fires_repeatedly_and_advances_anchor() {
        let mut timer = ReminderTimer::new();
        let mut rx = timer.start(Duration::milliseconds(50)).unwrap();
        let first_anchor = timer.snapshot().next_reminder_time.unwrap();

        for _ in 0..2 {
            let event = timeout(StdDuration::from_secs(5), rx.recv())
                .await
                .expect("timer did not fire")
                .expect("channel closed");
            assert!(timer.accepts(&event));
        }

        let anchor = timer.snapshot().next_reminder_time.unwrap();
        assert!(anchor > first_anchor);
        timer.stop();
    }

    #[tokio::test]
    async fn test_events_from_previous_run_are_rejected() {
        let mut timer = ReminderTimer::new();
        let mut rx = timer.start(Duration::milliseconds(20)).unwrap();
        let event = timeout(StdDuration::from_secs(5), rx.recv())
            .await
            .expect("timer did not fire")
            .expect("channel closed");

        timer.stop();
        assert!(!timer.accepts(&event));

        let _rx = timer.start(Duration::minutes(1)).unwrap();
        assert!(!timer.accepts(&event));
        timer.stop();
    }

    #[tokio::test]
    async fn test_fired_event_shows_firing_then_counts_again() {
        let mut timer = ReminderTimer::new();
        let mut rx = timer.start(Duration::seconds(2)).unwrap();
        let event = timeout(StdDuration::from_secs(10), rx.recv())
            .await
            .expect("timer did not fire")
            .expect("channel closed");

        // The thread has already advanced the anchor.
        assert!(matches!(timer.countdown(Local::now()), Countdown::Counting { .. }));
        assert_eq!(timer.countdown_for(&event), Some(Countdown::Firing));

        match timer.countdown(Local::now()) {
            Countdown::Counting { progress, .. } => assert!(progress < 50.0),
            other => panic!("unexpected {:?}", other),
        }

        timer.stop();
        assert_eq!(timer.countdown_for(&event), None);
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let mut timer = ReminderTimer::new();
        let _rx = timer.start(Duration::minutes(1)).unwrap();
        assert!(timer.start(Duration::minutes(1)).is_err());
        timer.stop();
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let mut timer = ReminderTimer::new();
        assert!(!timer.stop());
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let mut timer = ReminderTimer::new();
        assert!(timer.start(Duration::zero()).is_err());
        assert!(!timer.is_running());
    }
}
