use chrono::{DateTime, Duration, Local};

/// Shared between the UI thread and the reminder thread.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerState {
    pub is_running: bool,
    pub next_reminder_time: Option<DateTime<Local>>,
    pub interval: Duration,
    /// Bumped on every start so events from an earlier run can be told apart.
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Normal,
    Warning,
    Urgent,
}

impl Urgency {
    pub fn from_remaining_secs(remaining_secs: i64) -> Self {
        if remaining_secs < 5 * 60 {
            Urgency::Urgent
        } else if remaining_secs < 10 * 60 {
            Urgency::Warning
        } else {
            Urgency::Normal
        }
    }

    pub fn color_hex(&self) -> u32 {
        match self {
            Urgency::Normal => 0x10b981,  // Green
            Urgency::Warning => 0xf59e0b, // Amber
            Urgency::Urgent => 0xef4444,  // Red
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Countdown {
    Idle,
    /// The anchor was reached on this tick and has been moved to the next slot.
    Firing,
    Counting {
        remaining_secs: i64,
        progress: f32,
        urgency: Urgency,
    },
}

impl Countdown {
    pub fn progress(&self) -> f32 {
        match self {
            Countdown::Counting { progress, .. } => *progress,
            Countdown::Idle | Countdown::Firing => 0.0,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Countdown::Idle => "--:--".to_string(),
            Countdown::Firing => "Stand up!".to_string(),
            Countdown::Counting { remaining_secs, .. } => format_remaining(*remaining_secs),
        }
    }

    pub fn color_hex(&self) -> u32 {
        match self {
            Countdown::Idle => 0x6b7280,   // Gray
            Countdown::Firing => 0x3b82f6, // Blue
            Countdown::Counting { urgency, .. } => urgency.color_hex(),
        }
    }
}

impl TimerState {
    pub fn new() -> Self {
        Self {
            is_running: false,
            next_reminder_time: None,
            interval: Duration::zero(),
            generation: 0,
        }
    }

    /// Marks the timer running with the anchor one interval from `now`.
    /// Returns the new generation.
    pub fn arm(&mut self, interval: Duration, now: DateTime<Local>) -> u64 {
        self.generation += 1;
        self.is_running = true;
        self.interval = interval;
        self.next_reminder_time = Some(now + interval);
        self.generation
    }

    pub fn disarm(&mut self) {
        self.is_running = false;
        self.next_reminder_time = None;
    }

    pub fn is_active(&self, generation: u64) -> bool {
        self.is_running && self.generation == generation
    }

    /// Moves the anchor forward to `anchor` if that is later than the current one.
    /// The anchor never moves backwards.
    pub fn catch_up(&mut self, anchor: DateTime<Local>) {
        match self.next_reminder_time {
            Some(current) if current >= anchor => {}
            _ if self.is_running => self.next_reminder_time = Some(anchor),
            _ => {}
        }
    }

    /// One countdown tick.
    pub fn countdown(&mut self, now: DateTime<Local>) -> Countdown {
        let Some(anchor) = self.next_reminder_time.filter(|_| self.is_running) else {
            return Countdown::Idle;
        };

        if anchor <= now {
            self.catch_up(next_slot_after(anchor, self.interval, now));
            return Countdown::Firing;
        }

        let remaining = anchor - now;
        let remaining_ms = remaining.num_milliseconds();
        let total_ms = self.interval.num_milliseconds();

        Countdown::Counting {
            remaining_secs: (remaining_ms + 999) / 1000,
            progress: progress_percentage(total_ms, remaining_ms),
            urgency: Urgency::from_remaining_secs(remaining.num_seconds()),
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// First anchor strictly after `now`, stepping from `anchor` by whole intervals.
pub fn next_slot_after(anchor: DateTime<Local>, interval: Duration, now: DateTime<Local>) -> DateTime<Local> {
    if interval <= Duration::zero() {
        return now;
    }
    let mut next = anchor;
    while next <= now {
        next += interval;
    }
    next
}

pub fn format_remaining(remaining_secs: i64) -> String {
    let secs = remaining_secs.max(0);
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

pub fn progress_percentage(total_ms: i64, remaining_ms: i64) -> f32 {
    if total_ms <= 0 {
        return 0.0;
    }
    let elapsed = (total_ms - remaining_ms).clamp(0, total_ms);
    (elapsed as f32 / total_ms as f32) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(interval_secs: i64, now: DateTime<Local>) -> TimerState {
        let mut state = TimerState::new();
        state.arm(Duration::seconds(interval_secs), now);
        state
    }

    #[test]
    fn test_format_remaining() {
        assert_eq!(format_remaining(125), "02:05");
        assert_eq!(format_remaining(3665), "01:01:05");
        assert_eq!(format_remaining(0), "00:00");
        assert_eq!(format_remaining(3600), "01:00:00");
        assert_eq!(format_remaining(-3), "00:00");
    }

    #[test]
    fn test_urgency_bands() {
        assert_eq!(Urgency::from_remaining_secs(0), Urgency::Urgent);
        assert_eq!(Urgency::from_remaining_secs(299), Urgency::Urgent);
        assert_eq!(Urgency::from_remaining_secs(300), Urgency::Warning);
        assert_eq!(Urgency::from_remaining_secs(599), Urgency::Warning);
        assert_eq!(Urgency::from_remaining_secs(600), Urgency::Normal);
    }

    #[test]
    fn test_idle_countdown() {
        let mut state = TimerState::new();
        assert_eq!(state.countdown(Local::now()), Countdown::Idle);
    }

    #[test]
    fn test_counting_rounds_up_to_whole_seconds() {
        let start = Local::now();
        let mut state = running(30 * 60, start);

        match state.countdown(start + Duration::milliseconds(200)) {
            Countdown::Counting { remaining_secs, urgency, .. } => {
                assert_eq!(remaining_secs, 30 * 60);
                assert_eq!(urgency, Urgency::Normal);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_progress_is_monotonic_and_resets_after_firing() {
        let start = Local::now();
        let interval = 60;
        let mut state = running(interval, start);

        let mut last = -1.0_f32;
        for second in 0..interval {
            let countdown = state.countdown(start + Duration::seconds(second));
            let progress = countdown.progress();
            assert!(progress >= last, "progress went backwards at {}s", second);
            assert!((0.0..=100.0).contains(&progress));
            last = progress;
        }

        assert_eq!(state.countdown(start + Duration::seconds(interval)), Countdown::Firing);
        assert_eq!(state.next_reminder_time, Some(start + Duration::seconds(2 * interval)));

        let after = state.countdown(start + Duration::seconds(interval));
        assert_eq!(after.progress(), 0.0);
    }

    #[test]
    fn test_firing_skips_missed_slots() {
        let start = Local::now();
        let mut state = running(60, start);

        assert_eq!(state.countdown(start + Duration::seconds(150)), Countdown::Firing);
        assert_eq!(state.next_reminder_time, Some(start + Duration::seconds(180)));
    }

    #[test]
    fn test_catch_up_never_moves_backwards() {
        let start = Local::now();
        let mut state = running(60, start);
        let later = start + Duration::seconds(120);

        state.catch_up(later);
        state.catch_up(start + Duration::seconds(60));
        assert_eq!(state.next_reminder_time, Some(later));
    }

    #[test]
    fn test_catch_up_ignored_when_stopped() {
        let mut state = running(60, Local::now());
        state.disarm();
        state.catch_up(Local::now());
        assert_eq!(state.next_reminder_time, None);
    }

    #[test]
    fn test_arm_bumps_generation() {
        let mut state = TimerState::new();
        let first = state.arm(Duration::seconds(1), Local::now());
        state.disarm();
        let second = state.arm(Duration::seconds(1), Local::now());

        assert!(second > first);
        assert!(!state.is_active(first));
        assert!(state.is_active(second));
    }

    #[test]
    fn test_urgency_color_follows_countdown() {
        let start = Local::now();
        let mut state = running(4 * 60, start);
        let countdown = state.countdown(start);
        assert_eq!(countdown.color_hex(), Urgency::Urgent.color_hex());
    }
}
