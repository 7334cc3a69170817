mod countdown_ring;
mod reminder_dialog;

pub use countdown_ring::CountdownRing;
pub use reminder_dialog::{DialogOutcome, ReminderDialog};
