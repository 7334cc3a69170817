use notify_rust::Notification;

pub fn notify_stand_up(interval_minutes: u32) {
    let result = Notification::new()
        .summary("Time to stand up!")
        .body(&format!(
            "You've been sitting for {} minutes. Stretch, walk, drink some water.",
            interval_minutes
        ))
        .timeout(5000)
        .show();

    if let Err(e) = result {
        tracing::warn!("Failed to show desktop notification: {}", e);
    }
}
