use gpui::prelude::*;
use gpui::*;
use std::time::{Duration, Instant};

use crate::app::StandUpApp;
use crate::theme::Theme;

pub const REST_CHOICES: [u32; 3] = [5, 10, 15];
pub const AUTO_CLOSE_AFTER: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Rest { minutes: u32 },
    Ignored,
    AutoClosed,
}

impl DialogOutcome {
    pub fn log_message(&self) -> String {
        match self {
            DialogOutcome::Rest { minutes } => format!("Resting for {} minutes", minutes),
            DialogOutcome::Ignored => "Reminder ignored".to_string(),
            DialogOutcome::AutoClosed => "Reminder auto-closed".to_string(),
        }
    }
}

/// Whichever outcome arrives first wins; later ones are dropped.
#[derive(Debug)]
pub struct ReminderPrompt {
    opened_at: Instant,
    outcome: Option<DialogOutcome>,
}

impl ReminderPrompt {
    pub fn new(opened_at: Instant) -> Self {
        Self {
            opened_at,
            outcome: None,
        }
    }

    pub fn resolve(&mut self, outcome: DialogOutcome) -> Option<DialogOutcome> {
        if self.outcome.is_some() {
            return None;
        }
        self.outcome = Some(outcome);
        Some(outcome)
    }

    /// Resolves as auto-closed once `AUTO_CLOSE_AFTER` has passed without an answer.
    pub fn poll_auto_close(&mut self, now: Instant) -> Option<DialogOutcome> {
        if now.saturating_duration_since(self.opened_at) < AUTO_CLOSE_AFTER {
            return None;
        }
        self.resolve(DialogOutcome::AutoClosed)
    }
}

pub struct ReminderDialog {
    prompt: ReminderPrompt,
    app: WeakEntity<StandUpApp>,
}

impl ReminderDialog {
    pub fn open(app: WeakEntity<StandUpApp>, cx: &mut App) -> Result<WindowHandle<ReminderDialog>> {
        let window_size = size(px(400.0), px(300.0));
        let bounds = Bounds::centered(None, window_size, cx);

        cx.open_window(
            WindowOptions {
                window_bounds: Some(WindowBounds::Windowed(bounds)),
                titlebar: None,
                window_decorations: Some(WindowDecorations::Client),
                kind: WindowKind::PopUp,
                is_movable: true,
                is_resizable: false,
                focus: true,
                show: true,
                app_id: Some("standup-reminder".to_string()),
                ..Default::default()
            },
            |window, cx| cx.new(|cx| Self::new(app, window, cx)),
        )
    }

    fn new(app: WeakEntity<StandUpApp>, window: &mut Window, cx: &mut Context<'_, Self>) -> Self {
        cx.spawn_in(window, async move |this, cx| {
            cx.background_spawn(async {
                std::thread::sleep(AUTO_CLOSE_AFTER);
            })
            .await;

            // Fails if the user already closed the window.
            let _ = this.update_in(cx, |dialog, window, cx| {
                let resolved = dialog.prompt.poll_auto_close(Instant::now());
                dialog.finish(resolved, window, cx);
            });
        })
        .detach();

        Self {
            prompt: ReminderPrompt::new(Instant::now()),
            app,
        }
    }

    fn choose(&mut self, outcome: DialogOutcome, window: &mut Window, cx: &mut Context<'_, Self>) {
        let resolved = self.prompt.resolve(outcome);
        self.finish(resolved, window, cx);
    }

    fn finish(
        &mut self,
        resolved: Option<DialogOutcome>,
        window: &mut Window,
        cx: &mut Context<'_, Self>,
    ) {
        let Some(outcome) = resolved else {
            return;
        };

        if let Err(e) = self.app.update(cx, |app, cx| app.record_dialog_outcome(outcome, cx)) {
            tracing::warn!("Main window gone, dropping dialog outcome: {}", e);
        }
        window.remove_window();
    }

    fn render_button(
        &self,
        label: String,
        color: Hsla,
        outcome: DialogOutcome,
        cx: &mut Context<'_, Self>,
    ) -> impl IntoElement {
        div()
            .px_4()
            .py_2()
            .rounded(px(8.0))
            .bg(color)
            .text_sm()
            .font_weight(FontWeight::MEDIUM)
            .text_color(rgb(0xffffff))
            .cursor_pointer()
            .hover(|style| style.opacity(0.8))
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(move |dialog, _event, window, cx| dialog.choose(outcome, window, cx)),
            )
            .child(label)
    }
}

impl Render for ReminderDialog {
    fn render(&mut self, window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
        let theme = Theme::for_window(window);

        let rest_buttons = REST_CHOICES.iter().map(|&minutes| {
            self.render_button(
                format!("Rest {} min", minutes),
                theme.start,
                DialogOutcome::Rest { minutes },
                cx,
            )
            .into_any_element()
        });
        let rest_buttons: Vec<_> = rest_buttons.collect();

        div()
            .size_full()
            .flex()
            .flex_col()
            .items_center()
            .justify_center()
            .gap_4()
            .p_5()
            .bg(theme.background)
            .text_color(theme.foreground)
            .child(
                div()
                    .text_size(px(20.0))
                    .font_weight(FontWeight::BOLD)
                    .child("You've been sitting too long!"),
            )
            .child(
                div()
                    .flex()
                    .flex_col()
                    .gap_1()
                    .text_sm()
                    .text_color(theme.muted_foreground)
                    .child("Time to get up and move.")
                    .child("• Take a short walk")
                    .child("• Do a few stretches")
                    .child("• Look out of the window")
                    .child("• Drink some water"),
            )
            .child(div().flex().flex_row().gap_2().children(rest_buttons))
            .child(self.render_button(
                "Ignore".to_string(),
                theme.disabled,
                DialogOutcome::Ignored,
                cx,
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::prelude::v1::test;
    use crate::activity_log::ActivityLog;

    #[test]
    fn test_first_outcome_wins() {
        let mut prompt = ReminderPrompt::new(Instant::now());
        assert_eq!(
            prompt.resolve(DialogOutcome::Rest { minutes: 10 }),
            Some(DialogOutcome::Rest { minutes: 10 })
        );
        assert_eq!(prompt.resolve(DialogOutcome::AutoClosed), None);
        assert_eq!(prompt.outcome, Some(DialogOutcome::Rest { minutes: 10 }));
    }

    #[test]
    fn test_auto_close_resolves_exactly_once() {
        let mut prompt = ReminderPrompt::new(Instant::now());
        let resolved: Vec<_> = (0..3)
            .filter_map(|_| prompt.resolve(DialogOutcome::AutoClosed))
            .collect();
        assert_eq!(resolved, vec![DialogOutcome::AutoClosed]);
    }

    #[test]
    fn test_ignore_suppresses_auto_close() {
        let opened = Instant::now();
        let mut prompt = ReminderPrompt::new(opened);
        prompt.resolve(DialogOutcome::Ignored);
        assert_eq!(prompt.poll_auto_close(opened + AUTO_CLOSE_AFTER), None);
    }

    #[test]
    fn test_auto_close_waits_thirty_seconds() {
        let opened = Instant::now();
        let mut prompt = ReminderPrompt::new(opened);

        assert_eq!(prompt.poll_auto_close(opened), None);
        assert_eq!(prompt.poll_auto_close(opened + Duration::from_secs(29)), None);
        assert_eq!(
            prompt.poll_auto_close(opened + AUTO_CLOSE_AFTER),
            Some(DialogOutcome::AutoClosed)
        );
        assert_eq!(prompt.poll_auto_close(opened + Duration::from_secs(60)), None);
    }

    #[test]
    fn test_unanswered_prompt_logs_auto_close_once() {
        let opened = Instant::now();
        let mut prompt = ReminderPrompt::new(opened);
        let mut log = ActivityLog::new();

        // A late click and a second wake-up after the timeout must not add entries.
        let attempts = [
            prompt.poll_auto_close(opened + AUTO_CLOSE_AFTER),
            prompt.resolve(DialogOutcome::Rest { minutes: 5 }),
            prompt.poll_auto_close(opened + AUTO_CLOSE_AFTER * 2),
        ];
        for outcome in attempts.into_iter().flatten() {
            log.push(outcome.log_message());
        }

        let entries: Vec<_> = log.recent(usize::MAX).map(|e| e.message.clone()).collect();
        assert_eq!(entries, vec!["Reminder auto-closed".to_string()]);
    }

    #[test]
    fn test_log_messages() {
        assert_eq!(DialogOutcome::Rest { minutes: 5 }.log_message(), "Resting for 5 minutes");
        assert_eq!(DialogOutcome::Ignored.log_message(), "Reminder ignored");
        assert_eq!(DialogOutcome::AutoClosed.log_message(), "Reminder auto-closed");
    }

    #[test]
    fn test_rest_choices_and_timeout() {
        assert_eq!(REST_CHOICES, [5, 10, 15]);
        assert_eq!(AUTO_CLOSE_AFTER, Duration::from_secs(30));
    }
}
