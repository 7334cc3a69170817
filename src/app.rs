use chrono::Local;
use gpui::prelude::*;
use gpui::*;
use std::path::{Path, PathBuf};

use crate::activity_log::ActivityLog;
use crate::notifications;
use crate::settings::{Settings, MAX_INTERVAL_MINUTES, MIN_INTERVAL_MINUTES};
use crate::state::{format_remaining, Countdown};
use crate::theme::Theme;
use crate::timer::{ReminderTimer, TimerEvent};
use crate::ui::{CountdownRing, DialogOutcome, ReminderDialog};

actions!(standup, [QuitApp]);

const VISIBLE_LOG_ENTRIES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    NotStarted,
    Running { interval_minutes: u32 },
    Stopped,
}

impl Status {
    pub fn text(&self) -> String {
        match self {
            Status::NotStarted => "Status: not started".to_string(),
            Status::Running { interval_minutes } => {
                format!("Status: running (every {} minutes)", interval_minutes)
            }
            Status::Stopped => "Status: stopped".to_string(),
        }
    }
}

pub struct StandUpApp {
    settings: Settings,
    settings_path: Option<PathBuf>,
    timer: ReminderTimer,
    countdown: Countdown,
    status: Status,
    log: ActivityLog,
    reminder_window: Option<WindowHandle<ReminderDialog>>,
    focus_handle: FocusHandle,
}

impl StandUpApp {
    pub fn new(window: &mut Window, cx: &mut Context<'_, Self>) -> Self {
        let mut log = ActivityLog::new();
        log.push("Application started");

        let settings_path = match Settings::settings_path() {
            Ok(path) => Some(path),
            Err(e) => {
                log.push_error("Settings location unavailable", &e);
                None
            }
        };

        let settings = match &settings_path {
            Some(path) => {
                let (settings, err) = Settings::load_or_default(path);
                if let Some(e) = err {
                    log.push_error("Failed to load settings", &e);
                }
                settings
            }
            None => Settings::default(),
        };
        tracing::debug!(?settings, "Loaded settings");

        // Countdown tick loop
        cx.spawn(async move |this, cx| loop {
            cx.background_spawn(async {
                std::thread::sleep(std::time::Duration::from_secs(1));
            })
            .await;

            if this.update(cx, |app, cx| app.tick(cx)).is_err() {
                break;
            }
        })
        .detach();

        // Every quit lands here, including one started by the platform.
        cx.on_app_quit(|app, _cx| {
            app.shut_down();
            async {}
        })
        .detach();

        let this = cx.weak_entity();
        window.on_window_should_close(cx, move |window, cx| {
            this.update(cx, |app, cx| app.handle_close_request(window, cx))
                .unwrap_or(true)
        });

        let mut app = Self {
            settings,
            settings_path,
            timer: ReminderTimer::new(),
            countdown: Countdown::Idle,
            status: Status::NotStarted,
            log,
            reminder_window: None,
            focus_handle: cx.focus_handle(),
        };

        if app.settings.auto_start {
            app.start_reminders(cx);
        }

        app
    }

    pub fn start_reminders(&mut self, cx: &mut Context<'_, Self>) {
        if self.timer.is_running() {
            return;
        }

        let interval_minutes = self.settings.interval_minutes;
        match self.timer.start(self.settings.interval()) {
            Ok(mut events) => {
                cx.spawn(async move |this, cx| {
                    while let Some(event) = events.recv().await {
                        if this.update(cx, |app, cx| app.on_timer_event(event, cx)).is_err() {
                            break;
                        }
                    }
                })
                .detach();

                self.status = Status::Running { interval_minutes };
                self.countdown = self.timer.countdown(Local::now());
                self.log
                    .push(format!("Reminders started, every {} minutes", interval_minutes));
            }
            Err(e) => self.log.push_error("Failed to start reminders", &e),
        }
        cx.notify();
    }

    pub fn stop_reminders(&mut self, cx: &mut Context<'_, Self>) {
        if self.timer.stop() {
            self.status = Status::Stopped;
            self.log.push("Reminders stopped");
        }
        self.countdown = Countdown::Idle;
        cx.notify();
    }

    pub fn toggle_reminders(&mut self, cx: &mut Context<'_, Self>) {
        if self.timer.is_running() {
            self.stop_reminders(cx);
        } else {
            self.start_reminders(cx);
        }
    }

    pub fn step_interval(&mut self, delta: i32, cx: &mut Context<'_, Self>) {
        // The running timer keeps the interval it was started with.
        if self.timer.is_running() {
            return;
        }
        self.settings.step_interval(delta);
        cx.notify();
    }

    pub fn toggle_auto_start(&mut self, cx: &mut Context<'_, Self>) {
        self.settings.auto_start = !self.settings.auto_start;
        cx.notify();
    }

    pub fn toggle_minimize_to_tray(&mut self, cx: &mut Context<'_, Self>) {
        self.settings.minimize_to_tray = !self.settings.minimize_to_tray;
        cx.notify();
    }

    pub fn record_dialog_outcome(&mut self, outcome: DialogOutcome, cx: &mut Context<'_, Self>) {
        self.log.push(outcome.log_message());
        self.reminder_window = None;
        cx.notify();
    }

    fn shut_down(&mut self) {
        shut_down(
            &self.settings,
            self.settings_path.as_deref(),
            &mut self.timer,
            &mut self.log,
        );
    }

    fn tick(&mut self, cx: &mut Context<'_, Self>) {
        if !self.timer.is_running() {
            return;
        }
        self.countdown = self.timer.countdown(Local::now());
        cx.notify();
    }

    fn on_timer_event(&mut self, event: TimerEvent, cx: &mut Context<'_, Self>) {
        let Some(countdown) = self.timer.countdown_for(&event) else {
            tracing::debug!(?event, "Dropping event from a stopped run");
            return;
        };

        match event {
            TimerEvent::Fired { .. } => {
                self.log.push("Time to stand up!");
                notifications::notify_stand_up(self.timer.snapshot().interval.num_minutes() as u32);
                self.present_reminder(cx);
                // Held until the next tick recomputes.
                self.countdown = countdown;
                cx.notify();
            }
        }
    }

    fn present_reminder(&mut self, cx: &mut Context<'_, Self>) {
        if let Some(handle) = &self.reminder_window {
            let still_open = handle.update(cx, |_, _, _| ()).is_ok();
            if still_open {
                self.log.push("Previous reminder still open");
                return;
            }
        }

        match ReminderDialog::open(cx.weak_entity(), cx) {
            Ok(handle) => self.reminder_window = Some(handle),
            Err(e) => self.log.push_error("Failed to open reminder", &e),
        }
    }

    fn handle_close_request(&mut self, window: &mut Window, cx: &mut Context<'_, Self>) -> bool {
        if self.settings.minimize_to_tray {
            window.minimize_window();
            self.log.push("Application minimized");
            cx.notify();
            false
        } else {
            cx.quit();
            true
        }
    }

    fn render_button(
        &self,
        label: &str,
        color: Hsla,
        enabled: bool,
        theme: &Theme,
        cx: &mut Context<'_, Self>,
        on_click: impl Fn(&mut Self, &mut Context<'_, Self>) + 'static,
    ) -> impl IntoElement {
        div()
            .px_4()
            .py_2()
            .rounded(px(8.0))
            .text_sm()
            .font_weight(FontWeight::MEDIUM)
            .text_color(rgb(0xffffff))
            .when(enabled, |div| {
                div.bg(color)
                    .cursor_pointer()
                    .hover(|style| style.opacity(0.8))
                    .on_mouse_down(
                        MouseButton::Left,
                        cx.listener(move |app, _event, _window, cx| on_click(app, cx)),
                    )
            })
            .when(!enabled, |div| div.bg(theme.disabled))
            .child(label.to_string())
    }

    fn render_checkbox(
        &self,
        label: &str,
        checked: bool,
        theme: &Theme,
        cx: &mut Context<'_, Self>,
        on_toggle: impl Fn(&mut Self, &mut Context<'_, Self>) + 'static,
    ) -> impl IntoElement {
        div()
            .flex()
            .flex_row()
            .items_center()
            .gap_2()
            .cursor_pointer()
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(move |app, _event, _window, cx| on_toggle(app, cx)),
            )
            .child(
                div()
                    .size(px(16.0))
                    .flex()
                    .items_center()
                    .justify_center()
                    .rounded(px(3.0))
                    .border_1()
                    .border_color(theme.border)
                    .text_xs()
                    .when(checked, |div| div.bg(theme.start).text_color(rgb(0xffffff)).child("✓")),
            )
            .child(label.to_string())
    }

    fn render_settings_panel(&self, theme: &Theme, cx: &mut Context<'_, Self>) -> impl IntoElement {
        let editable = !self.timer.is_running();
        let minutes = self.settings.interval_minutes;

        div()
            .w_full()
            .flex()
            .flex_col()
            .gap_3()
            .p_3()
            .rounded(px(8.0))
            .bg(theme.panel)
            .border_1()
            .border_color(theme.border)
            .child(
                div()
                    .text_sm()
                    .font_weight(FontWeight::BOLD)
                    .child("Reminder settings"),
            )
            .child(
                div()
                    .flex()
                    .flex_row()
                    .items_center()
                    .gap_2()
                    .child("Interval:")
                    .child(self.render_button(
                        "−",
                        theme.track,
                        editable && minutes > MIN_INTERVAL_MINUTES,
                        theme,
                        cx,
                        |app, cx| app.step_interval(-1, cx),
                    ))
                    .child(div().min_w(px(64.0)).child(format!("{} min", minutes)))
                    .child(self.render_button(
                        "+",
                        theme.track,
                        editable && minutes < MAX_INTERVAL_MINUTES,
                        theme,
                        cx,
                        |app, cx| app.step_interval(1, cx),
                    )),
            )
            .child(self.render_checkbox(
                "Start reminding on launch",
                self.settings.auto_start,
                theme,
                cx,
                |app, cx| app.toggle_auto_start(cx),
            ))
            .child(self.render_checkbox(
                "Minimize on close",
                self.settings.minimize_to_tray,
                theme,
                cx,
                |app, cx| app.toggle_minimize_to_tray(cx),
            ))
    }

    fn render_activity_log(&self, theme: &Theme) -> impl IntoElement {
        let entries: Vec<_> = self
            .log
            .recent(VISIBLE_LOG_ENTRIES)
            .map(|entry| div().child(entry.display()))
            .collect();

        div()
            .w_full()
            .flex()
            .flex_col()
            .gap_1()
            .p_3()
            .rounded(px(8.0))
            .bg(theme.panel)
            .border_1()
            .border_color(theme.border)
            .text_xs()
            .font_family("Monaco")
            .child(
                div()
                    .text_sm()
                    .font_weight(FontWeight::BOLD)
                    .child("Activity"),
            )
            .children(entries)
    }
}

/// Stops reminding and writes settings. Save failures only reach the log.
fn shut_down(
    settings: &Settings,
    settings_path: Option<&Path>,
    timer: &mut ReminderTimer,
    log: &mut ActivityLog,
) {
    if timer.stop() {
        log.push("Reminders stopped");
    }

    let Some(path) = settings_path else {
        return;
    };
    match settings.save(path) {
        Ok(()) => tracing::info!("Saved settings to {}", path.display()),
        Err(e) => log.push_error("Failed to save settings", &e),
    }
}

impl Render for StandUpApp {
    fn render(&mut self, window: &mut Window, cx: &mut Context<'_, Self>) -> impl IntoElement {
        let theme = Theme::for_window(window);
        let is_running = self.timer.is_running();

        self.focus_handle.focus(window);

        let idle_label = format_remaining(i64::from(self.settings.interval_minutes) * 60);
        let ring = CountdownRing::new(self.countdown.clone(), idle_label, Theme::for_window(window));

        div()
            .size_full()
            .flex()
            .flex_col()
            .items_center()
            .gap_4()
            .p_5()
            .bg(theme.background)
            .text_color(theme.foreground)
            .track_focus(&self.focus_handle)
            .on_key_down(cx.listener(|app, event: &KeyDownEvent, _window, cx| {
                match event.keystroke.key.as_str() {
                    "space" => app.toggle_reminders(cx),
                    "up" => app.step_interval(1, cx),
                    "down" => app.step_interval(-1, cx),
                    _ => {}
                }
            }))
            .child(
                div()
                    .text_size(px(22.0))
                    .font_weight(FontWeight::BOLD)
                    .child("StandUp"),
            )
            .child(self.render_settings_panel(&theme, cx))
            .child(
                div()
                    .flex()
                    .flex_row()
                    .gap_3()
                    .child(self.render_button(
                        "Start reminders",
                        theme.start,
                        !is_running,
                        &theme,
                        cx,
                        |app, cx| app.start_reminders(cx),
                    ))
                    .child(self.render_button(
                        "Stop reminders",
                        theme.stop,
                        is_running,
                        &theme,
                        cx,
                        |app, cx| app.stop_reminders(cx),
                    )),
            )
            .child(
                div()
                    .text_sm()
                    .text_color(theme.muted_foreground)
                    .child(self.status.text()),
            )
            .child(ring)
            .child(self.render_activity_log(&theme))
    }
}
