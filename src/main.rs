use gpui::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod activity_log;
mod app;
mod notifications;
mod settings;
mod state;
mod theme;
mod timer;
mod ui;

use app::{QuitApp, StandUpApp};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "standup=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting StandUp");

    Application::new().run(move |cx| {
        cx.bind_keys([
            KeyBinding::new("cmd-q", QuitApp, None),
            KeyBinding::new("ctrl-q", QuitApp, None),
        ]);
        // Global so it works from the reminder pop-up and while minimized.
        // Settings are saved by the main view's quit hook.
        cx.on_action(|_: &QuitApp, cx| cx.quit());

        let window_size = size(px(500.0), px(600.0));
        let centered_bounds = Bounds::centered(None, window_size, cx);

        let opened = cx.open_window(
            WindowOptions {
                window_bounds: Some(WindowBounds::Windowed(centered_bounds)),
                titlebar: Some(TitlebarOptions {
                    title: Some("StandUp".into()),
                    ..Default::default()
                }),
                is_resizable: true,
                window_min_size: Some(size(px(400.0), px(500.0))),
                focus: true,
                show: true,
                app_id: Some("standup".to_string()),
                ..Default::default()
            },
            |window, cx| cx.new(|cx| StandUpApp::new(window, cx)),
        );

        if let Err(e) = opened {
            tracing::error!("Failed to open main window: {:#}", e);
            cx.quit();
        }
    });
}
