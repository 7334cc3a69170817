use gpui::prelude::*;
use gpui::*;

use crate::state::Countdown;
use crate::theme::Theme;

/// Ring with the remaining time in the middle and a bar underneath. The ring
/// fades in with progress, the bar fills left to right.
pub struct CountdownRing {
    countdown: Countdown,
    idle_label: String,
    theme: Theme,
}

impl CountdownRing {
    pub fn new(countdown: Countdown, idle_label: String, theme: Theme) -> Self {
        Self {
            countdown,
            idle_label,
            theme,
        }
    }

    fn caption(&self) -> &'static str {
        match self.countdown {
            Countdown::Idle => "until first reminder",
            Countdown::Firing => "reminder due",
            Countdown::Counting { .. } => "until next reminder",
        }
    }

    fn render_ring(&self, progress: f32, color: u32) -> impl IntoElement {
        let is_idle = matches!(self.countdown, Countdown::Idle);
        let label = if is_idle {
            self.idle_label.clone()
        } else {
            self.countdown.label()
        };
        let opacity = (progress / 100.0).clamp(0.0, 1.0);

        div()
            .relative()
            .size(px(160.0))
            .flex()
            .items_center()
            .justify_center()
            .child(
                div()
                    .absolute()
                    .size(px(160.0))
                    .rounded_full()
                    .border_8()
                    .border_color(self.theme.track),
            )
            .child(
                div()
                    .absolute()
                    .size(px(160.0))
                    .rounded_full()
                    .border_8()
                    .border_color(rgb(color))
                    .opacity(opacity),
            )
            .child(
                div()
                    .flex()
                    .flex_col()
                    .items_center()
                    .gap_1()
                    .child(
                        div()
                            .text_size(px(28.0))
                            .font_weight(FontWeight::BOLD)
                            .when(is_idle, |div| div.text_color(self.theme.muted_foreground))
                            .when(!is_idle, |div| div.text_color(rgb(color)))
                            .child(label),
                    )
                    .child(
                        div()
                            .text_xs()
                            .text_color(self.theme.muted_foreground)
                            .child(self.caption()),
                    ),
            )
    }

    fn render_bar(&self, progress: f32, color: u32) -> impl IntoElement {
        div()
            .w(px(240.0))
            .h(px(6.0))
            .rounded(px(3.0))
            .bg(self.theme.track)
            .child(
                div()
                    .h_full()
                    .rounded(px(3.0))
                    .bg(rgb(color))
                    .w(relative((progress / 100.0).clamp(0.0, 1.0))),
            )
    }
}

impl IntoElement for CountdownRing {
    type Element = Div;

    fn into_element(self) -> Self::Element {
        let progress = self.countdown.progress();
        let color = self.countdown.color_hex();

        div()
            .flex()
            .flex_col()
            .items_center()
            .gap_3()
            .child(self.render_ring(progress, color))
            .child(self.render_bar(progress, color))
    }
}
