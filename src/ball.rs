//! Numbered ball widget.
//!
//! A [`Ball`] holds everything needed to draw one ball: its label, colours,
//! size and the delay that staggers its entrance. Mounting starts the
//! entrance clock; tapping restarts the tap pulse. The same ball renders to
//! styled terminal text, to HTML driven by CSS custom properties, or to a
//! sampled [`Pose`] for any other renderer.

use std::time::Duration;

use console::Style;
use serde::Serialize;
use tracing::{debug, trace};

use crate::animation::{
    Animation, AnimationClock, FillMode, GLOW, POP_IN, Phase, Pose, TAP, TimingFunction, WOBBLE,
};
use crate::palette::{Gradient, Palette, Rgb, Rgba};

/// Extra delay between the entrance and the layered wobble and glow.
pub const LAYER_OFFSET: Duration = Duration::from_millis(120);

/// Entrance, before the ball's delay is applied.
pub const POP_IN_ANIMATION: Animation =
    Animation::new("pop-in", &POP_IN, Duration::from_millis(650))
        .timing(TimingFunction::SPRING_OUT)
        .fill(FillMode::Both);

/// Wobble layered after the entrance.
pub const WOBBLE_ANIMATION: Animation =
    Animation::new("wobble", &WOBBLE, Duration::from_millis(900))
        .timing(TimingFunction::EASE_IN_OUT)
        .fill(FillMode::Both);

/// Halo pulse layered after the entrance.
pub const GLOW_ANIMATION: Animation = Animation::new("glow", &GLOW, Duration::from_millis(700))
    .timing(TimingFunction::EASE_OUT)
    .fill(FillMode::Both);

/// Tap pulse, replayed from zero on every press.
pub const TAP_ANIMATION: Animation = Animation::new("tap", &TAP, Duration::from_millis(420))
    .timing(TimingFunction::EASE_OUT);

/// The three colours a ball is painted with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BallColors {
    pub gradient: Gradient,
    pub ring: Rgba,
    pub text: Rgb,
}

impl From<&Palette> for BallColors {
    fn from(palette: &Palette) -> Self {
        Self {
            gradient: palette.gradient,
            ring: palette.ring,
            text: palette.text,
        }
    }
}

/// A widget that can be mounted and drawn.
pub trait Renderable {
    /// Attach the widget at `now`, starting its entrance.
    fn mount(&mut self, now: Duration);

    /// Static HTML for embedding in a page.
    fn render_html(&self) -> String;

    /// Terminal text for the state at `now`.
    fn render_text(&self, now: Duration) -> String;
}

/// One displayed ball.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    label: u8,
    is_bonus: bool,
    size_px: u16,
    delay: Duration,
    colors: BallColors,
    entrance: AnimationClock,
    nudge: AnimationClock,
}

impl Ball {
    pub fn new(label: u8, delay: Duration, size_px: u16, colors: BallColors) -> Self {
        Self {
            label,
            is_bonus: false,
            size_px,
            delay,
            colors,
            entrance: AnimationClock::new(),
            nudge: AnimationClock::new(),
        }
    }

    /// Mark the ball as the ticket's bonus ball.
    pub const fn bonus(mut self) -> Self {
        self.is_bonus = true;
        self
    }

    pub const fn label(&self) -> u8 {
        self.label
    }

    pub const fn is_bonus(&self) -> bool {
        self.is_bonus
    }

    pub const fn size_px(&self) -> u16 {
        self.size_px
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    pub const fn colors(&self) -> &BallColors {
        &self.colors
    }

    pub const fn is_mounted(&self) -> bool {
        self.entrance.started_at().is_some()
    }

    /// True while the tap pulse owns the ball's animation.
    pub const fn is_nudged(&self) -> bool {
        self.nudge.started_at().is_some()
    }

    /// Change the stagger delay and replay the entrance at `now`.
    pub fn set_delay(&mut self, delay: Duration, now: Duration) {
        trace!(label = self.label, delay_ms = delay.as_millis(), "Ball delay changed");
        self.delay = delay;
        self.nudge.stop();
        self.entrance.restart(now);
    }

    /// Replay the tap pulse from the start.
    pub fn tap(&mut self, now: Duration) {
        debug!(label = self.label, "Ball tapped");
        self.nudge.restart(now);
    }

    pub const fn pop_in(&self) -> Animation {
        POP_IN_ANIMATION.delay(self.delay)
    }

    pub fn wobble(&self) -> Animation {
        WOBBLE_ANIMATION.delay(self.delay + LAYER_OFFSET)
    }

    pub fn glow(&self) -> Animation {
        GLOW_ANIMATION.delay(self.delay + LAYER_OFFSET)
    }

    /// Ball pose at `now`.
    ///
    /// A tap replaces the entrance layers for good. Otherwise the entrance
    /// drives the ball until the wobble's interval starts, after which the
    /// wobble owns the transform and the entrance keeps only opacity.
    pub fn pose_at(&self, now: Duration) -> Pose {
        if let Some(elapsed) = self.nudge.elapsed(now) {
            return TAP_ANIMATION.sample(elapsed).unwrap_or(Pose::REST);
        }
        let Some(elapsed) = self.entrance.elapsed(now) else {
            return Pose::REST;
        };

        let pop = self.pop_in().sample(elapsed).unwrap_or(Pose::REST);
        let wobble = self.wobble();
        if wobble.phase(elapsed) == Phase::Pending {
            return pop;
        }
        let wobble_pose = wobble.sample(elapsed).unwrap_or(Pose::REST);
        Pose {
            opacity: pop.opacity,
            ..wobble_pose
        }
    }

    /// Halo pose at `now`; scale and opacity apply to the halo.
    pub fn glow_at(&self, now: Duration) -> Option<Pose> {
        if self.is_nudged() {
            return None;
        }
        let elapsed = self.entrance.elapsed(now)?;
        self.glow().sample(elapsed)
    }

    /// True once every entrance layer and any tap have finished.
    pub fn is_settled(&self, now: Duration) -> bool {
        if let Some(elapsed) = self.nudge.elapsed(now) {
            return TAP_ANIMATION.phase(elapsed) == Phase::Finished;
        }
        self.entrance.elapsed(now).is_none_or(|elapsed| {
            let end = self.wobble().end().max(self.glow().end());
            elapsed >= end
        })
    }

    /// Instant at which the ball comes to rest.
    pub fn settles_at(&self) -> Duration {
        if let Some(start) = self.nudge.started_at() {
            return start + TAP_ANIMATION.end();
        }
        self.entrance.started_at().map_or(Duration::ZERO, |start| {
            start + self.wobble().end().max(self.glow().end())
        })
    }

    /// CSS custom properties an embedding page sets on the ball.
    pub fn style_vars(&self) -> Vec<(&'static str, String)> {
        vec![
            ("--delay", format!("{}ms", self.delay.as_millis())),
            ("--size", format!("{}px", self.size_px)),
            ("--ball-grad", self.colors.gradient.css()),
            ("--ball-ring", self.colors.ring.css()),
            ("--ball-text", self.colors.text.hex()),
        ]
    }

    fn text_style(&self) -> Style {
        Style::new()
            .bold()
            .color256(self.colors.text.to_ansi256())
            .on_color256(self.colors.gradient.from.to_ansi256())
    }
}

impl Renderable for Ball {
    fn mount(&mut self, now: Duration) {
        trace!(label = self.label, delay_ms = self.delay.as_millis(), "Ball mounted");
        self.nudge.stop();
        self.entrance.restart(now);
    }

    fn render_html(&self) -> String {
        let style = self
            .style_vars()
            .into_iter()
            .map(|(name, value)| format!("{name}: {value};"))
            .collect::<Vec<_>>()
            .join(" ");
        let class = if self.is_bonus {
            "lotto-ball bonus"
        } else {
            "lotto-ball"
        };
        format!(
            r#"<span class="{class}" data-number="{label}" style="{style}"><span class="ball">{label}</span></span>"#,
            label = self.label
        )
    }

    fn render_text(&self, now: Duration) -> String {
        let pose = self.pose_at(now);
        if pose.opacity < 0.05 {
            return "    ".to_string();
        }
        let body = if pose.scale >= 1.03 {
            format!("[{:02}]", self.label)
        } else {
            format!(" {:02} ", self.label)
        };
        let style = if pose.opacity < 0.99 {
            self.text_style().dim()
        } else {
            self.text_style()
        };
        style.apply_to(body).to_string()
    }
}
