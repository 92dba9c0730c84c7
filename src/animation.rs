//! Keyframe animation model.
//!
//! Animations are declarative: a list of keyframes, a duration, a start
//! delay, a timing function and a fill mode. Sampling an animation at an
//! elapsed time yields the [`Pose`] it contributes at that instant. The
//! [`AnimationClock`] is the restart primitive: restarting resets the clock
//! so every animation keyed off it replays from the beginning.

use std::time::Duration;

use serde::Serialize;
use tracing::trace;

/// Visual state an animation drives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose {
    /// Vertical offset in pixels (positive is down).
    pub translate_y: f64,
    pub scale: f64,
    pub rotate_deg: f64,
    pub opacity: f64,
}

impl Pose {
    /// The resting pose.
    pub const REST: Self = Self::new(0.0, 1.0, 0.0, 1.0);

    pub const fn new(translate_y: f64, scale: f64, rotate_deg: f64, opacity: f64) -> Self {
        Self {
            translate_y,
            scale,
            rotate_deg,
            opacity,
        }
    }

    /// Linear interpolation between two poses.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            translate_y: mix(self.translate_y, other.translate_y),
            scale: mix(self.scale, other.scale),
            rotate_deg: mix(self.rotate_deg, other.rotate_deg),
            opacity: mix(self.opacity, other.opacity),
        }
    }

    /// CSS `transform` value for this pose.
    pub fn css_transform(&self) -> String {
        format!(
            "translateY({:.2}px) scale({:.3}) rotate({:.2}deg)",
            self.translate_y, self.scale, self.rotate_deg
        )
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::REST
    }
}

/// Timing function applied within each keyframe segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimingFunction {
    Linear,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`.
    CubicBezier(f64, f64, f64, f64),
}

impl TimingFunction {
    pub const EASE_IN_OUT: Self = Self::CubicBezier(0.42, 0.0, 0.58, 1.0);
    pub const EASE_OUT: Self = Self::CubicBezier(0.0, 0.0, 0.58, 1.0);
    /// Fast start with a long settle, used by the entrance.
    pub const SPRING_OUT: Self = Self::CubicBezier(0.16, 1.0, 0.3, 1.0);

    /// Map input progress `x` in `0..=1` to eased progress.
    pub fn apply(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        match *self {
            Self::Linear => x,
            Self::CubicBezier(x1, y1, x2, y2) => {
                let t = solve_bezier_t(x, x1, x2);
                bezier(t, y1, y2)
            }
        }
    }
}

impl TimingFunction {
    /// CSS `animation-timing-function` value.
    pub fn css(&self) -> String {
        match *self {
            Self::Linear => "linear".to_string(),
            Self::CubicBezier(x1, y1, x2, y2) => format!("cubic-bezier({x1}, {y1}, {x2}, {y2})"),
        }
    }
}

/// One-dimensional cubic Bezier with endpoints fixed at 0 and 1.
fn bezier(t: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - t;
    3.0 * inv * inv * t * p1 + 3.0 * inv * t * t * p2 + t * t * t
}

fn bezier_slope(t: f64, p1: f64, p2: f64) -> f64 {
    let inv = 1.0 - t;
    3.0 * inv * inv * p1 + 6.0 * inv * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

/// Find the curve parameter whose x coordinate is `x`.
fn solve_bezier_t(x: f64, x1: f64, x2: f64) -> f64 {
    let mut t = x;
    for _ in 0..8 {
        let err = bezier(t, x1, x2) - x;
        if err.abs() < 1e-7 {
            return t;
        }
        let slope = bezier_slope(t, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        t -= err / slope;
    }

    // Newton stalled: bisect, x(t) is monotonic for x1, x2 in 0..=1
    let (mut lo, mut hi) = (0.0, 1.0);
    t = x;
    for _ in 0..50 {
        let value = bezier(t, x1, x2);
        if (value - x).abs() < 1e-7 {
            break;
        }
        if value < x {
            lo = t;
        } else {
            hi = t;
        }
        t = (lo + hi) / 2.0;
    }
    t
}

/// Pose at a fractional offset of the animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    /// Offset in `0..=1`.
    pub offset: f64,
    pub pose: Pose,
}

const fn key(offset: f64, translate_y: f64, scale: f64, rotate_deg: f64, opacity: f64) -> Keyframe {
    Keyframe {
        offset,
        pose: Pose::new(translate_y, scale, rotate_deg, opacity),
    }
}

/// Drop in from above, overshoot, settle.
pub const POP_IN: [Keyframe; 3] = [
    key(0.0, -24.0, 0.6, -12.0, 0.0),
    key(0.6, 6.0, 1.08, 3.0, 1.0),
    key(1.0, 0.0, 1.0, 0.0, 1.0),
];

pub const WOBBLE: [Keyframe; 4] = [
    key(0.0, 0.0, 1.0, 0.0, 1.0),
    key(0.35, -4.0, 1.02, 6.0, 1.0),
    key(0.7, 2.0, 0.98, -5.0, 1.0),
    key(1.0, 0.0, 1.0, 0.0, 1.0),
];

/// Radial halo pulse; opacity and scale apply to the halo, not the ball.
pub const GLOW: [Keyframe; 3] = [
    key(0.0, 0.0, 0.6, 0.0, 0.0),
    key(0.5, 0.0, 1.0, 0.0, 0.9),
    key(1.0, 0.0, 1.15, 0.0, 0.0),
];

pub const TAP: [Keyframe; 3] = [
    key(0.0, 0.0, 1.0, 0.0, 1.0),
    key(0.4, 0.0, 1.08, 0.0, 1.0),
    key(1.0, 0.0, 1.0, 0.0, 1.0),
];

pub const CELEBRATE: [Keyframe; 4] = [
    key(0.0, 0.0, 1.0, 0.0, 1.0),
    key(0.3, -6.0, 1.03, -1.0, 1.0),
    key(0.65, 0.0, 0.99, 1.0, 1.0),
    key(1.0, 0.0, 1.0, 0.0, 1.0),
];

/// Whether an animation holds its end poses outside its active interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    #[default]
    None,
    Backwards,
    Forwards,
    Both,
}

impl FillMode {
    const fn backwards(self) -> bool {
        matches!(self, Self::Backwards | Self::Both)
    }

    const fn forwards(self) -> bool {
        matches!(self, Self::Forwards | Self::Both)
    }

    /// CSS `animation-fill-mode` value.
    pub const fn css(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Backwards => "backwards",
            Self::Forwards => "forwards",
            Self::Both => "both",
        }
    }
}

/// Where an animation is relative to its active interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Pending,
    Running,
    Finished,
}

/// A declarative keyframe animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    pub name: &'static str,
    pub keyframes: &'static [Keyframe],
    pub duration: Duration,
    pub delay: Duration,
    pub timing: TimingFunction,
    pub fill: FillMode,
}

impl Animation {
    pub const fn new(
        name: &'static str,
        keyframes: &'static [Keyframe],
        duration: Duration,
    ) -> Self {
        Self {
            name,
            keyframes,
            duration,
            delay: Duration::ZERO,
            timing: TimingFunction::Linear,
            fill: FillMode::None,
        }
    }

    pub const fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub const fn timing(mut self, timing: TimingFunction) -> Self {
        self.timing = timing;
        self
    }

    pub const fn fill(mut self, fill: FillMode) -> Self {
        self.fill = fill;
        self
    }

    /// Time at which the animation stops contributing motion.
    pub fn end(&self) -> Duration {
        self.delay + self.duration
    }

    pub fn phase(&self, elapsed: Duration) -> Phase {
        if elapsed < self.delay {
            Phase::Pending
        } else if elapsed < self.end() {
            Phase::Running
        } else {
            Phase::Finished
        }
    }

    /// Pose contributed at `elapsed` since the clock started.
    ///
    /// Returns `None` outside the active interval unless the fill mode holds
    /// the first or last keyframe there.
    pub fn sample(&self, elapsed: Duration) -> Option<Pose> {
        let first = self.keyframes.first()?;
        let last = self.keyframes.last()?;

        match self.phase(elapsed) {
            Phase::Pending => self.fill.backwards().then_some(first.pose),
            Phase::Finished => self.fill.forwards().then_some(last.pose),
            Phase::Running => {
                let local = (elapsed - self.delay).as_secs_f64();
                let progress = local / self.duration.as_secs_f64();
                Some(self.interpolate(progress))
            }
        }
    }

    /// CSS `@keyframes` rule for this animation.
    pub fn css_keyframes(&self) -> String {
        let mut rule = format!("@keyframes {} {{\n", self.name);
        for frame in self.keyframes {
            rule.push_str(&format!(
                "  {:.0}% {{ transform: {}; opacity: {}; }}\n",
                frame.offset * 100.0,
                frame.pose.css_transform(),
                frame.pose.opacity
            ));
        }
        rule.push_str("}\n");
        rule
    }

    /// CSS `animation` shorthand, with the delay given as a CSS expression.
    pub fn css_shorthand(&self, delay: &str) -> String {
        format!(
            "{} {}ms {} {} {}",
            self.name,
            self.duration.as_millis(),
            self.timing.css(),
            delay,
            self.fill.css()
        )
    }

    fn interpolate(&self, progress: f64) -> Pose {
        let frames = self.keyframes;
        let idx = frames
            .windows(2)
            .position(|w| progress >= w[0].offset && progress <= w[1].offset)
            .unwrap_or(frames.len().saturating_sub(2));
        let (a, b) = (&frames[idx], &frames[(idx + 1).min(frames.len() - 1)]);

        let span = b.offset - a.offset;
        if span <= f64::EPSILON {
            return b.pose;
        }
        let segment = (progress - a.offset) / span;
        let eased = self.timing.apply(segment);
        trace!(name = self.name, progress, eased, "Sampled keyframe segment");
        a.pose.lerp(&b.pose, eased)
    }
}

/// Restartable clock shared by a group of animations.
///
/// Timestamps are offsets from an arbitrary epoch owned by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnimationClock {
    started_at: Option<Duration>,
    plays: u32,
}

impl AnimationClock {
    pub const fn new() -> Self {
        Self {
            started_at: None,
            plays: 0,
        }
    }

    /// Reset the clock to zero at `now` and replay from the start.
    pub fn restart(&mut self, now: Duration) {
        self.started_at = Some(now);
        self.plays += 1;
    }

    /// Stop the clock; animations keyed off it no longer play.
    pub fn stop(&mut self) {
        self.started_at = None;
    }

    pub const fn started_at(&self) -> Option<Duration> {
        self.started_at
    }

    /// How many times the clock has been (re)started.
    pub const fn plays(&self) -> u32 {
        self.plays
    }

    /// Elapsed time at `now`, or `None` if the clock never started.
    pub fn elapsed(&self, now: Duration) -> Option<Duration> {
        self.started_at.map(|start| now.saturating_sub(start))
    }
}
