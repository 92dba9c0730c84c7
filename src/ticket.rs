//! Ticket board: draws tickets and lays out their balls.
//!
//! The board owns two containers, one for the six main balls and one for the
//! bonus ball, plus the draw-time label and the card's celebration clock.
//! Every generation clears both containers before repopulating them, so the
//! board never holds more than one ticket's worth of balls.

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::animation::{Animation, AnimationClock, CELEBRATE, FillMode, TimingFunction};
use crate::ball::{Ball, BallColors, Renderable};
use crate::config::BoardConfig;
use crate::numbers::Ticket;
use crate::palette::select_palette;

/// DOM id of the main-number container.
pub const NUMBERS_CONTAINER_ID: &str = "lotto-numbers-container";

/// DOM id of the bonus container.
pub const BONUS_CONTAINER_ID: &str = "bonus-number-container";

/// Card-level celebration replayed after every generation or shuffle.
pub const CELEBRATION: Animation =
    Animation::new("celebrate", &CELEBRATE, Duration::from_millis(600))
        .timing(TimingFunction::EASE_OUT)
        .fill(FillMode::None);

/// Time source for the board.
pub trait Clock {
    /// Monotonic offset used for animation clocks.
    fn now(&self) -> Duration;

    /// Wall-clock time for the draw-time label.
    fn local_time(&self) -> DateTime<Local>;
}

/// Real clock anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn local_time(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// An ordered list of rendered balls.
#[derive(Debug, Clone, PartialEq)]
pub struct BallContainer {
    id: &'static str,
    balls: Vec<Ball>,
}

impl BallContainer {
    pub const fn new(id: &'static str) -> Self {
        Self {
            id,
            balls: Vec::new(),
        }
    }

    pub const fn id(&self) -> &'static str {
        self.id
    }

    pub fn clear(&mut self) {
        self.balls.clear();
    }

    /// Append and mount a ball.
    pub fn append(&mut self, mut ball: Ball, now: Duration) {
        ball.mount(now);
        self.balls.push(ball);
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn balls_mut(&mut self) -> &mut [Ball] {
        &mut self.balls
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn render_html(&self) -> String {
        let inner: String = self.balls.iter().map(Renderable::render_html).collect();
        format!(r#"<div id="{}" class="balls">{inner}</div>"#, self.id)
    }
}

/// Addresses one rendered ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallSlot {
    /// Main ball by position, 0-based.
    Main(usize),
    Bonus,
}

impl BallSlot {
    /// Parse a 1-based position where 7 is the bonus ball.
    pub fn from_position(position: usize) -> Option<Self> {
        match position {
            1..=6 => Some(Self::Main(position - 1)),
            7 => Some(Self::Bonus),
            _ => None,
        }
    }
}

/// Serializable snapshot of one ball.
#[derive(Debug, Clone, Serialize)]
pub struct BallView {
    pub number: u8,
    pub bonus: bool,
    pub delay_ms: u64,
    pub size_px: u16,
    pub colors: BallColors,
}

impl From<&Ball> for BallView {
    fn from(ball: &Ball) -> Self {
        Self {
            number: ball.label(),
            bonus: ball.is_bonus(),
            delay_ms: u64::try_from(ball.delay().as_millis()).unwrap_or(u64::MAX),
            size_px: ball.size_px(),
            colors: *ball.colors(),
        }
    }
}

/// Serializable snapshot of the board.
#[derive(Debug, Clone, Serialize)]
pub struct TicketView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub numbers: Vec<BallView>,
    pub bonus: Vec<BallView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_time: Option<String>,
    pub celebrations: u32,
}

/// Draws tickets and keeps their rendered balls.
pub struct TicketBuilder<R, C> {
    config: BoardConfig,
    rng: R,
    clock: C,
    ticket: Option<Ticket>,
    numbers: BallContainer,
    bonus: BallContainer,
    draw_time: Option<String>,
    celebration: AnimationClock,
}

impl<R: Rng, C: Clock> TicketBuilder<R, C> {
    /// Empty board. Config fields that fail validation fall back to defaults.
    pub fn new(config: BoardConfig, rng: R, clock: C) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!(error = %e, "Invalid board config, using defaults for rejected fields");
                config.repaired()
            }
        };
        Self {
            config,
            rng,
            clock,
            ticket: None,
            numbers: BallContainer::new(NUMBERS_CONTAINER_ID),
            bonus: BallContainer::new(BONUS_CONTAINER_ID),
            draw_time: None,
            celebration: AnimationClock::new(),
        }
    }

    /// Board that opens on a freshly drawn ticket.
    pub fn drawn(config: BoardConfig, rng: R, clock: C) -> Self {
        let mut board = Self::new(config, rng, clock);
        board.generate_ticket();
        board
    }

    /// Draw a fresh ticket and replace whatever the board shows.
    #[instrument(skip(self))]
    pub fn generate_ticket(&mut self) -> &Ticket {
        let ticket = Ticket::draw(&mut self.rng);
        info!(numbers = ?ticket.numbers, bonus = ticket.bonus, "Ticket drawn");
        self.render_ticket(ticket)
    }

    /// Lay out `ticket`, replacing the previous one.
    #[instrument(skip(self, ticket), fields(id = %ticket.id))]
    pub fn render_ticket(&mut self, ticket: Ticket) -> &Ticket {
        let now = self.clock.now();
        self.numbers.clear();
        self.bonus.clear();

        for (index, &number) in ticket.numbers.iter().enumerate() {
            let ball = self.make_ball(number, index, false);
            self.numbers.append(ball, now);
        }
        let bonus = self.make_ball(ticket.bonus, ticket.numbers.len(), true);
        self.bonus.append(bonus, now);

        self.update_draw_time();
        self.play_celebration();
        debug!(
            numbers = self.numbers.len(),
            bonus = self.bonus.len(),
            "Ticket rendered"
        );
        self.ticket.insert(ticket)
    }

    /// Give every rendered ball a new random delay and replay the entrance.
    ///
    /// Numbers are left untouched. Does nothing but the celebration on an
    /// empty board.
    #[instrument(skip(self))]
    pub fn shuffle_delays(&mut self) {
        let now = self.clock.now();
        let max = self.config.shuffle_max_delay_ms;
        if self.numbers.is_empty() && self.bonus.is_empty() {
            warn!("Shuffle requested before any ticket was drawn");
        }
        for ball in self
            .numbers
            .balls_mut()
            .iter_mut()
            .chain(self.bonus.balls_mut().iter_mut())
        {
            let delay = Duration::from_millis(self.rng.gen_range(0..=max));
            ball.set_delay(delay, now);
        }
        self.play_celebration();
        debug!("Ball delays shuffled");
    }

    /// Replay the tap pulse on one ball. Returns false for an empty slot.
    pub fn tap(&mut self, slot: BallSlot) -> bool {
        let now = self.clock.now();
        let ball = match slot {
            BallSlot::Main(index) => self.numbers.balls_mut().get_mut(index),
            BallSlot::Bonus => self.bonus.balls_mut().first_mut(),
        };
        match ball {
            Some(ball) => {
                ball.tap(now);
                true
            }
            None => {
                debug!(?slot, "Tap on empty slot ignored");
                false
            }
        }
    }

    fn make_ball(&self, number: u8, index: usize, is_bonus: bool) -> Ball {
        let palette = select_palette(number, is_bonus);
        let step = u64::from(self.config.delay_step_ms);
        let delay = Duration::from_millis(step * index as u64);
        let size = if is_bonus {
            self.config.bonus_ball_size_px
        } else {
            self.config.main_ball_size_px
        };
        let ball = Ball::new(number, delay, size, palette.into());
        if is_bonus { ball.bonus() } else { ball }
    }

    fn update_draw_time(&mut self) {
        let stamp = self
            .clock
            .local_time()
            .format(&self.config.time_format)
            .to_string();
        debug!(draw_time = %stamp, "Draw time updated");
        self.draw_time = Some(stamp);
    }

    fn play_celebration(&mut self) {
        self.celebration.restart(self.clock.now());
    }

    pub const fn ticket(&self) -> Option<&Ticket> {
        self.ticket.as_ref()
    }

    pub const fn numbers(&self) -> &BallContainer {
        &self.numbers
    }

    pub const fn bonus(&self) -> &BallContainer {
        &self.bonus
    }

    /// Every rendered ball, main balls first.
    pub fn balls(&self) -> impl Iterator<Item = &Ball> {
        self.numbers.balls().iter().chain(self.bonus.balls())
    }

    pub fn ball_count(&self) -> usize {
        self.numbers.len() + self.bonus.len()
    }

    pub fn draw_time(&self) -> Option<&str> {
        self.draw_time.as_deref()
    }

    pub const fn celebration(&self) -> &AnimationClock {
        &self.celebration
    }

    /// True while the card celebration is playing.
    pub fn is_celebrating(&self) -> bool {
        self.celebration
            .elapsed(self.clock.now())
            .is_some_and(|elapsed| CELEBRATION.sample(elapsed).is_some())
    }

    /// True once every ball and the celebration have finished animating.
    pub fn is_settled(&self) -> bool {
        let now = self.clock.now();
        !self.is_celebrating() && self.balls().all(|b| b.is_settled(now))
    }

    pub const fn clock(&self) -> &C {
        &self.clock
    }

    pub const fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn view(&self) -> TicketView {
        TicketView {
            id: self.ticket.as_ref().map(|t| t.id),
            numbers: self.numbers.balls().iter().map(BallView::from).collect(),
            bonus: self.bonus.balls().iter().map(BallView::from).collect(),
            draw_time: self.draw_time.clone(),
            celebrations: self.celebration.plays(),
        }
    }

    /// Instant at which every ball and the celebration have finished.
    pub fn settles_at(&self) -> Duration {
        let celebration = self
            .celebration
            .started_at()
            .map_or(Duration::ZERO, |start| start + CELEBRATION.end());
        self.balls()
            .map(Ball::settles_at)
            .fold(celebration, Duration::max)
    }

    /// One line of terminal text for the board at the current instant.
    pub fn render_text(&self) -> String {
        self.render_text_at(self.clock.now())
    }

    /// Terminal text once every animation has played out.
    pub fn render_settled_text(&self) -> String {
        self.render_text_at(self.settles_at())
    }

    /// One line of terminal text for the board at `now`.
    pub fn render_text_at(&self, now: Duration) -> String {
        let main: Vec<String> = self.numbers.balls().iter().map(|b| b.render_text(now)).collect();
        let bonus: Vec<String> = self.bonus.balls().iter().map(|b| b.render_text(now)).collect();
        if bonus.is_empty() {
            main.join(" ")
        } else {
            format!("{}  +  {}", main.join(" "), bonus.join(" "))
        }
    }
}
