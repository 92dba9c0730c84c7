//! Ticket board tests driven by a manual clock.

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use rand::SeedableRng;
use rand::rngs::StdRng;

use lotto::ball::{BallColors, Renderable};
use lotto::config::BoardConfig;
use lotto::numbers::Ticket;
use lotto::palette::{BONUS_PALETTE, select_palette};
use lotto::ticket::{BallSlot, Clock, TicketBuilder};

use crate::common::init_test_logging;

#[derive(Clone)]
struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn local_time(&self) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 1, 2, 9, 7, 30).unwrap()
    }
}

fn board_with(config: BoardConfig, seed: u64) -> (TicketBuilder<StdRng, ManualClock>, ManualClock) {
    init_test_logging();
    let clock = ManualClock::new();
    let board = TicketBuilder::new(config, StdRng::seed_from_u64(seed), clock.clone());
    (board, clock)
}

#[test]
fn test_every_generated_ticket_is_valid() {
    let (mut board, _) = board_with(BoardConfig::default(), 1);
    for _ in 0..500 {
        let ticket = board.generate_ticket().clone();
        assert!(ticket.numbers.windows(2).all(|w| w[0] < w[1]));
        assert!(ticket.all_numbers().all(|n| (1..=45).contains(&n)));
        assert!(!ticket.numbers.contains(&ticket.bonus));
        let unique: HashSet<u8> = ticket.all_numbers().collect();
        assert_eq!(unique.len(), 7);
    }
}

#[test]
fn test_regeneration_replaces_balls() {
    let (mut board, clock) = board_with(BoardConfig::default(), 2);
    board.generate_ticket();
    clock.advance(Duration::from_secs(5));
    board.generate_ticket();

    assert_eq!(board.numbers().len(), 6);
    assert_eq!(board.bonus().len(), 1);
    assert_eq!(board.ball_count(), 7);
    assert_eq!(board.view().celebrations, 2);
}

#[test]
fn test_balls_carry_band_colours_and_staggered_delays() {
    let config = BoardConfig {
        delay_step_ms: 100,
        ..BoardConfig::default()
    };
    let ticket = Ticket::from_parts([1, 11, 21, 31, 41, 45], 9).unwrap();
    let (mut board, _) = board_with(config, 3);
    board.render_ticket(ticket);

    for (index, ball) in board.numbers().balls().iter().enumerate() {
        assert!(!ball.is_bonus());
        assert_eq!(ball.delay(), Duration::from_millis(100 * index as u64));
        assert_eq!(*ball.colors(), BallColors::from(select_palette(ball.label(), false)));
    }

    let bonus = &board.bonus().balls()[0];
    assert!(bonus.is_bonus());
    assert_eq!(bonus.label(), 9);
    assert_eq!(bonus.delay(), Duration::from_millis(600));
    assert_eq!(*bonus.colors(), BallColors::from(&BONUS_PALETTE));
    assert!(bonus.size_px() > board.numbers().balls()[0].size_px());
}

#[test]
fn test_draw_time_uses_configured_format() {
    let config = BoardConfig {
        time_format: "%H:%M:%S".to_string(),
        ..BoardConfig::default()
    };
    let (mut board, _) = board_with(config, 4);
    assert_eq!(board.draw_time(), None);

    board.generate_ticket();
    assert_eq!(board.draw_time(), Some("09:07:30"));
}

#[test]
fn test_shuffle_keeps_numbers_and_bounds_delays() {
    let config = BoardConfig {
        shuffle_max_delay_ms: 50,
        ..BoardConfig::default()
    };
    let (mut board, clock) = board_with(config, 5);
    let before = board.generate_ticket().clone();
    clock.advance(Duration::from_secs(3));
    assert!(board.is_settled());

    board.shuffle_delays();

    let labels: Vec<u8> = board.numbers().balls().iter().map(|b| b.label()).collect();
    assert_eq!(labels, before.numbers.to_vec());
    assert_eq!(board.bonus().balls()[0].label(), before.bonus);
    assert!(board.balls().all(|b| b.delay() <= Duration::from_millis(50)));
    assert!(board.is_celebrating());
    assert!(!board.is_settled());
}

#[test]
fn test_shuffle_on_empty_board_only_celebrates() {
    let (mut board, _) = board_with(BoardConfig::default(), 6);
    board.shuffle_delays();
    assert_eq!(board.ball_count(), 0);
    assert_eq!(board.view().celebrations, 1);
}

#[test]
fn test_tap_replays_pulse_on_one_ball() {
    let (mut board, clock) = board_with(BoardConfig::default(), 7);
    assert!(!board.tap(BallSlot::Bonus));

    board.generate_ticket();
    clock.advance(Duration::from_secs(3));
    assert!(board.tap(BallSlot::Main(2)));

    let nudged: Vec<bool> = board.balls().map(|b| b.is_nudged()).collect();
    assert_eq!(nudged, vec![false, false, true, false, false, false, false]);
    assert!(!board.is_settled());
}

#[test]
fn test_ball_html_exposes_delay_and_colours() {
    let ticket = Ticket::from_parts([5, 15, 25, 35, 40, 44], 2).unwrap();
    let (mut board, _) = board_with(BoardConfig::default(), 8);
    board.render_ticket(ticket);

    let html = board.numbers().render_html();
    assert!(html.starts_with(r#"<div id="lotto-numbers-container""#));
    assert_eq!(html.matches(r#"class="lotto-ball""#).count(), 6);
    assert!(html.contains(r#"data-number="25""#));
    assert!(html.contains("--delay: 390ms;"));

    let bonus = board.bonus().balls()[0].render_html();
    assert!(bonus.contains(r#"class="lotto-ball bonus""#));
    assert!(bonus.contains(r#"<span class="ball">2</span>"#));
}

#[test]
fn test_same_seed_draws_same_tickets() {
    let (mut a, _) = board_with(BoardConfig::default(), 42);
    let (mut b, _) = board_with(BoardConfig::default(), 42);
    for _ in 0..10 {
        let left = a.generate_ticket().clone();
        let right = b.generate_ticket().clone();
        assert_eq!(left.numbers, right.numbers);
        assert_eq!(left.bonus, right.bonus);
    }
}
