//! Number generation for lotto tickets.
//!
//! A ticket holds six distinct main numbers and one bonus number, all drawn
//! from `1..=45`. Draws use plain rejection sampling: the domain is large
//! enough relative to the seven picks that retries stay negligible, so no
//! retry cap is enforced.

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use uuid::Uuid;

use crate::error::{LottoError, Result};

/// Smallest drawable number.
pub const MIN_NUMBER: u8 = 1;

/// Largest drawable number.
pub const MAX_NUMBER: u8 = 45;

/// Count of main numbers on a ticket.
pub const PICK_COUNT: usize = 6;

/// Draw a uniform number in `MIN_NUMBER..=MAX_NUMBER`.
fn draw<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(MIN_NUMBER..=MAX_NUMBER)
}

/// Draw six distinct numbers and return them sorted ascending.
pub fn generate_numbers<R: Rng + ?Sized>(rng: &mut R) -> [u8; PICK_COUNT] {
    let mut picked = BTreeSet::new();
    while picked.len() < PICK_COUNT {
        let n = draw(rng);
        if !picked.insert(n) {
            trace!(n, "Duplicate draw rejected");
        }
    }

    let mut numbers = [0u8; PICK_COUNT];
    for (slot, n) in numbers.iter_mut().zip(picked) {
        *slot = n;
    }
    debug!(?numbers, "Main numbers drawn");
    numbers
}

/// Draw a bonus number that is not in `excluded`.
pub fn generate_bonus_number<R: Rng + ?Sized>(rng: &mut R, excluded: &[u8]) -> u8 {
    let mut bonus = draw(rng);
    while excluded.contains(&bonus) {
        trace!(bonus, "Bonus collides with main numbers, redrawing");
        bonus = draw(rng);
    }
    debug!(bonus, "Bonus number drawn");
    bonus
}

/// A drawn lotto ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket identifier, fresh for every draw.
    pub id: Uuid,
    /// Main numbers in display order.
    pub numbers: [u8; PICK_COUNT],
    /// Bonus number, disjoint from `numbers`.
    pub bonus: u8,
}

impl Ticket {
    /// Draw a new random ticket.
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let numbers = generate_numbers(rng);
        let bonus = generate_bonus_number(rng, &numbers);
        Self {
            id: Uuid::new_v4(),
            numbers,
            bonus,
        }
    }

    /// Build a ticket from explicit numbers.
    ///
    /// The given order is kept as-is; only range and distinctness are checked.
    pub fn from_parts(numbers: [u8; PICK_COUNT], bonus: u8) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for &n in numbers.iter().chain(std::iter::once(&bonus)) {
            if !(MIN_NUMBER..=MAX_NUMBER).contains(&n) {
                return Err(LottoError::NumberOutOfRange { value: n });
            }
            if !seen.insert(n) {
                return Err(LottoError::InvalidTicket(format!(
                    "number {n} appears more than once"
                )));
            }
        }
        Ok(Self {
            id: Uuid::new_v4(),
            numbers,
            bonus,
        })
    }

    /// All seven numbers, main numbers first.
    pub fn all_numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.numbers.iter().copied().chain(std::iter::once(self.bonus))
    }
}
