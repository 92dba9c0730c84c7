//! Lotto ticket generator library.
//!
//! This library exposes the core functionality of the `lotto` CLI for use in
//! tests and the web server.
//!
//! # Modules
//!
//! - `numbers`: Ticket drawing (6 unique numbers plus a bonus)
//! - `palette`: Colour band per number
//! - `animation`: Keyframes, timing functions and the restartable clock
//! - `ball`: Animated ball widget
//! - `ticket`: Ticket board with generate, shuffle and tap
//! - `theme`: Light/dark theme resolution and persistence
//! - `state`: Preference storage
//! - `classify`: Animal photo classification adapter
//! - `config`: Configuration file handling
//! - `output`: Output mode abstraction (robot/human)
//! - `web`: Local web page and JSON API
#![forbid(unsafe_code)]

pub mod animation;
pub mod ball;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod numbers;
pub mod output;
pub mod palette;
pub mod state;
pub mod theme;
pub mod ticket;
pub mod web;
