//! DHT21 / AM2302 Protocol Decoder for Embedded Rust
//!
//! This crate turns a capture of the sensor's single-wire data line into a
//! validated humidity and temperature reading. Each data bit arrives as a
//! low pulse followed by a high pulse; the ratio of the two widths decides
//! whether the bit is a `0` or a `1`. Forty bits make up five bytes, the last
//! of which is a checksum over the first four.
//!
//! # Pipeline
//! - [`scanner`]: measures runs of constant level in a [`SampleBuffer`]
//! - [`handshake`]: confirms the sensor's start-of-frame sequence
//! - [`frame`]: classifies bits and packs them into a [`Frame`]
//! - [`checksum`] and [`reading`]: validate and convert the payload
//! - [`decoder`]: runs the whole pipeline over one capture
//!
//! Decoding is pure: it works over an already captured buffer and never
//! touches hardware. The optional [`Dht21`] driver wakes the sensor and
//! samples the line through [`embedded-hal`] traits before handing the
//! capture to the decoder.
//!
//! # Features
//! - Designed for `no_std` environments
//! - Timing profile passed in explicitly through [`DecoderConfig`]
//! - Optional logging support via `defmt`
//!
//! # Optional Features
//! - `defmt`: Implements `defmt::Format` and emits per-bit trace logs
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal

#![cfg_attr(not(test), no_std)]

pub mod checksum;
pub mod config;
pub mod decoder;
pub mod dht21;
pub mod error;
pub mod frame;
pub mod handshake;
pub mod reading;
pub mod scanner;

pub use config::{DecoderConfig, HandshakeVariant};
pub use decoder::{Decoded, decode};
pub use dht21::Dht21;
pub use error::{DecodeError, DhtError, Timeout};
pub use frame::Frame;
pub use reading::Reading;
pub use scanner::{Cursor, SampleBuffer};
