//! Core primitives for Tidepool.
//!
//! This crate provides the UI-framework-independent building blocks the
//! Tidepool data layer is built on:
//!
//! - **Signals**: a type-safe signal/slot mechanism for publishing state
//!   changes to subscribers ([`Signal`], [`ConnectionId`], [`ConnectionGuard`])
//! - **Debouncing**: a timer that coalesces bursts of events into a single
//!   deferred invocation ([`Debouncer`])
//!
//! # Signals
//!
//! ```
//! use tidepool_core::Signal;
//!
//! let changed = Signal::<u32>::new();
//! changed.connect(|&page| println!("now on page {}", page));
//! changed.emit(2);
//! ```
//!
//! # Debouncing
//!
//! ```ignore
//! use std::time::Duration;
//! use tidepool_core::Debouncer;
//!
//! let debouncer = Debouncer::new(Duration::from_millis(500));
//! debouncer.call(async { /* runs 500ms after the last call */ });
//! ```

mod debounce;
mod signal;

pub use debounce::Debouncer;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
