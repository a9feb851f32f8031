//! # fwcheck-engine
//!
//! Check orchestration for fwcheck.
//!
//! This crate provides:
//! - The check pipeline (locate, confirm, extract, compare)
//! - The polling engine with its handled-set deduplication
//! - The device watcher (rising-edge popup trigger)
//! - Result sinks: history persistence, audio feedback, fan-out
//!
//! ## Architecture
//!
//! This is Layer 2 in the architecture - it depends on fwcheck-core and
//! fwcheck-probe and owns session state (running flag, handled set) behind
//! explicit start/stop lifecycles.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod checker;
pub mod device;
pub mod history;
pub mod poller;
pub mod sink;
pub mod sound;

// Re-export commonly used types
pub use checker::{CheckRequest, Checker};
pub use device::DeviceWatcher;
pub use history::{HistorySink, HistoryStore};
pub use poller::{HandledSet, PollControl, Poller};
pub use sink::{FanoutSink, ResultSink};
pub use sound::{AudioSink, SoundCue, SoundPlayer};
