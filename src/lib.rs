//! Button poller for the Canon CanoScan LiDE 210.
//!
//! The scanner exposes its front panel buttons on a dedicated interrupt
//! endpoint (EP3 IN, one byte). Each button maps to one bit of that byte and a
//! press is reported once, no matter how long the button is held.

/// Log filter used when `RUST_LOG` is not set. Shows this crate's idle
/// markers along with the notices.
pub const DEFAULT_LOG_FILTER: &str = "info,lidebuttons=debug";

pub mod buttons;
pub mod cancel;
pub mod poll;
pub mod scanner;

pub use buttons::{Button, ButtonReport};
pub use cancel::CancelToken;
pub use poll::{poll, Exit, ReportSource, IDLE_LEVEL};
pub use scanner::{locate, Error, Scanner, ScannerConfig};
