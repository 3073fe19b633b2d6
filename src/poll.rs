use std::fmt;
use std::time::Duration;

use crate::buttons::ButtonReport;
use crate::cancel::CancelToken;
use crate::scanner::error_code;

/// Level of the per-timeout progress marker.
pub const IDLE_LEVEL: log::Level = log::Level::Debug;

/// Something a button byte can be read from with a bounded wait.
pub trait ReportSource {
    /// Read at most `buf.len()` bytes, waiting no longer than `timeout`.
    ///
    /// `Err(rusb::Error::Timeout)` and `Ok(0)` both mean nothing arrived.
    fn read_report(&mut self, buf: &mut [u8], timeout: Duration) -> rusb::Result<usize>;
}

/// Why a poll session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exit {
    Cancelled,
    /// A read failed with something other than a timeout
    Failed(rusb::Error),
}

impl Exit {
    pub fn is_success(&self) -> bool {
        matches!(self, Exit::Cancelled)
    }
}

/// Relay button reports from `source` to `on_report` until cancelled or a
/// read fails.
///
/// The token is checked before every read, so cancellation is noticed within
/// one `timeout`. `source` is dropped before returning, which closes the
/// device on every exit path.
pub fn poll<S, F>(mut source: S, cancel: &CancelToken, timeout: Duration, mut on_report: F) -> Exit
where
    S: ReportSource + fmt::Display,
    F: FnMut(ButtonReport),
{
    let mut data = [0_u8; 1];
    let exit = loop {
        if cancel.is_cancelled() {
            break Exit::Cancelled;
        }

        match source.read_report(&mut data, timeout) {
            Ok(0) | Err(rusb::Error::Timeout) => log::log!(IDLE_LEVEL, "."),
            Ok(_) => on_report(ButtonReport::from(data[0])),
            Err(e) => {
                log::error!("error {} received - {}", error_code(&e), e);
                break Exit::Failed(e);
            }
        }
    };

    log::info!("releasing scanner on {} ...bye...", source);
    drop(source);
    exit
}
