use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop request, observed by the poll loop between reads.
///
/// Once cancelled the token stays cancelled for the life of the process.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Cancel this token on SIGINT, SIGTERM or SIGHUP.
    ///
    /// Can only succeed once per process. If the handler cannot be installed
    /// the token is cancelled right away, since nothing could stop the loop
    /// otherwise.
    pub fn install_signal_handlers(&self) -> Result<(), ctrlc::Error> {
        let flag = Arc::clone(&self.flag);
        let res = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst));
        if let Err(ref e) = res {
            log::warn!("Cannot install signal handlers, stopping: {}", e);
            self.cancel();
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_clear() {
        assert!(!CancelToken::new().is_cancelled());
    }

    #[test]
    fn clones_share_the_flag() {
        let token = CancelToken::new();
        let other = token.clone();
        other.cancel();
        assert!(token.is_cancelled());
        // cancelling again keeps it set
        token.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn failed_install_cancels() {
        let first = CancelToken::new();
        let second = CancelToken::new();
        assert!(first.install_signal_handlers().is_ok());
        // only one handler per process
        assert!(second.install_signal_handlers().is_err());
        assert!(second.is_cancelled());
        assert!(!first.is_cancelled());
    }

    #[test]
    fn visible_across_threads() {
        let token = CancelToken::new();
        let remote = token.clone();
        std::thread::spawn(move || remote.cancel()).join().unwrap();
        assert!(token.is_cancelled());
    }
}
