use std::process::ExitCode;

use lidebuttons::{locate, poll, CancelToken, ScannerConfig, DEFAULT_LOG_FILTER};

#[cfg(feature = "diagnostics")]
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .format_timestamp(None)
        .init();
}

#[cfg(not(feature = "diagnostics"))]
fn init_logging() {}

fn main() -> ExitCode {
    init_logging();

    let cancel = CancelToken::new();
    // a failed install already cancelled the token
    let _ = cancel.install_signal_handlers();

    let config = ScannerConfig::default();
    let scanner = match locate(&config) {
        Ok(Some(scanner)) => scanner,
        Ok(None) => {
            log::debug!(
                "No scanner {:04x}:{:04x} found",
                config.vendor_id,
                config.product_id
            );
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            log::error!("Cannot enumerate USB devices: {}", e);
            return ExitCode::FAILURE;
        }
    };

    log::info!("using scanner on {} ...", scanner);
    match scanner.info() {
        Ok(info) => log::debug!(
            "{:04x}:{:04x} {} {} (interface {})",
            info.vendor_id,
            info.product_id,
            info.manufacturer,
            info.product,
            scanner.interface()
        ),
        Err(e) => log::debug!("Cannot read device strings: {}", e),
    }

    let exit = poll(scanner, &cancel, config.timeout, |report| {
        log::info!("{}", report)
    });

    if exit.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
