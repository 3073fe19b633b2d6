use lidebuttons::scanner::{matching, Scanner, ScannerConfig};

/// Lists every attached LiDE 210, including ones the poller would skip
/// because they cannot be opened.
///
/// Alternatively you can use `lsusb -d 04a9:190a`
fn main() {
    env_logger::init();

    let config = ScannerConfig::default();
    for candidate in matching(&config).unwrap() {
        let ids = format!(
            "ID {:04x}:{:04x}",
            candidate.descriptor.vendor_id(),
            candidate.descriptor.product_id()
        );
        match Scanner::open(&candidate, &config) {
            Ok(scanner) => match scanner.info() {
                Ok(info) => println!(
                    "{} {} - {} {} (interface {})",
                    candidate,
                    ids,
                    info.manufacturer,
                    info.product,
                    scanner.interface()
                ),
                Err(_) => println!("{} {}", candidate, ids),
            },
            Err(e) => println!("{} {} - cannot open: {}", candidate, ids, e),
        }
    }
}
