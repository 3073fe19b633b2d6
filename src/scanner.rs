use std::fmt;
use std::time::Duration;

use rusb::{Device, DeviceDescriptor, DeviceHandle, GlobalContext};

use crate::poll::ReportSource;

// ID 04a9:190a Canon, Inc. CanoScan LiDE 210
pub const VENDOR_CANON: u16 = 0x04a9;
pub const PRODUCT_LIDE210: u16 = 0x190a;

/// Interrupt endpoint carrying the button byte
pub const BUTTON_ENDPOINT: u8 = 3;

/// Wait ceiling for one endpoint read. The device itself reports every 8ms.
pub const POLL_TIMEOUT: u64 = 100;

const ENDPOINT_IN: u8 = 0x80;

/// Timeout for descriptor string requests
const STRING_TIMEOUT: u64 = 200;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("USB error: {0}")]
    Usb(rusb::Error),

    #[error("Unable to locate interrupt endpoint 0x{0:02x}")]
    InvalidEndpoints(u8),
}

impl From<rusb::Error> for Error {
    fn from(e: rusb::Error) -> Self {
        Error::Usb(e)
    }
}

/// libusb numeric code for a library error, as shown in error notices.
pub fn error_code(e: &rusb::Error) -> i32 {
    use rusb::ffi::constants::*;

    match e {
        rusb::Error::Io => LIBUSB_ERROR_IO,
        rusb::Error::InvalidParam => LIBUSB_ERROR_INVALID_PARAM,
        rusb::Error::Access => LIBUSB_ERROR_ACCESS,
        rusb::Error::NoDevice => LIBUSB_ERROR_NO_DEVICE,
        rusb::Error::NotFound => LIBUSB_ERROR_NOT_FOUND,
        rusb::Error::Busy => LIBUSB_ERROR_BUSY,
        rusb::Error::Timeout => LIBUSB_ERROR_TIMEOUT,
        rusb::Error::Overflow => LIBUSB_ERROR_OVERFLOW,
        rusb::Error::Pipe => LIBUSB_ERROR_PIPE,
        rusb::Error::Interrupted => LIBUSB_ERROR_INTERRUPTED,
        rusb::Error::NoMem => LIBUSB_ERROR_NO_MEM,
        rusb::Error::NotSupported => LIBUSB_ERROR_NOT_SUPPORTED,
        rusb::Error::BadDescriptor | rusb::Error::Other => LIBUSB_ERROR_OTHER,
    }
}

/// Which device to look for and how to talk to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScannerConfig {
    pub vendor_id: u16,
    pub product_id: u16,
    /// Endpoint number, without the direction bit
    pub endpoint: u8,
    pub timeout: Duration,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            vendor_id: VENDOR_CANON,
            product_id: PRODUCT_LIDE210,
            endpoint: BUTTON_ENDPOINT,
            timeout: Duration::from_millis(POLL_TIMEOUT),
        }
    }
}

impl ScannerConfig {
    pub fn endpoint_address(&self) -> u8 {
        ENDPOINT_IN | self.endpoint
    }

    pub fn matches(&self, desc: &DeviceDescriptor) -> bool {
        desc.vendor_id() == self.vendor_id && desc.product_id() == self.product_id
    }
}

#[derive(Clone, Debug)]
pub struct ScannerInfo {
    pub vendor_id: u16,
    pub product_id: u16,
    /// Empty when the device has no manufacturer string
    pub manufacturer: String,
    pub product: String,
}

/// A device on the bus whose ids match, not opened yet.
pub struct Candidate {
    pub device: Device<GlobalContext>,
    pub descriptor: DeviceDescriptor,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bus={}, dev={}",
            self.device.bus_number(),
            self.device.address()
        )
    }
}

/// Devices matching `config`, in enumeration order.
pub fn matching(config: &ScannerConfig) -> Result<Vec<Candidate>, Error> {
    let candidates = rusb::devices()?
        .iter()
        .filter_map(|device| {
            let descriptor = device.device_descriptor().ok()?;
            if config.matches(&descriptor) {
                Some(Candidate { device, descriptor })
            } else {
                None
            }
        })
        .collect();
    Ok(candidates)
}

/// Open the first candidate that can be opened.
///
/// Candidates failing to open are logged and skipped; each is tried once.
pub fn first_opened<C, H, E, F>(candidates: impl IntoIterator<Item = C>, mut open: F) -> Option<H>
where
    C: fmt::Display,
    E: fmt::Display,
    F: FnMut(&C) -> Result<H, E>,
{
    for candidate in candidates {
        match open(&candidate) {
            Ok(handle) => return Some(handle),
            Err(e) => log::error!("Cannot open scanner on {}: {}", candidate, e),
        }
    }
    None
}

/// Find and open the first matching scanner.
///
/// `Ok(None)` means no matching device could be opened. Only a failure to
/// enumerate the bus is an error.
pub fn locate(config: &ScannerConfig) -> Result<Option<Scanner>, Error> {
    let candidates = matching(config)?;
    log::debug!("{} matching device(s)", candidates.len());
    Ok(first_opened(candidates, |c| Scanner::open(c, config)))
}

/// An open session with one scanner.
///
/// Dropping it releases the claimed interface and closes the device.
pub struct Scanner {
    handle: DeviceHandle<GlobalContext>,
    descriptor: DeviceDescriptor,
    bus: u8,
    address: u8,
    /// Interrupt IN endpoint address
    endpoint: u8,
    interface: u8,
}

impl Scanner {
    pub fn open(candidate: &Candidate, config: &ScannerConfig) -> Result<Self, Error> {
        let device = &candidate.device;
        let endpoint = config.endpoint_address();
        let interface = interface_for(device, endpoint)?;

        let handle = device.open()?;
        if let Err(e) = handle.set_auto_detach_kernel_driver(true) {
            log::trace!("Kernel driver auto detach unavailable: {}", e);
        }
        handle.claim_interface(interface)?;

        Ok(Scanner {
            handle,
            descriptor: device.device_descriptor()?,
            bus: device.bus_number(),
            address: device.address(),
            endpoint,
            interface,
        })
    }

    pub fn interface(&self) -> u8 {
        self.interface
    }

    pub fn info(&self) -> Result<ScannerInfo, Error> {
        let timeout = Duration::from_millis(STRING_TIMEOUT);
        let languages = self.handle.read_languages(timeout)?;
        let (manufacturer, product) = match languages.first() {
            Some(&language) => (
                self.handle
                    .read_manufacturer_string(language, &self.descriptor, timeout)
                    .unwrap_or_default(),
                self.handle
                    .read_product_string(language, &self.descriptor, timeout)
                    .unwrap_or_default(),
            ),
            None => (String::new(), String::new()),
        };
        Ok(ScannerInfo {
            vendor_id: self.descriptor.vendor_id(),
            product_id: self.descriptor.product_id(),
            manufacturer,
            product,
        })
    }
}

impl ReportSource for Scanner {
    fn read_report(&mut self, buf: &mut [u8], timeout: Duration) -> rusb::Result<usize> {
        self.handle.read_interrupt(self.endpoint, buf, timeout)
    }
}

impl fmt::Display for Scanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bus={}, dev={}", self.bus, self.address)
    }
}

/// Number of the interface carrying the interrupt IN endpoint `endpoint`.
fn interface_for(device: &Device<GlobalContext>, endpoint: u8) -> Result<u8, Error> {
    let config_desc = match device.active_config_descriptor() {
        Ok(v) => v,
        Err(_) => device.config_descriptor(0)?,
    };

    for interface in config_desc.interfaces() {
        for interface_desc in interface.descriptors() {
            for endpoint_desc in interface_desc.endpoint_descriptors() {
                match (endpoint_desc.transfer_type(), endpoint_desc.direction()) {
                    (rusb::TransferType::Interrupt, rusb::Direction::In)
                        if endpoint_desc.address() == endpoint =>
                    {
                        return Ok(interface.number());
                    }
                    (_, _) => continue,
                }
            }
        }
    }
    Err(Error::InvalidEndpoints(endpoint))
}
