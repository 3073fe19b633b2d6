use std::fmt;

/// Front panel buttons, in physical order from left to right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    /// Most left button
    Pdf,
    PdfNext,
    /// Middle button
    Autoscan,
    Copy,
    /// Most right button
    EMail,
}

impl Button {
    /// Every button, in display order.
    pub const ALL: [Button; 5] = [
        Button::Pdf,
        Button::PdfNext,
        Button::Autoscan,
        Button::Copy,
        Button::EMail,
    ];

    /// Bit of the report byte that is set while this button is pressed.
    pub fn mask(self) -> u8 {
        match self {
            Button::Pdf => 0x10,
            Button::PdfNext => 0x01,
            Button::Autoscan => 0x02,
            Button::Copy => 0x04,
            Button::EMail => 0x08,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Button::Pdf => "PDF",
            Button::PdfNext => "Next",
            Button::Autoscan => "Autoscan",
            Button::Copy => "Copy",
            Button::EMail => "EMail",
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Union of all known button masks.
pub const KNOWN_MASK: u8 = 0x1f;

/// One byte read from the button endpoint.
///
/// Several bits may be set when more than one button went down within the
/// same report interval (8ms).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonReport(pub u8);

impl ButtonReport {
    pub fn is_pressed(self, button: Button) -> bool {
        self.0 & button.mask() != 0
    }

    /// Buttons whose bit is set, in display order.
    pub fn pressed(self) -> Vec<Button> {
        Button::ALL
            .iter()
            .copied()
            .filter(|b| self.is_pressed(*b))
            .collect()
    }

    /// True when no known button bit is set.
    pub fn is_empty(self) -> bool {
        self.0 & KNOWN_MASK == 0
    }

    /// Bits that do not belong to any known button.
    pub fn unknown_bits(self) -> u8 {
        self.0 & !KNOWN_MASK
    }
}

impl From<u8> for ButtonReport {
    fn from(b: u8) -> Self {
        ButtonReport(b)
    }
}

impl fmt::Display for ButtonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data=0x{:02x} ( ", self.0)?;
        for button in self.pressed() {
            write!(f, "{} ", button)?;
        }
        if self.unknown_bits() != 0 {
            write!(f, "?0x{:02x} ", self.unknown_bits())?;
        }
        f.write_str(")")
    }
}
