#![cfg_attr(not(test), no_std)]
//! Driver for ERC1602-4 character LCD modules with a ST7032 controller connected via i2c, with
//! 16x2 characters. It requires an I2C instance implementing [`embedded_hal::i2c::I2c`] and an
//! instance to delay execution with [`embedded_hal::delay::DelayNs`].
//!
//! Usage:
//! ```ignore
//! // Create a I2C instance, needs to implement embedded_hal::i2c::I2c, this
//! // particular uses the arduino_hal crate for avr microcontrollers like the arduinos.
//! let dp = arduino_hal::Peripherals::take().unwrap();
//! let pins = arduino_hal::pins!(dp);
//! let mut i2c = arduino_hal::I2c::new(
//!     dp.TWI,
//!     pins.a4.into_pull_up_input(),
//!     pins.a5.into_pull_up_input(),
//!     50000,
//! );
//! let mut delay = arduino_hal::Delay::new();
//!
//! let mut lcd = lcd_erc1602_i2c::sync_lcd::Lcd::new(&mut i2c, &mut delay)
//!     .with_address(lcd_erc1602_i2c::DEFAULT_ADDRESS)
//!     .init()
//!     .unwrap();
//!
//! lcd.put_str(0, "Hello\n").unwrap();
//! lcd.print_fmt(1, format_args!("T={}", 21)).unwrap();
//! ```
//!
//! Each line keeps its own write cursor. Characters past the last column are dropped, a line
//! never wraps into the other one; `'\n'` or `'\r'` blanks the rest of the line and moves its
//! cursor back to column 0.
//!
//! With the `async` feature enabled, `async_lcd::Lcd` offers the same operations on top of
//! `embedded-hal-async`.

pub mod command;
mod cursor;
mod format;
pub mod sync_lcd;

#[cfg(feature = "async")]
pub mod async_lcd;

#[cfg(test)]
mod mock;

pub use format::{FormatBuffer, FORMAT_CAPACITY};

/// I2C address the module answers to unless told otherwise.
pub const DEFAULT_ADDRESS: u8 = 0x3E;

/// Characters per line.
pub const COLUMNS: u8 = 16;

/// Number of lines.
pub const ROWS: u8 = 2;

/// Number of user definable characters in CGRAM.
pub const GLYPH_SLOTS: u8 = 8;

/// Contrast programmed during initialization, range 0..=63.
pub const DEFAULT_CONTRAST: u8 = 0x2F;

/// A user defined 5x8 character.
///
/// Each byte is one pixel row from top to bottom, only the lower 5 bits are shown.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Glyph([u8; 8]);

impl Glyph {
    pub const fn new(rows: [u8; 8]) -> Self {
        Self(rows)
    }

    /// Every row set to the same pattern.
    pub const fn filled(row: u8) -> Self {
        Self([row; 8])
    }

    pub const fn rows(&self) -> &[u8; 8] {
        &self.0
    }
}

impl From<[u8; 8]> for Glyph {
    fn from(rows: [u8; 8]) -> Self {
        Self(rows)
    }
}

/// Display, cursor and blink state sent with the display on/off command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayControl {
    pub display: bool,
    pub cursor: bool,
    pub blink: bool,
}

impl DisplayControl {
    /// Encoded display on/off command.
    pub const fn command(&self) -> u8 {
        let mut cmd = command::Commands::DisplayControl as u8;
        if self.display {
            cmd |= 0x04;
        }
        if self.cursor {
            cmd |= 0x02;
        }
        if self.blink {
            cmd |= 0x01;
        }
        cmd
    }
}

/// Display on, no visible cursor. This is the state after initialization.
impl Default for DisplayControl {
    fn default() -> Self {
        Self {
            display: true,
            cursor: false,
            blink: false,
        }
    }
}

/// Instruction table the controller is expected to be in.
///
/// The ST7032 reuses opcodes `0x40..=0x7F`: in the normal table they address CGRAM, in the
/// extended table they set icon address, power, follower and contrast.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InstructionSet {
    Normal,
    Extended,
}
