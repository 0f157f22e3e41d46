//! ST7032 instruction set and the byte level encoding of every driver operation.
//!
//! Everything in here is pure, the drivers only push the results onto the bus.

use crate::{COLUMNS, DEFAULT_CONTRAST, GLYPH_SLOTS, ROWS};

/// First byte of every bus transaction, tells the controller how to treat the second one.
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Control {
    Command = 0x00,
    Data = 0x40,
}

#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Commands {
    Clear = 0x01,
    ReturnHome = 0x02,
    EntryModeSet = 0x04,
    DisplayControl = 0x08,
    /// Extended table only.
    InternalOscFrequency = 0x1C,
    /// 8 bit bus, two lines, normal instruction table.
    FunctionSetNormal = 0x38,
    /// 8 bit bus, two lines, extended instruction table.
    FunctionSetExtended = 0x39,
    SetCgramAddr = 0x40,
    /// Extended table only. Carries the two high contrast bits.
    PowerIconContrast = 0x54,
    /// Extended table only.
    FollowerControl = 0x68,
    /// Extended table only. Carries the four low contrast bits.
    ContrastSet = 0x70,
    SetDdramAddr = 0x80,
}

/// Booster on, follower amplified ratio bits.
const FOLLOWER_BITS: u8 = 0x03;

/// DDRAM address of the first cell of each line.
const LINE_OFFSET: [u8; ROWS as usize] = [0x00, 0x40];

pub(crate) const BOOT_DELAY_MS: u32 = 100;
pub(crate) const SETTLE_DELAY_MS: u32 = 250;
pub(crate) const COMMAND_DELAY_US: u32 = 30;
pub(crate) const CLEAR_DELAY_MS: u32 = 2;

/// Sent after power on, configures oscillator, contrast and the voltage follower.
pub(crate) const INIT_PHASE0: [u8; 7] = [
    Commands::FunctionSetNormal as u8,
    // resets a possible display shift
    Commands::ReturnHome as u8,
    Commands::FunctionSetExtended as u8,
    Commands::InternalOscFrequency as u8,
    contrast_low(DEFAULT_CONTRAST),
    contrast_high(DEFAULT_CONTRAST),
    Commands::FollowerControl as u8 | FOLLOWER_BITS,
];

/// Sent once the follower circuit settled.
pub(crate) const INIT_PHASE1: [u8; 3] = [
    Commands::DisplayControl as u8 | 0x04,
    Commands::Clear as u8,
    Commands::EntryModeSet as u8,
];

pub(crate) const fn contrast_low(level: u8) -> u8 {
    Commands::ContrastSet as u8 | (level & 0x0F)
}

pub(crate) const fn contrast_high(level: u8) -> u8 {
    Commands::PowerIconContrast as u8 | ((level >> 4) & 0x03)
}

/// Commands to program `level`, bracketed by switching into the extended table and back.
pub(crate) const fn contrast_sequence(level: u8) -> [u8; 4] {
    [
        Commands::FunctionSetExtended as u8,
        contrast_low(level),
        contrast_high(level),
        Commands::FunctionSetNormal as u8,
    ]
}

/// Set DDRAM address command for a cell, `None` if the cell is not on screen.
pub(crate) fn ddram_address(col: u8, row: u8) -> Option<u8> {
    if col >= COLUMNS || row >= ROWS {
        return None;
    }
    Some(Commands::SetDdramAddr as u8 | (LINE_OFFSET[row as usize] + col))
}

/// Set CGRAM address command for one pixel row of a glyph, `None` for invalid codes.
pub(crate) fn cgram_address(code: u8, row: u8) -> Option<u8> {
    if code >= GLYPH_SLOTS || row >= 8 {
        return None;
    }
    Some(Commands::SetCgramAddr as u8 | (code << 3) | row)
}

/// Byte written to DDRAM for `c`. The character ROM is indexed by a single byte, anything
/// that does not fit is shown as `?`.
pub(crate) fn char_byte(c: char) -> u8 {
    u8::try_from(c).unwrap_or(b'?')
}
