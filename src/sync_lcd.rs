use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use ufmt_write::uWrite;

use crate::command::{self, Commands, Control};
use crate::cursor::Cursors;
use crate::{DisplayControl, FormatBuffer, Glyph, InstructionSet, DEFAULT_ADDRESS};

/// API to write to the LCD.
pub struct Lcd<'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    i2c: &'a mut I,
    address: u8,
    delay: &'a mut D,
    cursors: Cursors,
    instruction_set: InstructionSet,
    display_control: DisplayControl,
}

impl<'a, I, D> Lcd<'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    /// Create new instance with only the I2C and delay instance, talking to [`DEFAULT_ADDRESS`].
    pub fn new(i2c: &'a mut I, delay: &'a mut D) -> Self {
        Self {
            i2c,
            delay,
            address: DEFAULT_ADDRESS,
            cursors: Cursors::new(),
            instruction_set: InstructionSet::Extended,
            display_control: DisplayControl::default(),
        }
    }

    /// Set I2C address.
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Initializes the hardware, see [`Lcd::restart`].
    pub fn init(mut self) -> Result<Self, I::Error> {
        self.restart()?;
        Ok(self)
    }

    /// Runs the power on sequence.
    ///
    /// Oscillator, contrast and voltage follower are configured first. The follower needs
    /// 250ms to charge before the display may be switched on, skipping that wait leaves the
    /// display blank. Ends with a cleared display and both line cursors at column 0.
    pub fn restart(&mut self) -> Result<(), I::Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!("lcd {=u8:#x}: init", self.address);

        // Phase 0 switches into the extended table and never back.
        self.instruction_set = InstructionSet::Extended;
        self.display_control = DisplayControl::default();
        self.cursors.reset();

        self.delay.delay_ms(command::BOOT_DELAY_MS);
        for &cmd in command::INIT_PHASE0.iter() {
            self.command(cmd)?;
            self.delay.delay_us(command::COMMAND_DELAY_US);
        }

        self.delay.delay_ms(command::SETTLE_DELAY_MS);
        for &cmd in command::INIT_PHASE1.iter() {
            self.command(cmd)?;
            self.delay.delay_us(command::COMMAND_DELAY_US);
        }

        Ok(())
    }

    fn send(&mut self, control: Control, byte: u8) -> Result<(), I::Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("lcd {=u8:#x}: {=u8:#x} {=u8:#x}", self.address, control as u8, byte);

        self.i2c.write(self.address, &[control as u8, byte])
    }

    fn command(&mut self, cmd: u8) -> Result<(), I::Error> {
        self.send(Control::Command, cmd)
    }

    fn data(&mut self, byte: u8) -> Result<(), I::Error> {
        self.send(Control::Data, byte)
    }

    fn write_byte_at(&mut self, byte: u8, col: u8, row: u8) -> Result<(), I::Error> {
        if let Some(addr) = command::ddram_address(col, row) {
            self.command(addr)?;
            self.data(byte)?;
        }
        Ok(())
    }

    /// Set the cursor to (col, row). Coordinates are zero-based, cells off screen are ignored.
    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), I::Error> {
        match command::ddram_address(col, row) {
            Some(addr) => self.command(addr),
            None => Ok(()),
        }
    }

    /// Write a single character at (col, row) without touching the line cursors.
    pub fn put_char_at(&mut self, c: char, col: u8, row: u8) -> Result<(), I::Error> {
        self.write_byte_at(command::char_byte(c), col, row)
    }

    /// Write `s` starting at (col, row), bypassing the line cursors.
    ///
    /// Characters running past the end of the line are dropped, a `'\0'` ends the string.
    pub fn put_str_at(&mut self, s: &str, col: u8, row: u8) -> Result<(), I::Error> {
        let mut col = col;
        for c in s.chars().take_while(|&c| c != '\0') {
            self.put_char_at(c, col, row)?;
            col = col.saturating_add(1);
        }
        Ok(())
    }

    /// Write a character at the cursor of `line` and advance the cursor.
    ///
    /// `'\n'` and `'\r'` blank the rest of the line and return its cursor to column 0. Once the
    /// cursor passed the last column, characters are dropped until that happens.
    pub fn put_char(&mut self, line: u8, c: char) -> Result<(), I::Error> {
        match c {
            '\n' | '\r' => {
                if let Some(rest) = self.cursors.line_break(line) {
                    for col in rest {
                        self.write_byte_at(b' ', col, line)?;
                    }
                }
                Ok(())
            }
            c => match self.cursors.advance(line) {
                Some(col) => self.write_byte_at(command::char_byte(c), col, line),
                None => Ok(()),
            },
        }
    }

    /// Write string to `line`, see [`Lcd::put_char`]. A `'\0'` ends the string.
    pub fn put_str(&mut self, line: u8, s: &str) -> Result<(), I::Error> {
        for c in s.chars().take_while(|&c| c != '\0') {
            self.put_char(line, c)?;
        }
        Ok(())
    }

    /// Write formatted text to `line`.
    ///
    /// The text is rendered into a [`FormatBuffer`] first, anything beyond
    /// [`FORMAT_CAPACITY`](crate::FORMAT_CAPACITY) bytes is cut off.
    pub fn print_fmt(&mut self, line: u8, args: fmt::Arguments<'_>) -> Result<(), I::Error> {
        let buf = FormatBuffer::render(args);
        self.put_str(line, buf.as_str())
    }

    /// Writer feeding `line`, for use with `ufmt::uwrite!` or `core::write!`.
    pub fn line(&mut self, line: u8) -> LineWriter<'_, 'a, I, D> {
        LineWriter { lcd: self, line }
    }

    /// Clear the display and move both line cursors to column 0.
    pub fn clear(&mut self) -> Result<(), I::Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!("lcd {=u8:#x}: clear", self.address);

        self.cursors.reset();
        self.command(Commands::Clear as u8)?;
        self.delay.delay_ms(command::CLEAR_DELAY_MS);
        Ok(())
    }

    /// Set the contrast, only the lower 6 bits of `level` are used.
    pub fn set_contrast(&mut self, level: u8) -> Result<(), I::Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!("lcd {=u8:#x}: contrast {=u8}", self.address, level & 0x3F);

        self.instruction_set = InstructionSet::Extended;
        for cmd in command::contrast_sequence(level) {
            self.command(cmd)?;
        }
        self.instruction_set = InstructionSet::Normal;
        Ok(())
    }

    /// Store `glyph` as custom character `code` (0..8). Invalid codes are ignored.
    ///
    /// Right after [`Lcd::init`] the controller is still in the extended instruction table, where
    /// the CGRAM opcodes mean something else. In that case a function set switching back to the
    /// normal table (`0x38`) is sent before the first row.
    ///
    /// Leaves the controller pointing into CGRAM, the next positioned write sets it back.
    pub fn define_glyph(&mut self, code: u8, glyph: &Glyph) -> Result<(), I::Error> {
        if code >= crate::GLYPH_SLOTS {
            return Ok(());
        }
        if self.instruction_set == InstructionSet::Extended {
            self.command(Commands::FunctionSetNormal as u8)?;
            self.instruction_set = InstructionSet::Normal;
        }
        for (row, &bits) in (0u8..).zip(glyph.rows().iter()) {
            if let Some(addr) = command::cgram_address(code, row) {
                self.command(addr)?;
                self.data(bits)?;
            }
        }
        Ok(())
    }

    /// Define custom character `code` and show it at (col, row).
    pub fn put_custom_char(
        &mut self,
        code: u8,
        glyph: &Glyph,
        col: u8,
        row: u8,
    ) -> Result<(), I::Error> {
        if code >= crate::GLYPH_SLOTS {
            return Ok(());
        }
        self.define_glyph(code, glyph)?;
        self.write_byte_at(code, col, row)
    }

    /// Switch display, cursor and cursor blinking on or off.
    pub fn set_display_control(&mut self, control: DisplayControl) -> Result<(), I::Error> {
        self.display_control = control;
        self.command(control.command())
    }

    pub fn display_control(&self) -> DisplayControl {
        self.display_control
    }

    /// Cursor of `line`, may lie past the last column.
    pub fn cursor(&self, line: u8) -> Option<u8> {
        self.cursors.get(line)
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn instruction_set(&self) -> InstructionSet {
        self.instruction_set
    }
}

/// Writes to one line of a [`Lcd`] through its line cursor.
pub struct LineWriter<'l, 'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    lcd: &'l mut Lcd<'a, I, D>,
    line: u8,
}

impl<'l, 'a, I, D> uWrite for LineWriter<'l, 'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    type Error = I::Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.lcd.put_str(self.line, s)
    }
}

impl<'l, 'a, I, D> fmt::Write for LineWriter<'l, 'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.lcd.put_str(self.line, s).map_err(|_| fmt::Error)
    }
}
