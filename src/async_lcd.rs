use core::fmt;
use core::future::Future;

use embedded_hal_async::{delay::DelayNs, i2c::I2c};

use crate::command::{self, Commands, Control};
use crate::cursor::Cursors;
use crate::{DisplayControl, FormatBuffer, Glyph, InstructionSet, DEFAULT_ADDRESS};

/// API to write to the LCD.
///
/// Sends exactly the same bytes and waits exactly as long as [`crate::sync_lcd::Lcd`].
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
    pub async fn init(mut self) -> Result<Self, I::Error> {
        self.restart().await?;
        Ok(self)
    }

    /// Runs the power on sequence, see [`crate::sync_lcd::Lcd::restart`].
    pub async fn restart(&mut self) -> Result<(), I::Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!("lcd {=u8:#x}: init", self.address);

        self.instruction_set = InstructionSet::Extended;
        self.display_control = DisplayControl::default();
        self.cursors.reset();

        self.delay.delay_ms(command::BOOT_DELAY_MS).await;
        for &cmd in command::INIT_PHASE0.iter() {
            self.command(cmd).await?;
            self.delay.delay_us(command::COMMAND_DELAY_US).await;
        }

        // Follower circuit has to settle before the display is switched on.
        self.delay.delay_ms(command::SETTLE_DELAY_MS).await;
        for &cmd in command::INIT_PHASE1.iter() {
            self.command(cmd).await?;
            self.delay.delay_us(command::COMMAND_DELAY_US).await;
        }

        Ok(())
    }

    async fn send(&mut self, control: Control, byte: u8) -> Result<(), I::Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("lcd {=u8:#x}: {=u8:#x} {=u8:#x}", self.address, control as u8, byte);

        self.i2c.write(self.address, &[control as u8, byte]).await
    }

    async fn command(&mut self, cmd: u8) -> Result<(), I::Error> {
        self.send(Control::Command, cmd).await
    }

    async fn data(&mut self, byte: u8) -> Result<(), I::Error> {
        self.send(Control::Data, byte).await
    }

    async fn write_byte_at(&mut self, byte: u8, col: u8, row: u8) -> Result<(), I::Error> {
        if let Some(addr) = command::ddram_address(col, row) {
            self.command(addr).await?;
            self.data(byte).await?;
        }
        Ok(())
    }

    /// Set the cursor to (col, row). Coordinates are zero-based, cells off screen are ignored.
    pub async fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), I::Error> {
        match command::ddram_address(col, row) {
            Some(addr) => self.command(addr).await,
            None => Ok(()),
        }
    }

    /// Write a single character at (col, row) without touching the line cursors.
    pub async fn put_char_at(&mut self, c: char, col: u8, row: u8) -> Result<(), I::Error> {
        self.write_byte_at(command::char_byte(c), col, row).await
    }

    /// Write `s` starting at (col, row), bypassing the line cursors.
    pub async fn put_str_at(&mut self, s: &str, col: u8, row: u8) -> Result<(), I::Error> {
        let mut col = col;
        for c in s.chars().take_while(|&c| c != '\0') {
            self.put_char_at(c, col, row).await?;
            col = col.saturating_add(1);
        }
        Ok(())
    }

    /// Write a character at the cursor of `line` and advance the cursor.
    ///
    /// `'\n'` and `'\r'` blank the rest of the line and return its cursor to column 0.
    pub async fn put_char(&mut self, line: u8, c: char) -> Result<(), I::Error> {
        match c {
            '\n' | '\r' => {
                if let Some(rest) = self.cursors.line_break(line) {
                    for col in rest {
                        self.write_byte_at(b' ', col, line).await?;
                    }
                }
                Ok(())
            }
            c => match self.cursors.advance(line) {
                Some(col) => self.write_byte_at(command::char_byte(c), col, line).await,
                None => Ok(()),
            },
        }
    }

    /// Write string to `line`. A `'\0'` ends the string.
    pub async fn put_str(&mut self, line: u8, s: &str) -> Result<(), I::Error> {
        for c in s.chars().take_while(|&c| c != '\0') {
            self.put_char(line, c).await?;
        }
        Ok(())
    }

    /// Write formatted text to `line`, cut off after
    /// [`FORMAT_CAPACITY`](crate::FORMAT_CAPACITY) bytes.
    ///
    /// `args` is rendered before the returned future is created, so the future does not hold on
    /// to it and stays `Send` whenever the bus and delay are.
    pub fn print_fmt<'s>(
        &'s mut self,
        line: u8,
        args: fmt::Arguments<'_>,
    ) -> impl Future<Output = Result<(), I::Error>> + use<'s, 'a, I, D> {
        let buf = FormatBuffer::render(args);
        async move { self.put_str(line, buf.as_str()).await }
    }

    /// Clear the display and move both line cursors to column 0.
    pub async fn clear(&mut self) -> Result<(), I::Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!("lcd {=u8:#x}: clear", self.address);

        self.cursors.reset();
        self.command(Commands::Clear as u8).await?;
        self.delay.delay_ms(command::CLEAR_DELAY_MS).await;
        Ok(())
    }

    /// Set the contrast, only the lower 6 bits of `level` are used.
    pub async fn set_contrast(&mut self, level: u8) -> Result<(), I::Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!("lcd {=u8:#x}: contrast {=u8}", self.address, level & 0x3F);

        self.instruction_set = InstructionSet::Extended;
        for cmd in command::contrast_sequence(level) {
            self.command(cmd).await?;
        }
        self.instruction_set = InstructionSet::Normal;
        Ok(())
    }

    /// Store `glyph` as custom character `code` (0..8). Invalid codes are ignored.
    ///
    /// Right after [`Lcd::init`] the controller is still in the extended instruction table, where
    /// the CGRAM opcodes mean something else. In that case a function set switching back to the
    /// normal table (`0x38`) is sent before the first row.
    pub async fn define_glyph(&mut self, code: u8, glyph: &Glyph) -> Result<(), I::Error> {
        if code >= crate::GLYPH_SLOTS {
            return Ok(());
        }
        if self.instruction_set == InstructionSet::Extended {
            self.command(Commands::FunctionSetNormal as u8).await?;
            self.instruction_set = InstructionSet::Normal;
        }
        for (row, &bits) in (0u8..).zip(glyph.rows().iter()) {
            if let Some(addr) = command::cgram_address(code, row) {
                self.command(addr).await?;
                self.data(bits).await?;
            }
        }
        Ok(())
    }

    /// Define custom character `code` and show it at (col, row).
    pub async fn put_custom_char(
        &mut self,
        code: u8,
        glyph: &Glyph,
        col: u8,
        row: u8,
    ) -> Result<(), I::Error> {
        if code >= crate::GLYPH_SLOTS {
            return Ok(());
        }
        self.define_glyph(code, glyph).await?;
        self.write_byte_at(code, col, row).await
    }

    /// Switch display, cursor and cursor blinking on or off.
    pub async fn set_display_control(&mut self, control: DisplayControl) -> Result<(), I::Error> {
        self.display_control = control;
        self.command(control.command()).await
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
