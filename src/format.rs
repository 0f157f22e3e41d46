use core::convert::Infallible;
use core::fmt;

use ufmt_write::uWrite;

/// Longest formatted text handed to the display by `print_fmt`, in bytes.
pub const FORMAT_CAPACITY: usize = 31;

/// Fixed size text buffer that silently drops whatever does not fit.
///
/// Used to render formatted output before it is written line by line. It works with both
/// `core::fmt` and `ufmt`:
///
/// ```
/// use core::fmt::Write;
/// use lcd_erc1602_i2c::FormatBuffer;
///
/// let mut buf = FormatBuffer::new();
/// write!(buf, "{:>4}%", 42).unwrap();
/// assert_eq!(buf.as_str(), "  42%");
/// ```
#[derive(Debug, Default, Clone)]
pub struct FormatBuffer {
    text: heapless::String<FORMAT_CAPACITY>,
}

impl FormatBuffer {
    pub const fn new() -> Self {
        Self {
            text: heapless::String::new(),
        }
    }

    /// Render `args`, dropping whatever does not fit.
    pub fn render(args: fmt::Arguments<'_>) -> Self {
        let mut buf = Self::new();
        // FormatBuffer never fails, errors can only come from a Display impl.
        let _ = fmt::write(&mut buf, args);
        buf
    }

    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    fn push_truncated(&mut self, s: &str) {
        for c in s.chars() {
            if self.text.push(c).is_err() {
                break;
            }
        }
    }
}

impl fmt::Write for FormatBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_truncated(s);
        Ok(())
    }
}

impl uWrite for FormatBuffer {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.push_truncated(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn keeps_short_text() {
        let mut buf = FormatBuffer::new();
        write!(buf, "T={} C", 21).unwrap();
        assert_eq!(buf.as_str(), "T=21 C");
    }

    #[test]
    fn truncates_long_text() {
        let mut buf = FormatBuffer::new();
        write!(buf, "{}{}", "0123456789abcdefghij", "KLMNOPQRSTUVWXYZ").unwrap();
        assert_eq!(buf.as_str(), "0123456789abcdefghijKLMNOPQRSTU");
        assert_eq!(buf.as_str().len(), FORMAT_CAPACITY);
    }

    #[test]
    fn ufmt_output() {
        let mut buf = FormatBuffer::new();
        ufmt::uwrite!(buf, "{}:{}", 12u8, 5u16).unwrap();
        assert_eq!(buf.as_str(), "12:5");
    }

    #[test]
    fn clear() {
        let mut buf = FormatBuffer::new();
        fmt::Write::write_str(&mut buf, "abc").unwrap();
        buf.clear();
        assert_eq!(buf.as_str(), "");
    }
}
