//! Transport trait definitions
//!
//! These traits use `maybe_async` to support both sync and async modes.
//! - With the `is_sync` feature (default), traits are synchronous
//! - Without it, every method is an `async fn` (Embassy, WASM, tokio)

use crate::error::Result;
use core::fmt;
use maybe_async::maybe_async;

/// Identifier of a GPIO line: port number plus pin within the port
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Line {
    /// Port (GPIO bank) number
    pub port: u8,
    /// Pin within the port
    pub pin: u8,
}

impl Line {
    /// Create a line identifier
    pub const fn new(port: u8, pin: u8) -> Self {
        Self { port, pin }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}.{}", self.port, self.pin)
    }
}

/// Byte-oriented SPI transport (sync or async depending on `is_sync` feature)
///
/// The driver frames every command as:
///
/// ```text
/// begin(cs)  write_byte(opcode)  [write_byte(addr) x3]  [write_byte(0)]
///            write_byte(data).. | read_byte()..  end(cs)
/// ```
///
/// `begin` asserts chip-select, `end` releases it. `end` is called for
/// every successful `begin`, also when a byte transfer in between failed.
/// Transfers block for as long as the hardware needs; the driver applies no
/// timeout of its own.
///
/// ## Example
///
/// ```ignore
/// #[maybe_async(AFIT)]
/// impl SpiTransport for Usart0 {
///     async fn begin(&mut self, cs: Line) -> Result<()> {
///         self.gpio.set_low(cs.port, cs.pin);
///         Ok(())
///     }
///     async fn write_byte(&mut self, byte: u8) -> Result<()> {
///         self.transfer(byte).await.map(|_| ())
///     }
///     async fn read_byte(&mut self) -> Result<u8> {
///         self.transfer(0xFF).await
///     }
///     async fn end(&mut self, cs: Line) -> Result<()> {
///         self.gpio.set_high(cs.port, cs.pin);
///         Ok(())
///     }
/// }
/// ```
#[maybe_async(AFIT)]
pub trait SpiTransport {
    /// Assert chip-select `cs` and open a transaction
    async fn begin(&mut self, cs: Line) -> Result<()>;

    /// Clock one byte out
    async fn write_byte(&mut self, byte: u8) -> Result<()>;

    /// Clock one byte in
    async fn read_byte(&mut self) -> Result<u8>;

    /// Release chip-select `cs` and close the transaction
    async fn end(&mut self, cs: Line) -> Result<()>;

    /// Delay for the specified number of microseconds
    ///
    /// Used between transactions that need a settle time. The default does
    /// nothing; the chip-select toggle itself is usually long enough.
    async fn delay_us(&mut self, _us: u32) {}
}

// Forwarding impl so several handles can share one bus by reference
#[maybe_async(AFIT)]
impl<T: SpiTransport + ?Sized> SpiTransport for &mut T {
    async fn begin(&mut self, cs: Line) -> Result<()> {
        (**self).begin(cs).await
    }

    async fn write_byte(&mut self, byte: u8) -> Result<()> {
        (**self).write_byte(byte).await
    }

    async fn read_byte(&mut self) -> Result<u8> {
        (**self).read_byte().await
    }

    async fn end(&mut self, cs: Line) -> Result<()> {
        (**self).end(cs).await
    }

    async fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us).await
    }
}
