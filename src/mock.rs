//! Bus and delay doubles that record everything into one shared, ordered log.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

use crate::command::{Control, INIT_PHASE0, INIT_PHASE1};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Write { address: u8, control: u8, byte: u8 },
    DelayNs(u32),
    DelayUs(u32),
    DelayMs(u32),
}

pub(crate) fn cmd(byte: u8) -> Event {
    Event::Write {
        address: crate::DEFAULT_ADDRESS,
        control: Control::Command as u8,
        byte,
    }
}

pub(crate) fn data(byte: u8) -> Event {
    Event::Write {
        address: crate::DEFAULT_ADDRESS,
        control: Control::Data as u8,
        byte,
    }
}

/// Everything a successful initialization records.
pub(crate) fn init_events() -> Vec<Event> {
    let mut events = vec![Event::DelayMs(100)];
    for &byte in INIT_PHASE0.iter() {
        events.push(cmd(byte));
        events.push(Event::DelayUs(30));
    }
    events.push(Event::DelayMs(250));
    for &byte in INIT_PHASE1.iter() {
        events.push(cmd(byte));
        events.push(Event::DelayUs(30));
    }
    events
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Log(Rc<RefCell<Vec<Event>>>);

impl Log {
    pub(crate) fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    /// Events recorded after the first `skip` ones.
    pub(crate) fn since(&self, skip: usize) -> Vec<Event> {
        self.0.borrow()[skip..].to_vec()
    }

    pub(crate) fn len(&self) -> usize {
        self.0.borrow().len()
    }

    fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct BusError;

impl embedded_hal::i2c::Error for BusError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub(crate) struct MockI2c {
    log: Log,
    writes: usize,
    /// Number of writes that succeed before every further one fails.
    fail_after: Option<usize>,
}

impl MockI2c {
    pub(crate) fn fail_after(mut self, writes: usize) -> Self {
        self.fail_after = Some(writes);
        self
    }

    fn record(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), BusError> {
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    if self.fail_after.is_some_and(|n| self.writes >= n) {
                        return Err(BusError);
                    }
                    self.writes += 1;
                    assert_eq!(bytes.len(), 2, "one control and one payload byte expected");
                    self.log.push(Event::Write {
                        address,
                        control: bytes[0],
                        byte: bytes[1],
                    });
                }
                Operation::Read(buf) => buf.fill(0),
            }
        }
        Ok(())
    }
}

impl ErrorType for MockI2c {
    type Error = BusError;
}

impl embedded_hal::i2c::I2c for MockI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.record(address, operations)
    }
}

pub(crate) struct MockDelay {
    log: Log,
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.push(Event::DelayNs(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.log.push(Event::DelayUs(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.push(Event::DelayMs(ms));
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::i2c::I2c for MockI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.record(address, operations)
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::delay::DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.log.push(Event::DelayNs(ns));
    }

    async fn delay_us(&mut self, us: u32) {
        self.log.push(Event::DelayUs(us));
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.log.push(Event::DelayMs(ms));
    }
}

pub(crate) fn bus() -> (MockI2c, MockDelay, Log) {
    let log = Log::default();
    let i2c = MockI2c {
        log: log.clone(),
        writes: 0,
        fail_after: None,
    };
    let delay = MockDelay { log: log.clone() };
    (i2c, delay, log)
}
