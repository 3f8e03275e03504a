//! Recording transport for unit tests

use std::collections::VecDeque;
use std::vec::Vec;

use super::{Line, SpiTransport};
use crate::error::{Error, Result};
use maybe_async::maybe_async;

/// One call made on the transport
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Begin(Line),
    Write(u8),
    Read(u8),
    End(Line),
    Delay(u32),
}

/// Transport that logs every call and answers reads from a script
///
/// Once the script runs dry, reads return the last byte written in the
/// previous transaction, which makes register write/read round trips work.
#[derive(Debug, Default)]
pub struct MockTransport {
    pub events: Vec<Event>,
    responses: VecDeque<u8>,
    echo: u8,
    pending: Option<u8>,
    fail_on_transfer: Option<usize>,
    transfers: usize,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes returned by subsequent reads
    pub fn with_responses(bytes: &[u8]) -> Self {
        Self {
            responses: bytes.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Fail the n-th byte transfer (0-based, reads and writes counted together)
    pub fn failing_at(n: usize) -> Self {
        Self {
            fail_on_transfer: Some(n),
            ..Self::default()
        }
    }

    fn transfer(&mut self) -> Result<()> {
        let n = self.transfers;
        self.transfers += 1;
        if self.fail_on_transfer == Some(n) {
            return Err(Error::TransportFault);
        }
        Ok(())
    }

    /// Bytes written to the chip, across all transactions
    pub fn written(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Write(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    /// Transactions as lists of written bytes
    pub fn transactions(&self) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        let mut current = None;
        for event in &self.events {
            match event {
                Event::Begin(_) => current = Some(Vec::new()),
                Event::Write(b) => {
                    if let Some(tx) = current.as_mut() {
                        tx.push(*b);
                    }
                }
                Event::End(_) => {
                    if let Some(tx) = current.take() {
                        out.push(tx);
                    }
                }
                _ => {}
            }
        }
        out
    }

    pub fn count(&self, wanted: fn(&Event) -> bool) -> usize {
        self.events.iter().filter(|e| wanted(e)).count()
    }
}

#[maybe_async(AFIT)]
impl SpiTransport for MockTransport {
    async fn begin(&mut self, cs: Line) -> Result<()> {
        self.events.push(Event::Begin(cs));
        self.pending = None;
        Ok(())
    }

    async fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.transfer()?;
        self.events.push(Event::Write(byte));
        self.pending = Some(byte);
        Ok(())
    }

    async fn read_byte(&mut self) -> Result<u8> {
        self.transfer()?;
        let byte = self.responses.pop_front().unwrap_or(self.echo);
        self.events.push(Event::Read(byte));
        Ok(byte)
    }

    async fn end(&mut self, cs: Line) -> Result<()> {
        self.events.push(Event::End(cs));
        if let Some(byte) = self.pending.take() {
            self.echo = byte;
        }
        Ok(())
    }

    async fn delay_us(&mut self, us: u32) {
        self.events.push(Event::Delay(us));
    }
}
