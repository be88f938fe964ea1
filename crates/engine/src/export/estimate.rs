//! Exact byte sizes of CSV output.
//!
//! Sizes are measured by running the real codec into a counting sink, so
//! quoting and escaping are accounted for exactly.

use std::io;

use crate::{ResultEngine, TransactionRecord};

use super::codec::write_csv;

/// `io::Write` sink that discards bytes and remembers how many it saw.
#[derive(Debug, Default)]
struct ByteCounter(u64);

impl io::Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0 += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Size of the header line alone.
pub fn estimate_header_bytes() -> ResultEngine<u64> {
    estimate_bytes(&[])
}

/// Size of a complete document: header plus every row in `rows`.
pub fn estimate_bytes(rows: &[TransactionRecord]) -> ResultEngine<u64> {
    Ok(write_csv(ByteCounter::default(), rows)?.0)
}
