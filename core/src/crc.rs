//! CRC-32 computation over byte streams.
//!
//! Implements ISO 3309 / IEEE 802.3 CRC-32 (CRC-32/ISO-HDLC), the checksum
//! used by Zip, gzip, PNG and the Ethernet frame check sequence.
//! No external dependencies.
//!
//! A [`Crc32`] owns its 256-entry lookup table. The table is built once and
//! never mutated, so one instance can be shared by any number of threads.
//!
//! # Example
//!
//! ```
//! use helper_core::crc::Crc32;
//!
//! let crc = Crc32::new();
//! assert_eq!(crc.compute(&b"123456789"[..]).unwrap(), 0xCBF43926);
//! ```

use crate::error::{Error, Result};
use std::io::{self, Read, Write};

/// CRC-32 polynomial (reflected form of 0x04C11DB7).
pub const POLYNOMIAL: u32 = 0xEDB88320;

/// Initial accumulator value, also the final XOR mask.
const INIT: u32 = 0xFFFFFFFF;

/// Read size used by [`Crc32::compute`].
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Process-wide instance, built at compile time.
static SHARED: Crc32 = Crc32::new();

/// Generate the CRC lookup table.
const fn generate_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0u32;
    while i < 256 {
        let mut crc = i;
        let mut j = 0;
        while j < 8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLYNOMIAL;
            } else {
                crc >>= 1;
            }
            j += 1;
        }
        table[i as usize] = crc;
        i += 1;
    }
    table
}

/// CRC-32 calculator holding a pre-computed lookup table.
#[derive(Debug, Clone)]
pub struct Crc32 {
    table: [u32; 256],
}

impl Crc32 {
    /// Build a calculator, populating the lookup table.
    pub const fn new() -> Self {
        Self {
            table: generate_table(),
        }
    }

    /// Shared read-only instance.
    ///
    /// Equivalent to a fresh [`Crc32::new`], without rebuilding the table.
    pub fn shared() -> &'static Crc32 {
        &SHARED
    }

    /// The lookup table.
    pub fn table(&self) -> &[u32; 256] {
        &self.table
    }

    /// Compute the CRC-32 of everything `source` yields.
    ///
    /// The source is read in [`DEFAULT_CHUNK_SIZE`] chunks until end of
    /// stream. A failing read aborts the computation with
    /// [`Error::SourceRead`]; no partial checksum is ever returned.
    pub fn compute<R: Read>(&self, source: R) -> Result<u32> {
        self.compute_chunked(source, DEFAULT_CHUNK_SIZE)
    }

    /// Compute the CRC-32 of `source`, reading `chunk_size` bytes at a time.
    ///
    /// The result does not depend on `chunk_size`. A size of 0 is read as 1.
    pub fn compute_chunked<R: Read>(&self, mut source: R, chunk_size: usize) -> Result<u32> {
        let mut buffer = vec![0u8; chunk_size.max(1)];
        let mut digest = self.digest();

        loop {
            match source.read(&mut buffer) {
                Ok(0) => break,
                Ok(count) => digest.update(&buffer[..count]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::from(e)),
            }
        }

        Ok(digest.finalize())
    }

    /// Compute the CRC-32 of an in-memory buffer.
    #[inline]
    pub fn checksum(&self, data: &[u8]) -> u32 {
        let mut digest = self.digest();
        digest.update(data);
        digest.finalize()
    }

    /// Verify CRC-32 checksum matches expected value.
    #[inline]
    pub fn verify(&self, data: &[u8], expected: u32) -> bool {
        self.checksum(data) == expected
    }

    /// Like [`Crc32::verify`], but reports the mismatch as an error.
    pub fn ensure(&self, data: &[u8], expected: u32) -> Result<()> {
        let actual = self.checksum(data);
        if actual != expected {
            return Err(Error::CrcMismatch { expected, actual });
        }
        Ok(())
    }

    /// Start an incremental computation backed by this table.
    pub fn digest(&self) -> Digest<'_> {
        Digest {
            table: &self.table,
            crc: INIT,
        }
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Running CRC-32 accumulator.
///
/// Created per computation; the table is borrowed, the register is owned.
/// Implements [`Write`] so a reader can be drained into it with
/// [`std::io::copy`].
#[derive(Debug, Clone)]
pub struct Digest<'a> {
    table: &'a [u32; 256],
    crc: u32,
}

impl Digest<'_> {
    /// Fold `data` into the accumulator.
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        let mut crc = self.crc;
        for &byte in data {
            let index = ((crc & 0xFF) ^ byte as u32) as usize;
            crc = (crc >> 8) ^ self.table[index];
        }
        self.crc = crc;
    }

    /// Checksum of the bytes folded so far.
    pub fn value(&self) -> u32 {
        !self.crc
    }

    /// Finish the computation.
    pub fn finalize(self) -> u32 {
        !self.crc
    }
}

impl Write for Digest<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    /// Hands out one byte per read call.
    struct ByteAtATime<'a>(&'a [u8]);

    impl Read for ByteAtATime<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.split_first() {
                Some((&first, rest)) if !buf.is_empty() => {
                    buf[0] = first;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    /// Yields some bytes, then fails.
    struct Broken {
        served: bool,
    }

    impl Read for Broken {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.served {
                self.served = true;
                buf[0] = b'x';
                return Ok(1);
            }
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "connection reset"))
        }
    }

    /// Interrupts every other read.
    struct Flaky<'a> {
        data: &'a [u8],
        interrupt: bool,
    }

    impl Read for Flaky<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            let n = self.data.len().min(buf.len()).min(3);
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn crc_known_vectors() {
        // "123456789" should produce 0xCBF43926 (standard check value)
        let crc = Crc32::new();
        assert_eq!(crc.compute(&b"123456789"[..]).unwrap(), 0xCBF43926);
        assert_eq!(crc.checksum(b"123456789"), 0xCBF43926);
    }

    #[test]
    fn crc_empty() {
        let crc = Crc32::new();
        assert_eq!(crc.compute(io::empty()).unwrap(), 0x00000000);
        assert_eq!(crc.checksum(&[]), 0x00000000);
    }

    #[test]
    fn crc_single_byte() {
        assert_eq!(Crc32::new().checksum(b"a"), 0xE8B7BE43);
        assert_eq!(Crc32::new().checksum(&[0x00]), 0xD202EF8D);
    }

    #[test]
    fn crc_table_first_entries() {
        let crc = Crc32::new();
        assert_eq!(crc.table()[0], 0x00000000);
        assert_eq!(crc.table()[1], 0x77073096);
        assert_eq!(crc.table()[255], 0x2D02EF8D);
    }

    #[test]
    fn crc_deterministic() {
        let crc = Crc32::new();
        let data = b"deterministic test";
        assert_eq!(
            crc.compute(&data[..]).unwrap(),
            crc.compute(&data[..]).unwrap()
        );
    }

    #[test]
    fn chunking_does_not_change_result() {
        let crc = Crc32::new();
        let data: Vec<u8> = (0..5000u32).map(|i| (i * 7 % 251) as u8).collect();

        let whole = crc.checksum(&data);
        assert_eq!(crc.compute(&data[..]).unwrap(), whole);
        assert_eq!(crc.compute(ByteAtATime(&data)).unwrap(), whole);
        for size in [0, 1, 3, 64, 1023, 1024, 1025, 8192] {
            assert_eq!(crc.compute_chunked(&data[..], size).unwrap(), whole);
        }
    }

    #[test]
    fn read_failure_is_propagated() {
        let result = Crc32::new().compute(Broken { served: false });
        match result {
            Err(Error::SourceRead { kind, message }) => {
                assert_eq!(kind, io::ErrorKind::BrokenPipe);
                assert!(message.contains("connection reset"));
            }
            other => panic!("expected read failure, got {:?}", other),
        }
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let crc = Crc32::new();
        let source = Flaky {
            data: b"123456789",
            interrupt: false,
        };
        assert_eq!(crc.compute(source).unwrap(), 0xCBF43926);
    }

    #[test]
    fn verify_and_ensure() {
        let crc = Crc32::new();
        let data = b"test data";
        let sum = crc.checksum(data);
        assert!(crc.verify(data, sum));
        assert!(!crc.verify(data, sum ^ 1)); // flip one bit
        assert!(crc.ensure(data, sum).is_ok());
        assert_eq!(
            crc.ensure(data, sum ^ 1),
            Err(Error::CrcMismatch {
                expected: sum ^ 1,
                actual: sum
            })
        );
    }

    #[test]
    fn digest_matches_compute() {
        let crc = Crc32::new();
        let data = b"The quick brown fox jumps over the lazy dog";

        let mut digest = crc.digest();
        digest.update(&data[..10]);
        digest.update(&data[10..]);
        assert_eq!(digest.value(), 0x414FA339);
        assert_eq!(digest.finalize(), crc.compute(&data[..]).unwrap());

        let mut sink = crc.digest();
        io::copy(&mut &data[..], &mut sink).unwrap();
        assert_eq!(sink.finalize(), 0x414FA339);
    }

    #[test]
    fn shared_instance_matches_fresh_table() {
        assert_eq!(Crc32::shared().table(), Crc32::new().table());
    }

    #[test]
    fn concurrent_use_matches_sequential() {
        let crc = Crc32::new();
        let left: Vec<u8> = (0..=255u8).cycle().take(100_000).collect();
        let right: Vec<u8> = b"123456789".repeat(10_000);

        let sequential = (
            crc.compute(&left[..]).unwrap(),
            crc.compute(&right[..]).unwrap(),
        );

        let concurrent = thread::scope(|s| {
            let a = s.spawn(|| crc.compute(&left[..]).unwrap());
            let b = s.spawn(|| crc.compute(&right[..]).unwrap());
            (a.join().unwrap(), b.join().unwrap())
        });

        assert_eq!(sequential, concurrent);
    }
}
