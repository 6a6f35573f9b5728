//! Byte-oriented reader for the masked class-file format.
//!
//! Every byte on disk is obfuscated with a fixed XOR key before it reaches
//! the decoder; this reader is the one place that un-masks it. Position
//! tracking matters because the mask depends on the byte's offset in the
//! file, not just its value.

use thiserror::Error;

/// Key the on-disk bytes are XOR-masked against, one byte per position
/// modulo the key's length.
const KEY: [u8; 20] = [
    0xAA, 0x3F, 0xC2, 0x7D, 0x91, 0x4B, 0x6E, 0xF0, 0x12, 0x8D, 0x55, 0x99, 0x0A, 0xDE, 0x6B, 0x3C,
    0x47, 0x81, 0x2F, 0xB4,
];

#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("end of input")]
    EndOfInput,
}

/// Wraps a byte buffer, delivering big-endian unsigned integers and raw
/// byte runs after undoing the positional XOR mask.
pub(crate) struct MaskedReader<'b> {
    buffer: &'b [u8],
    pos: usize,
}

impl<'b> MaskedReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self { buffer, pos: 0 }
    }

    pub fn tell(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn read_u1(&mut self) -> Result<u8, ReaderError> {
        let byte = *self
            .buffer
            .get(self.pos)
            .ok_or(ReaderError::EndOfInput)?;
        let unmasked = byte ^ KEY[self.pos % KEY.len()];
        self.pos += 1;
        Ok(unmasked)
    }

    pub fn read_u2(&mut self) -> Result<u16, ReaderError> {
        let hi = self.read_u1()? as u16;
        let lo = self.read_u1()? as u16;
        Ok((hi << 8) | lo)
    }

    pub fn read_u4(&mut self) -> Result<u32, ReaderError> {
        let hi = self.read_u2()? as u32;
        let lo = self.read_u2()? as u32;
        Ok((hi << 16) | lo)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, ReaderError> {
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.read_u1()?);
        }
        Ok(out)
    }

    /// Skips `n` bytes without unmasking them. Valid because masking is
    /// purely a function of position, and skipped bytes are never read.
    pub fn skip(&mut self, n: usize) {
        self.pos += n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(bytes: &[u8]) -> Vec<u8> {
        bytes
            .iter()
            .enumerate()
            .map(|(i, b)| b ^ KEY[i % KEY.len()])
            .collect()
    }

    #[test]
    fn xor_round_trip() {
        let plain: Vec<u8> = (0..64u8).collect();
        let masked = mask(&plain);

        let mut reader = MaskedReader::new(&masked);
        let recovered = reader.read_bytes(plain.len()).unwrap();

        assert_eq!(recovered, plain);
    }

    #[test]
    fn reads_big_endian_integers() {
        let plain = [0xCA, 0xFE, 0xBA, 0xBE];
        let masked = mask(&plain);

        let mut reader = MaskedReader::new(&masked);
        assert_eq!(reader.read_u4().unwrap(), 0xCAFEBABE);
    }

    #[test]
    fn end_of_input_is_reported() {
        let masked = mask(&[0x01]);
        let mut reader = MaskedReader::new(&masked);

        reader.read_u1().unwrap();
        assert!(matches!(reader.read_u1(), Err(ReaderError::EndOfInput)));
    }

    #[test]
    fn seek_skips_without_unmasking() {
        let plain = [0x10, 0x20, 0x30, 0x40];
        let masked = mask(&plain);

        let mut reader = MaskedReader::new(&masked);
        reader.seek(2);
        assert_eq!(reader.tell(), 2);
        assert_eq!(reader.read_u1().unwrap(), 0x30);
    }
}
