use byteorder::{ByteOrder, NetworkEndian};

use crate::error::MarshalError;

/// Bounds-checked reader over a wire buffer.
///
/// All multi-byte reads go through `byteorder::NetworkEndian`, making this
/// the single point of truth for inbound byte order. Reads past the end of
/// the buffer fail with [`MarshalError::UnexpectedEof`] instead of panicking.
pub struct WireCursor<'a> {
    buf: &'a [u8],
}

impl<'a> WireCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        WireCursor { buf }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume exactly `n` bytes from the front of the buffer.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], MarshalError> {
        if self.buf.len() < n {
            return Err(MarshalError::UnexpectedEof {
                needed: n,
                remaining: self.buf.len(),
            });
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    pub fn read_u8(&mut self) -> Result<u8, MarshalError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i16(&mut self) -> Result<i16, MarshalError> {
        Ok(NetworkEndian::read_i16(self.take(2)?))
    }

    pub fn read_u16(&mut self) -> Result<u16, MarshalError> {
        Ok(NetworkEndian::read_u16(self.take(2)?))
    }

    pub fn read_i32(&mut self) -> Result<i32, MarshalError> {
        Ok(NetworkEndian::read_i32(self.take(4)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, MarshalError> {
        Ok(NetworkEndian::read_u32(self.take(4)?))
    }

    pub fn read_i64(&mut self) -> Result<i64, MarshalError> {
        Ok(NetworkEndian::read_i64(self.take(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32, MarshalError> {
        Ok(NetworkEndian::read_f32(self.take(4)?))
    }

    pub fn read_f64(&mut self) -> Result<f64, MarshalError> {
        Ok(NetworkEndian::read_f64(self.take(8)?))
    }

    /// Read a 4-byte length prefix followed by that many bytes.
    pub fn read_len_prefixed(&mut self, type_name: &'static str) -> Result<&'a [u8], MarshalError> {
        let len = self.read_i32()?;
        if len < 0 {
            return Err(MarshalError::invalid(
                type_name,
                format!("negative length prefix {len}"),
            ));
        }
        self.take(len as usize)
    }

    /// Fail unless the buffer has been fully consumed.
    pub fn expect_end(&self, type_name: &'static str) -> Result<(), MarshalError> {
        if self.buf.is_empty() {
            Ok(())
        } else {
            Err(MarshalError::invalid(
                type_name,
                format!("{} trailing bytes after value", self.buf.len()),
            ))
        }
    }
}

/// Fail unless a fixed-width buffer has exactly the expected size.
pub fn check_len(
    type_name: &'static str,
    raw: &[u8],
    expected: usize,
) -> Result<(), MarshalError> {
    if raw.len() == expected {
        Ok(())
    } else {
        Err(MarshalError::InvalidLength {
            type_name,
            expected,
            actual: raw.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_network_order() {
        let buf = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
        let mut cur = WireCursor::new(&buf);
        assert_eq!(cur.read_i32().unwrap(), 0x01020304);
        assert_eq!(cur.read_i16().unwrap(), 0x0506);
        assert!(cur.is_empty());
    }

    #[test]
    fn take_past_end_fails() {
        let mut cur = WireCursor::new(&[0u8; 3]);
        let err = cur.read_i32().unwrap_err();
        assert_eq!(
            err,
            MarshalError::UnexpectedEof {
                needed: 4,
                remaining: 3
            }
        );
    }

    #[test]
    fn len_prefixed_rejects_negative() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&(-2i32).to_be_bytes());
        let mut cur = WireCursor::new(&buf);
        assert!(cur.read_len_prefixed("test").is_err());
    }

    #[test]
    fn expect_end_flags_trailing_bytes() {
        let cur = WireCursor::new(&[0u8; 2]);
        assert!(cur.expect_end("test").is_err());
    }
}
