//! PostgreSQL NUMERIC binary codec.
//!
//! The wire layout is `[ndigits:2][weight:2][sign:2][dscale:2]` followed by
//! `ndigits` base-10000 digit groups of 2 bytes each. `weight` is the power
//! of 10000 of the first group; `dscale` is the number of displayed decimal
//! digits after the point.

use bytes::{BufMut, BytesMut};
use rust_decimal::Decimal;

use crate::error::MarshalError;
use crate::protocol::cursor::WireCursor;

const NUMERIC_POS: u16 = 0x0000;
const NUMERIC_NEG: u16 = 0x4000;
const NUMERIC_NAN: u16 = 0xC000;

pub struct DecimalHandler;

impl DecimalHandler {
    /// Encode a decimal into the NUMERIC digit-group representation.
    pub fn encode_numeric(value: &Decimal) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(16);
        Self::encode_numeric_into(value, &mut buf);
        buf.to_vec()
    }

    pub fn encode_numeric_into(value: &Decimal, buf: &mut BytesMut) {
        let dscale = value.scale() as u16;
        let abs = value.abs().to_string();
        let (int_part, frac_part) = match abs.split_once('.') {
            Some((i, f)) => (i, f),
            None => (abs.as_str(), ""),
        };
        let int_part = int_part.trim_start_matches('0');

        let mut digits: Vec<i16> = Vec::new();

        // Integer digit groups, right-aligned on the decimal point.
        let left_pad = (4 - int_part.len() % 4) % 4;
        let padded = format!("{}{}", "0".repeat(left_pad), int_part);
        for chunk in padded.as_bytes().chunks(4) {
            if !chunk.is_empty() {
                digits.push(group_value(chunk));
            }
        }
        let mut weight = digits.len() as i16 - 1;

        // Fractional digit groups, left-aligned on the decimal point.
        let right_pad = (4 - frac_part.len() % 4) % 4;
        let padded = format!("{}{}", frac_part, "0".repeat(right_pad));
        for chunk in padded.as_bytes().chunks(4) {
            if !chunk.is_empty() {
                digits.push(group_value(chunk));
            }
        }

        // Canonical form: no leading or trailing zero groups. Dropping a
        // leading group shifts the weight down one power of 10000.
        while digits.first() == Some(&0) {
            digits.remove(0);
            weight -= 1;
        }
        while digits.last() == Some(&0) {
            digits.pop();
        }
        if digits.is_empty() {
            weight = 0;
        }

        let sign = if value.is_sign_negative() && !digits.is_empty() {
            NUMERIC_NEG
        } else {
            NUMERIC_POS
        };

        buf.put_i16(digits.len() as i16);
        buf.put_i16(weight);
        buf.put_u16(sign);
        buf.put_u16(dscale);
        for d in digits {
            buf.put_i16(d);
        }
    }

    /// Decode a NUMERIC buffer back into a decimal.
    pub fn decode_numeric(raw: &[u8]) -> Result<Decimal, MarshalError> {
        const TYPE: &str = "numeric";
        let mut cur = WireCursor::new(raw);
        let ndigits = cur.read_i16()?;
        let weight = cur.read_i16()?;
        let sign = cur.read_u16()?;
        let dscale = cur.read_u16()?;

        if ndigits < 0 {
            return Err(MarshalError::invalid(TYPE, "negative digit count"));
        }
        match sign {
            NUMERIC_POS | NUMERIC_NEG => {}
            NUMERIC_NAN => {
                return Err(MarshalError::invalid(TYPE, "NaN is not representable"));
            }
            other => {
                return Err(MarshalError::invalid(TYPE, format!("bad sign word {other:#06x}")));
            }
        }

        let mut mantissa: i128 = 0;
        for _ in 0..ndigits {
            let group = cur.read_i16()?;
            if !(0..10_000).contains(&group) {
                return Err(MarshalError::invalid(TYPE, format!("digit group {group} out of range")));
            }
            mantissa = mantissa
                .checked_mul(10_000)
                .and_then(|m| m.checked_add(group as i128))
                .ok_or_else(|| MarshalError::invalid(TYPE, "value exceeds decimal range"))?;
        }
        cur.expect_end(TYPE)?;

        if sign == NUMERIC_NEG {
            mantissa = -mantissa;
        }

        // Overall value is mantissa * 10^exp with exp a multiple of 4.
        let exp = 4 * (weight as i32 + 1 - ndigits as i32);
        let mut value = if exp >= 0 {
            let scaled = (0..exp).try_fold(mantissa, |m, _| m.checked_mul(10)).ok_or_else(
                || MarshalError::invalid(TYPE, "value exceeds decimal range"),
            )?;
            Decimal::try_from_i128_with_scale(scaled, 0)
        } else {
            Decimal::try_from_i128_with_scale(mantissa, (-exp) as u32)
        }
        .map_err(|e| MarshalError::invalid(TYPE, e.to_string()))?;

        if (dscale as u32) > value.scale() && (dscale as u32) <= 28 {
            value.rescale(dscale as u32);
        }
        Ok(value)
    }
}

fn group_value(ascii_digits: &[u8]) -> i16 {
    ascii_digits
        .iter()
        .fold(0i16, |acc, b| acc * 10 + (b - b'0') as i16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn round_trip(s: &str) {
        let d = Decimal::from_str(s).unwrap();
        let encoded = DecimalHandler::encode_numeric(&d);
        let decoded = DecimalHandler::decode_numeric(&encoded).unwrap();
        assert_eq!(decoded, d, "round trip of {s}");
    }

    #[test]
    fn known_byte_image() {
        // 123.45 -> ndigits=2, weight=0, sign=+, dscale=2, groups {123, 4500}
        let encoded = DecimalHandler::encode_numeric(&Decimal::from_str("123.45").unwrap());
        assert_eq!(
            encoded,
            vec![0, 2, 0, 0, 0, 0, 0, 2, 0, 123, 0x11, 0x94]
        );
    }

    #[test]
    fn round_trips() {
        for s in [
            "0", "1", "-1", "123.45", "-123.45", "0.5", "0.00005", "10000",
            "9999.9999", "12345678.87654321", "0.00", "-0.001", "99999999",
        ] {
            round_trip(s);
        }
    }

    #[test]
    fn zero_has_no_digits() {
        let encoded = DecimalHandler::encode_numeric(&Decimal::ZERO);
        assert_eq!(&encoded[0..2], &[0, 0]); // ndigits
    }

    #[test]
    fn nan_sign_rejected() {
        let raw = [0u8, 0, 0, 0, 0xC0, 0, 0, 0];
        assert!(DecimalHandler::decode_numeric(&raw).is_err());
    }

    #[test]
    fn truncated_digit_list_rejected() {
        // Claims two digit groups but carries only one.
        let raw = [0u8, 2, 0, 0, 0, 0, 0, 0, 0, 1];
        assert!(matches!(
            DecimalHandler::decode_numeric(&raw),
            Err(MarshalError::UnexpectedEof { .. })
        ));
    }
}
