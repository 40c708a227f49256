//! Generic range codec.
//!
//! A range is a 1-byte flag set followed by a length-prefixed segment for
//! each finite bound. The element set is closed: only types implementing
//! [`RangeElement`] can form a range, so an unsupported element type fails
//! at instantiation rather than at use.

use bitflags::bitflags;
use bytes::{BufMut, BytesMut};

use crate::error::MarshalError;
use crate::protocol::binary::PgWireType;
use crate::protocol::cursor::WireCursor;
use crate::types::{Format, PgType};

bitflags! {
    /// Wire flag byte of a range value.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RangeFlags: u8 {
        const EMPTY  = 0x01;
        const LB_INC = 0x02;
        const UB_INC = 0x04;
        const LB_INF = 0x08;
        const UB_INF = 0x10;
    }
}

/// One end of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound<T> {
    Inclusive(T),
    Exclusive(T),
    Infinite,
}

impl<T> RangeBound<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            RangeBound::Inclusive(v) | RangeBound::Exclusive(v) => Some(v),
            RangeBound::Infinite => None,
        }
    }
}

/// An element type over which the server defines a built-in range type.
pub trait RangeElement: PgWireType {
    const RANGE_TYPE: PgType;
    const RANGE_ARRAY_TYPE: PgType;
}

macro_rules! range_element_impl {
    ($ty:ty, $range:ident, $arr:ident) => {
        impl RangeElement for $ty {
            const RANGE_TYPE: PgType = PgType::$range;
            const RANGE_ARRAY_TYPE: PgType = PgType::$arr;
        }
    };
}

range_element_impl!(i32, Int4Range, Int4RangeArray);
range_element_impl!(i64, Int8Range, Int8RangeArray);
range_element_impl!(rust_decimal::Decimal, NumRange, NumRangeArray);
range_element_impl!(chrono::NaiveDateTime, TsRange, TsRangeArray);
range_element_impl!(chrono::DateTime<chrono::Utc>, TstzRange, TstzRangeArray);
range_element_impl!(chrono::NaiveDate, DateRange, DateRangeArray);

/// A bounded interval over an ordered element type.
#[derive(Debug, Clone, PartialEq)]
pub struct PgRange<T> {
    lower: RangeBound<T>,
    upper: RangeBound<T>,
    empty: bool,
}

impl<T> PgRange<T> {
    pub fn new(lower: RangeBound<T>, upper: RangeBound<T>) -> Self {
        PgRange {
            lower,
            upper,
            empty: false,
        }
    }

    /// The empty range; carries no bounds.
    pub fn empty() -> Self {
        PgRange {
            lower: RangeBound::Infinite,
            upper: RangeBound::Infinite,
            empty: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn lower(&self) -> &RangeBound<T> {
        &self.lower
    }

    pub fn upper(&self) -> &RangeBound<T> {
        &self.upper
    }

    fn flags(&self) -> RangeFlags {
        if self.empty {
            return RangeFlags::EMPTY;
        }
        let mut flags = RangeFlags::empty();
        match self.lower {
            RangeBound::Inclusive(_) => flags |= RangeFlags::LB_INC,
            RangeBound::Exclusive(_) => {}
            RangeBound::Infinite => flags |= RangeFlags::LB_INF,
        }
        match self.upper {
            RangeBound::Inclusive(_) => flags |= RangeFlags::UB_INC,
            RangeBound::Exclusive(_) => {}
            RangeBound::Infinite => flags |= RangeFlags::UB_INF,
        }
        flags
    }
}

impl<T: RangeElement> PgWireType for PgRange<T> {
    const PG_TYPE: PgType = T::RANGE_TYPE;
    const ARRAY_TYPE: PgType = T::RANGE_ARRAY_TYPE;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.flags().bits());
        for bound in [&self.lower, &self.upper] {
            if let Some(value) = bound.value() {
                let mut elem = BytesMut::new();
                value.encode(&mut elem);
                buf.put_i32(elem.len() as i32);
                buf.put_slice(&elem);
            }
        }
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        const TYPE: &str = "range";
        if format == Format::Text {
            return Err(MarshalError::UnsupportedConversion { type_name: TYPE });
        }
        let mut cur = WireCursor::new(raw);
        let flags = RangeFlags::from_bits(cur.read_u8()?)
            .ok_or_else(|| MarshalError::invalid(TYPE, "unknown flag bits"))?;

        if flags.contains(RangeFlags::EMPTY) {
            if flags != RangeFlags::EMPTY {
                return Err(MarshalError::invalid(
                    TYPE,
                    "empty flag combined with bound flags",
                ));
            }
            cur.expect_end(TYPE)?;
            return Ok(PgRange::empty());
        }

        let lower = if flags.contains(RangeFlags::LB_INF) {
            RangeBound::Infinite
        } else {
            let bytes = cur.read_len_prefixed(TYPE)?;
            let value = T::decode(bytes, Format::Binary)?;
            if flags.contains(RangeFlags::LB_INC) {
                RangeBound::Inclusive(value)
            } else {
                RangeBound::Exclusive(value)
            }
        };
        let upper = if flags.contains(RangeFlags::UB_INF) {
            RangeBound::Infinite
        } else {
            let bytes = cur.read_len_prefixed(TYPE)?;
            let value = T::decode(bytes, Format::Binary)?;
            if flags.contains(RangeFlags::UB_INC) {
                RangeBound::Inclusive(value)
            } else {
                RangeBound::Exclusive(value)
            }
        };
        cur.expect_end(TYPE)?;
        Ok(PgRange::new(lower, upper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn round_trip<T: RangeElement + PartialEq + std::fmt::Debug>(r: PgRange<T>) {
        let mut buf = BytesMut::new();
        r.encode(&mut buf);
        assert_eq!(PgRange::<T>::decode(&buf, Format::Binary).unwrap(), r);
    }

    #[test]
    fn finite_range_round_trip() {
        round_trip(PgRange::new(
            RangeBound::Inclusive(1i32),
            RangeBound::Exclusive(10i32),
        ));
        round_trip(PgRange::new(
            RangeBound::Exclusive(-5i64),
            RangeBound::Inclusive(5i64),
        ));
        round_trip(PgRange::new(
            RangeBound::Inclusive(Decimal::from_str("1.5").unwrap()),
            RangeBound::Exclusive(Decimal::from_str("10.5").unwrap()),
        ));
    }

    #[test]
    fn half_infinite_round_trip() {
        round_trip(PgRange::new(
            RangeBound::Infinite,
            RangeBound::Exclusive(100i32),
        ));
        round_trip(PgRange::new(RangeBound::Inclusive(0i32), RangeBound::Infinite));
    }

    #[test]
    fn fully_infinite_round_trip() {
        round_trip(PgRange::<i64>::new(RangeBound::Infinite, RangeBound::Infinite));
    }

    #[test]
    fn empty_range_round_trip() {
        round_trip(PgRange::<i32>::empty());
        let mut buf = BytesMut::new();
        PgRange::<i32>::empty().encode(&mut buf);
        assert_eq!(&buf[..], &[0x01]);
    }

    #[test]
    fn wire_flags_for_bounded_range() {
        let r = PgRange::new(RangeBound::Inclusive(1i32), RangeBound::Exclusive(10i32));
        let mut buf = BytesMut::new();
        r.encode(&mut buf);
        // [lb_inc][len=4][1][len=4][10]
        assert_eq!(buf[0], 0x02);
        assert_eq!(buf.len(), 1 + 4 + 4 + 4 + 4);
    }

    #[test]
    fn empty_flag_is_exclusive() {
        // EMPTY together with LB_INC must be rejected.
        assert!(PgRange::<i32>::decode(&[0x03], Format::Binary).is_err());
    }

    #[test]
    fn date_range_round_trip() {
        let from = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let to = chrono::NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        round_trip(PgRange::new(
            RangeBound::Inclusive(from),
            RangeBound::Exclusive(to),
        ));
    }

    #[test]
    fn truncated_bound_is_an_error() {
        // Claims a 4-byte lower bound but carries only 2 bytes.
        let raw = [0x02, 0, 0, 0, 4, 0, 1];
        assert!(matches!(
            PgRange::<i32>::decode(&raw, Format::Binary),
            Err(MarshalError::UnexpectedEof { .. })
        ));
    }
}
