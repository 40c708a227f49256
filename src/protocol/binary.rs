//! Binary codec for scalar PostgreSQL types.
//!
//! Every supported native type implements [`PgWireType`]: one encoder into
//! the server's binary representation and one format-aware decoder out of
//! it. Fixed-width decoders validate the buffer length before reading;
//! variable-width decoders go through [`WireCursor`] and never read past the
//! supplied buffer.

use bytes::{BufMut, BytesMut};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::MarshalError;
use crate::protocol::cursor::{WireCursor, check_len};
use crate::types::network::{PGSQL_AF_INET, PGSQL_AF_INET6};
use crate::types::{
    Cidr, DecimalHandler, Format, Inet, Interval, MacAddr, MacAddr8, Money, PgOid, PgType, TimeTz,
};

/// Microseconds between the Unix epoch and 2000-01-01, the PostgreSQL epoch.
pub(crate) const PG_EPOCH_OFFSET_MICROS: i64 = 946_684_800 * 1_000_000;

/// A native type with a binary wire representation.
///
/// The implementing set is closed and known at compile time; anything
/// outside it has no codec and conversion requests for it are reported as
/// unsupported rather than coerced.
pub trait PgWireType: Sized {
    /// OID the server assigns to this type.
    const PG_TYPE: PgType;
    /// OID of the corresponding array type.
    const ARRAY_TYPE: PgType;
    /// When true, parameters of this type omit their OID so the server
    /// infers it (bare booleans, matching the reference client behavior).
    const INFER_OID: bool = false;

    /// Append the binary wire representation to `buf`.
    fn encode(&self, buf: &mut BytesMut);

    /// Decode a value from a wire buffer in the given format.
    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError>;
}

fn text_str<'a>(type_name: &'static str, raw: &'a [u8]) -> Result<&'a str, MarshalError> {
    std::str::from_utf8(raw)
        .map_err(|_| MarshalError::invalid(type_name, "text value is not valid utf-8"))
}

fn unsupported_text<T>(type_name: &'static str) -> Result<T, MarshalError> {
    Err(MarshalError::UnsupportedConversion { type_name })
}

impl PgWireType for bool {
    const PG_TYPE: PgType = PgType::Bool;
    const ARRAY_TYPE: PgType = PgType::BoolArray;
    const INFER_OID: bool = true;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(if *self { 1 } else { 0 });
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => {
                check_len("bool", raw, 1)?;
                Ok(raw[0] != 0)
            }
            Format::Text => match text_str("bool", raw)? {
                "t" | "true" | "1" => Ok(true),
                "f" | "false" | "0" => Ok(false),
                other => Err(MarshalError::invalid(
                    "bool",
                    format!("unrecognized literal {other:?}"),
                )),
            },
        }
    }
}

macro_rules! fixed_width_impl {
    ($ty:ty, $name:literal, $pg:ident, $arr:ident, $width:expr, $put:ident, $read:ident) => {
        impl PgWireType for $ty {
            const PG_TYPE: PgType = PgType::$pg;
            const ARRAY_TYPE: PgType = PgType::$arr;

            fn encode(&self, buf: &mut BytesMut) {
                buf.$put(*self);
            }

            fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
                match format {
                    Format::Binary => {
                        check_len($name, raw, $width)?;
                        WireCursor::new(raw).$read()
                    }
                    Format::Text => text_str($name, raw)?
                        .trim()
                        .parse::<$ty>()
                        .map_err(|e| MarshalError::invalid($name, e.to_string())),
                }
            }
        }
    };
}

fixed_width_impl!(i16, "int2", Int2, Int2Array, 2, put_i16, read_i16);
fixed_width_impl!(i32, "int4", Int4, Int4Array, 4, put_i32, read_i32);
fixed_width_impl!(i64, "int8", Int8, Int8Array, 8, put_i64, read_i64);
fixed_width_impl!(f32, "float4", Float4, Float4Array, 4, put_f32, read_f32);
fixed_width_impl!(f64, "float8", Float8, Float8Array, 8, put_f64, read_f64);

impl PgWireType for String {
    const PG_TYPE: PgType = PgType::Text;
    const ARRAY_TYPE: PgType = PgType::TextArray;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(self.as_bytes());
    }

    // Binary and text formats coincide for text.
    fn decode(raw: &[u8], _format: Format) -> Result<Self, MarshalError> {
        Ok(text_str("text", raw)?.to_string())
    }
}

impl PgWireType for Vec<u8> {
    const PG_TYPE: PgType = PgType::Bytea;
    const ARRAY_TYPE: PgType = PgType::ByteaArray;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(self);
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => Ok(raw.to_vec()),
            Format::Text => {
                let text = text_str("bytea", raw)?;
                let hex_part = text.strip_prefix("\\x").ok_or_else(|| {
                    MarshalError::invalid("bytea", "text format must start with \\x")
                })?;
                hex::decode(hex_part).map_err(|e| MarshalError::invalid("bytea", e.to_string()))
            }
        }
    }
}

impl PgWireType for Decimal {
    const PG_TYPE: PgType = PgType::Numeric;
    const ARRAY_TYPE: PgType = PgType::NumericArray;

    fn encode(&self, buf: &mut BytesMut) {
        DecimalHandler::encode_numeric_into(self, buf);
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => DecimalHandler::decode_numeric(raw),
            Format::Text => Decimal::from_str(text_str("numeric", raw)?.trim())
                .map_err(|e| MarshalError::invalid("numeric", e.to_string())),
        }
    }
}

impl PgWireType for Money {
    const PG_TYPE: PgType = PgType::Money;
    const ARRAY_TYPE: PgType = PgType::MoneyArray;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_i64(self.0);
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => {
                check_len("money", raw, 8)?;
                Ok(Money(WireCursor::new(raw).read_i64()?))
            }
            Format::Text => {
                // Accepts "$1,234.56" style literals.
                let clean: String = text_str("money", raw)?
                    .trim()
                    .chars()
                    .filter(|c| !matches!(c, '$' | ','))
                    .collect();
                let decimal = Decimal::from_str(&clean)
                    .map_err(|e| MarshalError::invalid("money", e.to_string()))?;
                decimal
                    .checked_mul(Decimal::ONE_HUNDRED)
                    .map(|cents| cents.round())
                    .and_then(|cents| cents.to_i64())
                    .map(Money)
                    .ok_or_else(|| MarshalError::invalid("money", "value out of range"))
            }
        }
    }
}

impl PgWireType for PgOid {
    const PG_TYPE: PgType = PgType::Oid;
    const ARRAY_TYPE: PgType = PgType::OidArray;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32(self.0);
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => {
                check_len("oid", raw, 4)?;
                Ok(PgOid(WireCursor::new(raw).read_u32()?))
            }
            Format::Text => text_str("oid", raw)?
                .trim()
                .parse::<u32>()
                .map(PgOid)
                .map_err(|e| MarshalError::invalid("oid", e.to_string())),
        }
    }
}

impl PgWireType for Uuid {
    const PG_TYPE: PgType = PgType::Uuid;
    const ARRAY_TYPE: PgType = PgType::UuidArray;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(self.as_bytes());
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => {
                check_len("uuid", raw, 16)?;
                Uuid::from_slice(raw).map_err(|e| MarshalError::invalid("uuid", e.to_string()))
            }
            Format::Text => Uuid::parse_str(text_str("uuid", raw)?.trim())
                .map_err(|e| MarshalError::invalid("uuid", e.to_string())),
        }
    }
}

impl PgWireType for serde_json::Value {
    const PG_TYPE: PgType = PgType::Json;
    const ARRAY_TYPE: PgType = PgType::JsonArray;

    // json carries its text representation on the wire in both formats.
    fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(self.to_string().as_bytes());
    }

    fn decode(raw: &[u8], _format: Format) -> Result<Self, MarshalError> {
        serde_json::from_str(text_str("json", raw)?)
            .map_err(|e| MarshalError::invalid("json", e.to_string()))
    }
}

fn encode_ip(addr: IpAddr, prefix: u8, is_cidr: bool, buf: &mut BytesMut) {
    match addr {
        IpAddr::V4(v4) => {
            buf.put_u8(PGSQL_AF_INET);
            buf.put_u8(prefix);
            buf.put_u8(is_cidr as u8);
            buf.put_u8(4);
            buf.put_slice(&v4.octets());
        }
        IpAddr::V6(v6) => {
            buf.put_u8(PGSQL_AF_INET6);
            buf.put_u8(prefix);
            buf.put_u8(is_cidr as u8);
            buf.put_u8(16);
            buf.put_slice(&v6.octets());
        }
    }
}

fn decode_ip(type_name: &'static str, raw: &[u8]) -> Result<(IpAddr, u8), MarshalError> {
    let mut cur = WireCursor::new(raw);
    let family = cur.read_u8()?;
    let prefix = cur.read_u8()?;
    let _is_cidr = cur.read_u8()?;
    let nbytes = cur.read_u8()?;
    let addr = match (family, nbytes) {
        (PGSQL_AF_INET, 4) => {
            let octets: [u8; 4] = cur.take(4)?.try_into().unwrap();
            IpAddr::V4(Ipv4Addr::from(octets))
        }
        (PGSQL_AF_INET6, 16) => {
            let octets: [u8; 16] = cur.take(16)?.try_into().unwrap();
            IpAddr::V6(Ipv6Addr::from(octets))
        }
        (family, nbytes) => {
            return Err(MarshalError::invalid(
                type_name,
                format!("bad family {family} / address length {nbytes}"),
            ));
        }
    };
    cur.expect_end(type_name)?;
    Ok((addr, prefix))
}

impl PgWireType for Inet {
    const PG_TYPE: PgType = PgType::Inet;
    const ARRAY_TYPE: PgType = PgType::InetArray;

    fn encode(&self, buf: &mut BytesMut) {
        encode_ip(self.addr, self.prefix, false, buf);
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => {
                let (addr, prefix) = decode_ip("inet", raw)?;
                Ok(Inet { addr, prefix })
            }
            Format::Text => unsupported_text("inet"),
        }
    }
}

impl PgWireType for Cidr {
    const PG_TYPE: PgType = PgType::Cidr;
    const ARRAY_TYPE: PgType = PgType::CidrArray;

    fn encode(&self, buf: &mut BytesMut) {
        encode_ip(self.addr, self.prefix, true, buf);
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => {
                let (addr, prefix) = decode_ip("cidr", raw)?;
                Ok(Cidr { addr, prefix })
            }
            Format::Text => unsupported_text("cidr"),
        }
    }
}

impl PgWireType for MacAddr {
    const PG_TYPE: PgType = PgType::Macaddr;
    const ARRAY_TYPE: PgType = PgType::MacaddrArray;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(&self.0);
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => {
                check_len("macaddr", raw, 6)?;
                Ok(MacAddr(raw.try_into().unwrap()))
            }
            Format::Text => unsupported_text("macaddr"),
        }
    }
}

impl PgWireType for MacAddr8 {
    const PG_TYPE: PgType = PgType::Macaddr8;
    const ARRAY_TYPE: PgType = PgType::Macaddr8Array;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(&self.0);
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => {
                check_len("macaddr8", raw, 8)?;
                Ok(MacAddr8(raw.try_into().unwrap()))
            }
            Format::Text => unsupported_text("macaddr8"),
        }
    }
}

fn pg_epoch_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
}

impl PgWireType for NaiveDate {
    const PG_TYPE: PgType = PgType::Date;
    const ARRAY_TYPE: PgType = PgType::DateArray;

    fn encode(&self, buf: &mut BytesMut) {
        let days = self.num_days_from_ce() - pg_epoch_date().num_days_from_ce();
        buf.put_i32(days);
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => {
                check_len("date", raw, 4)?;
                let days = WireCursor::new(raw).read_i32()?;
                pg_epoch_date()
                    .checked_add_signed(TimeDelta::days(days as i64))
                    .ok_or_else(|| {
                        MarshalError::invalid("date", format!("{days} days out of range"))
                    })
            }
            Format::Text => NaiveDate::parse_from_str(text_str("date", raw)?.trim(), "%Y-%m-%d")
                .map_err(|e| MarshalError::invalid("date", e.to_string())),
        }
    }
}

fn micros_since_midnight(time: &NaiveTime) -> i64 {
    time.num_seconds_from_midnight() as i64 * 1_000_000 + (time.nanosecond() / 1_000) as i64
}

fn time_from_micros(type_name: &'static str, micros: i64) -> Result<NaiveTime, MarshalError> {
    if !(0..=86_400_000_000).contains(&micros) {
        return Err(MarshalError::invalid(
            type_name,
            format!("{micros} microseconds is outside a day"),
        ));
    }
    let secs = (micros / 1_000_000) as u32;
    let nanos = ((micros % 1_000_000) * 1_000) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)
        .ok_or_else(|| MarshalError::invalid(type_name, format!("bad time of day {micros}")))
}

impl PgWireType for NaiveTime {
    const PG_TYPE: PgType = PgType::Time;
    const ARRAY_TYPE: PgType = PgType::TimeArray;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_i64(micros_since_midnight(self));
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => {
                check_len("time", raw, 8)?;
                time_from_micros("time", WireCursor::new(raw).read_i64()?)
            }
            Format::Text => {
                let text = text_str("time", raw)?.trim();
                NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
                    .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
                    .map_err(|e| MarshalError::invalid("time", e.to_string()))
            }
        }
    }
}

impl PgWireType for TimeTz {
    const PG_TYPE: PgType = PgType::Timetz;
    const ARRAY_TYPE: PgType = PgType::TimetzArray;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_i64(micros_since_midnight(&self.time));
        // Wire offset is seconds west of UTC.
        buf.put_i32(-self.offset_secs);
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => {
                check_len("timetz", raw, 12)?;
                let mut cur = WireCursor::new(raw);
                let time = time_from_micros("timetz", cur.read_i64()?)?;
                let west_secs = cur.read_i32()?;
                Ok(TimeTz {
                    time,
                    offset_secs: -west_secs,
                })
            }
            Format::Text => unsupported_text("timetz"),
        }
    }
}

impl PgWireType for NaiveDateTime {
    const PG_TYPE: PgType = PgType::Timestamp;
    const ARRAY_TYPE: PgType = PgType::TimestampArray;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_i64(self.and_utc().timestamp_micros() - PG_EPOCH_OFFSET_MICROS);
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => {
                check_len("timestamp", raw, 8)?;
                let pg_micros = WireCursor::new(raw).read_i64()?;
                DateTime::from_timestamp_micros(pg_micros + PG_EPOCH_OFFSET_MICROS)
                    .map(|dt| dt.naive_utc())
                    .ok_or_else(|| {
                        MarshalError::invalid("timestamp", format!("{pg_micros} out of range"))
                    })
            }
            Format::Text => {
                let text = text_str("timestamp", raw)?.trim();
                NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
                    .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S"))
                    .map_err(|e| MarshalError::invalid("timestamp", e.to_string()))
            }
        }
    }
}

impl PgWireType for DateTime<Utc> {
    const PG_TYPE: PgType = PgType::Timestamptz;
    const ARRAY_TYPE: PgType = PgType::TimestamptzArray;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_i64(self.timestamp_micros() - PG_EPOCH_OFFSET_MICROS);
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => {
                check_len("timestamptz", raw, 8)?;
                let pg_micros = WireCursor::new(raw).read_i64()?;
                DateTime::from_timestamp_micros(pg_micros + PG_EPOCH_OFFSET_MICROS).ok_or_else(
                    || MarshalError::invalid("timestamptz", format!("{pg_micros} out of range")),
                )
            }
            Format::Text => DateTime::parse_from_rfc3339(text_str("timestamptz", raw)?.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| MarshalError::invalid("timestamptz", e.to_string())),
        }
    }
}

impl PgWireType for Interval {
    const PG_TYPE: PgType = PgType::Interval;
    const ARRAY_TYPE: PgType = PgType::IntervalArray;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_i64(self.micros);
        buf.put_i32(self.days);
        buf.put_i32(self.months);
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => {
                check_len("interval", raw, 16)?;
                let mut cur = WireCursor::new(raw);
                Ok(Interval {
                    micros: cur.read_i64()?,
                    days: cur.read_i32()?,
                    months: cur.read_i32()?,
                })
            }
            Format::Text => unsupported_text("interval"),
        }
    }
}
