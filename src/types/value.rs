//! Dynamically typed decode path.
//!
//! The result-fetching collaborator hands back `(oid, raw, length, format)`
//! per column. When the caller knows the static type it uses
//! [`PgWireType::decode`] directly; when it does not, [`Value::decode`]
//! dispatches on the OID through a closed tagged variant, so there is no
//! open-ended runtime type lookup.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use tracing::trace;
use uuid::Uuid;

use crate::error::MarshalError;
use crate::protocol::binary::PgWireType;
use crate::protocol::cursor::WireCursor;
use crate::protocol::range::PgRange;
use crate::types::geometric::{Circle, Line, Lseg, PgBox, PgPath, Point, Polygon};
use crate::types::network::{Cidr, Inet, MacAddr, MacAddr8};
use crate::types::{Format, Interval, Money, PgOid, PgType, TimeTz};

/// A decoded value of any supported logical type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int2(i16),
    Int4(i32),
    Int8(i64),
    Float4(f32),
    Float8(f64),
    Numeric(Decimal),
    Money(Money),
    Text(String),
    Bytea(Vec<u8>),
    Uuid(Uuid),
    Oid(PgOid),
    Json(serde_json::Value),
    Inet(Inet),
    Cidr(Cidr),
    Macaddr(MacAddr),
    Macaddr8(MacAddr8),
    Point(Point),
    Line(Line),
    Lseg(Lseg),
    Box(PgBox),
    Path(PgPath),
    Polygon(Polygon),
    Circle(Circle),
    Date(NaiveDate),
    Time(NaiveTime),
    TimeTz(TimeTz),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    Interval(Interval),
    Int4Range(PgRange<i32>),
    Int8Range(PgRange<i64>),
    NumRange(PgRange<Decimal>),
    TsRange(PgRange<NaiveDateTime>),
    TstzRange(PgRange<DateTime<Utc>>),
    DateRange(PgRange<NaiveDate>),
    Array(ArrayValue),
}

/// A dynamically decoded array: dimensions straight off the wire, elements
/// decoded by the embedded element OID.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    pub elem_oid: u32,
    pub dims: Vec<i32>,
    pub elems: Vec<Value>,
}

impl Value {
    /// Decode a raw wire buffer dispatched by its type OID.
    pub fn decode(oid: u32, raw: &[u8], format: Format) -> Result<Value, MarshalError> {
        let pg_type = PgType::from_oid(oid).ok_or(MarshalError::UnsupportedConversion {
            type_name: "unknown oid",
        })?;
        trace!(oid, ?pg_type, ?format, "decoding value");

        Ok(match pg_type {
            PgType::Bool => Value::Bool(bool::decode(raw, format)?),
            PgType::Int2 => Value::Int2(i16::decode(raw, format)?),
            PgType::Int4 => Value::Int4(i32::decode(raw, format)?),
            PgType::Int8 => Value::Int8(i64::decode(raw, format)?),
            PgType::Float4 => Value::Float4(f32::decode(raw, format)?),
            PgType::Float8 => Value::Float8(f64::decode(raw, format)?),
            PgType::Numeric => Value::Numeric(Decimal::decode(raw, format)?),
            PgType::Money => Value::Money(Money::decode(raw, format)?),
            PgType::Text | PgType::Varchar => Value::Text(String::decode(raw, format)?),
            PgType::Bytea => Value::Bytea(Vec::<u8>::decode(raw, format)?),
            PgType::Uuid => Value::Uuid(Uuid::decode(raw, format)?),
            PgType::Oid => Value::Oid(PgOid::decode(raw, format)?),
            PgType::Json => Value::Json(serde_json::Value::decode(raw, format)?),
            PgType::Jsonb => Value::Json(decode_jsonb(raw, format)?),
            PgType::Inet => Value::Inet(Inet::decode(raw, format)?),
            PgType::Cidr => Value::Cidr(Cidr::decode(raw, format)?),
            PgType::Macaddr => Value::Macaddr(MacAddr::decode(raw, format)?),
            PgType::Macaddr8 => Value::Macaddr8(MacAddr8::decode(raw, format)?),
            PgType::Point => Value::Point(Point::decode(raw, format)?),
            PgType::Line => Value::Line(Line::decode(raw, format)?),
            PgType::Lseg => Value::Lseg(Lseg::decode(raw, format)?),
            PgType::Box => Value::Box(PgBox::decode(raw, format)?),
            PgType::Path => Value::Path(PgPath::decode(raw, format)?),
            PgType::Polygon => Value::Polygon(Polygon::decode(raw, format)?),
            PgType::Circle => Value::Circle(Circle::decode(raw, format)?),
            PgType::Date => Value::Date(NaiveDate::decode(raw, format)?),
            PgType::Time => Value::Time(NaiveTime::decode(raw, format)?),
            PgType::Timetz => Value::TimeTz(TimeTz::decode(raw, format)?),
            PgType::Timestamp => Value::Timestamp(NaiveDateTime::decode(raw, format)?),
            PgType::Timestamptz => Value::TimestampTz(DateTime::<Utc>::decode(raw, format)?),
            PgType::Interval => Value::Interval(Interval::decode(raw, format)?),
            PgType::Int4Range => Value::Int4Range(PgRange::decode(raw, format)?),
            PgType::Int8Range => Value::Int8Range(PgRange::decode(raw, format)?),
            PgType::NumRange => Value::NumRange(PgRange::decode(raw, format)?),
            PgType::TsRange => Value::TsRange(PgRange::decode(raw, format)?),
            PgType::TstzRange => Value::TstzRange(PgRange::decode(raw, format)?),
            PgType::DateRange => Value::DateRange(PgRange::decode(raw, format)?),
            array if array.is_array() => Value::Array(decode_array(raw, format)?),
            _ => {
                return Err(MarshalError::UnsupportedConversion {
                    type_name: "unsupported oid",
                });
            }
        })
    }
}

/// jsonb is json with a 1-byte version header on the binary path.
fn decode_jsonb(raw: &[u8], format: Format) -> Result<serde_json::Value, MarshalError> {
    match format {
        Format::Binary => {
            let mut cur = WireCursor::new(raw);
            let version = cur.read_u8()?;
            if version != 1 {
                return Err(MarshalError::invalid(
                    "jsonb",
                    format!("unsupported jsonb version {version}"),
                ));
            }
            serde_json::from_slice(raw.get(1..).unwrap_or_default())
                .map_err(|e| MarshalError::invalid("jsonb", e.to_string()))
        }
        Format::Text => serde_json::Value::decode(raw, format),
    }
}

/// Array decode with the dimension count taken from the wire; the static
/// path [`crate::PgArray`] enforces a compile-time dimension count instead.
fn decode_array(raw: &[u8], format: Format) -> Result<ArrayValue, MarshalError> {
    const TYPE: &str = "array";
    if format == Format::Text {
        return Err(MarshalError::BinaryFormatRequired { type_name: TYPE });
    }
    let mut cur = WireCursor::new(raw);
    let ndim = cur.read_i32()?;
    if ndim < 0 {
        return Err(MarshalError::invalid(
            TYPE,
            format!("negative dimension count {ndim}"),
        ));
    }
    let _null_flag = cur.read_i32()?;
    let elem_oid = cur.read_i32()? as u32;

    let mut dims = Vec::with_capacity(ndim as usize);
    let mut total: usize = if ndim == 0 { 0 } else { 1 };
    for _ in 0..ndim {
        let size = cur.read_i32()?;
        if size < 0 {
            return Err(MarshalError::invalid(
                TYPE,
                format!("negative dimension size {size}"),
            ));
        }
        let _lower_bound = cur.read_i32()?;
        dims.push(size);
        total = total
            .checked_mul(size as usize)
            .ok_or_else(|| MarshalError::invalid(TYPE, "dimension product overflow"))?;
    }

    let mut elems = Vec::with_capacity(total.min(raw.len() / 4 + 1));
    for _ in 0..total {
        let len = cur.read_i32()?;
        if len < 0 {
            return Err(MarshalError::invalid(
                TYPE,
                "NULL array elements are not supported",
            ));
        }
        let bytes = cur.take(len as usize)?;
        elems.push(Value::decode(elem_oid, bytes, Format::Binary)?);
    }
    cur.expect_end(TYPE)?;
    Ok(ArrayValue {
        elem_oid,
        dims,
        elems,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use pretty_assertions::assert_eq;

    #[test]
    fn dispatch_by_oid() {
        let mut buf = BytesMut::new();
        42i32.encode(&mut buf);
        assert_eq!(
            Value::decode(23, &buf, Format::Binary).unwrap(),
            Value::Int4(42)
        );

        let mut buf = BytesMut::new();
        "abc".to_string().encode(&mut buf);
        assert_eq!(
            Value::decode(1043, &buf, Format::Binary).unwrap(),
            Value::Text("abc".to_string())
        );
    }

    #[test]
    fn unknown_oid_is_unsupported() {
        assert!(matches!(
            Value::decode(424_242, &[], Format::Binary),
            Err(MarshalError::UnsupportedConversion { .. })
        ));
    }

    #[test]
    fn jsonb_version_header() {
        let mut raw = vec![1u8];
        raw.extend_from_slice(br#"{"a":1}"#);
        let decoded = Value::decode(3802, &raw, Format::Binary).unwrap();
        assert_eq!(
            decoded,
            Value::Json(serde_json::from_str(r#"{"a":1}"#).unwrap())
        );
        assert!(Value::decode(3802, &[9u8, b'1'], Format::Binary).is_err());
    }

    #[test]
    fn dynamic_array_decode() {
        let arr = crate::protocol::array::PgArray::from(vec![10i32, 20, 30]);
        let mut buf = BytesMut::new();
        arr.encode(&mut buf);
        let decoded = Value::decode(1007, &buf, Format::Binary).unwrap();
        let Value::Array(arr) = decoded else {
            panic!("expected array value");
        };
        assert_eq!(arr.elem_oid, 23);
        assert_eq!(arr.dims, vec![3]);
        assert_eq!(
            arr.elems,
            vec![Value::Int4(10), Value::Int4(20), Value::Int4(30)]
        );
    }

    #[test]
    fn dynamic_range_decode() {
        use crate::protocol::range::{PgRange, RangeBound};
        let range = PgRange::new(RangeBound::Inclusive(1i64), RangeBound::Infinite);
        let mut buf = BytesMut::new();
        range.encode(&mut buf);
        assert_eq!(
            Value::decode(3926, &buf, Format::Binary).unwrap(),
            Value::Int8Range(range)
        );
    }
}
