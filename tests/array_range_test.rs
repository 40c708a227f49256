use bytes::BytesMut;
use chrono::NaiveDate;
use pgmarshal::{Format, MarshalError, PgArray, PgRange, PgWireType, RangeBound, Value};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use std::str::FromStr;

#[test]
fn test_one_dimensional_array_roundtrip() {
    let arr = PgArray::from(vec![1i32, -2, 3]);
    let mut buf = BytesMut::new();
    arr.encode(&mut buf);

    let decoded: PgArray<i32, 1> = PgArray::decode(&buf, Format::Binary).unwrap();
    assert_eq!(decoded.dims(), [3]);
    assert_eq!(decoded.elements(), &[1, -2, 3]);
}

#[test]
fn test_two_dimensional_array_roundtrip() {
    let arr = PgArray::from_rows(vec![
        vec!["a".to_string(), "bb".to_string()],
        vec!["ccc".to_string(), "".to_string()],
    ])
    .unwrap();
    let mut buf = BytesMut::new();
    arr.encode(&mut buf);

    let decoded: PgArray<String, 2> = PgArray::decode(&buf, Format::Binary).unwrap();
    assert_eq!(decoded.dims(), [2, 2]);
    assert_eq!(decoded.get([1, 0]).unwrap(), "ccc");
}

#[test]
fn test_array_dimension_count_is_enforced() {
    let arr = PgArray::from(vec![1i32, 2]);
    let mut buf = BytesMut::new();
    arr.encode(&mut buf);

    let err = PgArray::<i32, 2>::decode(&buf, Format::Binary).unwrap_err();
    assert_eq!(
        err,
        MarshalError::DimensionMismatch {
            expected: 2,
            actual: 1
        }
    );
}

#[test]
fn test_array_text_format_is_rejected() {
    let err = PgArray::<i32, 1>::decode(b"{1,2,3}", Format::Text).unwrap_err();
    assert!(matches!(err, MarshalError::BinaryFormatRequired { .. }));
}

#[test]
fn test_range_roundtrips() {
    let finite = PgRange::new(RangeBound::Inclusive(5i32), RangeBound::Exclusive(10));
    let open_above = PgRange::new(
        RangeBound::Inclusive(Decimal::from_str("1.5").unwrap()),
        RangeBound::Infinite,
    );
    let everything: PgRange<i64> = PgRange::new(RangeBound::Infinite, RangeBound::Infinite);
    let empty: PgRange<i64> = PgRange::empty();

    let mut buf = BytesMut::new();
    finite.encode(&mut buf);
    assert_eq!(PgRange::<i32>::decode(&buf, Format::Binary).unwrap(), finite);

    let mut buf = BytesMut::new();
    open_above.encode(&mut buf);
    assert_eq!(
        PgRange::<Decimal>::decode(&buf, Format::Binary).unwrap(),
        open_above
    );

    let mut buf = BytesMut::new();
    everything.encode(&mut buf);
    assert_eq!(
        PgRange::<i64>::decode(&buf, Format::Binary).unwrap(),
        everything
    );

    let mut buf = BytesMut::new();
    empty.encode(&mut buf);
    let decoded = PgRange::<i64>::decode(&buf, Format::Binary).unwrap();
    assert!(decoded.is_empty());
}

#[test]
fn test_date_range_roundtrip() {
    let range = PgRange::new(
        RangeBound::Inclusive(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
        RangeBound::Exclusive(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()),
    );
    let mut buf = BytesMut::new();
    range.encode(&mut buf);
    assert_eq!(
        PgRange::<NaiveDate>::decode(&buf, Format::Binary).unwrap(),
        range
    );
}

#[test]
fn test_array_of_ranges_roundtrip() {
    let ranges = vec![
        PgRange::new(RangeBound::Inclusive(1i32), RangeBound::Exclusive(5)),
        PgRange::empty(),
    ];
    let arr = PgArray::from(ranges.clone());
    let mut buf = BytesMut::new();
    arr.encode(&mut buf);

    let decoded: PgArray<PgRange<i32>, 1> = PgArray::decode(&buf, Format::Binary).unwrap();
    assert_eq!(decoded.elements(), &ranges[..]);
}

#[test]
fn test_dynamic_decode_matches_static() {
    let arr = PgArray::from(vec![7i64, 8]);
    let mut buf = BytesMut::new();
    arr.encode(&mut buf);

    let value = Value::decode(1016, &buf, Format::Binary).unwrap();
    let Value::Array(arr) = value else {
        panic!("expected array value");
    };
    assert_eq!(arr.elem_oid, 20);
    assert_eq!(arr.dims, vec![2]);
    assert_eq!(arr.elems, vec![Value::Int8(7), Value::Int8(8)]);
}
