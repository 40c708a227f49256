//! Generic N-dimensional array codec.
//!
//! Wire layout: `[ndim:4][nullflag:4][elem_oid:4]` then per dimension
//! `[size:4][lower_bound:4]`, then every element in row-major order, each
//! with a 4-byte length prefix. The dimension count is a const generic, so
//! a buffer declaring a different dimensionality is a decode error, never a
//! silent reshape. Element NULLs are not supported in either direction.

use bytes::{BufMut, BytesMut};
use tracing::warn;

use crate::error::MarshalError;
use crate::protocol::binary::PgWireType;
use crate::protocol::cursor::WireCursor;
use crate::types::Format;

/// A rectangular array of `D` dimensions holding its elements flattened in
/// row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct PgArray<T, const D: usize> {
    dims: [usize; D],
    elems: Vec<T>,
}

impl<T, const D: usize> PgArray<T, D> {
    /// Build an array from per-dimension sizes and a row-major element list.
    pub fn from_parts(dims: [usize; D], elems: Vec<T>) -> Result<Self, MarshalError> {
        let expected: usize = dims.iter().product();
        if elems.len() != expected {
            return Err(MarshalError::invalid(
                "array",
                format!(
                    "element count {} does not match shape {:?} (expected {})",
                    elems.len(),
                    dims,
                    expected
                ),
            ));
        }
        Ok(PgArray { dims, elems })
    }

    pub fn dims(&self) -> [usize; D] {
        self.dims
    }

    pub fn elements(&self) -> &[T] {
        &self.elems
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// Element at a multi-dimensional index, or `None` when out of range.
    pub fn get(&self, index: [usize; D]) -> Option<&T> {
        let mut flat = 0usize;
        for (&idx, &dim) in index.iter().zip(self.dims.iter()) {
            if idx >= dim {
                return None;
            }
            flat = flat * dim + idx;
        }
        self.elems.get(flat)
    }

    pub fn into_elements(self) -> Vec<T> {
        self.elems
    }
}

impl<T> From<Vec<T>> for PgArray<T, 1> {
    fn from(elems: Vec<T>) -> Self {
        PgArray {
            dims: [elems.len()],
            elems,
        }
    }
}

impl<T> PgArray<T, 2> {
    /// Build a 2-D array from rows, validating that they are rectangular.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, MarshalError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut elems = Vec::with_capacity(height * width);
        for row in rows {
            if row.len() != width {
                return Err(MarshalError::invalid(
                    "array",
                    "rows have unequal lengths",
                ));
            }
            elems.extend(row);
        }
        PgArray::from_parts([height, width], elems)
    }
}

impl<T: PgWireType, const D: usize> PgArray<T, D> {
    /// Encode into the array wire layout, elements in row-major order.
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_i32(D as i32);
        buf.put_i32(0); // null flag: nulls unsupported
        buf.put_i32(T::PG_TYPE.to_oid() as i32);
        for &dim in &self.dims {
            buf.put_i32(dim as i32);
            buf.put_i32(0); // lower bound
        }
        let mut elem_buf = BytesMut::new();
        for elem in &self.elems {
            elem_buf.clear();
            elem.encode(&mut elem_buf);
            buf.put_i32(elem_buf.len() as i32);
            buf.put_slice(&elem_buf);
        }
    }

    /// Decode from the array wire layout. Binary format is required.
    pub fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        const TYPE: &str = "array";
        if format == Format::Text {
            return Err(MarshalError::BinaryFormatRequired { type_name: TYPE });
        }
        let mut cur = WireCursor::new(raw);

        let ndim = cur.read_i32()?;
        if ndim as usize != D || ndim < 0 {
            return Err(MarshalError::DimensionMismatch {
                expected: D,
                actual: ndim,
            });
        }
        let _null_flag = cur.read_i32()?;
        let elem_oid = cur.read_i32()? as u32;
        if elem_oid != T::PG_TYPE.to_oid() {
            // Informational only; the static element type wins.
            warn!(
                elem_oid,
                expected = T::PG_TYPE.to_oid(),
                "array element oid differs from expected element type"
            );
        }

        let mut dims = [0usize; D];
        let mut total: usize = 1;
        for dim in dims.iter_mut() {
            let size = cur.read_i32()?;
            if size < 0 {
                return Err(MarshalError::invalid(TYPE, format!("negative dimension size {size}")));
            }
            let _lower_bound = cur.read_i32()?;
            *dim = size as usize;
            total = total
                .checked_mul(*dim)
                .ok_or_else(|| MarshalError::invalid(TYPE, "dimension product overflow"))?;
        }

        let mut elems = Vec::with_capacity(total.min(raw.len() / 4 + 1));
        for _ in 0..total {
            let len = cur.read_i32()?;
            if len < 0 {
                return Err(MarshalError::invalid(TYPE, "NULL array elements are not supported"));
            }
            let bytes = cur.take(len as usize)?;
            elems.push(T::decode(bytes, Format::Binary)?);
        }
        cur.expect_end(TYPE)?;
        PgArray::from_parts(dims, elems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn round_trip<T, const D: usize>(arr: PgArray<T, D>)
    where
        T: PgWireType + PartialEq + std::fmt::Debug,
    {
        let mut buf = BytesMut::new();
        arr.encode(&mut buf);
        assert_eq!(PgArray::<T, D>::decode(&buf, Format::Binary).unwrap(), arr);
    }

    #[test]
    fn one_dimensional_round_trip() {
        round_trip(PgArray::from(vec![1i32, 2, 3]));
        round_trip(PgArray::from(vec!["a".to_string(), "".to_string(), "c".to_string()]));
        round_trip(PgArray::from(vec![true, false]));
        round_trip(PgArray::<i64, 1>::from(Vec::new()));
    }

    #[test]
    fn two_by_three_round_trip() {
        let arr = PgArray::from_rows(vec![vec![1i32, 2, 3], vec![4, 5, 6]]).unwrap();
        let mut buf = BytesMut::new();
        arr.encode(&mut buf);
        let decoded = PgArray::<i32, 2>::decode(&buf, Format::Binary).unwrap();
        assert_eq!(decoded.dims(), [2, 3]);
        assert_eq!(decoded.elements(), &[1, 2, 3, 4, 5, 6]);
        assert_eq!(decoded.get([1, 0]), Some(&4));
        assert_eq!(decoded.get([0, 2]), Some(&3));
        assert_eq!(decoded.get([2, 0]), None);
    }

    #[test]
    fn wire_header_layout() {
        let arr = PgArray::from(vec![7i32]);
        let mut buf = BytesMut::new();
        arr.encode(&mut buf);
        assert_eq!(&buf[0..4], &1i32.to_be_bytes()); // ndim
        assert_eq!(&buf[4..8], &0i32.to_be_bytes()); // null flag
        assert_eq!(&buf[8..12], &23i32.to_be_bytes()); // int4 oid
        assert_eq!(&buf[12..16], &1i32.to_be_bytes()); // dim size
        assert_eq!(&buf[16..20], &0i32.to_be_bytes()); // lower bound
        assert_eq!(&buf[20..24], &4i32.to_be_bytes()); // element length
        assert_eq!(&buf[24..28], &7i32.to_be_bytes());
    }

    #[test]
    fn dimension_mismatch_is_an_error() {
        let arr = PgArray::from(vec![1i32, 2, 3]);
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
    fn text_format_is_rejected() {
        let err = PgArray::<i32, 1>::decode(b"{1,2,3}", Format::Text).unwrap_err();
        assert_eq!(
            err,
            MarshalError::BinaryFormatRequired { type_name: "array" }
        );
    }

    #[test]
    fn null_element_is_an_error() {
        let mut buf = BytesMut::new();
        buf.put_i32(1);
        buf.put_i32(0);
        buf.put_i32(23);
        buf.put_i32(1);
        buf.put_i32(0);
        buf.put_i32(-1); // NULL element
        assert!(PgArray::<i32, 1>::decode(&buf, Format::Binary).is_err());
    }

    #[test]
    fn failing_element_aborts_the_decode() {
        // Second element claims 3 bytes for an int4.
        let mut buf = BytesMut::new();
        buf.put_i32(1);
        buf.put_i32(0);
        buf.put_i32(23);
        buf.put_i32(2);
        buf.put_i32(0);
        buf.put_i32(4);
        buf.put_i32(1);
        buf.put_i32(3);
        buf.put_slice(&[0, 0, 2]);
        assert!(matches!(
            PgArray::<i32, 1>::decode(&buf, Format::Binary),
            Err(MarshalError::InvalidLength { .. })
        ));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(PgArray::from_rows(vec![vec![1i32, 2], vec![3]]).is_err());
    }

    #[test]
    fn nested_range_elements() {
        use crate::protocol::range::{PgRange, RangeBound};
        let ranges = vec![
            PgRange::new(RangeBound::Inclusive(1i32), RangeBound::Exclusive(5i32)),
            PgRange::<i32>::empty(),
        ];
        round_trip(PgArray::from(ranges));
    }
}
