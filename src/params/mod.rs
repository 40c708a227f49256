//! Query parameter values and the ordered parameter list.
//!
//! A [`Parameter`] owns one encoded value buffer; a [`Parameters`] list owns
//! an ordered sequence of them plus a lazily rebuilt set of parallel arrays
//! ([`BindArrays`]) shaped the way a Bind message wants them: type OIDs,
//! value buffers, byte lengths, and format codes, index-aligned. The arrays
//! are cached and rebuilt only after a mutation, so repeated executions of
//! the same statement pay the materialization cost once.

use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::error::MarshalError;
use crate::protocol::array::PgArray;
use crate::protocol::binary::PgWireType;
use crate::protocol::range::{PgRange, RangeElement};
use crate::types::Format;

/// One bound query parameter: an optional type OID, the encoded value
/// buffer, and its wire format. Immutable after construction.
///
/// `None` for the OID asks the server to infer the type; `None` for the
/// value is SQL NULL.
#[derive(Debug, PartialEq, Eq)]
pub struct Parameter {
    oid: Option<u32>,
    value: Option<Bytes>,
    format: Format,
}

impl Parameter {
    /// A SQL NULL parameter with no buffer and no declared type.
    pub fn null() -> Parameter {
        Parameter {
            oid: None,
            value: None,
            format: Format::Binary,
        }
    }

    fn from_wire<T: PgWireType>(value: &T) -> Parameter {
        let mut buf = BytesMut::new();
        value.encode(&mut buf);
        Parameter {
            oid: (!T::INFER_OID).then(|| T::PG_TYPE.to_oid()),
            value: Some(buf.freeze()),
            format: Format::Binary,
        }
    }

    pub fn oid(&self) -> Option<u32> {
        self.oid
    }

    pub fn value(&self) -> Option<&Bytes> {
        self.value.as_ref()
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Encoded byte count; zero for NULL.
    pub fn len(&self) -> usize {
        self.value.as_ref().map_or(0, |b| b.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }
}

/// Cloning copies the underlying buffer, so the copy never aliases the
/// original's storage.
impl Clone for Parameter {
    fn clone(&self) -> Parameter {
        Parameter {
            oid: self.oid,
            value: self.value.as_ref().map(|b| Bytes::copy_from_slice(b)),
            format: self.format,
        }
    }
}

/// Conversion of a native value into an encoded [`Parameter`].
///
/// Dispatch is entirely at compile time; the implementing set mirrors
/// [`PgWireType`], plus `Option<T>` for NULLs and the borrowed string and
/// byte-slice forms.
pub trait ToParameter {
    fn to_parameter(self) -> Parameter;
}

macro_rules! to_parameter_impl {
    ($($ty:ty),+ $(,)?) => {$(
        impl ToParameter for $ty {
            fn to_parameter(self) -> Parameter {
                Parameter::from_wire(&self)
            }
        }
    )+};
}

to_parameter_impl!(
    bool,
    i16,
    i32,
    i64,
    f32,
    f64,
    String,
    Vec<u8>,
    rust_decimal::Decimal,
    crate::types::Money,
    crate::types::PgOid,
    uuid::Uuid,
    serde_json::Value,
    crate::types::Inet,
    crate::types::Cidr,
    crate::types::MacAddr,
    crate::types::MacAddr8,
    crate::types::geometric::Point,
    crate::types::geometric::Line,
    crate::types::geometric::Lseg,
    crate::types::geometric::PgBox,
    crate::types::geometric::PgPath,
    crate::types::geometric::Polygon,
    crate::types::geometric::Circle,
    chrono::NaiveDate,
    chrono::NaiveTime,
    crate::types::TimeTz,
    chrono::NaiveDateTime,
    chrono::DateTime<chrono::Utc>,
    crate::types::Interval,
);

impl ToParameter for &str {
    fn to_parameter(self) -> Parameter {
        self.to_string().to_parameter()
    }
}

impl ToParameter for &[u8] {
    fn to_parameter(self) -> Parameter {
        self.to_vec().to_parameter()
    }
}

impl<T: RangeElement> ToParameter for PgRange<T> {
    fn to_parameter(self) -> Parameter {
        Parameter::from_wire(&self)
    }
}

impl<T: PgWireType, const D: usize> ToParameter for PgArray<T, D> {
    fn to_parameter(self) -> Parameter {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        Parameter {
            oid: Some(T::ARRAY_TYPE.to_oid()),
            value: Some(buf.freeze()),
            format: Format::Binary,
        }
    }
}

impl<T: ToParameter> ToParameter for Option<T> {
    fn to_parameter(self) -> Parameter {
        match self {
            Some(value) => value.to_parameter(),
            None => Parameter::null(),
        }
    }
}

impl ToParameter for Parameter {
    fn to_parameter(self) -> Parameter {
        self
    }
}

/// The four index-aligned arrays a Bind message consumes.
///
/// Type OID 0 means "server infers"; a NULL value is `None` with length 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindArrays {
    pub types: Vec<u32>,
    pub values: Vec<Option<Bytes>>,
    pub lengths: Vec<i32>,
    pub formats: Vec<i16>,
}

/// An ordered parameter list with a cached materialized view.
///
/// The cached [`BindArrays`] share the parameters' refcounted buffers, which
/// is safe because a [`Parameter`]'s buffer is never mutated after
/// construction. Every mutating method drops the cache before touching the
/// list, so a stale view can never be observed.
#[derive(Debug, Default)]
pub struct Parameters {
    params: Vec<Parameter>,
    cache: Option<BindArrays>,
}

impl Parameters {
    pub fn new() -> Parameters {
        Parameters::default()
    }

    pub fn size(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Append a parameter at the end of the list.
    pub fn push(&mut self, value: impl ToParameter) {
        self.cache = None;
        self.params.push(value.to_parameter());
    }

    /// Replace the parameter at `index`.
    pub fn replace(&mut self, index: usize, value: impl ToParameter) -> Result<(), MarshalError> {
        self.check_index(index)?;
        self.cache = None;
        self.params[index] = value.to_parameter();
        Ok(())
    }

    /// Remove and return the parameter at `index`; later parameters shift
    /// down.
    pub fn remove(&mut self, index: usize) -> Result<Parameter, MarshalError> {
        self.check_index(index)?;
        self.cache = None;
        Ok(self.params.remove(index))
    }

    pub fn get(&self, index: usize) -> Result<&Parameter, MarshalError> {
        self.check_index(index)?;
        Ok(&self.params[index])
    }

    /// Parameter type OIDs, index-aligned; 0 where the server infers.
    pub fn types(&mut self) -> &[u32] {
        &self.materialized().types
    }

    /// Encoded value buffers, index-aligned; `None` for SQL NULL.
    pub fn values(&mut self) -> &[Option<Bytes>] {
        &self.materialized().values
    }

    /// Value byte lengths, index-aligned; 0 for SQL NULL.
    pub fn lengths(&mut self) -> &[i32] {
        &self.materialized().lengths
    }

    /// Wire format codes, index-aligned.
    pub fn formats(&mut self) -> &[i16] {
        &self.materialized().formats
    }

    fn check_index(&self, index: usize) -> Result<(), MarshalError> {
        if index >= self.params.len() {
            return Err(MarshalError::IndexOutOfBounds {
                index,
                len: self.params.len(),
            });
        }
        Ok(())
    }

    fn materialized(&mut self) -> &BindArrays {
        let params = &self.params;
        self.cache.get_or_insert_with(|| {
            debug!(count = params.len(), "materializing bind arrays");
            let mut arrays = BindArrays::default();
            arrays.types.reserve(params.len());
            arrays.values.reserve(params.len());
            arrays.lengths.reserve(params.len());
            arrays.formats.reserve(params.len());
            for p in params {
                arrays.types.push(p.oid.unwrap_or(0));
                arrays.values.push(p.value.clone());
                arrays.lengths.push(p.len() as i32);
                arrays.formats.push(p.format.to_code());
            }
            arrays
        })
    }
}

/// Copies are fully independent: fresh buffers, no cache carried over.
impl Clone for Parameters {
    fn clone(&self) -> Parameters {
        Parameters {
            params: self.params.clone(),
            cache: None,
        }
    }
}

/// Build a [`Parameters`] list from values, left to right.
///
/// ```
/// use pgmarshal::params;
///
/// let list = params![1i32, "two", Option::<i64>::None];
/// assert_eq!(list.size(), 3);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        $crate::params::Parameters::new()
    };
    ($($value:expr),+ $(,)?) => {{
        let mut list = $crate::params::Parameters::new();
        $(list.push($value);)+
        list
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn null_parameter_has_no_buffer() {
        let p = Parameter::null();
        assert!(p.is_null());
        assert_eq!(p.oid(), None);
        assert_eq!(p.len(), 0);
    }

    #[test]
    fn bool_omits_its_oid() {
        let p = true.to_parameter();
        assert_eq!(p.oid(), None);
        assert_eq!(p.value().map(|b| b.as_ref()), Some(&[1u8][..]));
    }

    #[test]
    fn typed_parameter_carries_oid_and_bytes() {
        let p = 42i32.to_parameter();
        assert_eq!(p.oid(), Some(23));
        assert_eq!(p.value().map(|b| b.as_ref()), Some(&[0, 0, 0, 42][..]));
        assert_eq!(p.format(), Format::Binary);
        assert_eq!(p.len(), 4);
    }

    #[test]
    fn option_none_is_null() {
        let p = Option::<i64>::None.to_parameter();
        assert!(p.is_null());
        let p = Some(7i64).to_parameter();
        assert_eq!(p.oid(), Some(20));
    }

    #[test]
    fn empty_list_materializes_empty_arrays() {
        let mut list = Parameters::new();
        assert_eq!(list.types(), &[] as &[u32]);
        assert_eq!(list.values(), &[] as &[Option<Bytes>]);
        assert_eq!(list.lengths(), &[] as &[i32]);
        assert_eq!(list.formats(), &[] as &[i16]);
    }

    #[test]
    fn materialized_arrays_are_index_aligned() {
        let mut list = params![1i32, "two", Option::<i64>::None, true];
        assert_eq!(list.size(), 4);
        assert_eq!(list.types(), &[23, 25, 0, 0]);
        assert_eq!(list.lengths(), &[4, 3, 0, 1]);
        assert_eq!(list.formats(), &[1, 1, 1, 1]);
        let values = list.values();
        assert_eq!(values[1].as_deref(), Some(&b"two"[..]));
        assert_eq!(values[2], None);
    }

    #[test]
    fn mutation_invalidates_the_view() {
        let mut list = params![1i32];
        assert_eq!(list.lengths(), &[4]);

        list.push("abc");
        assert_eq!(list.lengths(), &[4, 3]);

        list.replace(0, 1i64).unwrap();
        assert_eq!(list.types(), &[20, 25]);

        let removed = list.remove(0).unwrap();
        assert_eq!(removed.oid(), Some(20));
        assert_eq!(list.types(), &[25]);
    }

    #[test]
    fn out_of_bounds_access_is_rejected() {
        let mut list = Parameters::new();
        assert_eq!(
            list.get(0),
            Err(MarshalError::IndexOutOfBounds { index: 0, len: 0 })
        );
        list.push(5i32);
        assert!(list.get(0).is_ok());
        assert_eq!(
            list.replace(1, 6i32),
            Err(MarshalError::IndexOutOfBounds { index: 1, len: 1 })
        );
        assert_eq!(
            list.remove(3).unwrap_err(),
            MarshalError::IndexOutOfBounds { index: 3, len: 1 }
        );
    }

    #[test]
    fn clone_is_a_deep_copy() {
        let mut original = params!["payload"];
        let copy = original.clone();

        let original_ptr = original.values()[0].as_ref().unwrap().as_ptr();
        let copy_ptr = copy.params[0].value().unwrap().as_ptr();
        assert_ne!(original_ptr, copy_ptr);
        assert_eq!(copy.params[0].value().unwrap().as_ref(), b"payload");
    }

    #[test]
    fn move_leaves_the_source_empty() {
        let mut list = params![1i32, 2i32];
        let moved = std::mem::take(&mut list);
        assert_eq!(list.size(), 0);
        assert_eq!(moved.size(), 2);
    }

    #[test]
    fn range_and_array_parameters() {
        use crate::protocol::range::RangeBound;

        let range = PgRange::new(RangeBound::Inclusive(1i32), RangeBound::Exclusive(10));
        let p = range.to_parameter();
        assert_eq!(p.oid(), Some(3904));

        let arr = PgArray::from(vec![1i64, 2, 3]);
        let p = arr.to_parameter();
        assert_eq!(p.oid(), Some(1016));
    }
}
