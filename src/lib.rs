//! Value marshaling for the PostgreSQL binary protocol.
//!
//! This crate converts between native Rust values and PostgreSQL's binary
//! wire representation: scalars, geometric types, ranges, and
//! multi-dimensional arrays, plus the parameter containers a client hands to
//! Bind. Statically typed conversion goes through [`PgWireType`]; results
//! whose types are only known at runtime decode through [`Value`], a closed
//! tagged variant dispatched by type OID.
//!
//! ```
//! use pgmarshal::{params, PgRange, RangeBound};
//!
//! let range = PgRange::new(RangeBound::Inclusive(1i32), RangeBound::Exclusive(10));
//! let mut list = params![42i32, "name", range];
//! assert_eq!(list.types(), &[23, 25, 3904]);
//! ```

pub mod error;
pub mod params;
pub mod protocol;
pub mod types;

pub use error::MarshalError;
pub use params::{BindArrays, Parameter, Parameters, ToParameter};
pub use protocol::{PgArray, PgRange, PgWireType, RangeBound, RangeElement, WireCursor};
pub use types::value::{ArrayValue, Value};
pub use types::{
    Cidr, Format, Inet, Interval, MacAddr, MacAddr8, Money, PgOid, PgType, TimeTz,
};
pub use types::geometric::{Circle, Line, Lseg, PgBox, PgPath, Point, Polygon};
