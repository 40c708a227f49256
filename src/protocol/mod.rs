// PostgreSQL binary wire format: per-type codecs plus the composite
// range and array layouts built on top of them.
pub mod array;
pub mod binary;
pub mod cursor;
pub mod geometry;
pub mod range;

pub use array::PgArray;
pub use binary::PgWireType;
pub use cursor::WireCursor;
pub use range::{PgRange, RangeBound, RangeElement};
