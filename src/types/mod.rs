// PostgreSQL logical types and their native representations.
pub mod decimal_handler;
pub mod geometric;
pub mod network;
pub mod pg_type;
pub mod value;

pub use decimal_handler::DecimalHandler;
pub use network::{Cidr, Inet, MacAddr, MacAddr8};
pub use pg_type::PgType;

use chrono::NaiveTime;

/// Wire format of an encoded value, matching the protocol's format codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i16)]
pub enum Format {
    Text = 0,
    #[default]
    Binary = 1,
}

impl Format {
    #[inline]
    pub fn to_code(self) -> i16 {
        self as i16
    }

    /// Any nonzero code is treated as binary, mirroring the server's rule.
    #[inline]
    pub fn from_code(code: i16) -> Format {
        if code == 0 { Format::Text } else { Format::Binary }
    }
}

/// A server-assigned object identifier, distinct from plain `u32` so it gets
/// its own OID (26) on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PgOid(pub u32);

/// MONEY value in hundredths of the currency unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Money(pub i64);

impl Money {
    pub fn from_minor_units(units: i64) -> Self {
        Money(units)
    }

    pub fn minor_units(self) -> i64 {
        self.0
    }
}

/// INTERVAL value, stored the way the wire carries it: microseconds within a
/// day, whole days, and whole months kept separate because their lengths are
/// not fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Interval {
    pub micros: i64,
    pub days: i32,
    pub months: i32,
}

impl Interval {
    pub fn new(micros: i64, days: i32, months: i32) -> Self {
        Interval {
            micros,
            days,
            months,
        }
    }
}

/// TIME WITH TIME ZONE: a time of day plus a UTC offset in seconds, positive
/// east of Greenwich. The wire stores the offset west-positive; the codec
/// flips the sign on both paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeTz {
    pub time: NaiveTime,
    pub offset_secs: i32,
}

impl TimeTz {
    pub fn new(time: NaiveTime, offset_secs: i32) -> Self {
        TimeTz { time, offset_secs }
    }
}
