/// PostgreSQL type OIDs for every logical type this crate can marshal.
///
/// The set is closed: [`PgType::from_oid`] returns `None` for anything the
/// codec does not understand, and callers report that as an unsupported
/// conversion instead of guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PgType {
    Bool = 16,
    Bytea = 17,
    Int8 = 20,
    Int2 = 21,
    Int4 = 23,
    Text = 25,
    Oid = 26,
    Json = 114,
    JsonArray = 199,
    Point = 600,
    Lseg = 601,
    Path = 602,
    Box = 603,
    Polygon = 604,
    Line = 628,
    LineArray = 629,
    Cidr = 650,
    CidrArray = 651,
    Float4 = 700,
    Float8 = 701,
    Circle = 718,
    CircleArray = 719,
    Macaddr8 = 774,
    Macaddr8Array = 775,
    Money = 790,
    MoneyArray = 791,
    Macaddr = 829,
    Inet = 869,
    BoolArray = 1000,
    ByteaArray = 1001,
    Int2Array = 1005,
    Int4Array = 1007,
    TextArray = 1009,
    VarcharArray = 1015,
    Int8Array = 1016,
    PointArray = 1017,
    LsegArray = 1018,
    PathArray = 1019,
    BoxArray = 1020,
    Float4Array = 1021,
    Float8Array = 1022,
    PolygonArray = 1027,
    OidArray = 1028,
    MacaddrArray = 1040,
    InetArray = 1041,
    Varchar = 1043,
    Date = 1082,
    Time = 1083,
    Timestamp = 1114,
    TimestampArray = 1115,
    DateArray = 1182,
    TimeArray = 1183,
    Timestamptz = 1184,
    TimestamptzArray = 1185,
    Interval = 1186,
    IntervalArray = 1187,
    NumericArray = 1231,
    Timetz = 1266,
    TimetzArray = 1270,
    Numeric = 1700,
    Uuid = 2950,
    UuidArray = 2951,
    Jsonb = 3802,
    JsonbArray = 3807,
    Int4Range = 3904,
    Int4RangeArray = 3905,
    NumRange = 3906,
    NumRangeArray = 3907,
    TsRange = 3908,
    TsRangeArray = 3909,
    TstzRange = 3910,
    TstzRangeArray = 3911,
    DateRange = 3912,
    DateRangeArray = 3913,
    Int8Range = 3926,
    Int8RangeArray = 3927,
}

impl PgType {
    #[inline]
    pub fn to_oid(self) -> u32 {
        self as u32
    }

    pub fn from_oid(oid: u32) -> Option<PgType> {
        use PgType::*;
        Some(match oid {
            16 => Bool,
            17 => Bytea,
            20 => Int8,
            21 => Int2,
            23 => Int4,
            25 => Text,
            26 => Oid,
            114 => Json,
            199 => JsonArray,
            600 => Point,
            601 => Lseg,
            602 => Path,
            603 => Box,
            604 => Polygon,
            628 => Line,
            629 => LineArray,
            650 => Cidr,
            651 => CidrArray,
            700 => Float4,
            701 => Float8,
            718 => Circle,
            719 => CircleArray,
            774 => Macaddr8,
            775 => Macaddr8Array,
            790 => Money,
            791 => MoneyArray,
            829 => Macaddr,
            869 => Inet,
            1000 => BoolArray,
            1001 => ByteaArray,
            1005 => Int2Array,
            1007 => Int4Array,
            1009 => TextArray,
            1015 => VarcharArray,
            1016 => Int8Array,
            1017 => PointArray,
            1018 => LsegArray,
            1019 => PathArray,
            1020 => BoxArray,
            1021 => Float4Array,
            1022 => Float8Array,
            1027 => PolygonArray,
            1028 => OidArray,
            1040 => MacaddrArray,
            1041 => InetArray,
            1043 => Varchar,
            1082 => Date,
            1083 => Time,
            1114 => Timestamp,
            1115 => TimestampArray,
            1182 => DateArray,
            1183 => TimeArray,
            1184 => Timestamptz,
            1185 => TimestamptzArray,
            1186 => Interval,
            1187 => IntervalArray,
            1231 => NumericArray,
            1266 => Timetz,
            1270 => TimetzArray,
            1700 => Numeric,
            2950 => Uuid,
            2951 => UuidArray,
            3802 => Jsonb,
            3807 => JsonbArray,
            3904 => Int4Range,
            3905 => Int4RangeArray,
            3906 => NumRange,
            3907 => NumRangeArray,
            3908 => TsRange,
            3909 => TsRangeArray,
            3910 => TstzRange,
            3911 => TstzRangeArray,
            3912 => DateRange,
            3913 => DateRangeArray,
            3926 => Int8Range,
            3927 => Int8RangeArray,
            _ => return None,
        })
    }

    /// For an array type, the OID of its element type.
    pub fn element_type(self) -> Option<PgType> {
        use PgType::*;
        Some(match self {
            JsonArray => Json,
            LineArray => Line,
            CidrArray => Cidr,
            CircleArray => Circle,
            Macaddr8Array => Macaddr8,
            MoneyArray => Money,
            BoolArray => Bool,
            ByteaArray => Bytea,
            Int2Array => Int2,
            Int4Array => Int4,
            TextArray => Text,
            VarcharArray => Varchar,
            Int8Array => Int8,
            PointArray => Point,
            LsegArray => Lseg,
            PathArray => Path,
            BoxArray => Box,
            Float4Array => Float4,
            Float8Array => Float8,
            PolygonArray => Polygon,
            OidArray => Oid,
            MacaddrArray => Macaddr,
            InetArray => Inet,
            TimestampArray => Timestamp,
            DateArray => Date,
            TimeArray => Time,
            TimestamptzArray => Timestamptz,
            IntervalArray => Interval,
            NumericArray => Numeric,
            TimetzArray => Timetz,
            UuidArray => Uuid,
            JsonbArray => Jsonb,
            Int4RangeArray => Int4Range,
            NumRangeArray => NumRange,
            TsRangeArray => TsRange,
            TstzRangeArray => TstzRange,
            DateRangeArray => DateRange,
            Int8RangeArray => Int8Range,
            _ => return None,
        })
    }

    pub fn is_array(self) -> bool {
        self.element_type().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oid_round_trip() {
        for oid in [16u32, 17, 23, 25, 701, 790, 1700, 2950, 3904, 3926, 1007] {
            let t = PgType::from_oid(oid).unwrap();
            assert_eq!(t.to_oid(), oid);
        }
    }

    #[test]
    fn unknown_oid_is_none() {
        assert_eq!(PgType::from_oid(999_999), None);
    }

    #[test]
    fn array_element_types() {
        assert_eq!(PgType::Int4Array.element_type(), Some(PgType::Int4));
        assert_eq!(PgType::NumRangeArray.element_type(), Some(PgType::NumRange));
        assert_eq!(PgType::Int4.element_type(), None);
        assert!(PgType::TextArray.is_array());
        assert!(!PgType::Text.is_array());
    }
}
