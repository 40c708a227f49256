//! Binary codec for geometric types.
//!
//! Every shape is a sequence of big-endian doubles. Fixed-arity shapes
//! check the exact byte count up front; counted shapes (path, polygon) read
//! a 32-bit point count and fail if it would run past the buffer.

use bytes::{BufMut, BytesMut};

use crate::error::MarshalError;
use crate::protocol::binary::PgWireType;
use crate::protocol::cursor::{WireCursor, check_len};
use crate::types::{Format, PgType};
use crate::types::geometric::{Circle, Line, Lseg, PgBox, PgPath, Point, Polygon};

fn put_point(buf: &mut BytesMut, p: &Point) {
    buf.put_f64(p.x);
    buf.put_f64(p.y);
}

fn read_point(cur: &mut WireCursor<'_>) -> Result<Point, MarshalError> {
    Ok(Point {
        x: cur.read_f64()?,
        y: cur.read_f64()?,
    })
}

fn read_points(
    type_name: &'static str,
    cur: &mut WireCursor<'_>,
) -> Result<Vec<Point>, MarshalError> {
    let count = cur.read_i32()?;
    if count < 0 {
        return Err(MarshalError::invalid(
            type_name,
            format!("negative point count {count}"),
        ));
    }
    // Each point is 16 bytes, so cap the up-front allocation by what the
    // buffer could actually hold.
    let mut points = Vec::with_capacity((count as usize).min(cur.remaining() / 16 + 1));
    for _ in 0..count {
        points.push(read_point(cur)?);
    }
    Ok(points)
}

fn unsupported_text<T>(type_name: &'static str) -> Result<T, MarshalError> {
    Err(MarshalError::UnsupportedConversion { type_name })
}

impl PgWireType for Point {
    const PG_TYPE: PgType = PgType::Point;
    const ARRAY_TYPE: PgType = PgType::PointArray;

    fn encode(&self, buf: &mut BytesMut) {
        put_point(buf, self);
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => {
                check_len("point", raw, 16)?;
                read_point(&mut WireCursor::new(raw))
            }
            Format::Text => unsupported_text("point"),
        }
    }
}

impl PgWireType for Line {
    const PG_TYPE: PgType = PgType::Line;
    const ARRAY_TYPE: PgType = PgType::LineArray;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_f64(self.a);
        buf.put_f64(self.b);
        buf.put_f64(self.c);
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => {
                check_len("line", raw, 24)?;
                let mut cur = WireCursor::new(raw);
                Ok(Line {
                    a: cur.read_f64()?,
                    b: cur.read_f64()?,
                    c: cur.read_f64()?,
                })
            }
            Format::Text => unsupported_text("line"),
        }
    }
}

impl PgWireType for Lseg {
    const PG_TYPE: PgType = PgType::Lseg;
    const ARRAY_TYPE: PgType = PgType::LsegArray;

    fn encode(&self, buf: &mut BytesMut) {
        put_point(buf, &self.start);
        put_point(buf, &self.end);
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => {
                check_len("lseg", raw, 32)?;
                let mut cur = WireCursor::new(raw);
                Ok(Lseg {
                    start: read_point(&mut cur)?,
                    end: read_point(&mut cur)?,
                })
            }
            Format::Text => unsupported_text("lseg"),
        }
    }
}

impl PgWireType for PgBox {
    const PG_TYPE: PgType = PgType::Box;
    const ARRAY_TYPE: PgType = PgType::BoxArray;

    fn encode(&self, buf: &mut BytesMut) {
        put_point(buf, &self.high);
        put_point(buf, &self.low);
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => {
                check_len("box", raw, 32)?;
                let mut cur = WireCursor::new(raw);
                Ok(PgBox {
                    high: read_point(&mut cur)?,
                    low: read_point(&mut cur)?,
                })
            }
            Format::Text => unsupported_text("box"),
        }
    }
}

impl PgWireType for PgPath {
    const PG_TYPE: PgType = PgType::Path;
    const ARRAY_TYPE: PgType = PgType::PathArray;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(if self.closed { 1 } else { 0 });
        buf.put_i32(self.points.len() as i32);
        for p in &self.points {
            put_point(buf, p);
        }
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => {
                let mut cur = WireCursor::new(raw);
                let closed = cur.read_u8()? != 0;
                let points = read_points("path", &mut cur)?;
                cur.expect_end("path")?;
                Ok(PgPath { closed, points })
            }
            Format::Text => unsupported_text("path"),
        }
    }
}

impl PgWireType for Polygon {
    const PG_TYPE: PgType = PgType::Polygon;
    const ARRAY_TYPE: PgType = PgType::PolygonArray;

    fn encode(&self, buf: &mut BytesMut) {
        buf.put_i32(self.points.len() as i32);
        for p in &self.points {
            put_point(buf, p);
        }
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => {
                let mut cur = WireCursor::new(raw);
                let points = read_points("polygon", &mut cur)?;
                cur.expect_end("polygon")?;
                Ok(Polygon { points })
            }
            Format::Text => unsupported_text("polygon"),
        }
    }
}

impl PgWireType for Circle {
    const PG_TYPE: PgType = PgType::Circle;
    const ARRAY_TYPE: PgType = PgType::CircleArray;

    fn encode(&self, buf: &mut BytesMut) {
        put_point(buf, &self.center);
        buf.put_f64(self.radius);
    }

    fn decode(raw: &[u8], format: Format) -> Result<Self, MarshalError> {
        match format {
            Format::Binary => {
                check_len("circle", raw, 24)?;
                let mut cur = WireCursor::new(raw);
                Ok(Circle {
                    center: read_point(&mut cur)?,
                    radius: cur.read_f64()?,
                })
            }
            Format::Text => unsupported_text("circle"),
        }
    }
}
