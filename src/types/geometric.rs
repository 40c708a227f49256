//! Geometric primitives: coordinate pairs and counted coordinate lists, all
//! carried as IEEE-754 doubles on the wire.

/// A point on a plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// An infinite line `Ax + By + C = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Line {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Line { a, b, c }
    }
}

/// A finite line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lseg {
    pub start: Point,
    pub end: Point,
}

impl Lseg {
    pub fn new(start: Point, end: Point) -> Self {
        Lseg { start, end }
    }
}

/// A rectangular box given by two opposite corners. Named `PgBox` to stay
/// clear of `std::boxed::Box`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PgBox {
    pub high: Point,
    pub low: Point,
}

impl PgBox {
    pub fn new(high: Point, low: Point) -> Self {
        PgBox { high, low }
    }
}

/// An open or closed path through a list of points.
#[derive(Debug, Clone, PartialEq)]
pub struct PgPath {
    pub closed: bool,
    pub points: Vec<Point>,
}

impl PgPath {
    pub fn open(points: Vec<Point>) -> Self {
        PgPath {
            closed: false,
            points,
        }
    }

    pub fn closed(points: Vec<Point>) -> Self {
        PgPath {
            closed: true,
            points,
        }
    }
}

/// A polygon; always implicitly closed.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Polygon { points }
    }
}

/// A circle given by center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point, radius: f64) -> Self {
        Circle { center, radius }
    }
}
