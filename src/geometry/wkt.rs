//! Well-known text (WKT) encoding and decoding for atomic geometries.
//!
//! # Number Format
//!
//! Coordinates are written with Rust's shortest round-trip `f64` formatting:
//! integral values print without a fractional part (`10`, not `10.0`), and
//! no value ever uses exponent notation. Decoding an encoded geometry
//! therefore reproduces every coordinate bit-for-bit, and with it the
//! geometry's bounding rectangle.
//!
//! ```
//! use geo::point;
//! use resplan_export::geometry::{wkt, AtomicGeometry};
//!
//! let door = AtomicGeometry::Point(point!(x: 5.0, y: 0.0));
//! assert_eq!(wkt::encode(&door), "POINT (5 0)");
//! assert_eq!(wkt::decode("POINT (5 0)").unwrap(), door);
//! ```

use std::fmt;

use geo::{Coord, LineString, Point, Polygon};
use thiserror::Error;

use super::AtomicGeometry;

/// A WKT string could not be decoded.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid WKT at byte {offset}: {message}")]
pub struct WktError {
    pub offset: usize,
    pub message: String,
}

/// Encodes an atomic geometry as WKT.
pub fn encode(geom: &AtomicGeometry) -> String {
    Wkt(geom).to_string()
}

/// Encodes an optional geometry; absence passes through.
pub fn encode_opt(geom: Option<&AtomicGeometry>) -> Option<String> {
    geom.map(encode)
}

/// Display adapter that writes a geometry as WKT.
pub struct Wkt<'a>(pub &'a AtomicGeometry);

impl fmt::Display for Wkt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            AtomicGeometry::Point(p) => {
                f.write_str("POINT (")?;
                write_coord(f, p.0)?;
                f.write_str(")")
            }
            AtomicGeometry::LineString(ls) => {
                f.write_str("LINESTRING ")?;
                write_ring(f, ls)
            }
            AtomicGeometry::Polygon(poly) => {
                f.write_str("POLYGON (")?;
                write_ring(f, poly.exterior())?;
                for hole in poly.interiors() {
                    f.write_str(", ")?;
                    write_ring(f, hole)?;
                }
                f.write_str(")")
            }
        }
    }
}

fn write_coord(f: &mut fmt::Formatter<'_>, c: Coord<f64>) -> fmt::Result {
    write!(f, "{} {}", c.x, c.y)
}

fn write_ring(f: &mut fmt::Formatter<'_>, ls: &LineString<f64>) -> fmt::Result {
    f.write_str("(")?;
    for (i, c) in ls.0.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_coord(f, *c)?;
    }
    f.write_str(")")
}

/// Decodes a `POINT`, `LINESTRING` or `POLYGON` WKT string.
///
/// Tags are case-insensitive and whitespace between tokens is free-form.
/// `EMPTY` geometries and multi-part kinds are rejected: neither is atomic.
pub fn decode(text: &str) -> Result<AtomicGeometry, WktError> {
    let mut parser = Parser { src: text, pos: 0 };
    let geom = parser.geometry()?;
    parser.skip_ws();
    if parser.pos != text.len() {
        return Err(parser.error("trailing characters after geometry"));
    }
    Ok(geom)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, message: impl Into<String>) -> WktError {
        WktError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn word(&mut self) -> &'a str {
        self.skip_ws();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn expect(&mut self, ch: char) -> Result<(), WktError> {
        self.skip_ws();
        if self.rest().starts_with(ch) {
            self.pos += ch.len_utf8();
            Ok(())
        } else {
            Err(self.error(format!("expected '{ch}'")))
        }
    }

    fn eat(&mut self, ch: char) -> bool {
        self.skip_ws();
        if self.rest().starts_with(ch) {
            self.pos += ch.len_utf8();
            true
        } else {
            false
        }
    }

    fn geometry(&mut self) -> Result<AtomicGeometry, WktError> {
        let start = self.pos;
        let tag = self.word().to_ascii_uppercase();
        if tag.is_empty() {
            return Err(self.error("expected a geometry tag"));
        }

        let save = self.pos;
        if self.word().eq_ignore_ascii_case("EMPTY") {
            return Err(WktError {
                offset: start,
                message: format!("{tag} EMPTY is not an atomic geometry"),
            });
        }
        self.pos = save;

        match tag.as_str() {
            "POINT" => {
                self.expect('(')?;
                let c = self.coord()?;
                self.expect(')')?;
                Ok(AtomicGeometry::Point(Point(c)))
            }
            "LINESTRING" => Ok(AtomicGeometry::LineString(self.ring()?)),
            "POLYGON" => {
                self.expect('(')?;
                let exterior = self.ring()?;
                let mut interiors = Vec::new();
                while self.eat(',') {
                    interiors.push(self.ring()?);
                }
                self.expect(')')?;
                Ok(AtomicGeometry::Polygon(Polygon::new(exterior, interiors)))
            }
            other => Err(WktError {
                offset: start,
                message: format!("unsupported geometry type '{other}'"),
            }),
        }
    }

    fn ring(&mut self) -> Result<LineString<f64>, WktError> {
        self.expect('(')?;
        let mut coords = vec![self.coord()?];
        while self.eat(',') {
            coords.push(self.coord()?);
        }
        self.expect(')')?;
        Ok(LineString::new(coords))
    }

    fn coord(&mut self) -> Result<Coord<f64>, WktError> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(Coord { x, y })
    }

    fn number(&mut self) -> Result<f64, WktError> {
        self.skip_ws();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected a number"));
        }
        let value = rest[..len]
            .parse::<f64>()
            .map_err(|e| self.error(format!("invalid number '{}': {e}", &rest[..len])))?;
        self.pos += len;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, point, polygon};

    #[test]
    fn test_encode_square_polygon() {
        let poly = AtomicGeometry::Polygon(polygon![
            (x: 0.0, y: 0.0),
            (x: 10.0, y: 0.0),
            (x: 10.0, y: 10.0),
            (x: 0.0, y: 10.0),
        ]);
        assert_eq!(encode(&poly), "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))");
    }

    #[test]
    fn test_encode_polygon_with_hole() {
        let poly = AtomicGeometry::Polygon(polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 4.0)],
            interiors: [[(x: 1.0, y: 1.0), (x: 2.0, y: 1.0), (x: 2.0, y: 2.0)]],
        ));
        assert_eq!(
            encode(&poly),
            "POLYGON ((0 0, 4 0, 4 4, 0 4, 0 0), (1 1, 2 1, 2 2, 1 1))"
        );
    }

    #[test]
    fn test_encode_fractional_and_negative() {
        let ls = AtomicGeometry::LineString(line_string![(x: -0.25, y: 1.5), (x: 3.125, y: 1e-7)]);
        assert_eq!(encode(&ls), "LINESTRING (-0.25 1.5, 3.125 0.0000001)");
    }

    #[test]
    fn test_encode_opt_passes_absence_through() {
        assert_eq!(encode_opt(None), None);
        let p = AtomicGeometry::Point(point!(x: 1.0, y: 2.0));
        assert_eq!(encode_opt(Some(&p)), Some("POINT (1 2)".to_string()));
    }

    #[test]
    fn test_decode_is_lenient_about_case_and_spacing() {
        let geom = decode("  linestring(0 0,1   2 , 3 4)  ").unwrap();
        assert_eq!(
            geom,
            AtomicGeometry::LineString(line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 2.0), (x: 3.0, y: 4.0)])
        );
    }

    #[test]
    fn test_decode_roundtrips_awkward_floats() {
        let p = AtomicGeometry::Point(point!(x: 0.1 + 0.2, y: -123456.789e3));
        assert_eq!(decode(&encode(&p)).unwrap(), p);
    }

    #[test]
    fn test_decode_rejects_empty_and_multi() {
        let err = decode("POINT EMPTY").unwrap_err();
        assert!(err.message.contains("EMPTY"));

        let err = decode("MULTIPOINT ((0 0))").unwrap_err();
        assert!(err.message.contains("unsupported"));
    }

    #[test]
    fn test_decode_reports_offset() {
        let err = decode("POINT (1 x)").unwrap_err();
        assert_eq!(err.offset, 9);
    }

    #[test]
    fn test_decode_rejects_trailing_garbage() {
        assert!(decode("POINT (1 2) POINT (3 4)").is_err());
    }
}
