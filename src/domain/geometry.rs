//! Well-Known-Binary decoding for `geo_val` scalars.
//!
//! Accepts both byte orders, ISO (1000/2000/3000) and EWKB (flag bits)
//! dimension markers, and an optional EWKB SRID. Z and M ordinates are kept
//! when the layout carries them.

use std::fmt;

use crate::domain::DomainError;

const EWKB_Z: u32 = 0x8000_0000;
const EWKB_M: u32 = 0x4000_0000;
const EWKB_SRID: u32 = 0x2000_0000;

/// Nesting limit for collections.
const MAX_DEPTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub m: Option<f64>,
}

impl Coord {
    pub fn xy(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: None,
        }
    }

    /// WKT dimension tag: "", "Z ", "M " or "ZM ".
    fn layout(&self) -> &'static str {
        match (self.z, self.m) {
            (None, None) => "",
            (Some(_), None) => "Z ",
            (None, Some(_)) => "M ",
            (Some(_), Some(_)) => "ZM ",
        }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)?;
        for ordinate in [self.z, self.m].into_iter().flatten() {
            write!(f, " {ordinate}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Coord),
    LineString(Vec<Coord>),
    /// Exterior ring first, then holes
    Polygon(Vec<Vec<Coord>>),
    MultiPoint(Vec<Coord>),
    MultiLineString(Vec<Vec<Coord>>),
    MultiPolygon(Vec<Vec<Vec<Coord>>>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::GeometryCollection(_) => "GeometryCollection",
        }
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Geometry::Point(c) => write!(f, "POINT {}({c})", c.layout()),
            Geometry::LineString(cs) | Geometry::MultiPoint(cs) => {
                write!(f, "{} ({} coords)", self.kind(), cs.len())
            }
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
                write!(f, "{} ({} rings)", self.kind(), rings.len())
            }
            Geometry::MultiPolygon(polys) => write!(f, "MultiPolygon ({} polygons)", polys.len()),
            Geometry::GeometryCollection(gs) => {
                write!(f, "GeometryCollection ({} members)", gs.len())
            }
        }
    }
}

pub fn decode(buf: &[u8]) -> Result<Geometry, DomainError> {
    let mut reader = Reader { buf, pos: 0 };
    let geometry = reader.geometry(0)?;
    if reader.pos != buf.len() {
        return Err(DomainError::Geometry(format!(
            "{} trailing bytes",
            buf.len() - reader.pos
        )));
    }
    Ok(geometry)
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

/// Per-geometry header state.
struct Header {
    little_endian: bool,
    base_type: u32,
    has_z: bool,
    has_m: bool,
}

impl<'a> Reader<'a> {
    fn bytes<const N: usize>(&mut self) -> Result<[u8; N], DomainError> {
        let end = self.pos + N;
        let slice = self.buf.get(self.pos..end).ok_or_else(|| {
            DomainError::Geometry(format!("unexpected end of input at byte {}", self.pos))
        })?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        self.pos = end;
        Ok(out)
    }

    fn u32(&mut self, little_endian: bool) -> Result<u32, DomainError> {
        let raw = self.bytes::<4>()?;
        Ok(if little_endian {
            u32::from_le_bytes(raw)
        } else {
            u32::from_be_bytes(raw)
        })
    }

    fn f64(&mut self, little_endian: bool) -> Result<f64, DomainError> {
        let raw = self.bytes::<8>()?;
        Ok(if little_endian {
            f64::from_le_bytes(raw)
        } else {
            f64::from_be_bytes(raw)
        })
    }

    fn header(&mut self) -> Result<Header, DomainError> {
        let [order] = self.bytes::<1>()?;
        let little_endian = match order {
            0 => false,
            1 => true,
            other => {
                return Err(DomainError::Geometry(format!("invalid byte order {other}")))
            }
        };
        let raw = self.u32(little_endian)?;

        if raw & EWKB_SRID != 0 {
            self.u32(little_endian)?;
        }
        let code = raw & !(EWKB_Z | EWKB_M | EWKB_SRID);
        let (iso_z, iso_m) = match code / 1000 {
            0 => (false, false),
            1 => (true, false),
            2 => (false, true),
            3 => (true, true),
            _ => return Err(DomainError::Geometry(format!("unknown type code {raw}"))),
        };

        Ok(Header {
            little_endian,
            base_type: code % 1000,
            has_z: iso_z || raw & EWKB_Z != 0,
            has_m: iso_m || raw & EWKB_M != 0,
        })
    }

    fn coord(&mut self, h: &Header) -> Result<Coord, DomainError> {
        let x = self.f64(h.little_endian)?;
        let y = self.f64(h.little_endian)?;
        let z = h.has_z.then(|| self.f64(h.little_endian)).transpose()?;
        let m = h.has_m.then(|| self.f64(h.little_endian)).transpose()?;
        Ok(Coord { x, y, z, m })
    }

    fn count(&mut self, h: &Header) -> Result<usize, DomainError> {
        let n = self.u32(h.little_endian)? as usize;
        // every element needs at least one byte; reject counts the input cannot hold
        if n > self.buf.len() - self.pos {
            return Err(DomainError::Geometry(format!("count {n} exceeds input")));
        }
        Ok(n)
    }

    fn coords(&mut self, h: &Header) -> Result<Vec<Coord>, DomainError> {
        let n = self.count(h)?;
        (0..n).map(|_| self.coord(h)).collect()
    }

    fn rings(&mut self, h: &Header) -> Result<Vec<Vec<Coord>>, DomainError> {
        let n = self.count(h)?;
        (0..n).map(|_| self.coords(h)).collect()
    }

    fn members(&mut self, h: &Header, depth: usize) -> Result<Vec<Geometry>, DomainError> {
        let n = self.count(h)?;
        (0..n).map(|_| self.geometry(depth + 1)).collect()
    }

    fn geometry(&mut self, depth: usize) -> Result<Geometry, DomainError> {
        if depth > MAX_DEPTH {
            return Err(DomainError::Geometry("nesting too deep".into()));
        }
        let h = self.header()?;
        match h.base_type {
            1 => Ok(Geometry::Point(self.coord(&h)?)),
            2 => Ok(Geometry::LineString(self.coords(&h)?)),
            3 => Ok(Geometry::Polygon(self.rings(&h)?)),
            4 => self
                .members(&h, depth)?
                .into_iter()
                .map(|g| match g {
                    Geometry::Point(c) => Ok(c),
                    other => Err(member_error("MultiPoint", &other)),
                })
                .collect::<Result<_, _>>()
                .map(Geometry::MultiPoint),
            5 => self
                .members(&h, depth)?
                .into_iter()
                .map(|g| match g {
                    Geometry::LineString(cs) => Ok(cs),
                    other => Err(member_error("MultiLineString", &other)),
                })
                .collect::<Result<_, _>>()
                .map(Geometry::MultiLineString),
            6 => self
                .members(&h, depth)?
                .into_iter()
                .map(|g| match g {
                    Geometry::Polygon(rings) => Ok(rings),
                    other => Err(member_error("MultiPolygon", &other)),
                })
                .collect::<Result<_, _>>()
                .map(Geometry::MultiPolygon),
            7 => Ok(Geometry::GeometryCollection(self.members(&h, depth)?)),
            other => Err(DomainError::Geometry(format!("unsupported geometry type {other}"))),
        }
    }
}

fn member_error(container: &str, member: &Geometry) -> DomainError {
    DomainError::Geometry(format!("{container} cannot contain {}", member.kind()))
}
