/// STL import: every facet becomes a triangle mesh of an object
use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::{count, many0},
    number::complete::{double, le_f32, le_u32},
    sequence::{preceded, tuple},
    IResult,
};
use std::fmt;

use crate::geometry::{Mesh, Object};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub enum StlError {
    /// Shorter than the 84-byte binary header.
    TooSmall { len: usize },
    /// The header announces more facets than the data holds.
    Truncated { facets: usize, len: usize },
    /// ASCII input did not follow the `solid ... endsolid` grammar.
    Ascii(String),
}

impl std::error::Error for StlError {}

impl fmt::Display for StlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StlError::TooSmall { len } => {
                write!(f, "{} bytes is too small to be a valid STL", len)
            }
            StlError::Truncated { facets, len } => write!(
                f,
                "header announces {} facets but the file has only {} bytes",
                facets, len
            ),
            StlError::Ascii(msg) => write!(f, "failed to parse ASCII STL: {}", msg),
        }
    }
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Object, StlError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::TooSmall { len: data.len() });
    }

    let truncated = |facets: usize| StlError::Truncated {
        facets,
        len: data.len(),
    };

    let (body, facets) = binary_header(data).map_err(|_| StlError::TooSmall { len: data.len() })?;
    let facets = facets as usize;
    if body.len() < facets.saturating_mul(FACET_LEN) {
        return Err(truncated(facets));
    }

    let (_, meshes) = count(binary_facet, facets)(body).map_err(|_| truncated(facets))?;
    Ok(Object::new(meshes))
}

fn binary_header(input: &[u8]) -> IResult<&[u8], u32> {
    preceded(take(HEADER_LEN), le_u32)(input)
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Mesh> {
    // Facet normal is recomputable from the winding and not needed here
    let (input, _normal) = take(12usize)(input)?;
    let (input, vertices) = count(binary_vertex, 3)(input)?;
    let (input, _attributes) = take(2usize)(input)?;
    Ok((input, Mesh::from_points(&vertices)))
}

fn binary_vertex(input: &[u8]) -> IResult<&[u8], [f64; 3]> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, [f64::from(x), f64::from(y), f64::from(z)]))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Object, StlError> {
    match ascii_solid(input) {
        Ok((_, object)) => Ok(object),
        Err(e) => Err(StlError::Ascii(format!("{:?}", e))),
    }
}

fn ascii_solid(input: &str) -> IResult<&str, Object> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _name) = not_line_ending(input)?;
    let (input, meshes) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _name) = not_line_ending(input)?;
    Ok((input, Object::new(meshes)))
}

fn ascii_facet(input: &str) -> IResult<&str, Mesh> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = ascii_vector(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, vertices) = count(ascii_vertex, 3)(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;
    Ok((input, Mesh::from_points(&vertices)))
}

fn ascii_vertex(input: &str) -> IResult<&str, [f64; 3]> {
    preceded(preceded(multispace0, tag("vertex")), ascii_vector)(input)
}

fn ascii_vector(input: &str) -> IResult<&str, [f64; 3]> {
    let (input, x) = preceded(multispace0, double)(input)?;
    let (input, y) = preceded(multispace1, double)(input)?;
    let (input, z) = preceded(multispace1, double)(input)?;
    Ok((input, [x, y, z]))
}

/// Detect and parse an STL file (ASCII or binary)
pub fn parse_stl(data: &[u8]) -> Result<Object, StlError> {
    // Binary headers may also start with "solid"; fall back when ASCII fails
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(object) = parse_ascii_stl(text) {
                return Ok(object);
            }
        }
    }

    parse_binary_stl(data)
}
