//! STL (Stereolithography) file format support.
//!
//! Supports both ASCII and binary STL formats.
//!
//! # Format Detection
//!
//! The encoding is detected from the bytes, never passed in:
//! - If the 80-byte header plus facet count describes exactly the number of
//!   bytes present, the data is binary (even when the header starts with
//!   `solid`, which many exporters write)
//! - Otherwise data that starts with `solid` (after optional whitespace) is
//!   ASCII
//! - Anything else is parsed as binary and fails on the size check
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header (ignored, often contains file info)
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector (passed through, never recomputed)
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (usually 0)
//! end
//! ```
//!
//! # ASCII Format
//!
//! ```text
//! solid name
//!   facet normal ni nj nk
//!     outer loop
//!       vertex v1x v1y v1z
//!       vertex v2x v2y v2z
//!       vertex v3x v3y v3z
//!     endloop
//!   endfacet
//!   ...
//! endsolid name
//! ```
//!
//! Parsing is all-or-nothing: a truncated stream, a facet count that does not
//! match the data, or a malformed vertex block fails the whole load. An ASCII
//! file holds exactly one solid; anything after the `endsolid` line is an
//! error.

use std::fs;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use mesh_types::{Facet, FacetMesh, MeshTopology, Vector3, Vertex};
use tempfile::Builder;
use tracing::{debug, info, warn};

use crate::error::{IoError, IoResult};

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Header plus the `u32` facet count.
const PREAMBLE_SIZE: usize = HEADER_SIZE + 4;

/// Size of one facet record in binary STL (normal + 3 vertices + attribute).
const FACET_SIZE: usize = 50;

/// Text placed at the start of every binary header we write.
const HEADER_TEXT: &[u8] = b"binary STL written by mesh-io";

/// The two STL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StlEncoding {
    /// Little-endian binary records.
    #[default]
    Binary,
    /// Human-readable `solid ... endsolid` text.
    Ascii,
}

/// Decide which dialect `bytes` is written in.
///
/// # Example
///
/// ```
/// use mesh_io::{detect_encoding, StlEncoding};
///
/// assert_eq!(detect_encoding(b"solid cube\nendsolid cube\n"), StlEncoding::Ascii);
/// assert_eq!(detect_encoding(&[0u8; 84]), StlEncoding::Binary);
/// ```
#[must_use]
pub fn detect_encoding(bytes: &[u8]) -> StlEncoding {
    if binary_size_matches(bytes) {
        if starts_with_solid(bytes) {
            warn!("binary STL header starts with 'solid'; treating as binary");
        }
        return StlEncoding::Binary;
    }

    if starts_with_solid(bytes) {
        StlEncoding::Ascii
    } else {
        StlEncoding::Binary
    }
}

fn starts_with_solid(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    bytes[start..]
        .get(..5)
        .is_some_and(|word| word.eq_ignore_ascii_case(b"solid"))
}

fn declared_facet_count(bytes: &[u8]) -> Option<u32> {
    let count = bytes.get(HEADER_SIZE..PREAMBLE_SIZE)?;
    Some(u32::from_le_bytes([count[0], count[1], count[2], count[3]]))
}

fn binary_size_matches(bytes: &[u8]) -> bool {
    declared_facet_count(bytes).is_some_and(|declared| {
        binary_body_size(declared) == (bytes.len() - PREAMBLE_SIZE) as u64
    })
}

fn binary_body_size(declared: u32) -> u64 {
    u64::from(declared) * FACET_SIZE as u64
}

/// Parse an in-memory STL stream of either dialect.
///
/// # Errors
///
/// Returns a parse error (see [`IoError::is_parse_error`]) if the data is
/// truncated, the binary facet count does not match the data, a facet block
/// is malformed, or a vertex coordinate is not finite. No partial mesh is
/// ever returned.
///
/// # Example
///
/// ```
/// use mesh_io::parse_stl;
/// use mesh_types::MeshTopology;
///
/// let text = b"solid t
///   facet normal 0 0 1
///     outer loop
///       vertex 0 0 0
///       vertex 1 0 0
///       vertex 0 1 0
///     endloop
///   endfacet
/// endsolid t";
///
/// let mesh = parse_stl(text).unwrap();
/// assert_eq!(mesh.facet_count(), 1);
/// ```
pub fn parse_stl(bytes: &[u8]) -> IoResult<FacetMesh> {
    let encoding = detect_encoding(bytes);
    debug!(?encoding, bytes = bytes.len(), "Detected STL encoding");

    match encoding {
        StlEncoding::Binary => parse_binary(bytes),
        StlEncoding::Ascii => parse_ascii(std::str::from_utf8(bytes)?),
    }
}

/// Read a whole STL stream from `reader` and parse it.
///
/// # Errors
///
/// Returns [`IoError::Io`] if reading fails, otherwise the errors of
/// [`parse_stl`].
pub fn read_stl<R: Read>(mut reader: R) -> IoResult<FacetMesh> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_stl(&bytes)
}

/// Load a mesh from an STL file.
///
/// Automatically detects ASCII vs binary format. The file is read fully into
/// memory and closed before parsing starts.
///
/// # Arguments
///
/// * `path` - Path to the STL file
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be read
/// - The file content is not valid STL
///
/// # Example
///
/// ```no_run
/// use mesh_io::load_stl;
/// use mesh_types::MeshTopology;
///
/// let mesh = load_stl("model.stl").unwrap();
/// println!("Loaded {} facets", mesh.facet_count());
/// ```
pub fn load_stl<P: AsRef<Path>>(path: P) -> IoResult<FacetMesh> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
                source: e,
            }
        } else {
            IoError::Io(e)
        }
    })?;

    let mesh = parse_stl(&bytes)?;
    info!(
        path = %path.display(),
        bytes = bytes.len(),
        facets = mesh.facet_count(),
        "Loaded STL"
    );
    Ok(mesh)
}

fn parse_binary(bytes: &[u8]) -> IoResult<FacetMesh> {
    let Some(declared) = declared_facet_count(bytes) else {
        return Err(IoError::InvalidHeader {
            expected: PREAMBLE_SIZE,
            got: bytes.len(),
        });
    };

    let body = &bytes[PREAMBLE_SIZE..];
    let expected_bytes = binary_body_size(declared);
    if body.len() as u64 != expected_bytes {
        return Err(IoError::FacetCountMismatch {
            declared,
            expected_bytes,
            available_bytes: body.len() as u64,
        });
    }

    let mut mesh = FacetMesh::with_capacity(body.len() / FACET_SIZE);
    for (index, record) in body.chunks_exact(FACET_SIZE).enumerate() {
        let facet = decode_facet(record);
        check_finite(&facet, index)?;
        mesh.facets.push(facet);
    }

    Ok(mesh)
}

/// Decode one 50-byte binary record.
fn decode_facet(record: &[u8]) -> Facet {
    let [nx, ny, nz] = read_triple(&record[0..12]);
    Facet {
        normal: Some(Vector3::new(nx, ny, nz)),
        vertices: [
            Vertex::from(read_triple(&record[12..24])),
            Vertex::from(read_triple(&record[24..36])),
            Vertex::from(read_triple(&record[36..48])),
        ],
        attribute: u16::from_le_bytes([record[48], record[49]]),
    }
}

/// Read 3 little-endian f32s from 12 bytes.
fn read_triple(buf: &[u8]) -> [f64; 3] {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    [f64::from(x), f64::from(y), f64::from(z)]
}

fn check_finite(facet: &Facet, index: usize) -> IoResult<()> {
    if facet.vertices.iter().all(Vertex::is_finite) {
        Ok(())
    } else {
        Err(IoError::NonFiniteCoordinate { facet: index })
    }
}

/// Whitespace-separated tokens of an ASCII STL, tagged with 1-based lines.
struct AsciiTokens<'a> {
    tokens: Vec<(usize, &'a str)>,
    pos: usize,
}

impl<'a> AsciiTokens<'a> {
    fn new(text: &'a str) -> Self {
        let tokens = text
            .lines()
            .enumerate()
            .flat_map(|(i, line)| line.split_whitespace().map(move |tok| (i + 1, tok)))
            .collect();
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<(usize, &'a str)> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self, expecting: &str) -> IoResult<(usize, &'a str)> {
        let token = self
            .peek()
            .ok_or_else(|| IoError::unexpected_eof(format!("expected {expecting}")))?;
        self.pos += 1;
        Ok(token)
    }

    fn keyword(&mut self, keyword: &str) -> IoResult<usize> {
        let (line, tok) = self.next(&format!("'{keyword}'"))?;
        if tok.eq_ignore_ascii_case(keyword) {
            Ok(line)
        } else {
            Err(IoError::invalid_content(
                line,
                format!("expected '{keyword}', found '{tok}'"),
            ))
        }
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        self.peek()
            .is_some_and(|(_, tok)| tok.eq_ignore_ascii_case(keyword))
    }

    /// Skip whatever else sits on `line` (e.g. the solid name).
    fn skip_line(&mut self, line: usize) {
        while self.peek().is_some_and(|(l, _)| l == line) {
            self.pos += 1;
        }
    }

    fn triple(&mut self, what: &str) -> IoResult<[f64; 3]> {
        let mut out = [0.0; 3];
        for value in &mut out {
            let (line, tok) = self.next(&format!("{what} coordinate"))?;
            *value = tok.parse().map_err(|e| {
                IoError::invalid_content(line, format!("invalid {what} coordinate '{tok}': {e}"))
            })?;
        }
        Ok(out)
    }
}

/// Parse ASCII STL text.
fn parse_ascii(text: &str) -> IoResult<FacetMesh> {
    let mut tokens = AsciiTokens::new(text);
    let solid_line = tokens.keyword("solid")?;
    tokens.skip_line(solid_line);

    let mut mesh = FacetMesh::new();
    loop {
        let (line, tok) = tokens.next("'facet' or 'endsolid'")?;
        if tok.eq_ignore_ascii_case("endsolid") {
            tokens.skip_line(line);
            if let Some((line, tok)) = tokens.peek() {
                return Err(IoError::invalid_content(
                    line,
                    format!("unexpected '{tok}' after 'endsolid' (one solid per file)"),
                ));
            }
            break;
        }
        if !tok.eq_ignore_ascii_case("facet") {
            return Err(IoError::invalid_content(
                line,
                format!("expected 'facet' or 'endsolid', found '{tok}'"),
            ));
        }

        let normal = if tokens.peek_keyword("normal") {
            tokens.keyword("normal")?;
            let [x, y, z] = tokens.triple("normal")?;
            Some(Vector3::new(x, y, z))
        } else {
            None
        };

        tokens.keyword("outer")?;
        tokens.keyword("loop")?;
        let mut vertices = [Vertex::from_coords(0.0, 0.0, 0.0); 3];
        for vertex in &mut vertices {
            tokens.keyword("vertex")?;
            *vertex = Vertex::from(tokens.triple("vertex")?);
        }
        tokens.keyword("endloop")?;
        tokens.keyword("endfacet")?;

        let facet = Facet {
            normal,
            vertices,
            attribute: 0,
        };
        check_finite(&facet, mesh.facets.len())?;
        mesh.facets.push(facet);
    }

    Ok(mesh)
}

/// Serialize a mesh to `writer` in the given dialect.
///
/// Stored normals are written as-is; facets without one get a zero normal.
///
/// # Errors
///
/// Returns [`IoError::Io`] if writing fails. Binary output also fails with
/// [`IoError::TooManyFacets`] if the facet count does not fit in a `u32`, or
/// [`IoError::CoordinateOutOfRange`] if a vertex coordinate has no finite
/// `f32` value; both are checked before any byte is written.
pub fn write_stl<W: Write>(mesh: &FacetMesh, writer: W, encoding: StlEncoding) -> IoResult<()> {
    match encoding {
        StlEncoding::Binary => write_binary(mesh, writer),
        StlEncoding::Ascii => write_ascii(mesh, writer),
    }
}

/// Save a mesh to an STL file.
///
/// The data is serialized into a temporary file next to `path` and renamed
/// over `path` only once everything has been written, so a failure never
/// leaves a partial file at the destination.
///
/// # Arguments
///
/// * `mesh` - The mesh to save
/// * `path` - Output file path
/// * `encoding` - Output dialect
///
/// # Errors
///
/// Returns an error if the file cannot be written, or any error of
/// [`write_stl`].
///
/// A new file gets the permissions an ordinary file creation would give it;
/// an existing file keeps its permissions.
///
/// # Example
///
/// ```no_run
/// use mesh_io::{load_stl, save_stl, StlEncoding};
///
/// let mesh = load_stl("input.stl").unwrap();
/// save_stl(&mesh, "output.stl", StlEncoding::Binary).unwrap();
/// ```
pub fn save_stl<P: AsRef<Path>>(mesh: &FacetMesh, path: P, encoding: StlEncoding) -> IoResult<()> {
    let path = path.as_ref();
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut builder = Builder::new();
    if let Some(permissions) = new_file_permissions() {
        builder.permissions(permissions);
    }
    let mut temp = builder.tempfile_in(dir)?;
    write_stl(mesh, BufWriter::new(temp.as_file_mut()), encoding)?;
    if let Ok(existing) = fs::metadata(path) {
        temp.as_file().set_permissions(existing.permissions())?;
    }
    temp.persist(path).map_err(|e| IoError::Io(e.error))?;

    info!(
        path = %path.display(),
        ?encoding,
        facets = mesh.facet_count(),
        "Saved STL"
    );
    Ok(())
}

/// Mode for a freshly created output file; the process umask still applies.
#[cfg(unix)]
#[allow(clippy::unnecessary_wraps)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o666))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}

/// Fail if some vertex coordinate becomes infinite or NaN as an `f32`.
#[allow(clippy::cast_possible_truncation)]
fn check_f32_range(mesh: &FacetMesh) -> IoResult<()> {
    for (index, facet) in mesh.facets.iter().enumerate() {
        for v in &facet.vertices {
            if let Some(&value) = v.position.iter().find(|&&c| !(c as f32).is_finite()) {
                return Err(IoError::CoordinateOutOfRange {
                    facet: index,
                    value,
                });
            }
        }
    }
    Ok(())
}

fn write_binary<W: Write>(mesh: &FacetMesh, mut writer: W) -> IoResult<()> {
    let facet_count = u32::try_from(mesh.facets.len()).map_err(|_| IoError::TooManyFacets {
        count: mesh.facets.len(),
    })?;
    check_f32_range(mesh)?;

    let mut header = [0u8; HEADER_SIZE];
    header[..HEADER_TEXT.len()].copy_from_slice(HEADER_TEXT);
    writer.write_all(&header)?;
    writer.write_all(&facet_count.to_le_bytes())?;

    for facet in &mesh.facets {
        let normal = facet.normal.unwrap_or_else(Vector3::zeros);
        write_triple(&mut writer, normal.x, normal.y, normal.z)?;
        for v in &facet.vertices {
            write_triple(&mut writer, v.position.x, v.position.y, v.position.z)?;
        }
        writer.write_all(&facet.attribute.to_le_bytes())?;
    }

    writer.flush()?;
    Ok(())
}

/// Write 3 f32s in little-endian.
// Truncation: f64 to f32 is intentional for STL format
#[allow(clippy::cast_possible_truncation)]
fn write_triple<W: Write>(writer: &mut W, x: f64, y: f64, z: f64) -> IoResult<()> {
    writer.write_all(&(x as f32).to_le_bytes())?;
    writer.write_all(&(y as f32).to_le_bytes())?;
    writer.write_all(&(z as f32).to_le_bytes())?;
    Ok(())
}

fn write_ascii<W: Write>(mesh: &FacetMesh, mut writer: W) -> IoResult<()> {
    writeln!(writer, "solid mesh")?;

    for facet in &mesh.facets {
        let n = facet.normal.unwrap_or_else(Vector3::zeros);
        writeln!(writer, "  facet normal {:e} {:e} {:e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for v in &facet.vertices {
            let p = &v.position;
            writeln!(writer, "      vertex {:e} {:e} {:e}", p.x, p.y, p.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }

    writeln!(writer, "endsolid mesh")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::unnecessary_raw_string_hashes
)]
mod tests {
    use super::*;

    fn sample_mesh() -> FacetMesh {
        FacetMesh::from_facets(vec![
            Facet::from_arrays([0.0, 0.0, -1.5], [1.0, 0.0, 0.25], [0.0, 1.0, 10.0])
                .with_normal(Vector3::new(0.0, 0.0, 1.0))
                .with_attribute(42),
            Facet::from_arrays([2.0, 2.0, 2.0], [3.0, 2.0, 2.0], [2.0, 3.0, 4.5]),
        ])
    }

    /// Build a binary STL by hand.
    fn binary_bytes(header: &[u8], declared: u32, records: &[[f32; 12]]) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes[..header.len()].copy_from_slice(header);
        bytes.extend_from_slice(&declared.to_le_bytes());
        for record in records {
            for value in record {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
            bytes.extend_from_slice(&0u16.to_le_bytes());
        }
        bytes
    }

    const UNIT_RECORD: [f32; 12] = [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];

    #[test]
    fn ascii_stl_parsing() {
        let ascii_stl = br#"solid test
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid test"#;

        let mesh = parse_stl(ascii_stl).unwrap();
        assert_eq!(mesh.facet_count(), 1);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.facets[0].normal, Some(Vector3::z()));
        assert_eq!(mesh.facets[0].vertices[1].position.x, 1.0);
    }

    #[test]
    fn ascii_keywords_are_case_insensitive_and_normal_is_optional() {
        let ascii_stl = b"SOLID\nFACET\nOUTER LOOP\nVERTEX 0 0 1\nVERTEX 1 0 2\nVERTEX 0 1 3\nENDLOOP\nENDFACET\nENDSOLID\n";
        let mesh = parse_stl(ascii_stl).unwrap();
        assert_eq!(mesh.facet_count(), 1);
        assert!(mesh.facets[0].normal.is_none());
        assert_eq!(mesh.facets[0].vertices[2].z(), 3.0);
    }

    #[test]
    fn ascii_empty_solid() {
        let mesh = parse_stl(b"solid empty\nendsolid empty\n").unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn ascii_truncated_is_rejected() {
        let ascii_stl = b"solid t\n facet normal 0 0 1\n  outer loop\n   vertex 0 0 0\n   vertex 1 0";
        let err = parse_stl(ascii_stl).unwrap_err();
        assert!(matches!(err, IoError::UnexpectedEof { .. }), "{err}");
        assert!(err.is_parse_error());
    }

    #[test]
    fn ascii_missing_endsolid_is_rejected() {
        let ascii_stl = b"solid t\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\n";
        assert!(matches!(
            parse_stl(ascii_stl),
            Err(IoError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn ascii_two_vertex_block_is_rejected() {
        let ascii_stl = b"solid t\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nendloop\nendfacet\nendsolid t\n";
        match parse_stl(ascii_stl) {
            Err(IoError::InvalidContent { line, message }) => {
                assert_eq!(line, 6);
                assert!(message.contains("'vertex'"), "{message}");
            }
            other => panic!("expected InvalidContent, got {other:?}"),
        }
    }

    #[test]
    fn ascii_four_vertex_block_is_rejected() {
        let ascii_stl = b"solid t\nfacet\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nvertex 1 1 0\nendloop\nendfacet\nendsolid\n";
        assert!(matches!(
            parse_stl(ascii_stl),
            Err(IoError::InvalidContent { line: 7, .. })
        ));
    }

    #[test]
    fn ascii_bad_number_is_rejected() {
        let ascii_stl = b"solid t\nfacet normal 0 0 1\nouter loop\nvertex 0 zero 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\nendsolid\n";
        match parse_stl(ascii_stl) {
            Err(IoError::InvalidContent { line, message }) => {
                assert_eq!(line, 4);
                assert!(message.contains("zero"));
            }
            other => panic!("expected InvalidContent, got {other:?}"),
        }
    }

    #[test]
    fn ascii_nan_coordinate_is_rejected() {
        let ascii_stl = b"solid t\nfacet\nouter loop\nvertex 0 0 NaN\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\nendsolid\n";
        assert!(matches!(
            parse_stl(ascii_stl),
            Err(IoError::NonFiniteCoordinate { facet: 0 })
        ));
    }

    #[test]
    fn ascii_invalid_utf8_is_rejected() {
        let err = parse_stl(b"solid \xff\xfe\nendsolid\n").unwrap_err();
        assert!(matches!(err, IoError::Utf8(_)));
        assert!(err.is_parse_error());
    }

    #[test]
    fn binary_parsing_passes_normal_and_attribute_through() {
        let mut bytes = binary_bytes(b"test", 1, &[UNIT_RECORD]);
        let len = bytes.len();
        bytes[len - 2..].copy_from_slice(&7u16.to_le_bytes());

        let mesh = parse_stl(&bytes).unwrap();
        assert_eq!(mesh.facet_count(), 1);
        assert_eq!(mesh.facets[0].normal, Some(Vector3::z()));
        assert_eq!(mesh.facets[0].attribute, 7);
        assert_eq!(mesh.facets[0].vertices[2].position.y, 1.0);
    }

    #[test]
    fn binary_header_starting_with_solid_is_still_binary() {
        let bytes = binary_bytes(b"solid exported by some CAD tool", 2, &[UNIT_RECORD; 2]);
        assert_eq!(detect_encoding(&bytes), StlEncoding::Binary);
        let mesh = parse_stl(&bytes).unwrap();
        assert_eq!(mesh.facet_count(), 2);
    }

    #[test]
    fn binary_zero_facets() {
        let bytes = binary_bytes(b"", 0, &[]);
        let mesh = parse_stl(&bytes).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn binary_truncated_is_rejected() {
        let mut bytes = binary_bytes(b"", 2, &[UNIT_RECORD; 2]);
        bytes.truncate(bytes.len() - 10);
        match parse_stl(&bytes) {
            Err(IoError::FacetCountMismatch {
                declared,
                expected_bytes,
                available_bytes,
            }) => {
                assert_eq!(declared, 2);
                assert_eq!(expected_bytes, 100);
                assert_eq!(available_bytes, 90);
            }
            other => panic!("expected FacetCountMismatch, got {other:?}"),
        }
    }

    #[test]
    fn binary_count_larger_than_data_is_rejected() {
        let bytes = binary_bytes(b"", 5, &[UNIT_RECORD]);
        assert!(matches!(
            parse_stl(&bytes),
            Err(IoError::FacetCountMismatch { declared: 5, .. })
        ));
    }

    #[test]
    fn binary_trailing_bytes_are_rejected() {
        let mut bytes = binary_bytes(b"", 1, &[UNIT_RECORD]);
        bytes.extend_from_slice(&[0u8; 7]);
        assert!(matches!(
            parse_stl(&bytes),
            Err(IoError::FacetCountMismatch { .. })
        ));
    }

    #[test]
    fn short_input_is_rejected() {
        assert!(matches!(
            parse_stl(&[]),
            Err(IoError::InvalidHeader {
                expected: 84,
                got: 0
            })
        ));
        assert!(matches!(
            parse_stl(&[1u8; 30]),
            Err(IoError::InvalidHeader { got: 30, .. })
        ));
    }

    #[test]
    fn binary_infinite_vertex_is_rejected() {
        let mut record = UNIT_RECORD;
        record[11] = f32::INFINITY;
        let bytes = binary_bytes(b"", 2, &[UNIT_RECORD, record]);
        assert!(matches!(
            parse_stl(&bytes),
            Err(IoError::NonFiniteCoordinate { facet: 1 })
        ));
    }

    #[test]
    fn roundtrip_binary_in_memory() {
        let original = sample_mesh();
        let mut bytes = Vec::new();
        write_stl(&original, &mut bytes, StlEncoding::Binary).unwrap();
        assert_eq!(bytes.len(), PREAMBLE_SIZE + 2 * FACET_SIZE);

        let loaded = parse_stl(&bytes).unwrap();
        assert_eq!(loaded.facet_count(), 2);
        assert_eq!(loaded.facets[0].vertices, original.facets[0].vertices);
        assert_eq!(loaded.facets[0].attribute, 42);
        // Missing normals are written as zero vectors.
        assert_eq!(loaded.facets[1].normal, Some(Vector3::zeros()));
    }

    #[test]
    fn binary_header_does_not_look_like_ascii() {
        let mut bytes = Vec::new();
        write_stl(&FacetMesh::new(), &mut bytes, StlEncoding::Binary).unwrap();
        assert!(!starts_with_solid(&bytes));
    }

    #[test]
    fn roundtrip_ascii_in_memory() {
        let original = sample_mesh();
        let mut bytes = Vec::new();
        write_stl(&original, &mut bytes, StlEncoding::Ascii).unwrap();
        assert_eq!(detect_encoding(&bytes), StlEncoding::Ascii);

        let loaded = parse_stl(&bytes).unwrap();
        assert_eq!(loaded.facet_count(), original.facet_count());
        for (a, b) in loaded.vertices().zip(original.vertices()) {
            assert!((a.position - b.position).norm() < 1e-12);
        }
    }

    #[test]
    fn read_stl_from_reader() {
        let ascii_stl: &[u8] = b"solid r\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\nendsolid r\n";
        let mesh = read_stl(ascii_stl).unwrap();
        assert_eq!(mesh.facet_count(), 1);
    }

    #[test]
    fn roundtrip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.stl");
        let original = sample_mesh();

        save_stl(&original, &path, StlEncoding::Binary).unwrap();
        let loaded = load_stl(&path).unwrap();
        assert_eq!(loaded.facet_count(), original.facet_count());
        assert_eq!(loaded.facets[1].vertices, original.facets[1].vertices);

        // Only the destination remains; the temporary file was renamed.
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn save_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.stl");
        fs::write(&path, b"old contents").unwrap();

        save_stl(&sample_mesh(), &path, StlEncoding::Ascii).unwrap();
        assert_eq!(load_stl(&path).unwrap().facet_count(), 2);
    }

    #[test]
    fn save_into_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.stl");
        let err = save_stl(&sample_mesh(), &path, StlEncoding::Binary).unwrap_err();
        assert!(!err.is_parse_error());
        assert!(!path.exists());
    }

    #[test]
    fn load_nonexistent_file() {
        let result = load_stl("nonexistent_file_12345.stl");
        match result {
            Err(IoError::FileNotFound { path, source }) => {
                assert!(path.to_string_lossy().contains("nonexistent"));
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }
    #[test]
    fn ascii_text_after_endsolid_is_rejected() {
        let ascii_stl = b"solid a\nendsolid a\nsolid b\nendsolid b\n";
        match parse_stl(ascii_stl) {
            Err(IoError::InvalidContent { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("'solid'"), "{message}");
            }
            other => panic!("expected InvalidContent, got {other:?}"),
        }
    }

    #[test]
    fn ascii_endsolid_name_and_trailing_whitespace_are_accepted() {
        let mesh = parse_stl(b"solid a\nendsolid a b c\n\n   \n").unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn binary_write_rejects_coordinates_beyond_f32() {
        let mesh = FacetMesh::from_facets(vec![
            Facet::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            Facet::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, -1e40]),
        ]);

        let mut bytes = Vec::new();
        let err = write_stl(&mesh, &mut bytes, StlEncoding::Binary).unwrap_err();
        assert!(matches!(
            err,
            IoError::CoordinateOutOfRange { facet: 1, value } if value == -1e40
        ));
        assert!(!err.is_parse_error());
        assert!(bytes.is_empty());

        // The same mesh is fine as ASCII, which keeps f64 text.
        let mut text = Vec::new();
        write_stl(&mesh, &mut text, StlEncoding::Ascii).unwrap();
        assert_eq!(parse_stl(&text).unwrap().facets[1].vertices[2].z(), -1e40);
    }

    #[test]
    fn failed_save_leaves_destination_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.stl");
        fs::write(&path, b"old contents").unwrap();

        let mesh = FacetMesh::from_facets(vec![Facet::from_arrays(
            [0.0, 0.0, 0.0],
            [1e39, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        )]);
        assert!(save_stl(&mesh, &path, StlEncoding::Binary).is_err());
        assert_eq!(fs::read(&path).unwrap(), b"old contents");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_gets_ordinary_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().join("reference");
        fs::write(&reference, b"").unwrap();
        let path = dir.path().join("new.stl");

        save_stl(&sample_mesh(), &path, StlEncoding::Binary).unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(path.as_path()), mode(reference.as_path()));
    }

    #[cfg(unix)]
    #[test]
    fn saving_over_a_file_keeps_its_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.stl");
        fs::write(&path, b"old contents").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        save_stl(&sample_mesh(), &path, StlEncoding::Binary).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }
}
