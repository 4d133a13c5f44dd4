//! STL file I/O.
//!
//! This crate loads and saves [`FacetMesh`](mesh_types::FacetMesh) values in
//! both STL dialects:
//!
//! - **Binary** - 80-byte header, facet count, 50-byte records
//! - **ASCII** - `solid` / `facet` / `vertex` text
//!
//! The dialect of an input is detected from its bytes. Loading is
//! all-or-nothing and saving goes through a temporary file, so neither side
//! ever exposes a partial mesh.
//!
//! # Example
//!
//! ```no_run
//! use mesh_io::{load_stl, save_stl, StlEncoding};
//!
//! // Load a mesh
//! let mesh = load_stl("model.stl").unwrap();
//!
//! // Save it back as binary
//! save_stl(&mesh, "model.modified.stl", StlEncoding::Binary).unwrap();
//! ```
//!
//! # Quality Standards
//!
//! - Zero clippy/doc warnings
//! - Zero `unwrap`/`expect` in library code

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod stl;

pub use error::{IoError, IoResult};
pub use stl::{
    StlEncoding, detect_encoding, load_stl, parse_stl, read_stl, save_stl, write_stl,
};
