//! Core mesh types for STL statistics.
//!
//! This crate provides the in-memory model that every other crate in the
//! workspace works on:
//!
//! - [`Vertex`] - A point in 3D space
//! - [`Facet`] - A triangle: three vertices plus the pass-through normal and
//!   attribute field from the file
//! - [`FacetMesh`] - An ordered list of facets, fully resident in memory
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`.
//!
//! # Coordinate System
//!
//! Z is height. Statistics and the squish transform only look at Z.
//!
//! # Example
//!
//! ```
//! use mesh_types::{Facet, FacetMesh, MeshTopology};
//!
//! let mesh = FacetMesh::from_facets(vec![
//!     Facet::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.5, 1.0, 2.0]),
//! ]);
//!
//! assert_eq!(mesh.facet_count(), 1);
//! assert_eq!(mesh.vertices().map(|v| v.z()).fold(f64::MIN, f64::max), 2.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod facet;
mod mesh;
mod traits;
mod vertex;

pub use facet::Facet;
pub use mesh::FacetMesh;
pub use traits::MeshTopology;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
