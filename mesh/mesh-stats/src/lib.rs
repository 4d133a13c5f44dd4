//! Z-axis statistics and the squish transform for facet meshes.
//!
//! # Features
//!
//! - **Bounds**: minimum and maximum Z over every vertex ([`scan_z`])
//! - **Histogram**: vertex counts per equal-width Z bucket
//!   ([`build_histogram`])
//! - **Squish**: compress the vertices below a threshold height into a thin
//!   band, in place ([`squish`])
//!
//! Every operation is a function of its explicit inputs; nothing is cached
//! between calls. Bounds and histograms are parallel reductions over the
//! facet list.
//!
//! # Example
//!
//! ```
//! use mesh_types::{Facet, FacetMesh};
//! use mesh_stats::{build_histogram, scan_z, squish, HistogramParams, SquishParams};
//!
//! let mut mesh = FacetMesh::from_facets(vec![
//!     Facet::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 5.0], [0.0, 1.0, 10.0]),
//! ]);
//!
//! let bounds = scan_z(&mesh).unwrap();
//! let histogram = build_histogram(&mesh, &bounds, &HistogramParams::default()).unwrap();
//! assert_eq!(histogram.total(), 3);
//!
//! squish(&mut mesh, &bounds, &SquishParams::new(4.0, 1.0)).unwrap();
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bounds;
mod error;
mod histogram;
mod squish;

pub use bounds::{ZBounds, scan_z};
pub use error::{StatsError, StatsResult};
pub use histogram::{Bucket, Histogram, HistogramParams, build_histogram};
pub use squish::{SquishParams, SquishReport, squish};
