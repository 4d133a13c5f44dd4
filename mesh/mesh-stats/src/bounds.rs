//! Z-axis bounds scanning.

use mesh_types::{FacetMesh, MeshTopology};
use rayon::prelude::*;
use tracing::debug;

use crate::error::{StatsError, StatsResult};

/// Minimum and maximum Z over every vertex of a mesh.
///
/// A value of this type always satisfies `min <= max`.
///
/// # Example
///
/// ```
/// use mesh_stats::ZBounds;
///
/// let bounds = ZBounds::new(-2.0, 6.0);
/// assert_eq!(bounds.range(), 8.0);
/// assert_eq!(bounds.fraction(0.0), 0.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZBounds {
    /// Lowest Z.
    pub min: f64,
    /// Highest Z.
    pub max: f64,
}

impl ZBounds {
    /// Create bounds from two values, in either order.
    #[must_use]
    pub const fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Bounds of a single value.
    #[must_use]
    pub const fn point(z: f64) -> Self {
        Self { min: z, max: z }
    }

    /// Smallest bounds containing both `self` and `other`.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// `max - min`.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Whether every vertex shares one height.
    #[must_use]
    #[allow(clippy::float_cmp)] // exact equality is the degenerate case
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }

    /// Fail with [`StatsError::DegenerateRange`] when `min == max`.
    ///
    /// # Errors
    ///
    /// Returns `DegenerateRange` for flat bounds.
    pub fn require_range(&self) -> StatsResult<f64> {
        if self.is_degenerate() {
            Err(StatsError::DegenerateRange { value: self.min })
        } else {
            Ok(self.range())
        }
    }

    /// Relative position of `z` within the bounds: 0 at `min`, 1 at `max`.
    ///
    /// Not finite for degenerate bounds; callers check
    /// [`require_range`](Self::require_range) first.
    #[must_use]
    pub fn fraction(&self, z: f64) -> f64 {
        (z - self.min) / self.range()
    }

    /// Whether `z` lies inside the closed interval.
    #[must_use]
    pub fn contains(&self, z: f64) -> bool {
        self.min <= z && z <= self.max
    }
}

/// Compute the Z bounds of a mesh.
///
/// The running extremes are seeded from the first vertex seen, never from a
/// fixed value, so meshes lying entirely above or below zero report their
/// true bounds. The scan is a parallel reduction over facets; min and max are
/// order-independent, so the result matches a sequential scan exactly.
///
/// # Errors
///
/// Returns [`StatsError::EmptyMesh`] if the mesh has no vertices.
///
/// # Example
///
/// ```
/// use mesh_types::{Facet, FacetMesh};
/// use mesh_stats::scan_z;
///
/// let mesh = FacetMesh::from_facets(vec![
///     Facet::from_arrays([0.0, 0.0, 3.0], [1.0, 0.0, 4.0], [0.0, 1.0, 9.0]),
/// ]);
///
/// let bounds = scan_z(&mesh).unwrap();
/// assert_eq!(bounds.min, 3.0);
/// assert_eq!(bounds.max, 9.0);
/// ```
pub fn scan_z(mesh: &FacetMesh) -> StatsResult<ZBounds> {
    let bounds = mesh
        .facets
        .par_iter()
        .flat_map_iter(|facet| facet.iter().map(|v| ZBounds::point(v.z())))
        .reduce_with(ZBounds::union)
        .ok_or(StatsError::EmptyMesh)?;

    debug!(
        vertices = mesh.vertex_count(),
        min_z = bounds.min,
        max_z = bounds.max,
        "Scanned Z bounds"
    );
    Ok(bounds)
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::unwrap_used)]
mod tests {
    use super::*;
    use mesh_types::Facet;

    fn mesh_with_z(zs: &[f64]) -> FacetMesh {
        zs.chunks(3)
            .map(|c| Facet::from_arrays([0.0, 0.0, c[0]], [1.0, 0.0, c[1]], [0.0, 1.0, c[2]]))
            .collect()
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        assert_eq!(scan_z(&FacetMesh::new()), Err(StatsError::EmptyMesh));
    }

    #[test]
    fn mesh_entirely_above_zero() {
        let bounds = scan_z(&mesh_with_z(&[5.0, 7.5, 12.0, 6.0, 9.0, 11.0])).unwrap();
        assert_eq!(bounds, ZBounds { min: 5.0, max: 12.0 });
    }

    #[test]
    fn mesh_entirely_below_zero() {
        let bounds = scan_z(&mesh_with_z(&[-4.25, -3.0, -2.5, -1.25, -1.0, -0.5])).unwrap();
        assert_eq!(bounds, ZBounds { min: -4.25, max: -0.5 });
    }

    #[test]
    fn flat_mesh_is_degenerate() {
        let bounds = scan_z(&mesh_with_z(&[7.0; 6])).unwrap();
        assert!(bounds.is_degenerate());
        assert_eq!(
            bounds.require_range(),
            Err(StatsError::DegenerateRange { value: 7.0 })
        );
    }

    #[test]
    fn bounds_helpers() {
        let bounds = ZBounds::new(10.0, 0.0);
        assert_eq!(bounds.min, 0.0);
        assert_eq!(bounds.range(), 10.0);
        assert_eq!(bounds.require_range(), Ok(10.0));
        assert_eq!(bounds.fraction(2.5), 0.25);
        assert!(bounds.contains(0.0));
        assert!(bounds.contains(10.0));
        assert!(!bounds.contains(10.5));

        let merged = bounds.union(ZBounds::point(-3.0));
        assert_eq!(merged, ZBounds { min: -3.0, max: 10.0 });
    }

    #[test]
    fn only_z_is_scanned() {
        let mesh: FacetMesh = vec![Facet::from_arrays(
            [-100.0, 50.0, 1.0],
            [100.0, -50.0, 2.0],
            [0.0, 0.0, 3.0],
        )]
        .into();
        assert_eq!(scan_z(&mesh).unwrap(), ZBounds { min: 1.0, max: 3.0 });
    }
}
