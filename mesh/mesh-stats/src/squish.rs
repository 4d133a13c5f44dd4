//! Height squish: compress everything below a threshold into a thin band.

use mesh_types::FacetMesh;
use tracing::info;

use crate::bounds::ZBounds;
use crate::error::StatsResult;

/// Parameters for [`squish`].
#[derive(Debug, Clone, PartialEq)]
pub struct SquishParams {
    /// Vertices strictly below this height are moved.
    pub threshold_height: f64,

    /// Height of the band the moved vertices are compressed into.
    pub target_height: f64,
}

impl SquishParams {
    /// Create squish parameters.
    #[must_use]
    pub const fn new(threshold_height: f64, target_height: f64) -> Self {
        Self {
            threshold_height,
            target_height,
        }
    }

    /// Set the threshold height.
    #[must_use]
    pub const fn with_threshold_height(mut self, height: f64) -> Self {
        self.threshold_height = height;
        self
    }

    /// Set the target band height.
    #[must_use]
    pub const fn with_target_height(mut self, height: f64) -> Self {
        self.target_height = height;
        self
    }

    /// New height of a vertex at `z`, or `None` if it stays put.
    ///
    /// `threshold - (1 - fraction * target)`, where `fraction` is the
    /// position of `z` within `bounds`. The constant `1` has no unit relation
    /// to `target` and is kept exactly as the tool has always applied it.
    #[must_use]
    pub fn remap(&self, z: f64, bounds: &ZBounds) -> Option<f64> {
        (z < self.threshold_height).then(|| {
            self.threshold_height - (1.0 - bounds.fraction(z) * self.target_height)
        })
    }
}

/// Outcome of a [`squish`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SquishReport {
    /// Vertices below the threshold that were moved.
    pub vertices_squished: usize,

    /// Vertices at or above the threshold, left untouched.
    pub vertices_kept: usize,
}

/// Squish every vertex below `params.threshold_height`, in place.
///
/// `bounds` must come from [`scan_z`](crate::scan_z) on the same mesh before
/// this call; taking `&mut FacetMesh` guarantees nothing reads the mesh
/// while it is rewritten. Vertices at or above the threshold are not
/// written at all, so they keep their exact bits. Write the mesh back with
/// `mesh_io::save_stl` afterwards.
///
/// # Errors
///
/// Returns [`StatsError::DegenerateRange`](crate::StatsError::DegenerateRange)
/// if `bounds.min == bounds.max`. The check happens before any vertex is
/// modified.
///
/// # Example
///
/// ```
/// use mesh_types::{Facet, FacetMesh};
/// use mesh_stats::{scan_z, squish, SquishParams};
///
/// let mut mesh = FacetMesh::from_facets(vec![
///     Facet::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 5.0], [0.0, 1.0, 10.0]),
/// ]);
/// let bounds = scan_z(&mesh).unwrap();
///
/// let report = squish(&mut mesh, &bounds, &SquishParams::new(6.0, 2.0)).unwrap();
/// assert_eq!(report.vertices_squished, 2);
/// assert_eq!(mesh.facets[0].vertices[0].z(), 5.0);
/// assert_eq!(mesh.facets[0].vertices[2].z(), 10.0);
/// ```
pub fn squish(
    mesh: &mut FacetMesh,
    bounds: &ZBounds,
    params: &SquishParams,
) -> StatsResult<SquishReport> {
    bounds.require_range()?;

    let mut report = SquishReport::default();
    for vertex in mesh.vertices_mut() {
        match params.remap(vertex.z(), bounds) {
            Some(z) => {
                vertex.position.z = z;
                report.vertices_squished += 1;
            }
            None => report.vertices_kept += 1,
        }
    }

    info!(
        threshold_height = params.threshold_height,
        target_height = params.target_height,
        squished = report.vertices_squished,
        kept = report.vertices_kept,
        "Squished mesh"
    );
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::bounds::scan_z;
    use crate::error::StatsError;
    use approx::assert_relative_eq;
    use mesh_types::{Facet, MeshTopology};

    fn mesh_with_z(zs: &[f64]) -> FacetMesh {
        zs.chunks(3)
            .map(|c| Facet::from_arrays([0.0, 0.0, c[0]], [1.0, 0.0, c[1]], [0.0, 1.0, c[2]]))
            .collect()
    }

    fn zs(mesh: &FacetMesh) -> Vec<f64> {
        mesh.vertices().map(mesh_types::Vertex::z).collect()
    }

    #[test]
    fn remap_formula() {
        let bounds = ZBounds::new(0.0, 10.0);
        let params = SquishParams::new(6.0, 2.0);

        // fraction 0 -> 6 - (1 - 0) = 5
        assert_relative_eq!(params.remap(0.0, &bounds).unwrap(), 5.0);
        // fraction 0.5 -> 6 - (1 - 1) = 6
        assert_relative_eq!(params.remap(5.0, &bounds).unwrap(), 6.0);
        // fraction 0.25 -> 6 - (1 - 0.5) = 5.5
        assert_relative_eq!(params.remap(2.5, &bounds).unwrap(), 5.5);
        // At or above the threshold: untouched.
        assert_eq!(params.remap(6.0, &bounds), None);
        assert_eq!(params.remap(9.0, &bounds), None);
    }

    #[test]
    fn squish_moves_only_low_vertices() {
        let mut mesh = mesh_with_z(&[0.0, 2.5, 5.0, 6.0, 8.0, 10.0]);
        let bounds = scan_z(&mesh).unwrap();
        let report = squish(&mut mesh, &bounds, &SquishParams::new(6.0, 2.0)).unwrap();

        assert_eq!(
            report,
            SquishReport {
                vertices_squished: 3,
                vertices_kept: 3
            }
        );
        let after = zs(&mesh);
        assert_relative_eq!(after[0], 5.0);
        assert_relative_eq!(after[1], 5.5);
        assert_relative_eq!(after[2], 6.0);
        assert_eq!(&after[3..], &[6.0, 8.0, 10.0]);
    }

    #[test]
    fn vertices_above_threshold_keep_their_bits() {
        let odd = [0.1 + 0.2, 1.0 / 3.0, std::f64::consts::PI];
        let mut mesh = mesh_with_z(&[-1.0, 0.0, 0.05, odd[0], odd[1], odd[2]]);
        let bounds = scan_z(&mesh).unwrap();
        squish(&mut mesh, &bounds, &SquishParams::new(0.3, 4.0)).unwrap();

        let after = zs(&mesh);
        for (a, b) in after[3..].iter().zip(odd) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn x_and_y_are_untouched() {
        let mut mesh = mesh_with_z(&[0.0, 1.0, 2.0]);
        let before: Vec<_> = mesh.vertices().map(|v| (v.position.x, v.position.y)).collect();
        let bounds = scan_z(&mesh).unwrap();
        squish(&mut mesh, &bounds, &SquishParams::new(100.0, 1.0)).unwrap();
        let after: Vec<_> = mesh.vertices().map(|v| (v.position.x, v.position.y)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn degenerate_range_leaves_mesh_untouched() {
        let mut mesh = mesh_with_z(&[7.0; 6]);
        let original = mesh.clone();
        let bounds = scan_z(&mesh).unwrap();

        let result = squish(&mut mesh, &bounds, &SquishParams::new(10.0, 1.0));
        assert_eq!(result, Err(StatsError::DegenerateRange { value: 7.0 }));
        assert_eq!(mesh, original);
    }

    #[test]
    fn threshold_below_mesh_moves_nothing() {
        let mut mesh = mesh_with_z(&[1.0, 2.0, 3.0]);
        let original = mesh.clone();
        let bounds = scan_z(&mesh).unwrap();
        let report = squish(&mut mesh, &bounds, &SquishParams::new(-5.0, 1.0)).unwrap();
        assert_eq!(report.vertices_squished, 0);
        assert_eq!(mesh, original);
    }

    #[test]
    fn builder() {
        let params = SquishParams::new(0.0, 0.0)
            .with_threshold_height(3.0)
            .with_target_height(0.5);
        assert_eq!(params, SquishParams::new(3.0, 0.5));
    }
}
