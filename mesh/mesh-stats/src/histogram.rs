//! Z-axis histogram.

// Bucket indices are small; f64 <-> usize conversions don't lose anything in practice
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

use mesh_types::{FacetMesh, MeshTopology};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::bounds::ZBounds;
use crate::error::{StatsError, StatsResult};

/// Parameters for [`build_histogram`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistogramParams {
    /// Number of equal-width steps between min and max.
    ///
    /// The histogram holds one more bucket than this: the extra bucket
    /// starts at `max` and collects the vertices sitting exactly there.
    pub bucket_count: usize,
}

impl Default for HistogramParams {
    fn default() -> Self {
        Self { bucket_count: 20 }
    }
}

impl HistogramParams {
    /// Largest accepted `bucket_count`.
    pub const MAX_BUCKET_COUNT: usize = 1 << 16;

    /// Set the bucket count.
    #[must_use]
    pub const fn with_bucket_count(mut self, bucket_count: usize) -> Self {
        self.bucket_count = bucket_count;
        self
    }
}

/// One histogram bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    /// Position in the histogram, `0..=bucket_count`.
    pub index: usize,
    /// Lower edge: `index * step + min`.
    pub lower_edge: f64,
    /// Number of vertices in the bucket.
    pub count: usize,
}

/// Vertex counts per Z interval, in ascending bucket order.
///
/// # Example
///
/// ```
/// use mesh_types::{Facet, FacetMesh};
/// use mesh_stats::{build_histogram, scan_z, HistogramParams};
///
/// let mesh = FacetMesh::from_facets(vec![
///     Facet::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 5.0], [0.0, 1.0, 10.0]),
/// ]);
/// let bounds = scan_z(&mesh).unwrap();
/// let histogram = build_histogram(&mesh, &bounds, &HistogramParams::default()).unwrap();
///
/// assert_eq!(histogram.len(), 21);
/// assert_eq!(histogram.step(), 0.5);
/// assert_eq!(histogram.count(10), Some(1));
/// assert_eq!(histogram.total(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bounds: ZBounds,
    step: f64,
    counts: Vec<usize>,
}

impl Histogram {
    /// Bounds the histogram was built over.
    #[must_use]
    pub const fn bounds(&self) -> ZBounds {
        self.bounds
    }

    /// Width of one bucket.
    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// Number of buckets (`bucket_count + 1`).
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Always false: a histogram has at least two buckets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Raw counts in bucket order.
    #[must_use]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Count of the bucket at `index`.
    #[must_use]
    pub fn count(&self, index: usize) -> Option<usize> {
        self.counts.get(index).copied()
    }

    /// Sum of all counts; equals the vertex count of the mesh.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Lower edge of the bucket at `index`.
    #[must_use]
    pub fn lower_edge(&self, index: usize) -> f64 {
        index as f64 * self.step + self.bounds.min
    }

    /// Buckets in ascending order. Call `.rev()` for top-down listings.
    pub fn buckets(&self) -> impl DoubleEndedIterator<Item = Bucket> + ExactSizeIterator + '_ {
        self.counts.iter().enumerate().map(|(index, &count)| Bucket {
            index,
            lower_edge: self.lower_edge(index),
            count,
        })
    }
}

/// Bucket index of `z`.
///
/// `z == max` maps to `bucket_count` explicitly instead of trusting the
/// division to land exactly there, and the result is clamped to
/// `0..=bucket_count`.
#[allow(clippy::float_cmp)]
fn bucket_index(z: f64, bounds: &ZBounds, step: f64, bucket_count: usize) -> usize {
    if z == bounds.max {
        return bucket_count;
    }
    let raw = ((z - bounds.min) / step).floor();
    if raw <= 0.0 {
        0
    } else {
        (raw as usize).min(bucket_count)
    }
}

/// Count the vertices of `mesh` per Z bucket.
///
/// With `step = (max - min) / bucket_count`, a vertex goes to bucket
/// `floor((z - min) / step)`. There are `bucket_count + 1` buckets; the last
/// one holds the vertices at exactly `max`. Counting runs in parallel over
/// facets and the partial counts are summed.
///
/// # Errors
///
/// - [`StatsError::InvalidParams`] if `bucket_count` is zero or above
///   [`HistogramParams::MAX_BUCKET_COUNT`]
/// - [`StatsError::DegenerateRange`] if `bounds.min == bounds.max`
pub fn build_histogram(
    mesh: &FacetMesh,
    bounds: &ZBounds,
    params: &HistogramParams,
) -> StatsResult<Histogram> {
    let bucket_count = params.bucket_count;
    if bucket_count == 0 {
        return Err(StatsError::invalid_params("bucket count must be at least 1"));
    }
    let len = match bucket_count.checked_add(1) {
        Some(len) if bucket_count <= HistogramParams::MAX_BUCKET_COUNT => len,
        _ => {
            return Err(StatsError::invalid_params(format!(
                "bucket count {bucket_count} exceeds the maximum of {}",
                HistogramParams::MAX_BUCKET_COUNT
            )));
        }
    };
    let step = bounds.require_range()? / bucket_count as f64;
    debug!(bucket_count, step, "Building Z histogram");

    let counts = mesh
        .facets
        .par_iter()
        .fold(
            || vec![0usize; len],
            |mut counts, facet| {
                for v in facet.iter() {
                    counts[bucket_index(v.z(), bounds, step, bucket_count)] += 1;
                }
                counts
            },
        )
        .reduce(
            || vec![0usize; len],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b) {
                    *x += y;
                }
                a
            },
        );

    let histogram = Histogram {
        bounds: *bounds,
        step,
        counts,
    };
    info!(
        vertices = mesh.vertex_count(),
        buckets = histogram.len(),
        step,
        "Built Z histogram"
    );
    Ok(histogram)
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::bounds::scan_z;
    use approx::assert_relative_eq;
    use mesh_types::Facet;

    /// One facet per Z value, all three corners at that height.
    fn flat_facets(zs: &[f64]) -> FacetMesh {
        zs.iter()
            .map(|&z| Facet::from_arrays([0.0, 0.0, z], [1.0, 0.0, z], [0.0, 1.0, z]))
            .collect()
    }

    /// Three vertices at Z = 0, 5 and 10.
    fn spread_mesh() -> FacetMesh {
        FacetMesh::from_facets(vec![Facet::from_arrays(
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 5.0],
            [0.0, 1.0, 10.0],
        )])
    }

    #[test]
    fn reference_scenario() {
        let mesh = spread_mesh();
        let bounds = scan_z(&mesh).unwrap();
        assert_eq!(bounds, ZBounds { min: 0.0, max: 10.0 });

        let h = build_histogram(&mesh, &bounds, &HistogramParams::default()).unwrap();
        assert_eq!(h.step(), 0.5);
        assert_eq!(h.len(), 21);
        assert_eq!(h.count(0), Some(1));
        assert_eq!(h.count(10), Some(1));
        assert_eq!(h.count(20), Some(1));
        assert_eq!(h.counts().iter().filter(|&&c| c == 1).count(), 3);
        assert_eq!(h.counts().iter().filter(|&&c| c == 0).count(), 18);
        assert_eq!(h.total(), 3);
    }

    #[test]
    fn lower_edges_step_from_min() {
        let mesh = flat_facets(&[-3.0, 1.0]);
        let bounds = scan_z(&mesh).unwrap();
        let h = build_histogram(&mesh, &bounds, &HistogramParams::default()).unwrap();

        let edges: Vec<f64> = h.buckets().map(|b| b.lower_edge).collect();
        assert_eq!(edges.len(), 21);
        assert_eq!(edges[0], -3.0);
        assert_relative_eq!(edges[10], -1.0);
        assert_relative_eq!(edges[20], 1.0);
        assert!(edges.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn max_lands_in_extra_bucket() {
        // The max bucket must not depend on 0.3 / (0.3 / 20) rounding to 20.
        let mesh = flat_facets(&[0.0, 0.1, 0.3]);
        let bounds = scan_z(&mesh).unwrap();
        let h = build_histogram(&mesh, &bounds, &HistogramParams::default()).unwrap();
        assert_eq!(h.count(20), Some(3));
        assert_eq!(h.count(0), Some(3));
        assert_eq!(h.total(), 9);
    }

    #[test]
    fn descending_order_by_reversing() {
        let mesh = spread_mesh();
        let bounds = scan_z(&mesh).unwrap();
        let h = build_histogram(&mesh, &bounds, &HistogramParams::default()).unwrap();

        let first = h.buckets().rev().next().unwrap();
        assert_eq!(first.index, 20);
        assert_eq!(first.lower_edge, 10.0);
        assert_eq!(first.count, 1);
    }

    #[test]
    fn custom_bucket_count() {
        let mesh = flat_facets(&[0.0, 1.0, 2.0, 3.0, 4.0]);
        let bounds = scan_z(&mesh).unwrap();
        let params = HistogramParams::default().with_bucket_count(4);
        let h = build_histogram(&mesh, &bounds, &params).unwrap();
        assert_eq!(h.counts(), &[3, 3, 3, 3, 3]);
    }

    #[test]
    fn degenerate_range_is_an_error() {
        let mesh = flat_facets(&[7.0, 7.0]);
        let bounds = scan_z(&mesh).unwrap();
        assert_eq!(
            build_histogram(&mesh, &bounds, &HistogramParams::default()),
            Err(StatsError::DegenerateRange { value: 7.0 })
        );
    }

    #[test]
    fn zero_buckets_is_an_error() {
        let mesh = spread_mesh();
        let bounds = scan_z(&mesh).unwrap();
        let params = HistogramParams::default().with_bucket_count(0);
        assert!(matches!(
            build_histogram(&mesh, &bounds, &params),
            Err(StatsError::InvalidParams(_))
        ));
    }

    #[test]
    fn oversized_bucket_count_is_an_error() {
        let mesh = spread_mesh();
        let bounds = scan_z(&mesh).unwrap();
        for bucket_count in [usize::MAX, HistogramParams::MAX_BUCKET_COUNT + 1] {
            let params = HistogramParams::default().with_bucket_count(bucket_count);
            assert!(matches!(
                build_histogram(&mesh, &bounds, &params),
                Err(StatsError::InvalidParams(_))
            ));
        }

        let params =
            HistogramParams::default().with_bucket_count(HistogramParams::MAX_BUCKET_COUNT);
        let h = build_histogram(&mesh, &bounds, &params).unwrap();
        assert_eq!(h.len(), HistogramParams::MAX_BUCKET_COUNT + 1);
        assert_eq!(h.total(), 3);
    }

    #[test]
    fn lower_edge_is_index_times_step_plus_min() {
        let mesh = flat_facets(&[0.1, 0.7]);
        let bounds = scan_z(&mesh).unwrap();
        let h = build_histogram(&mesh, &bounds, &HistogramParams::default()).unwrap();
        for bucket in h.buckets() {
            let expected = bucket.index as f64 * h.step() + 0.1;
            assert_eq!(bucket.lower_edge.to_bits(), expected.to_bits());
        }
    }

    #[test]
    fn values_outside_bounds_are_clamped() {
        let mesh = flat_facets(&[-1.0, 0.0, 20.0]);
        let h = build_histogram(&mesh, &ZBounds::new(0.0, 10.0), &HistogramParams::default())
            .unwrap();
        assert_eq!(h.count(0), Some(6));
        assert_eq!(h.count(20), Some(3));
    }

    #[test]
    fn zero_count_buckets_are_kept() {
        let mesh = spread_mesh();
        let bounds = scan_z(&mesh).unwrap();
        let h = build_histogram(&mesh, &bounds, &HistogramParams::default()).unwrap();
        assert_eq!(h.buckets().len(), 21);
        assert_eq!(h.count(5), Some(0));
    }
}
