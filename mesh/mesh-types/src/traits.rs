//! Traits for mesh types.

use crate::{Facet, Vertex};

/// Trait for types that expose a facet list.
///
/// Counts and vertex iteration derive from [`facets`](Self::facets), so an
/// implementor only has to hand out its slice.
pub trait MeshTopology {
    /// Get the number of facets (triangles).
    fn facet_count(&self) -> usize;

    /// Get all facets in file order.
    fn facets(&self) -> &[Facet];

    /// Get the number of vertices. Always three per facet.
    fn vertex_count(&self) -> usize {
        self.facet_count() * 3
    }

    /// Check if the mesh has no facets.
    fn is_empty(&self) -> bool {
        self.facet_count() == 0
    }

    /// Get a facet by index.
    ///
    /// Returns `None` if the index is out of bounds.
    fn facet(&self, index: usize) -> Option<&Facet> {
        self.facets().get(index)
    }

    /// Iterate over every vertex of every facet, in file order.
    fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.facets().iter().flat_map(|f| f.vertices.iter())
    }
}
