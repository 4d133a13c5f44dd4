//! Facet-list triangle mesh.

use crate::{Facet, MeshTopology, Vertex};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle mesh stored as a flat list of facets.
///
/// This mirrors the STL layout: no shared vertex table and no indices. Every
/// vertex belongs to exactly one facet, so mutating a vertex in place never
/// affects another facet.
///
/// # Example
///
/// ```
/// use mesh_types::{FacetMesh, Facet, MeshTopology};
///
/// let mut mesh = FacetMesh::new();
/// mesh.facets.push(Facet::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]));
///
/// assert_eq!(mesh.facet_count(), 1);
/// assert_eq!(mesh.vertex_count(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FacetMesh {
    /// Facets in file order.
    pub facets: Vec<Facet>,
}

impl FacetMesh {
    /// Create a new empty mesh.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{FacetMesh, MeshTopology};
    ///
    /// let mesh = FacetMesh::new();
    /// assert!(mesh.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { facets: Vec::new() }
    }

    /// Create a mesh with room for `facet_count` facets.
    #[inline]
    #[must_use]
    pub fn with_capacity(facet_count: usize) -> Self {
        Self {
            facets: Vec::with_capacity(facet_count),
        }
    }

    /// Create a mesh from an existing facet list.
    #[inline]
    #[must_use]
    pub const fn from_facets(facets: Vec<Facet>) -> Self {
        Self { facets }
    }

    /// Iterate mutably over every vertex of every facet.
    pub fn vertices_mut(&mut self) -> impl Iterator<Item = &mut Vertex> {
        self.facets.iter_mut().flat_map(Facet::iter_mut)
    }
}

impl From<Vec<Facet>> for FacetMesh {
    fn from(facets: Vec<Facet>) -> Self {
        Self::from_facets(facets)
    }
}

impl FromIterator<Facet> for FacetMesh {
    fn from_iter<I: IntoIterator<Item = Facet>>(iter: I) -> Self {
        Self::from_facets(iter.into_iter().collect())
    }
}

impl MeshTopology for FacetMesh {
    #[inline]
    fn facet_count(&self) -> usize {
        self.facets.len()
    }

    fn facets(&self) -> &[Facet] {
        &self.facets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_facets() -> FacetMesh {
        FacetMesh::from_facets(vec![
            Facet::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 1.0, 2.0]),
            Facet::from_arrays([0.0, 0.0, 3.0], [1.0, 0.0, 4.0], [0.0, 1.0, 5.0]),
        ])
    }

    #[test]
    fn counts() {
        let mesh = two_facets();
        assert_eq!(mesh.facet_count(), 2);
        assert_eq!(mesh.vertex_count(), 6);
        assert!(!mesh.is_empty());
        assert!(FacetMesh::new().is_empty());
    }

    #[test]
    fn vertices_visit_file_order() {
        let mesh = two_facets();
        let zs: Vec<f64> = mesh.vertices().map(Vertex::z).collect();
        assert_eq!(zs, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn vertices_mut_touches_every_vertex() {
        let mut mesh = two_facets();
        for v in mesh.vertices_mut() {
            v.position.z += 10.0;
        }
        assert!(mesh.vertices().all(|v| v.z() >= 10.0));
    }

    #[test]
    fn collect_from_iterator() {
        let mesh: FacetMesh = (0..4)
            .map(|i| Facet::from_arrays([0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, f64::from(i)]))
            .collect();
        assert_eq!(mesh.facet_count(), 4);
    }
}
