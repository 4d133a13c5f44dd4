//! Facet type: one triangle of an STL surface.

use nalgebra::Vector3;

use crate::Vertex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle with concrete vertex positions.
///
/// Facets own their vertices by value; the same point shared by two facets
/// is stored twice, exactly as STL lays it out.
///
/// The normal and the attribute field are carried through from the source
/// file untouched. Nothing in this workspace recomputes them.
///
/// # Example
///
/// ```
/// use mesh_types::{Facet, Vertex, Vector3};
///
/// let facet = Facet::new([
///     Vertex::from_coords(0.0, 0.0, 0.0),
///     Vertex::from_coords(1.0, 0.0, 0.0),
///     Vertex::from_coords(0.0, 1.0, 0.0),
/// ])
/// .with_normal(Vector3::z());
///
/// assert_eq!(facet.normal, Some(Vector3::z()));
/// assert_eq!(facet.attribute, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Facet {
    /// Facet normal as stored in the source file, if there was one.
    pub normal: Option<Vector3<f64>>,

    /// The three corners, in file order.
    pub vertices: [Vertex; 3],

    /// Binary STL "attribute byte count" field (usually 0).
    pub attribute: u16,
}

impl Facet {
    /// Create a facet from three vertices with no normal.
    #[inline]
    #[must_use]
    pub const fn new(vertices: [Vertex; 3]) -> Self {
        Self {
            normal: None,
            vertices,
            attribute: 0,
        }
    }

    /// Create a facet from coordinate arrays.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::Facet;
    ///
    /// let facet = Facet::from_arrays([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 2.0]);
    /// assert_eq!(facet.vertices[2].z(), 2.0);
    /// ```
    #[inline]
    #[must_use]
    pub fn from_arrays(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> Self {
        Self::new([a.into(), b.into(), c.into()])
    }

    /// Set the stored normal.
    #[inline]
    #[must_use]
    pub const fn with_normal(mut self, normal: Vector3<f64>) -> Self {
        self.normal = Some(normal);
        self
    }

    /// Set the attribute field.
    #[inline]
    #[must_use]
    pub const fn with_attribute(mut self, attribute: u16) -> Self {
        self.attribute = attribute;
        self
    }

    /// Iterate over the three vertices.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    /// Iterate mutably over the three vertices.
    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Vertex> {
        self.vertices.iter_mut()
    }
}
