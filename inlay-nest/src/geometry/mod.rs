mod d_transformation;
mod transformation;

/// Parsing and flattening of path data into outlines
pub mod contour;
/// Traits shared by the geometric primitives
pub mod geo_traits;
/// Points, edges, rectangles and simple polygons
pub mod primitives;

#[doc(inline)]
pub use d_transformation::DTransformation;
#[doc(inline)]
pub use transformation::Transformation;
