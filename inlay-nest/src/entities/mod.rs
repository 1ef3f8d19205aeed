mod individual;
mod inlay_shape;
mod instance;
mod placement;

#[doc(inline)]
pub use inlay_shape::InlayShape;

#[doc(inline)]
pub use inlay_shape::approximate_polygon;

#[doc(inline)]
pub use instance::Instance;

#[doc(inline)]
pub use placement::Placement;

#[doc(inline)]
pub use individual::Individual;

#[doc(inline)]
pub use individual::Fitness;
