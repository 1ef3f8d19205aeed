/// External (serializable) representations of instances and solutions.
pub mod ext_repr;

/// All logic for converting external representations into internal ones
pub mod import;

/// All logic for exporting internal representations into external ones
pub mod export;

/// All logic for creating SVG from [`Individual`](crate::entities::Individual)s
pub mod svg;
