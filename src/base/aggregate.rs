use crate::base::primitive::Primitive;

/// Marker trait for primitives that themselves index a collection of other
/// primitives (BVH, QBVH). Distinguishes accelerators from leaf primitives
/// at the type level even though both satisfy [`Primitive`].
pub trait Aggregate: Primitive + Send + Sync {}
