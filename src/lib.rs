pub mod accelerators;
pub mod base;
pub mod bxdfs;
pub mod cameras;
pub mod filters;
pub mod geometries;
pub mod integrators;
pub mod interactions;
pub mod io;
pub mod lights;
pub mod materials;
pub mod primitives;
pub mod samplers;
pub mod shapes;
pub mod spectra;
pub mod textures;
pub mod utils;

pub use accelerators::bvh::BVH;
pub use base::{integrator::Integrator, scene::Scene};
pub use geometries::{
    bounds2::Bounds2, bounds3::Bounds3, mat4::Mat4, normal::Normal, point2::Point2,
    point3::Point3, quaternion::Quaternion, ray::Ray, vec2::Vec2, vec3::Vec3,
};
pub use spectra::rgb::RGBSpectrum;
pub use utils::api;
