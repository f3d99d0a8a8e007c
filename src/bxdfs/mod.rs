pub mod bssrdf_adapter;
pub mod fresnel;
pub mod lambertian;
pub mod microfacet;
pub mod oren_nayer;
pub mod scaled;
pub mod specular;
