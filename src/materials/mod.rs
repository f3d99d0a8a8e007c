pub mod glass;
pub mod matte;
pub mod metal;
pub mod mirror;
pub mod plastic;
pub mod subsurface;
