pub mod environment;
pub mod orthographic;
pub mod perspective;
