pub mod bdpt;
pub mod direct;
pub mod path;
pub mod pssmlt;
pub mod sppm;
pub mod volpath;
