#[path = "box.rs"]
pub mod box_filter;
pub mod gaussian;
pub mod mitchell;
pub mod sinc;
pub mod triangle;
