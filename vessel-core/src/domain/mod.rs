mod bounds;
mod category;
mod filter;
mod vessel;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

pub use bounds::*;
pub use category::*;
pub use filter::*;
pub use vessel::*;
