//! Touch controller drivers

mod cst816s;

pub use cst816s::Cst816s;
