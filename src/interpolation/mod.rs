pub mod errors;
pub mod traits;
pub use traits::Interpolator;

pub mod newton;
