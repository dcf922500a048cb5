mod feed;
mod stops;
mod trips;

pub use feed::*;
pub use stops::*;
pub use trips::*;
