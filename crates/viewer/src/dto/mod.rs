mod stop;
mod vehicle;

pub use stop::*;
pub use vehicle::*;
