pub mod order;
pub mod partner;
pub mod ports;

pub use order::*;
pub use partner::*;
pub use ports::*;
