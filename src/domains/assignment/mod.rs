pub mod eligibility;
pub mod engine;
pub mod metrics;
pub mod ports;
pub mod result;
pub mod scoring;

pub use eligibility::*;
pub use engine::*;
pub use metrics::*;
pub use ports::*;
pub use result::*;
pub use scoring::*;
