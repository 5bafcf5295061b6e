pub mod addresses;
pub mod errors;
pub mod ids;
pub mod ledger;
pub mod plan;
pub mod report;
pub mod topology;

pub use addresses::*;
pub use errors::*;
pub use ids::*;
pub use ledger::*;
pub use plan::*;
pub use report::*;
pub use topology::*;
