//! Types library for the FundMe contribution ledger
//!
//! Shared value types used by the contract layer and the operator tooling.
//! Amounts are integer fixed-point; nothing here touches floating point.
//!
//! # Modules
//! - `ids`: Account and contract identities (`Address`)
//! - `units`: Native currency (`Wei`) and reference currency (`Usd`) amounts
//! - `errors`: Parse and arithmetic errors for the above

pub mod errors;
pub mod ids;
pub mod units;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::*;
    pub use crate::ids::*;
    pub use crate::units::*;
}
