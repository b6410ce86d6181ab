//! Dropstat Validators: trust checks for incoming drop reports.
//!
//! Each kind is a pure function of the [`ValidatorContext`] snapshot and the
//! [`ValidationPolicy`]. The chain runs them in the policy's order and stops
//! at the first failure; a failure only marks the report unreliable.
//!
//! ```text
//! ValidatorContext → STAGE_TIME → USER → IP → DROPS → reliable
//!                        ↓          ↓      ↓      ↓
//!                                unreliable
//! ```
//!
//! # Example
//!
//! ```ignore
//! use dropstat_validators::{ValidatorChain, ValidationPolicy};
//!
//! let chain = ValidatorChain::new(ValidationPolicy::standard());
//! let outcome = chain.run(&ctx);
//! if let Some(kind) = outcome.failed {
//!     println!("unreliable: failed {}", kind);
//! }
//! ```

mod chain;
mod drops;
mod ip;
mod policy;
mod stage_time;
mod user;

pub use chain::{run_ordered, validate, ChainOutcome, ValidatorChain};
pub use policy::ValidationPolicy;

pub use dropstat_core::{ValidatorContext, ValidatorKind};
