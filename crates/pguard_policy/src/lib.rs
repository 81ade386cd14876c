//! # pguard_policy
//!
//! Placeholder restriction policies for deployments.
//!
//! This crate provides:
//! - **Validation Policy**: two environment flags restricting placeholder keys and values
//! - **Placeholder Validator**: checks artifact placeholders against the consolidated dictionary
//! - **Failure Report**: one aggregated, user-facing message listing every violation
//! - **Placeholder Gate**: the entry point that runs all of the above over a deployment plan
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use pguard_policy::{DeploymentPlan, GateError, PlaceholderGate};
//!
//! let plan = DeploymentPlan::from_file(Path::new("plan.yaml"))?;
//! match PlaceholderGate::default().check(&plan) {
//!     Ok(pass) => println!("Deployment may proceed: {:?}", pass),
//!     Err(GateError::ValidationFailed(report)) => eprintln!("{}", report),
//!     Err(e) => return Err(e),
//! }
//! # Ok::<(), GateError>(())
//! ```

pub mod error;
pub mod gate;
pub mod plan;
pub mod policy;
pub mod report;
pub mod validator;

pub use error::{GateError, GateResult};
pub use gate::{validate_placeholders, GateConfig, GatePass, PlaceholderGate};
pub use plan::{Delta, Deployed, DeployedApplication, DeploymentPlan, Environment, Operation};
pub use policy::{
    Properties, ValidationPolicy, LIMIT_PLACEHOLDERS_PROPERTY, LIMIT_PLACEHOLDER_VALUES_PROPERTY,
};
pub use report::FailureReport;
pub use validator::{Artifact, PlaceholderValidator, ValidationError};
