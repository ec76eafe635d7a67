//! Mutation Coordinator
//!
//! - `DeletePolicy`: cascade / reparent / reject
//! - `plan_delete`: pure planning of a category delete
//! - `MutationCoordinator`: validate, await the repository, commit

pub mod coordinator;
pub mod delete_plan;
pub mod policy;

pub use coordinator::MutationCoordinator;
pub use delete_plan::{plan_delete, DeleteOutcome, DeletePlan, RepositoryStep};
pub use policy::DeletePolicy;
