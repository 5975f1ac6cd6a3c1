//! Application use cases
//!
//! Each use case orchestrates ports and domain policy for one externally
//! triggered operation.

pub mod converse;
pub mod list_models;
pub mod manage_credential;

pub use converse::{ConverseInput, ConverseOutcome, ConverseUseCase, SoftFailureKind};
pub use list_models::{ListModelsError, ListModelsUseCase, ModelListing};
pub use manage_credential::{
    CredentialStatus, CredentialValidator, ManageCredentialError, ManageCredentialUseCase,
    Validation,
};
