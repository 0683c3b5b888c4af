//! Citizen letter portal: accounts, the request wizard and the staff review surface.

pub mod accounts;
pub mod letters;
pub mod memory;
pub mod repository;
pub mod review;
pub mod router;
pub mod session;
pub mod submission;
pub mod validation;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use accounts::{AccountError, AccountService, PasswordHasher};
pub use memory::InMemoryStore;
pub use repository::{PortalStore, RepositoryError};
pub use review::{ReviewError, ReviewService};
pub use router::portal_router;
pub use session::{AuthSession, Session, SessionToken};
pub use submission::{SubmissionError, SubmissionService};

/// The three portal services sharing one backing store.
pub struct Portal<S> {
    pub accounts: AccountService<S>,
    pub submissions: SubmissionService<S>,
    pub review: ReviewService<S>,
}

impl<S> Portal<S>
where
    S: PortalStore,
{
    pub fn new(store: Arc<S>, hasher: PasswordHasher) -> Self {
        Self {
            accounts: AccountService::new(store.clone(), hasher),
            submissions: SubmissionService::new(store.clone()),
            review: ReviewService::new(store),
        }
    }
}
