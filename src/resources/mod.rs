//! Resource controllers: one thin wrapper per REST resource.
//!
//! Each operation maps to exactly one verb + path through [`ApiClient`].
//! Nothing is validated locally beyond what the request body types enforce.

pub mod embed;
pub mod reviews;
pub mod spaces;

pub use embed::Embed;
pub use reviews::Reviews;
pub use spaces::Spaces;

use crate::api::ApiClient;

impl ApiClient {
    #[must_use]
    pub fn spaces(&self) -> Spaces<'_> {
        Spaces::new(self)
    }

    #[must_use]
    pub fn reviews(&self) -> Reviews<'_> {
        Reviews::new(self)
    }

    #[must_use]
    pub fn embed(&self) -> Embed<'_> {
        Embed::new(self)
    }
}
