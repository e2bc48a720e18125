//! Local view models built from controller results.
//!
//! SYSTEM CONTEXT
//! ==============
//! These mirror what an owner's dashboard keeps on screen. Mutations go to
//! the server first; local copies change only once the server confirms.

pub mod space_detail;
pub mod stats;
pub mod wall;

pub use space_detail::SpaceDetail;
pub use stats::ReviewStats;
pub use wall::{liked_reviews, public_submission_path};
