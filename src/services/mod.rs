//! Multi-step operations composed from repository calls.
//!
//! Each step is its own backend request. A failure part way through leaves
//! earlier steps applied.

pub mod drafts;
pub mod library;
pub mod sessions;
pub mod templates;

pub use drafts::DraftService;
pub use library::{ExerciseOption, LibraryService};
pub use sessions::SessionService;
pub use templates::{Propagation, TemplateService};
