//! Data bundle and form state for the asset create/detail dialogs.

mod compose;
mod form;

pub use compose::{compose, DialogComposer, DialogData, DialogSource, DialogSources};
pub use form::{AssetDraft, DraftError, FormState};
