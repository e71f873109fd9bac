// ── Capability implementations ──
//
// One module per resource family. Every type here implements `Tool`, and
// through the blanket impl, `Capability`.

pub mod custom_code;
pub mod forms;
pub mod pages;
pub mod sites;

pub use custom_code::{AddCustomCode, ListCustomCode, MAX_INLINE_SOURCE_CHARS};
pub use forms::{ListFormSubmissions, ListForms};
pub use pages::{ListPages, UpdatePage};
pub use sites::{ListSites, PublishSite};
