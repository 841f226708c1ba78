// Annotated rich text: document model, editor, queries and display policy

pub mod annotated_document;
pub mod display;
pub mod editor;
pub mod marks;
pub mod mutation;
pub mod query;

pub use annotated_document::*;
pub use display::{latest_mark, resolve_color, resolve_display, BadgeEntry, RunDisplay};
pub use editor::{AnnotatedEditor, Selection};
pub use marks::{ActiveMarks, AnnotationMark, FallacyMark, MarkView, RhetoricMark};
pub use query::{AnnotatedSpan, AnnotationFilter, AnnotationRecord, UsedTags};
