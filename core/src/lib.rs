pub mod autosave;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod content;
pub mod error;
pub mod example_document;
pub mod history;
pub mod ids;
pub mod model;
pub mod richtext;
pub mod selection_observer;
pub mod session;
pub mod store;

pub use catalog::{Catalog, Tag, TagKind};
pub use error::{ConfigError, EditError, GeometryError, StoreError, StoreResult};
pub use session::{EditorSession, SessionSettings};
