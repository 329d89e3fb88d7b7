// Resource Module
// Loading of message catalogs and property files

pub mod catalog;
pub mod propfile;

pub use catalog::{MessageCatalog, PropCatalog};
pub use propfile::{entries, PropertyError, PropertyFile};
