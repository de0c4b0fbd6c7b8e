pub mod text_loader;

pub use text_loader::{load_all_documents, load_document, split_pages};
