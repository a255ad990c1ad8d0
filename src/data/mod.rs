pub mod archive;
pub mod walk;
pub mod classes;

pub use archive::{extract_data, extract_data_to, ArchiveKind};
pub use walk::{parse_data, walk_dirs, DirSummary};
pub use classes::{list_classes, list_class_dirs};
