mod file_writer;
pub(crate) mod manifest_reader;

pub use file_writer::{FileSystemWriter, StdoutPresenter};
pub use manifest_reader::FileSystemManifestReader;
