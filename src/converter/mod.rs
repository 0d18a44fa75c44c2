//! # Converter Module
//!
//! Modulo che separa le responsabilità della conversione in sottomoduli:
//! - `batch_converter`: Orchestratore principale (scansione, statistiche, report)
//! - `file_converter`: Pipeline per singolo file
//! - `exif_store`: Persistenza EXIF in `.exif/<name>.exif.json`
//! - `path_resolver`: Calcolo dei path derivati di un file

pub mod batch_converter;
pub mod exif_store;
pub mod file_converter;
pub mod path_resolver;

pub use batch_converter::BatchConverter;
pub use exif_store::ExifStore;
pub use file_converter::{ConversionResult, FileConverter};
pub use path_resolver::FileTask;
