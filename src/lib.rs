//! # jpeg2webp Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs
//!
//! ## Architettura dei moduli:
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore custom (fatali e per-file)
//! - `file_manager`: Discovery dei JPEG e utilità sui file
//! - `exif_reader`: Estrazione metadata EXIF
//! - `image_processor`: Decodifica JPEG, rotazione, codifica WebP
//! - `converter`: Orchestratore principale del processo
//! - `platform`: Permessi del filesystem
//! - `progress`: Progress bar, statistiche e report finale
//!
//! ## Utilizzo:
//! ```rust,ignore
//! use jpeg2webp::{BatchConverter, Config};
//!
//! let config = Config { root_directory: path, ..Default::default() };
//! let mut converter = BatchConverter::new(config)?;
//! let stats = converter.run()?;
//! ```

pub mod config;
pub mod converter;
pub mod error;
pub mod exif_reader;
pub mod file_manager;
pub mod image_processor;
pub mod platform;
pub mod progress;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use converter::BatchConverter;
pub use error::ConvertError;
pub use progress::ConversionStats;
