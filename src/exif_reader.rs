//! # EXIF Reader Module
//!
//! Estrae i metadata EXIF da un file JPEG con `kamadak-exif`.
//!
//! ## Responsabilità:
//! - Legge tutti i campi EXIF in una mappa chiave -> valore JSON
//! - Estrae l'orientamento (tag `Orientation` dell'immagine primaria)
//! - Tratta EXIF assente o corrotto come "nessun metadata" (mai fatale)
//!
//! ## Formato chiavi:
//! - Immagine primaria: nome standard del tag (`Make`, `DateTimeOriginal`, ...)
//! - Thumbnail: prefisso `Thumbnail.` (`Thumbnail.Compression`, ...)

use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// EXIF metadata extracted from an image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExifData {
    pub fields: BTreeMap<String, JsonValue>,
    pub orientation: Option<u32>,
}

impl ExifData {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Read EXIF metadata from a file.
///
/// Returns `None` when the file carries no EXIF block, when the block is
/// corrupt, or when it holds no fields at all.
pub fn read_exif(path: &Path) -> Option<ExifData> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            debug!("Cannot open {} for EXIF: {}", path.display(), e);
            return None;
        }
    };

    let parsed = match exif::Reader::new().read_from_container(&mut BufReader::new(file)) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("No EXIF data in {}: {}", path.display(), e);
            return None;
        }
    };

    let mut data = ExifData::default();

    for field in parsed.fields() {
        let key = if field.ifd_num == exif::In::PRIMARY {
            field.tag.to_string()
        } else {
            format!("Thumbnail.{}", field.tag)
        };
        let value = field_to_json(field, &parsed);
        data.fields.entry(key).or_insert(value);
    }

    data.orientation = parsed
        .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|f| f.value.get_uint(0));

    if data.is_empty() {
        None
    } else {
        Some(data)
    }
}

fn field_to_json(field: &exif::Field, parsed: &exif::Exif) -> JsonValue {
    match &field.value {
        exif::Value::Ascii(parts) => {
            let text = parts
                .iter()
                .map(|p| String::from_utf8_lossy(p).trim_end_matches('\0').to_string())
                .collect::<Vec<_>>()
                .join(" ");
            JsonValue::String(text.trim().to_string())
        }
        exif::Value::Byte(v) if v.len() == 1 => JsonValue::from(v[0]),
        exif::Value::Short(v) if v.len() == 1 => JsonValue::from(v[0]),
        exif::Value::Long(v) if v.len() == 1 => JsonValue::from(v[0]),
        _ => JsonValue::String(field.display_value().with_unit(parsed).to_string()),
    }
}
