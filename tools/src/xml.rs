//! XML serialization helpers.
//!
//! The root element is named after the serialized type; struct fields become
//! child elements.

use crate::error::{Result, ToolError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Serialize `value` to an XML string.
pub fn to_xml_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(quick_xml::se::to_string(value)?)
}

/// Deserialize a value from an XML string.
pub fn from_xml_str<T: DeserializeOwned>(xml: &str) -> Result<T> {
    Ok(quick_xml::de::from_str(xml)?)
}

/// Write `value` to `path` as XML, replacing the file.
pub fn save_xml<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    fs::write(path, to_xml_string(value)?)?;
    Ok(())
}

/// Read a value from the XML file at `path`.
pub fn load_xml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let xml = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ToolError::SourceNotFound(path.to_path_buf()),
        _ => ToolError::Io(e),
    })?;
    from_xml_str(&xml)
}
