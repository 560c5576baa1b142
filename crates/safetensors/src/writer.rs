//! SafeTensors encoder.

use crate::codec::encode;
use crate::error::{FormatError, Result};
use crate::reader::TensorView;
use crate::{element_size, METADATA_KEY};
use orbit_core::tensor::checked_numel;
use orbit_core::{Element, Tensor};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

struct Entry {
    dtype: String,
    shape: Vec<usize>,
    bytes: Vec<u8>,
}

/// Accumulates tensors and metadata, then serializes a SafeTensors file.
///
/// Tensors are laid out contiguously in name order, so the same set of
/// tensors always produces the same bytes.
#[derive(Default)]
pub struct SafeTensorsWriter {
    entries: BTreeMap<String, Entry>,
    metadata: BTreeMap<String, String>,
}

impl SafeTensorsWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one `__metadata__` entry.
    pub fn insert_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Copy every entry of a metadata map.
    pub fn extend_metadata(&mut self, metadata: &BTreeMap<String, String>) {
        for (k, v) in metadata {
            self.metadata.insert(k.clone(), v.clone());
        }
    }

    /// Add a floating tensor, encoded in its own dtype.
    pub fn add_tensor<T: Element>(&mut self, name: impl Into<String>, tensor: &Tensor<T>) {
        self.entries.insert(
            name.into(),
            Entry {
                dtype: tensor.dtype().as_str().to_string(),
                shape: tensor.shape().to_vec(),
                bytes: encode(tensor.data(), tensor.dtype()),
            },
        );
    }

    /// Add a tensor by copying its raw bytes unchanged.
    pub fn add_view(&mut self, name: impl Into<String>, view: TensorView<'_>) -> Result<()> {
        let name = name.into();
        if let Some(size) = element_size(view.dtype) {
            let expected = checked_numel(view.shape)
                .and_then(|n| n.checked_mul(size))
                .ok_or_else(|| FormatError::entry(&name, "shape too large"))?;
            if expected != view.bytes.len() {
                return Err(FormatError::LengthMismatch {
                    name,
                    expected,
                    actual: view.bytes.len(),
                });
            }
        }
        self.entries.insert(
            name,
            Entry {
                dtype: view.dtype.to_string(),
                shape: view.shape.to_vec(),
                bytes: view.bytes.to_vec(),
            },
        );
        Ok(())
    }

    /// Number of tensors added.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tensors have been added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to bytes.
    ///
    /// The JSON header is padded with spaces to a multiple of 8 bytes so the
    /// data section starts aligned.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut header = Map::new();
        if !self.metadata.is_empty() {
            let meta: Map<String, Value> = self
                .metadata
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            header.insert(METADATA_KEY.to_string(), Value::Object(meta));
        }

        let mut offset = 0usize;
        for (name, entry) in &self.entries {
            let end = offset + entry.bytes.len();
            header.insert(
                name.clone(),
                json!({
                    "dtype": entry.dtype,
                    "shape": entry.shape,
                    "data_offsets": [offset, end],
                }),
            );
            offset = end;
        }

        let mut header_bytes = Value::Object(header).to_string().into_bytes();
        while header_bytes.len() % 8 != 0 {
            header_bytes.push(b' ');
        }

        let mut out = Vec::with_capacity(8 + header_bytes.len() + offset);
        out.extend_from_slice(&(header_bytes.len() as u64).to_le_bytes());
        out.extend_from_slice(&header_bytes);
        for entry in self.entries.values() {
            out.extend_from_slice(&entry.bytes);
        }
        out
    }

    /// Serialize and write to `path`.
    ///
    /// Writes a sibling temporary file first and renames it over `path`, so a
    /// failed write never leaves a truncated model behind.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes();

        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        std::fs::write(&tmp_path, &bytes)?;
        if let Err(e) = std::fs::rename(&tmp_path, path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        debug!(
            path = %path.display(),
            tensors = self.len(),
            bytes = bytes.len(),
            "Wrote SafeTensors file"
        );
        Ok(())
    }
}
