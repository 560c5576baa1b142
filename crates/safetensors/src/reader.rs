//! SafeTensors parser.

use crate::codec::decode;
use crate::error::{FormatError, Result};
use crate::{element_size, MAX_HEADER_LEN, METADATA_KEY};
use orbit_core::tensor::checked_numel;
use orbit_core::{DType, Element, Tensor};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

/// Parsed tensor metadata from the SafeTensors header.
#[derive(Debug, Clone)]
struct TensorInfo {
    dtype: String,
    shape: Vec<usize>,
    data_offsets: [usize; 2],
}

/// Borrowed view of one tensor's header entry and bytes.
#[derive(Debug, Clone, Copy)]
pub struct TensorView<'a> {
    /// Dtype tag as written in the header
    pub dtype: &'a str,
    /// Dimensions
    pub shape: &'a [usize],
    /// Raw little-endian data
    pub bytes: &'a [u8],
}

impl TensorView<'_> {
    /// The floating element type, or `None` for integer/bool/other tags.
    pub fn float_dtype(&self) -> Option<DType> {
        DType::parse(self.dtype)
    }
}

/// A parsed SafeTensors file.
pub struct SafeTensors {
    tensors: HashMap<String, TensorInfo>,
    metadata: BTreeMap<String, String>,
    data: Vec<u8>,
}

impl SafeTensors {
    /// Read and parse a file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let st = Self::from_bytes(&bytes)?;
        debug!(
            path = %path.display(),
            tensors = st.len(),
            bytes = bytes.len(),
            "Loaded SafeTensors file"
        );
        Ok(st)
    }

    /// Parse a SafeTensors file from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 8 {
            return Err(FormatError::TooShort(bytes.len()));
        }

        let mut len_bytes = [0u8; 8];
        len_bytes.copy_from_slice(&bytes[..8]);
        let header_len = u64::from_le_bytes(len_bytes);

        let too_large = FormatError::HeaderTooLarge {
            header_len,
            file_len: bytes.len(),
        };
        let header_end = usize::try_from(header_len)
            .ok()
            .filter(|&len| len <= MAX_HEADER_LEN)
            .and_then(|len| len.checked_add(8))
            .filter(|&end| end <= bytes.len())
            .ok_or(too_large)?;

        let header_json = std::str::from_utf8(&bytes[8..header_end])
            .map_err(|e| FormatError::InvalidUtf8(e.to_string()))?;

        let header: HashMap<String, serde_json::Value> = serde_json::from_str(header_json)
            .map_err(|e| FormatError::InvalidJson(e.to_string()))?;

        let data = &bytes[header_end..];
        let mut tensors = HashMap::new();
        let mut metadata = BTreeMap::new();

        for (name, meta) in &header {
            if name == METADATA_KEY {
                metadata = parse_metadata(meta)?;
                continue;
            }

            let info = parse_entry(name, meta)?;
            check_bounds(name, &info, data.len())?;
            tensors.insert(name.clone(), info);
        }

        Ok(Self {
            tensors,
            metadata,
            data: data.to_vec(),
        })
    }

    /// Tensor names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tensors.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Number of tensors.
    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    /// Whether the file holds no tensors.
    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    /// Whether a tensor with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.tensors.contains_key(name)
    }

    /// The `__metadata__` map (empty if absent).
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Borrow a tensor's header entry and bytes.
    pub fn view(&self, name: &str) -> Option<TensorView<'_>> {
        let info = self.tensors.get(name)?;
        Some(TensorView {
            dtype: &info.dtype,
            shape: &info.shape,
            bytes: &self.data[info.data_offsets[0]..info.data_offsets[1]],
        })
    }

    /// Decode a floating tensor into an `f32` working buffer.
    ///
    /// F64 tensors are narrowed; use [`tensor_as::<f64>`](Self::tensor_as)
    /// to keep their precision.
    pub fn tensor(&self, name: &str) -> Result<Tensor> {
        self.tensor_as::<f32>(name)
    }

    /// Decode a floating tensor into a working buffer of `T`.
    pub fn tensor_as<T: Element>(&self, name: &str) -> Result<Tensor<T>> {
        let view = self
            .view(name)
            .ok_or_else(|| FormatError::MissingTensor(name.to_string()))?;
        let dtype = view
            .float_dtype()
            .ok_or_else(|| FormatError::UnsupportedDtype {
                name: name.to_string(),
                dtype: view.dtype.to_string(),
            })?;

        let values = decode::<T>(view.bytes, dtype);
        Ok(Tensor::from_parts(values, view.shape.to_vec(), dtype))
    }
}

fn parse_metadata(meta: &serde_json::Value) -> Result<BTreeMap<String, String>> {
    let obj = meta
        .as_object()
        .ok_or_else(|| FormatError::entry(METADATA_KEY, "metadata is not an object"))?;

    obj.iter()
        .map(|(k, v)| {
            v.as_str()
                .map(|s| (k.clone(), s.to_string()))
                .ok_or_else(|| FormatError::entry(METADATA_KEY, format!("value of '{}' is not a string", k)))
        })
        .collect()
}

fn parse_entry(name: &str, meta: &serde_json::Value) -> Result<TensorInfo> {
    let obj = meta
        .as_object()
        .ok_or_else(|| FormatError::entry(name, "metadata is not an object"))?;

    let dtype = obj
        .get("dtype")
        .and_then(|v| v.as_str())
        .ok_or_else(|| FormatError::entry(name, "missing dtype"))?
        .to_string();

    let shape = obj
        .get("shape")
        .and_then(|v| v.as_array())
        .ok_or_else(|| FormatError::entry(name, "missing shape"))?
        .iter()
        .map(|v| as_usize(v).ok_or_else(|| FormatError::entry(name, "shape entry is not a non-negative integer")))
        .collect::<Result<Vec<usize>>>()?;

    let offsets = obj
        .get("data_offsets")
        .and_then(|v| v.as_array())
        .ok_or_else(|| FormatError::entry(name, "missing data_offsets"))?;

    if offsets.len() != 2 {
        return Err(FormatError::entry(name, "data_offsets must have two entries"));
    }

    let start = as_usize(&offsets[0]).ok_or_else(|| FormatError::entry(name, "invalid data_offsets"))?;
    let end = as_usize(&offsets[1]).ok_or_else(|| FormatError::entry(name, "invalid data_offsets"))?;

    Ok(TensorInfo {
        dtype,
        shape,
        data_offsets: [start, end],
    })
}

fn as_usize(v: &serde_json::Value) -> Option<usize> {
    v.as_u64().and_then(|n| usize::try_from(n).ok())
}

fn check_bounds(name: &str, info: &TensorInfo, data_len: usize) -> Result<()> {
    let [start, end] = info.data_offsets;
    if start > end || end > data_len {
        return Err(FormatError::OffsetsOutOfRange {
            name: name.to_string(),
            start,
            end,
            len: data_len,
        });
    }

    if let Some(size) = element_size(&info.dtype) {
        let expected = checked_numel(&info.shape)
            .and_then(|n| n.checked_mul(size))
            .ok_or_else(|| FormatError::entry(name, "shape too large"))?;
        let actual = end - start;
        if expected != actual {
            return Err(FormatError::LengthMismatch {
                name: name.to_string(),
                expected,
                actual,
            });
        }
    }
    Ok(())
}
