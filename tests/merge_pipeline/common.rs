//! Shared helpers for building model files.

use orbit::{DType, SafeTensors, SafeTensorsWriter, Tensor, TensorView};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temp directory holding models A and B and an output path.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Fixture {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn a(&self) -> PathBuf {
        self.path("a.safetensors")
    }

    pub fn b(&self) -> PathBuf {
        self.path("b.safetensors")
    }

    pub fn out(&self) -> PathBuf {
        self.path("out.safetensors")
    }
}

/// Builder for a small model file.
#[derive(Default)]
pub struct Model {
    writer: SafeTensorsWriter,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn f32(mut self, name: &str, data: &[f32], shape: &[usize]) -> Self {
        self.writer.add_tensor(name, &Tensor::from_slice(data, shape));
        self
    }

    pub fn typed(mut self, name: &str, data: &[f32], shape: &[usize], dtype: DType) -> Self {
        let tensor = Tensor::from_vec(data.to_vec(), shape.to_vec(), dtype);
        self.writer.add_tensor(name, &tensor);
        self
    }

    pub fn f64(mut self, name: &str, data: &[f64], shape: &[usize]) -> Self {
        let tensor = Tensor::from_f64_vec(data.to_vec(), shape.to_vec());
        self.writer.add_tensor(name, &tensor);
        self
    }

    pub fn i64(mut self, name: &str, values: &[i64]) -> Self {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let shape = [values.len()];
        self.writer
            .add_view(
                name,
                TensorView {
                    dtype: "I64",
                    shape: &shape,
                    bytes: &bytes,
                },
            )
            .unwrap();
        self
    }

    pub fn meta(mut self, key: &str, value: &str) -> Self {
        self.writer.insert_metadata(key, value);
        self
    }

    pub fn save(self, path: &Path) {
        self.writer.write(path).unwrap();
    }
}

pub fn read(path: &Path) -> SafeTensors {
    SafeTensors::read(path).unwrap()
}

pub fn assert_close(actual: &[f32], expected: &[f32], tol: f32) {
    assert_eq!(actual.len(), expected.len(), "length differs");
    for (i, (x, y)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (x - y).abs() <= tol,
            "element {}: {} vs {} (tol {})",
            i,
            x,
            y,
            tol
        );
    }
}
