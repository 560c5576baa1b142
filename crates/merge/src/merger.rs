//! Per-tensor merge loop.

use crate::error::{MergeError, Result};
use crate::observer::MergeObserver;
use crate::options::MergeOptions;
use crate::summary::MergeSummary;
use orbit_core::{blend_with_report, BlendParams, BlendReport, DType, Element, Tensor};
use orbit_safetensors::{SafeTensors, SafeTensorsWriter};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Value of the `merge_method` metadata entry in merged files.
pub const MERGE_METHOD: &str = "orbit";

/// Why a tensor was copied from A instead of blended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyReason {
    /// Model B has no tensor of that name
    MissingInDonor,
    /// A's or B's tensor is not floating point
    NonFloat,
}

/// What happened to one tensor of model A.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorOutcome {
    /// Blended with B's tensor
    Blended(BlendReport),
    /// Copied unchanged from A
    Copied(CopyReason),
}

enum Planned {
    Blend,
    Copy(CopyReason),
}

enum Produced {
    Blended(Tensor),
    BlendedF64(Tensor<f64>),
    Copied,
}

/// Merge two parsed models.
///
/// Returns a writer holding the merged model and the merge summary. Shapes are
/// checked for every shared tensor before any blending starts.
pub fn merge_models(
    a: &SafeTensors,
    b: &SafeTensors,
    options: &MergeOptions,
    observer: &dyn MergeObserver,
) -> Result<(SafeTensorsWriter, MergeSummary)> {
    let started = Instant::now();
    options.params.validate()?;

    let plan = plan(a, b)?;
    let dropped: Vec<&str> = b.names().into_iter().filter(|n| !a.contains(n)).collect();
    for name in &dropped {
        debug!(tensor = %name, "Tensor only in model B, dropped");
    }
    if !dropped.is_empty() {
        warn!(count = dropped.len(), "Tensors present only in model B were dropped");
    }

    observer.on_start(plan.len());

    let params = options.params;
    let run = || {
        plan.par_iter()
            .map(|(name, planned)| {
                let (produced, outcome) = produce(a, b, name, planned, &params)?;
                observer.on_tensor(name, &outcome);
                Ok((*name, produced, outcome))
            })
            .collect::<Result<Vec<_>>>()
    };

    let produced = match options.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| MergeError::ThreadPool(e.to_string()))?
            .install(run)?,
        None => run()?,
    };

    let mut writer = SafeTensorsWriter::new();
    if options.keep_metadata {
        writer.extend_metadata(a.metadata());
    }
    writer.insert_metadata("merge_method", MERGE_METHOD);
    writer.insert_metadata("merge_params", params_json(&params));

    let mut summary = MergeSummary {
        tensors_dropped: dropped.len(),
        ..Default::default()
    };
    for (name, produced, outcome) in &produced {
        match produced {
            Produced::Blended(tensor) => writer.add_tensor(*name, tensor),
            Produced::BlendedF64(tensor) => writer.add_tensor(*name, tensor),
            Produced::Copied => {
                let view = a
                    .view(name)
                    .ok_or_else(|| orbit_safetensors::FormatError::MissingTensor(name.to_string()))?;
                writer.add_view(*name, view)?;
            }
        }
        summary.record(outcome);
    }
    summary.elapsed_micros = started.elapsed().as_micros() as u64;

    info!(
        blended = summary.tensors_blended,
        copied = summary.tensors_missing_in_b + summary.tensors_non_float,
        dropped = summary.tensors_dropped,
        fallback = summary.elements_fallback,
        "Merge complete"
    );
    observer.on_finish(&summary);
    Ok((writer, summary))
}

/// Load two models, merge them, and write the result to `output`.
pub fn merge_files(
    model_a: impl AsRef<Path>,
    model_b: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &MergeOptions,
    observer: &dyn MergeObserver,
) -> Result<MergeSummary> {
    let a = load(model_a.as_ref())?;
    let b = load(model_b.as_ref())?;

    let (writer, summary) = merge_models(&a, &b, options, observer)?;

    let output = output.as_ref();
    writer.write(output).map_err(|source| MergeError::Save {
        path: output.to_path_buf(),
        source,
    })?;
    info!(path = %output.display(), "Saved merged model");
    Ok(summary)
}

fn load(path: &Path) -> Result<SafeTensors> {
    SafeTensors::read(path).map_err(|source| MergeError::Load {
        path: path.to_path_buf(),
        source,
    })
}

fn plan<'a>(a: &'a SafeTensors, b: &SafeTensors) -> Result<Vec<(&'a str, Planned)>> {
    let mut plan = Vec::with_capacity(a.len());
    for name in a.names() {
        let planned = match (a.view(name), b.view(name)) {
            (Some(va), Some(vb)) => {
                if va.float_dtype().is_none() || vb.float_dtype().is_none() {
                    Planned::Copy(CopyReason::NonFloat)
                } else if va.shape != vb.shape {
                    return Err(MergeError::ShapeMismatch {
                        name: name.to_string(),
                        a: va.shape.to_vec(),
                        b: vb.shape.to_vec(),
                    });
                } else {
                    Planned::Blend
                }
            }
            (Some(va), None) => {
                if va.float_dtype().is_none() {
                    Planned::Copy(CopyReason::NonFloat)
                } else {
                    warn!(tensor = %name, "Tensor missing in model B, copied from A");
                    Planned::Copy(CopyReason::MissingInDonor)
                }
            }
            (None, _) => continue,
        };
        plan.push((name, planned));
    }
    Ok(plan)
}

fn produce(
    a: &SafeTensors,
    b: &SafeTensors,
    name: &str,
    planned: &Planned,
    params: &BlendParams,
) -> Result<(Produced, TensorOutcome)> {
    match planned {
        Planned::Copy(reason) => Ok((Produced::Copied, TensorOutcome::Copied(*reason))),
        Planned::Blend => {
            let wide = [a, b]
                .iter()
                .any(|m| m.view(name).and_then(|v| v.float_dtype()) == Some(DType::F64));
            if wide {
                let (merged, report) = blend_pair::<f64>(a, b, name, params)?;
                Ok((Produced::BlendedF64(merged), TensorOutcome::Blended(report)))
            } else {
                let (merged, report) = blend_pair::<f32>(a, b, name, params)?;
                Ok((Produced::Blended(merged), TensorOutcome::Blended(report)))
            }
        }
    }
}

/// Blend one tensor in a working buffer of `T`. The result keeps A's dtype.
fn blend_pair<T: Element>(
    a: &SafeTensors,
    b: &SafeTensors,
    name: &str,
    params: &BlendParams,
) -> Result<(Tensor<T>, BlendReport)> {
    let ta = a.tensor_as::<T>(name)?;
    let tb = b.tensor_as::<T>(name)?;
    let (merged, report) = blend_with_report(&ta, &tb, params);
    debug!(
        tensor = %name,
        dtype = %ta.dtype(),
        coef = report.coef,
        clipped = report.coef_clipped,
        clamped = report.clamped,
        fallback = report.fallbacks,
        "Blended tensor"
    );
    Ok((merged, report))
}

fn params_json(params: &BlendParams) -> String {
    format!(
        r#"{{"alpha_par":{},"alpha_orth":{},"trust_k":{},"eps":{},"coef_clip":{}}}"#,
        params.alpha_par, params.alpha_orth, params.trust_k, params.eps, params.coef_clip
    )
}
