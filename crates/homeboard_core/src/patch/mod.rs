//! Sparse field-level edit operations over DTO projections.
//!
//! # Responsibility
//! - Define the `{op, path, value}` edit-operation wire shape.
//! - Apply an ordered batch of edits to a JSON projection of a DTO.
//!
//! # Invariants
//! - Operations are applied sequentially; later operations see the effects
//!   of earlier ones.
//! - One failing operation fails the whole batch; callers hand in a working
//!   copy so no partially-applied state escapes.
//! - Paths are `/`-separated field selectors (`/image`, `/badges/0/label`);
//!   `-` addresses one past the end of an array for `add`.
//! - The target document is a projection of a typed DTO, so every legal
//!   object key already exists; `add` on an unknown key is rejected rather
//!   than silently dropped on the way back into the DTO.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Kind of one edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    /// Overwrite an existing field or element.
    Replace,
    /// Overwrite an existing object key, or insert an array element.
    Add,
    /// Delete an existing field or element.
    Remove,
}

/// One field-level edit: operation kind, field path and optional value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Failures raised while applying a patch batch.
///
/// Every variant belongs to the invalid-patch-operation error class; none of
/// them leaves a partially patched value in the caller's hands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    /// `replace`/`add` was given no value.
    MissingValue(String),
    /// Path is empty, not `/`-rooted, or has a malformed array index.
    InvalidPath(String),
    /// Path walks through or lands on a non-existent target.
    TargetNotFound(String),
    /// The patched projection no longer deserializes into the DTO shape.
    Unreadable(String),
}

impl Display for PatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingValue(path) => write!(f, "operation on `{path}` requires a value"),
            Self::InvalidPath(path) => write!(f, "malformed patch path `{path}`"),
            Self::TargetNotFound(path) => write!(f, "patch path `{path}` does not exist"),
            Self::Unreadable(details) => {
                write!(f, "patched document no longer matches the DTO shape: {details}")
            }
        }
    }
}

impl Error for PatchError {}

/// Applies an ordered batch of edits to `target`, all-or-nothing.
///
/// `target` is mutated in place; callers must pass a working copy and only
/// persist it when this returns `Ok`.
pub fn apply_patch(target: &mut Value, ops: &[PatchOperation]) -> Result<(), PatchError> {
    for op in ops {
        apply_one(target, op)?;
    }
    Ok(())
}

fn apply_one(target: &mut Value, op: &PatchOperation) -> Result<(), PatchError> {
    let segments = split_path(&op.path)?;
    let (last, parents) = segments
        .split_last()
        .ok_or_else(|| PatchError::InvalidPath(op.path.clone()))?;

    let parent = resolve_parent(target, parents, &op.path)?;
    match op.op {
        PatchOp::Replace => {
            let value = required_value(op)?;
            let slot = step_into(parent, last, &op.path)?;
            *slot = value;
        }
        PatchOp::Add => {
            let value = required_value(op)?;
            insert(parent, last, value, &op.path)?;
        }
        PatchOp::Remove => remove(parent, last, &op.path)?,
    }
    Ok(())
}

fn required_value(op: &PatchOperation) -> Result<Value, PatchError> {
    op.value
        .clone()
        .ok_or_else(|| PatchError::MissingValue(op.path.clone()))
}

fn split_path(path: &str) -> Result<Vec<&str>, PatchError> {
    let rest = path
        .strip_prefix('/')
        .ok_or_else(|| PatchError::InvalidPath(path.to_string()))?;
    if rest.is_empty() {
        return Err(PatchError::InvalidPath(path.to_string()));
    }
    Ok(rest.split('/').collect())
}

/// Walks all but the final segment, failing on any missing intermediate.
fn resolve_parent<'a>(
    target: &'a mut Value,
    parents: &[&str],
    full_path: &str,
) -> Result<&'a mut Value, PatchError> {
    let mut current = target;
    for segment in parents {
        current = step_into(current, segment, full_path)?;
    }
    Ok(current)
}

fn step_into<'a>(
    current: &'a mut Value,
    segment: &str,
    full_path: &str,
) -> Result<&'a mut Value, PatchError> {
    match current {
        Value::Object(map) => map
            .get_mut(segment)
            .ok_or_else(|| PatchError::TargetNotFound(full_path.to_string())),
        Value::Array(items) => {
            let index = parse_index(segment, full_path)?;
            items
                .get_mut(index)
                .ok_or_else(|| PatchError::TargetNotFound(full_path.to_string()))
        }
        _ => Err(PatchError::TargetNotFound(full_path.to_string())),
    }
}

fn insert(parent: &mut Value, segment: &str, value: Value, full_path: &str) -> Result<(), PatchError> {
    match parent {
        Value::Object(map) => {
            // Unknown keys have no DTO field behind them and would vanish on
            // deserialization.
            if !map.contains_key(segment) {
                return Err(PatchError::TargetNotFound(full_path.to_string()));
            }
            map.insert(segment.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            if segment == "-" {
                items.push(value);
                return Ok(());
            }
            let index = parse_index(segment, full_path)?;
            if index > items.len() {
                return Err(PatchError::TargetNotFound(full_path.to_string()));
            }
            items.insert(index, value);
            Ok(())
        }
        _ => Err(PatchError::TargetNotFound(full_path.to_string())),
    }
}

fn remove(parent: &mut Value, segment: &str, full_path: &str) -> Result<(), PatchError> {
    match parent {
        Value::Object(map) => map
            .remove(segment)
            .map(|_| ())
            .ok_or_else(|| PatchError::TargetNotFound(full_path.to_string())),
        Value::Array(items) => {
            let index = parse_index(segment, full_path)?;
            if index >= items.len() {
                return Err(PatchError::TargetNotFound(full_path.to_string()));
            }
            items.remove(index);
            Ok(())
        }
        _ => Err(PatchError::TargetNotFound(full_path.to_string())),
    }
}

fn parse_index(segment: &str, full_path: &str) -> Result<usize, PatchError> {
    // Reject "01" and "+1" style indices rather than silently accepting them.
    if segment != "0" && (segment.starts_with('0') || segment.starts_with('+')) {
        return Err(PatchError::InvalidPath(full_path.to_string()));
    }
    segment
        .parse::<usize>()
        .map_err(|_| PatchError::InvalidPath(full_path.to_string()))
}
