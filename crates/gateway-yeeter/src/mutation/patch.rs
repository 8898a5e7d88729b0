use json_patch::{Patch, PatchOperation, ReplaceOperation};
use jsonptr::PointerBuf;
use serde_json::Value;

use crate::errors::MutationError;

/// Replace the value of a pod annotation. The key is escaped as a JSON pointer
/// token, so `k8s.v1.cni.cncf.io/networks` ends up as `k8s.v1.cni.cncf.io~1networks`.
pub fn replace_annotation(key: &str, value: String) -> PatchOperation {
    PatchOperation::Replace(ReplaceOperation {
        path: PointerBuf::from_tokens(["metadata", "annotations", key]),
        value: Value::String(value),
    })
}

pub fn encode_patch(patch: &Patch) -> Result<Vec<u8>, MutationError> {
    serde_json::to_vec(patch).map_err(MutationError::Serialization)
}
