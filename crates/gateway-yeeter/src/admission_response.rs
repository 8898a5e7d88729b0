use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

/// This models the admission/v1/AdmissionResponse object of Kubernetes
/// See https://pkg.go.dev/k8s.io/kubernetes/pkg/apis/admission#AdmissionResponse
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionResponse {
    /// UID is an identifier for the individual request/response.
    /// This must be copied over from the corresponding AdmissionRequest.
    pub uid: String,

    /// Allowed indicates whether or not the admission request was permitted.
    pub allowed: bool,

    /// The type of Patch. Currently we only allow "JSONPatch".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch_type: Option<PatchType>,

    /// The patch body, base64 encoded. Currently we only support "JSONPatch" which implements RFC 6902.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<String>,

    /// Status carries the error message of a mutation that could not be computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AdmissionResponseStatus>,
}

/// PatchType is the type of patch being used to represent the mutated object
#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone)]
pub enum PatchType {
    #[serde(rename = "JSONPatch")]
    #[default]
    JSONPatch,
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq, Clone)]
pub struct AdmissionResponseStatus {
    /// A human-readable description of the status of this operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AdmissionResponse {
    pub fn allow(uid: String) -> AdmissionResponse {
        AdmissionResponse {
            uid,
            allowed: true,
            ..Default::default()
        }
    }

    /// Allow the request and apply the given JSON patch document.
    pub fn allow_with_patch(uid: String, patch: &[u8]) -> AdmissionResponse {
        AdmissionResponse {
            uid,
            allowed: true,
            patch_type: Some(PatchType::JSONPatch),
            patch: Some(general_purpose::STANDARD.encode(patch)),
            status: None,
        }
    }

    /// The webhook fails open: internal errors are reported but the request is still allowed.
    pub fn allow_with_error(uid: String, message: String) -> AdmissionResponse {
        AdmissionResponse {
            uid,
            allowed: true,
            status: Some(AdmissionResponseStatus {
                message: Some(message),
            }),
            ..Default::default()
        }
    }

    /// Returns the decoded JSON patch document, if any.
    pub fn decoded_patch(&self) -> Option<Vec<u8>> {
        self.patch
            .as_ref()
            .and_then(|patch| general_purpose::STANDARD.decode(patch).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_allow_serialization() {
        let response = AdmissionResponse::allow("uid-1".to_owned());
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(json!({"uid": "uid-1", "allowed": true}), value);
    }

    #[test]
    fn patch_is_base64_encoded() {
        let patch = br#"[{"op":"replace","path":"/a","value":"b"}]"#;
        let response = AdmissionResponse::allow_with_patch("uid-2".to_owned(), patch);
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["patchType"], "JSONPatch");
        assert_eq!(
            value["patch"],
            "W3sib3AiOiJyZXBsYWNlIiwicGF0aCI6Ii9hIiwidmFsdWUiOiJiIn1d"
        );
        assert_eq!(Some(patch.to_vec()), response.decoded_patch());
    }

    #[test]
    fn error_keeps_request_allowed() {
        let response =
            AdmissionResponse::allow_with_error("uid-3".to_owned(), "boom".to_owned());

        assert!(response.allowed);
        assert!(response.patch.is_none());
        assert!(response.patch_type.is_none());
        assert_eq!(
            Some("boom".to_owned()),
            response.status.and_then(|status| status.message)
        );
    }
}
