use crate::{
    admission_request::AdmissionRequest, admission_response::AdmissionResponse,
    errors::ReviewError,
};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionReviewRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<AdmissionRequest>,
}

impl AdmissionReviewRequest {
    /// Decode an admission review envelope, it must carry a request.
    pub fn decode(body: &[u8]) -> Result<AdmissionRequest, ReviewError> {
        let review: AdmissionReviewRequest =
            serde_json::from_slice(body).map_err(ReviewError::Decode)?;
        review.request.ok_or(ReviewError::MissingRequest)
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionReviewResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    pub response: AdmissionResponse,
}

impl AdmissionReviewResponse {
    pub fn new(response: AdmissionResponse) -> Self {
        AdmissionReviewResponse {
            api_version: Some(String::from("admission.k8s.io/v1")),
            kind: Some(String::from("AdmissionReview")),
            response,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_review_with_request() {
        let body = json!({
            "apiVersion": "admission.k8s.io/v1",
            "kind": "AdmissionReview",
            "request": {
                "uid": "705ab4f5-6393-11e8-b7cc-42010a800002",
                "kind": {"group": "", "version": "v1", "kind": "Pod"},
                "resource": {"group": "", "version": "v1", "resource": "pods"},
                "namespace": "default",
                "operation": "CREATE",
                "userInfo": {"username": "admin"},
                "object": {"metadata": {"generateName": "importer-"}},
                "oldObject": null,
                "dryRun": false
            }
        })
        .to_string();

        let request = AdmissionReviewRequest::decode(body.as_bytes()).unwrap();
        assert_eq!("705ab4f5-6393-11e8-b7cc-42010a800002", request.uid);
        assert!(request.kind.is_pod());
        assert_eq!(Some("default".to_owned()), request.namespace);
        assert!(request.object.is_some());
        assert_eq!("CREATE", request.operation);
    }

    #[test]
    fn decode_review_without_request() {
        let body = json!({"apiVersion": "admission.k8s.io/v1", "kind": "AdmissionReview"});

        assert!(matches!(
            AdmissionReviewRequest::decode(body.to_string().as_bytes()),
            Err(ReviewError::MissingRequest)
        ));
    }

    #[test]
    fn decode_invalid_review() {
        assert!(matches!(
            AdmissionReviewRequest::decode(b"{\"request\": 42}"),
            Err(ReviewError::Decode(_))
        ));
        assert!(matches!(
            AdmissionReviewRequest::decode(b"not json"),
            Err(ReviewError::Decode(_))
        ));
    }

    #[test]
    fn response_envelope() {
        let review = AdmissionReviewResponse::new(AdmissionResponse::allow("uid".to_owned()));

        assert_eq!(
            json!({
                "apiVersion": "admission.k8s.io/v1",
                "kind": "AdmissionReview",
                "response": {"uid": "uid", "allowed": true}
            }),
            serde_json::to_value(&review).unwrap()
        );
    }
}
