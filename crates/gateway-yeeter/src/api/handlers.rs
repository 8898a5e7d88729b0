use axum::{body::Bytes, http::StatusCode, Json};
use tracing::{debug, warn, Span};

use crate::{
    admission_request::AdmissionRequest,
    admission_response::AdmissionResponse,
    api::{
        admission_review::{AdmissionReviewRequest, AdmissionReviewResponse},
        api_error::ApiError,
    },
    errors::ReviewError,
    mutation::{review_pod, PodObject},
};

#[tracing::instrument(
    name = "mutation",
    fields(
        request_uid=tracing::field::Empty,
        host=crate::config::HOSTNAME.as_str(),
        name=tracing::field::Empty,
        namespace=tracing::field::Empty,
        operation=tracing::field::Empty,
        kind_group=tracing::field::Empty,
        kind_version=tracing::field::Empty,
        kind=tracing::field::Empty,
        allowed=tracing::field::Empty,
        mutated=tracing::field::Empty,
        response_message=tracing::field::Empty,
    ),
    skip_all)]
/// Compute the mutation of an admission request.
///
/// Only structurally invalid reviews are rejected with an HTTP error, everything
/// else produces an allowed admission response.
pub(crate) async fn mutate_handler(
    body: Bytes,
) -> Result<Json<AdmissionReviewResponse>, (StatusCode, ApiError)> {
    let admission_request = AdmissionReviewRequest::decode(&body).map_err(handle_review_error)?;
    debug!(admission_request = ?admission_request, "admission request received");

    populate_span_with_admission_request_data(&admission_request);

    let response = if admission_request.kind.is_pod() {
        let pod =
            PodObject::from_admission_request(&admission_request).map_err(handle_review_error)?;
        review_pod(&admission_request.uid, &pod)
    } else {
        warn!(
            gvk = %admission_request.kind,
            "unsupported kind, this should not happen: skipping"
        );
        AdmissionResponse::allow(admission_request.uid.clone())
    };

    populate_span_with_mutation_results(&response);

    Ok(Json(AdmissionReviewResponse::new(response)))
}

pub(crate) async fn healthz_handler() -> &'static str {
    "OK"
}

fn populate_span_with_admission_request_data(adm_req: &AdmissionRequest) {
    Span::current().record("kind", adm_req.kind.kind.as_str());
    Span::current().record("kind_group", adm_req.kind.group.as_str());
    Span::current().record("kind_version", adm_req.kind.version.as_str());
    Span::current().record("name", adm_req.name.clone().unwrap_or_default().as_str());
    Span::current().record(
        "namespace",
        adm_req.namespace.clone().unwrap_or_default().as_str(),
    );
    Span::current().record("operation", adm_req.operation.as_str());
    Span::current().record("request_uid", adm_req.uid.as_str());
}

fn populate_span_with_mutation_results(response: &AdmissionResponse) {
    Span::current().record("allowed", response.allowed);
    Span::current().record("mutated", response.patch.is_some());
    if let Some(message) = response
        .status
        .as_ref()
        .and_then(|status| status.message.as_ref())
    {
        Span::current().record("response_message", message.as_str());
    }
}

fn handle_review_error(error: ReviewError) -> (StatusCode, ApiError) {
    warn!(error = %error, "rejecting malformed admission review");

    let api_error = ApiError::from(error);
    (api_error.status, api_error)
}
