use json_patch::Patch;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{error, info, info_span, warn};

use crate::{
    admission_request::AdmissionRequest,
    admission_response::AdmissionResponse,
    errors::{MutationError, ReviewError},
};

mod classifier;
mod networks;
mod patch;

pub use classifier::{classify, PodKind};
pub use networks::{
    parse_networks, serialize_networks, strip_default_routes, NetworkSelectionElement,
    NETWORKS_ANNOTATION,
};
pub use patch::{encode_patch, replace_annotation};

/// The subset of a Pod the webhook needs: its metadata.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct PodObject {
    #[serde(default)]
    pub metadata: ObjectMeta,
}

impl PodObject {
    pub fn from_admission_request(request: &AdmissionRequest) -> Result<Self, ReviewError> {
        let object = request.object.as_ref().ok_or(ReviewError::MissingObject)?;
        serde_json::from_value(object.0.clone()).map_err(ReviewError::InvalidPod)
    }

    /// Pods being created through a controller usually only have a generated name prefix.
    pub fn display_name(&self) -> String {
        match self.metadata.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => format!(
                "{}<generated>",
                self.metadata.generate_name.as_deref().unwrap_or_default()
            ),
        }
    }
}

/// Compute the admission response for a pod. The request is always allowed.
pub fn review_pod(uid: &str, pod: &PodObject) -> AdmissionResponse {
    let namespace = pod.metadata.namespace.as_deref().unwrap_or_default();
    let pod_name = pod.display_name();

    let Some(pod_kind) = classify(pod.metadata.labels.as_ref()) else {
        warn!(
            namespace,
            pod = pod_name.as_str(),
            "reviewing a pod that is neither virt-v2v nor cdi, this should not happen: skipping it"
        );
        return AdmissionResponse::allow(uid.to_owned());
    };

    let span = info_span!(
        "review_pod",
        pod_kind = %pod_kind,
        namespace,
        pod = pod_name.as_str()
    );
    let _enter = span.enter();
    info!("reviewing pod");

    match networks_patch(pod.metadata.annotations.as_ref()) {
        Ok(None) => {
            info!("no networks annotation or no default route found");
            AdmissionResponse::allow(uid.to_owned())
        }
        Ok(Some(patch)) => {
            info!(patch = %String::from_utf8_lossy(&patch), "patching pod");
            AdmissionResponse::allow_with_patch(uid.to_owned(), &patch)
        }
        // Unreachable with the current types: serde_json only fails to
        // serialize maps with non-string keys.
        Err(e) => {
            error!(error = %e, "cannot compute pod patch");
            AdmissionResponse::allow_with_error(uid.to_owned(), e.to_string())
        }
    }
}

/// Build the JSON patch removing all the default route requests from the
/// networks annotation. `None` means there is nothing to change.
fn networks_patch(
    annotations: Option<&BTreeMap<String, String>>,
) -> Result<Option<Vec<u8>>, MutationError> {
    let Some(annotation) = annotations.and_then(|a| a.get(NETWORKS_ANNOTATION)) else {
        return Ok(None);
    };
    info!(annotation = annotation.as_str(), "found networks annotation");

    let mut networks = match parse_networks(annotation) {
        Ok(networks) => networks,
        Err(e) => {
            warn!(error = %e, "leaving networks annotation untouched");
            return Ok(None);
        }
    };

    let removed = strip_default_routes(&mut networks);
    if removed.is_empty() {
        return Ok(None);
    }
    for (network_namespace, network, gateways) in &removed {
        info!(
            network_namespace = network_namespace.as_str(),
            network = network.as_str(),
            default_route = ?gateways,
            "yeeting default route"
        );
    }

    let annotation = serialize_networks(&networks)?;
    info!(annotation = annotation.as_str(), "new networks annotation");

    let patch = Patch(vec![replace_annotation(NETWORKS_ANNOTATION, annotation)]);
    encode_patch(&patch).map(Some)
}
