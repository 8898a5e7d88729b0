use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::errors::MutationError;

/// Annotation holding the secondary networks a pod is attached to.
pub const NETWORKS_ANNOTATION: &str = "k8s.v1.cni.cncf.io/networks";

/// One entry of the multi-network annotation.
///
/// Only the fields the webhook looks at are typed, every other CNI specific
/// key (ips, mac, interface, cni-args...) is carried through untouched.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct NetworkSelectionElement {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,

    /// Gateways to use for the default route of the pod.
    #[serde(
        rename = "default-route",
        default,
        skip_serializing_if = "no_default_route"
    )]
    pub gateway_request: Option<Vec<IpAddr>>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn no_default_route(gateway_request: &Option<Vec<IpAddr>>) -> bool {
    gateway_request.as_ref().map_or(true, Vec::is_empty)
}

impl NetworkSelectionElement {
    pub fn requests_default_route(&self) -> bool {
        !no_default_route(&self.gateway_request)
    }

    /// Remove the default route request, returning the gateways that were set.
    pub fn take_default_route(&mut self) -> Option<Vec<IpAddr>> {
        if !self.requests_default_route() {
            return None;
        }
        self.gateway_request.take()
    }
}

pub fn parse_networks(annotation: &str) -> Result<Vec<NetworkSelectionElement>, MutationError> {
    serde_json::from_str(annotation).map_err(MutationError::AnnotationParse)
}

pub fn serialize_networks(networks: &[NetworkSelectionElement]) -> Result<String, MutationError> {
    serde_json::to_string(networks).map_err(MutationError::Serialization)
}

/// Strip every default route request from the given networks.
///
/// Returns the removed gateways along with the network they belonged to,
/// an empty list means nothing changed.
pub fn strip_default_routes(
    networks: &mut [NetworkSelectionElement],
) -> Vec<(String, String, Vec<IpAddr>)> {
    networks
        .iter_mut()
        .filter_map(|network| {
            network
                .take_default_route()
                .map(|gateways| (network.namespace.clone(), network.name.clone(), gateways))
        })
        .collect()
}
