use std::{collections::BTreeMap, fmt};

pub(crate) const FORKLIFT_APP_LABEL: &str = "forklift.app";
pub(crate) const VIRT_V2V_LABEL_VALUE: &str = "virt-v2v";
pub(crate) const APP_LABEL: &str = "app";
pub(crate) const CDI_IMPORTER_LABEL_VALUE: &str = "containerized-data-importer";

/// The migration transfer pods this webhook cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PodKind {
    VirtV2v,
    CdiImporter,
}

impl fmt::Display for PodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PodKind::VirtV2v => write!(f, "virt-v2v"),
            PodKind::CdiImporter => write!(f, "cdi"),
        }
    }
}

/// Classify a pod by its labels. `None` means the pod is not of interest.
///
/// The `forklift.app` label wins over the `app` one when both are set.
pub fn classify(labels: Option<&BTreeMap<String, String>>) -> Option<PodKind> {
    let labels = labels?;

    if label_equals(labels, FORKLIFT_APP_LABEL, VIRT_V2V_LABEL_VALUE) {
        Some(PodKind::VirtV2v)
    } else if label_equals(labels, APP_LABEL, CDI_IMPORTER_LABEL_VALUE) {
        Some(PodKind::CdiImporter)
    } else {
        None
    }
}

fn label_equals(labels: &BTreeMap<String, String>, key: &str, value: &str) -> bool {
    labels.get(key).is_some_and(|v| v == value)
}
