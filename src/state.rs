//! Shared application state: one store per mounted resource.

use crate::resource::ResourceSpec;
use crate::store::RecordStore;
use std::collections::HashMap;
use std::sync::Arc;

/// One mounted resource: its descriptor plus the store backing it.
#[derive(Clone)]
pub struct ResourceEntry {
    pub spec: ResourceSpec,
    pub store: Arc<dyn RecordStore>,
}

#[derive(Clone)]
pub struct AppState {
    resources: Arc<HashMap<String, ResourceEntry>>,
}

impl AppState {
    pub fn new(entries: Vec<ResourceEntry>) -> Self {
        let resources = entries
            .into_iter()
            .map(|e| (e.spec.path.to_string(), e))
            .collect();
        AppState {
            resources: Arc::new(resources),
        }
    }

    /// Resource mounted at `segment`, if any.
    pub fn resource(&self, segment: &str) -> Option<&ResourceEntry> {
        self.resources.get(segment)
    }
}
