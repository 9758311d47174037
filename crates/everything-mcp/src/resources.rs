//! Demo resource catalog: 100 static resources with cursor pagination.
//!
//! Odd-numbered resources are plaintext, even-numbered ones are base64
//! blobs. Listing is paginated 10 at a time behind an opaque cursor.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use everything_core::cursor;

use crate::error::McpError;
use crate::types::{
    ListResourcesResult, ListResourceTemplatesResult, ReadResourceResult, Resource,
    ResourceTemplate,
};

/// Total number of generated resources.
pub const RESOURCE_COUNT: usize = 100;

/// Resources returned per page.
pub const PAGE_SIZE: usize = 10;

const URI_PREFIX: &str = "test://static/resource/";

/// In-memory catalog of the generated demo resources.
pub struct ResourceStore {
    all: Vec<Resource>,
}

impl ResourceStore {
    pub fn new() -> Self {
        let all = (1..=RESOURCE_COUNT).map(make_resource).collect();
        Self { all }
    }

    /// One page of resources, starting at the position the cursor encodes.
    ///
    /// An undecodable cursor starts from the beginning; `next_cursor` is set
    /// while more pages remain.
    pub fn list(&self, cursor: Option<&str>) -> ListResourcesResult {
        let start = cursor.and_then(cursor::decode).unwrap_or(0);
        let start = start.min(self.all.len());
        let end = (start + PAGE_SIZE).min(self.all.len());

        let next_cursor = (end < self.all.len()).then(|| cursor::encode(end));
        ListResourcesResult {
            resources: self.all[start..end].to_vec(),
            next_cursor,
        }
    }

    pub fn templates(&self) -> ListResourceTemplatesResult {
        ListResourceTemplatesResult {
            resource_templates: vec![ResourceTemplate {
                uri_template: format!("{URI_PREFIX}{{id}}"),
                name: "Static Resource".to_string(),
                description: "A static resource with a numeric ID".to_string(),
            }],
        }
    }

    /// Read one resource by URI.
    pub fn read(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        if let Some(id) = uri.strip_prefix(URI_PREFIX) {
            if let Ok(n) = id.parse::<usize>() {
                if n >= 1 && n <= self.all.len() {
                    return Ok(ReadResourceResult {
                        contents: vec![self.all[n - 1].clone()],
                    });
                }
            }
        }
        Err(McpError::invalid_params(format!("Unknown resource: {uri}")))
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::new()
    }
}

fn make_resource(n: usize) -> Resource {
    let uri = format!("{URI_PREFIX}{n}");
    let name = format!("Resource {n}");
    if n % 2 == 1 {
        Resource {
            uri,
            name,
            mime_type: "text/plain".to_string(),
            text: Some(format!("Resource {n}: This is a plaintext resource")),
            blob: None,
        }
    } else {
        Resource {
            uri,
            name,
            mime_type: "application/octet-stream".to_string(),
            text: None,
            blob: Some(STANDARD.encode(format!("Resource {n}: This is a base64 blob"))),
        }
    }
}
