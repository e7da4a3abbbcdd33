//! CloudFormation template model
//!
//! A minimal, typed representation of the template document the external
//! deployment engine consumes: a resource map, an output map, and the
//! intrinsic functions (`Ref`, `Fn::GetAtt`, `Fn::Join`) used to wire
//! resources together. `BTreeMap` keys keep synthesis output deterministic.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{SiteError, SiteResult};

/// Template format version understood by the deployment engine
pub const FORMAT_VERSION: &str = "2010-09-09";

/// A synthesized template: the deliverable of the whole crate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    pub format_version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub resources: BTreeMap<String, Resource>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, Output>,
}

impl Template {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            description: Some(description.into()),
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    /// Add a resource under a validated logical ID
    pub fn add_resource(&mut self, logical_id: &str, resource: Resource) -> SiteResult<()> {
        validate_logical_id(logical_id)?;
        self.resources.insert(logical_id.to_string(), resource);
        Ok(())
    }

    /// Add a declared output
    pub fn add_output(&mut self, key: &str, description: &str, value: Value) -> SiteResult<()> {
        validate_logical_id(key)?;
        self.outputs.insert(
            key.to_string(),
            Output {
                description: description.to_string(),
                value,
            },
        );
        Ok(())
    }

    /// Pretty-printed JSON, suitable for the provider console as well as
    /// machine consumption
    pub fn to_json(&self) -> SiteResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A single resource declaration
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
    #[serde(rename = "Type")]
    pub resource_type: String,

    pub properties: Value,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_policy: Option<DeletionPolicy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_replace_policy: Option<DeletionPolicy>,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>, properties: Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties,
            depends_on: Vec::new(),
            deletion_policy: None,
            update_replace_policy: None,
        }
    }

    /// Declare an explicit ordering edge on another resource
    pub fn depends_on(mut self, logical_id: &str) -> Self {
        self.depends_on.push(logical_id.to_string());
        self
    }

    /// Removal policy = destroy: delete the resource (and contents) on
    /// stack teardown instead of retaining it
    pub fn destroy_on_removal(mut self) -> Self {
        self.deletion_policy = Some(DeletionPolicy::Delete);
        self.update_replace_policy = Some(DeletionPolicy::Delete);
        self
    }
}

/// What the engine does with a resource when it leaves the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeletionPolicy {
    Delete,
    Retain,
}

/// A declared stack output (consumed by operators / downstream DNS setup)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    pub description: String,
    pub value: Value,
}

/// `{"Ref": id}` - reference a resource's primary identifier
pub fn r#ref(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

/// `{"Fn::GetAtt": [id, attr]}` - reference a resource attribute
pub fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

/// `{"Fn::Join": [sep, parts]}` - concatenate values at provisioning time
pub fn join(separator: &str, parts: Vec<Value>) -> Value {
    json!({ "Fn::Join": [separator, parts] })
}

/// Logical IDs must be 1-255 alphanumeric ASCII characters
pub fn validate_logical_id(id: &str) -> SiteResult<()> {
    if id.is_empty() {
        return Err(SiteError::InvalidLogicalId {
            id: id.to_string(),
            reason: "must contain at least 1 character".to_string(),
        });
    }
    if id.len() > 255 {
        return Err(SiteError::InvalidLogicalId {
            id: id.to_string(),
            reason: "must be at most 255 characters".to_string(),
        });
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(SiteError::InvalidLogicalId {
            id: id.to_string(),
            reason: "must contain only alphanumeric characters [A-Za-z0-9]".to_string(),
        });
    }
    Ok(())
}
