//! Explicitly typed form schema: a doc is an ordered list of groups, each
//! holding an ordered list of properties.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ModelError;
use crate::BulkDocument;

/// Elementary type of a property value, named after the search engine field type.
///
/// Types without a dedicated variant are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Keyword,
    Text,
    Long,
    Integer,
    Short,
    Byte,
    Double,
    Float,
    Boolean,
    Date,
    #[serde(untagged)]
    Other(String),
}

/// The smallest element of a doc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub key: String,
    pub name: String,
    pub etype: ElementType,
}

impl Property {
    /// Create a property.
    pub fn new(
        id: impl Into<String>,
        key: impl Into<String>,
        name: impl Into<String>,
        etype: ElementType,
    ) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            name: name.into(),
            etype,
        }
    }
}

/// A named set of properties, optionally nested under another group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub key: String,
    pub name: String,
    /// Producers send `""` for top-level groups; blank keys read as `None`.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_key: Option<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

/// A structured form made of groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Doc {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl Doc {
    /// Check that group keys and property ids are unique and that every
    /// parent key names another group of this doc.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut group_keys = HashSet::new();
        for group in &self.groups {
            if !group_keys.insert(group.key.as_str()) {
                return Err(ModelError::DuplicateGroupKey(group.key.clone()));
            }
        }

        let mut property_ids = HashSet::new();
        for group in &self.groups {
            if let Some(parent) = &group.parent_key {
                if parent == &group.key || !group_keys.contains(parent.as_str()) {
                    return Err(ModelError::UnknownParentGroup {
                        group: group.key.clone(),
                        parent: parent.clone(),
                    });
                }
            }
            for property in &group.properties {
                if !property_ids.insert(property.id.as_str()) {
                    return Err(ModelError::DuplicatePropertyId(property.id.clone()));
                }
            }
        }

        Ok(())
    }

    /// Build one `property` record for every property of every group, in
    /// document order. Groups and the doc itself are not emitted.
    pub fn property_records(&self) -> Result<Vec<Record>, ModelError> {
        self.validate()?;

        Ok(self
            .groups
            .iter()
            .flat_map(|g| g.properties.iter())
            .map(|p| Record::Property {
                property: p.clone(),
            })
            .collect())
    }
}

impl fmt::Display for Doc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(self) {
            Ok(s) => f.write_str(&s),
            Err(_) => f.write_str("{}"),
        }
    }
}

/// Serialization envelope for the property index.
///
/// Serialized as `{"type": "<variant>", "<variant>": {...}}` so the
/// discriminator always matches the populated payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
    Doc { doc: Doc },
    Group { group: Group },
    Property { property: Property },
}

impl Record {
    /// The `type` discriminator of this record.
    pub fn kind(&self) -> &'static str {
        match self {
            Record::Doc { .. } => "doc",
            Record::Group { .. } => "group",
            Record::Property { .. } => "property",
        }
    }
}

impl BulkDocument for Record {
    fn document_id(&self) -> String {
        match self {
            Record::Doc { doc } => format!("doc:{}", doc.id),
            Record::Group { group } => format!("group:{}", group.id),
            Record::Property { property } => format!("property:{}", property.id),
        }
    }
}
