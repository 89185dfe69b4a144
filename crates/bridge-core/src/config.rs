//! Per-entity-kind configuration.
//!
//! An `EntityConfig` bundles everything the translation engine needs for one
//! entity kind: the kind tag, the identity field, required and protected
//! field sets, and the field mapping table. Configuration is defined once by
//! the calling service, in code or loaded from YAML, and is immutable
//! thereafter.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Error validating or loading entity configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading a configuration file
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A mapping sets a navigation key without a referenced kind
    #[error("Mapping for field '{field}' has a navigation key but no referenced kind")]
    NavigationWithoutReference { field: String },

    /// A mapping sets a referenced kind without a navigation key
    #[error("Mapping for field '{field}' has a referenced kind but no navigation key")]
    ReferenceWithoutNavigation { field: String },

    /// A mapping's referenced-kind list is empty
    #[error("Mapping for field '{field}' has an empty referenced-kind list")]
    EmptyReferenceList { field: String },
}

// ============================================================================
// Operations and protected fields
// ============================================================================

/// The operation a payload is generated for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    const ALL: [Operation; 4] = [
        Operation::Create,
        Operation::Read,
        Operation::Update,
        Operation::Delete,
    ];
}

/// Fields excluded from generated payloads, keyed by operation.
///
/// Accepts two configuration shapes: a map keyed by operation, or a legacy
/// flat field list. The flat list is normalized at load time into "applies to
/// every operation" so the rest of the engine only ever sees the map form.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProtectedFields {
    map: BTreeMap<Operation, BTreeSet<String>>,
}

impl ProtectedFields {
    /// Build from the map-by-operation shape.
    pub fn by_operation<I, F, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Operation, F)>,
        F: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            map: entries
                .into_iter()
                .map(|(op, fields)| (op, fields.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }

    /// Build from the legacy flat shape: the listed fields are protected for
    /// every operation.
    pub fn flat<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: BTreeSet<String> = fields.into_iter().map(Into::into).collect();
        Self {
            map: Operation::ALL
                .iter()
                .map(|op| (*op, fields.clone()))
                .collect(),
        }
    }

    /// Whether `field` is protected for `op`.
    pub fn contains(&self, op: Operation, field: &str) -> bool {
        self.map.get(&op).is_some_and(|fields| fields.contains(field))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ProtectedFieldsRepr {
    Flat(Vec<String>),
    ByOperation(BTreeMap<Operation, Vec<String>>),
}

impl<'de> Deserialize<'de> for ProtectedFields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match ProtectedFieldsRepr::deserialize(deserializer)? {
            ProtectedFieldsRepr::Flat(fields) => Self::flat(fields),
            ProtectedFieldsRepr::ByOperation(map) => Self::by_operation(map),
        })
    }
}

// ============================================================================
// Field mappings
// ============================================================================

/// Ordered list of entity kinds a reference field may point at.
///
/// The first entry is authoritative for create/update; the full list is
/// informational for reads. A legacy leading `/` on a kind name is accepted
/// and stripped; prefer the bare kind name.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ReferencedKinds(Vec<String>);

impl ReferencedKinds {
    /// A single referenced kind.
    pub fn one(kind: impl Into<String>) -> Self {
        Self(vec![kind.into()])
    }

    /// An ordered list of referenced kinds.
    pub fn many<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(kinds.into_iter().map(Into::into).collect())
    }

    /// The kind used for create/update writes.
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// All referenced kinds, write-authoritative first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn normalize(&mut self) {
        for kind in &mut self.0 {
            while kind.starts_with('/') {
                kind.remove(0);
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ReferencedKindsRepr {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for ReferencedKinds {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match ReferencedKindsRepr::deserialize(deserializer)? {
            ReferencedKindsRepr::One(kind) => Self::one(kind),
            ReferencedKindsRepr::Many(kinds) => Self(kinds),
        })
    }
}

/// One row of the field mapping table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Domain field name
    pub field: String,

    /// Generic key name on the adapter's entity
    pub key: String,

    /// Navigation key used instead of `key` when writing a reference field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub navigation: Option<String>,

    /// Entity kind(s) the reference points at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<ReferencedKinds>,
}

impl FieldMapping {
    /// A regular (non-reference) field mapping.
    pub fn regular(field: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            key: key.into(),
            navigation: None,
            references: None,
        }
    }

    /// A reference field mapping with its navigation key and target kind(s).
    pub fn reference(
        field: impl Into<String>,
        key: impl Into<String>,
        navigation: impl Into<String>,
        references: ReferencedKinds,
    ) -> Self {
        Self {
            field: field.into(),
            key: key.into(),
            navigation: Some(navigation.into()),
            references: Some(references),
        }
    }

    /// Whether this mapping describes a reference field.
    pub fn is_reference(&self) -> bool {
        self.navigation.is_some()
    }
}

/// The field mapping table for one entity kind, with its derived lookup
/// views.
///
/// Construction validates the navigation/reference invariant (either both
/// set or neither), normalizes legacy `/`-prefixed kind names, and derives
/// the lookup views once; the table is immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldMapping>", into = "Vec<FieldMapping>")]
pub struct MappingTable {
    entries: Vec<FieldMapping>,
    keys: HashMap<String, String>,
    navigation: HashMap<String, String>,
    references: HashMap<String, ReferencedKinds>,
}

impl MappingTable {
    /// Build the table and its views from an ordered list of mappings.
    pub fn new(mut entries: Vec<FieldMapping>) -> Result<Self, ConfigError> {
        let mut keys = HashMap::new();
        let mut navigation = HashMap::new();
        let mut references = HashMap::new();

        for entry in &mut entries {
            match (&entry.navigation, &mut entry.references) {
                (Some(_), None) => {
                    return Err(ConfigError::NavigationWithoutReference {
                        field: entry.field.clone(),
                    })
                }
                (None, Some(_)) => {
                    return Err(ConfigError::ReferenceWithoutNavigation {
                        field: entry.field.clone(),
                    })
                }
                (Some(nav), Some(refs)) => {
                    if refs.is_empty() {
                        return Err(ConfigError::EmptyReferenceList {
                            field: entry.field.clone(),
                        });
                    }
                    refs.normalize();
                    navigation.insert(entry.field.clone(), nav.clone());
                    references.insert(entry.field.clone(), refs.clone());
                }
                (None, None) => {}
            }
            keys.insert(entry.field.clone(), entry.key.clone());
        }

        Ok(Self {
            entries,
            keys,
            navigation,
            references,
        })
    }

    /// The mappings in table order.
    pub fn entries(&self) -> &[FieldMapping] {
        &self.entries
    }

    /// Generic key name for a domain field.
    pub fn key_for(&self, field: &str) -> Option<&str> {
        self.keys.get(field).map(String::as_str)
    }

    /// Navigation key for a reference field; `None` for regular fields.
    pub fn navigation_for(&self, field: &str) -> Option<&str> {
        self.navigation.get(field).map(String::as_str)
    }

    /// Referenced kinds for a reference field; `None` for regular fields.
    pub fn references_for(&self, field: &str) -> Option<&ReferencedKinds> {
        self.references.get(field)
    }

    /// Whether the field is configured as a reference field.
    pub fn is_reference(&self, field: &str) -> bool {
        self.navigation.contains_key(field)
    }

    /// Whether the field exists in the table at all, reference or regular.
    pub fn contains_field(&self, field: &str) -> bool {
        self.keys.contains_key(field)
    }

    /// A fresh reverse view: generic key name to domain field name. When two
    /// mappings share a key the last table entry wins.
    pub fn reverse_keys(&self) -> HashMap<&str, &str> {
        self.entries
            .iter()
            .map(|entry| (entry.key.as_str(), entry.field.as_str()))
            .collect()
    }
}

impl TryFrom<Vec<FieldMapping>> for MappingTable {
    type Error = ConfigError;

    fn try_from(entries: Vec<FieldMapping>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}

impl From<MappingTable> for Vec<FieldMapping> {
    fn from(table: MappingTable) -> Self {
        table.entries
    }
}

// ============================================================================
// Entity configuration
// ============================================================================

/// Everything the engine needs for one entity kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityConfig {
    /// Entity-kind tag, e.g. `contacts`
    pub kind: String,

    /// Generic key name of the entity's own identity guid
    pub identity_field: String,

    /// Numeric option-set value identifying this service as the record's
    /// creation channel
    #[serde(default)]
    pub creation_source: String,

    /// Domain fields that must resolve to a non-empty value at create/update
    #[serde(default)]
    pub required: Vec<String>,

    /// Fields excluded from generated payloads, by operation
    #[serde(default)]
    pub protected: ProtectedFields,

    /// The field mapping table
    pub mappings: MappingTable,
}

impl EntityConfig {
    /// Parse a configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_yaml_str(&fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> MappingTable {
        MappingTable::new(vec![
            FieldMapping::regular("first_name", "firstname"),
            FieldMapping::reference(
                "owner_guid",
                "ownerid",
                "ownerid@odata.bind",
                ReferencedKinds::many(["/systemusers", "teams"]),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn views_split_reference_and_regular_fields() {
        let table = table();
        assert_eq!(table.key_for("first_name"), Some("firstname"));
        assert_eq!(table.key_for("owner_guid"), Some("ownerid"));
        assert_eq!(table.navigation_for("first_name"), None);
        assert_eq!(table.navigation_for("owner_guid"), Some("ownerid@odata.bind"));
        assert!(table.is_reference("owner_guid"));
        assert!(!table.is_reference("first_name"));
        assert!(table.contains_field("first_name"));
        assert!(!table.contains_field("missing"));
    }

    #[test]
    fn legacy_slash_prefix_is_stripped() {
        let table = table();
        let refs = table.references_for("owner_guid").unwrap();
        assert_eq!(refs.first(), Some("systemusers"));
        assert_eq!(refs.iter().collect::<Vec<_>>(), ["systemusers", "teams"]);
    }

    #[test]
    fn navigation_requires_reference_and_vice_versa() {
        let err = MappingTable::new(vec![FieldMapping {
            field: "owner_guid".into(),
            key: "ownerid".into(),
            navigation: Some("ownerid@odata.bind".into()),
            references: None,
        }])
        .unwrap_err();
        assert!(matches!(err, ConfigError::NavigationWithoutReference { .. }));

        let err = MappingTable::new(vec![FieldMapping {
            field: "owner_guid".into(),
            key: "ownerid".into(),
            navigation: None,
            references: Some(ReferencedKinds::one("systemusers")),
        }])
        .unwrap_err();
        assert!(matches!(err, ConfigError::ReferenceWithoutNavigation { .. }));
    }

    #[test]
    fn empty_reference_list_is_rejected() {
        let err = MappingTable::new(vec![FieldMapping {
            field: "owner_guid".into(),
            key: "ownerid".into(),
            navigation: Some("ownerid@odata.bind".into()),
            references: Some(ReferencedKinds::many(Vec::<String>::new())),
        }])
        .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyReferenceList { .. }));
    }

    #[test]
    fn reverse_keys_last_write_wins() {
        let table = MappingTable::new(vec![
            FieldMapping::regular("a", "shared"),
            FieldMapping::regular("b", "shared"),
        ])
        .unwrap();
        assert_eq!(table.reverse_keys().get("shared"), Some(&"b"));
    }

    #[test]
    fn flat_protected_fields_apply_to_every_operation() {
        let protected = ProtectedFields::flat(["created_on"]);
        for op in Operation::ALL {
            assert!(protected.contains(op, "created_on"));
        }
        assert!(!protected.contains(Operation::Create, "first_name"));
    }

    #[test]
    fn by_operation_protected_fields_scope_to_their_operation() {
        let protected = ProtectedFields::by_operation([
            (Operation::Create, vec!["created_on"]),
            (Operation::Update, vec!["created_on", "creation_source"]),
        ]);
        assert!(protected.contains(Operation::Create, "created_on"));
        assert!(protected.contains(Operation::Update, "creation_source"));
        assert!(!protected.contains(Operation::Create, "creation_source"));
        assert!(!protected.contains(Operation::Delete, "created_on"));
    }

    #[test]
    fn config_loads_from_yaml_with_flat_protected_list() {
        let yaml = r#"
kind: contacts
identity_field: contactid
creation_source: "100000011"
required: [last_name]
protected: [created_on]
mappings:
  - field: first_name
    key: firstname
  - field: owner_guid
    key: ownerid
    navigation: ownerid@odata.bind
    references: systemusers
"#;
        let config = EntityConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.kind, "contacts");
        assert!(config.protected.contains(Operation::Update, "created_on"));
        assert_eq!(
            config.mappings.navigation_for("owner_guid"),
            Some("ownerid@odata.bind")
        );
        assert_eq!(
            config
                .mappings
                .references_for("owner_guid")
                .and_then(ReferencedKinds::first),
            Some("systemusers")
        );
    }

    #[test]
    fn config_loads_from_yaml_with_operation_map() {
        let yaml = r#"
kind: contacts
identity_field: contactid
mappings:
  - field: first_name
    key: firstname
protected:
  create: [created_on]
  update: [created_on, status]
"#;
        let config = EntityConfig::from_yaml_str(yaml).unwrap();
        assert!(config.protected.contains(Operation::Create, "created_on"));
        assert!(config.protected.contains(Operation::Update, "status"));
        assert!(!config.protected.contains(Operation::Create, "status"));
    }

    #[test]
    fn config_loads_from_yaml_file() {
        let yaml = r#"
kind: contacts
identity_field: contactid
mappings:
  - field: first_name
    key: firstname
"#;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.yaml");
        fs::write(&path, yaml).unwrap();
        let config = EntityConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.identity_field, "contactid");
    }

    #[test]
    fn yaml_rejects_mapping_invariant_violations() {
        let yaml = r#"
kind: contacts
identity_field: contactid
mappings:
  - field: owner_guid
    key: ownerid
    navigation: ownerid@odata.bind
"#;
        assert!(EntityConfig::from_yaml_str(yaml).is_err());
    }
}
