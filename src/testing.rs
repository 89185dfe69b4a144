//! Test infrastructure: a sample domain record, its entity configuration,
//! and a recording mock gateway.
//!
//! The mock echoes submitted records back (minus cleared pairs, which a real
//! adapter never returns) so round-trip assertions work without a live
//! adapter, and records every call so tests can assert exactly which RPCs
//! were made.

use anyhow::Result;
use bridge_core::{
    CreationSource, DomainRecord, EntityConfig, FieldMapping, FieldValue, Formatted,
    GenericRecord, GenericSearch, MappingTable, Operation, ProtectedFields, ReferencedKinds,
    WorkRegion,
};
use crm_client::CrmGateway;
use std::sync::Mutex;

/// Sample contact record covering every built-in field kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contact {
    /// The contact's own identity guid
    pub contact_guid: Formatted<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub active: bool,
    pub loyalty_score: f64,
    pub visit_count: i64,
    pub last_visit: Formatted<i64>,
    pub created_on: Formatted<i64>,
    pub region: Formatted<WorkRegion>,
    pub creation_source: Formatted<CreationSource>,
    /// Reference to the owning user
    pub owner_guid: Formatted<String>,
}

impl DomainRecord for Contact {
    fn field(&self, name: &str) -> Option<FieldValue> {
        Some(match name {
            "contact_guid" => FieldValue::Guid(self.contact_guid.clone()),
            "first_name" => FieldValue::Str(self.first_name.clone()),
            "last_name" => FieldValue::Str(self.last_name.clone()),
            "email" => FieldValue::Str(self.email.clone()),
            "active" => FieldValue::Bool(self.active),
            "loyalty_score" => FieldValue::Float(self.loyalty_score),
            "visit_count" => FieldValue::Int(self.visit_count),
            "last_visit" => FieldValue::Timestamp(self.last_visit.clone()),
            "created_on" => FieldValue::Timestamp(self.created_on.clone()),
            "region" => FieldValue::Region(self.region.clone()),
            "creation_source" => FieldValue::CreationSource(self.creation_source.clone()),
            "owner_guid" => FieldValue::Guid(self.owner_guid.clone()),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> bool {
        match (name, value) {
            ("contact_guid", FieldValue::Guid(v)) => self.contact_guid = v,
            ("first_name", FieldValue::Str(v)) => self.first_name = v,
            ("last_name", FieldValue::Str(v)) => self.last_name = v,
            ("email", FieldValue::Str(v)) => self.email = v,
            ("active", FieldValue::Bool(v)) => self.active = v,
            ("loyalty_score", FieldValue::Float(v)) => self.loyalty_score = v,
            ("visit_count", FieldValue::Int(v)) => self.visit_count = v,
            ("last_visit", FieldValue::Timestamp(v)) => self.last_visit = v,
            ("created_on", FieldValue::Timestamp(v)) => self.created_on = v,
            ("region", FieldValue::Region(v)) => self.region = v,
            ("creation_source", FieldValue::CreationSource(v)) => self.creation_source = v,
            ("owner_guid", FieldValue::Guid(v)) => self.owner_guid = v,
            _ => return false,
        }
        true
    }
}

/// Entity configuration for [`Contact`] against a `contacts` adapter entity.
pub fn contact_config() -> EntityConfig {
    let mappings = MappingTable::new(vec![
        FieldMapping::regular("contact_guid", "contactid"),
        FieldMapping::regular("first_name", "firstname"),
        FieldMapping::regular("last_name", "lastname"),
        FieldMapping::regular("email", "emailaddress1"),
        FieldMapping::regular("active", "new_active"),
        FieldMapping::regular("loyalty_score", "new_loyaltyscore"),
        FieldMapping::regular("visit_count", "new_visitcount"),
        FieldMapping::regular("last_visit", "new_lastvisit"),
        FieldMapping::regular("created_on", "createdon"),
        FieldMapping::regular("region", "new_workregion"),
        FieldMapping::regular("creation_source", "new_creationsource"),
        FieldMapping::reference(
            "owner_guid",
            "ownerid",
            "ownerid@odata.bind",
            ReferencedKinds::many(["systemusers", "teams"]),
        ),
    ])
    .expect("contact mapping table is valid");

    EntityConfig {
        kind: "contacts".into(),
        identity_field: "contactid".into(),
        creation_source: CreationSource::ServiceApi.code().to_string(),
        required: vec!["last_name".into()],
        protected: ProtectedFields::by_operation([
            (Operation::Create, vec!["contact_guid", "created_on"]),
            (
                Operation::Update,
                vec!["contact_guid", "created_on", "creation_source"],
            ),
        ]),
        mappings,
    }
}

/// One recorded gateway invocation.
#[derive(Debug, Clone)]
pub enum GatewayCall {
    Create(GenericRecord),
    Update(GenericRecord),
    Search(GenericSearch),
}

/// Recording gateway double.
///
/// Without a canned response, create and update echo the submitted record
/// (cleared pairs dropped, a fresh guid assigned on create) and search
/// returns nothing.
#[derive(Default)]
pub struct MockGateway {
    calls: Mutex<Vec<GatewayCall>>,
    response: Option<GenericRecord>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to every call with `response` instead of echoing.
    pub fn with_response(response: GenericRecord) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            response: Some(response),
        }
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Total number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().unwrap().push(call);
    }

    /// A real adapter response never carries the cleared attributes back.
    fn echo(record: GenericRecord) -> GenericRecord {
        let mut record = record;
        record.pairs.retain(|pair| !pair.value.is_empty());
        record
    }
}

#[async_trait::async_trait]
impl CrmGateway for MockGateway {
    async fn create_entity(&self, record: GenericRecord) -> Result<GenericRecord> {
        self.record(GatewayCall::Create(record.clone()));
        Ok(match &self.response {
            Some(response) => response.clone(),
            None => Self::echo(record).with_id(uuid::Uuid::new_v4().to_string()),
        })
    }

    async fn update_entity(&self, record: GenericRecord) -> Result<GenericRecord> {
        self.record(GatewayCall::Update(record.clone()));
        Ok(match &self.response {
            Some(response) => response.clone(),
            None => Self::echo(record),
        })
    }

    async fn search_entities(&self, search: GenericSearch) -> Result<Vec<GenericRecord>> {
        self.record(GatewayCall::Search(search));
        Ok(self.response.clone().into_iter().collect())
    }
}
