//! v1beta1 wire types and their registration
//!
//! The structs here only carry enough shape to be addressed by kind; field
//! level conversion to an internal representation is left to callers.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api_object;
use crate::codec::Codec;
use crate::error::Result;
use crate::scheme::{KnownType, Scheme};
use crate::version::ApiVersion;

pub const VERSION: &str = "v1beta1";

/// Label or selector map
pub type Labels = BTreeMap<String, String>;

/// Resource name to quantity, e.g. `"cpu": "500m"`
pub type ResourceList = BTreeMap<String, String>;

/// Common object identity, flattened into every top-level object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub self_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<u64>,
}

impl ObjectMeta {
    pub fn named(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Container {
    pub name: String,
    pub image: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContainerManifest {
    pub version: String,
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uuid: String,
    pub containers: Vec<Container>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerManifestList {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub items: Vec<ContainerManifest>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PodState {
    pub manifest: ContainerManifest,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(rename = "podIP", skip_serializing_if = "String::is_empty")]
    pub pod_ip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pod {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub labels: Labels,
    pub desired_state: PodState,
    pub current_state: PodState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodStatusResult {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub state: PodState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PodList {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub items: Vec<Pod>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReplicationControllerState {
    pub replicas: i32,
    pub replica_selector: Labels,
    pub pod_template: PodState,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReplicationController {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub desired_state: ReplicationControllerState,
    pub current_state: ReplicationControllerState,
    pub labels: Labels,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplicationControllerList {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub items: Vec<ReplicationController>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Service {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub port: i32,
    pub labels: Labels,
    pub selector: Labels,
    #[serde(rename = "portalIP", skip_serializing_if = "String::is_empty")]
    pub portal_ip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceList {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub items: Vec<Service>,
}

/// Addresses (`host:port`) backing a service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub endpoints: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsList {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub items: Vec<Endpoints>,
}

/// A worker host. Also addressable as `Node` in this version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Minion {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    #[serde(rename = "hostIP", skip_serializing_if = "String::is_empty")]
    pub host_ip: String,
    pub labels: Labels,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinionList {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub items: Vec<Minion>,
}

/// Assignment of a pod to a host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Binding {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    #[serde(rename = "podID")]
    pub pod_id: String,
    pub host: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Status {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub status: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reason: String,
    pub code: i32,
}

/// A long running server-side operation. Also addressable as `Operation`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerOp {
    #[serde(flatten)]
    pub meta: ObjectMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerOpList {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub items: Vec<ServerOp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectReference {
    pub kind: String,
    pub namespace: String,
    pub name: String,
    pub api_version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Event {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub involved_object: ObjectReference,
    pub status: String,
    pub reason: String,
    pub message: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventList {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub items: Vec<Event>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PodSpec {
    pub containers: Vec<Container>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub restart_policy: String,
}

/// A pod as handed to the host it was bound to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundPod {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub spec: PodSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundPods {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub host: String,
    pub items: Vec<BoundPod>,
}

/// Heterogeneous list; items stay as raw JSON
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct List {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub items: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitRangeItem {
    #[serde(rename = "type")]
    pub limit_type: String,
    pub max: ResourceList,
    pub min: ResourceList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitRangeSpec {
    pub limits: Vec<LimitRangeItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitRange {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub spec: LimitRangeSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitRangeList {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub items: Vec<LimitRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceQuotaSpec {
    pub hard: ResourceList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceQuotaStatus {
    pub hard: ResourceList,
    pub used: ResourceList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceQuota {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub spec: ResourceQuotaSpec,
    pub status: ResourceQuotaStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceQuotaList {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub items: Vec<ResourceQuota>,
}

/// Observed usage reported against a quota
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceQuotaUsage {
    #[serde(flatten)]
    pub meta: ObjectMeta,
    pub status: ResourceQuotaStatus,
}

api_object!(
    Pod,
    PodStatusResult,
    PodList,
    ReplicationController,
    ReplicationControllerList,
    Service,
    ServiceList,
    Endpoints,
    EndpointsList,
    Minion,
    MinionList,
    Binding,
    Status,
    ServerOp,
    ServerOpList,
    Event,
    EventList,
    ContainerManifest,
    ContainerManifestList,
    BoundPod,
    BoundPods,
    List,
    LimitRange,
    LimitRangeList,
    ResourceQuota,
    ResourceQuotaList,
    ResourceQuotaUsage,
);

/// Register every v1beta1 kind, plus the names later versions use
pub fn add_to_scheme(scheme: &mut Scheme) -> Result<()> {
    scheme.add_known_types(
        VERSION,
        [
            KnownType::of::<Pod>(),
            KnownType::of::<PodStatusResult>(),
            KnownType::of::<PodList>(),
            KnownType::of::<ReplicationController>(),
            KnownType::of::<ReplicationControllerList>(),
            KnownType::of::<Service>(),
            KnownType::of::<ServiceList>(),
            KnownType::of::<Endpoints>(),
            KnownType::of::<EndpointsList>(),
            KnownType::of::<Minion>(),
            KnownType::of::<MinionList>(),
            KnownType::of::<Binding>(),
            KnownType::of::<Status>(),
            KnownType::of::<ServerOp>(),
            KnownType::of::<ServerOpList>(),
            KnownType::of::<Event>(),
            KnownType::of::<EventList>(),
            KnownType::of::<ContainerManifest>(),
            KnownType::of::<ContainerManifestList>(),
            KnownType::of::<BoundPod>(),
            KnownType::of::<BoundPods>(),
            KnownType::of::<List>(),
            KnownType::of::<LimitRange>(),
            KnownType::of::<LimitRangeList>(),
            KnownType::of::<ResourceQuota>(),
            KnownType::of::<ResourceQuotaList>(),
            KnownType::of::<ResourceQuotaUsage>(),
        ],
    )?;

    // Future names are supported
    scheme.add_known_type_with_name(VERSION, "Node", KnownType::of::<Minion>())?;
    scheme.add_known_type_with_name(VERSION, "NodeList", KnownType::of::<MinionList>())?;
    scheme.add_known_type_with_name(VERSION, "Operation", KnownType::of::<ServerOp>())?;
    scheme.add_known_type_with_name(VERSION, "OperationList", KnownType::of::<ServerOpList>())?;

    Ok(())
}

/// Codec for v1beta1 payloads
pub fn codec(scheme: &Arc<Scheme>) -> Codec {
    Codec::new(
        Arc::clone(scheme),
        ApiVersion::parse(VERSION).expect("v1beta1 is a valid version"),
    )
}
