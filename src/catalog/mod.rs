//! The action catalog: per-service reference data describing every API action, resource type, and condition key.
//!
//! A catalog is built once, either from JSON or from definitions assembled in code, and is never mutated afterwards.
//! Every engine component borrows it immutably, so one catalog can be shared by any number of concurrent synthesis
//! runs without locking.

mod action;
mod arn_pattern;
mod resource_type;

pub use {
    action::ActionDefinition,
    arn_pattern::ArnPattern,
    resource_type::{ConditionKeyDefinition, ResourceTypeDefinition},
};

use {
    crate::{from_str_json, SynthError},
    log::{debug, warn},
    serde::{de::DeserializeOwned, Deserialize, Deserializer},
    serde_json::Value,
    std::collections::BTreeMap,
};

/// The JSON shape of a catalog: service prefix to service definition.
pub type ServiceMap = BTreeMap<String, ServiceDefinition>;

/// A catalog before its services are parsed. Services that fail to parse are skipped.
type RawServiceMap = BTreeMap<String, Value>;

/// Deserialize a list of catalog entries, skipping (and logging) any entry that does not parse. A bad entry then
/// surfaces as an unknown action or resource type at lookup time instead of failing the whole catalog.
fn skip_malformed<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .filter_map(|value| {
            let name = value.get("name").and_then(Value::as_str).unwrap_or_default().to_string();
            match serde_json::from_value(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping malformed catalog entry {name:?}: {e}");
                    None
                }
            }
        })
        .collect())
}

/// Everything the catalog knows about one service.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct ServiceDefinition {
    #[serde(skip)]
    prefix: String,

    #[serde(default)]
    name: Option<String>,

    #[serde(default, deserialize_with = "skip_malformed")]
    actions: Vec<ActionDefinition>,

    #[serde(default, deserialize_with = "skip_malformed")]
    resource_types: Vec<ResourceTypeDefinition>,

    #[serde(default, deserialize_with = "skip_malformed")]
    condition_keys: Vec<ConditionKeyDefinition>,

    /// Indexes into `resource_types`, most specific ARN format first.
    #[serde(skip)]
    by_specificity: Vec<usize>,
}

impl ServiceDefinition {
    pub fn new<P: Into<String>>(prefix: P) -> Self {
        Self {
            prefix: prefix.into().to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn with_name<N: Into<String>>(mut self, name: N) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_action(mut self, action: ActionDefinition) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_resource_type(mut self, resource_type: ResourceTypeDefinition) -> Self {
        self.resource_types.push(resource_type);
        self
    }

    pub fn with_condition_key(mut self, condition_key: ConditionKeyDefinition) -> Self {
        self.condition_keys.push(condition_key);
        self
    }

    /// File the definition under `prefix` and index its resource types.
    fn finish(&mut self, prefix: &str) {
        self.prefix = prefix.to_ascii_lowercase();
        for action in self.actions.iter_mut() {
            action.set_service(&self.prefix);
        }

        let mut order: Vec<usize> = (0..self.resource_types.len()).collect();
        // Stable, so declared order breaks ties.
        order.sort_by_key(|&i| std::cmp::Reverse(self.resource_types[i].matcher().specificity()));
        self.by_specificity = order;

        for rt in self.resource_types.iter().filter(|rt| !rt.matcher().is_valid()) {
            debug!(
                "Service {}: resource type {} has an unusable ARN format {:?}",
                self.prefix,
                rt.name(),
                rt.arn_pattern()
            );
        }
    }

    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The service's display name, falling back to its prefix.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.prefix)
    }

    #[inline]
    pub fn actions(&self) -> &[ActionDefinition] {
        &self.actions
    }

    #[inline]
    pub fn resource_types(&self) -> &[ResourceTypeDefinition] {
        &self.resource_types
    }

    #[inline]
    pub fn condition_keys(&self) -> &[ConditionKeyDefinition] {
        &self.condition_keys
    }

    /// Resource types ordered from the most to the least specific ARN format.
    pub fn resource_types_by_specificity(&self) -> impl Iterator<Item = &ResourceTypeDefinition> {
        self.by_specificity.iter().map(move |&i| &self.resource_types[i])
    }

    /// Look up an action by name, ignoring case.
    pub fn action(&self, name: &str) -> Option<&ActionDefinition> {
        self.actions.iter().find(|a| a.name().eq_ignore_ascii_case(name))
    }

    /// Look up a resource type by name, ignoring case.
    pub fn resource_type(&self, name: &str) -> Option<&ResourceTypeDefinition> {
        self.resource_types.iter().find(|rt| rt.name().eq_ignore_ascii_case(name))
    }

    /// Look up a condition key by name, ignoring case.
    pub fn condition_key(&self, name: &str) -> Option<&ConditionKeyDefinition> {
        self.condition_keys.iter().find(|ck| ck.name().eq_ignore_ascii_case(name))
    }
}

/// The immutable action catalog.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(from = "RawServiceMap")]
pub struct Catalog {
    services: ServiceMap,
}

impl From<RawServiceMap> for Catalog {
    fn from(raw: RawServiceMap) -> Self {
        let services = raw
            .into_iter()
            .filter_map(|(prefix, value)| match serde_json::from_value::<ServiceDefinition>(value) {
                Ok(service) => Some((prefix, service)),
                Err(e) => {
                    warn!("Skipping malformed catalog service {prefix:?}: {e}");
                    None
                }
            })
            .collect();
        Self::new(services)
    }
}

impl From<ServiceMap> for Catalog {
    fn from(services: ServiceMap) -> Self {
        Self::new(services)
    }
}

impl Catalog {
    /// Build a catalog from service definitions keyed by service prefix. Prefixes are case-insensitive.
    pub fn new(services: ServiceMap) -> Self {
        let services = services
            .into_iter()
            .map(|(prefix, mut service)| {
                let prefix = prefix.to_ascii_lowercase();
                service.finish(&prefix);
                (prefix, service)
            })
            .collect();

        Self {
            services,
        }
    }

    /// Build a catalog from service definitions filed under their own prefixes.
    pub fn from_services<I: IntoIterator<Item = ServiceDefinition>>(services: I) -> Self {
        Self::new(services.into_iter().map(|s| (s.prefix.clone(), s)).collect())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// All services, ordered by prefix.
    pub fn services(&self) -> impl Iterator<Item = &ServiceDefinition> {
        self.services.values()
    }

    pub fn service(&self, service: &str) -> Result<&ServiceDefinition, SynthError> {
        match self.services.get(&service.to_ascii_lowercase()) {
            Some(definition) => Ok(definition),
            None => {
                debug!("Service {service:?} is not in the catalog");
                Err(SynthError::UnknownService(service.to_string()))
            }
        }
    }

    pub fn actions_for(&self, service: &str) -> Result<&[ActionDefinition], SynthError> {
        Ok(self.service(service)?.actions())
    }

    pub fn resource_types_for(&self, service: &str) -> Result<&[ResourceTypeDefinition], SynthError> {
        Ok(self.service(service)?.resource_types())
    }

    /// Look up an action by service prefix and name. Both are matched without regard to case.
    pub fn lookup_action(&self, service: &str, name: &str) -> Result<&ActionDefinition, SynthError> {
        self.service(service)?.action(name).ok_or_else(|| {
            debug!("Action {name:?} is not defined for service {service:?}");
            SynthError::UnknownAction(format!("{service}:{name}"))
        })
    }

    /// Look up an action written as `service:Name`.
    pub fn lookup_qualified(&self, qualified: &str) -> Result<&ActionDefinition, SynthError> {
        match qualified.split_once(':') {
            Some((service, name)) if !service.is_empty() && !name.is_empty() => self.lookup_action(service, name),
            _ => Err(SynthError::InvalidAction(qualified.to_string())),
        }
    }
}

from_str_json!(Catalog);

#[cfg(test)]
pub(crate) mod fixture;

#[cfg(test)]
mod tests {
    use {
        super::fixture::catalog,
        crate::{AccessLevel, ActionDefinition, Catalog, ResourceTypeDefinition, ServiceDefinition, SynthError},
        pretty_assertions::assert_eq,
        std::str::FromStr,
    };

    #[test_log::test]
    fn test_lookups() {
        let catalog = catalog();
        assert_eq!(
            catalog.services().map(|s| s.prefix()).collect::<Vec<_>>(),
            vec!["iam", "kms", "s3", "service-x", "ssm"]
        );
        assert_eq!(catalog.service("S3").unwrap().name(), "Amazon S3");
        assert_eq!(catalog.service("service-x").unwrap().name(), "service-x");

        let get_object = catalog.lookup_action("s3", "getobject").unwrap();
        assert_eq!(get_object.name(), "GetObject");
        assert_eq!(get_object.service(), "s3");
        assert_eq!(get_object.access_level(), AccessLevel::Read);

        assert!(catalog.actions_for("s3").unwrap().len() > 5);
        assert_eq!(catalog.resource_types_for("s3").unwrap().len(), 2);

        assert_eq!(catalog.lookup_qualified("ssm:GetParameter").unwrap().name(), "GetParameter");
        assert_eq!(catalog.lookup_qualified("ssm").unwrap_err(), SynthError::InvalidAction("ssm".to_string()));
    }

    #[test_log::test]
    fn test_unknown() {
        let catalog = catalog();
        assert_eq!(catalog.actions_for("nope").unwrap_err(), SynthError::UnknownService("nope".to_string()));
        assert_eq!(catalog.resource_types_for("nope").unwrap_err(), SynthError::UnknownService("nope".to_string()));
        assert_eq!(
            catalog.lookup_action("s3", "Frobnicate").unwrap_err(),
            SynthError::UnknownAction("s3:Frobnicate".to_string())
        );
    }

    #[test_log::test]
    fn test_specificity_order() {
        let catalog = catalog();
        let names: Vec<&str> =
            catalog.service("service-x").unwrap().resource_types_by_specificity().map(|rt| rt.name()).collect();
        assert_eq!(names, vec!["resource-type-a", "item"]);

        // Equally specific formats keep their declared order.
        let names: Vec<&str> =
            catalog.service("iam").unwrap().resource_types_by_specificity().map(|rt| rt.name()).collect();
        assert_eq!(names, vec!["user", "role", "policy"]);
    }

    #[test_log::test]
    fn test_from_services() {
        let catalog = Catalog::from_services(vec![ServiceDefinition::new("SQS")
            .with_name("Amazon SQS")
            .with_action(ActionDefinition::new("", "ListQueues", AccessLevel::List))
            .with_resource_type(ResourceTypeDefinition::new(
                "queue",
                "arn:${Partition}:sqs:${Region}:${Account}:${QueueName}",
                vec![],
            ))]);

        assert!(!catalog.is_empty());
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lookup_action("sqs", "ListQueues").unwrap().service(), "sqs");
    }

    #[test_log::test]
    fn test_extra_fields_ignored() {
        let catalog = Catalog::from_str(
            r#"{"s3": {
                "name": "Amazon S3",
                "service_authorization_url": "https://example.com/s3",
                "actions": [{"name": "A", "access_level": "Read", "description": "x"}],
                "resource_types": [{"name": "bucket", "arn_pattern": "arn:${Partition}:s3:::${BucketName}", "doc": 1}],
                "condition_keys": [{"name": "s3:prefix", "type": "String", "url": "https://example.com"}]
            }}"#,
        )
        .unwrap();

        assert_eq!(catalog.lookup_action("s3", "A").unwrap().access_level(), AccessLevel::Read);
        assert_eq!(catalog.service("s3").unwrap().resource_type("bucket").unwrap().name(), "bucket");
        assert!(catalog.service("s3").unwrap().condition_key("s3:prefix").is_some());
    }

    #[test_log::test]
    fn test_malformed_entries_skipped() {
        let catalog = Catalog::from_str(
            r#"{
                "svc": {"actions": [
                    {"name": "A", "access_level": "Read"},
                    {"name": "B", "access_level": "Unknown"},
                    {"access_level": "Write"}
                ], "resource_types": [{"name": "thing"}]},
                "other": {"actions": [{"name": "C", "access_level": "List"}]},
                "broken": {"actions": 7}
            }"#,
        )
        .unwrap();

        assert_eq!(catalog.services().map(|s| s.prefix()).collect::<Vec<_>>(), vec!["other", "svc"]);
        assert_eq!(catalog.actions_for("svc").unwrap().len(), 1);
        assert_eq!(catalog.lookup_action("svc", "A").unwrap().access_level(), AccessLevel::Read);
        assert_eq!(catalog.lookup_action("svc", "B").unwrap_err(), SynthError::UnknownAction("svc:B".to_string()));
        assert_eq!(catalog.lookup_action("other", "C").unwrap().access_level(), AccessLevel::List);
        assert!(catalog.resource_types_for("svc").unwrap().is_empty());
        assert_eq!(catalog.service("broken").unwrap_err(), SynthError::UnknownService("broken".to_string()));
    }

    #[test_log::test]
    fn test_unusable_resource_types() {
        let catalog = Catalog::from_str(
            r#"{"svc": {
                "actions": [
                    {"name": "DeleteWidget", "access_level": "Write", "resource_types": ["widget*"]},
                    {"name": "GetGadget", "access_level": "Read", "resource_types": ["gadget"]}
                ],
                "resource_types": [
                    {"name": "thing", "arn_pattern": "arn:${Partition}:svc:${Region}:${Account}:thing/${ThingId}"},
                    {"name": "gadget", "arn_pattern": "not-an-arn"}
                ]
            }}"#,
        )
        .unwrap();

        // Definitions load; the problems only show when they are used.
        let delete = catalog.lookup_action("svc", "DeleteWidget").unwrap();
        assert_eq!(delete.resource_types(), &["widget".to_string()]);
        assert!(catalog.service("svc").unwrap().resource_type("widget").is_none());
        assert!(!catalog.service("svc").unwrap().resource_type("gadget").unwrap().matcher().is_valid());
    }

    #[test_log::test]
    fn test_bad_json() {
        assert!(Catalog::from_str("{").is_err());
        assert!(Catalog::from_str("[]").is_err());
        assert!(Catalog::from_str("{}").unwrap().is_empty());
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Catalog>();
    }
}
