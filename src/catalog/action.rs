use {
    crate::{AccessLevel, Action, SynthError},
    serde::{Deserialize, Serialize},
    std::str::FromStr,
};

/// One API action of a service, with the access level and resource types published for it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "ActionRecord")]
pub struct ActionDefinition {
    service: String,
    name: String,
    access_level: AccessLevel,
    resource_types: Vec<String>,
    condition_keys: Vec<String>,
    dependent_actions: Vec<String>,
}

// Upstream records carry extra fields such as `description`; they are ignored.
#[derive(Deserialize)]
struct ActionRecord {
    name: String,
    access_level: String,
    #[serde(default)]
    resource_types: Vec<String>,
    #[serde(default)]
    condition_keys: Vec<String>,
    #[serde(default)]
    dependent_actions: Vec<String>,
}

impl TryFrom<ActionRecord> for ActionDefinition {
    type Error = SynthError;

    fn try_from(record: ActionRecord) -> Result<Self, Self::Error> {
        let access_level = AccessLevel::from_str(&record.access_level)?;

        // The service prefix is the key the action is filed under; the catalog fills it in.
        Ok(Self::new("", record.name, access_level)
            .with_resource_types(record.resource_types)
            .with_condition_keys(record.condition_keys)
            .with_dependent_actions(record.dependent_actions))
    }
}

impl ActionDefinition {
    pub fn new<S: Into<String>, N: Into<String>>(service: S, name: N, access_level: AccessLevel) -> Self {
        Self {
            service: service.into().to_ascii_lowercase(),
            name: name.into(),
            access_level,
            resource_types: Vec::new(),
            condition_keys: Vec::new(),
            dependent_actions: Vec::new(),
        }
    }

    /// Set the resource types. Upstream marks required resource types with a trailing `*`; the marker is dropped.
    /// Empty names are ignored.
    pub fn with_resource_types(mut self, resource_types: Vec<String>) -> Self {
        self.resource_types = resource_types
            .into_iter()
            .map(|rt| rt.trim_end_matches('*').to_string())
            .filter(|rt| !rt.is_empty())
            .collect();
        self
    }

    pub fn with_condition_keys(mut self, condition_keys: Vec<String>) -> Self {
        self.condition_keys = condition_keys;
        self
    }

    /// Set the dependent actions, written as `service:Action`.
    pub fn with_dependent_actions(mut self, dependent_actions: Vec<String>) -> Self {
        self.dependent_actions = dependent_actions;
        self
    }

    pub(crate) fn set_service(&mut self, service: &str) {
        self.service = service.to_ascii_lowercase();
    }

    #[inline]
    pub fn service(&self) -> &str {
        &self.service
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    #[inline]
    pub fn resource_types(&self) -> &[String] {
        &self.resource_types
    }

    #[inline]
    pub fn condition_keys(&self) -> &[String] {
        &self.condition_keys
    }

    #[inline]
    pub fn dependent_actions(&self) -> &[String] {
        &self.dependent_actions
    }

    /// Whether the action can only be granted on the `*` resource.
    #[inline]
    pub fn is_wildcard_only(&self) -> bool {
        self.resource_types.is_empty()
    }

    pub fn supports_resource_type(&self, resource_type: &str) -> bool {
        self.resource_types.iter().any(|rt| rt.eq_ignore_ascii_case(resource_type))
    }

    /// The action as it appears in a policy statement, e.g. `s3:GetObject`.
    pub fn to_action(&self) -> Result<Action, SynthError> {
        Action::new(self.service.as_str(), self.name.as_str())
    }

    /// The qualified name, `service:Name`.
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.service, self.name)
    }
}
