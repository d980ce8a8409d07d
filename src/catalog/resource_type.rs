use {
    super::ArnPattern,
    serde::{Deserialize, Serialize},
};

/// A resource type within a service, e.g. S3's `object`, and the ARN format that identifies it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "ResourceTypeRecord")]
pub struct ResourceTypeDefinition {
    name: String,
    arn_pattern: String,
    condition_keys: Vec<String>,

    #[serde(skip_serializing)]
    matcher: ArnPattern,
}

#[derive(Deserialize)]
struct ResourceTypeRecord {
    name: String,
    arn_pattern: String,
    #[serde(default)]
    condition_keys: Vec<String>,
}

impl From<ResourceTypeRecord> for ResourceTypeDefinition {
    fn from(record: ResourceTypeRecord) -> Self {
        Self::new(record.name, record.arn_pattern, record.condition_keys)
    }
}

impl ResourceTypeDefinition {
    pub fn new<N: Into<String>, P: Into<String>>(name: N, arn_pattern: P, condition_keys: Vec<String>) -> Self {
        let arn_pattern = arn_pattern.into();
        Self {
            name: name.into(),
            matcher: ArnPattern::new(arn_pattern.clone()),
            arn_pattern,
            condition_keys,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw ARN format, placeholders included.
    #[inline]
    pub fn arn_pattern(&self) -> &str {
        &self.arn_pattern
    }

    #[inline]
    pub fn condition_keys(&self) -> &[String] {
        &self.condition_keys
    }

    #[inline]
    pub fn matcher(&self) -> &ArnPattern {
        &self.matcher
    }
}

/// A condition key published by a service.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ConditionKeyDefinition {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default, rename = "type")]
    value_type: String,
}

impl ConditionKeyDefinition {
    pub fn new<N: Into<String>, D: Into<String>, T: Into<String>>(name: N, description: D, value_type: T) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            value_type: value_type.into(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The value type as published, e.g. `String`, `ARN`, `Bool`, `ArrayOfString`.
    #[inline]
    pub fn value_type(&self) -> &str {
        &self.value_type
    }
}
