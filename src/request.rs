use {
    crate::{from_str_json, AccessLevel},
    serde::{Deserialize, Serialize},
    std::{
        collections::BTreeMap,
        fmt::{Display, Formatter, Result as FmtResult},
    },
};

/// One item of a synthesis job.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AccessRequest {
    /// Grant the given access levels on a resource.
    Arn {
        arn: String,
        access_levels: Vec<String>,
    },

    /// Grant specific actions of a service, written either as `Name` or `service:Name`.
    Actions {
        service: String,
        actions: Vec<String>,
    },

    /// Grant every wildcard-only action of a service at the given access levels.
    ServiceWildcard {
        service: String,
        wildcard_access_levels: Vec<String>,
    },

    /// Grant specific actions on `*`, written as `service:Name`. Only actions that cannot be resource-scoped are
    /// granted.
    WildcardOnly {
        wildcard_only_actions: Vec<String>,
    },
}

impl AccessRequest {
    pub fn arn<A: Into<String>, L: ToString>(arn: A, access_levels: &[L]) -> Self {
        Self::Arn {
            arn: arn.into(),
            access_levels: access_levels.iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn actions<S: Into<String>, A: ToString>(service: S, actions: &[A]) -> Self {
        Self::Actions {
            service: service.into(),
            actions: actions.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn service_wildcard<S: Into<String>, L: ToString>(service: S, access_levels: &[L]) -> Self {
        Self::ServiceWildcard {
            service: service.into(),
            wildcard_access_levels: access_levels.iter().map(|l| l.to_string()).collect(),
        }
    }

    pub fn wildcard_only<A: ToString>(actions: &[A]) -> Self {
        Self::WildcardOnly {
            wildcard_only_actions: actions.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl Display for AccessRequest {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Arn {
                arn,
                access_levels,
            } => write!(f, "{arn} ({})", access_levels.join(", ")),
            Self::Actions {
                service,
                actions,
            } => write!(f, "{service}: {}", actions.join(", ")),
            Self::ServiceWildcard {
                service,
                wildcard_access_levels,
            } => write!(f, "{service}:* ({})", wildcard_access_levels.join(", ")),
            Self::WildcardOnly {
                wildcard_only_actions,
            } => f.write_str(&wildcard_only_actions.join(", ")),
        }
    }
}

/// A request template.
///
/// CRUD mode lists ARNs per access level plus wildcard-only actions; actions mode lists `service:Name` actions.
/// Empty strings, left behind when a template is scaffolded and only partially filled in, are ignored.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum Template {
    Crud(CrudTemplate),
    Actions(ActionsTemplate),
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct CrudTemplate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub read: Vec<String>,
    #[serde(default)]
    pub write: Vec<String>,
    #[serde(default)]
    pub list: Vec<String>,
    #[serde(default)]
    pub tagging: Vec<String>,
    #[serde(default)]
    pub permissions_management: Vec<String>,
    #[serde(default)]
    pub wildcard_only: WildcardOnlySection,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct WildcardOnlySection {
    #[serde(default)]
    pub single_actions: Vec<String>,
    #[serde(default)]
    pub service_read: Vec<String>,
    #[serde(default)]
    pub service_write: Vec<String>,
    #[serde(default)]
    pub service_list: Vec<String>,
    #[serde(default)]
    pub service_tagging: Vec<String>,
    #[serde(default)]
    pub service_permissions_management: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ActionsTemplate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub actions: Vec<String>,
}

impl Template {
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Crud(t) => t.name.as_deref(),
            Self::Actions(t) => t.name.as_deref(),
        }
    }

    /// Convert the template to request items.
    pub fn requests(&self) -> Vec<AccessRequest> {
        match self {
            Self::Crud(t) => t.requests(),
            Self::Actions(t) => t.requests(),
        }
    }
}

from_str_json!(Template);

impl CrudTemplate {
    pub fn requests(&self) -> Vec<AccessRequest> {
        let mut result = Vec::new();
        let by_level = [
            (AccessLevel::Read, &self.read),
            (AccessLevel::Write, &self.write),
            (AccessLevel::List, &self.list),
            (AccessLevel::Tagging, &self.tagging),
            (AccessLevel::PermissionsManagement, &self.permissions_management),
        ];

        for (level, arns) in by_level {
            for arn in non_empty(arns) {
                result.push(AccessRequest::arn(arn, &[level]));
            }
        }

        let wildcard = &self.wildcard_only;
        let single_actions: Vec<&str> = non_empty(&wildcard.single_actions).collect();
        if !single_actions.is_empty() {
            result.push(AccessRequest::wildcard_only(&single_actions));
        }

        let services_by_level = [
            (AccessLevel::Read, &wildcard.service_read),
            (AccessLevel::Write, &wildcard.service_write),
            (AccessLevel::List, &wildcard.service_list),
            (AccessLevel::Tagging, &wildcard.service_tagging),
            (AccessLevel::PermissionsManagement, &wildcard.service_permissions_management),
        ];

        for (level, services) in services_by_level {
            for service in non_empty(services) {
                result.push(AccessRequest::service_wildcard(service, &[level]));
            }
        }

        result
    }
}

impl ActionsTemplate {
    /// One request per service. Entries without a `service:` prefix are passed through unchanged so that synthesis
    /// can report them.
    pub fn requests(&self) -> Vec<AccessRequest> {
        let mut by_service: BTreeMap<String, Vec<&str>> = BTreeMap::new();
        for action in non_empty(&self.actions) {
            let service = match action.split_once(':') {
                Some((service, _)) => service.to_ascii_lowercase(),
                None => String::new(),
            };
            by_service.entry(service).or_default().push(action);
        }

        by_service.into_iter().map(|(service, actions)| AccessRequest::actions(service, &actions)).collect()
    }
}

fn non_empty(entries: &[String]) -> impl Iterator<Item = &str> {
    entries.iter().map(|e| e.trim()).filter(|e| !e.is_empty())
}
