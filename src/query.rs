use {
    crate::{
        condition::condition_key_matches, AccessLevel, ActionDefinition, Catalog, ConditionKeyDefinition,
        ResourceTypeDefinition, ServiceDefinition, SynthError,
    },
    std::str::FromStr,
};

/// The service name that selects every service in [CatalogQuery::actions_with_access_level].
pub const ALL_SERVICES: &str = "all";

/// Read-only lookups over the catalog for reporting and inspection.
///
/// Action lists are returned as sorted `service:Name` strings.
#[derive(Clone, Copy, Debug)]
pub struct CatalogQuery<'a> {
    catalog: &'a Catalog,
}

impl<'a> CatalogQuery<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
        }
    }

    /// Every service prefix in the catalog.
    pub fn all_services(&self) -> Vec<&'a str> {
        self.catalog.services().map(|s| s.prefix()).collect()
    }

    pub fn actions_for_service(&self, service: &str) -> Result<Vec<String>, SynthError> {
        let service = self.catalog.service(service)?;
        Ok(qualified(service.actions().iter()))
    }

    /// Actions at an access level in one service, or in every service when `service` is `all`.
    pub fn actions_with_access_level(&self, service: &str, access_level: &str) -> Result<Vec<String>, SynthError> {
        let level = AccessLevel::from_str(access_level)?;
        let services: Vec<&ServiceDefinition> = if service.eq_ignore_ascii_case(ALL_SERVICES) {
            self.catalog.services().collect()
        } else {
            vec![self.catalog.service(service)?]
        };

        Ok(qualified(services.iter().flat_map(|s| s.actions()).filter(|a| a.access_level() == level)))
    }

    /// The access level of an action written as `service:Name`.
    pub fn access_level_of(&self, action: &str) -> Result<AccessLevel, SynthError> {
        Ok(self.catalog.lookup_qualified(action)?.access_level())
    }

    /// Actions of a service that can only be granted on `*`, optionally restricted to one access level.
    pub fn wildcard_only_actions(&self, service: &str, access_level: Option<&str>) -> Result<Vec<String>, SynthError> {
        let level = access_level.map(AccessLevel::from_str).transpose()?;
        let service = self.catalog.service(service)?;
        Ok(qualified(
            service
                .actions()
                .iter()
                .filter(|a| a.is_wildcard_only())
                .filter(|a| level.map(|l| a.access_level() == l).unwrap_or(true)),
        ))
    }

    /// Actions of a service that support a condition key.
    pub fn actions_with_condition_key(&self, service: &str, key: &str) -> Result<Vec<String>, SynthError> {
        let service = self.catalog.service(service)?;
        Ok(qualified(
            service.actions().iter().filter(|a| a.condition_keys().iter().any(|ck| condition_key_matches(ck, key))),
        ))
    }

    pub fn action_details(&self, service: &str, action: &str) -> Result<&'a ActionDefinition, SynthError> {
        self.catalog.lookup_action(service, action)
    }

    /// The condition keys an action supports directly, written as `service:Name`.
    pub fn condition_keys_for_action(&self, action: &str) -> Result<&'a [String], SynthError> {
        Ok(self.catalog.lookup_qualified(action)?.condition_keys())
    }

    pub fn resource_types_for_service(&self, service: &str) -> Result<Vec<&'a str>, SynthError> {
        Ok(self.catalog.resource_types_for(service)?.iter().map(|rt| rt.name()).collect())
    }

    /// The raw ARN formats of a service's resource types, placeholders included.
    pub fn raw_arns_for_service(&self, service: &str) -> Result<Vec<&'a str>, SynthError> {
        Ok(self.catalog.resource_types_for(service)?.iter().map(|rt| rt.arn_pattern()).collect())
    }

    pub fn resource_type_details(
        &self,
        service: &str,
        resource_type: &str,
    ) -> Result<&'a ResourceTypeDefinition, SynthError> {
        self.catalog
            .service(service)?
            .resource_type(resource_type)
            .ok_or_else(|| SynthError::UnknownResourceType(format!("{service}:{resource_type}")))
    }

    pub fn condition_keys_for_service(&self, service: &str) -> Result<Vec<&'a str>, SynthError> {
        Ok(self.catalog.service(service)?.condition_keys().iter().map(|ck| ck.name()).collect())
    }

    /// Details of a service condition key, or `None` if the service does not publish it.
    pub fn condition_key_details(
        &self,
        service: &str,
        key: &str,
    ) -> Result<Option<&'a ConditionKeyDefinition>, SynthError> {
        Ok(self.catalog.service(service)?.condition_key(key))
    }
}

fn qualified<'b, I: Iterator<Item = &'b ActionDefinition>>(actions: I) -> Vec<String> {
    let mut result: Vec<String> = actions.map(|a| a.qualified_name()).collect();
    result.sort();
    result.dedup();
    result
}
