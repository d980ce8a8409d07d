use {
    crate::{Catalog, ResourceArn, SynthError},
    log::{debug, trace},
    std::str::FromStr,
};

/// An ARN matched to the catalog resource type it identifies.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ResolvedResource {
    service: String,
    resource_type: String,
    arn: ResourceArn,
}

impl ResolvedResource {
    pub fn new<S: Into<String>, T: Into<String>>(service: S, resource_type: T, arn: ResourceArn) -> Self {
        Self {
            service: service.into(),
            resource_type: resource_type.into(),
            arn,
        }
    }

    #[inline]
    pub fn service(&self) -> &str {
        &self.service
    }

    #[inline]
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// The ARN to place in a statement's `Resource` element.
    #[inline]
    pub fn arn(&self) -> &str {
        self.arn.as_str()
    }

    #[inline]
    pub fn resource_arn(&self) -> &ResourceArn {
        &self.arn
    }
}

/// Resolves ARNs to catalog resource types.
#[derive(Clone, Copy, Debug)]
pub struct ArnResolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> ArnResolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
        }
    }

    /// Resolve an ARN to the most specific resource type whose ARN format matches it. The service field is matched
    /// without regard to case and is written in lowercase in the resolved ARN.
    ///
    /// # Errors
    /// * `MalformedArn` if the string is not `arn:partition:service:region:account:resource`.
    /// * `UnknownService` if the service is not in the catalog.
    /// * `UnknownResourceType` if no resource type of the service matches.
    pub fn resolve(&self, arn: &str) -> Result<ResolvedResource, SynthError> {
        let parsed = ResourceArn::from_str(arn)?;
        let service = self.catalog.service(parsed.service())?;
        let parsed = if parsed.service() == service.prefix() {
            parsed
        } else {
            let (partition, region, account_id) = (parsed.partition(), parsed.region(), parsed.account_id());
            ResourceArn::new(partition, service.prefix(), region, account_id, parsed.resource())
        };

        for resource_type in service.resource_types_by_specificity() {
            if resource_type.matcher().is_match(parsed.as_str()) {
                trace!("{arn} resolved to {}:{}", service.prefix(), resource_type.name());
                return Ok(ResolvedResource::new(service.prefix(), resource_type.name(), parsed));
            }
        }

        debug!("{arn} matches no resource type of service {}", service.prefix());
        Err(SynthError::UnknownResourceType(arn.to_string()))
    }
}
