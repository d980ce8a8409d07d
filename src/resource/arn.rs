use {
    crate::SynthError,
    log::debug,
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

const PARTITION_START: usize = 4;

/// An Amazon Resource Name (ARN) split into its six colon-separated fields:
/// `arn:partition:service:region:account-id:resource`.
///
/// Only the field structure is checked; the resource field may itself contain colons and slashes, and any field
/// may hold wildcards (`arn:aws:s3:::my-bucket/*`) or catalog placeholders (`arn:${Partition}:s3:::${BucketName}`).
///
/// [ResourceArn] objects are immutable.
#[derive(Debug, Clone, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ResourceArn {
    arn: String,
    service_start: usize,
    region_start: usize,
    account_id_start: usize,
    resource_start: usize,
}

impl ResourceArn {
    /// Create a new ARN from the specified components.
    ///
    /// * `partition` - The partition the resource is in.
    /// * `service` - The service the resource belongs to.
    /// * `region` - The region the resource is in.
    /// * `account_id` - The account ID the resource belongs to.
    /// * `resource` - The resource name.
    pub fn new(partition: &str, service: &str, region: &str, account_id: &str, resource: &str) -> Self {
        let arn = format!("arn:{partition}:{service}:{region}:{account_id}:{resource}");
        let service_start = PARTITION_START + partition.len() + 1;
        let region_start = service_start + service.len() + 1;
        let account_id_start = region_start + region.len() + 1;
        let resource_start = account_id_start + account_id.len() + 1;

        Self {
            arn,
            service_start,
            region_start,
            account_id_start,
            resource_start,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.arn
    }

    #[inline]
    pub fn partition(&self) -> &str {
        &self.arn[PARTITION_START..self.service_start - 1]
    }

    #[inline]
    pub fn service(&self) -> &str {
        &self.arn[self.service_start..self.region_start - 1]
    }

    #[inline]
    pub fn region(&self) -> &str {
        &self.arn[self.region_start..self.account_id_start - 1]
    }

    #[inline]
    pub fn account_id(&self) -> &str {
        &self.arn[self.account_id_start..self.resource_start - 1]
    }

    #[inline]
    pub fn resource(&self) -> &str {
        &self.arn[self.resource_start..]
    }
}

impl FromStr for ResourceArn {
    type Err = SynthError;

    /// Parse an ARN, failing with [SynthError::MalformedArn] if it does not have the six-field shape, does not start
    /// with `arn`, or has an empty service or resource field.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(6, ':').collect();
        if parts.len() != 6 || parts[0] != "arn" || parts[2].is_empty() || parts[5].is_empty() {
            debug!("Failed to parse ARN: {}", s);
            return Err(SynthError::MalformedArn(s.to_string()));
        }

        let arn = s.to_string();
        let service_start = PARTITION_START + parts[1].len() + 1;
        let region_start = service_start + parts[2].len() + 1;
        let account_id_start = region_start + parts[3].len() + 1;
        let resource_start = account_id_start + parts[4].len() + 1;

        Ok(Self {
            arn,
            service_start,
            region_start,
            account_id_start,
            resource_start,
        })
    }
}

impl Display for ResourceArn {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.arn)
    }
}
