mod arn;

use {
    crate::{serutil::StringLikeList, SynthError},
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

pub use arn::ResourceArn;

pub type ResourceList = StringLikeList<Resource>;

/// One entry of a statement's `Resource` element.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Resource {
    Any,
    Arn(ResourceArn),
}

impl Resource {
    #[inline]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl From<ResourceArn> for Resource {
    fn from(arn: ResourceArn) -> Self {
        Self::Arn(arn)
    }
}

impl FromStr for Resource {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "*" {
            return Ok(Self::Any);
        }

        let arn = ResourceArn::from_str(s)?;
        Ok(Self::Arn(arn))
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Any => f.write_str("*"),
            Self::Arn(arn) => Display::fmt(arn, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        crate::{serutil::ListKind, Resource, ResourceArn, ResourceList, SynthError},
        indoc::indoc,
        pretty_assertions::{assert_eq, assert_ne},
        std::str::FromStr,
    };

    #[test_log::test]
    fn serialize_resource_list_star() {
        let resource_list: ResourceList = Resource::Any.into();
        assert_eq!(resource_list.kind(), ListKind::Single);
        assert_eq!(resource_list.to_string(), r#""*""#);
    }

    #[test_log::test]
    fn check_from() {
        let arn = ResourceArn::from_str("arn:aws:s3:::my-bucket/*").unwrap();
        let rl1: ResourceList = Resource::Arn(arn.clone()).into();
        let rl2: ResourceList = vec![Resource::from(arn.clone())].into();

        assert_eq!(rl1, rl2);
        assert_eq!(rl1.len(), 1);
        assert_eq!(rl2[0], Resource::Arn(arn));

        assert_eq!(rl1.to_string(), r#""arn:aws:s3:::my-bucket/*""#);
        assert_eq!(
            rl2.to_string(),
            indoc! { r#"
            [
                "arn:aws:s3:::my-bucket/*"
            ]"# }
        );
    }

    #[test_log::test]
    fn check_bad() {
        let e = Resource::from_str("arn:aws").unwrap_err();
        assert_eq!(e, SynthError::MalformedArn("arn:aws".to_string()));
    }

    #[test_log::test]
    fn check_derived() {
        let r1a = Resource::from_str("arn:aws:ec2:us-east-2:123456789012:instance/*").unwrap();
        let r1b = Resource::from_str("arn:aws:ec2:us-east-2:123456789012:instance/*").unwrap();
        let r2 = Resource::from_str("*").unwrap();

        assert_eq!(r1a, r1b);
        assert_ne!(r1a, r2);
        assert!(r2.is_any());
        assert!(!r1a.is_any());
        assert!(r2 < r1a);

        assert_eq!(r1a.to_string(), "arn:aws:ec2:us-east-2:123456789012:instance/*");
        assert_eq!(r2.to_string(), "*");
    }
}
