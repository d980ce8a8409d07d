use {
    crate::SynthError,
    log::debug,
    serde::{
        de::{self, Deserializer, Visitor},
        ser::Serializer,
        Deserialize, Serialize,
    },
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// The coarse category of an API action's effect, as published in the service authorization reference.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum AccessLevel {
    List,
    PermissionsManagement,
    Read,
    Tagging,
    Write,
}

impl AccessLevel {
    pub const ALL: [AccessLevel; 5] =
        [Self::Read, Self::Write, Self::List, Self::Tagging, Self::PermissionsManagement];

    /// The name as it appears in the upstream documentation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "List",
            Self::PermissionsManagement => "Permissions management",
            Self::Read => "Read",
            Self::Tagging => "Tagging",
            Self::Write => "Write",
        }
    }
}

impl Display for AccessLevel {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = SynthError;

    /// Parse an access level, ignoring case and separators, so `Read`, `read`, `Permissions management`,
    /// `permissions-management` and `PermissionsManagement` are all accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String =
            s.chars().filter(|c| c.is_ascii_alphanumeric()).map(|c| c.to_ascii_lowercase()).collect();
        match normalized.as_str() {
            "list" => Ok(Self::List),
            "permissionsmanagement" => Ok(Self::PermissionsManagement),
            "read" => Ok(Self::Read),
            "tagging" => Ok(Self::Tagging),
            "write" => Ok(Self::Write),
            _ => {
                debug!("Unrecognized access level: {:?}", s);
                Err(SynthError::UnknownAccessLevel(s.to_string()))
            }
        }
    }
}

struct AccessLevelVisitor;

impl<'de> Visitor<'de> for AccessLevelVisitor {
    type Value = AccessLevel;

    fn expecting(&self, f: &mut Formatter) -> FmtResult {
        f.write_str("an access level (Read, Write, List, Tagging, Permissions management)")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        AccessLevel::from_str(v).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for AccessLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(AccessLevelVisitor)
    }
}

impl Serialize for AccessLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
