use {
    crate::RequestFailure,
    std::{
        error::Error,
        fmt::{Display, Formatter, Result as FmtResult},
    },
};

#[derive(Debug, Eq, PartialEq)]
pub enum SynthError {
    /// The request produced no usable actions. Carries the per-item failures collected along the way, if any.
    EmptyPolicy(Vec<RequestFailure>),
    InvalidAction(String),
    MalformedArn(String),
    /// A request item named no access levels. Carries the ARN or `service:*` it was made for.
    NoAccessLevels(String),
    UnknownAccessLevel(String),
    UnknownAction(String),
    UnknownResourceType(String),
    UnknownService(String),
}

impl Display for SynthError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::EmptyPolicy(failures) if failures.is_empty() => f.write_str("Empty policy: no usable actions"),
            Self::EmptyPolicy(failures) => {
                write!(f, "Empty policy: no usable actions ({} request item(s) failed)", failures.len())
            }
            Self::InvalidAction(action) => write!(f, "Invalid action: {}", action),
            Self::MalformedArn(arn) => write!(f, "Malformed ARN: {}", arn),
            Self::NoAccessLevels(subject) => write!(f, "No access levels requested for {}", subject),
            Self::UnknownAccessLevel(level) => write!(f, "Unknown access level: {}", level),
            Self::UnknownAction(action) => write!(f, "Unknown action: {}", action),
            Self::UnknownResourceType(arn) => write!(f, "Unknown resource type: {}", arn),
            Self::UnknownService(service) => write!(f, "Unknown service: {}", service),
        }
    }
}

impl Error for SynthError {}
