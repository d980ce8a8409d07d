use {
    crate::SynthError,
    log::debug,
    serde::{ser::Serializer, Serialize},
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// A `service:Action` entry of a statement's `Action` element.
///
/// The action part may end in `*` when a statement has been minimized to action-name prefixes.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Action {
    service: String,
    action: String,
}

impl Action {
    pub fn new<S: Into<String>, A: Into<String>>(service: S, action: A) -> Result<Self, SynthError> {
        let service = service.into();
        let action = action.into();

        if service.is_empty() {
            debug!("Action '{service}:{action}' has an empty service.");
            return Err(SynthError::InvalidAction(format!("{}:{}", service, action)));
        }

        if action.is_empty() {
            debug!("Action '{service}:{action}' has an empty action.");
            return Err(SynthError::InvalidAction(format!("{}:{}", service, action)));
        }

        if !service.is_ascii() || !action.is_ascii() {
            debug!("Action '{service}:{action}' is not ASCII.");
            return Err(SynthError::InvalidAction(format!("{}:{}", service, action)));
        }

        for (i, c) in service.bytes().enumerate() {
            if !c.is_ascii_alphanumeric() && !(i > 0 && i < service.len() - 1 && (c == b'-' || c == b'_')) {
                debug!("Action '{service}:{action}' has an invalid service.");
                return Err(SynthError::InvalidAction(format!("{}:{}", service, action)));
            }
        }

        for (i, c) in action.bytes().enumerate() {
            if !c.is_ascii_alphanumeric() && c != b'*' && !(i > 0 && i < action.len() - 1 && (c == b'-' || c == b'_')) {
                debug!("Action '{service}:{action}' has an invalid action.");
                return Err(SynthError::InvalidAction(format!("{}:{}", service, action)));
            }
        }

        Ok(Self {
            service,
            action,
        })
    }

    #[inline]
    pub fn service(&self) -> &str {
        &self.service
    }

    #[inline]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Whether this entry names a family of actions (`s3:Get*`) rather than a single action.
    #[inline]
    pub fn is_prefix(&self) -> bool {
        self.action.ends_with('*')
    }
}

impl FromStr for Action {
    type Err = SynthError;

    fn from_str(v: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = v.split(':').collect();
        if parts.len() != 2 {
            debug!("Action '{v}' is not of the form service:action.");
            return Err(SynthError::InvalidAction(v.to_string()));
        }

        Action::new(parts[0], parts[1])
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}:{}", self.service, self.action)
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
