use {
    lazy_static::lazy_static,
    log::{debug, trace},
    regex::Regex,
    std::fmt::{Display, Formatter, Result as FmtResult},
};

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\$\{[^}]*\}").unwrap();
}

/// Matches any value in a partition, region, or account field.
const FIELD_PLACEHOLDER: &str = "[^:]*";

/// Matches a single resource segment.
const SEGMENT_PLACEHOLDER: &str = "[^/:]+";

/// Matches the remainder of a resource, slashes included (IAM paths, SSM parameter hierarchies, S3 keys).
const TRAILING_PLACEHOLDER: &str = ".+";

/// A resource-type ARN format such as `arn:${Partition}:s3:::${BucketName}/${ObjectName}`, compiled into a matcher.
///
/// The resource part is split into segments on `/` and `:`. Each `${...}` placeholder matches within one segment,
/// except that a placeholder forming the whole final segment (after at least one other segment) absorbs the rest
/// of the ARN. A format that is not a 6-part ARN never matches anything.
#[derive(Clone, Debug)]
pub struct ArnPattern {
    raw: String,
    regex: Option<Regex>,
    specificity: usize,
}

impl ArnPattern {
    pub fn new<S: Into<String>>(raw: S) -> Self {
        let raw = raw.into();
        match compile(&raw) {
            Some((regex, specificity)) => Self {
                raw,
                regex: Some(regex),
                specificity,
            },
            None => {
                debug!("ARN format {raw:?} cannot be compiled; it will never match");
                Self {
                    raw,
                    regex: None,
                    specificity: 0,
                }
            }
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The number of literal resource segments before the first placeholder. Higher is more specific.
    #[inline]
    pub fn specificity(&self) -> usize {
        self.specificity
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }

    pub fn is_match(&self, arn: &str) -> bool {
        let result = match &self.regex {
            Some(regex) => regex.is_match(arn),
            None => false,
        };
        trace!("ARN format {} vs {arn}: {result}", self.raw);
        result
    }
}

impl Display for ArnPattern {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.write_str(&self.raw)
    }
}

impl PartialEq for ArnPattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for ArnPattern {}

fn compile(raw: &str) -> Option<(Regex, usize)> {
    let parts: Vec<&str> = raw.splitn(6, ':').collect();
    if parts.len() != 6 || parts[0] != "arn" || parts[2].is_empty() || parts[5].is_empty() {
        return None;
    }

    let mut expr = String::from("^arn");
    for field in &parts[1..5] {
        expr.push(':');
        if field.is_empty() {
            // Resources without a region or account are written with an empty field, occasionally as `*`.
            expr.push_str(r"\*?");
        } else {
            expr.push_str(&translate(field, FIELD_PLACEHOLDER));
        }
    }
    expr.push(':');

    let segments = split_segments(parts[5]);
    let specificity = segments.iter().take_while(|(segment, _)| !PLACEHOLDER.is_match(segment)).count();
    let last = segments.len() - 1;

    for (i, (segment, separator)) in segments.iter().enumerate() {
        if i == last && i > 0 && is_whole_placeholder(segment) {
            expr.push_str(TRAILING_PLACEHOLDER);
        } else {
            expr.push_str(&translate(segment, SEGMENT_PLACEHOLDER));
        }

        if let Some(separator) = separator {
            expr.push_str(&regex::escape(&separator.to_string()));
        }
    }
    expr.push('$');

    match Regex::new(&expr) {
        Ok(regex) => Some((regex, specificity)),
        Err(e) => {
            debug!("ARN format {raw:?} produced an invalid expression {expr:?}: {e}");
            None
        }
    }
}

/// Split a resource part into segments, each paired with the separator that follows it.
fn split_segments(resource: &str) -> Vec<(&str, Option<char>)> {
    let mut segments = Vec::new();
    let mut start = 0;
    for (i, c) in resource.char_indices() {
        if c == '/' || c == ':' {
            segments.push((&resource[start..i], Some(c)));
            start = i + 1;
        }
    }
    segments.push((&resource[start..], None));
    segments
}

fn is_whole_placeholder(segment: &str) -> bool {
    PLACEHOLDER.find(segment).map(|m| m.start() == 0 && m.end() == segment.len()).unwrap_or(false)
}

/// Escape the literal parts of `text` and replace each placeholder with `replacement`.
fn translate(text: &str, replacement: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;
    for m in PLACEHOLDER.find_iter(text) {
        result.push_str(&regex::escape(&text[last..m.start()]));
        result.push_str(replacement);
        last = m.end();
    }
    result.push_str(&regex::escape(&text[last..]));
    result
}
