use super::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use uuid::Uuid;

static NOTION_URL_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:[/-])([a-fA-F0-9]{32}|[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12})(?:[/?#]|$)",
    )
    .expect("Notion URL ID regex is valid")
});

static OPAQUE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("opaque ID regex is valid"));

/// Identifier of a page, database or block in the content store.
///
/// UUID-shaped input (dashed, undashed, or embedded in a Notion URL) is
/// canonicalized to 32 lowercase hex characters. Anything else must be a
/// short token of ASCII letters, digits, `-` or `_`: it is kept verbatim
/// and left for the store to accept or reject. Either way an ID can never
/// smuggle `/`, `?` or whitespace into a request path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NotionId(String);

impl NotionId {
    /// Returns the ID as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the hyphenated UUID format for API paths.
    pub fn to_hyphenated(&self) -> String {
        if self.is_uuid() {
            format!(
                "{}-{}-{}-{}-{}",
                &self.0[0..8],
                &self.0[8..12],
                &self.0[12..16],
                &self.0[16..20],
                &self.0[20..32]
            )
        } else {
            self.0.clone()
        }
    }

    fn is_uuid(&self) -> bool {
        self.0.len() == 32 && self.0.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Parses various Notion ID formats.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let cleaned = input.trim().trim_end_matches('/');

        if cleaned.is_empty() {
            return Err(ValidationError::InvalidId("ID is empty".to_string()));
        }

        if let Ok(uuid) = Uuid::parse_str(cleaned) {
            return Ok(NotionId(uuid.as_simple().to_string()));
        }

        if cleaned.starts_with("http://") || cleaned.starts_with("https://") {
            return Self::extract_from_url(cleaned);
        }

        if OPAQUE_ID.is_match(cleaned) {
            return Ok(NotionId(cleaned.to_string()));
        }

        Err(ValidationError::InvalidId(format!(
            "Could not parse Notion ID from: {}",
            input
        )))
    }

    /// Extracts ID from Notion URLs.
    fn extract_from_url(url: &str) -> Result<Self, ValidationError> {
        NOTION_URL_ID
            .captures(url)
            .and_then(|captures| captures.get(1))
            .map(|id| NotionId(id.as_str().replace('-', "").to_lowercase()))
            .ok_or_else(|| ValidationError::InvalidId(format!("No valid ID found in URL: {}", url)))
    }
}

impl fmt::Display for NotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
