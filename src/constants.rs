// src/constants.rs
//! Domain constants that define the operational boundaries of the service.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role. Reading these constants should tell you the story
//! of how the service operates: how deep it walks, how much it fetches,
//! how much text it hands back.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// Protocol version sent in the `Notion-Version` header unless configured.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Base URL of the Notion REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.notion.com/v1";

/// How many children a single listing call asks for.
///
/// The Notion API maximum is 100. Listings are never continued with a
/// cursor, so this is also the widest any one parent can fan out.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Upper bound accepted for the database query page-size setting.
pub const NOTION_MAX_QUERY_PAGE_SIZE: usize = 100;

// ---------------------------------------------------------------------------
// Traversal budget defaults
// ---------------------------------------------------------------------------

/// Default ceiling on content nodes emitted by one tree fetch.
pub const DEFAULT_MAX_NODES: usize = 400;

/// Default deepest depth a content node may sit at (root children are depth 0).
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Default page size for database queries.
pub const DEFAULT_DB_PAGE_SIZE: usize = 50;

// ---------------------------------------------------------------------------
// Output boundaries
// ---------------------------------------------------------------------------

/// Maximum characters of assembled content text per target.
pub const CONTENT_TEXT_CAP: usize = 20_000;

/// Appended to content text that was cut at [`CONTENT_TEXT_CAP`].
pub const TRUNCATION_MARKER: &str = "\n…[truncated]";

/// Number of spaces per depth level in rendered content.
pub const INDENT_SPACES: usize = 2;

/// Estimated characters per rendered node, used to pre-allocate output strings.
pub const CHARS_PER_NODE_ESTIMATE: usize = 96;

/// Title used when a record carries no title property.
pub const UNTITLED: &str = "Untitled";

/// Property names conventionally holding a record's title, in lookup order.
pub const CONVENTIONAL_TITLE_NAMES: [&str; 4] = ["title", "Title", "Name", "name"];

// ---------------------------------------------------------------------------
// Request safety
// ---------------------------------------------------------------------------

/// Vocabulary whose presence in an inbound request signals write intent.
pub const WRITE_INTENT_VOCABULARY: [&str; 8] = [
    "commit", "create", "update", "delete", "append", "write", "remove", "insert",
];

/// Maximum number of targets accepted in one analyze request.
pub const MAX_TARGETS_PER_REQUEST: usize = 10;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters kept from an upstream error body.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 500;
