use serde_json::Value;
use std::fmt;

/// Discriminant of a block, as named by the store's `type` field.
///
/// Known kinds get their own variant; anything else is carried through
/// `Other` with its original tag so renderers can still name it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    BulletedListItem,
    NumberedListItem,
    ToDo,
    Toggle,
    Quote,
    Callout,
    Code,
    Divider,
    TableRow,
    ChildPage,
    ChildDatabase,
    Image,
    Video,
    File,
    Pdf,
    Audio,
    Bookmark,
    Embed,
    Equation,
    LinkToPage,
    Other(String),
}

impl BlockKind {
    pub fn from_discriminant(tag: &str) -> Self {
        match tag {
            "paragraph" => Self::Paragraph,
            "heading_1" => Self::Heading1,
            "heading_2" => Self::Heading2,
            "heading_3" => Self::Heading3,
            "bulleted_list_item" => Self::BulletedListItem,
            "numbered_list_item" => Self::NumberedListItem,
            "to_do" => Self::ToDo,
            "toggle" => Self::Toggle,
            "quote" => Self::Quote,
            "callout" => Self::Callout,
            "code" => Self::Code,
            "divider" => Self::Divider,
            "table_row" => Self::TableRow,
            "child_page" => Self::ChildPage,
            "child_database" => Self::ChildDatabase,
            "image" => Self::Image,
            "video" => Self::Video,
            "file" => Self::File,
            "pdf" => Self::Pdf,
            "audio" => Self::Audio,
            "bookmark" => Self::Bookmark,
            "embed" => Self::Embed,
            "equation" => Self::Equation,
            "link_to_page" => Self::LinkToPage,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Heading1 => "heading_1",
            Self::Heading2 => "heading_2",
            Self::Heading3 => "heading_3",
            Self::BulletedListItem => "bulleted_list_item",
            Self::NumberedListItem => "numbered_list_item",
            Self::ToDo => "to_do",
            Self::Toggle => "toggle",
            Self::Quote => "quote",
            Self::Callout => "callout",
            Self::Code => "code",
            Self::Divider => "divider",
            Self::TableRow => "table_row",
            Self::ChildPage => "child_page",
            Self::ChildDatabase => "child_database",
            Self::Image => "image",
            Self::Video => "video",
            Self::File => "file",
            Self::Pdf => "pdf",
            Self::Audio => "audio",
            Self::Bookmark => "bookmark",
            Self::Embed => "embed",
            Self::Equation => "equation",
            Self::LinkToPage => "link_to_page",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One block of fetched content, annotated with its depth in the walk.
///
/// Built only by the tree fetcher and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentNode {
    id: String,
    kind: BlockKind,
    depth: usize,
    has_children: bool,
    payload: Option<Value>,
}

impl ContentNode {
    /// Builds a node from a raw block object.
    ///
    /// The payload is the block's own sub-record, found under the key named
    /// by its `type`. A missing or `null` sub-record yields no payload.
    pub fn from_block(mut block: Value, depth: usize) -> Self {
        let tag = block
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let payload = block
            .get_mut(&tag)
            .map(Value::take)
            .filter(|p| !p.is_null());
        Self {
            id: block
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            kind: BlockKind::from_discriminant(&tag),
            depth,
            has_children: block
                .get("has_children")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            payload,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &BlockKind {
        &self.kind
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn has_children(&self) -> bool {
        self.has_children
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }
}
