use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

/// An uploaded statement, either a paginated PDF or a single still image.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementDocument {
    pub id: DocumentId,
    pub filename: String,
    pub content_type: ContentType,
    pub data: Vec<u8>,
}

impl StatementDocument {
    pub fn new(filename: String, content_type: ContentType, data: Vec<u8>) -> Self {
        Self {
            id: DocumentId::new(),
            filename,
            content_type,
            data,
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }
}

/// One page handed to the extraction capability on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDocument {
    pub index: usize,
    pub content_type: ContentType,
    pub data: Vec<u8>,
}

impl PageDocument {
    pub fn page_number(&self) -> usize {
        self.index + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Pdf,
    Png,
    Jpeg,
    Webp,
    Heic,
}

impl ContentType {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_lowercase().as_str() {
            "application/pdf" => Some(Self::Pdf),
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::Webp),
            "image/heic" => Some(Self::Heic),
            _ => None,
        }
    }

    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
            Self::Heic => "image/heic",
        }
    }

    pub fn is_image(&self) -> bool {
        !matches!(self, Self::Pdf)
    }
}
