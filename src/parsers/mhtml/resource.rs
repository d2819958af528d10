//! Archive resources and the maps that address them

use std::collections::HashMap;

use crate::core::{is_document_media_type, is_plaintext_media_type, is_stylesheet_media_type};
use crate::utils::url::create_data_url;

use super::headers::Headers;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferEncoding {
    Base64,
    QuotedPrintable,
    SevenBit,
    EightBit,
    Binary,
}

impl TransferEncoding {
    pub fn from_header(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "base64" => Some(TransferEncoding::Base64),
            "quoted-printable" => Some(TransferEncoding::QuotedPrintable),
            "7bit" => Some(TransferEncoding::SevenBit),
            "8bit" => Some(TransferEncoding::EightBit),
            "binary" => Some(TransferEncoding::Binary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferEncoding::Base64 => "base64",
            TransferEncoding::QuotedPrintable => "quoted-printable",
            TransferEncoding::SevenBit => "7bit",
            TransferEncoding::EightBit => "8bit",
            TransferEncoding::Binary => "binary",
        }
    }
}

/// Payload of a resource once transfer decoding is done
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceData {
    /// Decoded into UTF-8 text
    Text(String),
    /// Raw bytes of a non-textual resource
    Binary(Vec<u8>),
}

impl ResourceData {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            ResourceData::Text(text) => text.as_bytes(),
            ResourceData::Binary(bytes) => bytes,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResourceData::Text(text) => Some(text),
            ResourceData::Binary(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resource {
    /// `Content-Location` of the part, or a synthetic `_…` id
    pub id: String,
    pub content_type: String,
    pub transfer_encoding: Option<TransferEncoding>,
    pub data: ResourceData,
    /// Set once the resource has been inlined somewhere
    pub used: bool,
}

impl Resource {
    pub fn new(id: &str, content_type: &str, data: ResourceData) -> Self {
        Resource {
            id: id.to_string(),
            content_type: content_type.to_string(),
            transfer_encoding: None,
            data,
            used: false,
        }
    }

    /// Media type without parameters, lowercased
    pub fn media_type(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }

    pub fn is_document(&self) -> bool {
        is_document_media_type(&self.media_type())
    }

    pub fn is_stylesheet(&self) -> bool {
        is_stylesheet_media_type(&self.media_type())
    }

    pub fn is_text(&self) -> bool {
        is_plaintext_media_type(&self.media_type())
    }

    /// Text content, lossily decoded for binary payloads
    pub fn text(&self) -> String {
        match &self.data {
            ResourceData::Text(text) => text.clone(),
            ResourceData::Binary(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    pub fn to_data_url(&self) -> String {
        create_data_url(&self.content_type, self.data.as_bytes())
    }
}

/// Index of a resource inside a [`ResourceMap`]
pub type ResourceKey = usize;

/// Resources of an archive, addressable by location and by Content-ID
///
/// Every part gets an entry. Locations and Content-IDs are registered on a
/// first-come basis, so a later duplicate stays reachable only through its own
/// Content-ID, if any.
#[derive(Clone, Debug, Default)]
pub struct ResourceMap {
    entries: Vec<Resource>,
    by_location: HashMap<String, ResourceKey>,
    by_content_id: HashMap<String, ResourceKey>,
}

impl ResourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, resource: Resource, content_id: Option<&str>) -> ResourceKey {
        let key = self.entries.len();
        self.by_location.entry(resource.id.clone()).or_insert(key);
        if let Some(content_id) = content_id {
            self.by_content_id
                .entry(content_id.trim().to_string())
                .or_insert(key);
        }
        self.entries.push(resource);
        key
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_location.contains_key(id)
    }

    pub fn find(&self, id: &str) -> Option<ResourceKey> {
        self.by_location.get(id).copied()
    }

    /// Looks up the resolved id first, then the reference as written
    pub fn lookup(&self, resolved_id: &str, raw_id: &str) -> Option<ResourceKey> {
        self.find(resolved_id).or_else(|| self.find(raw_id.trim()))
    }

    /// Looks up a frame part by its bracketed Content-ID (`<…>`)
    pub fn frame(&self, content_id: &str) -> Option<ResourceKey> {
        self.by_content_id.get(content_id).copied()
    }

    pub fn get(&self, key: ResourceKey) -> Option<&Resource> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: ResourceKey) -> Option<&mut Resource> {
        self.entries.get_mut(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.entries.iter()
    }

    /// Resources that no conversion has inlined so far
    pub fn unused(&self) -> Vec<&Resource> {
        self.entries.iter().filter(|resource| !resource.used).collect()
    }
}

/// A parsed archive
#[derive(Clone, Debug, Default)]
pub struct Mhtml {
    /// Top-level headers (Subject, Date, From, Content-Type…)
    pub headers: Headers,
    pub resources: ResourceMap,
    /// Id of the root document
    pub index: Option<String>,
}

impl Mhtml {
    pub fn index_key(&self) -> Option<ResourceKey> {
        self.index.as_deref().and_then(|index| self.resources.find(index))
    }
}
