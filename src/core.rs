use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use markup5ever_rcdom::RcDom;
use thiserror::Error;
use tracing::debug;

use crate::network::fetch::convert_with_fetch;
use crate::network::session::Session;
use crate::parsers::css::RewriteState;
use crate::parsers::html::metadata::{
    ensure_canonical_link, insert_page_info, remove_alternate_stylesheets, remove_meta_refresh,
    remove_resource_hints, remove_scripts, set_content_security_policy, set_utf8_charset,
    take_base_href,
};
use crate::parsers::html::{
    collect_favicons, get_title, html_to_dom, serialize_document, walk, DocumentContext,
};
use crate::parsers::mhtml::{
    parse, Headers, Mhtml, Resource, ResourceKey, ResourceMap, TransferEncoding,
};
use crate::utils::url::{
    base_for, content_id_from_cid_url, is_http_url, resolve_path, Url, CID_PROTOCOL,
};

/// Errors surfacing from a conversion
#[derive(Debug, Error)]
pub enum MhtmlError {
    #[error("Index page not found ({0})")]
    IndexNotFound(String),

    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("failed to fetch {url}: HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("frame cycle detected at {0}")]
    FrameCycle(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),
}

pub type Result<T> = std::result::Result<T, MhtmlError>;

/// Conversion settings
#[derive(Clone, Debug)]
pub struct MhtmlOptions {
    /// Keep scripts and event handlers, and allow them in the security policy
    pub enable_scripts: bool,
    /// Fetch http(s) resources the archive lacks before converting
    pub fetch_missing_resources: bool,
    /// Accept invalid TLS certificates when fetching
    pub insecure: bool,
    /// Fetch timeout in seconds
    pub timeout: u64,
    pub user_agent: Option<String>,
}

impl Default for MhtmlOptions {
    fn default() -> Self {
        MhtmlOptions {
            enable_scripts: false,
            fetch_missing_resources: false,
            insecure: false,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }
}

pub const DEFAULT_TIMEOUT: u64 = 60;

/// A `<link rel~=icon>` of the converted document
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Favicon {
    pub href: String,
    /// `href` before inlining
    pub original_href: Option<String>,
    pub media: Option<String>,
    /// Value of the `type` attribute
    pub content_type: Option<String>,
    pub sizes: Option<String>,
}

/// Result of a conversion
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageData {
    /// The standalone HTML document
    pub data: String,
    pub title: Option<String>,
    pub favicons: Vec<Favicon>,
}

/// An absolute http(s) reference the archive does not provide
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingResource {
    pub id: String,
    /// `Base64` when the reference expects binary content
    pub transfer_encoding: Option<TransferEncoding>,
}

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";
// `.` matches any byte
const FILE_SIGNATURES: [[&[u8]; 2]; 18] = [
    // Image
    [b"GIF87a", b"image/gif"],
    [b"GIF89a", b"image/gif"],
    [b"\xFF\xD8\xFF", b"image/jpeg"],
    [b"\x89PNG\x0D\x0A\x1A\x0A", b"image/png"],
    [b"<svg ", b"image/svg+xml"],
    [b"RIFF....WEBPVP8", b"image/webp"],
    [b"\x00\x00\x01\x00", b"image/x-icon"],
    // Audio
    [b"ID3", b"audio/mpeg"],
    [b"\xFF\xFB", b"audio/mpeg"],
    [b"\xFF\xF3", b"audio/mpeg"],
    [b"OggS", b"audio/ogg"],
    [b"RIFF....WAVEfmt ", b"audio/wav"],
    [b"fLaC", b"audio/x-flac"],
    // Video
    [b"RIFF....AVI LIST", b"video/avi"],
    [b"....ftyp", b"video/mp4"],
    [b"\x00\x00\x01\xBA", b"video/mpeg"],
    [b"....moov", b"video/quicktime"],
    [b"\x1A\x45\xDF\xA3", b"video/webm"],
];
// All known non-"text/..." plaintext media types
const PLAINTEXT_MEDIA_TYPES: &[&str] = &[
    "application/javascript",          // .js
    "application/json",                // .json
    "application/ld+json",             // .jsonld
    "application/x-sh",                // .sh
    "application/xhtml+xml",           // .xhtml
    "application/xml",                 // .xml
    "application/vnd.mozilla.xul+xml", // .xul
    "image/svg+xml",                   // .svg
];

/// Rewrites the documents of one archive
///
/// A converter lives for one conversion pass. It owns the stylesheet memo, the
/// list of missing resources and the stack of documents being converted, which
/// turns `<iframe>`/`<frame>` cycles into [`MhtmlError::FrameCycle`].
///
/// In a dry run nothing is inlined and the output is empty: the pass only
/// collects [`MissingResource`]s.
pub struct Converter<'a> {
    options: &'a MhtmlOptions,
    resources: &'a mut ResourceMap,
    headers: &'a Headers,
    index: Option<String>,
    dry_run: bool,
    stylesheets: HashMap<String, RewriteState>,
    missing: Vec<MissingResource>,
    frame_stack: Vec<ResourceKey>,
    parsed_stylesheets: usize,
}

impl<'a> Converter<'a> {
    pub fn new(mhtml: &'a mut Mhtml, options: &'a MhtmlOptions) -> Self {
        let Mhtml {
            headers,
            resources,
            index,
        } = mhtml;

        Converter {
            options,
            resources,
            headers,
            index: index.clone(),
            dry_run: false,
            stylesheets: HashMap::new(),
            missing: Vec::new(),
            frame_stack: Vec::new(),
            parsed_stylesheets: 0,
        }
    }

    /// Turns this converter into a dry run collecting missing resources
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn options(&self) -> &MhtmlOptions {
        self.options
    }

    /// Converts the index document
    pub fn run(&mut self) -> Result<PageData> {
        let index = self
            .index
            .clone()
            .ok_or_else(|| MhtmlError::IndexNotFound("no HTML part in archive".to_string()))?;
        let key = self
            .resources
            .find(&index)
            .ok_or_else(|| MhtmlError::IndexNotFound(index.clone()))?;

        let dom = self.render_document(key, &index, true)?;

        let page_data = PageData {
            data: if self.dry_run {
                String::new()
            } else {
                serialize_document(&dom)
            },
            title: get_title(&dom.document),
            favicons: collect_favicons(&dom.document),
        };

        if !self.dry_run {
            for resource in self.resources.unused() {
                debug!(id = %resource.id, content_type = %resource.content_type, "resource never inlined");
            }
        }
        debug!(
            parsed_stylesheets = self.parsed_stylesheets,
            missing = self.missing.len(),
            dry_run = self.dry_run,
            "conversion pass finished"
        );

        Ok(page_data)
    }

    /// Absolute http(s) references found so far that the archive lacks
    pub fn missing_resources(&self) -> &[MissingResource] {
        &self.missing
    }

    /// Number of stylesheets and style attributes parsed so far
    pub fn parsed_stylesheets(&self) -> usize {
        self.parsed_stylesheets
    }

    pub fn find_resource(&self, id: &str) -> Option<ResourceKey> {
        self.resources.find(id)
    }

    pub fn resource(&self, key: ResourceKey) -> Option<&Resource> {
        self.resources.get(key)
    }

    /// Resolves `reference` against `base` and finds the resource it points at
    ///
    /// `cid:` references go through Content-IDs first. The resolved form is
    /// returned even when nothing matches.
    pub fn lookup_reference(&self, base: &str, reference: &str) -> (String, Option<ResourceKey>) {
        let reference = reference.trim();

        if let Some(content_id) = content_id_from_cid_url(reference) {
            if let Some(key) = self.resources.frame(&content_id) {
                return (reference.to_string(), Some(key));
            }
        }

        let resolved = resolve_path(reference, base);
        let key = self.resources.lookup(&resolved, reference);
        if key.is_none() {
            debug!(reference, resolved = %resolved, "unresolved reference");
        }

        (resolved, key)
    }

    pub fn mark_used(&mut self, key: ResourceKey) {
        if self.dry_run {
            return;
        }
        if let Some(resource) = self.resources.get_mut(key) {
            resource.used = true;
        }
    }

    /// Remembers an unresolved reference when it can be fetched
    pub fn record_missing(&mut self, id: &str, transfer_encoding: Option<TransferEncoding>) {
        if !is_http_url(id) || self.missing.iter().any(|missing| missing.id == id) {
            return;
        }

        self.missing.push(MissingResource {
            id: id.to_string(),
            transfer_encoding,
        });
    }

    pub(crate) fn count_stylesheet_parse(&mut self) {
        self.parsed_stylesheets += 1;
    }

    pub(crate) fn stylesheet_state(&self, id: &str) -> Option<RewriteState> {
        self.stylesheets.get(id).cloned()
    }

    pub(crate) fn set_stylesheet_state(&mut self, id: &str, state: RewriteState) {
        self.stylesheets.insert(id.to_string(), state);
    }

    /// Converts a frame document, returning its HTML (empty in a dry run)
    pub fn render_frame(&mut self, key: ResourceKey, fallback_base: &str) -> Result<String> {
        let dom = self.render_document(key, fallback_base, false)?;

        if self.dry_run {
            Ok(String::new())
        } else {
            Ok(serialize_document(&dom))
        }
    }

    fn render_document(
        &mut self,
        key: ResourceKey,
        fallback_base: &str,
        is_root: bool,
    ) -> Result<RcDom> {
        let (id, html) = match self.resources.get(key) {
            Some(resource) => (resource.id.clone(), resource.text()),
            None => return Err(MhtmlError::IndexNotFound(key.to_string())),
        };
        if self.frame_stack.contains(&key) {
            return Err(MhtmlError::FrameCycle(id));
        }

        let dom = html_to_dom(&html);
        let document = &dom.document;

        if !self.options.enable_scripts {
            remove_scripts(document);
        }

        let mut base = base_for(&id, fallback_base);
        if let Some(href) = take_base_href(document) {
            base = resolve_path(href.trim(), &base);
        }

        remove_alternate_stylesheets(document);

        if !self.dry_run {
            let canonical = if is_root {
                self.index.clone()
            } else if is_canonical_candidate(&id) {
                Some(id.clone())
            } else {
                None
            };
            if let Some(canonical) = canonical {
                ensure_canonical_link(&dom, &canonical);
            }

            set_content_security_policy(&dom, self.options.enable_scripts);
            remove_resource_hints(document);
            if is_root && !self.headers.is_empty() {
                insert_page_info(&dom, self.headers, self.index.as_deref().unwrap_or_default());
            }
            remove_meta_refresh(document);
            set_utf8_charset(&dom);
            self.mark_used(key);
        }

        self.frame_stack.push(key);
        {
            let context = DocumentContext {
                dom: &dom,
                base,
                id,
            };
            walk(self, &context, &dom.document);
        }
        self.frame_stack.pop();

        Ok(dom)
    }
}

/// Frames only get a canonical link when their id is a real address
fn is_canonical_candidate(id: &str) -> bool {
    !id.to_ascii_lowercase().starts_with(CID_PROTOCOL)
        && Url::parse(id).is_ok_and(|url| !url.cannot_be_a_base())
}

/// Converts a parsed archive
pub fn convert(mhtml: &mut Mhtml, options: &MhtmlOptions) -> Result<PageData> {
    Converter::new(mhtml, options).run()
}

/// Runs a dry conversion, returning the resources that could be fetched
pub fn collect_missing_resources(
    mhtml: &mut Mhtml,
    options: &MhtmlOptions,
) -> Result<Vec<MissingResource>> {
    let mut converter = Converter::new(mhtml, options).dry_run();
    converter.run()?;
    Ok(converter.missing_resources().to_vec())
}

/// Parses and converts an archive, fetching missing resources when enabled
pub fn mhtml_to_html(data: &[u8], options: &MhtmlOptions) -> Result<PageData> {
    let mut mhtml = parse(data);

    if options.fetch_missing_resources {
        let session = Session::new(options)?;
        convert_with_fetch(&mut mhtml, options, &session)
    } else {
        convert(&mut mhtml, options)
    }
}

fn matches_signature(data: &[u8], signature: &[u8]) -> bool {
    data.len() >= signature.len()
        && signature
            .iter()
            .zip(data)
            .all(|(expected, actual)| *expected == b'.' || expected == actual)
}

/// Determines the media type of a part lacking `Content-Type`
///
/// Magic bytes win over the file extension of the part's location.
pub fn detect_media_type(data: &[u8], location: &str) -> String {
    for signature in &FILE_SIGNATURES {
        if matches_signature(data, signature[0]) {
            return String::from_utf8_lossy(signature[1]).to_string();
        }
    }

    match Url::parse(location) {
        Ok(url) => detect_media_type_by_file_name(url.path()),
        Err(_) => detect_media_type_by_file_name(location),
    }
}

pub fn detect_media_type_by_file_name(filename: &str) -> String {
    let filename_lowercased = filename.to_lowercase();

    if filename_lowercased.ends_with(".html") || filename_lowercased.ends_with(".htm") {
        "text/html".to_string()
    } else if filename_lowercased.ends_with(".xhtml") {
        "application/xhtml+xml".to_string()
    } else if filename_lowercased.ends_with(".css") {
        "text/css".to_string()
    } else if filename_lowercased.ends_with(".js") {
        "application/javascript".to_string()
    } else if filename_lowercased.ends_with(".json") {
        "application/json".to_string()
    } else if filename_lowercased.ends_with(".svg") {
        "image/svg+xml".to_string()
    } else if filename_lowercased.ends_with(".png") {
        "image/png".to_string()
    } else if filename_lowercased.ends_with(".jpg") || filename_lowercased.ends_with(".jpeg") {
        "image/jpeg".to_string()
    } else if filename_lowercased.ends_with(".gif") {
        "image/gif".to_string()
    } else if filename_lowercased.ends_with(".webp") {
        "image/webp".to_string()
    } else if filename_lowercased.ends_with(".ico") {
        "image/x-icon".to_string()
    } else if filename_lowercased.ends_with(".woff2") {
        "font/woff2".to_string()
    } else if filename_lowercased.ends_with(".woff") {
        "font/woff".to_string()
    } else if filename_lowercased.ends_with(".mp3") {
        "audio/mpeg".to_string()
    } else if filename_lowercased.ends_with(".ogg") {
        "audio/ogg".to_string()
    } else if filename_lowercased.ends_with(".wav") {
        "audio/wav".to_string()
    } else if filename_lowercased.ends_with(".mp4") {
        "video/mp4".to_string()
    } else if filename_lowercased.ends_with(".webm") {
        "video/webm".to_string()
    } else {
        "application/octet-stream".to_string()
    }
}

/// Checks if the given media type represents plaintext content
pub fn is_plaintext_media_type(media_type: &str) -> bool {
    media_type.starts_with("text/") || PLAINTEXT_MEDIA_TYPES.contains(&media_type)
}

pub fn is_document_media_type(media_type: &str) -> bool {
    media_type == "text/html" || media_type == "application/xhtml+xml"
}

pub fn is_stylesheet_media_type(media_type: &str) -> bool {
    media_type == "text/css"
}

/// Default output path of an input archive: same path, `.html` extension
pub fn format_output_path(input: &str) -> PathBuf {
    Path::new(input).with_extension("html")
}

/// Appends `.html` to an output path lacking it
pub fn ensure_html_extension(output: &str) -> PathBuf {
    if output.to_ascii_lowercase().ends_with(".html") {
        PathBuf::from(output)
    } else {
        PathBuf::from(format!("{}.html", output))
    }
}

/// Prints an error message to stderr, in red unless `colored` is false
pub fn print_error_message(msg: &str, colored: bool) {
    if colored {
        eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
    } else {
        eprintln!("{msg}");
    }
}
