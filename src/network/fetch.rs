//! Missing-resource recovery
//!
//! A dry conversion lists every absolute `http(s)` reference the archive
//! cannot satisfy. Those are fetched concurrently, added to the resource map,
//! and the dry run is repeated, since a fetched stylesheet may reference
//! resources of its own. Failed URLs are never requested twice. Once a round
//! finds nothing new, the real conversion runs.

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::core::{collect_missing_resources, convert, detect_media_type, MhtmlOptions, PageData, Result};
use crate::parsers::mhtml::{build_resource, Mhtml};

/// Body and declared type of a fetched resource
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchedResource {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Source of resources missing from an archive
///
/// Implementations are called from several threads within one round.
pub trait ResourceFetcher: Sync {
    fn fetch(&self, url: &str) -> Result<FetchedResource>;
}

/// Converts an archive, fetching what it references but does not contain
pub fn convert_with_fetch(
    mhtml: &mut Mhtml,
    options: &MhtmlOptions,
    fetcher: &impl ResourceFetcher,
) -> Result<PageData> {
    let mut attempted: HashSet<String> = HashSet::new();
    let mut failed: HashSet<String> = HashSet::new();
    let mut round = 0;

    loop {
        let missing: Vec<_> = collect_missing_resources(mhtml, options)?
            .into_iter()
            .filter(|resource| !attempted.contains(&resource.id))
            .collect();
        if missing.is_empty() {
            break;
        }

        round += 1;
        info!(round, count = missing.len(), "fetching missing resources");

        let results: Vec<_> = missing
            .par_iter()
            .map(|resource| (resource, fetcher.fetch(&resource.id)))
            .collect();

        for (resource, result) in results {
            attempted.insert(resource.id.clone());

            match result {
                Ok(fetched) => {
                    let content_type = fetched
                        .content_type
                        .filter(|value| !value.trim().is_empty())
                        .unwrap_or_else(|| detect_media_type(&fetched.body, &resource.id));
                    let fetched = build_resource(
                        &resource.id,
                        &content_type,
                        fetched.body,
                        resource.transfer_encoding,
                    );
                    mhtml.resources.insert(fetched, None);
                }
                Err(err) => {
                    warn!(url = resource.id.as_str(), %err, "cannot fetch resource");
                    failed.insert(resource.id.clone());
                }
            }
        }
    }

    if !failed.is_empty() {
        info!(count = failed.len(), "resources left unresolved");
    }

    convert(mhtml, options)
}
