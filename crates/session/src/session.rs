//! The per-archive session: discovery, loading, caching and teardown.

use crate::discover::{self, DiscoveredBlog};
use crate::error::{ErrorKind, Result};
use crate::sources::{self, DiscoveredSources};
use exn::OptionExt;
use shoebox_archive::{ArchiveStore, FileInfo};
use shoebox_cache::{AsyncPartition, Partition};
use shoebox_ingest::models::CanonicalPost;
use shoebox_ingest::{NormalizeContext, RawRecord, normalize};
use shoebox_media::{AssetCatalog, AssetIndexEntry, ResolvedMedia};
use shoebox_schedule::{AbortHandle, Outcome, Progress, Scheduler};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// A normalized post alongside the record it came from. The raw side is
/// retained for introspection; everything downstream renders from the
/// canonical side.
#[derive(Debug, Clone, PartialEq)]
pub struct PostPair {
    pub raw: RawRecord,
    pub post: CanonicalPost,
}

/// The cacheable outcome of normalizing one blog's sources.
#[derive(Debug)]
struct NormalizedBatch {
    sources: DiscoveredSources,
    pairs: Vec<PostPair>,
}

/// Cache key: blog name plus a fingerprint of the raw source bytes, so a
/// re-exported blog re-normalizes while an untouched one is served from
/// cache.
type BatchKey = (String, String);

/// One open archive. Owns the result cache and the scheduler; cheap
/// operations go straight to the store, batch normalization goes through
/// the scheduler.
pub struct Session {
    store: Arc<dyn ArchiveStore>,
    scheduler: Scheduler,
    fallback_to_online_media: bool,
    batches: Partition<BatchKey, Arc<NormalizedBatch>>,
}

impl Session {
    pub fn new(store: Arc<dyn ArchiveStore>) -> Self {
        Self::with_scheduler(store, Scheduler::new())
    }

    pub fn with_scheduler(store: Arc<dyn ArchiveStore>, scheduler: Scheduler) -> Self {
        Self {
            store,
            scheduler,
            fallback_to_online_media: true,
            batches: Partition::new("normalized-batches"),
        }
    }

    /// Whether unresolved media references may fall back to their remote
    /// URL. Defaults to on.
    pub fn with_online_fallback(mut self, fallback: bool) -> Self {
        self.fallback_to_online_media = fallback;
        self
    }

    /// Cooperative teardown for in-flight and future batch runs.
    pub fn abort_handle(&self) -> AbortHandle {
        self.scheduler.abort_handle()
    }

    /// Batch completion state of the current (or next) load.
    pub fn progress(&self) -> watch::Receiver<Progress> {
        self.scheduler.progress()
    }

    /// Enumerate the blogs in the archive's index, sorted by name.
    pub async fn blogs(&self) -> Result<Vec<DiscoveredBlog>> {
        discover::discover_blogs(self.store.as_ref()).await
    }

    /// Load one blog end to end: probe its typed sources, normalize every
    /// record through the scheduler and wire up media resolution.
    ///
    /// Returns `None` when the run was torn down via the abort handle;
    /// partial output is discarded and nothing is cached. Per-file and
    /// per-record problems degrade in place and are visible through the
    /// [`DiscoveredSources`] report instead of erroring.
    pub async fn load_blog(&self, blog: &DiscoveredBlog) -> Result<Option<LoadedBlog>> {
        let folder = blog
            .metadata
            .folder_name()
            .ok_or_raise(|| ErrorKind::NoBlogFolder(blog.metadata.name.clone()))?;
        let listing =
            self.store.list(Some(Path::new(folder))).await.map_err(ErrorKind::archive)?;
        let catalog: AssetCatalog = listing.iter().filter_map(FileInfo::file_name).collect();
        let asset_index = discover::load_asset_index(self.store.as_ref(), blog).await;

        let set = sources::load(self.store.as_ref(), Path::new(folder), &listing).await;
        let key = (blog.metadata.name.clone(), set.fingerprint.clone());
        let batch = match self.batches.get(&key) {
            Some(batch) => {
                debug!(blog = blog.metadata.name, "serving normalized batch from cache");
                batch
            }
            None => {
                let ctx = NormalizeContext {
                    platform: blog.metadata.platform(),
                    blog_kind: blog.metadata.kind(),
                    media: &set.media,
                };
                let outcome = self
                    .scheduler
                    .run(set.records, |raw| {
                        let post = normalize(&raw, &ctx);
                        PostPair { raw, post }
                    })
                    .await;
                let Outcome::Complete(pairs) = outcome else {
                    return Ok(None);
                };
                info!(blog = blog.metadata.name, posts = pairs.len(), "normalized blog");
                let batch = Arc::new(NormalizedBatch { sources: set.report, pairs });
                self.batches.put(key, Arc::clone(&batch));
                batch
            }
        };

        let media = MediaLookup::new(
            asset_index.entries,
            catalog,
            self.fallback_to_online_media,
        );
        Ok(Some(LoadedBlog { metadata: blog.metadata.clone(), batch, media }))
    }

    /// Forget every cached batch, forcing the next load to re-read and
    /// re-normalize from the store.
    pub fn reload(&self) {
        self.batches.clear();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("fallback_to_online_media", &self.fallback_to_online_media)
            .field("cached_batches", &self.batches.len())
            .finish_non_exhaustive()
    }
}

/// A fully loaded blog: metadata, the sources report, the normalized
/// posts and a media lookup handle for the rendering layer.
#[derive(Debug, Clone)]
pub struct LoadedBlog {
    pub metadata: crate::metadata::BlogMetadata,
    batch: Arc<NormalizedBatch>,
    pub media: MediaLookup,
}

impl LoadedBlog {
    /// The normalized posts, in source order.
    pub fn posts(&self) -> &[PostPair] {
        &self.batch.pairs
    }

    pub fn sources(&self) -> &DiscoveredSources {
        &self.batch.sources
    }
}

/// Clone-able media resolution handle for one blog.
///
/// Resolution for a given candidate list runs at most once; concurrent
/// callers for the same list share the in-flight computation and later
/// callers are served from cache.
#[derive(Debug, Clone)]
pub struct MediaLookup {
    index: Arc<[AssetIndexEntry]>,
    catalog: Arc<AssetCatalog>,
    fallback_to_online_media: bool,
    resolved: Arc<AsyncPartition<Vec<String>, ResolvedMedia>>,
}

impl MediaLookup {
    fn new(index: Vec<AssetIndexEntry>, catalog: AssetCatalog, fallback: bool) -> Self {
        Self {
            index: index.into(),
            catalog: Arc::new(catalog),
            fallback_to_online_media: fallback,
            resolved: Arc::new(AsyncPartition::new("resolved-media")),
        }
    }

    /// Resolve a post's candidate URLs to `{remote, local}`. Never fails;
    /// with online fallback disabled an unmatched reference resolves to
    /// nothing at all.
    pub async fn resolve(&self, candidates: Vec<String>) -> ResolvedMedia {
        let index = Arc::clone(&self.index);
        let catalog = Arc::clone(&self.catalog);
        let fallback = self.fallback_to_online_media;
        self.resolved
            .get_or_compute(candidates.clone(), async move {
                let mut resolved = shoebox_media::resolve(&candidates, &index, &catalog);
                if !fallback {
                    resolved.remote = None;
                }
                resolved
            })
            .await
    }
}
