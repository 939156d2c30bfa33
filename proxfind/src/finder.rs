//! ProxFinder - Main API for host interop, designed for UniFFI export.
//!
//! Async Cancellation Architecture:
//! When the host cancels an async task, UniFFI drops the Rust Future. We intercept
//! this via a DropGuard that triggers a CancellationToken. The blocking search
//! checks this token before every region and aborts mid-flight.

use crate::config::{self, SearchConfiguration};
use crate::excerpt::HighlightMarkup;
use crate::interface::{HighlightRange, ProxFindError, ProxFinderApi, Region, SearchOutcome};
use crate::search;
use once_cell::sync::Lazy;
use std::sync::Once;
use tokio_util::sync::CancellationToken;

/// Global fallback Tokio runtime for when async functions are called outside any runtime context.
/// Used by UniFFI which doesn't provide a tokio runtime.
static FALLBACK_RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create fallback tokio runtime")
});

static RAYON_INIT: Once = Once::new();

/// Initialize global Rayon thread pool with core reservation and lower priority
fn init_rayon() {
    RAYON_INIT.call_once(|| {
        let num_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);

        // Keep one core free for the host's UI thread.
        let rayon_threads = num_threads.saturating_sub(1).max(1);

        let result = rayon::ThreadPoolBuilder::new()
            .num_threads(rayon_threads)
            .thread_name(|i| format!("proxfind-rayon-{}", i))
            .start_handler(|_| {
                use thread_priority::*;
                let _ = set_current_thread_priority(ThreadPriority::Min);
            })
            .build_global();
        if let Err(e) = result {
            tracing::debug!(error = %e, "global rayon pool already configured");
        }
    });
}

/// RAII guard that cancels a token when dropped.
/// When the host cancels an async task, UniFFI drops the Future, which drops this guard,
/// which triggers the cancellation token.
struct DropGuard {
    token: CancellationToken,
}

impl DropGuard {
    fn new(token: CancellationToken) -> Self {
        Self { token }
    }
}

impl Drop for DropGuard {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Stateless proximity search service
///
/// Concurrency Model:
/// - Search is async with cancellation support via CancellationToken
/// - Blocking work runs on spawn_blocking threads, regions fan out over rayon
/// - Uses global FALLBACK_RUNTIME when called outside any runtime (e.g., from UniFFI)
#[derive(uniffi::Object)]
pub struct ProxFinder {
    markup: HighlightMarkup,
}

// Internal implementation (not exported via FFI)
impl ProxFinder {
    /// Finder with custom excerpt markup, for Rust callers.
    pub fn with_markup_config(markup: HighlightMarkup) -> Self {
        init_rayon();
        Self { markup }
    }

    /// Get a tokio runtime handle - uses current runtime if available, otherwise global fallback
    fn runtime_handle(&self) -> tokio::runtime::Handle {
        tokio::runtime::Handle::try_current()
            .unwrap_or_else(|_| FALLBACK_RUNTIME.handle().clone())
    }
}

impl Default for ProxFinder {
    fn default() -> Self {
        Self::with_markup_config(HighlightMarkup::default())
    }
}

// FFI-exported constructors (must be in standalone impl block)
#[uniffi::export]
impl ProxFinder {
    /// Finder whose excerpts mark terms with `<span class="mark">`.
    #[uniffi::constructor]
    pub fn new() -> Self {
        Self::default()
    }

    /// Finder with custom highlight markers around excerpt terms.
    #[uniffi::constructor]
    pub fn with_markup(open: String, close: String, escape_html: bool) -> Self {
        Self::with_markup_config(HighlightMarkup { open, close, escape_html })
    }
}

#[uniffi::export]
#[async_trait::async_trait]
impl ProxFinderApi for ProxFinder {
    /// Search regions for proximity matches
    ///
    /// This is an async function that supports cancellation. When the host drops the task,
    /// the DropGuard triggers the CancellationToken, allowing mid-flight abortion.
    async fn search(
        &self,
        config: SearchConfiguration,
        regions: Vec<Region>,
    ) -> Result<SearchOutcome, ProxFindError> {
        // No terms: nothing to search, host shows its guidance state
        if config.normalized_terms().is_empty() {
            return Ok(SearchOutcome::default());
        }

        // Create cancellation token and guard
        let token = CancellationToken::new();
        let _guard = DropGuard::new(token.clone());

        let runtime = self.runtime_handle();
        let markup = self.markup.clone();
        let searched_regions = regions.len() as u64;
        let token_clone = token.clone();

        // runtime.spawn_blocking() rather than tokio::task::spawn_blocking()
        // because UniFFI doesn't provide a tokio runtime context
        let handle = runtime.spawn_blocking(move || {
            search::search_cancellable(&config, &regions, &markup, &token_clone)
        });

        match handle.await {
            Ok(Ok(matches)) => Ok(SearchOutcome {
                matches,
                searched_regions,
                performed: true,
            }),
            Ok(Err(e)) => Err(e),
            Err(_join_error) => {
                // JoinError means the task panicked or was aborted
                Err(ProxFindError::Cancelled)
            }
        }
    }

    fn highlight_ranges(&self, text: String, config: SearchConfiguration) -> Vec<HighlightRange> {
        search::highlight_ranges(&text, &config)
    }

    fn parse_terms(&self, raw: String) -> Vec<String> {
        config::parse_terms(&raw)
    }
}
