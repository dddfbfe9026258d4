//! Per-session context
//!
//! Owns the raw catalog cache, the loading flag and the current view filter.
//! The catalog is loaded at most once; every view reruns the pipeline over
//! the cached records.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::OnceCell;

use crate::core::catalog::{Catalog, CatalogSource, load_catalog};
use crate::core::categories::{aggregate_videos, filter_by_category, search};
use crate::core::pipeline::{CatalogStats, Pipeline};
use crate::error::Result;
use crate::types::{CategoryCount, Config, NormalizedVideo, ViewFilter};

/// Filtered pipeline output
#[derive(Debug, Clone)]
pub struct View {
    pub videos: Vec<NormalizedVideo>,
    /// Matches before the limit was applied
    pub matched: usize,
}

struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Session {
    source: CatalogSource,
    timeout: Duration,
    pipeline: Pipeline,
    cache: OnceCell<Arc<Catalog>>,
    loading: AtomicBool,
    filter: ViewFilter,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            source: CatalogSource::parse(&config.source),
            timeout: Duration::from_secs(config.fetch_timeout_secs),
            pipeline: Pipeline::from_config(config),
            cache: OnceCell::new(),
            loading: AtomicBool::new(false),
            filter: ViewFilter::default(),
        }
    }

    /// Session over records already in memory
    pub fn with_catalog(config: &Config, catalog: Catalog) -> Self {
        Self {
            cache: OnceCell::new_with(Some(Arc::new(catalog))),
            ..Self::new(config)
        }
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.initialized()
    }

    pub fn set_filter(&mut self, filter: ViewFilter) {
        self.filter = filter;
    }

    /// Cached catalog, loading it on first use.
    ///
    /// Concurrent callers share one load. A failed load is not cached.
    pub async fn catalog(&self) -> Result<Arc<Catalog>> {
        let catalog = self
            .cache
            .get_or_try_init(|| async {
                self.loading.store(true, Ordering::Release);
                let _guard = LoadingGuard(&self.loading);
                load_catalog(&self.source, self.timeout).await.map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(catalog))
    }

    /// Full pipeline output, unfiltered
    pub async fn videos(&self) -> Result<Vec<NormalizedVideo>> {
        let catalog = self.catalog().await?;
        Ok(self.pipeline.run(&catalog.records))
    }

    /// Pipeline output narrowed by the current filter
    pub async fn view(&self) -> Result<View> {
        let mut videos = self.videos().await?;

        if let Some(category) = self.filter.category.as_deref() {
            videos = filter_by_category(&videos, category);
        }
        if let Some(query) = self.filter.query.as_deref() {
            videos = search(&videos, query);
        }

        let matched = videos.len();
        if let Some(limit) = self.filter.limit {
            videos.truncate(limit);
        }
        Ok(View { videos, matched })
    }

    /// Tag counts over the cleaned catalog, most used first
    pub async fn categories(&self) -> Result<Vec<CategoryCount>> {
        Ok(aggregate_videos(&self.videos().await?))
    }

    pub async fn stats(&self) -> Result<CatalogStats> {
        Ok(CatalogStats::collect(&self.catalog().await?.records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::parse_catalog;
    use chrono::Utc;
    use std::io::Write;

    const CATALOG: &str = r#"[
        {"title": "Sunset Drive", "thumbnail": "https://img/1.jpg", "detail_url": "https://site.test/1", "categories": ["Travel", "Cars"]},
        {"title": "Sunset Drive", "thumbnail": "https://img/1.jpg", "detail_url": "https://site.test/1", "categories": ["Travel", "Cars"]},
        {"title": "Harbor", "thumbnail": "https://img/2.jpg", "external_url": "https://host.test/2", "categories": ["Travel"]},
        {"title": "Broken", "thumbnail": "https://img/missing.jpg", "detail_url": "https://site.test/3"},
        {"title": "Night Cars", "thumbnail": "https://img/4.jpg", "detail_url": "https://site.test/4"}
    ]"#;

    fn session() -> Session {
        let catalog = Catalog {
            records: parse_catalog(CATALOG).unwrap(),
            fetched_at: Utc::now(),
        };
        Session::with_catalog(&Config::default(), catalog)
    }

    #[tokio::test]
    async fn test_view_reruns_over_cache() {
        let mut session = session();
        assert!(session.is_loaded());

        let all = session.view().await.unwrap();
        assert_eq!(all.matched, 3);

        session.set_filter(ViewFilter {
            category: Some("cars".into()),
            ..Default::default()
        });
        let cars = session.view().await.unwrap();
        let titles: Vec<&str> = cars.videos.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, ["Sunset Drive", "Night Cars"]);

        session.set_filter(ViewFilter {
            query: Some("harbor".into()),
            limit: Some(0),
            ..Default::default()
        });
        let view = session.view().await.unwrap();
        assert_eq!(view.matched, 1);
        assert!(view.videos.is_empty());
    }

    #[tokio::test]
    async fn test_categories_and_stats() {
        let session = session();
        let counts = session.categories().await.unwrap();
        assert_eq!(counts[0], CategoryCount { name: "Travel".into(), count: 2 });
        assert_eq!(counts[1], CategoryCount { name: "Cars".into(), count: 1 });

        let stats = session.stats().await.unwrap();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.with_external_url, 1);
    }

    #[tokio::test]
    async fn test_loads_once_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", CATALOG).unwrap();

        let config = Config {
            source: file.path().to_string_lossy().to_string(),
            ..Default::default()
        };
        let session = Session::new(&config);
        assert!(!session.is_loaded());

        let first = session.catalog().await.unwrap();
        // Later edits to the file are not picked up
        std::fs::write(file.path(), "[]").unwrap();
        let second = session.catalog().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.records.len(), 5);
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_loading_flag_while_fetching() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;
        use tokio::sync::oneshot;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (release_tx, release_rx) = oneshot::channel::<()>();

        // Holds the response back until the test has looked at the flag
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 2048];
            let _ = socket.read(&mut buf).await.unwrap();
            release_rx.await.unwrap();

            let body = r#"[{"title": "A"}, {"title": "B"}]"#;
            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        });

        let config = Config {
            source: format!("http://{addr}/videos.json"),
            ..Default::default()
        };
        let session = Arc::new(Session::new(&config));
        assert!(!session.is_loading());

        let loader = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.catalog().await.map(|c| c.records.len()) }
        });

        tokio::time::timeout(Duration::from_secs(5), async {
            while !session.is_loading() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
        assert!(!session.is_loaded());

        release_tx.send(()).unwrap();
        assert_eq!(loader.await.unwrap().unwrap(), 2);
        assert!(!session.is_loading());
        assert!(session.is_loaded());
        server.await.unwrap();
    }

    #[test]
    fn test_failed_load_is_retried() {
        let config = Config {
            source: "/nonexistent/vidshelf/videos.json".into(),
            ..Default::default()
        };
        let session = Session::new(&config);
        assert!(tokio_test::block_on(session.catalog()).is_err());
        assert!(!session.is_loaded());
        assert!(!session.is_loading());
    }
}
