//! Government notice aggregation.
//!
//! Three independent sources are fetched concurrently and merged as a pure
//! union (no cross-source dedup), then the static forms are appended. Every
//! per-source failure degrades to an empty contribution; the aggregate
//! itself is infallible so the notices endpoint can never hard-fail.

pub mod aitc;
pub mod doa;
pub mod forms;
pub mod livestock;

use krishi_commons::Notice;

use crate::error::CoreResult;

pub use doa::{DoaScraper, ScrapeConfig};
pub use forms::static_forms;

/// Aggregates notices from all configured sources.
pub struct NoticeAggregator {
    scraper: DoaScraper,
}

impl NoticeAggregator {
    pub fn new(config: ScrapeConfig) -> CoreResult<Self> {
        Ok(Self {
            scraper: DoaScraper::new(config)?,
        })
    }

    /// Fetches every source concurrently and merges. Total latency is
    /// bounded by the slowest source, not their sum.
    pub async fn aggregate(&self) -> Vec<Notice> {
        let (doa, aitc, livestock) = tokio::join!(
            self.fetch_doa(),
            aitc::fetch_notices(),
            livestock::fetch_notices(),
        );
        merge(doa, aitc, livestock)
    }

    async fn fetch_doa(&self) -> Vec<Notice> {
        match self.scraper.fetch().await {
            Ok(notices) => notices,
            Err(e) => {
                log::error!("DOA scraping error: {}", e);
                Vec::new()
            }
        }
    }
}

/// Union of all source contributions plus the static forms; falls back to
/// the forms alone when everything is empty.
fn merge(doa: Vec<Notice>, aitc: Vec<Notice>, livestock: Vec<Notice>) -> Vec<Notice> {
    let mut all = Vec::with_capacity(doa.len() + aitc.len() + livestock.len() + 6);
    all.extend(doa);
    all.extend(aitc);
    all.extend(livestock);
    all.extend(static_forms());

    if all.is_empty() {
        return static_forms();
    }
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use krishi_commons::NoticeKind;

    fn notice(title: &str, source: &str) -> Notice {
        Notice {
            kind: NoticeKind::Notice,
            title: title.into(),
            link: "https://example.com".into(),
            date: "2024-01-01".into(),
            is_subsidy: false,
            source: Some(source.into()),
        }
    }

    #[test]
    fn merge_is_a_pure_union_with_forms_appended() {
        let doa = vec![notice("a", "DOA"), notice("b", "DOA")];
        let aitc = vec![notice("c", "AITC")];

        let merged = merge(doa, aitc, Vec::new());
        assert_eq!(merged.len(), 2 + 1 + 0 + 6);

        // Source order is preserved; no dedup happens
        assert_eq!(merged[0].title, "a");
        assert_eq!(merged[2].title, "c");
        assert_eq!(merged[3].kind, NoticeKind::Form);
    }

    #[test]
    fn duplicates_across_sources_survive() {
        let merged = merge(
            vec![notice("same", "DOA")],
            vec![notice("same", "AITC")],
            Vec::new(),
        );
        assert_eq!(
            merged.iter().filter(|n| n.title == "same").count(),
            2
        );
    }

    #[test]
    fn empty_sources_yield_exactly_the_forms() {
        let merged = merge(Vec::new(), Vec::new(), Vec::new());
        assert_eq!(merged, static_forms());
    }

    #[tokio::test]
    async fn aggregate_survives_an_unreachable_scrape_target() {
        // Nothing listens on this port; the scrape errors out quickly and
        // must fold into the static contributions.
        let config = ScrapeConfig {
            homepage_url: "http://127.0.0.1:9/".into(),
            fallback_notice_url: "http://127.0.0.1:9/notices".into(),
            homepage_timeout_secs: 1,
            notice_timeout_secs: 1,
            ..ScrapeConfig::default()
        };
        let aggregator = NoticeAggregator::new(config).unwrap();

        let notices = aggregator.aggregate().await;
        // AITC static data + the six forms, nothing lost, no error
        assert_eq!(notices.len(), 6 + 6);
        assert!(notices.iter().any(|n| n.kind == NoticeKind::Form));
    }
}
