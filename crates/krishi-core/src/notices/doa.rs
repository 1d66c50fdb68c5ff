//! Department of Agriculture notice-board scraper.
//!
//! The DOA site has no API, so notices come from its HTML. All selector
//! logic lives in pure functions over fetched documents: a markup-shape
//! change upstream breaks exactly this module and is testable with string
//! fixtures.

use std::time::Duration;

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

use krishi_commons::constants::NOTICE_ROW_LIMIT;
use krishi_commons::{Notice, NoticeKind};

use crate::error::{CoreError, CoreResult};

/// Menu label of the notice-board section on the homepage.
const MENU_LABEL: &str = "सूचना पाटी";
/// Dropdown entry leading to the notices-and-news table.
const DROPDOWN_LABEL: &str = "सूचना तथा समाचार";
/// Title keyword marking a subsidy document.
const SUBSIDY_KEYWORD: &str = "अनुदान";

/// Scrape failure. Folded into the aggregator's fallback policy, never
/// surfaced to API callers.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid selector {0}")]
    Selector(String),
}

/// Configuration for the DOA scrape.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub homepage_url: String,
    /// Base used to qualify relative document links.
    pub base_url: String,
    /// Known notice-board URL used when the homepage menu walk fails.
    pub fallback_notice_url: String,
    pub user_agent: String,
    pub homepage_timeout_secs: u64,
    pub notice_timeout_secs: u64,
    pub row_limit: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            homepage_url: "https://doanepal.gov.np/ne/".to_string(),
            base_url: "https://doanepal.gov.np".to_string(),
            fallback_notice_url: "https://doanepal.gov.np/ne/notice-board/15/2024/1439342/"
                .to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            homepage_timeout_secs: 8,
            notice_timeout_secs: 15,
            row_limit: NOTICE_ROW_LIMIT,
        }
    }
}

/// Fetches and extracts DOA notices.
#[derive(Clone)]
pub struct DoaScraper {
    client: Client,
    config: ScrapeConfig,
}

impl DoaScraper {
    pub fn new(config: ScrapeConfig) -> CoreResult<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| CoreError::internal(format!("building HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// One full scrape: homepage → notice-board URL → notice table.
    pub async fn fetch(&self) -> Result<Vec<Notice>, ScrapeError> {
        let homepage = self
            .get_text(
                &self.config.homepage_url,
                Duration::from_secs(self.config.homepage_timeout_secs),
            )
            .await?;

        let board_url = match find_notice_board_url(&homepage)? {
            Some(url) => url,
            None => {
                log::info!("Could not find dynamic notice URL, falling back to known URL");
                self.config.fallback_notice_url.clone()
            }
        };
        log::info!("Fetching notices from: {}", board_url);

        let page = self
            .get_text(
                &board_url,
                Duration::from_secs(self.config.notice_timeout_secs),
            )
            .await?;
        parse_notice_rows(&page, &self.config.base_url, self.config.row_limit)
    }

    async fn get_text(&self, url: &str, timeout: Duration) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector(format!("{}: {}", css, e)))
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Walks the homepage menu for the notice-board dropdown entry.
///
/// Returns the href as published (the site links absolutely); `None` when
/// the menu shape changed.
pub fn find_notice_board_url(html: &str) -> Result<Option<String>, ScrapeError> {
    let document = Html::parse_document(html);
    let menu_item = selector("li.menu-item")?;
    let dropdown_link = selector("ul.dropdown-menu li a")?;

    for item in document.select(&menu_item) {
        // The menu label is the item's direct anchor, not a dropdown entry
        let label = item
            .children()
            .filter_map(ElementRef::wrap)
            .find(|child| child.value().name() == "a")
            .map(element_text)
            .unwrap_or_default();
        if !label.contains(MENU_LABEL) {
            continue;
        }

        for link in item.select(&dropdown_link) {
            if element_text(link).contains(DROPDOWN_LABEL) {
                if let Some(href) = link.value().attr("href") {
                    return Ok(Some(href.to_string()));
                }
            }
        }
    }
    Ok(None)
}

/// Extracts notices from the notice-board table.
///
/// Columns 1/3/4 are title/date/link; rows missing a title or link are
/// skipped; relative links are qualified against `base_url`; a missing date
/// becomes today's ISO date.
pub fn parse_notice_rows(
    html: &str,
    base_url: &str,
    row_limit: usize,
) -> Result<Vec<Notice>, ScrapeError> {
    let document = Html::parse_document(html);
    let row = selector("#example tbody tr")?;
    let cell = selector("td")?;
    let anchor = selector("a")?;

    let mut notices = Vec::new();
    for tr in document.select(&row).take(row_limit) {
        let cells: Vec<ElementRef> = tr.select(&cell).collect();

        let title = cells.get(1).map(|td| element_text(*td)).unwrap_or_default();
        let date = cells.get(3).map(|td| element_text(*td)).unwrap_or_default();
        let link = cells
            .get(4)
            .and_then(|td| td.select(&anchor).next())
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string);

        let Some(link) = link else { continue };
        if title.is_empty() {
            continue;
        }

        let link = if link.starts_with("http") {
            link
        } else {
            format!("{}{}", base_url, link)
        };
        let date = if date.is_empty() {
            chrono::Utc::now().format("%Y-%m-%d").to_string()
        } else {
            date
        };

        let kind = if title.contains(SUBSIDY_KEYWORD) {
            NoticeKind::SubsidyDetails
        } else {
            NoticeKind::Notice
        };
        let is_subsidy = title.contains(SUBSIDY_KEYWORD) || title.contains("Subsidy");

        notices.push(Notice {
            kind,
            title,
            link,
            date,
            is_subsidy,
            source: Some("DOA".to_string()),
        });
    }
    Ok(notices)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOMEPAGE: &str = r#"
        <html><body><ul>
          <li class="menu-item"><a href="/ne/about">हाम्रो बारेमा</a></li>
          <li class="menu-item"><a href="#">सूचना पाटी</a>
            <ul class="dropdown-menu">
              <li><a href="https://doanepal.gov.np/ne/press">प्रेस विज्ञप्ति</a></li>
              <li><a href="https://doanepal.gov.np/ne/notice-board/15/2024/1439342/">सूचना तथा समाचार</a></li>
            </ul>
          </li>
        </ul></body></html>"#;

    #[test]
    fn finds_notice_board_url_via_menu_walk() {
        let url = find_notice_board_url(HOMEPAGE).unwrap();
        assert_eq!(
            url.as_deref(),
            Some("https://doanepal.gov.np/ne/notice-board/15/2024/1439342/")
        );
    }

    #[test]
    fn missing_menu_yields_none() {
        let url = find_notice_board_url("<html><body><p>maintenance</p></body></html>").unwrap();
        assert!(url.is_none());
    }

    fn table(rows: &str) -> String {
        format!(
            "<html><body><table id=\"example\"><tbody>{}</tbody></table></body></html>",
            rows
        )
    }

    fn row(title: &str, date: &str, link_cell: &str) -> String {
        format!(
            "<tr><td>1</td><td>{}</td><td>x</td><td>{}</td><td>{}</td></tr>",
            title, date, link_cell
        )
    }

    #[test]
    fn extracts_and_classifies_rows() {
        let html = table(&[
            row(
                "सिंचाइ अनुदान कार्यक्रम",
                "२०८१-०४-१५",
                "<a href=\"/actfile/grant.pdf\">डाउनलोड</a>",
            ),
            row(
                "बाली बीमा सम्बन्धी सूचना",
                "2024-12-01",
                "<a href=\"https://doanepal.gov.np/actfile/insurance.pdf\">d</a>",
            ),
        ]
        .join(""));

        let notices = parse_notice_rows(&html, "https://doanepal.gov.np", 31).unwrap();
        assert_eq!(notices.len(), 2);

        assert_eq!(notices[0].kind, NoticeKind::SubsidyDetails);
        assert!(notices[0].is_subsidy);
        // Relative link is qualified against the base URL
        assert_eq!(notices[0].link, "https://doanepal.gov.np/actfile/grant.pdf");
        assert_eq!(notices[0].date, "२०८१-०४-१५");

        assert_eq!(notices[1].kind, NoticeKind::Notice);
        assert!(!notices[1].is_subsidy);
        assert_eq!(notices[1].source.as_deref(), Some("DOA"));
    }

    #[test]
    fn rows_missing_title_or_link_are_skipped() {
        let html = table(&[
            row("", "2024-01-01", "<a href=\"/a.pdf\">d</a>"),
            row("शीर्षक", "2024-01-01", "no anchor here"),
            row("ठीक सूचना", "2024-01-01", "<a href=\"/ok.pdf\">d</a>"),
        ]
        .join(""));

        let notices = parse_notice_rows(&html, "https://doanepal.gov.np", 31).unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].title, "ठीक सूचना");
    }

    #[test]
    fn missing_date_defaults_to_today() {
        let html = table(&row("सूचना", "", "<a href=\"/a.pdf\">d</a>"));
        let notices = parse_notice_rows(&html, "https://doanepal.gov.np", 31).unwrap();
        let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
        assert_eq!(notices[0].date, today);
    }

    #[test]
    fn extraction_caps_at_row_limit() {
        let rows: String = (0..40)
            .map(|i| row(&format!("सूचना {}", i), "2024-01-01", "<a href=\"/a.pdf\">d</a>"))
            .collect();
        let notices = parse_notice_rows(&table(&rows), "https://doanepal.gov.np", 31).unwrap();
        assert_eq!(notices.len(), 31);
    }

    #[test]
    fn english_subsidy_keyword_flags_without_reclassifying() {
        let html = table(&row(
            "Subsidy program details",
            "2024-01-01",
            "<a href=\"/a.pdf\">d</a>",
        ));
        let notices = parse_notice_rows(&html, "https://doanepal.gov.np", 31).unwrap();
        assert_eq!(notices[0].kind, NoticeKind::Notice);
        assert!(notices[0].is_subsidy);
    }
}
