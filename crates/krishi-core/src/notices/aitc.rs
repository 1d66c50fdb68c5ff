//! AITC subsidy documents.
//!
//! The live AITC site currently answers scrapes with 404/Cloudflare
//! challenges, so this source returns verified static data. Re-enabling a
//! live fetch would need the resolved URL (likely
//! `https://aitc.gov.np/notice/news-notices`) and headers that pass the
//! challenge.

use krishi_commons::{Notice, NoticeKind};

fn subsidy(title: &str, link: &str) -> Notice {
    Notice {
        kind: NoticeKind::SubsidyDetails,
        title: title.to_string(),
        link: link.to_string(),
        date: "2025-01-12".to_string(),
        is_subsidy: true,
        source: Some("AITC".to_string()),
    }
}

/// Known subsidy documents from the Agriculture Information and Training
/// Center.
pub async fn fetch_notices() -> Vec<Notice> {
    vec![
        subsidy(
            "अनुदानग्राहीको विवरण सार्वजनिकिकरणको लाग गठित समितिको प्रतिवेदन",
            "https://aitc.gov.np/uploads/documents/1-Subsidy-Report-2081-FINALpdf-5550-216-1736748697.pdf",
        ),
        subsidy(
            "Statement of Expenditure from 15/01/2024 to 13/05/2024 Demand Based Producers Grant Program",
            "https://drive.google.com/file/d/1sLS_jKDGZHNLI5PbcoW7S2VgPaVYvRRA/view",
        ),
        subsidy(
            "List of Small grants supported in all four cluster from FY 2077/78 to 2079/80",
            "https://drive.google.com/file/d/1e03YMu1Jbq8hg05ioGbmQouRSvhsagqV/view",
        ),
        subsidy(
            "List of Matching grants supported in all four cluster from FY 2077/78 to 2079/80",
            "https://drive.google.com/file/d/1sIEmK72NjTvkbuSlh1RQuPKh0G_gSAfH/view",
        ),
        subsidy(
            "रानी जमरा आ.व. २०७६- २०८० विविध पशुपन्छी विकास सहयोग कार्यक्रम रानी जमरा",
            "https://drive.google.com/file/d/1jZFSbAEyomQbHHMgaAaKUIE_5KrBP1ag/view",
        ),
        subsidy(
            "PMAMP5 Anudaan Book 2079-80",
            "https://drive.google.com/file/d/1_WCyuEtVjWPxfDga7LxkA53I9wYpXN8x/view",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn all_entries_are_subsidies_from_aitc() {
        let notices = fetch_notices().await;
        assert_eq!(notices.len(), 6);
        assert!(notices.iter().all(|n| n.is_subsidy));
        assert!(notices.iter().all(|n| n.source.as_deref() == Some("AITC")));
    }
}
