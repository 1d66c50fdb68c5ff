//! Static administrative forms.
//!
//! These are always appended to the aggregated notice list, and serve as the
//! last-resort payload when every other source comes back empty.

use krishi_commons::{Notice, NoticeKind};

fn form(title: &str, link: &str, date: &str) -> Notice {
    Notice {
        kind: NoticeKind::Form,
        title: title.to_string(),
        link: link.to_string(),
        date: date.to_string(),
        is_subsidy: false,
        source: None,
    }
}

/// The fixed list of known downloadable forms.
pub fn static_forms() -> Vec<Notice> {
    vec![
        form(
            "कार्यक्रम अनुगमन FORMAT.",
            "https://doanepal.gov.np/actfile/अनुगमन Format_1733470536.xlsx",
            "2024-12-06",
        ),
        form(
            "भ्रमण आदेश फाराम",
            "https://doanepal.gov.np/actfile/भ्रमण आदेश फाराम_1713775016.doc",
            "2024-04-22",
        ),
        form(
            "बिदाको  निवेदन",
            "https://doanepal.gov.np/actfile/बिदाको form खाली_1713774814.docx",
            "2024-04-22",
        ),
        form(
            "माग फाराम",
            "https://doanepal.gov.np/actfile/MAAG FARAM_1713775071.docx",
            "2024-04-22",
        ),
        form(
            "भन्सार छुट सम्बन्धी आवश्यक कागजात र प्रकृया",
            "https://doanepal.gov.np/actfile/भन्सार छुटका लागि आवश्यक कागजात_nep_1693725946.pdf",
            "2023-09-03",
        ),
        form(
            "सम्पत्ति विवरण फारम",
            "https://doanepal.gov.np/actfile/Sampati bibaran all_nep_1626932601.docx",
            "2021-07-22",
        ),
    ]
}
