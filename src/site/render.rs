//! Pure rendering helpers for the static site.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::storage::Article;

/// Characters of body text used for the meta description.
const DESCRIPTION_CHARS: usize = 155;

const MAX_FAQS: usize = 5;
/// Answers must be longer than this to make it into the FAQ schema.
const MIN_FAQ_ANSWER_CHARS: usize = 20;
const MAX_FAQ_ANSWER_CHARS: usize = 500;

static H3: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^### (.+)$").expect("valid regex"));
static H2: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^## (.+)$").expect("valid regex"));
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"));
static EM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").expect("valid regex"));
static FAQ: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*([^*]+\?)\*\*\s*\n+([^\n*#]+(?:\n[^\n*#]+)*)").expect("valid regex")
});

/// Language code to Open Graph locale.
const OG_LOCALES: &[(&str, &str)] = &[
    ("en", "en_US"),
    ("de", "de_DE"),
    ("fr", "fr_FR"),
    ("es", "es_ES"),
    ("it", "it_IT"),
    ("pt", "pt_PT"),
    ("nl", "nl_NL"),
    ("pl", "pl_PL"),
    ("sv", "sv_SE"),
    ("da", "da_DK"),
    ("fi", "fi_FI"),
    ("el", "el_GR"),
    ("cs", "cs_CZ"),
    ("ro", "ro_RO"),
    ("hu", "hu_HU"),
    ("sk", "sk_SK"),
    ("bg", "bg_BG"),
    ("hr", "hr_HR"),
    ("sl", "sl_SI"),
    ("lt", "lt_LT"),
    ("lv", "lv_LV"),
    ("et", "et_EE"),
    ("mt", "mt_MT"),
    ("ga", "ga_IE"),
];

/// Open Graph locale for a language code, `en_US` when unknown.
pub fn og_locale(language: &str) -> &'static str {
    OG_LOCALES
        .iter()
        .find(|(code, _)| *code == language)
        .map(|(_, locale)| *locale)
        .unwrap_or("en_US")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Minimal markdown: `###`/`##` headings, `**bold**`, `*em*`, and
/// paragraphs separated by blank lines. Raw HTML in the input is escaped.
pub fn markdown_to_html(text: &str) -> String {
    let text = escape_html(text);
    let text = H3.replace_all(&text, "<h3>$1</h3>");
    let text = H2.replace_all(&text, "<h2>$1</h2>");
    let text = BOLD.replace_all(&text, "<strong>$1</strong>");
    let text = EM.replace_all(&text, "<em>$1</em>");

    text.split("\n\n")
        .map(|p| {
            let p = p.trim();
            if !p.is_empty() && !p.starts_with("<h") {
                format!("<p>{}</p>", p)
            } else {
                p.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Meta description: the first 155 characters of the body with double
/// quotes removed and newlines flattened.
pub fn description(body: &str) -> String {
    body.chars()
        .take(DESCRIPTION_CHARS)
        .filter(|c| *c != '"')
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

/// Pulls `**Question?**` / answer pairs out of an article body.
pub fn extract_faqs(body: &str) -> Vec<Faq> {
    FAQ.captures_iter(body)
        .take(MAX_FAQS)
        .filter_map(|caps| {
            let question = caps[1].trim().to_string();
            let answer = caps[2].trim().replace('\n', " ");
            if answer.chars().count() <= MIN_FAQ_ANSWER_CHARS {
                return None;
            }
            Some(Faq {
                question,
                answer: answer.chars().take(MAX_FAQ_ANSWER_CHARS).collect(),
            })
        })
        .collect()
}

/// Serializes a JSON-LD value so it is safe inside a `<script>` element.
pub fn json_ld(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_default()
        .replace("</", "<\\/")
}

/// FAQPage JSON-LD, or an empty string when there are no FAQs.
pub fn faq_schema(faqs: &[Faq]) -> String {
    if faqs.is_empty() {
        return String::new();
    }

    let entities: Vec<serde_json::Value> = faqs
        .iter()
        .map(|faq| {
            serde_json::json!({
                "@type": "Question",
                "name": faq.question,
                "acceptedAnswer": { "@type": "Answer", "text": faq.answer },
            })
        })
        .collect();

    let schema = serde_json::json!({
        "@context": "https://schema.org",
        "@type": "FAQPage",
        "mainEntity": entities,
    });

    format!(
        "<script type=\"application/ld+json\">\n{}\n</script>",
        json_ld(&schema)
    )
}

/// Alternate-language links for every article sharing `article`'s product
/// and angle. Empty when the article has no siblings.
pub fn hreflang_tags(article: &Article, all: &[Article], origin: &str) -> String {
    let related: Vec<&Article> = all
        .iter()
        .filter(|a| a.product == article.product && a.angle == article.angle)
        .collect();

    if related.len() <= 1 {
        return String::new();
    }

    let mut tags: Vec<String> = related
        .iter()
        .map(|a| {
            format!(
                "<link rel=\"alternate\" hreflang=\"{}\" href=\"{}/articles/{}/\">",
                a.language, origin, a.slug
            )
        })
        .collect();

    if let Some(english) = related.iter().find(|a| a.language == "en") {
        tags.push(format!(
            "<link rel=\"alternate\" hreflang=\"x-default\" href=\"{}/articles/{}/\">",
            origin, english.slug
        ));
    }

    tags.join("\n    ")
}

pub fn robots_txt(origin: &str, site_name: &str, today: NaiveDate) -> String {
    format!(
        "# robots.txt for {}\n# Generated: {}\n\nUser-agent: *\nAllow: /\n\n# Sitemap location\nSitemap: {}/sitemap.xml\n\nCrawl-delay: 1\n",
        site_name,
        today.format("%Y-%m-%d"),
        origin
    )
}

fn sitemap_url(loc: &str, lastmod: NaiveDate, changefreq: &str, priority: &str) -> String {
    format!(
        "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{}</priority>\n  </url>",
        loc,
        lastmod.format("%Y-%m-%d"),
        changefreq,
        priority
    )
}

/// Homepage (daily, 1.0) plus one monthly 0.8 entry per article.
pub fn sitemap_xml(articles: &[Article], origin: &str, today: NaiveDate) -> String {
    let mut urls = vec![sitemap_url(&format!("{}/", origin), today, "daily", "1.0")];
    urls.extend(articles.iter().map(|a| {
        sitemap_url(
            &format!("{}/articles/{}/", origin, a.slug),
            a.generated_on(),
            "monthly",
            "0.8",
        )
    }));

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"\n        xmlns:xhtml=\"http://www.w3.org/1999/xhtml\">\n{}\n</urlset>",
        urls.join("\n")
    )
}
