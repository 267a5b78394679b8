//! Static site rendering.
//!
//! [`build_site`] turns the stored articles into a self-contained directory:
//! the homepage, one page per article, `robots.txt`, `sitemap.xml`, a JSON
//! manifest for client-side filtering and the product images.

pub mod render;
pub mod server;
pub mod templates;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::{BlogConfig, LanguageConfig, ProductConfig, SiteSettings};
use crate::error::SiteError;
use crate::storage::Article;

pub use render::{
    description, extract_faqs, faq_schema, hreflang_tags, markdown_to_html, og_locale,
    robots_txt, sitemap_xml, Faq,
};
pub use server::serve;
pub use templates::site_templates;

/// What a build wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub output_dir: PathBuf,
    pub images_copied: usize,
    pub favicon: bool,
    pub articles: usize,
    pub sitemap_urls: usize,
}

/// Origin used for every absolute URL.
pub fn site_origin(site: &SiteSettings) -> String {
    let base = site.base_url.trim().trim_end_matches('/');
    if base.is_empty() {
        site.fallback_origin.trim_end_matches('/').to_string()
    } else {
        base.to_string()
    }
}

#[derive(Serialize)]
struct ManifestEntry<'a> {
    slug: &'a str,
    title: &'a str,
    body: &'a str,
    product: &'a str,
    product_name: &'a str,
    product_link: &'a str,
    product_image: &'a str,
    language: &'a str,
    angle: &'a str,
    generated_at: &'a chrono::NaiveDateTime,
}

impl<'a> From<&'a Article> for ManifestEntry<'a> {
    fn from(a: &'a Article) -> Self {
        Self {
            slug: &a.slug,
            title: &a.title,
            body: &a.body,
            product: &a.product,
            product_name: &a.product_name,
            product_link: &a.product_link,
            product_image: &a.product_image,
            language: &a.language,
            angle: &a.angle,
            generated_at: &a.generated_at,
        }
    }
}

#[derive(Serialize)]
struct FrontendConfig<'a> {
    products: &'a [ProductConfig],
    languages: &'a [LanguageConfig],
}

#[derive(Serialize)]
struct IndexEntry<'a> {
    slug: &'a str,
    title: &'a str,
    product: &'a str,
    product_name: &'a str,
    language: &'a str,
    date: String,
}

/// Renders the whole site into `config.paths.output_dir`.
///
/// Everything previously in the output directory is removed first.
pub fn build_site(
    config: &BlogConfig,
    articles: &[Article],
    today: NaiveDate,
) -> Result<BuildSummary, SiteError> {
    let output_dir = &config.paths.output_dir;
    let origin = site_origin(&config.site);
    let tera = site_templates()?;

    clean_output_dir(output_dir)?;
    fs::create_dir_all(output_dir)?;

    let (images_copied, favicon) = copy_images(&config.paths.images_dir, output_dir)?;
    tracing::info!(images = images_copied, favicon, "Copied images");

    let index = render_index(&tera, config, articles, &origin)?;
    fs::write(output_dir.join("index.html"), index)?;

    fs::write(
        output_dir.join("robots.txt"),
        robots_txt(&origin, &config.site.name, today),
    )?;
    fs::write(
        output_dir.join("sitemap.xml"),
        sitemap_xml(articles, &origin, today),
    )?;

    let data_dir = output_dir.join("data");
    fs::create_dir_all(&data_dir)?;
    let manifest: Vec<ManifestEntry> = articles.iter().map(ManifestEntry::from).collect();
    fs::write(
        data_dir.join("articles.json"),
        serde_json::to_string(&manifest)?,
    )?;

    for article in articles {
        let page = render_article(&tera, config, article, articles, &origin)?;
        let page_dir = output_dir.join("articles").join(&article.slug);
        fs::create_dir_all(&page_dir)?;
        fs::write(page_dir.join("index.html"), page)?;
    }

    tracing::info!(
        output = %output_dir.display(),
        articles = articles.len(),
        "Site build complete"
    );

    Ok(BuildSummary {
        output_dir: output_dir.clone(),
        images_copied,
        favicon,
        articles: articles.len(),
        sitemap_urls: articles.len() + 1,
    })
}

fn clean_output_dir(dir: &Path) -> Result<(), SiteError> {
    if !dir.exists() {
        return Ok(());
    }

    for entry in WalkDir::new(dir).min_depth(1).contents_first(true) {
        let entry = entry?;
        if entry.file_type().is_dir() {
            fs::remove_dir(entry.path())?;
        } else {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

/// Copies top-level `*.png` files into `assets/images/`. A `favicon.png`
/// among them is also placed at the site root.
fn copy_images(images_dir: &Path, output_dir: &Path) -> Result<(usize, bool), SiteError> {
    let target = output_dir.join("assets").join("images");
    fs::create_dir_all(&target)?;

    if !images_dir.is_dir() {
        tracing::warn!(dir = %images_dir.display(), "Images directory not found");
        return Ok((0, false));
    }

    let mut copied = 0;
    let mut favicon = false;
    for entry in WalkDir::new(images_dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        let path = entry.path();
        let is_png = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if !entry.file_type().is_file() || !is_png {
            continue;
        }

        fs::copy(path, target.join(entry.file_name()))?;
        copied += 1;

        if entry.file_name() == "favicon.png" {
            fs::copy(path, output_dir.join("favicon.png"))?;
            favicon = true;
        }
    }

    Ok((copied, favicon))
}

fn render_index(
    tera: &tera::Tera,
    config: &BlogConfig,
    articles: &[Article],
    origin: &str,
) -> Result<String, SiteError> {
    let frontend = FrontendConfig {
        products: &config.products,
        languages: &config.languages,
    };
    let config_json = render::json_ld(&serde_json::to_value(&frontend)?);

    let mut entries: Vec<IndexEntry> = articles
        .iter()
        .map(|a| IndexEntry {
            slug: &a.slug,
            title: &a.title,
            product: &a.product,
            product_name: &a.product_name,
            language: &a.language,
            date: a.generated_on().format("%Y-%m-%d").to_string(),
        })
        .collect();
    entries.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(b.slug)));

    let mut ctx = tera::Context::new();
    ctx.insert("site_name", &config.site.name);
    ctx.insert("origin", origin);
    ctx.insert("config_json", &config_json);
    ctx.insert("languages", &config.languages);
    ctx.insert("articles", &entries);

    Ok(tera.render(templates::INDEX_TEMPLATE_NAME, &ctx)?)
}

fn render_article(
    tera: &tera::Tera,
    config: &BlogConfig,
    article: &Article,
    all: &[Article],
    origin: &str,
) -> Result<String, SiteError> {
    let product = config.product(&article.product).ok();
    let product_name = product.map_or(article.product_name.as_str(), |p| p.name.as_str());
    let product_image = product.map_or(article.product_image.as_str(), |p| p.image.as_str());
    let product_link = product
        .map(|p| p.link.as_str())
        .or(Some(article.product_link.as_str()))
        .filter(|l| !l.is_empty())
        .unwrap_or("#");
    let price = product.map_or(21.0, |p| p.price);
    let product_scent = product_name.rsplit(" - ").next().unwrap_or(product_name);

    let page_url = format!("{}/articles/{}/", origin, article.slug);
    let image_url = format!("{}/assets/images/{}", origin, product_image);
    let date = article.generated_on().format("%Y-%m-%d").to_string();
    let iso_date = article.generated_on().format("%Y-%m-%dT00:00:00Z").to_string();
    let desc = description(&article.body);

    let schema = serde_json::json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": article.title,
        "description": desc,
        "image": image_url,
        "datePublished": iso_date,
        "dateModified": iso_date,
        "inLanguage": article.language,
        "author": { "@type": "Organization", "name": config.site.name, "url": origin },
        "publisher": {
            "@type": "Organization",
            "name": config.site.name,
            "url": origin,
            "logo": { "@type": "ImageObject", "url": format!("{}/assets/images/logo.png", origin) },
        },
        "mainEntityOfPage": { "@type": "WebPage", "@id": page_url },
        "about": {
            "@type": "Product",
            "name": product_name,
            "image": image_url,
            "brand": { "@type": "Brand", "name": config.site.name },
            "offers": {
                "@type": "Offer",
                "url": product_link,
                "price": format!("{:.2}", price),
                "priceCurrency": "EUR",
                "priceValidUntil": config.site.price_valid_until,
                "availability": "https://schema.org/InStock",
                "itemCondition": "https://schema.org/NewCondition",
                "seller": { "@type": "Organization", "name": config.site.name },
            },
        },
    });

    let mut ctx = tera::Context::new();
    ctx.insert("lang", &article.language);
    ctx.insert("title", &article.title);
    ctx.insert("site_name", &config.site.name);
    ctx.insert("marketplace", &config.site.marketplace);
    ctx.insert("description", &desc);
    ctx.insert("page_url", &page_url);
    ctx.insert("image_url", &image_url);
    ctx.insert("og_locale", og_locale(&article.language));
    ctx.insert("iso_date", &iso_date);
    ctx.insert("date", &date);
    ctx.insert("hreflang_tags", &hreflang_tags(article, all, origin));
    ctx.insert("article_schema", &render::json_ld(&schema));
    ctx.insert("faq_schema", &faq_schema(&extract_faqs(&article.body)));
    ctx.insert("body_html", &markdown_to_html(&article.body));
    ctx.insert("product_name", product_name);
    ctx.insert("product_image", product_image);
    ctx.insert("product_link", product_link);
    ctx.insert("product_scent", product_scent);

    Ok(tera.render(templates::ARTICLE_TEMPLATE_NAME, &ctx)?)
}
