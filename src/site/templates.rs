//! Page templates. Both are registered with an `.html` name so tera
//! autoescapes every interpolation; pre-rendered fragments use `| safe`.

use tera::Tera;

pub const ARTICLE_TEMPLATE_NAME: &str = "article.html";
pub const INDEX_TEMPLATE_NAME: &str = "index.html";

pub const ARTICLE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="{{ lang }}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <link rel="icon" type="image/png" href="/favicon.png">
    <title>{{ title }} | {{ site_name }}</title>
    <meta name="description" content="{{ description }}">
    <link rel="canonical" href="{{ page_url }}">

    <meta property="og:type" content="article">
    <meta property="og:url" content="{{ page_url }}">
    <meta property="og:title" content="{{ title }}">
    <meta property="og:description" content="{{ description }}">
    <meta property="og:image" content="{{ image_url }}">
    <meta property="og:site_name" content="{{ site_name }}">
    <meta property="og:locale" content="{{ og_locale }}">
    <meta property="article:published_time" content="{{ iso_date }}">

    <meta name="twitter:card" content="summary_large_image">
    <meta name="twitter:title" content="{{ title }}">
    <meta name="twitter:description" content="{{ description }}">
    <meta name="twitter:image" content="{{ image_url }}">

    {{ hreflang_tags | safe }}

    <script type="application/ld+json">
{{ article_schema | safe }}
    </script>
    {{ faq_schema | safe }}
    <link rel="stylesheet" href="/assets/style.css">
</head>
<body>
    <header class="site-header">
        <a href="/" class="logo">{{ site_name }}</a>
    </header>
    <main class="article">
        <p class="meta"><time datetime="{{ date }}">{{ date }}</time> &middot; {{ product_scent }}</p>
        <h1>{{ title }}</h1>
        <div class="article-body">
{{ body_html | safe }}
        </div>
        <aside class="product-cta">
            {% if product_image %}<img src="/assets/images/{{ product_image }}" alt="{{ product_name }}" loading="lazy">{% endif %}
            <div>
                <h2>{{ product_name }}</h2>
                <a class="cta-button" href="{{ product_link }}" rel="noopener" target="_blank">Shop on {{ marketplace }}</a>
            </div>
        </aside>
    </main>
    <footer class="site-footer">
        <a href="/">&larr; {{ site_name }}</a>
    </footer>
</body>
</html>
"#;

pub const INDEX_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <link rel="icon" type="image/png" href="/favicon.png">
    <title>{{ site_name }}</title>
    <link rel="canonical" href="{{ origin }}/">
    <link rel="stylesheet" href="/assets/style.css">
    <script id="site-config" type="application/json">{{ config_json | safe }}</script>
</head>
<body>
    <header class="site-header">
        <a href="/" class="logo">{{ site_name }}</a>
        <nav class="languages">
            {% for language in languages %}<a href="#{{ language.code }}" data-lang="{{ language.code }}">{{ language.name }}</a>
            {% endfor %}
        </nav>
    </header>
    <main>
        <ul class="article-list">
        {% for article in articles %}
            <li data-lang="{{ article.language }}" data-product="{{ article.product }}">
                <a href="/articles/{{ article.slug }}/">{{ article.title }}</a>
                <span class="meta">{{ article.product_name }} &middot; {{ article.date }}</span>
            </li>
        {% endfor %}
        {% if articles | length == 0 %}
            <li class="empty">No articles yet.</li>
        {% endif %}
        </ul>
    </main>
</body>
</html>
"##;

/// Registers both page templates.
pub fn site_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        (ARTICLE_TEMPLATE_NAME, ARTICLE_TEMPLATE),
        (INDEX_TEMPLATE_NAME, INDEX_TEMPLATE),
    ])?;
    Ok(tera)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_parse() {
        let tera = site_templates().expect("templates should parse");
        let names: Vec<&str> = tera.get_template_names().collect();
        assert!(names.contains(&ARTICLE_TEMPLATE_NAME));
        assert!(names.contains(&INDEX_TEMPLATE_NAME));
    }

    #[test]
    fn test_index_renders_language_anchors() {
        let tera = site_templates().expect("templates should parse");
        let mut ctx = tera::Context::new();
        ctx.insert("site_name", "Tallow & Co");
        ctx.insert("origin", "https://example.com");
        ctx.insert("config_json", "{}");
        ctx.insert(
            "languages",
            &serde_json::json!([{ "code": "de", "name": "Deutsch" }]),
        );
        ctx.insert("articles", &Vec::<serde_json::Value>::new());

        let html = tera.render(INDEX_TEMPLATE_NAME, &ctx).expect("render index");
        assert!(html.contains(r##"<a href="#de" data-lang="de">Deutsch</a>"##));
        assert!(html.contains("No articles yet."));
        assert!(html.contains("Tallow &amp; Co"));
        assert!(html.trim_end().ends_with("</html>"));
    }
}
