//! HTML text and page context extraction.

use once_cell::sync::Lazy;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

use crate::domain::content::{
    collapse_whitespace, MediaKind, PageContext, PageImage, PageMetadata, VisualElement,
};
use crate::ports::ExtractionError;

/// Elements whose text never reaches the classifier.
const HIDDEN_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "aside", "noscript",
];

/// Tried in order; the first match is the main content.
const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    ".content",
    "#content",
    ".main-content",
    ".post-content",
    ".entry-content",
    ".article-content",
    ".post-body",
];

pub const MAX_IMAGES: usize = 10;
pub const MAX_VIDEOS: usize = 5;
pub const MAX_EMBEDS: usize = 3;

static MAIN_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| parse_all(MAIN_CONTENT_SELECTORS));
static BODY: Lazy<Vec<Selector>> = Lazy::new(|| parse_all(&["body"]));
static TITLE: Lazy<Vec<Selector>> = Lazy::new(|| parse_all(&["title"]));
static META: Lazy<Vec<Selector>> = Lazy::new(|| parse_all(&["meta"]));
static IMAGES: Lazy<Vec<Selector>> = Lazy::new(|| parse_all(&["img"]));
static VIDEOS: Lazy<Vec<Selector>> = Lazy::new(|| parse_all(&["video, iframe"]));
static EMBEDS: Lazy<Vec<Selector>> = Lazy::new(|| parse_all(&["embed, object"]));

fn parse_all(selectors: &[&str]) -> Vec<Selector> {
    selectors
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .collect()
}

fn select<'a>(document: &'a Html, selectors: &'a [Selector]) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    selectors
        .iter()
        .flat_map(move |selector| document.select(selector))
}

/// True when the element sits inside (or is) a hidden tag.
fn is_hidden(element: ElementRef<'_>) -> bool {
    std::iter::once(*element)
        .chain(element.ancestors())
        .filter_map(|node| node.value().as_element())
        .any(|e| HIDDEN_TAGS.contains(&e.name()))
}

/// Text of `element`, minus anything inside hidden tags.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .filter_map(|a| a.value().as_element())
            .any(|e| HIDDEN_TAGS.contains(&e.name()));
        if !hidden {
            out.push_str(text);
            out.push(' ');
        }
    }
    collapse_whitespace(&out)
}

/// Extracts the main readable text of an HTML document.
pub fn extract_main_text(html: &str) -> Result<String, ExtractionError> {
    let document = Html::parse_document(html);

    let main = MAIN_SELECTORS
        .iter()
        .find_map(|selector| document.select(selector).find(|e| !is_hidden(*e)));

    let text = match main.or_else(|| select(&document, &BODY).next()) {
        Some(element) => visible_text(element),
        None => visible_text(document.root_element()),
    };

    if text.is_empty() {
        return Err(ExtractionError::NoReadableText);
    }
    Ok(text)
}

/// Collects metadata, images and embedded media of a page.
///
/// Relative image sources are resolved against `base_url`.
pub fn extract_page_context(html: &str, base_url: &Url) -> PageContext {
    let document = Html::parse_document(html);

    PageContext {
        metadata: extract_metadata(&document),
        images: extract_images(&document, base_url),
        visual_elements: extract_visual_elements(&document),
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

fn extract_metadata(document: &Html) -> PageMetadata {
    let mut metadata = PageMetadata {
        title: select(document, &TITLE)
            .next()
            .and_then(|t| non_empty(Some(collapse_whitespace(&t.text().collect::<String>()).as_str()))),
        ..Default::default()
    };

    for meta in select(document, &META) {
        let element = meta.value();
        let Some(key) = element.attr("name").or_else(|| element.attr("property")) else {
            continue;
        };
        let Some(content) = non_empty(element.attr("content")) else {
            continue;
        };

        let slot = match key.trim().to_ascii_lowercase().as_str() {
            "description" => &mut metadata.description,
            "author" => &mut metadata.author,
            "keywords" => &mut metadata.keywords,
            "og:title" => &mut metadata.og_title,
            "og:description" => &mut metadata.og_description,
            "og:image" => &mut metadata.og_image,
            "twitter:title" => &mut metadata.twitter_title,
            "twitter:description" => &mut metadata.twitter_description,
            "twitter:image" => &mut metadata.twitter_image,
            _ => continue,
        };
        slot.get_or_insert(content);
    }

    metadata
}

fn extract_images(document: &Html, base_url: &Url) -> Vec<PageImage> {
    select(document, &IMAGES)
        .take(MAX_IMAGES)
        .filter_map(|img| {
            let element = img.value();
            let src = non_empty(element.attr("src"))?;
            let src = base_url
                .join(&src)
                .map(|u| u.to_string())
                .unwrap_or(src);
            Some(PageImage {
                src,
                alt: non_empty(element.attr("alt")),
                title: non_empty(element.attr("title")),
            })
        })
        .collect()
}

fn extract_visual_elements(document: &Html) -> Vec<VisualElement> {
    let videos = select(document, &VIDEOS).take(MAX_VIDEOS).map(|e| VisualElement {
        kind: MediaKind::Video,
        src: non_empty(e.value().attr("src")),
        detail: non_empty(e.value().attr("title")),
    });

    let embeds = select(document, &EMBEDS).take(MAX_EMBEDS).map(|e| VisualElement {
        kind: MediaKind::Embed,
        src: non_empty(e.value().attr("src").or_else(|| e.value().attr("data"))),
        detail: non_empty(e.value().attr("type")),
    });

    videos.chain(embeds).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/blog/post").unwrap()
    }

    #[test]
    fn prefers_main_content_and_drops_chrome() {
        let html = r#"<html><head><title>T</title><style>.x{}</style></head><body>
            <header>Site header</header>
            <nav>Home | About</nav>
            <main><h1>Big news</h1><p>We   launched
            today.</p><script>track()</script></main>
            <footer>Copyright</footer></body></html>"#;

        assert_eq!(extract_main_text(html).unwrap(), "Big news We launched today.");
    }

    #[test]
    fn falls_back_to_body_without_main_selectors() {
        let html = "<html><body><div>Plain page</div><aside>Ads</aside></body></html>";
        assert_eq!(extract_main_text(html).unwrap(), "Plain page");
    }

    #[test]
    fn class_selectors_are_tried_in_order() {
        let html = r#"<body><div class="sidebar">Side</div>
            <div class="post-content">Post body</div></body>"#;
        assert_eq!(extract_main_text(html).unwrap(), "Post body");
    }

    #[test]
    fn main_inside_hidden_tag_is_ignored() {
        let html = "<body><nav><article>Menu</article></nav><p>Real text</p></body>";
        assert_eq!(extract_main_text(html).unwrap(), "Real text");
    }

    #[test]
    fn empty_page_has_no_readable_text() {
        let html = "<html><body><script>only()</script>   </body></html>";
        assert_eq!(extract_main_text(html), Err(ExtractionError::NoReadableText));
    }

    #[test]
    fn metadata_reads_name_and_property_tags() {
        let html = r#"<html><head>
            <title> Launch   Day </title>
            <meta name="description" content="Our product">
            <meta name="author" content="Jo">
            <meta property="og:title" content="OG Launch">
            <meta property="og:image" content="https://cdn.example.com/og.png">
            <meta name="twitter:description" content="Tweet text">
            <meta name="description" content="second one ignored">
            </head><body></body></html>"#;

        let context = extract_page_context(html, &base());
        let meta = context.metadata;
        assert_eq!(meta.title.as_deref(), Some("Launch Day"));
        assert_eq!(meta.description.as_deref(), Some("Our product"));
        assert_eq!(meta.author.as_deref(), Some("Jo"));
        assert_eq!(meta.og_title.as_deref(), Some("OG Launch"));
        assert_eq!(meta.og_image.as_deref(), Some("https://cdn.example.com/og.png"));
        assert_eq!(meta.twitter_description.as_deref(), Some("Tweet text"));
        assert_eq!(meta.keywords, None);
    }

    #[test]
    fn images_are_resolved_and_capped() {
        let mut html = String::from(
            r#"<body><img src="/a.png" alt="Logo"><img src="//cdn.example.com/b.png" title="B">
               <img alt="no src"><img src="c.png">"#,
        );
        for i in 0..12 {
            html.push_str(&format!(r#"<img src="/extra{}.png">"#, i));
        }
        html.push_str("</body>");

        let images = extract_page_context(&html, &base()).images;

        assert_eq!(images[0].src, "https://example.com/a.png");
        assert_eq!(images[0].alt.as_deref(), Some("Logo"));
        assert_eq!(images[1].src, "https://cdn.example.com/b.png");
        assert_eq!(images[2].src, "https://example.com/blog/c.png");
        // the source-less image counts toward the cap but is skipped
        assert_eq!(images.len(), MAX_IMAGES - 1);
    }

    #[test]
    fn media_elements_are_capped_per_kind() {
        let mut html = String::from("<body>");
        for i in 0..7 {
            html.push_str(&format!(r#"<iframe src="https://v.example.com/{}" title="clip {}"></iframe>"#, i, i));
        }
        for _ in 0..4 {
            html.push_str(r#"<embed src="/x.swf" type="application/x-shockwave-flash">"#);
        }
        html.push_str("</body>");

        let elements = extract_page_context(&html, &base()).visual_elements;
        let videos: Vec<_> = elements.iter().filter(|e| e.kind == MediaKind::Video).collect();
        let embeds: Vec<_> = elements.iter().filter(|e| e.kind == MediaKind::Embed).collect();

        assert_eq!(videos.len(), MAX_VIDEOS);
        assert_eq!(videos[0].detail.as_deref(), Some("clip 0"));
        assert_eq!(embeds.len(), MAX_EMBEDS);
        assert_eq!(embeds[0].description(), "Embedded content: application/x-shockwave-flash");
    }
}
