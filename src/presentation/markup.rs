//! HTML rendering of image elements.

use std::fmt::Write;

use super::widgets::ImageAttributes;

/// Escapes a value for use inside a double-quoted attribute.
#[must_use]
pub fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders an `<img>` tag for the given attributes.
#[must_use]
pub fn render_img(attributes: &ImageAttributes) -> String {
    let mut html = String::from("<img");
    let mut attr = |name: &str, value: &str| {
        let _ = write!(html, " {name}=\"{}\"", escape_attribute(value));
    };

    if let Some(src) = &attributes.src {
        attr("src", src);
    }
    if let Some(srcset) = &attributes.srcset {
        attr("srcset", srcset);
    }
    if let Some(data_src) = &attributes.data_src {
        attr("data-src", data_src);
    }
    if let Some(data_srcset) = &attributes.data_srcset {
        attr("data-srcset", data_srcset);
    }
    attr("sizes", &attributes.sizes);
    attr("loading", attributes.loading.as_str());
    attr("decoding", "async");
    attr("alt", &attributes.alt);

    html.push('>');
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::LoadingMode;

    fn attributes() -> ImageAttributes {
        ImageAttributes {
            src: Some("a.jpg?fmt=webp&w=320&q=85".to_string()),
            srcset: Some("a.jpg?fmt=webp&w=320&q=85 320w".to_string()),
            data_src: None,
            data_srcset: None,
            sizes: "320px".to_string(),
            loading: LoadingMode::Eager,
            alt: "A \"quoted\" <alt>".to_string(),
        }
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(escape_attribute("a&b\"c<d>"), "a&amp;b&quot;c&lt;d&gt;");
    }

    #[test]
    fn test_render_live_image() {
        let html = render_img(&attributes());

        assert!(html.starts_with("<img src=\"a.jpg?fmt=webp&amp;w=320&amp;q=85\""));
        assert!(html.contains(" sizes=\"320px\""));
        assert!(html.contains(" loading=\"eager\""));
        assert!(html.contains(" alt=\"A &quot;quoted&quot; &lt;alt&gt;\""));
        assert!(!html.contains("data-src"));
        assert!(html.ends_with('>'));
    }

    #[test]
    fn test_render_placeholder() {
        let mut placeholder = attributes();
        placeholder.data_src = placeholder.src.take();
        placeholder.data_srcset = placeholder.srcset.take();
        placeholder.loading = LoadingMode::Lazy;

        let html = render_img(&placeholder);

        assert!(html.starts_with("<img data-src="));
        assert!(html.contains(" data-srcset="));
        assert!(!html.contains(" src="));
        assert!(html.contains(" loading=\"lazy\""));
    }
}
