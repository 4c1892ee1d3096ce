//! Flip image injection into already-rendered listing markup.
//!
//! The listing template renders the product image block before anything
//! here runs. Instead of re-rendering it, the block is decorated in place:
//!
//! ```text
//! <span class="product-image-container ...">          ← + has-flip-image, data-flip-*, --flip-animation-speed
//!   <span class="product-image-wrapper">
//!     <span class="flip-image-container" data-animation-type data-animation-speed>
//!       <img class="product-image-photo primary-image" ...>
//!       <img class="product-image-photo flip-image" data-src=... loading="lazy" ...>
//!     </span>
//!   </span>
//! </span>
//! ```
//!
//! The flip element has no `src`; the client loads `data-src` on first hover.
//!
//! ## Scope
//!
//! This is a pattern match over one known template shape, not an HTML
//! parser. Markup without a `<img class="product-image-photo" ...>` element
//! is returned untouched. Decorated markup no longer matches that pattern, so
//! decorating twice changes nothing the second time.
//!
//! Every value written is escaped by maud. Values copied from the primary
//! element are entity-decoded first so they are not escaped twice.

use crate::config::AnimationType;
use crate::types::{ResolutionResult, ResolvedImage};
use maud::{PreEscaped, html};
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

static PRIMARY_IMG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<img\s+class="product-image-photo"[^>]*>"#).expect("primary image pattern")
});

static CONTAINER_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<[A-Za-z][A-Za-z0-9-]*(?:\s[^>]*)?\sclass="product-image-container[^"]*"[^>]*>"#)
        .expect("container tag pattern")
});

static CONTAINER_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"class="product-image-container([^"]*)""#).expect("container class pattern")
});

static STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\sstyle="([^"]*)""#).expect("style pattern"));

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s([A-Za-z_:][-A-Za-z0-9_:.]*)="([^"]*)""#).expect("attribute pattern")
});

const PRIMARY_CLASS: &str = r#"class="product-image-photo""#;
const PRIMARY_CLASS_MARKED: &str = r#"class="product-image-photo primary-image""#;

/// Dimensions and alt text of the primary image element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimaryImage {
    pub width: Option<String>,
    pub height: Option<String>,
    pub alt: Option<String>,
}

/// Metadata of the first primary image element in `markup`, if there is one.
pub fn primary_image(markup: &str) -> Option<PrimaryImage> {
    let tag = PRIMARY_IMG.find(markup)?.as_str();
    Some(PrimaryImage {
        width: extract_attribute(tag, "width"),
        height: extract_attribute(tag, "height"),
        alt: extract_attribute(tag, "alt"),
    })
}

/// Add the flip element for `image` to `markup`.
///
/// Returns the input unchanged (borrowed) when no primary image element is
/// found.
pub fn decorate<'m>(
    markup: &'m str,
    image: &ResolvedImage,
    animation: AnimationType,
    speed_ms: u32,
) -> Cow<'m, str> {
    let Some(found) = PRIMARY_IMG.find(markup) else {
        return Cow::Borrowed(markup);
    };
    let original = found.as_str();
    let primary = original.replacen(PRIMARY_CLASS, PRIMARY_CLASS_MARKED, 1);

    let alt = extract_attribute(original, "alt").unwrap_or_default();
    let flip_alt = if alt.trim().is_empty() {
        "Alternate View".to_string()
    } else {
        format!("{alt} - Alternate View")
    };

    let wrapped = html! {
        span class="flip-image-container"
            data-animation-type=(animation.as_str())
            data-animation-speed=(speed_ms) {
            (PreEscaped(primary))
            img class="product-image-photo flip-image"
                data-src=(image.url)
                loading="lazy"
                width=[extract_attribute(original, "width")]
                height=[extract_attribute(original, "height")]
                alt=(flip_alt);
        }
    }
    .into_string();

    let mut out = String::with_capacity(markup.len() + wrapped.len() + 256);
    out.push_str(&markup[..found.start()]);
    out.push_str(&wrapped);
    out.push_str(&markup[found.end()..]);

    let decorated = CONTAINER_TAG.replacen(&out, 1, |caps: &Captures| {
        decorate_container(&caps[0], image, animation, speed_ms)
    });
    Cow::Owned(decorated.into_owned())
}

/// Decorate `markup` for a resolution result.
///
/// No-op without an image. On success the result's image picks up the
/// primary element's width, height, and alt.
pub fn decorate_result<'m>(markup: &'m str, result: &mut ResolutionResult) -> Cow<'m, str> {
    let Some(image) = result.resolved_image.as_mut().filter(|_| result.has_image) else {
        return Cow::Borrowed(markup);
    };
    let Some(primary) = primary_image(markup) else {
        return Cow::Borrowed(markup);
    };
    image.width = primary.width;
    image.height = primary.height;
    image.alt = primary.alt;
    decorate(
        markup,
        image,
        result.animation_type,
        result.animation_speed_ms,
    )
}

/// Rewrite the container's opening tag.
///
/// The class attribute gains the flip classes, data attributes, and the CSS
/// speed variable. An existing inline style is merged into that one `style`
/// attribute; a tag never ends up with two.
fn decorate_container(
    tag: &str,
    image: &ResolvedImage,
    animation: AnimationType,
    speed_ms: u32,
) -> String {
    let existing_style = STYLE.captures(tag).map(|caps| caps[1].to_string());
    let without_style = STYLE.replacen(tag, 1, "");
    let style = merge_style(existing_style.as_deref(), speed_ms);
    CONTAINER_CLASS
        .replacen(&without_style, 1, |caps: &Captures| {
            format!(
                r#"class="product-image-container{existing} has-flip-image flip-animation-{animation}" data-flip-image="true" data-flip-url="{url}" data-animation-type="{animation}" data-animation-speed="{speed_ms}" style="{style}""#,
                existing = &caps[1],
                animation = escape(animation.as_str()),
                url = escape(&image.url),
            )
        })
        .into_owned()
}

/// Template declarations first, then the speed variable.
fn merge_style(existing: Option<&str>, speed_ms: u32) -> String {
    let rule = format!("--flip-animation-speed: {speed_ms}ms;");
    match existing.map(str::trim).filter(|s| !s.is_empty()) {
        Some(declarations) if declarations.ends_with(';') => format!("{declarations} {rule}"),
        Some(declarations) => format!("{declarations}; {rule}"),
        None => rule,
    }
}

/// Decoded value of `name` within a single tag.
fn extract_attribute(tag: &str, name: &str) -> Option<String> {
    ATTRIBUTE
        .captures_iter(tag)
        .find(|caps| caps[1].eq_ignore_ascii_case(name))
        .map(|caps| decode_entities(&caps[2]))
}

/// HTML-escape via maud.
fn escape(value: &str) -> String {
    html! { (value) }.into_string()
}

static NUMERIC_ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&#(?:[xX]([0-9A-Fa-f]{1,6})|([0-9]{1,7}));").expect("numeric entity pattern")
});

/// Decode the entities a template's attribute escaping produces: the named
/// ones for markup characters plus decimal and hex character references.
fn decode_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    let numeric = NUMERIC_ENTITY.replace_all(value, |caps: &Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, Some(dec)) => dec.as_str().parse().ok(),
            (None, None) => None,
        };
        // &amp; is decoded last, so a decoded '&' must not start a new entity
        match code.and_then(char::from_u32) {
            Some('&') => "&amp;".to_string(),
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    });
    numeric
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
