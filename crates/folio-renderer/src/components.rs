//! HTML for registered components.
//!
//! Class names are Tailwind utility classes; the site stylesheet defines them.

use std::fmt::Write;

use folio_compiler::{CalloutKind, HighlightColor, OVERVIEW_ID, Placement, TitleBlock, VideoPlayer};

use crate::html::escape_html;
use crate::view::MediaChoice;

const ARROW_RIGHT_SVG: &str = r#"<svg width="16" height="16" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5" aria-hidden="true"><path d="M3 12h18m0 0-8.5-8.5M21 12l-8.5 8.5" stroke-linecap="round" stroke-linejoin="round"/></svg>"#;
const CLOCK_SVG: &str = r#"<svg class="w-4 h-4" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5" aria-hidden="true"><path d="M12 6v6h6" stroke-linecap="round" stroke-linejoin="round"/><path d="M12 22c5.523 0 10-4.477 10-10S17.523 2 12 2 2 6.477 2 12s4.477 10 10 10Z" stroke-linecap="round" stroke-linejoin="round"/></svg>"#;
const MAP_SVG: &str = r#"<svg class="w-4 h-4" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="1.5" aria-hidden="true"><path d="m9 19-5.21 1.737a.6.6 0 0 1-.79-.57V5.433a.6.6 0 0 1 .41-.569L9 3m0 16 6 2m-6-2V3m6 18 5.59-1.863a.6.6 0 0 0 .41-.57V3.832a.6.6 0 0 0-.79-.569L15 5m0 16V5m0 0L9 3" stroke-linecap="round" stroke-linejoin="round"/></svg>"#;

pub(crate) const IMAGE_STACK_CLASS: &str = "flex flex-col gap-2 my-4 [&_img]:my-0";
const ANCHOR_CLASS: &str = "font-mono text-md text-tx-primary mb-5 scroll-mt-24 bg-bg-secondary px-2 py-2 rounded";
const ANCHOR_MARKER_CLASS: &str = "scroll-mt-24";
const DEMO_BUTTON_CLASS: &str = "inline-flex items-center justify-center gap-2 rounded-md px-4 py-2 text-sm font-medium bg-brand text-white";
const PLACEHOLDER_STYLE: &str = "background-color: #f0f0f0; display: flex; align-items: center; justify-content: center";

pub(crate) fn highlight_class(color: HighlightColor) -> &'static str {
    match color {
        HighlightColor::Yellow => "px-2 py-1 rounded bg-yellow-200 dark:bg-yellow-800",
        HighlightColor::Blue => "px-2 py-1 rounded bg-blue-200 dark:bg-blue-800",
        HighlightColor::Green => "px-2 py-1 rounded bg-green-200 dark:bg-green-800",
        HighlightColor::Red => "px-2 py-1 rounded bg-red-200 dark:bg-red-800",
    }
}

pub(crate) fn callout_class(kind: CalloutKind) -> &'static str {
    match kind {
        CalloutKind::Info => "border-l-4 p-4 my-4 border-blue-500 bg-blue-50 dark:bg-blue-950",
        CalloutKind::Warning => "border-l-4 p-4 my-4 border-yellow-500 bg-yellow-50 dark:bg-yellow-950",
        CalloutKind::Success => "border-l-4 p-4 my-4 border-green-500 bg-green-50 dark:bg-green-950",
        CalloutKind::Error => "border-l-4 p-4 my-4 border-red-500 bg-red-50 dark:bg-red-950",
    }
}

/// Element name for a box-like component at the given placement.
pub(crate) fn box_tag(placement: Placement) -> &'static str {
    match placement {
        Placement::Block => "div",
        Placement::Inline => "span",
    }
}

/// Anchor target. Hidden anchors render only an empty marker.
pub(crate) fn anchor(id: &str, visible: bool, label_html: &str, placement: Placement) -> String {
    let tag = box_tag(placement);
    let id = escape_html(id);
    if visible {
        format!(r#"<{tag} id="{id}" class="{ANCHOR_CLASS}"># {label_html}</{tag}>"#)
    } else {
        format!(r#"<{tag} id="{id}" class="{ANCHOR_MARKER_CLASS}"></{tag}>"#)
    }
}

/// Article header. Empty blocks render nothing.
pub(crate) fn title_section(block: &TitleBlock) -> String {
    if block.is_empty() {
        return String::new();
    }

    let mut html = format!(r#"<section class="mb-4 scroll-mt-24" id="{OVERVIEW_ID}">"#);
    if let Some(title) = &block.title {
        let _ = write!(
            html,
            r#"<h1 class="text-xl text-tx-primary leading-[2.5rem]">{}</h1>"#,
            escape_html(title)
        );
    }
    if let Some(subtitle) = &block.subtitle {
        let _ = write!(
            html,
            r#"<h5 class="font-mono text-md text-tx-secondary">{}</h5>"#,
            escape_html(subtitle)
        );
    }
    html.push_str(r#"<div role="none" class="shrink-0 h-[1px] w-full mt-4 mb-4 bg-bd-secondary"></div>"#);
    html.push_str(r#"<div class="flex gap-6 font-mono text-tx-tertiary text-xs">"#);
    if let Some(date) = &block.date {
        let _ = write!(
            html,
            r#"<div class="flex gap-2 items-center"><span title="Published on">{CLOCK_SVG}</span><span>{}</span></div>"#,
            escape_html(&date.to_string())
        );
    }
    if let Some(location) = &block.location {
        let _ = write!(
            html,
            r#"<div class="flex gap-2 items-center"><span title="Created at">{MAP_SVG}</span><span>{}</span></div>"#,
            escape_html(location)
        );
    }
    html.push_str("</div></section>");
    html
}

/// Video player in its current state: a sized placeholder until a choice is
/// committed, then exactly one of video or image.
pub(crate) fn video_player(player: &VideoPlayer, choice: Option<MediaChoice>, breakpoint: u32) -> String {
    let width = css_length(&player.width);
    let height = css_length(&player.height);
    let video_url = escape_html(&player.video_url);
    let fallback_url = escape_html(&player.fallback_url);

    let inner = match choice {
        None => format!(
            r#"<div class="video-placeholder" data-video-url="{video_url}" data-gif-url="{fallback_url}" data-breakpoint="{breakpoint}" style="width: {width}; height: {height}; {PLACEHOLDER_STYLE}">Loading...</div>"#
        ),
        Some(MediaChoice::Video) => format!(
            r#"<video src="{video_url}" style="width: {width}; height: {height}" autoplay muted loop playsinline></video>"#
        ),
        Some(MediaChoice::Image) => format!(
            r#"<img src="{fallback_url}" alt="" sizes="225vw" style="width: 100%; height: auto">"#
        ),
    };
    format!(
        r#"<div class="player-wrapper card my-12" data-video-index="{}">{inner}</div>"#,
        player.index
    )
}

/// Link styled as a button, with a trailing arrow.
pub(crate) fn demo_button(href: &str, label_html: &str, placement: Placement) -> String {
    let link = format!(
        r#"<a href="{}" class="{DEMO_BUTTON_CLASS}">{label_html}{ARROW_RIGHT_SVG}</a>"#,
        escape_html(href)
    );
    match placement {
        Placement::Block => format!(r#"<div class="my-6">{link}</div>"#),
        Placement::Inline => link,
    }
}

/// Bare numbers are pixels; anything else is passed through as a CSS length.
fn css_length(value: &str) -> String {
    let value = value.trim();
    let numeric = !value.is_empty() && value.chars().all(|c| c.is_ascii_digit() || c == '.');
    if numeric {
        format!("{value}px")
    } else {
        escape_html(value)
    }
}

#[cfg(test)]
mod tests {
    use folio_frontmatter::DateValue;
    use pretty_assertions::assert_eq;

    use super::*;

    fn player() -> VideoPlayer {
        VideoPlayer {
            index: 0,
            width: "640".to_owned(),
            height: "360".to_owned(),
            video_url: "/media/demo.mp4".to_owned(),
            fallback_url: "/media/demo.gif".to_owned(),
        }
    }

    #[test]
    fn test_hidden_anchor_is_empty_marker() {
        assert_eq!(
            anchor("intro", false, "ignored", Placement::Block),
            r#"<div id="intro" class="scroll-mt-24"></div>"#
        );
    }

    #[test]
    fn test_visible_anchor() {
        let html = anchor("setup", true, "Setup", Placement::Inline);
        assert!(html.starts_with(r#"<span id="setup" class="font-mono"#), "{html}");
        assert!(html.ends_with("># Setup</span>"), "{html}");
    }

    #[test]
    fn test_title_section_empty() {
        assert_eq!(title_section(&TitleBlock::default()), "");
    }

    #[test]
    fn test_title_section_fields() {
        let block = TitleBlock {
            title: Some("Case Study".to_owned()),
            subtitle: None,
            date: Some(DateValue::parse("2024-03-04")),
            location: Some("Lisbon & Porto".to_owned()),
        };
        let html = title_section(&block);
        assert!(html.starts_with(r#"<section class="mb-4 scroll-mt-24" id="overview">"#));
        assert!(html.contains(">Case Study</h1>"));
        assert!(!html.contains("<h5"));
        assert!(html.contains("<span>March 4, 2024</span>"));
        assert!(html.contains("<span>Lisbon &amp; Porto</span>"));
        assert!(!html.contains('\n'));
    }

    #[test]
    fn test_video_placeholder_carries_both_sources() {
        let html = video_player(&player(), None, 768);
        assert!(html.contains(r#"data-video-url="/media/demo.mp4""#));
        assert!(html.contains(r#"data-gif-url="/media/demo.gif""#));
        assert!(html.contains("width: 640px; height: 360px"));
        assert!(html.contains("Loading..."));
        assert!(!html.contains("<video"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_video_choice() {
        let video = video_player(&player(), Some(MediaChoice::Video), 768);
        assert!(video.contains(r#"<video src="/media/demo.mp4""#));
        assert!(!video.contains("<img"));

        let image = video_player(&player(), Some(MediaChoice::Image), 768);
        assert!(image.contains(r#"<img src="/media/demo.gif""#));
        assert!(!image.contains("<video"));
    }

    #[test]
    fn test_demo_button() {
        let html = demo_button("/demos/arboretum", "Go to demo", Placement::Block);
        assert!(html.starts_with(r#"<div class="my-6"><a href="/demos/arboretum""#));
        assert!(html.contains("Go to demo<svg"));
    }

    #[test]
    fn test_css_length() {
        assert_eq!(css_length("640"), "640px");
        assert_eq!(css_length("12.5"), "12.5px");
        assert_eq!(css_length("100%"), "100%");
        assert_eq!(css_length("20rem"), "20rem");
    }
}
