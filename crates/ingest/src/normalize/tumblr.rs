//! The tumblr-schema normalization path.
//!
//! This is where the bulk of the alias lists live: tumblr exports span the
//! most tool versions and therefore the most key spellings.

use super::NormalizeContext;
use crate::clean::cleanup;
use crate::consts::PERMALINK_REGEX;
use crate::models::{
    AnswerInfo, Body, CanonicalPost, ConversationInfo, LinkInfo, Payload, PhotoEntry, PhotoSet,
    PostKind, QuoteInfo, Utterance, VideoInfo,
};
use crate::raw::RawRecord;
use crate::timestamp::parse_timestamp;
use serde_json::Value;
use shoebox_media::all_media_extensions;

const BODY_ALIASES: &[&str] = &["post_html", "post-html", "regular_body", "regular-body", "body"];
const TITLE_ALIASES: &[&str] = &["regular_title", "regular-title", "title"];
const URL_ALIASES: &[&str] = &["url-with-slug", "url", "post_url"];
const TIMESTAMP_ALIASES: &[&str] = &["date", "date-gmt", "timestamp", "unix-timestamp"];
const PHOTO_CAPTION_ALIASES: &[&str] = &["photo_caption", "photo-caption", "caption"];

/// Resolution-specific URL fields, most preferred first. Used both on
/// per-photo objects and, for old single-photo posts, on the record itself.
const PHOTO_URL_FIELDS: &[&str] = &[
    "photo-url-1280",
    "photo-url-500",
    "photo-url-400",
    "photo-url-250",
    "photo-url-100",
    "photo-url-75",
];

pub(super) fn normalize(record: &RawRecord, ctx: &NormalizeContext<'_>) -> CanonicalPost {
    let id = record.id();
    let kind: PostKind = record.text(&["type"]).unwrap_or_default().parse().unwrap_or_default();

    let photos = collect_photos(record);
    let body_content = cleanup(record.text(BODY_ALIASES).unwrap_or_default());
    let answer_text = record.text(&["answer"]).unwrap_or_default();

    // Suppress the automatic media listing when the post already renders
    // its media some other way: an extension substring in the body or
    // answer, or a structured photo/video payload. Search-result dumps
    // never embed media, so they are forced on.
    let embeds_media = |text: &str| all_media_extensions().any(|ext| text.contains(&format!(".{ext}")));
    let show_media_files = ctx.blog_kind.is_search()
        || (!embeds_media(&body_content)
            && !embeds_media(answer_text)
            && kind != PostKind::Photo
            && kind != PostKind::Video);

    CanonicalPost {
        platform: ctx.platform,
        kind,
        created_at: record.first(TIMESTAMP_ALIASES).and_then(parse_timestamp),
        title: record.text(TITLE_ALIASES).map(cleanup).filter(|t| !t.is_empty()),
        url: record.text(URL_ALIASES).map(canonical_permalink),
        tags: record.text_list(&["tags"]),
        media_files: ctx.media.for_post(id.as_deref()),
        id,
        body: Body {
            content: body_content,
            // An extracted photo payload means the raw body already embeds
            // the same markup once.
            is_disabled: !photos.is_empty(),
            show_media_files,
        },
        payload: build_payload(record, kind, photos),
        summary: record.text(&["summary"]).map(str::to_string),
        reblogged_from: record
            .text(&["reblogged-from-name", "reblogged_from_name"])
            .map(str::to_string),
        reblogged_root: record
            .text(&["reblogged-root-name", "reblogged_root_name"])
            .map(str::to_string),
    }
}

fn build_payload(record: &RawRecord, kind: PostKind, photos: Vec<PhotoEntry>) -> Payload {
    match kind {
        PostKind::Regular => Payload::None,
        PostKind::Photo => Payload::Photo(PhotoSet { photos }),
        PostKind::Video => Payload::Video(VideoInfo {
            caption: owned_or_empty(record.text(&["video-caption", "video_caption"])),
            source: owned_or_empty(record.text(&["video-source", "video_source"])),
        }),
        PostKind::Quote => Payload::Quote(QuoteInfo {
            quote: owned_or_empty(record.text(&["quote-text", "quote_text"])),
            source: owned_or_empty(record.text(&["quote-source", "quote_source"])),
        }),
        PostKind::Answer => Payload::Answer(AnswerInfo {
            question: owned_or_empty(record.text(&["question"])),
            answer: owned_or_empty(record.text(&["answer"])),
        }),
        PostKind::Conversation => Payload::Conversation(ConversationInfo {
            title: record
                .text(&["conversation_title", "conversation-title"])
                .map(str::to_string),
            utterances: collect_utterances(record),
        }),
        PostKind::Link => Payload::Link(LinkInfo {
            url: owned_or_empty(record.text(&["link_url", "link-url"])),
            text: owned_or_empty(record.text(&["link_text", "link-text"])),
            description: owned_or_empty(record.text(&["link_description", "link-description"])),
        }),
    }
}

fn owned_or_empty(text: Option<&str>) -> String {
    text.unwrap_or_default().to_string()
}

fn collect_utterances(record: &RawRecord) -> Vec<Utterance> {
    record
        .array(&["conversation"])
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .map(|turn| {
                    let field = |name: &str| {
                        turn.get(name).and_then(Value::as_str).unwrap_or_default().to_string()
                    };
                    Utterance { label: field("label"), name: field("name"), phrase: field("phrase") }
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Photo groups come from three independent sources, in priority order:
/// the explicit multi-photo array; failing that, a photoset layout paired
/// with its photo array; failing that, the old single-photo record-level
/// fields.
fn collect_photos(record: &RawRecord) -> Vec<PhotoEntry> {
    if let Some(items) = record.array(&["photos"]) {
        let photos: Vec<PhotoEntry> = items.iter().filter_map(photo_array_entry).collect();
        if !photos.is_empty() {
            return photos;
        }
    }

    if let (Some(layout), Some(items)) =
        (record.text(&["photoset_layout"]), record.array(&["photoset_photos"]))
    {
        let spans = expand_layout(layout);
        let photos: Vec<PhotoEntry> = items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| photoset_entry(item, spans.get(index).copied()))
            .collect();
        if !photos.is_empty() {
            return photos;
        }
    }

    single_photo_fallback(record).into_iter().collect()
}

fn photo_array_entry(item: &Value) -> Option<PhotoEntry> {
    let fields = item.as_object()?;
    let urls: Vec<String> = PHOTO_URL_FIELDS
        .iter()
        .filter_map(|field| fields.get(*field))
        .filter_map(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect();
    if urls.is_empty() {
        return None;
    }
    let caption =
        fields.get("caption").and_then(Value::as_str).filter(|c| !c.is_empty()).map(str::to_string);
    Some(PhotoEntry { urls, caption, layout_span: None })
}

fn photoset_entry(item: &Value, layout_span: Option<u32>) -> Option<PhotoEntry> {
    let fields = item.as_object()?;
    let urls: Vec<String> = ["high_res", "low_res"]
        .iter()
        .filter_map(|field| fields.get(*field))
        .filter_map(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect();
    if urls.is_empty() {
        return None;
    }
    Some(PhotoEntry { urls, caption: None, layout_span })
}

fn single_photo_fallback(record: &RawRecord) -> Option<PhotoEntry> {
    let urls: Vec<String> = PHOTO_URL_FIELDS
        .iter()
        .filter_map(|field| record.text(&[*field]))
        .map(str::to_string)
        .collect();
    if urls.is_empty() {
        return None;
    }
    let caption = record.text(PHOTO_CAPTION_ALIASES).map(str::to_string);
    Some(PhotoEntry { urls, caption, layout_span: None })
}

/// A layout code string like "21" expands to per-photo column spans: one
/// row of two photos (span 2 each) then one full-width photo (span 1).
fn expand_layout(layout: &str) -> Vec<u32> {
    let mut spans = Vec::new();
    for span in layout.chars().filter_map(|c| c.to_digit(10)) {
        for _ in 0..span {
            spans.push(span);
        }
    }
    spans
}

/// Old permalinks point at the per-blog subdomain; canonicalize them to
/// the main-domain routing form.
fn canonical_permalink(url: &str) -> String {
    match PERMALINK_REGEX.captures(url) {
        Some(captures) => format!("https://tumblr.com/{}/{}", &captures[1], &captures[2]),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlogKind, Platform};
    use crate::normalize::MediaIndex;
    use rstest::rstest;
    use serde_json::json;
    use time::macros::utc_datetime;

    fn normalize_one(value: Value) -> CanonicalPost {
        normalize_with_kind(value, BlogKind::Tumblr)
    }

    fn normalize_with_kind(value: Value, blog_kind: BlogKind) -> CanonicalPost {
        let media = MediaIndex::default();
        let ctx = NormalizeContext { platform: Platform::Tumblr, blog_kind, media: &media };
        normalize(&RawRecord::from_value(value).unwrap(), &ctx)
    }

    #[test]
    fn quote_post_end_to_end() {
        let post = normalize_one(json!({
            "type": "quote",
            "quote-text": "Hi",
            "quote-source": "Me",
            "date": "2024-01-01 00:00:00 GMT",
        }));
        assert_eq!(post.kind, PostKind::Quote);
        assert_eq!(
            post.payload,
            Payload::Quote(QuoteInfo { quote: "Hi".into(), source: "Me".into() }),
        );
        assert_eq!(post.created_at, Some(utc_datetime!(2024-01-01 00:00:00)));
        assert!(!post.body.is_disabled);
        assert!(post.tags.is_empty());
    }

    #[rstest]
    #[case(json!({"type": "regular", "body": "plain"}))]
    #[case(json!({"type": "photo", "photo-url-1280": "https://x/a.jpg"}))]
    #[case(json!({"type": "video", "video-caption": "c"}))]
    #[case(json!({"type": "quote", "quote-text": "q"}))]
    #[case(json!({"type": "answer", "question": "?"}))]
    #[case(json!({"type": "conversation", "conversation": [{"name": "a", "label": "a:", "phrase": "hi"}]}))]
    #[case(json!({"type": "link", "link-url": "https://x"}))]
    #[case(json!({"type": "somethingelse"}))]
    #[case(json!({}))]
    fn payload_always_matches_kind(#[case] value: Value) {
        let post = normalize_one(value);
        assert!(post.kind.matches(&post.payload), "mismatch for {:?}", post.kind);
    }

    #[test]
    fn photo_array_takes_priority_over_single_fields() {
        let post = normalize_one(json!({
            "type": "photo",
            "photos": [
                {"photo-url-1280": "https://x/big1.jpg", "photo-url-500": "https://x/small1.jpg", "caption": "one"},
                {"photo-url-500": "https://x/small2.jpg"},
            ],
            "photo-url-1280": "https://x/ignored.jpg",
        }));
        let Payload::Photo(set) = &post.payload else { panic!("expected photo payload") };
        assert_eq!(set.photos.len(), 2);
        assert_eq!(set.photos[0].urls, vec!["https://x/big1.jpg", "https://x/small1.jpg"]);
        assert_eq!(set.photos[0].caption.as_deref(), Some("one"));
        assert_eq!(set.photos[1].urls, vec!["https://x/small2.jpg"]);
        assert!(post.body.is_disabled);
    }

    #[test]
    fn photoset_layout_expands_to_column_spans() {
        let post = normalize_one(json!({
            "type": "photo",
            "photoset_layout": "21",
            "photoset_photos": [
                {"high_res": "https://x/1.jpg", "low_res": "https://x/1s.jpg"},
                {"high_res": "https://x/2.jpg"},
                {"high_res": "https://x/3.jpg"},
            ],
        }));
        let Payload::Photo(set) = &post.payload else { panic!("expected photo payload") };
        let spans: Vec<_> = set.photos.iter().map(|p| p.layout_span).collect();
        assert_eq!(spans, vec![Some(2), Some(2), Some(1)]);
        assert_eq!(set.photos[0].urls, vec!["https://x/1.jpg", "https://x/1s.jpg"]);
    }

    #[test]
    fn photoset_is_ignored_when_photo_array_present() {
        let post = normalize_one(json!({
            "type": "photo",
            "photos": [{"photo-url-1280": "https://x/a.jpg"}],
            "photoset_layout": "1",
            "photoset_photos": [{"high_res": "https://x/b.jpg"}],
        }));
        let Payload::Photo(set) = &post.payload else { panic!("expected photo payload") };
        assert_eq!(set.photos.len(), 1);
        assert_eq!(set.photos[0].urls, vec!["https://x/a.jpg"]);
    }

    #[test]
    fn single_photo_fallback_with_caption_aliases() {
        let post = normalize_one(json!({
            "type": "photo",
            "photo-url-500": "https://x/only.jpg",
            "photo-caption": "lonely",
        }));
        let Payload::Photo(set) = &post.payload else { panic!("expected photo payload") };
        assert_eq!(set.photos.len(), 1);
        assert_eq!(set.photos[0].urls, vec!["https://x/only.jpg"]);
        assert_eq!(set.photos[0].caption.as_deref(), Some("lonely"));
    }

    #[test]
    fn permalink_is_canonicalized() {
        let post = normalize_one(json!({
            "type": "regular",
            "url-with-slug": "https://someblog.tumblr.com/post/123/slug-here",
        }));
        assert_eq!(post.url.as_deref(), Some("https://tumblr.com/someblog/123/slug-here"));
        let other = normalize_one(json!({"type": "regular", "url": "https://example.com/x"}));
        assert_eq!(other.url.as_deref(), Some("https://example.com/x"));
    }

    #[test]
    fn media_listing_suppressed_by_extension_substring() {
        let post = normalize_one(json!({"type": "regular", "body": "see photo.jpg inline"}));
        assert!(!post.body.show_media_files);
        let answer = normalize_one(json!({"type": "answer", "question": "?", "answer": "in clip.mp4"}));
        assert!(!answer.body.show_media_files);
        let clean = normalize_one(json!({"type": "regular", "body": "no media here"}));
        assert!(clean.body.show_media_files);
    }

    #[test]
    fn media_listing_suppressed_for_photo_and_video_kinds() {
        assert!(!normalize_one(json!({"type": "photo"})).body.show_media_files);
        assert!(!normalize_one(json!({"type": "video"})).body.show_media_files);
    }

    #[test]
    fn search_classification_forces_media_listing_on() {
        let post = normalize_with_kind(
            json!({"type": "regular", "body": "totally a photo.jpg"}),
            BlogKind::TumblrSearch,
        );
        assert!(post.body.show_media_files);
    }

    #[test]
    fn doubled_body_is_cleaned() {
        let post = normalize_one(json!({
            "type": "regular",
            "regular-body": "once upon a time once upon a time",
        }));
        assert_eq!(post.body.content, "once upon a time");
    }

    #[test]
    fn body_alias_precedence() {
        let post = normalize_one(json!({
            "type": "regular",
            "body": "third",
            "regular-body": "second",
            "post_html": "first",
        }));
        assert_eq!(post.body.content, "first");
    }

    #[test]
    fn reblog_names_and_summary_carry_over() {
        let post = normalize_one(json!({
            "type": "regular",
            "summary": "a summary",
            "reblogged-from-name": "middle",
            "reblogged-root-name": "origin",
        }));
        assert_eq!(post.summary.as_deref(), Some("a summary"));
        assert_eq!(post.reblogged_from.as_deref(), Some("middle"));
        assert_eq!(post.reblogged_root.as_deref(), Some("origin"));
    }
}
