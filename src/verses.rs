//! Markup reducer: selective tag stripping and verse extraction from
//! crossway-xml passage responses.
//!
//! The passage XML nests one `verse-unit` element per verse. Inside each unit,
//! `current` holds the chapter number (present only when it changes), the
//! first `verse-num` holds the verse number, and `marker` wraps the verse
//! text with inline annotation tags. Reduction keeps a small set of tags
//! verbatim and unwraps everything else.

use crate::api::ApiError;
use crate::model::Verse;
use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};

/// Tags preserved in verse contents: inline verse numbers, footnotes, and
/// headings survive; all other markup is unwrapped to its text.
pub const VERSE_KEEP_TAGS: &[&str] = &["verse-num", "footnote", "heading"];

/// Parse a CSS selector or return a parse error (avoids panics from Selector::parse).
fn parse_selector(sel: &str) -> Result<Selector, ApiError> {
    Selector::parse(sel).map_err(|e| ApiError::ParsePassage {
        message: format!("invalid selector {:?}: {}", sel, e),
    })
}

/// Strip markup, preserving tags named in `keep` verbatim (attributes and
/// nesting included) and unwrapping every other element in place of its
/// stripped children. Text is passed through with minimal entity escaping so
/// the output re-parses to itself: stripping is idempotent.
pub fn strip_tags(markup: &str, keep: &[&str]) -> String {
    let fragment = Html::parse_fragment(markup);
    let mut out = String::with_capacity(markup.len());
    for child in fragment.root_element().children() {
        render_stripped(child, keep, &mut out);
    }
    out
}

fn render_stripped(node: NodeRef<'_, Node>, keep: &[&str], out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(&escape_text(text.as_ref())),
        Node::Element(element) => {
            let name = element.name();
            if keep.contains(&name) {
                out.push('<');
                out.push_str(name);
                // html5ever stores attributes unordered; sort for
                // byte-identical output on identical input.
                let mut attrs: Vec<_> = element.attrs().collect();
                attrs.sort();
                for (attr_name, attr_value) in attrs {
                    out.push(' ');
                    out.push_str(attr_name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(attr_value));
                    out.push('"');
                }
                out.push('>');
                for child in node.children() {
                    render_stripped(child, keep, out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            } else {
                // Unwrap: the tag goes, its stripped content stays in place.
                for child in node.children() {
                    render_stripped(child, keep, out);
                }
            }
        }
        // Comments, doctypes, and processing instructions are dropped.
        _ => {}
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('"', "&quot;")
}

/// Reduce passage markup to one [Verse] per `verse-unit`, in document order.
///
/// Chapter numbers are carried forward: a unit with an absent or empty
/// `current` field reuses the last non-empty chapter value. A unit missing
/// its `verse-num` or `marker` field is an error, not a skip.
pub fn extract_verses(markup: &str) -> Result<Vec<Verse>, ApiError> {
    let document = Html::parse_document(markup);
    let unit_sel = parse_selector("verse-unit")?;
    let chapter_sel = parse_selector("current")?;
    let num_sel = parse_selector("verse-num")?;
    let marker_sel = parse_selector("marker")?;

    let mut current_chapter = String::new();
    let mut verses = Vec::new();

    for (index, unit) in document.select(&unit_sel).enumerate() {
        if let Some(chapter) = unit.select(&chapter_sel).next() {
            let text: String = chapter.text().collect();
            if !text.is_empty() {
                current_chapter = text;
            }
        }

        let verse_num = unit
            .select(&num_sel)
            .next()
            .map(|e| e.text().collect::<String>())
            .ok_or(ApiError::MissingVerseField {
                index,
                field: "verse-num",
            })?;

        let marker = unit
            .select(&marker_sel)
            .next()
            .ok_or(ApiError::MissingVerseField {
                index,
                field: "marker",
            })?;

        let stripped = strip_tags(&marker.inner_html(), VERSE_KEEP_TAGS);
        let contents = stripped
            .trim_end_matches(['\r', '\n'])
            .trim_matches('\n')
            .to_string();

        verses.push(Verse {
            chapter: current_chapter.clone(),
            verse: verse_num,
            contents,
        });
    }

    Ok(verses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_unwraps_unlisted_tags_keeping_text() {
        let out = strip_tags("<span>For God so <i>loved</i> the world</span>", &[]);
        assert_eq!(out, "For God so loved the world");
    }

    #[test]
    fn strip_preserves_kept_tags_with_attributes() {
        let out = strip_tags(
            r#"<marker><footnote id="f1">note</footnote> text</marker>"#,
            &["footnote"],
        );
        assert_eq!(out, r#"<footnote id="f1">note</footnote> text"#);
    }

    #[test]
    fn strip_keeps_nested_kept_tag_inside_unwrapped_parent() {
        let out = strip_tags(
            "<span>before <footnote>f</footnote> after</span>",
            &["footnote"],
        );
        assert_eq!(out, "before <footnote>f</footnote> after");
    }

    #[test]
    fn strip_empty_element_leaves_siblings_contiguous() {
        let out = strip_tags("a<span></span>b", &[]);
        assert_eq!(out, "ab");
    }

    #[test]
    fn strip_is_idempotent() {
        let markup = r#"x <b>y <footnote id="f1">n &amp; m</footnote></b> z"#;
        let once = strip_tags(markup, VERSE_KEEP_TAGS);
        let twice = strip_tags(&once, VERSE_KEEP_TAGS);
        assert_eq!(once, twice);
    }

    #[test]
    fn strip_escapes_entities_stably() {
        let once = strip_tags("law &amp; grace", &[]);
        assert_eq!(once, "law &amp; grace");
        assert_eq!(strip_tags(&once, &[]), once);
    }

    #[test]
    fn extract_single_verse_with_footnote() -> Result<(), ApiError> {
        let xml = "<verse-unit><current>3</current><verse-num>16</verse-num>\
                   <marker>For God so loved...<footnote>note</footnote></marker></verse-unit>";
        let verses = extract_verses(xml)?;
        assert_eq!(verses.len(), 1);
        assert_eq!(verses[0].chapter, "3");
        assert_eq!(verses[0].verse, "16");
        assert_eq!(
            verses[0].contents,
            "For God so loved...<footnote>note</footnote>"
        );
        Ok(())
    }

    #[test]
    fn extract_carries_chapter_forward_over_empty_fields() -> Result<(), ApiError> {
        let xml = "<verse-unit><current>3</current><verse-num>16</verse-num><marker>a</marker></verse-unit>\
                   <verse-unit><current></current><verse-num>17</verse-num><marker>b</marker></verse-unit>\
                   <verse-unit><verse-num>18</verse-num><marker>c</marker></verse-unit>";
        let verses = extract_verses(xml)?;
        assert_eq!(verses.len(), 3);
        for v in &verses {
            assert_eq!(v.chapter, "3");
        }
        assert_eq!(verses[2].verse, "18");
        Ok(())
    }

    #[test]
    fn extract_picks_up_new_chapter_when_declared() -> Result<(), ApiError> {
        let xml = "<verse-unit><current>3</current><verse-num>36</verse-num><marker>a</marker></verse-unit>\
                   <verse-unit><current>4</current><verse-num>1</verse-num><marker>b</marker></verse-unit>";
        let verses = extract_verses(xml)?;
        assert_eq!(verses[0].chapter, "3");
        assert_eq!(verses[1].chapter, "4");
        Ok(())
    }

    #[test]
    fn extract_strips_inline_markup_but_keeps_annotations() -> Result<(), ApiError> {
        let xml = "<verse-unit><current>1</current><verse-num>1</verse-num>\
                   <marker><woc>In the <span class=\"x\">beginning</span></woc>\
                   <heading>Creation</heading></marker></verse-unit>";
        let verses = extract_verses(xml)?;
        assert_eq!(
            verses[0].contents,
            "In the beginning<heading>Creation</heading>"
        );
        Ok(())
    }

    #[test]
    fn extract_trims_trailing_newlines_only() -> Result<(), ApiError> {
        let xml = "<verse-unit><current>1</current><verse-num>1</verse-num>\
                   <marker>\ntext with  spaces \r\n\n</marker></verse-unit>";
        let verses = extract_verses(xml)?;
        assert_eq!(verses[0].contents, "text with  spaces ");
        Ok(())
    }

    #[test]
    fn extract_missing_verse_num_errors() {
        let xml = "<verse-unit><current>1</current><marker>text</marker></verse-unit>";
        match extract_verses(xml) {
            Err(ApiError::MissingVerseField { index: 0, field }) => {
                assert_eq!(field, "verse-num")
            }
            other => panic!("expected MissingVerseField, got {:?}", other),
        }
    }

    #[test]
    fn extract_missing_marker_errors() {
        let xml = "<verse-unit><current>1</current><verse-num>1</verse-num></verse-unit>";
        match extract_verses(xml) {
            Err(ApiError::MissingVerseField { index: 0, field }) => assert_eq!(field, "marker"),
            other => panic!("expected MissingVerseField, got {:?}", other),
        }
    }

    #[test]
    fn extract_empty_document_yields_no_verses() -> Result<(), ApiError> {
        let verses = extract_verses("<passage></passage>")?;
        assert!(verses.is_empty());
        Ok(())
    }
}
