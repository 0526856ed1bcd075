//! Verbatim-aware XML escaping.
//!
//! Free text is escaped for the five reserved markup characters; regions
//! delimited by the literal `<![CDATA[` / `]]>` pair pass through
//! byte-identical, delimiters included. Escaping is idempotent: a `&` that
//! already begins one of the five entity forms is left alone.

use memchr::memmem;

/// Opening delimiter of a verbatim region.
pub const VERBATIM_START: &str = "<![CDATA[";
/// Closing delimiter of a verbatim region.
pub const VERBATIM_END: &str = "]]>";

const ENTITIES: [&str; 5] = ["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"];

/// Escape reserved markup characters outside verbatim regions.
///
/// An unterminated `<![CDATA[` is ordinary text from the unmatched marker
/// onward, so its own `<` gets escaped like any other.
///
/// # Examples
///
/// ```
/// use lectio::tei::escape_tei;
///
/// assert_eq!(escape_tei("a < b"), "a &lt; b");
/// assert_eq!(escape_tei("<![CDATA[a < b]]>"), "<![CDATA[a < b]]>");
/// assert_eq!(escape_tei("a &amp; b"), "a &amp; b");
/// ```
pub fn escape_tei(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let start = memmem::Finder::new(VERBATIM_START);
    let end = memmem::Finder::new(VERBATIM_END);

    let mut pos = 0;
    while pos < text.len() {
        let Some(rel) = start.find(text[pos..].as_bytes()) else {
            escape_into(&text[pos..], &mut out);
            break;
        };
        let open = pos + rel;
        escape_into(&text[pos..open], &mut out);

        let body = open + VERBATIM_START.len();
        match end.find(text[body..].as_bytes()) {
            Some(rel_end) => {
                let close = body + rel_end + VERBATIM_END.len();
                out.push_str(&text[open..close]);
                pos = close;
            }
            None => {
                // Unterminated region: everything from the marker on is
                // ordinary text.
                escape_into(&text[open..], &mut out);
                break;
            }
        }
    }
    out
}

fn escape_into(text: &str, out: &mut String) {
    for (i, c) in text.char_indices() {
        match c {
            '&' if !at_entity(text, i) => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
}

/// Does `text[i..]` start with one of the five entity forms we emit?
fn at_entity(text: &str, i: usize) -> bool {
    let rest = &text[i..];
    ENTITIES.iter().any(|entity| rest.starts_with(entity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn escapes_all_five_reserved_characters() {
        assert_eq!(
            escape_tei(r#"<x a="1" b='2'>&"#),
            "&lt;x a=&quot;1&quot; b=&apos;2&apos;&gt;&amp;"
        );
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(escape_tei("nihil obstat"), "nihil obstat");
    }

    #[test]
    fn existing_entities_are_not_doubled() {
        assert_eq!(escape_tei("a &amp; b &lt; c"), "a &amp; b &lt; c");
        // An ampersand that merely resembles an entity is still escaped.
        assert_eq!(escape_tei("&ampere"), "&amp;ampere");
    }

    #[test]
    fn verbatim_region_is_byte_identical() {
        let input = "pre <![CDATA[a <b> & 'c']]> post <";
        assert_eq!(
            escape_tei(input),
            "pre <![CDATA[a <b> & 'c']]> post &lt;"
        );
    }

    #[test]
    fn multiple_verbatim_regions() {
        let input = "<![CDATA[<1>]]>&<![CDATA[<2>]]>";
        assert_eq!(escape_tei(input), "<![CDATA[<1>]]>&amp;<![CDATA[<2>]]>");
    }

    #[test]
    fn unterminated_region_escapes_as_ordinary_text() {
        assert_eq!(
            escape_tei("a <![CDATA[b < c"),
            "a &lt;![CDATA[b &lt; c"
        );
    }

    #[test]
    fn unterminated_region_after_a_closed_one() {
        assert_eq!(
            escape_tei("<![CDATA[x]]><![CDATA[y"),
            "<![CDATA[x]]>&lt;![CDATA[y"
        );
    }

    #[test]
    fn idempotent_on_mixed_escaped_and_verbatim_text() {
        let once = escape_tei("a & b <![CDATA[& raw]]> <tag>");
        assert_eq!(escape_tei(&once), once);
    }

    proptest! {
        #[test]
        fn idempotent_without_markers(input in "[^\\x00]{0,200}") {
            prop_assume!(!input.contains(VERBATIM_START));
            let once = escape_tei(&input);
            prop_assert_eq!(escape_tei(&once), once.clone());
        }

        #[test]
        fn output_has_no_bare_angle_brackets(input in "[^\\x00]{0,200}") {
            prop_assume!(!input.contains(VERBATIM_START));
            let escaped = escape_tei(&input);
            prop_assert!(!escaped.contains('<'));
            prop_assert!(!escaped.contains('"'));
        }
    }
}
