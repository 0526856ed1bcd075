//! Table-of-contents construction.
//!
//! Folds the flat, ordered heading events reported by the converter into a
//! forest keyed by heading level, then serializes the forest into a nested
//! navigation list of cross-references.

use std::fmt::Write;

use super::convert::HeadingEvent;
use super::escape::escape_tei;

/// One node of the nested table of contents.
#[derive(Debug, Clone)]
pub struct TocNode {
    pub content: String,
    pub anchor: String,
    pub level: u8,
    pub children: Vec<TocNode>,
}

/// Fold flat heading events into a forest.
///
/// A heading closes every open heading at its level or deeper and becomes a
/// child of the nearest shallower open heading, or a root when none is open.
pub fn nest_headings(events: &[HeadingEvent]) -> Vec<TocNode> {
    let mut roots = Vec::new();
    let mut stack: Vec<TocNode> = Vec::new();

    for event in events {
        while stack.last().is_some_and(|top| top.level >= event.level) {
            let Some(closed) = stack.pop() else { break };
            match stack.last_mut() {
                Some(parent) => parent.children.push(closed),
                None => roots.push(closed),
            }
        }
        stack.push(TocNode {
            content: event.content.clone(),
            anchor: event.anchor.clone(),
            level: event.level,
            children: Vec::new(),
        });
    }

    while let Some(closed) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(closed),
            None => roots.push(closed),
        }
    }

    roots
}

/// Serialize a forest into a nested navigation list.
///
/// An empty forest serializes to the empty fragment.
pub fn render_toc_list(nodes: &[TocNode]) -> String {
    if nodes.is_empty() {
        return String::new();
    }
    let mut out = String::from("<list>");
    for node in nodes {
        out.push_str("<item>");
        write!(
            out,
            "<ref target=\"#{}\">{}</ref>",
            escape_tei(&node.anchor),
            node.content
        )
        .unwrap();
        out.push_str(&render_toc_list(&node.children));
        out.push_str("</item>");
    }
    out.push_str("</list>");
    out
}

/// Build the table-of-contents division from per-section heading buckets.
///
/// Each bucket nests independently so headings never attach across section
/// boundaries. When the serialized list trims to nothing, the whole
/// division, title included, is suppressed.
pub fn build_toc(title: &str, buckets: &[Vec<HeadingEvent>]) -> String {
    let mut forest = Vec::new();
    for bucket in buckets {
        forest.extend(nest_headings(bucket));
    }
    let list = render_toc_list(&forest);
    if list.trim().is_empty() {
        return String::new();
    }
    format!(
        "<div type=\"contents\" xml:id=\"contents\"><head>{}</head>{}</div>",
        escape_tei(title),
        list
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(level: u8, content: &str) -> HeadingEvent {
        HeadingEvent {
            content: content.into(),
            level,
            anchor: format!("edition-{}", content.to_lowercase()),
        }
    }

    #[test]
    fn empty_events_serialize_to_nothing() {
        assert!(nest_headings(&[]).is_empty());
        assert_eq!(render_toc_list(&[]), "");
        assert_eq!(build_toc("Contents", &[Vec::new()]), "");
    }

    #[test]
    fn outline_semantics() {
        let events = [
            event(1, "A"),
            event(2, "B"),
            event(2, "C"),
            event(1, "D"),
            event(3, "E"),
        ];
        let forest = nest_headings(&events);

        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].content, "A");
        assert_eq!(forest[0].children.len(), 2);
        assert_eq!(forest[0].children[0].content, "B");
        assert_eq!(forest[0].children[1].content, "C");
        assert_eq!(forest[1].content, "D");
        assert_eq!(forest[1].children.len(), 1);
        assert_eq!(forest[1].children[0].content, "E");
        assert!(forest[1].children[0].children.is_empty());
    }

    #[test]
    fn skipped_levels_still_nest() {
        let forest = nest_headings(&[event(1, "A"), event(3, "B")]);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].children.len(), 1);
        assert_eq!(forest[0].children[0].level, 3);
    }

    #[test]
    fn serialization_nests_lists() {
        let forest = nest_headings(&[event(1, "A"), event(2, "B")]);
        assert_eq!(
            render_toc_list(&forest),
            "<list><item><ref target=\"#edition-a\">A</ref>\
             <list><item><ref target=\"#edition-b\">B</ref></item></list>\
             </item></list>"
        );
    }

    #[test]
    fn buckets_do_not_nest_across_sections() {
        let intro = vec![event(1, "Intro")];
        let edition = vec![event(2, "Deep")];
        let toc = build_toc("Contents", &[intro, edition]);
        // The level-2 edition heading stays a root, not a child of the
        // level-1 introduction heading.
        assert_eq!(
            toc,
            "<div type=\"contents\" xml:id=\"contents\"><head>Contents</head>\
             <list>\
             <item><ref target=\"#edition-intro\">Intro</ref></item>\
             <item><ref target=\"#edition-deep\">Deep</ref></item>\
             </list></div>"
        );
    }

    #[test]
    fn title_is_escaped() {
        let toc = build_toc("A & B", &[vec![event(1, "X")]]);
        assert!(toc.contains("<head>A &amp; B</head>"));
    }
}
