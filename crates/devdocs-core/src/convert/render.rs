//! Markdown rendering of an [`HtmlElement`] tree.
//!
//! Only headings written at the top level of the output become heading lines;
//! anything nested inside a list item or block quote is prefixed and can never
//! start with `#`.

use super::dom::{HtmlElement, HtmlNode};
use crate::section::HeadingAnchor;
use std::mem;

/// Markdown plus the line number of every heading that was written.
#[derive(Debug, Default)]
pub struct Rendered {
    pub markdown: String,
    pub headings: Vec<(usize, HeadingAnchor)>,
}

pub fn render(root: &HtmlElement) -> Rendered {
    let mut writer = MarkdownWriter::default();
    writer.blocks(root);
    writer.flush_paragraph();
    Rendered {
        markdown: writer.finish(),
        headings: writer.headings,
    }
}

#[derive(Debug, Default)]
struct MarkdownWriter {
    out: String,
    newlines: usize,
    headings: Vec<(usize, HeadingAnchor)>,
    inline: String,
}

impl MarkdownWriter {
    fn push(&mut self, s: &str) {
        self.newlines += s.bytes().filter(|&b| b == b'\n').count();
        self.out.push_str(s);
    }

    /// Leave exactly one blank line after whatever came before.
    fn block_break(&mut self) {
        if self.out.is_empty() {
            return;
        }
        if !self.out.ends_with('\n') {
            self.push("\n");
        }
        if !self.out.ends_with("\n\n") {
            self.push("\n");
        }
    }

    fn block(&mut self, text: &str) {
        self.block_break();
        self.push(text);
        self.push("\n");
    }

    fn finish(&mut self) -> String {
        let mut out = mem::take(&mut self.out);
        let trimmed = out.trim_end_matches('\n').len();
        out.truncate(trimmed);
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }

    fn flush_paragraph(&mut self) {
        let pending = mem::take(&mut self.inline);
        let lines: Vec<String> = finalize_inline(&pending)
            .into_iter()
            .map(|line| escape_line_start(&line))
            .collect();
        if !lines.is_empty() {
            self.block(&lines.join("\n"));
        }
    }

    fn blocks(&mut self, el: &HtmlElement) {
        for child in &el.children {
            match child {
                HtmlNode::Text(text) => push_text(&mut self.inline, text),
                HtmlNode::Element(child) => self.node(child),
            }
        }
    }

    fn node(&mut self, el: &HtmlElement) {
        match el.name.as_str() {
            "head" | "script" | "style" | "template" | "noscript" | "title" | "meta" | "link" => {},
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.flush_paragraph();
                self.heading(el);
            },
            "p" => {
                self.flush_paragraph();
                inline_children(el, &mut self.inline);
                self.flush_paragraph();
            },
            "pre" => {
                self.flush_paragraph();
                self.code_block(el);
            },
            "ul" | "ol" => {
                self.flush_paragraph();
                self.list(el);
            },
            "blockquote" => {
                self.flush_paragraph();
                let body = render_nested(el);
                if !body.is_empty() {
                    self.block(&prefix_lines(&body, "> ", "> "));
                }
            },
            "table" => {
                self.flush_paragraph();
                self.table(el);
            },
            "hr" => {
                self.flush_paragraph();
                self.block("---");
            },
            "dt" => {
                self.flush_paragraph();
                let text = single_line(el);
                if !text.is_empty() {
                    self.block(&escape_line_start(&format!("**{text}**")));
                }
            },
            "html" | "body" | "main" | "div" | "section" | "article" | "header" | "footer"
            | "nav" | "aside" | "details" | "summary" | "figure" | "figcaption" | "dl" | "dd"
            | "li" | "thead" | "tbody" | "tfoot" | "tr" | "td" | "th" | "caption" => {
                self.flush_paragraph();
                self.blocks(el);
                self.flush_paragraph();
            },
            _ => inline_element(el, &mut self.inline),
        }
    }

    fn heading(&mut self, el: &HtmlElement) {
        let level = el.name.as_bytes()[1] - b'0';
        let text = single_line(el);
        self.block_break();

        let line = self.newlines + 1;
        let id = el.attr("id").unwrap_or_default();
        self.headings.push((line, HeadingAnchor::new(level, id)));

        let hashes = "#".repeat(usize::from(level));
        if text.is_empty() {
            self.push(&format!("{hashes}\n"));
        } else {
            self.push(&format!("{hashes} {text}\n"));
        }
    }

    fn code_block(&mut self, el: &HtmlElement) {
        let language = code_language(el).unwrap_or_default();
        let text = el.text();
        let text = text.trim_end_matches(['\n', '\r']);
        let fence = "`".repeat(longest_backtick_run(text).max(2) + 1);
        self.block(&format!("{fence}{language}\n{text}\n{fence}"));
    }

    fn list(&mut self, el: &HtmlElement) {
        let ordered = el.name == "ol";
        let mut number = el
            .attr("start")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(1);

        let mut items = Vec::new();
        for li in el.child_elements().filter(|c| c.name == "li") {
            let marker = if ordered {
                let m = format!("{number}. ");
                number += 1;
                m
            } else {
                "- ".to_string()
            };
            let indent = " ".repeat(marker.len());
            items.push(prefix_lines(&render_nested(li), &marker, &indent));
        }

        if !items.is_empty() {
            self.block(&items.join("\n"));
        }
    }

    fn table(&mut self, el: &HtmlElement) {
        let mut rows: Vec<Vec<String>> = Vec::new();
        collect_rows(el, &mut rows);
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        if columns == 0 {
            return;
        }

        let mut lines = Vec::with_capacity(rows.len() + 1);
        for (i, mut row) in rows.into_iter().enumerate() {
            row.resize(columns, String::new());
            lines.push(format!("| {} |", row.join(" | ")));
            if i == 0 {
                lines.push(format!("|{}", " --- |".repeat(columns)));
            }
        }
        self.block(&lines.join("\n"));
    }
}

/// Render `el`'s children as standalone Markdown, without a trailing newline.
fn render_nested(el: &HtmlElement) -> String {
    let mut writer = MarkdownWriter::default();
    writer.blocks(el);
    writer.flush_paragraph();
    let mut out = writer.finish();
    if out.ends_with('\n') {
        out.pop();
    }
    out
}

fn prefix_lines(body: &str, first: &str, rest: &str) -> String {
    if body.is_empty() {
        return first.trim_end().to_string();
    }
    body.lines()
        .enumerate()
        .map(|(i, line)| {
            let prefix = if i == 0 { first } else { rest };
            if line.is_empty() {
                prefix.trim_end().to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_rows(el: &HtmlElement, rows: &mut Vec<Vec<String>>) {
    for child in el.child_elements() {
        match child.name.as_str() {
            "tr" => rows.push(
                child
                    .child_elements()
                    .filter(|c| c.name == "td" || c.name == "th")
                    .map(|cell| single_line(cell).replace('|', "\\|"))
                    .collect(),
            ),
            "thead" | "tbody" | "tfoot" => collect_rows(child, rows),
            _ => {},
        }
    }
}

fn code_language(el: &HtmlElement) -> Option<String> {
    if let Some(lang) = el.attr("data-language") {
        return Some(lang.to_string());
    }
    let from_class = |e: &HtmlElement| {
        e.classes()
            .find_map(|c| c.strip_prefix("language-"))
            .map(str::to_string)
    };
    from_class(el).or_else(|| el.child_elements().find(|c| c.name == "code").and_then(from_class))
}

fn longest_backtick_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for ch in text.chars() {
        if ch == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Append HTML text to an inline buffer. Source newlines are plain whitespace.
fn push_text(buf: &mut String, text: &str) {
    buf.extend(text.chars().map(|c| if c == '\n' || c == '\r' { ' ' } else { c }));
}

fn inline_children(el: &HtmlElement, buf: &mut String) {
    for child in &el.children {
        match child {
            HtmlNode::Text(text) => push_text(buf, text),
            HtmlNode::Element(child) => inline_element(child, buf),
        }
    }
}

fn inline_element(el: &HtmlElement, buf: &mut String) {
    match el.name.as_str() {
        "script" | "style" | "template" => {},
        "br" => buf.push('\n'),
        "em" | "i" => wrap(el, "*", buf),
        "strong" | "b" => wrap(el, "**", buf),
        "code" | "kbd" | "samp" | "tt" => {
            let text = el.text().split_whitespace().collect::<Vec<_>>().join(" ");
            if text.is_empty() {
                return;
            }
            let ticks = "`".repeat(longest_backtick_run(&text) + 1);
            if ticks.len() > 1 {
                buf.push_str(&format!("{ticks} {text} {ticks}"));
            } else {
                buf.push_str(&format!("`{text}`"));
            }
        },
        "a" => {
            let text = single_line(el);
            match el.attr("href") {
                Some(href) if !text.is_empty() && !href.is_empty() => {
                    buf.push_str(&format!("[{text}]({href})"));
                },
                _ => buf.push_str(&text),
            }
        },
        "img" => {
            if let Some(src) = el.attr("src") {
                let alt = el.attr("alt").unwrap_or_default();
                buf.push_str(&format!("![{alt}]({src})"));
            }
        },
        _ => inline_children(el, buf),
    }
}

fn wrap(el: &HtmlElement, marker: &str, buf: &mut String) {
    let mut inner = String::new();
    inline_children(el, &mut inner);
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        buf.push_str(&inner);
        return;
    }
    if inner.starts_with(char::is_whitespace) {
        buf.push(' ');
    }
    buf.push_str(marker);
    buf.push_str(trimmed);
    buf.push_str(marker);
    if inner.ends_with(char::is_whitespace) {
        buf.push(' ');
    }
}

/// Split an inline buffer on hard breaks and collapse whitespace per line.
fn finalize_inline(buf: &str) -> Vec<String> {
    buf.split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Inline content of `el` collapsed onto one line.
fn single_line(el: &HtmlElement) -> String {
    let mut buf = String::new();
    inline_children(el, &mut buf);
    finalize_inline(&buf).join(" ")
}

/// Keep prose that starts with `#` from reading as a heading.
fn escape_line_start(line: &str) -> String {
    if line.starts_with('#') {
        format!("\\{line}")
    } else {
        line.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn md(html: &str) -> String {
        render(&HtmlElement::parse_document(html)).markdown
    }

    #[test]
    fn test_headings_and_paragraphs() {
        let out = md(r#"<h1>Title</h1><p>intro   line</p><h2 id="a">Alpha</h2><p>a1</p>"#);
        assert_eq!(out, "# Title\n\nintro line\n\n## Alpha\n\na1\n");
    }

    #[test]
    fn test_heading_line_numbers_are_recorded() {
        let rendered = render(&HtmlElement::parse_document(
            r#"<h1>T</h1><p>x</p><h2 id="a">A</h2><h3>B</h3>"#,
        ));
        let lines: Vec<_> = rendered
            .headings
            .iter()
            .map(|(line, anchor)| (*line, anchor.id.as_str()))
            .collect();
        assert_eq!(lines, vec![(1, ""), (5, "a"), (7, "")]);
    }

    #[test]
    fn test_inline_markup() {
        let out = md(r#"<p>Use <code>x</code> with <em>care</em> and <a href="/y">docs</a><br>next</p>"#);
        assert_eq!(out, "Use `x` with *care* and [docs](/y)\nnext\n");
    }

    #[test]
    fn test_code_block_keeps_hash_lines() {
        let out = md("<pre data-language=\"python\"># comment\nx = 1\n</pre>");
        assert_eq!(out, "```python\n# comment\nx = 1\n```\n");
    }

    #[test]
    fn test_code_fence_grows_past_backticks() {
        let out = md("<pre>```\ninner\n```</pre>");
        assert!(out.starts_with("````\n"));
        assert!(out.ends_with("\n````\n"));
    }

    #[test]
    fn test_lists() {
        let out = md("<ul><li>one</li><li>two <ol start=\"3\"><li>three</li></ol></li></ul>");
        assert_eq!(out, "- one\n- two\n\n  3. three\n");
    }

    #[test]
    fn test_blockquote_and_nested_heading() {
        let out = md("<blockquote><h2 id=\"q\">Quoted</h2><p>text</p></blockquote>");
        assert_eq!(out, "> ## Quoted\n>\n> text\n");
        let rendered = render(&HtmlElement::parse_document("<blockquote><h2 id=\"q\">Q</h2></blockquote>"));
        assert!(rendered.headings.is_empty());
    }

    #[test]
    fn test_table() {
        let out = md("<table><tr><th>k</th><th>v</th></tr><tr><td>a|b</td><td>1</td></tr></table>");
        assert_eq!(out, "| k | v |\n| --- | --- |\n| a\\|b | 1 |\n");
    }

    #[test]
    fn test_paragraph_starting_with_hash_is_escaped() {
        assert_eq!(md("<p>#include &lt;x&gt;</p>"), "\\#include <x>\n");
    }

    #[test]
    fn test_script_and_style_are_dropped() {
        assert_eq!(md("<script>var a;</script><style>p{}</style><p>ok</p>"), "ok\n");
    }

    #[test]
    fn test_definition_lists() {
        assert_eq!(md("<dl><dt>term</dt><dd>meaning</dd></dl>"), "**term**\n\nmeaning\n");
    }
}
