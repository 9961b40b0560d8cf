//! Owned Markdown syntax tree built from `pulldown-cmark` events.
//!
//! Only the nodes the passes care about get their own kind (code blocks,
//! links and literal text). Everything else is carried through as an opaque
//! container or leaf so the tree renders back to the same HTML.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd};

/// Which event a [`NodeKind::Literal`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Text,
    InlineCode,
    Html,
    InlineHtml,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind<'a> {
    /// Document root.
    Root,
    /// Any tag without a dedicated kind (paragraph, heading, list, ...).
    Container(Tag<'a>),
    /// Code block. `lang` is the first word of the fence info, `meta` the rest.
    Code {
        lang: Option<String>,
        meta: Option<String>,
        value: String,
        fenced: bool,
    },
    /// Hyperlink; children hold the link text.
    Link {
        link_type: LinkType,
        url: String,
        title: String,
        id: String,
    },
    /// Text-bearing leaf.
    Literal { kind: LiteralKind, value: String },
    /// Any other event (breaks, rules, footnote references, ...).
    Leaf(Event<'a>),
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<'a> {
    pub kind: NodeKind<'a>,
    pub children: Vec<Node<'a>>,
}

impl<'a> Node<'a> {
    pub fn new(kind: NodeKind<'a>) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    pub fn root() -> Self {
        Self::new(NodeKind::Root)
    }

    /// Visit this node and every descendant in document order.
    pub fn visit_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut Node<'a>),
    {
        f(self);
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }

    /// Visit this node and every descendant in document order.
    pub fn visit<F>(&self, f: &mut F)
    where
        F: FnMut(&Node<'a>),
    {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    /// Concatenated text of all literal descendants.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.visit(&mut |node| {
            if let NodeKind::Literal { value, .. } = &node.kind {
                text.push_str(value);
            }
        });
        text
    }

    /// Append a literal, merging it into a preceding literal of the same kind.
    fn push_literal(&mut self, kind: LiteralKind, value: &str) {
        let mergeable = matches!(kind, LiteralKind::Text | LiteralKind::Html);
        if mergeable {
            if let Some(Node {
                kind: NodeKind::Literal { kind: last, value: existing },
                ..
            }) = self.children.last_mut()
            {
                if *last == kind {
                    existing.push_str(value);
                    return;
                }
            }
        }
        self.children.push(Node::new(NodeKind::Literal {
            kind,
            value: value.to_string(),
        }));
    }

    fn open(tag: Tag<'a>) -> Self {
        let kind = match tag {
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => {
                let (lang, meta) = split_info(&info);
                NodeKind::Code {
                    lang,
                    meta,
                    value: String::new(),
                    fenced: true,
                }
            }
            Tag::CodeBlock(CodeBlockKind::Indented) => NodeKind::Code {
                lang: None,
                meta: None,
                value: String::new(),
                fenced: false,
            },
            Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            } => NodeKind::Link {
                link_type,
                url: dest_url.to_string(),
                title: title.to_string(),
                id: id.to_string(),
            },
            other => NodeKind::Container(other),
        };
        Self::new(kind)
    }

    /// Flatten the tree back into a `pulldown-cmark` event stream.
    pub fn to_events(&self) -> Vec<Event<'_>> {
        let mut events = Vec::new();
        self.push_events(&mut events);
        events
    }

    fn push_events<'b>(&'b self, out: &mut Vec<Event<'b>>) {
        match &self.kind {
            NodeKind::Root => self.push_children(out),
            NodeKind::Container(tag) => {
                out.push(Event::Start(tag.clone()));
                self.push_children(out);
                out.push(Event::End(tag.to_end()));
            }
            NodeKind::Code {
                lang,
                meta,
                value,
                fenced,
            } => {
                let kind = if *fenced {
                    CodeBlockKind::Fenced(join_info(lang.as_deref(), meta.as_deref()).into())
                } else {
                    CodeBlockKind::Indented
                };
                out.push(Event::Start(Tag::CodeBlock(kind)));
                if !value.is_empty() {
                    out.push(Event::Text(CowStr::Borrowed(value)));
                }
                out.push(Event::End(TagEnd::CodeBlock));
            }
            NodeKind::Link {
                link_type,
                url,
                title,
                id,
            } => {
                out.push(Event::Start(Tag::Link {
                    link_type: *link_type,
                    dest_url: CowStr::Borrowed(url),
                    title: CowStr::Borrowed(title),
                    id: CowStr::Borrowed(id),
                }));
                self.push_children(out);
                out.push(Event::End(TagEnd::Link));
            }
            NodeKind::Literal { kind, value } => {
                let value = CowStr::Borrowed(value.as_str());
                out.push(match kind {
                    LiteralKind::Text => Event::Text(value),
                    LiteralKind::InlineCode => Event::Code(value),
                    LiteralKind::Html => Event::Html(value),
                    LiteralKind::InlineHtml => Event::InlineHtml(value),
                });
            }
            NodeKind::Leaf(event) => out.push(event.clone()),
        }
    }

    fn push_children<'b>(&'b self, out: &mut Vec<Event<'b>>) {
        for child in &self.children {
            child.push_events(out);
        }
    }
}

/// Markdown extensions enabled for every page.
pub fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Parse Markdown into an owned tree.
pub fn parse(markdown: &str) -> Node<'_> {
    let mut stack: Vec<Node<'_>> = vec![Node::root()];

    for event in Parser::new_ext(markdown, options()) {
        match event {
            Event::Start(tag) => stack.push(Node::open(tag)),
            Event::End(_) => {
                if stack.len() > 1 {
                    close_top(&mut stack);
                }
            }
            Event::Text(text) => {
                let Some(top) = stack.last_mut() else { continue };
                match &mut top.kind {
                    NodeKind::Code { value, .. } => value.push_str(&text),
                    _ => top.push_literal(LiteralKind::Text, &text),
                }
            }
            Event::Code(code) => push_into_top(&mut stack, LiteralKind::InlineCode, &code),
            Event::Html(html) => push_into_top(&mut stack, LiteralKind::Html, &html),
            Event::InlineHtml(html) => push_into_top(&mut stack, LiteralKind::InlineHtml, &html),
            other => {
                if let Some(top) = stack.last_mut() {
                    top.children.push(Node::new(NodeKind::Leaf(other)));
                }
            }
        }
    }

    // The parser always balances start/end, but never drop content if it doesn't.
    while stack.len() > 1 {
        close_top(&mut stack);
    }

    stack.pop().unwrap_or_else(Node::root)
}

fn close_top<'a>(stack: &mut Vec<Node<'a>>) {
    if let Some(node) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(node);
        }
    }
}

fn push_into_top(stack: &mut [Node<'_>], kind: LiteralKind, value: &str) {
    if let Some(top) = stack.last_mut() {
        top.push_literal(kind, value);
    }
}

/// Split a fence info string into language and meta.
fn split_info(info: &str) -> (Option<String>, Option<String>) {
    let info = info.trim();
    let (lang, meta) = match info.split_once(char::is_whitespace) {
        Some((lang, meta)) => (lang, meta.trim()),
        None => (info, ""),
    };
    let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
    (non_empty(lang), non_empty(meta))
}

fn join_info(lang: Option<&str>, meta: Option<&str>) -> String {
    match (lang, meta) {
        (Some(lang), Some(meta)) => format!("{lang} {meta}"),
        (Some(only), None) | (None, Some(only)) => only.to_string(),
        (None, None) => String::new(),
    }
}
