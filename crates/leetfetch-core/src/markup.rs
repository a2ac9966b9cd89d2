//! HTML-to-text conversion for problem bodies.
//!
//! Problem content arrives as a restricted HTML subset: paragraphs, line
//! breaks, preformatted blocks, inline code, and lists, with arbitrary other
//! tags wrapping plain text. The converter makes a single forward pass over
//! markup events and threads a small writer state through them; no tree is
//! ever built. Malformed markup never fails, it degrades to best-effort text.

use std::borrow::Cow;

/// Convert an HTML fragment into plain text suitable for a terminal.
pub fn html_to_text(html: &str) -> String {
    let mut writer = TextWriter::default();
    for event in Tokenizer::new(html) {
        writer.handle(event);
    }
    writer.finish()
}

/// Markup events produced by the tokenizer.
#[derive(Debug, PartialEq, Eq)]
enum Event<'a> {
    Open(&'a str),
    Close(&'a str),
    Text(&'a str),
}

/// Streaming tokenizer over an HTML fragment.
///
/// A self-closing tag yields an `Open` followed by a queued `Close`, so the
/// writer sees `<br/>` and `<br></br>` identically. Comments and
/// declarations yield nothing. A `<` that does not begin a plausible tag is
/// handed back as text.
struct Tokenizer<'a> {
    rest: &'a str,
    queued_close: Option<&'a str>,
}

impl<'a> Tokenizer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            rest: input,
            queued_close: None,
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Event<'a>> {
        if let Some(name) = self.queued_close.take() {
            return Some(Event::Close(name));
        }
        loop {
            if self.rest.is_empty() {
                return None;
            }
            if let Some(stripped) = self.rest.strip_prefix('<') {
                if stripped.starts_with("!--") {
                    self.rest = match stripped.find("-->") {
                        Some(end) => &stripped[end + 3..],
                        None => "",
                    };
                    continue;
                }
                if stripped.starts_with('!') || stripped.starts_with('?') {
                    self.rest = match stripped.find('>') {
                        Some(end) => &stripped[end + 1..],
                        None => "",
                    };
                    continue;
                }
                let closing = stripped.starts_with('/');
                let body = if closing { &stripped[1..] } else { stripped };
                let plausible = body
                    .chars()
                    .next()
                    .is_some_and(|c| c.is_ascii_alphabetic());
                if plausible && let Some(end) = stripped.find('>') {
                    let tag = &stripped[..end];
                    self.rest = &stripped[end + 1..];
                    let inner = tag.strip_prefix('/').unwrap_or(tag);
                    let name_len = inner
                        .find(|c: char| !c.is_ascii_alphanumeric())
                        .unwrap_or(inner.len());
                    let name = &inner[..name_len];
                    if name.is_empty() {
                        continue;
                    }
                    if closing {
                        return Some(Event::Close(name));
                    }
                    if tag.trim_end().ends_with('/') {
                        self.queued_close = Some(name);
                    }
                    return Some(Event::Open(name));
                }
                // Not a tag after all; emit the '<' as part of the text run.
            }
            let from = usize::from(self.rest.starts_with('<'));
            let end = self.rest[from..]
                .find('<')
                .map(|i| i + from)
                .unwrap_or(self.rest.len());
            let (text, rest) = self.rest.split_at(end);
            self.rest = rest;
            return Some(Event::Text(text));
        }
    }
}

/// Mutable conversion state: the output buffer, whether the writer is inside
/// a preformatted block, and whether a space separator is owed before the
/// next text chunk.
#[derive(Default)]
struct TextWriter {
    out: String,
    in_pre: bool,
    pending_space: bool,
}

impl TextWriter {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Open(name) => self.open_tag(name),
            Event::Close(name) => self.close_tag(name),
            Event::Text(raw) => self.text(raw),
        }
    }

    fn open_tag(&mut self, name: &str) {
        match name.to_ascii_lowercase().as_str() {
            "p" | "br" => self.newline(),
            "pre" => {
                self.newline();
                self.in_pre = true;
            }
            "code" if !self.in_pre => self.out.push('`'),
            "ul" | "ol" => self.newline(),
            "li" => {
                self.newline();
                self.out.push_str("- ");
            }
            _ => {}
        }
    }

    fn close_tag(&mut self, name: &str) {
        match name.to_ascii_lowercase().as_str() {
            "pre" => {
                self.newline();
                self.in_pre = false;
            }
            "code" if !self.in_pre => self.out.push('`'),
            "p" | "br" => self.newline(),
            _ => {}
        }
    }

    fn text(&mut self, raw: &str) {
        let decoded = decode_entities(raw);
        if self.in_pre {
            self.out.push_str(&decoded);
            return;
        }
        let chunk = decoded.split_whitespace().collect::<Vec<_>>().join(" ");
        if chunk.is_empty() {
            return;
        }
        if self.pending_space {
            self.out.push(' ');
        }
        self.out.push_str(&chunk);
        self.pending_space = true;
    }

    /// Force a newline boundary, collapsing to at most one trailing newline.
    fn newline(&mut self) {
        if self.out.is_empty() || self.out.ends_with('\n') {
            return;
        }
        self.out.push('\n');
        self.pending_space = false;
    }

    fn finish(self) -> String {
        self.out.trim().to_string()
    }
}

/// Decode character references in a text run.
///
/// Handles the named references problem bodies actually contain plus numeric
/// forms; anything unrecognized passes through literally.
fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match rest[1..].find(';').map(|i| i + 1) {
            Some(semi) if semi > 1 && semi <= 32 => match decode_entity(&rest[1..semi]) {
                Some(ch) => {
                    out.push(ch);
                    rest = &rest[semi + 1..];
                }
                None => {
                    out.push('&');
                    rest = &rest[1..];
                }
            },
            _ => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}
