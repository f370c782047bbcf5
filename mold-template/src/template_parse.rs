use crate::error::{ParseError, ParseErrorKind};
use crate::options::ParseOptions;
use crate::template_ast::{AttrDescriptor, Descriptor, Segment, TextDescriptor};

struct OpenElement {
    tag: String,
    attrs: Vec<AttrDescriptor>,
    children: Vec<Descriptor>,
    offset: usize,
}

/// Parses markup with default options. See [`parse_template_with_options`].
pub fn parse_template(input: &str) -> Result<Vec<Descriptor>, ParseError> {
    parse_template_with_options(input, &ParseOptions::default())
}

/// Minimal hand-rolled HTML-ish parser with support for:
/// - nested elements, void elements (`<img>`) and self-closing tags (`<input/>`)
/// - quoted, unquoted and bare attributes
/// - `{{ name }}` placeholders in text and attribute values
/// - `<!-- comments -->`, which are dropped
///
/// Tag names come out uppercase, attribute names lowercase. Malformed markup
/// (unterminated tags, close tags that do not match the innermost open
/// element, elements left open at the end) is rejected with a [`ParseError`].
pub fn parse_template_with_options(
    input: &str,
    opts: &ParseOptions,
) -> Result<Vec<Descriptor>, ParseError> {
    let bytes = input.as_bytes();
    let mut i = 0usize;
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut roots: Vec<Descriptor> = Vec::new();

    fn push_child(stack: &mut [OpenElement], roots: &mut Vec<Descriptor>, node: Descriptor) {
        match stack.last_mut() {
            Some(open) => open.children.push(node),
            None => roots.push(node),
        }
    }

    while i < bytes.len() {
        if bytes[i..].starts_with(b"<!--") {
            let body = &input[i + 4..];
            match body.find("-->") {
                Some(end) => i += 4 + end + 3,
                None => return Err(ParseError::new(ParseErrorKind::UnterminatedComment, i)),
            }
            continue;
        }

        if is_close_tag(bytes, i) {
            let start = i;
            i += 2;
            let tag = read_name(input, &mut i).to_ascii_uppercase();
            // anything up to '>' is ignored
            while i < bytes.len() && bytes[i] != b'>' {
                i += 1;
            }
            if i >= bytes.len() {
                return Err(ParseError::new(
                    ParseErrorKind::UnterminatedTag { tag: format!("/{tag}") },
                    start,
                ));
            }
            i += 1;

            let top_matches = stack.last().is_some_and(|open| open.tag == tag);
            if !top_matches && opts.is_void(&tag) {
                // `</br>` and friends never close anything
                log::trace!("ignoring closing tag for void element {tag} at {start}");
                continue;
            }
            let open = match stack.pop() {
                Some(open) => open,
                None => {
                    return Err(ParseError::new(
                        ParseErrorKind::UnexpectedClose { found: tag },
                        start,
                    ));
                }
            };
            if open.tag != tag {
                return Err(ParseError::new(
                    ParseErrorKind::MismatchedClose {
                        expected: open.tag,
                        found: tag,
                    },
                    start,
                ));
            }
            push_child(
                &mut stack,
                &mut roots,
                Descriptor::Element {
                    tag: open.tag,
                    attrs: open.attrs,
                    children: open.children,
                },
            );
            continue;
        }

        if is_open_tag(bytes, i) {
            let start = i;
            i += 1;
            let tag = read_name(input, &mut i).to_ascii_uppercase();
            let mut attrs: Vec<AttrDescriptor> = Vec::new();
            let mut self_closing = false;

            loop {
                skip_ws(bytes, &mut i);
                if i >= bytes.len() {
                    return Err(ParseError::new(
                        ParseErrorKind::UnterminatedTag { tag },
                        start,
                    ));
                }
                match bytes[i] {
                    b'/' => {
                        i += 1;
                        skip_ws(bytes, &mut i);
                        if i < bytes.len() && bytes[i] == b'>' {
                            self_closing = true;
                            i += 1;
                            break;
                        }
                        // a stray '/' inside the attribute list is dropped
                    }
                    b'>' => {
                        i += 1;
                        break;
                    }
                    _ => match read_attribute(input, &mut i) {
                        Some(attr) => {
                            if attrs.iter().any(|a| a.name == attr.name) {
                                log::trace!("<{tag}>: duplicate attribute {} ignored", attr.name);
                            } else {
                                attrs.push(attr);
                            }
                        }
                        // skip unknown token
                        None => i += 1,
                    },
                }
            }

            if self_closing || opts.is_void(&tag) {
                push_child(
                    &mut stack,
                    &mut roots,
                    Descriptor::Element {
                        tag,
                        attrs,
                        children: Vec::new(),
                    },
                );
            } else {
                stack.push(OpenElement {
                    tag,
                    attrs,
                    children: Vec::new(),
                    offset: start,
                });
            }
            continue;
        }

        // text until the next tag or comment
        let start = i;
        i += 1;
        while i < bytes.len() && !at_markup(bytes, i) {
            i += 1;
        }
        let raw = &input[start..i];
        if opts.drop_whitespace_text && is_all_ws(raw) {
            continue;
        }
        push_child(
            &mut stack,
            &mut roots,
            Descriptor::Text(segment_text(raw)),
        );
    }

    if let Some(open) = stack.pop() {
        return Err(ParseError::new(
            ParseErrorKind::Unclosed { tag: open.tag },
            open.offset,
        ));
    }

    log::debug!(
        "parsed {} bytes into {} root descriptor(s)",
        input.len(),
        roots.len()
    );
    Ok(roots)
}

/// Splits a raw text run into literal and placeholder segments.
///
/// `{{ name }}` becomes `Placeholder("name")`. A `}}` closes the nearest `{{`
/// before it. An unmatched `{{`, or a pair whose name is blank or contains a
/// brace, stays literal. Adjacent literals are merged, so the literals
/// concatenated in order give back the source text minus its placeholders.
pub fn segment_text(raw: &str) -> TextDescriptor {
    let mut segments: Vec<Segment> = Vec::new();

    fn push_literal(segments: &mut Vec<Segment>, s: &str) {
        if s.is_empty() {
            return;
        }
        if let Some(Segment::Literal(prev)) = segments.last_mut() {
            prev.push_str(s);
        } else {
            segments.push(Segment::Literal(s.to_string()));
        }
    }

    let mut rest = raw;
    while let Some(first) = rest.find("{{") {
        let Some(close_rel) = rest[first + 2..].find("}}") else {
            break;
        };
        let close = first + 2 + close_rel;
        let open = rest[..close].rfind("{{").unwrap_or(first);
        let name = rest[open + 2..close].trim();
        let end = close + 2;
        if name.is_empty() || name.contains(['{', '}']) {
            push_literal(&mut segments, &rest[..end]);
        } else {
            push_literal(&mut segments, &rest[..open]);
            segments.push(Segment::Placeholder(name.to_string()));
        }
        rest = &rest[end..];
    }
    push_literal(&mut segments, rest);

    TextDescriptor { segments }
}

fn is_open_tag(bytes: &[u8], i: usize) -> bool {
    bytes[i] == b'<' && bytes.get(i + 1).is_some_and(|c| c.is_ascii_alphabetic())
}

fn is_close_tag(bytes: &[u8], i: usize) -> bool {
    bytes[i] == b'<'
        && bytes.get(i + 1) == Some(&b'/')
        && bytes.get(i + 2).is_some_and(|c| c.is_ascii_alphabetic())
}

fn at_markup(bytes: &[u8], i: usize) -> bool {
    is_open_tag(bytes, i) || is_close_tag(bytes, i) || bytes[i..].starts_with(b"<!--")
}

fn is_all_ws(s: &str) -> bool {
    s.chars().all(|c| c.is_whitespace())
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

/// Reads a tag or attribute name: everything up to whitespace, `>`, `/` or `=`.
fn read_name<'a>(input: &'a str, i: &mut usize) -> &'a str {
    let bytes = input.as_bytes();
    let start = *i;
    while *i < bytes.len() {
        match bytes[*i] {
            b'>' | b'/' | b'=' => break,
            c if c.is_ascii_whitespace() => break,
            _ => *i += 1,
        }
    }
    &input[start..*i]
}

fn read_attribute(input: &str, i: &mut usize) -> Option<AttrDescriptor> {
    let bytes = input.as_bytes();
    let name = read_name(input, i);
    if name.is_empty() {
        return None;
    }
    let name = name.to_ascii_lowercase();

    let mut j = *i;
    skip_ws(bytes, &mut j);
    if j >= bytes.len() || bytes[j] != b'=' {
        // bare attribute
        return Some(AttrDescriptor {
            name,
            value: TextDescriptor::default(),
        });
    }
    *i = j + 1;
    skip_ws(bytes, i);

    let raw = match bytes.get(*i) {
        Some(&q) if q == b'"' || q == b'\'' => read_quoted(input, i, q),
        _ => read_unquoted(input, i),
    };

    Some(AttrDescriptor {
        name,
        value: segment_text(raw),
    })
}

fn read_quoted<'a>(input: &'a str, i: &mut usize, quote: u8) -> &'a str {
    let bytes = input.as_bytes();
    *i += 1;
    let start = *i;
    while *i < bytes.len() && bytes[*i] != quote {
        *i += 1;
    }
    let s = &input[start..*i];
    if *i < bytes.len() {
        *i += 1;
    } // consume closing quote
    s
}

/// Reads up to whitespace or `>`. A `/` followed by `>` (after optional
/// whitespace) is the self-closing marker and ends the value.
fn read_unquoted<'a>(input: &'a str, i: &mut usize) -> &'a str {
    let bytes = input.as_bytes();
    let start = *i;
    while *i < bytes.len() && bytes[*i] != b'>' && !bytes[*i].is_ascii_whitespace() {
        if bytes[*i] == b'/' {
            let mut j = *i + 1;
            skip_ws(bytes, &mut j);
            if bytes.get(j) == Some(&b'>') {
                break;
            }
        }
        *i += 1;
    }
    &input[start..*i]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Segment {
        Segment::Literal(s.into())
    }
    fn ph(s: &str) -> Segment {
        Segment::Placeholder(s.into())
    }

    #[test]
    fn segments_text_with_placeholders() {
        let t = segment_text("Hello, {{ name }} will {{name}} you.");
        assert_eq!(
            t.segments,
            vec![lit("Hello, "), ph("name"), lit(" will "), ph("name"), lit(" you.")]
        );
    }

    #[test]
    fn unmatched_braces_stay_literal() {
        let t = segment_text("a {{b} c {{ }} d {{e");
        assert_eq!(t.segments, vec![lit("a {{b} c {{ }} d {{e")]);
    }

    #[test]
    fn close_pairs_with_nearest_open() {
        assert_eq!(
            segment_text("{{a {{b}}").segments,
            vec![lit("{{a "), ph("b")]
        );
        assert_eq!(segment_text("{{a}b}} {{c}}").segments, vec![lit("{{a}b}} "), ph("c")]);
    }

    #[test]
    fn character_references_stay_as_written() {
        assert_eq!(
            segment_text("Tom &amp; {{who}} &lt;3").segments,
            vec![lit("Tom &amp; "), ph("who"), lit(" &lt;3")]
        );
    }

    #[test]
    fn placeholder_only_text() {
        assert_eq!(segment_text("{{x}}").segments, vec![ph("x")]);
        assert!(segment_text("").segments.is_empty());
    }

    #[test]
    fn read_name_stops_at_delimiters() {
        let src = "data-x=1";
        let mut i = 0;
        assert_eq!(read_name(src, &mut i), "data-x");
        assert_eq!(i, 6);
    }

    #[test]
    fn unquoted_value_keeps_slashes() {
        let ast = parse_template("<a href=/docs/intro>x</a>").unwrap();
        match &ast[0] {
            Descriptor::Element { attrs, .. } => {
                assert_eq!(attrs[0].value, TextDescriptor::literal("/docs/intro"));
            }
            _ => panic!("expected element"),
        }
    }

    #[test]
    fn unquoted_value_stops_at_self_close() {
        let ast = parse_template("<div id=a/><span></span>").unwrap();
        assert_eq!(ast.len(), 2);
        match &ast[0] {
            Descriptor::Element {
                attrs, children, ..
            } => {
                assert_eq!(attrs[0].value, TextDescriptor::literal("a"));
                assert!(children.is_empty());
            }
            _ => panic!("expected element"),
        }
        let spaced = parse_template("<div id=a/ ><b></b>").unwrap();
        assert_eq!(spaced.len(), 2);
    }

    #[test]
    fn stray_slash_mid_attributes_is_dropped() {
        let ast = parse_template("<input / type=\"text\" />").unwrap();
        match &ast[0] {
            Descriptor::Element { attrs, .. } => {
                assert_eq!(attrs.len(), 1);
                assert_eq!(attrs[0].name, "type");
            }
            _ => panic!("expected element"),
        }
    }
}
