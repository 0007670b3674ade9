//! Primary shell strategy: stream the document with quick-xml, track
//! the open-element stack, and splice the shell at structurally
//! correct byte offsets. Every byte outside the edited regions is
//! carried over verbatim, so entities, encoding, and whitespace in the
//! rest of the page survive untouched.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{append_class, ShellSpec, ShellStrategy};

/// Elements with no closing tag in HTML.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

pub(super) struct StructuralShell;

impl ShellStrategy for StructuralShell {
    /// `None` on any parse trouble — the error is discarded and the
    /// caller falls through to the splice strategy. Page rendering
    /// must never fail because third-party markup is malformed.
    fn apply(&self, html: &str, shell: &ShellSpec) -> Option<String> {
        let masked = mask_raw_text(html)?;
        let loc = locate(&masked)?;

        let (msg_start, msg_end) = match loc.message {
            Some(m) => (m.start, m.end),
            None => (usize::MAX, usize::MAX),
        };
        // Copy a range of the original document, minus the relocated
        // message element when it lies inside that range.
        let push_range = |out: &mut String, from: usize, to: usize| {
            if from <= msg_start && msg_end <= to {
                out.push_str(&html[from..msg_start]);
                out.push_str(&html[msg_end..to]);
            } else {
                out.push_str(&html[from..to]);
            }
        };

        let mut out = String::with_capacity(html.len() + 512);
        push_range(&mut out, 0, loc.login_open.start);
        out.push_str(&shell.open_markup());
        out.push_str(&append_class(
            &html[loc.login_open.start..loc.login_open.end],
            "lp-form",
        ));
        out.push_str(&html[loc.login_open.end..loc.login_end]);
        if let Some(m) = loc.message {
            out.push_str(&html[m.start..m.end]);
        }
        out.push_str(shell.close_markup());
        push_range(&mut out, loc.login_end, html.len());
        Some(out)
    }
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
}

struct Located {
    /// Opening tag of the login container.
    login_open: Span,
    /// Offset just past the container's matching end tag (or the point
    /// where an ancestor implicitly closed it).
    login_end: usize,
    /// Full span of a relocatable custom-message element, when one
    /// exists outside the login container.
    message: Option<Span>,
}

/// Walk the event stream and record where the login container (and an
/// optional `id="login-message"` sibling) begin and end. Lenient on
/// purpose: end-tag names are not checked, unmatched end tags are
/// tolerated, and any hard parse error aborts the whole strategy.
fn locate(html: &str) -> Option<Located> {
    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut stack: Vec<String> = Vec::new();
    let mut pos: usize = 0;

    let mut login_open: Option<Span> = None;
    let mut login_index: usize = 0;
    let mut login_end: Option<usize> = None;

    let mut msg_open: Option<Span> = None;
    let mut msg_index: usize = 0;
    let mut msg_end: Option<usize> = None;

    loop {
        let event = reader.read_event();
        let end = reader.buffer_position() as usize;
        let span = Span { start: pos, end };
        pos = end;

        match event {
            Err(_) => return None,
            Ok(Event::Eof) => break,
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                let is_void = VOID_ELEMENTS.contains(&name.as_str());
                match attr_value(e, "id").as_deref() {
                    Some("login") if login_open.is_none() => {
                        login_open = Some(span);
                        login_index = stack.len();
                        if is_void {
                            login_end = Some(span.end);
                        }
                    }
                    Some("login-message") if msg_open.is_none() => {
                        msg_open = Some(span);
                        msg_index = stack.len();
                        if is_void {
                            msg_end = Some(span.end);
                        }
                    }
                    _ => {}
                }
                if !is_void {
                    stack.push(name);
                }
            }
            Ok(Event::Empty(ref e)) => match attr_value(e, "id").as_deref() {
                Some("login") if login_open.is_none() => {
                    login_open = Some(span);
                    login_end = Some(span.end);
                }
                Some("login-message") if msg_open.is_none() => {
                    msg_open = Some(span);
                    msg_end = Some(span.end);
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                if let Some(idx) = stack.iter().rposition(|n| *n == name) {
                    // Anything above idx closes implicitly with this
                    // end tag; an implicit close ends the element just
                    // before the tag, a direct close just after it.
                    if login_open.is_some() && login_end.is_none() && idx <= login_index {
                        login_end =
                            Some(if idx == login_index { span.end } else { span.start });
                    }
                    if msg_open.is_some() && msg_end.is_none() && idx <= msg_index {
                        msg_end = Some(if idx == msg_index { span.end } else { span.start });
                    }
                    stack.truncate(idx);
                }
            }
            Ok(_) => {}
        }
    }

    let login_open = login_open?;
    let login_end = login_end.unwrap_or(html.len());

    let message = match (msg_open, msg_end) {
        (Some(open), Some(end)) => {
            let span = Span {
                start: open.start,
                end,
            };
            // Relocate clean siblings only; a message overlapping the
            // login container stays where it is.
            if span.end <= login_open.start || span.start >= login_end {
                Some(span)
            } else {
                None
            }
        }
        _ => None,
    };

    Some(Located {
        login_open,
        login_end,
        message,
    })
}

fn attr_value(e: &BytesStart, name: &str) -> Option<String> {
    for attr in e.html_attributes().flatten() {
        if attr.key.as_ref().eq_ignore_ascii_case(name.as_bytes()) {
            return Some(String::from_utf8_lossy(&attr.value).trim().to_string());
        }
    }
    None
}

/// Blank out script and style bodies before parsing. Inline scripts
/// are not markup and routinely contain bare `<`; masking them with
/// spaces keeps every byte offset identical while letting the parser
/// pass through. Masked region boundaries land on ASCII delimiters,
/// so the result is still valid UTF-8.
fn mask_raw_text(html: &str) -> Option<String> {
    let mut bytes = html.as_bytes().to_vec();
    for tag in ["script", "style"] {
        let open = format!("<{}", tag);
        let close = format!("</{}", tag);
        let mut from = 0;
        while let Some(start) = find_ci(&bytes, open.as_bytes(), from) {
            let after = start + open.len();
            // Require a real tag boundary so "<styles>" is not matched.
            if after < bytes.len()
                && !matches!(bytes[after], b' ' | b'\t' | b'\n' | b'\r' | b'>' | b'/')
            {
                from = after;
                continue;
            }
            let tag_end = match find_byte(&bytes, b'>', after) {
                Some(i) => i,
                None => break,
            };
            let content_start = tag_end + 1;
            let close_start = match find_ci(&bytes, close.as_bytes(), content_start) {
                Some(i) => i,
                None => break,
            };
            for b in &mut bytes[content_start..close_start] {
                *b = b' ';
            }
            from = close_start + close.len();
        }
    }
    String::from_utf8(bytes).ok()
}

fn find_byte(haystack: &[u8], needle: u8, from: usize) -> Option<usize> {
    haystack[from..].iter().position(|b| *b == needle).map(|i| from + i)
}

fn find_ci(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from >= haystack.len() || needle.is_empty() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
        .map(|i| from + i)
}
