//! JSON truncation repair
//!
//! [`repair`] closes a truncated JSON document so the longest valid
//! prefix can be recovered by a strict decoder. It is a pure text
//! transform, kept separate from decoding so both can be tested on
//! their own.
//!
//! Leniency rules:
//! - truncation inside a string value closes the string at the cut
//!   (a trailing lone backslash or incomplete `\uXXXX` escape is
//!   dropped first), so in-flight string values surface as prefixes;
//! - truncation inside an object key, or after a key before its value
//!   begins, drops the dangling member back to the previous complete
//!   one;
//! - a trailing comma is dropped;
//! - a trailing number is dropped until a delimiter confirms it (it may
//!   still be growing); a fully spelled `true`/`false`/`null` is kept;
//! - every container still open is then closed, innermost first.
//!
//! Returns `None` when nothing decodable remains (empty or whitespace).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Object,
    Array,
}

/// What the scanner expects next inside the current container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// Object: a key (or immediate close)
    Key,
    /// Object: the ':' after a key
    Colon,
    /// A value (object member value, or array element)
    Value,
    /// ',' or the container close
    Comma,
}

#[derive(Debug)]
struct Frame {
    kind: Kind,
    expect: Expect,
    /// Truncate-to index that drops the member in progress together
    /// with its introducing comma
    cut: usize,
}

/// Close a truncated JSON document, recovering the longest valid prefix.
pub fn repair(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut stack: Vec<Frame> = Vec::new();

    let mut in_string = false;
    let mut is_key = false;
    let mut escape = false;
    let mut escape_start = 0usize;
    let mut unicode_remaining = 0u8;

    let mut token_start: Option<usize> = None;
    // End of a completed top-level value, if any
    let mut top_end: Option<usize> = None;

    let mut i = 0usize;
    while i < bytes.len() {
        let c = bytes[i];

        if in_string {
            if unicode_remaining > 0 {
                unicode_remaining -= 1;
            } else if escape {
                if c == b'u' {
                    unicode_remaining = 4;
                }
                escape = false;
            } else if c == b'\\' {
                escape = true;
                escape_start = i;
            } else if c == b'"' {
                in_string = false;
                match stack.last_mut() {
                    Some(frame) if is_key => frame.expect = Expect::Colon,
                    Some(frame) => frame.expect = Expect::Comma,
                    None => top_end = Some(i + 1),
                }
            }
            i += 1;
            continue;
        }

        // A non-token byte terminates a pending scalar token
        if token_start.is_some() && !is_token_byte(c) {
            token_start = None;
            match stack.last_mut() {
                Some(frame) => frame.expect = Expect::Comma,
                None => top_end = Some(i),
            }
        }

        match c {
            b'"' => {
                is_key = matches!(
                    stack.last(),
                    Some(Frame {
                        kind: Kind::Object,
                        expect: Expect::Key,
                        ..
                    })
                );
                in_string = true;
                escape = false;
            }
            b'{' | b'[' => {
                let kind = if c == b'{' { Kind::Object } else { Kind::Array };
                let expect = if c == b'{' { Expect::Key } else { Expect::Value };
                stack.push(Frame {
                    kind,
                    expect,
                    cut: i + 1,
                });
            }
            b'}' | b']' => {
                stack.pop();
                match stack.last_mut() {
                    Some(frame) => frame.expect = Expect::Comma,
                    None => top_end = Some(i + 1),
                }
            }
            b':' => {
                if let Some(frame) = stack.last_mut() {
                    frame.expect = Expect::Value;
                }
            }
            b',' => {
                if let Some(frame) = stack.last_mut() {
                    frame.expect = match frame.kind {
                        Kind::Object => Expect::Key,
                        Kind::Array => Expect::Value,
                    };
                    frame.cut = i;
                }
            }
            _ if is_token_byte(c) => {
                if token_start.is_none() {
                    token_start = Some(i);
                }
            }
            _ => {}
        }

        // Once a top-level value is complete, everything after it is
        // the strict decoder's problem
        if top_end.is_some() && stack.is_empty() && !in_string {
            break;
        }

        i += 1;
    }

    if let Some(end) = top_end {
        if stack.is_empty() && !in_string {
            let out = text[..end].to_string();
            return (!out.trim().is_empty()).then_some(out);
        }
    }

    // Decide where to cut the tail
    let mut end = i.min(bytes.len());
    let mut close_string = false;

    if in_string {
        if is_key {
            // Drop the partial key and its introducing comma
            if let Some(frame) = stack.last() {
                end = frame.cut;
            }
        } else {
            if escape || unicode_remaining > 0 {
                // Cut back to the backslash of the incomplete escape
                end = escape_start;
            }
            close_string = true;
        }
    } else if let Some(start) = token_start {
        let token = &text[start..end];
        if !matches!(token, "true" | "false" | "null") {
            // A trailing number may still be growing; drop the member
            match stack.last() {
                Some(frame) => end = frame.cut,
                None => end = start,
            }
        }
    } else if let Some(frame) = stack.last() {
        if matches!(frame.expect, Expect::Colon | Expect::Value | Expect::Key) {
            // Dangling key, colon, or comma with no value yet
            end = frame.cut;
        }
    }

    let mut out = text[..end].to_string();
    if close_string {
        out.push('"');
    }
    for frame in stack.iter().rev() {
        out.push(match frame.kind {
            Kind::Object => '}',
            Kind::Array => ']',
        });
    }

    (!out.trim().is_empty()).then_some(out)
}

fn is_token_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'-' | b'+' | b'.')
}
