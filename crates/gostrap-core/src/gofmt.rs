//! Deterministic normalizer for rendered Go source.
//!
//! Not a full gofmt: it re-indents by nesting depth, cleans whitespace and
//! rejects structurally broken output. Template resources are a maintained
//! contract, so anything the normalizer cannot account for is a defect in
//! the resource, not a recoverable condition.

use anyhow::{Result, bail};

/// Scanner state that survives across lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    BlockComment,
    RawString,
}

struct Scanner {
    mode: Mode,
    depth: usize,
}

/// Normalize `src` as Go source: CRLF to LF, trailing whitespace stripped,
/// blank-line runs collapsed, lines re-indented with tabs by nesting
/// depth, exactly one trailing newline. Raw-string interiors are emitted
/// byte for byte. Fails on unbalanced delimiters and unterminated
/// literals or comments.
pub fn format_source(src: &str) -> Result<String> {
    let src = src.replace("\r\n", "\n");
    let mut scanner = Scanner {
        mode: Mode::Code,
        depth: 0,
    };
    let mut out: Vec<String> = Vec::new();

    for (index, line) in src.lines().enumerate() {
        let line_no = index + 1;
        let started_in = scanner.mode;
        let depth_before = scanner.depth;
        let lead_close = scan_line(line, &mut scanner, line_no)?;

        match started_in {
            Mode::RawString => out.push(line.to_string()),
            Mode::BlockComment => out.push(line.trim_end().to_string()),
            Mode::Code => {
                let content = line.trim();
                if content.is_empty() {
                    if out.last().is_some_and(|last| !last.is_empty()) {
                        out.push(String::new());
                    }
                } else {
                    let indent = depth_before - lead_close;
                    out.push(format!("{}{content}", "\t".repeat(indent)));
                }
            }
        }
    }

    match scanner.mode {
        Mode::BlockComment => bail!("unterminated block comment"),
        Mode::RawString => bail!("unterminated raw string literal"),
        Mode::Code => {}
    }
    if scanner.depth != 0 {
        bail!("unbalanced delimiters: {} left open", scanner.depth);
    }

    while out.last().is_some_and(|last| last.is_empty()) {
        out.pop();
    }
    Ok(out.join("\n") + "\n")
}

/// Advance the scanner over one line. Returns how many closing delimiters
/// lead the line (they dedent the line they appear on).
fn scan_line(line: &str, scanner: &mut Scanner, line_no: usize) -> Result<usize> {
    let mut lead_close = 0usize;
    // leading closers only count while nothing else has appeared on a
    // line that started as code
    let mut in_lead = scanner.mode == Mode::Code;
    let mut in_string = false;
    let mut in_char = false;
    let mut escaped = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match scanner.mode {
            Mode::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    scanner.mode = Mode::Code;
                }
            }
            Mode::RawString => {
                if c == '`' {
                    scanner.mode = Mode::Code;
                }
            }
            Mode::Code => {
                if in_string || in_char {
                    if escaped {
                        escaped = false;
                    } else if c == '\\' {
                        escaped = true;
                    } else if in_string && c == '"' {
                        in_string = false;
                    } else if in_char && c == '\'' {
                        in_char = false;
                    }
                    continue;
                }
                match c {
                    '"' => {
                        in_string = true;
                        in_lead = false;
                    }
                    '\'' => {
                        in_char = true;
                        in_lead = false;
                    }
                    '`' => {
                        scanner.mode = Mode::RawString;
                        in_lead = false;
                    }
                    '/' if chars.peek() == Some(&'/') => break,
                    '/' if chars.peek() == Some(&'*') => {
                        chars.next();
                        scanner.mode = Mode::BlockComment;
                        in_lead = false;
                    }
                    '(' | '[' | '{' => {
                        scanner.depth += 1;
                        in_lead = false;
                    }
                    ')' | ']' | '}' => {
                        if scanner.depth == 0 {
                            bail!("unbalanced '{c}' on line {line_no}");
                        }
                        scanner.depth -= 1;
                        if in_lead {
                            lead_close += 1;
                        }
                    }
                    _ => {
                        if !c.is_whitespace() {
                            in_lead = false;
                        }
                    }
                }
            }
        }
    }

    if in_string {
        bail!("unterminated string literal on line {line_no}");
    }
    if in_char {
        bail!("unterminated rune literal on line {line_no}");
    }
    Ok(lead_close)
}
