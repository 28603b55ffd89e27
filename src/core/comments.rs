//! End-of-line comment relocation
//!
//! `text % note` becomes `% note` on its own line followed by `text`, so
//! later passes never see a comment in the middle of a formatted line.

/// Move every unescaped `%` comment onto its own line, ahead of the content
/// it trailed. A `%` with nothing after it is left alone.
pub fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + 16);
    for line in source.split_inclusive('\n') {
        let (body, newline) = match line.strip_suffix('\n') {
            Some(body) => (body, "\n"),
            None => (line, ""),
        };
        match comment_start(body) {
            Some(at) => {
                let content = body[..at].trim_end_matches([' ', '\t']);
                out.push_str(&body[at..]);
                if !content.trim_start().is_empty() {
                    out.push('\n');
                    out.push_str(content);
                }
            }
            None => out.push_str(body),
        }
        out.push_str(newline);
    }
    out
}

fn comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    (0..bytes.len()).find(|&i| {
        bytes[i] == b'%' && (i == 0 || bytes[i - 1] != b'\\') && i + 1 < bytes.len()
    })
}
