//! Provenance tagging and extraction.
//!
//! Every rendered page starts with a comment block naming the style code and
//! course that produced it:
//!
//! ```text
//! <!-- ===================== -->
//! <!-- Style code: 07 -->
//! <!-- Course title: Year 7 Science -->
//! <!-- ===================== -->
//! ```
//!
//! The reverse pipeline reads the style code back out of that block to find
//! the palette it has to undo.

use super::error::{EngineError, EngineResult};
use regex::Regex;
use std::sync::LazyLock;

/// Rule line above and below the provenance fields.
pub const PROVENANCE_RULE: &str = "<!-- ===================== -->";

// Only a block at the very start of the page counts; body text quoting the
// format is content.
static LEADING_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\A\s*(?:<!--[ \t]*=+[ \t]*-->[ \t]*\r?\n[ \t]*)?",
        r"<!--[ \t]*Style code:[ \t]*(.*?)[ \t]*-->[ \t]*",
        r"(?:\r?\n[ \t]*<!--[ \t]*Course title:[ \t]*(.*?)[ \t]*-->[ \t]*)?",
        r"(?:\r?\n[ \t]*<!--[ \t]*=+[ \t]*-->[ \t]*)?",
        r"(?:\r?\n)?",
    ))
    .expect("provenance block pattern is valid")
});

static LOCAL_SHELL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?s)\A\s*<!DOCTYPE html>\s*<html>\s*<head>\s*<meta charset="utf-8">\s*"#,
        r"<title>.*?</title>\s*</head>\s*<body>\n(.*)\n</body>\s*</html>\s*\z",
    ))
    .expect("local shell pattern is valid")
});

/// Fields carried by a provenance block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// Style code that selected the palette
    pub style_code: String,
    /// Course title, when the block carries one
    pub course_title: Option<String>,
}

/// Builds the provenance comment block, terminated by a newline.
pub fn tag(style_code: &str, course_title: &str) -> String {
    format!(
        "{PROVENANCE_RULE}\n<!-- Style code: {} -->\n<!-- Course title: {} -->\n{PROVENANCE_RULE}\n",
        comment_safe(style_code),
        comment_safe(course_title),
    )
}

/// Reads the provenance fields out of a rendered page.
///
/// The block must open the page, or open the body of a local preview shell.
///
/// # Errors
///
/// Returns [`EngineError::MissingProvenance`] when the page does not start
/// with a non-empty "Style code" comment line.
pub fn extract(html: &str) -> EngineResult<Provenance> {
    let content = strip_local_shell(html).unwrap_or(html);
    let caps = LEADING_BLOCK_RE
        .captures(content)
        .ok_or(EngineError::MissingProvenance)?;

    let style_code = caps
        .get(1)
        .map(|m| m.as_str().to_string())
        .filter(|code| !code.is_empty())
        .ok_or(EngineError::MissingProvenance)?;
    let course_title = caps.get(2).map(|m| m.as_str().to_string());

    Ok(Provenance {
        style_code,
        course_title,
    })
}

/// Removes the leading provenance block from `html`. Provenance-shaped lines
/// further down are left alone.
pub fn strip(html: &str) -> String {
    LEADING_BLOCK_RE.replace(html, "").into_owned()
}

/// Checks that `style_code` survives being written into a provenance comment
/// unchanged, so the page can be traced back to its palette.
///
/// # Errors
///
/// Returns [`EngineError::UnrecordableStyleCode`] for codes containing `--`,
/// line breaks, or surrounding whitespace.
pub fn check_style_code(style_code: &str) -> EngineResult<()> {
    if comment_safe(style_code) == style_code {
        Ok(())
    } else {
        Err(EngineError::UnrecordableStyleCode {
            code: style_code.to_string(),
        })
    }
}

/// Wraps rendered content in the minimal document shell used for local preview.
pub fn wrap_local_shell(course_title: &str, content: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{content}\n</body>\n</html>\n",
        escape_html(course_title),
    )
}

/// Returns the shell content if `html` is wrapped by [`wrap_local_shell`].
pub fn strip_local_shell(html: &str) -> Option<&str> {
    LOCAL_SHELL_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Keeps a value on one line and prevents it from closing the comment early.
fn comment_safe(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut previous = '\0';
    for c in value.chars() {
        let c = if c == '\n' || c == '\r' { ' ' } else { c };
        if c == '-' && previous == '-' {
            out.push(' ');
        }
        out.push(c);
        previous = c;
    }
    out.trim().to_string()
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_exact_format() {
        let block = tag("07", "Year 7 Science");
        assert_eq!(
            block,
            "<!-- ===================== -->\n\
             <!-- Style code: 07 -->\n\
             <!-- Course title: Year 7 Science -->\n\
             <!-- ===================== -->\n"
        );
    }

    #[test]
    fn test_extract_round_trip() {
        let html = format!("{}<body>hi</body>", tag("12", "Senior Maths"));
        let provenance = extract(&html).unwrap();
        assert_eq!(provenance.style_code, "12");
        assert_eq!(provenance.course_title.as_deref(), Some("Senior Maths"));
    }

    #[test]
    fn test_extract_missing() {
        let err = extract("<body><!-- just a comment --></body>").unwrap_err();
        assert!(matches!(err, EngineError::MissingProvenance));
    }

    #[test]
    fn test_extract_empty_code_is_missing() {
        let err = extract("<!-- Style code:  -->").unwrap_err();
        assert!(matches!(err, EngineError::MissingProvenance));
    }

    #[test]
    fn test_extract_tolerates_spacing() {
        let provenance = extract("<!--Style code:   A1   -->").unwrap();
        assert_eq!(provenance.style_code, "A1");
        assert_eq!(provenance.course_title, None);
    }

    #[test]
    fn test_strip_removes_block_only() {
        let html = format!("{}<body>\n  <p>x</p>\n</body>", tag("07", "Science"));
        assert_eq!(strip(&html), "<body>\n  <p>x</p>\n</body>");
    }

    #[test]
    fn test_strip_handles_crlf() {
        let html = tag("07", "Science").replace('\n', "\r\n") + "<p>x</p>";
        assert_eq!(strip(&html), "<p>x</p>");
    }

    #[test]
    fn test_quoted_provenance_in_body_is_content() {
        let body = "<pre>\n<!-- Style code: 99 -->\n<!-- Course title: Example -->\n</pre>\n";
        let html = format!("{}{body}", tag("07", "Science"));

        let provenance = extract(&html).unwrap();
        assert_eq!(provenance.style_code, "07");
        assert_eq!(strip(&html), body);
    }

    #[test]
    fn test_extract_requires_leading_block() {
        let html = "<p>intro</p>\n<!-- Style code: 07 -->\n";
        assert!(matches!(extract(html), Err(EngineError::MissingProvenance)));
        assert_eq!(strip(html), html);
    }

    #[test]
    fn test_extract_inside_local_shell() {
        let wrapped = wrap_local_shell("Sci", &format!("{}<p>x</p>", tag("08", "Sci")));
        assert_eq!(extract(&wrapped).unwrap().style_code, "08");
    }

    #[test]
    fn test_check_style_code() {
        assert!(check_style_code("07").is_ok());
        assert!(check_style_code("year-7").is_ok());
        for code in ["a--b", "07\n", " 07", "x-->"] {
            assert!(
                matches!(
                    check_style_code(code),
                    Err(EngineError::UnrecordableStyleCode { .. })
                ),
                "{code:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_comment_safe_values() {
        let block = tag("07", "Line one\nLine--two -->");
        assert!(block.contains("<!-- Course title: Line one Line- -two - -> -->"));
        let provenance = extract(&block).unwrap();
        assert_eq!(provenance.style_code, "07");
    }

    #[test]
    fn test_local_shell_round_trip() {
        let content = format!("{}<div>body</div>", tag("07", "Science & Arts"));
        let wrapped = wrap_local_shell("Science & Arts", &content);
        assert!(wrapped.contains("<title>Science &amp; Arts</title>"));
        assert_eq!(strip_local_shell(&wrapped), Some(content.as_str()));
        assert_eq!(strip_local_shell("<div>body</div>"), None);
    }
}
