use std::fs;
use std::io;
use std::path::Path;

use crate::util::wrap::{display_width, wrap_line};

const BULLET: &str = "  \u{2022} ";

/// One logical line of the about text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AboutLine {
    /// Paragraph break
    Blank,
    /// Plain text line (trimmed)
    Text(String),
    /// `- item` line, without the dash
    Bullet(String),
}

/// Parse about text: blank lines break paragraphs, lines starting with `-`
/// become bullets, everything else is text. Leading and trailing blank
/// lines are dropped.
pub fn parse_about(text: &str) -> Vec<AboutLine> {
    text.trim()
        .lines()
        .map(|line| {
            let stripped = line.trim();
            if stripped.is_empty() {
                AboutLine::Blank
            } else if let Some(rest) = stripped.strip_prefix('-') {
                AboutLine::Bullet(rest.trim().to_string())
            } else {
                AboutLine::Text(stripped.to_string())
            }
        })
        .collect()
}

/// Render parsed lines wrapped to `width` cells. Bullets get a hanging indent.
pub fn render_about(lines: &[AboutLine], width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in lines {
        match line {
            AboutLine::Blank => out.push(String::new()),
            AboutLine::Text(text) => out.extend(wrap_line(text, width)),
            AboutLine::Bullet(text) => {
                let indent = display_width(BULLET);
                let inner = if width > indent { width - indent } else { 0 };
                for (i, row) in wrap_line(text, inner).into_iter().enumerate() {
                    if i == 0 {
                        out.push(format!("{}{}", BULLET, row));
                    } else {
                        out.push(format!("{}{}", " ".repeat(indent), row));
                    }
                }
            }
        }
    }
    out
}

/// Read the about file. A missing or unreadable file gives a one-line
/// placeholder instead of an error.
pub fn read_about(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "about file".to_string());
    match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => format!("({} not found)", name),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read about file");
            format!("(error reading {})", name)
        }
    }
}
