use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Word-wrap a single line to `width` terminal cells.
///
/// Breaks at whitespace; runs of whitespace between words collapse to one
/// space. A word wider than `width` is split at grapheme boundaries. A
/// width of zero disables wrapping.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if width == 0 || display_width(line) <= width {
        return vec![line.trim_end().to_string()];
    }

    let mut rows: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut col = 0;

    for word in line.split_whitespace() {
        let word_dw = display_width(word);
        if col > 0 && col + 1 + word_dw <= width {
            current.push(' ');
            current.push_str(word);
            col += 1 + word_dw;
            continue;
        }
        if col > 0 {
            rows.push(std::mem::take(&mut current));
            col = 0;
        }
        if word_dw <= width {
            current.push_str(word);
            col = word_dw;
            continue;
        }
        // Too wide for any row: grapheme-wrap it
        for g in word.graphemes(true) {
            let gdw = display_width(g);
            if col + gdw > width && col > 0 {
                rows.push(std::mem::take(&mut current));
                col = 0;
            }
            current.push_str(g);
            col += gdw;
        }
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_of_ascii_and_wide() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("日本"), 4);
        assert_eq!(display_width("\u{2022}"), 1);
    }

    #[test]
    fn short_line_unchanged() {
        assert_eq!(wrap_line("hello world", 20), vec!["hello world"]);
    }

    #[test]
    fn breaks_at_spaces() {
        assert_eq!(
            wrap_line("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn long_word_is_split() {
        assert_eq!(wrap_line("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn long_word_after_text_starts_new_row() {
        assert_eq!(wrap_line("ab abcdefgh", 4), vec!["ab", "abcd", "efgh"]);
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(wrap_line("日本 語学", 4), vec!["日本", "語学"]);
    }

    #[test]
    fn zero_width_disables_wrapping() {
        assert_eq!(wrap_line("a b c", 0), vec!["a b c"]);
    }

    #[test]
    fn empty_line_yields_one_empty_row() {
        assert_eq!(wrap_line("", 10), vec![""]);
    }
}
