use ratatui::style::Style;
use ratatui::text::Span;
use textwrap::{Options, WordSplitter};

/// Wrap one paragraph of text to `width` columns. Blank input yields one empty line.
pub fn wrap_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let options = Options::new(width).word_splitter(WordSplitter::NoHyphenation);
    let wrapped: Vec<String> = textwrap::wrap(text, options).into_iter().map(|line| line.into_owned()).collect();
    if wrapped.is_empty() { vec![String::new()] } else { wrapped }
}

pub fn is_url(word: &str) -> bool {
    word.starts_with("http://") || word.starts_with("https://")
}

/// Split a wrapped line into spans, styling URL tokens with `link`
pub fn highlight_urls(line: &str, text: Style, link: Style) -> Vec<Span<'static>> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut plain = String::new();

    for piece in line.split_inclusive(' ') {
        let word = piece.trim_end_matches(' ');
        if is_url(word) {
            if !plain.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut plain), text));
            }
            let url = word.trim_end_matches(['.', ',', ')', ';', ':']);
            spans.push(Span::styled(url.to_string(), link));
            plain.push_str(&piece[url.len()..]);
        } else {
            plain.push_str(piece);
        }
    }

    if !plain.is_empty() {
        spans.push(Span::styled(plain, text));
    }
    spans
}
