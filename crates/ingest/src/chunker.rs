//! Character-budget chunking with boundary preference.
//!
//! Chunks are contiguous subslices of the input, so re-joining them in
//! order reproduces the input byte-for-byte. Within the last 10% of the
//! budget the chunker prefers a paragraph break (`\n\n`), then a sentence
//! break, and only hard-cuts at the budget when neither exists. Cuts
//! always land on char boundaries.

/// One chunk of the assembled document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// 1-based position in the sequence.
    pub index: usize,
    pub text: &'a str,
    /// Char offset of the chunk start within the input.
    pub char_start: usize,
    /// Char offset one past the chunk end (exclusive).
    pub char_end: usize,
}

/// Lazy iterator over budget-bounded chunks of `text`.
///
/// The budget is measured in chars, not bytes. Deterministic: the same
/// input and budget always produce the same cuts.
pub struct Chunker<'a> {
    text: &'a str,
    budget: usize,
    lookback: usize,
    pos: usize,
    char_pos: usize,
    next_index: usize,
}

impl<'a> Chunker<'a> {
    /// Panics if `budget` is zero (config validation rejects it earlier).
    pub fn new(text: &'a str, budget: usize) -> Self {
        assert!(budget > 0, "chunk budget must be positive");
        Self {
            text,
            budget,
            lookback: budget / 10,
            pos: 0,
            char_pos: 0,
            next_index: 1,
        }
    }
}

impl<'a> Iterator for Chunker<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Chunk<'a>> {
        if self.pos >= self.text.len() {
            return None;
        }
        let rest = &self.text[self.pos..];

        // Byte offsets of the lookback window start and the hard cap,
        // both counted in chars from the start of `rest`.
        let mut window_start = rest.len();
        let mut hard_end = rest.len();
        let mut truncated = false;
        for (count, (i, _)) in rest.char_indices().enumerate() {
            if count == self.budget - self.lookback {
                window_start = i;
            }
            if count == self.budget {
                hard_end = i;
                truncated = true;
                break;
            }
        }

        let cut = if !truncated {
            // Everything left fits in one chunk.
            rest.len()
        } else {
            paragraph_cut(rest, window_start, hard_end)
                .or_else(|| sentence_cut(rest, window_start, hard_end))
                .unwrap_or(hard_end)
        };

        let chunk_text = &rest[..cut];
        let chars = chunk_text.chars().count();
        let chunk = Chunk {
            index: self.next_index,
            text: chunk_text,
            char_start: self.char_pos,
            char_end: self.char_pos + chars,
        };
        self.next_index += 1;
        self.pos += cut;
        self.char_pos += chars;
        Some(chunk)
    }
}

/// Latest paragraph break inside the window; the cut lands after the
/// `\n\n` separator so the break stays with the earlier chunk.
fn paragraph_cut(rest: &str, window_start: usize, hard_end: usize) -> Option<usize> {
    rest[window_start..hard_end]
        .rfind("\n\n")
        .map(|j| window_start + j + 2)
}

/// Latest sentence break inside the window: terminal punctuation, a
/// space, then an uppercase letter, newline, or end of input. The cut
/// lands after the space.
fn sentence_cut(rest: &str, window_start: usize, hard_end: usize) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut cut = None;
    for i in window_start..hard_end {
        let is_terminal = bytes[i] == b'.' || bytes[i] == b'!' || bytes[i] == b'?';
        if is_terminal && i + 1 < hard_end && bytes[i + 1] == b' ' {
            let after = if i + 2 < bytes.len() {
                bytes[i + 2]
            } else {
                b'\n' // end-of-string acts like newline
            };
            if after.is_ascii_uppercase() || after == b'\n' {
                cut = Some(i + 2);
            }
        }
    }
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejoin(chunks: &[Chunk]) -> String {
        chunks.iter().map(|c| c.text).collect()
    }

    #[test]
    fn short_text_is_single_chunk() {
        let text = "Just a short paragraph.";
        let chunks: Vec<_> = Chunker::new(text, 1000).collect();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].index, 1);
        assert_eq!(chunks[0].text, text);
        assert_eq!(chunks[0].char_start, 0);
        assert_eq!(chunks[0].char_end, text.chars().count());
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let chunks: Vec<_> = Chunker::new("", 100).collect();
        assert!(chunks.is_empty());
    }

    #[test]
    fn rejoin_is_byte_exact() {
        let text = "First paragraph with some words.\n\nSecond paragraph, longer, \
                    with more words in it. And a second sentence.\n\nThird one here."
            .repeat(40);
        let chunks: Vec<_> = Chunker::new(&text, 500).collect();
        assert!(chunks.len() > 1);
        assert_eq!(rejoin(&chunks), text);
    }

    #[test]
    fn no_chunk_exceeds_budget() {
        let text = "word ".repeat(5000);
        for budget in [50, 333, 1000] {
            for chunk in Chunker::new(&text, budget) {
                assert!(chunk.text.chars().count() <= budget);
            }
        }
    }

    #[test]
    fn indices_are_one_based_and_sequential() {
        let text = "x".repeat(950);
        let chunks: Vec<_> = Chunker::new(&text, 100).collect();
        assert_eq!(chunks.len(), 10);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i + 1);
        }
    }

    #[test]
    fn prefers_paragraph_break() {
        // The paragraph break sits inside the 10% lookback window.
        let text = format!("{}\n\n{}", "a".repeat(96), "b".repeat(100));
        let chunks: Vec<_> = Chunker::new(&text, 100).collect();
        assert_eq!(chunks[0].text, format!("{}\n\n", "a".repeat(96)));
        assert!(chunks[1].text.starts_with('b'));
        assert_eq!(rejoin(&chunks), text);
    }

    #[test]
    fn falls_back_to_sentence_break() {
        // No paragraph break anywhere; one sentence boundary in the window.
        let text = format!("{}. Then more text follows here", "a".repeat(93));
        let chunks: Vec<_> = Chunker::new(&text, 100).collect();
        assert_eq!(chunks[0].text, format!("{}. ", "a".repeat(93)));
        assert!(chunks[1].text.starts_with("Then"));
        assert_eq!(rejoin(&chunks), text);
    }

    #[test]
    fn sentence_break_needs_uppercase_or_newline() {
        // ". t" is not a sentence boundary, so the cut is a hard cut.
        let text = format!("{}. then lowercase continues on and on", "a".repeat(93));
        let chunks: Vec<_> = Chunker::new(&text, 100).collect();
        assert_eq!(chunks[0].text.chars().count(), 100);
        assert_eq!(rejoin(&chunks), text);
    }

    #[test]
    fn hard_cut_without_boundaries() {
        let text = "x".repeat(250);
        let chunks: Vec<_> = Chunker::new(&text, 100).collect();
        let lens: Vec<_> = chunks.iter().map(|c| c.text.len()).collect();
        assert_eq!(lens, vec![100, 100, 50]);
        assert_eq!(rejoin(&chunks), text);
    }

    #[test]
    fn never_cuts_inside_multibyte_chars() {
        let text = "é".repeat(250); // two bytes per char
        let chunks: Vec<_> = Chunker::new(&text, 100).collect();
        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 100);
            assert!(chunk.text.chars().all(|c| c == 'é'));
        }
        assert_eq!(rejoin(&chunks), text);
    }

    #[test]
    fn char_offsets_are_contiguous() {
        let text = format!("{}\n\n{}", "Hello world. ".repeat(30), "More text. ".repeat(30));
        let chunks: Vec<_> = Chunker::new(&text, 120).collect();
        let mut expected_start = 0;
        for chunk in &chunks {
            assert_eq!(chunk.char_start, expected_start);
            assert_eq!(chunk.char_end - chunk.char_start, chunk.text.chars().count());
            expected_start = chunk.char_end;
        }
        assert_eq!(expected_start, text.chars().count());
    }

    #[test]
    fn budget_of_one_still_terminates() {
        let text = "abc";
        let chunks: Vec<_> = Chunker::new(text, 1).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(rejoin(&chunks), text);
    }

    #[test]
    fn exactly_three_chunks_at_fifty_thousand() {
        // 120k chars of ~1k paragraphs, 50k budget: two boundary cuts
        // land high in the lookback window, leaving three chunks.
        let para = "x".repeat(999);
        let mut text = String::new();
        for _ in 0..119 {
            text.push_str(&para);
            text.push_str("\n\n");
        }
        text.push_str(&"x".repeat(881));
        assert_eq!(text.chars().count(), 120_000);

        let chunks: Vec<_> = Chunker::new(&text, 50_000).collect();
        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 50_000);
        }
        assert_eq!(rejoin(&chunks), text);
    }

    #[test]
    fn page_markers_pass_through_untouched() {
        let text = format!(
            "--- Page 1 ---\n{}\n\n--- Page 2 ---\n{}",
            "alpha ".repeat(30),
            "beta ".repeat(30)
        );
        let chunks: Vec<_> = Chunker::new(&text, 200).collect();
        assert_eq!(rejoin(&chunks), text);
    }
}
