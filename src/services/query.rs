/// Search query normalization.
///
/// The catalog's keyword index is sensitive to whitespace placement, so a raw
/// query is expanded into a small set of rewrites before fanning out. A
/// 4-digit year token is pulled out separately; it filters the film-archive
/// search downstream and never takes part in the text match.

/// A raw query split into its text keyword and an optional year filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub keyword: String,
    pub year: Option<u16>,
}

/// Trims the input, extracts the first year token and strips all year tokens
/// from the keyword.
///
/// A year token is a maximal run of exactly four ASCII digits starting with
/// `19` or `20` (so 1900–2099), not adjacent to any ASCII letter, digit or
/// underscore. Non-ASCII neighbors do not block a match, which is what lets
/// `"너의이름은2016"` carry a year with no separating space.
pub fn parse_query(raw: &str) -> ParsedQuery {
    let trimmed = raw.trim();
    let runs = year_runs(trimmed);

    let year = runs
        .first()
        .and_then(|&(start, end)| trimmed[start..end].parse().ok());

    let keyword = match year {
        Some(_) => {
            let mut keyword = String::with_capacity(trimmed.len());
            let mut cursor = 0;
            for &(start, end) in &runs {
                keyword.push_str(&trimmed[cursor..start]);
                cursor = end;
            }
            keyword.push_str(&trimmed[cursor..]);
            keyword.trim().to_string()
        }
        None => trimmed.to_string(),
    };

    ParsedQuery { keyword, year }
}

/// Byte ranges of every qualifying year token, in order
fn year_runs(text: &str) -> Vec<(usize, usize)> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut runs = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].1.is_ascii_digit() {
            i += 1;
            continue;
        }

        let mut j = i;
        while j < chars.len() && chars[j].1.is_ascii_digit() {
            j += 1;
        }

        let digits = j - i;
        let prev_blocks = i > 0 && is_word_char(chars[i - 1].1);
        let next_blocks = j < chars.len() && is_word_char(chars[j].1);
        if digits == 4 && !prev_blocks && !next_blocks {
            let start = chars[i].0;
            let end = chars.get(j).map_or(text.len(), |&(idx, _)| idx);
            let token = &text[start..end];
            if token.starts_with("19") || token.starts_with("20") {
                runs.push((start, end));
            }
        }

        i = j;
    }

    runs
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Expands a keyword into an ordered, duplicate-free list of search variants.
///
/// Variant 0 is always the trimmed keyword. The whitespace-removed form and
/// the whitespace-inserted form follow when they differ from what is already
/// in the list.
pub fn search_variants(keyword: &str) -> Vec<String> {
    let trimmed = keyword.trim().to_string();
    let mut variants = vec![trimmed.clone()];

    let no_spaces: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    if no_spaces != trimmed {
        variants.push(no_spaces);
    }

    let with_spaces = insert_word_breaks(&trimmed);
    if with_spaces != trimmed && !variants.contains(&with_spaces) {
        variants.push(with_spaces);
    }

    variants
}

/// Single-pass word-break heuristic for unspaced Hangul.
///
/// For each maximal run of at least three Hangul syllables, one space is
/// inserted before the run's final syllable. This is not segmentation; it
/// just produces one extra spelling the index may have seen.
fn insert_word_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut run: Vec<char> = Vec::new();

    for c in text.chars() {
        if is_hangul_syllable(c) {
            run.push(c);
            continue;
        }
        flush_run(&mut out, &mut run);
        out.push(c);
    }
    flush_run(&mut out, &mut run);

    out
}

fn flush_run(out: &mut String, run: &mut Vec<char>) {
    if run.len() >= 3 {
        out.extend(run[..run.len() - 1].iter());
        out.push(' ');
        out.push(run[run.len() - 1]);
    } else {
        out.extend(run.iter());
    }
    run.clear();
}

fn is_hangul_syllable(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}
