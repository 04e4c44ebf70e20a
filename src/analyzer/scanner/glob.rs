//! Glob matching for ignore-file patterns.
//!
//! - `?` matches exactly one character, never `/`
//! - `*` matches any run of characters inside one path segment
//! - `**` as a whole segment matches zero or more complete segments
//!
//! A `**` that does not occupy a whole segment (`a**b`) behaves like `*`.

/// Match `candidate` (a `/`-separated relative path) against `pattern`.
pub fn glob_match(pattern: &str, candidate: &str) -> bool {
    match find_segment_double_star(pattern) {
        Some((start, end)) => match_double_star(pattern, candidate, start, end),
        None => match_segment_glob(pattern, candidate),
    }
}

/// Match with `*` and `?` only; neither wildcard crosses `/`.
///
/// Greedy scan that remembers the last `*` and retries from there on a
/// mismatch, so the worst case is O(pattern * candidate).
pub fn match_segment_glob(pattern: &str, candidate: &str) -> bool {
    let pat: Vec<char> = pattern.chars().collect();
    let cand: Vec<char> = candidate.chars().collect();

    let (mut pi, mut ci) = (0, 0);
    // (pattern index of the last `*`, candidate index it has absorbed up to)
    let mut star: Option<(usize, usize)> = None;

    while ci < cand.len() {
        if pi < pat.len() {
            match pat[pi] {
                '*' => {
                    star = Some((pi, ci));
                    pi += 1;
                    continue;
                }
                '?' if cand[ci] != '/' => {
                    pi += 1;
                    ci += 1;
                    continue;
                }
                ch if ch != '?' && ch == cand[ci] => {
                    pi += 1;
                    ci += 1;
                    continue;
                }
                _ => {}
            }
        }

        match star {
            Some((star_pi, absorbed)) if cand[absorbed] != '/' => {
                star = Some((star_pi, absorbed + 1));
                pi = star_pi + 1;
                ci = absorbed + 1;
            }
            _ => return false,
        }
    }

    while pi < pat.len() && pat[pi] == '*' {
        pi += 1;
    }

    pi == pat.len()
}

/// Every segment-aligned suffix of `path`, longest first: `a/b/c`, `b/c`, `c`.
pub(crate) fn segment_suffixes(path: &str) -> impl Iterator<Item = &str> {
    std::iter::once(path).chain(path.match_indices('/').map(move |(i, _)| &path[i + 1..]))
}

/// Locate the first `**` run that forms a whole path segment.
/// Returns the byte range of the star run.
fn find_segment_double_star(pattern: &str) -> Option<(usize, usize)> {
    let bytes = pattern.as_bytes();
    let mut i = 0;

    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'*' {
            let mut end = i + 2;
            while end < bytes.len() && bytes[end] == b'*' {
                end += 1;
            }
            let starts_segment = i == 0 || bytes[i - 1] == b'/';
            let ends_segment = end == bytes.len() || bytes[end] == b'/';
            if starts_segment && ends_segment {
                return Some((i, end));
            }
            i = end;
        } else {
            i += 1;
        }
    }

    None
}

fn match_double_star(pattern: &str, candidate: &str, start: usize, end: usize) -> bool {
    let prefix = &pattern[..start];
    let prefix = prefix.strip_suffix('/').unwrap_or(prefix);
    let suffix = &pattern[end..];
    let suffix = suffix.strip_prefix('/').unwrap_or(suffix);

    let rest = if prefix.is_empty() {
        candidate
    } else {
        let segments = prefix.split('/').count();
        let Some((head, rest)) = split_after_segments(candidate, segments) else {
            return false;
        };
        if !match_segment_glob(prefix, head) {
            return false;
        }
        rest
    };

    if suffix.is_empty() {
        // `dir/**` covers what is inside `dir`, not `dir` itself
        return prefix.is_empty() || !rest.is_empty();
    }

    // `**` absorbs any number of leading segments; later `**` groups recurse
    segment_suffixes(rest).any(|tail| glob_match(suffix, tail))
}

/// Split `path` after its first `count` segments.
/// Returns `None` when the path has fewer segments.
fn split_after_segments(path: &str, count: usize) -> Option<(&str, &str)> {
    match path.match_indices('/').nth(count - 1) {
        Some((i, _)) => Some((&path[..i], &path[i + 1..])),
        None if path.split('/').count() == count => Some((path, "")),
        None => None,
    }
}
