/// Rewrites the leading code points of `candidate` to follow the case
/// pattern of `prefix`.
///
/// Position `i < len(prefix)` becomes upper-case when `prefix[i]` is
/// upper-case and lower-case otherwise. Code points past the prefix keep
/// their stored casing. Only one-to-one case mappings are applied; a code
/// point whose mapping expands (`ß` → `SS`) stays as stored, so the output
/// always has the same number of code points as `candidate`.
pub fn apply_prefix_casing(candidate: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return candidate.to_owned();
    }

    let mut out = String::with_capacity(candidate.len());
    let mut pattern = prefix.chars();

    for ch in candidate.chars() {
        match pattern.next() {
            Some(p) if p.is_uppercase() => out.push(single(ch, ch.to_uppercase())),
            Some(_) => out.push(single(ch, ch.to_lowercase())),
            None => out.push(ch),
        }
    }

    out
}

#[inline(always)]
fn single(original: char, mut mapped: impl Iterator<Item = char>) -> char {
    match (mapped.next(), mapped.next()) {
        (Some(c), None) => c,
        _ => original,
    }
}
