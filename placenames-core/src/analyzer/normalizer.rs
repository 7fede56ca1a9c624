use smallvec::SmallVec;

/// Folded code points of a name or prefix.
///
/// Most place names fit inline, so folding a query does not allocate.
pub type Folded = SmallVec<[char; 32]>;

/// Locale-independent, code-point-wise case folder.
///
/// Every code point is replaced by exactly one code point: the first code
/// point of its Unicode lower-case mapping. A mapping that expands (`İ` →
/// `i̇`) therefore contributes only its base letter, so `İstanbul` and
/// `istanbul` fold alike and folded length always equals the input's code
/// point count. Whitespace and punctuation pass through unchanged; no
/// trimming or collapsing happens here.
///
/// # Examples
///
/// ```
/// use placenames_core::analyzer::CaseFolder;
///
/// let folded = CaseFolder.fold("LonDON");
/// assert_eq!(folded.iter().collect::<String>(), "london");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseFolder;

impl CaseFolder {
    /// Folds `input` into `out`, clearing it first.
    ///
    /// ASCII bytes take a table-free fast path; everything else goes
    /// through `char::to_lowercase`, keeping its first code point.
    #[inline]
    pub fn fold_into(&self, input: &str, out: &mut Folded) {
        out.clear();
        out.reserve(input.len());

        for ch in input.chars() {
            if ch.is_ascii() {
                out.push(ch.to_ascii_lowercase());
            } else {
                out.push(ch.to_lowercase().next().unwrap_or(ch));
            }
        }
    }

    /// Folds `input` into a new buffer.
    #[inline]
    pub fn fold(&self, input: &str) -> Folded {
        let mut out = Folded::new();
        self.fold_into(input, &mut out);
        out
    }
}
