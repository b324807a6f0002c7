//! Rename pairing: matching a removed name against an added name that has
//! the exact same kind and normalized signature.
//!
//! Built the way the teacher's symbol-diffing builds its other lookup
//! tables — index once by a derived key, then walk one side against the
//! index rather than an O(n*m) nested scan.

use std::collections::HashMap;

use crate::types::{ExportedSymbol, SymbolKind};

/// `(kind, signature) -> names carrying that shape`, built from one side of
/// a comparison.
pub struct SignatureIndex<'a> {
    by_shape: HashMap<(SymbolKind, &'a str), Vec<&'a str>>,
}

impl<'a> SignatureIndex<'a> {
    pub fn build(symbols: impl IntoIterator<Item = &'a ExportedSymbol>) -> Self {
        let mut by_shape: HashMap<(SymbolKind, &'a str), Vec<&'a str>> = HashMap::new();
        for symbol in symbols {
            by_shape
                .entry((symbol.kind, symbol.signature.as_str()))
                .or_default()
                .push(symbol.name.as_str());
        }
        Self { by_shape }
    }

    /// The name(s) on the indexed side sharing `symbol`'s kind and
    /// signature. A rename is only reported when exactly one candidate
    /// exists on each side under the same (kind, signature) key — ambiguity
    /// between two equally-shaped renamed symbols is left as a plain
    /// add/remove pair rather than guessed at.
    pub fn candidates(&self, symbol: &ExportedSymbol) -> &[&'a str] {
        self.by_shape
            .get(&(symbol.kind, symbol.signature.as_str()))
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}

/// Find an unambiguous rename pair for `removed_name` among `added`,
/// consulting both the removed-side and added-side indices so a shape
/// shared by more than one symbol on either side is correctly treated as
/// ambiguous rather than renamed.
pub fn find_rename<'a>(
    removed_symbol: &ExportedSymbol,
    removed_index: &SignatureIndex<'_>,
    added_index: &SignatureIndex<'a>,
) -> Option<&'a str> {
    let removed_candidates = removed_index.candidates(removed_symbol);
    if removed_candidates.len() != 1 {
        return None;
    }
    let added_candidates = added_index.candidates(removed_symbol);
    if added_candidates.len() == 1 {
        Some(added_candidates[0])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExportedSymbol;

    fn sym(name: &str, sig: &str) -> ExportedSymbol {
        ExportedSymbol::new(name, SymbolKind::Function, sig)
    }

    #[test]
    fn unambiguous_shape_match_is_a_rename() {
        let old = vec![sym("oldName", "(arg0: string) => void")];
        let new = vec![sym("newName", "(arg0: string) => void")];
        let old_index = SignatureIndex::build(&old);
        let new_index = SignatureIndex::build(&new);
        assert_eq!(find_rename(&old[0], &old_index, &new_index), Some("newName"));
    }

    #[test]
    fn shape_shared_by_two_added_symbols_is_not_a_rename() {
        let old = vec![sym("oldName", "(arg0: string) => void")];
        let new = vec![
            sym("a", "(arg0: string) => void"),
            sym("b", "(arg0: string) => void"),
        ];
        let old_index = SignatureIndex::build(&old);
        let new_index = SignatureIndex::build(&new);
        assert_eq!(find_rename(&old[0], &old_index, &new_index), None);
    }

    #[test]
    fn shape_shared_by_two_removed_symbols_is_not_a_rename() {
        let old = vec![
            sym("a", "(arg0: string) => void"),
            sym("b", "(arg0: string) => void"),
        ];
        let new = vec![sym("c", "(arg0: string) => void")];
        let old_index = SignatureIndex::build(&old);
        let new_index = SignatureIndex::build(&new);
        assert_eq!(find_rename(&old[0], &old_index, &new_index), None);
        assert_eq!(find_rename(&old[1], &old_index, &new_index), None);
    }

    #[test]
    fn different_kind_is_never_a_rename_candidate() {
        let old_fn = ExportedSymbol::new("f", SymbolKind::Function, "{x: string}");
        let new_iface = ExportedSymbol::new("g", SymbolKind::Interface, "{x: string}");
        let old_index = SignatureIndex::build(std::iter::once(&old_fn));
        let new_index = SignatureIndex::build(std::iter::once(&new_iface));
        assert_eq!(find_rename(&old_fn, &old_index, &new_index), None);
    }
}
