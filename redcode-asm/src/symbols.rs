//! The label/EQU symbol table shared by both assembly passes.

use alloc::collections::BTreeMap;

/// What a symbol resolves to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SymbolKind {
    /// An address label: the 0-based index of the instruction it precedes in
    /// the final warrior.
    Address(i64),
    /// An EQU (or FOR-counter) macro: textual lines substituted verbatim.
    Macro(Vec<String>),
}

/// Case-insensitive table of labels and EQUs.
///
/// Names are stored upper-cased so lookups are insensitive to source casing,
/// matching `;name`/opcode/register lookups elsewhere in the assembler.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    /// Map from upper-cased symbol name to its kind.
    symbols: BTreeMap<String, SymbolKind>,
}

impl SymbolTable {
    /// An empty symbol table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a symbol name for lookup/storage.
    #[must_use]
    fn normalize(name: &str) -> String {
        name.to_ascii_uppercase()
    }

    /// Register an address label. Overwrites any previous binding.
    pub fn define_address(&mut self, name: &str, value: i64) {
        self.symbols
            .insert(Self::normalize(name), SymbolKind::Address(value));
    }

    /// Register a new single-line macro (EQU or FOR-counter). Overwrites any
    /// previous binding.
    pub fn define_macro(&mut self, name: &str, line: String) {
        self.symbols
            .insert(Self::normalize(name), SymbolKind::Macro(vec![line]));
    }

    /// Append another line to an existing macro's body, used for multi-line
    /// `EQU` continuations. Does nothing if `name` isn't a macro.
    pub fn append_macro_line(&mut self, name: &str, line: String) {
        if let Some(SymbolKind::Macro(lines)) =
            self.symbols.get_mut(&Self::normalize(name))
        {
            lines.push(line);
        }
    }

    /// Look up a symbol by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SymbolKind> {
        self.symbols.get(&Self::normalize(name))
    }

    /// Whether a macro with this name has more than one line in its body.
    #[must_use]
    pub fn is_multiline_macro(&self, name: &str) -> bool {
        matches!(
            self.get(name),
            Some(SymbolKind::Macro(lines)) if lines.len() > 1
        )
    }

    /// Rewrite every address label's value through `remap`.
    ///
    /// Used after the bare-multiline-EQU-reference expansion pass, which can
    /// shift every instruction index after the first expansion point.
    /// `remap[old_index]` gives the new index; `old_index == remap.len() - 1`
    /// covers a label bound to the position just past the last instruction.
    pub fn remap_addresses(&mut self, remap: &[i64]) {
        for kind in self.symbols.values_mut() {
            if let SymbolKind::Address(value) = kind {
                if let Ok(idx) = usize::try_from(*value) {
                    if let Some(&new_value) = remap.get(idx) {
                        *value = new_value;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use coverage_helper::test;

    use super::{SymbolKind, SymbolTable};

    #[test]
    fn address_labels_round_trip_case_insensitively() {
        let mut t = SymbolTable::new();
        t.define_address("Start", 4);
        assert_eq!(t.get("START"), Some(&SymbolKind::Address(4)));
        assert_eq!(t.get("start"), Some(&SymbolKind::Address(4)));
    }

    #[test]
    fn multiline_macro_accumulates_lines() {
        let mut t = SymbolTable::new();
        t.define_macro("step", "ADD #1, $1".to_owned());
        t.append_macro_line("STEP", "JMP $-1".to_owned());
        assert!(t.is_multiline_macro("step"));
        assert_eq!(
            t.get("step"),
            Some(&SymbolKind::Macro(vec![
                "ADD #1, $1".to_owned(),
                "JMP $-1".to_owned()
            ]))
        );
    }

    #[test]
    fn appending_to_unknown_name_is_a_no_op() {
        let mut t = SymbolTable::new();
        t.append_macro_line("ghost", "JMP $0".to_owned());
        assert_eq!(t.get("ghost"), None);
    }

    #[test]
    fn remap_addresses_shifts_values() {
        let mut t = SymbolTable::new();
        t.define_address("a", 0);
        t.define_address("b", 2);
        t.remap_addresses(&[0, 3, 5]);
        assert_eq!(t.get("a"), Some(&SymbolKind::Address(0)));
        assert_eq!(t.get("b"), Some(&SymbolKind::Address(5)));
    }

    #[test]
    fn redefining_a_macro_resets_its_body() {
        let mut t = SymbolTable::new();
        t.define_macro("x", "1".to_owned());
        t.append_macro_line("x", "2".to_owned());
        t.define_macro("x", "3".to_owned());
        assert!(!t.is_multiline_macro("x"));
        assert_eq!(t.get("x"), Some(&SymbolKind::Macro(vec!["3".to_owned()])));
    }
}
