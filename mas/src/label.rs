//! Symbol table and unresolved-reference table shared by both passes.

use indexmap::IndexMap;

use crate::error::Error;

/// Uppercase symbol name -> byte address of its definition. One table
/// is shared by both segments; names are globally unique.
#[derive(Debug, Default)]
pub struct Symbols(IndexMap<String, u32>);

impl Symbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, address: u32) -> Result<(), Error> {
        if self.0.contains_key(name) {
            return Err(Error::RedefinedSymbol(name.to_string()));
        }
        self.0.insert(name.to_string(), address);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Location of a machine word awaiting a symbol address: index of the
/// owning instruction record plus the word's position inside it.
/// Indexed handles stay valid when a macro appends further words to the
/// same record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolRef {
    pub inst: usize,
    pub word: usize,
}

/// Symbol name -> every machine word that referenced it before its
/// address was known. Filled by the encoders, drained by pass 2.
#[derive(Debug, Default)]
pub struct Unsolved(IndexMap<String, Vec<SymbolRef>>);

impl Unsolved {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, symbol: &str, slot: SymbolRef) {
        self.0.entry(symbol.to_string()).or_default().push(slot);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<SymbolRef>)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
