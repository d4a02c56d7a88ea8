use std::fmt;

use indexmap::{map::Entry, IndexMap};

use super::Type;
use crate::error::SemanticError;

/// First data-segment address handed out.
pub const BASE_ADDRESS: usize = 10000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub address: usize,
    pub ty: Type,
}

/// Flat, unscoped variable table.
///
/// Addresses are allocated from [`BASE_ADDRESS`] upwards on first
/// declaration and never reused. Iteration follows declaration order.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    table: IndexMap<String, Symbol>,
    next_address: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            table: IndexMap::new(),
            next_address: BASE_ADDRESS,
        }
    }

    /// Inserts `name` or overwrites its type. Only a new name advances the
    /// allocation counter.
    pub fn declare(&mut self, name: &str, ty: Type) -> usize {
        match self.table.entry(name.to_string()) {
            Entry::Occupied(mut e) => {
                let symbol = e.get_mut();
                symbol.ty = ty;
                symbol.address
            }
            Entry::Vacant(e) => {
                let address = self.next_address;
                self.next_address += 1;
                e.insert(Symbol {
                    name: name.to_string(),
                    address,
                    ty,
                });
                address
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.table.get(name)
    }

    pub fn lookup(&self, name: &str) -> Result<&Symbol, SemanticError> {
        self.table
            .get(name)
            .ok_or_else(|| SemanticError::UndeclaredVariable(name.to_string()))
    }

    pub fn address_of(&self, name: &str) -> Result<usize, SemanticError> {
        Ok(self.lookup(name)?.address)
    }

    pub fn set_type(&mut self, name: &str, ty: Type) -> Result<(), SemanticError> {
        let symbol = self
            .table
            .get_mut(name)
            .ok_or_else(|| SemanticError::UndeclaredVariable(name.to_string()))?;
        symbol.ty = ty;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.table.values()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<16}{:<12}{}", "NAME", "ADDRESS", "TYPE")?;
        writeln!(f, "{}", "-".repeat(36))?;
        for symbol in self.iter() {
            writeln!(f, "{:<16}{:<12}{}", symbol.name, symbol.address, symbol.ty)?;
        }
        Ok(())
    }
}
