//! Scoped symbol table.
//!
//! A stack of scope records, each a name-to-entry map. The table reuses
//! scope slots across sibling scopes: entering advances a depth cursor
//! and allocates a new scope only on growth; exiting just moves the
//! cursor back without discarding the freed scope's contents. A later
//! `enter_scope` that lands on a previously-used slot clears it, which
//! is the only point a sibling's bindings are actually dropped. Callers
//! must not treat anything at a depth past the current cursor as live.

use std::collections::HashMap;

use ferritec_par::ast::TypeHandle;
use ferritec_util::{Span, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Constant,
    Function,
    FunctionParameter,
    ConstantFunctionParameter,
    Aggregate,
    Enum,
    Module,
    Import,
    TypeAlias,
    GenericType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Private,
    ReadOnly,
    Public,
}

impl From<ferritec_par::ast::Visibility> for Visibility {
    fn from(v: ferritec_par::ast::Visibility) -> Self {
        match v {
            ferritec_par::ast::Visibility::Private => Visibility::Private,
            ferritec_par::ast::Visibility::ReadOnly => Visibility::ReadOnly,
            ferritec_par::ast::Visibility::Public => Visibility::Public,
        }
    }
}

/// A declared name's entry in the symbol table. `span` doubles as the
/// back-reference to the declaring node: this tree has no node ids, and
/// every consumer of a back-reference (diagnostics) only ever needed the
/// declaration site, not a handle to mutate the node.
#[derive(Debug, Clone)]
pub struct SymbolEntry {
    pub name: Symbol,
    pub kind: SymbolKind,
    pub ty: TypeHandle,
    pub span: Span,
    pub mutable: bool,
    pub depth: usize,
    pub visibility: Visibility,
}

#[derive(Debug, Default)]
struct Scope {
    bindings: HashMap<Symbol, SymbolEntry>,
}

#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    cursor: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
            cursor: 0,
        }
    }

    pub fn current_depth(&self) -> usize {
        self.cursor
    }

    /// Advance the depth cursor, reusing the slot at the new depth if one
    /// already exists from a previous sibling scope (clearing it first).
    pub fn enter_scope(&mut self) {
        self.cursor += 1;
        if self.cursor == self.scopes.len() {
            self.scopes.push(Scope::default());
        } else {
            self.scopes[self.cursor].bindings.clear();
        }
    }

    /// Move the cursor back to the parent scope. The scope being left
    /// keeps its bindings until something re-enters that depth.
    pub fn exit_scope(&mut self) {
        debug_assert!(self.cursor > 0, "cannot exit the module scope");
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Declare `entry` in the current scope. Fails (returning the entry
    /// back) if the name is already bound at this exact depth.
    pub fn declare(&mut self, entry: SymbolEntry) -> Result<(), SymbolEntry> {
        if self.scopes[self.cursor].bindings.contains_key(&entry.name) {
            return Err(entry);
        }
        self.scopes[self.cursor].bindings.insert(entry.name, entry);
        Ok(())
    }

    /// Innermost-first lookup, walking outward from the current depth.
    pub fn lookup(&self, name: Symbol) -> Option<&SymbolEntry> {
        for depth in (0..=self.cursor).rev() {
            if let Some(entry) = self.scopes[depth].bindings.get(&name) {
                return Some(entry);
            }
        }
        None
    }

    pub fn lookup_at_current_depth(&self, name: Symbol) -> Option<&SymbolEntry> {
        self.scopes[self.cursor].bindings.get(&name)
    }

    /// Overwrite an already-declared name's type at the current depth.
    /// Used to close the loop on self-referential aggregates: the name
    /// is declared with a placeholder before its fields are resolved,
    /// then patched once the real field list is known.
    pub fn set_type(&mut self, name: Symbol, ty: TypeHandle) {
        if let Some(entry) = self.scopes[self.cursor].bindings.get_mut(&name) {
            entry.ty = ty;
        }
    }

    /// Depths past the current cursor are treated as absent even if the
    /// backing `Vec` still holds stale data there.
    pub fn lookup_at_depth(&self, name: Symbol, depth: usize) -> Option<&SymbolEntry> {
        if depth > self.cursor {
            return None;
        }
        self.scopes.get(depth)?.bindings.get(&name)
    }
}
