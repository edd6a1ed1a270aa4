//! Resolved type identity.
//!
//! The host's type checker has already resolved every declaration's type;
//! this table only records what the analysis needs: whether a type is a
//! shared- or exclusive-ownership pointer, what it points at, and how to
//! spell a type when producing replacement text (the parameter rewrite
//! prints `T*` / `Elem name[]` forms).

use rustc_hash::FxHashMap;

use crate::{Interner, Name};

/// Interned type handle. Identity comparison, never name matching.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeId(u32);

impl TypeId {
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Ownership discipline of a smart-pointer type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Ownership {
    /// Reference-counted; multiple owners may exist.
    Shared,
    /// Single owner; ownership transfers, never duplicates.
    Exclusive,
}

/// Structure of a resolved type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeKind {
    /// A plain named type (`int`, `Widget`, ...).
    Named(Name),
    /// Shared-ownership pointer to a pointee.
    Shared(TypeId),
    /// Exclusive-ownership pointer to a pointee.
    Exclusive(TypeId),
    /// Raw (non-owning) pointer.
    RawPtr(TypeId),
    /// Array of elements (the pointee of `shared_ptr<T[]>`).
    Array(TypeId),
    /// No value.
    Unit,
}

/// Deduplicating table of resolved types for one translation unit.
#[derive(Default, Debug, Clone)]
pub struct TypeTable {
    kinds: Vec<TypeKind>,
    dedup: FxHashMap<TypeKind, TypeId>,
}

impl TypeTable {
    pub fn new() -> Self {
        TypeTable::default()
    }

    /// Intern a type, returning its handle.
    pub fn intern(&mut self, kind: TypeKind) -> TypeId {
        if let Some(&id) = self.dedup.get(&kind) {
            return id;
        }
        let id = TypeId(u32::try_from(self.kinds.len()).unwrap_or(u32::MAX));
        self.kinds.push(kind.clone());
        self.dedup.insert(kind, id);
        id
    }

    /// Structure of a type. `Unit` for a handle from another table.
    pub fn kind(&self, id: TypeId) -> &TypeKind {
        self.kinds.get(id.0 as usize).unwrap_or(&TypeKind::Unit)
    }

    /// Ownership discipline, if this is an owning smart pointer.
    pub fn ownership(&self, id: TypeId) -> Option<Ownership> {
        match self.kind(id) {
            TypeKind::Shared(_) => Some(Ownership::Shared),
            TypeKind::Exclusive(_) => Some(Ownership::Exclusive),
            _ => None,
        }
    }

    /// Pointee/element type of a pointer or array type.
    pub fn pointee(&self, id: TypeId) -> Option<TypeId> {
        match self.kind(id) {
            TypeKind::Shared(p)
            | TypeKind::Exclusive(p)
            | TypeKind::RawPtr(p)
            | TypeKind::Array(p) => Some(*p),
            _ => None,
        }
    }

    /// Spell a type for replacement text.
    pub fn display(&self, id: TypeId, interner: &Interner) -> String {
        match self.kind(id) {
            TypeKind::Named(name) => interner.resolve(*name).to_string(),
            TypeKind::Shared(p) => format!("shared_ptr<{}>", self.display(*p, interner)),
            TypeKind::Exclusive(p) => format!("unique_ptr<{}>", self.display(*p, interner)),
            TypeKind::RawPtr(p) => format!("{}*", self.display(*p, interner)),
            TypeKind::Array(p) => format!("{}[]", self.display(*p, interner)),
            TypeKind::Unit => "void".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_dedup() {
        let mut interner = Interner::new();
        let mut types = TypeTable::new();
        let int_name = interner.intern("int");
        let int_ty = types.intern(TypeKind::Named(int_name));
        let a = types.intern(TypeKind::Shared(int_ty));
        let b = types.intern(TypeKind::Shared(int_ty));
        assert_eq!(a, b);
        assert_eq!(types.ownership(a), Some(Ownership::Shared));
        assert_eq!(types.pointee(a), Some(int_ty));
    }

    #[test]
    fn test_display() {
        let mut interner = Interner::new();
        let mut types = TypeTable::new();
        let int_name = interner.intern("int");
        let int_ty = types.intern(TypeKind::Named(int_name));
        let arr = types.intern(TypeKind::Array(int_ty));
        let shared_arr = types.intern(TypeKind::Shared(arr));
        assert_eq!(types.display(shared_arr, &interner), "shared_ptr<int[]>");
        let raw = types.intern(TypeKind::RawPtr(int_ty));
        assert_eq!(types.display(raw, &interner), "int*");
    }

    #[test]
    fn test_named_type_has_no_ownership() {
        let mut interner = Interner::new();
        let mut types = TypeTable::new();
        let id = types.intern(TypeKind::Named(interner.intern("Widget")));
        assert_eq!(types.ownership(id), None);
        assert_eq!(types.pointee(id), None);
    }
}
