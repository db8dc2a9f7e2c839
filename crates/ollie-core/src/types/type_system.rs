//! Type catalogue: primitives, pointers, arrays, struct/union, enum,
//! alias, and function-signature types, with name-equivalence semantics
//! (spec.md section 3's "Type descriptor" and section 4.4). Grounded on
//! the newtype-index-over-arena pattern of `DBNonTermKey`/`DBRuleKey` in
//! `radlr-core/types/parser_db.rs`: `TypeRef` indexes a flat `Vec` of
//! descriptors, while a `ScopeStack<TypeRef>` (reusing `symbol::ScopeStack`)
//! maps canonical names to that index.

use crate::types::symbol::ScopeStack;

/// Index into the type table's descriptor arena. Stable for the lifetime
/// of a front-end run; never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeRef(u32);

impl TypeRef {
  fn from_index(i: usize) -> Self {
    Self(i as u32)
  }
  fn index(self) -> usize {
    self.0 as usize
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
  Byte,
  Word,
  DWord,
  QWord,
  Single,
  Double,
}

impl SizeClass {
  pub fn byte_len(self) -> u32 {
    match self {
      SizeClass::Byte => 1,
      SizeClass::Word => 2,
      SizeClass::DWord | SizeClass::Single => 4,
      SizeClass::QWord | SizeClass::Double => 8,
    }
  }

  /// Integer promotion rank: wider types outrank narrower ones so binary
  /// operators can pick the coerced result type (spec.md section 4.4's
  /// "integer rank promotion").
  pub fn rank(self) -> u8 {
    match self {
      SizeClass::Byte => 0,
      SizeClass::Word => 1,
      SizeClass::DWord => 2,
      SizeClass::QWord => 3,
      SizeClass::Single => 4,
      SizeClass::Double => 5,
    }
  }

  pub fn is_float(self) -> bool {
    matches!(self, SizeClass::Single | SizeClass::Double)
  }
}

#[derive(Debug, Clone)]
pub struct StructMember {
  pub name: String,
  pub ty: TypeRef,
  pub ordinal: usize,
  pub offset: u32,
}

#[derive(Debug, Clone)]
pub struct EnumMember {
  pub name: String,
  pub ordinal: usize,
  pub value: i64,
}

#[derive(Debug, Clone)]
pub struct SigParam {
  pub ty: TypeRef,
  pub is_mutable: bool,
}

#[derive(Debug, Clone)]
pub enum TypeDescriptor {
  Basic { name: String, size: SizeClass },
  Pointer { to: TypeRef, is_void_pointer: bool },
  Array { element: TypeRef, count: u64, elem_byte_size: u32 },
  Struct { name: String, members: Vec<StructMember>, byte_size: u32, alignment: u32 },
  Union { name: String, members: Vec<StructMember>, byte_size: u32 },
  Enum { name: String, members: Vec<EnumMember>, integer_type: TypeRef },
  Alias { name: String, aliased: TypeRef },
  FunctionSignature { parameters: Vec<SigParam>, return_type: TypeRef, is_public: bool },
}

impl TypeDescriptor {
  pub fn canonical_name(&self, table: &TypeTable) -> String {
    match self {
      TypeDescriptor::Basic { name, .. } => name.clone(),
      TypeDescriptor::Pointer { to, .. } => format!("*{}", table.canonical_name(*to)),
      TypeDescriptor::Array { element, count, .. } => format!("[{}]{}", count, table.canonical_name(*element)),
      TypeDescriptor::Struct { name, .. }
      | TypeDescriptor::Union { name, .. }
      | TypeDescriptor::Enum { name, .. }
      | TypeDescriptor::Alias { name, .. } => name.clone(),
      TypeDescriptor::FunctionSignature { .. } => "<function>".to_string(),
    }
  }
}

/// Accumulates struct members between `create_struct` and `finish_struct`
/// so the struct is registered in the type table only once fully built
/// (spec.md section 3 Invariant 4: "partial registration is forbidden").
pub struct StructBuilder {
  name: String,
  members: Vec<StructMember>,
  byte_size: u32,
  alignment: u32,
}

pub struct UnionBuilder {
  name: String,
  members: Vec<StructMember>,
  byte_size: u32,
}

pub struct EnumBuilder {
  name: String,
  members: Vec<EnumMember>,
  integer_type: TypeRef,
  next_value: i64,
}

pub struct FunctionSignatureBuilder {
  parameters: Vec<SigParam>,
  return_type: Option<TypeRef>,
  is_public: bool,
}

#[derive(Debug, Clone)]
pub struct TypeTable {
  arena: Vec<TypeDescriptor>,
  scopes: ScopeStack<TypeRef>,
  pub void_type: TypeRef,
  pub bool_type: TypeRef,
  pub default_int_type: TypeRef,
}

impl TypeTable {
  /// Builds a fresh type table with every primitive type pre-populated in
  /// the outermost scope, per spec.md section 3 Invariant 2.
  pub fn new() -> Self {
    let mut arena = Vec::new();
    let mut scopes: ScopeStack<TypeRef> = ScopeStack::new();

    let mut define = |arena: &mut Vec<TypeDescriptor>, scopes: &mut ScopeStack<TypeRef>, name: &str, size: SizeClass| -> TypeRef {
      let r = TypeRef::from_index(arena.len());
      arena.push(TypeDescriptor::Basic { name: name.to_string(), size });
      scopes.insert(name.to_string(), r).expect("primitive names never collide");
      r
    };

    define(&mut arena, &mut scopes, "void", SizeClass::Byte);
    let bool_type = define(&mut arena, &mut scopes, "bool", SizeClass::Byte);
    define(&mut arena, &mut scopes, "char", SizeClass::Byte);
    define(&mut arena, &mut scopes, "s_int8", SizeClass::Byte);
    define(&mut arena, &mut scopes, "u_int8", SizeClass::Byte);
    define(&mut arena, &mut scopes, "s_int16", SizeClass::Word);
    define(&mut arena, &mut scopes, "u_int16", SizeClass::Word);
    let default_int_type = define(&mut arena, &mut scopes, "s_int32", SizeClass::DWord);
    define(&mut arena, &mut scopes, "u_int32", SizeClass::DWord);
    define(&mut arena, &mut scopes, "s_int64", SizeClass::QWord);
    define(&mut arena, &mut scopes, "u_int64", SizeClass::QWord);
    define(&mut arena, &mut scopes, "f32", SizeClass::Single);
    define(&mut arena, &mut scopes, "f64", SizeClass::Double);

    let void_type = scopes.lookup("void").copied().unwrap();

    Self { arena, scopes, void_type, bool_type, default_int_type }
  }

  pub fn initialize_scope(&mut self) {
    self.scopes.initialize_scope();
  }

  pub fn finalize_scope(&mut self) {
    self.scopes.finalize_scope();
  }

  pub fn lookup_any_scope(&self, name: &str) -> Option<TypeRef> {
    self.scopes.lookup(name).copied()
  }

  pub fn lookup_local_scope(&self, name: &str) -> Option<TypeRef> {
    self.scopes.lookup_local_scope(name).copied()
  }

  pub fn descriptor(&self, r: TypeRef) -> &TypeDescriptor {
    &self.arena[r.index()]
  }

  pub fn canonical_name(&self, r: TypeRef) -> String {
    self.descriptor(r).canonical_name(self)
  }

  fn insert_new(&mut self, name: String, descriptor: TypeDescriptor) -> Result<TypeRef, TypeRef> {
    if let Some(existing) = self.scopes.lookup_local_scope(&name) {
      return Err(*existing);
    }
    let r = TypeRef::from_index(self.arena.len());
    self.arena.push(descriptor);
    self.scopes.insert(name, r).expect("just checked local scope above");
    Ok(r)
  }

  pub fn create_pointer(&mut self, to: TypeRef) -> TypeRef {
    let canonical = format!("*{}", self.canonical_name(to));
    if let Some(existing) = self.lookup_any_scope(&canonical) {
      return existing;
    }
    let is_void_pointer = to == self.void_type;
    let r = TypeRef::from_index(self.arena.len());
    self.arena.push(TypeDescriptor::Pointer { to, is_void_pointer });
    // Pointer/array dedup is global by canonical name (spec.md section 3
    // Invariant 1), so register in the current scope without a uniqueness
    // check — if a shadowing scope produces the same canonical name it is
    // intentionally reused via the any-scope lookup above, never
    // re-inserted.
    let _ = self.scopes.insert(canonical, r);
    r
  }

  pub fn create_array(&mut self, of: TypeRef, count: u64) -> TypeRef {
    let canonical = format!("[{}]{}", count, self.canonical_name(of));
    if let Some(existing) = self.lookup_any_scope(&canonical) {
      return existing;
    }
    let r = TypeRef::from_index(self.arena.len());
    self.arena.push(TypeDescriptor::Array { element: of, count, elem_byte_size: self.byte_size(of) });
    let _ = self.scopes.insert(canonical, r);
    r
  }

  pub fn create_struct(&self, name: String) -> StructBuilder {
    StructBuilder { name, members: Vec::new(), byte_size: 0, alignment: 1 }
  }

  pub fn add_struct_member(&mut self, builder: &mut StructBuilder, member_name: String, ty: TypeRef) {
    let ordinal = builder.members.len();
    let member_size = self.byte_size(ty);
    let offset = builder.byte_size;
    builder.alignment = builder.alignment.max(member_size.min(8));
    builder.byte_size += member_size;
    builder.members.push(StructMember { name: member_name, ty, ordinal, offset });
  }

  /// Registers the struct. Only after this call does `name` resolve in the
  /// type table (spec.md section 3 Invariant 4).
  pub fn finish_struct(&mut self, builder: StructBuilder) -> Result<TypeRef, TypeRef> {
    let key = format!("struct {}", builder.name);
    self.insert_new(
      key.clone(),
      TypeDescriptor::Struct { name: key, members: builder.members, byte_size: builder.byte_size, alignment: builder.alignment },
    )
  }

  pub fn create_union(&self, name: String) -> UnionBuilder {
    UnionBuilder { name, members: Vec::new(), byte_size: 0 }
  }

  pub fn add_union_member(&mut self, builder: &mut UnionBuilder, member_name: String, ty: TypeRef) {
    let ordinal = builder.members.len();
    builder.byte_size = builder.byte_size.max(self.byte_size(ty));
    builder.members.push(StructMember { name: member_name, ty, ordinal, offset: 0 });
  }

  pub fn finish_union(&mut self, builder: UnionBuilder) -> Result<TypeRef, TypeRef> {
    let key = format!("union {}", builder.name);
    self.insert_new(key.clone(), TypeDescriptor::Union { name: key, members: builder.members, byte_size: builder.byte_size })
  }

  pub fn create_enum(&self, name: String) -> EnumBuilder {
    EnumBuilder { name, members: Vec::new(), integer_type: self.default_int_type, next_value: 0 }
  }

  pub fn add_enum_member(&mut self, builder: &mut EnumBuilder, member_name: String) {
    let ordinal = builder.members.len();
    let value = builder.next_value;
    builder.next_value += 1;
    builder.members.push(EnumMember { name: member_name, ordinal, value });
  }

  pub fn finish_enum(&mut self, builder: EnumBuilder) -> Result<TypeRef, TypeRef> {
    let key = format!("enum {}", builder.name);
    self.insert_new(
      key.clone(),
      TypeDescriptor::Enum { name: key, members: builder.members, integer_type: builder.integer_type },
    )
  }

  pub fn create_alias(&mut self, name: String, of: TypeRef) -> Result<TypeRef, TypeRef> {
    self.insert_new(name.clone(), TypeDescriptor::Alias { name, aliased: of })
  }

  pub fn create_function_signature(&self) -> FunctionSignatureBuilder {
    FunctionSignatureBuilder { parameters: Vec::new(), return_type: None, is_public: false }
  }

  pub fn add_parameter(&mut self, builder: &mut FunctionSignatureBuilder, ty: TypeRef, is_mutable: bool) -> Result<(), ()> {
    if builder.parameters.len() >= crate::types::symbol::MAX_PARAMETERS {
      return Err(());
    }
    builder.parameters.push(SigParam { ty, is_mutable });
    Ok(())
  }

  pub fn finish_function_signature(&mut self, mut builder: FunctionSignatureBuilder, return_type: TypeRef) -> TypeRef {
    builder.return_type = Some(return_type);
    let r = TypeRef::from_index(self.arena.len());
    self.arena.push(TypeDescriptor::FunctionSignature {
      parameters: builder.parameters,
      return_type: builder.return_type.unwrap(),
      is_public: builder.is_public,
    });
    r
  }

  /// Strips `Alias` wrappers recursively (spec.md section 4.4).
  pub fn dealias(&self, ty: TypeRef) -> TypeRef {
    let mut current = ty;
    while let TypeDescriptor::Alias { aliased } = self.descriptor(current) {
      current = *aliased;
    }
    current
  }

  fn byte_size(&self, ty: TypeRef) -> u32 {
    match self.descriptor(self.dealias(ty)) {
      TypeDescriptor::Basic { size, .. } => size.byte_len(),
      TypeDescriptor::Pointer { .. } => 8,
      TypeDescriptor::Array { elem_byte_size, count, .. } => elem_byte_size * (*count as u32),
      TypeDescriptor::Struct { byte_size, .. } => *byte_size,
      TypeDescriptor::Union { byte_size, .. } => *byte_size,
      TypeDescriptor::Enum { integer_type, .. } => self.byte_size(*integer_type),
      TypeDescriptor::Alias { .. } => unreachable!("dealias already stripped"),
      TypeDescriptor::FunctionSignature { .. } => 8,
    }
  }

  /// Returns the size class for scalar types (spec.md section 4.4);
  /// `None` for aggregate types, whose layout is described by their raw
  /// byte size instead.
  pub fn get_type_size(&self, ty: TypeRef) -> Option<SizeClass> {
    match self.descriptor(self.dealias(ty)) {
      TypeDescriptor::Basic { size, .. } => Some(*size),
      TypeDescriptor::Pointer { .. } => Some(SizeClass::QWord),
      TypeDescriptor::Enum { integer_type, .. } => self.get_type_size(*integer_type),
      _ => None,
    }
  }

  /// Returns the coerced destination type if `src` is assignable to
  /// `dest`, or `None` if incompatible (spec.md section 4.4).
  pub fn types_assignable(&self, dest: TypeRef, src: TypeRef) -> Option<TypeRef> {
    let d = self.dealias(dest);
    let s = self.dealias(src);
    if d == s {
      return Some(dest);
    }
    match (self.descriptor(d), self.descriptor(s)) {
      (TypeDescriptor::Basic { size: ds, .. }, TypeDescriptor::Basic { size: ss, .. }) if ds.is_float() == ss.is_float() => {
        if ss.rank() <= ds.rank() {
          Some(dest)
        } else {
          None
        }
      }
      (TypeDescriptor::Pointer { is_void_pointer: true, .. }, TypeDescriptor::Pointer { .. }) => Some(dest),
      (TypeDescriptor::Pointer { .. }, TypeDescriptor::Pointer { is_void_pointer: true, .. }) => Some(dest),
      _ => None,
    }
  }

  /// The binary-operator compatibility oracle: given the dealiased types
  /// of the two operands and the operator, returns the coerced result
  /// type, or `None` if the operator cannot apply (spec.md section 4.4).
  pub fn determine_compatibility_and_coerce(&self, a: TypeRef, b: TypeRef, op: BinOpClass) -> Option<TypeRef> {
    let da = self.dealias(a);
    let db = self.dealias(b);

    match op {
      BinOpClass::Arithmetic => match (self.descriptor(da), self.descriptor(db)) {
        (TypeDescriptor::Basic { size: sa, .. }, TypeDescriptor::Basic { size: sb, .. }) => {
          Some(if sa.rank() >= sb.rank() { da } else { db })
        }
        (TypeDescriptor::Pointer { .. }, TypeDescriptor::Basic { size, .. }) if !size.is_float() => Some(da),
        (TypeDescriptor::Basic { size, .. }, TypeDescriptor::Pointer { .. }) if !size.is_float() => Some(db),
        _ => None,
      },
      BinOpClass::Bitwise | BinOpClass::Shift => match (self.descriptor(da), self.descriptor(db)) {
        (TypeDescriptor::Basic { size: sa, .. }, TypeDescriptor::Basic { size: sb, .. })
          if !sa.is_float() && !sb.is_float() =>
        {
          Some(if sa.rank() >= sb.rank() { da } else { db })
        }
        _ => None,
      },
      BinOpClass::Relational | BinOpClass::Equality => match (self.descriptor(da), self.descriptor(db)) {
        (TypeDescriptor::Basic { .. }, TypeDescriptor::Basic { .. }) => Some(self.bool_type),
        (TypeDescriptor::Pointer { .. }, TypeDescriptor::Pointer { .. }) => Some(self.bool_type),
        _ => None,
      },
      BinOpClass::Logical => match (self.descriptor(da), self.descriptor(db)) {
        (TypeDescriptor::Basic { .. } | TypeDescriptor::Pointer { .. }, TypeDescriptor::Basic { .. } | TypeDescriptor::Pointer { .. }) => {
          Some(self.bool_type)
        }
        _ => None,
      },
    }
  }
}

impl Default for TypeTable {
  fn default() -> Self {
    Self::new()
  }
}

/// Operator families used by `determine_compatibility_and_coerce`, derived
/// from the precedence ladder in spec.md section 4.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOpClass {
  Logical,
  Bitwise,
  Equality,
  Relational,
  Shift,
  Arithmetic,
}
