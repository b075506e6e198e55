//! The semantic analyzer proper: a visitor dispatching on statement and
//! expression kind, grounded directly in the front-end specification's
//! declaration rules, type rules, and control-flow nesting checks.
//!
//! Errors are local: a failing check reports a diagnostic, marks
//! `had_error`, and leaves the offending expression's `computed_type`
//! `None` so callers downstream short-circuit instead of cascading more
//! diagnostics from an already-broken subtree.

use std::collections::HashMap;
use std::rc::Rc;

use ferritec_par::ast::{
    self, ArrayLength, BinOp, Block, Expr, ExprKind, ParsedFile, Param, Primitive, Stmt, Type,
    TypeHandle, UnOp, Visibility as AstVisibility,
};
use ferritec_util::{DiagnosticCode, Handler, Span, Symbol};

use crate::lattice;
use crate::symtab::{SymbolEntry, SymbolKind, SymbolTable, Visibility};

/// Nesting counters and the enclosing function's return type, consulted
/// by `break`/`continue`/`return` legality checks.
#[derive(Debug, Default, Clone)]
struct Context {
    function_depth: usize,
    loop_depth: usize,
    switch_depth: usize,
    current_return_type: Option<TypeHandle>,
}

pub struct Analyzer<'a> {
    table: SymbolTable,
    handler: &'a Handler,
    ctx: Context,
    /// Generic parameter names, in declaration order, per generic function.
    function_generics: HashMap<Symbol, Vec<Symbol>>,
    /// Generic parameter names, in declaration order, per generic aggregate.
    aggregate_generics: HashMap<Symbol, Vec<Symbol>>,
    /// Declared value names per enum, for `Enum::Value` lookups.
    enum_values: HashMap<Symbol, Vec<Symbol>>,
}

const VOID: &str = "void";

fn void_type() -> TypeHandle {
    Rc::new(Type::SymbolType {
        name: Symbol::intern(VOID),
        primitive: None,
    })
}

fn unknown_type() -> TypeHandle {
    Rc::new(Type::Unknown)
}

fn bool_type() -> TypeHandle {
    primitive_type(Primitive::Bool)
}

fn primitive_symbol(p: Primitive) -> Symbol {
    use ferritec_util::symbol::*;
    match p {
        Primitive::Int8 => TY_INT8,
        Primitive::Int16 => TY_INT16,
        Primitive::Int32 => TY_INT32,
        Primitive::Int64 => TY_INT64,
        Primitive::UInt8 => TY_UINT8,
        Primitive::UInt16 => TY_UINT16,
        Primitive::UInt32 => TY_UINT32,
        Primitive::UInt64 => TY_UINT64,
        Primitive::Float32 => TY_FLOAT32,
        Primitive::Float64 => TY_FLOAT64,
        Primitive::Char => TY_CHAR,
        Primitive::Bool => TY_BOOL,
        Primitive::String => TY_STRING,
    }
}

fn primitive_type(p: Primitive) -> TypeHandle {
    Rc::new(Type::SymbolType {
        name: primitive_symbol(p),
        primitive: Some(p),
    })
}

fn primitive_of(ty: &Type) -> Option<Primitive> {
    match ty {
        Type::SymbolType { primitive, .. } => *primitive,
        _ => None,
    }
}

fn number_primitive(n: &ast::NumberValue) -> Primitive {
    use ast::NumberValue::*;
    match n {
        I8(_) => Primitive::Int8,
        I16(_) => Primitive::Int16,
        I32(_) => Primitive::Int32,
        I64(_) => Primitive::Int64,
        U8(_) => Primitive::UInt8,
        U16(_) => Primitive::UInt16,
        U32(_) => Primitive::UInt32,
        U64(_) => Primitive::UInt64,
        F32(_) => Primitive::Float32,
        F64(_) => Primitive::Float64,
    }
}

/// Entry point: analyze a parsed file, returning the module-level symbol
/// table. Diagnostics are reported through `handler` as they're found.
pub fn analyze(file: &ParsedFile, handler: &Handler) -> SymbolTable {
    let mut analyzer = Analyzer {
        table: SymbolTable::new(),
        handler,
        ctx: Context::default(),
        function_generics: HashMap::new(),
        aggregate_generics: HashMap::new(),
        enum_values: HashMap::new(),
    };
    analyzer.analyze_block(&file.body);
    analyzer.table
}

impl<'a> Analyzer<'a> {
    fn error(&self, span: Span, msg: impl Into<String>, code: DiagnosticCode) {
        self.handler.build_error(span, msg).code(code).emit(self.handler);
    }

    fn warn(&self, span: Span, msg: impl Into<String>, code: DiagnosticCode) {
        self.handler.build_warning(span, msg).code(code).emit(self.handler);
    }

    fn analyze_block(&mut self, block: &Block) {
        for stmt in block {
            self.analyze_stmt(stmt);
        }
    }

    fn analyze_scoped_block(&mut self, block: &Block) {
        self.table.enter_scope();
        self.analyze_block(block);
        self.table.exit_scope();
    }

    // ---- type resolution -------------------------------------------------

    /// Whether a named type (bare identifier, alias, aggregate, enum, or
    /// generic) exists. Primitives and `void` always exist.
    fn type_exists(&self, name: Symbol) -> bool {
        if name.eq_str(VOID) {
            return true;
        }
        if is_primitive_name(name) {
            return true;
        }
        matches!(
            self.table.lookup(name).map(|e| e.kind),
            Some(
                SymbolKind::Aggregate
                    | SymbolKind::Enum
                    | SymbolKind::TypeAlias
                    | SymbolKind::GenericType
            )
        )
    }

    /// Resolve a parsed `Type` node, checking that every named base type
    /// it mentions exists. Reports `E_SEMANTIC_UNKNOWN_TYPE` once per
    /// unresolvable name and returns that name's handle unchanged
    /// otherwise (bare `SymbolType` nodes are left as deferred
    /// references; only the symbol table distinguishes what they name).
    fn resolve_type(&self, ty: &TypeHandle, span: Span) -> TypeHandle {
        match ty.as_ref() {
            Type::SymbolType { name, .. } => {
                if !self.type_exists(*name) {
                    self.error(
                        span,
                        format!("unknown type '{}'", name.as_str()),
                        DiagnosticCode::E_SEMANTIC_UNKNOWN_TYPE,
                    );
                    return unknown_type();
                }
                ty.clone()
            }
            Type::PointerType { pointee, mutable } => {
                let resolved = self.resolve_type(pointee, span);
                Rc::new(Type::PointerType {
                    pointee: resolved,
                    mutable: *mutable,
                })
            }
            Type::ArrayType { element, length } => {
                let resolved = self.resolve_type(element, span);
                Rc::new(Type::ArrayType {
                    element: resolved,
                    length: length.clone(),
                })
            }
            Type::FunctionType { params, ret } => {
                let params = params
                    .iter()
                    .map(|(t, m)| (self.resolve_type(t, span), *m))
                    .collect();
                let ret = self.resolve_type(ret, span);
                Rc::new(Type::FunctionType { params, ret })
            }
            Type::GenericType { base, args } => {
                if !self.type_exists(*base) {
                    self.error(
                        span,
                        format!("unknown generic type '{}'", base.as_str()),
                        DiagnosticCode::E_SEMANTIC_UNKNOWN_TYPE,
                    );
                    return unknown_type();
                }
                let args = args.iter().map(|t| self.resolve_type(t, span)).collect();
                Rc::new(Type::GenericType { base: *base, args })
            }
            Type::AggregateType { fields } => {
                let fields = fields
                    .iter()
                    .map(|(n, t)| (*n, self.resolve_type(t, span)))
                    .collect();
                Rc::new(Type::AggregateType { fields })
            }
            Type::Unknown => ty.clone(),
        }
    }

    /// Like `resolve_type`, but any bare name matching one of `generics`
    /// is left unresolved rather than reported unknown: it's a type
    /// parameter, bound only once the declaration is instantiated.
    fn resolve_type_allowing_generics(&self, ty: &TypeHandle, span: Span, generics: &[Symbol]) -> TypeHandle {
        if generics.is_empty() {
            return self.resolve_type(ty, span);
        }
        match ty.as_ref() {
            Type::SymbolType { name, primitive: None } if generics.contains(name) => ty.clone(),
            Type::PointerType { pointee, mutable } => Rc::new(Type::PointerType {
                pointee: self.resolve_type_allowing_generics(pointee, span, generics),
                mutable: *mutable,
            }),
            Type::ArrayType { element, length } => Rc::new(Type::ArrayType {
                element: self.resolve_type_allowing_generics(element, span, generics),
                length: length.clone(),
            }),
            Type::FunctionType { params, ret } => {
                let params = params
                    .iter()
                    .map(|(t, m)| (self.resolve_type_allowing_generics(t, span, generics), *m))
                    .collect();
                let ret = self.resolve_type_allowing_generics(ret, span, generics);
                Rc::new(Type::FunctionType { params, ret })
            }
            _ => self.resolve_type(ty, span),
        }
    }

    /// Structural compatibility between an annotation/parameter type and
    /// a value's computed type. `Unknown` is compatible with anything:
    /// it marks an already-reported error, and we don't want to cascade.
    fn types_compatible(&self, expected: &Type, actual: &Type) -> bool {
        if matches!(expected, Type::Unknown) || matches!(actual, Type::Unknown) {
            return true;
        }
        match (expected, actual) {
            (Type::SymbolType { primitive: Some(a), .. }, Type::SymbolType { primitive: Some(b), .. }) => {
                a == b || lattice::promote(*a, *b).is_some()
            }
            (Type::SymbolType { name: a, .. }, Type::SymbolType { name: b, .. }) => a == b,
            (Type::PointerType { pointee: a, .. }, Type::PointerType { pointee: b, .. }) => {
                self.types_compatible(a, b)
            }
            (Type::ArrayType { element: a, .. }, Type::ArrayType { element: b, .. }) => {
                self.types_compatible(a, b)
            }
            _ => expected == actual,
        }
    }

    // ---- statements --------------------------------------------------

    fn analyze_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VariableDeclaration {
                mutable,
                constant,
                name,
                visibility,
                value,
                ty,
                span,
            } => self.analyze_variable_declaration(*mutable, *constant, *name, *visibility, value, ty, *span),
            Stmt::FunctionDeclaration {
                name,
                generics,
                params,
                return_type,
                body,
                visibility,
                span,
            } => self.analyze_function_declaration(*name, generics, params, return_type, body, *visibility, *span),
            Stmt::AggregateDeclaration {
                name,
                generics,
                fields,
                visibility,
                span,
            } => self.analyze_aggregate_declaration(*name, generics, fields, *visibility, *span),
            Stmt::EnumDeclaration {
                name,
                base_type,
                values,
                visibility,
                span,
            } => self.analyze_enum_declaration(*name, base_type, values, *visibility, *span),
            Stmt::Alias { base, name, visibility, span } => {
                self.analyze_alias(base, *name, *visibility, *span)
            }
            Stmt::If {
                condition,
                then_branch,
                elif_branches,
                else_branch,
                ..
            } => {
                self.check_bool_condition(condition);
                self.analyze_scoped_block(then_branch);
                for elif in elif_branches {
                    self.check_bool_condition(&elif.condition);
                    self.analyze_scoped_block(&elif.body);
                }
                if let Some(else_body) = else_branch {
                    self.analyze_scoped_block(else_body);
                }
            }
            Stmt::WhileLoop { condition, body, .. } => {
                self.check_bool_condition(condition);
                self.ctx.loop_depth += 1;
                self.analyze_scoped_block(body);
                self.ctx.loop_depth -= 1;
            }
            Stmt::RepeatLoop { count, body, span } => {
                self.analyze_expr(count);
                let count_ty = count.computed_type.borrow().clone();
                if let Some(ty) = count_ty {
                    match primitive_of(&ty) {
                        Some(p) if lattice::is_integer(p) => {
                            if lattice::is_signed_integer(p) {
                                self.warn(
                                    *span,
                                    "repeat count is a signed integer; negative counts run zero times",
                                    DiagnosticCode::W_DEMOTION,
                                );
                            }
                        }
                        Some(_) | None => self.error(
                            *span,
                            "repeat count must be an integer",
                            DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH,
                        ),
                    }
                }
                self.ctx.loop_depth += 1;
                self.analyze_scoped_block(body);
                self.ctx.loop_depth -= 1;
            }
            Stmt::Switch {
                discriminant,
                cases,
                default,
                ..
            } => {
                self.analyze_expr(discriminant);
                let discriminant_ty = discriminant.computed_type.borrow().clone();
                self.ctx.switch_depth += 1;
                for case in cases {
                    self.analyze_expr(&case.value);
                    if let (Some(expected), Some(actual)) =
                        (&discriminant_ty, case.value.computed_type.borrow().clone())
                    {
                        if !self.types_compatible(expected, &actual) {
                            self.error(
                                case.value.span,
                                "case value type does not match switch discriminant",
                                DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH,
                            );
                        }
                    }
                    self.analyze_scoped_block(&case.body);
                }
                if let Some(default_body) = default {
                    self.analyze_scoped_block(default_body);
                }
                self.ctx.switch_depth -= 1;
            }
            Stmt::Return { value, span } => {
                if self.ctx.function_depth == 0 {
                    self.error(
                        *span,
                        "'return' outside of a function",
                        DiagnosticCode::E_SEMANTIC_RETURN_OUTSIDE_FUNCTION,
                    );
                }
                if let Some(v) = value {
                    self.analyze_expr(v);
                    if let (Some(ret_ty), Some(actual)) =
                        (self.ctx.current_return_type.clone(), v.computed_type.borrow().clone())
                    {
                        if !self.types_compatible(&ret_ty, &actual) {
                            self.error(
                                v.span,
                                "returned value does not match the function's return type",
                                DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH,
                            );
                        }
                    }
                }
            }
            Stmt::Break(span) => {
                if self.ctx.loop_depth == 0 && self.ctx.switch_depth == 0 {
                    self.error(
                        *span,
                        "'break' outside of a loop",
                        DiagnosticCode::E_SEMANTIC_BREAK_OUTSIDE_LOOP,
                    );
                }
            }
            Stmt::Continue(span) => {
                if self.ctx.loop_depth == 0 {
                    self.error(
                        *span,
                        "'continue' outside of a loop",
                        DiagnosticCode::E_SEMANTIC_CONTINUE_OUTSIDE_LOOP,
                    );
                }
            }
            Stmt::ExpressionStatement(expr) => self.analyze_expr(expr),
            Stmt::Empty(_) => {}
        }
    }

    fn analyze_variable_declaration(
        &mut self,
        mutable: bool,
        constant: bool,
        name: Symbol,
        visibility: AstVisibility,
        value: &Option<Expr>,
        ty: &Option<TypeHandle>,
        span: Span,
    ) {
        if self.table.lookup_at_current_depth(name).is_some() {
            self.error(
                span,
                format!("'{}' is already declared in this scope", name.as_str()),
                DiagnosticCode::E_SEMANTIC_REDECLARATION,
            );
        } else if self.table.lookup(name).is_some() {
            self.warn(
                span,
                format!("'{}' shadows a declaration in an outer scope", name.as_str()),
                DiagnosticCode::W_SHADOWING,
            );
        }

        if let Some(v) = value {
            self.analyze_expr(v);
        }

        let declared_ty = match ty {
            Some(t) => self.resolve_type(t, span),
            None => match value {
                Some(v) => v
                    .computed_type
                    .borrow()
                    .clone()
                    .unwrap_or_else(unknown_type),
                None => unknown_type(),
            },
        };

        if let (Some(t), Some(v)) = (ty, value) {
            let annotation = self.resolve_type(t, span);
            if let Some(actual) = v.computed_type.borrow().clone() {
                if !self.types_compatible(&annotation, &actual) {
                    self.error(
                        v.span,
                        "initializer type is not compatible with the declared type",
                        DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH,
                    );
                } else if let (Some(ap), Some(bp)) = (primitive_of(&annotation), primitive_of(&actual)) {
                    if lattice::is_demotion(bp, ap) {
                        self.warn(
                            v.span,
                            "initializer narrows to the declared type",
                            DiagnosticCode::W_DEMOTION,
                        );
                    }
                }
            }
        }

        let kind = if constant { SymbolKind::Constant } else { SymbolKind::Variable };
        let _ = self.table.declare(SymbolEntry {
            name,
            kind,
            ty: declared_ty,
            span,
            mutable: mutable && !constant,
            depth: self.table.current_depth(),
            visibility: visibility.into(),
        });
    }

    fn analyze_function_declaration(
        &mut self,
        name: Symbol,
        generics: &[Symbol],
        params: &[Param],
        return_type: &Option<TypeHandle>,
        body: &Block,
        visibility: AstVisibility,
        span: Span,
    ) {
        if self.ctx.function_depth > 0 {
            self.error(
                span,
                "nested function declarations are not allowed",
                DiagnosticCode::E_SEMANTIC_NESTED_FUNCTION,
            );
        }

        if self.table.lookup_at_current_depth(name).is_some() {
            self.error(
                span,
                format!("'{}' is already declared in this scope", name.as_str()),
                DiagnosticCode::E_SEMANTIC_REDECLARATION,
            );
        }

        if !generics.is_empty() {
            self.function_generics.insert(name, generics.to_vec());
        }

        let ret = match return_type {
            Some(t) => self.resolve_type_allowing_generics(t, span, generics),
            None => void_type(),
        };

        let mut param_types = Vec::with_capacity(params.len());
        for p in params {
            let resolved = self.resolve_type_allowing_generics(&p.ty, p.span, generics);
            param_types.push((resolved, p.mutable));
        }

        let fn_type = Rc::new(Type::FunctionType {
            params: param_types.clone(),
            ret: ret.clone(),
        });

        let _ = self.table.declare(SymbolEntry {
            name,
            kind: SymbolKind::Function,
            ty: fn_type,
            span,
            mutable: false,
            depth: self.table.current_depth(),
            visibility: visibility.into(),
        });

        self.table.enter_scope();
        for (p, (resolved, mutable)) in params.iter().zip(param_types.iter()) {
            let kind = if *mutable {
                SymbolKind::FunctionParameter
            } else {
                SymbolKind::ConstantFunctionParameter
            };
            if self.table.lookup_at_current_depth(p.name).is_some() {
                self.error(
                    p.span,
                    format!("duplicate parameter '{}'", p.name.as_str()),
                    DiagnosticCode::E_SEMANTIC_REDECLARATION,
                );
            } else {
                let _ = self.table.declare(SymbolEntry {
                    name: p.name,
                    kind,
                    ty: resolved.clone(),
                    span: p.span,
                    mutable: *mutable,
                    depth: self.table.current_depth(),
                    visibility: Visibility::Private,
                });
            }
        }

        self.ctx.function_depth += 1;
        let previous_return = self.ctx.current_return_type.replace(ret);
        self.analyze_block(body);
        self.ctx.current_return_type = previous_return;
        self.ctx.function_depth -= 1;

        self.table.exit_scope();
    }

    fn analyze_aggregate_declaration(
        &mut self,
        name: Symbol,
        generics: &[Symbol],
        fields: &[ast::FieldDecl],
        visibility: AstVisibility,
        span: Span,
    ) {
        if self.table.lookup_at_current_depth(name).is_some() {
            self.error(
                span,
                format!("'{}' is already declared in this scope", name.as_str()),
                DiagnosticCode::E_SEMANTIC_REDECLARATION,
            );
            return;
        }
        if !generics.is_empty() {
            self.aggregate_generics.insert(name, generics.to_vec());
        }

        // Declare a placeholder first so self-referential fields (e.g. a
        // `ptr Node` field inside `aggregate Node`) resolve against this
        // aggregate's own name instead of reporting it unknown.
        let placeholder = Rc::new(Type::SymbolType { name, primitive: None });
        let _ = self.table.declare(SymbolEntry {
            name,
            kind: SymbolKind::Aggregate,
            ty: placeholder,
            span,
            mutable: false,
            depth: self.table.current_depth(),
            visibility: visibility.into(),
        });

        let mut resolved_fields = Vec::with_capacity(fields.len());
        for f in fields {
            let resolved = self.resolve_type_allowing_generics(&f.ty, f.span, generics);
            resolved_fields.push((f.name, resolved));
        }

        self.table.set_type(name, Rc::new(Type::AggregateType { fields: resolved_fields }));
    }

    fn analyze_enum_declaration(
        &mut self,
        name: Symbol,
        base_type: &TypeHandle,
        values: &[ast::EnumValue],
        visibility: AstVisibility,
        span: Span,
    ) {
        if self.table.lookup_at_current_depth(name).is_some() {
            self.error(
                span,
                format!("'{}' is already declared in this scope", name.as_str()),
                DiagnosticCode::E_SEMANTIC_REDECLARATION,
            );
            return;
        }
        let base = self.resolve_type(base_type, span);
        self.enum_values.insert(name, values.iter().map(|v| v.name).collect());

        for v in values {
            if let Some(init) = &v.init {
                self.analyze_expr(init);
                if let Some(actual) = init.computed_type.borrow().clone() {
                    if !self.types_compatible(&base, &actual) {
                        self.error(
                            init.span,
                            "enum value initializer does not match the enum's base type",
                            DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH,
                        );
                    }
                }
            }
        }

        let _ = self.table.declare(SymbolEntry {
            name,
            kind: SymbolKind::Enum,
            ty: base,
            span,
            mutable: false,
            depth: self.table.current_depth(),
            visibility: visibility.into(),
        });
    }

    fn analyze_alias(&mut self, base: &TypeHandle, name: Symbol, visibility: AstVisibility, span: Span) {
        if self.table.lookup_at_current_depth(name).is_some() {
            self.error(
                span,
                format!("'{}' is already declared in this scope", name.as_str()),
                DiagnosticCode::E_SEMANTIC_REDECLARATION,
            );
            return;
        }
        if let Type::GenericType { .. } = base.as_ref() {
            self.error(
                span,
                "generic types cannot be aliased",
                DiagnosticCode::E_SEMANTIC_GENERIC_ALIAS,
            );
            return;
        }
        let resolved = self.resolve_type(base, span);
        let _ = self.table.declare(SymbolEntry {
            name,
            kind: SymbolKind::TypeAlias,
            ty: resolved,
            span,
            mutable: false,
            depth: self.table.current_depth(),
            visibility: visibility.into(),
        });
    }

    fn check_bool_condition(&mut self, cond: &Expr) {
        self.analyze_expr(cond);
        if let Some(ty) = cond.computed_type.borrow().clone() {
            if primitive_of(&ty) != Some(Primitive::Bool) {
                self.error(
                    cond.span,
                    "condition must be a bool expression",
                    DiagnosticCode::E_SEMANTIC_NON_BOOL_CONDITION,
                );
            }
        }
    }

    // ---- expressions ---------------------------------------------------

    fn analyze_expr(&mut self, expr: &Expr) {
        let ty = self.compute_expr_type(expr);
        *expr.computed_type.borrow_mut() = ty;
    }

    fn compute_expr_type(&mut self, expr: &Expr) -> Option<TypeHandle> {
        match &expr.kind {
            ExprKind::NumberLiteral(n) => Some(primitive_type(number_primitive(n))),
            ExprKind::BoolLiteral(_) => Some(bool_type()),
            ExprKind::CharLiteral(_) => Some(primitive_type(Primitive::Char)),
            ExprKind::StringLiteral(_) => Some(primitive_type(Primitive::String)),

            ExprKind::Identifier(name) => match self.table.lookup(*name) {
                Some(entry) => Some(entry.ty.clone()),
                None => {
                    self.error(
                        expr.span,
                        format!("undeclared identifier '{}'", name.as_str()),
                        DiagnosticCode::E_SEMANTIC_UNDECLARED_IDENTIFIER,
                    );
                    None
                }
            },

            ExprKind::ArrayLiteral { elements, element_type, length } => {
                for e in elements {
                    self.analyze_expr(e);
                }
                if let Some(len) = length {
                    self.analyze_expr(len);
                }
                let elem_ty = if let Some(t) = element_type {
                    self.resolve_type(t, expr.span)
                } else if let Some(first) = elements.first() {
                    first.computed_type.borrow().clone().unwrap_or_else(unknown_type)
                } else {
                    unknown_type()
                };
                for e in elements {
                    if let Some(actual) = e.computed_type.borrow().clone() {
                        if !self.types_compatible(&elem_ty, &actual) {
                            self.error(
                                e.span,
                                "array element does not match the array's element type",
                                DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH,
                            );
                        }
                    }
                }
                Some(Rc::new(Type::ArrayType {
                    element: elem_ty,
                    length: Some(ArrayLength::Literal(elements.len() as u64)),
                }))
            }

            ExprKind::AggregateLiteral { values } => {
                for v in values {
                    self.analyze_expr(v);
                }
                Some(unknown_type())
            }

            ExprKind::AggregateInstantiation { name, type_args, fields } => {
                self.analyze_aggregate_instantiation(expr.span, *name, type_args, fields)
            }

            ExprKind::Index { container, index } => {
                self.analyze_expr(container);
                self.analyze_expr(index);
                let container_ty = container.computed_type.borrow().clone();
                match container_ty.as_deref() {
                    Some(Type::ArrayType { element, .. }) => Some(element.clone()),
                    Some(Type::Unknown) | None => None,
                    _ => {
                        self.error(
                            expr.span,
                            "indexed value is not an array",
                            DiagnosticCode::E_SEMANTIC_NOT_INDEXABLE,
                        );
                        None
                    }
                }
            }

            ExprKind::MemberAccess { object, property } => {
                self.analyze_expr(object);
                let object_ty = object.computed_type.borrow().clone();
                match object_ty.as_deref() {
                    Some(Type::AggregateType { fields }) => {
                        match fields.iter().find(|(n, _)| n == property) {
                            Some((_, ty)) => Some(ty.clone()),
                            None => {
                                self.error(
                                    expr.span,
                                    format!("no field '{}' on this aggregate", property.as_str()),
                                    DiagnosticCode::E_SEMANTIC_MISSING_FIELD,
                                );
                                None
                            }
                        }
                    }
                    Some(Type::Unknown) | None => None,
                    _ => {
                        self.error(
                            expr.span,
                            "member access on a non-aggregate value",
                            DiagnosticCode::E_SEMANTIC_NOT_INDEXABLE,
                        );
                        None
                    }
                }
            }

            ExprKind::ScopeResolution { scope, element } => self.analyze_scope_resolution(expr.span, scope, *element),

            ExprKind::FunctionCall { callee, args } => self.analyze_function_call(expr.span, callee, args),

            ExprKind::Generic { base, type_args } => {
                // A bare generic reference not immediately called, e.g.
                // passed around as a value; type as the base's own type.
                let _ = type_args;
                self.compute_expr_type(base)
            }

            ExprKind::TypeCast { value, target } => {
                self.analyze_expr(value);
                let resolved_target = self.resolve_type(target, expr.span);
                let value_ty = value.computed_type.borrow().clone();
                if let Some(vt) = value_ty {
                    if !self.cast_allowed(&vt, &resolved_target) {
                        self.error(
                            expr.span,
                            "invalid cast between these types",
                            DiagnosticCode::E_SEMANTIC_INVALID_CAST,
                        );
                    }
                }
                Some(resolved_target)
            }

            ExprKind::Binary { left, op, right } => self.analyze_binary(expr.span, left, *op, right),

            ExprKind::Assignment { target, op, value } => self.analyze_assignment(expr.span, target, *op, value),

            ExprKind::Prefix { op, right } => self.analyze_prefix(expr.span, *op, right),

            ExprKind::Postfix { left, op } => {
                self.analyze_expr(left);
                if !self.is_lvalue(left) {
                    self.error(
                        expr.span,
                        "postfix operator requires an assignable target",
                        DiagnosticCode::E_SEMANTIC_IMMUTABLE_TARGET,
                    );
                }
                let left_ty = left.computed_type.borrow().clone();
                if let Some(ty) = &left_ty {
                    if primitive_of(ty).map(lattice::is_integer) != Some(true) {
                        self.error(
                            left.span,
                            format!("'{}' requires an integer operand", postfix_op_str(*op)),
                            DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH,
                        );
                    }
                }
                self.check_mutable_target(left);
                left_ty
            }

            ExprKind::Error => None,
        }
    }

    fn cast_allowed(&self, from: &Type, to: &Type) -> bool {
        let (Some(fp), Some(tp)) = (primitive_of(from), primitive_of(to)) else {
            return false;
        };
        if fp == Primitive::String && tp == Primitive::Char {
            return true;
        }
        if fp == Primitive::Char && tp == Primitive::String {
            return true;
        }
        fp != Primitive::String && tp != Primitive::String
    }

    fn analyze_aggregate_instantiation(
        &mut self,
        span: Span,
        name: Symbol,
        type_args: &[TypeHandle],
        fields: &[ast::FieldInit],
    ) -> Option<TypeHandle> {
        let entry = self.table.lookup(name).cloned();
        let Some(entry) = entry else {
            self.error(
                span,
                format!("undeclared identifier '{}'", name.as_str()),
                DiagnosticCode::E_SEMANTIC_UNDECLARED_IDENTIFIER,
            );
            for f in fields {
                self.analyze_expr(&f.value);
            }
            return None;
        };
        if entry.kind != SymbolKind::Aggregate {
            self.error(
                span,
                format!("'{}' is not an aggregate type", name.as_str()),
                DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH,
            );
            for f in fields {
                self.analyze_expr(&f.value);
            }
            return None;
        }

        let declared_fields = match entry.ty.as_ref() {
            Type::AggregateType { fields } => fields.clone(),
            _ => Vec::new(),
        };

        let substituted = if let Some(generics) = self.aggregate_generics.get(&name) {
            substitute_in_fields(&declared_fields, generics, type_args)
        } else {
            declared_fields
        };

        for f in fields {
            self.analyze_expr(&f.value);
            match substituted.iter().find(|(n, _)| *n == f.name) {
                Some((_, field_ty)) => {
                    if let Some(actual) = f.value.computed_type.borrow().clone() {
                        if !self.types_compatible(field_ty, &actual) {
                            self.error(
                                f.value.span,
                                format!("field '{}' type mismatch", f.name.as_str()),
                                DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH,
                            );
                        }
                    }
                }
                None => self.error(
                    f.value.span,
                    format!("no field '{}' on '{}'", f.name.as_str(), name.as_str()),
                    DiagnosticCode::E_SEMANTIC_MISSING_FIELD,
                ),
            }
        }

        Some(Rc::new(Type::AggregateType { fields: substituted }))
    }

    fn analyze_scope_resolution(&mut self, span: Span, scope: &Expr, element: Symbol) -> Option<TypeHandle> {
        let ExprKind::Identifier(scope_name) = &scope.kind else {
            self.analyze_expr(scope);
            return None;
        };
        let Some(values) = self.enum_values.get(scope_name) else {
            self.error(
                span,
                format!("'{}' is not an enum", scope_name.as_str()),
                DiagnosticCode::E_SEMANTIC_UNDECLARED_IDENTIFIER,
            );
            return None;
        };
        if !values.contains(&element) {
            self.error(
                span,
                format!("enum '{}' has no value '{}'", scope_name.as_str(), element.as_str()),
                DiagnosticCode::E_SEMANTIC_MISSING_FIELD,
            );
            return None;
        }
        self.table.lookup(*scope_name).map(|e| e.ty.clone())
    }

    fn analyze_function_call(&mut self, span: Span, callee: &Expr, args: &[Expr]) -> Option<TypeHandle> {
        for a in args {
            self.analyze_expr(a);
        }

        if let ExprKind::Generic { base, type_args } = &callee.kind {
            if let ExprKind::Identifier(name) = &base.kind {
                return self.analyze_generic_call(span, *name, type_args, args);
            }
        }

        self.analyze_expr(callee);
        let callee_ty = callee.computed_type.borrow().clone();
        match callee_ty.as_deref() {
            Some(Type::FunctionType { params, ret }) => {
                self.check_call_arity_and_args(span, params, args);
                Some(ret.clone())
            }
            Some(Type::Unknown) | None => None,
            _ => {
                self.error(span, "value is not callable", DiagnosticCode::E_SEMANTIC_NOT_CALLABLE);
                None
            }
        }
    }

    fn analyze_generic_call(
        &mut self,
        span: Span,
        name: Symbol,
        type_args: &[TypeHandle],
        args: &[Expr],
    ) -> Option<TypeHandle> {
        let entry = self.table.lookup(name).cloned();
        let Some(entry) = entry else {
            self.error(
                span,
                format!("undeclared identifier '{}'", name.as_str()),
                DiagnosticCode::E_SEMANTIC_UNDECLARED_IDENTIFIER,
            );
            return None;
        };
        let Type::FunctionType { params, ret } = entry.ty.as_ref() else {
            self.error(span, "value is not callable", DiagnosticCode::E_SEMANTIC_NOT_CALLABLE);
            return None;
        };
        let generics = self.function_generics.get(&name).cloned().unwrap_or_default();
        let resolved_args = type_args.to_vec();
        let params = substitute_in_params(params, &generics, &resolved_args);
        let ret = substitute_in_type(ret, &generics, &resolved_args);
        self.check_call_arity_and_args(span, &params, args);
        Some(ret)
    }

    fn check_call_arity_and_args(&mut self, span: Span, params: &[(TypeHandle, bool)], args: &[Expr]) {
        if params.len() != args.len() {
            self.error(
                span,
                format!("expected {} argument(s), found {}", params.len(), args.len()),
                DiagnosticCode::E_SEMANTIC_ARITY_MISMATCH,
            );
            return;
        }
        for ((param_ty, _), arg) in params.iter().zip(args.iter()) {
            if let Some(actual) = arg.computed_type.borrow().clone() {
                if !self.types_compatible(param_ty, &actual) {
                    self.error(
                        arg.span,
                        "argument type does not match the parameter's type",
                        DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH,
                    );
                }
            }
        }
    }

    fn analyze_binary(&mut self, span: Span, left: &Expr, op: BinOp, right: &Expr) -> Option<TypeHandle> {
        self.analyze_expr(left);
        self.analyze_expr(right);
        let lt = left.computed_type.borrow().clone()?;
        let rt = right.computed_type.borrow().clone()?;
        self.binary_result(span, op, &lt, &rt)
    }

    fn binary_result(&mut self, span: Span, op: BinOp, lt: &Type, rt: &Type) -> Option<TypeHandle> {
        use BinOp::*;

        if let (Type::ArrayType { element: le, .. }, Type::ArrayType { element: re, .. }) = (lt, rt) {
            if matches!(op, Add | Sub | Eq | NotEq | Lt | LtEq | Gt | GtEq) && self.types_compatible(le, re) {
                return match op {
                    Add | Sub => Some(Rc::new(Type::ArrayType { element: le.clone(), length: None })),
                    _ => Some(bool_type()),
                };
            }
        }
        if let (Type::ArrayType { element, .. }, Type::SymbolType { primitive: Some(p), .. }) = (lt, rt) {
            if op == Mul && lattice::is_integer(*p) {
                return Some(Rc::new(Type::ArrayType { element: element.clone(), length: None }));
            }
        }

        let (lp, rp) = match (primitive_of(lt), primitive_of(rt)) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                self.error(span, "operands are not compatible with this operator", DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH);
                return None;
            }
        };

        let result = match op {
            Add => {
                if lp == Primitive::String || rp == Primitive::String || lp == Primitive::Char || rp == Primitive::Char {
                    Some(Primitive::String)
                } else {
                    lattice::promote(lp, rp)
                }
            }
            Sub | Exp => lattice::promote(lp, rp),
            Mul => {
                if lp == Primitive::String && lattice::is_integer(rp) {
                    Some(Primitive::String)
                } else {
                    lattice::promote(lp, rp)
                }
            }
            Div => {
                if lattice::is_numeric(lp) && lattice::is_numeric(rp) {
                    Some(lattice::division_result(lp, rp))
                } else {
                    None
                }
            }
            IntDiv | Mod => {
                if lattice::is_integer(lp) && lattice::is_integer(rp) {
                    Some(lattice::widest_integer(lp, rp))
                } else {
                    None
                }
            }
            Eq | NotEq | Lt | LtEq | Gt | GtEq => {
                if lp == rp || lattice::promote(lp, rp).is_some() {
                    return Some(bool_type());
                }
                None
            }
            And | Or => {
                if lp == Primitive::Bool && rp == Primitive::Bool {
                    return Some(bool_type());
                }
                None
            }
            BitAnd | BitOr | BitXor | Shl | Shr => {
                if lattice::is_integer(lp) && lattice::is_integer(rp) {
                    Some(lattice::widest_integer(lp, rp))
                } else {
                    None
                }
            }
        };

        match result {
            Some(p) => Some(primitive_type(p)),
            None => {
                self.error(span, "operands are not compatible with this operator", DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH);
                None
            }
        }
    }

    fn analyze_assignment(&mut self, span: Span, target: &Expr, op: Option<BinOp>, value: &Expr) -> Option<TypeHandle> {
        self.analyze_expr(target);
        self.analyze_expr(value);

        if !self.is_lvalue(target) {
            self.error(span, "left side of an assignment must be an assignable target", DiagnosticCode::E_SEMANTIC_IMMUTABLE_TARGET);
        }
        self.check_mutable_target(target);

        let target_ty = target.computed_type.borrow().clone();
        let value_ty = value.computed_type.borrow().clone();
        match (op, &target_ty, &value_ty) {
            (Some(bin_op), Some(tt), Some(vt)) => {
                self.binary_result(span, bin_op, tt, vt);
            }
            (None, Some(tt), Some(vt)) if !self.types_compatible(tt, vt) => {
                self.error(value.span, "assigned value does not match the target's type", DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH);
            }
            _ => {}
        }
        target_ty
    }

    fn analyze_prefix(&mut self, span: Span, op: UnOp, right: &Expr) -> Option<TypeHandle> {
        self.analyze_expr(right);
        let rt = right.computed_type.borrow().clone()?;
        let rp = primitive_of(&rt);

        match op {
            UnOp::Not => {
                if rp != Some(Primitive::Bool) {
                    self.error(span, "'!' requires a bool operand", DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH);
                    return None;
                }
                Some(bool_type())
            }
            UnOp::Plus | UnOp::Minus => match rp {
                Some(p) if lattice::is_numeric(p) => Some(primitive_type(p)),
                _ => {
                    self.error(span, "unary +/- requires a numeric operand", DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH);
                    None
                }
            },
            UnOp::BitNot => match rp {
                Some(p) if lattice::is_integer(p) => Some(primitive_type(p)),
                _ => {
                    self.error(span, "'~' requires an integer operand", DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH);
                    None
                }
            },
            UnOp::AddressOf => Some(Rc::new(Type::PointerType { pointee: rt, mutable: self.is_mutable_lvalue(right) })),
            UnOp::Dereference => match rt.as_ref() {
                Type::PointerType { pointee, .. } => Some(pointee.clone()),
                _ => {
                    self.error(span, "'*' requires a pointer operand", DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH);
                    None
                }
            },
            UnOp::Increment | UnOp::Decrement => {
                if !self.is_lvalue(right) {
                    self.error(span, "prefix operator requires an assignable target", DiagnosticCode::E_SEMANTIC_IMMUTABLE_TARGET);
                }
                self.check_mutable_target(right);
                match rp {
                    Some(p) if lattice::is_integer(p) => Some(primitive_type(p)),
                    _ => {
                        self.error(span, "'++'/'--' require an integer operand", DiagnosticCode::E_SEMANTIC_TYPE_MISMATCH);
                        None
                    }
                }
            }
        }
    }

    fn is_lvalue(&self, expr: &Expr) -> bool {
        matches!(expr.kind, ExprKind::Identifier(_) | ExprKind::Index { .. } | ExprKind::MemberAccess { .. })
            || matches!(&expr.kind, ExprKind::Prefix { op: UnOp::Dereference, .. })
    }

    fn is_mutable_lvalue(&self, expr: &Expr) -> bool {
        self.root_identifier(expr)
            .and_then(|name| self.table.lookup(name))
            .map(|e| e.mutable)
            .unwrap_or(true)
    }

    fn check_mutable_target(&mut self, expr: &Expr) {
        if let Some(name) = self.root_identifier(expr) {
            if let Some(entry) = self.table.lookup(name) {
                if !entry.mutable {
                    self.error(
                        expr.span,
                        format!("cannot reassign constant '{}'", name.as_str()),
                        DiagnosticCode::E_SEMANTIC_IMMUTABLE_TARGET,
                    );
                }
            }
        }
    }

    fn root_identifier(&self, expr: &Expr) -> Option<Symbol> {
        match &expr.kind {
            ExprKind::Identifier(name) => Some(*name),
            ExprKind::Index { container, .. } => self.root_identifier(container),
            ExprKind::MemberAccess { object, .. } => self.root_identifier(object),
            ExprKind::Prefix { op: UnOp::Dereference, right } => self.root_identifier(right),
            _ => None,
        }
    }
}

fn is_primitive_name(name: Symbol) -> bool {
    use ferritec_util::symbol::*;
    const NAMES: [Symbol; 13] = [
        TY_INT8, TY_INT16, TY_INT32, TY_INT64, TY_UINT8, TY_UINT16, TY_UINT32, TY_UINT64, TY_FLOAT32, TY_FLOAT64,
        TY_CHAR, TY_BOOL, TY_STRING,
    ];
    NAMES.contains(&name)
}

fn postfix_op_str(op: ast::PostfixOp) -> &'static str {
    match op {
        ast::PostfixOp::Increment => "++",
        ast::PostfixOp::Decrement => "--",
    }
}

fn substitute_in_type(ty: &TypeHandle, generics: &[Symbol], args: &[TypeHandle]) -> TypeHandle {
    match ty.as_ref() {
        Type::SymbolType { name, primitive: None } => {
            if let Some(idx) = generics.iter().position(|g| g == name) {
                if let Some(arg) = args.get(idx) {
                    return arg.clone();
                }
            }
            ty.clone()
        }
        Type::PointerType { pointee, mutable } => Rc::new(Type::PointerType {
            pointee: substitute_in_type(pointee, generics, args),
            mutable: *mutable,
        }),
        Type::ArrayType { element, length } => Rc::new(Type::ArrayType {
            element: substitute_in_type(element, generics, args),
            length: length.clone(),
        }),
        Type::FunctionType { params, ret } => Rc::new(Type::FunctionType {
            params: substitute_in_params(params, generics, args),
            ret: substitute_in_type(ret, generics, args),
        }),
        _ => ty.clone(),
    }
}

fn substitute_in_params(params: &[(TypeHandle, bool)], generics: &[Symbol], args: &[TypeHandle]) -> Vec<(TypeHandle, bool)> {
    params
        .iter()
        .map(|(t, m)| (substitute_in_type(t, generics, args), *m))
        .collect()
}

fn substitute_in_fields(fields: &[(Symbol, TypeHandle)], generics: &[Symbol], args: &[TypeHandle]) -> Vec<(Symbol, TypeHandle)> {
    fields
        .iter()
        .map(|(n, t)| (*n, substitute_in_type(t, generics, args)))
        .collect()
}
