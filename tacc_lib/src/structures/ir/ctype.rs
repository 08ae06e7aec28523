use std::fmt::Display;
use std::rc::Rc;

/// `const` and `volatile` markers of a single type node. Each pointer level
/// owns its own set; they never leak across levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Qualifiers {
    pub is_const: bool,
    pub is_volatile: bool,
}

impl Qualifiers {
    pub fn is_empty(&self) -> bool {
        !self.is_const && !self.is_volatile
    }
}

/// The arithmetic scalars of the subset. Every integer specifier collapses
/// to the 64-bit integer, and every floating specifier to double.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arithmetic {
    Char,
    Int64,
    Double,
}

impl Arithmetic {
    pub fn size_in_bytes(&self) -> u64 {
        match self {
            Arithmetic::Char => 1,
            Arithmetic::Int64 => 8,
            Arithmetic::Double => 8,
        }
    }

    pub fn is_integral(&self) -> bool {
        match self {
            Arithmetic::Char | Arithmetic::Int64 => true,
            Arithmetic::Double => false,
        }
    }

    /// The type a binary operator evaluates in when its operands have these
    /// two types: identical inputs keep their type, otherwise double
    /// outranks the integers and char promotes to the wide integer.
    pub fn usual_arithmetic_conversions(left: Self, right: Self) -> Self {
        if left == right {
            return left;
        }
        if left == Arithmetic::Double || right == Arithmetic::Double {
            return Arithmetic::Double;
        }
        Arithmetic::Int64
    }
}

impl Display for Arithmetic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Arithmetic::Char => "char",
            Arithmetic::Int64 => "long",
            Arithmetic::Double => "double",
        };
        write!(f, "{name}")
    }
}

/// An array type node. `length == 0` marks an unspecified (incomplete)
/// dimension; `size` is the total object size in bytes, computed bottom-up
/// at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayType {
    pub length: u64,
    pub size: u64,
    pub element: Box<CType>,
}

/// A function type node. Parameter names may be absent in a prototype; they
/// are required once the function is defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionType {
    pub returns: Box<CType>,
    pub params: Vec<Parameter>,
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: Option<Rc<str>>,
    pub ty: CType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Arithmetic(Arithmetic),
    Void,
    Pointer(Box<CType>),
    Array(ArrayType),
    Function(FunctionType),
}

/// A node in the type tree built by the declarator grammar. Nodes are
/// immutable once built, except that the declarator root takes the
/// specifier's qualifier set exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CType {
    pub kind: TypeKind,
    pub qualifiers: Qualifiers,
}

impl CType {
    pub fn arithmetic(a: Arithmetic) -> Self {
        Self {
            kind: TypeKind::Arithmetic(a),
            qualifiers: Qualifiers::default(),
        }
    }

    pub fn void() -> Self {
        Self {
            kind: TypeKind::Void,
            qualifiers: Qualifiers::default(),
        }
    }

    pub fn pointer(pointee: CType) -> Self {
        Self {
            kind: TypeKind::Pointer(Box::new(pointee)),
            qualifiers: Qualifiers::default(),
        }
    }

    pub fn array(length: u64, element: CType) -> Self {
        let size = element.size() * length;
        Self {
            kind: TypeKind::Array(ArrayType {
                length,
                size,
                element: Box::new(element),
            }),
            qualifiers: Qualifiers::default(),
        }
    }

    pub fn function(returns: CType, params: Vec<Parameter>, variadic: bool) -> Self {
        Self {
            kind: TypeKind::Function(FunctionType {
                returns: Box::new(returns),
                params,
                variadic,
            }),
            qualifiers: Qualifiers::default(),
        }
    }

    pub fn with_qualifiers(mut self, qualifiers: Qualifiers) -> Self {
        self.qualifiers = qualifiers;
        self
    }

    pub fn unqualified(mut self) -> Self {
        self.qualifiers = Qualifiers::default();
        self
    }

    /// Object size in bytes. Incomplete arrays and function designators
    /// have size 0.
    pub fn size(&self) -> u64 {
        match &self.kind {
            TypeKind::Arithmetic(a) => a.size_in_bytes(),
            TypeKind::Void => 0,
            TypeKind::Pointer(_) => 8,
            TypeKind::Array(arr) => arr.size,
            TypeKind::Function(_) => 0,
        }
    }

    /// The pointee or element type. Only pointers and arrays can be
    /// dereferenced; callers turn a `None` into a type error.
    pub fn deref(&self) -> Option<&CType> {
        match &self.kind {
            TypeKind::Pointer(pointee) => Some(pointee),
            TypeKind::Array(arr) => Some(&arr.element),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, TypeKind::Array(_))
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self.kind, TypeKind::Pointer(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, TypeKind::Function(_))
    }

    /// Array-to-pointer decay; every other type is returned unchanged.
    pub fn decayed(&self) -> CType {
        match &self.kind {
            TypeKind::Array(arr) => CType::pointer((*arr.element).clone()),
            _ => self.clone(),
        }
    }

    /// The usual arithmetic conversion applied at every binary operator:
    /// arrays decay first, pointers dominate arithmetic operands, and the
    /// result carries no qualifiers.
    pub fn combine(&self, other: &CType) -> CType {
        let lhs = self.decayed();
        let rhs = other.decayed();
        match (&lhs.kind, &rhs.kind) {
            (TypeKind::Arithmetic(a), TypeKind::Arithmetic(b)) => {
                CType::arithmetic(Arithmetic::usual_arithmetic_conversions(*a, *b))
            }
            (TypeKind::Pointer(_), _) => lhs.unqualified(),
            (_, TypeKind::Pointer(_)) => rhs.unqualified(),
            _ => lhs.unqualified(),
        }
    }
}

fn write_qualifiers(f: &mut std::fmt::Formatter<'_>, q: Qualifiers) -> std::fmt::Result {
    if q.is_const {
        write!(f, "const ")?;
    }
    if q.is_volatile {
        write!(f, "volatile ")?;
    }
    Ok(())
}

impl Display for CType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            TypeKind::Arithmetic(a) => {
                write_qualifiers(f, self.qualifiers)?;
                write!(f, "{a}")
            }
            TypeKind::Void => {
                write_qualifiers(f, self.qualifiers)?;
                write!(f, "void")
            }
            TypeKind::Pointer(pointee) => {
                write!(f, "{pointee} *")?;
                if self.qualifiers.is_const {
                    write!(f, "const")?;
                }
                if self.qualifiers.is_volatile {
                    if self.qualifiers.is_const {
                        write!(f, " ")?;
                    }
                    write!(f, "volatile")?;
                }
                Ok(())
            }
            TypeKind::Array(arr) => {
                // dimensions read outside-in
                let mut dims = vec![arr.length];
                let mut element = &arr.element;
                while let TypeKind::Array(inner) = &element.kind {
                    dims.push(inner.length);
                    element = &inner.element;
                }
                write!(f, "{element}")?;
                for length in dims {
                    match length {
                        0 => write!(f, "[]")?,
                        n => write!(f, "[{n}]")?,
                    }
                }
                Ok(())
            }
            TypeKind::Function(func) => {
                write!(f, "{} (", func.returns)?;
                for (i, param) in func.params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param.ty)?;
                }
                if func.variadic {
                    if !func.params.is_empty() {
                        write!(f, ", ")?;
                    }
                    write!(f, "...")?;
                }
                write!(f, ")")
            }
        }
    }
}
