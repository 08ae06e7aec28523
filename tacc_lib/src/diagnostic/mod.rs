pub mod builder;

use std::fmt::{Debug, Display};

pub use builder::DiagnosticBuilder;

#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    start: usize,
    length: usize,
}

impl From<std::ops::Range<usize>> for Span {
    fn from(value: std::ops::Range<usize>) -> Self {
        Self {
            start: value.start,
            length: value.len(),
        }
    }
}

impl From<Span> for std::ops::Range<usize> {
    fn from(val: Span) -> Self {
        val.start..val.excl_end()
    }
}

impl Debug for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.excl_end())
    }
}

impl Span {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn excl_end(&self) -> usize {
        self.start + self.length
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

// WARNING: Don't change the order of these (error codes will change)
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    /// Unexpected token, either while scanning or at a `consume` point.
    SyntaxError,
    /// A declaration with an impossible shape: missing type specifier,
    /// nested function definition, unnamed parameter at a definition,
    /// trailing comma in a parameter list.
    ShapeError,
    /// An array dimension that is not a compile-time integer constant, or
    /// one that is out of range.
    ConstantError,
    /// Dereference of something that is not a pointer.
    TypeError,
    /// Use of an identifier with no visible declaration.
    NameError,
}

impl Code {
    /// Get a unique numeric code for this `Code`
    fn as_code(&self) -> u32 {
        *self as u32
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:0>4x}", self.as_code())
    }
}

/// A single fatal diagnostic. The core has no recovery: the first
/// `Diagnostic` raised aborts the compile, and no partially lowered
/// function is ever emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    code: Code,
    message: String,
    main_span: (Span, Option<String>),
    additional_spans: Vec<(Span, Option<String>)>,
}

impl Diagnostic {
    pub fn code(&self) -> &Code {
        &self.code
    }

    pub fn message(&self) -> &String {
        &self.message
    }

    pub fn main_span(&self) -> &Span {
        &self.main_span.0
    }

    pub fn main_span_message(&self) -> Option<&String> {
        self.main_span.1.as_ref()
    }

    pub fn additional_spans(&self) -> impl Iterator<Item = (&Span, Option<&String>)> {
        self.additional_spans.iter().map(|(s, m)| (s, m.as_ref()))
    }

    pub fn additional_spans_len(&self) -> usize {
        self.additional_spans.len()
    }
}
