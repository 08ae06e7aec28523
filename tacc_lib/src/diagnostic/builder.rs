use super::{Code, Diagnostic, Span};
use crate::ir::ctype::CType;

pub struct DiagnosticBuilder {
    span: Span,
    additional_spans: Vec<(Span, Option<String>)>,
}

impl DiagnosticBuilder {
    pub fn new(span: impl Into<Span>) -> Self {
        Self {
            span: span.into(),
            additional_spans: Vec::new(),
        }
    }

    pub fn with_additional_span(mut self, span: impl Into<Span>, message: Option<String>) -> Self {
        self.additional_spans.push((span.into(), message));
        self
    }

    fn build_custom(self, code: Code, message: String) -> Diagnostic {
        Diagnostic {
            code,
            message,
            main_span: (self.span, None),
            additional_spans: self.additional_spans,
        }
    }

    pub fn build_unrecognized_input(self, slice: &str) -> Diagnostic {
        let msg = format!("unrecognized input: `{slice}`");
        self.build_custom(Code::SyntaxError, msg)
    }

    pub fn build_unexpected_token(self, found: &str, expected: &str) -> Diagnostic {
        let msg = format!("unexpected {found}, expected {expected}");
        self.build_custom(Code::SyntaxError, msg)
    }

    pub fn build_invalid_primary(self, found: &str) -> Diagnostic {
        let msg = format!("unexpected {found}, not a valid primary expression");
        self.build_custom(Code::SyntaxError, msg)
    }

    pub fn build_invalid_postfix(self, found: &str) -> Diagnostic {
        let msg = format!("unexpected {found}, not a valid postfix expression");
        self.build_custom(Code::SyntaxError, msg)
    }

    pub fn build_missing_type_specifier(self) -> Diagnostic {
        let msg = "missing type specifier in declaration".to_owned();
        self.build_custom(Code::ShapeError, msg)
    }

    pub fn build_missing_declarator_name(self) -> Diagnostic {
        let msg = "declaration does not declare a name".to_owned();
        self.build_custom(Code::ShapeError, msg)
    }

    pub fn build_invalid_function_definition(self) -> Diagnostic {
        let msg = "invalid function definition".to_owned();
        self.build_custom(Code::ShapeError, msg)
    }

    pub fn build_missing_parameter_name(self, position: usize) -> Diagnostic {
        let msg = format!("missing parameter name at position {position}");
        self.build_custom(Code::ShapeError, msg)
    }

    pub fn build_trailing_parameter_comma(self) -> Diagnostic {
        let msg = "trailing comma in parameter list".to_owned();
        self.build_custom(Code::ShapeError, msg)
    }

    pub fn build_jump_outside_loop(self, keyword: &str) -> Diagnostic {
        let msg = format!("{keyword} outside of a loop");
        self.build_custom(Code::ShapeError, msg)
    }

    pub fn build_array_size_not_constant(self) -> Diagnostic {
        let msg = "array dimension must be a compile-time integer constant".to_owned();
        self.build_custom(Code::ConstantError, msg)
    }

    pub fn build_invalid_array_size(self, length: i64) -> Diagnostic {
        let msg = format!("invalid array size {length}");
        self.build_custom(Code::ConstantError, msg)
    }

    pub fn build_integer_out_of_range(self, lexeme: &str) -> Diagnostic {
        let msg = format!("integer constant `{lexeme}` does not fit in 64 bits");
        self.build_custom(Code::ConstantError, msg)
    }

    pub fn build_deref_non_pointer(self, ty: &CType) -> Diagnostic {
        let msg = format!("cannot dereference expression of type `{ty}`");
        self.build_custom(Code::TypeError, msg)
    }

    pub fn build_undefined_symbol(self, name: &str) -> Diagnostic {
        let msg = format!("undefined symbol `{name}`");
        self.build_custom(Code::NameError, msg)
    }
}
