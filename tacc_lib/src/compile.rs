use crate::diagnostic::Diagnostic;
use crate::inspectors;
use crate::passes;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    IrText,
    IrRustDbg,
    CfgDot,
}

pub struct CompileOpts {
    output_format: OutputFormat,
    prune_blocks: bool,
}

pub struct CompileOptsBuilder {
    output_format: OutputFormat,
    prune_blocks: bool,
}

impl Default for CompileOptsBuilder {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::default(),
            prune_blocks: true,
        }
    }
}

impl CompileOptsBuilder {
    /// Textual IR with unreachable-block pruning on.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set unreachable-block pruning
    pub fn prune_blocks(mut self, prune_blocks: bool) -> Self {
        self.prune_blocks = prune_blocks;
        self
    }

    pub fn build(self) -> CompileOpts {
        CompileOpts {
            output_format: self.output_format,
            prune_blocks: self.prune_blocks,
        }
    }
}

/// Compile a translation unit and render every function definition it
/// contains, separated by blank lines.
///
/// The first error aborts the whole compile; a function is only rendered
/// after its definition has parsed completely, so no partial function ever
/// reaches the output.
pub fn compile(source: &str, opts: &CompileOpts) -> Result<Vec<u8>, Diagnostic> {
    let tokens = passes::lex::lex(source)?;
    let mut parser = passes::parse::Parser::new(tokens);

    let mut out = String::new();
    while !parser.at_eof() {
        let Some(mut function) = parser.declaration()? else {
            continue;
        };
        if opts.prune_blocks {
            passes::prune_blocks::prune_blocks(&mut function);
        }
        let rendered = match opts.output_format {
            OutputFormat::IrText => {
                inspectors::ir_text::emit_function(&function, parser.symbols())
            }
            OutputFormat::IrRustDbg => format!("{function:#?}\n"),
            OutputFormat::CfgDot => inspectors::dot::inspect_cfg(&function, parser.symbols()),
        };
        out.push_str(&rendered);
        out.push('\n');
    }
    Ok(out.into_bytes())
}
