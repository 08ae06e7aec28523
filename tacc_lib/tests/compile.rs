use tacc_lib::compile::{compile, CompileOpts, CompileOptsBuilder, OutputFormat};
use tacc_lib::diagnostic::Code;

fn opts() -> CompileOpts {
    CompileOptsBuilder::new().build()
}

fn compile_to_string(source: &str) -> String {
    let bytes = compile(source, &opts()).expect("compile error");
    String::from_utf8(bytes).expect("emitted IR is utf-8")
}

fn compile_code(source: &str) -> Code {
    *compile(source, &opts())
        .expect_err("expected the compile to fail")
        .code()
}

#[test]
fn empty_translation_unit_emits_nothing() {
    assert_eq!(compile_to_string(""), "");
}

#[test]
fn plain_declarations_emit_nothing() {
    assert_eq!(compile_to_string("int x; char *p; int a[3][2];"), "");
}

#[test]
fn straight_line_function() {
    let expected = "\
foo:
\tt0 = a + b
\ta = t0
\treturn a
\n";
    assert_eq!(
        compile_to_string("int foo(int a, int b) { a = a + b; return a; }"),
        expected
    );
}

#[test]
fn if_else_becomes_a_branch() {
    let expected = "\
f:
\tif 1 goto .L1
\tgoto .L0
.L0:
\treturn 3
.L1:
\treturn 2
\n";
    assert_eq!(
        compile_to_string("int f() { if (1) { return 2; } else { return 3; } }"),
        expected
    );
}

#[test]
fn while_loop_text() {
    let expected = "\
count:
\tgoto .L0
.L0:
\tif n goto .L2
\tgoto .L1
.L1:
\treturn n
.L2:
\tt0 = n - 1
\tn = t0
\tgoto .L0
\n";
    assert_eq!(
        compile_to_string("int count(int n) { while (n) { n = n - 1; } return n; }"),
        expected
    );
}

#[test]
fn functions_are_separated_by_a_blank_line() {
    let out = compile_to_string("int f() { return 1; }\nint g() { return 2; }");
    assert_eq!(
        out,
        "f:\n\treturn 1\n\ng:\n\treturn 2\n\n"
    );
}

#[test]
fn file_scope_state_persists_between_functions() {
    let out = compile_to_string("int x; int f() { x = 1; } int g() { x = 2; }");
    assert_eq!(out, "f:\n\tx = 1\n\treturn\n\ng:\n\tx = 2\n\treturn\n\n");
}

#[test]
fn indexing_emits_scale_add_load() {
    let expected = "\
f:
\tt0 = i * 16
\tt1 = a + t0
\tt2 = 1 * 8
\tt3 = t1 + t2
\tt4 = *t3
\tt4 = 4
\treturn t4
\n";
    assert_eq!(
        compile_to_string("int f(int a[3][2], int i) { return a[i][1] = 4; }"),
        expected
    );
}

#[test]
fn errors_carry_their_taxonomy_code() {
    assert_eq!(compile_code("int f() { y = 1; }"), Code::NameError);
    assert_eq!(compile_code("x;"), Code::ShapeError);
    assert_eq!(compile_code("int a[0];"), Code::ConstantError);
    assert_eq!(compile_code("int f(int x) { x[0]; }"), Code::TypeError);
    assert_eq!(compile_code("int f( { }"), Code::ShapeError);
    assert_eq!(compile_code("int x @"), Code::SyntaxError);
}

#[test]
fn no_partial_function_is_emitted_on_error() {
    // the second function fails halfway through its body; only the first
    // one may have been rendered, and compile reports the error instead
    let err = compile("int f() { return 1; } int g() { oops = 2; }", &opts())
        .expect_err("expected the compile to fail");
    assert_eq!(err.code(), &Code::NameError);
}

#[test]
fn rust_debug_format_renders_the_function() {
    let opts = CompileOptsBuilder::new()
        .output_format(OutputFormat::IrRustDbg)
        .build();
    let bytes = compile("int f() { return 0; }", &opts).expect("compile error");
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.contains("Function"));
    assert!(text.contains("entry"));
}

#[test]
fn dot_format_renders_a_digraph() {
    let opts = CompileOptsBuilder::new()
        .output_format(OutputFormat::CfgDot)
        .build();
    let bytes = compile("int f(int x) { while (x) { x = x - 1; } }", &opts)
        .expect("compile error");
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with("digraph \"f\""));
    assert!(text.contains("label=\"1\""));
    assert!(text.ends_with("}\n\n"));
}

#[test]
fn skipping_the_prune_pass_keeps_orphans_out_of_the_text() {
    // the emitter only walks the reachable graph, so the text is identical
    // with pruning off
    let source = "int f(int x) { if (x) { return 1; } return 2; }";
    let pruned = compile_to_string(source);
    let unpruned_opts = CompileOptsBuilder::new().prune_blocks(false).build();
    let unpruned = String::from_utf8(compile(source, &unpruned_opts).unwrap()).unwrap();
    assert_eq!(pruned, unpruned);
}
