extern crate bril;

use bril::dialect::bril::LoadOp;
use bril::dialect::bril::PointerType;
use bril::ir::Type;
use bril::ir::TypeKind;
use bril::shared::SharedExt;
use bril::tester::Tester;
use indoc::indoc;
use std::panic::Location;

#[test]
fn parse_module() {
    Tester::init_tracing();
    let src = indoc! {r#"
    module {
      bril.func @main(%n : i64) -> i64 {
        %0 = "bril.const"() {value = 1 : i64} : () -> i64
        %1 = "bril.alloc"(%n) : (i64) -> !bril.ptr<i64>
        "bril.store"(%1, %0) : (!bril.ptr<i64>, i64) -> ()
        %2 = "bril.load"(%1) : (!bril.ptr<i64>) -> i64
        %3 = "bril.ptr_add"(%1, %0) : (!bril.ptr<i64>, i64) -> !bril.ptr<i64>
        "bril.print"(%2, %3) : (i64, !bril.ptr<i64>) -> ()
        "bril.free"(%1) : (!bril.ptr<i64>) -> ()
        "bril.ret"(%2) : (i64) -> ()
      }
    }
    "#};
    let (module, actual) = Tester::parse(src);
    Tester::check_lines_exact(&actual, src, Location::caller());
    assert!(Tester::verify(&module).is_empty());
}

#[test]
fn parse_wraps_module() {
    Tester::init_tracing();
    let src = indoc! {r#"
    // No module around the function.
    bril.func @main() {
      %0 = "bril.undef"() : () -> f64
      "bril.nop"() : () -> ()
      "bril.ret"() : () -> ()
    }
    "#};
    let expected = indoc! {r#"
    module {
      bril.func @main() {
        %0 = "bril.undef"() : () -> f64
        "bril.nop"() : () -> ()
        "bril.ret"() : () -> ()
      }
    }
    "#};
    let (_module, actual) = Tester::parse(src);
    Tester::check_lines_exact(&actual, expected, Location::caller());
}

#[test]
fn parse_attributes() {
    Tester::init_tracing();
    let src = indoc! {r#"
    bril.func @main() {
      %0 = "bril.const"() {value = -3 : i32} : () -> i32
      %1 = "bril.const"() {value = 2.5 : f32} : () -> f32
      %2 = "bril.const"() {value = true} : () -> i1
      %3 = "bril.call"(%0) {callee = @inc, tail = false} : (i32) -> i32
      "bril.ret"() : () -> ()
    }
    "#};
    let expected = indoc! {r#"
    %0 = "bril.const"() {value = -3 : i32} : () -> i32
    %1 = "bril.const"() {value = 2.5 : f32} : () -> f32
    %2 = "bril.const"() {value = true} : () -> i1
    %3 = "bril.call"(%0) {callee = @inc, tail = false} : (i32) -> i32
    "#};
    let (_module, actual) = Tester::parse(src);
    Tester::check_lines_contain(&actual, expected, Location::caller());
}

#[test]
fn parse_pointer_types() {
    Tester::init_tracing();
    let src = indoc! {r#"
    bril.func @main(%pp : !bril.ptr<!bril.ptr<f32>>) {
      %0 = "bril.load"(%pp) : (!bril.ptr<!bril.ptr<f32>>) -> !bril.ptr<f32>
      "bril.ret"() : () -> ()
    }
    "#};
    let (module, actual) = Tester::parse(src);
    Tester::check_lines_contain(&actual, src, Location::caller());

    let func = module.rd().ops()[0].clone();
    let ops = func.rd().ops();
    let load = ops[0].rd();
    let load = load.as_any().downcast_ref::<LoadOp>().unwrap();
    let pointer = load.pointer().unwrap().typ();
    let pointee = pointer.as_pointer().unwrap().pointee().clone();
    assert_eq!(pointee, load.result_type().unwrap());
    assert!(matches!(pointee.kind(), TypeKind::Pointer(_)));
    assert_eq!(
        pointee,
        Type::new(TypeKind::Pointer(PointerType::new(Type::float(
            bril::ir::FloatType::F32
        ))))
    );
}

#[test]
fn parse_undefined_value() {
    Tester::init_tracing();
    let src = indoc! {r#"
    bril.func @main() {
      %0 = "bril.id"(%x) : (i64) -> i64
    }
    "#};
    let msg = Tester::parse_error(src);
    assert!(msg.contains("use of undeclared SSA value %x"));
    assert!(msg.contains("2  |   %0 = \"bril.id\"(%x) : (i64) -> i64"));
}

#[test]
fn parse_redefinition() {
    Tester::init_tracing();
    let src = indoc! {r#"
    bril.func @main() {
      %0 = "bril.undef"() : () -> i64
      %0 = "bril.undef"() : () -> i64
    }
    "#};
    let msg = Tester::parse_error(src);
    assert!(msg.contains("redefinition of SSA value %0"));
}

#[test]
fn parse_operand_type_mismatch() {
    Tester::init_tracing();
    let src = indoc! {r#"
    bril.func @main(%a : i32) {
      %0 = "bril.id"(%a) : (i64) -> i64
    }
    "#};
    let msg = Tester::parse_error(src);
    assert!(msg.contains(
        "use of value '%a' expects different type than prior uses: 'i64' vs 'i32'"
    ));
}

#[test]
fn parse_unknown_names() {
    Tester::init_tracing();
    let src = r#"%0 = "bril.frobnicate"() : () -> i64"#;
    let msg = Tester::parse_error(src);
    assert!(msg.contains("Unknown operation: bril.frobnicate"));

    let src = r#"%0 = "bril.undef"() : () -> !bril.box<i64>"#;
    let msg = Tester::parse_error(src);
    assert!(msg.contains("Unknown type: !bril.box"));
}

#[test]
fn parse_undefined_block() {
    Tester::init_tracing();
    let src = indoc! {r#"
    bril.func @main() {
      "bril.jmp"()[^nowhere] : () -> ()
    }
    "#};
    let msg = Tester::parse_error(src);
    assert!(msg.contains("reference to an undefined block ^nowhere"));
}

#[test]
fn parse_result_count_mismatch() {
    Tester::init_tracing();
    let src = r#"%0, %1 = "bril.undef"() : () -> i64"#;
    let msg = Tester::parse_error(src);
    assert!(msg.contains("operation defines 1 results but was provided 2 to bind"));
}

#[test]
fn parse_float_exponent() {
    Tester::init_tracing();
    let src = indoc! {r#"
    bril.func @main() {
      %0 = "bril.const"() {value = 100000000000000000000.0 : f64} : () -> f64
      %1 = "bril.const"() {value = 1.5e-7 : f64} : () -> f64
      "bril.ret"() : () -> ()
    }
    "#};
    let expected = indoc! {r#"
    %0 = "bril.const"() {value = 1e20 : f64} : () -> f64
    %1 = "bril.const"() {value = 1.5e-7 : f64} : () -> f64
    "#};
    let (_module, actual) = Tester::parse(src);
    Tester::check_lines_contain(&actual, expected, Location::caller());

    let (_module, reprinted) = Tester::parse(&actual);
    assert_eq!(reprinted, actual);
}

#[test]
fn parse_missing_operand_comma() {
    Tester::init_tracing();
    let src = indoc! {r#"
    bril.func @main(%a : i64, %b : i64) {
      %0 = "bril.add"(%a %b) : (i64, i64) -> i64
      "bril.ret"() : () -> ()
    }
    "#};
    let msg = Tester::parse_error(src);
    assert!(msg.contains("Expected RParen, but got \"%b\" of kind PercentIdentifier"));
}

/// One minimal valid instance of every op in the dialect. Each instance is
/// followed by `bril.ret` unless it is a terminator itself.
const ALL_OPS: &[(&str, &str)] = &[
    ("bril.const", r#"%0 = "bril.const"() {value = 1 : i64} : () -> i64"#),
    ("bril.add", r#"%0 = "bril.add"(%a, %b) : (i64, i64) -> i64"#),
    ("bril.sub", r#"%0 = "bril.sub"(%a, %b) : (i64, i64) -> i64"#),
    ("bril.mul", r#"%0 = "bril.mul"(%a, %b) : (i64, i64) -> i64"#),
    ("bril.div", r#"%0 = "bril.div"(%a, %b) : (i64, i64) -> i64"#),
    ("bril.eq", r#"%0 = "bril.eq"(%a, %b) : (i64, i64) -> i1"#),
    ("bril.lt", r#"%0 = "bril.lt"(%a, %b) : (i64, i64) -> i1"#),
    ("bril.gt", r#"%0 = "bril.gt"(%a, %b) : (i64, i64) -> i1"#),
    ("bril.le", r#"%0 = "bril.le"(%a, %b) : (i64, i64) -> i1"#),
    ("bril.ge", r#"%0 = "bril.ge"(%a, %b) : (i64, i64) -> i1"#),
    ("bril.not", r#"%0 = "bril.not"(%c) : (i1) -> i1"#),
    ("bril.and", r#"%0 = "bril.and"(%c, %c) : (i1, i1) -> i1"#),
    ("bril.or", r#"%0 = "bril.or"(%c, %c) : (i1, i1) -> i1"#),
    ("bril.id", r#"%0 = "bril.id"(%a) : (i64) -> i64"#),
    ("bril.undef", r#"%0 = "bril.undef"() : () -> i64"#),
    ("bril.nop", r#""bril.nop"() : () -> ()"#),
    ("bril.print", r#""bril.print"(%a, %c) : (i64, i1) -> ()"#),
    ("bril.alloc", r#"%0 = "bril.alloc"(%a) : (i64) -> !bril.ptr<i64>"#),
    ("bril.free", r#""bril.free"(%p) : (!bril.ptr<i64>) -> ()"#),
    ("bril.store", r#""bril.store"(%p, %a) : (!bril.ptr<i64>, i64) -> ()"#),
    ("bril.load", r#"%0 = "bril.load"(%p) : (!bril.ptr<i64>) -> i64"#),
    (
        "bril.ptr_add",
        r#"%0 = "bril.ptr_add"(%p, %a) : (!bril.ptr<i64>, i64) -> !bril.ptr<i64>"#,
    ),
    ("bril.call", r#"%0 = "bril.call"(%a) {callee = @f} : (i64) -> i64"#),
    ("bril.jmp", r#""bril.jmp"()[^exit] : () -> ()"#),
    ("bril.br", r#""bril.br"(%c)[^exit, ^exit] : (i1) -> ()"#),
    ("bril.ret", r#""bril.ret"() : () -> ()"#),
];

#[test]
fn parse_all_operations() {
    Tester::init_tracing();
    for (name, line) in ALL_OPS {
        let tail = match *name {
            "bril.ret" => "",
            "bril.jmp" | "bril.br" => "\n^exit:\n  \"bril.ret\"() : () -> ()",
            _ => "\n  \"bril.ret\"() : () -> ()",
        };
        let src = format!(
            "bril.func @main(%a : i64, %b : i64, %c : i1, %p : !bril.ptr<i64>) {{\n  {line}{tail}\n}}"
        );
        let (module, actual) = Tester::parse(&src);
        assert!(actual.contains(line), "{name} was printed as:\n{actual}");
        let messages = Tester::verify_messages(&module);
        assert!(messages.is_empty(), "{name} failed to verify: {messages:?}");

        let func = module.rd().ops()[0].clone();
        let op = func.rd().ops()[0].clone();
        assert_eq!(op.rd().name().name(), *name);
    }
}

#[test]
fn parse_misspelled_operations() {
    Tester::init_tracing();
    for name in ["bril.addd", "bril.nonexistent", "bril", "bril.Add"] {
        let src = format!(r#"%0 = "{name}"() : () -> i64"#);
        let msg = Tester::parse_error(&src);
        assert!(
            msg.contains(&format!("Unknown operation: {name}")),
            "{name}: {msg}"
        );
    }
}
