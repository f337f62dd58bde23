use crate::diagnostic::Diagnostics;
use crate::ir::Op;
use crate::opt::init_subscriber;
use crate::parser::DefaultParserDispatch;
use crate::parser::Parser;
use crate::shared::Shared;
use crate::shared::SharedExt;
use crate::verify::verify;
use crate::verify::VerifyConfig;
use std::cmp::max;
use std::panic::Location;
use tracing::info;

pub struct Tester;

impl Tester {
    /// Initialize the subscriber for the tests.
    ///
    /// Cannot pass options, since the tests run concurrently.
    pub fn init_tracing() {
        let level = tracing::Level::INFO;
        match init_subscriber(level) {
            Ok(_) => (),
            Err(_e) => (),
        }
    }
    fn point_to_missing_line(expected: &str, index: usize) -> String {
        let mut result = String::new();
        result.push_str("A line is missing from the output:\n");
        result.push_str("```");
        for (i, line) in expected.lines().enumerate() {
            if i == index {
                let msg = format!("{line}   <== missing");
                result.push_str(&format!("\n{msg}"));
            } else {
                result.push_str(&format!("\n{line}"));
            }
        }
        result.push_str("\n```");
        result
    }
    /// Check that `actual` and `expected` are equal line by line.
    pub fn check_lines_exact(actual: &str, expected: &str, caller: &Location<'_>) {
        let actual = actual.trim();
        let expected = expected.trim();
        let l = max(actual.lines().count(), expected.lines().count());
        for i in 0..l {
            let Some(actual_line) = actual.lines().nth(i) else {
                panic!("Line {i} not found in output: called from {caller}");
            };
            let Some(expected_line) = expected.lines().nth(i) else {
                panic!("Unexpected line {i} in output: called from {caller}");
            };
            assert_eq!(actual_line, expected_line, "called from {}", caller);
        }
    }
    /// Check whether the expected lines are present in the actual output.
    ///
    /// The actual output may contain additional lines that are not in the
    /// expected output.
    pub fn check_lines_contain(actual: &str, expected: &str, caller: &Location<'_>) {
        let actual = actual.trim();
        let expected = expected.trim();
        let mut actual_index = 0;
        'outer: for i in 0..expected.lines().count() {
            let expected_line = expected.lines().nth(i).unwrap().trim();
            // If not skipping these, an empty line will match any line (which
            // can then cause the next expected line to be reported as missing).
            if expected_line.is_empty() {
                continue;
            }
            let start = actual_index;
            for j in start..actual.lines().count() {
                let actual_line = actual.lines().nth(j).unwrap();
                if actual_line.contains(expected_line) {
                    actual_index = j + 1;
                    continue 'outer;
                }
            }
            let msg = Self::point_to_missing_line(expected, i);
            panic!("{msg}\nwhen called from {caller}");
        }
    }
    fn print_heading(msg: &str, src: &str) {
        info!("{msg}:\n```\n{src}\n```\n");
    }
    /// Parse `src` and return the module with its printed form.
    pub fn parse(src: &str) -> (Shared<dyn Op>, String) {
        let src = src.trim();
        Self::print_heading("Before parse", src);
        let module = Parser::<DefaultParserDispatch>::parse(src).unwrap();
        let actual = module.rd().to_string();
        Self::print_heading("After parse", &actual);
        (module, actual)
    }
    /// Parse `src`, expecting a parse error, and return the error message.
    pub fn parse_error(src: &str) -> String {
        let src = src.trim();
        match Parser::<DefaultParserDispatch>::parse(src) {
            Ok(module) => panic!("Expected parse error, but got:\n{}", module.rd()),
            Err(err) => {
                let msg = err.to_string();
                Self::print_heading("Parse error", &msg);
                msg
            }
        }
    }
    /// Verify `op` without a diagnostics limit.
    pub fn verify(op: &Shared<dyn Op>) -> Diagnostics {
        let diagnostics = verify(&*op.rd(), &VerifyConfig::default());
        if !diagnostics.is_empty() {
            Self::print_heading("Diagnostics", &diagnostics.to_string());
        }
        diagnostics
    }
    /// Verify `op` and return the diagnostics as lines such as
    /// `loc(:2:3): error: 'bril.load' op ...`.
    pub fn verify_messages(op: &Shared<dyn Op>) -> Vec<String> {
        Self::verify(op).iter().map(|d| d.to_string()).collect()
    }
}
