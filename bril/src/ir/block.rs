use crate::ir::Op;
use crate::shared::Shared;
use crate::shared::SharedExt;
use std::fmt::Formatter;

/// A list of operations, optionally preceded by a label such as `^bb1:`.
///
/// The entry block of a region usually has no label.
#[derive(Default)]
pub struct Block {
    label: Option<String>,
    ops: Vec<Shared<dyn Op>>,
}

impl Block {
    pub fn new(label: Option<String>, ops: Vec<Shared<dyn Op>>) -> Self {
        Self { label, ops }
    }
    pub fn label(&self) -> Option<String> {
        self.label.clone()
    }
    pub fn ops(&self) -> &Vec<Shared<dyn Op>> {
        &self.ops
    }
    pub fn push(&mut self, op: Shared<dyn Op>) {
        self.ops.push(op);
    }
    pub fn display(&self, f: &mut Formatter<'_>, indent: i32) -> std::fmt::Result {
        if let Some(label) = &self.label {
            let spaces = crate::ir::spaces((indent - 1).max(0));
            writeln!(f, "{spaces}{label}:")?;
        }
        let spaces = crate::ir::spaces(indent);
        for op in self.ops.iter() {
            write!(f, "{spaces}")?;
            op.rd().display(f, indent)?;
            writeln!(f)?;
        }
        Ok(())
    }
}
