use crate::ir::Attributes;
use crate::ir::OpOperand;
use crate::ir::OpOperands;
use crate::ir::Region;
use crate::ir::Type;
use crate::ir::Types;
use crate::ir::Value;
use crate::ir::Values;
use crate::parser::Location;
use crate::shared::Shared;
use crate::shared::SharedExt;
use std::fmt::Display;
use std::fmt::Formatter;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct OperationName {
    name: String,
}

impl OperationName {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
    pub fn name(&self) -> String {
        self.name.clone()
    }
}

impl Display for OperationName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.name.is_empty() {
            return write!(f, "<unknown>");
        }
        write!(f, "{}", self.name)
    }
}

/// Generic representation of every operation.
///
/// Note that MLIR distinguishes between Operation and Op. Operation generically
/// models all operations. Op is an interface for more specific operations
/// such as `LoadOp`, which do not hold fields apart from the `operation`
/// since everything is accessed via the [Operation].
#[derive(Clone, Default)]
pub struct Operation {
    name: OperationName,
    /// Function arguments (only set for function-like ops).
    arguments: Values,
    operands: OpOperands,
    attributes: Attributes,
    results: Values,
    /// Labels of the blocks this operation may branch to (e.g., `^bb1`).
    successors: Vec<String>,
    region: Option<Shared<Region>>,
    /// `None` for operations that were not parsed from source.
    location: Option<Location>,
}

impl Default for OperationName {
    fn default() -> Self {
        OperationName::new("")
    }
}

impl Operation {
    pub fn name(&self) -> OperationName {
        self.name.clone()
    }
    pub fn arguments(&self) -> Values {
        self.arguments.clone()
    }
    pub fn operands(&self) -> &OpOperands {
        &self.operands
    }
    pub fn operand(&self, index: usize) -> Option<OpOperand> {
        self.operands.get(index).cloned()
    }
    pub fn operand_types(&self) -> Types {
        self.operands.types()
    }
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
    pub fn results(&self) -> Values {
        self.results.clone()
    }
    pub fn result(&self, index: usize) -> Option<Shared<Value>> {
        self.results.get(index)
    }
    /// Type of the result at `index`, if there is such a result.
    pub fn result_type(&self, index: usize) -> Option<Type> {
        self.result(index).map(|result| result.rd().typ())
    }
    pub fn result_types(&self) -> Types {
        self.results.types()
    }
    pub fn successors(&self) -> &Vec<String> {
        &self.successors
    }
    pub fn region(&self) -> Option<Shared<Region>> {
        self.region.clone()
    }
    pub fn location(&self) -> Option<Location> {
        self.location
    }
    pub fn set_name(&mut self, name: OperationName) {
        self.name = name;
    }
    pub fn set_arguments(&mut self, arguments: Values) {
        self.arguments = arguments;
    }
    pub fn set_operands(&mut self, operands: OpOperands) {
        self.operands = operands;
    }
    pub fn set_attributes(&mut self, attributes: Attributes) {
        self.attributes = attributes;
    }
    pub fn set_results(&mut self, results: Values) {
        self.results = results;
    }
    pub fn set_successors(&mut self, successors: Vec<String>) {
        self.successors = successors;
    }
    pub fn set_region(&mut self, region: Option<Shared<Region>>) {
        self.region = region;
    }
    pub fn set_location(&mut self, location: Option<Location>) {
        self.location = location;
    }
    /// Display the results of the operation (e.g., `%0 = `).
    pub fn display_results(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if !self.results.is_empty() {
            write!(f, "{} = ", self.results)?;
        }
        Ok(())
    }
    /// Display the operation in the generic form, for example:
    ///
    /// ```mlir
    /// %0 = "bril.load"(%ptr) : (!bril.ptr<i64>) -> i64
    /// ```
    pub fn display(&self, f: &mut Formatter<'_>, indent: i32) -> std::fmt::Result {
        self.display_results(f)?;
        write!(f, "\"{}\"({})", self.name, self.operands)?;
        if !self.successors.is_empty() {
            write!(f, "[{}]", self.successors.join(", "))?;
        }
        write!(f, "{}", self.attributes)?;
        write!(f, " : ({}) -> ", self.operand_types())?;
        let result_types = self.result_types();
        if result_types.len() == 1 {
            write!(f, "{result_types}")?;
        } else {
            write!(f, "({result_types})")?;
        }
        if let Some(region) = &self.region {
            region.rd().display(f, indent)?;
        }
        Ok(())
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f, 0)
    }
}
