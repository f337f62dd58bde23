use crate::ir::Type;
use crate::ir::Types;
use crate::shared::Shared;
use crate::shared::SharedExt;
use std::fmt::Display;
use std::fmt::Formatter;

/// An argument of a function, such as `%arg0 : i64` in
/// `func.func @inc(%arg0 : i64) -> i64`.
pub struct BlockArgument {
    name: String,
    typ: Type,
}

impl BlockArgument {
    pub fn new(name: &str, typ: Type) -> Self {
        BlockArgument {
            name: name.to_string(),
            typ,
        }
    }
}

impl Display for BlockArgument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} : {}", self.name, self.typ)
    }
}

/// A named result of an operation.
///
/// For example, in
/// ```mlir
/// %0 = "bril.add"(%1, %2) : (i64, i64) -> i64
/// ```
/// `%0` is the result and `i64` its type.
pub struct OpResult {
    name: String,
    typ: Type,
}

impl OpResult {
    pub fn new(name: &str, typ: Type) -> Self {
        OpResult {
            name: name.to_string(),
            typ,
        }
    }
}

/// An SSA value that operands can point to.
pub enum Value {
    BlockArgument(BlockArgument),
    OpResult(OpResult),
}

impl Value {
    pub fn name(&self) -> String {
        match self {
            Value::BlockArgument(arg) => arg.name.clone(),
            Value::OpResult(result) => result.name.clone(),
        }
    }
    pub fn typ(&self) -> Type {
        match self {
            Value::BlockArgument(arg) => arg.typ.clone(),
            Value::OpResult(result) => result.typ.clone(),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::BlockArgument(arg) => write!(f, "{arg}"),
            Value::OpResult(result) => write!(f, "{}", result.name),
        }
    }
}

/// A use of a [Value] by an operation.
#[derive(Clone)]
pub struct OpOperand {
    value: Shared<Value>,
}

impl OpOperand {
    pub fn new(value: Shared<Value>) -> Self {
        OpOperand { value }
    }
    pub fn value(&self) -> Shared<Value> {
        self.value.clone()
    }
    pub fn name(&self) -> String {
        self.value.rd().name()
    }
    /// The static type of the used value.
    pub fn typ(&self) -> Type {
        self.value.rd().typ()
    }
}

impl Display for OpOperand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The results (or function arguments) of an operation.
#[derive(Clone, Default)]
pub struct Values {
    values: Vec<Shared<Value>>,
}

impl Values {
    pub fn from_vec(values: Vec<Shared<Value>>) -> Self {
        Values { values }
    }
    pub fn vec(&self) -> &Vec<Shared<Value>> {
        &self.values
    }
    pub fn get(&self, index: usize) -> Option<Shared<Value>> {
        self.values.get(index).cloned()
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    pub fn types(&self) -> Types {
        Types::from_vec(self.values.iter().map(|v| v.rd().typ()).collect())
    }
}

impl Display for Values {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .values
            .iter()
            .map(|v| v.rd().to_string())
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, "{joined}")
    }
}

/// The operands of an operation.
#[derive(Clone, Default)]
pub struct OpOperands {
    operands: Vec<OpOperand>,
}

impl OpOperands {
    pub fn from_vec(operands: Vec<OpOperand>) -> Self {
        OpOperands { operands }
    }
    pub fn vec(&self) -> &Vec<OpOperand> {
        &self.operands
    }
    pub fn get(&self, index: usize) -> Option<&OpOperand> {
        self.operands.get(index)
    }
    pub fn len(&self) -> usize {
        self.operands.len()
    }
    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }
    pub fn types(&self) -> Types {
        Types::from_vec(self.operands.iter().map(|o| o.typ()).collect())
    }
}

impl Display for OpOperands {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .operands
            .iter()
            .map(|o| o.to_string())
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, "{joined}")
    }
}
