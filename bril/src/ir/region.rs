use crate::ir::Block;
use crate::ir::Op;
use crate::shared::Shared;
use crate::shared::SharedExt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::RwLock;

/// A list of blocks.
#[derive(Default)]
pub struct Region {
    blocks: Vec<Shared<Block>>,
}

impl Region {
    pub fn new(blocks: Vec<Shared<Block>>) -> Self {
        Self { blocks }
    }
    pub fn blocks(&self) -> &Vec<Shared<Block>> {
        &self.blocks
    }
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
    pub fn add_block(&mut self, block: Block) -> Shared<Block> {
        let block: Shared<Block> = Shared::new(RwLock::new(block));
        self.blocks.push(block.clone());
        block
    }
    /// All ops of all blocks, in order.
    pub fn ops(&self) -> Vec<Shared<dyn Op>> {
        let mut result = Vec::new();
        for block in self.blocks.iter() {
            for op in block.rd().ops().iter() {
                result.push(op.clone());
            }
        }
        result
    }
    pub fn display(&self, f: &mut Formatter<'_>, indent: i32) -> std::fmt::Result {
        writeln!(f, " {{")?;
        for block in self.blocks.iter() {
            block.rd().display(f, indent + 1)?;
        }
        let spaces = crate::ir::spaces(indent);
        write!(f, "{spaces}}}")
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f, 0)
    }
}
