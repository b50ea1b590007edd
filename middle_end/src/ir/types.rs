//! IR type definitions
//!
//! This module defines the core data structures for the IR: a `Module` of
//! `Function`s, each holding its `BasicBlock`s in an arena indexed by
//! `BlockId`.

use crate::ir::instructions::Instruction;
use std::collections::HashMap;

/// A unique identifier for a basic block within its function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(pub usize);

/// An ordered sequence of instructions with a label
///
/// The label exists for diagnostics and the textual dump only; it is not
/// required to be unique. Once a block holds at least one instruction and is
/// abandoned as the insertion target, it must end with exactly one
/// terminator.
#[derive(Debug)]
pub struct BasicBlock {
    label: String,
    instructions: Vec<Instruction>,
}

impl BasicBlock {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            instructions: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Read-only ordered view of the block's instructions
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Append an instruction
    ///
    /// Panics if the block already ends in a terminator: nothing may follow
    /// a terminator, and hitting this is a bug in the lowering sequence,
    /// not a user error.
    pub fn push(&mut self, instruction: Instruction) {
        assert!(
            !self.is_terminated(),
            "appending to already-terminated block `{}`",
            self.label
        );
        self.instructions.push(instruction);
    }

    /// True iff the block is non-empty and its last instruction is a terminator
    pub fn is_terminated(&self) -> bool {
        self.instructions
            .last()
            .is_some_and(|instruction| instruction.is_terminator())
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// A function in the IR: named parameters plus a block arena with one entry
#[derive(Debug)]
pub struct Function {
    name: String,
    params: Vec<String>,
    blocks: Vec<BasicBlock>,
    entry: Option<BlockId>,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            blocks: Vec::new(),
            entry: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Formal parameter names in declaration order
    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn add_param(&mut self, name: impl Into<String>) {
        self.params.push(name.into());
    }

    pub fn add_block(&mut self, block: BasicBlock) -> BlockId {
        let id = BlockId(self.blocks.len());
        self.blocks.push(block);
        id
    }

    pub fn block(&self, id: BlockId) -> &BasicBlock {
        &self.blocks[id.0]
    }

    pub fn block_mut(&mut self, id: BlockId) -> &mut BasicBlock {
        &mut self.blocks[id.0]
    }

    /// Blocks in creation order
    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    /// Set the entry block; may only happen once per function
    pub fn set_entry(&mut self, id: BlockId) {
        assert!(
            self.entry.is_none(),
            "entry block of function `{}` is already set",
            self.name
        );
        self.entry = Some(id);
    }

    pub fn entry(&self) -> Option<BlockId> {
        self.entry
    }
}

/// A whole lowered program: functions keyed by name
///
/// Functions are kept in registration order so the textual dump is stable;
/// the name index sits beside them for lookup.
#[derive(Debug)]
pub struct Module {
    name: String,
    functions: Vec<Function>,
    index: HashMap<String, usize>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a function under its name; function names are unique
    pub fn register_function(&mut self, function: Function) -> Result<(), String> {
        if self.index.contains_key(function.name()) {
            return Err(format!(
                "function `{}` is already registered",
                function.name()
            ));
        }
        self.index
            .insert(function.name().to_string(), self.functions.len());
        self.functions.push(function);
        Ok(())
    }

    /// Look up a function by name
    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.index.get(name).map(|&i| &self.functions[i])
    }

    pub fn get_function_mut(&mut self, name: &str) -> Option<&mut Function> {
        let i = *self.index.get(name)?;
        Some(&mut self.functions[i])
    }

    /// Functions in registration order
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }
}
