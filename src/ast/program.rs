use std::fmt;

use crate::ast::Expr;
use crate::lexer::Position;
use crate::value::Value;

/// A whole script: rules in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub rules: Vec<Rule>,
}

impl Program {
    pub fn new(rules: Vec<Rule>) -> Self {
        Program { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", rule)?;
        }
        Ok(())
    }
}

/// Optional selection plus the block to run when it holds. A rule without a
/// selection runs for every line.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub selection: Option<Expr>,
    pub block: Block,
}

impl Rule {
    pub fn new(selection: Option<Expr>, block: Block) -> Self {
        Rule { selection, block }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(selection) = &self.selection {
            write!(f, "{} ", selection)?;
        }
        write!(f, "{}", self.block)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub commands: Vec<Command>,
}

impl Block {
    pub fn new(commands: Vec<Command>) -> Self {
        Block { commands }
    }
}

impl Default for Block {
    /// `{ println(%0) }`
    fn default() -> Self {
        Block {
            commands: vec![Command::new(
                "println",
                vec![Expr::Value(Value::var("%0"))],
                Position::default(),
            )],
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{ ")?;
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", command)?;
        }
        f.write_str(" }")
    }
}

/// A named command call. Names are only checked when the command runs, so a
/// script with a misspelled command still parses.
#[derive(Debug, Clone)]
pub struct Command {
    pub name: String,
    pub params: Vec<Expr>,
    /// Where the command name appeared in the script
    pub position: Position,
}

impl Command {
    pub fn new(name: impl Into<String>, params: Vec<Expr>, position: Position) -> Self {
        Command {
            name: name.into(),
            params,
            position,
        }
    }
}

// Position is bookkeeping for diagnostics, not part of a command's identity.
impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", param)?;
        }
        f.write_str(")")
    }
}
