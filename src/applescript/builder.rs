// src/applescript/builder.rs

//! Small builder for the AppleScript that drives a target application.
//!
//! ```text
//! ScriptBuilder::new()
//!     .tell("Adobe InDesign CC 2014")
//!     .timeout(1800)
//!     .assign("functionName", "echo")
//!     .run_payload("/tmp/stage/bridge_test.jsx", &["functionName"])
//!     .render()
//! ```
//!
//! Statements are kept in two lists: `head` in authoring order, and `tail`
//! holding the closers of every opened scope, newest first.

use std::collections::VecDeque;
use std::fmt;

use crate::applescript::encoder::{self, EncodedLiteral, EncodingOptions};
use crate::types::InvocationStyle;

/// The right-hand side of a `set` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignValue {
    Integer(i64),
    Literal(EncodedLiteral),
    /// `<variable> & <literal>`, appending a chunk to a previous value.
    Append(EncodedLiteral),
}

/// One line of a synthesized script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStatement {
    EnterApplicationScope(String),
    ExitApplicationScope,
    EnterTimeoutScope(u32),
    ExitTimeoutScope,
    AssignVariable {
        name: String,
        value: AssignValue,
    },
    InvokeFile {
        path: String,
        arguments: Vec<String>,
        style: InvocationStyle,
    },
}

impl fmt::Display for ScriptStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptStatement::EnterApplicationScope(name) => {
                write!(f, "tell application {}", encoder::quote(name))
            }
            ScriptStatement::ExitApplicationScope => f.write_str("end tell"),
            ScriptStatement::EnterTimeoutScope(seconds) => {
                write!(f, "with timeout of {seconds} seconds")
            }
            ScriptStatement::ExitTimeoutScope => f.write_str("end timeout"),
            ScriptStatement::AssignVariable { name, value } => match value {
                AssignValue::Integer(n) => write!(f, "set {name} to {n}"),
                AssignValue::Literal(lit) => write!(f, "set {name} to {lit}"),
                AssignValue::Append(lit) => write!(f, "set {name} to {name} & {lit}"),
            },
            ScriptStatement::InvokeFile {
                path,
                arguments,
                style,
            } => {
                let args = arguments.join(", ");
                match style {
                    InvocationStyle::DoScript => write!(
                        f,
                        "do script (POSIX file {}) language javascript with arguments {{ {args} }} undo mode fast entire script",
                        encoder::quote(path)
                    ),
                    InvocationStyle::EvalFile => {
                        let eval = format!("$.evalFile('{}')", path.replace('\'', "\\'"));
                        write!(f, "do javascript {} with arguments {{ {args} }}", encoder::quote(&eval))
                    }
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScriptBuilder {
    head: Vec<ScriptStatement>,
    tail: VecDeque<ScriptStatement>,
    style: InvocationStyle,
    options: EncodingOptions,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_encoding(mut self, options: EncodingOptions) -> Self {
        self.options = options;
        self
    }

    /// Open a `tell application` block.
    ///
    /// Also selects the invocation style the application understands; call
    /// [`ScriptBuilder::invocation_style`] afterwards to override it.
    pub fn tell(mut self, application: &str) -> Self {
        self.style = InvocationStyle::for_application(application);
        self.open_scope(
            ScriptStatement::EnterApplicationScope(application.to_string()),
            ScriptStatement::ExitApplicationScope,
        );
        self
    }

    pub fn invocation_style(mut self, style: InvocationStyle) -> Self {
        self.style = style;
        self
    }

    /// Open a `with timeout` block.
    pub fn timeout(mut self, seconds: u32) -> Self {
        self.open_scope(
            ScriptStatement::EnterTimeoutScope(seconds),
            ScriptStatement::ExitTimeoutScope,
        );
        self
    }

    pub fn assign_int(mut self, variable: &str, value: i64) -> Self {
        self.head.push(ScriptStatement::AssignVariable {
            name: variable.to_string(),
            value: AssignValue::Integer(value),
        });
        self
    }

    /// Assign a string, splitting it across several statements when it is
    /// too long for one literal.
    pub fn assign(mut self, variable: &str, content: &str) -> Self {
        let len = content.chars().count();
        let literal = encoder::encode_literal(content, self.options.literal_max_len);

        if literal.is_quoted() || len <= self.options.single_literal_max_len {
            self.push_assign(variable, AssignValue::Literal(literal));
            return self;
        }

        let mut chunks = encoder::split_into_chunks(content, self.options.chunk_size).into_iter();
        if let Some(first) = chunks.next() {
            self.push_assign(variable, AssignValue::Literal(first));
        }
        for chunk in chunks {
            self.push_assign(variable, AssignValue::Append(chunk));
        }
        self
    }

    /// Hand control to the payload file, passing the named variables.
    pub fn run_payload(mut self, path: &str, arguments: &[&str]) -> Self {
        self.head.push(ScriptStatement::InvokeFile {
            path: path.to_string(),
            arguments: arguments.iter().map(|a| a.to_string()).collect(),
            style: self.style,
        });
        self
    }

    pub fn statements(&self) -> impl Iterator<Item = &ScriptStatement> {
        self.head.iter().chain(self.tail.iter())
    }

    /// Render all statements, one per line.
    pub fn render(&self) -> String {
        let mut script = String::new();
        for statement in self.statements() {
            script.push_str(&statement.to_string());
            script.push('\n');
        }
        script
    }

    fn open_scope(&mut self, open: ScriptStatement, close: ScriptStatement) {
        self.head.push(open);
        self.tail.push_front(close);
    }

    fn push_assign(&mut self, variable: &str, value: AssignValue) {
        self.head.push(ScriptStatement::AssignVariable {
            name: variable.to_string(),
            value,
        });
    }
}

impl fmt::Display for ScriptBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
