//! Test doubles.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::error::Error;
use crate::git::{CommandOutput, CommandRunner};

struct Expectation {
    program: String,
    args: Vec<String>,
    result: Result<CommandOutput, String>,
}

/// Scripted [`CommandRunner`] that expects invocations in order.
///
/// Any unexpected invocation panics, so a test also proves which commands
/// were *not* issued.
#[derive(Default)]
pub struct MockCommandRunner {
    expected: RefCell<VecDeque<Expectation>>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect `program args...` next, answering with `output`.
    pub fn expect(&mut self, program: &str, args: &[&str], output: CommandOutput) {
        self.push(program, args, Ok(output));
    }

    /// Expect `program args...` next, failing to spawn.
    pub fn expect_spawn_error(&mut self, program: &str, args: &[&str], message: &str) {
        self.push(program, args, Err(message.to_string()));
    }

    fn push(&mut self, program: &str, args: &[&str], result: Result<CommandOutput, String>) {
        self.expected.get_mut().push_back(Expectation {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            result,
        });
    }

    /// Arguments of every invocation so far.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// Panic if scripted invocations were never issued.
    pub fn assert_done(&self) {
        let remaining: Vec<String> = self
            .expected
            .borrow()
            .iter()
            .map(|e| format!("{} {}", e.program, e.args.join(" ")))
            .collect();
        assert!(remaining.is_empty(), "commands never issued: {:?}", remaining);
    }
}

impl CommandRunner for MockCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, Error> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.calls.borrow_mut().push(args.clone());

        let next = self
            .expected
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected command: {} {}", program, args.join(" ")));

        assert_eq!(next.program, program, "program mismatch");
        // Commit messages carry a timestamp; match commit by prefix only.
        if next.args.first().map(String::as_str) == Some("commit") {
            assert_eq!(&args[..2], &next.args[..2], "args mismatch");
        } else {
            assert_eq!(args, next.args, "args mismatch");
        }

        next.result.map_err(|message| Error::Spawn {
            program: program.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, message),
        })
    }
}
