//! Drive a program over lines of input

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::PathBuf,
};

use super::{CliError, ErrorPolicy, OutputMode, RunOptions};
use crate::{
    EvalError,
    ast::{Program, Rule},
    environment::{Environment, Row},
    output,
};

/// Counts gathered over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Lines read across all inputs
    pub lines: usize,
    /// Rule selections that held, summed over lines
    pub matches: usize,
    /// Rule failures skipped under [`ErrorPolicy::Continue`]
    pub errors: usize,
    /// Input files that could not be opened
    pub unreadable: usize,
}

/// Applies every rule of a program to each line, in order.
pub struct Runner<'p> {
    program: &'p Program,
    options: RunOptions,
}

impl<'p> Runner<'p> {
    pub fn new(program: &'p Program, options: RunOptions) -> Self {
        Runner { program, options }
    }

    /// Processes each input file in turn, or stdin when there are none.
    /// Files that can't be opened are reported and skipped.
    pub fn run<W: Write>(&self, inputs: &[PathBuf], out: &mut W) -> Result<RunSummary, CliError> {
        let mut summary = RunSummary::default();

        if inputs.is_empty() {
            let stdin = io::stdin();
            self.process_reader(stdin.lock(), out, &mut summary)?;
            return Ok(summary);
        }

        for path in inputs {
            let file = match File::open(path) {
                Ok(file) => file,
                Err(e) => {
                    eprintln!("can't read {}: {}", path.display(), e);
                    summary.unreadable += 1;
                    continue;
                }
            };
            tracing::info!(path = %path.display(), "reading input");
            self.process_reader(BufReader::new(file), out, &mut summary)?;
        }
        Ok(summary)
    }

    /// Processes one input. Line numbers start at 0 for every input.
    /// Line endings (`\n` or `\r\n`) are stripped; bytes that aren't UTF-8
    /// are replaced rather than rejected.
    pub fn process_reader<R: BufRead, W: Write>(
        &self,
        mut reader: R,
        out: &mut W,
        summary: &mut RunSummary,
    ) -> Result<(), CliError> {
        let mut buffer = Vec::new();
        let mut line_number = 0;
        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                break;
            }
            if buffer.last() == Some(&b'\n') {
                buffer.pop();
                if buffer.last() == Some(&b'\r') {
                    buffer.pop();
                }
            }
            let line = String::from_utf8_lossy(&buffer);
            self.process_line(line_number, &line, out, summary)?;
            line_number += 1;
        }
        out.flush()?;
        Ok(())
    }

    /// Applies every rule to a single line.
    pub fn process_line<W: Write>(
        &self,
        line_number: usize,
        line: &str,
        out: &mut W,
        summary: &mut RunSummary,
    ) -> Result<(), CliError> {
        let row = Row::from_line(line_number, line);
        let env = Environment::with_row(&row);
        let mut matched = Vec::new();
        summary.lines += 1;

        for (index, rule) in self.program.rules.iter().enumerate() {
            let selected = match rule.evaluate(&env) {
                Ok(selected) => selected,
                Err(e) => {
                    self.rule_failed(rule, e, summary)?;
                    continue;
                }
            };
            if !selected {
                continue;
            }

            tracing::trace!(line = line_number, rule = index, "rule selected line");
            matched.push(index);
            summary.matches += 1;
            if self.options.mode == OutputMode::Execute
                && let Err(e) = rule.execute_to(&env, out)
            {
                self.rule_failed(rule, e, summary)?;
            }
        }

        if self.options.mode == OutputMode::Report {
            writeln!(out, "{}", output::report_entry(&row, &matched))?;
        }
        Ok(())
    }

    fn rule_failed(
        &self,
        rule: &Rule,
        error: EvalError,
        summary: &mut RunSummary,
    ) -> Result<(), CliError> {
        match self.options.on_error {
            ErrorPolicy::Abort => Err(CliError::Rule {
                rule: rule.to_string(),
                source: error,
            }),
            ErrorPolicy::Continue => {
                eprintln!("could not evaluate rule {}: {}", rule, error);
                summary.errors += 1;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_program;

    fn run(
        script: &str,
        input: &str,
        options: RunOptions,
    ) -> Result<(String, RunSummary), CliError> {
        let program = parse_program(script)?;
        let runner = Runner::new(&program, options);
        let mut out = Vec::new();
        let mut summary = RunSummary::default();
        runner.process_reader(input.as_bytes(), &mut out, &mut summary)?;
        Ok((String::from_utf8(out).unwrap(), summary))
    }

    #[test]
    fn strips_crlf_and_counts_lines() {
        let (out, summary) =
            run("{ println(%#, %1) }", "a x\r\nb y\nc", RunOptions::default()).unwrap();
        assert_eq!(out, "0 a\n1 b\n2 c\n");
        assert_eq!(summary.lines, 3);
        assert_eq!(summary.matches, 3);
    }

    #[test]
    fn abort_stops_at_first_failure() {
        let err = run("{ notarealfunc() }", "one\ntwo\n", RunOptions::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "could not evaluate rule { notarealfunc() }: \
             unknown function \"notarealfunc\" at line 1, column 3"
        );
    }

    #[test]
    fn continue_keeps_going() {
        let options = RunOptions {
            on_error: ErrorPolicy::Continue,
            ..RunOptions::default()
        };
        let (out, summary) =
            run("{ notarealfunc() }; { println(%1) }", "one\ntwo\n", options).unwrap();
        assert_eq!(out, "one\ntwo\n");
        assert_eq!(summary.errors, 2);
    }

    #[test]
    fn report_mode_lists_matching_rules() {
        let options = RunOptions {
            mode: OutputMode::Report,
            ..RunOptions::default()
        };
        let (out, _) = run("%1 > 5; /b/", "7 b\n3 a\n", options).unwrap();
        assert_eq!(
            out,
            concat!(
                "{\"line\":0,\"matched\":[0,1],\"text\":\"7 b\"}\n",
                "{\"line\":1,\"matched\":[],\"text\":\"3 a\"}\n",
            )
        );
    }
}
