// Released under MIT License.
// Copyright (c) 2023-2025 Ladislav Bartos

//! Implementation of ProgressPrinter structure for printing the progress of trajectory reading.

use colored::{ColoredString, Colorize};
use std::io::Write;

/// Progress of trajectory reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressStatus {
    /// Trajectory reading is in progress.
    Running,
    /// Trajectory has been read completely.
    Completed,
    /// Trajectory reading failed.
    Failed,
}

/// Status label printed at the start of each progress line.
/// The label can be at most 9 characters long.
#[derive(Debug, Clone, PartialEq)]
struct ProgressMessage {
    msg: ColoredString,
}

impl ProgressMessage {
    /// ## Panics
    /// Panics if the string is longer than 9 characters.
    fn new(string: ColoredString) -> Self {
        if string.chars().count() > 9 {
            panic!("FATAL FLEXAN ERROR | ProgressMessage::new | `ProgressMessage` can not be longer than 9 characters.");
        }

        ProgressMessage { msg: string }
    }

    fn print(&self, out: &mut dyn Write, colored: bool) {
        let result = if colored {
            write!(out, "[{: ^9}]   ", self.msg)
        } else {
            write!(out, "[{: ^9}]   ", self.msg.as_ref() as &str)
        };

        result.expect(
            "FATAL FLEXAN ERROR | ProgressMessage::print | Could not write to `ProgressPrinter` stream.",
        );
    }
}

/// Structure handling printing of progress of reading a trajectory file.
/// Constructed using `ProgressPrinter::new()` and associated with a trajectory reader
/// using `TrajReader::print_progress()`.
pub struct ProgressPrinter {
    /// Stream to write the progress info to. Default: standard error output.
    output: Box<dyn Write>,
    /// Current status of reading. Default: ProgressStatus::Running.
    status: ProgressStatus,
    /// Frequency of printing. Print every `print_freq`th frame. Default: 100 frames.
    print_freq: usize,
    /// If true, the output will be colored. Default: true.
    colored: bool,
    step_msg: ColoredString,
    time_msg: ColoredString,
    running_msg: ProgressMessage,
    completed_msg: ProgressMessage,
    failed_msg: ProgressMessage,
    /// String terminating the progress message. Default: `\r` (carriage return).
    terminating: String,
}

impl ProgressPrinter {
    /// Create an instance of `ProgressPrinter` with default parameters.
    ///
    /// ## Example
    /// ```no_run
    /// use flexan::prelude::*;
    ///
    /// // print info every 500th trajectory frame read, without colors
    /// let printer = ProgressPrinter::new()
    ///     .with_print_freq(500)
    ///     .with_colored(false);
    /// ```
    pub fn new() -> Self {
        ProgressPrinter {
            output: Box::from(std::io::stderr()),
            status: ProgressStatus::Running,
            print_freq: 100,
            colored: true,
            step_msg: "Step".cyan(),
            time_msg: "Time".bright_purple(),
            running_msg: ProgressMessage::new("RUNNING".yellow()),
            completed_msg: ProgressMessage::new("COMPLETED".green()),
            failed_msg: ProgressMessage::new("FAILED!".red()),
            terminating: String::from("\r"),
        }
    }

    /// Create new `ProgressPrinter` with specific `output` stream.
    pub fn with_output(mut self, stream: Box<dyn Write>) -> Self {
        self.output = stream;
        self
    }

    /// Create new `ProgressPrinter` with specific value for `print_freq`.
    /// A frequency of 0 is treated as 1.
    pub fn with_print_freq(mut self, print_freq: usize) -> Self {
        self.print_freq = print_freq.max(1);
        self
    }

    /// Create new `ProgressPrinter` with specific value for `colored`.
    pub fn with_colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// Create new `ProgressPrinter` with specific value for `running_msg`.
    ///
    /// ## Panics
    /// Panics if the `running_msg` is longer than 9 characters.
    pub fn with_running_msg(mut self, running_msg: ColoredString) -> Self {
        self.running_msg = ProgressMessage::new(running_msg);
        self
    }

    /// Create new `ProgressPrinter` with specific value for `terminating`.
    pub fn with_terminating(mut self, string: &str) -> Self {
        self.terminating = string.to_string();
        self
    }

    /// Set new status to an already constructed `ProgressPrinter`.
    pub fn set_status(&mut self, status: ProgressStatus) {
        self.status = status;
    }

    /// Print progress info about trajectory reading.
    /// While reading is running, only every `print_freq`th frame is reported.
    pub fn print(&mut self, frame_number: usize, sim_step: u64, sim_time: f32) {
        if self.status == ProgressStatus::Running && frame_number % self.print_freq != 0 {
            return;
        }

        match self.status {
            ProgressStatus::Running => self.running_msg.print(&mut self.output, self.colored),
            ProgressStatus::Completed => self.completed_msg.print(&mut self.output, self.colored),
            ProgressStatus::Failed => self.failed_msg.print(&mut self.output, self.colored),
        }

        let result = if self.colored {
            write!(
                self.output,
                "{} {:12} | {} {:12} ps{}",
                self.step_msg, sim_step, self.time_msg, sim_time as u64, self.terminating
            )
        } else {
            write!(
                self.output,
                "{} {:12} | {} {:12} ps{}",
                self.step_msg.as_ref() as &str,
                sim_step,
                self.time_msg.as_ref() as &str,
                sim_time as u64,
                self.terminating
            )
        };
        result.expect(
            "FATAL FLEXAN ERROR | ProgressPrinter::print (1) | Could not write to `ProgressPrinter` stream.",
        );

        if self.status != ProgressStatus::Running && self.terminating != "\n" {
            writeln!(self.output).expect(
                "FATAL FLEXAN ERROR | ProgressPrinter::print (2) | Could not write to `ProgressPrinter` stream.",
            );
        }

        self.output.flush().expect(
            "FATAL FLEXAN ERROR | ProgressPrinter::print (3) | Could not flush `ProgressPrinter` stream.",
        );
    }
}

impl Default for ProgressPrinter {
    fn default() -> Self {
        Self::new()
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
