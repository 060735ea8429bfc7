//! Motion program: the sole output artifact of a compile.

use crate::tool::ToolId;
use std::fmt;

/// Return to origin followed by the two end-of-job markers
pub const FOOTER: [&str; 3] = ["U0,0;", "@;", "@;"];

/// One body command in device units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionCommand {
    /// Tool change
    SelectTool(ToolId),
    /// Travel with the tool raised
    PenUp { x: i64, y: i64 },
    /// Cutting or drawing move
    PenDown { x: i64, y: i64 },
}

impl MotionCommand {
    /// Device coordinates of a motion, `None` for tool changes
    pub fn position(&self) -> Option<(i64, i64)> {
        match *self {
            Self::PenUp { x, y } | Self::PenDown { x, y } => Some((x, y)),
            Self::SelectTool(_) => None,
        }
    }
}

impl fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelectTool(tool) => f.write_str(tool.select_token()),
            Self::PenUp { x, y } => write!(f, "U{},{};", x, y),
            Self::PenDown { x, y } => write!(f, "D{},{};", x, y),
        }
    }
}

/// Header tokens, body commands and footer tokens, in emission order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MotionProgram {
    header: Vec<String>,
    body: Vec<MotionCommand>,
    footer: Vec<String>,
}

impl MotionProgram {
    /// Starts a program with the given preamble
    pub fn with_header(header: Vec<String>) -> Self {
        Self {
            header,
            body: Vec::new(),
            footer: Vec::new(),
        }
    }

    pub fn push(&mut self, command: MotionCommand) {
        self.body.push(command);
    }

    /// Appends the fixed footer; further pushes are a logic error
    pub fn finish(&mut self) {
        self.footer = FOOTER.iter().map(|s| s.to_string()).collect();
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn body(&self) -> &[MotionCommand] {
        &self.body
    }

    pub fn footer(&self) -> &[String] {
        &self.footer
    }

    /// Number of pen-up and pen-down commands
    pub fn motion_count(&self) -> usize {
        self.body.iter().filter(|c| c.position().is_some()).count()
    }

    /// Tools in the order they are selected
    pub fn tool_sequence(&self) -> Vec<ToolId> {
        self.body
            .iter()
            .filter_map(|c| match c {
                MotionCommand::SelectTool(tool) => Some(*tool),
                _ => None,
            })
            .collect()
    }

    /// Every token as it appears on the wire
    pub fn tokens(&self) -> impl Iterator<Item = String> + '_ {
        self.header
            .iter()
            .cloned()
            .chain(self.body.iter().map(|c| c.to_string()))
            .chain(self.footer.iter().cloned())
    }

    /// Newline-joined program text
    pub fn render(&self) -> String {
        self.tokens().collect::<Vec<_>>().join("\n")
    }
}

impl fmt::Display for MotionProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
