//! Ordered voice command table
//!
//! Rules are substring predicates evaluated strictly in table order; the
//! first match wins and the order is the designed tie-break for utterances
//! that contain several keywords ("please use the red color brush" is a
//! tool command because the tool rules come first). Keywords, actions, and
//! feedback strings are part of the spoken UI and stay stable.

use crate::board::ToolType;

/// What a matched command does to the board
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandAction {
    /// Select a tool
    SelectTool(ToolType),
    /// Set the brush stroke color
    SetColor(&'static str),
    /// Set the brush width in pixels
    SetSize(f32),
    /// Set the board background color
    SetBackground(&'static str),
    /// Start the continuous drawing walk
    StartContinuous,
    /// Stop the continuous drawing walk
    StopContinuous,
    /// Wipe the board
    Clear,
}

/// One substring-matched rule in the command table
#[derive(Debug, Clone, Copy)]
pub struct CommandRule {
    /// Any of these substrings triggers the rule
    pub keywords: &'static [&'static str],

    /// Action executed on a match
    pub action: CommandAction,

    /// Feedback text returned to the speaker
    pub feedback: &'static str,
}

impl CommandRule {
    /// Whether an already-lowercased utterance triggers this rule
    #[must_use]
    pub fn matches(&self, utterance: &str) -> bool {
        self.keywords.iter().any(|k| utterance.contains(k))
    }
}

/// Feedback returned when no rule matches
pub const NOT_RECOGNIZED: &str =
    "Command not recognized. Try: 'pen', 'red color', 'large size', 'draw circle', etc.";

/// The ordered command table
pub const RULES: &[CommandRule] = &[
    // tools
    CommandRule {
        keywords: &["pen", "draw", "brush"],
        action: CommandAction::SelectTool(ToolType::Pen),
        feedback: "Pen tool selected",
    },
    CommandRule {
        keywords: &["eraser", "erase"],
        action: CommandAction::SelectTool(ToolType::Eraser),
        feedback: "Eraser tool selected",
    },
    CommandRule {
        keywords: &["text", "type"],
        action: CommandAction::SelectTool(ToolType::Text),
        feedback: "Text tool selected",
    },
    CommandRule {
        keywords: &["line"],
        action: CommandAction::SelectTool(ToolType::Line),
        feedback: "Line tool selected",
    },
    CommandRule {
        keywords: &["rectangle", "rect", "square"],
        action: CommandAction::SelectTool(ToolType::Rect),
        feedback: "Rectangle tool selected",
    },
    CommandRule {
        keywords: &["circle", "ellipse", "oval"],
        action: CommandAction::SelectTool(ToolType::Ellipse),
        feedback: "Circle tool selected",
    },
    // colors
    CommandRule {
        keywords: &["red color", "make it red"],
        action: CommandAction::SetColor("#ff0000"),
        feedback: "Color changed to red",
    },
    CommandRule {
        keywords: &["blue color", "make it blue"],
        action: CommandAction::SetColor("#0000ff"),
        feedback: "Color changed to blue",
    },
    CommandRule {
        keywords: &["green color", "make it green"],
        action: CommandAction::SetColor("#00ff00"),
        feedback: "Color changed to green",
    },
    CommandRule {
        keywords: &["yellow color", "make it yellow"],
        action: CommandAction::SetColor("#ffff00"),
        feedback: "Color changed to yellow",
    },
    CommandRule {
        keywords: &["black color", "make it black"],
        action: CommandAction::SetColor("#000000"),
        feedback: "Color changed to black",
    },
    CommandRule {
        keywords: &["white color", "make it white"],
        action: CommandAction::SetColor("#ffffff"),
        feedback: "Color changed to white",
    },
    // sizes
    CommandRule {
        keywords: &["small size", "thin"],
        action: CommandAction::SetSize(5.0),
        feedback: "Brush size set to small",
    },
    CommandRule {
        keywords: &["medium size"],
        action: CommandAction::SetSize(10.0),
        feedback: "Brush size set to medium",
    },
    CommandRule {
        keywords: &["large size", "thick"],
        action: CommandAction::SetSize(15.0),
        feedback: "Brush size set to large",
    },
    CommandRule {
        keywords: &["extra large", "very thick"],
        action: CommandAction::SetSize(20.0),
        feedback: "Brush size set to extra large",
    },
    // backgrounds
    CommandRule {
        keywords: &["white background", "clear background"],
        action: CommandAction::SetBackground("#ffffff"),
        feedback: "Background set to white",
    },
    CommandRule {
        keywords: &["black background"],
        action: CommandAction::SetBackground("#000000"),
        feedback: "Background set to black",
    },
    // drawing actions
    CommandRule {
        keywords: &["start drawing", "begin drawing"],
        action: CommandAction::StartContinuous,
        feedback: "Started continuous drawing mode",
    },
    CommandRule {
        keywords: &["stop drawing", "end drawing"],
        action: CommandAction::StopContinuous,
        feedback: "Stopped continuous drawing mode",
    },
    // shapes
    CommandRule {
        keywords: &["draw circle"],
        action: CommandAction::SelectTool(ToolType::Ellipse),
        feedback: "Drawing a circle",
    },
    CommandRule {
        keywords: &["draw rectangle", "draw square"],
        action: CommandAction::SelectTool(ToolType::Rect),
        feedback: "Drawing a rectangle",
    },
    CommandRule {
        keywords: &["draw line"],
        action: CommandAction::SelectTool(ToolType::Line),
        feedback: "Drawing a line",
    },
    // clear
    CommandRule {
        keywords: &["clear all", "clear canvas"],
        action: CommandAction::Clear,
        feedback: "Canvas cleared",
    },
];

/// Find the first rule matching an utterance (case-insensitive)
#[must_use]
pub fn match_rule(utterance: &str) -> Option<&'static CommandRule> {
    let lowered = utterance.to_lowercase();
    RULES.iter().find(|rule| rule.matches(&lowered))
}
