use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const INVOCATION_TRUE: &str = "\x1b[32mINVOCATION\x1b[39m ";
const INVOCATION_FALSE: &str = "\x1b[31mInvocation\x1b[39m ";
const COMMITMENT_TRUE: &str = "\x1b[32mCOMMITMENT\x1b[39m ";
const COMMITMENT_FALSE: &str = "\x1b[31mCommitment\x1b[39m ";

// Three crosses, backspaced over, then strike-through on. Closed by strike-through off and the
// crosses again in hidden text, so terminals without strike-through still mark the line.
const STRIKE_THROUGH_ON: &str = "×××\x08\x08\x08\x1b[9m";
const STRIKE_THROUGH_OFF: &str = "\x1b[29m\x1b[8m×××\x1b[28m";

/// Nested state of a behavior tree at one point in time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Snapshot {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: String,
    pub name: String,
    pub invocation_condition: bool,
    pub commitment_condition: bool,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub options: Vec<OptionSnapshot>,
    /// Indices into `options` that currently hold control.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub active_options: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct OptionSnapshot {
    pub behavior: Snapshot,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub flags: Vec<String>,
    /// Cached verification outcome for the snapshot time, if any.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub verification_passed: Option<bool>,
    pub annotation: Annotation,
}

/// Policy specific information printed in front of an option.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Annotation {
    /// 0-based position in a priority list.
    Rank(usize),
    /// Last estimated cost, `None` if the option was not estimated this tick.
    Cost(Option<f64>),
    Weight(f64),
    /// Plain member of a coordinator.
    Member,
}

impl Snapshot {
    pub fn leaf(name: impl Into<String>, invocation: bool, commitment: bool) -> Self {
        Self {
            kind: "Behavior".to_string(),
            name: name.into(),
            invocation_condition: invocation,
            commitment_condition: commitment,
            options: Vec::new(),
            active_options: Vec::new(),
        }
    }

    pub fn is_option_active(&self, index: usize) -> bool {
        self.active_options.contains(&index)
    }

    /// Render as text, writing `suffix` before and `prefix` after every line break.
    pub fn render(&self, prefix: &str, suffix: &str) -> String {
        let mut out = String::new();
        self.render_into(&mut out, prefix, suffix);
        out
    }

    fn render_into(&self, out: &mut String, prefix: &str, suffix: &str) {
        out.push_str(if self.invocation_condition {
            INVOCATION_TRUE
        } else {
            INVOCATION_FALSE
        });
        out.push_str(if self.commitment_condition {
            COMMITMENT_TRUE
        } else {
            COMMITMENT_FALSE
        });
        out.push_str(&self.name);

        let child_prefix = format!("    {prefix}");
        for (index, option) in self.options.iter().enumerate() {
            out.push_str(suffix);
            out.push('\n');
            out.push_str(prefix);
            out.push_str(if self.is_option_active(index) {
                " -> "
            } else {
                "    "
            });
            option.render_into(out, &child_prefix, suffix);
        }
    }
}

impl OptionSnapshot {
    fn render_into(&self, out: &mut String, prefix: &str, suffix: &str) {
        match self.annotation {
            Annotation::Rank(index) => out.push_str(&format!("{}. ", index + 1)),
            Annotation::Cost(Some(cost)) => out.push_str(&format!("- (cost: {cost:.3}) ")),
            Annotation::Cost(None) => out.push_str("- (cost:  n.a.) "),
            Annotation::Weight(weight) => out.push_str(&format!("- (weight: {weight:.3}) ")),
            Annotation::Member => out.push_str("- "),
        }

        if self.verification_passed == Some(false) {
            out.push_str(STRIKE_THROUGH_ON);
            self.behavior.render_into(out, prefix, suffix);
            out.push_str(STRIKE_THROUGH_OFF);
        } else {
            self.behavior.render_into(out, prefix, suffix);
        }
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render("", ""))
    }
}
