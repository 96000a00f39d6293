//! Level selection
//!
//! Reducing a list of same-level candidates to one entry goes through a
//! [`Resolver`]. The binary answers menus from the terminal; tests answer
//! them from a script.

use crate::error::{DcmdiffError, Result};
use crate::hierarchy::{Hierarchy, PatientNode, StudyNode};
use log::debug;
use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Answer accepted as "none of these" when a menu allows it
pub const NONE_ANSWER: &str = "n";

/// An enumerated list of candidates shown to a [`Resolver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    /// Printed above the entries
    pub heading: Option<String>,
    /// One label per candidate, in candidate order
    pub entries: Vec<String>,
    /// Printed below the entries
    pub instruction: String,
    /// Whether [`NONE_ANSWER`] is accepted
    pub allow_none: bool,
}

impl Menu {
    /// A menu where exactly one entry must be chosen
    pub fn mandatory(entries: Vec<String>, instruction: impl Into<String>) -> Self {
        Self {
            heading: None,
            entries,
            instruction: instruction.into(),
            allow_none: false,
        }
    }

    /// A menu that can be answered with [`NONE_ANSWER`]
    pub fn optional(entries: Vec<String>, instruction: impl Into<String>) -> Self {
        Self {
            heading: None,
            entries,
            instruction: instruction.into(),
            allow_none: true,
        }
    }

    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = Some(heading.into());
        self
    }

    /// Menu text as printed before the prompt
    ///
    /// ```
    /// use dcmdiff_core::select::Menu;
    ///
    /// let menu = Menu::optional(vec!["0010-MR-T1".into()], "select one series (n=none):");
    /// assert_eq!(menu.render(), "   0 - 0010-MR-T1\nselect one series (n=none):\n");
    /// ```
    pub fn render(&self) -> String {
        let mut text = String::new();
        if let Some(heading) = &self.heading {
            text.push_str(heading);
            text.push('\n');
        }
        for (index, entry) in self.entries.iter().enumerate() {
            text.push_str(&format!("{:4} - {}\n", index, entry));
        }
        text.push_str(&self.instruction);
        text.push('\n');
        text
    }
}

/// Something that answers a [`Menu`] with a raw string
///
/// Answers are validated by [`choose`], resolvers only relay them.
pub trait Resolver {
    fn ask(&mut self, menu: &Menu) -> Result<String>;
}

/// Prints menus to a writer and reads one answer line from a reader
pub struct TerminalResolver<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalResolver<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl TerminalResolver<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Resolver bound to the process terminal
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Resolver for TerminalResolver<R, W> {
    fn ask(&mut self, menu: &Menu) -> Result<String> {
        self.output.write_all(menu.render().as_bytes())?;
        self.output.write_all(b"? ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(DcmdiffError::InvalidSelection {
                input: String::new(),
                count: menu.entries.len(),
            });
        }
        Ok(line.trim().to_string())
    }
}

/// Answers menus from a fixed list, recording every menu it was shown
#[derive(Debug, Default)]
pub struct ScriptedResolver {
    answers: VecDeque<String>,
    asked: Vec<Menu>,
}

impl ScriptedResolver {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }

    /// Menus shown so far, in order
    pub fn asked(&self) -> &[Menu] {
        &self.asked
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Resolver for ScriptedResolver {
    fn ask(&mut self, menu: &Menu) -> Result<String> {
        self.asked.push(menu.clone());
        self.answers
            .pop_front()
            .ok_or_else(|| DcmdiffError::InvalidSelection {
                input: String::new(),
                count: menu.entries.len(),
            })
    }
}

/// Resolves a menu to an entry index, or `None` for "none of these"
///
/// A mandatory menu with a single entry is answered without asking. An
/// optional menu is always asked, even with a single entry, and an empty
/// optional menu resolves to `None`.
///
/// # Errors
///
/// - [`DcmdiffError::NoCandidates`] for an empty mandatory menu
/// - [`DcmdiffError::InvalidSelection`] for an answer that is not an offered
///   index (or [`NONE_ANSWER`] where allowed)
pub fn choose(
    menu: &Menu,
    resolver: &mut dyn Resolver,
    level: &'static str,
) -> Result<Option<usize>> {
    match (menu.entries.len(), menu.allow_none) {
        (0, false) => return Err(DcmdiffError::NoCandidates(level)),
        (0, true) => return Ok(None),
        (1, false) => return Ok(Some(0)),
        _ => {}
    }

    let answer = resolver.ask(menu)?;
    let answer = answer.trim();
    debug!("Selected '{}' from {} {}", answer, menu.entries.len(), level);

    if menu.allow_none && answer.eq_ignore_ascii_case(NONE_ANSWER) {
        return Ok(None);
    }

    match answer.parse::<usize>() {
        Ok(index) if index < menu.entries.len() => Ok(Some(index)),
        _ => Err(DcmdiffError::InvalidSelection {
            input: answer.to_string(),
            count: menu.entries.len(),
        }),
    }
}

/// Picks the patient to compare from one input side
pub fn select_patient<'a>(
    hierarchy: &'a Hierarchy,
    resolver: &mut dyn Resolver,
) -> Result<&'a PatientNode> {
    let patients: Vec<&PatientNode> = hierarchy.patients().collect();
    let menu = Menu::mandatory(
        patients.iter().map(|p| p.label()).collect(),
        "** select ONE patient:",
    )
    .with_heading(format!("** found {} patients:", patients.len()));

    let index = choose(&menu, resolver, "patients")?.unwrap_or(0);
    Ok(patients[index])
}

/// Picks the study to compare from a selected patient
pub fn select_study<'a>(
    patient: &'a PatientNode,
    resolver: &mut dyn Resolver,
) -> Result<&'a StudyNode> {
    let studies: Vec<&StudyNode> = patient.studies().collect();
    let menu = Menu::mandatory(
        studies.iter().map(|s| s.label()).collect(),
        "*** select one study:",
    )
    .with_heading(format!("*** found {} studies:", studies.len()));

    let index = choose(&menu, resolver, "studies")?.unwrap_or(0);
    Ok(studies[index])
}
