//! Display implementations for domain models.

use std::fmt;

use crate::{
    board::{Board, Semester},
    models::{Course, PrereqTree, Season},
};

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.long_name())
    }
}

/// `CS 1110 and (CS 2110 or MATH 1910)`
impl fmt::Display for PrereqTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, children: &[PrereqTree], word: &str) -> fmt::Result {
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    write!(f, " {word} ")?;
                }
                match child {
                    PrereqTree::Course(code) => write!(f, "{code}")?,
                    nested => write!(f, "({nested})")?,
                }
            }
            Ok(())
        }

        match self {
            PrereqTree::Course(code) => write!(f, "{code}"),
            PrereqTree::All { and } => join(f, and, "and"),
            PrereqTree::Any { or } => join(f, or, "or"),
        }
    }
}

/// One card as a list item.
impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- **{}**", self.code())?;
        if !self.title.is_empty() {
            write!(f, " {}", self.title)?;
        }
        if !self.credit_hours.is_empty() {
            write!(f, " ({})", self.credit_hours)?;
        }
        writeln!(f, " `{}`", self.id)
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "## {}", self.name)?;
        if self.completed {
            write!(f, " ✓")?;
        }
        writeln!(f)?;
        writeln!(f)?;

        if self.courses.is_empty() {
            return writeln!(f, "*No courses for this semester*");
        }
        for course in &self.courses {
            write!(f, "{course}")?;
        }
        writeln!(f)?;
        writeln!(f, "Credits: {}", self.credits())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Degree Plan")?;
        writeln!(f)?;

        if self.semesters().is_empty() {
            return writeln!(f, "No semesters in this plan.");
        }
        for semester in self.semesters() {
            write!(f, "{semester}")?;
            writeln!(f)?;
        }
        writeln!(f, "**Total credits: {}**", self.total_credits())?;
        writeln!(f, "Completed credits: {}", self.completed_credits())
    }
}
