//! General-education categories and per-term grade distributions.

use serde::{Deserialize, Serialize};

use super::SemesterId;

/// Known general-education codes and what they stand for.
const GEN_EDS: &[(&str, &str)] = &[
    ("ACP", "Advanced Composition"),
    ("US", "US Minority Cultures"),
    ("NW", "Non-Western Cultures"),
    ("WCC", "Western/Comparative Cultures"),
    ("LA", "Literature and the Arts"),
    ("HP", "Historical and Philosophical Perspectives"),
    ("PS", "Physical Sciences"),
    ("LS", "Life Sciences"),
    ("QR1", "Quantitative Reasoning 1"),
    ("QR2", "Quantitative Reasoning 2"),
    ("SS", "Social Sciences"),
    ("BSC", "Behavioral Sciences"),
];

/// Description of a general-education code, if it is one we know.
pub fn gen_ed_description(code: &str) -> Option<&'static str> {
    GEN_EDS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(code.trim()))
        .map(|&(_, description)| description)
}

/// Letter-grade counts recorded for a course in one term.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TermGrades {
    pub semester: SemesterId,
    #[serde(default)]
    pub a_plus: u32,
    #[serde(default)]
    pub a: u32,
    #[serde(default)]
    pub a_minus: u32,
    #[serde(default)]
    pub b_plus: u32,
    #[serde(default)]
    pub b: u32,
    #[serde(default)]
    pub b_minus: u32,
    #[serde(default)]
    pub c_plus: u32,
    #[serde(default)]
    pub c: u32,
    #[serde(default)]
    pub c_minus: u32,
    #[serde(default)]
    pub d_plus: u32,
    #[serde(default)]
    pub d: u32,
    #[serde(default)]
    pub d_minus: u32,
    #[serde(default)]
    pub f: u32,
}

impl TermGrades {
    /// Empty distribution for `semester`.
    pub fn new(semester: SemesterId) -> Self {
        Self {
            semester,
            a_plus: 0,
            a: 0,
            a_minus: 0,
            b_plus: 0,
            b: 0,
            b_minus: 0,
            c_plus: 0,
            c: 0,
            c_minus: 0,
            d_plus: 0,
            d: 0,
            d_minus: 0,
            f: 0,
        }
    }

    /// Counts in column order, A+ through F.
    pub fn counts(&self) -> [u32; 13] {
        [
            self.a_plus,
            self.a,
            self.a_minus,
            self.b_plus,
            self.b,
            self.b_minus,
            self.c_plus,
            self.c,
            self.c_minus,
            self.d_plus,
            self.d,
            self.d_minus,
            self.f,
        ]
    }

    /// Builds a distribution from counts in [`TermGrades::counts`] order.
    pub fn from_counts(semester: SemesterId, counts: [u32; 13]) -> Self {
        let [a_plus, a, a_minus, b_plus, b, b_minus, c_plus, c, c_minus, d_plus, d, d_minus, f] =
            counts;
        Self {
            semester,
            a_plus,
            a,
            a_minus,
            b_plus,
            b,
            b_minus,
            c_plus,
            c,
            c_minus,
            d_plus,
            d,
            d_minus,
            f,
        }
    }

    /// Grade-point average on a 4.0 scale, or `None` with no grades recorded.
    pub fn average(&self) -> Option<f64> {
        const POINTS: [f64; 13] = [
            4.0, 4.0, 3.67, 3.33, 3.0, 2.67, 2.33, 2.0, 1.67, 1.33, 1.0, 0.67, 0.0,
        ];
        let counts = self.counts();
        let total: u32 = counts.iter().sum();
        if total == 0 {
            return None;
        }
        let weighted: f64 = counts
            .iter()
            .zip(POINTS)
            .map(|(&count, points)| f64::from(count) * points)
            .sum();
        Some(weighted / f64::from(total))
    }
}
