// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Defence entrance exams the portal covers.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExamTag {
    /// Combined Defence Services
    Cds,
    /// National Defence Academy
    Nda,
    /// Air Force Common Admission Test
    Afcat,
    /// Central Armed Police Forces
    Capf,
    /// Services Selection Board interview
    Ssb,
}

impl ExamTag {
    pub const ALL: [ExamTag; 5] = [
        ExamTag::Cds,
        ExamTag::Nda,
        ExamTag::Afcat,
        ExamTag::Capf,
        ExamTag::Ssb,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExamTag::Cds => "CDS",
            ExamTag::Nda => "NDA",
            ExamTag::Afcat => "AFCAT",
            ExamTag::Capf => "CAPF",
            ExamTag::Ssb => "SSB",
        }
    }
}

impl std::fmt::Display for ExamTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExamTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExamTag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown exam '{}'", s))
    }
}

/// Parse an optional query filter where `All` (or empty) means "no filter".
pub fn parse_filter<T>(raw: Option<&str>) -> Result<Option<T>, String>
where
    T: std::str::FromStr<Err = String>,
{
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("all") => Ok(None),
        Some(v) => v.parse().map(Some),
    }
}
