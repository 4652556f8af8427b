// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! PID table schema
//!
//! Every analysed cell yields 18 values. The unsuffixed terms come from the
//! three-source decomposition; `_13`, `_12` and `_23` come from the
//! two-source decompositions that leave out inhibitory population 1,
//! inhibitory population 2 and the excitatory population respectively.
//! The suffix names the two sources that remain (1 = excitatory,
//! 2 = inhibitory 1, 3 = inhibitory 2).

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use synergy_spiking::{CellKey, Population};

/// Populations fed to one decomposition, after the postsynaptic target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceSet {
    /// Excitatory, inhibitory 1, inhibitory 2
    Full,
    /// Inhibitory 1, inhibitory 2
    ExExcluded,
    /// Excitatory, inhibitory 2
    In1Excluded,
    /// Excitatory, inhibitory 1
    In2Excluded,
}

impl SourceSet {
    pub fn sources(&self) -> &'static [Population] {
        match self {
            SourceSet::Full => &[
                Population::Excitatory,
                Population::Inhibitory1,
                Population::Inhibitory2,
            ],
            SourceSet::ExExcluded => &[Population::Inhibitory1, Population::Inhibitory2],
            SourceSet::In1Excluded => &[Population::Excitatory, Population::Inhibitory2],
            SourceSet::In2Excluded => &[Population::Excitatory, Population::Inhibitory1],
        }
    }

    /// Whether the set is analysed under `k_condition`
    ///
    /// A silenced population cannot act as a source, so condition 2 skips
    /// sets containing inhibitory 1 alongside excitatory and condition 3 the
    /// ones containing inhibitory 2.
    pub fn applies_to(&self, k_condition: u32) -> bool {
        match self {
            SourceSet::Full | SourceSet::ExExcluded => k_condition == 1,
            SourceSet::In1Excluded => k_condition != 3,
            SourceSet::In2Excluded => k_condition != 2,
        }
    }
}

/// One value column of the PID table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PidTerm {
    Mi,
    U1,
    U2,
    U3,
    R,
    Sy,
    Mi13,
    R13,
    Sy13,
    Un13,
    Mi12,
    R12,
    Sy12,
    Un12,
    Mi23,
    R23,
    Sy23,
    Un23,
}

impl PidTerm {
    pub const ALL: [PidTerm; 18] = [
        PidTerm::Mi,
        PidTerm::U1,
        PidTerm::U2,
        PidTerm::U3,
        PidTerm::R,
        PidTerm::Sy,
        PidTerm::Mi13,
        PidTerm::R13,
        PidTerm::Sy13,
        PidTerm::Un13,
        PidTerm::Mi12,
        PidTerm::R12,
        PidTerm::Sy12,
        PidTerm::Un12,
        PidTerm::Mi23,
        PidTerm::R23,
        PidTerm::Sy23,
        PidTerm::Un23,
    ];

    /// Column name in stored tables
    pub fn name(&self) -> &'static str {
        match self {
            PidTerm::Mi => "mi",
            PidTerm::U1 => "u1",
            PidTerm::U2 => "u2",
            PidTerm::U3 => "u3",
            PidTerm::R => "r",
            PidTerm::Sy => "sy",
            PidTerm::Mi13 => "mi_13",
            PidTerm::R13 => "r_13",
            PidTerm::Sy13 => "sy_13",
            PidTerm::Un13 => "un_13",
            PidTerm::Mi12 => "mi_12",
            PidTerm::R12 => "r_12",
            PidTerm::Sy12 => "sy_12",
            PidTerm::Un12 => "un_12",
            PidTerm::Mi23 => "mi_23",
            PidTerm::R23 => "r_23",
            PidTerm::Sy23 => "sy_23",
            PidTerm::Un23 => "un_23",
        }
    }
}

impl fmt::Display for PidTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The 18 PID values of one cell; terms that do not apply stay 0
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PidTerms {
    pub mi: f64,
    pub u1: f64,
    pub u2: f64,
    pub u3: f64,
    pub r: f64,
    pub sy: f64,
    pub mi_13: f64,
    pub r_13: f64,
    pub sy_13: f64,
    pub un_13: f64,
    pub mi_12: f64,
    pub r_12: f64,
    pub sy_12: f64,
    pub un_12: f64,
    pub mi_23: f64,
    pub r_23: f64,
    pub sy_23: f64,
    pub un_23: f64,
}

impl PidTerms {
    pub fn get(&self, term: PidTerm) -> f64 {
        match term {
            PidTerm::Mi => self.mi,
            PidTerm::U1 => self.u1,
            PidTerm::U2 => self.u2,
            PidTerm::U3 => self.u3,
            PidTerm::R => self.r,
            PidTerm::Sy => self.sy,
            PidTerm::Mi13 => self.mi_13,
            PidTerm::R13 => self.r_13,
            PidTerm::Sy13 => self.sy_13,
            PidTerm::Un13 => self.un_13,
            PidTerm::Mi12 => self.mi_12,
            PidTerm::R12 => self.r_12,
            PidTerm::Sy12 => self.sy_12,
            PidTerm::Un12 => self.un_12,
            PidTerm::Mi23 => self.mi_23,
            PidTerm::R23 => self.r_23,
            PidTerm::Sy23 => self.sy_23,
            PidTerm::Un23 => self.un_23,
        }
    }

    pub fn get_mut(&mut self, term: PidTerm) -> &mut f64 {
        match term {
            PidTerm::Mi => &mut self.mi,
            PidTerm::U1 => &mut self.u1,
            PidTerm::U2 => &mut self.u2,
            PidTerm::U3 => &mut self.u3,
            PidTerm::R => &mut self.r,
            PidTerm::Sy => &mut self.sy,
            PidTerm::Mi13 => &mut self.mi_13,
            PidTerm::R13 => &mut self.r_13,
            PidTerm::Sy13 => &mut self.sy_13,
            PidTerm::Un13 => &mut self.un_13,
            PidTerm::Mi12 => &mut self.mi_12,
            PidTerm::R12 => &mut self.r_12,
            PidTerm::Sy12 => &mut self.sy_12,
            PidTerm::Un12 => &mut self.un_12,
            PidTerm::Mi23 => &mut self.mi_23,
            PidTerm::R23 => &mut self.r_23,
            PidTerm::Sy23 => &mut self.sy_23,
            PidTerm::Un23 => &mut self.un_23,
        }
    }

    /// Build a table by evaluating `f` for every term
    pub fn from_fn(mut f: impl FnMut(PidTerm) -> f64) -> Self {
        let mut terms = Self::default();
        for term in PidTerm::ALL {
            *terms.get_mut(term) = f(term);
        }
        terms
    }
}

/// PID values of one cell of the real data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PidRow {
    #[serde(flatten)]
    pub key: CellKey,
    #[serde(flatten)]
    pub terms: PidTerms,
}

/// PID values of one cell of a shuffled dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurrogatePidRow {
    #[serde(flatten)]
    pub row: PidRow,
    /// Seed the dataset was shuffled with
    pub random_seed: u64,
}

/// Experimental condition shared by all trial groups of a cell
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConditionKey {
    pub k_condition: u32,
    pub pathway: u32,
    pub learning_time: f64,
}

impl From<&CellKey> for ConditionKey {
    fn from(key: &CellKey) -> Self {
        Self {
            k_condition: key.k_condition,
            pathway: key.pathway,
            learning_time: key.learning_time,
        }
    }
}

impl Ord for ConditionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.k_condition
            .cmp(&other.k_condition)
            .then(self.pathway.cmp(&other.pathway))
            .then(self.learning_time.total_cmp(&other.learning_time))
    }
}

impl PartialOrd for ConditionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ConditionKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ConditionKey {}

impl fmt::Display for ConditionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "k={} pathway={} t={}",
            self.k_condition, self.pathway, self.learning_time
        )
    }
}
