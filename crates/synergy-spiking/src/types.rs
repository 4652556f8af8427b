// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Record and condition types for simulation output

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SpikingError;

/// Number of whitespace-separated columns in a `.dat` row
pub const SPIKING_COLUMNS: usize = 19;

/// Firing regime of the simulated input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    Phasic,
    Tonic,
}

impl Regime {
    pub const ALL: [Regime; 2] = [Regime::Phasic, Regime::Tonic];

    pub fn name(&self) -> &'static str {
        match self {
            Regime::Phasic => "phasic",
            Regime::Tonic => "tonic",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Regime {
    type Err = SpikingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "phasic" => Ok(Regime::Phasic),
            "tonic" => Ok(Regime::Tonic),
            other => Err(SpikingError::InvalidRegime(other.to_string())),
        }
    }
}

/// Synaptic plasticity rule used in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlasticityScheme {
    #[serde(rename = "Hebbian")]
    Hebbian,
    #[serde(rename = "Hebbian_antiHebbian")]
    HebbianAntiHebbian,
    #[serde(rename = "Hebbian_scaling")]
    HebbianScaling,
}

impl PlasticityScheme {
    pub const ALL: [PlasticityScheme; 3] = [
        PlasticityScheme::Hebbian,
        PlasticityScheme::HebbianAntiHebbian,
        PlasticityScheme::HebbianScaling,
    ];

    /// Directory name used for inputs and outputs of this scheme
    pub fn dir_name(&self) -> &'static str {
        match self {
            PlasticityScheme::Hebbian => "Hebbian",
            PlasticityScheme::HebbianAntiHebbian => "Hebbian_antiHebbian",
            PlasticityScheme::HebbianScaling => "Hebbian_scaling",
        }
    }
}

impl fmt::Display for PlasticityScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for PlasticityScheme {
    type Err = SpikingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlasticityScheme::ALL
            .into_iter()
            .find(|scheme| scheme.dir_name() == s)
            .ok_or_else(|| SpikingError::InvalidScheme(s.to_string()))
    }
}

/// Neuron population a count column belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Population {
    Postsynaptic,
    Excitatory,
    Inhibitory1,
    Inhibitory2,
}

/// Which presynaptic count is used as a decomposition source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceScope {
    /// Spikes of the population that belong to the stimulated pathway
    #[default]
    Pathway,
    /// Total spikes of the population
    All,
}

impl FromStr for SourceScope {
    type Err = SpikingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pathway" => Ok(SourceScope::Pathway),
            "all" => Ok(SourceScope::All),
            other => Err(SpikingError::InvalidScope(other.to_string())),
        }
    }
}

/// Spike counts recorded for one regime
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RegimeCounts {
    pub postsynaptic: f64,
    pub ex_all: f64,
    pub in1_all: f64,
    pub in2_all: f64,
    pub ex_pathway: f64,
    pub in1_pathway: f64,
    pub in2_pathway: f64,
}

impl RegimeCounts {
    /// Count for a population; `scope` is ignored for the postsynaptic cell
    pub fn count(&self, population: Population, scope: SourceScope) -> f64 {
        match (population, scope) {
            (Population::Postsynaptic, _) => self.postsynaptic,
            (Population::Excitatory, SourceScope::Pathway) => self.ex_pathway,
            (Population::Excitatory, SourceScope::All) => self.ex_all,
            (Population::Inhibitory1, SourceScope::Pathway) => self.in1_pathway,
            (Population::Inhibitory1, SourceScope::All) => self.in1_all,
            (Population::Inhibitory2, SourceScope::Pathway) => self.in2_pathway,
            (Population::Inhibitory2, SourceScope::All) => self.in2_all,
        }
    }

    fn from_slice(values: &[f64]) -> Self {
        Self {
            postsynaptic: values[0],
            ex_all: values[1],
            in1_all: values[2],
            in2_all: values[3],
            ex_pathway: values[4],
            in1_pathway: values[5],
            in2_pathway: values[6],
        }
    }
}

/// One simulation trial as stored in a `.dat` row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpikeRecord {
    pub row_num: u64,
    /// 1 = both inhibitory populations active, 2 = population 1 silenced,
    /// 3 = population 2 silenced
    pub k_condition: u32,
    /// Minutes of learning before the trial
    pub learning_time: f64,
    pub pathway: u32,
    pub step_input: f64,
    pub phasic: RegimeCounts,
    pub tonic: RegimeCounts,
    /// Source file of the record
    pub trials_group: u32,
}

impl SpikeRecord {
    /// Build a record from the 19 numeric columns of a `.dat` row
    ///
    /// Returns a message on failure; the reader attaches file and line.
    pub fn from_columns(values: &[f64], trials_group: u32) -> Result<Self, String> {
        if values.len() != SPIKING_COLUMNS {
            return Err(format!(
                "expected {} columns, found {}",
                SPIKING_COLUMNS,
                values.len()
            ));
        }
        Ok(Self {
            row_num: integral(values[0], "row_num")?,
            k_condition: integral(values[1], "k_condition")?,
            learning_time: values[2],
            pathway: integral(values[3], "pathway")?,
            step_input: values[4],
            phasic: RegimeCounts::from_slice(&values[5..12]),
            tonic: RegimeCounts::from_slice(&values[12..19]),
            trials_group,
        })
    }

    pub fn counts(&self, regime: Regime) -> &RegimeCounts {
        match regime {
            Regime::Phasic => &self.phasic,
            Regime::Tonic => &self.tonic,
        }
    }

    pub fn counts_mut(&mut self, regime: Regime) -> &mut RegimeCounts {
        match regime {
            Regime::Phasic => &mut self.phasic,
            Regime::Tonic => &mut self.tonic,
        }
    }

    pub fn cell_key(&self) -> CellKey {
        CellKey {
            trials_group: self.trials_group,
            k_condition: self.k_condition,
            pathway: self.pathway,
            learning_time: self.learning_time,
        }
    }
}

fn integral<T: TryFrom<u64>>(value: f64, column: &str) -> Result<T, String> {
    if value.fract() != 0.0 || value < 0.0 || !value.is_finite() {
        return Err(format!("{} must be a non-negative integer, got {}", column, value));
    }
    T::try_from(value as u64).map_err(|_| format!("{} out of range: {}", column, value))
}

/// Identity of one analysis cell: a trial group under one condition
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CellKey {
    pub trials_group: u32,
    pub k_condition: u32,
    pub pathway: u32,
    pub learning_time: f64,
}

impl CellKey {
    // -0.0 and 0.0 must hash alike
    fn time_bits(&self) -> u64 {
        if self.learning_time == 0.0 {
            0
        } else {
            self.learning_time.to_bits()
        }
    }
}

impl PartialEq for CellKey {
    fn eq(&self, other: &Self) -> bool {
        self.trials_group == other.trials_group
            && self.k_condition == other.k_condition
            && self.pathway == other.pathway
            && self.time_bits() == other.time_bits()
    }
}

impl Eq for CellKey {}

impl Hash for CellKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.trials_group.hash(state);
        self.k_condition.hash(state);
        self.pathway.hash(state);
        self.time_bits().hash(state);
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "group {} k={} pathway={} t={}",
            self.trials_group, self.k_condition, self.pathway, self.learning_time
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Vec<f64> {
        let mut values = vec![3.0, 2.0, 5.0, 9.0, 40.0];
        values.extend((0..7).map(|i| 10.0 + i as f64));
        values.extend((0..7).map(|i| 20.0 + i as f64));
        values
    }

    #[test]
    fn test_scheme_names_round_trip() {
        for scheme in PlasticityScheme::ALL {
            assert_eq!(scheme.dir_name().parse::<PlasticityScheme>().unwrap(), scheme);
        }
        let err = "STDP".parse::<PlasticityScheme>().unwrap_err();
        assert!(err.to_string().starts_with("Invalid condition provided"));
    }

    #[test]
    fn test_regime_parse() {
        assert_eq!("tonic".parse::<Regime>().unwrap(), Regime::Tonic);
        assert!("bursting".parse::<Regime>().is_err());
    }

    #[test]
    fn test_record_from_columns() {
        let record = SpikeRecord::from_columns(&row(), 4).unwrap();
        assert_eq!(record.k_condition, 2);
        assert_eq!(record.pathway, 9);
        assert_eq!(record.learning_time, 5.0);
        assert_eq!(record.phasic.postsynaptic, 10.0);
        assert_eq!(record.tonic.in2_pathway, 26.0);
        assert_eq!(
            record.counts(Regime::Phasic).count(Population::Excitatory, SourceScope::All),
            11.0
        );
        assert_eq!(
            record.counts(Regime::Tonic).count(Population::Inhibitory1, SourceScope::Pathway),
            25.0
        );
    }

    #[test]
    fn test_record_rejects_bad_rows() {
        assert!(SpikeRecord::from_columns(&row()[..18], 0).is_err());
        let mut values = row();
        values[1] = 1.5;
        assert!(SpikeRecord::from_columns(&values, 0)
            .unwrap_err()
            .contains("k_condition"));
    }

    #[test]
    fn test_cell_key_signed_zero() {
        let a = CellKey {
            trials_group: 0,
            k_condition: 1,
            pathway: 1,
            learning_time: 0.0,
        };
        let b = CellKey {
            learning_time: -0.0,
            ..a
        };
        assert_eq!(a, b);
    }
}
