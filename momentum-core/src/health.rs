//! Health snapshot: read-only input to the point engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl EnergyLevel {
    pub fn multiplier(&self) -> f64 {
        match self {
            EnergyLevel::Low => 0.7,
            EnergyLevel::Medium => 1.0,
            EnergyLevel::High => 1.1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepQuality {
    Poor,
    #[default]
    Fair,
    Good,
}

impl SleepQuality {
    pub fn multiplier(&self) -> f64 {
        match self {
            SleepQuality::Poor => 0.8,
            SleepQuality::Fair => 1.0,
            SleepQuality::Good => 1.1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSnapshot {
    pub energy_level: EnergyLevel,
    pub sleep_quality: SleepQuality,
    #[serde(default)]
    pub avg_sleep_hours: f64,
}

impl HealthSnapshot {
    pub fn new(energy_level: EnergyLevel, sleep_quality: SleepQuality) -> Self {
        Self {
            energy_level,
            sleep_quality,
            avg_sleep_hours: 0.0,
        }
    }

    pub fn with_sleep_hours(mut self, hours: f64) -> Self {
        self.avg_sleep_hours = hours;
        self
    }

    /// Energy and sleep multipliers composed.
    pub fn multiplier(&self) -> f64 {
        self.energy_level.multiplier() * self.sleep_quality.multiplier()
    }
}

impl FromStr for EnergyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(EnergyLevel::Low),
            "medium" | "med" => Ok(EnergyLevel::Medium),
            "high" => Ok(EnergyLevel::High),
            other => Err(format!("unknown energy level '{other}' (low|medium|high)")),
        }
    }
}

impl FromStr for SleepQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "poor" => Ok(SleepQuality::Poor),
            "fair" | "ok" => Ok(SleepQuality::Fair),
            "good" => Ok(SleepQuality::Good),
            other => Err(format!("unknown sleep quality '{other}' (poor|fair|good)")),
        }
    }
}

impl fmt::Display for EnergyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EnergyLevel::Low => "low",
            EnergyLevel::Medium => "medium",
            EnergyLevel::High => "high",
        };
        f.write_str(s)
    }
}

impl fmt::Display for SleepQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SleepQuality::Poor => "poor",
            SleepQuality::Fair => "fair",
            SleepQuality::Good => "good",
        };
        f.write_str(s)
    }
}
