use anyhow::{bail, Result};
use clap::Subcommand;
use momentum_core::{EnergyLevel, SleepQuality};

use crate::state::Workspace;

#[derive(Subcommand, Debug)]
pub enum HealthCommand {
    /// Update the health snapshot used to scale task points
    Set {
        /// low | medium | high
        #[arg(long)]
        energy: Option<EnergyLevel>,

        /// poor | fair | good
        #[arg(long)]
        sleep: Option<SleepQuality>,

        /// Average hours of sleep
        #[arg(long)]
        hours: Option<f64>,
    },

    /// Print the current snapshot and its point multiplier
    Show {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

pub fn run(cmd: HealthCommand) -> Result<()> {
    let ws = Workspace::open()?;
    let mut health = ws.load_health()?;

    match cmd {
        HealthCommand::Set {
            energy,
            sleep,
            hours,
        } => {
            if energy.is_none() && sleep.is_none() && hours.is_none() {
                bail!("nothing to set (use --energy, --sleep or --hours)");
            }
            if let Some(h) = hours {
                if !h.is_finite() || !(0.0..=24.0).contains(&h) {
                    bail!("--hours must be between 0 and 24 (got {h})");
                }
                health.avg_sleep_hours = h;
            }
            if let Some(e) = energy {
                health.energy_level = e;
            }
            if let Some(s) = sleep {
                health.sleep_quality = s;
            }
            ws.save_health(&health)?;
            println!(
                "energy={} sleep={} hours={:.1} multiplier={:.2}",
                health.energy_level,
                health.sleep_quality,
                health.avg_sleep_hours,
                health.multiplier()
            );
            Ok(())
        }

        HealthCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&health)?);
            } else {
                println!("energy:     {}", health.energy_level);
                println!("sleep:      {}", health.sleep_quality);
                println!("avg hours:  {:.1}", health.avg_sleep_hours);
                println!("multiplier: {:.2}", health.multiplier());
            }
            Ok(())
        }
    }
}
