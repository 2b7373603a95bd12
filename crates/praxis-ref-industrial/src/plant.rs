//! Simulated process plant for the reference runtime.
//!
//! All readings are hardcoded and fictional. No hardware is contacted. The
//! plant stands in for a real control system: sensors report values,
//! actuators move them, and every command lands in an operator log.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use praxis_contracts::error::{PraxisError, PraxisResult};

/// Initial sensor readings.
///
/// - `core_temp`     → 612.0 C (well above the 400 C limit)
/// - `coolant_flow`  → 38.5 L/min
/// - `tank_pressure` → 2.1 bar
pub const INITIAL_READINGS: &[(&str, f64)] = &[
    ("core_temp", 612.0),
    ("coolant_flow", 38.5),
    ("tank_pressure", 2.1),
];

#[derive(Debug, Default)]
struct PlantState {
    readings: BTreeMap<String, f64>,
    operator_log: Vec<String>,
}

/// Shared handle to the simulated plant. Clones see the same state.
#[derive(Debug, Clone)]
pub struct Plant {
    state: Arc<Mutex<PlantState>>,
}

impl Default for Plant {
    fn default() -> Self {
        Self::new()
    }
}

impl Plant {
    pub fn new() -> Self {
        let readings = INITIAL_READINGS
            .iter()
            .map(|(id, value)| (id.to_string(), *value))
            .collect();
        Self {
            state: Arc::new(Mutex::new(PlantState {
                readings,
                operator_log: Vec::new(),
            })),
        }
    }

    /// Current value of `sensor_id`.
    pub fn read(&self, sensor_id: &str) -> PraxisResult<f64> {
        let state = self.lock()?;
        state.readings.get(sensor_id).copied().ok_or_else(|| PraxisError::ToolExecution {
            tool_name: "read_sensor".to_string(),
            reason: format!("no sensor named '{sensor_id}'"),
        })
    }

    /// Drive `target_id` to `value`. Unknown targets are refused.
    pub fn actuate(&self, target_id: &str, value: f64) -> PraxisResult<()> {
        let mut state = self.lock()?;
        let Some(reading) = state.readings.get_mut(target_id) else {
            return Err(PraxisError::ToolExecution {
                tool_name: "set_actuator".to_string(),
                reason: format!("no actuator named '{target_id}'"),
            });
        };
        *reading = value;
        state.operator_log.push(format!("set {target_id} = {value}"));
        Ok(())
    }

    /// Append a free-form line to the operator log.
    pub fn log(&self, line: impl Into<String>) -> PraxisResult<()> {
        self.lock()?.operator_log.push(line.into());
        Ok(())
    }

    pub fn operator_log(&self) -> Vec<String> {
        self.lock().map(|s| s.operator_log.clone()).unwrap_or_default()
    }

    fn lock(&self) -> PraxisResult<std::sync::MutexGuard<'_, PlantState>> {
        self.state.lock().map_err(|e| PraxisError::ToolExecution {
            tool_name: "plant".to_string(),
            reason: format!("plant state poisoned: {e}"),
        })
    }
}
