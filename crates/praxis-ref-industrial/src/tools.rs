//! Native tools of the plant-control agent.
//!
//! Every tool is simulated against [`Plant`]. Shell and filesystem tools
//! never touch the host; they only append to the operator log.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

use praxis_contracts::{
    action::Arguments,
    error::{PraxisError, PraxisResult},
};
use praxis_core::{traits::NativeTool, ToolRegistry};

use crate::plant::Plant;

// ── Argument helpers ──────────────────────────────────────────────────────────

fn required_str<'a>(tool: &str, arguments: &'a Arguments, key: &str) -> PraxisResult<&'a str> {
    arguments
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| PraxisError::ToolExecution {
            tool_name: tool.to_string(),
            reason: format!("missing string argument '{key}'"),
        })
}

fn required_f64(tool: &str, arguments: &Arguments, key: &str) -> PraxisResult<f64> {
    arguments
        .get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| PraxisError::ToolExecution {
            tool_name: tool.to_string(),
            reason: format!("missing numeric argument '{key}'"),
        })
}

// ── get_time ──────────────────────────────────────────────────────────────────

pub struct GetTime;

#[async_trait]
impl NativeTool for GetTime {
    fn name(&self) -> &str {
        "get_time"
    }

    fn description(&self) -> &str {
        "Current UTC time of the plant clock"
    }

    async fn execute(&self, _arguments: &Arguments) -> PraxisResult<String> {
        Ok(Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string())
    }
}

// ── read_sensor ───────────────────────────────────────────────────────────────

pub struct ReadSensor {
    plant: Plant,
}

impl ReadSensor {
    pub fn new(plant: Plant) -> Self {
        Self { plant }
    }
}

#[async_trait]
impl NativeTool for ReadSensor {
    fn name(&self) -> &str {
        "read_sensor"
    }

    fn description(&self) -> &str {
        "Read the current value of a plant sensor"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "sensor_id": { "type": "string" } },
            "required": ["sensor_id"]
        })
    }

    async fn execute(&self, arguments: &Arguments) -> PraxisResult<String> {
        let sensor_id = required_str(self.name(), arguments, "sensor_id")?;
        let value = self.plant.read(sensor_id)?;
        Ok(format!("{sensor_id} reads {value:.1}"))
    }
}

// ── set_actuator ──────────────────────────────────────────────────────────────

pub struct SetActuator {
    plant: Plant,
}

impl SetActuator {
    pub fn new(plant: Plant) -> Self {
        Self { plant }
    }
}

#[async_trait]
impl NativeTool for SetActuator {
    fn name(&self) -> &str {
        "set_actuator"
    }

    fn description(&self) -> &str {
        "Drive a plant actuator to a set point"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "target_id": { "type": "string" },
                "value": { "type": "number" }
            },
            "required": ["target_id", "value"]
        })
    }

    async fn execute(&self, arguments: &Arguments) -> PraxisResult<String> {
        let target_id = required_str(self.name(), arguments, "target_id")?;
        let value = required_f64(self.name(), arguments, "value")?;
        self.plant.actuate(target_id, value)?;
        Ok(format!("{target_id} set to {value:.1}"))
    }
}

// ── shell_tool / shell_command ────────────────────────────────────────────────

/// A simulated shell. Registered twice: `shell_tool` (critical, needs review)
/// and `shell_command` (high risk, needs full trust).
pub struct SimulatedShell {
    name: &'static str,
    plant: Plant,
}

impl SimulatedShell {
    pub fn new(name: &'static str, plant: Plant) -> Self {
        Self { name, plant }
    }
}

#[async_trait]
impl NativeTool for SimulatedShell {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "Run a maintenance command on the plant controller"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "command": { "type": "string" } },
            "required": ["command"]
        })
    }

    async fn execute(&self, arguments: &Arguments) -> PraxisResult<String> {
        let command = required_str(self.name, arguments, "command")?;
        self.plant.log(format!("{}: {command}", self.name))?;
        Ok(format!("simulated `{command}`: exit 0"))
    }
}

// ── file_system ───────────────────────────────────────────────────────────────

pub struct FileSystem {
    plant: Plant,
}

impl FileSystem {
    pub fn new(plant: Plant) -> Self {
        Self { plant }
    }
}

#[async_trait]
impl NativeTool for FileSystem {
    fn name(&self) -> &str {
        "file_system"
    }

    fn description(&self) -> &str {
        "Inspect a path on the plant controller"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "path": { "type": "string" } },
            "required": ["path"]
        })
    }

    async fn execute(&self, arguments: &Arguments) -> PraxisResult<String> {
        let path = required_str(self.name(), arguments, "path")?;
        let options: Arguments = arguments
            .iter()
            .filter(|(key, _)| key.as_str() != "path")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        self.plant.log(format!("file_system: {path}"))?;
        Ok(format!("inspected '{path}' with options {}", Value::Object(options)))
    }
}

// ── Externally hosted tools ───────────────────────────────────────────────────

/// Maintenance manual lookup, served through the tool bridge.
pub struct ReadFile;

#[async_trait]
impl NativeTool for ReadFile {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read a document from the maintenance archive"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "path": { "type": "string" } },
            "required": ["path"]
        })
    }

    async fn execute(&self, arguments: &Arguments) -> PraxisResult<String> {
        match required_str(self.name(), arguments, "path")? {
            "manuals/cooling.md" => Ok("Cooling loop: keep core_temp at or below 400 C. \
                                        Raise coolant_flow before lowering the set point."
                .to_string()),
            other => Err(PraxisError::ToolExecution {
                tool_name: self.name().to_string(),
                reason: format!("no document at '{other}'"),
            }),
        }
    }
}

/// Vendor knowledge-base search, served through the tool bridge.
pub struct SearchWeb;

#[async_trait]
impl NativeTool for SearchWeb {
    fn name(&self) -> &str {
        "search_web"
    }

    fn description(&self) -> &str {
        "Search the vendor knowledge base"
    }

    async fn execute(&self, arguments: &Arguments) -> PraxisResult<String> {
        let query = required_str(self.name(), arguments, "query")?;
        Ok(format!("1 result for '{query}': KB-1182 coolant pump cavitation"))
    }
}

// ── Registries ────────────────────────────────────────────────────────────────

/// The native tools of the plant-control agent.
pub fn plant_tools(plant: &Plant) -> ToolRegistry {
    ToolRegistry::new()
        .with(Arc::new(GetTime))
        .with(Arc::new(ReadSensor::new(plant.clone())))
        .with(Arc::new(SetActuator::new(plant.clone())))
        .with(Arc::new(SimulatedShell::new("shell_tool", plant.clone())))
        .with(Arc::new(SimulatedShell::new("shell_command", plant.clone())))
        .with(Arc::new(FileSystem::new(plant.clone())))
}

/// The tools hosted behind the in-process bridge.
pub fn archive_tools() -> ToolRegistry {
    ToolRegistry::new()
        .with(Arc::new(ReadFile))
        .with(Arc::new(SearchWeb))
}
