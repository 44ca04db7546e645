//! Configuration for the Tomasulo core.
//!
//! The spec fixes one concrete machine (8 registers, 12 named reservation
//! stations, the latencies in `DESIGN.md`/§4.3) but the engine itself treats
//! those as parameters rather than hardcoded constants, following the same
//! hierarchical, serde-driven configuration style used elsewhere in this
//! lineage of simulators. `Config::default()` reproduces the spec's fixed
//! machine exactly; overriding fields is mostly useful for tests that probe
//! back-pressure (e.g. a capacity-1 ROB) or custom latency tables.

use serde::Deserialize;

/// Default configuration constants.
mod defaults {
    /// Reorder buffer capacity.
    pub const ROB_CAPACITY: usize = 8;

    /// ADD/SUB functional unit latency, in cycles.
    pub const ADD_SUB_LATENCY: u32 = 2;
    /// Number of ADD/SUB functional units.
    pub const ADD_SUB_UNITS: usize = 4;

    /// NAND functional unit latency, in cycles.
    pub const NAND_LATENCY: u32 = 1;
    /// Number of NAND functional units.
    pub const NAND_UNITS: usize = 2;

    /// MUL functional unit latency, in cycles.
    pub const MUL_LATENCY: u32 = 12;
    /// Number of MUL functional units.
    pub const MUL_UNITS: usize = 1;

    /// LOAD functional unit latency, in cycles (address compute + memory access).
    pub const LOAD_LATENCY: u32 = 6;
    /// Number of LOAD functional units.
    pub const LOAD_UNITS: usize = 2;

    /// STORE functional unit latency, in cycles.
    pub const STORE_LATENCY: u32 = 6;
    /// Number of STORE functional units.
    pub const STORE_UNITS: usize = 1;

    /// BEQ functional unit latency, in cycles.
    pub const BEQ_LATENCY: u32 = 1;
    /// Number of BEQ functional units.
    pub const BEQ_UNITS: usize = 2;

    /// CALL/RET functional unit latency, in cycles.
    pub const CALL_RET_LATENCY: u32 = 1;
    /// Number of CALL/RET functional units.
    pub const CALL_RET_UNITS: usize = 1;
}

/// Root configuration for a [`crate::sim::Simulator`].
///
/// # Examples
///
/// ```
/// use tomasim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.rob.capacity, 8);
/// assert_eq!(config.functional_units.mul.latency, 12);
/// ```
///
/// Deserializing a reduced-capacity ROB for back-pressure tests:
///
/// ```
/// use tomasim_core::config::Config;
///
/// let json = r#"{ "rob": { "capacity": 2 } }"#;
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.rob.capacity, 2);
/// assert_eq!(config.functional_units.add_sub.units, 4);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Reorder buffer sizing.
    #[serde(default)]
    pub rob: RobConfig,
    /// Per-class functional unit latency and count.
    #[serde(default)]
    pub functional_units: FunctionalUnitConfig,
    /// General simulation options.
    #[serde(default)]
    pub general: GeneralConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rob: RobConfig::default(),
            functional_units: FunctionalUnitConfig::default(),
            general: GeneralConfig::default(),
        }
    }
}

/// Reorder buffer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RobConfig {
    /// Number of in-flight instruction slots.
    #[serde(default = "RobConfig::default_capacity")]
    pub capacity: usize,
}

impl RobConfig {
    fn default_capacity() -> usize {
        defaults::ROB_CAPACITY
    }
}

impl Default for RobConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::ROB_CAPACITY,
        }
    }
}

/// Latency and unit count for one functional unit class.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct UnitClassConfig {
    /// Cycles from dispatch to completion.
    pub latency: u32,
    /// Number of independent pipelines of this class.
    pub units: usize,
}

/// Per-opcode-class functional unit configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionalUnitConfig {
    /// ADD/SUB class.
    #[serde(default = "FunctionalUnitConfig::default_add_sub")]
    pub add_sub: UnitClassConfig,
    /// NAND class.
    #[serde(default = "FunctionalUnitConfig::default_nand")]
    pub nand: UnitClassConfig,
    /// MUL class.
    #[serde(default = "FunctionalUnitConfig::default_mul")]
    pub mul: UnitClassConfig,
    /// LOAD class.
    #[serde(default = "FunctionalUnitConfig::default_load")]
    pub load: UnitClassConfig,
    /// STORE class.
    #[serde(default = "FunctionalUnitConfig::default_store")]
    pub store: UnitClassConfig,
    /// BEQ class.
    #[serde(default = "FunctionalUnitConfig::default_beq")]
    pub beq: UnitClassConfig,
    /// CALL/RET class.
    #[serde(default = "FunctionalUnitConfig::default_call_ret")]
    pub call_ret: UnitClassConfig,
}

impl FunctionalUnitConfig {
    fn default_add_sub() -> UnitClassConfig {
        UnitClassConfig {
            latency: defaults::ADD_SUB_LATENCY,
            units: defaults::ADD_SUB_UNITS,
        }
    }

    fn default_nand() -> UnitClassConfig {
        UnitClassConfig {
            latency: defaults::NAND_LATENCY,
            units: defaults::NAND_UNITS,
        }
    }

    fn default_mul() -> UnitClassConfig {
        UnitClassConfig {
            latency: defaults::MUL_LATENCY,
            units: defaults::MUL_UNITS,
        }
    }

    fn default_load() -> UnitClassConfig {
        UnitClassConfig {
            latency: defaults::LOAD_LATENCY,
            units: defaults::LOAD_UNITS,
        }
    }

    fn default_store() -> UnitClassConfig {
        UnitClassConfig {
            latency: defaults::STORE_LATENCY,
            units: defaults::STORE_UNITS,
        }
    }

    fn default_beq() -> UnitClassConfig {
        UnitClassConfig {
            latency: defaults::BEQ_LATENCY,
            units: defaults::BEQ_UNITS,
        }
    }

    fn default_call_ret() -> UnitClassConfig {
        UnitClassConfig {
            latency: defaults::CALL_RET_LATENCY,
            units: defaults::CALL_RET_UNITS,
        }
    }
}

impl Default for FunctionalUnitConfig {
    fn default() -> Self {
        Self {
            add_sub: Self::default_add_sub(),
            nand: Self::default_nand(),
            mul: Self::default_mul(),
            load: Self::default_load(),
            store: Self::default_store(),
            beq: Self::default_beq(),
            call_ret: Self::default_call_ret(),
        }
    }
}

/// General simulation options.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Emit a per-cycle trace line to stderr via `tracing`.
    #[serde(default)]
    pub trace: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { trace: false }
    }
}
