//! Whether advanced effects may run on this renderer.

use orrery_config::schema::AdvancedMode;
use serde::Serialize;

pub const MIN_CORES: u32 = 4;
pub const MIN_MEMORY_GB: f64 = 4.0;

/// Renderer and hardware facts, supplied by the host at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Capabilities {
    /// GPU-accelerated (WebGL-class) renderer.
    pub accelerated: bool,
    pub cores: Option<u32>,
    pub memory_gb: Option<f64>,
}

impl Capabilities {
    /// A software renderer. Advanced effects only run when forced.
    pub fn software() -> Self {
        Self {
            accelerated: false,
            cores: None,
            memory_gb: None,
        }
    }

    /// An accelerated renderer with unknown hardware.
    pub fn accelerated() -> Self {
        Self {
            accelerated: true,
            ..Self::software()
        }
    }

    pub fn with_cores(mut self, cores: u32) -> Self {
        self.cores = Some(cores);
        self
    }

    pub fn with_memory_gb(mut self, memory_gb: f64) -> Self {
        self.memory_gb = Some(memory_gb);
        self
    }

    /// Fill in the core count from the OS when it can be read.
    pub fn with_detected_cores(self) -> Self {
        match std::thread::available_parallelism() {
            Ok(n) => self.with_cores(u32::try_from(n.get()).unwrap_or(u32::MAX)),
            Err(_) => self,
        }
    }

    /// Accelerated renderer, and enough cores and memory where reported.
    pub fn supports_advanced(&self) -> bool {
        self.accelerated
            && self.cores.map_or(true, |c| c >= MIN_CORES)
            && self.memory_gb.map_or(true, |m| m >= MIN_MEMORY_GB)
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::software()
    }
}

pub fn advanced_allowed(mode: AdvancedMode, caps: &Capabilities) -> bool {
    match mode {
        AdvancedMode::Auto => caps.supports_advanced(),
        AdvancedMode::Off => false,
        AdvancedMode::Force => true,
    }
}
