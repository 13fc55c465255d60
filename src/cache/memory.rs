//! Memory Probe Module
//!
//! Reports how much system memory is currently available, which bounds the
//! total size of cached chunks.

use parking_lot::Mutex;
use sysinfo::System;

// == Memory Probe Trait ==
/// Source of the "currently available system memory" figure.
pub trait MemoryProbe: Send + Sync {
    /// Available memory in bytes.
    fn available_bytes(&self) -> u64;
}

// == System Memory ==
/// Reads available memory from the OS.
///
/// The `sysinfo::System` handle is created once and refreshed on each call,
/// only the memory figures are reloaded.
pub struct SystemMemory {
    system: Mutex<System>,
}

impl SystemMemory {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SystemMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SystemMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemMemory").finish_non_exhaustive()
    }
}

impl MemoryProbe for SystemMemory {
    fn available_bytes(&self) -> u64 {
        let mut sys = self.system.lock();
        sys.refresh_memory();
        sys.available_memory()
    }
}

// == Fixed Memory ==
/// Always reports the same amount of available memory.
#[derive(Debug, Clone, Copy)]
pub struct FixedMemory(pub u64);

impl MemoryProbe for FixedMemory {
    fn available_bytes(&self) -> u64 {
        self.0
    }
}

/// Applies the configured fraction to an available-memory figure.
pub fn memory_limit(available: u64, fraction: f64) -> u64 {
    (available as f64 * fraction).floor() as u64
}
