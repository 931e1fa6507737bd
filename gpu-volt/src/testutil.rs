//! Fakes for the regulator and thermal-framework collaborators.

use parking_lot::Mutex;

use crate::Microvolts;
use crate::regulator::{LinearRange, Regulator, RegulatorError, VoltageSteps, round_voltage};
use crate::thermal::{CoolingError, CoolingHost, CoolingId};

/// 500mV..=3V in 10mV steps, wide enough for every GM20B row.
pub const TEST_RANGE: LinearRange = LinearRange::new(500_000, 10_000, 251);

#[derive(Debug)]
pub struct FakeRegulator {
    steps: LinearRange,
    voltage: Mutex<Microvolts>,
    writes: Mutex<Vec<(Microvolts, Microvolts)>>,
    fail_writes: Mutex<bool>,
    fail_reads: Mutex<bool>,
}

impl FakeRegulator {
    pub fn new(voltage: Microvolts) -> Self {
        Self {
            steps: TEST_RANGE,
            voltage: Mutex::new(voltage),
            writes: Mutex::new(Vec::new()),
            fail_writes: Mutex::new(false),
            fail_reads: Mutex::new(false),
        }
    }

    pub fn with_steps(mut self, steps: LinearRange) -> Self {
        self.steps = steps;
        self
    }

    pub fn voltage(&self) -> Microvolts {
        *self.voltage.lock()
    }

    pub fn writes(&self) -> Vec<(Microvolts, Microvolts)> {
        self.writes.lock().clone()
    }

    pub fn fail_writes(&self, fail: bool) {
        *self.fail_writes.lock() = fail;
    }

    pub fn fail_reads(&self, fail: bool) {
        *self.fail_reads.lock() = fail;
    }
}

impl VoltageSteps for FakeRegulator {
    fn count_voltages(&self) -> usize {
        self.steps.count_voltages()
    }

    fn list_voltage(&self, selector: usize) -> Option<Microvolts> {
        self.steps.list_voltage(selector)
    }
}

impl Regulator for FakeRegulator {
    fn get_voltage(&self) -> Result<Microvolts, RegulatorError> {
        if *self.fail_reads.lock() {
            return Err(RegulatorError::Unavailable);
        }
        Ok(*self.voltage.lock())
    }

    fn set_voltage(&self, min_uv: Microvolts, max_uv: Microvolts) -> Result<(), RegulatorError> {
        if *self.fail_writes.lock() {
            return Err(RegulatorError::Rejected("injected failure".to_string()));
        }

        let uv = round_voltage(&self.steps, min_uv)
            .map_err(|e| RegulatorError::Rejected(e.to_string()))?;
        if uv > max_uv {
            return Err(RegulatorError::Rejected(format!(
                "{uv}uV above window [{min_uv}, {max_uv}]"
            )));
        }

        self.writes.lock().push((min_uv, max_uv));
        *self.voltage.lock() = uv;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeCoolingHost {
    registered: Mutex<Vec<(CoolingId, String, usize)>>,
    next_id: Mutex<u64>,
    reject: bool,
}

impl FakeCoolingHost {
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Default::default()
        }
    }

    /// Currently registered devices as `(name, max_state)`.
    pub fn registered(&self) -> Vec<(String, usize)> {
        self.registered
            .lock()
            .iter()
            .map(|(_, name, max_state)| (name.clone(), *max_state))
            .collect()
    }
}

impl CoolingHost for FakeCoolingHost {
    fn register(&self, name: &str, max_state: usize) -> Result<CoolingId, CoolingError> {
        if self.reject {
            return Err(CoolingError::Rejected {
                name: name.to_string(),
                reason: "injected failure".to_string(),
            });
        }

        let mut next_id = self.next_id.lock();
        let id = CoolingId(*next_id);
        *next_id += 1;

        self.registered.lock().push((id, name.to_string(), max_state));
        Ok(id)
    }

    fn unregister(&self, id: CoolingId) {
        self.registered.lock().retain(|(registered, _, _)| *registered != id);
    }
}
