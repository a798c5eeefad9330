use std::io::Write;

use tracing::debug;

use crate::array::DynamicArray;
use crate::config::Config;
use crate::debug::debug_step;
use crate::error::{DynarrError, Result};
use crate::output::{write_array, write_element, write_len};
use crate::script::{Op, Step};

/// One array driven by script steps
pub struct Session<'a> {
    array: DynamicArray,
    config: &'a Config,
    failures: usize,
}

impl<'a> Session<'a> {
    pub fn new(config: &'a Config) -> Result<Self> {
        Ok(Self {
            array: DynamicArray::create(config.capacity)?,
            config,
            failures: 0,
        })
    }

    pub fn array(&self) -> &DynamicArray {
        &self.array
    }

    /// Steps that failed and were skipped under keep-going
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Apply one operation, writing any rendering to `out`
    pub fn apply<W: Write>(&mut self, op: &Op, out: &mut W) -> Result<()> {
        match op {
            Op::Insert { index, value } => {
                let index = to_index(*index, self.array.len())?;
                self.array.insert(index, value.clone())?;
            }
            Op::Append(value) => self.array.append(value.clone())?,
            Op::Remove(value) => {
                self.array.remove(value)?;
            }
            Op::Read(index) => {
                let index = to_index(*index, self.array.len())?;
                let element = self.array.read(index)?;
                write_element(out, element)?;
            }
            Op::Print => write_array(out, &self.array)?,
            Op::Grow => self.array.grow()?,
            Op::Len => write_len(out, &self.array)?,
        }
        Ok(())
    }

    /// Run steps in order
    ///
    /// A failed step aborts the run unless keep-going is set, in which case
    /// it is reported on `diag` and skipped.
    pub fn run<W: Write, D: Write>(
        &mut self,
        steps: &[Step],
        out: &mut W,
        diag: &mut D,
    ) -> Result<()> {
        for step in steps {
            let result = self.apply(&step.op, out);

            if self.config.debug {
                debug_step(diag, step, &self.array)?;
            }

            if let Err(e) = result {
                let e = DynarrError::at_line(&step.origin, step.line, e);
                if !self.config.keep_going {
                    return Err(e);
                }
                writeln!(diag, "dynarr: {}", e)?;
                debug!(origin = %step.origin, line = step.line, "skipped failed step");
                self.failures += 1;
            }
        }
        Ok(())
    }

    /// Run steps, then flush `out`
    ///
    /// A failed step is reported ahead of a failed flush.
    pub fn run_and_flush<W: Write, D: Write>(
        &mut self,
        steps: &[Step],
        out: &mut W,
        diag: &mut D,
    ) -> Result<()> {
        let result = self.run(steps, out, diag);
        let flushed = out.flush();
        result?;
        flushed?;
        Ok(())
    }

    /// Destroy the array, returning how many elements were released
    pub fn finish(self) -> usize {
        let released = self.array.destroy();
        debug!(released, failures = self.failures, "session finished");
        released
    }
}

/// Convert a signed script index, rejecting negatives
fn to_index(raw: i64, count: usize) -> Result<usize> {
    usize::try_from(raw).map_err(|_| DynarrError::IndexOutOfRange { index: raw, count })
}
