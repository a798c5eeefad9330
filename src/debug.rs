use std::io::{self, Write};

use crate::array::DynamicArray;
use crate::script::Step;

/// Debug output for one executed step
///
/// Prints the step, then one mark per storage slot: `#` for a live
/// element, `_` for a free slot.
pub fn debug_step<W: Write, T>(
    writer: &mut W,
    step: &Step,
    array: &DynamicArray<T>,
) -> io::Result<()> {
    writeln!(writer, "{}:{}: {}", step.origin, step.line, step.op)?;
    writeln!(
        writer,
        "    {} count={} capacity={}",
        slot_map(array),
        array.len(),
        array.capacity()
    )
}

/// One character per slot
fn slot_map<T>(array: &DynamicArray<T>) -> String {
    let free = array.capacity() - array.len();
    format!("{}{}", "#".repeat(array.len()), "_".repeat(free))
}
