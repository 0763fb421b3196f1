use std::io::{self, Write};
use std::path::Path;

use crate::dynamics::state::FlightTrace;

/// Write a flight trace in CSV format.
///
/// Columns: time, x, y, vx, vy
pub fn write_trace<W: Write>(writer: &mut W, trace: &FlightTrace) -> io::Result<()> {
    writeln!(writer, "time,x,y,vx,vy")?;

    for s in trace {
        writeln!(
            writer,
            "{:.4},{:.4},{:.4},{:.4},{:.4}",
            s.time, s.pos.x, s.pos.y, s.vel.x, s.vel.y,
        )?;
    }

    Ok(())
}

/// Write a flight trace to a CSV file at the given path.
pub fn write_trace_file<P: AsRef<Path>>(path: P, trace: &FlightTrace) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    write_trace(&mut file, trace)?;
    file.flush()
}
