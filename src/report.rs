use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::aggregator::{PerfTable, HOURS};

/// gnuplot-friendly dump: per class, 24 lines `"<hour 1..24> <avg>"`, then two
/// blank lines so each class becomes its own data-set index.
pub fn write_perf<W: Write>(table: &PerfTable, mut w: W) -> io::Result<()> {
    for (_, avg) in table.iter() {
        for (h, v) in avg.iter().enumerate() {
            writeln!(w, "{} {:.6}", h + 1, v)?;
        }
        w.write_all(b"\n\n")?;
    }
    w.flush()
}

pub fn write_perf_file(table: &PerfTable, out_path: &Path) -> io::Result<()> {
    let f = File::create(out_path)?;
    write_perf(table, BufWriter::new(f))
}

/// Element-wise mean of two tables, used to merge the halves of a history
/// split at a timezone change. Classes follow `a`'s order; a class missing
/// from `b` counts as all zeros there. No weighting by game count.
pub fn mean(a: &PerfTable, b: &PerfTable) -> PerfTable {
    let zeros = [0.0; HOURS];
    let rows = a
        .iter()
        .map(|(class, av)| {
            let bv = b.get(class).unwrap_or(&zeros);
            let mut out = [0.0; HOURS];
            for (h, slot) in out.iter_mut().enumerate() {
                *slot = (av[h] + bv[h]) / 2.0;
            }
            (class.to_string(), out)
        })
        .collect();
    PerfTable::from_rows(rows)
}
