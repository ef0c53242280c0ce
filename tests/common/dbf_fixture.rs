//! Hand-assembled dBASE III tables.

/// Plain dBASE III table.
pub const DBASE3: u8 = 0x03;
/// dBASE III table with a `.dbt` memo companion.
pub const DBASE3_MEMO: u8 = 0x83;

/// `fields` is `(name, type, width, decimals)`. `N` cells are right-aligned,
/// every other cell is left-aligned, and both are cut to the field width.
pub fn dbf_bytes(version: u8, fields: &[(&str, u8, u8, u8)], rows: &[Vec<&str>]) -> Vec<u8> {
    let header_len = 32 + 32 * fields.len() + 1;
    let record_len = 1 + fields.iter().map(|f| f.2 as usize).sum::<usize>();

    let mut out = vec![version, 107, 6, 30];
    out.extend_from_slice(&(rows.len() as u32).to_le_bytes());
    out.extend_from_slice(&(header_len as u16).to_le_bytes());
    out.extend_from_slice(&(record_len as u16).to_le_bytes());
    out.extend_from_slice(&[0u8; 20]);

    for (name, ty, width, decimals) in fields {
        let mut desc = [0u8; 32];
        desc[..name.len()].copy_from_slice(name.as_bytes());
        desc[11] = *ty;
        desc[16] = *width;
        desc[17] = *decimals;
        out.extend_from_slice(&desc);
    }
    out.push(0x0D);

    for row in rows {
        out.push(b' ');
        for ((_, ty, width, _), cell) in fields.iter().zip(row) {
            let w = *width as usize;
            let padded = if *ty == b'N' {
                format!("{:>w$}", cell, w = w)
            } else {
                format!("{:<w$}", cell, w = w)
            };
            out.extend_from_slice(&padded.as_bytes()[..w]);
        }
    }
    out.push(0x1A);
    out
}
