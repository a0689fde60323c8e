use crate::io::error::Error;
use crate::model::structure::Structure;
use std::io::Write;

/// Writes a structure as fixed-column PDB `ATOM`/`HETATM` records.
///
/// A `TER` record closes each chain; serial numbers restart at 1.
pub fn write<W: Write>(mut writer: W, structure: &Structure) -> Result<(), Error> {
    let mut serial = 1usize;
    let mut last_chain: Option<char> = None;

    for residue in &structure.residues {
        if last_chain.is_some_and(|chain| chain != residue.chain_id) {
            writeln!(writer, "TER")?;
        }
        last_chain = Some(residue.chain_id);

        for &ai in &residue.atoms {
            let atom = &structure.atoms[ai];
            let record = if atom.hetero { "HETATM" } else { "ATOM  " };
            writeln!(
                writer,
                "{record}{serial:>5} {name:<4}{alt}{resname:>3} {chain}{resnum:>4}{icode}   {x:>8.3}{y:>8.3}{z:>8.3}{occ:>6.2}{bfac:>6.2}          {element:>2}",
                serial = serial % 100_000,
                name = format_atom_name(&atom.name, atom.element.symbol()),
                alt = ' ',
                resname = residue.name,
                chain = residue.chain_id,
                resnum = residue.residue_number,
                icode = residue.insertion_code,
                x = atom.position[0],
                y = atom.position[1],
                z = atom.position[2],
                occ = 1.0,
                bfac = 0.0,
                element = atom.element.symbol().to_ascii_uppercase(),
            )?;
            serial += 1;
        }
    }

    if last_chain.is_some() {
        writeln!(writer, "TER")?;
    }
    writeln!(writer, "END")?;
    Ok(())
}

// One-letter elements with names shorter than four characters start in
// column 14, the usual PDB convention.
fn format_atom_name(name: &str, symbol: &str) -> String {
    if name.len() < 4 && symbol.len() == 1 {
        format!(" {name}")
    } else {
        name.to_string()
    }
}

/// Renders a structure to an in-memory PDB block.
pub fn to_string(structure: &Structure) -> Result<String, Error> {
    let mut buf = Vec::new();
    write(&mut buf, structure)?;
    String::from_utf8(buf).map_err(|e| {
        Error::Io {
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::pdb::reader;
    use crate::model::element::Element;
    use std::io::Cursor;

    fn sample() -> Structure {
        let mut s = Structure::new();
        let r0 = s.add_residue("ALA", 'A', 1);
        s.add_atom(r0, "N", Element::N, [11.104, 6.134, -6.504]);
        s.add_atom(r0, "CA", Element::C, [11.639, 6.071, -5.147]);
        let r1 = s.add_residue("ZN", 'B', 101);
        let zn = s.add_atom(r1, "ZN", Element::Zn, [0.0, 0.0, 0.0]);
        s.atoms[zn].hetero = true;
        s
    }

    #[test]
    fn writes_fixed_columns() {
        let text = to_string(&sample()).expect("write");
        let first = text.lines().next().expect("first line");
        assert_eq!(&first[0..6], "ATOM  ");
        assert_eq!(&first[12..16], " N  ");
        assert_eq!(&first[17..20], "ALA");
        assert_eq!(first.chars().nth(21), Some('A'));
        assert_eq!(first[30..38].trim(), "11.104");
        assert!(text.contains("HETATM"));
        assert!(text.trim_end().ends_with("END"));
    }

    #[test]
    fn written_block_reads_back() {
        let original = sample();
        let text = to_string(&original).expect("write");
        let back = reader::read(Cursor::new(text)).expect("read back");
        assert_eq!(back.residue_count(), 2);
        assert_eq!(back.sequence(), original.sequence());
        for (a, b) in original.atoms.iter().zip(&back.atoms) {
            assert_eq!(a.element, b.element);
            assert_eq!(a.name, b.name);
            for k in 0..3 {
                assert!((a.position[k] - b.position[k]).abs() < 1e-3);
            }
        }
    }
}
