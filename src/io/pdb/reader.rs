use crate::io::{Format, error::Error};
use crate::model::{atom::Atom, element::Element, residue::Residue, structure::Structure};
use std::io::BufRead;

/// Reads the first model of a PDB file.
///
/// `ATOM` and `HETATM` records are kept; consecutive records sharing chain,
/// residue number, insertion code and residue name form one residue. For
/// alternate locations only the blank or `A` conformer is kept.
pub fn read<R: BufRead>(reader: R) -> Result<Structure, Error> {
    let mut structure = Structure::new();
    let mut current: Option<ResidueKey> = None;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let ln = i + 1;

        if line.starts_with("ENDMDL") {
            break;
        }
        let hetero = line.starts_with("HETATM");
        if !hetero && !line.starts_with("ATOM") {
            continue;
        }

        let record = parse_atom_record(&line, ln)?;
        if !matches!(record.alt_loc, ' ' | 'A') {
            continue;
        }

        let key = ResidueKey {
            chain_id: record.chain_id,
            residue_number: record.residue_number,
            insertion_code: record.insertion_code,
            name: record.residue_name.clone(),
        };
        if current.as_ref() != Some(&key) {
            let seq_index = structure.residues.len();
            structure.residues.push(Residue::new(
                record.residue_name.clone(),
                record.chain_id,
                record.residue_number,
                Some(record.insertion_code),
                seq_index,
            ));
            current = Some(key);
        }

        let residue = structure.residues.len() - 1;
        let atom_idx = structure.atoms.len();
        let mut atom = Atom::new(
            record.atom_name,
            record.element,
            record.position,
            residue,
            record.chain_id,
        );
        atom.hetero = hetero;
        structure.atoms.push(atom);
        structure.residues[residue].atoms.push(atom_idx);
    }

    Ok(structure)
}

#[derive(Debug, PartialEq, Eq)]
struct ResidueKey {
    chain_id: char,
    residue_number: i32,
    insertion_code: char,
    name: String,
}

struct AtomRecord {
    atom_name: String,
    alt_loc: char,
    residue_name: String,
    chain_id: char,
    residue_number: i32,
    insertion_code: char,
    position: [f64; 3],
    element: Element,
}

fn parse_atom_record(line: &str, ln: usize) -> Result<AtomRecord, Error> {
    if !line.is_ascii() {
        return Err(Error::parse(Format::Pdb, ln, "non-ASCII characters in atom record"));
    }
    if line.len() < 54 {
        return Err(Error::parse(
            Format::Pdb,
            ln,
            "atom record is too short to hold coordinates",
        ));
    }
    let padded = format!("{line:<80}");

    let atom_name_raw = &padded[12..16];
    let alt_loc = column_char(&padded, 16);
    let residue_name = padded[17..20].trim().to_string();
    let chain_id = column_char(&padded, 21);
    let residue_number = padded[22..26]
        .trim()
        .parse::<i32>()
        .map_err(|_| Error::parse(Format::Pdb, ln, "invalid residue sequence number"))?;
    let insertion_code = column_char(&padded, 26);

    let coord = |range: std::ops::Range<usize>, axis: &str| {
        padded[range]
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::parse(Format::Pdb, ln, format!("invalid {axis} coordinate")))
    };
    let position = [coord(30..38, "x")?, coord(38..46, "y")?, coord(46..54, "z")?];

    let element = element_from_record(&padded[76..78], atom_name_raw);

    Ok(AtomRecord {
        atom_name: atom_name_raw.trim().to_string(),
        alt_loc,
        residue_name,
        chain_id,
        residue_number,
        insertion_code,
        position,
        element,
    })
}

fn column_char(padded: &str, idx: usize) -> char {
    padded[idx..idx + 1].chars().next().unwrap_or(' ')
}

// Columns 77-78 when present. Otherwise one-letter elements are
// right-justified in the name field: " CA " is carbon, "CA  " is calcium.
fn element_from_record(element_col: &str, atom_name: &str) -> Element {
    if let Some(el) = Element::guess(element_col) {
        return el;
    }
    let guessed = match atom_name.as_bytes().first() {
        Some(b' ') | Some(b'0'..=b'9') => Element::guess(&atom_name[1..2]),
        _ => Element::guess(&atom_name[..2]),
    };
    guessed.unwrap_or(Element::Unknown)
}
