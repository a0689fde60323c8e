use crate::io::{Format, error::Error};
use crate::model::{element::Element, structure::LigandGeometry};
use std::io::BufRead;

/// Reads the atom block of the first molecule in a V2000 SDF/MOL file.
///
/// Bonds and properties are not needed for windowing or pocket selection and
/// are skipped.
pub fn read<R: BufRead>(reader: R) -> Result<LigandGeometry, Error> {
    let lines = collect_first_block(reader)?;
    if lines.len() < 4 {
        return Err(Error::parse(
            Format::Sdf,
            lines.len().max(1),
            "SDF block must contain at least a header and counts line",
        ));
    }

    let (counts_line_no, counts_line) = &lines[3];
    if counts_line.contains("V3000") {
        return Err(Error::parse(
            Format::Sdf,
            *counts_line_no,
            "V3000 is not supported",
        ));
    }

    let atom_count = parse_atom_count(counts_line, *counts_line_no)?;
    let atom_start = 4;
    if lines.len() < atom_start + atom_count {
        return Err(Error::parse(
            Format::Sdf,
            lines.last().map(|(ln, _)| *ln).unwrap_or(*counts_line_no),
            "SDF block ended before all atoms were specified",
        ));
    }

    let mut positions = Vec::with_capacity(atom_count);
    let mut elements = Vec::with_capacity(atom_count);
    for (ln, raw) in &lines[atom_start..atom_start + atom_count] {
        let (pos, element) = parse_atom(raw, *ln)?;
        positions.push(pos);
        elements.push(element);
    }

    Ok(LigandGeometry::new(positions, elements))
}

fn collect_first_block<R: BufRead>(reader: R) -> Result<Vec<(usize, String)>, Error> {
    let mut lines = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let content = line?;
        if content.trim() == "$$$$" && !lines.is_empty() {
            break;
        }
        lines.push((i + 1, content));
    }
    Ok(lines)
}

// V2000 counts are fixed-width (`aaabbb`); large molecules may leave no
// whitespace between the two fields.
fn parse_atom_count(line: &str, line_no: usize) -> Result<usize, Error> {
    let fixed = line.get(0..3).map(str::trim).filter(|s| !s.is_empty());
    let token = fixed.or_else(|| line.split_whitespace().next());
    token
        .and_then(|t| t.parse::<usize>().ok())
        .ok_or_else(|| Error::parse(Format::Sdf, line_no, "invalid atom count"))
}

fn parse_atom(raw: &str, ln: usize) -> Result<([f64; 3], Element), Error> {
    if raw.len() >= 34 && raw.is_ascii() {
        let padded = format!("{raw:<40}");
        let coord = |range: std::ops::Range<usize>, axis: &str| {
            padded[range].trim().parse::<f64>().map_err(|_| {
                Error::parse(
                    Format::Sdf,
                    ln,
                    format!("invalid {axis} coordinate in atom line"),
                )
            })
        };
        let pos = [coord(0..10, "x")?, coord(10..20, "y")?, coord(20..30, "z")?];
        let element = Element::guess(padded[31..34].trim()).unwrap_or(Element::Unknown);
        return Ok((pos, element));
    }

    // Loosely formatted writers: whitespace-separated x y z symbol.
    let tokens: Vec<_> = raw.split_whitespace().collect();
    if tokens.len() < 4 {
        return Err(Error::parse(Format::Sdf, ln, "invalid atom line"));
    }
    let mut pos = [0.0; 3];
    for (k, token) in tokens[..3].iter().enumerate() {
        pos[k] = token
            .parse::<f64>()
            .map_err(|_| Error::parse(Format::Sdf, ln, "invalid coordinate in atom line"))?;
    }
    let element = Element::guess(tokens[3]).unwrap_or(Element::Unknown);
    Ok((pos, element))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const ETHANOL: &str = "\
ethanol
  test

  3  2  0  0  0  0  0  0  0  0999 V2000
   -1.2700    0.2480    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    0.1390   -0.3080    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    1.0360    0.7890    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0
  2  3  1  0
M  END
$$$$
second
";

    #[test]
    fn reads_atom_block() {
        let lig = read(Cursor::new(ETHANOL)).expect("parse sdf");
        assert_eq!(lig.atom_count(), 3);
        assert_eq!(lig.elements, vec![Element::C, Element::C, Element::O]);
        assert_eq!(lig.positions[2], [1.036, 0.789, 0.0]);
    }

    #[test]
    fn zero_atom_molecule_parses_empty() {
        let text = "empty\n\n\n  0  0  0  0  0  0  0  0  0  0999 V2000\nM  END\n$$$$\n";
        let lig = read(Cursor::new(text)).expect("parse");
        assert!(lig.is_empty());
        assert_eq!(lig.centroid(), None);
    }

    #[test]
    fn rejects_v3000() {
        let text = "x\n\n\n  0  0  0     0  0            999 V3000\n";
        let err = read(Cursor::new(text)).expect_err("V3000 must fail");
        assert!(err.to_string().contains("V3000"));
    }

    #[test]
    fn rejects_truncated_atom_block() {
        let text = "x\n\n\n  5  0  0  0  0  0  0  0  0  0999 V2000\n    0.0    0.0    0.0 C\n";
        assert!(matches!(read(Cursor::new(text)), Err(Error::Parse { .. })));
    }
}
