//src/molecule/sdf.rs

use std::path::Path;

use super::{Atom, Bond, BondOrder, Element, Molecule};
use crate::error::DockingError;

const FORMAT: &str = "SDF";

/// Fixed-width integer column, falling back to whitespace splitting for
/// writers that do not respect the V2000 columns.
fn fixed_usize(line: &str, range: std::ops::Range<usize>) -> Option<usize> {
    line.get(range).and_then(|s| s.trim().parse().ok())
}

/// V2000 atom block charge code -> formal charge.
fn charge_from_code(code: i32) -> i8 {
    match code {
        1 => 3,
        2 => 2,
        3 => 1,
        5 => -1,
        6 => -2,
        7 => -3,
        _ => 0,
    }
}

fn parse_counts(line: &str, path: &Path) -> Result<(usize, usize), DockingError> {
    if line.contains("V3000") {
        return Err(DockingError::malformed(FORMAT, path, "V3000 MOL blocks are not supported"));
    }
    if let (Some(atoms), Some(bonds)) = (fixed_usize(line, 0..3), fixed_usize(line, 3..6)) {
        return Ok((atoms, bonds));
    }
    let mut fields = line.split_whitespace().map(|s| s.parse::<usize>());
    match (fields.next(), fields.next()) {
        (Some(Ok(atoms)), Some(Ok(bonds))) => Ok((atoms, bonds)),
        _ => Err(DockingError::malformed(
            FORMAT,
            path,
            format!("could not parse counts line '{}'", line.trim_end()),
        )),
    }
}

fn parse_atom(line: &str, path: &Path) -> Result<Atom, DockingError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(DockingError::malformed(
            FORMAT,
            path,
            format!("short atom line '{}'", line.trim_end()),
        ));
    }
    let mut position = [0.0; 3];
    for (slot, field) in position.iter_mut().zip(&fields[..3]) {
        *slot = field.parse().map_err(|_| {
            DockingError::malformed(FORMAT, path, format!("bad coordinate '{}'", field))
        })?;
    }
    let element = Element::from_symbol(fields[3])?;
    let mut atom = Atom::new(element, position);
    if let Some(code) = fields.get(5).and_then(|s| s.parse::<i32>().ok()) {
        atom.formal_charge = charge_from_code(code);
    }
    Ok(atom)
}

fn parse_bond(line: &str, n_atoms: usize, path: &Path) -> Result<Bond, DockingError> {
    let fixed = (
        fixed_usize(line, 0..3),
        fixed_usize(line, 3..6),
        fixed_usize(line, 6..9),
    );
    let (a, b, kind) = match fixed {
        (Some(a), Some(b), Some(kind)) => (a, b, kind),
        _ => {
            let nums: Vec<usize> = line
                .split_whitespace()
                .take(3)
                .filter_map(|s| s.parse().ok())
                .collect();
            if nums.len() < 3 {
                return Err(DockingError::malformed(
                    FORMAT,
                    path,
                    format!("could not parse bond line '{}'", line.trim_end()),
                ));
            }
            (nums[0], nums[1], nums[2])
        }
    };

    if a == 0 || b == 0 || a > n_atoms || b > n_atoms || a == b {
        return Err(DockingError::malformed(
            FORMAT,
            path,
            format!("bond references invalid atoms {} {}", a, b),
        ));
    }
    let order = match kind {
        1 => BondOrder::Single,
        2 => BondOrder::Double,
        3 => BondOrder::Triple,
        4 => BondOrder::Aromatic,
        other => {
            return Err(DockingError::malformed(
                FORMAT,
                path,
                format!("unsupported bond type {}", other),
            ))
        }
    };
    Ok(Bond::new(a - 1, b - 1, order))
}

/// `M  CHG  n aaa vvv ...` property line.
fn apply_charge_property(line: &str, atoms: &mut [Atom]) {
    let fields: Vec<i32> = line
        .split_whitespace()
        .skip(2)
        .filter_map(|s| s.parse().ok())
        .collect();
    let Some((&count, pairs)) = fields.split_first() else {
        return;
    };
    for pair in pairs.chunks(2).take(count.max(0) as usize) {
        if let [idx, charge] = *pair {
            if idx >= 1 && (idx as usize) <= atoms.len() {
                atoms[idx as usize - 1].formal_charge = charge as i8;
            }
        }
    }
}

/// Parses the first MOL block of an SDF text.
///
/// Returns the molecule (not yet sanitized) and the number of records in the
/// file.
pub fn parse_sdf(text: &str, path: &Path) -> Result<(Molecule, usize), DockingError> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < 4 {
        return Err(DockingError::malformed(
            FORMAT,
            path,
            "not enough lines for a MOL header",
        ));
    }

    let name = lines[0].trim().to_string();
    let (n_atoms, n_bonds) = parse_counts(lines[3], path)?;
    let atom_end = 4 + n_atoms;
    let bond_end = atom_end + n_bonds;
    if lines.len() < bond_end {
        return Err(DockingError::malformed(
            FORMAT,
            path,
            format!("expected {} atoms and {} bonds, file is truncated", n_atoms, n_bonds),
        ));
    }

    let mut atoms = lines[4..atom_end]
        .iter()
        .map(|l| parse_atom(l, path))
        .collect::<Result<Vec<_>, _>>()?;
    let bonds = lines[atom_end..bond_end]
        .iter()
        .map(|l| parse_bond(l, n_atoms, path))
        .collect::<Result<Vec<_>, _>>()?;

    // Property block; M  CHG supersedes atom block charges.
    let mut charges_reset = false;
    for line in &lines[bond_end..] {
        if line.starts_with("M  END") || line.starts_with("$$$$") {
            break;
        }
        if line.starts_with("M  CHG") {
            if !charges_reset {
                atoms.iter_mut().for_each(|a| a.formal_charge = 0);
                charges_reset = true;
            }
            apply_charge_property(line, &mut atoms);
        }
    }

    // A MOL block always carries a coordinate block, even a flat 2D or
    // all-zero one; Labute ASA only needs the bond graph.
    let mut mol = Molecule::new(name, atoms, bonds);
    mol.has_conformer = true;
    Ok((mol, count_records(&lines)))
}

/// Records are terminated by `$$$$`; a trailing block without one still counts.
fn count_records(lines: &[&str]) -> usize {
    let mut records = 0;
    let mut pending = false;
    for line in lines {
        if line.starts_with("$$$$") {
            records += 1;
            pending = false;
        } else if !line.trim().is_empty() {
            pending = true;
        }
    }
    records + usize::from(pending)
}

#[cfg(test)]
mod tests {
    use super::*;

    pub const ETHANOL_SDF: &str = "\
ethanol
  test

  3  2  0  0  0  0  0  0  0  0999 V2000
   -0.8883    0.1670    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    0.4658   -0.5022    0.0000 C   0  0  0  0  0  0  0  0  0  0  0  0
    1.4225    0.5413    0.0000 O   0  0  0  0  0  0  0  0  0  0  0  0
  1  2  1  0
  2  3  1  0
M  END
$$$$
";

    #[test]
    fn parses_ethanol() {
        let (mut mol, records) = parse_sdf(ETHANOL_SDF, Path::new("ethanol.sdf")).unwrap();
        assert_eq!(records, 1);
        assert_eq!(mol.name, "ethanol");
        assert_eq!(mol.atoms.len(), 3);
        assert_eq!(mol.bonds.len(), 2);
        assert!(mol.has_conformer);
        mol.sanitize().unwrap();
        assert_eq!(mol.total_hs(0), 3);
        assert_eq!(mol.total_hs(2), 1);
    }

    #[test]
    fn counts_multiple_records() {
        let two = format!("{}{}", ETHANOL_SDF, ETHANOL_SDF);
        let (_, records) = parse_sdf(&two, Path::new("two.sdf")).unwrap();
        assert_eq!(records, 2);
    }

    #[test]
    fn charge_property_overrides_atom_block() {
        let text = "\
acetate
  test

  4  3  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 C   0  0  0  0  0  0
    1.5000    0.0000    0.0000 C   0  0  0  0  0  0
    2.2000    1.1000    0.0000 O   0  0  0  0  0  0
    2.2000   -1.1000    0.0000 O   0  3  0  0  0  0
  1  2  1  0
  2  3  2  0
  2  4  1  0
M  CHG  1   4  -1
M  END
";
        let (mut mol, _) = parse_sdf(text, Path::new("acetate.sdf")).unwrap();
        assert_eq!(mol.atoms[3].formal_charge, -1);
        mol.sanitize().unwrap();
        assert_eq!(mol.total_hs(3), 0);
    }

    #[test]
    fn zero_coordinates_still_count_as_conformer() {
        let text = "\
methanol
  test

  2  1  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 C   0  0  0  0  0  0
    0.0000    0.0000    0.0000 O   0  0  0  0  0  0
  1  2  1  0
M  END
";
        let (mut mol, _) = parse_sdf(text, Path::new("methanol.sdf")).unwrap();
        assert!(mol.has_conformer);
        mol.sanitize().unwrap();
        let descriptors = crate::descriptors::compute_descriptors(&mol);
        assert!(descriptors.sasa.unwrap() > 0.0);
    }

    #[test]
    fn rejects_truncated_blocks() {
        let text = "x\n\n\n  5  4  0  0  0  0  0  0  0  0999 V2000\n";
        let err = parse_sdf(text, Path::new("bad.sdf")).unwrap_err();
        assert!(matches!(err, DockingError::Malformed { .. }));
    }

    #[test]
    fn rejects_v3000() {
        let text = "x\n\n\n  0  0  0     0  0            999 V3000\n";
        assert!(parse_sdf(text, Path::new("v3.sdf")).is_err());
    }
}
