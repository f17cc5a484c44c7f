//! PDBQT ligand reader.
//!
//! PDBQT carries AutoDock atom types and partial charges but no bond orders
//! (and usually no bonds at all), so connectivity is rebuilt from distances
//! and double bonds are inferred from bond lengths.

use std::path::Path;

use ahash::AHashMap;
use log::debug;

use super::{Atom, Bond, BondOrder, Element, Molecule};
use crate::error::DockingError;

const FORMAT: &str = "PDBQT";

/// Added to the sum of covalent radii when deciding whether two atoms bond.
const BOND_TOLERANCE: f64 = 0.45;
/// Closer than this is treated as overlapping atoms, not a bond.
const MIN_BOND_DISTANCE: f64 = 0.4;

/// AutoDock atom type -> element, with the aromatic-carbon hint.
fn element_from_ad_type(ad_type: &str) -> Option<(Element, bool)> {
    let parsed = match ad_type {
        "A" => (Element::C, true),
        "C" => (Element::C, false),
        "N" | "NA" | "NS" => (Element::N, false),
        "O" | "OA" | "OS" => (Element::O, false),
        "S" | "SA" => (Element::S, false),
        "H" | "HD" | "HS" => (Element::H, false),
        other => (Element::from_symbol(other).ok()?, false),
    };
    Some(parsed)
}

/// Element from a PDB atom name such as " C12" or "CL1".
fn element_from_atom_name(name: &str) -> Option<Element> {
    let letters: String = name.trim().chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    if letters.len() >= 2 {
        if let Ok(e) = Element::from_symbol(&letters[..2]) {
            if matches!(e, Element::Cl | Element::Br) {
                return Some(e);
            }
        }
    }
    letters.get(..1).and_then(|s| Element::from_symbol(s).ok())
}

fn coordinate(line: &str, range: std::ops::Range<usize>, path: &Path) -> Result<f64, DockingError> {
    line.get(range)
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| DockingError::malformed(FORMAT, path, format!("bad coordinates in '{}'", line.trim_end())))
}

/// Shortest length (Å) at which a pair is still read as a double bond, and as
/// a triple bond where one exists.
fn multiple_bond_cutoffs(a: Element, b: Element) -> (Option<f64>, Option<f64>) {
    use Element::*;
    let pair = if (a as u8) <= (b as u8) { (a, b) } else { (b, a) };
    match pair {
        (C, O) => (Some(1.28), None),
        (C, N) => (Some(1.30), Some(1.20)),
        (C, C) => (Some(1.38), Some(1.24)),
        (C, S) => (Some(1.70), None),
        (N, O) => (Some(1.26), None),
        (O, S) => (Some(1.50), None),
        (O, P) => (Some(1.52), None),
        _ => (None, None),
    }
}

/// Parses the first model of a PDBQT file into an unsanitized molecule.
pub fn parse_pdbqt(text: &str, path: &Path) -> Result<Molecule, DockingError> {
    let mut atoms: Vec<Atom> = Vec::new();
    let mut serial_to_index: AHashMap<usize, usize> = AHashMap::new();
    let mut conect: Vec<(usize, usize)> = Vec::new();
    let mut name = path
        .file_stem()
        .map(|s| s.to_string_lossy().replace(".pdbqt", ""))
        .unwrap_or_default();

    for line in text.lines() {
        if line.starts_with("ENDMDL") {
            break;
        }
        if line.starts_with("REMARK  Name =") {
            name = line["REMARK  Name =".len()..].trim().to_string();
            continue;
        }
        if line.starts_with("CONECT") {
            let serials: Vec<usize> = line
                .get(6..)
                .unwrap_or("")
                .split_whitespace()
                .filter_map(|s| s.parse().ok())
                .collect();
            if let Some((&first, rest)) = serials.split_first() {
                conect.extend(rest.iter().map(|&other| (first, other)));
            }
            continue;
        }
        if !(line.starts_with("ATOM") || line.starts_with("HETATM")) {
            continue;
        }

        let x = coordinate(line, 30..38, path)?;
        let y = coordinate(line, 38..46, path)?;
        let z = coordinate(line, 46..54, path)?;

        let ad_type = line.get(77..).map(str::trim).unwrap_or("");
        let atom_name = line.get(12..16).unwrap_or("");
        let from_type = if ad_type.is_empty() {
            None
        } else {
            element_from_ad_type(ad_type)
        };
        let (element, aromatic) = from_type
            .or_else(|| element_from_atom_name(atom_name).map(|e| (e, false)))
            .ok_or_else(|| DockingError::UnknownElement(format!("{} / {}", ad_type, atom_name.trim())))?;

        let mut atom = Atom::new(element, [x, y, z]);
        atom.aromatic = aromatic;

        if let Some(serial) = line.get(6..11).and_then(|s| s.trim().parse().ok()) {
            serial_to_index.insert(serial, atoms.len());
        }
        atoms.push(atom);
    }

    if atoms.is_empty() {
        return Err(DockingError::malformed(FORMAT, path, "no ATOM/HETATM records"));
    }

    let mut bonds = if conect.is_empty() {
        perceive_bonds(&atoms)
    } else {
        bonds_from_conect(&conect, &serial_to_index)
    };
    debug!("{}: {} atoms, {} bonds", path.display(), atoms.len(), bonds.len());

    assign_bond_orders(&atoms, &mut bonds);
    assign_formal_charges(&mut atoms, &bonds);

    Ok(Molecule::new(name, atoms, bonds))
}

fn bonds_from_conect(conect: &[(usize, usize)], serial_to_index: &AHashMap<usize, usize>) -> Vec<Bond> {
    let mut seen = ahash::AHashSet::new();
    let mut bonds = Vec::new();
    for &(a, b) in conect {
        if let (Some(&i), Some(&j)) = (serial_to_index.get(&a), serial_to_index.get(&b)) {
            if i != j && seen.insert((i.min(j), i.max(j))) {
                bonds.push(Bond::new(i.min(j), i.max(j), BondOrder::Single));
            }
        }
    }
    bonds
}

/// Distance-based connectivity; each hydrogen keeps only its closest partner.
fn perceive_bonds(atoms: &[Atom]) -> Vec<Bond> {
    let mut bonds = Vec::new();
    let mut best_h_partner: AHashMap<usize, (usize, f64)> = AHashMap::new();

    for i in 0..atoms.len() {
        for j in (i + 1)..atoms.len() {
            let (a, b) = (&atoms[i], &atoms[j]);
            if a.element.is_hydrogen() && b.element.is_hydrogen() {
                continue;
            }
            let d = a.distance(b);
            let limit = a.element.covalent_radius() + b.element.covalent_radius() + BOND_TOLERANCE;
            if d < MIN_BOND_DISTANCE || d > limit {
                continue;
            }
            if a.element.is_hydrogen() || b.element.is_hydrogen() {
                let (h, heavy) = if a.element.is_hydrogen() { (i, j) } else { (j, i) };
                let entry = best_h_partner.entry(h).or_insert((heavy, d));
                if d < entry.1 {
                    *entry = (heavy, d);
                }
            } else {
                bonds.push(Bond::new(i, j, BondOrder::Single));
            }
        }
    }

    let mut h_bonds: Vec<(usize, usize)> = best_h_partner.into_iter().map(|(h, (heavy, _))| (h, heavy)).collect();
    h_bonds.sort_unstable();
    bonds.extend(h_bonds.into_iter().map(|(h, heavy)| Bond::new(heavy.min(h), heavy.max(h), BondOrder::Single)));
    bonds
}

/// Upgrades short bonds to double/triple, shortest first, as long as neither
/// atom runs out of valence. Bonds between two aromatic-typed atoms are left
/// for aromaticity perception.
fn assign_bond_orders(atoms: &[Atom], bonds: &mut [Bond]) {
    let mut used: Vec<u32> = vec![0; atoms.len()];
    for bond in bonds.iter() {
        used[bond.begin] += 1;
        used[bond.end] += 1;
    }
    let capacity = |idx: usize, partner: Element, used: &[u32]| -> u32 {
        let element = atoms[idx].element;
        let max = element.valences().iter().copied().max().unwrap_or(0) as u32;
        let first = element.valences().first().copied().unwrap_or(0) as u32;
        // S and P may expand their valence; nitro N=O goes to N+.
        let limit = match element {
            Element::S | Element::P | Element::Se => max,
            Element::N if partner == Element::O => 4,
            _ => first,
        };
        limit.saturating_sub(used[idx])
    };

    let mut order: Vec<usize> = (0..bonds.len()).collect();
    order.sort_by(|&x, &y| {
        let dx = atoms[bonds[x].begin].distance(&atoms[bonds[x].end]);
        let dy = atoms[bonds[y].begin].distance(&atoms[bonds[y].end]);
        dx.total_cmp(&dy)
    });

    for idx in order {
        let bond = bonds[idx];
        let (a, b) = (&atoms[bond.begin], &atoms[bond.end]);
        if a.aromatic && b.aromatic {
            continue;
        }
        let (double_cut, triple_cut) = multiple_bond_cutoffs(a.element, b.element);
        let d = a.distance(b);
        let free = capacity(bond.begin, b.element, &used).min(capacity(bond.end, a.element, &used));

        if let Some(cut) = triple_cut {
            if d < cut && free >= 2 {
                bonds[idx].order = BondOrder::Triple;
                used[bond.begin] += 2;
                used[bond.end] += 2;
                continue;
            }
        }
        if let Some(cut) = double_cut {
            if d < cut && free >= 1 {
                bonds[idx].order = BondOrder::Double;
                used[bond.begin] += 1;
                used[bond.end] += 1;
            }
        }
    }
}

/// PDBQT has partial, not formal, charges. Four-connected nitrogens are
/// read as ammonium/nitro N+, and a singly bonded oxygen on such a nitrogen
/// as O-.
fn assign_formal_charges(atoms: &mut [Atom], bonds: &[Bond]) {
    let mut valence = vec![0u32; atoms.len()];
    let mut degree = vec![0u32; atoms.len()];
    for bond in bonds {
        let v = match bond.order {
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            _ => 1,
        };
        valence[bond.begin] += v;
        valence[bond.end] += v;
        degree[bond.begin] += 1;
        degree[bond.end] += 1;
    }

    for (idx, atom) in atoms.iter_mut().enumerate() {
        if atom.element == Element::N && !atom.aromatic && valence[idx] == 4 {
            atom.formal_charge = 1;
        }
    }
    for bond in bonds {
        for (o, n) in [(bond.begin, bond.end), (bond.end, bond.begin)] {
            if atoms[o].element == Element::O
                && degree[o] == 1
                && bond.order == BondOrder::Single
                && atoms[n].element == Element::N
                && atoms[n].formal_charge == 1
                && degree[n] == 3
            {
                atoms[o].formal_charge = -1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom_line(serial: usize, name: &str, x: f64, y: f64, z: f64, ad_type: &str) -> String {
        format!(
            "ATOM  {:>5} {:<4} LIG A   1    {:>8.3}{:>8.3}{:>8.3}  0.00  0.00    +0.000 {}",
            serial, name, x, y, z, ad_type
        )
    }

    fn benzene_pdbqt() -> String {
        let mut lines = vec!["REMARK  Name = benzene".to_string(), "ROOT".to_string()];
        for i in 0..6 {
            let angle = std::f64::consts::PI / 3.0 * i as f64;
            lines.push(atom_line(i + 1, &format!("C{}", i + 1), 1.39 * angle.cos(), 1.39 * angle.sin(), 0.0, "A"));
        }
        lines.push("ENDROOT".to_string());
        lines.push("TORSDOF 0".to_string());
        lines.join("\n")
    }

    #[test]
    fn aromatic_ring_from_ad_types() {
        let mut mol = parse_pdbqt(&benzene_pdbqt(), Path::new("benzene.pdbqt")).unwrap();
        assert_eq!(mol.name, "benzene");
        assert_eq!(mol.bonds.len(), 6);
        mol.sanitize().unwrap();
        assert_eq!(mol.aromatic_ring_count(), 1);
        assert!(mol.atoms.iter().all(|a| a.implicit_hs == 1));
    }

    #[test]
    fn short_carbonyl_becomes_double() {
        // acetaldehyde-like C-C=O with geometry only
        let text = [
            atom_line(1, "C1", 0.0, 0.0, 0.0, "C"),
            atom_line(2, "C2", 1.50, 0.0, 0.0, "C"),
            atom_line(3, "O1", 2.10, 1.04, 0.0, "OA"),
        ]
        .join("\n");
        let mut mol = parse_pdbqt(&text, Path::new("ald.pdbqt")).unwrap();
        assert_eq!(mol.bonds.len(), 2);
        let co = mol.bonds.iter().find(|b| b.begin == 1 && b.end == 2).unwrap();
        assert_eq!(co.order, BondOrder::Double);
        mol.sanitize().unwrap();
        assert_eq!(mol.total_hs(1), 1);
        assert_eq!(mol.total_hs(2), 0);
    }

    #[test]
    fn only_first_model_is_read() {
        let text = format!(
            "MODEL 1\n{}\nENDMDL\nMODEL 2\n{}\nENDMDL\n",
            atom_line(1, "C1", 0.0, 0.0, 0.0, "C"),
            atom_line(1, "C1", 5.0, 0.0, 0.0, "C")
        );
        let mol = parse_pdbqt(&text, Path::new("poses.pdbqt")).unwrap();
        assert_eq!(mol.atoms.len(), 1);
    }

    #[test]
    fn conect_records_define_bonds() {
        let text = [
            atom_line(1, "C1", 0.0, 0.0, 0.0, "C"),
            atom_line(2, "O1", 5.0, 0.0, 0.0, "OA"),
            "CONECT    1    2".to_string(),
        ]
        .join("\n");
        let mol = parse_pdbqt(&text, Path::new("far.pdbqt")).unwrap();
        assert_eq!(mol.bonds.len(), 1);
    }

    #[test]
    fn element_falls_back_to_atom_name() {
        assert_eq!(element_from_atom_name("CL1"), Some(Element::Cl));
        assert_eq!(element_from_atom_name(" C12"), Some(Element::C));
        assert_eq!(element_from_ad_type("NA"), Some((Element::N, false)));
    }

    #[test]
    fn empty_file_is_malformed() {
        assert!(parse_pdbqt("REMARK nothing\n", Path::new("e.pdbqt")).is_err());
    }
}
