//src/descriptors/crippen.rs
//! Wildman-Crippen atom-typed LogP.

use super::heavy_neighbors;
use crate::molecule::{BondOrder, Element, Molecule};

/// Aliphatic N, O, P, S or halogen.
fn is_aliphatic_hetero(mol: &Molecule, atom: usize) -> bool {
    let a = &mol.atoms[atom];
    !a.aromatic
        && matches!(
            a.element,
            Element::N | Element::O | Element::P | Element::S | Element::F | Element::Cl | Element::Br | Element::I
        )
}

/// Anything outside C, N, O, P, S, halogens and H.
fn is_unusual(element: Element) -> bool {
    !matches!(
        element,
        Element::C
            | Element::N
            | Element::O
            | Element::P
            | Element::S
            | Element::F
            | Element::Cl
            | Element::Br
            | Element::I
            | Element::H
    )
}

fn aromatic_carbon(mol: &Molecule, atom: usize) -> f64 {
    let mut exocyclic: Option<(usize, BondOrder)> = None;
    let mut aromatic_bonds = 0;
    for (nbr, order) in heavy_neighbors(mol, atom) {
        if order == BondOrder::Aromatic {
            aromatic_bonds += 1;
        } else {
            exocyclic = Some((nbr, order));
        }
    }

    if let Some((nbr, BondOrder::Single)) = exocyclic {
        let n = &mol.atoms[nbr];
        if is_unusual(n.element) {
            return -0.5443;
        }
        match n.element {
            Element::F => return 0.0,
            Element::Cl => return 0.2450,
            Element::Br => return 0.1980,
            Element::I => return 0.0,
            _ => {}
        }
    }
    if mol.total_hs(atom) > 0 {
        return 0.1581;
    }
    if aromatic_bonds >= 3 {
        return 0.2955;
    }
    match exocyclic {
        Some((nbr, BondOrder::Single)) => {
            let n = &mol.atoms[nbr];
            if n.aromatic {
                return 0.2713;
            }
            match n.element {
                Element::C => 0.1360,
                Element::N => 0.4619,
                Element::O => 0.5437,
                Element::S => 0.1893,
                _ => 0.08129,
            }
        }
        Some((nbr, BondOrder::Double)) if matches!(mol.atoms[nbr].element, Element::C | Element::N | Element::O) => {
            -0.8186
        }
        _ => 0.08129,
    }
}

fn aliphatic_carbon(mol: &Molecule, atom: usize) -> f64 {
    let neighbors: Vec<(usize, BondOrder)> = heavy_neighbors(mol, atom).collect();

    if neighbors.iter().any(|&(_, o)| o == BondOrder::Triple) {
        return 0.00170;
    }
    if neighbors
        .iter()
        .any(|&(n, o)| o == BondOrder::Double && mol.atoms[n].element != Element::C)
    {
        return -0.2783;
    }
    if neighbors.iter().any(|&(_, o)| o == BondOrder::Double) {
        let conjugated_to_ring = neighbors.iter().any(|&(n, _)| mol.atoms[n].aromatic);
        return if conjugated_to_ring { 0.264 } else { 0.1551 };
    }

    // sp3 from here on
    if neighbors.iter().any(|&(n, _)| is_unusual(mol.atoms[n].element)) {
        return 0.2148;
    }
    let hs = mol.total_hs(atom);
    let hetero = neighbors.iter().filter(|&&(n, _)| is_aliphatic_hetero(mol, n)).count();
    let aromatic: Vec<usize> = neighbors
        .iter()
        .map(|&(n, _)| n)
        .filter(|&n| mol.atoms[n].aromatic)
        .collect();
    let carbons = neighbors
        .iter()
        .filter(|&&(n, _)| mol.atoms[n].element == Element::C && !mol.atoms[n].aromatic)
        .count();

    match hs {
        3 | 4 => {
            if hetero > 0 {
                -0.2035
            } else if let Some(&n) = aromatic.first() {
                if mol.atoms[n].element == Element::C {
                    0.08452
                } else {
                    -0.1444
                }
            } else {
                0.1441
            }
        }
        2 => {
            if hetero > 0 && hetero + carbons == 2 {
                -0.2035
            } else if carbons == 2 {
                0.1441
            } else if !aromatic.is_empty() {
                -0.0516
            } else {
                0.08129
            }
        }
        1 => {
            if hetero > 0 && aromatic.is_empty() {
                -0.2051
            } else if carbons == 3 {
                0.0
            } else if !aromatic.is_empty() {
                0.1193
            } else {
                0.08129
            }
        }
        _ => {
            if hetero > 0 && aromatic.is_empty() {
                -0.2051
            } else if carbons == 4 {
                0.0
            } else if !aromatic.is_empty() {
                -0.0967
            } else {
                0.08129
            }
        }
    }
}

fn nitrogen(mol: &Molecule, atom: usize) -> f64 {
    let a = &mol.atoms[atom];
    if a.aromatic {
        return if a.formal_charge == 0 { -0.3239 } else { -1.119 };
    }
    let hs = mol.total_hs(atom);
    if a.formal_charge > 0 {
        return if hs > 0 { -1.950 } else { -0.3396 };
    }
    if a.formal_charge < 0 {
        return -0.3396;
    }

    let neighbors: Vec<(usize, BondOrder)> = heavy_neighbors(mol, atom).collect();
    if neighbors.iter().any(|&(_, o)| o == BondOrder::Triple) {
        return 0.01508;
    }
    if neighbors.iter().any(|&(_, o)| o == BondOrder::Double) {
        return match (hs, neighbors.len()) {
            (1.., _) => 0.08387,
            (0, 2..) => 0.1836,
            _ => -0.4806,
        };
    }

    let on_ring = neighbors.iter().any(|&(n, _)| mol.atoms[n].aromatic);
    match (hs, neighbors.len()) {
        (2, 1) => {
            if on_ring {
                -1.027
            } else {
                -1.019
            }
        }
        (1, 2) => {
            if on_ring {
                -0.5188
            } else {
                -0.7096
            }
        }
        (0, 3) => {
            if on_ring {
                -0.4458
            } else {
                -0.3187
            }
        }
        _ => -0.4806,
    }
}

fn oxygen(mol: &Molecule, atom: usize) -> f64 {
    let a = &mol.atoms[atom];
    if a.aromatic {
        return 0.1552;
    }
    let neighbors: Vec<(usize, BondOrder)> = heavy_neighbors(mol, atom).collect();

    if a.formal_charge < 0 {
        let Some(&(n, _)) = neighbors.first() else {
            return -1.189;
        };
        return match mol.atoms[n].element {
            Element::N => 0.0335,
            Element::S => -0.3339,
            Element::C if super::has_double_bond_to(mol, n, &[Element::O]) => -1.326,
            _ => -1.189,
        };
    }

    if let Some(&(partner, _)) = neighbors.iter().find(|&&(_, o)| o == BondOrder::Double) {
        let p = &mol.atoms[partner];
        return match p.element {
            Element::N | Element::O => 0.0335,
            Element::C if p.aromatic => 0.1788,
            Element::C => {
                let others: Vec<usize> = heavy_neighbors(mol, partner)
                    .map(|(n, _)| n)
                    .filter(|&n| n != atom)
                    .collect();
                let hetero = others
                    .iter()
                    .filter(|&&n| mol.atoms[n].element.is_hetero())
                    .count();
                if others.len() == 2 && hetero == 2 {
                    0.4833
                } else if others.iter().any(|&n| mol.atoms[n].aromatic) {
                    0.1129
                } else {
                    -0.1526
                }
            }
            _ => -0.1188,
        };
    }

    let hs = mol.total_hs(atom);
    match (hs, neighbors.len()) {
        (1.., _) => -0.2893,
        (0, 2) => {
            if neighbors.iter().any(|&(n, _)| mol.atoms[n].aromatic) {
                -0.4195
            } else {
                -0.0684
            }
        }
        _ => -0.1188,
    }
}

/// Contribution of one hydrogen attached to `heavy`.
fn hydrogen_on(mol: &Molecule, heavy: usize) -> f64 {
    match mol.atoms[heavy].element {
        Element::C => 0.1230,
        Element::N => 0.2142,
        Element::O => {
            let Some((n, _)) = heavy_neighbors(mol, heavy).next() else {
                return 0.1125;
            };
            let nbr = &mol.atoms[n];
            match nbr.element {
                Element::N => 0.2142,
                Element::O | Element::S => 0.2980,
                Element::C if nbr.aromatic => -0.2677,
                Element::C => {
                    let unsaturated = heavy_neighbors(mol, n).any(|(_, o)| o == BondOrder::Double);
                    if unsaturated {
                        0.2980
                    } else {
                        -0.2677
                    }
                }
                _ => -0.2677,
            }
        }
        _ => -0.2677,
    }
}

/// Contribution of one heavy atom, excluding its hydrogens.
fn heavy_atom_contribution(mol: &Molecule, atom: usize) -> f64 {
    let a = &mol.atoms[atom];
    match a.element {
        Element::C if a.aromatic => aromatic_carbon(mol, atom),
        Element::C => aliphatic_carbon(mol, atom),
        Element::N => nitrogen(mol, atom),
        Element::O => oxygen(mol, atom),
        Element::S if a.aromatic => 0.6237,
        Element::S if a.formal_charge != 0 => -0.0024,
        Element::S => 0.6482,
        Element::F => 0.4202,
        Element::Cl => 0.6895,
        Element::Br => 0.8456,
        Element::I => 0.8857,
        Element::P => 0.8612,
        _ => 0.0,
    }
}

/// Octanol/water partition coefficient as the sum of atomic contributions,
/// hydrogens included.
pub fn mol_logp(mol: &Molecule) -> f64 {
    (0..mol.num_atoms())
        .filter(|&idx| !mol.atoms[idx].element.is_hydrogen())
        .map(|idx| heavy_atom_contribution(mol, idx) + mol.total_hs(idx) as f64 * hydrogen_on(mol, idx))
        .fold(0.0, |acc, x| acc + x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecule::test_molecules::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn benzene_logp() {
        assert!(close(mol_logp(&benzene()), 1.6866));
    }

    #[test]
    fn ethanol_logp() {
        assert!(close(mol_logp(&ethanol()), -0.0014));
    }

    #[test]
    fn aspirin_logp() {
        assert!(close(mol_logp(&aspirin()), 1.3101));
    }

    #[test]
    fn cyclohexane_is_lipophilic() {
        // six CH2 with two carbon neighbours each
        let expected = 6.0 * (0.1441 + 2.0 * 0.1230);
        assert!(close(mol_logp(&cyclohexane()), expected));
    }
}
