//! Ligand descriptors computed from a sanitized `Molecule`.

pub mod crippen;
pub mod labute;
pub mod qed;
pub mod tpsa;

use log::warn;

use crate::molecule::{BondOrder, Element, Molecule};
use crate::types::LigandDescriptors;

/// Bond-type tally of one atom's heavy-atom bonds plus its hydrogen count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AtomEnv {
    pub single: u8,
    pub double: u8,
    pub triple: u8,
    pub aromatic: u8,
    pub hs: u8,
}

impl AtomEnv {
    pub fn of(mol: &Molecule, atom: usize) -> Self {
        let mut env = AtomEnv {
            hs: mol.total_hs(atom) as u8,
            ..Default::default()
        };
        for &(nbr, bond) in mol.neighbors(atom) {
            if mol.atoms[nbr].element.is_hydrogen() {
                continue;
            }
            match mol.bonds[bond].order {
                BondOrder::Single => env.single += 1,
                BondOrder::Double => env.double += 1,
                BondOrder::Triple => env.triple += 1,
                BondOrder::Aromatic => env.aromatic += 1,
            }
        }
        env
    }

    pub fn heavy_degree(&self) -> u8 {
        self.single + self.double + self.triple + self.aromatic
    }
}

/// Heavy neighbours of `atom` together with the connecting bond order.
pub(crate) fn heavy_neighbors(mol: &Molecule, atom: usize) -> impl Iterator<Item = (usize, BondOrder)> + '_ {
    mol.neighbors(atom)
        .iter()
        .filter(move |(n, _)| !mol.atoms[*n].element.is_hydrogen())
        .map(move |&(n, b)| (n, mol.bonds[b].order))
}

/// True when `atom` carries a double bond to one of `elements`.
pub(crate) fn has_double_bond_to(mol: &Molecule, atom: usize, elements: &[Element]) -> bool {
    heavy_neighbors(mol, atom)
        .any(|(n, order)| order == BondOrder::Double && elements.contains(&mol.atoms[n].element))
}

/// Average molecular weight including implicit hydrogens.
pub fn molecular_weight(mol: &Molecule) -> f64 {
    mol.atoms
        .iter()
        .map(|a| a.element.mass() + a.implicit_hs as f64 * Element::H.mass())
        .sum()
}

fn has_triple_bond(mol: &Molecule, atom: usize) -> bool {
    heavy_neighbors(mol, atom).any(|(_, order)| order == BondOrder::Triple)
}

/// CF3, CCl3, CBr3 and tert-butyl centres spin without changing shape.
fn is_symmetric_top(mol: &Molecule, atom: usize) -> bool {
    if mol.atoms[atom].element != Element::C {
        return false;
    }
    [Element::F, Element::Cl, Element::Br].iter().any(|&halogen| {
        heavy_neighbors(mol, atom)
            .filter(|(n, _)| mol.atoms[*n].element == halogen)
            .count()
            >= 3
    }) || heavy_neighbors(mol, atom)
        .filter(|(n, _)| mol.atoms[*n].element == Element::C && mol.total_hs(*n) == 3)
        .count()
        >= 3
}

/// Carbon with three connections double bonded to N, O or S (a carbonyl-like
/// centre). `charged_n` restricts the partner to a cationic nitrogen.
fn is_acyl_like_carbon(mol: &Molecule, atom: usize, charged_n: bool) -> bool {
    let a = &mol.atoms[atom];
    if a.element != Element::C || a.aromatic || mol.heavy_degree(atom) != 3 {
        return false;
    }
    heavy_neighbors(mol, atom).any(|(n, order)| {
        let partner = &mol.atoms[n];
        order == BondOrder::Double
            && if charged_n {
                partner.element == Element::N && partner.formal_charge > 0
            } else {
                matches!(partner.element, Element::N | Element::O | Element::S)
            }
    })
}

/// Acyclic single-bond neighbours of `atom`.
fn acyclic_single_neighbors(mol: &Molecule, atom: usize) -> impl Iterator<Item = usize> + '_ {
    mol.neighbors(atom)
        .iter()
        .filter(move |&&(n, bond)| {
            !mol.atoms[n].element.is_hydrogen()
                && mol.bonds[bond].order == BondOrder::Single
                && !mol.is_ring_bond(bond)
        })
        .map(|&(n, _)| n)
}

/// Atoms taking part in an amide, ester, thioester, amidine or similar
/// C(=X)-Y linkage, whose rotation is hindered.
fn is_linkage_atom(mol: &Molecule, atom: usize) -> bool {
    let heteroatom = |idx: usize| match mol.atoms[idx].element {
        Element::N | Element::O => true,
        Element::S => mol.heavy_degree(idx) > 1,
        _ => false,
    };
    let branched_n = |idx: usize| mol.atoms[idx].element == Element::N && mol.heavy_degree(idx) > 1;

    if is_acyl_like_carbon(mol, atom, false) && acyclic_single_neighbors(mol, atom).any(heteroatom) {
        return true;
    }
    if heteroatom(atom)
        && acyclic_single_neighbors(mol, atom).any(|n| is_acyl_like_carbon(mol, n, false))
    {
        return true;
    }
    if is_acyl_like_carbon(mol, atom, true) && acyclic_single_neighbors(mol, atom).any(branched_n) {
        return true;
    }
    branched_n(atom) && acyclic_single_neighbors(mol, atom).any(|n| is_acyl_like_carbon(mol, n, true))
}

/// Strict rotatable-bond count: acyclic single bonds between non-terminal
/// heavy atoms, excluding triple-bond neighbours, CX3/tert-butyl tops and
/// bonds whose both ends sit in C(=X)-Y linkages (amides, esters, ...).
pub fn rotatable_bonds(mol: &Molecule) -> u32 {
    let movable = |atom: usize| -> bool {
        !mol.atoms[atom].element.is_hydrogen()
            && mol.heavy_degree(atom) > 1
            && !has_triple_bond(mol, atom)
            && !is_symmetric_top(mol, atom)
    };

    mol.bonds
        .iter()
        .enumerate()
        .filter(|(idx, bond)| {
            bond.order == BondOrder::Single
                && !mol.is_ring_bond(*idx)
                && movable(bond.begin)
                && movable(bond.end)
                && !(is_linkage_atom(mol, bond.begin) && is_linkage_atom(mol, bond.end))
        })
        .count() as u32
}

/// Lipinski-style donors: N-H (neutral trivalent or ammonium), O-H, S-H and
/// aromatic n-H.
pub fn h_bond_donors(mol: &Molecule) -> u32 {
    (0..mol.num_atoms())
        .filter(|&idx| {
            let atom = &mol.atoms[idx];
            let hs = mol.total_hs(idx);
            let valence = mol.total_valence(idx);
            match atom.element {
                Element::N if atom.aromatic => hs == 1 && atom.formal_charge == 0,
                Element::N => {
                    hs >= 1
                        && ((atom.formal_charge == 0 && valence == 3)
                            || (atom.formal_charge == 1 && valence == 4))
                }
                Element::O | Element::S => hs == 1 && atom.formal_charge == 0 && !atom.aromatic,
                _ => false,
            }
        })
        .count() as u32
}

/// Lipinski-style acceptors: hydroxyl/ether/carbonyl O and S, anionic O and
/// S, trivalent N that is not amide-like, unprotonated aromatic n, aromatic
/// o and s, and F.
pub fn h_bond_acceptors(mol: &Molecule) -> u32 {
    const CONJUGATING: [Element; 4] = [Element::O, Element::N, Element::P, Element::S];

    (0..mol.num_atoms())
        .filter(|&idx| {
            let atom = &mol.atoms[idx];
            let hs = mol.total_hs(idx);
            let valence = mol.total_valence(idx);
            let charge = atom.formal_charge;
            match atom.element {
                Element::O | Element::S if atom.aromatic => charge == 0,
                Element::O | Element::S => {
                    if charge < 0 {
                        return true;
                    }
                    if valence != 2 {
                        return false;
                    }
                    match hs {
                        0 => true,
                        1 => heavy_neighbors(mol, idx)
                            .all(|(n, _)| !has_double_bond_to(mol, n, &CONJUGATING)),
                        _ => false,
                    }
                }
                Element::N if atom.aromatic => hs == 0 && charge == 0,
                Element::N => {
                    valence == 3
                        && heavy_neighbors(mol, idx).all(|(n, order)| {
                            order != BondOrder::Single
                                || !mol.neighbors(n).iter().any(|&(m, b)| {
                                    mol.bonds[b].order == BondOrder::Double
                                        && !mol.is_ring_bond(b)
                                        && CONJUGATING.contains(&mol.atoms[m].element)
                                })
                        })
                }
                Element::F => true,
                _ => false,
            }
        })
        .count() as u32
}

/// Computes the full descriptor set of one ligand.
///
/// The surface area needs real coordinates; a molecule without a conformer
/// gets no SASA (and a warning) while everything else is still filled in.
pub fn compute_descriptors(mol: &Molecule) -> LigandDescriptors {
    let mw = molecular_weight(mol);
    let logp = crippen::mol_logp(mol);
    let tpsa = tpsa::tpsa(mol);
    let nha = mol.heavy_atom_count() as u32;
    let nrb = rotatable_bonds(mol);
    let hbd = h_bond_donors(mol);
    let hba = h_bond_acceptors(mol);

    let sasa = if mol.has_conformer {
        Some(labute::labute_asa(mol))
    } else {
        warn!("Molecule '{}' has no conformer, cannot calculate SASA.", mol.name);
        None
    };

    let qed = qed::qed(&qed::QedProperties {
        mw,
        alogp: logp,
        hba: qed::qed_acceptors(mol),
        hbd,
        psa: tpsa,
        rotb: nrb,
        arom: mol.aromatic_ring_count() as u32,
        alerts: qed::structural_alerts(mol),
    });

    LigandDescriptors {
        mw: Some(mw),
        logp: Some(logp),
        tpsa: Some(tpsa),
        nha: Some(nha),
        nrb: Some(nrb),
        hbd: Some(hbd),
        hba: Some(hba),
        sasa,
        qed: Some(qed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecule::test_molecules::*;

    #[test]
    fn ethanol_counts() {
        let mol = ethanol();
        assert!((molecular_weight(&mol) - 46.069).abs() < 1e-3);
        assert_eq!(rotatable_bonds(&mol), 0);
        assert_eq!(h_bond_donors(&mol), 1);
        assert_eq!(h_bond_acceptors(&mol), 1);
    }

    #[test]
    fn aspirin_counts() {
        let mol = aspirin();
        assert!((molecular_weight(&mol) - 180.159).abs() < 1e-2);
        assert_eq!(mol.heavy_atom_count(), 13);
        assert_eq!(h_bond_donors(&mol), 1);
        assert_eq!(h_bond_acceptors(&mol), 3);
        // C(ring)-O and C(ring)-C(acid); the ester O-C(=O) is a linkage
        assert_eq!(rotatable_bonds(&mol), 2);
    }

    #[test]
    fn secondary_amide_bond_is_not_rotatable() {
        let mol = n_methylacetamide();
        assert_eq!(rotatable_bonds(&mol), 0);
        // amide N is a donor but not an acceptor
        assert_eq!(h_bond_donors(&mol), 1);
        assert_eq!(h_bond_acceptors(&mol), 1);
    }

    #[test]
    fn ester_and_tert_butyl_bonds() {
        use crate::molecule::test_molecules::build;
        use crate::molecule::BondOrder::*;
        use crate::molecule::Element::*;

        // CC(=O)OCC: only O-CH2 turns freely
        let ethyl_acetate = build(
            &[(C, 0), (C, 0), (O, 0), (O, 0), (C, 0), (C, 0)],
            &[(0, 1, Single), (1, 2, Double), (1, 3, Single), (3, 4, Single), (4, 5, Single)],
        );
        assert_eq!(rotatable_bonds(&ethyl_acetate), 1);

        // CC(C)(C)CCO: the tert-butyl top does not count
        let neohexanol = build(
            &[(C, 0), (C, 0), (C, 0), (C, 0), (C, 0), (C, 0), (O, 0)],
            &[
                (0, 1, Single),
                (1, 2, Single),
                (1, 3, Single),
                (1, 4, Single),
                (4, 5, Single),
                (5, 6, Single),
            ],
        );
        assert_eq!(rotatable_bonds(&neohexanol), 1);
    }

    #[test]
    fn aspirin_qed_counts_ester_alerts() {
        let d = compute_descriptors(&aspirin());
        assert_eq!(qed::structural_alerts(&aspirin()), 2);
        assert!((d.qed.unwrap() - 0.5501).abs() < 1e-3, "{:?}", d.qed);
    }

    #[test]
    fn benzene_has_no_polar_atoms() {
        let d = compute_descriptors(&benzene());
        assert_eq!(d.hbd, Some(0));
        assert_eq!(d.hba, Some(0));
        assert_eq!(d.nha, Some(6));
        assert_eq!(d.tpsa, Some(0.0));
        // no coordinates in the hand-built molecule
        assert_eq!(d.sasa, None);
        let qed = d.qed.unwrap();
        assert!(qed > 0.0 && qed < 1.0);
    }
}
