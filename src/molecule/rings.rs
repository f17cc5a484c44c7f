//src/molecule/rings.rs

use std::collections::VecDeque;

use ahash::AHashSet;

use super::{BondOrder, Element, Molecule};

/// Ring membership and the smallest set of smallest rings.
#[derive(Debug, Clone, Default)]
pub struct RingInfo {
    /// Each ring as atoms in cycle order
    rings: Vec<Vec<usize>>,
    /// Bond indices of each ring, same order as `rings`
    ring_bonds: Vec<Vec<usize>>,
    atom_in_ring: Vec<bool>,
    bond_in_ring: Vec<bool>,
}

impl RingInfo {
    pub fn rings(&self) -> &[Vec<usize>] {
        &self.rings
    }

    pub fn ring_bonds(&self) -> &[Vec<usize>] {
        &self.ring_bonds
    }

    pub fn atom_in_ring(&self, atom: usize) -> bool {
        self.atom_in_ring.get(atom).copied().unwrap_or(false)
    }

    pub fn bond_in_ring(&self, bond: usize) -> bool {
        self.bond_in_ring.get(bond).copied().unwrap_or(false)
    }

    pub fn atom_in_ring_of_size(&self, atom: usize, size: usize) -> bool {
        self.rings
            .iter()
            .any(|ring| ring.len() == size && ring.contains(&atom))
    }

    /// Ring bonds are the bonds whose endpoints stay connected once the bond
    /// is removed; the shortest such detour closes the smallest ring through
    /// that bond. Those candidate cycles are then reduced to a linearly
    /// independent set (over GF(2) on bonds), smallest first, until the
    /// cyclomatic number is reached.
    pub fn perceive(mol: &Molecule) -> Self {
        let n_atoms = mol.atoms.len();
        let n_bonds = mol.bonds.len();
        let mut bond_in_ring = vec![false; n_bonds];
        let mut atom_in_ring = vec![false; n_atoms];

        let mut candidates: Vec<(Vec<usize>, Vec<usize>)> = Vec::new();
        let mut seen: AHashSet<Vec<usize>> = AHashSet::new();

        for (bond_idx, bond) in mol.bonds.iter().enumerate() {
            if let Some(path) = shortest_path_without(mol, bond.begin, bond.end, bond_idx) {
                bond_in_ring[bond_idx] = true;
                let mut bonds: Vec<usize> = path
                    .windows(2)
                    .filter_map(|w| bond_index(mol, w[0], w[1]))
                    .collect();
                bonds.push(bond_idx);

                let mut key = bonds.clone();
                key.sort_unstable();
                if seen.insert(key) {
                    candidates.push((path, bonds));
                }
            }
        }

        for (idx, bond) in mol.bonds.iter().enumerate() {
            if bond_in_ring[idx] {
                atom_in_ring[bond.begin] = true;
                atom_in_ring[bond.end] = true;
            }
        }

        candidates.sort_by_key(|(atoms, _)| atoms.len());
        let wanted = cyclomatic_number(mol);

        let words = n_bonds.div_ceil(64).max(1);
        let mut basis: Vec<(usize, Vec<u64>)> = Vec::new();
        let mut rings = Vec::new();
        let mut ring_bonds = Vec::new();

        for (atoms, bonds) in candidates {
            if rings.len() >= wanted {
                break;
            }
            let mut vector = vec![0u64; words];
            for &b in &bonds {
                vector[b / 64] ^= 1 << (b % 64);
            }
            for (pivot, row) in &basis {
                if vector[pivot / 64] & (1 << (pivot % 64)) != 0 {
                    for (v, r) in vector.iter_mut().zip(row) {
                        *v ^= r;
                    }
                }
            }
            if let Some(pivot) = lowest_set_bit(&vector) {
                basis.push((pivot, vector));
                rings.push(atoms);
                ring_bonds.push(bonds);
            }
        }

        Self {
            rings,
            ring_bonds,
            atom_in_ring,
            bond_in_ring,
        }
    }
}

fn lowest_set_bit(words: &[u64]) -> Option<usize> {
    words
        .iter()
        .enumerate()
        .find(|(_, w)| **w != 0)
        .map(|(i, w)| i * 64 + w.trailing_zeros() as usize)
}

fn bond_index(mol: &Molecule, a: usize, b: usize) -> Option<usize> {
    mol.neighbors(a)
        .iter()
        .find(|(n, _)| *n == b)
        .map(|(_, bond)| *bond)
}

/// Breadth-first path from `from` to `to` that does not use `skip_bond`.
fn shortest_path_without(mol: &Molecule, from: usize, to: usize, skip_bond: usize) -> Option<Vec<usize>> {
    let mut parent = vec![usize::MAX; mol.atoms.len()];
    let mut queue = VecDeque::new();
    parent[from] = from;
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        if current == to {
            let mut path = vec![to];
            let mut node = to;
            while node != from {
                node = parent[node];
                path.push(node);
            }
            path.reverse();
            return Some(path);
        }
        for &(next, bond) in mol.neighbors(current) {
            if bond == skip_bond || parent[next] != usize::MAX {
                continue;
            }
            parent[next] = current;
            queue.push_back(next);
        }
    }
    None
}

/// bonds - atoms + connected components
fn cyclomatic_number(mol: &Molecule) -> usize {
    let n = mol.atoms.len();
    let mut visited = vec![false; n];
    let mut components = 0;
    for start in 0..n {
        if visited[start] {
            continue;
        }
        components += 1;
        let mut stack = vec![start];
        visited[start] = true;
        while let Some(atom) = stack.pop() {
            for &(next, _) in mol.neighbors(atom) {
                if !visited[next] {
                    visited[next] = true;
                    stack.push(next);
                }
            }
        }
    }
    (mol.bonds.len() + components).saturating_sub(n)
}

fn mark_ring_aromatic(mol: &mut Molecule, ring: usize) {
    let atoms = mol.ring_info.rings[ring].clone();
    let bonds = mol.ring_info.ring_bonds[ring].clone();
    for a in atoms {
        mol.atoms[a].aromatic = true;
    }
    for b in bonds {
        mol.bonds[b].order = BondOrder::Aromatic;
    }
}

fn aromatic_ring_size(len: usize) -> bool {
    (5..=7).contains(&len)
}

/// Keeps the aromaticity the file itself declared: rings made only of
/// aromatic bonds (SDF bond type 4), or rings whose carbons are all typed
/// aromatic (PDBQT `A`). Aromatic flags and bonds outside such rings are
/// demoted.
pub(crate) fn apply_input_aromaticity(mol: &mut Molecule) {
    let mut aromatic_rings = Vec::new();
    for (idx, (atoms, bonds)) in mol
        .ring_info
        .rings
        .iter()
        .zip(&mol.ring_info.ring_bonds)
        .enumerate()
    {
        if !aromatic_ring_size(atoms.len()) {
            continue;
        }
        let all_bonds_aromatic = bonds
            .iter()
            .all(|&b| mol.bonds[b].order == BondOrder::Aromatic);
        let carbons: Vec<usize> = atoms
            .iter()
            .copied()
            .filter(|&a| mol.atoms[a].element == Element::C)
            .collect();
        let typed_aromatic = !carbons.is_empty()
            && carbons.iter().all(|&a| mol.atoms[a].aromatic)
            && atoms.iter().all(|&a| {
                matches!(
                    mol.atoms[a].element,
                    Element::C | Element::N | Element::O | Element::S | Element::Se
                )
            });
        if all_bonds_aromatic || typed_aromatic {
            aromatic_rings.push(idx);
        }
    }

    for atom in mol.atoms.iter_mut() {
        atom.aromatic = false;
    }
    for ring in aromatic_rings {
        mark_ring_aromatic(mol, ring);
    }

    for idx in 0..mol.bonds.len() {
        let bond = mol.bonds[idx];
        if bond.order == BondOrder::Aromatic
            && !(mol.atoms[bond.begin].aromatic && mol.atoms[bond.end].aromatic && mol.is_ring_bond(idx))
        {
            mol.bonds[idx].order = BondOrder::Single;
        }
    }
}

/// π electrons `atom` donates to a ring, or None if it breaks conjugation.
fn pi_electrons(mol: &Molecule, atom: usize) -> Option<u32> {
    let a = &mol.atoms[atom];
    let mut exocyclic_hetero_double = false;

    for &(nbr, bond) in mol.neighbors(atom) {
        match mol.bonds[bond].order {
            BondOrder::Aromatic => return Some(1),
            BondOrder::Double => {
                if mol.is_ring_atom(nbr) && mol.is_ring_bond(bond) {
                    return Some(1);
                }
                if matches!(mol.atoms[nbr].element, Element::O | Element::N | Element::S) {
                    exocyclic_hetero_double = true;
                } else {
                    return None;
                }
            }
            BondOrder::Triple => return None,
            BondOrder::Single => {}
        }
    }
    if exocyclic_hetero_double {
        return Some(0);
    }

    let degree = mol.total_degree(atom);
    match (a.element, a.formal_charge) {
        (Element::N | Element::P, 0) if degree == 3 => Some(2),
        (Element::O | Element::S | Element::Se, 0) if degree == 2 => Some(2),
        (Element::C, -1) => Some(2),
        (Element::C, 1) => Some(0),
        _ => None,
    }
}

/// Hückel 4n+2 test on Kekulé rings, repeated so rings fused to a ring that
/// just became aromatic get another chance.
pub(crate) fn apply_huckel_aromaticity(mol: &mut Molecule) {
    loop {
        let mut newly_aromatic = Vec::new();
        for (idx, atoms) in mol.ring_info.rings.iter().enumerate() {
            if !aromatic_ring_size(atoms.len()) || atoms.iter().all(|&a| mol.atoms[a].aromatic) {
                continue;
            }
            let electrons: Option<u32> = atoms.iter().map(|&a| pi_electrons(mol, a)).sum();
            if let Some(e) = electrons {
                if e >= 6 && e % 4 == 2 {
                    newly_aromatic.push(idx);
                }
            }
        }
        if newly_aromatic.is_empty() {
            break;
        }
        for ring in newly_aromatic {
            mark_ring_aromatic(mol, ring);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_molecules::build;
    use super::super::BondOrder::*;
    use super::super::Element::*;

    #[test]
    fn naphthalene_has_two_aromatic_rings() {
        // Kekulé naphthalene, fusion atoms 0 and 5
        let mol = build(
            &[(C, 0); 10],
            &[
                (0, 1, Double),
                (1, 2, Single),
                (2, 3, Double),
                (3, 4, Single),
                (4, 5, Double),
                (5, 0, Single),
                (5, 6, Single),
                (6, 7, Double),
                (7, 8, Single),
                (8, 9, Double),
                (9, 0, Single),
            ],
        );
        assert_eq!(mol.ring_info().rings().len(), 2);
        assert_eq!(mol.aromatic_ring_count(), 2);
        // fusion bond is in both rings, the ring bond flags cover it
        assert!(mol.is_ring_bond(5));
        assert_eq!(mol.atoms[0].implicit_hs, 0);
        assert_eq!(mol.atoms[1].implicit_hs, 1);
    }

    #[test]
    fn chain_has_no_rings() {
        let mol = build(&[(C, 0), (C, 0), (C, 0)], &[(0, 1, Single), (1, 2, Single)]);
        assert!(mol.ring_info().rings().is_empty());
        assert!(!mol.is_ring_atom(1));
    }

    #[test]
    fn cyclopentadiene_is_not_aromatic() {
        let mol = build(
            &[(C, 0); 5],
            &[
                (0, 1, Double),
                (1, 2, Single),
                (2, 3, Double),
                (3, 4, Single),
                (4, 0, Single),
            ],
        );
        assert_eq!(mol.aromatic_ring_count(), 0);
        assert!(mol.is_ring_atom(4));
        assert!(mol.ring_info().atom_in_ring_of_size(4, 5));
    }
}
