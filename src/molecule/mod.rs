//! Molecular graph used for descriptor calculation.
//!
//! Ligands are read from SDF (preferred, carries bond orders) or PDBQT (bond
//! orders perceived from geometry) and then sanitized: ring perception,
//! aromaticity and implicit hydrogen counts.

pub mod elements;
pub mod pdbqt;
pub mod rings;
pub mod sdf;

use std::path::{Path, PathBuf};

use log::warn;

use crate::error::DockingError;
use crate::textio::read_text;
pub use elements::Element;
pub use rings::RingInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Twice the bond valence, so aromatic bonds (1.5) stay integral.
    pub fn valence2(self) -> u32 {
        match self {
            BondOrder::Single => 2,
            BondOrder::Double => 4,
            BondOrder::Triple => 6,
            BondOrder::Aromatic => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub formal_charge: i8,
    pub position: [f64; 3],
    pub aromatic: bool,
    /// Hydrogens not present as explicit atoms, set by `Molecule::sanitize`
    pub implicit_hs: u8,
}

impl Atom {
    pub fn new(element: Element, position: [f64; 3]) -> Self {
        Self {
            element,
            formal_charge: 0,
            position,
            aromatic: false,
            implicit_hs: 0,
        }
    }

    pub fn distance(&self, other: &Atom) -> f64 {
        let d: f64 = (0..3)
            .map(|i| (self.position[i] - other.position[i]).powi(2))
            .sum();
        d.sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bond {
    pub begin: usize,
    pub end: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(begin: usize, end: usize, order: BondOrder) -> Self {
        Self { begin, end, order }
    }

    /// The atom on the other side of `atom`.
    pub fn other(&self, atom: usize) -> usize {
        if self.begin == atom {
            self.end
        } else {
            self.begin
        }
    }
}

/// Structure file flavours the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureFormat {
    Sdf,
    Pdbqt,
}

impl StructureFormat {
    pub fn name(self) -> &'static str {
        match self {
            StructureFormat::Sdf => "sdf",
            StructureFormat::Pdbqt => "pdbqt",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Molecule {
    pub name: String,
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    /// Always true for MOL blocks; otherwise false when every coordinate is zero
    pub has_conformer: bool,
    neighbors: Vec<Vec<(usize, usize)>>,
    ring_info: RingInfo,
}

impl Molecule {
    pub fn new(name: impl Into<String>, atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        let has_conformer = atoms
            .iter()
            .any(|a| a.position.iter().any(|c| c.abs() > 1e-4));
        let mut mol = Self {
            name: name.into(),
            atoms,
            bonds,
            has_conformer,
            neighbors: Vec::new(),
            ring_info: RingInfo::default(),
        };
        mol.rebuild_neighbors();
        mol
    }

    fn rebuild_neighbors(&mut self) {
        let mut neighbors = vec![Vec::new(); self.atoms.len()];
        for (idx, bond) in self.bonds.iter().enumerate() {
            neighbors[bond.begin].push((bond.end, idx));
            neighbors[bond.end].push((bond.begin, idx));
        }
        self.neighbors = neighbors;
    }

    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// (neighbor atom, bond index) pairs of `atom`.
    pub fn neighbors(&self, atom: usize) -> &[(usize, usize)] {
        &self.neighbors[atom]
    }

    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.iter().filter(|a| !a.element.is_hydrogen()).count()
    }

    /// Number of non-hydrogen neighbours.
    pub fn heavy_degree(&self, atom: usize) -> usize {
        self.neighbors[atom]
            .iter()
            .filter(|(n, _)| !self.atoms[*n].element.is_hydrogen())
            .count()
    }

    /// Explicit plus implicit hydrogens on `atom`.
    pub fn total_hs(&self, atom: usize) -> usize {
        let explicit = self.neighbors[atom]
            .iter()
            .filter(|(n, _)| self.atoms[*n].element.is_hydrogen())
            .count();
        explicit + self.atoms[atom].implicit_hs as usize
    }

    /// Connections including implicit hydrogens.
    pub fn total_degree(&self, atom: usize) -> usize {
        self.neighbors[atom].len() + self.atoms[atom].implicit_hs as usize
    }

    /// Twice the sum of bond valences of the explicit bonds of `atom`.
    pub fn bond_valence2(&self, atom: usize) -> u32 {
        self.neighbors[atom]
            .iter()
            .map(|(_, b)| self.bonds[*b].order.valence2())
            .sum()
    }

    /// Total valence including implicit hydrogens, aromatic bonds rounded up.
    pub fn total_valence(&self, atom: usize) -> u32 {
        (self.bond_valence2(atom) + 1) / 2 + self.atoms[atom].implicit_hs as u32
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<&Bond> {
        self.neighbors[a]
            .iter()
            .find(|(n, _)| *n == b)
            .map(|(_, bond)| &self.bonds[*bond])
    }

    pub fn ring_info(&self) -> &RingInfo {
        &self.ring_info
    }

    pub fn is_ring_atom(&self, atom: usize) -> bool {
        self.ring_info.atom_in_ring(atom)
    }

    pub fn is_ring_bond(&self, bond: usize) -> bool {
        self.ring_info.bond_in_ring(bond)
    }

    /// Rings (from the smallest set of smallest rings) whose atoms are all aromatic.
    pub fn aromatic_ring_count(&self) -> usize {
        self.ring_info
            .rings()
            .iter()
            .filter(|ring| ring.iter().all(|&a| self.atoms[a].aromatic))
            .count()
    }

    /// Perceives rings and aromaticity and assigns implicit hydrogens.
    ///
    /// Rings already flagged aromatic by the input (aromatic bond type in SDF,
    /// aromatic carbon type in PDBQT) are kept; Kekulé rings are tested with
    /// Hückel's rule after hydrogens are assigned from their exact bond orders.
    pub fn sanitize(&mut self) -> Result<(), DockingError> {
        self.rebuild_neighbors();
        self.ring_info = RingInfo::perceive(self);

        rings::apply_input_aromaticity(self);
        self.assign_implicit_hydrogens()?;
        rings::apply_huckel_aromaticity(self);
        Ok(())
    }

    fn assign_implicit_hydrogens(&mut self) -> Result<(), DockingError> {
        for idx in 0..self.atoms.len() {
            let atom = &self.atoms[idx];
            let element = atom.element;
            if element.is_metal() {
                self.atoms[idx].implicit_hs = 0;
                continue;
            }

            let used2 = self.bond_valence2(idx) as i32;
            let charge = atom.formal_charge as i32;
            let adjust = |v: u8| -> i32 {
                let v = v as i32;
                match element {
                    Element::C | Element::Si => v - charge.abs(),
                    Element::B => v - charge,
                    _ => v + charge,
                }
            };

            // Smallest allowed valence that accommodates the explicit bonds.
            let slack = if atom.aromatic { 3 } else { 0 };
            let target = element
                .valences()
                .iter()
                .map(|&v| adjust(v))
                .find(|&v| v >= 0 && 2 * v + slack >= used2);

            let target = match target {
                Some(v) => v,
                None => {
                    return Err(DockingError::Sanitize(format!(
                        "explicit valence {} for atom {} ({}) exceeds the allowed maximum",
                        (used2 + 1) / 2,
                        idx + 1,
                        element
                    )))
                }
            };

            let implicit = ((2 * target - used2) / 2).max(0);
            self.atoms[idx].implicit_hs = implicit as u8;
        }
        Ok(())
    }
}

/// Looks for `<ligand_name>.sdf` in every directory before falling back to
/// `<ligand_name>.pdbqt`. Gzipped variants are accepted after the plain ones.
pub fn find_ligand_file(ligand_name: &str, search_dirs: &[PathBuf]) -> Option<(PathBuf, StructureFormat)> {
    for format in [StructureFormat::Sdf, StructureFormat::Pdbqt] {
        for directory in search_dirs {
            for suffix in ["", ".gz"] {
                let candidate = directory.join(format!("{}.{}{}", ligand_name, format.name(), suffix));
                if candidate.is_file() {
                    return Some((candidate, format));
                }
            }
        }
    }

    warn!(
        "Could not find source file for ligand '{}' in {:?}",
        ligand_name, search_dirs
    );
    None
}

/// Reads and sanitizes the first molecule of a structure file.
pub fn load_molecule(path: &Path, format: StructureFormat) -> Result<Molecule, DockingError> {
    let text = read_text(path)?;
    let mut mol = match format {
        StructureFormat::Sdf => {
            let (mol, records) = sdf::parse_sdf(&text, path)?;
            if records > 1 {
                warn!(
                    "SDF file {} contains multiple molecules. Using only the first.",
                    path.display()
                );
            }
            mol
        }
        StructureFormat::Pdbqt => pdbqt::parse_pdbqt(&text, path)?,
    };
    mol.sanitize()?;
    Ok(mol)
}

#[cfg(test)]
pub(crate) mod test_molecules {
    //! Small hand-built molecules shared by the descriptor tests.

    use super::*;

    /// Builds a molecule from heavy atoms only, everything else implicit.
    pub fn build(atoms: &[(Element, i8)], bonds: &[(usize, usize, BondOrder)]) -> Molecule {
        let atoms = atoms
            .iter()
            .map(|&(element, charge)| {
                let mut atom = Atom::new(element, [0.0; 3]);
                atom.formal_charge = charge;
                atom
            })
            .collect();
        let bonds = bonds.iter().map(|&(a, b, o)| Bond::new(a, b, o)).collect();
        let mut mol = Molecule::new("test", atoms, bonds);
        mol.sanitize().expect("test molecule should sanitize");
        mol
    }

    use BondOrder::*;
    use Element::*;

    /// CCO
    pub fn ethanol() -> Molecule {
        build(&[(C, 0), (C, 0), (O, 0)], &[(0, 1, Single), (1, 2, Single)])
    }

    /// Kekulé benzene
    pub fn benzene() -> Molecule {
        build(
            &[(C, 0), (C, 0), (C, 0), (C, 0), (C, 0), (C, 0)],
            &[
                (0, 1, Double),
                (1, 2, Single),
                (2, 3, Double),
                (3, 4, Single),
                (4, 5, Double),
                (5, 0, Single),
            ],
        )
    }

    /// CC(=O)Oc1ccccc1C(=O)O, Kekulé ring
    pub fn aspirin() -> Molecule {
        build(
            &[
                (C, 0), // 0 methyl
                (C, 0), // 1 ester carbonyl C
                (O, 0), // 2 =O
                (O, 0), // 3 ester O
                (C, 0), // 4 ring
                (C, 0), // 5
                (C, 0), // 6
                (C, 0), // 7
                (C, 0), // 8
                (C, 0), // 9 ring, bears acid
                (C, 0), // 10 acid C
                (O, 0), // 11 =O
                (O, 0), // 12 OH
            ],
            &[
                (0, 1, Single),
                (1, 2, Double),
                (1, 3, Single),
                (3, 4, Single),
                (4, 5, Double),
                (5, 6, Single),
                (6, 7, Double),
                (7, 8, Single),
                (8, 9, Double),
                (9, 4, Single),
                (9, 10, Single),
                (10, 11, Double),
                (10, 12, Single),
            ],
        )
    }

    /// Pyrrole, Kekulé with implicit N-H
    pub fn pyrrole() -> Molecule {
        build(
            &[(N, 0), (C, 0), (C, 0), (C, 0), (C, 0)],
            &[
                (0, 1, Single),
                (1, 2, Double),
                (2, 3, Single),
                (3, 4, Double),
                (4, 0, Single),
            ],
        )
    }

    /// Cyclohexane
    pub fn cyclohexane() -> Molecule {
        build(
            &[(C, 0), (C, 0), (C, 0), (C, 0), (C, 0), (C, 0)],
            &[
                (0, 1, Single),
                (1, 2, Single),
                (2, 3, Single),
                (3, 4, Single),
                (4, 5, Single),
                (5, 0, Single),
            ],
        )
    }

    /// CC(=O)NC, N-methylacetamide
    pub fn n_methylacetamide() -> Molecule {
        build(
            &[(C, 0), (C, 0), (O, 0), (N, 0), (C, 0)],
            &[(0, 1, Single), (1, 2, Double), (1, 3, Single), (3, 4, Single)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::test_molecules::*;
    use super::*;

    #[test]
    fn implicit_hydrogens_follow_valence() {
        let mol = ethanol();
        assert_eq!(mol.atoms[0].implicit_hs, 3);
        assert_eq!(mol.atoms[1].implicit_hs, 2);
        assert_eq!(mol.atoms[2].implicit_hs, 1);
        assert!(!mol.has_conformer);
    }

    #[test]
    fn kekule_benzene_becomes_aromatic() {
        let mol = benzene();
        assert!(mol.atoms.iter().all(|a| a.aromatic && a.implicit_hs == 1));
        assert!(mol.bonds.iter().all(|b| b.order == BondOrder::Aromatic));
        assert_eq!(mol.aromatic_ring_count(), 1);
    }

    #[test]
    fn pyrrole_keeps_its_nh() {
        let mol = pyrrole();
        assert_eq!(mol.aromatic_ring_count(), 1);
        assert_eq!(mol.total_hs(0), 1);
    }

    #[test]
    fn cyclohexane_is_not_aromatic() {
        let mol = cyclohexane();
        assert_eq!(mol.aromatic_ring_count(), 0);
        assert_eq!(mol.ring_info().rings().len(), 1);
        assert!(mol.atoms.iter().all(|a| a.implicit_hs == 2));
    }

    #[test]
    fn overvalent_carbon_fails_sanitization() {
        let atoms = (0..6).map(|_| Atom::new(Element::C, [0.0; 3])).collect();
        let bonds = (1..6).map(|i| Bond::new(0, i, BondOrder::Single)).collect();
        let mut mol = Molecule::new("bad", atoms, bonds);
        assert!(matches!(mol.sanitize(), Err(DockingError::Sanitize(_))));
    }

    #[test]
    fn sdf_is_preferred_over_pdbqt() {
        let tmp = tempfile::tempdir().unwrap();
        let first = tmp.path().join("pdbqt_dir");
        let second = tmp.path().join("sdf_dir");
        std::fs::create_dir_all(&first).unwrap();
        std::fs::create_dir_all(&second).unwrap();
        std::fs::write(first.join("lig.pdbqt"), "").unwrap();
        std::fs::write(second.join("lig.sdf"), "").unwrap();

        let (path, format) = find_ligand_file("lig", &[first, second.clone()]).unwrap();
        assert_eq!(format, StructureFormat::Sdf);
        assert_eq!(path, second.join("lig.sdf"));

        assert!(find_ligand_file("absent", &[second]).is_none());
    }
}
