//src/descriptors/labute.rs
//! Labute's approximate surface area: each atom is a van der Waals sphere
//! reduced by the caps its bonded neighbours cut away.

use std::f64::consts::PI;

use crate::molecule::{BondOrder, Element, Molecule};

fn bond_correction(order: BondOrder) -> f64 {
    match order {
        BondOrder::Single => 0.0,
        BondOrder::Aromatic => 0.1,
        BondOrder::Double => 0.2,
        BondOrder::Triple => 0.3,
    }
}

/// Area of a sphere of radius `ri` minus the cap buried by a neighbour of
/// radius `rj` at ideal bond distance `dij`.
fn buried_cap(ri: f64, rj: f64, dij: f64) -> f64 {
    let dij = dij.clamp((ri - rj).abs(), ri + rj);
    if dij <= 0.0 {
        return 0.0;
    }
    PI * ri * (rj * rj - (ri - dij).powi(2)) / dij
}

fn ideal_distance(a: Element, b: Element, order: BondOrder) -> f64 {
    a.bond_radius() + b.bond_radius() - bond_correction(order)
}

/// Surface area in Å², implicit hydrogens included.
pub fn labute_asa(mol: &Molecule) -> f64 {
    let h = Element::H;
    let rh = h.vdw_radius();
    let mut total = 0.0;

    for (idx, atom) in mol.atoms.iter().enumerate() {
        let ri = atom.element.vdw_radius();
        let mut area = 4.0 * PI * ri * ri;

        for &(nbr, bond) in mol.neighbors(idx) {
            let other = mol.atoms[nbr].element;
            let order = mol.bonds[bond].order;
            area -= buried_cap(ri, other.vdw_radius(), ideal_distance(atom.element, other, order));
        }

        let implicit = atom.implicit_hs as f64;
        if implicit > 0.0 {
            let d = ideal_distance(atom.element, h, BondOrder::Single);
            area -= implicit * buried_cap(ri, rh, d);
            let h_area = 4.0 * PI * rh * rh - buried_cap(rh, ri, d);
            total += implicit * h_area.max(0.0);
        }

        total += area.max(0.0);
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecule::test_molecules::*;

    #[test]
    fn isolated_atom_is_a_full_sphere() {
        let mol = Molecule::new(
            "potassium",
            vec![crate::molecule::Atom::new(Element::K, [1.0, 0.0, 0.0])],
            Vec::new(),
        );
        let r = Element::K.vdw_radius();
        assert!((labute_asa(&mol) - 4.0 * PI * r * r).abs() < 1e-9);
    }

    #[test]
    fn area_grows_with_size() {
        let small = labute_asa(&ethanol());
        let large = labute_asa(&aspirin());
        assert!(small > 0.0);
        assert!(large > small);
        // bonded spheres overlap, so the total is below the sum of spheres
        let spheres: f64 = 2.0 * 4.0 * PI * 1.7f64.powi(2) + 4.0 * PI * 1.52f64.powi(2) + 6.0 * 4.0 * PI * 1.2f64.powi(2);
        assert!(small < spheres);
    }
}
