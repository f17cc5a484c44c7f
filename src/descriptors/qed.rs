//src/descriptors/qed.rs
//! Quantitative estimate of drug-likeness (Bickerton et al. 2012).

use super::{has_double_bond_to, heavy_neighbors};
use crate::molecule::{BondOrder, Element, Molecule};

/// The eight properties QED combines.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QedProperties {
    pub mw: f64,
    pub alogp: f64,
    pub hba: u32,
    pub hbd: u32,
    pub psa: f64,
    pub rotb: u32,
    pub arom: u32,
    pub alerts: u32,
}

/// Asymmetric double sigmoid parameters: a, b, c, d, e, f, dmax.
type AdsParams = [f64; 7];

const MW: AdsParams = [2.817065973, 392.5754953, 290.7489764, 2.419764353, 49.22325677, 65.37051707, 104.9805561];
const ALOGP: AdsParams = [3.172690585, 137.8624751, 2.534937431, 4.581497897, 0.822739154, 0.576295591, 131.3186604];
const HBA: AdsParams = [2.948620388, 160.4605972, 3.615294657, 4.435986202, 0.290141953, 1.300669958, 148.7763046];
const HBD: AdsParams = [1.618662227, 1010.051101, 0.985094388, 0.000000001, 0.713820843, 0.920922555, 258.1632616];
const PSA: AdsParams = [1.876861559, 125.2232657, 62.90773554, 87.83366614, 12.01999824, 28.51324732, 104.5686167];
const ROTB: AdsParams = [0.010000000, 272.4121427, 2.558379970, 1.565547684, 1.271567166, 2.758063707, 105.4420403];
const AROM: AdsParams = [3.217788970, 957.7374108, 2.274627939, 0.000000001, 1.317690384, 0.375760881, 312.3372610];
const ALERTS: AdsParams = [0.010000000, 1199.094025, -0.09002883, 0.000000001, 0.185904477, 0.875193782, 417.7253140];

/// Mean weights, same order as the property list.
const WEIGHTS: [f64; 8] = [0.66, 0.46, 0.05, 0.61, 0.06, 0.65, 0.48, 0.95];

fn ads(x: f64, p: &AdsParams) -> f64 {
    let [a, b, c, d, e, f, dmax] = *p;
    let rise = 1.0 / (1.0 + (-(x - c + d / 2.0) / e).exp());
    let fall = 1.0 - 1.0 / (1.0 + (-(x - c - d / 2.0) / f).exp());
    (a + b * rise * fall) / dmax
}

/// Weighted geometric mean of the desirability functions, in (0, 1].
pub fn qed(props: &QedProperties) -> f64 {
    let desirabilities = [
        ads(props.mw, &MW),
        ads(props.alogp, &ALOGP),
        ads(props.hba as f64, &HBA),
        ads(props.hbd as f64, &HBD),
        ads(props.psa, &PSA),
        ads(props.rotb as f64, &ROTB),
        ads(props.arom as f64, &AROM),
        ads(props.alerts as f64, &ALERTS),
    ];
    let weighted: f64 = desirabilities
        .iter()
        .zip(WEIGHTS)
        .map(|(d, w)| w * d.max(f64::MIN_POSITIVE).ln())
        .sum();
    (weighted / WEIGHTS.iter().sum::<f64>()).exp()
}

/// Acceptor count of the QED paper, which differs from the Lipinski-style
/// count: carboxylic OH counts, amide N does not.
pub fn qed_acceptors(mol: &Molecule) -> u32 {
    (0..mol.num_atoms())
        .filter(|&idx| {
            let atom = &mol.atoms[idx];
            let hs = mol.total_hs(idx);
            let connections = mol.total_degree(idx);
            let valence = mol.total_valence(idx);
            let charge = atom.formal_charge;
            match atom.element {
                Element::O if atom.aromatic => hs == 0 && connections == 2,
                Element::O | Element::S if charge < 0 => connections == 1,
                Element::O => {
                    valence == 2
                        && ((hs == 1 && connections == 2)
                            || (hs == 0 && (connections == 2 || connections == 1)))
                }
                Element::S if atom.aromatic => false,
                Element::S => hs == 0 && valence == 2 && (connections == 2 || connections == 1),
                Element::N if atom.aromatic => hs == 0 && connections == 2,
                Element::N => {
                    if hs == 0 && connections == 1 && valence == 3 {
                        return true;
                    }
                    charge == 0
                        && connections == 3
                        && valence == 3
                        && !heavy_neighbors(mol, idx).any(|(n, order)| {
                            order == BondOrder::Single
                                && matches!(mol.atoms[n].element, Element::C | Element::S)
                                && has_double_bond_to(mol, n, &[Element::O])
                        })
                }
                _ => false,
            }
        })
        .count() as u32
}

fn is_carbonyl_carbon(mol: &Molecule, atom: usize) -> bool {
    mol.atoms[atom].element == Element::C && has_double_bond_to(mol, atom, &[Element::O])
}

fn is_sp3_carbon(mol: &Molecule, atom: usize) -> bool {
    let a = &mol.atoms[atom];
    a.element == Element::C
        && !a.aromatic
        && heavy_neighbors(mol, atom).all(|(_, order)| order == BondOrder::Single)
}

fn is_aliphatic(mol: &Molecule, atom: usize, element: Element) -> bool {
    mol.atoms[atom].element == element && !mol.atoms[atom].aromatic
}

/// Bonds of `atom` of the given order, as (neighbour, bond index).
fn bonds_of(mol: &Molecule, atom: usize, order: BondOrder) -> impl Iterator<Item = (usize, usize)> + '_ {
    mol.neighbors(atom)
        .iter()
        .copied()
        .filter(move |&(_, bond)| mol.bonds[bond].order == order)
}

/// Aromatic carbon of an all-carbon aromatic six-ring.
fn is_benzene_carbon(mol: &Molecule, atom: usize) -> bool {
    mol.ring_info().rings().iter().any(|ring| {
        ring.len() == 6
            && ring.contains(&atom)
            && ring
                .iter()
                .all(|&r| mol.atoms[r].aromatic && mol.atoms[r].element == Element::C)
    })
}

fn aldehyde(mol: &Molecule, atom: usize) -> bool {
    is_aliphatic(mol, atom, Element::C)
        && has_double_bond_to(mol, atom, &[Element::O])
        && mol.total_hs(atom) == 1
}

/// C(=O), C(=S), S(=O) or S(=S) carrying a halogen.
fn acyl_halide(mol: &Molecule, atom: usize) -> bool {
    matches!(mol.atoms[atom].element, Element::C | Element::S)
        && has_double_bond_to(mol, atom, &[Element::O, Element::S])
        && heavy_neighbors(mol, atom).any(|(n, _)| mol.atoms[n].element.is_halogen())
}

/// Acyclic C=C conjugated with C=O or C=S.
fn michael_acceptor(mol: &Molecule, atom: usize) -> bool {
    if !is_aliphatic(mol, atom, Element::C) {
        return false;
    }
    let acyclic_alkene = bonds_of(mol, atom, BondOrder::Double)
        .any(|(n, bond)| is_aliphatic(mol, n, Element::C) && !mol.is_ring_bond(bond));
    acyclic_alkene
        && heavy_neighbors(mol, atom).any(|(n, order)| {
            order == BondOrder::Single
                && is_aliphatic(mol, n, Element::C)
                && has_double_bond_to(mol, n, &[Element::O, Element::S])
        })
}

fn isocyanate(mol: &Molecule, atom: usize) -> bool {
    mol.atoms[atom].element == Element::C
        && has_double_bond_to(mol, atom, &[Element::N])
        && has_double_bond_to(mol, atom, &[Element::O])
}

/// Ketenes C=C=O and allenes C=C=C.
fn cumulene(mol: &Molecule, atom: usize) -> bool {
    mol.atoms[atom].element == Element::C
        && bonds_of(mol, atom, BondOrder::Double)
            .filter(|&(n, _)| matches!(mol.atoms[n].element, Element::C | Element::O))
            .count()
            >= 2
        && has_double_bond_to(mol, atom, &[Element::C])
}

fn nitro(mol: &Molecule, atom: usize) -> bool {
    if mol.atoms[atom].element != Element::N || mol.atoms[atom].aromatic {
        return false;
    }
    let oxygens = heavy_neighbors(mol, atom)
        .filter(|(n, _)| mol.atoms[*n].element == Element::O && mol.heavy_degree(*n) == 1)
        .count();
    oxygens >= 2 && has_double_bond_to(mol, atom, &[Element::O])
}

fn alkyl_halide(mol: &Molecule, atom: usize) -> bool {
    is_sp3_carbon(mol, atom)
        && heavy_neighbors(mol, atom)
            .any(|(n, _)| matches!(mol.atoms[n].element, Element::Cl | Element::Br | Element::I))
}

fn iodine(mol: &Molecule, atom: usize) -> bool {
    mol.atoms[atom].element == Element::I
}

/// Epoxides, aziridines and thiiranes.
fn three_ring_hetero(mol: &Molecule, atom: usize) -> bool {
    matches!(mol.atoms[atom].element, Element::O | Element::N | Element::S)
        && mol.ring_info().atom_in_ring_of_size(atom, 3)
}

/// Two carbonyls on one sp3 carbon, acyclic sp2 carbon or oxygen: 1,3-dicarbonyls
/// and anhydrides.
fn beta_dicarbonyl(mol: &Molecule, atom: usize) -> bool {
    let a = &mol.atoms[atom];
    let bridge = match a.element {
        Element::O => true,
        Element::C => {
            !a.aromatic && (is_sp3_carbon(mol, atom) || (!mol.is_ring_atom(atom) && mol.total_degree(atom) == 3))
        }
        _ => false,
    };
    bridge
        && heavy_neighbors(mol, atom)
            .filter(|&(n, order)| order == BondOrder::Single && is_carbonyl_carbon(mol, n))
            .count()
            >= 2
}

fn alpha_dicarbonyl(mol: &Molecule, atom: usize) -> bool {
    is_carbonyl_carbon(mol, atom)
        && heavy_neighbors(mol, atom).any(|(n, order)| order == BondOrder::Single && is_carbonyl_carbon(mol, n))
}

/// Carbon-bonded C(=O)-O-C, with carbon, oxygen or sulfur on the acyl side.
fn ester(mol: &Molecule, atom: usize) -> bool {
    if !is_carbonyl_carbon(mol, atom) {
        return false;
    }
    let ester_oxygen = heavy_neighbors(mol, atom).find(|&(n, order)| {
        order == BondOrder::Single
            && mol.atoms[n].element == Element::O
            && heavy_neighbors(mol, n).any(|(c, _)| c != atom && mol.atoms[c].element == Element::C)
    });
    let Some((oxygen, _)) = ester_oxygen else {
        return false;
    };
    heavy_neighbors(mol, atom).any(|(n, order)| {
        n != oxygen
            && order != BondOrder::Double
            && matches!(mol.atoms[n].element, Element::C | Element::O | Element::S)
    })
}

/// Ester oxygen on a benzene ring, acylated by a carbon acid.
fn phenyl_ester(mol: &Molecule, atom: usize) -> bool {
    mol.atoms[atom].element == Element::O
        && heavy_neighbors(mol, atom).any(|(n, _)| is_benzene_carbon(mol, n))
        && heavy_neighbors(mol, atom).any(|(n, order)| {
            order == BondOrder::Single
                && is_aliphatic(mol, n, Element::C)
                && has_double_bond_to(mol, n, &[Element::O])
                && heavy_neighbors(mol, n).any(|(c, o)| {
                    c != atom && o == BondOrder::Single && mol.atoms[c].element == Element::C
                })
        })
}

/// Acyclic ketone or thioketone on an aromatic carbon.
fn aryl_ketone(mol: &Molecule, atom: usize) -> bool {
    is_aliphatic(mol, atom, Element::C)
        && !mol.is_ring_atom(atom)
        && has_double_bond_to(mol, atom, &[Element::O, Element::S])
        && heavy_neighbors(mol, atom).any(|(n, _)| mol.atoms[n].aromatic && mol.atoms[n].element == Element::C)
        && heavy_neighbors(mol, atom)
            .filter(|&(_, order)| order != BondOrder::Double)
            .filter(|(n, _)| mol.atoms[*n].element == Element::C)
            .count()
            >= 2
}

fn imine(mol: &Molecule, atom: usize) -> bool {
    is_aliphatic(mol, atom, Element::C)
        && bonds_of(mol, atom, BondOrder::Double)
            .any(|(n, bond)| is_aliphatic(mol, n, Element::N) && !mol.is_ring_bond(bond))
}

fn thiocarbonyl(mol: &Molecule, atom: usize) -> bool {
    mol.atoms[atom].element == Element::C && has_double_bond_to(mol, atom, &[Element::S])
}

/// One end of an isolated C=C: CH2=, or a CH/C whose other substituents are
/// sp3 carbons.
fn alkene_end(mol: &Molecule, atom: usize) -> bool {
    if !is_aliphatic(mol, atom, Element::C) {
        return false;
    }
    let sp3 = heavy_neighbors(mol, atom)
        .filter(|&(n, order)| order == BondOrder::Single && is_sp3_carbon(mol, n))
        .count();
    match mol.total_hs(atom) {
        2 => true,
        1 => sp3 >= 1,
        _ => sp3 >= 2,
    }
}

fn isolated_alkene(mol: &Molecule, atom: usize) -> bool {
    alkene_end(mol, atom)
        && bonds_of(mol, atom, BondOrder::Double).any(|(n, _)| alkene_end(mol, n))
}

/// Acyclic conjugated diene C=C-C=C.
fn polyene(mol: &Molecule, atom: usize) -> bool {
    let acyclic_c = |idx: usize| is_aliphatic(mol, idx, Element::C) && !mol.is_ring_atom(idx);
    if !acyclic_c(atom) {
        return false;
    }
    bonds_of(mol, atom, BondOrder::Double).any(|(partner, _)| {
        acyclic_c(partner)
            && bonds_of(mol, atom, BondOrder::Single).any(|(next, _)| {
                acyclic_c(next)
                    && bonds_of(mol, next, BondOrder::Double).any(|(last, _)| last != atom && acyclic_c(last))
            })
    })
}

fn alkyne(mol: &Molecule, atom: usize) -> bool {
    mol.atoms[atom].element == Element::C
        && bonds_of(mol, atom, BondOrder::Triple).any(|(n, _)| mol.atoms[n].element == Element::C)
}

/// Primary amine on a benzene ring.
fn aniline(mol: &Molecule, atom: usize) -> bool {
    is_aliphatic(mol, atom, Element::N)
        && mol.total_hs(atom) == 2
        && heavy_neighbors(mol, atom).any(|(n, _)| is_benzene_carbon(mol, n))
}

fn hydroxamic_acid(mol: &Molecule, atom: usize) -> bool {
    mol.atoms[atom].element == Element::N
        && heavy_neighbors(mol, atom).any(|(n, order)| order == BondOrder::Single && is_carbonyl_carbon(mol, n))
        && heavy_neighbors(mol, atom)
            .any(|(n, _)| mol.atoms[n].element == Element::O && mol.total_hs(n) == 1)
}

fn sulfonate_ester(mol: &Molecule, atom: usize) -> bool {
    mol.atoms[atom].element == Element::S
        && bonds_of(mol, atom, BondOrder::Double)
            .filter(|&(n, _)| mol.atoms[n].element == Element::O)
            .count()
            == 2
        && heavy_neighbors(mol, atom).any(|(n, _)| mol.atoms[n].element == Element::C)
        && heavy_neighbors(mol, atom).any(|(o, order)| {
            order == BondOrder::Single
                && mol.atoms[o].element == Element::O
                && heavy_neighbors(mol, o).any(|(c, _)| mol.atoms[c].element == Element::C)
        })
}

fn oxime(mol: &Molecule, atom: usize) -> bool {
    mol.atoms[atom].element == Element::N
        && has_double_bond_to(mol, atom, &[Element::C])
        && heavy_neighbors(mol, atom)
            .any(|(n, order)| order == BondOrder::Single && mol.atoms[n].element == Element::O)
}

/// Cyanates, thiocyanates and cyanamides.
fn hetero_nitrile(mol: &Molecule, atom: usize) -> bool {
    mol.atoms[atom].element == Element::C
        && bonds_of(mol, atom, BondOrder::Triple).any(|(n, _)| mol.atoms[n].element == Element::N)
        && heavy_neighbors(mol, atom).any(|(n, order)| {
            order == BondOrder::Single && matches!(mol.atoms[n].element, Element::N | Element::O | Element::S)
        })
}

fn azide_or_diazo(mol: &Molecule, atom: usize) -> bool {
    let a = &mol.atoms[atom];
    a.element == Element::N
        && a.formal_charge > 0
        && heavy_neighbors(mol, atom).any(|(n, order)| {
            matches!(order, BondOrder::Double | BondOrder::Triple) && mol.atoms[n].element == Element::N
        })
}

fn thiol(mol: &Molecule, atom: usize) -> bool {
    mol.atoms[atom].element == Element::S && mol.total_hs(atom) > 0
}

/// Acyclic N=N.
fn azo(mol: &Molecule, atom: usize) -> bool {
    is_aliphatic(mol, atom, Element::N)
        && bonds_of(mol, atom, BondOrder::Double)
            .any(|(n, bond)| is_aliphatic(mol, n, Element::N) && !mol.is_ring_bond(bond))
}

fn peroxide(mol: &Molecule, atom: usize) -> bool {
    mol.atoms[atom].element == Element::O
        && heavy_neighbors(mol, atom).any(|(n, _)| mol.atoms[n].element == Element::O)
}

fn disulfide(mol: &Molecule, atom: usize) -> bool {
    mol.atoms[atom].element == Element::S
        && heavy_neighbors(mol, atom).any(|(n, _)| mol.atoms[n].element == Element::S)
}

/// Any nitrogen bonded to an NH2.
fn hydrazine(mol: &Molecule, atom: usize) -> bool {
    is_aliphatic(mol, atom, Element::N)
        && mol.total_hs(atom) == 2
        && heavy_neighbors(mol, atom).any(|(n, _)| mol.atoms[n].element == Element::N)
}

fn n_halide(mol: &Molecule, atom: usize) -> bool {
    is_aliphatic(mol, atom, Element::N)
        && heavy_neighbors(mol, atom).any(|(n, _)| mol.atoms[n].element.is_halogen())
}

/// Sulfenate-type S-O single bond on a divalent sulfur.
fn sulfenyl_oxygen(mol: &Molecule, atom: usize) -> bool {
    mol.atoms[atom].element == Element::S
        && mol.total_degree(atom) == 2
        && heavy_neighbors(mol, atom)
            .any(|(n, order)| order == BondOrder::Single && mol.atoms[n].element == Element::O)
}

fn phosphorus(mol: &Molecule, atom: usize) -> bool {
    mol.atoms[atom].element == Element::P
}

/// Metals and the metalloids B, Si and Se.
fn unwanted_element(mol: &Molecule, atom: usize) -> bool {
    let element = mol.atoms[atom].element;
    element.is_metal() || matches!(element, Element::B | Element::Si | Element::Se)
}

fn charged_carbon(mol: &Molecule, atom: usize) -> bool {
    mol.atoms[atom].element == Element::C && mol.atoms[atom].formal_charge != 0
}

fn oxonium_or_sulfonium(mol: &Molecule, atom: usize) -> bool {
    matches!(mol.atoms[atom].element, Element::O | Element::S) && mol.atoms[atom].formal_charge > 0
}

/// Acyclic aminal, acetal or thioacetal carbon: an sp3 carbon carrying two
/// acyclic N, O or S substituents.
fn acyclic_acetal(mol: &Molecule, atom: usize) -> bool {
    is_sp3_carbon(mol, atom)
        && heavy_neighbors(mol, atom)
            .filter(|&(n, _)| {
                !mol.is_ring_atom(n)
                    && match mol.atoms[n].element {
                        Element::N | Element::O => true,
                        Element::S => mol.total_degree(n) == 2,
                        _ => false,
                    }
            })
            .count()
            >= 2
}

/// Four chained acyclic atoms with exactly two heavy connections each.
fn long_chain(mol: &Molecule, atom: usize) -> bool {
    let link = |idx: usize| !mol.is_ring_atom(idx) && mol.heavy_degree(idx) == 2;
    fn walk(mol: &Molecule, from: usize, at: usize, left: usize, link: &dyn Fn(usize) -> bool) -> bool {
        if left == 0 {
            return true;
        }
        heavy_neighbors(mol, at).any(|(n, _)| n != from && link(n) && walk(mol, at, n, left - 1, link))
    }
    link(atom) && walk(mol, usize::MAX, atom, 3, &link)
}

/// Unwanted groups, each counted once however often it occurs.
const UNWANTED_GROUPS: [fn(&Molecule, usize) -> bool; 38] = [
    aldehyde,
    acyl_halide,
    michael_acceptor,
    isocyanate,
    cumulene,
    nitro,
    alkyl_halide,
    iodine,
    three_ring_hetero,
    beta_dicarbonyl,
    alpha_dicarbonyl,
    ester,
    phenyl_ester,
    aryl_ketone,
    imine,
    thiocarbonyl,
    isolated_alkene,
    polyene,
    alkyne,
    aniline,
    hydroxamic_acid,
    sulfonate_ester,
    oxime,
    hetero_nitrile,
    azide_or_diazo,
    thiol,
    azo,
    peroxide,
    disulfide,
    hydrazine,
    n_halide,
    sulfenyl_oxygen,
    phosphorus,
    unwanted_element,
    charged_carbon,
    oxonium_or_sulfonium,
    acyclic_acetal,
    long_chain,
];

/// Number of distinct structural alert types present in `mol`.
pub fn structural_alerts(mol: &Molecule) -> u32 {
    UNWANTED_GROUPS
        .iter()
        .filter(|alert| (0..mol.num_atoms()).any(|idx| alert(mol, idx)))
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecule::test_molecules::*;
    use crate::molecule::BondOrder::*;
    use crate::molecule::Element::*;

    fn drug_like() -> QedProperties {
        QedProperties {
            mw: 300.0,
            alogp: 2.5,
            hba: 4,
            hbd: 1,
            psa: 60.0,
            rotb: 3,
            arom: 2,
            alerts: 0,
        }
    }

    #[test]
    fn drug_like_scores_high() {
        let score = qed(&drug_like());
        assert!(score > 0.7 && score <= 1.0, "{}", score);
    }

    #[test]
    fn alerts_lower_the_score() {
        let clean = qed(&drug_like());
        let flagged = qed(&QedProperties {
            alerts: 3,
            ..drug_like()
        });
        assert!(flagged < clean);
    }

    #[test]
    fn acceptor_patterns() {
        // carbonyl O, ester O, acid =O, acid OH
        assert_eq!(qed_acceptors(&aspirin()), 4);
        // amide N is excluded
        assert_eq!(qed_acceptors(&n_methylacetamide()), 1);
        assert_eq!(qed_acceptors(&pyrrole()), 0);
    }

    #[test]
    fn alert_detection() {
        assert_eq!(structural_alerts(&ethanol()), 0);
        // ester and phenyl ester
        assert_eq!(structural_alerts(&aspirin()), 2);
        assert_eq!(structural_alerts(&n_methylacetamide()), 0);

        let acetaldehyde = build(&[(C, 0), (C, 0), (O, 0)], &[(0, 1, Single), (1, 2, Double)]);
        assert_eq!(structural_alerts(&acetaldehyde), 1);

        let chloroethane = build(&[(C, 0), (C, 0), (Cl, 0)], &[(0, 1, Single), (1, 2, Single)]);
        assert_eq!(structural_alerts(&chloroethane), 1);

        let hydrazine = build(&[(N, 0), (N, 0)], &[(0, 1, Single)]);
        assert_eq!(structural_alerts(&hydrazine), 1);
    }

    #[test]
    fn alkene_and_imine_alerts() {
        // CC=CC
        let butene = build(
            &[(C, 0), (C, 0), (C, 0), (C, 0)],
            &[(0, 1, Single), (1, 2, Double), (2, 3, Single)],
        );
        assert_eq!(structural_alerts(&butene), 1);

        // CC=NC
        let imine = build(
            &[(C, 0), (C, 0), (N, 0), (C, 0)],
            &[(0, 1, Single), (1, 2, Double), (2, 3, Single)],
        );
        assert_eq!(structural_alerts(&imine), 1);

        // ring alkenes still count; aromatic rings do not
        let cyclohexene = build(
            &[(C, 0), (C, 0), (C, 0), (C, 0), (C, 0), (C, 0)],
            &[(0, 1, Double), (1, 2, Single), (2, 3, Single), (3, 4, Single), (4, 5, Single), (5, 0, Single)],
        );
        assert_eq!(structural_alerts(&cyclohexene), 1);
        assert_eq!(structural_alerts(&benzene()), 0);
    }

    #[test]
    fn vinyl_ketone_is_a_michael_acceptor() {
        // C=CC(=O)C
        let vinyl_ketone = build(
            &[(C, 0), (C, 0), (C, 0), (O, 0), (C, 0)],
            &[(0, 1, Double), (1, 2, Single), (2, 3, Double), (2, 4, Single)],
        );
        assert_eq!(structural_alerts(&vinyl_ketone), 1);
    }

    #[test]
    fn chains_and_acetals() {
        // CCCCCC: four acyclic two-connected atoms in a row
        let hexane = build(
            &[(C, 0), (C, 0), (C, 0), (C, 0), (C, 0), (C, 0)],
            &[(0, 1, Single), (1, 2, Single), (2, 3, Single), (3, 4, Single), (4, 5, Single)],
        );
        assert_eq!(structural_alerts(&hexane), 1);

        // COCOC
        let acetal = build(
            &[(C, 0), (O, 0), (C, 0), (O, 0), (C, 0)],
            &[(0, 1, Single), (1, 2, Single), (2, 3, Single), (3, 4, Single)],
        );
        assert_eq!(structural_alerts(&acetal), 1);
    }
}
