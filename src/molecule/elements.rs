//src/molecule/elements.rs

use std::fmt;

use crate::error::DockingError;

/// Elements accepted in ligand files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    H,
    B,
    C,
    N,
    O,
    F,
    Na,
    Mg,
    Si,
    P,
    S,
    Cl,
    K,
    Ca,
    Mn,
    Fe,
    Zn,
    Se,
    Br,
    I,
}

impl Element {
    /// Case-insensitive symbol lookup. `D` and `T` are read as hydrogen.
    pub fn from_symbol(symbol: &str) -> Result<Self, DockingError> {
        let s = symbol.trim();
        let normalized: String = s
            .chars()
            .enumerate()
            .map(|(i, c)| if i == 0 { c.to_ascii_uppercase() } else { c.to_ascii_lowercase() })
            .collect();
        let element = match normalized.as_str() {
            "H" | "D" | "T" => Element::H,
            "B" => Element::B,
            "C" => Element::C,
            "N" => Element::N,
            "O" => Element::O,
            "F" => Element::F,
            "Na" => Element::Na,
            "Mg" => Element::Mg,
            "Si" => Element::Si,
            "P" => Element::P,
            "S" => Element::S,
            "Cl" => Element::Cl,
            "K" => Element::K,
            "Ca" => Element::Ca,
            "Mn" => Element::Mn,
            "Fe" => Element::Fe,
            "Zn" => Element::Zn,
            "Se" => Element::Se,
            "Br" => Element::Br,
            "I" => Element::I,
            _ => return Err(DockingError::UnknownElement(s.to_string())),
        };
        Ok(element)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Element::H => "H",
            Element::B => "B",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::Na => "Na",
            Element::Mg => "Mg",
            Element::Si => "Si",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::K => "K",
            Element::Ca => "Ca",
            Element::Mn => "Mn",
            Element::Fe => "Fe",
            Element::Zn => "Zn",
            Element::Se => "Se",
            Element::Br => "Br",
            Element::I => "I",
        }
    }

    /// Standard atomic weight in Da.
    pub fn mass(self) -> f64 {
        match self {
            Element::H => 1.008,
            Element::B => 10.812,
            Element::C => 12.011,
            Element::N => 14.007,
            Element::O => 15.999,
            Element::F => 18.998,
            Element::Na => 22.990,
            Element::Mg => 24.305,
            Element::Si => 28.086,
            Element::P => 30.974,
            Element::S => 32.067,
            Element::Cl => 35.453,
            Element::K => 39.098,
            Element::Ca => 40.078,
            Element::Mn => 54.938,
            Element::Fe => 55.845,
            Element::Zn => 65.39,
            Element::Se => 78.96,
            Element::Br => 79.904,
            Element::I => 126.904,
        }
    }

    /// Covalent radius in Å, used for distance-based bond perception.
    pub fn covalent_radius(self) -> f64 {
        match self {
            Element::H => 0.31,
            Element::B => 0.84,
            Element::C => 0.76,
            Element::N => 0.71,
            Element::O => 0.66,
            Element::F => 0.57,
            Element::Na => 1.66,
            Element::Mg => 1.41,
            Element::Si => 1.11,
            Element::P => 1.07,
            Element::S => 1.05,
            Element::Cl => 1.02,
            Element::K => 2.03,
            Element::Ca => 1.76,
            Element::Mn => 1.39,
            Element::Fe => 1.32,
            Element::Zn => 1.22,
            Element::Se => 1.20,
            Element::Br => 1.20,
            Element::I => 1.39,
        }
    }

    /// Ideal bonding radius of Labute's surface-area model, in Å. Pairs sum
    /// to a single-bond length.
    pub fn bond_radius(self) -> f64 {
        match self {
            Element::H => 0.23,
            Element::B => 0.82,
            Element::C => 0.77,
            Element::N => 0.70,
            Element::O => 0.66,
            Element::F => 0.611,
            Element::Si => 1.11,
            Element::P => 1.06,
            Element::S => 1.04,
            Element::Cl => 0.997,
            Element::Se => 1.17,
            Element::Br => 1.14,
            Element::I => 1.33,
            other => other.covalent_radius(),
        }
    }

    /// Bondi van der Waals radius in Å.
    pub fn vdw_radius(self) -> f64 {
        match self {
            Element::H => 1.20,
            Element::B => 1.92,
            Element::C => 1.70,
            Element::N => 1.55,
            Element::O => 1.52,
            Element::F => 1.47,
            Element::Na => 2.27,
            Element::Mg => 1.73,
            Element::Si => 2.10,
            Element::P => 1.80,
            Element::S => 1.80,
            Element::Cl => 1.75,
            Element::K => 2.75,
            Element::Se => 1.90,
            Element::Br => 1.85,
            Element::I => 1.98,
            _ => 2.00,
        }
    }

    /// Allowed neutral valences, smallest first. Empty for metals, which never
    /// receive implicit hydrogens.
    pub fn valences(self) -> &'static [u8] {
        match self {
            Element::H | Element::F | Element::Cl | Element::Br | Element::I => &[1],
            Element::B => &[3],
            Element::C | Element::Si => &[4],
            Element::N => &[3],
            Element::O => &[2],
            Element::P => &[3, 5],
            Element::S | Element::Se => &[2, 4, 6],
            _ => &[],
        }
    }

    pub fn is_hydrogen(self) -> bool {
        self == Element::H
    }

    pub fn is_halogen(self) -> bool {
        matches!(self, Element::F | Element::Cl | Element::Br | Element::I)
    }

    pub fn is_metal(self) -> bool {
        self.valences().is_empty()
    }

    /// Anything that is neither carbon nor hydrogen.
    pub fn is_hetero(self) -> bool {
        !matches!(self, Element::C | Element::H)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
