//src/types.rs

/// Column order of one summary row.
pub const CSV_HEADER: [&str; 17] = [
    "Receptor",
    "Ligand",
    "Affinity_kcal_mol",
    "pKi",
    "MW",
    "LogP",
    "TPSA",
    "NHA",
    "NRB",
    "HBD",
    "HBA",
    "SASA_A2",
    "QED",
    "LE",
    "LLE",
    "SILE_N",
    "SILE_SASA",
];

/// Intrinsic ligand properties. Every field is optional so that a ligand
/// which failed to load or sanitize still produces a row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LigandDescriptors {
    pub mw: Option<f64>,
    pub logp: Option<f64>,
    pub tpsa: Option<f64>,
    pub nha: Option<u32>,
    pub nrb: Option<u32>,
    pub hbd: Option<u32>,
    pub hba: Option<u32>,
    /// Labute approximate surface area, only with a conformer
    pub sasa: Option<f64>,
    pub qed: Option<f64>,
}

/// Efficiency ratios derived from affinity, pKi and the descriptors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EfficiencyMetrics {
    pub le: Option<f64>,
    pub lle: Option<f64>,
    pub sile_n: Option<f64>,
    pub sile_sasa: Option<f64>,
}

/// One receptor–ligand docking result, i.e. one CSV row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DockingRecord {
    pub receptor: Option<String>,
    pub ligand: Option<String>,
    /// Best (mode 1) affinity in kcal/mol
    pub affinity: Option<f64>,
    pub pki: Option<f64>,
    pub descriptors: LigandDescriptors,
    pub efficiency: EfficiencyMetrics,
}
