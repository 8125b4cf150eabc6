/// Square of the elementary charge [MeV fm]
pub const E_SQR: f64 = 1.4399764;
/// Charged pion mass [MeV / c^2]
pub const M_PI: f64 = 139.57061;
/// Reduced Planck constant [MeV s]
pub const HBAR: f64 = 6.58212196e-22;
/// Speed of light [fm / s]
pub const C: f64 = 2.99792458e+23;
/// Tabulated hbar * c [MeV fm], used by the dimensionless EIM coordinates.
pub const HBARC: f64 = 197.3269804;

/// (hbar / (m_pion c))^2 [fm^2], spin-orbit normalization of global potentials.
pub const CSP: f64 = 2.04553;

pub const N_MASS_AMU: f64 = 1.00866491578;
pub const P_MASS_AMU: f64 = 1.00727646688;
pub const E_MASS_AMU: f64 = 5.48579911e-4;

pub const MEV_PER_AMU: f64 = 931.4943335;

/// Conversion of a cross section from fm^2 to mb.
pub const MB_PER_FM2: f64 = 10.0;
