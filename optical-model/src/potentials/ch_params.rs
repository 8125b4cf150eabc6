use std::path::Path;

use log::info;
use nuclear::constants::E_SQR;
use num::complex::Complex64;
use serde_json::{Value, json};

use crate::channel::Projectile;

use super::{
    form_factors::{DerivWoodsSaxon, Thomas, WoodsSaxon},
    omp::{OmParams, OmTerms, ParamsError, asymmetry, read_params},
};

/// Global optical potential of
/// R. Varner, W. Thompson, T. McAbee, E. Ludwig and T. Clegg, Phys. Rep. 201, 57 (1991).
///
/// The imaginary surface term shares the shape of the imaginary volume term.
#[derive(Clone, Debug, PartialEq)]
pub struct ChapelHill89 {
    pub projectile: Projectile,

    // real volume shape
    pub r_0: f64,
    pub r_a: f64,
    pub a_0: f64,

    // imaginary volume and surface shape
    pub rw_0: f64,
    pub rw_a: f64,
    pub aw: f64,

    // spin-orbit shape
    pub rso_0: f64,
    pub rso_a: f64,
    pub aso: f64,

    // real volume depth
    pub v_0: f64,
    pub v_e: f64,
    pub v_asym: f64,

    // imaginary volume depth
    pub wv_0: f64,
    pub wv_e0: f64,
    pub wv_ew: f64,

    // imaginary surface depth
    pub ws_0: f64,
    pub ws_asym: f64,
    pub ws_e0: f64,
    pub ws_ew: f64,

    pub vso_0: f64,

    // coulomb radius, used by protons only
    pub rc_0: f64,
    pub rc_a: f64,
}

impl ChapelHill89 {
    pub fn new(projectile: Projectile) -> Self {
        Self {
            projectile,
            r_0: -0.225,
            r_a: 1.25,
            a_0: 0.69,
            rw_0: -0.42,
            rw_a: 1.33,
            aw: 0.69,
            rso_0: -1.2,
            rso_a: 1.34,
            aso: 0.63,
            v_0: 52.9,
            v_e: -0.299,
            v_asym: 13.1,
            wv_0: 7.8,
            wv_e0: 35.,
            wv_ew: 16.,
            ws_0: 10.,
            ws_asym: 18.,
            ws_e0: 36.,
            ws_ew: 37.,
            vso_0: 5.9,
            rc_0: 0.12,
            rc_a: 1.24,
        }
    }

    /// Uncertainty quantified refit (CHUQ) of
    /// C. D. Pruitt et al., Phys. Rev. C 107, 014602 (2023), mean values.
    pub fn chuq(projectile: Projectile) -> Self {
        Self {
            projectile,
            v_0: 56.19,
            v_asym: 13.82,
            v_e: -0.36,
            r_0: -0.2,
            r_a: 1.2,
            a_0: 0.73,
            vso_0: 5.58,
            rso_0: -1.12,
            rso_a: 1.29,
            aso: 0.61,
            wv_0: 9.92,
            wv_e0: 33.15,
            wv_ew: 24.,
            ws_0: 10.59,
            ws_asym: 27.09,
            ws_e0: 20.,
            ws_ew: 36.38,
            rw_0: -0.41,
            rw_a: 1.32,
            aw: 0.69,
            rc_0: 0.13,
            rc_a: 1.25,
        }
    }

    /// Reads the parameters from a JSON object with the CH89 field names,
    /// the Coulomb radius is read for protons only.
    pub fn from_json(value: &Value, projectile: Projectile) -> Result<Self, ParamsError> {
        let key = |name: &str| -> Result<f64, ParamsError> {
            value
                .get(name)
                .and_then(Value::as_f64)
                .ok_or_else(|| ParamsError::MissingKey(name.to_string()))
        };

        let mut params = Self {
            projectile,
            r_0: key("CH89RealCentral_r_o_0")?,
            r_a: key("CH89RealCentral_r_o")?,
            a_0: key("CH89RealCentral_a_0")?,
            rw_0: key("CH89ImagCentral_r_w0")?,
            rw_a: key("CH89ImagCentral_r_w")?,
            aw: key("CH89ImagCentral_a_w")?,
            rso_0: key("CH89SpinOrbit_r_so_0")?,
            rso_a: key("CH89SpinOrbit_r_so")?,
            aso: key("CH89SpinOrbit_a_so")?,
            v_0: key("CH89RealCentral_V_0")?,
            v_e: key("CH89RealCentral_V_e")?,
            v_asym: key("CH89RealCentral_V_t")?,
            wv_0: key("CH89ImagCentral_W_v0")?,
            wv_e0: key("CH89ImagCentral_W_ve0")?,
            wv_ew: key("CH89ImagCentral_W_vew")?,
            ws_0: key("CH89ImagCentral_W_s0")?,
            ws_asym: key("CH89ImagCentral_W_st")?,
            ws_e0: key("CH89ImagCentral_W_se0")?,
            ws_ew: key("CH89ImagCentral_W_sew")?,
            vso_0: key("CH89SpinOrbit_V_so")?,
            ..Self::new(projectile)
        };

        if projectile == Projectile::Proton {
            params.rc_0 = key("CH89Coulomb_r_c_0")?;
            params.rc_a = key("CH89Coulomb_r_c")?;
        }

        Ok(params)
    }

    pub fn from_file(path: impl AsRef<Path>, projectile: Projectile) -> Result<Self, ParamsError> {
        let path = path.as_ref();
        let value = read_params(path)?;
        info!("loaded {projectile:?} CH89 parameters from {}", path.display());

        Self::from_json(&value, projectile)
    }

    pub fn to_json(&self) -> Value {
        let mut value = json!({
            "CH89RealCentral_r_o_0": self.r_0,
            "CH89RealCentral_r_o": self.r_a,
            "CH89RealCentral_a_0": self.a_0,
            "CH89ImagCentral_r_w0": self.rw_0,
            "CH89ImagCentral_r_w": self.rw_a,
            "CH89ImagCentral_a_w": self.aw,
            "CH89SpinOrbit_r_so_0": self.rso_0,
            "CH89SpinOrbit_r_so": self.rso_a,
            "CH89SpinOrbit_a_so": self.aso,
            "CH89RealCentral_V_0": self.v_0,
            "CH89RealCentral_V_e": self.v_e,
            "CH89RealCentral_V_t": self.v_asym,
            "CH89ImagCentral_W_v0": self.wv_0,
            "CH89ImagCentral_W_ve0": self.wv_e0,
            "CH89ImagCentral_W_vew": self.wv_ew,
            "CH89ImagCentral_W_s0": self.ws_0,
            "CH89ImagCentral_W_st": self.ws_asym,
            "CH89ImagCentral_W_se0": self.ws_e0,
            "CH89ImagCentral_W_sew": self.ws_ew,
            "CH89SpinOrbit_V_so": self.vso_0,
        });

        if self.projectile == Projectile::Proton {
            value["CH89Coulomb_r_c_0"] = json!(self.rc_0);
            value["CH89Coulomb_r_c"] = json!(self.rc_a);
        }

        value
    }

    pub fn coulomb_radius(&self, a: u32) -> f64 {
        self.rc_0 + self.rc_a * (a as f64).cbrt()
    }

    /// Coulomb energy shift 6 Z e^2 / (5 R_c), zero for neutrons.
    pub fn coulomb_shift(&self, z: u32, a: u32) -> f64 {
        match self.projectile {
            Projectile::Neutron => 0.,
            Projectile::Proton => 6. * z as f64 * E_SQR / (5. * self.coulomb_radius(a)),
        }
    }

    pub fn volume_radius(&self, a: u32) -> f64 {
        self.r_0 + self.r_a * (a as f64).cbrt()
    }

    pub fn imag_radius(&self, a: u32) -> f64 {
        self.rw_0 + self.rw_a * (a as f64).cbrt()
    }

    pub fn spin_orbit_radius(&self, a: u32) -> f64 {
        self.rso_0 + self.rso_a * (a as f64).cbrt()
    }

    pub fn real_volume_depth(&self, z: u32, a: u32, erg_lab: f64) -> f64 {
        let de = erg_lab - self.coulomb_shift(z, a);

        -(self.v_0 + self.v_e * de + asymmetry(self.projectile, z, a) * self.v_asym)
    }

    pub fn imag_volume_depth(&self, z: u32, a: u32, erg_lab: f64) -> f64 {
        let de = erg_lab - self.coulomb_shift(z, a);

        -self.wv_0 / (1. + ((self.wv_e0 - de) / self.wv_ew).exp())
    }

    /// Surface depth with the factor 4 a_w of the derivative form absorbed.
    pub fn imag_surface_depth(&self, z: u32, a: u32, erg_lab: f64) -> f64 {
        let de = erg_lab - self.coulomb_shift(z, a);
        let ws = (self.ws_0 + asymmetry(self.projectile, z, a) * self.ws_asym)
            / (1. + ((de - self.ws_e0) / self.ws_ew).exp());

        4. * self.aw * ws
    }

    /// The pion Compton wavelength squared is taken as 2 fm^2.
    pub fn real_spin_orbit_depth(&self) -> f64 {
        2. * self.vso_0
    }
}

impl OmParams for ChapelHill89 {
    fn projectile(&self) -> Projectile {
        self.projectile
    }

    fn terms(&self, z: u32, a: u32, erg_lab: f64) -> OmTerms {
        let i = Complex64::i();
        let rv = self.volume_radius(a);
        let rw = self.imag_radius(a);
        let rso = self.spin_orbit_radius(a);

        OmTerms {
            real_volume: WoodsSaxon::new(self.real_volume_depth(z, a, erg_lab), rv, self.a_0),
            imag_volume: WoodsSaxon::new(i * self.imag_volume_depth(z, a, erg_lab), rw, self.aw),
            real_surface: DerivWoodsSaxon::new(0., rw, self.aw),
            imag_surface: DerivWoodsSaxon::new(i * self.imag_surface_depth(z, a, erg_lab), rw, self.aw),
            real_spin_orbit: Thomas::new(self.real_spin_orbit_depth(), rso, self.aso),
            imag_spin_orbit: Thomas::new(0., rso, self.aso),
        }
    }
}
