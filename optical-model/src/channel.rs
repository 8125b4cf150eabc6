use nuclear::{
    angular_momentum::FermionSpinOrbitCoupling,
    constants::{C, E_SQR, HBAR, N_MASS_AMU, P_MASS_AMU},
    units::mass_units::{Amu, Mass},
};
use serde::{Deserialize, Serialize};

use crate::asymptotics::Asymptotics;

/// Incident nucleon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Projectile {
    Neutron,
    Proton,
}

impl Projectile {
    /// Mass [amu]
    pub fn mass_amu(&self) -> f64 {
        match self {
            Projectile::Neutron => N_MASS_AMU,
            Projectile::Proton => P_MASS_AMU,
        }
    }

    pub fn charge(&self) -> u32 {
        match self {
            Projectile::Neutron => 0,
            Projectile::Proton => 1,
        }
    }

    /// 2s + 1 of the projectile spin.
    pub fn spin21(&self) -> u32 {
        2
    }
}

/// Target nucleus.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Isotope {
    /// proton number
    pub z: u32,
    /// mass number
    pub a: u32,
    /// mass [amu]
    pub mass: f64,
}

impl Isotope {
    pub fn new(z: u32, a: u32, mass: f64) -> Self {
        assert!(z <= a, "isotope with Z = {z} > A = {a}");

        Self { z, a, mass }
    }

    pub fn n(&self) -> u32 {
        self.a - self.z
    }
}

/// Initial state of the elastic two body problem.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    /// channel energy threshold [MeV]
    pub threshold: f64,
    /// channel radius [fm]
    pub radius: f64,
    /// target mass [amu]
    pub targ_mass: f64,
    /// projectile mass [amu]
    pub proj_mass: f64,
    /// product of the target and projectile proton numbers
    pub zz: f64,
    /// 2s + 1, with s the projectile spin
    pub spin21: u32,
}

impl Channel {
    /// Creates a channel with masses given in amu.
    pub fn new(threshold: f64, radius: f64, proj_mass: f64, zp: u32, spin21: u32, targ_mass: f64, zt: u32) -> Self {
        assert!(radius > 0., "channel radius must be positive");

        Self {
            threshold,
            radius,
            targ_mass,
            proj_mass,
            zz: (zp * zt) as f64,
            spin21,
        }
    }

    pub fn for_target(threshold: f64, radius: f64, projectile: Projectile, target: &Isotope) -> Self {
        Self::new(
            threshold,
            radius,
            projectile.mass_amu(),
            projectile.charge(),
            projectile.spin21(),
            target.mass,
            target.z,
        )
    }

    pub fn energetics_cms(&self, erg_cms: f64) -> Energetics {
        Energetics::new(erg_cms, self)
    }

    pub fn energetics_lab(&self, erg_lab: f64) -> Energetics {
        let m1 = Mass(self.proj_mass, Amu).to_base();
        let m2 = Mass(self.targ_mass, Amu).to_base();

        self.energetics_cms(erg_lab * m2 / (m1 + m2))
    }

    /// Free asymptotic waves of the given coupling at the channel radius.
    pub fn asymptotics(&self, am: &FermionSpinOrbitCoupling, k: f64) -> Asymptotics {
        Asymptotics::new(am.l, k, self.radius)
    }
}

/// Energy dependent quantities of a channel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Energetics {
    /// CMS energy above threshold [MeV]
    pub erg_cms: f64,
    /// Bombarding kinetic energy in the lab frame [MeV]
    pub erg_lab: f64,
    /// CMS momentum with relativistic correction [fm^-1],
    /// Eq. 17 of Ingemarsson, Physica Scripta 9, 156 (1974)
    pub k: f64,
    /// Relativistic reduced mass [MeV], Eq. 21 of Ingemarsson (1974)
    pub reduced_mass: f64,
    /// hbar^2 c^2 / (2 reduced mass * radius) [MeV]
    pub h2ma: f64,
    /// Sommerfeld parameter, sign(Zz) / (a_B k)
    pub sommerfeld: f64,
}

impl Energetics {
    pub fn new(erg_cms: f64, channel: &Channel) -> Self {
        let hbarc = HBAR * C;
        let m1 = Mass(channel.proj_mass, Amu).to_base();
        let m2 = Mass(channel.targ_mass, Amu).to_base();

        let erg_lab = erg_cms * (m1 + m2) / m2;
        let k = m2 * (erg_lab * (erg_lab + 2. * m1)).sqrt()
            / ((m1 + m2).powi(2) + 2. * m2 * erg_lab).sqrt()
            / hbarc;

        let ep = m1 + erg_cms;
        let reduced_mass = hbarc * hbarc * k * k * ep / (ep * ep - m1 * m1);
        let h2ma = hbarc * hbarc / (2. * reduced_mass * channel.radius);

        let sommerfeld = if channel.zz == 0. {
            0.
        } else {
            channel.zz * E_SQR * reduced_mass / (hbarc * hbarc * k)
        };

        Self {
            erg_cms: erg_cms - channel.threshold,
            erg_lab,
            k,
            reduced_mass,
            h2ma,
            sommerfeld,
        }
    }
}
