use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parity {
    Odd,
    Even,
}

impl Parity {
    pub fn of_orbital(l: u32) -> Self {
        if l % 2 == 0 { Parity::Even } else { Parity::Odd }
    }
}

/// Coupling of the projectile spin 1/2 to the orbital angular momentum,
/// `Up` for j = l + 1/2 and `Down` for j = l - 1/2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarization {
    Up,
    Down,
}

impl Polarization {
    /// Orbital angular momentum of the first partial wave.
    ///
    /// The s-wave has no j = l - 1/2 coupling, so every `Down` sequence starts at l = 1
    /// and its row `i` describes the partial wave `l = i + 1`.
    pub fn l_offset(&self) -> u32 {
        match self {
            Polarization::Up => 0,
            Polarization::Down => 1,
        }
    }

    /// Number of partial waves with l < lmax for this polarization.
    pub fn partial_waves(&self, lmax: usize) -> usize {
        lmax.saturating_sub(self.l_offset() as usize)
    }

    /// Orbital angular momentum of the partial wave stored at `index`.
    pub fn l(&self, index: usize) -> u32 {
        index as u32 + self.l_offset()
    }

    pub fn j21(&self, l: u32) -> u32 {
        match self {
            Polarization::Up => 2 * l + 2,
            Polarization::Down => 2 * l,
        }
    }
}

impl std::fmt::Display for Polarization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Polarization::Up => write!(f, "up"),
            Polarization::Down => write!(f, "down"),
        }
    }
}

/// Partial wave of a spin 1/2 projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FermionSpinOrbitCoupling {
    /// 2j + 1, with j the total angular momentum.
    pub j21: u32,
    /// orbital angular momentum
    pub l: u32,
    pub parity: Parity,
}

impl FermionSpinOrbitCoupling {
    pub fn new(j21: u32, l: u32) -> Self {
        assert!(
            (2 * l + 1).abs_diff(j21) == 1,
            "spin 1/2 cannot couple l = {l} to 2j+1 = {j21}"
        );

        Self {
            j21,
            l,
            parity: Parity::of_orbital(l),
        }
    }

    pub fn polarization(&self) -> Polarization {
        if self.j21 > 2 * self.l + 1 {
            Polarization::Up
        } else {
            Polarization::Down
        }
    }

    /// Total angular momentum j.
    pub fn j(&self) -> f64 {
        0.5 * (self.j21 as f64 - 1.)
    }

    /// Eigenvalue of l·s for this coupling.
    pub fn l_dot_s(&self) -> f64 {
        let j = self.j();
        let l = self.l as f64;

        0.5 * (j * (j + 1.) - l * (l + 1.) - 0.75)
    }

    /// Ordered couplings with l < lmax, the angular momentum index space of one polarization.
    pub fn couplings(polarization: Polarization, lmax: usize) -> Vec<Self> {
        (0..polarization.partial_waves(lmax))
            .map(|i| {
                let l = polarization.l(i);
                Self::new(polarization.j21(l), l)
            })
            .collect()
    }
}

impl Default for FermionSpinOrbitCoupling {
    fn default() -> Self {
        Self::new(2, 0)
    }
}
