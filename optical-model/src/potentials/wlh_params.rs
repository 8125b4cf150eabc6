use std::path::Path;

use log::info;
use nuclear::constants::CSP;
use num::complex::Complex64;
use serde_json::{Map, Value, json};

use crate::channel::Projectile;

use super::{
    form_factors::{DerivWoodsSaxon, Thomas, WoodsSaxon},
    omp::{OmParams, OmTerms, ParamsError, asymmetry, read_params},
};

/// Microscopic global optical potential of
/// T. R. Whitehead, Y. Lim and J. W. Holt, Phys. Rev. Lett. 127, 182502 (2021).
///
/// Coefficient arrays keep the numbering of the published parameter tables.
/// Diffuseness and surface terms depend on (N - Z) / A regardless of the projectile.
#[derive(Clone, Debug, PartialEq)]
pub struct WhiteheadLimHolt {
    pub projectile: Projectile,

    // real volume
    pub v: [f64; 7],
    pub r: [f64; 4],
    pub a: [f64; 5],

    // imaginary volume
    pub w: [f64; 5],
    pub rw: [f64; 6],
    pub aw: [f64; 5],

    // imaginary surface
    pub d: [f64; 4],
    pub rs: [f64; 3],
    pub as0: f64,

    // real spin-orbit
    pub vso: [f64; 2],
    pub rso: [f64; 2],
    pub aso: [f64; 2],
}

impl WhiteheadLimHolt {
    pub fn new(projectile: Projectile) -> Self {
        match projectile {
            Projectile::Neutron => Self {
                projectile,
                v: [
                    52.6912521913,
                    0.2849592984,
                    -0.0002654968,
                    2.6234e-06,
                    21.0895801061,
                    0.2847889774,
                    0.0010745253,
                ],
                r: [1.2978610209, 0.312492324, 0.0008999731, 8.6727e-06],
                a: [0.741279032, 0.0008329878, 1.02475e-05, 0.2792868326, 0.8764603676],
                w: [2.8722965665, 0.2480075276, 0.0004858014, 8.7072302176, 0.0246183387],
                rw: [0.5629863841, 79.8221560535, 0.7264601343, 86.5142396423, 0.9175065953, 3.6419e-06],
                aw: [0.2391198977, 0.5849807386, 6.7877182692, 0.0529392097, 0.0005803378],
                d: [1.6408748071, 0.0395001751, 2.355450576, 0.1418364594],
                rs: [1.2882811754, 1.4774733457, 0.0030997663],
                as0: 0.8506076645,
                vso: [9.6220335001, 0.0085454732],
                rso: [1.2794000707, 0.8734769907],
                aso: [0.8060570111, 0.0003509748],
            },
            Projectile::Proton => Self {
                projectile,
                v: [
                    53.6540319643,
                    0.300042293,
                    -0.0001192337,
                    2.1471e-06,
                    12.918410608,
                    0.1330858829,
                    0.0003328253,
                ],
                r: [1.3041479419, 0.2938537968, 0.0008039876, 6.8659e-06],
                a: [0.779602661, 0.0001182833, 5.4588e-06, 0.0445486378, 0.5571679352],
                w: [4.3701953072, 0.2267714208, 0.000338132, 11.4340928806, 0.077068475],
                rw: [0.6541271675, 46.0846969827, 0.6099691135, 58.2530624354, 0.6418349689, 1.5491e-06],
                aw: [0.5616542778, 0.2708915659, 14.3691362537, 0.4184493049, 0.0024314838],
                d: [0.8982409214, 0.0351390393, 0.8135662888, 0.1214099645],
                rs: [0.9505407272, 0.4391797103, 0.003947669],
                as0: 0.7649106373,
                vso: [9.6195980947, 0.0085112416],
                rso: [1.276250854, 0.8685769478],
                aso: [0.8032951951, 0.0003508356],
            },
        }
    }

    /// Reads the parameters from the nested WLH groups, with keys suffixed by the projectile.
    pub fn from_json(value: &Value, projectile: Projectile) -> Result<Self, ParamsError> {
        let suffix = suffix(projectile);
        let mut params = Self::new(projectile);

        for (group, entries) in params.groups_mut() {
            for (name, coefficients) in entries {
                for (n, c) in coefficients.iter_mut().enumerate() {
                    let key = format!("{name}{n}_{suffix}");
                    *c = value
                        .get(group)
                        .and_then(|g| g.get(&key))
                        .and_then(Value::as_f64)
                        .ok_or_else(|| ParamsError::MissingKey(format!("{group}.{key}")))?;
                }
            }
        }

        Ok(params)
    }

    pub fn from_file(path: impl AsRef<Path>, projectile: Projectile) -> Result<Self, ParamsError> {
        let path = path.as_ref();
        let value = read_params(path)?;
        info!("loaded {projectile:?} WLH parameters from {}", path.display());

        Self::from_json(&value, projectile)
    }

    pub fn to_json(&self) -> Value {
        let suffix = suffix(self.projectile);
        let mut params = self.clone();
        let mut value = Map::new();

        for (group, entries) in params.groups_mut() {
            let mut object = Map::new();
            for (name, coefficients) in entries {
                for (n, c) in coefficients.iter().enumerate() {
                    object.insert(format!("{name}{n}_{suffix}"), json!(c));
                }
            }
            value.insert(group.to_string(), Value::Object(object));
        }

        Value::Object(value)
    }

    fn groups_mut(&mut self) -> [(&'static str, Vec<(&'static str, &mut [f64])>); 4] {
        [
            ("WLHReal", vec![("V", &mut self.v[..]), ("r", &mut self.r[..]), ("a", &mut self.a[..])]),
            (
                "WLHImagVolume",
                vec![("W", &mut self.w[..]), ("r", &mut self.rw[..]), ("a", &mut self.aw[..])],
            ),
            (
                "WLHImagSurface",
                vec![
                    ("W", &mut self.d[..]),
                    ("r", &mut self.rs[..]),
                    ("a", std::slice::from_mut(&mut self.as0)),
                ],
            ),
            (
                "WLHRealSpinOrbit",
                vec![("V", &mut self.vso[..]), ("r", &mut self.rso[..]), ("a", &mut self.aso[..])],
            ),
        ]
    }

    pub fn volume_radius(&self, a: u32, erg_lab: f64) -> f64 {
        let r = &self.r;

        (r[0] - r[1] * erg_lab + r[2] * erg_lab * erg_lab) * (a as f64).cbrt() - r[3]
    }

    pub fn volume_diffuseness(&self, z: u32, a: u32, erg_lab: f64) -> f64 {
        let p = &self.a;
        let delta = asymmetry(Projectile::Proton, z, a);
        let a_np = p[0] - p[2] * erg_lab * erg_lab - (p[3] - p[4] * delta) * delta;

        match self.projectile {
            Projectile::Neutron => a_np + p[1] * erg_lab,
            Projectile::Proton => a_np - p[1] * erg_lab,
        }
    }

    pub fn imag_radius(&self, a: u32, erg_lab: f64) -> f64 {
        let rw = &self.rw;
        let af = a as f64;

        af.cbrt() * (rw[0] + (rw[1] + rw[2] * af) / (rw[3] + af + rw[4] * erg_lab) + rw[5] * erg_lab * erg_lab)
    }

    pub fn imag_diffuseness(&self, z: u32, a: u32, erg_lab: f64) -> f64 {
        let aw = &self.aw;
        let delta = asymmetry(Projectile::Proton, z, a);

        aw[0] + aw[1] * erg_lab / (aw[2] + erg_lab) + (aw[3] - aw[4] * erg_lab) * delta
    }

    pub fn surface_radius(&self, a: u32, erg_lab: f64) -> f64 {
        let rs = &self.rs;

        (a as f64).cbrt() * (rs[0] - rs[1] * erg_lab) - rs[2]
    }

    pub fn spin_orbit_radius(&self, a: u32) -> f64 {
        self.rso[0] * (a as f64).cbrt() - self.rso[1]
    }

    pub fn spin_orbit_diffuseness(&self, a: u32) -> f64 {
        self.aso[0] - self.aso[1] * a as f64
    }

    pub fn real_volume_depth(&self, z: u32, a: u32, erg_lab: f64) -> f64 {
        let (v, e) = (&self.v, erg_lab);
        let depth = v[0] - v[1] * e + v[2] * e * e + v[3] * e * e * e;
        let asym = (v[4] - v[5] * e + v[6] * e * e) * asymmetry(self.projectile, z, a);

        -(depth + asym)
    }

    pub fn imag_volume_depth(&self, z: u32, a: u32, erg_lab: f64) -> f64 {
        let (w, e) = (&self.w, erg_lab);
        let depth = w[0] + w[1] * e - w[2] * e * e;
        let w3 = match self.projectile {
            Projectile::Neutron => -w[3],
            Projectile::Proton => w[3],
        };

        -(depth + (w3 - w[4] * e) * asymmetry(self.projectile, z, a))
    }

    /// Surface depth with the factor 4 a_s of the derivative form absorbed,
    /// zero above 40 MeV for neutrons and 20 MeV for protons.
    pub fn imag_surface_depth(&self, z: u32, a: u32, erg_lab: f64) -> f64 {
        let cutoff = match self.projectile {
            Projectile::Neutron => 40.,
            Projectile::Proton => 20.,
        };
        if erg_lab > cutoff {
            return 0.;
        }

        let (d, e) = (&self.d, erg_lab);
        let delta = asymmetry(Projectile::Proton, z, a);

        4. * self.as0 * (d[0] - d[1] * e - (d[2] - d[3] * e) * delta)
    }

    pub fn real_spin_orbit_depth(&self, a: u32) -> f64 {
        CSP * (self.vso[0] - self.vso[1] * a as f64)
    }
}

fn suffix(projectile: Projectile) -> &'static str {
    match projectile {
        Projectile::Neutron => "n",
        Projectile::Proton => "p",
    }
}

impl OmParams for WhiteheadLimHolt {
    fn projectile(&self) -> Projectile {
        self.projectile
    }

    fn terms(&self, z: u32, a: u32, erg_lab: f64) -> OmTerms {
        let i = Complex64::i();
        let (rv, av) = (self.volume_radius(a, erg_lab), self.volume_diffuseness(z, a, erg_lab));
        let (rw, aw) = (self.imag_radius(a, erg_lab), self.imag_diffuseness(z, a, erg_lab));
        let rs = self.surface_radius(a, erg_lab);
        let (rso, aso) = (self.spin_orbit_radius(a), self.spin_orbit_diffuseness(a));

        OmTerms {
            real_volume: WoodsSaxon::new(self.real_volume_depth(z, a, erg_lab), rv, av),
            imag_volume: WoodsSaxon::new(i * self.imag_volume_depth(z, a, erg_lab), rw, aw),
            real_surface: DerivWoodsSaxon::new(0., rs, self.as0),
            imag_surface: DerivWoodsSaxon::new(i * self.imag_surface_depth(z, a, erg_lab), rs, self.as0),
            real_spin_orbit: Thomas::new(self.real_spin_orbit_depth(a), rso, aso),
            imag_spin_orbit: Thomas::new(0., rso, aso),
        }
    }
}

#[cfg(test)]
mod test {
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use nuclear::assert_approx_eq;

    use crate::{
        channel::Projectile,
        potentials::{
            omp::{OmParams, ParamsError},
            potential::FormFactor,
        },
    };

    use super::WhiteheadLimHolt;

    #[test]
    fn test_neutron_lead() {
        let terms = WhiteheadLimHolt::new(Projectile::Neutron).terms(82, 208, 20.);

        assert_relative_eq!(terms.real_volume.depth.re, -43.55955244447115, max_relative = 1e-12);
        assert_abs_diff_eq!(terms.real_volume.diffuseness, 0.7339801860149409, epsilon = 1e-12);
        assert_relative_eq!(terms.imag_volume.depth.im, -9.584195152876923, max_relative = 1e-12);
        assert_relative_eq!(terms.imag_volume.radius, 7.71757060057324, max_relative = 1e-12);
        assert_abs_diff_eq!(terms.imag_volume.diffuseness, 0.6846162436831149, epsilon = 1e-12);
        assert_relative_eq!(terms.imag_surface.depth.im, 3.2414284635153536, max_relative = 1e-12);
        assert_abs_diff_eq!(terms.imag_surface.diffuseness, 0.8506076645, epsilon = 1e-12);
        assert_relative_eq!(terms.real_spin_orbit.depth.re, 16.046313652141986, max_relative = 1e-12);
        assert_relative_eq!(terms.real_spin_orbit.radius, 6.706958368037723, max_relative = 1e-12);
        assert_abs_diff_eq!(terms.real_spin_orbit.diffuseness, 0.7330542527, epsilon = 1e-12);

        assert_eq!(terms.real_surface.form(7.).norm(), 0.);
        assert_eq!(terms.imag_spin_orbit.form(7.).norm(), 0.);
    }

    #[test]
    fn test_proton_surface_cutoff() {
        let wlh = WhiteheadLimHolt::new(Projectile::Proton);

        let terms = wlh.terms(20, 48, 15.);
        assert_relative_eq!(terms.real_volume.depth.re, -50.966651125466676, max_relative = 1e-12);
        assert_relative_eq!(terms.imag_volume.depth.im, -9.408697878466668, max_relative = 1e-12);
        assert_relative_eq!(terms.imag_volume.radius, 4.742059968552647, max_relative = 1e-12);
        assert_abs_diff_eq!(terms.imag_volume.diffuseness, 0.7636723452765128, epsilon = 1e-12);
        assert_relative_eq!(terms.imag_surface.depth.im, 1.6494100400784724, max_relative = 1e-12);
        assert_relative_eq!(terms.real_spin_orbit.depth.re, 18.841496489209387, max_relative = 1e-12);

        let terms = wlh.terms(20, 48, 25.);
        assert_eq!(terms.imag_surface.depth.norm(), 0.);
        assert_relative_eq!(terms.imag_volume.depth.im, -11.412711828133336, max_relative = 1e-12);
        assert_abs_diff_eq!(terms.real_volume.diffuseness, 0.7812859426222221, epsilon = 1e-12);

        // neutrons keep the surface term up to 40 MeV
        let neutron = WhiteheadLimHolt::new(Projectile::Neutron);
        assert!(neutron.imag_surface_depth(20, 48, 25.) != 0.);
        assert_eq!(neutron.imag_surface_depth(20, 48, 40.5), 0.);
    }

    #[test]
    fn test_json_round_trip() {
        for projectile in [Projectile::Neutron, Projectile::Proton] {
            let wlh = WhiteheadLimHolt::new(projectile);
            let value = wlh.to_json();

            let suffix = if projectile == Projectile::Neutron { "n" } else { "p" };
            assert_eq!(value["WLHImagSurface"][format!("a0_{suffix}")].as_f64(), Some(wlh.as0));
            assert_eq!(value["WLHImagVolume"].as_object().unwrap().len(), 16);

            let loaded = WhiteheadLimHolt::from_json(&value, projectile).unwrap();
            for erg in [1., 20., 89.23] {
                assert_approx_eq!(
                    iter => loaded.terms(66, 156, erg).to_params(),
                    wlh.terms(66, 156, erg).to_params(),
                    epsilon = 1e-12,
                    max_relative = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_missing_key() {
        let mut value = WhiteheadLimHolt::new(Projectile::Neutron).to_json();

        assert!(WhiteheadLimHolt::from_json(&value, Projectile::Proton).is_err());

        value["WLHRealSpinOrbit"].as_object_mut().unwrap().remove("a1_n");
        assert!(matches!(
            WhiteheadLimHolt::from_json(&value, Projectile::Neutron),
            Err(ParamsError::MissingKey(key)) if key == "WLHRealSpinOrbit.a1_n"
        ));
    }
}
