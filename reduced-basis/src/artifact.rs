use std::{
    fs::{File, create_dir_all},
    io::{BufReader, Write},
    path::Path,
};

use log::info;
use nuclear::angular_momentum::Polarization;
use serde::{Deserialize, Serialize};

use crate::{
    basis::Basis,
    emulator::{EmulatorConfig, ReducedBasisEmulator},
    error::{ArtifactError, ShapeError},
    interaction::{EimInteractionSpace, Interaction},
    tensor::Tensor,
};

/// Interpolation data of an [`EimInteractionSpace`] without its potentials.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EimData {
    pub mesh_size: usize,
    pub nbasis: usize,
    pub lmax: usize,
    pub r_matches: Vec<f64>,
    pub ainv: Tensor,
}

impl EimData {
    pub fn from_space(space: &EimInteractionSpace) -> Self {
        Self {
            mesh_size: space.mesh_size(),
            nbasis: space.nbasis(),
            lmax: space.lmax(),
            r_matches: space.r_matches().to_vec(),
            ainv: space.ainv().clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ShapeError> {
        self.ainv
            .check_shape("inverse interpolation tensor", &[self.lmax, self.nbasis, self.nbasis])?;
        if self.r_matches.len() != self.nbasis {
            return Err(ShapeError::new("collocation points", &[self.nbasis], &[self.r_matches.len()]));
        }

        Ok(())
    }

    pub fn into_space(self, potentials: Vec<Interaction>) -> Result<EimInteractionSpace, ShapeError> {
        EimInteractionSpace::try_new(self.mesh_size, self.nbasis, self.lmax, self.r_matches, self.ainv, potentials)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolarizationArtifact {
    pub eim: EimData,
    pub basis: Basis,
}

/// Offline data of an emulator, stored as JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmulatorArtifact {
    pub s_match: f64,
    #[serde(default)]
    pub config: EmulatorConfig,
    pub up: PolarizationArtifact,
    pub down: PolarizationArtifact,
}

impl EmulatorArtifact {
    pub fn from_emulator(emulator: &ReducedBasisEmulator) -> Self {
        let polarization = |p: Polarization| {
            let space = emulator.space(p);
            PolarizationArtifact {
                eim: EimData::from_space(&space.interaction),
                basis: space.basis.clone(),
            }
        };

        Self {
            s_match: emulator.s_match(),
            config: *emulator.config(),
            up: polarization(Polarization::Up),
            down: polarization(Polarization::Down),
        }
    }

    pub fn validate(&self) -> Result<(), ShapeError> {
        for polarization in [&self.up, &self.down] {
            polarization.eim.validate()?;
            polarization.basis.validate()?;
        }

        Ok(())
    }

    /// Emulator of the stored data with the potentials of every partial wave of both polarizations.
    pub fn into_emulator(
        self,
        up_potentials: Vec<Interaction>,
        down_potentials: Vec<Interaction>,
    ) -> Result<ReducedBasisEmulator, ArtifactError> {
        let up = self.up.eim.into_space(up_potentials)?;
        let down = self.down.eim.into_space(down_potentials)?;

        Ok(ReducedBasisEmulator::try_new(up, self.up.basis, down, self.down.basis, self.s_match)?.with_config(self.config))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty() && !p.exists()) {
            create_dir_all(parent)?;
            info!("created path {}", parent.display());
        }

        let buf = serde_json::to_string(self)?;
        let mut file = File::create(path)?;
        file.write_all(buf.as_bytes())?;

        info!("saved emulator artifact on {}", path.display());
        Ok(())
    }

    /// Loads and validates an artifact.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let artifact: Self = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        artifact.validate()?;

        info!("loaded emulator artifact from {}", path.display());
        Ok(artifact)
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use faer::c64;
    use nuclear::{angular_momentum::Polarization, assert_approx_eq};
    use optical_model::potentials::{form_factors::WoodsSaxon, potential::FormFactor};

    use crate::{
        basis::{Basis, BasisTensors},
        emulator::{EmulatorConfig, ReducedBasisEmulator},
        error::ArtifactError,
        interaction::{EimInteractionSpace, FunctionPotential, Interaction},
        tensor::Tensor,
    };

    use super::EmulatorArtifact;

    fn potentials(lmax: usize) -> Vec<Interaction> {
        let potential = Interaction::local(FunctionPotential::new(|r, p: &[f64]| {
            WoodsSaxon::new(c64::new(p[0], p[1]), p[2], 0.65).form(r)
        }));

        vec![potential; lmax]
    }

    fn pattern(shape: &[usize], scale: f64) -> Tensor {
        let mut counter = 0.;
        Tensor::from_fn(shape, |_| {
            counter += 1.;
            c64::new((scale * counter).sin(), (0.1 * counter).cos() * scale)
        })
    }

    fn space(lmax: usize) -> (EimInteractionSpace, Basis) {
        let n = 3;
        let mut a13 = pattern(&[lmax, n, n], 0.1);
        for l in 0..lmax {
            for i in 0..n {
                let diag = a13.get(&[l, i, i]) + c64::new(3., 0.);
                a13.set(&[l, i, i], diag);
            }
        }
        let tensors = BasisTensors {
            snapshots: pattern(&[lmax, 8, n], 1.),
            a2: pattern(&[lmax, n, n, n], 0.01),
            a13,
            b2: pattern(&[lmax, n, n], 0.1),
            b13: pattern(&[lmax, n], 1.),
        };
        let interaction =
            EimInteractionSpace::new(8, n, lmax, vec![1.5, 3., 4.5], pattern(&[lmax, n, n], 0.3), potentials(lmax));

        (interaction, Basis::new(n, lmax, 8, tensors))
    }

    fn emulator() -> ReducedBasisEmulator {
        let (up_interaction, up_basis) = space(3);
        let (down_interaction, down_basis) = space(2);

        ReducedBasisEmulator::new(up_interaction, up_basis, down_interaction, down_basis, 4.5).with_config(
            EmulatorConfig {
                parallel: true,
                residual_tolerance: 1e-10,
                ..Default::default()
            },
        )
    }

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("reduced-basis-{}-{name}.json", std::process::id()));

        path
    }

    #[test]
    fn test_save_load() {
        let emulator = emulator();
        let artifact = EmulatorArtifact::from_emulator(&emulator);
        let path = temp_path("roundtrip");

        artifact.save(&path).unwrap();
        let loaded = EmulatorArtifact::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.config, artifact.config);
        assert_eq!(loaded.up.eim.ainv.shape(), artifact.up.eim.ainv.shape());
        assert_approx_eq!(iter => loaded.up.basis.tensors().a2.data().to_vec(), artifact.up.basis.tensors().a2.data().to_vec(), epsilon = 1e-14);

        let restored = loaded.into_emulator(potentials(3), potentials(2)).unwrap();
        assert_eq!(restored.config(), emulator.config());
        let alpha = [12., 910., -48., -7., 4.3];
        for polarization in [Polarization::Up, Polarization::Down] {
            let expected = emulator.coefficients(polarization, &alpha).unwrap();
            let found = restored.coefficients(polarization, &alpha).unwrap();
            assert_approx_eq!(mat => found, expected, epsilon = 1e-12, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_corrupt_artifact() {
        let mut artifact = EmulatorArtifact::from_emulator(&emulator());
        artifact.down.eim.ainv = Tensor::zeros(&[2, 3, 8]);
        let path = temp_path("corrupt");

        artifact.save(&path).unwrap();
        let result = EmulatorArtifact::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(ArtifactError::Shape(_))));
    }

    #[test]
    fn test_load_failures() {
        let result = EmulatorArtifact::load(temp_path("missing"));
        assert!(matches!(result, Err(ArtifactError::Io(_))));

        let path = temp_path("garbage");
        std::fs::write(&path, "{\"s_match\": 4.5, \"up\": [").unwrap();
        let result = EmulatorArtifact::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(ArtifactError::Json(_))));
    }

    #[test]
    fn test_missing_potentials() {
        let artifact = EmulatorArtifact::from_emulator(&emulator());

        assert!(artifact.into_emulator(potentials(3), potentials(3)).is_err());
    }
}
