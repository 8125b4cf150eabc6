use nuclear::angular_momentum::Polarization;
use thiserror::Error;

/// Inconsistent offline data, the basis and the interaction space do not belong together.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{name} has shape {found:?}, expected {expected:?}")]
pub struct ShapeError {
    pub name: String,
    pub expected: Vec<usize>,
    pub found: Vec<usize>,
}

impl ShapeError {
    pub fn new(name: impl Into<String>, expected: &[usize], found: &[usize]) -> Self {
        Self {
            name: name.into(),
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum EmulatorError {
    #[error("singular reduced system of the {polarization} polarization at l = {l}")]
    SingularSystem { polarization: Polarization, l: u32 },
    #[error("basis of the {polarization} polarization has no boundary data")]
    MissingBoundary { polarization: Polarization },
    #[error("partial wave {index} out of range, the {polarization} polarization has {partial_waves}")]
    PartialWaveOutOfRange {
        polarization: Polarization,
        index: usize,
        partial_waves: usize,
    },
    #[error("matching point has to be positive, got {s_match}")]
    InvalidMatchingPoint { s_match: f64 },
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("artifact i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("artifact serialization: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt artifact: {0}")]
    Shape(#[from] ShapeError),
    #[error("artifact does not build an emulator: {0}")]
    Emulator(#[from] EmulatorError),
}
