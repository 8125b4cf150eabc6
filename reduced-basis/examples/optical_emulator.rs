use std::time::Instant;

use faer::{Mat, c64, linalg::solvers::Solve};
use hhmmss::Hhmmss;
use indicatif::{ParallelProgressIterator, ProgressIterator};
use nuclear::{
    angular_momentum::{FermionSpinOrbitCoupling, Polarization},
    problem_selector::{ProblemSelector, get_args},
    problems_impl,
    units::{
        MeV,
        distance_units::{Distance, Fm},
        energy_units::Energy,
    },
};
use optical_model::{
    asymptotics::Asymptotics,
    channel::{Channel, Isotope, Projectile},
    observables::s_matrix::{CrossSections, PartialWaveSMatrix},
    potentials::{kd_params::KoningDelaroche, omp::OmParams},
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use reduced_basis::{
    artifact::EmulatorArtifact,
    basis::Basis,
    emulator::{EmulatorConfig, ReducedBasisEmulator},
    interaction::{EimInteractionSpace, Interaction, energy_momentum},
    training::{
        ProjectedWave, assemble, boundary_data, boundary_from_snapshots, collocation_matrix, diagonal, greedy_points,
        project, radial_operator,
    },
};

pub fn main() {
    Problems::select(&mut get_args());
}

pub struct Problems {}

problems_impl!(Problems, "optical model emulator",
    "kd03 emulator accuracy" => |_| Self::accuracy(),
    "sampling timing" => |_| Self::sampling(),
    "artifact round trip" => |_| Self::artifact(),
);

const LMAX: usize = 8;
const MESH: usize = 300;
const RADIUS: Distance<Fm> = Distance(12., Fm);
const TRAINING: usize = 6;

/// Depth and radius entries of the optical potential parameters that are varied.
const DEPTHS: [usize; 5] = [0, 3, 9, 12, 15];
const RADII: [usize; 3] = [1, 4, 10];

impl Problems {
    /// n + 40Ca at 14 MeV with the KD03 global potential.
    fn nominal() -> Vec<f64> {
        let ca40 = Isotope::new(20, 40, 39.962590866);
        let channel = Channel::for_target(0., RADIUS.to_base(), Projectile::Neutron, &ca40);
        let erg = channel.energetics_lab(Energy(14., MeV).to_base());
        let terms = KoningDelaroche::new(Projectile::Neutron).terms(ca40.z, ca40.a, erg.erg_lab);

        let mut alpha = vec![erg.erg_cms, erg.reduced_mass];
        alpha.extend(terms.to_params());

        alpha
    }

    fn draws(rng: &mut StdRng, count: usize) -> Vec<Vec<f64>> {
        let nominal = Self::nominal();

        (0..count)
            .map(|_| {
                let mut alpha = nominal.clone();
                for i in DEPTHS {
                    alpha[2 + i] *= rng.random_range(0.8..1.2);
                }
                for i in RADII {
                    alpha[2 + i] *= rng.random_range(0.95..1.05);
                }

                alpha
            })
            .collect()
    }

    fn mesh() -> (Vec<f64>, f64) {
        let (_, k) = energy_momentum(&Self::nominal());
        let step = k * RADIUS.to_base() / MESH as f64;

        ((1..=MESH).map(|i| i as f64 * step).collect(), step)
    }

    /// Dirichlet source of a wavefunction fixed to one past the last mesh point.
    fn source(step: f64) -> Mat<c64> {
        Mat::from_fn(MESH, 1, |i, _| {
            if i == MESH - 1 { c64::new(1. / (step * step), 0.) } else { c64::new(0., 0.) }
        })
    }

    fn train(polarization: Polarization, training: &[Vec<f64>]) -> (EimInteractionSpace, Basis) {
        let (mesh, step) = Self::mesh();
        let source = Self::source(step);
        let potentials = Interaction::optical(polarization, LMAX);

        let functions: Vec<Mat<c64>> = potentials
            .iter()
            .map(|v| Mat::from_fn(MESH, training.len(), |i, j| v.scaled(mesh[i], &training[j])))
            .collect();
        let points = greedy_points(&functions[0]);
        let r_matches = points.iter().map(|&i| mesh[i]).collect();
        let collocation: Vec<Mat<c64>> = functions.iter().map(|f| collocation_matrix(f, &points)).collect();
        let interaction = EimInteractionSpace::from_collocation(MESH, r_matches, &collocation, potentials).unwrap();

        let waves: Vec<ProjectedWave> = functions
            .iter()
            .enumerate()
            .map(|(index, f)| {
                let operator = radial_operator(&mesh, polarization.l(index));
                let affine: Vec<Mat<c64>> = (0..training.len())
                    .map(|k| diagonal(&(0..MESH).map(|i| f[(i, k)]).collect::<Vec<c64>>()))
                    .collect();

                let mut snapshots = Mat::<c64>::zeros(MESH, training.len());
                for (j, g) in affine.iter().enumerate() {
                    let solution = (&operator + g).partial_piv_lu().solve(source.as_ref());
                    for i in 0..MESH {
                        snapshots[(i, j)] = solution[(i, 0)];
                    }
                }

                project(snapshots, &operator, &affine, &source, &[])
            })
            .collect();

        let basis = Basis::new(training.len(), waves.len(), MESH, assemble(&waves))
            .with_boundary(boundary_data(&waves, step))
            .unwrap();

        (interaction, basis)
    }

    fn emulator(training: &[Vec<f64>]) -> ReducedBasisEmulator {
        let timer = Instant::now();
        let (up_interaction, up_basis) = Self::train(Polarization::Up, training);
        let (down_interaction, down_basis) = Self::train(Polarization::Down, training);
        println!("trained emulator in {}", timer.elapsed().hhmmssxxx());

        let (mesh, _) = Self::mesh();
        ReducedBasisEmulator::new(up_interaction, up_basis, down_interaction, down_basis, mesh[MESH - 1])
    }

    /// Cross sections of the finite difference model with the exact potential.
    fn full_order(alpha: &[f64]) -> CrossSections {
        let (mesh, step) = Self::mesh();
        let source = Self::source(step);
        let s_match = mesh[MESH - 1];

        let mut waves = Vec::new();
        for polarization in [Polarization::Up, Polarization::Down] {
            let potentials = Interaction::optical(polarization, LMAX);
            let couplings = FermionSpinOrbitCoupling::couplings(polarization, LMAX);

            for (potential, coupling) in potentials.iter().zip(couplings) {
                let values: Vec<c64> = mesh.iter().map(|&s| potential.scaled(s, alpha)).collect();
                let operator = radial_operator(&mesh, coupling.l) + diagonal(&values);
                let solution = operator.partial_piv_lu().solve(source.as_ref());

                let (u, du) = boundary_from_snapshots(&solution, step);
                let r_matrix = u[0] / (s_match * du[0]);
                waves.push(PartialWaveSMatrix::from_r_matrix(
                    r_matrix,
                    s_match,
                    &Asymptotics::at(coupling.l, s_match),
                    coupling,
                ));
            }
        }
        let (_, k) = energy_momentum(alpha);

        CrossSections::from_partial_waves(&waves, k)
    }

    fn accuracy() {
        let mut rng = StdRng::seed_from_u64(1);
        let training = Self::draws(&mut rng, TRAINING);
        let emulator = Self::emulator(&training);

        println!("{:>12} {:>12} {:>12} {:>12}", "sigma_R emu", "sigma_R fom", "sigma_el emu", "sigma_el fom");
        for alpha in Self::draws(&mut rng, 5) {
            let full = Self::full_order(&alpha);
            match emulator.cross_sections(&alpha) {
                Ok(emulated) => println!(
                    "{:>12.3} {:>12.3} {:>12.3} {:>12.3}",
                    emulated.reaction, full.reaction, emulated.elastic, full.elastic
                ),
                Err(err) => println!("emulation failed: {err}"),
            }
        }
    }

    fn sampling() {
        let mut rng = StdRng::seed_from_u64(2);
        let training = Self::draws(&mut rng, TRAINING);
        let emulator = Self::emulator(&training);
        let samples = Self::draws(&mut rng, 5000);

        let timer = Instant::now();
        let sequential: Vec<f64> = samples
            .iter()
            .progress()
            .filter_map(|alpha| emulator.cross_sections(alpha).ok())
            .map(|xs| xs.reaction)
            .collect();
        println!("sequential: {} samples in {}", sequential.len(), timer.elapsed().hhmmssxxx());

        let emulator = emulator.with_config(EmulatorConfig {
            parallel: true,
            ..Default::default()
        });
        let timer = Instant::now();
        let parallel: Vec<f64> = samples
            .par_iter()
            .progress()
            .filter_map(|alpha| emulator.cross_sections(alpha).ok())
            .map(|xs| xs.reaction)
            .collect();
        println!("parallel: {} samples in {}", parallel.len(), timer.elapsed().hhmmssxxx());

        let mean = parallel.iter().sum::<f64>() / parallel.len() as f64;
        println!("mean reaction cross section {mean:.3} mb");
    }

    fn artifact() {
        let mut rng = StdRng::seed_from_u64(3);
        let training = Self::draws(&mut rng, TRAINING);
        let emulator = Self::emulator(&training);

        let mut path = std::env::current_dir().unwrap();
        path.push("data");
        path.push("optical_emulator.json");

        EmulatorArtifact::from_emulator(&emulator).save(&path).unwrap();
        let restored = EmulatorArtifact::load(&path)
            .unwrap()
            .into_emulator(Interaction::optical(Polarization::Up, LMAX), Interaction::optical(Polarization::Down, LMAX))
            .unwrap();

        let alpha = Self::nominal();
        let original = emulator.cross_sections(&alpha).unwrap();
        let loaded = restored.cross_sections(&alpha).unwrap();
        println!("original {original:?}");
        println!("restored {loaded:?}");
    }
}
