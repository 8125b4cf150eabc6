pub mod asymptotics;
pub mod channel;
pub mod observables;
pub mod potentials;
