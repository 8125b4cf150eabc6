pub mod ch_params;
pub mod form_factors;
pub mod kd_params;
pub mod non_local;
pub mod omp;
pub mod potential;
pub mod wlh_params;
