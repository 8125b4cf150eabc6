pub mod angular_momentum;
pub mod constants;
pub mod problem_selector;
pub mod units;
pub mod utility;
