pub mod s_matrix;
