use faer::{Mat, c64};
use serde::{Deserialize, Serialize};

use crate::error::ShapeError;

/// Dense complex tensor with row major layout and a shape checked at runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<c64>,
}

impl Tensor {
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
            data: vec![c64::new(0., 0.); shape.iter().product()],
        }
    }

    pub fn from_vec(shape: &[usize], data: Vec<c64>) -> Result<Self, ShapeError> {
        let size: usize = shape.iter().product();
        if data.len() != size {
            return Err(ShapeError::new("tensor data", &[size], &[data.len()]));
        }

        Ok(Self {
            shape: shape.to_vec(),
            data,
        })
    }

    /// Tensor filled by `f` called with every multi-index in layout order.
    pub fn from_fn(shape: &[usize], mut f: impl FnMut(&[usize]) -> c64) -> Self {
        let mut tensor = Self::zeros(shape);
        let mut index = vec![0; shape.len()];

        for value in tensor.data.iter_mut() {
            *value = f(&index);

            for (i, dim) in index.iter_mut().zip(shape).rev() {
                *i += 1;
                if *i < *dim {
                    break;
                }
                *i = 0;
            }
        }

        tensor
    }

    /// Stacks matrices of equal shape along a new leading axis.
    pub fn from_matrices(matrices: &[Mat<c64>]) -> Self {
        let (rows, cols) = matrices.first().map_or((0, 0), |m| (m.nrows(), m.ncols()));
        assert!(
            matrices.iter().all(|m| m.nrows() == rows && m.ncols() == cols),
            "stacked matrices have to share their shape"
        );

        Self::from_fn(&[matrices.len(), rows, cols], |index| matrices[index[0]][(index[1], index[2])])
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn data(&self) -> &[c64] {
        &self.data
    }

    /// Checks the shape against `expected`, and that the data fills the shape.
    pub fn check_shape(&self, name: &str, expected: &[usize]) -> Result<(), ShapeError> {
        let size: usize = self.shape.iter().product();
        if self.shape != expected || self.data.len() != size {
            return Err(ShapeError::new(name, expected, &self.shape));
        }

        Ok(())
    }

    fn offset(&self, index: &[usize]) -> usize {
        assert!(index.len() <= self.rank(), "index {index:?} out of rank for shape {:?}", self.shape);

        let mut offset = 0;
        for (dim, (&i, &n)) in index.iter().zip(&self.shape).enumerate() {
            assert!(i < n, "index {i} out of bounds {n} on axis {dim}");
            offset = offset * n + i;
        }

        offset * self.shape[index.len()..].iter().product::<usize>()
    }

    pub fn get(&self, index: &[usize]) -> c64 {
        assert!(index.len() == self.rank());

        self.data[self.offset(index)]
    }

    pub fn set(&mut self, index: &[usize], value: c64) {
        assert!(index.len() == self.rank());

        let offset = self.offset(index);
        self.data[offset] = value;
    }

    /// Contiguous block of all elements starting with the index prefix `index`.
    pub fn block(&self, index: &[usize]) -> &[c64] {
        let start = self.offset(index);
        let len: usize = self.shape[index.len()..].iter().product();

        &self.data[start..start + len]
    }

    /// Last two axes at the index prefix `index` as a matrix.
    pub fn matrix(&self, index: &[usize]) -> Mat<c64> {
        assert!(index.len() + 2 == self.rank(), "matrix view needs a prefix of rank {}", self.rank() - 2);
        let (rows, cols) = (self.shape[self.rank() - 2], self.shape[self.rank() - 1]);
        let block = self.block(index);

        Mat::from_fn(rows, cols, |i, j| block[i * cols + j])
    }

    /// Last axis at the index prefix `index` as a column.
    pub fn column(&self, index: &[usize]) -> Mat<c64> {
        assert!(index.len() + 1 == self.rank(), "column view needs a prefix of rank {}", self.rank() - 1);
        let block = self.block(index);

        Mat::from_fn(block.len(), 1, |i, _| block[i])
    }
}

#[cfg(test)]
mod test {
    use faer::{Mat, c64};

    use super::Tensor;

    #[test]
    fn test_layout() {
        let tensor = Tensor::from_fn(&[2, 3, 4], |i| c64::new((100 * i[0] + 10 * i[1] + i[2]) as f64, 0.));

        assert_eq!(tensor.data().len(), 24);
        assert_eq!(tensor.get(&[1, 2, 3]), c64::new(123., 0.));
        assert_eq!(tensor.get(&[0, 1, 0]), c64::new(10., 0.));

        let block = tensor.block(&[1]);
        assert_eq!(block.len(), 12);
        assert_eq!(block[0], c64::new(100., 0.));

        let matrix = tensor.matrix(&[1]);
        assert_eq!((matrix.nrows(), matrix.ncols()), (3, 4));
        assert_eq!(matrix[(2, 1)], c64::new(121., 0.));

        let column = tensor.column(&[0, 2]);
        assert_eq!(column.nrows(), 4);
        assert_eq!(column[(3, 0)], c64::new(23., 0.));
    }

    #[test]
    fn test_stacking() {
        let matrices: Vec<Mat<c64>> = (0..3)
            .map(|l| Mat::from_fn(2, 2, |i, j| c64::new((l * 4 + i * 2 + j) as f64, 0.)))
            .collect();
        let mut tensor = Tensor::from_matrices(&matrices);

        assert_eq!(tensor.shape(), &[3, 2, 2]);
        assert_eq!(tensor.matrix(&[2]), matrices[2]);

        tensor.set(&[0, 1, 1], c64::new(0., 1.));
        assert_eq!(tensor.get(&[0, 1, 1]), c64::new(0., 1.));
    }

    #[test]
    fn test_shape_checks() {
        assert!(Tensor::from_vec(&[2, 2], vec![c64::new(0., 0.); 3]).is_err());

        let tensor = Tensor::zeros(&[3, 4, 4]);
        assert!(tensor.check_shape("ainv", &[3, 4, 4]).is_ok());

        let err = tensor.check_shape("ainv", &[3, 4, 10]).unwrap_err();
        assert_eq!(err.expected, vec![3, 4, 10]);
        assert_eq!(err.found, vec![3, 4, 4]);
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds() {
        Tensor::zeros(&[2, 2]).get(&[2, 0]);
    }
}
