use ndarray::{Array, ArrayView2, Axis, IxDyn};
use crate::data::{PipelineError, PipelineResult};

/// Flat `f32` buffer plus its shape, wrapper over [`Array<f32, IxDyn>`].
///
/// The buffer length always equals the product of the shape dimensions;
/// every constructor enforces it.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor(Array<f32, IxDyn>);

impl From<Array<f32, IxDyn>> for Tensor {
    fn from(x: Array<f32, IxDyn>) -> Self {
        Self(x)
    }
}

impl From<Vec<f32>> for Tensor {
    fn from(x: Vec<f32>) -> Self {
        Self(Array::from_vec(x).into_dyn())
    }
}

impl std::ops::Deref for Tensor {
    type Target = Array<f32, IxDyn>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Tensor {
    pub fn from_shape_vec(shape: &[usize], xs: Vec<f32>) -> PipelineResult<Self> {
        let expected: usize = shape.iter().product();
        if expected != xs.len() {
            return Err(PipelineError::shape_mismatch(
                format!("{} values for shape {:?}", expected, shape),
                &[xs.len()],
            ));
        }
        Array::from_shape_vec(IxDyn(shape), xs)
            .map(Self)
            .map_err(|err| PipelineError::shape_mismatch(err.to_string(), shape))
    }

    pub fn ndim(&self) -> usize {
        self.0.ndim()
    }

    pub fn dims(&self) -> Vec<usize> {
        self.0.shape().to_vec()
    }

    /// Contiguous row-major view of the data.
    pub fn as_slice(&self) -> Option<&[f32]> {
        self.0.as_slice()
    }

    pub fn into_raw(self) -> Vec<f32> {
        let (xs, _offset) = self.0.into_raw_vec_and_offset();
        xs
    }

    /// Value at `index`, `None` when the index has the wrong rank or is out of bounds.
    pub fn at(&self, index: &[usize]) -> Option<f32> {
        if index.len() != self.ndim() {
            return None;
        }
        self.0.get(IxDyn(index)).copied()
    }

    /// Drops the leading batch axis of a `[1, A, B]` tensor, yielding the
    /// planar `[A, B]` view where attribute `a` of column `i` sits at flat
    /// offset `a * B + i`.
    pub fn planar(&self) -> PipelineResult<ArrayView2<'_, f32>> {
        let dims = self.0.shape();
        if dims.len() != 3 || dims[0] != 1 {
            return Err(PipelineError::shape_mismatch("[1, attrs, boxes]", dims));
        }
        self.0
            .index_axis(Axis(0), 0)
            .into_dimensionality()
            .map_err(|err| PipelineError::shape_mismatch(err.to_string(), dims))
    }
}
