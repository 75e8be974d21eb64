use std::fmt;

use glam::{IVec2, IVec3, IVec4, Mat2, Mat3, Mat4, UVec2, UVec3, UVec4, Vec2, Vec3, Vec4};

use crate::gl::{UniformData, UniformKind};

/// Host-side type of a uniform.
pub trait UniformValue: Copy + Default + PartialEq + fmt::Debug + 'static {
    const KIND: UniformKind;

    /// `transpose` only matters for matrices.
    fn to_data(self, transpose: bool) -> UniformData;

    fn from_data(data: &UniformData) -> Option<Self>;
}

fn pad<T: Copy + Default, const N: usize>(src: [T; N]) -> [T; 4] {
    let mut out = [T::default(); 4];
    out[..N].copy_from_slice(&src);
    out
}

macro_rules! vector_uniform {
    ($ty:ty, $variant:ident, $n:literal, |$v:ident| $to:expr, |$a:ident| $from:expr) => {
        impl UniformValue for $ty {
            const KIND: UniformKind = UniformKind::$variant($n);

            fn to_data(self, _transpose: bool) -> UniformData {
                let $v = self;
                UniformData::$variant($n, $to)
            }

            fn from_data(data: &UniformData) -> Option<Self> {
                match *data {
                    UniformData::$variant($n, $a) => Some($from),
                    _ => None,
                }
            }
        }
    };
}

vector_uniform!(f32, Float, 1, |v| pad([v]), |a| a[0]);
vector_uniform!(Vec2, Float, 2, |v| pad(v.to_array()), |a| Vec2::from_slice(&a));
vector_uniform!(Vec3, Float, 3, |v| pad(v.to_array()), |a| Vec3::from_slice(&a));
vector_uniform!(Vec4, Float, 4, |v| v.to_array(), |a| Vec4::from_array(a));

vector_uniform!(i32, Int, 1, |v| pad([v]), |a| a[0]);
vector_uniform!(IVec2, Int, 2, |v| pad(v.to_array()), |a| IVec2::from_slice(&a));
vector_uniform!(IVec3, Int, 3, |v| pad(v.to_array()), |a| IVec3::from_slice(&a));
vector_uniform!(IVec4, Int, 4, |v| v.to_array(), |a| IVec4::from_array(a));

vector_uniform!(u32, Uint, 1, |v| pad([v]), |a| a[0]);
vector_uniform!(UVec2, Uint, 2, |v| pad(v.to_array()), |a| UVec2::from_slice(&a));
vector_uniform!(UVec3, Uint, 3, |v| pad(v.to_array()), |a| UVec3::from_slice(&a));
vector_uniform!(UVec4, Uint, 4, |v| v.to_array(), |a| UVec4::from_array(a));

macro_rules! matrix_uniform {
    ($ty:ty, $variant:ident) => {
        impl UniformValue for $ty {
            const KIND: UniformKind = UniformKind::$variant;

            fn to_data(self, transpose: bool) -> UniformData {
                UniformData::$variant(self.to_cols_array(), transpose)
            }

            fn from_data(data: &UniformData) -> Option<Self> {
                match data {
                    UniformData::$variant(m, _) => Some(<$ty>::from_cols_array(m)),
                    _ => None,
                }
            }
        }
    };
}

matrix_uniform!(Mat2, Mat2);
matrix_uniform!(Mat3, Mat3);
matrix_uniform!(Mat4, Mat4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vectors_pad_to_four() {
        assert_eq!(
            Vec3::new(1.0, 2.0, 3.0).to_data(false),
            UniformData::Float(3, [1.0, 2.0, 3.0, 0.0])
        );
        assert_eq!(7u32.to_data(true), UniformData::Uint(1, [7, 0, 0, 0]));
        assert_eq!(IVec2::new(-1, 4).to_data(false), UniformData::Int(2, [-1, 4, 0, 0]));
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let data = UniformData::Float(2, [1.0, 2.0, 0.0, 0.0]);
        assert_eq!(Vec2::from_data(&data), Some(Vec2::new(1.0, 2.0)));
        assert_eq!(Vec3::from_data(&data), None);
        assert_eq!(u32::from_data(&data), None);
    }

    #[test]
    fn matrices_carry_transpose_flag() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let data = m.to_data(true);
        assert_eq!(data.kind(), UniformKind::Mat4);
        assert!(matches!(data, UniformData::Mat4(_, true)));
        assert_eq!(Mat4::from_data(&data), Some(m));
    }
}
