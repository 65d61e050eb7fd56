use std::fmt;

// scalar element types
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum DType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl DType {
    /// Byte size of one scalar of this type.
    pub fn size(&self) -> usize {
        match self {
            DType::U8 | DType::I8 => 1,
            DType::U16 | DType::I16 => 2,
            DType::U32 | DType::I32 | DType::F32 => 4,
            DType::U64 | DType::I64 | DType::F64 => 8,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DType::U8 => write!(f, "unsigned char"),
            DType::U16 => write!(f, "unsigned short"),
            DType::U32 => write!(f, "unsigned int"),
            DType::U64 => write!(f, "unsigned long"),
            DType::I8 => write!(f, "char"),
            DType::I16 => write!(f, "short"),
            DType::I32 => write!(f, "int"),
            DType::I64 => write!(f, "long"),
            DType::F32 => write!(f, "float"),
            DType::F64 => write!(f, "double"),
        }
    }
}

/// Trait for Rust primitives that can live in field cells.
///
/// Typed reads and writes check `DTYPE` against the field's declared
/// element type at the call site.
pub trait ElemType: Copy + bytemuck::Pod + Send + Sync + 'static {
    /// The corresponding DType enum variant
    const DTYPE: DType;
}

macro_rules! impl_elem_type {
    ($($ty:ty => $dtype:expr);+ $(;)?) => {
        $(
            impl ElemType for $ty {
                const DTYPE: DType = $dtype;
            }
        )+
    };
}

impl_elem_type!(
    u8  => DType::U8;
    u16 => DType::U16;
    u32 => DType::U32;
    u64 => DType::U64;
    i8  => DType::I8;
    i16 => DType::I16;
    i32 => DType::I32;
    i64 => DType::I64;
    f32 => DType::F32;
    f64 => DType::F64;
);
