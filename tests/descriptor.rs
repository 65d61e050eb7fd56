//! Descriptor extraction against the active backend configuration.

use rstest::rstest;
use strata::prelude::*;

#[test]
fn test_describe_none_is_invalid() {
    let descriptor = describe(None).unwrap();
    assert!(!descriptor.valid);
}

#[test]
fn test_describe_populates_metadata() {
    let field = Field::dense(DType::F32, &[128, 32, 8]).unwrap();
    let descriptor = with_arch(Arch::X64, || describe(Some(&field))).unwrap();

    assert!(descriptor.valid);
    assert_eq!(descriptor.source, FieldSource::X64);
    assert_eq!(descriptor.shape, vec![128, 32, 8]);
    assert_eq!(descriptor.dtype, DType::F32);
    assert_eq!(descriptor.snode, field.snode());
    assert_eq!(descriptor.kind, FieldKind::Scalar);
    assert_eq!(descriptor.rows(), 1);
    assert_eq!(descriptor.cols(), 1);
}

#[rstest]
#[case(Arch::Cuda, FieldSource::Cuda)]
#[case(Arch::X64, FieldSource::X64)]
#[case(Arch::Arm64, FieldSource::X64)]
#[case(Arch::Vulkan, FieldSource::Vulkan)]
fn test_source_follows_arch(#[case] arch: Arch, #[case] expected: FieldSource) {
    let field = Field::dense(DType::I32, &[4]).unwrap();
    let descriptor = with_arch(arch, || describe(Some(&field))).unwrap();
    assert_eq!(descriptor.source, expected);
}

#[rstest]
#[case(Arch::Metal)]
#[case(Arch::OpenGl)]
fn test_unsupported_arch_is_fatal(#[case] arch: Arch) {
    let field = Field::dense(DType::F32, &[4]).unwrap();
    let result = with_arch(arch, || describe(Some(&field)));
    assert!(matches!(result, Err(Error::UnsupportedBackend(a)) if a == arch));
}

#[test]
fn test_describe_none_ignores_arch() {
    // the invalid sentinel comes back even where Some would be fatal
    let descriptor = with_arch(Arch::Metal, || describe(None)).unwrap();
    assert!(!descriptor.valid);
}

#[test]
fn test_describe_is_idempotent() {
    let field = Field::dense(DType::F64, &[8, 8]).unwrap();
    with_arch(Arch::Cuda, || {
        let first = describe(Some(&field)).unwrap();
        let second = describe(Some(&field)).unwrap();
        assert_eq!(first, second);
    });
}

#[test]
fn test_matrix_field_descriptor() {
    let field =
        Field::dense_with_kind(DType::F32, FieldKind::Matrix { rows: 3, cols: 4 }, &[16, 16])
            .unwrap();
    let descriptor = with_arch(Arch::Vulkan, || describe(Some(&field))).unwrap();

    assert_eq!(descriptor.kind, FieldKind::Matrix { rows: 3, cols: 4 });
    assert_eq!(descriptor.rows(), 3);
    assert_eq!(descriptor.cols(), 4);
    assert_eq!(descriptor.dtype, DType::F32);
}

#[test]
fn test_fields_in_one_tree_get_distinct_snodes() {
    use std::sync::Arc;

    let mut builder = TreeBuilder::new();
    let level = builder.root().dense(&[Axis::I], &[8]);
    let level_id = level.id();
    let a = level.place(DType::F32, FieldKind::Scalar);
    let b = builder.at(level_id).place(DType::F32, FieldKind::Scalar);
    let tree: Arc<SNodeTree> = builder.finalize().unwrap().into();

    let fa = Field::new(tree.clone(), a).unwrap();
    let fb = Field::new(tree, b).unwrap();
    let da = describe(Some(&fa)).unwrap();
    let db = describe(Some(&fb)).unwrap();

    assert_eq!(da.shape, db.shape);
    assert_ne!(da.snode, db.snode);
}
