// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Default annotation grammar: enumerant tables, grammar extensions, and
//! opcode grammars.
//!
//! Registration order is intentionally centralized here so the assembler,
//! the CLI, and tests resolve identical grammar data. The encoding core
//! has no knowledge of any of these names or values; new groups and
//! enumerants can be registered by callers without touching it.

use crate::core::error::RegistryError;
use crate::core::operand::OperandKind::{
    BitmaskValue, EnumValue, IdRef, LiteralInteger, LiteralString,
};
use crate::core::operand::{OperandGroup, OperandKind, Word};
use crate::core::registry::GrammarRegistry;

pub const DECORATION: OperandGroup = OperandGroup::new("decoration");
pub const BUILT_IN: OperandGroup = OperandGroup::new("built-in");
pub const FUNC_PARAM_ATTR: OperandGroup = OperandGroup::new("func-param-attr");
pub const FP_ROUNDING_MODE: OperandGroup = OperandGroup::new("fp-rounding-mode");
pub const FP_FAST_MATH_MODE: OperandGroup = OperandGroup::new("fp-fast-math-mode");
pub const LINKAGE_TYPE: OperandGroup = OperandGroup::new("linkage-type");

pub const OP_DECORATE: u16 = 71;
pub const OP_MEMBER_DECORATE: u16 = 72;
pub const OP_DECORATION_GROUP: u16 = 73;
pub const OP_GROUP_DECORATE: u16 = 74;
pub const OP_GROUP_MEMBER_DECORATE: u16 = 75;

static DECORATION_TABLE: &[(&str, Word)] = &[
    ("RelaxedPrecision", 0),
    ("SpecId", 1),
    ("Block", 2),
    ("BufferBlock", 3),
    ("RowMajor", 4),
    ("ColMajor", 5),
    ("ArrayStride", 6),
    ("MatrixStride", 7),
    ("GLSLShared", 8),
    ("GLSLPacked", 9),
    ("CPacked", 10),
    ("BuiltIn", 11),
    ("Smooth", 12),
    ("Noperspective", 13),
    ("Flat", 14),
    ("Patch", 15),
    ("Centroid", 16),
    ("Sample", 17),
    ("Invariant", 18),
    ("Restrict", 19),
    ("Aliased", 20),
    ("Volatile", 21),
    ("Constant", 22),
    ("Coherent", 23),
    ("Nonwritable", 24),
    ("Nonreadable", 25),
    ("Uniform", 26),
    ("NoStaticUse", 27),
    ("SaturatedConversion", 28),
    ("Stream", 29),
    ("Location", 30),
    ("Component", 31),
    ("Index", 32),
    ("Binding", 33),
    ("DescriptorSet", 34),
    ("Offset", 35),
    ("XfbBuffer", 36),
    ("XfbStride", 37),
    ("FuncParamAttr", 38),
    ("FPRoundingMode", 39),
    ("FPFastMathMode", 40),
    ("LinkageAttributes", 41),
];

static BUILT_IN_TABLE: &[(&str, Word)] = &[
    ("Position", 0),
    ("PointSize", 1),
    ("ClipDistance", 2),
    ("CullDistance", 3),
    ("VertexId", 4),
    ("InstanceId", 5),
    ("PrimitiveId", 6),
    ("InvocationId", 7),
    ("Layer", 8),
    ("ViewportIndex", 9),
    ("TessLevelOuter", 10),
    ("TessLevelInner", 11),
    ("TessCoord", 12),
    ("PatchVertices", 13),
    ("FragCoord", 14),
    ("PointCoord", 15),
    ("FrontFacing", 16),
    ("SampleId", 17),
    ("SamplePosition", 18),
    ("SampleMask", 19),
    ("FragColor", 20),
    ("FragDepth", 21),
    ("HelperInvocation", 22),
    ("NumWorkgroups", 23),
    ("WorkgroupSize", 24),
    ("WorkgroupId", 25),
    ("LocalInvocationId", 26),
    ("GlobalInvocationId", 27),
    ("LocalInvocationIndex", 28),
    ("WorkDim", 29),
    ("GlobalSize", 30),
    ("EnqueuedWorkgroupSize", 31),
    ("GlobalOffset", 32),
    ("GlobalLinearId", 33),
    ("WorkgroupLinearId", 34),
    ("SubgroupSize", 35),
    ("SubgroupMaxSize", 36),
    ("NumSubgroups", 37),
    ("NumEnqueuedSubgroups", 38),
    ("SubgroupId", 39),
    ("SubgroupLocalInvocationId", 40),
];

static FUNC_PARAM_ATTR_TABLE: &[(&str, Word)] = &[
    ("Zext", 0),
    ("Sext", 1),
    ("ByVal", 2),
    ("Sret", 3),
    ("NoAlias", 4),
    ("NoCapture", 5),
    ("NoWrite", 6),
    ("NoReadWrite", 7),
];

static FP_ROUNDING_MODE_TABLE: &[(&str, Word)] =
    &[("RTE", 0), ("RTZ", 1), ("RTP", 2), ("RTN", 3)];

static FP_FAST_MATH_MODE_TABLE: &[(&str, Word)] = &[
    ("None", 0),
    ("NotNaN", 0x1),
    ("NotInf", 0x2),
    ("NSZ", 0x4),
    ("AllowRecip", 0x8),
    ("Fast", 0x10),
];

static LINKAGE_TYPE_TABLE: &[(&str, Word)] = &[("Export", 0), ("Import", 1)];

/// Operand kinds each decoration enumerant requires after itself.
/// Decorations absent here take no extra operands.
static DECORATION_EXTENSIONS: &[(Word, &[OperandKind])] = &[
    (1, &[LiteralInteger]),            // SpecId
    (6, &[LiteralInteger]),            // ArrayStride
    (7, &[LiteralInteger]),            // MatrixStride
    (11, &[EnumValue(BUILT_IN)]),      // BuiltIn
    (29, &[LiteralInteger]),           // Stream
    (30, &[LiteralInteger]),           // Location
    (31, &[LiteralInteger]),           // Component
    (32, &[LiteralInteger]),           // Index
    (33, &[LiteralInteger]),           // Binding
    (34, &[LiteralInteger]),           // DescriptorSet
    (35, &[LiteralInteger]),           // Offset
    (36, &[LiteralInteger]),           // XfbBuffer
    (37, &[LiteralInteger]),           // XfbStride
    (38, &[EnumValue(FUNC_PARAM_ATTR)]),
    (39, &[EnumValue(FP_ROUNDING_MODE)]),
    (40, &[BitmaskValue(FP_FAST_MATH_MODE)]),
    (41, &[LiteralString, EnumValue(LINKAGE_TYPE)]),
];

/// Build the canonical default registry used by the assembler, the CLI,
/// and the test suite.
pub fn build_default_registry() -> Result<GrammarRegistry, RegistryError> {
    let mut registry = GrammarRegistry::new();

    registry.register_enum_table(DECORATION, DECORATION_TABLE, false)?;
    registry.register_enum_table(BUILT_IN, BUILT_IN_TABLE, false)?;
    registry.register_enum_table(FUNC_PARAM_ATTR, FUNC_PARAM_ATTR_TABLE, false)?;
    registry.register_enum_table(FP_ROUNDING_MODE, FP_ROUNDING_MODE_TABLE, false)?;
    registry.register_enum_table(FP_FAST_MATH_MODE, FP_FAST_MATH_MODE_TABLE, true)?;
    registry.register_enum_table(LINKAGE_TYPE, LINKAGE_TYPE_TABLE, false)?;

    for &(value, kinds) in DECORATION_EXTENSIONS {
        registry.register_grammar_extension(DECORATION, value, kinds)?;
    }

    registry.register_opcode(
        "OpDecorate",
        OP_DECORATE,
        &[IdRef, EnumValue(DECORATION)],
        &[],
    )?;
    registry.register_opcode(
        "OpMemberDecorate",
        OP_MEMBER_DECORATE,
        &[IdRef, LiteralInteger, EnumValue(DECORATION)],
        &[],
    )?;
    registry.register_opcode("OpDecorationGroup", OP_DECORATION_GROUP, &[IdRef], &[])?;
    registry.register_opcode("OpGroupDecorate", OP_GROUP_DECORATE, &[IdRef], &[IdRef])?;
    registry.register_opcode(
        "OpGroupMemberDecorate",
        OP_GROUP_MEMBER_DECORATE,
        &[IdRef],
        &[IdRef, LiteralInteger],
    )?;

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_builds() {
        let registry = build_default_registry().expect("default grammar is consistent");
        assert_eq!(registry.resolve_mnemonic("OpDecorate"), Some(OP_DECORATE));
        assert_eq!(
            registry.resolve_mnemonic("OpGroupMemberDecorate"),
            Some(OP_GROUP_MEMBER_DECORATE)
        );
        assert_eq!(registry.resolve_mnemonic("OpNop"), None);
    }

    #[test]
    fn decoration_values_match_the_published_numbering() {
        let registry = build_default_registry().expect("default grammar is consistent");
        assert_eq!(registry.lookup_enumerant(DECORATION, "RelaxedPrecision"), Some(0));
        assert_eq!(registry.lookup_enumerant(DECORATION, "SpecId"), Some(1));
        assert_eq!(registry.lookup_enumerant(DECORATION, "BuiltIn"), Some(11));
        assert_eq!(registry.lookup_enumerant(DECORATION, "FPFastMathMode"), Some(40));
        assert_eq!(registry.lookup_enumerant(DECORATION, "LinkageAttributes"), Some(41));
        assert_eq!(registry.lookup_enumerant(BUILT_IN, "WorkgroupSize"), Some(24));
        assert_eq!(
            registry.lookup_enumerant(BUILT_IN, "SubgroupLocalInvocationId"),
            Some(40)
        );
    }

    #[test]
    fn fast_math_is_the_only_bitmask_group() {
        let registry = build_default_registry().expect("default grammar is consistent");
        assert!(registry.is_bitmask_group(FP_FAST_MATH_MODE));
        assert!(!registry.is_bitmask_group(DECORATION));
        assert!(!registry.is_bitmask_group(LINKAGE_TYPE));
    }

    #[test]
    fn linkage_extension_requires_string_then_linkage_type() {
        let registry = build_default_registry().expect("default grammar is consistent");
        assert_eq!(
            registry.extension(DECORATION, 41),
            Some(&[LiteralString, EnumValue(LINKAGE_TYPE)][..])
        );
        // RelaxedPrecision takes nothing.
        assert_eq!(registry.extension(DECORATION, 0), None);
    }
}
