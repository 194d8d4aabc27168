//! The C subset's data type system.
//!
//! `DataType` is the tagged union this compiler's data model calls for; sizes are
//! fixed by the System V AMD64 ABI (char=1, short=2, int=long=4,
//! long long=8, float=4, double=8, pointer=8). This crate decides *which*
//! conversion a binary operation or assignment needs; `faxc-gen` is the one
//! that emits the instructions for it.

use faxc_lex::{FloatSuffix, IntSuffix};

/// Signedness of an integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signedness {
    Signed,
    Unsigned,
}

/// A C data type, restricted to the scalar subset this compiler lowers.
///
/// `Pointer`/`Array`/`Struct`/`Union` are carried so the parser can represent
/// declarations that mention them, but no codegen path accepts them; they
/// always fail with a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Char(Signedness),
    Short(Signedness),
    Int(Signedness),
    Long(Signedness),
    LongLong(Signedness),
    Float,
    Double,
    LongDouble,
    Void,
    Pointer { inner: Box<DataType>, indirection: u32 },
    Array(Box<DataType>),
    Struct,
    Union,
    /// Placeholder for a type that failed to resolve during parsing.
    Error,
}

impl DataType {
    pub const fn int() -> Self {
        DataType::Int(Signedness::Signed)
    }

    pub const fn char_ty() -> Self {
        DataType::Char(Signedness::Signed)
    }

    pub const fn unsigned_char() -> Self {
        DataType::Char(Signedness::Unsigned)
    }

    /// Size in bytes per the System V AMD64 ABI.
    pub fn size(&self) -> u32 {
        match self {
            DataType::Char(_) => 1,
            DataType::Short(_) => 2,
            DataType::Int(_) => 4,
            DataType::Long(_) => 8,
            DataType::LongLong(_) => 8,
            DataType::Float => 4,
            DataType::Double => 8,
            DataType::LongDouble => 16,
            DataType::Pointer { .. } => 8,
            DataType::Array(inner) => inner.size(),
            DataType::Void | DataType::Struct | DataType::Union | DataType::Error => 0,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DataType::Char(_) | DataType::Short(_) | DataType::Int(_) | DataType::Long(_) | DataType::LongLong(_)
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DataType::Float | DataType::Double | DataType::LongDouble)
    }

    pub fn is_arithmetic(&self) -> bool {
        self.is_integer() || self.is_float()
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DataType::Error)
    }

    /// An lvalue-addressable scalar: everything this compiler can assign to.
    pub fn is_scalar(&self) -> bool {
        self.is_arithmetic() || matches!(self, DataType::Pointer { .. })
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            DataType::Char(Signedness::Unsigned)
                | DataType::Short(Signedness::Unsigned)
                | DataType::Int(Signedness::Unsigned)
                | DataType::Long(Signedness::Unsigned)
                | DataType::LongLong(Signedness::Unsigned)
        )
    }

    /// Integer conversion rank (char=1 .. long long=5).
    pub fn integer_rank(&self) -> Option<u8> {
        match self {
            DataType::Char(_) => Some(1),
            DataType::Short(_) => Some(2),
            DataType::Int(_) => Some(3),
            DataType::Long(_) => Some(4),
            DataType::LongLong(_) => Some(5),
            _ => None,
        }
    }

    fn with_rank_and_sign(rank: u8, sign: Signedness) -> DataType {
        match rank {
            1 => DataType::Char(sign),
            2 => DataType::Short(sign),
            3 => DataType::Int(sign),
            4 => DataType::Long(sign),
            _ => DataType::LongLong(sign),
        }
    }

    pub fn int_constant_type(suffix: IntSuffix) -> DataType {
        match suffix {
            IntSuffix::None => DataType::Int(Signedness::Signed),
            IntSuffix::Unsigned => DataType::Int(Signedness::Unsigned),
            IntSuffix::Long => DataType::Long(Signedness::Signed),
            IntSuffix::UnsignedLong => DataType::Long(Signedness::Unsigned),
            IntSuffix::LongLong => DataType::LongLong(Signedness::Signed),
            IntSuffix::UnsignedLongLong => DataType::LongLong(Signedness::Unsigned),
        }
    }

    pub fn float_constant_type(suffix: FloatSuffix) -> DataType {
        match suffix {
            FloatSuffix::None => DataType::Double,
            FloatSuffix::Float => DataType::Float,
            FloatSuffix::LongDouble => DataType::LongDouble,
        }
    }
}

/// The "usual arithmetic conversions" C uses to pick a binary operator's
/// result type. `ERROR` for any non-arithmetic operand.
pub fn binary_expression_resulting_type(a: &DataType, b: &DataType) -> DataType {
    if a.is_error() || b.is_error() {
        return DataType::Error;
    }
    if matches!(a, DataType::LongDouble) || matches!(b, DataType::LongDouble) {
        return DataType::LongDouble;
    }
    if matches!(a, DataType::Double) || matches!(b, DataType::Double) {
        return DataType::Double;
    }
    if matches!(a, DataType::Float) || matches!(b, DataType::Float) {
        return DataType::Float;
    }
    let (Some(rank_a), Some(rank_b)) = (a.integer_rank(), b.integer_rank()) else {
        return DataType::Error;
    };
    // Integer promotion floor: nothing narrower than `int` survives to a
    // binary operator's result type.
    let rank_a = rank_a.max(3);
    let rank_b = rank_b.max(3);
    let unsigned_a = a.is_unsigned();
    let unsigned_b = b.is_unsigned();

    if unsigned_a == unsigned_b {
        let rank = rank_a.max(rank_b);
        let sign = if unsigned_a { Signedness::Unsigned } else { Signedness::Signed };
        return DataType::with_rank_and_sign(rank, sign);
    }

    let (unsigned_rank, signed_rank) = if unsigned_a { (rank_a, rank_b) } else { (rank_b, rank_a) };
    if unsigned_rank >= signed_rank {
        DataType::with_rank_and_sign(unsigned_rank, Signedness::Unsigned)
    } else {
        DataType::with_rank_and_sign(signed_rank, Signedness::Signed)
    }
}

/// The concrete machine operation `convert_to_type` must emit to turn a
/// value of type `from` into one of type `to`. Pure classification;
/// `faxc-gen` performs the actual emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Same type: no instructions needed.
    Identity,
    /// Integer to an equal-or-smaller integer: reuse the value, narrower
    /// operand width.
    IntTruncate,
    /// Integer to a wider integer, source is unsigned: zero-extend.
    IntZeroExtend,
    /// Integer to a wider integer, source is signed: sign-extend.
    IntSignExtend,
    /// Integer to a floating type.
    IntToFloat,
    /// Floating type to an integer.
    FloatToInt,
    /// Between distinct floating widths.
    FloatToFloat,
}

/// Classifies the conversion `convert_to_type` needs for `from -> to`.
/// Returns `None` when either side is non-arithmetic; codegen turns that
/// into an unsupported-type or bad-operand-types diagnostic, depending on
/// which side is unsupported.
pub fn classify_conversion(from: &DataType, to: &DataType) -> Option<Conversion> {
    if from == to {
        return Some(Conversion::Identity);
    }
    match (from.is_integer(), from.is_float(), to.is_integer(), to.is_float()) {
        (true, _, true, _) => {
            if to.size() < from.size() || (to.size() == from.size()) {
                Some(Conversion::IntTruncate)
            } else if from.is_unsigned() {
                Some(Conversion::IntZeroExtend)
            } else {
                Some(Conversion::IntSignExtend)
            }
        }
        (true, _, _, true) => Some(Conversion::IntToFloat),
        (_, true, true, _) => Some(Conversion::FloatToInt),
        (_, true, _, true) => Some(Conversion::FloatToFloat),
        _ => None,
    }
}

/// `quickcheck::Arbitrary` wrapper restricted to the arithmetic subset of
/// `DataType`: the two laws below only claim anything about arithmetic
/// operands, so there's no point generating `Pointer`, `Struct`, or `Error`
/// values neither law makes a claim about.
#[cfg(test)]
#[derive(Debug, Clone)]
struct ArithmeticType(DataType);

#[cfg(test)]
impl quickcheck::Arbitrary for ArithmeticType {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let sign = |g: &mut quickcheck::Gen| {
            if bool::arbitrary(g) {
                Signedness::Signed
            } else {
                Signedness::Unsigned
            }
        };
        let variant = u8::arbitrary(g) % 8;
        ArithmeticType(match variant {
            0 => DataType::Char(sign(g)),
            1 => DataType::Short(sign(g)),
            2 => DataType::Int(sign(g)),
            3 => DataType::Long(sign(g)),
            4 => DataType::LongLong(sign(g)),
            5 => DataType::Float,
            6 => DataType::Double,
            _ => DataType::LongDouble,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn usual_arithmetic_conversions_is_commutative() {
        let pairs = [
            (DataType::int(), DataType::Double),
            (DataType::Long(Signedness::Signed), DataType::Int(Signedness::Unsigned)),
            (DataType::Char(Signedness::Signed), DataType::Short(Signedness::Unsigned)),
            (DataType::Float, DataType::LongDouble),
        ];
        for (a, b) in pairs {
            assert_eq!(
                binary_expression_resulting_type(&a, &b),
                binary_expression_resulting_type(&b, &a)
            );
        }
    }

    #[test]
    fn double_dominates_int() {
        assert_eq!(binary_expression_resulting_type(&DataType::int(), &DataType::Double), DataType::Double);
    }

    #[test]
    fn unsigned_int_beats_signed_long_when_rank_is_greater_or_equal() {
        // int (rank 3, unsigned) vs long (rank 4, signed): signed wins (rank 4 > 3).
        assert_eq!(
            binary_expression_resulting_type(&DataType::Int(Signedness::Unsigned), &DataType::Long(Signedness::Signed)),
            DataType::Long(Signedness::Signed)
        );
        // long (rank 4, unsigned) vs int (rank 3, signed): unsigned wins (rank 4 >= 3).
        assert_eq!(
            binary_expression_resulting_type(&DataType::Long(Signedness::Unsigned), &DataType::Int(Signedness::Signed)),
            DataType::Long(Signedness::Unsigned)
        );
    }

    #[test]
    fn conversion_is_idempotent() {
        let t = DataType::Double;
        assert_eq!(classify_conversion(&t, &t), Some(Conversion::Identity));
    }

    #[test]
    fn widening_signed_int_to_long_sign_extends() {
        assert_eq!(
            classify_conversion(&DataType::Int(Signedness::Signed), &DataType::Long(Signedness::Signed)),
            Some(Conversion::IntSignExtend)
        );
    }

    #[test]
    fn widening_unsigned_int_to_long_zero_extends() {
        assert_eq!(
            classify_conversion(&DataType::Int(Signedness::Unsigned), &DataType::Long(Signedness::Signed)),
            Some(Conversion::IntZeroExtend)
        );
    }

    /// The "usual arithmetic conversions are commutative" law, generalized
    /// from the four hand-picked pairs above to every arithmetic type pair
    /// quickcheck can draw.
    #[quickcheck]
    fn prop_binary_expression_resulting_type_is_commutative(a: ArithmeticType, b: ArithmeticType) -> bool {
        binary_expression_resulting_type(&a.0, &b.0) == binary_expression_resulting_type(&b.0, &a.0)
    }

    /// The "converting a type to itself is always `Identity`" law, over the
    /// full arithmetic type space rather than one sample type.
    #[quickcheck]
    fn prop_classify_conversion_is_idempotent(t: ArithmeticType) -> bool {
        classify_conversion(&t.0, &t.0) == Some(Conversion::Identity)
    }

    /// Conversion-order symmetry law: classifying `a -> b` and `b -> a`
    /// never both come back widening (or both narrowing) unless
    /// `a == b`, since exactly one of `size(a) <= size(b)` or the reverse
    /// holds for any two distinct arithmetic types.
    #[quickcheck]
    fn prop_classify_conversion_is_directionally_symmetric(a: ArithmeticType, b: ArithmeticType) -> bool {
        if a.0 == b.0 {
            return true;
        }
        let widens = |from: &DataType, to: &DataType| match classify_conversion(from, to) {
            Some(Conversion::IntZeroExtend) | Some(Conversion::IntSignExtend) => true,
            _ => false,
        };
        !(widens(&a.0, &b.0) && widens(&b.0, &a.0))
    }
}
