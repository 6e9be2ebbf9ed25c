use alloc::borrow::Cow;
use alloc::boxed::Box;
use core::num::{NonZeroU32, NonZeroU64, NonZeroUsize};

use crate::impls::{cast, decode_unsigned, impl_scalar};
use crate::info::ScalarClass;
use crate::value::JsonValue;

macro_rules! impl_non_zero {
    ($($ty:ident => $prim:ident),*) => {$(
        impl_scalar!(
            $ty,
            ScalarClass::Integer { bits: $prim::BITS as u8, signed: false },
            |value| {
                let number = decode_unsigned(value, $prim::BITS as u8, false)? as $prim;
                match $ty::new(number) {
                    Some(number) => Ok(Box::new(number)),
                    None => Err(Cow::Borrowed("expected a non-zero number")),
                }
            },
            |value, _| Ok(JsonValue::from_u64(cast::<$ty>(value)?.get() as u64)),
        );
    )*};
}

impl_non_zero!(NonZeroU32 => u32, NonZeroU64 => u64, NonZeroUsize => usize);

#[cfg(test)]
mod tests {
    use core::num::NonZeroU64;

    use crate::info::{ScalarOptions, Typed};
    use crate::value::JsonValue;

    #[test]
    fn zero_is_rejected() {
        let info = NonZeroU64::type_info().as_scalar().unwrap();
        assert!((info.decode_fn())(&JsonValue::Int(0)).is_err());
        let max = NonZeroU64::new(u64::MAX).unwrap();
        let encoded = (info.encode_fn())(&max, ScalarOptions::default()).unwrap();
        let decoded = (info.decode_fn())(&encoded).unwrap();
        assert_eq!(decoded.downcast_ref::<NonZeroU64>(), Some(&max));
    }
}
