/// Conjunction of sub-commands, required by coordinators.
///
/// Coordinators fold the commands of their contributing options in option order: the first
/// command is the seed and every following one is merged into it.
pub trait Mergeable {
    fn merge(&mut self, other: Self);
}

impl Mergeable for bool {
    fn merge(&mut self, other: Self) {
        *self &= other;
    }
}

macro_rules! impl_bitwise_merge {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Mergeable for $ty {
                fn merge(&mut self, other: Self) {
                    *self &= other;
                }
            }
        )*
    };
}

impl_bitwise_merge!(u8, u16, u32, u64, u128, usize);
