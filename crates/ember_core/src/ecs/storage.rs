//! # Structure-of-Arrays Rows
//!
//! A component definition stores each field in its own dense `Vec`:
//!
//! ```text
//! (Vec3, Quat)  ->  ( [P0, P1, P2, ...], [R0, R1, R2, ...] )
//! ```
//!
//! [`Row`] is implemented for tuples of 1 to 8 field types and knows how to
//! grow, shrink and swap-remove all columns in lockstep. [`Field<N>`] selects
//! column `N` at compile time, so field access is a plain slice index.

/// A tuple of field types stored column by column.
pub trait Row: 'static {
    /// One `Vec` per field.
    type Columns: Default + 'static;

    /// Number of fields.
    const ARITY: usize;

    /// Reserves room for `additional` more rows in every column.
    fn reserve(columns: &mut Self::Columns, additional: usize);

    /// Appends a default-constructed row.
    fn push_default(columns: &mut Self::Columns);

    /// Moves the last row into `index` and shrinks every column by one.
    ///
    /// When `index` is the last row this is a plain pop.
    fn swap_remove(columns: &mut Self::Columns, index: usize);

    /// Removes every row.
    fn clear(columns: &mut Self::Columns);

    /// Returns the row count.
    fn len(columns: &Self::Columns) -> usize;
}

/// Column `N` of a [`Row`].
pub trait Field<const N: usize>: Row {
    /// The field type stored in column `N`.
    type Type: 'static;

    /// Returns column `N`.
    fn column(columns: &Self::Columns) -> &Vec<Self::Type>;

    /// Returns column `N` mutably.
    fn column_mut(columns: &mut Self::Columns) -> &mut Vec<Self::Type>;
}

macro_rules! impl_row {
    (@fields $all:tt $($idx:tt : $ty:ident),+) => {
        $(impl_row!(@field $all $idx : $ty);)+
    };

    (@field [$($all:ident),+] $idx:tt : $ty:ident) => {
        impl<$($all: Default + 'static),+> Field<$idx> for ($($all,)+) {
            type Type = $ty;

            #[inline]
            fn column(columns: &Self::Columns) -> &Vec<$ty> {
                &columns.$idx
            }

            #[inline]
            fn column_mut(columns: &mut Self::Columns) -> &mut Vec<$ty> {
                &mut columns.$idx
            }
        }
    };

    ($arity:literal; $($idx:tt : $ty:ident),+) => {
        impl<$($ty: Default + 'static),+> Row for ($($ty,)+) {
            type Columns = ($(Vec<$ty>,)+);

            const ARITY: usize = $arity;

            #[inline]
            fn reserve(columns: &mut Self::Columns, additional: usize) {
                $(columns.$idx.reserve(additional);)+
            }

            #[inline]
            fn push_default(columns: &mut Self::Columns) {
                $(columns.$idx.push($ty::default());)+
            }

            #[inline]
            fn swap_remove(columns: &mut Self::Columns, index: usize) {
                $(let _ = columns.$idx.swap_remove(index);)+
            }

            #[inline]
            fn clear(columns: &mut Self::Columns) {
                $(columns.$idx.clear();)+
            }

            #[inline]
            fn len(columns: &Self::Columns) -> usize {
                columns.0.len()
            }
        }

        impl_row!(@fields [$($ty),+] $($idx : $ty),+);
    };
}

impl_row!(1; 0: A);
impl_row!(2; 0: A, 1: B);
impl_row!(3; 0: A, 1: B, 2: C);
impl_row!(4; 0: A, 1: B, 2: C, 3: D);
impl_row!(5; 0: A, 1: B, 2: C, 3: D, 4: E);
impl_row!(6; 0: A, 1: B, 2: C, 3: D, 4: E, 5: F);
impl_row!(7; 0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G);
impl_row!(8; 0: A, 1: B, 2: C, 3: D, 4: E, 5: F, 6: G, 7: H);
