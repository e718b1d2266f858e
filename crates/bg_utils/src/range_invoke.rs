/// Call the target macro once per arity, passing tuple indices and type
/// parameter names.
///
/// The arity cannot exceed `8`.
///
/// # Example
///
/// ```ignore
/// range_invoke!(my_macro, 3);
/// // eq  to ↓
/// my_macro!(0: []);
/// my_macro!(1: [0: P0]);
/// my_macro!(2: [0: P0, 1: P1]);
/// my_macro!(3: [0: P0, 1: P1, 2: P2]);
/// ```
#[macro_export]
macro_rules! range_invoke {
    ($(#[$meta:meta])* $macro:ident, 0) => {
        $(#[$meta])* $macro!(0: []);
    };
    ($(#[$meta:meta])* $macro:ident, 1) => {
        $crate::range_invoke!($(#[$meta])* $macro, 0);
        $(#[$meta])* $macro!(1: [0: P0]);
    };
    ($(#[$meta:meta])* $macro:ident, 2) => {
        $crate::range_invoke!($(#[$meta])* $macro, 1);
        $(#[$meta])* $macro!(2: [0: P0, 1: P1]);
    };
    ($(#[$meta:meta])* $macro:ident, 3) => {
        $crate::range_invoke!($(#[$meta])* $macro, 2);
        $(#[$meta])* $macro!(3: [0: P0, 1: P1, 2: P2]);
    };
    ($(#[$meta:meta])* $macro:ident, 4) => {
        $crate::range_invoke!($(#[$meta])* $macro, 3);
        $(#[$meta])* $macro!(4: [0: P0, 1: P1, 2: P2, 3: P3]);
    };
    ($(#[$meta:meta])* $macro:ident, 5) => {
        $crate::range_invoke!($(#[$meta])* $macro, 4);
        $(#[$meta])* $macro!(5: [0: P0, 1: P1, 2: P2, 3: P3, 4: P4]);
    };
    ($(#[$meta:meta])* $macro:ident, 6) => {
        $crate::range_invoke!($(#[$meta])* $macro, 5);
        $(#[$meta])* $macro!(6: [0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5]);
    };
    ($(#[$meta:meta])* $macro:ident, 7) => {
        $crate::range_invoke!($(#[$meta])* $macro, 6);
        $(#[$meta])* $macro!(7: [0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5, 6: P6]);
    };
    ($(#[$meta:meta])* $macro:ident, 8) => {
        $crate::range_invoke!($(#[$meta])* $macro, 7);
        $(#[$meta])* $macro!(8: [0: P0, 1: P1, 2: P2, 3: P3, 4: P4, 5: P5, 6: P6, 7: P7]);
    };
}

#[cfg(test)]
mod tests {
    macro_rules! arity {
        ($num:literal: [$($idx:tt : $p:ident),*]) => {
            const _: () = {
                let indices: &[usize] = &[$($idx),*];
                assert!(indices.len() == $num);
            };
        };
    }

    crate::range_invoke!(arity, 8);

    #[test]
    fn tuple_indices() {
        macro_rules! last_index {
            ($num:literal: [$($idx:tt : $p:ident),*]) => {{
                let tuple = ($($idx,)*);
                let _ = &tuple;
                [$(tuple.$idx),*].last().copied()
            }};
        }

        assert_eq!(last_index!(0: []), None::<usize>);
        assert_eq!(last_index!(3: [0: P0, 1: P1, 2: P2]), Some(2usize));
    }
}
