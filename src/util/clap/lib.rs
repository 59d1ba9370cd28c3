/* ************************************************************************ **
** This file is part of aimdx, and is licensed under EITHER the MIT license **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of aimdx is provided under this permissive         **
** license, and that the project as a whole is licensed under the GPL 3.0.  **
** ************************************************************************ */


pub use clap;

// clap_app! only builds a whole App, makes `takes_value` awkward, and
// makes it easy to write `multiple(true).takes_value(true)` and then be
// surprised when an option eats the positional arguments after it.
// This macro builds a single `clap::Arg` and is explicit about both.

/// Alternative to `clap_app!`.  Produces a `clap::Arg`.
///
/// ```ignore
/// arg!(*output [-o][--output]=OUTDIR "output directory")   // required option
/// arg!( input=XDATCAR "trajectory")                        // required positional
/// arg!(?input=XDATCAR "trajectory")                        // optional positional
/// arg!( strict [--strict] "a flag")
/// arg!( temps [-T][--temperatures]=T... "one or more values")
/// ```
///
/// Options take exactly one value per occurrence unless followed by `...`,
/// in which case a single occurrence accepts one or more values.
#[macro_export]
macro_rules! arg {
    //--- internal: collect [-s][--long] groups ---
    (@opts $head:tt [$($opt:tt)*] [$($flag:tt)+] $($rest:tt)*)
    => { $crate::arg!{@opts $head [$($opt)* [$($flag)+]] $($rest)*} };

    (@opts [$req:tt $name:ident] [$($opt:tt)*] $($rest:tt)*)
    => {{
        let arg = $crate::clap::Arg::with_name(stringify!($name))
            .required($crate::arg!{@required $req [$($opt)*]});
        $( let arg = $crate::arg!{@flag arg $opt}; )*
        $crate::arg!{@value arg $($rest)*}
    }};

    //--- internal: =VALUE and ... ---
    (@value $b:ident =$NAME:ident ... $($rest:tt)*)
    => {
        $crate::arg!{@help (
            $b.takes_value(true).value_name(stringify!($NAME)).multiple(true).min_values(1)
        ) $($rest)*}
    };
    (@value $b:ident =$NAME:ident $($rest:tt)*)
    => {
        $crate::arg!{@help (
            $b.takes_value(true).value_name(stringify!($NAME)).number_of_values(1)
        ) $($rest)*}
    };
    (@value $b:ident ... $($rest:tt)*)
    => { $crate::arg!{@help ($b.multiple(true)) $($rest)*} };
    (@value $b:ident $($rest:tt)*)
    => { $crate::arg!{@help ($b) $($rest)*} };

    //--- internal: "help" ---
    (@help ($b:expr)) => { $b };
    (@help ($b:expr) $help:expr) => { $b.help($help) };

    //--- internal: helpers ---
    (@required (*) $opts:tt) => { true };
    (@required (?) $opts:tt) => { false };
    (@required () []) => { true };
    (@required () [$($opts:tt)+]) => { false };

    (@flag $b:ident [--$($long:tt)*]) => { $b.long(concat!($(stringify!($long)),*)) };
    (@flag $b:ident [-$($short:tt)*]) => { $b.short(concat!($(stringify!($short)),*)) };

    //--- entry points ---
    // * name  - required
    // ? name  - optional
    //   name  - required if positional, optional if it has [-s] or [--long]
    (* $name:ident $($rest:tt)*) => { $crate::arg!{@opts [(*) $name] [] $($rest)*} };
    (? $name:ident $($rest:tt)*) => { $crate::arg!{@opts [(?) $name] [] $($rest)*} };
    ($name:ident $($rest:tt)*) => { $crate::arg!{@opts [() $name] [] $($rest)*} };
}
